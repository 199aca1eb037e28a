//! Facturama Sandbox - actor-based explorer for the Facturama REST API
//!
//! Architecture:
//! - UI Layer (Ratatui) - synchronous terminal rendering
//! - App Layer - central state machine processing events
//! - Network Layer (Tokio) - async request execution

use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{prelude::*, widgets::*};
use tokio::sync::mpsc;

use facturama_sandbox::app::{AppActor, AppState};
use facturama_sandbox::catalog::Catalog;
use facturama_sandbox::config::Config;
use facturama_sandbox::constants::{APP_NAME, APP_VERSION};
use facturama_sandbox::messages::render::EndpointDetail;
use facturama_sandbox::messages::ui_events::{key_to_ui_event, InputMode, Panel};
use facturama_sandbox::messages::{NetworkCommand, NetworkResponse, RenderState, UiEvent};
use facturama_sandbox::network::{LogNotifier, NetworkActor, ReqwestTransport, RequestExecutor};
use facturama_sandbox::session::ExecutionState;
use facturama_sandbox::ui::{
    cursor_line_col, highlight_json, method_color, render_tabs, state_badge, status_color,
};

/// Terminal cleanup guard
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load()?;

    // Initialize logging to file
    let log_dir = config
        .log_file
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| ".".into());
    let log_name = config
        .log_file
        .file_name()
        .context("log_file must name a file")?
        .to_owned();
    let file_appender = tracing_appender::rolling::never(log_dir, log_name);
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_ansi(false)
        .init();

    tracing::info!(version = APP_VERSION, base_url = %config.base_url, "Starting");

    let catalog = Catalog::load_or_builtin(config.catalog.as_deref())?;
    let transport = ReqwestTransport::new(config.timeout());
    let executor = Arc::new(
        RequestExecutor::new(config.composer(), transport).with_notifier(Arc::new(LogNotifier)),
    );
    let state = AppState::new(Arc::new(catalog), config.composer(), config.default_headers());

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let _terminal_guard = TerminalGuard;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create channels
    let (ui_tx, ui_rx) = mpsc::unbounded_channel::<UiEvent>();
    let (net_cmd_tx, net_cmd_rx) = mpsc::unbounded_channel::<NetworkCommand>();
    let (net_resp_tx, net_resp_rx) = mpsc::unbounded_channel::<NetworkResponse>();
    let (render_tx, mut render_rx) = mpsc::unbounded_channel::<RenderState>();

    // Spawn network actor
    let network_actor = NetworkActor::new(executor, net_resp_tx);
    tokio::spawn(network_actor.run(net_cmd_rx));

    // Spawn app actor
    let app_actor = AppActor::new(state, net_cmd_tx, render_tx);
    tokio::spawn(app_actor.run(ui_rx, net_resp_rx));

    // Run UI loop (synchronous with async polling)
    run_ui_loop(&mut terminal, ui_tx, &mut render_rx).await?;

    tracing::info!("Exiting");
    Ok(())
}

/// Run the synchronous UI rendering loop
async fn run_ui_loop(
    terminal: &mut Terminal<impl Backend>,
    ui_tx: mpsc::UnboundedSender<UiEvent>,
    render_rx: &mut mpsc::UnboundedReceiver<RenderState>,
) -> anyhow::Result<()> {
    let mut current_state = RenderState::default();

    loop {
        // Draw with current state
        terminal.draw(|f| draw_ui(f, &current_state))?;

        // Poll for events with timeout
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if let Some(event) = key_to_ui_event(
                    key,
                    current_state.active_panel,
                    current_state.input_mode,
                    current_state.show_help,
                ) {
                    let quit = matches!(event, UiEvent::Quit);
                    let _ = ui_tx.send(event);
                    if quit {
                        break;
                    }
                }
            }
        }

        // Check for state updates (non-blocking)
        while let Ok(state) = render_rx.try_recv() {
            current_state = state;
        }
    }

    Ok(())
}

// ============================================================================
// UI Drawing Functions
// ============================================================================

fn draw_ui(f: &mut Frame, state: &RenderState) {
    let area = f.area();

    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Title
            Constraint::Length(1), // Category tabs
            Constraint::Min(0),    // Content
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    draw_title(f, state, main_chunks[0]);
    draw_category_tabs(f, state, main_chunks[1]);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
        .split(main_chunks[2]);

    draw_endpoint_column(f, state, columns[0]);
    draw_detail_column(f, state, columns[1]);
    draw_status_bar(f, state, main_chunks[3]);

    if state.show_help {
        draw_help_popup(f, area);
    }
}

fn border_style(state: &RenderState, panel: Panel) -> Style {
    let is_focused = state.active_panel == panel;
    if is_focused && state.input_mode == InputMode::Editing {
        Style::default().fg(Color::Yellow)
    } else if is_focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    }
}

fn draw_title(f: &mut Frame, state: &RenderState, area: Rect) {
    let title = Line::from(vec![
        Span::styled(format!(" {} ", APP_NAME), Style::default().fg(Color::Black).bg(Color::Cyan).bold()),
        Span::raw(" "),
        Span::styled(state.base_url.clone(), Style::default().fg(Color::DarkGray)),
    ]);
    f.render_widget(Paragraph::new(title), area);
}

fn draw_category_tabs(f: &mut Frame, state: &RenderState, area: Rect) {
    let titles: Vec<String> = state
        .categories
        .iter()
        .enumerate()
        .map(|(i, name)| format!(" {}:{} ", i + 1, name))
        .collect();
    let titles: Vec<&str> = titles.iter().map(String::as_str).collect();
    f.render_widget(render_tabs(&titles, state.active_category), area);
}

fn draw_endpoint_column(f: &mut Frame, state: &RenderState, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(3)])
        .split(area);

    // Search box
    let searching = state.input_mode == InputMode::Searching;
    let search_block = Block::default()
        .borders(Borders::ALL)
        .border_style(if searching {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        })
        .title(" Search (/) ");
    let search_text = if state.search.is_empty() && !searching {
        Span::styled("title, description or path", Style::default().fg(Color::DarkGray))
    } else {
        Span::raw(state.search.as_str())
    };
    f.render_widget(Paragraph::new(Line::from(search_text)).block(search_block), chunks[0]);
    if searching {
        let max_x = chunks[0].x + chunks[0].width.saturating_sub(2);
        let cursor_x = (chunks[0].x + state.search[..state.cursor_position.min(state.search.len())]
            .chars()
            .count() as u16
            + 1)
        .min(max_x);
        f.set_cursor_position(Position::new(cursor_x, chunks[0].y + 1));
    }

    // Endpoint list
    let items: Vec<ListItem> = state
        .endpoints
        .iter()
        .map(|row| {
            let method_span = Span::styled(
                format!("{:6}", row.method.as_str()),
                Style::default().fg(method_color(row.method)).bold(),
            );
            ListItem::new(Line::from(vec![method_span, Span::raw(format!(" {}", row.title))]))
        })
        .collect();

    let title = if state.endpoints.is_empty() {
        " Endpoints (no matches) ".to_string()
    } else {
        format!(" Endpoints ({}) ", state.endpoints.len())
    };

    let highlight_style = if state.active_panel == Panel::Endpoints {
        Style::default().fg(Color::Yellow).bold()
    } else {
        Style::default().add_modifier(Modifier::BOLD)
    };

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style(state, Panel::Endpoints))
                .title(title)
                .title_bottom(Line::from(format!(" {} ", state.category_description)).style(Style::default().fg(Color::DarkGray))),
        )
        .highlight_style(highlight_style)
        .highlight_symbol("> ");

    let mut list_state = ListState::default();
    if !state.endpoints.is_empty() {
        list_state.select(Some(state.selected_endpoint));
    }
    f.render_stateful_widget(list, chunks[1], &mut list_state);
}

fn draw_detail_column(f: &mut Frame, state: &RenderState, area: Rect) {
    let Some(detail) = &state.detail else {
        let empty = Paragraph::new("Select an endpoint to get started")
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(empty, area);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Method + URL preview
            Constraint::Length(1), // Panel tabs
            Constraint::Length(9), // Active editor
            Constraint::Min(5),    // Response
        ])
        .split(area);

    draw_url_preview(f, detail, chunks[0]);

    let selected_tab = match state.active_panel {
        Panel::Authorization => 1,
        Panel::Body => 2,
        _ => 0,
    };
    f.render_widget(render_tabs(&["Parameters", "Authorization", "Body"], selected_tab), chunks[1]);

    match state.active_panel {
        Panel::Authorization => draw_auth_panel(f, state, detail, chunks[2]),
        Panel::Body => draw_body_panel(f, state, detail, chunks[2]),
        _ => draw_params_panel(f, state, detail, chunks[2]),
    }

    draw_response(f, state, detail, chunks[3]);
}

fn draw_url_preview(f: &mut Frame, detail: &EndpointDetail, area: Rect) {
    let mut title = vec![Span::styled(
        format!(" {} ", detail.method),
        Style::default().fg(method_color(detail.method)).bold(),
    )];
    title.push(Span::raw(format!("{} ", detail.title)));
    if let Some((label, color)) = state_badge(detail.state) {
        title.push(Span::styled(format!("[{}] ", label), Style::default().fg(color)));
    }

    let mut lines = vec![Line::from(detail.url.clone())];
    if detail.unresolved.is_empty() {
        lines.push(Line::from(Span::styled(
            detail.description.clone(),
            Style::default().fg(Color::DarkGray),
        )));
    } else {
        lines.push(Line::from(Span::styled(
            format!("Unbound: {}", detail.unresolved.join(", ")),
            Style::default().fg(Color::Red),
        )));
    }

    let block = Block::default().borders(Borders::ALL).title(Line::from(title));
    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_params_panel(f: &mut Frame, state: &RenderState, detail: &EndpointDetail, area: Rect) {
    let is_focused = state.active_panel == Panel::Parameters;

    if detail.parameters.is_empty() {
        let empty = Paragraph::new("This endpoint takes no parameters")
            .style(Style::default().fg(Color::DarkGray))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(border_style(state, Panel::Parameters))
                    .title(" Parameters "),
            );
        f.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = detail
        .parameters
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let name_style = if is_focused && i == state.selected_param {
                Style::default().fg(Color::Yellow).bold()
            } else {
                Style::default().bold()
            };
            let required = if p.required { "*" } else { " " };
            let value = if p.value.is_empty() {
                Span::styled(
                    p.description.clone().unwrap_or_else(|| p.type_hint.clone()),
                    Style::default().fg(Color::DarkGray),
                )
            } else {
                Span::raw(p.value.clone())
            };
            ListItem::new(Line::from(vec![
                Span::styled(format!("{}{} ", p.name, required), name_style),
                Span::styled(format!("({}) ", p.type_hint), Style::default().fg(Color::DarkGray)),
                value,
            ]))
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style(state, Panel::Parameters))
            .title(" Parameters (↑/↓ select, e edit) "),
    );
    f.render_widget(list, area);

    if is_focused && state.input_mode == InputMode::Editing {
        if let Some(p) = detail.parameters.get(state.selected_param) {
            let prefix = p.name.chars().count() + 2 + p.type_hint.chars().count() + 3;
            let typed = p.value[..state.cursor_position.min(p.value.len())].chars().count();
            let max_x = area.x + area.width.saturating_sub(2);
            let cursor_x = (area.x + 1 + (prefix + typed) as u16).min(max_x);
            f.set_cursor_position(Position::new(cursor_x, area.y + 1 + state.selected_param as u16));
        }
    }
}

fn draw_auth_panel(f: &mut Frame, state: &RenderState, detail: &EndpointDetail, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style(state, Panel::Authorization))
        .title(" Authorization header (e edit) ");

    let auth = Paragraph::new(detail.authorization.as_str())
        .block(block)
        .wrap(Wrap { trim: false });
    f.render_widget(auth, area);

    if state.active_panel == Panel::Authorization && state.input_mode == InputMode::Editing {
        let (_, col) = cursor_line_col(&detail.authorization, state.cursor_position);
        let max_x = area.x + area.width.saturating_sub(2);
        let cursor_x = (area.x + col + 1).min(max_x);
        f.set_cursor_position(Position::new(cursor_x, area.y + 1));
    }
}

fn draw_body_panel(f: &mut Frame, state: &RenderState, detail: &EndpointDetail, area: Rect) {
    let title = if detail.method.has_body() {
        " Body (JSON, e edit) "
    } else {
        " Body (not sent for GET) "
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style(state, Panel::Body))
        .title(title);

    let content = if detail.method.has_body() {
        highlight_json(&detail.body)
    } else {
        Vec::new()
    };

    f.render_widget(Paragraph::new(content).block(block), area);

    if state.active_panel == Panel::Body
        && state.input_mode == InputMode::Editing
        && detail.method.has_body()
    {
        let (line, col) = cursor_line_col(&detail.body, state.cursor_position);
        let max_x = area.x + area.width.saturating_sub(2);
        let max_y = area.y + area.height.saturating_sub(2);
        let cursor_x = (area.x + col + 1).min(max_x);
        let cursor_y = (area.y + line + 1).min(max_y);
        f.set_cursor_position(Position::new(cursor_x, cursor_y));
    }
}

fn draw_response(f: &mut Frame, state: &RenderState, detail: &EndpointDetail, area: Rect) {
    let status_text = match detail.status_code {
        Some(code) => Span::styled(
            format!(" {} ", code),
            Style::default().fg(status_color(code)).bold(),
        ),
        None => Span::raw(" Response "),
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style(state, Panel::Response))
        .title(status_text)
        .title_bottom(
            Line::from(detail.time_ms.map(|ms| format!(" {}ms ", ms)).unwrap_or_default())
                .right_aligned(),
        );

    let lines = match (&detail.response, detail.state) {
        (_, ExecutionState::Sending) => vec![Line::from(Span::styled(
            "Sending request...",
            Style::default().fg(Color::Yellow),
        ))],
        (Some(text), _) => highlight_json(text),
        (None, _) => vec![Line::from(Span::styled(
            "Press 's' to send this request",
            Style::default().fg(Color::DarkGray),
        ))],
    };

    let response = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((state.response_scroll, 0));
    f.render_widget(response, area);
}

fn draw_status_bar(f: &mut Frame, state: &RenderState, area: Rect) {
    let line = match (&state.notice, state.input_mode) {
        (_, InputMode::Editing) => Line::from(" ESC:stop editing | arrows:move | Enter:done (newline in body) "),
        (_, InputMode::Searching) => Line::from(" type to filter | Enter:keep | ESC:clear "),
        (Some(notice), InputMode::Normal) => Line::from(Span::styled(
            format!(" {} ", notice.message),
            Style::default().fg(if notice.success { Color::Green } else { Color::Red }),
        )),
        (None, InputMode::Normal) => {
            Line::from(" Tab:panel | ←/→:category | e:edit | s:send | r:reset | /:search | ?:help | q:quit ")
        }
    };

    let bar = Paragraph::new(line).style(Style::default().fg(Color::DarkGray));
    f.render_widget(bar, area);
}

fn draw_help_popup(f: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 70, area);

    let help_text = r#"
 FACTURAMA SANDBOX - Keyboard Shortcuts

 NAVIGATION
   ← / → or 1-9       Switch category
   ↑ / ↓              Select endpoint / parameter, scroll response
   Tab / Shift+Tab    Switch panels
   /                  Search endpoints (Esc clears)

 REQUEST
   e / Enter          Edit parameter, authorization or body
   s                  Send request
   r                  Reset endpoint to its defaults

 GENERAL
   ?                  Toggle this help
   q / Ctrl+C         Quit

 Press any key to close...
"#;

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Help ")
        .style(Style::default().bg(Color::Black));

    let help = Paragraph::new(help_text)
        .block(block)
        .wrap(Wrap { trim: false });

    f.render_widget(Clear, popup_area);
    f.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
