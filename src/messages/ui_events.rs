//! UI events - messages from UI layer to App layer

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Events generated from user input in the UI layer
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    // Category tabs
    NextCategory,
    PrevCategory,
    SelectCategory(usize),

    // Panel navigation
    NextPanel,
    PrevPanel,
    NextEndpoint,
    PrevEndpoint,
    NextParam,
    PrevParam,
    ScrollUp,
    ScrollDown,

    // Input editing
    StartEditing,
    StopEditing,
    CharInput(char),
    Newline,
    Backspace,
    CursorLeft,
    CursorRight,

    // Search
    StartSearch,
    ClearSearch,

    // Request actions
    SendRequest,
    ResetEndpoint,

    // Popups
    ToggleHelp,
    CloseHelp,

    // System
    Quit,
}

/// Active panel in the UI (needed for context-aware event mapping)
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Panel {
    #[default]
    Endpoints,
    Parameters,
    Authorization,
    Body,
    Response,
}

impl Panel {
    pub fn next(&self) -> Panel {
        match self {
            Panel::Endpoints => Panel::Parameters,
            Panel::Parameters => Panel::Authorization,
            Panel::Authorization => Panel::Body,
            Panel::Body => Panel::Response,
            Panel::Response => Panel::Endpoints,
        }
    }

    pub fn prev(&self) -> Panel {
        match self {
            Panel::Endpoints => Panel::Response,
            Panel::Parameters => Panel::Endpoints,
            Panel::Authorization => Panel::Parameters,
            Panel::Body => Panel::Authorization,
            Panel::Response => Panel::Body,
        }
    }

    pub fn is_editable(&self) -> bool {
        matches!(self, Panel::Parameters | Panel::Authorization | Panel::Body)
    }
}

/// Input mode
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum InputMode {
    #[default]
    Normal,
    /// Editing the field of the active panel
    Editing,
    /// Typing into the search box
    Searching,
}

/// Convert a key event to a UiEvent based on current UI context
pub fn key_to_ui_event(
    key: KeyEvent,
    active_panel: Panel,
    input_mode: InputMode,
    show_help: bool,
) -> Option<UiEvent> {
    use crossterm::event::KeyEventKind;

    if key.kind != KeyEventKind::Press {
        return None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        if let KeyCode::Char('c') = key.code {
            return Some(UiEvent::Quit);
        }
    }

    if show_help {
        return Some(UiEvent::CloseHelp);
    }

    match input_mode {
        InputMode::Normal => handle_normal_keys(key, active_panel),
        InputMode::Editing => match key.code {
            KeyCode::Esc => Some(UiEvent::StopEditing),
            KeyCode::Left => Some(UiEvent::CursorLeft),
            KeyCode::Right => Some(UiEvent::CursorRight),
            KeyCode::Backspace => Some(UiEvent::Backspace),
            KeyCode::Char(c) => Some(UiEvent::CharInput(c)),
            KeyCode::Enter if active_panel == Panel::Body => Some(UiEvent::Newline),
            KeyCode::Enter => Some(UiEvent::StopEditing),
            _ => None,
        },
        InputMode::Searching => match key.code {
            KeyCode::Esc => Some(UiEvent::ClearSearch),
            KeyCode::Enter => Some(UiEvent::StopEditing),
            KeyCode::Backspace => Some(UiEvent::Backspace),
            KeyCode::Char(c) => Some(UiEvent::CharInput(c)),
            _ => None,
        },
    }
}

fn handle_normal_keys(key: KeyEvent, active_panel: Panel) -> Option<UiEvent> {
    match key.code {
        KeyCode::Char('q') => Some(UiEvent::Quit),
        KeyCode::Char('?') => Some(UiEvent::ToggleHelp),
        KeyCode::Char('/') => Some(UiEvent::StartSearch),
        KeyCode::Char('s') => Some(UiEvent::SendRequest),
        KeyCode::Char('r') => Some(UiEvent::ResetEndpoint),
        KeyCode::Char(c @ '1'..='9') => c
            .to_digit(10)
            .map(|d| UiEvent::SelectCategory(d as usize - 1)),
        KeyCode::Left => Some(UiEvent::PrevCategory),
        KeyCode::Right => Some(UiEvent::NextCategory),
        KeyCode::Tab => Some(UiEvent::NextPanel),
        KeyCode::BackTab => Some(UiEvent::PrevPanel),
        KeyCode::Char('e') | KeyCode::Enter if active_panel.is_editable() => {
            Some(UiEvent::StartEditing)
        }
        KeyCode::Up => match active_panel {
            Panel::Endpoints => Some(UiEvent::PrevEndpoint),
            Panel::Parameters => Some(UiEvent::PrevParam),
            Panel::Response => Some(UiEvent::ScrollUp),
            _ => None,
        },
        KeyCode::Down => match active_panel {
            Panel::Endpoints => Some(UiEvent::NextEndpoint),
            Panel::Parameters => Some(UiEvent::NextParam),
            Panel::Response => Some(UiEvent::ScrollDown),
            _ => None,
        },
        KeyCode::PageUp => Some(UiEvent::ScrollUp),
        KeyCode::PageDown => Some(UiEvent::ScrollDown),
        _ => None,
    }
}
