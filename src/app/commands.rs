//! Command handlers - business logic for processing UI events

use crate::app::AppState;
use crate::messages::render::Notice;
use crate::messages::ui_events::{InputMode, Panel};
use crate::messages::{NetworkCommand, NetworkResponse};

impl AppState {
    // ========================
    // Navigation
    // ========================

    pub fn next_panel(&mut self) {
        self.active_panel = self.active_panel.next();
    }

    pub fn prev_panel(&mut self) {
        self.active_panel = self.active_panel.prev();
    }

    pub fn select_category(&mut self, index: usize) {
        if index < self.catalog.categories().len() {
            self.active_category = index;
            self.on_selection_changed();
        }
    }

    pub fn next_category(&mut self) {
        let count = self.catalog.categories().len();
        if count > 0 {
            self.select_category((self.active_category + 1) % count);
        }
    }

    pub fn prev_category(&mut self) {
        let count = self.catalog.categories().len();
        if count > 0 {
            self.select_category(self.active_category.checked_sub(1).unwrap_or(count - 1));
        }
    }

    pub fn next_endpoint(&mut self) {
        let count = self.visible_entries().len();
        if count > 0 {
            self.selected_endpoint = (self.selected_endpoint + 1) % count;
            self.on_endpoint_changed();
        }
    }

    pub fn prev_endpoint(&mut self) {
        let count = self.visible_entries().len();
        if count > 0 {
            self.selected_endpoint = self.selected_endpoint.checked_sub(1).unwrap_or(count - 1);
            self.on_endpoint_changed();
        }
    }

    pub fn next_param(&mut self) {
        let count = self.selected_param_count();
        if count > 0 {
            self.selected_param = (self.selected_param + 1) % count;
        }
    }

    pub fn prev_param(&mut self) {
        let count = self.selected_param_count();
        if count > 0 {
            self.selected_param = self.selected_param.checked_sub(1).unwrap_or(count - 1);
        }
    }

    fn selected_param_count(&self) -> usize {
        self.selected_entry()
            .and_then(|id| self.catalog.entry(id))
            .map(|e| e.endpoint.parameters.len())
            .unwrap_or(0)
    }

    fn on_selection_changed(&mut self) {
        self.selected_endpoint = 0;
        self.on_endpoint_changed();
    }

    fn on_endpoint_changed(&mut self) {
        self.selected_param = 0;
        self.response_scroll = 0;
    }

    // ========================
    // Response scrolling
    // ========================

    pub fn scroll_up(&mut self) {
        self.response_scroll = self.response_scroll.saturating_sub(1);
    }

    pub fn scroll_down(&mut self) {
        self.response_scroll = self.response_scroll.saturating_add(1);
    }

    // ========================
    // Input editing
    // ========================

    pub fn start_editing(&mut self) {
        if !self.active_panel.is_editable() {
            return;
        }
        if !self.has_input_field() {
            return;
        }
        self.input_mode = InputMode::Editing;
        self.cursor_position = self.current_input().len();
    }

    pub fn stop_editing(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    pub fn start_search(&mut self) {
        self.input_mode = InputMode::Searching;
        self.cursor_position = self.search.len();
    }

    pub fn clear_search(&mut self) {
        self.search.clear();
        self.input_mode = InputMode::Normal;
        self.on_selection_changed();
    }

    pub fn move_cursor_left(&mut self) {
        let input = self.current_input();
        if self.cursor_position > 0 {
            self.cursor_position = input[..self.cursor_position]
                .char_indices()
                .last()
                .map(|(i, _)| i)
                .unwrap_or(0);
        }
    }

    pub fn move_cursor_right(&mut self) {
        let input = self.current_input();
        if self.cursor_position < input.len() {
            self.cursor_position = input[self.cursor_position..]
                .char_indices()
                .nth(1)
                .map(|(i, _)| self.cursor_position + i)
                .unwrap_or(input.len());
        }
    }

    pub fn enter_char(&mut self, c: char) {
        let cursor_pos = self.cursor_position;
        let searching = self.input_mode == InputMode::Searching;
        if let Some(input) = self.current_input_mut() {
            if cursor_pos <= input.len() {
                input.insert(cursor_pos, c);
                self.cursor_position = cursor_pos + c.len_utf8();
            }
        }
        if searching {
            self.on_selection_changed();
        }
    }

    pub fn delete_char(&mut self) {
        if self.cursor_position == 0 {
            return;
        }
        let cursor_pos = self.cursor_position;
        let searching = self.input_mode == InputMode::Searching;
        if let Some(input) = self.current_input_mut() {
            let prev_pos = input[..cursor_pos.min(input.len())]
                .char_indices()
                .last()
                .map(|(i, _)| i)
                .unwrap_or(0);
            input.remove(prev_pos);
            self.cursor_position = prev_pos;
        }
        if searching {
            self.on_selection_changed();
        }
    }

    // ========================
    // Request lifecycle
    // ========================

    /// Starts an execution for the selected endpoint, unless one is already in flight
    pub fn prepare_request(&mut self) -> Option<NetworkCommand> {
        let entry = self.selected_entry()?;
        let ticket = self.session_mut(entry)?.begin()?;
        let id = self.next_id();
        tracing::info!(
            id,
            method = %ticket.descriptor.method,
            path = %ticket.descriptor.path,
            "Sending request"
        );
        self.in_flight.insert(id, (entry, ticket.generation));
        self.response_scroll = 0;
        Some(NetworkCommand::Execute { id, ticket })
    }

    /// Routes a finished execution back to the session that issued it
    pub fn handle_response(&mut self, response: NetworkResponse) {
        let Some((entry, generation)) = self.in_flight.remove(&response.id) else {
            tracing::warn!(id = response.id, "Response for unknown request");
            return;
        };

        self.notice = Some(match response.record.status_code {
            Some(code) => Notice {
                success: !response.record.is_error,
                message: format!("Request completed — Status: {}", code),
            },
            None => Notice {
                success: false,
                message: format!("Request failed — {}", response.record.body_text),
            },
        });

        if let Some(session) = self.sessions.get_mut(&entry) {
            if session.complete(generation, response.record) {
                session.settle();
                self.elapsed_ms.insert(entry, response.time_ms);
            }
        }
    }

    pub fn reset_endpoint(&mut self) {
        if let Some(entry) = self.selected_entry() {
            if let Some(session) = self.session_mut(entry) {
                session.reset();
            }
            self.elapsed_ms.remove(&entry);
        }
        self.response_scroll = 0;
    }

    // ========================
    // Help popup
    // ========================

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub fn close_help(&mut self) {
        self.show_help = false;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::catalog::{Catalog, EntryId};
    use crate::compose::RequestComposer;
    use crate::models::{HeaderSet, ResponseRecord};
    use crate::session::ExecutionState;

    fn app() -> AppState {
        AppState::new(
            Arc::new(Catalog::builtin().unwrap()),
            RequestComposer::default(),
            HeaderSet::default(),
        )
    }

    fn type_text(state: &mut AppState, text: &str) {
        for c in text.chars() {
            state.enter_char(c);
        }
    }

    #[test]
    fn test_editing_parameter_updates_preview() {
        let mut state = app();
        // Facturas (CFDI) -> Obtener Factura por ID
        state.next_endpoint();
        state.next_endpoint();
        state.active_panel = Panel::Parameters;
        state.start_editing();
        type_text(&mut state, "abc");
        state.stop_editing();
        state.next_param();
        state.start_editing();
        type_text(&mut state, "issued");
        state.stop_editing();

        let render = state.to_render_state();
        let detail = render.detail.unwrap();
        assert_eq!(detail.url, "https://apisandbox.facturama.mx/api/Cfdi/abc/issued");
        assert!(detail.unresolved.is_empty());
        assert_eq!(detail.parameters[0].value, "abc");
    }

    #[test]
    fn test_search_filters_active_category() {
        let mut state = app();
        state.start_search();
        type_text(&mut state, "cancelar");
        let render = state.to_render_state();
        assert_eq!(render.endpoints.len(), 1);
        assert_eq!(render.endpoints[0].title, "Cancelar Factura");
        assert_eq!(render.categories[0], "Facturas (CFDI) (1)");

        state.clear_search();
        assert_eq!(state.to_render_state().endpoints.len(), 6);
    }

    #[test]
    fn test_send_is_refused_while_sending() {
        let mut state = app();
        let first = state.prepare_request();
        assert!(first.is_some());
        assert!(state.prepare_request().is_none());

        let entry = state.selected_entry().unwrap();
        assert_eq!(state.sessions[&entry].state(), ExecutionState::Sending);
        assert_eq!(
            state.to_render_state().detail.unwrap().state,
            ExecutionState::Sending
        );
    }

    #[test]
    fn test_response_is_routed_to_its_own_session() {
        let mut state = app();
        let Some(NetworkCommand::Execute { id: first_id, .. }) = state.prepare_request() else {
            panic!("expected an execute command");
        };
        state.next_endpoint();
        let Some(NetworkCommand::Execute { id: second_id, .. }) = state.prepare_request() else {
            panic!("expected an execute command");
        };

        state.handle_response(NetworkResponse {
            id: second_id,
            record: ResponseRecord::from_status(200, "OK", "[]".to_string()),
            time_ms: 12,
        });
        state.handle_response(NetworkResponse {
            id: first_id,
            record: ResponseRecord::failure("network down"),
            time_ms: 3,
        });

        let first = &state.sessions[&EntryId { category: 0, index: 0 }];
        let second = &state.sessions[&EntryId { category: 0, index: 1 }];
        assert_eq!(first.formatted_response().as_deref(), Some("Error: network down"));
        assert_eq!(second.formatted_response().as_deref(), Some("Status: 200 OK\n\n[]"));
        assert_eq!(first.state(), ExecutionState::Idle);
        assert_eq!(
            state.notice,
            Some(Notice {
                success: false,
                message: "Request failed — network down".to_string()
            })
        );
        assert!(state.in_flight.is_empty());
    }

    #[test]
    fn test_opening_a_parameter_without_typing_keeps_placeholder() {
        let mut state = app();
        // Obtener Factura por ID
        state.next_endpoint();
        state.next_endpoint();
        let before = state.to_render_state().detail.unwrap().url;
        assert_eq!(before, "https://apisandbox.facturama.mx/api/Cfdi/{id}/{type}");

        state.active_panel = Panel::Parameters;
        state.start_editing();
        assert_eq!(state.input_mode, InputMode::Editing);
        state.delete_char();
        state.move_cursor_left();
        state.stop_editing();

        let detail = state.to_render_state().detail.unwrap();
        assert_eq!(detail.url, before);
        assert_eq!(detail.unresolved, vec!["id".to_string(), "type".to_string()]);
        let entry = state.selected_entry().unwrap();
        assert!(state.sessions.get(&entry).map_or(true, |s| s.bindings.is_empty()));
    }

    #[test]
    fn test_in_flight_response_lands_after_reset() {
        let mut state = app();
        // Obtener Factura por ID
        state.next_endpoint();
        state.next_endpoint();
        state.active_panel = Panel::Parameters;
        state.start_editing();
        type_text(&mut state, "abc");
        state.stop_editing();

        let Some(NetworkCommand::Execute { id, ticket }) = state.prepare_request() else {
            panic!("expected an execute command");
        };
        assert_eq!(ticket.bindings.get("id"), Some("abc"));

        state.reset_endpoint();
        let detail = state.to_render_state().detail.unwrap();
        assert_eq!(detail.state, ExecutionState::Sending);
        assert!(detail.parameters[0].value.is_empty());

        state.handle_response(NetworkResponse {
            id,
            record: ResponseRecord::from_status(404, "Not Found", "{\"Message\":\"No encontrado\"}".to_string()),
            time_ms: 87,
        });

        let detail = state.to_render_state().detail.unwrap();
        assert_eq!(detail.state, ExecutionState::Idle);
        assert_eq!(detail.status_code, Some(404));
        assert_eq!(detail.time_ms, Some(87));
        assert_eq!(
            detail.response.as_deref(),
            Some("Status: 404 Not Found\n\n{\n  \"Message\": \"No encontrado\"\n}")
        );
        assert_eq!(detail.url, "https://apisandbox.facturama.mx/api/Cfdi/{id}/{type}");
        assert_eq!(
            state.notice,
            Some(Notice {
                success: false,
                message: "Request completed — Status: 404".to_string()
            })
        );

        state.reset_endpoint();
        let detail = state.to_render_state().detail.unwrap();
        assert!(detail.response.is_none());
        assert_eq!(detail.time_ms, None);
    }

    #[test]
    fn test_body_not_editable_for_get() {
        let mut state = app();
        // Consultar Facturas is a GET
        state.next_endpoint();
        state.active_panel = Panel::Body;
        state.start_editing();
        assert_eq!(state.input_mode, InputMode::Normal);
    }

    #[test]
    fn test_category_navigation_wraps() {
        let mut state = app();
        state.prev_category();
        assert_eq!(state.active_category, 5);
        state.next_category();
        assert_eq!(state.active_category, 0);
        state.select_category(42);
        assert_eq!(state.active_category, 0);
    }
}
