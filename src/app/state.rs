//! App state - pure data structure with no I/O logic

use std::collections::HashMap;
use std::sync::Arc;

use crate::catalog::{Catalog, EntryId};
use crate::compose::{unresolved_placeholders, RequestComposer};
use crate::messages::render::{EndpointDetail, EndpointRow, Notice, ParamRow};
use crate::messages::ui_events::{InputMode, Panel};
use crate::messages::RenderState;
use crate::models::HeaderSet;
use crate::session::EndpointSession;

/// Main application state - pure data, no I/O
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub composer: RequestComposer,
    pub default_headers: HeaderSet,

    // One session per endpoint the user has touched
    pub sessions: HashMap<EntryId, EndpointSession>,

    // Catalog navigation
    pub active_category: usize,
    pub selected_endpoint: usize,
    pub search: String,

    // UI state
    pub active_panel: Panel,
    pub input_mode: InputMode,
    pub cursor_position: usize,
    pub selected_param: usize,
    pub response_scroll: u16,

    // Requests in flight: id -> (entry, session generation)
    pub next_request_id: u64,
    pub in_flight: HashMap<u64, (EntryId, u64)>,
    // Round-trip time of the record each session shows
    pub elapsed_ms: HashMap<EntryId, u64>,

    pub notice: Option<Notice>,
    pub show_help: bool,
}

impl AppState {
    pub fn new(catalog: Arc<Catalog>, composer: RequestComposer, default_headers: HeaderSet) -> Self {
        AppState {
            catalog,
            composer,
            default_headers,
            sessions: HashMap::new(),
            active_category: 0,
            selected_endpoint: 0,
            search: String::new(),
            active_panel: Panel::Endpoints,
            input_mode: InputMode::Normal,
            cursor_position: 0,
            selected_param: 0,
            response_scroll: 0,
            next_request_id: 1,
            in_flight: HashMap::new(),
            elapsed_ms: HashMap::new(),
            notice: None,
            show_help: false,
        }
    }

    /// Generate a unique request ID
    pub fn next_id(&mut self) -> u64 {
        let id = self.next_request_id;
        self.next_request_id += 1;
        id
    }

    /// Entries of the active category that pass the search filter
    pub fn visible_entries(&self) -> Vec<EntryId> {
        self.catalog.filter_category(self.active_category, &self.search)
    }

    pub fn selected_entry(&self) -> Option<EntryId> {
        self.visible_entries().get(self.selected_endpoint).copied()
    }

    /// Session for the selected entry, created on first use
    pub fn selected_session_mut(&mut self) -> Option<&mut EndpointSession> {
        let id = self.selected_entry()?;
        self.session_mut(id)
    }

    pub fn session_mut(&mut self, id: EntryId) -> Option<&mut EndpointSession> {
        let descriptor = Arc::clone(&self.catalog.entry(id)?.endpoint);
        let headers = &self.default_headers;
        Some(
            self.sessions
                .entry(id)
                .or_insert_with(|| EndpointSession::new(descriptor, headers.clone())),
        )
    }

    /// Get the current input field content
    pub fn current_input(&self) -> String {
        if self.input_mode == InputMode::Searching {
            return self.search.clone();
        }
        let Some(id) = self.selected_entry() else {
            return String::new();
        };
        let Some(session) = self.sessions.get(&id) else {
            return match self.active_panel {
                Panel::Authorization => self
                    .default_headers
                    .get("Authorization")
                    .unwrap_or_default()
                    .to_string(),
                Panel::Body => self
                    .catalog
                    .entry(id)
                    .and_then(|e| e.endpoint.body.clone())
                    .unwrap_or_default(),
                _ => String::new(),
            };
        };
        match self.active_panel {
            Panel::Parameters => session
                .descriptor()
                .parameters
                .get(self.selected_param)
                .and_then(|p| session.bindings.get(&p.name))
                .unwrap_or_default()
                .to_string(),
            Panel::Authorization => session
                .headers
                .get("Authorization")
                .unwrap_or_default()
                .to_string(),
            Panel::Body => session.body.clone(),
            _ => String::new(),
        }
    }

    /// Whether the active panel has a field to edit, without binding anything
    pub fn has_input_field(&self) -> bool {
        if self.input_mode == InputMode::Searching {
            return true;
        }
        let Some(entry) = self.selected_entry().and_then(|id| self.catalog.entry(id)) else {
            return false;
        };
        match self.active_panel {
            Panel::Parameters => self.selected_param < entry.endpoint.parameters.len(),
            Panel::Authorization => true,
            Panel::Body => entry.endpoint.method.has_body(),
            _ => false,
        }
    }

    /// Get mutable reference to current input field.
    ///
    /// For a parameter this binds it, so call it only when the text changes.
    /// An unbound path parameter keeps its `{name}` placeholder in the URL.
    pub fn current_input_mut(&mut self) -> Option<&mut String> {
        if self.input_mode == InputMode::Searching {
            return Some(&mut self.search);
        }
        let panel = self.active_panel;
        let selected_param = self.selected_param;
        let session = self.selected_session_mut()?;
        match panel {
            Panel::Parameters => {
                let name = session.descriptor().parameters.get(selected_param)?.name.clone();
                Some(session.bindings.entry_mut(&name))
            }
            Panel::Authorization => Some(session.headers.value_mut("Authorization")),
            Panel::Body if session.descriptor().method.has_body() => Some(&mut session.body),
            _ => None,
        }
    }

    fn endpoint_detail(&self, id: EntryId) -> Option<EndpointDetail> {
        let entry = self.catalog.entry(id)?;
        let fresh;
        let session = match self.sessions.get(&id) {
            Some(session) => session,
            None => {
                fresh = EndpointSession::new(Arc::clone(&entry.endpoint), self.default_headers.clone());
                &fresh
            }
        };
        let url = session.preview_url(&self.composer);

        Some(EndpointDetail {
            title: entry.title.clone(),
            description: entry.endpoint.description.clone(),
            method: entry.endpoint.method,
            path: entry.endpoint.path.clone(),
            parameters: entry
                .endpoint
                .parameters
                .iter()
                .map(|p| ParamRow {
                    name: p.name.clone(),
                    type_hint: p.type_hint.clone(),
                    required: p.required,
                    description: p.description.clone(),
                    value: session.bindings.get(&p.name).unwrap_or_default().to_string(),
                })
                .collect(),
            authorization: session.headers.get("Authorization").unwrap_or_default().to_string(),
            body: session.body.clone(),
            unresolved: unresolved_placeholders(&url),
            url,
            state: session.state(),
            status_code: session.last_record().and_then(|r| r.status_code),
            time_ms: session
                .last_record()
                .and_then(|_| self.elapsed_ms.get(&id).copied()),
            response: session.formatted_response(),
        })
    }

    /// Category names, with the match count of each while a search is active
    fn category_titles(&self) -> Vec<String> {
        let categories = self.catalog.categories();
        if self.search.trim().is_empty() {
            return categories.iter().map(|c| c.name.clone()).collect();
        }
        let matches = self.catalog.filter(&self.search);
        categories
            .iter()
            .enumerate()
            .map(|(i, c)| {
                let count = matches
                    .iter()
                    .find(|(category, _)| *category == i)
                    .map(|(_, entries)| entries.len())
                    .unwrap_or(0);
                format!("{} ({})", c.name, count)
            })
            .collect()
    }

    /// Convert state to RenderState for UI
    pub fn to_render_state(&self) -> RenderState {
        let categories = self.catalog.categories();
        let endpoints = self
            .visible_entries()
            .into_iter()
            .filter_map(|id| self.catalog.entry(id))
            .map(|entry| EndpointRow {
                title: entry.title.clone(),
                method: entry.endpoint.method,
                path: entry.endpoint.path.clone(),
            })
            .collect();

        RenderState {
            base_url: self.composer.base_url().to_string(),
            categories: self.category_titles(),
            category_description: categories
                .get(self.active_category)
                .map(|c| c.description.clone())
                .unwrap_or_default(),
            active_category: self.active_category,
            search: self.search.clone(),
            endpoints,
            selected_endpoint: self.selected_endpoint,
            detail: self.selected_entry().and_then(|id| self.endpoint_detail(id)),
            active_panel: self.active_panel,
            input_mode: self.input_mode,
            cursor_position: self.cursor_position,
            selected_param: self.selected_param,
            response_scroll: self.response_scroll,
            notice: self.notice.clone(),
            show_help: self.show_help,
        }
    }
}
