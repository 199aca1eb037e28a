//! Render state - data structure sent from App layer to UI for rendering

use crate::messages::ui_events::{InputMode, Panel};
use crate::models::HttpMethod;
use crate::session::ExecutionState;

/// One row of the endpoint list
#[derive(Debug, Clone)]
pub struct EndpointRow {
    pub title: String,
    pub method: HttpMethod,
    pub path: String,
}

/// A parameter with its current value
#[derive(Debug, Clone)]
pub struct ParamRow {
    pub name: String,
    pub type_hint: String,
    pub required: bool,
    pub description: Option<String>,
    pub value: String,
}

/// Everything shown for the selected endpoint
#[derive(Debug, Clone)]
pub struct EndpointDetail {
    pub title: String,
    pub description: String,
    pub method: HttpMethod,
    pub path: String,
    pub parameters: Vec<ParamRow>,
    pub authorization: String,
    pub body: String,
    /// Live `compose_url` preview
    pub url: String,
    /// Placeholders still unbound in `url`
    pub unresolved: Vec<String>,
    pub state: ExecutionState,
    pub status_code: Option<u16>,
    /// Round-trip time of the shown record
    pub time_ms: Option<u64>,
    pub response: Option<String>,
}

/// Last completion notice, shown in the status line
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub success: bool,
    pub message: String,
}

/// Complete state needed by the UI to render
#[derive(Debug, Clone, Default)]
pub struct RenderState {
    pub base_url: String,

    // Catalog navigation
    pub categories: Vec<String>,
    pub category_description: String,
    pub active_category: usize,
    pub search: String,
    pub endpoints: Vec<EndpointRow>,
    pub selected_endpoint: usize,

    // Selected endpoint
    pub detail: Option<EndpointDetail>,

    // UI state
    pub active_panel: Panel,
    pub input_mode: InputMode,
    pub cursor_position: usize,
    pub selected_param: usize,
    pub response_scroll: u16,

    pub notice: Option<Notice>,
    pub show_help: bool,
}
