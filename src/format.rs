//! Response formatting - pretty JSON when possible, raw text otherwise

use crate::models::ResponseRecord;

/// Pretty-prints JSON bodies with two-space indentation; anything else is returned unchanged
pub fn format_body(text: &str) -> String {
    match serde_json::from_str::<serde_json::Value>(text) {
        Ok(json) => serde_json::to_string_pretty(&json).unwrap_or_else(|_| text.to_string()),
        Err(_) => text.to_string(),
    }
}

pub fn status_line(code: u16, text: &str) -> String {
    format!("Status: {} {}", code, text)
}

/// Renders a record as the single text block shown to the user
pub fn format_record(record: &ResponseRecord) -> String {
    match record.status_code {
        Some(code) => format!(
            "{}\n\n{}",
            status_line(code, record.status_text.as_deref().unwrap_or("")),
            format_body(&record.body_text)
        ),
        None => format!("Error: {}", record.body_text),
    }
}
