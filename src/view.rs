//! Panel view model handed to the webview

use serde::Serialize;

use crate::controller::PanelState;
use crate::error::ErrorInfo;
use crate::schema::{seed_values, Entity, EntityKind, FieldSpec, FormValues};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PanelView {
    pub kind: EntityKind,
    pub title: &'static str,
    pub add_label: &'static str,
    pub fields: &'static [FieldSpec],
    /// Prefilled form values, empty unless seed mode is on
    pub prefill: FormValues,
    pub banner: Option<ErrorInfo>,
    pub rows: Vec<String>,
    pub empty_message: Option<String>,
}

impl PanelView {
    pub fn build<E: Entity>(state: &PanelState<E::Row>, seed_mode: bool) -> Self {
        let kind = E::KIND;
        let rows: Vec<String> = state.items.iter().map(E::display).collect();
        let empty_message = rows
            .is_empty()
            .then(|| format!("No {} yet.", kind.label()));
        Self {
            kind,
            title: kind.title(),
            add_label: kind.add_label(),
            fields: E::FIELDS,
            prefill: if seed_mode {
                seed_values(E::FIELDS)
            } else {
                FormValues::new()
            },
            banner: state.last_error.clone(),
            rows,
            empty_message,
        }
    }

    /// Plain-text rendering, one line per row
    pub fn render_text(&self) -> String {
        let mut lines = vec![format!("== {} ==", self.title)];
        if let Some(banner) = &self.banner {
            lines.push(format!("! {}", banner.message));
        }
        match &self.empty_message {
            Some(message) => lines.push(message.clone()),
            None => lines.extend(self.rows.iter().map(|row| format!("- {}", row))),
        }
        lines.join("\n") + "\n"
    }
}
