//! LOV (list of values) editor: pick a list, add a value, delete checked rows.

use tracing::warn;

use crate::api::{ApiClient, LovName};
use crate::errors::AppError;
use crate::selection::Selection;
use crate::views::Notice;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LovRow {
    /// 1-based position shown as the row's serial number.
    pub id: usize,
    pub value: String,
}

#[derive(Default)]
pub struct LovEditor {
    name: Option<LovName>,
    input: String,
    rows: Vec<LovRow>,
    selection: Selection<usize>,
    error: Option<String>,
}

impl LovEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(&self) -> Option<LovName> {
        self.name
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn rows(&self) -> &[LovRow] {
        &self.rows
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn selection(&self) -> &Selection<usize> {
        &self.selection
    }

    pub fn selection_mut(&mut self) -> &mut Selection<usize> {
        &mut self.selection
    }

    /// Chooses a list and loads its values.
    pub async fn select_name(&mut self, api: &ApiClient, name: LovName) {
        self.name = Some(name);
        self.refresh(api).await;
    }

    pub async fn refresh(&mut self, api: &ApiClient) {
        let Some(name) = self.name else {
            return;
        };
        self.error = None;
        // Rows of the previous list must never be offered for deletion under this name.
        self.set_values(Vec::new());
        match api.get_lov(name).await {
            Ok(values) => self.set_values(values),
            Err(e) => {
                warn!("LOV fetch for '{}' failed: {e}", name.as_str());
                self.error = Some(match e {
                    AppError::Unauthenticated => e.user_message(),
                    _ => "Error fetching data".to_string(),
                });
            }
        }
    }

    /// Stores the typed value, upper-cased and stripped to letters, digits and spaces.
    pub fn set_input(&mut self, raw: &str) {
        self.input = sanitize_value(raw);
    }

    /// Clears the chosen list, the input and the table.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub async fn save(&mut self, api: &ApiClient) -> Notice {
        let (Some(name), false) = (self.name, self.input.is_empty()) else {
            return Notice::error("LOV Name and Value are required.");
        };

        match api.add_lov(name, &self.input).await {
            Ok(()) => {
                let value = std::mem::take(&mut self.input);
                let mut values: Vec<String> = self.rows.drain(..).map(|r| r.value).collect();
                values.push(value);
                self.set_values(values);
                Notice::info("Item saved successfully")
            }
            Err(e) => {
                warn!("LOV save failed: {e}");
                Notice::error(match e {
                    AppError::Unauthenticated | AppError::Fetch { .. } => e.user_message(),
                    _ => "Error saving.".to_string(),
                })
            }
        }
    }

    pub async fn delete(&mut self, api: &ApiClient) -> Notice {
        if !self.selection.selected_any() {
            return Notice::error("No items selected for deletion.");
        }

        let doomed: Vec<String> = self
            .rows
            .iter()
            .filter(|r| self.selection.selected().contains(&r.id))
            .map(|r| r.value.clone())
            .collect();
        if doomed.is_empty() {
            return Notice::error("Selected values do not exist.");
        }
        let Some(name) = self.name else {
            return Notice::error("LOV Name and Value are required.");
        };

        match api.delete_lov(name, &doomed).await {
            Ok(()) => {
                let remaining: Vec<String> = self
                    .rows
                    .iter()
                    .filter(|r| !self.selection.is_selected(&r.id))
                    .map(|r| r.value.clone())
                    .collect();
                self.set_values(remaining);
                self.selection.deselect_all();
                Notice::info("Items deleted successfully.")
            }
            Err(e) => {
                warn!("LOV delete failed: {e}");
                Notice::error("Error deleting items.")
            }
        }
    }

    fn set_values(&mut self, values: Vec<String>) {
        self.rows = values
            .into_iter()
            .enumerate()
            .map(|(i, value)| LovRow { id: i + 1, value })
            .collect();
        self.selection.bind(self.rows.iter().map(|r| r.id));
    }
}

fn sanitize_value(raw: &str) -> String {
    raw.to_uppercase()
        .chars()
        .filter(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c.is_whitespace())
        .collect()
}
