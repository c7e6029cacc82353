use crate::models::{ExerciseCatalogItem, SelectionEntry, SelectionView};
use tracing::warn;

/// Exercises in pick order, at most one entry per id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionStore {
    entries: Vec<SelectionEntry>,
}

impl SelectionStore {
    pub fn load(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return Self::default();
        };

        let value: serde_json::Value = match serde_json::from_str(raw) {
            Ok(value) => value,
            Err(err) => {
                warn!("ignoring unreadable stored selection: {err}");
                return Self::default();
            }
        };

        if !value.is_array() {
            warn!("ignoring stored selection that is not a list");
            return Self::default();
        }

        match serde_json::from_value::<Vec<SelectionEntry>>(value) {
            Ok(entries) => {
                let mut store = Self::default();
                for entry in entries {
                    if !store.contains(&entry.id) {
                        store.entries.push(entry);
                    }
                }
                store
            }
            Err(err) => {
                warn!("ignoring malformed stored selection: {err}");
                Self::default()
            }
        }
    }

    pub fn toggle(&mut self, item: &ExerciseCatalogItem) -> bool {
        if let Some(index) = self.position(&item.id) {
            self.entries.remove(index);
            false
        } else {
            self.entries.push(SelectionEntry::from(item));
            true
        }
    }

    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.id != id);
        self.entries.len() != before
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn serialize(&self) -> String {
        serde_json::to_string(&self.entries).unwrap_or_else(|_| "[]".to_string())
    }

    pub fn entries(&self) -> &[SelectionEntry] {
        &self.entries
    }

    pub fn ids(&self) -> Vec<String> {
        self.entries.iter().map(|entry| entry.id.clone()).collect()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.position(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn view(&self) -> SelectionView {
        SelectionView {
            count: self.entries.len(),
            entries: self.entries.clone(),
        }
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.entries.iter().position(|entry| entry.id == id)
    }
}
