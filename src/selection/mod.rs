//! Cross-page selection of records.
//!
//! Selection holds full record snapshots rather than bare ids: bulk actions
//! downstream need names, typed attributes, and aliases without re-fetching.
//! A selected record stays selected when the user pages away from it, and a
//! filter change never clears the selection; only an explicit `clear` (or a
//! completed bulk action) does.

use crate::model::ObjectRecord;

/// Ordered set of currently selected records
#[derive(Debug, Default, Clone)]
pub struct SelectionModel {
    selected: Vec<ObjectRecord>,
}

impl SelectionModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[ObjectRecord] {
        &self.selected
    }

    pub fn ids(&self) -> Vec<&str> {
        self.selected.iter().map(|r| r.id.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.selected.iter().any(|r| r.id == id)
    }

    /// Adds the record if unselected, removes it if selected
    pub fn toggle(&mut self, record: &ObjectRecord) {
        if let Some(position) = self.selected.iter().position(|r| r.id == record.id) {
            self.selected.remove(position);
        } else {
            self.selected.push(record.clone());
        }
    }

    /// Selects every record of the current page that is not already selected.
    /// Records selected on other pages are untouched.
    pub fn select_all_on_page(&mut self, page: &[ObjectRecord]) {
        for record in page {
            if !self.contains(&record.id) {
                self.selected.push(record.clone());
            }
        }
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    /// True when every record of the page is selected (and the page is non-empty)
    pub fn is_all_selected(&self, page: &[ObjectRecord]) -> bool {
        !page.is_empty() && page.iter().all(|r| self.contains(&r.id))
    }

    /// True when some but not all records of the page are selected
    pub fn is_indeterminate(&self, page: &[ObjectRecord]) -> bool {
        let selected_on_page = page.iter().filter(|r| self.contains(&r.id)).count();
        selected_on_page > 0 && selected_on_page < page.len()
    }
}
