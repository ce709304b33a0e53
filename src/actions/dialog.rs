//! Explicit dialog controller.
//!
//! Action dialogs are driven through an imperative open/close surface with
//! state owned by the controller. While a bulk action is processing, the
//! dialog refuses dismissal (both overlay-click and escape map to `close`).

/// Lifecycle of one action dialog
#[derive(Debug, Clone, PartialEq)]
pub enum DialogState<T> {
    Closed,
    Open(T),
    Processing(T),
}

/// Owns a dialog's state and its payload (typically the selected records)
#[derive(Debug)]
pub struct DialogController<T> {
    state: DialogState<T>,
}

impl<T> Default for DialogController<T> {
    fn default() -> Self {
        Self {
            state: DialogState::Closed,
        }
    }
}

impl<T> DialogController<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &DialogState<T> {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        !matches!(self.state, DialogState::Closed)
    }

    pub fn is_processing(&self) -> bool {
        matches!(self.state, DialogState::Processing(_))
    }

    pub fn payload(&self) -> Option<&T> {
        match &self.state {
            DialogState::Closed => None,
            DialogState::Open(payload) | DialogState::Processing(payload) => Some(payload),
        }
    }

    /// Opens the dialog with a payload, replacing any previous state
    pub fn open(&mut self, payload: T) {
        self.state = DialogState::Open(payload);
    }

    /// Marks the dialog busy; dismissal is refused until `finish` or `close`
    /// after completion. No-op unless the dialog is open and idle.
    pub fn begin_processing(&mut self) {
        let state = std::mem::replace(&mut self.state, DialogState::Closed);
        self.state = match state {
            DialogState::Open(payload) => DialogState::Processing(payload),
            other => other,
        };
    }

    /// Returns the dialog from processing to idle
    pub fn finish_processing(&mut self) {
        let state = std::mem::replace(&mut self.state, DialogState::Closed);
        self.state = match state {
            DialogState::Processing(payload) => DialogState::Open(payload),
            other => other,
        };
    }

    /// Attempts to dismiss the dialog. Returns `false` (and leaves the state
    /// untouched) while processing.
    pub fn close(&mut self) -> bool {
        if self.is_processing() {
            return false;
        }
        self.state = DialogState::Closed;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dismissal_disabled_while_processing() {
        let mut dialog = DialogController::new();
        dialog.open(vec!["obj-1"]);
        dialog.begin_processing();

        assert!(!dialog.close());
        assert!(dialog.is_open());

        dialog.finish_processing();
        assert!(dialog.close());
        assert!(!dialog.is_open());
    }

    #[test]
    fn test_payload_available_in_both_open_states() {
        let mut dialog = DialogController::new();
        assert!(dialog.payload().is_none());

        dialog.open(7);
        assert_eq!(dialog.payload(), Some(&7));
        dialog.begin_processing();
        assert_eq!(dialog.payload(), Some(&7));
    }

    #[test]
    fn test_begin_processing_requires_open() {
        let mut dialog: DialogController<u8> = DialogController::new();
        dialog.begin_processing();
        assert!(!dialog.is_processing());
    }
}
