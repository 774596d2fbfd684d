//! Entity form lifecycle.
//!
//! One generic [`FormState`] owns the visibility flag, the mode, and
//! the draft of whichever entity a form edits; [`SwitchForm`] and
//! [`FloorForm`] instantiate it with their seeding and submission
//! rules. A draft exists only while its form is open and is discarded
//! on close, whether close follows a successful submission or a
//! cancellation.

mod floor_form;
mod switch_form;

pub use floor_form::{FloorDraft, FloorForm, FloorSubmission};
pub use switch_form::{SwitchCall, SwitchDraft, SwitchForm, SwitchSubmission};

/// Which action an open form is performing. Governs draft seeding on
/// open and payload assembly on submit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Add,
    Edit,
}

/// Visibility, mode, and draft of one entity form.
///
/// Closed is the single resting state: not visible, no mode, default
/// draft. Opening while already open overwrites the draft and mode;
/// the previous draft is discarded without warning.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormState<D> {
    visible: bool,
    mode: Option<FormMode>,
    draft: D,
}

impl<D: Default> FormState<D> {
    /// Open with the given mode and seeded draft.
    pub fn open(&mut self, mode: FormMode, draft: D) {
        self.draft = draft;
        self.mode = Some(mode);
        self.visible = true;
    }

    /// Reset to the closed state. Idempotent.
    pub fn close(&mut self) {
        self.draft = D::default();
        self.mode = None;
        self.visible = false;
    }

    pub fn is_open(&self) -> bool {
        self.visible
    }

    pub fn mode(&self) -> Option<FormMode> {
        self.mode
    }

    pub fn draft(&self) -> &D {
        &self.draft
    }

    /// Mutable draft access for field edits while the form is open.
    pub fn draft_mut(&mut self) -> &mut D {
        &mut self.draft
    }
}

// ── Tests ────────────────────────────────────────────────────────────
