// ── Floor form controller ──
//
// Floors are creation-only: no edit mode and no placement carry-over.
// The controller instantiates the same generic state as the switch
// form and follows the same in-flight discipline.

use tracing::debug;

use wiremap_api::types::FloorPayload;

use crate::error::CoreError;
use crate::form::{FormMode, FormState};
use crate::mutation::FloorMutations;

/// Draft of the floor being created. The number stays as entered text;
/// the view parses it when assembling the submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FloorDraft {
    pub number: String,
    pub build_name: String,
    pub build_addr: String,
}

/// The authoritative floor submission, assembled by the view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FloorSubmission {
    pub number: i32,
    pub build_name: String,
    pub build_addr: String,
}

impl FloorSubmission {
    fn into_payload(self) -> FloorPayload {
        FloorPayload {
            number: self.number,
            build_name: self.build_name,
            build_addr: self.build_addr,
        }
    }
}

/// Lifecycle controller for the floor creation form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FloorForm {
    state: FormState<FloorDraft>,
    in_flight: bool,
}

impl FloorForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.state.is_open()
    }

    pub fn draft(&self) -> &FloorDraft {
        self.state.draft()
    }

    pub fn draft_mut(&mut self) -> &mut FloorDraft {
        self.state.draft_mut()
    }

    /// Whether a submission is awaiting its outcome.
    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    /// Open the creation form with an empty draft.
    pub fn open(&mut self) {
        self.state.open(FormMode::Add, FloorDraft::default());
    }

    /// Resolve a submission into the payload to create and mark it in
    /// flight. `Ok(None)` when the form is closed; rejects while an
    /// earlier submission has not settled.
    pub fn begin_submit(&mut self, fields: FloorSubmission) -> Result<Option<FloorPayload>, CoreError> {
        if self.in_flight {
            return Err(CoreError::SubmissionPending);
        }
        if self.state.mode().is_none() {
            return Ok(None);
        }
        self.in_flight = true;
        Ok(Some(fields.into_payload()))
    }

    /// Record the outcome of the in-flight submission. Success closes
    /// the form; failure leaves it open with the draft intact.
    pub fn finish_submit(&mut self, success: bool) {
        self.in_flight = false;
        if success {
            self.close();
        }
    }

    /// Submit the floor creation: one mutation per successful call, the
    /// form closing afterwards. Failures propagate unchanged.
    pub async fn submit<M>(&mut self, api: &M, fields: FloorSubmission) -> Result<(), CoreError>
    where
        M: FloorMutations,
    {
        let Some(payload) = self.begin_submit(fields)? else {
            return Ok(());
        };

        match api.create_floor(&payload).await {
            Ok(()) => {
                self.finish_submit(true);
                Ok(())
            }
            Err(e) => {
                debug!("floor submission failed: {}", e);
                self.finish_submit(false);
                Err(e)
            }
        }
    }

    /// Reset to the closed state: empty draft, hidden. Idempotent. The
    /// in-flight mark survives until its outcome lands.
    pub fn close(&mut self) {
        self.state.close();
    }
}

// ── Tests ────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, Ordering};

    use super::*;

    #[derive(Default)]
    struct RecordingApi {
        calls: Mutex<Vec<FloorPayload>>,
        fail_next: AtomicBool,
    }

    impl FloorMutations for RecordingApi {
        async fn create_floor(&self, payload: &FloorPayload) -> Result<(), CoreError> {
            self.calls.lock().expect("calls lock").push(payload.clone());
            if self.fail_next.swap(false, Ordering::SeqCst) {
                return Err(CoreError::Api {
                    message: "rejected".into(),
                    status: Some(500),
                });
            }
            Ok(())
        }
    }

    fn submission() -> FloorSubmission {
        FloorSubmission {
            number: 3,
            build_name: "Building One".into(),
            build_addr: "1 Example Way".into(),
        }
    }

    #[test]
    fn open_seeds_an_empty_draft() {
        let mut form = FloorForm::new();
        form.open();

        assert!(form.is_open());
        assert_eq!(form.draft(), &FloorDraft::default());
    }

    #[test]
    fn submission_creates_once_and_closes() {
        let api = RecordingApi::default();
        let mut form = FloorForm::new();
        form.open();
        form.draft_mut().number = "3".into();

        tokio_test::block_on(form.submit(&api, submission())).expect("create accepted");

        let calls = api.calls.lock().expect("calls lock");
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].number, 3);
        assert_eq!(calls[0].build_name, "Building One");
        assert!(!form.is_open());
        assert_eq!(form.draft(), &FloorDraft::default());
    }

    #[test]
    fn closed_form_submission_is_a_no_op() {
        let api = RecordingApi::default();
        let mut form = FloorForm::new();

        tokio_test::block_on(form.submit(&api, submission())).expect("no-op accepted");

        assert!(api.calls.lock().expect("calls lock").is_empty());
    }

    #[test]
    fn rejection_propagates_and_leaves_the_form_open() {
        let api = RecordingApi::default();
        api.fail_next.store(true, Ordering::SeqCst);
        let mut form = FloorForm::new();
        form.open();
        form.draft_mut().build_name = "Building One".into();

        let result = tokio_test::block_on(form.submit(&api, submission()));

        assert!(matches!(result, Err(CoreError::Api { .. })));
        assert!(form.is_open());
        assert_eq!(form.draft().build_name, "Building One");
        assert!(!form.is_in_flight());
    }

    #[test]
    fn second_submission_is_rejected_while_one_is_pending() {
        let mut form = FloorForm::new();
        form.open();

        form.begin_submit(submission()).expect("first submit");
        assert!(matches!(
            form.begin_submit(submission()),
            Err(CoreError::SubmissionPending)
        ));

        form.finish_submit(false);
        assert!(form.begin_submit(submission()).expect("resubmit").is_some());
    }
}
