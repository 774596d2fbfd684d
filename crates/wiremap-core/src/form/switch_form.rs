// ── Switch form controller ──
//
// Owns the single switch draft, its visibility and mode, and the
// submission handshake against the mutation seam. Only one switch can
// be edited at a time; opening over a live draft replaces it.

use tracing::debug;

use wiremap_api::types::{IpResolveMethod, Switch, SwitchPayload};

use crate::error::CoreError;
use crate::form::{FormMode, FormState};
use crate::mutation::SwitchMutations;

/// Draft of the switch currently being created or edited.
///
/// Display state only: the view renders and edits it, but the submitted
/// payload is assembled from the explicit [`SwitchSubmission`] the view
/// hands over. The position pair is the one exception -- it is carried
/// from the draft into an update so floor-plan placement survives an
/// edit round trip.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SwitchDraft {
    pub name: String,
    pub ip_resolve_method: IpResolveMethod,
    pub ip: String,
    pub mac: String,
    pub up_switch_name: String,
    pub up_link: String,
    pub snmp_community: String,
    pub revision: String,
    pub serial: String,
    pub build_short_name: Option<String>,
    pub floor_number: Option<i32>,
    pub retrieve_from_net_data: bool,
    pub retrieve_up_link_from_seens: bool,
    pub retrieve_tech_data_from_snmp: bool,
    pub position_top: Option<f64>,
    pub position_left: Option<f64>,
}

impl From<Switch> for SwitchDraft {
    fn from(sw: Switch) -> Self {
        Self {
            name: sw.name,
            ip_resolve_method: sw.ip_resolve_method,
            ip: sw.ip,
            mac: sw.mac,
            up_switch_name: sw.up_switch_name,
            up_link: sw.up_link,
            snmp_community: sw.snmp_community,
            revision: sw.revision,
            serial: sw.serial,
            build_short_name: sw.build_short_name,
            floor_number: sw.floor_number,
            retrieve_from_net_data: sw.retrieve_from_net_data,
            retrieve_up_link_from_seens: sw.retrieve_up_link_from_seens,
            retrieve_tech_data_from_snmp: sw.retrieve_tech_data_from_snmp,
            position_top: sw.position_top,
            position_left: sw.position_left,
        }
    }
}

/// The authoritative submission value, assembled by the view.
///
/// Every field the mutation needs is explicit here; nothing is read
/// back from the draft except the position pair on update.
#[derive(Debug, Clone, PartialEq)]
pub struct SwitchSubmission {
    pub name: String,
    pub ip_resolve_method: IpResolveMethod,
    pub ip: String,
    pub mac: String,
    pub up_switch_name: String,
    pub up_link: String,
    pub snmp_community: String,
    pub revision: String,
    pub serial: String,
    pub build_short_name: Option<String>,
    pub floor_number: Option<i32>,
    pub retrieve_from_net_data: bool,
    pub retrieve_up_link_from_seens: bool,
    pub retrieve_tech_data_from_snmp: bool,
}

impl SwitchSubmission {
    fn into_payload(self, position_top: Option<f64>, position_left: Option<f64>) -> SwitchPayload {
        SwitchPayload {
            name: self.name,
            ip_resolve_method: self.ip_resolve_method,
            ip: self.ip,
            mac: self.mac,
            up_switch_name: self.up_switch_name,
            up_link: self.up_link,
            snmp_community: self.snmp_community,
            revision: self.revision,
            serial: self.serial,
            build_short_name: self.build_short_name,
            floor_number: self.floor_number,
            retrieve_from_net_data: self.retrieve_from_net_data,
            retrieve_up_link_from_seens: self.retrieve_up_link_from_seens,
            retrieve_tech_data_from_snmp: self.retrieve_tech_data_from_snmp,
            position_top,
            position_left,
        }
    }
}

/// The mutation one submission resolved to.
#[derive(Debug, Clone, PartialEq)]
pub enum SwitchCall {
    Create(SwitchPayload),
    Update(SwitchPayload),
}

/// Lifecycle controller for the switch form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SwitchForm {
    state: FormState<SwitchDraft>,
    prior_name: String,
    in_flight: bool,
}

impl SwitchForm {
    pub fn new() -> Self {
        Self::default()
    }

    // ── State access ─────────────────────────────────────────────────

    pub fn is_open(&self) -> bool {
        self.state.is_open()
    }

    pub fn mode(&self) -> Option<FormMode> {
        self.state.mode()
    }

    pub fn draft(&self) -> &SwitchDraft {
        self.state.draft()
    }

    pub fn draft_mut(&mut self) -> &mut SwitchDraft {
        self.state.draft_mut()
    }

    /// The name the record had when the form opened (or whatever the
    /// view stored here). Kept for display; submission never consults
    /// it, and updates address the record by the submitted name.
    pub fn prior_name(&self) -> &str {
        &self.prior_name
    }

    pub fn set_prior_name(&mut self, name: impl Into<String>) {
        self.prior_name = name.into();
    }

    /// Whether a submission is awaiting its outcome.
    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    // ── Opening ──────────────────────────────────────────────────────

    /// Open in Add mode.
    ///
    /// New switches default to automatic discovery: DNS resolution and
    /// all three retrieval toggles on. The placement context pre-fills
    /// the building and floor so repeated additions on one floor stay
    /// quick; from an unscoped view both stay unset.
    pub fn open_add(&mut self, build: Option<&str>, floor: Option<i32>) {
        let draft = SwitchDraft {
            ip_resolve_method: IpResolveMethod::Dns,
            retrieve_from_net_data: true,
            retrieve_up_link_from_seens: true,
            retrieve_tech_data_from_snmp: true,
            build_short_name: build.map(str::to_owned),
            floor_number: floor,
            ..SwitchDraft::default()
        };
        self.state.open(FormMode::Add, draft);
    }

    /// Open in Edit mode over an existing record.
    ///
    /// Three fields are forcibly overridden after the copy: the IP
    /// resolve method drops to Direct and every retrieval toggle goes
    /// off, whatever the record held. Editing must not silently
    /// re-trigger discovery that could overwrite operator-entered
    /// values; opting back in is an explicit act in the form.
    pub fn open_edit(&mut self, existing: Switch) {
        let mut draft = SwitchDraft::from(existing);
        draft.ip_resolve_method = IpResolveMethod::Direct;
        draft.retrieve_from_net_data = false;
        draft.retrieve_up_link_from_seens = false;
        draft.retrieve_tech_data_from_snmp = false;
        self.state.open(FormMode::Edit, draft);
    }

    // ── Submission ───────────────────────────────────────────────────

    /// Resolve a submission into the mutation to issue and mark it in
    /// flight.
    ///
    /// Returns `Ok(None)` when the form is closed (there is nothing to
    /// submit) and [`CoreError::SubmissionPending`] while an earlier
    /// submission has not settled. In Edit mode the payload picks up
    /// the draft's position pair; in Add mode the pair stays absent.
    pub fn begin_submit(&mut self, fields: SwitchSubmission) -> Result<Option<SwitchCall>, CoreError> {
        if self.in_flight {
            return Err(CoreError::SubmissionPending);
        }

        let call = match self.state.mode() {
            Some(FormMode::Add) => SwitchCall::Create(fields.into_payload(None, None)),
            Some(FormMode::Edit) => {
                let draft = self.state.draft();
                SwitchCall::Update(fields.into_payload(draft.position_top, draft.position_left))
            }
            None => return Ok(None),
        };

        self.in_flight = true;
        Ok(Some(call))
    }

    /// Record the outcome of the in-flight submission.
    ///
    /// Success closes the form; failure leaves it open with the draft
    /// intact for correction and resubmission.
    pub fn finish_submit(&mut self, success: bool) {
        self.in_flight = false;
        if success {
            self.close();
        }
    }

    /// Submit against the mutation seam.
    ///
    /// Exactly one create or update per successful call, with the form
    /// closing afterwards. Failures propagate unchanged and the form
    /// stays open; there is no retry.
    pub async fn submit<M>(&mut self, api: &M, fields: SwitchSubmission) -> Result<(), CoreError>
    where
        M: SwitchMutations,
    {
        let Some(call) = self.begin_submit(fields)? else {
            return Ok(());
        };

        let result = match &call {
            SwitchCall::Create(payload) => api.create_switch(payload).await,
            SwitchCall::Update(payload) => api.update_switch(payload).await,
        };

        match result {
            Ok(()) => {
                self.finish_submit(true);
                Ok(())
            }
            Err(e) => {
                debug!("switch submission failed: {}", e);
                self.finish_submit(false);
                Err(e)
            }
        }
    }

    // ── Closing ──────────────────────────────────────────────────────

    /// Reset to the closed state: empty draft, no mode, hidden, prior
    /// name cleared. Idempotent. An in-flight mark survives the reset
    /// until its outcome lands, so closing mid-submission cannot open
    /// the door to a concurrent second mutation.
    pub fn close(&mut self) {
        self.state.close();
        self.prior_name.clear();
    }
}

// ── Tests ────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, Ordering};

    use super::*;

    /// Records every mutation it receives; fails the next call when
    /// `fail_next` is set.
    #[derive(Default)]
    struct RecordingApi {
        calls: Mutex<Vec<SwitchCall>>,
        fail_next: AtomicBool,
    }

    impl RecordingApi {
        fn record(&self, call: SwitchCall) -> Result<(), CoreError> {
            self.calls.lock().expect("calls lock").push(call);
            if self.fail_next.swap(false, Ordering::SeqCst) {
                return Err(CoreError::Api {
                    message: "rejected".into(),
                    status: Some(500),
                });
            }
            Ok(())
        }

        fn calls(&self) -> Vec<SwitchCall> {
            self.calls.lock().expect("calls lock").clone()
        }
    }

    impl SwitchMutations for RecordingApi {
        async fn create_switch(&self, payload: &SwitchPayload) -> Result<(), CoreError> {
            self.record(SwitchCall::Create(payload.clone()))
        }

        async fn update_switch(&self, payload: &SwitchPayload) -> Result<(), CoreError> {
            self.record(SwitchCall::Update(payload.clone()))
        }
    }

    fn sample_switch() -> Switch {
        Switch {
            name: "sw-b1-3-01".into(),
            ip_resolve_method: IpResolveMethod::Dns,
            ip: "10.20.3.1".into(),
            mac: "aa:bb:cc:dd:ee:01".into(),
            up_switch_name: "core-01".into(),
            up_link: "Gi1/0/48".into(),
            snmp_community: "public".into(),
            revision: "15.2(7)E3".into(),
            serial: "FOC2331X0GK".into(),
            build_short_name: Some("B1".into()),
            floor_number: Some(3),
            retrieve_from_net_data: true,
            retrieve_up_link_from_seens: true,
            retrieve_tech_data_from_snmp: true,
            position_top: Some(120.5),
            position_left: Some(340.25),
        }
    }

    fn submission(name: &str) -> SwitchSubmission {
        SwitchSubmission {
            name: name.into(),
            ip_resolve_method: IpResolveMethod::Direct,
            ip: "10.20.3.9".into(),
            mac: "aa:bb:cc:dd:ee:09".into(),
            up_switch_name: "core-01".into(),
            up_link: "Gi1/0/47".into(),
            snmp_community: "public".into(),
            revision: "15.2(7)E3".into(),
            serial: "FOC2331X0ZZ".into(),
            build_short_name: Some("B1".into()),
            floor_number: Some(3),
            retrieve_from_net_data: false,
            retrieve_up_link_from_seens: false,
            retrieve_tech_data_from_snmp: false,
        }
    }

    // ── Opening ──────────────────────────────────────────────────────

    #[test]
    fn add_open_seeds_discovery_defaults() {
        let mut form = SwitchForm::new();
        form.open_add(Some("B1"), Some(3));

        assert!(form.is_open());
        assert_eq!(form.mode(), Some(FormMode::Add));

        let draft = form.draft();
        assert_eq!(draft.ip_resolve_method, IpResolveMethod::Dns);
        assert!(draft.retrieve_from_net_data);
        assert!(draft.retrieve_up_link_from_seens);
        assert!(draft.retrieve_tech_data_from_snmp);
        assert_eq!(draft.build_short_name.as_deref(), Some("B1"));
        assert_eq!(draft.floor_number, Some(3));
        assert!(draft.name.is_empty());
    }

    #[test]
    fn add_open_without_context_leaves_placement_unset() {
        let mut form = SwitchForm::new();
        form.open_add(None, None);

        let draft = form.draft();
        assert_eq!(draft.build_short_name, None);
        assert_eq!(draft.floor_number, None);
    }

    #[test]
    fn edit_open_forces_direct_and_clears_retrieval_toggles() {
        let mut form = SwitchForm::new();
        form.open_edit(sample_switch());

        assert_eq!(form.mode(), Some(FormMode::Edit));

        let draft = form.draft();
        assert_eq!(draft.ip_resolve_method, IpResolveMethod::Direct);
        assert!(!draft.retrieve_from_net_data);
        assert!(!draft.retrieve_up_link_from_seens);
        assert!(!draft.retrieve_tech_data_from_snmp);

        // Everything else copies through untouched.
        assert_eq!(draft.name, "sw-b1-3-01");
        assert_eq!(draft.ip, "10.20.3.1");
        assert_eq!(draft.position_top, Some(120.5));
        assert_eq!(draft.position_left, Some(340.25));
    }

    #[test]
    fn reopening_replaces_the_previous_draft() {
        let mut form = SwitchForm::new();
        form.open_edit(sample_switch());
        form.open_add(None, None);

        assert_eq!(form.mode(), Some(FormMode::Add));
        assert!(form.draft().name.is_empty());
    }

    // ── Submission ───────────────────────────────────────────────────

    #[test]
    fn add_submission_creates_once_and_closes() {
        let api = RecordingApi::default();
        let mut form = SwitchForm::new();
        form.open_add(Some("B1"), Some(3));

        tokio_test::block_on(form.submit(&api, submission("sw-new"))).expect("create accepted");

        let calls = api.calls();
        assert_eq!(calls.len(), 1);
        match &calls[0] {
            SwitchCall::Create(payload) => {
                assert_eq!(payload.name, "sw-new");
                // Creation never carries a position.
                assert_eq!(payload.position_top, None);
                assert_eq!(payload.position_left, None);
            }
            other => panic!("expected a create, got: {other:?}"),
        }
        assert!(!form.is_open());
        assert!(!form.is_in_flight());
    }

    #[test]
    fn edit_submission_updates_once_and_carries_draft_position() {
        let api = RecordingApi::default();
        let mut form = SwitchForm::new();
        form.open_edit(sample_switch());

        tokio_test::block_on(form.submit(&api, submission("sw-renamed"))).expect("update accepted");

        let calls = api.calls();
        assert_eq!(calls.len(), 1);
        match &calls[0] {
            SwitchCall::Update(payload) => {
                assert_eq!(payload.name, "sw-renamed");
                assert_eq!(payload.position_top, Some(120.5));
                assert_eq!(payload.position_left, Some(340.25));
            }
            other => panic!("expected an update, got: {other:?}"),
        }
        assert!(!form.is_open());
    }

    #[test]
    fn submission_fields_win_over_draft_edits() {
        let api = RecordingApi::default();
        let mut form = SwitchForm::new();
        form.open_add(None, None);
        form.draft_mut().ip = "172.16.0.99".into();

        tokio_test::block_on(form.submit(&api, submission("sw-new"))).expect("create accepted");

        match &api.calls()[0] {
            SwitchCall::Create(payload) => assert_eq!(payload.ip, "10.20.3.9"),
            other => panic!("expected a create, got: {other:?}"),
        }
    }

    #[test]
    fn prior_name_is_never_consulted() {
        let api = RecordingApi::default();
        let mut form = SwitchForm::new();
        form.open_edit(sample_switch());
        form.set_prior_name("sw-b1-3-01");

        tokio_test::block_on(form.submit(&api, submission("sw-renamed"))).expect("update accepted");

        // The update addresses the submitted name, not the remembered one.
        match &api.calls()[0] {
            SwitchCall::Update(payload) => assert_eq!(payload.name, "sw-renamed"),
            other => panic!("expected an update, got: {other:?}"),
        }
    }

    #[test]
    fn closed_form_submission_is_a_no_op() {
        let api = RecordingApi::default();
        let mut form = SwitchForm::new();

        tokio_test::block_on(form.submit(&api, submission("sw-new"))).expect("no-op accepted");

        assert!(api.calls().is_empty());
        assert!(!form.is_in_flight());
    }

    #[test]
    fn rejection_propagates_and_leaves_the_form_open() {
        let api = RecordingApi::default();
        api.fail_next.store(true, Ordering::SeqCst);
        let mut form = SwitchForm::new();
        form.open_edit(sample_switch());

        let result = tokio_test::block_on(form.submit(&api, submission("sw-renamed")));

        assert!(matches!(result, Err(CoreError::Api { status: Some(500), .. })));
        assert_eq!(api.calls().len(), 1);
        assert!(form.is_open());
        assert_eq!(form.draft().name, "sw-b1-3-01");
        assert!(!form.is_in_flight());
    }

    // ── In-flight guard ──────────────────────────────────────────────

    #[test]
    fn second_submission_is_rejected_while_one_is_pending() {
        let mut form = SwitchForm::new();
        form.open_add(None, None);

        let first = form.begin_submit(submission("sw-new")).expect("first submit");
        assert!(matches!(first, Some(SwitchCall::Create(_))));
        assert!(form.is_in_flight());

        let second = form.begin_submit(submission("sw-new"));
        assert!(matches!(second, Err(CoreError::SubmissionPending)));
    }

    #[test]
    fn failed_outcome_allows_resubmission() {
        let mut form = SwitchForm::new();
        form.open_add(None, None);

        form.begin_submit(submission("sw-new")).expect("first submit");
        form.finish_submit(false);

        assert!(form.is_open());
        let again = form.begin_submit(submission("sw-new")).expect("resubmit");
        assert!(again.is_some());
    }

    #[test]
    fn close_does_not_clear_the_in_flight_mark() {
        let mut form = SwitchForm::new();
        form.open_add(None, None);
        form.begin_submit(submission("sw-new")).expect("first submit");

        form.close();
        assert!(!form.is_open());
        assert!(form.is_in_flight());
        assert!(matches!(
            form.begin_submit(submission("sw-new")),
            Err(CoreError::SubmissionPending)
        ));

        form.finish_submit(false);
        assert!(!form.is_in_flight());
    }

    // ── Closing ──────────────────────────────────────────────────────

    #[test]
    fn close_resets_to_the_pristine_state() {
        let mut form = SwitchForm::new();
        form.open_edit(sample_switch());
        form.set_prior_name("sw-b1-3-01");

        form.close();

        assert_eq!(form, SwitchForm::new());
        assert_eq!(form.prior_name(), "");
    }

    #[test]
    fn successful_submission_ends_in_the_closed_state() {
        let api = RecordingApi::default();
        let mut form = SwitchForm::new();
        form.open_add(Some("B1"), Some(3));
        form.set_prior_name("leftover");

        tokio_test::block_on(form.submit(&api, submission("sw-new"))).expect("create accepted");

        let mut fresh = SwitchForm::new();
        fresh.close();
        assert_eq!(form, fresh);
    }

    #[test]
    fn close_is_idempotent() {
        let mut form = SwitchForm::new();
        form.open_add(None, None);

        form.close();
        let once = form.clone();
        form.close();
        assert_eq!(form, once);
    }
}
