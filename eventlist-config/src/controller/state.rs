use serde_json::Value;

use super::normalize::prepare_for_save;
use crate::config::{Config, ConfigPath};
use crate::errors::{LoadError, SaveError};
use crate::storage::ConfigStore;
use crate::tab::{SelectedTab, index_of};
use crate::tracker::{is_changed, values_equal};

/// Where the editor is in its initial load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadPhase {
    /// Waiting for the persistence backend; edits are ignored.
    Loading,
    /// Settings are loaded and editable.
    Ready,
    /// Loading failed; carries the message shown instead of the editor.
    Failed(String),
}

/// Ticket for a save that has been handed to the persistence backend.
///
/// Carries the normalized copy taken when the save started, so the saved
/// snapshot reflects exactly what was written.
#[derive(Debug, Clone)]
pub struct PendingSave {
    sequence: u64,
    revision: u64,
    normalized: Config,
}

impl PendingSave {
    /// Normalized settings to persist.
    pub fn normalized(&self) -> &Config {
        &self.normalized
    }

    /// Monotonic save number within this editor session.
    pub fn sequence(&self) -> u64 {
        self.sequence
    }
}

/// Draft and saved settings for the editor, plus the selected tab.
///
/// The controller is the only writer of the draft and the saved snapshot.
/// The snapshot is never handed out mutably.
#[derive(Debug)]
pub struct ConfigController {
    phase: LoadPhase,
    draft: Config,
    saved: Config,
    changed: bool,
    revision: u64,
    next_save: u64,
    applied_save: u64,
    tab_id: Option<String>,
    error_text: Option<String>,
}

impl ConfigController {
    /// Create a controller waiting for its initial load.
    pub fn new() -> Self {
        Self {
            phase: LoadPhase::Loading,
            draft: Config::default(),
            saved: Config::default(),
            changed: false,
            revision: 0,
            next_save: 1,
            applied_save: 0,
            tab_id: None,
            error_text: None,
        }
    }

    /// Return the load phase.
    pub fn phase(&self) -> &LoadPhase {
        &self.phase
    }

    /// Return whether settings are loaded and editable.
    pub fn is_ready(&self) -> bool {
        self.phase == LoadPhase::Ready
    }

    /// Return editable settings draft.
    pub fn draft(&self) -> &Config {
        &self.draft
    }

    /// Return the last successfully persisted settings.
    pub fn saved(&self) -> &Config {
        &self.saved
    }

    /// Return whether the draft differs from the saved snapshot.
    pub fn is_changed(&self) -> bool {
        self.changed
    }

    /// Return the inline error text, if any.
    pub fn error_text(&self) -> Option<&str> {
        self.error_text.as_deref()
    }

    /// Show or clear the inline error text.
    pub fn set_error_text(&mut self, text: Option<String>) {
        self.error_text = text;
    }

    /// Replace draft and saved snapshot with freshly loaded settings and
    /// return to the default tab.
    pub fn load(&mut self, initial: Config) {
        log::debug!("config loaded with {} keys", initial.as_map().len());
        self.saved = initial.clone();
        self.draft = initial;
        self.phase = LoadPhase::Ready;
        self.tab_id = None;
        self.error_text = None;
        self.revision += 1;
        self.update_changed();
    }

    /// Record a failed initial load.
    pub fn fail_load(&mut self, error: &LoadError) {
        log::warn!("config load failed: {error}");
        self.phase = LoadPhase::Failed(error.to_string());
    }

    /// Store `value` at `path` in the draft and refresh the changed flag.
    ///
    /// Returns `false` when the edit was ignored because settings are not
    /// loaded.
    pub fn on_change(&mut self, path: &ConfigPath, value: Value) -> bool {
        self.on_change_with(path, value, |_| ())
    }

    /// Like [`ConfigController::on_change`], then call `callback` with the
    /// committed draft.
    pub fn on_change_with<F>(
        &mut self,
        path: &ConfigPath,
        value: Value,
        callback: F,
    ) -> bool
    where
        F: FnOnce(&Config),
    {
        if !self.is_ready() {
            log::warn!("ignoring edit of {path} before config is loaded");
            return false;
        }

        let unchanged = self
            .draft
            .get_path(path)
            .is_some_and(|current| values_equal(current, &value));
        if !unchanged {
            self.draft.set_path(path, value);
            self.revision += 1;
        }
        self.update_changed();
        callback(&self.draft);
        true
    }

    /// Replace the whole draft, as the PDF panel does after bulk edits.
    pub fn replace_draft(&mut self, config: Config) -> bool {
        if !self.is_ready() {
            log::warn!("ignoring draft replacement before config is loaded");
            return false;
        }

        self.draft = config;
        self.revision += 1;
        self.update_changed();
        true
    }

    /// Discard draft edits and restore the saved snapshot.
    pub fn reset(&mut self) {
        if !self.is_ready() {
            return;
        }

        self.draft = self.saved.clone();
        self.revision += 1;
        self.update_changed();
    }

    /// Return a normalized copy of the current draft.
    pub fn prepare_for_save(&self) -> Config {
        prepare_for_save(&self.draft)
    }

    /// Start a save: normalize the draft and hand out the ticket to
    /// persist. Returns `None` when settings are not loaded.
    pub fn begin_save(&mut self) -> Option<PendingSave> {
        if !self.is_ready() {
            log::warn!("ignoring save before config is loaded");
            return None;
        }

        let ticket = PendingSave {
            sequence: self.next_save,
            revision: self.revision,
            normalized: self.prepare_for_save(),
        };
        self.next_save += 1;
        log::debug!("save #{} started", ticket.sequence);
        Some(ticket)
    }

    /// Apply a save acknowledged by the persistence backend.
    ///
    /// The saved snapshot becomes the ticket's normalized copy. The draft
    /// adopts it only when no edit arrived while the save was in flight;
    /// otherwise the newer draft is kept and compared against the new
    /// snapshot.
    pub fn complete_save(&mut self, ticket: PendingSave) {
        if ticket.sequence <= self.applied_save {
            log::warn!(
                "ignoring stale acknowledgment for save #{}",
                ticket.sequence
            );
            return;
        }

        self.applied_save = ticket.sequence;
        if ticket.revision == self.revision {
            self.draft = ticket.normalized.clone();
        }
        self.saved = ticket.normalized;
        self.error_text = None;
        self.update_changed();
        log::debug!(
            "save #{} applied, changed={}",
            self.applied_save,
            self.changed
        );
    }

    /// Record a save rejected by the persistence backend. The draft and the
    /// changed flag are left as they are. Failures of saves older than the
    /// last applied one are ignored.
    pub fn fail_save(&mut self, ticket: &PendingSave, error: &SaveError) {
        if ticket.sequence <= self.applied_save {
            log::warn!(
                "ignoring stale failure for save #{}: {error}",
                ticket.sequence
            );
            return;
        }

        log::warn!("save #{} failed: {error}", ticket.sequence);
        self.error_text = Some(error.to_string());
    }

    /// Run a full save against `store`, completing or failing the ticket.
    pub fn save_with<S>(&mut self, store: &S) -> Result<(), SaveError>
    where
        S: ConfigStore + ?Sized,
    {
        let Some(ticket) = self.begin_save() else {
            return Err(SaveError::NotLoaded);
        };

        match store.save(ticket.normalized()) {
            Ok(()) => {
                self.complete_save(ticket);
                Ok(())
            },
            Err(err) => {
                self.fail_save(&ticket, &err);
                Err(err)
            },
        }
    }

    /// Return the externally visible tab identifier last seen.
    pub fn tab_id(&self) -> Option<&str> {
        self.tab_id.as_deref()
    }

    /// Mirror the navigation collaborator's current tab identifier.
    pub fn set_tab_id(&mut self, tab_id: Option<&str>) {
        self.tab_id = tab_id.map(String::from);
    }

    /// Return the selected tab, `None` for unknown identifiers.
    pub fn selected_tab(&self) -> Option<SelectedTab> {
        SelectedTab::resolve(self.tab_id())
    }

    /// Return the tab bar index to highlight.
    pub fn selected_index(&self) -> Option<usize> {
        index_of(self.tab_id())
    }

    fn update_changed(&mut self) {
        self.changed = is_changed(&self.draft, &self.saved);
    }
}

impl Default for ConfigController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use serde_json::json;

    use super::{ConfigController, LoadPhase};
    use crate::config::{Config, ConfigPath};
    use crate::errors::{LoadError, SaveError};
    use crate::storage::ConfigStore;
    use crate::tab::SelectedTab;

    fn config(value: serde_json::Value) -> Config {
        Config::from_value(value).expect("fixture should be an object")
    }

    fn path(dotted: &str) -> ConfigPath {
        ConfigPath::parse(dotted).expect("path should parse")
    }

    fn loaded(value: serde_json::Value) -> ConfigController {
        let mut controller = ConfigController::new();
        controller.load(config(value));
        controller
    }

    #[derive(Default)]
    struct RecordingStore {
        reject: Option<String>,
        written: RefCell<Vec<Config>>,
    }

    impl ConfigStore for RecordingStore {
        fn load(&self) -> Result<Config, LoadError> {
            Ok(Config::new())
        }

        fn save(&self, config: &Config) -> Result<(), SaveError> {
            if let Some(message) = &self.reject {
                return Err(SaveError::Rejected(message.clone()));
            }
            self.written.borrow_mut().push(config.clone());
            Ok(())
        }
    }

    #[test]
    fn given_new_controller_when_editing_before_load_then_edit_is_ignored() {
        let mut controller = ConfigController::new();

        let applied = controller.on_change(&path("options.flag"), json!(true));

        assert!(!applied);
        assert_eq!(controller.phase(), &LoadPhase::Loading);
        assert!(controller.draft().as_map().is_empty());
        assert!(controller.begin_save().is_none());
    }

    #[test]
    fn given_loaded_config_when_loaded_then_starts_unchanged_on_default_tab() {
        let controller = loaded(json!({ "a": 1 }));

        assert!(controller.is_ready());
        assert!(!controller.is_changed());
        assert_eq!(controller.draft(), controller.saved());
        assert_eq!(controller.selected_tab(), Some(SelectedTab::Options));
        assert_eq!(controller.selected_index(), Some(0));
    }

    #[test]
    fn given_edit_when_on_change_then_marks_changed_and_keeps_snapshot() {
        let mut controller =
            loaded(json!({ "options": { "someFlag": false } }));
        let saved_before = controller.saved().clone();

        controller.on_change(&path("options.someFlag"), json!(true));

        assert!(controller.is_changed());
        assert_eq!(controller.saved(), &saved_before);
        assert_eq!(
            controller.draft().get_path(&path("options.someFlag")),
            Some(&json!(true))
        );
    }

    #[test]
    fn given_same_value_when_on_change_then_stays_unchanged() {
        let mut controller = loaded(json!({ "limit": 10 }));

        controller.on_change(&path("limit"), json!(10));

        assert!(!controller.is_changed());
    }

    #[test]
    fn given_edit_reverted_when_on_change_then_changed_clears() {
        let mut controller = loaded(json!({ "limit": 10 }));

        controller.on_change(&path("limit"), json!(11));
        controller.on_change(&path("limit"), json!(10));

        assert!(!controller.is_changed());
    }

    #[test]
    fn given_callback_when_on_change_then_sees_committed_draft() {
        let mut controller = loaded(json!({}));
        let mut seen = None;

        controller.on_change_with(&path("a.b"), json!("x"), |draft| {
            seen = draft.get_path(&path("a.b")).cloned();
        });

        assert_eq!(seen, Some(json!("x")));
    }

    #[test]
    fn given_load_failure_when_recorded_then_phase_carries_message() {
        let mut controller = ConfigController::new();

        controller.fail_load(&LoadError::Unreachable(String::from("offline")));

        match controller.phase() {
            LoadPhase::Failed(message) => assert!(message.contains("offline")),
            other => panic!("expected failed phase, got {other:?}"),
        }
        assert!(!controller.on_change(&path("a"), json!(1)));
    }

    #[test]
    fn given_colored_draft_when_saved_then_draft_adopts_normalized_copy() {
        let mut controller = loaded(json!({ "pdfSettings": {} }));
        controller.on_change(
            &path("pdfSettings.headerColor"),
            json!({ "r": 255, "g": 0, "b": 0 }),
        );
        let store = RecordingStore::default();

        controller
            .save_with(&store)
            .expect("save should be accepted");

        assert!(!controller.is_changed());
        assert_eq!(
            controller.saved().get_path(&path("pdfSettings.headerColor")),
            Some(&json!("#ff0000"))
        );
        assert_eq!(controller.draft(), controller.saved());
        assert_eq!(
            store.written.borrow().as_slice(),
            [controller.saved().clone()]
        );
    }

    #[test]
    fn given_edit_during_save_when_acknowledged_then_stays_changed() {
        let mut controller = loaded(json!({ "a": 1 }));
        controller.on_change(&path("a"), json!(2));
        let ticket = controller
            .begin_save()
            .expect("save should start once loaded");

        controller.on_change(&path("b"), json!(true));
        controller.complete_save(ticket);

        assert_eq!(controller.saved().get("a"), Some(&json!(2)));
        assert!(controller.saved().get("b").is_none());
        assert_eq!(controller.draft().get("b"), Some(&json!(true)));
        assert!(controller.is_changed());
    }

    #[test]
    fn given_out_of_order_acks_when_completed_then_stale_one_is_ignored() {
        let mut controller = loaded(json!({ "a": 1 }));
        controller.on_change(&path("a"), json!(2));
        let first = controller.begin_save().expect("first save should start");
        controller.on_change(&path("a"), json!(3));
        let second =
            controller.begin_save().expect("second save should start");

        controller.complete_save(second);
        controller.complete_save(first);

        assert_eq!(controller.saved().get("a"), Some(&json!(3)));
        assert!(!controller.is_changed());
    }

    #[test]
    fn given_newer_save_applied_when_older_fails_then_error_is_not_shown() {
        let mut controller = loaded(json!({ "a": 1 }));
        controller.on_change(&path("a"), json!(2));
        let first = controller.begin_save().expect("first save should start");
        let second =
            controller.begin_save().expect("second save should start");

        controller.complete_save(second);
        controller
            .fail_save(&first, &SaveError::Rejected(String::from("late")));

        assert!(!controller.is_changed());
        assert_eq!(controller.error_text(), None);
        assert_eq!(controller.saved().get("a"), Some(&json!(2)));
    }

    #[test]
    fn given_unloaded_controller_when_saving_then_reports_not_loaded() {
        let store = RecordingStore::default();

        let mut loading = ConfigController::new();
        let result = loading.save_with(&store);
        assert!(matches!(result, Err(SaveError::NotLoaded)));

        let mut failed = ConfigController::new();
        failed.fail_load(&LoadError::Unreachable(String::from("offline")));
        let result = failed.save_with(&store);
        assert!(matches!(result, Err(SaveError::NotLoaded)));

        assert!(store.written.borrow().is_empty());
        assert!(loading.saved().as_map().is_empty());
    }

    #[test]
    fn given_save_in_flight_when_tab_switched_then_save_still_applies() {
        let mut controller = loaded(json!({ "a": 1 }));
        controller.on_change(&path("a"), json!(2));
        let ticket = controller
            .begin_save()
            .expect("save should start once loaded");

        controller.set_tab_id(Some("list"));
        controller.set_tab_id(Some("pdf"));
        controller.complete_save(ticket);

        assert_eq!(controller.saved().get("a"), Some(&json!(2)));
        assert!(!controller.is_changed());
        assert_eq!(controller.selected_tab(), Some(SelectedTab::Pdf));
    }

    #[test]
    fn given_save_in_flight_when_draft_replaced_then_stays_changed() {
        let mut controller = loaded(json!({ "a": 1 }));
        controller.on_change(&path("a"), json!(2));
        let ticket = controller
            .begin_save()
            .expect("save should start once loaded");

        controller.replace_draft(config(json!({ "a": 2, "c": "x" })));
        assert!(controller.is_changed());
        controller.complete_save(ticket);

        assert_eq!(controller.saved().get("c"), None);
        assert_eq!(controller.draft().get("c"), Some(&json!("x")));
        assert!(controller.is_changed());
    }

    #[test]
    fn given_rejected_save_when_saving_then_draft_and_flag_are_kept() {
        let mut controller = loaded(json!({ "a": 1 }));
        controller.on_change(&path("a"), json!(2));
        let draft_before = controller.draft().clone();
        let store = RecordingStore {
            reject: Some(String::from("read-only")),
            ..RecordingStore::default()
        };

        let result = controller.save_with(&store);

        assert!(matches!(result, Err(SaveError::Rejected(_))));
        assert_eq!(controller.draft(), &draft_before);
        assert!(controller.is_changed());
        assert_eq!(controller.saved().get("a"), Some(&json!(1)));
        assert!(
            controller
                .error_text()
                .is_some_and(|text| text.contains("read-only"))
        );
    }

    #[test]
    fn given_dirty_draft_when_reset_then_restores_snapshot() {
        let mut controller = loaded(json!({ "a": 1 }));
        controller.on_change(&path("a"), json!(5));

        controller.reset();

        assert_eq!(controller.draft(), controller.saved());
        assert!(!controller.is_changed());
    }

    #[test]
    fn given_unknown_tab_id_when_selected_then_no_tab_is_highlighted() {
        let mut controller = loaded(json!({}));

        controller.set_tab_id(Some("pdf"));
        assert_eq!(controller.selected_index(), Some(2));

        controller.set_tab_id(Some("nope"));
        assert_eq!(controller.selected_tab(), None);
        assert_eq!(controller.selected_index(), None);
    }
}
