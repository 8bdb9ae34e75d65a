use serde_json::Value;

use crate::config::{Config, ConfigPath};
use crate::controller::{ConfigController, LoadPhase, prepare_for_save};
use crate::environment::Environment;
use crate::errors::{LoadError, SaveError};
use crate::storage::ConfigStore;
use crate::tab::{Navigator, SelectedTab};

/// Lifecycle hooks of a settings editor shell.
pub trait SettingsApp {
    /// Take over a freshly fetched settings object.
    fn on_load(&mut self, config: Config);

    /// Produce the copy of `draft` that is handed to persistence.
    fn on_prepare_save(&self, draft: &Config) -> Config;

    /// Describe what the view layer should show.
    fn render(&self) -> RenderPlan<'_>;
}

/// Rendering collaborator notified after every committed state change.
pub trait RenderSignal {
    fn request_render(&self);
}

impl<F> RenderSignal for F
where
    F: Fn(),
{
    fn request_render(&self) {
        self()
    }
}

/// Props handed to the event list panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListPanelProps {
    pub image_prefix: &'static str,
    pub is_web: bool,
    pub edit_enabled: bool,
    pub show_edit_button: bool,
}

impl ListPanelProps {
    fn for_environment(environment: &Environment) -> Self {
        Self {
            image_prefix: environment.image_prefix(),
            is_web: environment.is_web_mode,
            edit_enabled: !environment.is_tab_mode,
            show_edit_button: environment.is_tab_mode,
        }
    }
}

/// Panel rendered below the tab bar.
#[derive(Debug, Clone, PartialEq)]
pub enum Panel<'a> {
    Options { native: &'a Config, changed: bool },
    List(ListPanelProps),
    Pdf { native: &'a Config },
}

/// Full editor with tab bar and save buttons.
#[derive(Debug, Clone, PartialEq)]
pub struct TabsView<'a> {
    pub tabs: [SelectedTab; 3],
    pub selected_index: Option<usize>,
    /// `None` when the current tab identifier is unknown.
    pub panel: Option<Panel<'a>>,
    pub changed: bool,
    pub error_text: Option<&'a str>,
}

/// What the view layer should render for the current state.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderPlan<'a> {
    /// Initial load is outstanding.
    Loading,
    /// Initial load failed; nothing else is rendered.
    LoadFailed { message: &'a str },
    /// Tab mode: the event list alone, without tab bar or save buttons.
    EventListOnly {
        list: ListPanelProps,
        error_text: Option<&'a str>,
    },
    Tabs(TabsView<'a>),
}

/// Events emitted by the view panels and the host.
#[derive(Debug, Clone)]
pub enum SettingsEvent {
    Reload,
    Save,
    Reset,
    FieldChanged { path: ConfigPath, value: Value },
    DraftReplaced(Config),
    TabSelected(String),
    ErrorReported(String),
    ErrorDismissed,
}

/// Settings editor for the event list adapter.
///
/// Owns the controller and wires it to the persistence, navigation and
/// rendering collaborators.
pub struct EventListSettings<S, N, R> {
    controller: ConfigController,
    environment: Environment,
    store: S,
    navigator: N,
    render_signal: R,
}

impl<S, N, R> EventListSettings<S, N, R>
where
    S: ConfigStore,
    N: Navigator,
    R: RenderSignal,
{
    pub fn new(
        environment: Environment,
        store: S,
        navigator: N,
        render_signal: R,
    ) -> Self {
        Self {
            controller: ConfigController::new(),
            environment,
            store,
            navigator,
            render_signal,
        }
    }

    /// Return read-only access to the controller.
    pub fn controller(&self) -> &ConfigController {
        &self.controller
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    pub fn navigator(&self) -> &N {
        &self.navigator
    }

    /// Fetch settings from the store. A failure is recorded and blocks the
    /// editor.
    pub fn load(&mut self) -> Result<(), LoadError> {
        let result = self.store.load();
        match result {
            Ok(config) => {
                self.on_load(config);
                Ok(())
            },
            Err(err) => {
                self.controller.fail_load(&err);
                self.render_signal.request_render();
                Err(err)
            },
        }
    }

    /// Apply a field edit coming from a view panel.
    pub fn on_change(&mut self, path: &ConfigPath, value: Value) -> bool {
        self.on_change_with(path, value, |_| ())
    }

    /// Apply a field edit, then call `callback` with the committed draft.
    pub fn on_change_with<F>(
        &mut self,
        path: &ConfigPath,
        value: Value,
        callback: F,
    ) -> bool
    where
        F: FnOnce(&Config),
    {
        let applied = self.controller.on_change_with(path, value, callback);
        if applied {
            self.render_signal.request_render();
        }
        applied
    }

    /// Replace the whole draft.
    pub fn update_native(&mut self, config: Config) -> bool {
        let applied = self.controller.replace_draft(config);
        if applied {
            self.render_signal.request_render();
        }
        applied
    }

    /// Normalize and persist the draft.
    pub fn save(&mut self) -> Result<(), SaveError> {
        let result = self.controller.save_with(&self.store);
        self.render_signal.request_render();
        result
    }

    /// Discard unsaved edits.
    pub fn reset(&mut self) {
        self.controller.reset();
        self.render_signal.request_render();
    }

    /// Switch tabs through the navigation collaborator.
    pub fn navigate(&mut self, tab_id: &str) {
        self.navigator.navigate(tab_id);
        self.controller.set_tab_id(self.navigator.current_tab());
        self.render_signal.request_render();
    }

    /// Show an error reported by a view panel.
    pub fn report_error(&mut self, text: impl Into<String>) {
        let text = text.into();
        let text = Some(text).filter(|text| !text.is_empty());
        self.controller.set_error_text(text);
        self.render_signal.request_render();
    }

    pub fn clear_error(&mut self) {
        self.controller.set_error_text(None);
        self.render_signal.request_render();
    }

    /// Reduce a view or host event into state updates.
    pub fn handle(&mut self, event: SettingsEvent) {
        match event {
            SettingsEvent::Reload => {
                if let Err(err) = self.load() {
                    log::debug!("reload event failed: {err}");
                }
            },
            SettingsEvent::Save => {
                if let Err(err) = self.save() {
                    log::debug!("save event rejected: {err}");
                }
            },
            SettingsEvent::Reset => self.reset(),
            SettingsEvent::FieldChanged { path, value } => {
                self.on_change(&path, value);
            },
            SettingsEvent::DraftReplaced(config) => {
                self.update_native(config);
            },
            SettingsEvent::TabSelected(tab_id) => self.navigate(&tab_id),
            SettingsEvent::ErrorReported(text) => self.report_error(text),
            SettingsEvent::ErrorDismissed => self.clear_error(),
        }
    }
}

impl<S, N, R> SettingsApp for EventListSettings<S, N, R>
where
    S: ConfigStore,
    N: Navigator,
    R: RenderSignal,
{
    fn on_load(&mut self, config: Config) {
        self.controller.load(config);
        self.controller.set_tab_id(self.navigator.current_tab());
        self.render_signal.request_render();
    }

    fn on_prepare_save(&self, draft: &Config) -> Config {
        prepare_for_save(draft)
    }

    fn render(&self) -> RenderPlan<'_> {
        match self.controller.phase() {
            LoadPhase::Loading => return RenderPlan::Loading,
            LoadPhase::Failed(message) => {
                return RenderPlan::LoadFailed { message };
            },
            LoadPhase::Ready => {},
        }

        let list = ListPanelProps::for_environment(&self.environment);
        let error_text = self.controller.error_text();
        if self.environment.is_tab_mode {
            return RenderPlan::EventListOnly { list, error_text };
        }

        let native = self.controller.draft();
        let changed = self.controller.is_changed();
        let panel =
            self.controller.selected_tab().map(|tab| match tab {
                SelectedTab::Options => Panel::Options { native, changed },
                SelectedTab::List => Panel::List(list),
                SelectedTab::Pdf => Panel::Pdf { native },
            });

        RenderPlan::Tabs(TabsView {
            tabs: SelectedTab::ALL,
            selected_index: self.controller.selected_index(),
            panel,
            changed,
            error_text,
        })
    }
}
