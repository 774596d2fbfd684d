//! Application orchestrator.
//!
//! Owns the event loop, the screen set, and every piece of cross-screen
//! state: the route table and access guard, the form controllers and
//! their overlays, the confirmation dialog, search, and toasts. Screens
//! never talk to the service or to each other; everything flows through
//! [`Action`]s dispatched here.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph, Tabs};
use secrecy::SecretString;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use wiremap_core::{
    AccessGuard, Build, CoreError, FloorForm, FloorMutations, FloorPayload, Inventory,
    LANDING_PATH, LOGIN_PATH, RouteDecision, RouteTable, SessionQuery, SessionState, SwitchCall,
    SwitchForm, SwitchMutations, SwitchScope,
};

use crate::action::{Action, ConfirmAction, Notification, NotificationLevel};
use crate::component::Component;
use crate::event::{Event, EventReader};
use crate::overlay::{FloorOverlay, SwitchOverlay};
use crate::screen::ScreenId;
use crate::screens::create_screens;
use crate::theme;
use crate::tui::Tui;

/// Where one navigation attempt landed after redirects and the guard.
enum NavOutcome {
    /// Follow a declared redirect or a guard bounce to another path.
    Hop(String),
    /// Show the login screen, remembering where the visitor wanted to go.
    Login { redirect: String },
    /// Mount the screen for the named route.
    Commit {
        name: &'static str,
        params: Vec<(String, String)>,
        path: String,
    },
}

pub struct App {
    active_screen: ScreenId,
    screens: HashMap<ScreenId, Box<dyn Component>>,
    running: bool,
    help_visible: bool,
    search_active: bool,
    search_query: String,
    /// Action sender -- components and tasks dispatch through this.
    action_tx: mpsc::UnboundedSender<Action>,
    /// Action receiver -- main loop drains this.
    action_rx: mpsc::UnboundedReceiver<Action>,
    inventory: Arc<Inventory>,
    session: Arc<SessionState>,
    routes: RouteTable,
    guard: AccessGuard<Arc<SessionState>>,
    /// Path of the mounted screen, params included.
    current_path: String,
    /// Where to go once login succeeds.
    pending_redirect: Option<String>,
    switch_form: SwitchForm,
    floor_form: FloorForm,
    switch_overlay: Option<SwitchOverlay>,
    floor_overlay: Option<FloorOverlay>,
    /// Most recent building list, for resolving path params to records.
    builds_cache: Arc<Vec<Build>>,
    /// Startup credentials, submitted once the loop is running.
    credentials: Option<(String, SecretString)>,
    /// Pending confirmation dialog (blocks other input while active).
    pending_confirm: Option<ConfirmAction>,
    /// Active notification toast with display timestamp.
    notification: Option<(Notification, Instant)>,
}

impl App {
    pub fn new(
        inventory: Inventory,
        credentials: Option<(String, SecretString)>,
        login_hint: Option<String>,
    ) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();

        let screens: HashMap<ScreenId, Box<dyn Component>> =
            create_screens(login_hint).into_iter().collect();

        let session = inventory.session();

        Self {
            active_screen: ScreenId::Login,
            screens,
            running: true,
            help_visible: false,
            search_active: false,
            search_query: String::new(),
            action_tx,
            action_rx,
            inventory: Arc::new(inventory),
            guard: AccessGuard::new(Arc::clone(&session)),
            session,
            routes: RouteTable::console(),
            current_path: LOGIN_PATH.to_owned(),
            pending_redirect: None,
            switch_form: SwitchForm::new(),
            floor_form: FloorForm::new(),
            switch_overlay: None,
            floor_overlay: None,
            builds_cache: Arc::new(Vec::new()),
            credentials,
            pending_confirm: None,
            notification: None,
        }
    }

    /// Initialize all screen components with the action sender.
    fn init_screens(&mut self) -> Result<()> {
        for screen in self.screens.values_mut() {
            screen.init(self.action_tx.clone())?;
        }
        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            screen.set_focused(true);
        }
        Ok(())
    }

    /// Run the main event loop.
    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::new()?;
        tui.enter()?;
        self.init_screens()?;

        // Entry navigation: the guard decides whether the root redirect
        // lands on the console or on the login screen.
        self.navigate("/")?;

        if let Some((username, password)) = self.credentials.take() {
            self.action_tx
                .send(Action::SubmitLogin { username, password })?;
        }

        let mut events = EventReader::new(
            Duration::from_millis(250), // 4 Hz tick
            Duration::from_millis(33),  // ~30 FPS render
        );

        info!("console event loop started");

        while self.running {
            let Some(event) = events.next().await else {
                break;
            };

            match event {
                Event::Key(key) => {
                    if let Some(action) = self.handle_key_event(key)? {
                        self.action_tx.send(action)?;
                    }
                }
                Event::Mouse(mouse) => {
                    if let Some(action) = self.handle_mouse_event(mouse)? {
                        self.action_tx.send(action)?;
                    }
                }
                Event::Resize(w, h) => {
                    self.action_tx.send(Action::Resize(w, h))?;
                }
                Event::Tick => {
                    self.action_tx.send(Action::Tick)?;
                }
                Event::Render => {
                    self.action_tx.send(Action::Render)?;
                }
            }

            // Drain and process all queued actions
            while let Ok(action) = self.action_rx.try_recv() {
                self.process_action(&action)?;

                if let Action::Render = action {
                    tui.draw(|frame| self.render(frame))?;
                }
            }
        }

        events.stop();
        info!("console event loop ended");
        Ok(())
    }

    // ── Navigation ───────────────────────────────────────────────────

    /// Resolve a path, follow redirects, run the guard, and mount the
    /// resulting screen.
    fn navigate(&mut self, path: &str) -> Result<()> {
        let mut target = path.to_owned();

        // A redirect may land on another redirect; bound the chain so a
        // bad table cannot spin the loop.
        for _ in 0..8 {
            let outcome = {
                let Some(resolved) = self.routes.resolve(&target) else {
                    warn!("no route matches {target}");
                    self.action_tx.send(Action::Notify(Notification::warning(
                        format!("No route for {target}"),
                    )))?;
                    return Ok(());
                };

                if let Some(redirect) = resolved.route.redirect {
                    NavOutcome::Hop(redirect.to_owned())
                } else {
                    match self.guard.check(&resolved) {
                        RouteDecision::Allow => NavOutcome::Commit {
                            name: resolved.route.name,
                            params: resolved.params.clone(),
                            path: resolved.full_path.clone(),
                        },
                        RouteDecision::RedirectToLogin { redirect } => {
                            NavOutcome::Login { redirect }
                        }
                        RouteDecision::RedirectToLanding => {
                            NavOutcome::Hop(LANDING_PATH.to_owned())
                        }
                    }
                }
            };

            match outcome {
                NavOutcome::Hop(next) => target = next,
                NavOutcome::Login { redirect } => {
                    self.pending_redirect = Some(redirect);
                    self.commit(ScreenId::Login, LOGIN_PATH.to_owned());
                    return Ok(());
                }
                NavOutcome::Commit { name, params, path } => {
                    return self.commit_route(name, &params, path);
                }
            }
        }

        warn!("redirect chain from {path} exceeded the hop limit");
        Ok(())
    }

    /// Mount the screen behind an admitted route and kick off the data
    /// loads it needs.
    fn commit_route(
        &mut self,
        name: &str,
        params: &[(String, String)],
        full_path: String,
    ) -> Result<()> {
        match name {
            "login" => {
                self.commit(ScreenId::Login, full_path);
            }
            "home" => {
                self.commit(ScreenId::Builds, full_path);
                self.fetch_builds();
            }
            "build" => {
                let build = param(params, "build").unwrap_or_default().to_owned();
                self.commit(ScreenId::Floors, full_path);

                let record = self
                    .builds_cache
                    .iter()
                    .find(|b| b.short_name == build)
                    .cloned();
                self.action_tx.send(Action::ViewBuild {
                    short_name: build.clone(),
                    build: record.map(Box::new),
                })?;
                self.fetch_floors(build);
                if self.builds_cache.is_empty() {
                    self.fetch_builds();
                }
            }
            "floor" => {
                let build = param(params, "build").unwrap_or_default().to_owned();
                let Some(number) = param(params, "floor").and_then(|v| v.parse::<i32>().ok())
                else {
                    warn!("floor segment is not a number in {full_path}");
                    self.action_tx.send(Action::Notify(Notification::warning(
                        "Floor in the path is not a number",
                    )))?;
                    return Ok(());
                };
                self.commit(ScreenId::FloorPlan, full_path);

                self.action_tx.send(Action::ViewFloor {
                    build: build.clone(),
                    number,
                })?;
                self.fetch_plan(build, number);
            }
            "switches" => {
                self.commit(ScreenId::Switches, full_path);
                self.fetch_switches();
            }
            "visualization" => {
                self.commit(ScreenId::Topology, full_path);
                self.fetch_switches();
            }
            other => {
                warn!("route {other} has no screen");
            }
        }
        Ok(())
    }

    /// Swap screen focus and record the mounted path.
    fn commit(&mut self, screen: ScreenId, path: String) {
        if screen != self.active_screen {
            debug!("navigating: {} \u{2192} {}", self.active_screen, screen);
            if let Some(old) = self.screens.get_mut(&self.active_screen) {
                old.set_focused(false);
            }
            self.active_screen = screen;
            if let Some(new) = self.screens.get_mut(&screen) {
                new.set_focused(true);
            }
        }
        self.current_path = path;
    }

    // ── Data loads ───────────────────────────────────────────────────

    fn fetch_builds(&self) {
        let inventory = Arc::clone(&self.inventory);
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            match inventory.builds().await {
                Ok(builds) => {
                    let _ = tx.send(Action::BuildsLoaded(Arc::new(builds)));
                }
                Err(e) => notify_task_error(&tx, "Loading buildings failed", &e),
            }
        });
    }

    fn fetch_floors(&self, build: String) {
        let inventory = Arc::clone(&self.inventory);
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            match inventory.floors_of(&build).await {
                Ok(floors) => {
                    let _ = tx.send(Action::FloorsLoaded {
                        build,
                        floors: Arc::new(floors),
                    });
                }
                Err(e) => notify_task_error(&tx, "Loading floors failed", &e),
            }
        });
    }

    fn fetch_plan(&self, build: String, number: i32) {
        let inventory = Arc::clone(&self.inventory);
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            let scope = SwitchScope::Floor {
                build: build.clone(),
                floor: number,
            };
            match inventory.switches(&scope).await {
                Ok(switches) => {
                    let _ = tx.send(Action::PlanLoaded {
                        build,
                        number,
                        switches: Arc::new(switches),
                    });
                }
                Err(e) => notify_task_error(&tx, "Loading the floor plan failed", &e),
            }
        });
    }

    fn fetch_switches(&self) {
        let inventory = Arc::clone(&self.inventory);
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            match inventory.switches(&SwitchScope::All).await {
                Ok(switches) => {
                    let _ = tx.send(Action::SwitchesLoaded(Arc::new(switches)));
                }
                Err(e) => notify_task_error(&tx, "Loading switches failed", &e),
            }
        });
    }

    // ── Service calls ────────────────────────────────────────────────

    fn spawn_login(&self, username: String, password: SecretString) {
        let inventory = Arc::clone(&self.inventory);
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            match inventory.login(&username, &password).await {
                Ok(()) => {
                    let _ = tx.send(Action::LoginFinished(Ok(())));
                }
                Err(e) => {
                    warn!(error = %e, "login failed");
                    let _ = tx.send(Action::LoginFinished(Err(e.to_string())));
                }
            }
        });
    }

    // Switch saves finish silently; only floor creation toasts.
    fn spawn_switch_call(&self, call: SwitchCall) {
        let inventory = Arc::clone(&self.inventory);
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            let result = match &call {
                SwitchCall::Create(payload) => inventory.create_switch(payload).await,
                SwitchCall::Update(payload) => inventory.update_switch(payload).await,
            };
            match result {
                Ok(()) => {
                    let _ = tx.send(Action::SwitchSaved(Ok(())));
                }
                Err(e) => {
                    notify_task_error(&tx, "Saving the switch failed", &e);
                    let _ = tx.send(Action::SwitchSaved(Err(e.to_string())));
                }
            }
        });
    }

    fn spawn_floor_create(&self, payload: FloorPayload) {
        let inventory = Arc::clone(&self.inventory);
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            match inventory.create_floor(&payload).await {
                Ok(()) => {
                    let _ = tx.send(Action::Notify(Notification::success(format!(
                        "{} floor in {}",
                        payload.number, payload.build_name
                    ))));
                    let _ = tx.send(Action::FloorSaved(Ok(())));
                }
                Err(e) => {
                    notify_task_error(&tx, "Saving the floor failed", &e);
                    let _ = tx.send(Action::FloorSaved(Err(e.to_string())));
                }
            }
        });
    }

    /// Map a confirmed action to its service call and spawn it.
    fn execute_confirm(&self, confirm: ConfirmAction) {
        let inventory = Arc::clone(&self.inventory);
        let tx = self.action_tx.clone();
        match confirm {
            ConfirmAction::DeleteSwitch { name } => {
                tokio::spawn(async move {
                    match inventory.delete_switch(&name).await {
                        Ok(()) => {
                            let _ = tx.send(Action::Refresh);
                        }
                        Err(e) => notify_task_error(&tx, "Delete failed", &e),
                    }
                });
            }
            ConfirmAction::DeleteFloor { build, number } => {
                tokio::spawn(async move {
                    match inventory.delete_floor(&build, number).await {
                        Ok(()) => {
                            let _ = tx.send(Action::Refresh);
                        }
                        Err(e) => notify_task_error(&tx, "Delete failed", &e),
                    }
                });
            }
            ConfirmAction::Logout => {
                tokio::spawn(async move {
                    // The local session flag clears either way; a failed
                    // call only means the server cookie outlives us.
                    if let Err(e) = inventory.logout().await {
                        warn!(error = %e, "logout call failed");
                    }
                    let _ = tx.send(Action::LogoutFinished);
                });
            }
        }
    }

    // ── Input ────────────────────────────────────────────────────────

    /// Map a key event to an action. Global keys are handled here;
    /// screen-specific keys are delegated to the active screen.
    #[allow(clippy::too_many_lines)]
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        // Login captures all keys except Ctrl+C
        if self.active_screen == ScreenId::Login {
            if key.modifiers == KeyModifiers::CONTROL && key.code == KeyCode::Char('c') {
                return Ok(Some(Action::Quit));
            }
            if let Some(screen) = self.screens.get_mut(&ScreenId::Login) {
                return screen.handle_key_event(key);
            }
            return Ok(None);
        }

        // Confirmation dialog captures all input
        if self.pending_confirm.is_some() {
            return match key.code {
                KeyCode::Char('y' | 'Y') => Ok(Some(Action::ConfirmYes)),
                KeyCode::Char('n' | 'N') | KeyCode::Esc => Ok(Some(Action::ConfirmNo)),
                _ => Ok(None),
            };
        }

        // Form overlays capture all input
        if self.switch_overlay.is_some() {
            return self.handle_switch_overlay_key(key);
        }
        if self.floor_overlay.is_some() {
            return self.handle_floor_overlay_key(key);
        }

        // Search input mode
        if self.search_active {
            return match key.code {
                KeyCode::Esc => Ok(Some(Action::CloseSearch)),
                KeyCode::Enter => Ok(Some(Action::SearchSubmit)),
                KeyCode::Backspace => {
                    self.search_query.pop();
                    Ok(Some(Action::SearchInput(self.search_query.clone())))
                }
                KeyCode::Char(c) => {
                    self.search_query.push(c);
                    Ok(Some(Action::SearchInput(self.search_query.clone())))
                }
                _ => Ok(None),
            };
        }

        // In help mode, Esc or ? closes help
        if self.help_visible {
            return match key.code {
                KeyCode::Esc | KeyCode::Char('?') => Ok(Some(Action::ToggleHelp)),
                _ => Ok(None),
            };
        }

        match (key.modifiers, key.code) {
            (KeyModifiers::CONTROL, KeyCode::Char('c'))
            | (KeyModifiers::NONE, KeyCode::Char('q')) => {
                return Ok(Some(Action::Quit));
            }

            (_, KeyCode::Char('?')) => return Ok(Some(Action::ToggleHelp)),

            (KeyModifiers::NONE, KeyCode::Char('/')) => return Ok(Some(Action::OpenSearch)),

            (KeyModifiers::NONE, KeyCode::Char('o')) => return Ok(Some(Action::RequestLogout)),

            // Number keys jump straight to a tab
            (KeyModifiers::NONE, KeyCode::Char(c)) if c.is_ascii_digit() => {
                if let Some(tab) = c
                    .to_digit(10)
                    .and_then(|n| u8::try_from(n).ok())
                    .and_then(ScreenId::from_number)
                {
                    return Ok(Some(Action::Navigate(tab.tab_path().to_owned())));
                }
            }

            // Tab / Shift+Tab for tab cycling
            (KeyModifiers::NONE, KeyCode::Tab) => {
                return Ok(Some(Action::Navigate(
                    self.active_screen.next().tab_path().to_owned(),
                )));
            }
            (KeyModifiers::SHIFT, KeyCode::BackTab) => {
                return Ok(Some(Action::Navigate(
                    self.active_screen.prev().tab_path().to_owned(),
                )));
            }

            // Esc -- walk up one path segment
            (KeyModifiers::NONE, KeyCode::Esc) => return Ok(Some(Action::GoBack)),

            _ => {}
        }

        // Delegate to active screen component
        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            return screen.handle_key_event(key);
        }

        Ok(None)
    }

    fn handle_switch_overlay_key(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if key.code != KeyCode::Enter {
            if let Some(overlay) = self.switch_overlay.as_mut() {
                overlay.error = None;
            }
        }

        match key.code {
            KeyCode::Esc => {
                self.switch_overlay = None;
                self.switch_form.close();
                return Ok(None);
            }
            KeyCode::Enter => {
                let submission = match self.switch_overlay.as_ref().map(SwitchOverlay::build_submission)
                {
                    Some(Ok(submission)) => submission,
                    Some(Err(message)) => {
                        if let Some(overlay) = self.switch_overlay.as_mut() {
                            overlay.error = Some(message);
                        }
                        return Ok(None);
                    }
                    None => return Ok(None),
                };

                match self.switch_form.begin_submit(submission) {
                    Ok(Some(call)) => self.spawn_switch_call(call),
                    Ok(None) => self.switch_overlay = None,
                    Err(e) => {
                        if let Some(overlay) = self.switch_overlay.as_mut() {
                            overlay.error = Some(e.to_string());
                        }
                    }
                }
                return Ok(None);
            }
            _ => {}
        }

        if let Some(overlay) = self.switch_overlay.as_mut() {
            match key.code {
                KeyCode::Tab | KeyCode::Down => overlay.next_field(),
                KeyCode::BackTab | KeyCode::Up => overlay.prev_field(),
                KeyCode::Char(' ') if SwitchOverlay::is_toggle_field(overlay.field_idx) => {
                    overlay.toggle();
                }
                KeyCode::Char(ch) if !SwitchOverlay::is_toggle_field(overlay.field_idx) => {
                    overlay.handle_text_input(ch);
                }
                KeyCode::Backspace if !SwitchOverlay::is_toggle_field(overlay.field_idx) => {
                    overlay.handle_backspace();
                }
                _ => {}
            }
        }
        Ok(None)
    }

    fn handle_floor_overlay_key(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if key.code != KeyCode::Enter {
            if let Some(overlay) = self.floor_overlay.as_mut() {
                overlay.error = None;
            }
        }

        match key.code {
            KeyCode::Esc => {
                self.floor_overlay = None;
                self.floor_form.close();
                return Ok(None);
            }
            KeyCode::Enter => {
                let submission = match self.floor_overlay.as_ref().map(FloorOverlay::build_submission)
                {
                    Some(Ok(submission)) => submission,
                    Some(Err(message)) => {
                        if let Some(overlay) = self.floor_overlay.as_mut() {
                            overlay.error = Some(message);
                        }
                        return Ok(None);
                    }
                    None => return Ok(None),
                };

                match self.floor_form.begin_submit(submission) {
                    Ok(Some(payload)) => self.spawn_floor_create(payload),
                    Ok(None) => self.floor_overlay = None,
                    Err(e) => {
                        if let Some(overlay) = self.floor_overlay.as_mut() {
                            overlay.error = Some(e.to_string());
                        }
                    }
                }
                return Ok(None);
            }
            _ => {}
        }

        if let Some(overlay) = self.floor_overlay.as_mut() {
            match key.code {
                KeyCode::Tab | KeyCode::Down => overlay.next_field(),
                KeyCode::BackTab | KeyCode::Up => overlay.prev_field(),
                KeyCode::Char(ch) => overlay.handle_text_input(ch),
                KeyCode::Backspace => overlay.handle_backspace(),
                _ => {}
            }
        }
        Ok(None)
    }

    /// Handle mouse events (delegate to active screen).
    fn handle_mouse_event(&mut self, mouse: MouseEvent) -> Result<Option<Action>> {
        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            return screen.handle_mouse_event(mouse);
        }
        Ok(None)
    }

    // ── Dispatch ─────────────────────────────────────────────────────

    /// Process a single action -- update app state and propagate to
    /// screens.
    #[allow(clippy::too_many_lines)]
    fn process_action(&mut self, action: &Action) -> Result<()> {
        match action {
            Action::Quit => {
                self.running = false;
            }

            Action::Resize(w, h) => {
                debug!("terminal resized to {w}x{h}");
            }

            Action::Render => {}

            Action::Tick => {
                // Auto-dismiss notifications after 3 seconds
                if let Some((_, created)) = &self.notification {
                    if created.elapsed() > Duration::from_secs(3) {
                        self.notification = None;
                    }
                }
                // Forward ticks to the login screen for the throbber
                if self.active_screen == ScreenId::Login {
                    if let Some(screen) = self.screens.get_mut(&ScreenId::Login) {
                        let _ = screen.update(action);
                    }
                }
            }

            Action::ToggleHelp => {
                self.help_visible = !self.help_visible;
            }

            Action::OpenSearch => {
                self.search_active = true;
                self.search_query.clear();
            }

            Action::CloseSearch => {
                self.search_active = false;
                self.search_query.clear();
                if let Some(screen) = self.screens.get_mut(&self.active_screen) {
                    if let Some(follow_up) = screen.update(action)? {
                        self.action_tx.send(follow_up)?;
                    }
                }
            }

            Action::SearchSubmit => {
                // Leave input mode; the applied filter stays on.
                self.search_active = false;
            }

            // ── Navigation ────────────────────────────────────────────
            Action::Navigate(path) => {
                self.navigate(path)?;
            }

            Action::GoBack => {
                if let Some(parent) = parent_path(&self.current_path) {
                    self.navigate(&parent)?;
                }
            }

            Action::Refresh => {
                let path = self.current_path.clone();
                self.navigate(&path)?;
            }

            // ── Session ───────────────────────────────────────────────
            Action::SubmitLogin { username, password } => {
                if let Some(screen) = self.screens.get_mut(&ScreenId::Login) {
                    let _ = screen.update(action);
                }
                self.spawn_login(username.clone(), password.clone());
            }

            Action::LoginFinished(result) => {
                if let Some(screen) = self.screens.get_mut(&ScreenId::Login) {
                    let _ = screen.update(action);
                }
                if result.is_ok() {
                    let target = self
                        .pending_redirect
                        .take()
                        .unwrap_or_else(|| LANDING_PATH.to_owned());
                    self.navigate(&target)?;
                }
            }

            Action::RequestLogout => {
                self.action_tx
                    .send(Action::ShowConfirm(ConfirmAction::Logout))?;
            }

            Action::LogoutFinished => {
                self.builds_cache = Arc::new(Vec::new());
                self.navigate(LOGIN_PATH)?;
            }

            Action::SessionExpired => {
                self.action_tx.send(Action::Notify(Notification::warning(
                    "Session expired, sign in again",
                )))?;
                // Re-resolving the current path bounces to login and
                // remembers it as the post-login destination.
                let path = self.current_path.clone();
                self.navigate(&path)?;
            }

            // ── Data loads: broadcast so every screen stays current ──
            Action::BuildsLoaded(builds) => {
                self.builds_cache = Arc::clone(builds);
                for screen in self.screens.values_mut() {
                    if let Some(follow_up) = screen.update(action)? {
                        self.action_tx.send(follow_up)?;
                    }
                }
                // The floors screen may have mounted before the list
                // arrived; hand it its building record now.
                if self.active_screen == ScreenId::Floors {
                    if let Some(resolved) = self.routes.resolve(&self.current_path) {
                        if let Some(short) = resolved.param("build") {
                            let record = self
                                .builds_cache
                                .iter()
                                .find(|b| b.short_name == short)
                                .cloned();
                            self.action_tx.send(Action::ViewBuild {
                                short_name: short.to_owned(),
                                build: record.map(Box::new),
                            })?;
                        }
                    }
                }
            }

            Action::FloorsLoaded { .. }
            | Action::PlanLoaded { .. }
            | Action::SwitchesLoaded(_)
            | Action::ViewBuild { .. }
            | Action::ViewFloor { .. } => {
                for screen in self.screens.values_mut() {
                    if let Some(follow_up) = screen.update(action)? {
                        self.action_tx.send(follow_up)?;
                    }
                }
            }

            // ── Forms ─────────────────────────────────────────────────
            Action::OpenSwitchAdd { build, floor } => {
                self.switch_form.open_add(build.as_deref(), *floor);
                self.switch_form.set_prior_name("");
                self.switch_overlay =
                    Some(SwitchOverlay::from_draft(self.switch_form.draft(), false));
            }

            Action::OpenSwitchEdit(switch) => {
                self.switch_form.set_prior_name(switch.name.clone());
                self.switch_form.open_edit((**switch).clone());
                self.switch_overlay =
                    Some(SwitchOverlay::from_draft(self.switch_form.draft(), true));
            }

            Action::OpenFloorAdd {
                build_name,
                build_addr,
            } => {
                self.floor_form.open();
                let draft = self.floor_form.draft_mut();
                draft.build_name.clone_from(build_name);
                draft.build_addr.clone_from(build_addr);
                self.floor_overlay = Some(FloorOverlay::from_draft(self.floor_form.draft()));
            }

            Action::SwitchSaved(result) => {
                self.switch_form.finish_submit(result.is_ok());
                if result.is_ok() {
                    self.switch_overlay = None;
                    self.action_tx.send(Action::Refresh)?;
                }
            }

            Action::FloorSaved(result) => {
                self.floor_form.finish_submit(result.is_ok());
                if result.is_ok() {
                    self.floor_overlay = None;
                    self.action_tx.send(Action::Refresh)?;
                }
            }

            // ── Destructive requests → confirmation dialog ───────────
            Action::RequestDeleteSwitch { name } => {
                self.action_tx
                    .send(Action::ShowConfirm(ConfirmAction::DeleteSwitch {
                        name: name.clone(),
                    }))?;
            }

            Action::RequestDeleteFloor { build, number } => {
                self.action_tx
                    .send(Action::ShowConfirm(ConfirmAction::DeleteFloor {
                        build: build.clone(),
                        number: *number,
                    }))?;
            }

            Action::ShowConfirm(confirm) => {
                self.pending_confirm = Some(confirm.clone());
            }

            Action::ConfirmYes => {
                if let Some(confirm) = self.pending_confirm.take() {
                    self.execute_confirm(confirm);
                }
            }

            Action::ConfirmNo => {
                self.pending_confirm = None;
            }

            // ── Notifications ────────────────────────────────────────
            Action::Notify(n) => {
                self.notification = Some((n.clone(), Instant::now()));
            }

            Action::DismissNotification => {
                self.notification = None;
            }

            // Everything else goes to the active screen only
            other => {
                if let Some(screen) = self.screens.get_mut(&self.active_screen) {
                    if let Some(follow_up) = screen.update(other)? {
                        self.action_tx.send(follow_up)?;
                    }
                }
            }
        }

        Ok(())
    }

    // ── Rendering ────────────────────────────────────────────────────

    /// Render the full application frame.
    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        // Login gets the full frame -- no tab bar or status bar
        if self.active_screen == ScreenId::Login {
            if let Some(screen) = self.screens.get(&ScreenId::Login) {
                screen.render(frame, area);
            }
            return;
        }

        // Layout: [screen content] [tab bar] [status bar]
        let layout = Layout::vertical([
            Constraint::Min(1),    // Screen content
            Constraint::Length(1), // Tab bar
            Constraint::Length(1), // Status bar
        ])
        .split(area);

        if let Some(screen) = self.screens.get(&self.active_screen) {
            screen.render(frame, layout[0]);
        }

        self.render_tab_bar(frame, layout[1]);
        self.render_status_bar(frame, layout[2]);

        // Overlays on top (order matters: last = topmost)
        if let Some(ref overlay) = self.switch_overlay {
            self.render_switch_form(frame, area, overlay);
        }
        if let Some(ref overlay) = self.floor_overlay {
            self.render_floor_form(frame, area, overlay);
        }
        if let Some((ref notif, _)) = self.notification {
            self.render_notification(frame, area, notif);
        }
        if let Some(ref confirm) = self.pending_confirm {
            self.render_confirm_dialog(frame, area, confirm);
        }
        if self.help_visible {
            self.render_help_overlay(frame, area);
        }
    }

    /// Render the bottom tab bar.
    fn render_tab_bar(&self, frame: &mut Frame, area: Rect) {
        let active_tab = self.active_screen.tab();
        let titles: Vec<Line> = ScreenId::TABS
            .iter()
            .map(|&id| {
                let style = if id == active_tab {
                    theme::tab_active()
                } else {
                    theme::tab_inactive()
                };
                Line::from(Span::styled(
                    format!(" {} {} ", id.number(), id.label()),
                    style,
                ))
            })
            .collect();

        let tabs = Tabs::new(titles)
            .divider(Span::styled(" ", theme::key_hint()))
            .select(
                ScreenId::TABS
                    .iter()
                    .position(|&s| s == active_tab)
                    .unwrap_or(0),
            );

        frame.render_widget(tabs, area);
    }

    /// Render the bottom status bar with session state and key hints.
    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        if self.search_active {
            let line = Line::from(vec![
                Span::styled(" / ", Style::default().fg(theme::COPPER)),
                Span::styled(&self.search_query, Style::default().fg(theme::STEEL_BLUE)),
                Span::styled("\u{2588}", Style::default().fg(theme::STEEL_BLUE)),
                Span::styled("  Esc cancel  Enter keep filter", theme::key_hint()),
            ]);
            frame.render_widget(Paragraph::new(line), area);
            return;
        }

        let session_indicator = if self.session.is_authenticated() {
            Span::styled("\u{25cf} signed in", Style::default().fg(theme::SIGNAL_GREEN))
        } else {
            Span::styled("\u{25cb} signed out", Style::default().fg(theme::FAULT_RED))
        };

        let hints = Span::styled(
            " \u{2502} ? help  / search  o sign out  q quit",
            theme::key_hint(),
        );

        let line = Line::from(vec![Span::raw(" "), session_indicator, hints]);

        frame.render_widget(Paragraph::new(line), area);
    }

    #[allow(
        clippy::unused_self,
        clippy::cast_possible_truncation,
        clippy::as_conversions
    )]
    fn render_switch_form(&self, frame: &mut Frame, area: Rect, overlay: &SwitchOverlay) {
        let overlay_w = 48u16.min(area.width.saturating_sub(4));
        let overlay_h =
            (SwitchOverlay::FIELD_COUNT as u16 + 7).min(area.height.saturating_sub(2));
        let x = area.x + (area.width.saturating_sub(overlay_w)) / 2;
        let y = area.y + (area.height.saturating_sub(overlay_h)) / 2;
        let overlay_area = Rect::new(x, y, overlay_w, overlay_h);

        frame.render_widget(Clear, overlay_area);

        let title = if overlay.name_locked {
            " Edit Switch "
        } else {
            " Add Switch "
        };
        let block = Block::default()
            .title(title)
            .title_style(Style::default().fg(theme::AMBER).add_modifier(Modifier::BOLD))
            .borders(Borders::ALL)
            .border_type(BorderType::Double)
            .border_style(Style::default().fg(theme::COPPER));

        let inner = block.inner(overlay_area);
        frame.render_widget(block, overlay_area);

        let label = Style::default().fg(theme::DIM_TEXT);
        let value_style = Style::default().fg(theme::STEEL_BLUE);
        let focused_label = Style::default().fg(theme::AMBER).add_modifier(Modifier::BOLD);
        let locked_style = Style::default().fg(theme::BORDER_GRAY);
        let on_style = Style::default().fg(theme::SIGNAL_GREEN);
        let off_style = Style::default().fg(theme::BORDER_GRAY);

        let mut lines = Vec::new();

        for idx in 0..SwitchOverlay::FIELD_COUNT {
            let is_focused = idx == overlay.field_idx;
            let lbl_style = if is_focused { focused_label } else { label };
            let marker = if is_focused { "\u{25b8} " } else { "  " };
            let field_label = SwitchOverlay::field_label(idx);
            let field_value = overlay.field_value(idx);

            let val_style = match idx {
                0 if overlay.name_locked => locked_style,
                11..=13 => {
                    if field_value == "On" {
                        on_style
                    } else {
                        off_style
                    }
                }
                _ => value_style,
            };

            let cursor = if is_focused && !SwitchOverlay::is_toggle_field(idx) {
                "\u{258e}"
            } else {
                ""
            };

            lines.push(Line::from(vec![
                Span::styled(marker, lbl_style),
                Span::styled(format!("{field_label:<15}"), lbl_style),
                Span::styled(field_value, val_style),
                Span::styled(cursor, Style::default().fg(theme::AMBER)),
            ]));
        }

        lines.push(match overlay.error {
            Some(ref message) => Line::from(Span::styled(
                format!(" {message}"),
                Style::default().fg(theme::FAULT_RED),
            )),
            None => Line::from(""),
        });

        lines.push(Line::from(vec![
            Span::styled(" Tab", theme::key_hint_key()),
            Span::styled(" next  ", theme::key_hint()),
            Span::styled("Space", theme::key_hint_key()),
            Span::styled(" toggle  ", theme::key_hint()),
            Span::styled("Enter", theme::key_hint_key()),
            Span::styled(" save  ", theme::key_hint()),
            Span::styled("Esc", theme::key_hint_key()),
            Span::styled(" cancel", theme::key_hint()),
        ]));

        frame.render_widget(Paragraph::new(lines), inner);
    }

    #[allow(
        clippy::unused_self,
        clippy::cast_possible_truncation,
        clippy::as_conversions
    )]
    fn render_floor_form(&self, frame: &mut Frame, area: Rect, overlay: &FloorOverlay) {
        let overlay_w = 48u16.min(area.width.saturating_sub(4));
        let overlay_h =
            (FloorOverlay::FIELD_COUNT as u16 + 7).min(area.height.saturating_sub(2));
        let x = area.x + (area.width.saturating_sub(overlay_w)) / 2;
        let y = area.y + (area.height.saturating_sub(overlay_h)) / 2;
        let overlay_area = Rect::new(x, y, overlay_w, overlay_h);

        frame.render_widget(Clear, overlay_area);

        let block = Block::default()
            .title(" Add Floor ")
            .title_style(Style::default().fg(theme::AMBER).add_modifier(Modifier::BOLD))
            .borders(Borders::ALL)
            .border_type(BorderType::Double)
            .border_style(Style::default().fg(theme::COPPER));

        let inner = block.inner(overlay_area);
        frame.render_widget(block, overlay_area);

        let label = Style::default().fg(theme::DIM_TEXT);
        let value_style = Style::default().fg(theme::STEEL_BLUE);
        let focused_label = Style::default().fg(theme::AMBER).add_modifier(Modifier::BOLD);

        let mut lines = Vec::new();

        for idx in 0..FloorOverlay::FIELD_COUNT {
            let is_focused = idx == overlay.field_idx;
            let lbl_style = if is_focused { focused_label } else { label };
            let marker = if is_focused { "\u{25b8} " } else { "  " };
            let field_label = FloorOverlay::field_label(idx);
            let field_value = overlay.field_value(idx);

            let cursor = if is_focused { "\u{258e}" } else { "" };

            lines.push(Line::from(vec![
                Span::styled(marker, lbl_style),
                Span::styled(format!("{field_label:<15}"), lbl_style),
                Span::styled(field_value, value_style),
                Span::styled(cursor, Style::default().fg(theme::AMBER)),
            ]));
        }

        lines.push(match overlay.error {
            Some(ref message) => Line::from(Span::styled(
                format!(" {message}"),
                Style::default().fg(theme::FAULT_RED),
            )),
            None => Line::from(""),
        });

        lines.push(Line::from(vec![
            Span::styled(" Tab", theme::key_hint_key()),
            Span::styled(" next  ", theme::key_hint()),
            Span::styled("Enter", theme::key_hint_key()),
            Span::styled(" save  ", theme::key_hint()),
            Span::styled("Esc", theme::key_hint_key()),
            Span::styled(" cancel", theme::key_hint()),
        ]));

        frame.render_widget(Paragraph::new(lines), inner);
    }

    /// Render the help overlay centered on screen.
    #[allow(clippy::unused_self)]
    fn render_help_overlay(&self, frame: &mut Frame, area: Rect) {
        let help_width = 60u16.min(area.width.saturating_sub(4));
        let help_height = 21u16.min(area.height.saturating_sub(4));

        let x = (area.width.saturating_sub(help_width)) / 2;
        let y = (area.height.saturating_sub(help_height)) / 2;

        let help_area = Rect::new(area.x + x, area.y + y, help_width, help_height);

        frame.render_widget(
            Block::default().style(Style::default().bg(theme::BG_DARK)),
            help_area,
        );

        let block = Block::default()
            .title(" Keyboard Shortcuts ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_focused());

        let inner = block.inner(help_area);
        frame.render_widget(block, help_area);

        let help_text = vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                "  Navigation",
                Style::default().fg(theme::STEEL_BLUE),
            )]),
            Line::from(Span::styled("  \u{2500}\u{2500}\u{2500}\u{2500}\u{2500}\u{2500}\u{2500}\u{2500}\u{2500}\u{2500}", theme::key_hint())),
            Line::from(vec![
                Span::styled("  1-3       ", theme::key_hint_key()),
                Span::styled("Jump to tab", theme::key_hint()),
            ]),
            Line::from(vec![
                Span::styled("  Tab       ", theme::key_hint_key()),
                Span::styled("Next tab", theme::key_hint()),
            ]),
            Line::from(vec![
                Span::styled("  j/k \u{2191}/\u{2193}   ", theme::key_hint_key()),
                Span::styled("Move up/down", theme::key_hint()),
            ]),
            Line::from(vec![
                Span::styled("  Enter     ", theme::key_hint_key()),
                Span::styled("Open / expand", theme::key_hint()),
            ]),
            Line::from(vec![
                Span::styled("  Esc       ", theme::key_hint_key()),
                Span::styled("Up one level", theme::key_hint()),
            ]),
            Line::from(vec![
                Span::styled("  g/G       ", theme::key_hint_key()),
                Span::styled("Top / bottom", theme::key_hint()),
            ]),
            Line::from(vec![
                Span::styled("  Ctrl+d/u  ", theme::key_hint_key()),
                Span::styled("Page down / up", theme::key_hint()),
            ]),
            Line::from(""),
            Line::from(vec![Span::styled(
                "  Actions",
                Style::default().fg(theme::STEEL_BLUE),
            )]),
            Line::from(Span::styled("  \u{2500}\u{2500}\u{2500}\u{2500}\u{2500}\u{2500}\u{2500}", theme::key_hint())),
            Line::from(vec![
                Span::styled("  a         ", theme::key_hint_key()),
                Span::styled("Add entry           ", theme::key_hint()),
                Span::styled("e  ", theme::key_hint_key()),
                Span::styled("Edit", theme::key_hint()),
            ]),
            Line::from(vec![
                Span::styled("  d         ", theme::key_hint_key()),
                Span::styled("Delete              ", theme::key_hint()),
                Span::styled("/  ", theme::key_hint_key()),
                Span::styled("Search", theme::key_hint()),
            ]),
            Line::from(vec![
                Span::styled("  o         ", theme::key_hint_key()),
                Span::styled("Sign out            ", theme::key_hint()),
                Span::styled("q  ", theme::key_hint_key()),
                Span::styled("Quit", theme::key_hint()),
            ]),
            Line::from(""),
            Line::from(Span::styled(
                "                         Esc or ? to close",
                theme::key_hint(),
            )),
        ];

        frame.render_widget(Paragraph::new(help_text), inner);
    }

    /// Render a centered confirmation dialog.
    #[allow(clippy::unused_self)]
    fn render_confirm_dialog(&self, frame: &mut Frame, area: Rect, confirm: &ConfirmAction) {
        let width = 50u16.min(area.width.saturating_sub(4));
        let height = 5u16;

        let x = (area.width.saturating_sub(width)) / 2;
        let y = (area.height.saturating_sub(height)) / 2;
        let dialog_area = Rect::new(area.x + x, area.y + y, width, height);

        frame.render_widget(
            Block::default().style(Style::default().bg(theme::BG_DARK)),
            dialog_area,
        );

        let block = Block::default()
            .title(" Confirm ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(theme::AMBER));

        let inner = block.inner(dialog_area);
        frame.render_widget(block, dialog_area);

        let text = vec![
            Line::from(Span::styled(
                format!("  {confirm}"),
                Style::default().fg(theme::DIM_TEXT),
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled("  y ", theme::key_hint_key()),
                Span::styled("confirm    ", theme::key_hint()),
                Span::styled("n ", theme::key_hint_key()),
                Span::styled("cancel", theme::key_hint()),
            ]),
        ];
        frame.render_widget(Paragraph::new(text), inner);
    }

    /// Render a notification toast in the bottom-right corner.
    #[allow(
        clippy::unused_self,
        clippy::cast_possible_truncation,
        clippy::as_conversions
    )]
    fn render_notification(&self, frame: &mut Frame, area: Rect, notif: &Notification) {
        let msg_len = notif.message.len() as u16;
        let width = (msg_len + 6).clamp(20, 60);
        let height = 3u16;

        let x = area.width.saturating_sub(width + 1);
        let y = area.height.saturating_sub(height + 2); // above status bar
        let toast_area = Rect::new(area.x + x, area.y + y, width, height);

        let (border_color, icon) = match notif.level {
            NotificationLevel::Success => (theme::SIGNAL_GREEN, "\u{2713}"),
            NotificationLevel::Error => (theme::FAULT_RED, "\u{2717}"),
            NotificationLevel::Warning => (theme::AMBER, "!"),
            NotificationLevel::Info => (theme::STEEL_BLUE, "\u{b7}"),
        };

        frame.render_widget(
            Block::default().style(Style::default().bg(theme::BG_DARK)),
            toast_area,
        );

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(border_color));

        let inner = block.inner(toast_area);
        frame.render_widget(block, toast_area);

        let line = Line::from(vec![
            Span::styled(format!(" {icon} "), Style::default().fg(border_color)),
            Span::styled(&notif.message, Style::default().fg(theme::DIM_TEXT)),
        ]);
        frame.render_widget(Paragraph::new(line), inner);
    }
}

/// Captured value of one named path parameter.
fn param<'a>(params: &'a [(String, String)], name: &str) -> Option<&'a str> {
    params
        .iter()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.as_str())
}

/// One level up in the path hierarchy, or `None` from a top-level path.
fn parent_path(path: &str) -> Option<String> {
    let bare = path.split_once('?').map_or(path, |(head, _)| head);
    let trimmed = bare.trim_end_matches('/');
    let cut = trimmed.rfind('/')?;
    if cut == 0 {
        None
    } else {
        Some(trimmed[..cut].to_owned())
    }
}

/// Report a background task failure: session expiry turns into a
/// login bounce, anything else into an error toast.
fn notify_task_error(tx: &mpsc::UnboundedSender<Action>, what: &str, e: &CoreError) {
    if e.is_auth_expired() {
        let _ = tx.send(Action::SessionExpired);
        return;
    }
    warn!(error = %e, "{what}");
    let _ = tx.send(Action::Notify(Notification::error(format!("{what}: {e}"))));
}

// ── Tests ────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn parent_path_walks_up_one_segment() {
        assert_eq!(parent_path("/builds/B1/3"), Some("/builds/B1".to_owned()));
        assert_eq!(parent_path("/builds/B1"), Some("/builds".to_owned()));
    }

    #[test]
    fn top_level_paths_have_no_parent() {
        assert_eq!(parent_path("/builds"), None);
        assert_eq!(parent_path("/switches"), None);
        assert_eq!(parent_path("/"), None);
    }

    #[test]
    fn query_string_and_trailing_slash_do_not_count_as_segments() {
        assert_eq!(parent_path("/builds/B1/"), Some("/builds".to_owned()));
        assert_eq!(
            parent_path("/builds/B1?from=search"),
            Some("/builds".to_owned())
        );
    }

    #[test]
    fn params_resolve_by_name() {
        let params = vec![
            ("build".to_owned(), "B1".to_owned()),
            ("floor".to_owned(), "3".to_owned()),
        ];
        assert_eq!(param(&params, "build"), Some("B1"));
        assert_eq!(param(&params, "floor"), Some("3"));
        assert_eq!(param(&params, "wing"), None);
    }
}
