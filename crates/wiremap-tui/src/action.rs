//! Action vocabulary for the app loop.
//!
//! Key handlers and spawned tasks produce actions; `App::process_action`
//! consumes them. Data-carrying variants wrap their lists in `Arc` so a
//! broadcast to every screen stays cheap.

use std::fmt;
use std::sync::Arc;

use secrecy::SecretString;

use wiremap_core::{Build, Floor, Switch};

// ── Notifications ────────────────────────────────────────────────────

/// Severity of a toast notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A toast shown in the corner for a few seconds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub level: NotificationLevel,
}

impl Notification {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: NotificationLevel::Info,
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: NotificationLevel::Success,
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: NotificationLevel::Warning,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: NotificationLevel::Error,
        }
    }
}

// ── Confirmations ────────────────────────────────────────────────────

/// A destructive step awaiting a y/n answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmAction {
    DeleteSwitch { name: String },
    DeleteFloor { build: String, number: i32 },
    Logout,
}

impl fmt::Display for ConfirmAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DeleteSwitch { name } => write!(f, "Delete switch {name}?"),
            Self::DeleteFloor { build, number } => {
                write!(f, "Delete floor {number} of {build}?")
            }
            Self::Logout => write!(f, "Log out?"),
        }
    }
}

// ── Actions ──────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub enum Action {
    // ── App lifecycle ──
    Quit,
    Tick,
    Render,
    Resize(u16, u16),
    ToggleHelp,

    // ── Navigation ──
    /// Request a screen change by route path. The only way screens
    /// change: resolution, redirects, and the access guard all run
    /// before anything mounts.
    Navigate(String),
    GoBack,

    // ── Search ──
    OpenSearch,
    CloseSearch,
    SearchInput(String),
    SearchSubmit,

    // ── Session ──
    SubmitLogin {
        username: String,
        password: SecretString,
    },
    LoginFinished(Result<(), String>),
    LogoutFinished,
    /// The service rejected a call with an expired session.
    SessionExpired,

    // ── Data ──
    /// Re-fetch whatever the active screen shows.
    Refresh,
    BuildsLoaded(Arc<Vec<Build>>),
    /// A building drill-in committed; carries the full record when the
    /// builds cache already knows it.
    ViewBuild {
        short_name: String,
        build: Option<Box<Build>>,
    },
    FloorsLoaded {
        build: String,
        floors: Arc<Vec<Floor>>,
    },
    /// A floor drill-in committed.
    ViewFloor {
        build: String,
        number: i32,
    },
    PlanLoaded {
        build: String,
        number: i32,
        switches: Arc<Vec<Switch>>,
    },
    SwitchesLoaded(Arc<Vec<Switch>>),

    // ── Forms ──
    OpenSwitchAdd {
        build: Option<String>,
        floor: Option<i32>,
    },
    OpenSwitchEdit(Box<Switch>),
    OpenFloorAdd {
        build_name: String,
        build_addr: String,
    },
    SwitchSaved(Result<(), String>),
    FloorSaved(Result<(), String>),

    // ── Deletions & confirmation ──
    RequestDeleteSwitch { name: String },
    RequestDeleteFloor { build: String, number: i32 },
    RequestLogout,
    ShowConfirm(ConfirmAction),
    ConfirmYes,
    ConfirmNo,

    // ── Notifications ──
    Notify(Notification),
    DismissNotification,
}
