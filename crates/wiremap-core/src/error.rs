// ── Core error types ──
//
// User-facing errors from wiremap-core. These are NOT API-specific --
// consumers never see raw HTTP failures or JSON parse errors directly.
// The `From<wiremap_api::Error>` impl translates transport-layer errors
// into domain-appropriate variants.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Form errors ──────────────────────────────────────────────────
    #[error("A submission is already in flight")]
    SubmissionPending,

    // ── Session errors ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    #[error("Session expired -- log in again")]
    SessionExpired,

    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot reach the inventory service at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    // ── Service errors (wrapped, not exposed raw) ────────────────────
    #[error("Inventory service error: {message}")]
    Api {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    // ── Internal errors ──────────────────────────────────────────────
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Whether this error means the session is gone and the operator
    /// must authenticate again.
    pub fn is_auth_expired(&self) -> bool {
        matches!(self, CoreError::SessionExpired)
    }

    /// Whether the service reported the target record missing.
    pub fn is_not_found(&self) -> bool {
        matches!(self, CoreError::Api { status: Some(404), .. })
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<wiremap_api::Error> for CoreError {
    fn from(err: wiremap_api::Error) -> Self {
        match err {
            wiremap_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            wiremap_api::Error::SessionExpired => CoreError::SessionExpired,
            wiremap_api::Error::Transport(ref e) => {
                if e.is_connect() || e.is_timeout() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map(|u| u.to_string())
                            .unwrap_or_else(|| "<unknown>".into()),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            wiremap_api::Error::InvalidUrl(e) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("invalid URL: {e}"),
            },
            wiremap_api::Error::InvalidBaseUrl(url) => CoreError::ConnectionFailed {
                url,
                reason: "not a usable base URL".into(),
            },
            wiremap_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            wiremap_api::Error::Api { status, message } => CoreError::Api {
                message,
                status: Some(status),
            },
            wiremap_api::Error::Deserialization { message, body: _ } => {
                CoreError::Internal(format!("Deserialization error: {message}"))
            }
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_expiry_translates_to_core_variant() {
        let err = CoreError::from(wiremap_api::Error::SessionExpired);
        assert!(matches!(err, CoreError::SessionExpired));
        assert!(err.is_auth_expired());
    }

    #[test]
    fn service_rejection_keeps_status() {
        let err = CoreError::from(wiremap_api::Error::Api {
            status: 404,
            message: "no such switch".into(),
        });
        assert!(err.is_not_found());
        assert!(!err.is_auth_expired());
    }

    #[test]
    fn authentication_failure_carries_message() {
        let err = CoreError::from(wiremap_api::Error::Authentication {
            message: "bad credentials".into(),
        });
        match err {
            CoreError::AuthenticationFailed { message } => {
                assert!(message.contains("bad credentials"));
            }
            other => panic!("expected AuthenticationFailed, got: {other:?}"),
        }
    }
}
