// Inventory service HTTP client
//
// Wraps `reqwest::Client` with inventory-specific URL construction and
// response handling. The service speaks plain JSON: list endpoints return
// bare arrays, mutations return an empty success body. Session state lives
// in the cookie jar installed through `TransportConfig`.

use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;
use crate::types::{Build, Floor, FloorPayload, Switch, SwitchPayload, SwitchScope};

/// Async client for the wiremap inventory service.
///
/// Authentication is cookie-based: `login` stores the session cookie in
/// the client's jar and every subsequent request replays it. All methods
/// map non-success statuses into the crate [`Error`] taxonomy.
pub struct InventoryClient {
    http: reqwest::Client,
    base_url: Url,
}

impl InventoryClient {
    /// Create a new client from a `TransportConfig`.
    ///
    /// If the config doesn't already include a cookie jar, one is created
    /// automatically (session auth requires cookies). `base_url` is the
    /// service root, e.g. `https://inventory.example.net`.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let config = if transport.cookie_jar.is_some() {
            transport.clone()
        } else {
            transport.clone().with_cookie_jar()
        };
        let http = config.build_client()?;
        Ok(Self { http, base_url })
    }

    /// The service base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── Session ──────────────────────────────────────────────────────

    /// Authenticate with the inventory service.
    ///
    /// On success the session cookie lands in the client's jar and is
    /// replayed on all subsequent requests. Any non-success status is an
    /// authentication failure carrying the response body.
    pub async fn login(&self, username: &str, password: &SecretString) -> Result<(), Error> {
        let url = self.endpoint(&["login"])?;
        debug!("logging in at {}", url);

        let body = json!({
            "username": username,
            "password": password.expose_secret(),
        });

        let resp = self
            .http
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(Error::Transport)?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Authentication {
                message: format!("login failed (HTTP {status}): {}", preview(&body)),
            });
        }

        debug!("login successful");
        Ok(())
    }

    /// End the current session.
    pub async fn logout(&self) -> Result<(), Error> {
        let url = self.endpoint(&["logout"])?;
        debug!("logging out at {}", url);

        let resp = self
            .http
            .post(url)
            .send()
            .await
            .map_err(Error::Transport)?;

        Self::check_status(resp).await?;
        debug!("logout complete");
        Ok(())
    }

    // ── Buildings & floors ───────────────────────────────────────────

    /// List every building in the inventory.
    pub async fn builds(&self) -> Result<Vec<Build>, Error> {
        let url = self.endpoint(&["build"])?;
        self.get_list(url).await
    }

    /// List the floors of one building.
    pub async fn floors_of(&self, build: &str) -> Result<Vec<Floor>, Error> {
        let url = self.endpoint(&["build", build, "floors"])?;
        self.get_list(url).await
    }

    /// Create a floor.
    pub async fn create_floor(&self, payload: &FloorPayload) -> Result<(), Error> {
        let url = self.endpoint(&["floor"])?;
        self.post_unit(url, payload).await
    }

    /// Delete one floor of a building.
    pub async fn delete_floor(&self, build: &str, floor: i32) -> Result<(), Error> {
        let url = self.endpoint(&["build", build, &floor.to_string()])?;
        self.delete_unit(url).await
    }

    // ── Switches ─────────────────────────────────────────────────────

    /// List switches, optionally scoped to one floor of one building.
    pub async fn switches(&self, scope: &SwitchScope) -> Result<Vec<Switch>, Error> {
        let mut url = self.endpoint(&["switch"])?;
        if let SwitchScope::Floor { build, floor } = scope {
            url.query_pairs_mut()
                .append_pair("build", build)
                .append_pair("floor", &floor.to_string());
        }
        self.get_list(url).await
    }

    /// Create a switch record.
    pub async fn create_switch(&self, payload: &SwitchPayload) -> Result<(), Error> {
        let url = self.endpoint(&["switch"])?;
        self.post_unit(url, payload).await
    }

    /// Update an existing switch record.
    ///
    /// The record is addressed by `payload.name`; names are immutable.
    pub async fn update_switch(&self, payload: &SwitchPayload) -> Result<(), Error> {
        let url = self.endpoint(&["switch", &payload.name])?;
        self.put_unit(url, payload).await
    }

    /// Delete a switch record.
    pub async fn delete_switch(&self, name: &str) -> Result<(), Error> {
        let url = self.endpoint(&["switch", name])?;
        self.delete_unit(url).await
    }

    // ── URL building ─────────────────────────────────────────────────

    /// Build a full URL by pushing path segments onto the base.
    ///
    /// Segment push percent-encodes user-supplied identifiers, so a
    /// building named `B 1` stays a single segment on the wire.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, Error> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| Error::InvalidBaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send a GET request and decode the bare JSON array the service returns.
    async fn get_list<T: DeserializeOwned>(&self, url: Url) -> Result<Vec<T>, Error> {
        debug!("GET {}", url);

        let resp = self.http.get(url).send().await.map_err(Error::Transport)?;

        Self::decode(resp).await
    }

    /// Send a POST request with a JSON body, expecting an empty success body.
    async fn post_unit(&self, url: Url, body: &(impl Serialize + Sync)) -> Result<(), Error> {
        debug!("POST {}", url);

        let resp = self
            .http
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(Error::Transport)?;

        Self::check_status(resp).await.map(drop)
    }

    /// Send a PUT request with a JSON body, expecting an empty success body.
    async fn put_unit(&self, url: Url, body: &(impl Serialize + Sync)) -> Result<(), Error> {
        debug!("PUT {}", url);

        let resp = self
            .http
            .put(url)
            .json(body)
            .send()
            .await
            .map_err(Error::Transport)?;

        Self::check_status(resp).await.map(drop)
    }

    /// Send a DELETE request, expecting an empty success body.
    async fn delete_unit(&self, url: Url) -> Result<(), Error> {
        debug!("DELETE {}", url);

        let resp = self
            .http
            .delete(url)
            .send()
            .await
            .map_err(Error::Transport)?;

        Self::check_status(resp).await.map(drop)
    }

    /// Map non-success statuses into the error taxonomy.
    ///
    /// 401 on a data call means the session cookie expired or was revoked;
    /// everything else non-success surfaces as an API error with a body
    /// preview.
    async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response, Error> {
        let status = resp.status();

        if status == StatusCode::UNAUTHORIZED {
            return Err(Error::SessionExpired);
        }

        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Api {
                status: status.as_u16(),
                message: preview(&body).to_owned(),
            });
        }

        Ok(resp)
    }

    /// Check the status, then decode the JSON body.
    async fn decode<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
        let resp = Self::check_status(resp).await?;
        let body = resp.text().await.map_err(Error::Transport)?;

        serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: format!("{e} (body preview: {:?})", preview(&body)),
            body: body.clone(),
        })
    }
}

/// First 200 characters of a body, cut on a char boundary.
fn preview(body: &str) -> &str {
    match body.char_indices().nth(200) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}
