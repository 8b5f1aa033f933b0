use std::io::Read;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

use log::{debug, info, warn};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use super::auth::TokenStore;
use super::endpoints::Endpoints;
use super::error::BackendError;
use super::model::{AlbumMetadata, IndexedAlbum, IndexedArtist, IndexedTrack};

type Result<T> = std::result::Result<T, BackendError>;

/// Upper bound for a single downloaded stream.
const MAX_DOWNLOAD_BYTES: u64 = 512 * 1024 * 1024;

#[derive(Debug, Clone, Copy)]
pub struct ClientOptions {
    pub connect_timeout: Duration,
    pub read_timeout: Duration,
    /// Minimum time between two `/auth/verify` round trips.
    pub token_check: Duration,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(5),
            read_timeout: Duration::from_secs(30),
            token_check: Duration::from_secs(60),
        }
    }
}

#[derive(Debug, Default)]
struct Session {
    refresh: Option<String>,
    access: Option<String>,
    last_check: Option<Instant>,
}

#[derive(Clone, Copy)]
enum Body<'a> {
    Empty,
    Json(&'a Value),
    Text(&'a str),
}

pub struct BackendClient {
    agent: ureq::Agent,
    endpoints: Endpoints,
    session: Mutex<Session>,
    store: Option<TokenStore>,
    token_check: Duration,
}

impl BackendClient {
    /// Build a client and restore any unexpired tokens from `store`.
    pub fn new(endpoints: Endpoints, options: ClientOptions, store: Option<TokenStore>) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(options.connect_timeout)
            .timeout_read(options.read_timeout)
            .timeout_write(options.read_timeout)
            .build();

        let mut session = Session::default();
        if let Some(store) = &store {
            match store.load() {
                Ok(Some(tokens)) => {
                    info!("restored session from {}", store.path().display());
                    session.refresh = Some(tokens.refresh_token);
                    session.access = tokens.access_token;
                }
                Ok(None) => {}
                Err(err) => warn!("ignoring saved credentials: {err}"),
            }
        }

        Self {
            agent,
            endpoints,
            session: Mutex::new(session),
            store,
            token_check: options.token_check,
        }
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    pub fn is_logged_in(&self) -> bool {
        self.session().refresh.is_some()
    }

    /// `POST /auth/login`, then fetch the first access token.
    pub fn login(&self, username: &str, password: &str) -> Result<()> {
        let url = self.endpoints.url("/auth/login");
        let body = json!({ "username": username, "password": password });
        let response = self.call("POST", &url, None, Body::Json(&body))?;
        let refresh = token_from_body(&response.into_string()?);

        self.session().refresh = Some(refresh);
        self.refresh_access()?;
        info!("logged in as {username}");
        Ok(())
    }

    /// Forget the session and delete the credential file.
    pub fn logout(&self) {
        *self.session() = Session::default();
        if let Some(store) = &self.store {
            if let Err(err) = store.clear() {
                warn!("failed to clear credentials: {err}");
            }
        }
    }

    /// Trade the refresh token for a new access token.
    pub fn refresh_access(&self) -> Result<String> {
        let refresh = self.session().refresh.clone().ok_or(BackendError::NotLoggedIn)?;

        let url = self.endpoints.url("/auth/token");
        let response = self.call("GET", &url, Some(&refresh), Body::Empty)?;
        let access = token_from_body(&response.into_string()?);
        debug!("obtained a new access token");

        {
            let mut session = self.session();
            session.access = Some(access.clone());
            session.last_check = Some(Instant::now());
        }
        self.persist(&refresh, Some(&access));
        Ok(access)
    }

    pub fn get(&self, path: &str) -> Result<Value> {
        let response = self.authorized("GET", &self.endpoints.url(path), Body::Empty)?;
        read_json(response)
    }

    pub fn post(&self, path: &str, body: &Value) -> Result<Value> {
        let response = self.authorized("POST", &self.endpoints.url(path), Body::Json(body))?;
        read_json(response)
    }

    /// Fetch an absolute URL (e.g. a stream URL) as raw bytes.
    pub fn download(&self, url: &str) -> Result<Vec<u8>> {
        let response = self.authorized("GET", url, Body::Empty)?;
        let mut bytes = Vec::new();
        response
            .into_reader()
            .take(MAX_DOWNLOAD_BYTES)
            .read_to_end(&mut bytes)?;
        Ok(bytes)
    }

    /// `GET /index/tracks`; `search` is omitted when blank.
    pub fn index_tracks(&self, skip: u32, count: u32, search: Option<&str>) -> Result<Vec<IndexedTrack>> {
        self.index("tracks", skip, count, search)
    }

    pub fn index_albums(&self, skip: u32, count: u32, search: Option<&str>) -> Result<Vec<IndexedAlbum>> {
        self.index("albums", skip, count, search)
    }

    pub fn index_artists(&self, skip: u32, count: u32, search: Option<&str>) -> Result<Vec<IndexedArtist>> {
        self.index("artists", skip, count, search)
    }

    /// Full album metadata, tracks included.
    pub fn album(&self, id: &str) -> Result<AlbumMetadata> {
        let value = self.get(&format!("/metadata/album/{id}"))?;
        Ok(serde_json::from_value(value)?)
    }

    pub fn set_track_loved(&self, id: &str, loved: bool) -> Result<()> {
        let verb = if loved { "love" } else { "unlove" };
        self.post(&format!("/user/{verb}/track/{id}"), &json!({}))?;
        Ok(())
    }

    /// Raw `GET /lyrics/{id}` payload; see `lyrics::Lyrics::from_value`.
    pub fn lyrics(&self, id: &str) -> Result<Value> {
        self.get(&format!("/lyrics/{id}"))
    }

    fn index<T: DeserializeOwned>(&self, kind: &str, skip: u32, count: u32, search: Option<&str>) -> Result<Vec<T>> {
        let mut path = format!("/index/{kind}?count={count}&skip={skip}");
        if let Some(search) = search.map(str::trim).filter(|s| !s.is_empty()) {
            path.push_str("&search=");
            path.push_str(&urlencoding::encode(search));
        }

        let value = self.get(&path)?;
        if value.is_null() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_value(value)?)
    }

    fn session(&self) -> MutexGuard<'_, Session> {
        self.session
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn persist(&self, refresh: &str, access: Option<&str>) {
        if let Some(store) = &self.store {
            if let Err(err) = store.save(refresh, access) {
                warn!("failed to save credentials: {err}");
            }
        }
    }

    /// Current access token, verifying it first when the check interval
    /// has elapsed.
    fn access_token(&self) -> Result<String> {
        let (access, due) = {
            let session = self.session();
            if session.refresh.is_none() && session.access.is_none() {
                return Err(BackendError::NotLoggedIn);
            }
            let due = session
                .last_check
                .is_none_or(|at| at.elapsed() >= self.token_check);
            (session.access.clone(), due)
        };

        let Some(access) = access else {
            return self.refresh_access();
        };
        if !due {
            return Ok(access);
        }

        let url = self.endpoints.url("/auth/verify");
        let verdict = self
            .call("POST", &url, None, Body::Text(&access))
            .and_then(|response| Ok(response.into_string()?));
        self.session().last_check = Some(Instant::now());

        match verdict {
            Ok(body) if body.trim() == "false" => {
                info!("access token expired, refreshing");
                self.refresh_access()
            }
            Ok(_) => Ok(access),
            Err(err) => {
                warn!("token verification failed: {err}");
                Ok(access)
            }
        }
    }

    /// Authenticated request with a single refresh-and-retry on 401.
    fn authorized(&self, method: &str, url: &str, body: Body<'_>) -> Result<ureq::Response> {
        let token = self.access_token()?;
        match self.call(method, url, Some(&token), body) {
            Err(BackendError::Unauthorized) => {
                info!("{method} {url} rejected, refreshing access token");
                let token = self.refresh_access()?;
                self.call(method, url, Some(&token), body)
            }
            other => other,
        }
    }

    fn call(&self, method: &str, url: &str, bearer: Option<&str>, body: Body<'_>) -> Result<ureq::Response> {
        let mut request = self.agent.request(method, url);
        if let Some(token) = bearer {
            request = request.set("Authorization", &format!("Bearer {token}"));
        }

        let result = match body {
            Body::Empty => request.call(),
            Body::Json(value) => request.send_json(value),
            Body::Text(text) => request.set("Content-Type", "text/plain").send_string(text),
        };
        result.map_err(|err| {
            let err = BackendError::from(err);
            debug!("{method} {url} failed: {err}");
            err
        })
    }
}

fn read_json(response: ureq::Response) -> Result<Value> {
    let text = response.into_string()?;
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    Ok(serde_json::from_str(&text)?)
}

/// Token endpoints answer with the bare token, sometimes JSON-quoted.
pub(super) fn token_from_body(body: &str) -> String {
    serde_json::from_str::<String>(body).unwrap_or_else(|_| body.trim().to_string())
}
