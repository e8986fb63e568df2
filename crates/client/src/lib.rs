mod admin;
mod auth;
pub mod college;
pub mod course;
pub mod download;
pub mod material;
pub mod reference;
pub mod search;

pub use admin::AdminClient;
pub use auth::{Credentials, Password, Session};
pub use reqwest::StatusCode;
use log::debug;
use reqwest::{
    blocking::{Client as HttpClient, RequestBuilder, Response},
    Method,
};
use serde::Deserialize;
use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

pub const DEFAULT_API_BASE: &str = "https://lunarkoudobackend.onrender.com/api";

/// A client for the catalog's REST API.
///
/// Reads made through this are anonymous. Use [`Client::admin`] for anything that needs a session.
#[derive(Debug, Clone)]
pub struct Client {
    base: String,
    http: HttpClient,
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid username or password")]
    LoginFailed,

    #[error("{}", .message)]
    Status { status: StatusCode, message: String },

    #[error("http error: {}", .0)]
    HTTPError(#[from] reqwest::Error),

    #[error("io error: {}", .0)]
    IOError(#[from] std::io::Error),

    #[error("serde error: {}", .0)]
    SerdeError(#[from] serde_json::Error),
}

/// The shapes the backend uses for error bodies
#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    error: Option<String>,
}

impl Client {
    pub fn new(base: impl Into<String>) -> Self {
        let base = base.into().trim_end_matches('/').to_string();
        Client {
            base,
            http: HttpClient::new(),
        }
    }

    /// Borrow this client for calls made on behalf of a logged in admin.
    pub fn admin<'a>(&'a self, session: &'a Session) -> AdminClient<'a> {
        AdminClient::new(self, session)
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base, path.trim_start_matches('/'))
    }

    pub(crate) fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http.request(method, self.url(path))
    }

    pub(crate) fn get<T: for<'a> Deserialize<'a>>(&self, path: &str) -> Result<T> {
        self.fetch(self.request(Method::GET, path))
    }

    /// Send the request, and decode the body as JSON if it succeeded
    pub(crate) fn fetch<T: for<'a> Deserialize<'a>>(&self, req: RequestBuilder) -> Result<T> {
        let resp = check_status(req.send()?)?;
        if log::log_enabled!(log::Level::Debug) {
            let s = resp.text()?;
            debug!("response: {}", s);
            Ok(serde_json::from_str(&s)?)
        } else {
            Ok(resp.json()?)
        }
    }

    /// Send the request, ignoring any response body
    pub(crate) fn execute(&self, req: RequestBuilder) -> Result<()> {
        let resp = check_status(req.send()?)?;
        debug!("status: {}", resp.status());
        Ok(())
    }

    /// Start downloading a file. The body is left unread for the caller to stream.
    pub fn download(&self, url: &str) -> Result<Response> {
        check_status(self.http.get(url).send()?)
    }
}

/// Turn non-2xx responses into [`Error::Status`], using the backend's message if it gave one
pub(crate) fn check_status(resp: Response) -> Result<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let body = resp.text().unwrap_or_default();
    Err(Error::Status {
        status,
        message: error_message(status, &body),
    })
}

fn error_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message.or(b.error))
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| {
            format!(
                "request failed with status {} {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("")
            )
            .trim_end()
            .to_string()
        })
}
