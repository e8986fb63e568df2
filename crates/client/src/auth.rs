//! Admin login and the session it produces
use log::{debug, warn};
use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::{Client, Error, Result};

/// Information used to login
#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: Password,
}

#[derive(Deserialize)]
struct LoginResp {
    token: Option<String>,
}

impl Client {
    /// Exchange admin credentials for a session token.
    ///
    /// Every failure is reported as [`Error::LoginFailed`], so the reason can't leak to the user.
    pub fn login(&self, creds: &Credentials) -> Result<Session> {
        let resp = self
            .fetch::<LoginResp>(self.request(Method::POST, "admin/login").json(creds))
            .map_err(|e| {
                warn!("login failed: {}", e);
                Error::LoginFailed
            })?;

        match resp.token {
            Some(t) if !t.is_empty() => {
                debug!("logged in as {}", creds.username);
                Ok(Session(t))
            }
            _ => {
                warn!("login response had no token");
                Err(Error::LoginFailed)
            }
        }
    }
}

/// An opaque token proving admin identity to the backend.
/// There is no expiry, it is used until it is thrown away.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session(String);

impl Session {
    pub fn new(token: impl Into<String>) -> Self {
        Session(token.into())
    }

    /// The raw header value to send
    pub fn token(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Session (***)")
    }
}

/// A password, wrapped so we don't print it by accident
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct Password(String);
impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Password (******)")
    }
}

impl From<String> for Password {
    fn from(value: String) -> Self {
        Password(value)
    }
}

impl AsRef<str> for Password {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}
