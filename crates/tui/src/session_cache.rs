use std::{
    fs::{self, File},
    io,
};

use anyhow::{anyhow, Context, Result};
use catalog_client::Session;
use serde::{Deserialize, Serialize};
use xdg::BaseDirectories;

use crate::config::APP_NAME;

const FILE_NAME: &str = "session.json";

/// The admin session token, kept between runs until the user logs out
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionCache {
    session: Session,
}

impl SessionCache {
    pub fn new(session: Session) -> Self {
        Self { session }
    }

    pub fn into_session(self) -> Session {
        self.session
    }

    pub fn load() -> Result<Self> {
        let path = BaseDirectories::with_prefix(APP_NAME)?
            .find_cache_file(FILE_NAME)
            .ok_or_else(|| anyhow!("session cache does not exist"))?;

        let file = File::open(path).context("error opening session cache")?;
        let cache = serde_json::from_reader(&file).context("error deserialising session cache")?;

        Ok(cache)
    }

    pub fn save(&self) -> Result<()> {
        let path = BaseDirectories::with_prefix(APP_NAME)?.place_cache_file(FILE_NAME)?;

        let mut file = File::create(path).context("error opening session cache")?;
        serde_json::to_writer(&mut file, &self).context("error serialising session cache")?;

        Ok(())
    }

    /// Remove the cached session, if there is one
    pub fn clear() -> Result<()> {
        let Some(path) = BaseDirectories::with_prefix(APP_NAME)?.find_cache_file(FILE_NAME) else {
            return Ok(());
        };

        match fs::remove_file(path) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => {
                Err(e).context("error removing session cache")
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_json() {
        let json = serde_json::to_string(&SessionCache::new(Session::new("tok"))).unwrap();
        let back: SessionCache = serde_json::from_str(&json).unwrap();
        assert_eq!(back.into_session(), Session::new("tok"));
    }
}
