//! Cookie jar that outlives the process
//!
//! The backend hands out its refresh credential as a cookie. Whatever the jar
//! would send to the refresh endpoint is mirrored into the key/value store,
//! so a later process can refresh a session it did not log in.

use reqwest::cookie::{CookieStore, Jar};
use reqwest::header::HeaderValue;
use staynest_core::{KeyValueStore, keys};
use std::sync::Arc;
use tracing::{debug, warn};
use url::Url;

pub(crate) struct PersistentJar {
    jar: Jar,
    storage: Arc<dyn KeyValueStore>,
    refresh_url: Url,
}

impl PersistentJar {
    /// Seed a jar with the cookies saved by an earlier run
    pub(crate) fn restore(storage: Arc<dyn KeyValueStore>, refresh_url: Url) -> Self {
        let jar = Jar::default();
        match storage.get(keys::REFRESH_COOKIE) {
            Ok(Some(saved)) => {
                for pair in saved.split(';').map(str::trim).filter(|pair| !pair.is_empty()) {
                    jar.add_cookie_str(pair, &refresh_url);
                }
                debug!("Restored refresh cookie");
            }
            Ok(None) => {}
            Err(e) => warn!("Failed to read stored refresh cookie: {e}"),
        }
        Self {
            jar,
            storage,
            refresh_url,
        }
    }

    fn persist(&self) {
        let result = match self.jar.cookies(&self.refresh_url) {
            Some(header) => match header.to_str() {
                Ok(value) => self.storage.set(keys::REFRESH_COOKIE, value),
                Err(_) => {
                    warn!("Refresh cookie is not valid text, not saving it");
                    return;
                }
            },
            None => self.storage.remove(keys::REFRESH_COOKIE),
        };
        if let Err(e) = result {
            warn!("Failed to save refresh cookie: {e}");
        }
    }
}

impl CookieStore for PersistentJar {
    fn set_cookies(&self, cookie_headers: &mut dyn Iterator<Item = &HeaderValue>, url: &Url) {
        self.jar.set_cookies(cookie_headers, url);
        self.persist();
    }

    fn cookies(&self, url: &Url) -> Option<HeaderValue> {
        self.jar.cookies(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use staynest_core::MemoryStore;

    fn refresh_url() -> Url {
        Url::parse("http://localhost:8080/api/v1/auth/refresh").unwrap()
    }

    #[test]
    fn test_set_cookie_is_saved_and_restored() {
        let storage: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let jar = PersistentJar::restore(storage.clone(), refresh_url());

        let login = Url::parse("http://localhost:8080/api/v1/auth/login").unwrap();
        let header = HeaderValue::from_static("refreshToken=abc; Path=/; HttpOnly");
        jar.set_cookies(&mut std::iter::once(&header), &login);

        assert_eq!(
            storage.get(keys::REFRESH_COOKIE).unwrap().as_deref(),
            Some("refreshToken=abc")
        );

        let restored = PersistentJar::restore(storage, refresh_url());
        let sent = restored.cookies(&refresh_url()).unwrap();
        assert_eq!(sent.to_str().unwrap(), "refreshToken=abc");
    }

    #[test]
    fn test_empty_store_sends_no_cookie() {
        let jar = PersistentJar::restore(Arc::new(MemoryStore::new()), refresh_url());
        assert!(jar.cookies(&refresh_url()).is_none());
    }
}
