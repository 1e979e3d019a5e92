//! Process-wide holder of the current user

use crate::error::CoreResult;
use crate::identity::{SessionUser, decode_access_token};
use crate::storage::{Credentials, KeyValueStore, keys};
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, info};

/// Current-user state, restored from persisted storage at startup.
///
/// Shared behind an `Arc`; the HTTP client writes credentials to the same
/// store, so [`Session::reload`] picks up a logout forced by a failed refresh.
pub struct Session {
    store: Arc<dyn KeyValueStore>,
    user: RwLock<Option<SessionUser>>,
}

impl Session {
    /// Populate the session from whatever user was persisted last time
    pub fn restore(store: Arc<dyn KeyValueStore>) -> CoreResult<Self> {
        let user = Credentials::new(store.as_ref()).user()?;
        match &user {
            Some(user) => debug!("Restored session for {}", user.display_name()),
            None => debug!("No stored session"),
        }
        Ok(Self {
            store,
            user: RwLock::new(user),
        })
    }

    pub fn store(&self) -> &Arc<dyn KeyValueStore> {
        &self.store
    }

    pub fn current(&self) -> Option<SessionUser> {
        self.user
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Adopt a freshly issued access token: decode it, persist token and user
    pub fn login(&self, access_token: &str) -> CoreResult<SessionUser> {
        let user = decode_access_token(access_token)?;
        let credentials = Credentials::new(self.store.as_ref());
        credentials.set_access_token(access_token)?;
        credentials.set_user(&user)?;

        info!(
            "Logged in as {} ({})",
            user.display_name(),
            user.role.as_ref().map_or("no role", |role| role.as_str())
        );
        *self.user.write().unwrap_or_else(PoisonError::into_inner) = Some(user.clone());
        Ok(user)
    }

    /// Forget the user, the access token and the refresh cookie
    pub fn logout(&self) -> CoreResult<()> {
        Credentials::new(self.store.as_ref()).clear()?;
        self.store.remove(keys::REFRESH_COOKIE)?;
        *self.user.write().unwrap_or_else(PoisonError::into_inner) = None;
        info!("Logged out");
        Ok(())
    }

    /// Re-read the persisted user after something else touched the store
    pub fn reload(&self) -> CoreResult<Option<SessionUser>> {
        let user = Credentials::new(self.store.as_ref()).user()?;
        (*self.user.write().unwrap_or_else(PoisonError::into_inner)).clone_from(&user);
        Ok(user)
    }
}
