//! Hook for sending the user back to the login screen

use tracing::info;

/// Called once credentials have been cleared after a failed refresh
#[cfg_attr(test, mockall::automock)]
pub trait LoginRedirect: Send + Sync {
    fn redirect_to_login(&self);
}

/// Default hook that only records the event in the log
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRedirect;

impl LoginRedirect for NoRedirect {
    fn redirect_to_login(&self) {
        info!("Session ended, login required");
    }
}
