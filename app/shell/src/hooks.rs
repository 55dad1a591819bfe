//! Console implementations of the navigation and alert hooks.

use std::sync::atomic::{AtomicBool, Ordering};

use movies_core::host::{AlertSink, Navigator};

/// Terminal stand-in for the navigation stack and the alert dialog.
#[derive(Debug, Default)]
pub struct ConsoleHost {
    login_required: AtomicBool,
}

impl ConsoleHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// True once the backend rejected the session, until the next login.
    pub fn login_required(&self) -> bool {
        self.login_required.load(Ordering::SeqCst)
    }

    pub fn clear_login_required(&self) {
        self.login_required.store(false, Ordering::SeqCst);
    }
}

impl Navigator for ConsoleHost {
    fn redirect_to_login(&self) {
        self.login_required.store(true, Ordering::SeqCst);
        tracing::info!("redirecting to login");
        eprintln!("Session expired. Log in again with `login <email> <password>`.");
    }
}

impl AlertSink for ConsoleHost {
    fn show_alert(&self, title: &str, message: &str) {
        tracing::debug!(title, "alert shown");
        eprintln!("[!] {title}: {message}");
    }
}
