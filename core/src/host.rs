//! Capabilities the hosting UI lends to the engine.

/// Moves the user to the login screen when the session is rejected.
pub trait Navigator: Send + Sync {
    fn redirect_to_login(&self);
}

/// Presents a blocking, user-facing message.
pub trait AlertSink: Send + Sync {
    fn show_alert(&self, title: &str, message: &str);
}
