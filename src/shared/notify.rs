use super::messages::OutboundMessage;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NotifyOptions {
    pub error: bool,
}

/// Host toast channel. Fire-and-forget; used for confirmations and every
/// user-visible failure.
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str, options: NotifyOptions);

    fn notify_error(&self, message: &str) {
        tracing::warn!("[Notify] {}", message);
        self.notify(message, NotifyOptions { error: true });
    }
}

/// Port for messages going from the plugin core to its UI.
pub trait UiChannel: Send + Sync {
    fn post_message(&self, message: OutboundMessage);
}
