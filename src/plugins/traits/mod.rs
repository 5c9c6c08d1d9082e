pub mod tracker;
pub mod notifier;

pub use tracker::TrackerPlugin;
pub use notifier::{MailSession, MailTransport, NotificationResult, NotifierPlugin, SessionState};
