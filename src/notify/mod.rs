// src/notify/mod.rs
mod alert;
mod notifier;
mod ses;

pub use alert::Alert;
pub use notifier::{LogNotifier, Notifier, NotifyError};
pub use ses::SesNotifier;
