//! Alert dispatch

pub mod telegram;

pub use telegram::TelegramNotifier;

use crate::error::AlertError;
use async_trait::async_trait;

/// Destination for rendered alerts
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, text: &str) -> Result<(), AlertError>;
    fn name(&self) -> &str;
}
