use async_trait::async_trait;

use crate::errors::SmsError;

/// Sends a templated message to one or more recipients
///
/// Providers and the resilience decorators layered over them all implement
/// this trait, so a composed pipeline is used exactly like a single provider.
#[async_trait]
pub trait MessageGateway: Send + Sync {
    /// Send `template_id` rendered with `args` to every recipient
    async fn send(&self, template_id: &str, args: &[String], recipients: &[String]) -> Result<(), SmsError>;

    /// Name used in logs
    fn provider_name(&self) -> &str;
}
