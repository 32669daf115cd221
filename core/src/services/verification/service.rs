//! Main verification service implementation

use rand::{rngs::OsRng, Rng};
use re_shared::config::VerificationConfig;
use re_shared::utils::phone::mask_phone;
use std::sync::Arc;

use crate::domain::entities::code_record::CODE_LENGTH;
use crate::errors::{DomainError, DomainResult};
use crate::repositories::code::CodeStore;
use crate::services::sms::MessageGateway;

/// Generate a uniformly distributed, zero-padded 6-digit code from the OS CSPRNG
pub fn generate_code() -> String {
    let code: u32 = OsRng.gen_range(0..1_000_000);
    format!("{:0width$}", code, width = CODE_LENGTH)
}

/// Verification service for issuing and checking SMS verification codes
pub struct CodeService<C: CodeStore + ?Sized, G: MessageGateway + ?Sized> {
    /// Store enforcing cooldown and attempt limits
    store: Arc<C>,
    /// Gateway delivering the code, usually a decorated provider pipeline
    gateway: Arc<G>,
    /// Service configuration
    config: VerificationConfig,
}

impl<C: CodeStore + ?Sized, G: MessageGateway + ?Sized> CodeService<C, G> {
    /// Create a new verification service
    ///
    /// # Arguments
    ///
    /// * `store` - Code store implementation
    /// * `gateway` - Message gateway implementation
    /// * `config` - Template id and code lifetime shown to the user
    pub fn new(store: Arc<C>, gateway: Arc<G>, config: VerificationConfig) -> Self {
        Self {
            store,
            gateway,
            config,
        }
    }

    /// Issue a new code for `phone` and send it
    ///
    /// This method:
    /// 1. Validates the business scope and phone number
    /// 2. Generates a new code
    /// 3. Stores it, failing with `SendTooFrequent` inside the cooldown
    /// 4. Sends it with the code and its validity in minutes as template args
    ///
    /// # Returns
    ///
    /// * `Ok(())` - Code stored and handed to the gateway
    /// * `Err(DomainError::Code)` - The store refused or failed
    /// * `Err(DomainError::Sms)` - The gateway failed; the stored code stays valid
    pub async fn send(&self, business: &str, phone: &str) -> DomainResult<()> {
        validate_target(business, phone)?;
        let masked = mask_phone(phone);

        let code = generate_code();
        if let Err(e) = self.store.issue_code(business, phone, &code).await {
            tracing::warn!(
                business = business,
                phone = %masked,
                error = %e,
                event = "code_issue_rejected",
                "Verification code was not issued"
            );
            return Err(e.into());
        }

        tracing::info!(
            business = business,
            phone = %masked,
            event = "code_issued",
            "Issued new verification code"
        );

        let args = [code, self.config.code_ttl_minutes().to_string()];
        let recipients = [phone.to_string()];
        self.gateway
            .send(&self.config.template_id, &args, &recipients)
            .await
            .map_err(|e| {
                tracing::error!(
                    business = business,
                    phone = %masked,
                    provider = self.gateway.provider_name(),
                    error = %e,
                    event = "code_delivery_failed",
                    "Failed to send verification code"
                );
                DomainError::from(e)
            })?;

        tracing::debug!(
            business = business,
            phone = %masked,
            event = "code_sent",
            "Verification code handed to gateway"
        );
        Ok(())
    }

    /// Check `code` against the live code for `phone`
    ///
    /// A mismatch is `Ok(false)`; store errors are returned unchanged.
    pub async fn verify(&self, business: &str, phone: &str, code: &str) -> DomainResult<bool> {
        validate_target(business, phone)?;

        let matched = self.store.verify_code(business, phone, code).await?;
        tracing::info!(
            business = business,
            phone = %mask_phone(phone),
            matched = matched,
            event = "code_verified",
            "Verification code checked"
        );
        Ok(matched)
    }
}

fn validate_target(business: &str, phone: &str) -> DomainResult<()> {
    if business.trim().is_empty() {
        return Err(DomainError::Validation {
            message: "business must not be empty".to_string(),
        });
    }
    if phone.trim().is_empty() {
        return Err(DomainError::Validation {
            message: "phone must not be empty".to_string(),
        });
    }
    Ok(())
}
