//! HTTP SMS provider
//!
//! Posts a JSON payload to a provider endpoint. Responses are classified so
//! the decorators can react by kind: 429 is throttling, a request timeout is
//! a timeout, everything else is a plain provider failure.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use tracing::{debug, error, info, warn};

use re_core::errors::SmsError;
use re_core::services::MessageGateway;
use re_shared::config::ProviderConfig;
use re_shared::utils::phone::mask_recipients;

use crate::InfrastructureError;

/// Request body sent to the provider
#[derive(Debug, Serialize)]
struct SendRequest<'a> {
    template_id: &'a str,
    args: &'a [String],
    recipients: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    sign_name: Option<&'a str>,
}

/// SMS provider reached over HTTP
pub struct HttpGateway {
    name: String,
    endpoint: String,
    api_key: Option<String>,
    sign_name: Option<String>,
    client: Client,
}

impl HttpGateway {
    /// Create a gateway from provider configuration
    ///
    /// Fails when the provider has no endpoint or the HTTP client cannot be built.
    pub fn new(config: &ProviderConfig) -> Result<Self, InfrastructureError> {
        let endpoint = config.endpoint.clone().ok_or_else(|| {
            InfrastructureError::Config(format!("SMS provider '{}' has no endpoint", config.name))
        })?;

        let client = Client::builder().timeout(config.timeout()).build()?;

        info!(
            provider = %config.name,
            timeout_ms = config.timeout_ms,
            "Created HTTP SMS provider"
        );

        Ok(Self {
            name: config.name.clone(),
            endpoint,
            api_key: config.api_key.clone(),
            sign_name: config.sign_name.clone(),
            client,
        })
    }

    fn classify(&self, err: reqwest::Error) -> SmsError {
        if err.is_timeout() {
            SmsError::Timeout {
                provider: self.name.clone(),
            }
        } else {
            SmsError::provider(&self.name, err.to_string())
        }
    }
}

#[async_trait]
impl MessageGateway for HttpGateway {
    async fn send(&self, template_id: &str, args: &[String], recipients: &[String]) -> Result<(), SmsError> {
        let body = SendRequest {
            template_id,
            args,
            recipients,
            sign_name: self.sign_name.as_deref(),
        };

        let mut request = self.client.post(&self.endpoint).json(&body);
        if let Some(api_key) = &self.api_key {
            request = request.bearer_auth(api_key);
        }

        let response = request.send().await.map_err(|e| {
            error!(provider = %self.name, error = %e, "SMS request failed");
            self.classify(e)
        })?;

        let status = response.status();
        if status.is_success() {
            debug!(
                provider = %self.name,
                phone = %mask_recipients(recipients),
                template_id = template_id,
                "SMS accepted by provider"
            );
            return Ok(());
        }

        if status == StatusCode::TOO_MANY_REQUESTS {
            warn!(provider = %self.name, "SMS provider is throttling");
            return Err(SmsError::Throttled {
                resource: self.name.clone(),
            });
        }

        let detail = response.text().await.unwrap_or_default();
        error!(provider = %self.name, status = %status, detail = %detail, "SMS provider rejected request");
        Err(SmsError::provider(&self.name, format!("HTTP {}: {}", status, detail)))
    }

    fn provider_name(&self) -> &str {
        &self.name
    }
}
