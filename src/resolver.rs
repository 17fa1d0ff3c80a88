//! Resolution of subscription references against the directory service

use crate::types::{ResolveError, SubscriptionRecord, SubscriptionRef};
use async_trait::async_trait;
use tracing::debug;

/// Capability that turns a subscription reference into a full record.
/// One call per reference, one outcome per call.
#[async_trait]
pub trait Resolve: Send + Sync {
    async fn resolve(
        &self,
        reference: &SubscriptionRef,
    ) -> Result<SubscriptionRecord, ResolveError>;
}

/// Resolver backed by the directory service HTTP API.
pub struct DirectoryResolver {
    client: reqwest::Client,
    base_url: String,
}

impl DirectoryResolver {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl Resolve for DirectoryResolver {
    async fn resolve(
        &self,
        reference: &SubscriptionRef,
    ) -> Result<SubscriptionRecord, ResolveError> {
        let url = format!(
            "{}/resolve/{}",
            self.base_url.trim_end_matches('/'),
            reference
        );
        debug!(url = %url, "Resolving subscription");
        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(ResolveError::Status(response.status()));
        }
        Ok(response.json::<SubscriptionRecord>().await?)
    }
}
