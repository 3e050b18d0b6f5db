//! Subscription limits repository trait definition.

use giftafy_types::account::{SubscriptionLimits, SubscriptionTier};
use giftafy_types::error::RepositoryError;

/// Read access to the per-tier limits table.
pub trait SubscriptionRepository: Send + Sync {
    fn get_limits(
        &self,
        tier: SubscriptionTier,
    ) -> impl std::future::Future<Output = Result<Option<SubscriptionLimits>, RepositoryError>> + Send;

    /// Every tier's limits, cheapest first.
    fn list_limits(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<SubscriptionLimits>, RepositoryError>> + Send;
}
