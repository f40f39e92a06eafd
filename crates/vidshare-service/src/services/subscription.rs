//! Subscription service
//!
//! Toggles a user's subscription to a channel. The channel side (subscriber
//! set and counter, one mutation) is written first, the user's subscribed-to
//! set second. A failure between the two leaves the user under-linked and is
//! reported as [`ServiceError::Incomplete`].

use tracing::{error, info, instrument};
use vidshare_core::{DomainError, Snowflake};

use crate::dto::{ChannelSummaryResponse, SubscriptionResponse};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Subscription service
pub struct SubscriptionService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> SubscriptionService<'a> {
    /// Create a new SubscriptionService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Subscribe `user_id` to the channel, or unsubscribe if already subscribed
    #[instrument(skip(self))]
    pub async fn toggle_subscription(
        &self,
        channel_id: Snowflake,
        user_id: Snowflake,
    ) -> ServiceResult<SubscriptionResponse> {
        let channel = self
            .ctx
            .channel_repo()
            .find_by_id(channel_id)
            .await?
            .ok_or(DomainError::ChannelNotFound(channel_id))?;

        if channel.is_owner(user_id) {
            return Err(DomainError::SelfSubscription.into());
        }

        self.ctx
            .user_repo()
            .find_by_id(user_id)
            .await?
            .ok_or(DomainError::UserNotFound(user_id))?;

        let subscribe = !channel.has_subscriber(user_id);
        let update = if subscribe {
            self.ctx
                .channel_repo()
                .add_subscriber(channel_id, user_id)
                .await?
        } else {
            self.ctx
                .channel_repo()
                .remove_subscriber(channel_id, user_id)
                .await?
        };

        let linked = if subscribe {
            self.ctx
                .user_repo()
                .add_subscription(user_id, channel_id)
                .await
        } else {
            self.ctx
                .user_repo()
                .remove_subscription(user_id, channel_id)
                .await
        };
        if let Err(e) = linked {
            error!(
                channel_id = %channel_id,
                user_id = %user_id,
                subscribe,
                error = %e,
                "Channel updated but user subscription list was not"
            );
            return Err(ServiceError::incomplete("update user subscriptions", e));
        }

        info!(
            channel_id = %channel_id,
            user_id = %user_id,
            subscribed = subscribe,
            changed = update.changed,
            subscriber_count = update.count,
            "Subscription toggled"
        );

        Ok(SubscriptionResponse {
            subscribed: subscribe,
            subscriber_count: update.count,
        })
    }

    /// Channels the user is subscribed to, in subscription order.
    ///
    /// Ids whose channel no longer exists are skipped.
    #[instrument(skip(self))]
    pub async fn list_subscriptions(
        &self,
        user_id: Snowflake,
    ) -> ServiceResult<Vec<ChannelSummaryResponse>> {
        let user = self
            .ctx
            .user_repo()
            .find_by_id(user_id)
            .await?
            .ok_or(DomainError::UserNotFound(user_id))?;

        let channels = self
            .ctx
            .channel_repo()
            .find_by_ids(&user.subscribed_channel_ids)
            .await?;

        Ok(user
            .subscribed_channel_ids
            .iter()
            .filter_map(|id| channels.iter().find(|c| c.id == *id))
            .map(ChannelSummaryResponse::from)
            .collect())
    }
}
