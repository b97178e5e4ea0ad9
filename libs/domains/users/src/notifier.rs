use async_trait::async_trait;

use crate::error::UserResult;
use crate::models::{User, UserId, UserPatch};

/// Outbound hook fired after a write has been committed.
///
/// A failing notification does not roll back the write; the use case reports
/// the error to its caller.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserNotifier: Send + Sync {
    async fn notify_user_added(&self, user: &User) -> UserResult<()>;

    async fn notify_user_updated(&self, id: UserId, patch: &UserPatch) -> UserResult<()>;

    async fn notify_user_deleted(&self, id: UserId) -> UserResult<()>;
}

/// Notifier that does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNotifier;

#[async_trait]
impl UserNotifier for NoopNotifier {
    async fn notify_user_added(&self, _user: &User) -> UserResult<()> {
        Ok(())
    }

    async fn notify_user_updated(&self, _id: UserId, _patch: &UserPatch) -> UserResult<()> {
        Ok(())
    }

    async fn notify_user_deleted(&self, _id: UserId) -> UserResult<()> {
        Ok(())
    }
}

/// Notifier that emits one `info` event per change.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

#[async_trait]
impl UserNotifier for TracingNotifier {
    async fn notify_user_added(&self, user: &User) -> UserResult<()> {
        tracing::info!(
            event = "user_added",
            user_id = %user.id,
            country = %user.state.info.country,
            "user added"
        );
        Ok(())
    }

    async fn notify_user_updated(&self, id: UserId, patch: &UserPatch) -> UserResult<()> {
        tracing::info!(event = "user_updated", user_id = %id, ?patch, "user updated");
        Ok(())
    }

    async fn notify_user_deleted(&self, id: UserId) -> UserResult<()> {
        tracing::info!(event = "user_deleted", user_id = %id, "user deleted");
        Ok(())
    }
}
