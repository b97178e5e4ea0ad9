use std::sync::Arc;
use tracing::instrument;

use crate::error::UserResult;
use crate::models::{NewUser, User, UserId, UserPatch};
use crate::notifier::UserNotifier;
use crate::repository::UserRepository;
use crate::validation::ListUsersQuery;

/// Use cases over user accounts.
///
/// Inputs arrive already validated (see [`crate::validation`]). Writes go to
/// the repository first and the notifier second.
pub struct UserService<R: UserRepository, N: UserNotifier> {
    repository: Arc<R>,
    notifier: Arc<N>,
}

impl<R: UserRepository, N: UserNotifier> Clone for UserService<R, N> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            notifier: Arc::clone(&self.notifier),
        }
    }
}

impl<R: UserRepository, N: UserNotifier> UserService<R, N> {
    pub fn new(repository: R, notifier: N) -> Self {
        Self {
            repository: Arc::new(repository),
            notifier: Arc::new(notifier),
        }
    }

    /// Create an account and return its id
    #[instrument(skip(self, user), fields(use_case = "add_user", user_id))]
    pub async fn add_user(&self, user: NewUser) -> UserResult<UserId> {
        let user = self
            .repository
            .create(user)
            .await
            .map_err(|e| e.context("add user"))?;
        tracing::Span::current().record("user_id", tracing::field::display(user.id));
        tracing::debug!(user_id = %user.id, "user added");

        self.notifier
            .notify_user_added(&user)
            .await
            .map_err(|e| e.context("add user"))?;
        tracing::debug!(user_id = %user.id, "user added notification sent");

        Ok(user.id)
    }

    /// Apply a partial update; an empty patch succeeds without touching storage
    #[instrument(skip(self, patch), fields(use_case = "update_user", user_id = %id))]
    pub async fn update_user(&self, id: UserId, patch: UserPatch) -> UserResult<()> {
        if patch.is_empty() {
            tracing::debug!("empty patch, nothing to update");
            return Ok(());
        }

        self.repository
            .update(id, patch.clone())
            .await
            .map_err(|e| e.context("update user"))?;
        tracing::debug!("user updated");

        self.notifier
            .notify_user_updated(id, &patch)
            .await
            .map_err(|e| e.context("update user"))?;
        tracing::debug!("user updated notification sent");

        Ok(())
    }

    #[instrument(skip(self), fields(use_case = "delete_user", user_id = %id))]
    pub async fn delete_user(&self, id: UserId) -> UserResult<()> {
        self.repository
            .delete(id)
            .await
            .map_err(|e| e.context("delete user"))?;
        tracing::debug!("user deleted");

        self.notifier
            .notify_user_deleted(id)
            .await
            .map_err(|e| e.context("delete user"))?;
        tracing::debug!("user deleted notification sent");

        Ok(())
    }

    /// One page of users in a country
    #[instrument(
        skip(self, query),
        fields(use_case = "list_users_by_country", country = %query.country)
    )]
    pub async fn list_users_by_country(&self, query: ListUsersQuery) -> UserResult<Vec<User>> {
        let users = self
            .repository
            .list_by_country(query.country, query.page.limit, query.page.offset)
            .await
            .map_err(|e| e.context("list users by country"))?;
        tracing::debug!(count = users.len(), "users listed");
        Ok(users)
    }
}
