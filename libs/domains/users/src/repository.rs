use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{UserError, UserResult};
use crate::models::{NewUser, User, UserId, UserPatch};

/// Repository trait for User persistence
///
/// Implementations classify storage faults into [`UserError`] kinds: a
/// uniqueness conflict is `AlreadyExists`, a write that matched no row is
/// `NotFound`, anything else is `Internal`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a user, returning it with the store-assigned id and timestamps
    async fn create(&self, user: NewUser) -> UserResult<User>;

    /// Write the fields present in `patch`; the patch must not be empty
    async fn update(&self, id: UserId, patch: UserPatch) -> UserResult<()>;

    /// Hard delete
    async fn delete(&self, id: UserId) -> UserResult<()>;

    /// Users of `country`, at most `limit` of them starting at `offset`
    async fn list_by_country(
        &self,
        country: String,
        limit: u64,
        offset: u64,
    ) -> UserResult<Vec<User>>;
}

/// In-memory repository keeping users in insertion order
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<Vec<User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }

    pub async fn get(&self, id: UserId) -> Option<User> {
        self.users.read().await.iter().find(|u| u.id == id).cloned()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, new_user: NewUser) -> UserResult<User> {
        let mut users = self.users.write().await;

        let id = new_user.id.unwrap_or_else(Uuid::new_v4);
        if users.iter().any(|u| u.id == id) {
            return Err(UserError::AlreadyExists(format!("id {id} is taken")));
        }
        let email = &new_user.state.credentials.email;
        if users.iter().any(|u| &u.state.credentials.email == email) {
            return Err(UserError::AlreadyExists(format!("email {email} is taken")));
        }

        let now = Utc::now();
        let user = User {
            id,
            state: new_user.state,
            created_at: now,
            updated_at: now,
        };
        users.push(user.clone());
        Ok(user)
    }

    async fn update(&self, id: UserId, patch: UserPatch) -> UserResult<()> {
        let mut users = self.users.write().await;

        // A missing row wins over a conflicting email, as with an UPDATE matching nothing.
        let index = users
            .iter()
            .position(|u| u.id == id)
            .ok_or(UserError::NotFound(id))?;

        if let Some(email) = &patch.email
            && users
                .iter()
                .any(|u| u.id != id && &u.state.credentials.email == email)
        {
            return Err(UserError::AlreadyExists(format!("email {email} is taken")));
        }

        let user = &mut users[index];
        patch.apply_to(&mut user.state);
        user.updated_at = Utc::now();
        Ok(())
    }

    async fn delete(&self, id: UserId) -> UserResult<()> {
        let mut users = self.users.write().await;
        let index = users
            .iter()
            .position(|u| u.id == id)
            .ok_or(UserError::NotFound(id))?;
        users.remove(index);
        Ok(())
    }

    async fn list_by_country(
        &self,
        country: String,
        limit: u64,
        offset: u64,
    ) -> UserResult<Vec<User>> {
        let users = self.users.read().await;
        Ok(users
            .iter()
            .filter(|u| u.state.info.country == country)
            .skip(usize::try_from(offset).unwrap_or(usize::MAX))
            .take(usize::try_from(limit).unwrap_or(usize::MAX))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{UserCredentials, UserInfo, UserState};

    fn new_user(email: &str, country: &str) -> NewUser {
        NewUser {
            id: None,
            state: UserState {
                credentials: UserCredentials {
                    password_hash: "ab".repeat(32),
                    email: email.to_string(),
                },
                info: UserInfo {
                    first_name: "Alice".into(),
                    last_name: "Bob".into(),
                    nickname: None,
                    country: country.to_string(),
                },
            },
        }
    }

    #[tokio::test]
    async fn test_create_assigns_id_and_timestamps() {
        let repo = InMemoryUserRepository::new();
        let user = repo.create(new_user("alice@bob.com", "UK")).await.unwrap();

        assert!(!user.id.is_nil());
        assert_eq!(user.created_at, user.updated_at);
        assert_eq!(repo.len().await, 1);
    }

    #[tokio::test]
    async fn test_duplicate_email_and_id_conflict() {
        let repo = InMemoryUserRepository::new();
        let first = repo.create(new_user("alice@bob.com", "UK")).await.unwrap();

        let err = repo.create(new_user("alice@bob.com", "DE")).await.unwrap_err();
        assert!(matches!(err, UserError::AlreadyExists(_)));

        let mut same_id = new_user("carol@bob.com", "UK");
        same_id.id = Some(first.id);
        let err = repo.create(same_id).await.unwrap_err();
        assert!(matches!(err, UserError::AlreadyExists(_)));

        assert_eq!(repo.get(first.id).await.unwrap(), first);
    }

    #[tokio::test]
    async fn test_update_missing_user_is_not_found() {
        let repo = InMemoryUserRepository::new();
        let id = Uuid::new_v4();
        let patch = UserPatch {
            first_name: Some("Eve".into()),
            ..Default::default()
        };

        let err = repo.update(id, patch).await.unwrap_err();
        assert!(matches!(err, UserError::NotFound(missing) if missing == id));
        assert!(repo.is_empty().await);
    }

    #[tokio::test]
    async fn test_update_to_taken_email_conflicts() {
        let repo = InMemoryUserRepository::new();
        repo.create(new_user("alice@bob.com", "UK")).await.unwrap();
        let carol = repo.create(new_user("carol@bob.com", "UK")).await.unwrap();

        let patch = UserPatch {
            email: Some("alice@bob.com".into()),
            ..Default::default()
        };
        let err = repo.update(carol.id, patch).await.unwrap_err();
        assert!(matches!(err, UserError::AlreadyExists(_)));
    }

    #[tokio::test]
    async fn test_update_missing_user_with_taken_email_is_not_found() {
        let repo = InMemoryUserRepository::new();
        repo.create(new_user("alice@bob.com", "UK")).await.unwrap();
        let id = Uuid::new_v4();

        let patch = UserPatch {
            email: Some("alice@bob.com".into()),
            ..Default::default()
        };
        let err = repo.update(id, patch).await.unwrap_err();
        assert!(matches!(err, UserError::NotFound(missing) if missing == id));
    }

    #[tokio::test]
    async fn test_delete_twice() {
        let repo = InMemoryUserRepository::new();
        let user = repo.create(new_user("alice@bob.com", "UK")).await.unwrap();

        repo.delete(user.id).await.unwrap();
        let err = repo.delete(user.id).await.unwrap_err();
        assert!(matches!(err, UserError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_list_filters_and_pages_in_insertion_order() {
        let repo = InMemoryUserRepository::new();
        let a = repo.create(new_user("a@x.com", "UK")).await.unwrap();
        repo.create(new_user("b@x.com", "DE")).await.unwrap();
        let c = repo.create(new_user("c@x.com", "UK")).await.unwrap();
        let d = repo.create(new_user("d@x.com", "UK")).await.unwrap();

        let page = repo.list_by_country("UK".into(), 2, 0).await.unwrap();
        assert_eq!(page.iter().map(|u| u.id).collect::<Vec<_>>(), vec![a.id, c.id]);

        let page = repo.list_by_country("UK".into(), 2, 2).await.unwrap();
        assert_eq!(page.iter().map(|u| u.id).collect::<Vec<_>>(), vec![d.id]);

        assert!(repo.list_by_country("FR".into(), 2, 0).await.unwrap().is_empty());
    }
}
