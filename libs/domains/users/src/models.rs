use chrono::{DateTime, Utc};
use std::fmt;
use uuid::Uuid;

pub type UserId = Uuid;

/// Page size used when a list request does not ask for one.
pub const DEFAULT_PAGE_SIZE: u64 = 100;

#[derive(Clone, PartialEq, Eq)]
pub struct UserCredentials {
    /// Hex encoded SHA-256 digest, hashed by the caller.
    pub password_hash: String,
    pub email: String,
}

impl fmt::Debug for UserCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserCredentials")
            .field("password_hash", &"<redacted>")
            .field("email", &self.email)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserInfo {
    pub first_name: String,
    pub last_name: String,
    pub nickname: Option<String>,
    /// ISO 3166-1 alpha-2 code.
    pub country: String,
}

/// Everything about a user except identity and timestamps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserState {
    pub credentials: UserCredentials,
    pub info: UserInfo,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub state: UserState,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert payload. The store assigns the id when `id` is `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub id: Option<UserId>,
    pub state: UserState,
}

/// Fields to change on an existing user; `None` leaves the column untouched.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct UserPatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub nickname: Option<String>,
    pub password_hash: Option<String>,
    pub email: Option<String>,
    pub country: Option<String>,
}

impl UserPatch {
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.nickname.is_none()
            && self.password_hash.is_none()
            && self.email.is_none()
            && self.country.is_none()
    }

    /// Applies the patch to `state` in place.
    pub fn apply_to(&self, state: &mut UserState) {
        if let Some(v) = &self.first_name {
            state.info.first_name = v.clone();
        }
        if let Some(v) = &self.last_name {
            state.info.last_name = v.clone();
        }
        if let Some(v) = &self.nickname {
            state.info.nickname = Some(v.clone());
        }
        if let Some(v) = &self.country {
            state.info.country = v.clone();
        }
        if let Some(v) = &self.password_hash {
            state.credentials.password_hash = v.clone();
        }
        if let Some(v) = &self.email {
            state.credentials.email = v.clone();
        }
    }
}

impl fmt::Debug for UserPatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserPatch")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("nickname", &self.nickname)
            .field(
                "password_hash",
                &self.password_hash.as_ref().map(|_| "<redacted>"),
            )
            .field("email", &self.email)
            .field("country", &self.country)
            .finish()
    }
}
