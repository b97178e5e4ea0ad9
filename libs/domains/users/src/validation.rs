//! Inbound request validation.
//!
//! Inputs mirror the wire messages with every field optional. Empty strings
//! count as absent, so a caller cannot clear a column by sending `""`. All
//! violations are collected before returning.

use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::error::{FieldViolations, UserError, UserResult};
use crate::models::{
    DEFAULT_PAGE_SIZE, NewUser, UserCredentials, UserId, UserInfo, UserPatch, UserState,
};
use crate::pagination::{PageRequest, parse_page_token};

/// Length in bytes of a SHA-256 digest.
const PASSWORD_HASH_LEN: usize = 32;

const INVALID_PAGE_TOKEN: &str = "must be a page token returned by a previous call";

fn validate_password_hash(hash: &str) -> Result<(), ValidationError> {
    // `const_hex::decode` tolerates a `0x` prefix; only bare digits are a digest.
    if hash.len() != PASSWORD_HASH_LEN * 2 || !hash.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(invalid_hash());
    }
    match const_hex::decode(hash) {
        Ok(bytes) if bytes.len() == PASSWORD_HASH_LEN => Ok(()),
        _ => Err(invalid_hash()),
    }
}

fn invalid_hash() -> ValidationError {
    ValidationError::new("password_hash").with_message("invalid hash".into())
}

fn validate_user_id(id: &str) -> Result<(), ValidationError> {
    Uuid::parse_str(id)
        .map(|_| ())
        .map_err(|_| ValidationError::new("uuid").with_message("must be a valid UUID".into()))
}

fn validate_page_token(token: &str) -> Result<(), ValidationError> {
    parse_page_token(token).map(|_| ()).map_err(|_| {
        ValidationError::new("page_token").with_message(INVALID_PAGE_TOKEN.into())
    })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Parses an identifier, reporting a failure under `id`.
fn user_id(raw: &str) -> UserResult<UserId> {
    Uuid::parse_str(raw).map_err(|_| {
        let mut violations = FieldViolations::new();
        violations.add("id", "must be a valid UUID");
        UserError::Validation(violations)
    })
}

/// Validates a bare identifier, as carried by a delete request.
pub fn parse_user_id(raw: &str) -> UserResult<UserId> {
    if raw.is_empty() {
        let mut violations = FieldViolations::new();
        violations.add("id", "is required");
        return Err(UserError::Validation(violations));
    }
    user_id(raw)
}

/// Payload of an add request.
#[derive(Debug, Clone, Default, Validate)]
pub struct AddUserInput {
    #[validate(custom(function = "validate_user_id"))]
    pub id: Option<String>,
    #[validate(
        required(message = "is required"),
        length(max = 255, message = "must be at most 255 characters")
    )]
    pub first_name: Option<String>,
    #[validate(
        required(message = "is required"),
        length(max = 255, message = "must be at most 255 characters")
    )]
    pub last_name: Option<String>,
    #[validate(length(max = 255, message = "must be at most 255 characters"))]
    pub nickname: Option<String>,
    #[validate(
        required(message = "is required"),
        custom(function = "validate_password_hash")
    )]
    pub password_hash: Option<String>,
    #[validate(
        required(message = "is required"),
        email(message = "must be a valid email address"),
        length(max = 255, message = "must be at most 255 characters")
    )]
    pub email: Option<String>,
    #[validate(
        required(message = "is required"),
        length(equal = 2, message = "must be exactly 2 characters")
    )]
    pub country: Option<String>,
}

impl AddUserInput {
    fn normalized(self) -> Self {
        Self {
            id: non_empty(self.id),
            first_name: non_empty(self.first_name),
            last_name: non_empty(self.last_name),
            nickname: non_empty(self.nickname),
            password_hash: non_empty(self.password_hash),
            email: non_empty(self.email),
            country: non_empty(self.country),
        }
    }

    pub fn into_new_user(self) -> UserResult<NewUser> {
        let input = self.normalized();
        input
            .validate()
            .map_err(|e| UserError::Validation(e.into()))?;

        let id = input.id.as_deref().map(user_id).transpose()?;
        // Presence of the remaining fields was checked above.
        let (
            Some(first_name),
            Some(last_name),
            Some(password_hash),
            Some(email),
            Some(country),
        ) = (
            input.first_name,
            input.last_name,
            input.password_hash,
            input.email,
            input.country,
        )
        else {
            return Err(UserError::Internal("validated add request lost a field".into()));
        };

        Ok(NewUser {
            id,
            state: UserState {
                credentials: UserCredentials {
                    password_hash,
                    email,
                },
                info: UserInfo {
                    first_name,
                    last_name,
                    nickname: input.nickname,
                    country,
                },
            },
        })
    }
}

/// Payload of an update request. Only `id` is mandatory.
#[derive(Debug, Clone, Default, Validate)]
pub struct UpdateUserInput {
    #[validate(
        required(message = "is required"),
        custom(function = "validate_user_id")
    )]
    pub id: Option<String>,
    #[validate(length(max = 255, message = "must be at most 255 characters"))]
    pub first_name: Option<String>,
    #[validate(length(max = 255, message = "must be at most 255 characters"))]
    pub last_name: Option<String>,
    #[validate(length(max = 255, message = "must be at most 255 characters"))]
    pub nickname: Option<String>,
    #[validate(custom(function = "validate_password_hash"))]
    pub password_hash: Option<String>,
    #[validate(
        email(message = "must be a valid email address"),
        length(max = 255, message = "must be at most 255 characters")
    )]
    pub email: Option<String>,
    #[validate(length(equal = 2, message = "must be exactly 2 characters"))]
    pub country: Option<String>,
}

impl UpdateUserInput {
    fn normalized(self) -> Self {
        Self {
            id: non_empty(self.id),
            first_name: non_empty(self.first_name),
            last_name: non_empty(self.last_name),
            nickname: non_empty(self.nickname),
            password_hash: non_empty(self.password_hash),
            email: non_empty(self.email),
            country: non_empty(self.country),
        }
    }

    pub fn into_patch(self) -> UserResult<(UserId, UserPatch)> {
        let input = self.normalized();
        input
            .validate()
            .map_err(|e| UserError::Validation(e.into()))?;

        let id = parse_user_id(input.id.as_deref().unwrap_or_default())?;
        Ok((
            id,
            UserPatch {
                first_name: input.first_name,
                last_name: input.last_name,
                nickname: input.nickname,
                password_hash: input.password_hash,
                email: input.email,
                country: input.country,
            },
        ))
    }
}

/// Payload of a list request.
#[derive(Debug, Clone, Default, Validate)]
pub struct ListUsersInput {
    #[validate(length(equal = 2, message = "must be exactly 2 characters"))]
    pub country: String,
    /// Zero selects [`DEFAULT_PAGE_SIZE`].
    pub page_size: u32,
    #[validate(custom(function = "validate_page_token"))]
    pub page_token: String,
}

/// Validated list request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListUsersQuery {
    pub country: String,
    pub page: PageRequest,
}

impl ListUsersInput {
    pub fn into_query(self) -> UserResult<ListUsersQuery> {
        self.validate()
            .map_err(|e| UserError::Validation(e.into()))?;

        let offset = parse_page_token(&self.page_token).map_err(|_| {
            let mut violations = FieldViolations::new();
            violations.add("page_token", INVALID_PAGE_TOKEN);
            UserError::Validation(violations)
        })?;
        let limit = match self.page_size {
            0 => DEFAULT_PAGE_SIZE,
            n => u64::from(n),
        };

        Ok(ListUsersQuery {
            country: self.country,
            page: PageRequest { limit, offset },
        })
    }
}
