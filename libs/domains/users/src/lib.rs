//! Users Domain
//!
//! Account management for the users service: validation of inbound requests,
//! the four use cases and the storage behind them.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │ Validation  │  ← Wire input → domain values, field violations
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐     ┌──────────┐
//! │   Service   │ ──► │ Notifier │  ← Use cases, notification after writes
//! └──────┬──────┘     └──────────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← Trait + Postgres / in-memory implementations
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← User, UserState, UserPatch
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_users::{NoopNotifier, PgUserRepository, UserService};
//! use sea_orm::Database;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let db = Database::connect("postgres://...").await?;
//!
//! let service = UserService::new(PgUserRepository::new(db), NoopNotifier);
//! # Ok(())
//! # }
//! ```

pub mod columns;
pub mod error;
pub mod models;
pub mod notifier;
pub mod pagination;
pub mod postgres;
pub mod repository;
pub mod service;
pub mod validation;

pub use columns::{USERS_TABLE, UserColumn};
pub use error::{FieldViolations, UserError, UserResult};
pub use models::{
    DEFAULT_PAGE_SIZE, NewUser, User, UserCredentials, UserId, UserInfo, UserPatch, UserState,
};
pub use notifier::{NoopNotifier, TracingNotifier, UserNotifier};
pub use pagination::{PageRequest, next_page_token};
pub use postgres::PgUserRepository;
pub use repository::{InMemoryUserRepository, UserRepository};
pub use service::UserService;
pub use validation::{AddUserInput, ListUsersInput, ListUsersQuery, UpdateUserInput, parse_user_id};
