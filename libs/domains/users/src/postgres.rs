use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    ConnectionTrait, DatabaseConnection, DbBackend, DbErr, FromQueryResult, SqlErr, Statement,
    Value,
};
use uuid::Uuid;

use crate::columns::{self, USERS_TABLE, UserColumn};
use crate::error::{UserError, UserResult};
use crate::models::{NewUser, User, UserCredentials, UserId, UserInfo, UserPatch, UserState};
use crate::repository::UserRepository;

/// PostgreSQL implementation of UserRepository using SeaORM
#[derive(Clone)]
pub struct PgUserRepository {
    db: DatabaseConnection,
    statements: UserStatements,
}

impl PgUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            statements: UserStatements::new(),
        }
    }
}

/// Builds the parameterized statements against `users`.
///
/// The column list is rendered once from [`UserColumn`] and reused.
#[derive(Debug, Clone)]
pub struct UserStatements {
    select_list: String,
}

impl Default for UserStatements {
    fn default() -> Self {
        Self::new()
    }
}

impl UserStatements {
    pub fn new() -> Self {
        Self {
            select_list: columns::select_list(),
        }
    }

    /// `INSERT ... RETURNING` with only the columns that carry a value.
    pub fn insert(&self, user: &NewUser) -> Statement {
        let mut assignments = Vec::with_capacity(7);
        if let Some(id) = user.id {
            assignments.push((UserColumn::Id, Value::from(id)));
        }
        assignments.extend(columns::state_values(&user.state));

        let names: Vec<&str> = assignments.iter().map(|(c, _)| c.name()).collect();
        let placeholders: Vec<String> = (1..=assignments.len()).map(|i| format!("${i}")).collect();
        let sql = format!(
            "INSERT INTO {USERS_TABLE} ({}) VALUES ({}) RETURNING {}",
            names.join(", "),
            placeholders.join(", "),
            self.select_list,
        );

        Statement::from_sql_and_values(
            DbBackend::Postgres,
            sql,
            assignments.into_iter().map(|(_, v)| v),
        )
    }

    /// `UPDATE` restricted to the fields present in `patch`; `None` when the
    /// patch is empty.
    pub fn update(&self, id: UserId, patch: &UserPatch) -> Option<Statement> {
        let assignments = columns::patch_values(patch);
        if assignments.is_empty() {
            return None;
        }

        let set_clause: Vec<String> = assignments
            .iter()
            .enumerate()
            .map(|(i, (c, _))| format!("{} = ${}", c.name(), i + 1))
            .collect();
        let sql = format!(
            "UPDATE {USERS_TABLE} SET {}, {} = NOW() WHERE {} = ${}",
            set_clause.join(", "),
            UserColumn::UpdatedAt.name(),
            UserColumn::Id.name(),
            assignments.len() + 1,
        );

        let values = assignments
            .into_iter()
            .map(|(_, v)| v)
            .chain(std::iter::once(Value::from(id)));
        Some(Statement::from_sql_and_values(DbBackend::Postgres, sql, values))
    }

    pub fn delete(&self, id: UserId) -> Statement {
        let sql = format!(
            "DELETE FROM {USERS_TABLE} WHERE {} = $1",
            UserColumn::Id.name()
        );
        Statement::from_sql_and_values(DbBackend::Postgres, sql, [id.into()])
    }

    /// No `ORDER BY`: rows come back in the store's natural order.
    pub fn list_by_country(&self, country: &str, limit: u64, offset: u64) -> Statement {
        let sql = format!(
            "SELECT {} FROM {USERS_TABLE} WHERE {} = $1 LIMIT $2 OFFSET $3",
            self.select_list,
            UserColumn::Country.name(),
        );
        Statement::from_sql_and_values(
            DbBackend::Postgres,
            sql,
            [
                country.into(),
                bind_i64(limit).into(),
                bind_i64(offset).into(),
            ],
        )
    }
}

/// Postgres has no unsigned integers; values above `i64::MAX` saturate.
fn bind_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

/// Helper struct for deserializing user rows from the database
#[derive(Debug, FromQueryResult)]
struct UserRow {
    id: Uuid,
    first_name: String,
    last_name: String,
    nickname: Option<String>,
    password_hash: String,
    email: String,
    country: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            state: UserState {
                credentials: UserCredentials {
                    password_hash: row.password_hash,
                    email: row.email,
                },
                info: UserInfo {
                    first_name: row.first_name,
                    last_name: row.last_name,
                    nickname: row.nickname,
                    country: row.country,
                },
            },
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Reclassifies a driver error; only uniqueness conflicts get their own kind.
fn classify(op: &str, err: DbErr) -> UserError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => {
            tracing::debug!(operation = op, %detail, "unique constraint violation");
            UserError::AlreadyExists(detail)
        }
        _ => {
            tracing::error!(operation = op, error = %err, "database error");
            UserError::Internal(format!("database error: {err}"))
        }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, user: NewUser) -> UserResult<User> {
        let stmt = self.statements.insert(&user);

        let row = UserRow::find_by_statement(stmt)
            .one(&self.db)
            .await
            .map_err(|e| classify("insert user", e))?
            .ok_or_else(|| UserError::Internal("insert user: no rows affected".to_string()))?;

        tracing::info!(user_id = %row.id, "created user");
        Ok(row.into())
    }

    async fn update(&self, id: UserId, patch: UserPatch) -> UserResult<()> {
        let Some(stmt) = self.statements.update(id, &patch) else {
            return Ok(());
        };

        let result = self
            .db
            .execute_raw(stmt)
            .await
            .map_err(|e| classify("update user", e))?;

        if result.rows_affected() == 0 {
            return Err(UserError::NotFound(id));
        }
        Ok(())
    }

    async fn delete(&self, id: UserId) -> UserResult<()> {
        let result = self
            .db
            .execute_raw(self.statements.delete(id))
            .await
            .map_err(|e| classify("delete user", e))?;

        if result.rows_affected() == 0 {
            return Err(UserError::NotFound(id));
        }
        Ok(())
    }

    async fn list_by_country(
        &self,
        country: String,
        limit: u64,
        offset: u64,
    ) -> UserResult<Vec<User>> {
        let stmt = self.statements.list_by_country(&country, limit, offset);

        let rows = UserRow::find_by_statement(stmt)
            .all(&self.db)
            .await
            .map_err(|e| classify("list users", e))?;

        Ok(rows.into_iter().map(User::from).collect())
    }
}
