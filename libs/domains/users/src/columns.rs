//! Field → column mapping for the `users` table.
//!
//! Statement builders only refer to columns through [`UserColumn`], so adding a
//! field means adding a variant here and nowhere else in the SQL.

use sea_orm::Value;

use crate::models::{UserPatch, UserState};

pub const USERS_TABLE: &str = "users";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UserColumn {
    Id,
    FirstName,
    LastName,
    Nickname,
    PasswordHash,
    Email,
    Country,
    CreatedAt,
    UpdatedAt,
}

impl UserColumn {
    /// Every column, in table order.
    pub const ALL: [UserColumn; 9] = [
        UserColumn::Id,
        UserColumn::FirstName,
        UserColumn::LastName,
        UserColumn::Nickname,
        UserColumn::PasswordHash,
        UserColumn::Email,
        UserColumn::Country,
        UserColumn::CreatedAt,
        UserColumn::UpdatedAt,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            UserColumn::Id => "id",
            UserColumn::FirstName => "first_name",
            UserColumn::LastName => "last_name",
            UserColumn::Nickname => "nickname",
            UserColumn::PasswordHash => "password_hash",
            UserColumn::Email => "email",
            UserColumn::Country => "country",
            UserColumn::CreatedAt => "created_at",
            UserColumn::UpdatedAt => "updated_at",
        }
    }
}

/// Comma separated list of every column, for `SELECT` and `RETURNING`.
pub fn select_list() -> String {
    UserColumn::ALL
        .iter()
        .map(|c| c.name())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Column/value pairs written on insert. Unset optional fields are skipped so
/// the column default applies.
pub fn state_values(state: &UserState) -> Vec<(UserColumn, Value)> {
    let mut values = vec![
        (UserColumn::FirstName, state.info.first_name.clone().into()),
        (UserColumn::LastName, state.info.last_name.clone().into()),
    ];
    if let Some(nickname) = &state.info.nickname {
        values.push((UserColumn::Nickname, nickname.clone().into()));
    }
    values.extend([
        (
            UserColumn::PasswordHash,
            state.credentials.password_hash.clone().into(),
        ),
        (UserColumn::Email, state.credentials.email.clone().into()),
        (UserColumn::Country, state.info.country.clone().into()),
    ]);
    values
}

/// Column/value pairs for the fields present in `patch`.
pub fn patch_values(patch: &UserPatch) -> Vec<(UserColumn, Value)> {
    [
        (UserColumn::FirstName, &patch.first_name),
        (UserColumn::LastName, &patch.last_name),
        (UserColumn::Nickname, &patch.nickname),
        (UserColumn::PasswordHash, &patch.password_hash),
        (UserColumn::Email, &patch.email),
        (UserColumn::Country, &patch.country),
    ]
    .into_iter()
    .filter_map(|(column, value)| value.as_ref().map(|v| (column, v.clone().into())))
    .collect()
}
