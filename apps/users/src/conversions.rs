//! Wire ↔ domain conversions.
//!
//! Requests become the domain's validation inputs untouched; validation
//! decides what an empty or missing field means.

use domain_users::{AddUserInput, ListUsersInput, UpdateUserInput, User};
use grpc_client::conversions::datetime_to_timestamp;
use rpc::users::v1 as proto;

pub fn add_user_input(req: proto::UserRequest) -> AddUserInput {
    AddUserInput {
        id: Some(req.id),
        first_name: req.first_name,
        last_name: req.last_name,
        nickname: req.nickname,
        password_hash: req.password_hash,
        email: req.email,
        country: req.country,
    }
}

pub fn update_user_input(req: proto::UserRequest) -> UpdateUserInput {
    UpdateUserInput {
        id: Some(req.id),
        first_name: req.first_name,
        last_name: req.last_name,
        nickname: req.nickname,
        password_hash: req.password_hash,
        email: req.email,
        country: req.country,
    }
}

pub fn list_users_input(req: proto::ListUsersByCountryRequest) -> ListUsersInput {
    ListUsersInput {
        country: req.country,
        page_size: req.page_size,
        page_token: req.page_token,
    }
}

/// The password hash never leaves the service.
pub fn user_to_proto(user: User) -> proto::User {
    proto::User {
        id: user.id.to_string(),
        first_name: user.state.info.first_name,
        last_name: user.state.info.last_name,
        nickname: user.state.info.nickname,
        email: user.state.credentials.email,
        country: user.state.info.country,
        created_at: datetime_to_timestamp(user.created_at),
        updated_at: datetime_to_timestamp(user.updated_at),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use domain_users::{UserCredentials, UserInfo, UserState};

    #[test]
    fn test_empty_id_is_left_to_validation() {
        let input = add_user_input(proto::UserRequest::default());
        assert_eq!(input.id.as_deref(), Some(""));
        assert!(input.first_name.is_none());
    }

    #[test]
    fn test_user_to_proto_drops_password_hash() {
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let user = User {
            id: uuid::Uuid::nil(),
            state: UserState {
                credentials: UserCredentials {
                    password_hash: "ab".repeat(32),
                    email: "alice@bob.com".into(),
                },
                info: UserInfo {
                    first_name: "Alice".into(),
                    last_name: "Bob".into(),
                    nickname: Some("ali".into()),
                    country: "UK".into(),
                },
            },
            created_at: at,
            updated_at: at,
        };

        let wire = user_to_proto(user);
        assert_eq!(wire.id, "00000000-0000-0000-0000-000000000000");
        assert_eq!(wire.email, "alice@bob.com");
        assert_eq!(wire.nickname.as_deref(), Some("ali"));
        assert_eq!(wire.created_at, 1_704_067_200);
    }
}
