//! The signed-in user as held in the session cookie.

use serde::{Deserialize, Serialize};

use crate::api::LogInResponse;

/// What a user may do in the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    /// Creates batch transactions.
    Maker,
    /// Approves or rejects pending transactions.
    Approver,
    /// Any other role the API reports. Treated like a maker.
    #[serde(other)]
    Other,
}

impl Role {
    /// Map the API's role string, e.g. "Approver".
    pub fn from_api(role: &str) -> Self {
        match role {
            "Maker" => Role::Maker,
            "Approver" => Role::Approver,
            _ => Role::Other,
        }
    }

    pub fn is_approver(self) -> bool {
        self == Role::Approver
    }
}

/// An authenticated user and the bearer token for the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user_id: String,
    pub user_name: String,
    pub role: Role,
    pub account_no: String,
    pub last_login_at: Option<String>,
}

impl From<LogInResponse> for Session {
    fn from(response: LogInResponse) -> Self {
        Self {
            token: response.token,
            user_id: response.user.user_id,
            user_name: response.user.user_name,
            role: Role::from_api(&response.user.role),
            account_no: response.corporate.account_number,
            last_login_at: response.user.last_login_at,
        }
    }
}

#[cfg(test)]
pub(crate) fn test_session(role: Role) -> Session {
    Session {
        token: "test-token".to_owned(),
        user_id: "user1".to_owned(),
        user_name: "Test User".to_owned(),
        role,
        account_no: "8880001".to_owned(),
        last_login_at: Some("2024-05-01T10:00:00Z".to_owned()),
    }
}

#[cfg(test)]
mod tests {
    use crate::api::{CorporateInfo, LogInResponse, UserInfo};

    use super::{Role, Session};

    #[test]
    fn maps_log_in_response() {
        let response = LogInResponse {
            token: "jwt".to_owned(),
            user: UserInfo {
                user_id: "approver1".to_owned(),
                user_name: "Approver One".to_owned(),
                role: "Approver".to_owned(),
                last_login_at: None,
            },
            corporate: CorporateInfo {
                account_number: "888".to_owned(),
                account_name: "PT Contoh".to_owned(),
            },
        };

        let session = Session::from(response);

        assert_eq!(
            session,
            Session {
                token: "jwt".to_owned(),
                user_id: "approver1".to_owned(),
                user_name: "Approver One".to_owned(),
                role: Role::Approver,
                account_no: "888".to_owned(),
                last_login_at: None,
            }
        );
    }

    #[test]
    fn unknown_roles_are_kept_as_other() {
        assert_eq!(Role::from_api("Maker"), Role::Maker);
        assert_eq!(Role::from_api("Approver"), Role::Approver);
        assert_eq!(Role::from_api("Auditor"), Role::Other);
        assert_eq!(Role::from_api("approver"), Role::Other);
        assert!(!Role::Other.is_approver());
    }

    #[test]
    fn unknown_serialized_role_reads_as_other() {
        let role: Role = serde_json::from_str("\"Auditor\"").unwrap();

        assert_eq!(role, Role::Other);
    }
}
