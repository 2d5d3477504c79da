use serde::{Deserialize, Serialize};

/// Kind of account behind an access token.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Business,
    Client,
    /// Backend-to-backend calls (scheduled functions, admin tooling).
    ServiceRole,
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            UserRole::Business => "business",
            UserRole::Client => "client",
            UserRole::ServiceRole => "service_role",
        };
        write!(f, "{s}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_matches_the_token_claim() {
        for role in [UserRole::Business, UserRole::Client, UserRole::ServiceRole] {
            let claim = serde_json::to_value(role).unwrap();
            assert_eq!(claim, serde_json::Value::String(role.to_string()));
        }
        assert!(serde_json::from_str::<UserRole>(r#""admin""#).is_err());
    }
}
