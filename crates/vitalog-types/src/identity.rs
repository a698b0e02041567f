use serde::{Deserialize, Serialize};

/// Authenticated identity reported by the remote backend.
///
/// The coordinator treats the presence of one of these as the sole
/// cloud-mode discriminator: identity present means the remote store is
/// authoritative, absent means guest mode. `user_id` is the owner key that
/// scopes remote record rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionIdentity {
    pub user_id: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

impl SessionIdentity {
    /// Name to greet the user with: display name when set, otherwise the
    /// local part of the email address.
    pub fn short_name(&self) -> &str {
        if let Some(name) = &self.display_name {
            return name;
        }
        self.email.split('@').next().unwrap_or(&self.email)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_name_falls_back_to_email_local_part() {
        let identity = SessionIdentity {
            user_id: "u-1".to_string(),
            email: "ada@example.com".to_string(),
            display_name: None,
        };
        assert_eq!(identity.short_name(), "ada");

        let named = SessionIdentity {
            display_name: Some("Ada".to_string()),
            ..identity
        };
        assert_eq!(named.short_name(), "Ada");
    }
}
