use serde::{Deserialize, Serialize};

/// A row of `movies_users`, only the columns owner resolution needs
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, sqlx::FromRow)]
pub struct Identity {
    pub user_id: i32,
    pub name: String,
    pub email: String,
    pub role: Option<String>,
}

impl Identity {
    /// Role comparison is case-insensitive since the column is free text
    pub fn has_role(&self, role: &str) -> bool {
        self.role
            .as_deref()
            .is_some_and(|r| r.eq_ignore_ascii_case(role))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(role: Option<&str>) -> Identity {
        Identity {
            user_id: 4,
            name: "Curator".to_string(),
            email: "curator@example.com".to_string(),
            role: role.map(str::to_string),
        }
    }

    #[test]
    fn test_has_role_ignores_case() {
        assert!(identity(Some("admin")).has_role("Admin"));
        assert!(!identity(Some("User")).has_role("Admin"));
        assert!(!identity(None).has_role("Admin"));
    }
}
