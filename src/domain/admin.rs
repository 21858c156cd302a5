use serde::{Deserialize, Serialize};

/// Username assumed when no session user has been recorded.
pub const DEFAULT_USER: &str = "admin";
const DEFAULT_PASSWORD: &str = "admin123";

/// An administrator allowed into the dashboard.
///
/// Passwords are stored and compared in plain text; the login gate is not a
/// security boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminAccount {
    pub username: String,
    pub password: String,
}

impl AdminAccount {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// The account seeded on first run.
    pub fn seed() -> Self {
        Self::new(DEFAULT_USER, DEFAULT_PASSWORD)
    }

    pub fn matches(&self, username: &str, password: &str) -> bool {
        self.username == username && self.password == password
    }
}
