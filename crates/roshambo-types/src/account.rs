use serde::{Deserialize, Serialize};

use crate::AuthError;

/// Registered player. The password is kept as entered; see DESIGN.md.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAccount {
    pub username: String,
    pub password: String,
    pub email: String,
    pub created_at: String,
    /// Empty until the first successful login.
    #[serde(default)]
    pub last_login: String,
}

/// Data entered on the sign-up screen.
#[derive(Debug, Clone, Default)]
pub struct Registration {
    pub username: String,
    pub password: String,
    pub confirm_password: String,
    pub email: String,
}

impl Registration {
    pub fn validate(&self) -> Result<(), AuthError> {
        if self.username.trim().is_empty() {
            return Err(AuthError::MissingField("username"));
        }
        if self.password.is_empty() {
            return Err(AuthError::MissingField("password"));
        }
        if self.email.trim().is_empty() {
            return Err(AuthError::MissingField("email"));
        }
        if self.password != self.confirm_password {
            return Err(AuthError::PasswordMismatch);
        }
        Ok(())
    }
}
