use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::ids::UserId;

/// Login form payload.
#[derive(Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

/// Successful login reply.
#[derive(Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub email: String,
    pub role: String,
    pub id: UserId,
    #[serde(default)]
    pub full_name: Option<String>,
}

impl std::fmt::Debug for LoginResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginResponse")
            .field("token", &"***")
            .field("email", &self.email)
            .field("role", &self.role)
            .field("id", &self.id)
            .field("full_name", &self.full_name)
            .finish()
    }
}

/// Registration form payload.
#[derive(Clone, Serialize)]
pub struct Registration {
    pub email: String,
    pub password: String,
    pub full_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qualification: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<NaiveDate>,
}

impl std::fmt::Debug for Registration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registration")
            .field("email", &self.email)
            .field("password", &"***")
            .field("full_name", &self.full_name)
            .field("qualification", &self.qualification)
            .field("date_of_birth", &self.date_of_birth)
            .finish()
    }
}

impl Registration {
    /// Checks the fields the server requires.
    ///
    /// Returns `Ok(())` if valid, or `Err` with a message for the user.
    pub fn validate(&self) -> Result<(), &'static str> {
        let email = self.email.trim();
        if email.is_empty() {
            return Err("Email is required");
        }
        if !email.contains('@') {
            return Err("Email must contain '@'");
        }
        if self.password.is_empty() {
            return Err("Password is required");
        }
        if self.full_name.trim().is_empty() {
            return Err("Full name is required");
        }
        Ok(())
    }
}
