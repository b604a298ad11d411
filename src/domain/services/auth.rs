#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;

use anyhow::bail;
use anyhow::Result;
use dashmap::DashMap;

use crate::domain::models::AuthenticatedUser;

pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

/// Stub gate in front of the chat view. Credentials are never verified and
/// nothing leaves the process; registration only remembers display names.
#[derive(Default)]
pub struct AuthService {
    accounts: DashMap<String, String>,
}

impl AuthService {
    pub fn register(&self, registration: Registration) -> Result<()> {
        if registration.name.trim().is_empty()
            || registration.email.trim().is_empty()
            || registration.password.is_empty()
            || registration.confirm_password.is_empty()
        {
            bail!("Please fill in all fields.");
        }

        if !registration.email.contains('@') {
            bail!("Please enter a valid email address.");
        }

        if registration.password != registration.confirm_password {
            bail!("Passwords do not match.");
        }

        self.accounts.insert(
            registration.email.trim().to_lowercase(),
            registration.name.trim().to_string(),
        );
        tracing::info!(email = registration.email.trim(), "Registered account");

        return Ok(());
    }

    pub fn login(&self, email: &str, password: &str) -> Result<AuthenticatedUser> {
        let email = email.trim();
        if email.is_empty() || password.is_empty() {
            bail!("Please enter your email and password.");
        }

        let name = match self.accounts.get(&email.to_lowercase()) {
            Some(name) => name.to_string(),
            None => email.split('@').next().unwrap_or(email).to_string(),
        };

        tracing::info!(email, "Logged in");

        return Ok(AuthenticatedUser {
            name,
            email: email.to_string(),
        });
    }
}
