//! Login gate for selecting a session identity.
//!
//! One shared password for the whole roster, compared verbatim. This is a
//! collaboration placeholder, not access control: no hashing, no per-professor
//! credential, no session expiry. A successful login just selects which
//! roster entry acts for the browser session.

/// Default shared password when `CURRICULUM_BOARD_PASSWORD` is unset.
const DEFAULT_PASSWORD: &str = "1234";

/// Login gate configuration loaded from the environment.
#[derive(Clone, Debug)]
pub struct AuthConfig {
    password: String,
}

impl AuthConfig {
    /// Load the shared password from `CURRICULUM_BOARD_PASSWORD`, falling
    /// back to the development default.
    pub fn from_env() -> Self {
        let password = std::env::var("CURRICULUM_BOARD_PASSWORD")
            .unwrap_or_else(|_| DEFAULT_PASSWORD.to_string());
        Self { password }
    }

    /// Create a config with an explicit password (for testing).
    pub fn with_password(password: impl Into<String>) -> Self {
        Self {
            password: password.into(),
        }
    }

    pub fn verify(&self, candidate: &str) -> bool {
        candidate == self.password
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_the_configured_password() {
        let auth = AuthConfig::with_password("secret");
        assert!(auth.verify("secret"));
    }

    #[test]
    fn rejects_everything_else() {
        let auth = AuthConfig::with_password("secret");
        assert!(!auth.verify("Secret"));
        assert!(!auth.verify(""));
        assert!(!auth.verify("secret "));
    }
}
