//! Shared admin secret verification

use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use crate::{config::AuthConfig, models::Actor};

#[derive(Clone)]
pub struct AuthService {
    secret_digest: [u8; 32],
}

impl AuthService {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            secret_digest: Sha256::digest(config.admin_secret.as_bytes()).into(),
        }
    }

    /// Compare a candidate with the configured secret in constant time.
    ///
    /// Both sides are hashed first so the comparison does not leak the length.
    pub fn verify(&self, candidate: &str) -> bool {
        let candidate: [u8; 32] = Sha256::digest(candidate.as_bytes()).into();
        candidate[..].ct_eq(&self.secret_digest[..]).into()
    }

    /// Build the request actor from the supplied name and optional secret
    pub fn actor(&self, name: Option<&str>, admin_secret: Option<&str>) -> Actor {
        let name = name.map(str::trim).filter(|n| !n.is_empty());
        let is_admin = admin_secret.map(|s| self.verify(s)).unwrap_or(false);

        match (name, is_admin) {
            (Some(name), true) => Actor::admin(name),
            (Some(name), false) => Actor::new(name),
            (None, true) => Actor::admin("Admin"),
            (None, false) => Actor::guest(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> AuthService {
        AuthService::new(&AuthConfig {
            admin_secret: "hunter2".to_string(),
        })
    }

    #[test]
    fn test_verify() {
        let auth = service();
        assert!(auth.verify("hunter2"));
        assert!(!auth.verify("hunter"));
        assert!(!auth.verify(""));
    }

    #[test]
    fn test_actor_from_headers() {
        let auth = service();
        assert_eq!(auth.actor(None, None), Actor::guest());
        assert_eq!(auth.actor(Some(" Dana "), None), Actor::new("Dana"));
        assert_eq!(auth.actor(Some("Dana"), Some("nope")), Actor::new("Dana"));
        assert_eq!(auth.actor(Some("Dana"), Some("hunter2")), Actor::admin("Dana"));
        assert!(auth.actor(None, Some("hunter2")).is_admin);
    }
}
