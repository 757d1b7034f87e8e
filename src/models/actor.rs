//! Request-scoped actor identity

use serde::Serialize;
use utoipa::ToSchema;

use crate::error::AppError;

/// Identity used when nobody has picked a name
pub const GUEST: &str = "Guest";

/// Who is making a request, and whether they unlocked admin mode
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Actor {
    pub name: String,
    pub is_admin: bool,
}

impl Actor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into().trim().to_string(),
            is_admin: false,
        }
    }

    pub fn admin(name: impl Into<String>) -> Self {
        Self {
            is_admin: true,
            ..Self::new(name)
        }
    }

    pub fn guest() -> Self {
        Self::new(GUEST)
    }

    /// Blank names count as guests
    pub fn is_guest(&self) -> bool {
        is_guest_name(&self.name)
    }

    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.is_admin {
            Ok(())
        } else {
            Err(AppError::Unauthorized("Admin mode required".to_string()))
        }
    }
}

pub fn is_guest_name(name: &str) -> bool {
    let name = name.trim();
    name.is_empty() || name.eq_ignore_ascii_case(GUEST)
}
