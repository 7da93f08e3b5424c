//! Users, roles, and the acting identity.

use super::{Email, ParseDomainValueError, UserId};
use serde::{Deserialize, Serialize};

/// Role granted to a user at registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Administrative account.
    Admin,
    /// Manager who owns projects.
    Manager,
    /// Regular user who works on assigned tasks.
    User,
}

impl Role {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "ADMIN",
            Self::Manager => "MANAGER",
            Self::User => "USER",
        }
    }

    /// Returns `true` for roles allowed to own projects.
    #[must_use]
    pub const fn can_own_projects(self) -> bool {
        matches!(self, Self::Admin | Self::Manager)
    }
}

impl TryFrom<&str> for Role {
    type Error = ParseDomainValueError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_uppercase().as_str() {
            "ADMIN" => Ok(Self::Admin),
            "MANAGER" => Ok(Self::Manager),
            "USER" => Ok(Self::User),
            _ => Err(ParseDomainValueError::new("role", value)),
        }
    }
}

/// Registered user.
///
/// The credential hash is produced and verified outside the core and is
/// stored opaquely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    email: Email,
    role: Role,
    credential_hash: String,
}

impl User {
    /// Reconstructs a user from persisted storage.
    #[must_use]
    pub const fn from_persisted(
        id: UserId,
        email: Email,
        role: Role,
        credential_hash: String,
    ) -> Self {
        Self {
            id,
            email,
            role,
            credential_hash,
        }
    }

    /// Returns the user identity.
    #[must_use]
    pub const fn id(&self) -> UserId {
        self.id
    }

    /// Returns the unique email address.
    #[must_use]
    pub const fn email(&self) -> &Email {
        &self.email
    }

    /// Returns the user role.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }

    /// Returns the opaque credential hash.
    #[must_use]
    pub fn credential_hash(&self) -> &str {
        &self.credential_hash
    }
}

/// User awaiting an identity from the entity store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    /// Unique email address.
    pub email: Email,
    /// Granted role.
    pub role: Role,
    /// Opaque credential hash.
    pub credential_hash: String,
}

/// Authenticated identity attempting an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Actor {
    id: UserId,
    role: Role,
}

impl Actor {
    /// Creates an actor from an externally authenticated identity.
    #[must_use]
    pub const fn new(id: UserId, role: Role) -> Self {
        Self { id, role }
    }

    /// Returns the acting user's identity.
    #[must_use]
    pub const fn id(self) -> UserId {
        self.id
    }

    /// Returns the acting user's role.
    #[must_use]
    pub const fn role(self) -> Role {
        self.role
    }
}

impl From<&User> for Actor {
    fn from(user: &User) -> Self {
        Self::new(user.id(), user.role())
    }
}
