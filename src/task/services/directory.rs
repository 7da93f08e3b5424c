//! Service layer for user registration and lookup.

use super::error::EntityRef;
use crate::task::{
    domain::{Email, NewUser, Role, TaskDomainError, User, UserId},
    ports::{TaskStore, TaskStoreError},
};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Request payload for registering a user.
///
/// The credential hash is produced by the caller and stored opaquely.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterUserRequest {
    email: String,
    role: Role,
    credential_hash: String,
}

impl RegisterUserRequest {
    /// Creates a registration request.
    #[must_use]
    pub fn new(email: impl Into<String>, role: Role, credential_hash: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            role,
            credential_hash: credential_hash.into(),
        }
    }
}

/// Service-level errors for user directory operations.
#[derive(Debug, Error)]
pub enum UserDirectoryError {
    /// The user does not exist.
    #[error("{0} not found")]
    NotFound(EntityRef),
    /// Another user already has the email address.
    #[error("email address already registered: {0}")]
    DuplicateEmail(Email),
    /// Request input failed domain validation.
    #[error(transparent)]
    Validation(#[from] TaskDomainError),
    /// Entity store operation failed.
    #[error(transparent)]
    Store(TaskStoreError),
}

impl From<TaskStoreError> for UserDirectoryError {
    fn from(err: TaskStoreError) -> Self {
        match err {
            TaskStoreError::DuplicateEmail(email) => Self::DuplicateEmail(email),
            other => Self::Store(other),
        }
    }
}

/// Result type for user directory operations.
pub type UserDirectoryResult<T> = Result<T, UserDirectoryError>;

/// User registration and lookup service.
#[derive(Clone)]
pub struct UserDirectoryService<S>
where
    S: TaskStore,
{
    store: Arc<S>,
}

impl<S> UserDirectoryService<S>
where
    S: TaskStore,
{
    /// Creates a new user directory service.
    #[must_use]
    pub const fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Registers a user with a unique email address.
    ///
    /// # Errors
    ///
    /// Returns [`UserDirectoryError::DuplicateEmail`] when the address is
    /// taken and [`UserDirectoryError::Validation`] for a malformed address.
    pub async fn register(&self, request: RegisterUserRequest) -> UserDirectoryResult<User> {
        let email = Email::new(request.email)?;
        let role = request.role;
        let credential_hash = request.credential_hash;

        let result = self
            .store
            .transact(move |tx| -> UserDirectoryResult<User> {
                if tx.find_user_by_email(&email)?.is_some() {
                    return Err(UserDirectoryError::DuplicateEmail(email));
                }
                Ok(tx.insert_user(NewUser {
                    email,
                    role,
                    credential_hash,
                })?)
            })
            .await;

        match &result {
            Ok(user) => info!(user_id = %user.id(), role = user.role().as_str(), "registered user"),
            Err(UserDirectoryError::DuplicateEmail(taken)) => {
                warn!(email = %taken, "registration rejected for duplicate email");
            }
            Err(_) => {}
        }
        result
    }

    /// Retrieves a user by identity.
    ///
    /// # Errors
    ///
    /// Returns [`UserDirectoryError::NotFound`] when the user does not exist.
    pub async fn find_user(&self, id: UserId) -> UserDirectoryResult<User> {
        self.store
            .transact(move |tx| -> UserDirectoryResult<User> {
                tx.find_user(id)?
                    .ok_or(UserDirectoryError::NotFound(EntityRef::User(id)))
            })
            .await
    }

    /// Retrieves a user by email address.
    ///
    /// Returns `Ok(None)` when no user has the address.
    ///
    /// # Errors
    ///
    /// Returns [`UserDirectoryError::Validation`] for a malformed address.
    pub async fn find_by_email(&self, email: &str) -> UserDirectoryResult<Option<User>> {
        let normalized = Email::new(email)?;
        self.store
            .transact(move |tx| -> UserDirectoryResult<Option<User>> {
                Ok(tx.find_user_by_email(&normalized)?)
            })
            .await
    }
}
