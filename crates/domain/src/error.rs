//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors and converts into
//! [`ThermohubError`] via `#[from]` or an explicit `From` impl.

/// Top-level error crossing port boundaries.
#[derive(Debug, thiserror::Error)]
pub enum ThermohubError {
    /// A domain invariant was violated.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// A requested record does not exist.
    #[error("not found: {0}")]
    NotFound(#[from] NotFoundError),

    /// A storage or host-store backend failed.
    #[error("storage error: {0}")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Domain invariant violations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// A display name was empty or whitespace only.
    #[error("name must not be empty")]
    EmptyName,

    /// A hardware address could not be parsed.
    #[error("invalid hardware address {value:?}")]
    InvalidAddress {
        /// The rejected input.
        value: String,
    },

    /// An accessory identifier could not be parsed.
    #[error("invalid accessory id {value:?}")]
    InvalidId {
        /// The rejected input.
        value: String,
    },
}

/// A lookup by identifier found nothing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{entity} {id} not found")]
pub struct NotFoundError {
    /// Kind of record (e.g. `"Accessory"`).
    pub entity: &'static str,
    /// The identifier that was looked up.
    pub id: String,
}
