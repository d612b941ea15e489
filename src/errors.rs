use thiserror::Error;

/// Crate-wide error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be loaded or is invalid
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong
        message: String,
    },

    /// Any failure reported by the database driver
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// I/O failure (config file, socket binding)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Required environment variable missing or malformed
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    /// A related row referenced by id does not exist
    #[error("No {entity} found with id {id}")]
    NotFound {
        /// Table the lookup ran against
        entity: String,
        /// The id that failed to resolve
        id: i64,
    },

    /// Input violates an entity invariant
    #[error("Validation error: {message}")]
    Validation {
        /// Human-readable reason
        message: String,
    },

    /// A submitted form value could not be bound to its field
    #[error("Invalid value for form field '{field}': {message}")]
    InvalidForm {
        /// Field name as declared in the entity descriptor
        field: String,
        /// Why the value was rejected
        message: String,
    },

    /// Order status change not allowed by the workflow
    #[error("Cannot move order from {from} to {to}")]
    InvalidTransition {
        /// Current status
        from: String,
        /// Requested status
        to: String,
    },

    /// Registration with an email that already has an account
    #[error("An account with email '{email}' already exists")]
    EmailTaken {
        /// The normalized email
        email: String,
    },

    /// Admin request for an entity kind that has no descriptor
    #[error("Unknown entity kind '{name}'")]
    UnknownEntity {
        /// The name from the request path
        name: String,
    },
}

impl Error {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub(crate) fn not_found(entity: impl Into<String>, id: i64) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id,
        }
    }
}

// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
