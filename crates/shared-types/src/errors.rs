//! # Error Types

use thiserror::Error;

/// A string was rejected as a user identifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentifierError {
    /// Empty identifier.
    #[error("User id is empty")]
    Empty,

    /// Identifier exceeds the length limit.
    #[error("User id is {len} bytes, limit is {max}")]
    TooLong { len: usize, max: usize },

    /// Identifier contains whitespace, a separator or a control character.
    #[error("User id contains forbidden character {0:?}")]
    ForbiddenCharacter(char),
}
