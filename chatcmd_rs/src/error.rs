//! Error types for tokenization, option resolution, pattern mapping and
//! dispatch.
//!
//! Two failure classes exist side by side: positioned [`SyntaxError`]s abort a
//! `process` call and surface verbatim, while [`MappingError`]s are silent
//! signals that only drive pattern fallthrough and never reach a user unless
//! every pattern of a command has been exhausted.

use thiserror::Error;

/// What went wrong while tokenizing a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SyntaxErrorKind {
    /// An escape character with no character left to escape.
    #[error("nothing left to escape")]
    NothingToEscape,

    /// A quoted string that never sees its matching closing quote.
    #[error("quote not closed")]
    UnterminatedQuote,

    /// A quote, escape or prefix character inside an option name.
    #[error("illegal character in option name")]
    IllegalOptionCharacter,

    /// `--` followed by a separator or nothing: a long option without a name.
    #[error("anonymous long option")]
    AnonymousLongOption,

    /// `-` followed by a separator before any short option character.
    #[error("empty short option chain")]
    EmptyShortOptionChain,

    /// The same option name appeared twice in the options section.
    #[error("duplicate option")]
    DuplicateOption,

    /// A token inside the options section that does not start with `-`.
    #[error("expected an option prefix")]
    NotAnOptionPrefix,
}

/// A positioned syntax error raised by the tokenizer.
///
/// `position` is the character offset (not byte offset) where the error was
/// detected inside the trimmed input line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{kind} at position {position}")]
pub struct SyntaxError {
    pub kind: SyntaxErrorKind,
    pub position: usize,
}

impl SyntaxError {
    pub fn new(kind: SyntaxErrorKind, position: usize) -> Self {
        Self { kind, position }
    }
}

/// A raw option key that matched none of a command's declared options.
///
/// Distinct from a mapping failure: this is a vocabulary mismatch, not a type
/// mismatch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown option '{name}'")]
pub struct UnknownOptionError {
    pub name: String,
}

/// Silent signal used to fall through to the next command pattern.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MappingError {
    /// The invocation's argument count does not fit the pattern's arity.
    #[error("wrong amount of arguments: pattern takes {expected}, got {got}")]
    WrongArgumentCount { expected: usize, got: usize },

    /// One token failed to map under its argument type.
    #[error("failed to map argument [{raw}]")]
    Unmappable { raw: String },
}

/// Raised while building or registering a [`Command`](crate::Command).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandBuildError {
    /// A command needs at least one alias; the first one is its name.
    #[error("a command requires at least one alias")]
    NoAliases,

    /// Two options of the same command share a long or short name.
    #[error("option '{name}' collides with an already declared option")]
    OptionCollision { name: String },

    /// A repeatable argument in a slot other than the last of a pattern.
    #[error("only the last argument of a pattern may be repeatable")]
    MisplacedRepeatable,

    /// Two registered commands share an alias.
    #[error("alias '{alias}' is already registered")]
    AliasCollision { alias: String },
}

/// Failure of a full [`Dispatcher`](crate::Dispatcher) round.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// The line was empty (or whitespace only).
    #[error("empty input line")]
    EmptyInput,

    /// The first token resolved to no registered command.
    #[error("unknown command '{name}'")]
    UnknownCommand {
        name: String,
        /// Closest registered name, if any is within editing distance.
        suggestion: Option<String>,
    },

    /// The remainder of the line failed to tokenize.
    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    /// An option outside the command's declared vocabulary.
    #[error(transparent)]
    UnknownOption(#[from] UnknownOptionError),

    /// Every declared pattern was tried and none accepted the invocation.
    /// Carries the attempted arguments and options for diagnostics.
    #[error("no pattern of '{command}' matched {arguments:?} with options {options:?}")]
    NoPatternMatched {
        command: String,
        arguments: Vec<String>,
        options: Vec<(String, String)>,
    },
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_syntax_error_display_carries_offset() {
        let err = SyntaxError::new(SyntaxErrorKind::UnterminatedQuote, 7);
        assert_eq!(err.to_string(), "quote not closed at position 7");
    }

    #[test]
    fn test_dispatch_error_wraps_syntax_transparently() {
        let err: DispatchError = SyntaxError::new(SyntaxErrorKind::DuplicateOption, 3).into();
        assert_eq!(err.to_string(), "duplicate option at position 3");
    }

    #[test]
    fn test_unknown_option_names_the_offender() {
        let err = UnknownOptionError {
            name: "frce".into(),
        };
        assert_eq!(err.to_string(), "unknown option 'frce'");
    }
}
