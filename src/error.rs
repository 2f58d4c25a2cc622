//! Errors reported while composing or compiling patterns.
//!
//! Every error aborts the whole operation: no partial pattern source or
//! partial capture result is ever returned.

/// Errors that can occur while building, compiling or executing a pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    /// An alias reference did not resolve to a defined name.
    UnknownAlias(String),
    /// An alias name was already bound in this session (re-binding is
    /// disallowed, not overwritten).
    DuplicateAlias(String),
    /// A capture-group identifier is malformed or collides with another.
    InvalidGroupName(String),
    /// A custom quantifier suffix is not valid native syntax.
    MalformedQuantifier(String),
    /// A deferred `until`/`behind_until` boundary has nothing to bind to,
    /// or more than one remained unresolved at the top level.
    AmbiguousBoundary,
    /// A flag character outside the recognized set `{i, g, m, s, u, y}`.
    UnknownFlag(char),
    /// Pattern nesting exceeded the compiler's recursion limit.
    TooDeep,
    /// The native pattern engine rejected the emitted source or failed at
    /// match time.
    Engine(String),
}

impl std::fmt::Display for BuildError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownAlias(name) => write!(f, "Unknown alias: {name:?}"),
            Self::DuplicateAlias(name) => write!(f, "Alias already defined: {name:?}"),
            Self::InvalidGroupName(name) => {
                write!(f, "Invalid or colliding group name: {name:?}")
            }
            Self::MalformedQuantifier(q) => write!(f, "Malformed quantifier suffix: {q:?}"),
            Self::AmbiguousBoundary => {
                write!(f, "Deferred boundary has no unambiguous terminator")
            }
            Self::UnknownFlag(c) => write!(f, "Unrecognized flag: {c:?}"),
            Self::TooDeep => write!(f, "Pattern nesting exceeds the depth limit"),
            Self::Engine(msg) => write!(f, "Pattern engine error: {msg}"),
        }
    }
}

impl std::error::Error for BuildError {}
