//! Expression arguments accepted by the builder's composition calls.
//!
//! Arguments are plain data; aliases are resolved and gaps are bound when
//! a [`Builder`](crate::Builder) composes them, never at construction.

use crate::ast::Node;
use crate::flags::FlagSet;

/// One atom of a composed expression.
#[derive(Debug, Clone)]
pub enum Arg {
    /// Literal text; every pattern metacharacter is escaped.
    Text(String),
    /// Native pattern source used verbatim, with the flags it requires.
    Raw { source: String, flags: FlagSet },
    /// Alias reference, optionally carrying a modifier suffix
    /// (`"Digit+"`, `"Word*?"`, `"[^Space]"`).
    Ref(String),
    /// An already-composed node.
    Node(Node),
    /// An `until`/`behind_until` boundary.  Without a terminator it binds
    /// to everything that follows in the same expression.
    Until {
        behind: bool,
        terminator: Option<Vec<Arg>>,
    },
}

/// Literal text; metacharacters match themselves.
pub fn text(text: impl Into<String>) -> Arg {
    Arg::Text(text.into())
}

/// Verbatim native pattern source.
pub fn raw(source: impl Into<String>) -> Arg {
    Arg::Raw {
        source: source.into(),
        flags: FlagSet::empty(),
    }
}

/// Verbatim native pattern source carrying flags that join the inferred set.
pub fn raw_with_flags(source: impl Into<String>, flags: FlagSet) -> Arg {
    Arg::Raw {
        source: source.into(),
        flags,
    }
}

/// Reference an alias by name, with an optional modifier suffix.
pub fn alias(reference: impl Into<String>) -> Arg {
    Arg::Ref(reference.into())
}

/// Embed an already-composed node.
pub fn node(node: Node) -> Arg {
    Arg::Node(node)
}

/// Match lazily up to `terminator`.  An empty terminator defers the
/// boundary to whatever follows in the same expression.
pub fn until(terminator: &[Arg]) -> Arg {
    Arg::Until {
        behind: false,
        terminator: non_empty(terminator),
    }
}

/// Lookbehind variant of [`until`].
pub fn behind_until(terminator: &[Arg]) -> Arg {
    Arg::Until {
        behind: true,
        terminator: non_empty(terminator),
    }
}

fn non_empty(args: &[Arg]) -> Option<Vec<Arg>> {
    if args.is_empty() {
        None
    } else {
        Some(args.to_vec())
    }
}

impl From<Node> for Arg {
    fn from(node: Node) -> Arg {
        Arg::Node(node)
    }
}
