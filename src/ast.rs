//! The pattern node tree.
//!
//! A [`Node`] is either a literal fragment of native pattern source or a
//! composite over owned children, with alternation branches and
//! quantifier/negation state applied at compile time.  Nodes are plain
//! owned trees; compiling never mutates them.

use crate::compiler::Fragment;
use crate::error::BuildError;
use crate::flags::FlagSet;

/// One element of the pattern tree.
#[derive(Debug, Clone)]
pub struct Node {
    pub(crate) content: Content,
    /// Alternation branches, combined with `content` as `(a)|(b)|…`.
    pub(crate) alternatives: Vec<Node>,
    pub(crate) optional: bool,
    pub(crate) plus: bool,
    pub(crate) star: bool,
    /// Emit as a negated character set `[^…]`.
    pub(crate) negated: bool,
    /// Validated custom quantifier suffix, e.g. `{2,5}`.
    pub(crate) quantifier: Option<String>,
    /// Overrides flag inference when present.
    pub(crate) forced_flags: Option<FlagSet>,
}

#[derive(Debug, Clone)]
pub(crate) enum Content {
    Literal(Literal),
    Composite(Vec<Node>),
    /// A lazy gap up to a terminator: `.*?(?=TERM)`.  With `to_end` set the
    /// node is pending-terminal and binds to the end of the whole compiled
    /// expression in the compiler's finalize step.
    Gap {
        terminator: Box<Node>,
        behind: bool,
        to_end: bool,
    },
}

#[derive(Debug, Clone)]
pub(crate) struct Literal {
    pub(crate) source: String,
    pub(crate) flags: FlagSet,
    /// Byte offsets in `source` of pending end boundaries.
    pub(crate) marks: Vec<usize>,
}

impl Node {
    pub(crate) fn literal(source: impl Into<String>, flags: FlagSet) -> Node {
        Node::with_content(Content::Literal(Literal {
            source: source.into(),
            flags,
            marks: Vec::new(),
        }))
    }

    pub(crate) fn from_fragment(fragment: Fragment, flags: FlagSet) -> Node {
        Node::with_content(Content::Literal(Literal {
            source: fragment.text,
            flags,
            marks: fragment.marks,
        }))
    }

    pub(crate) fn composite(children: Vec<Node>) -> Node {
        Node::with_content(Content::Composite(children))
    }

    pub(crate) fn gap(terminator: Node, behind: bool, to_end: bool) -> Node {
        Node::with_content(Content::Gap {
            terminator: Box::new(terminator),
            behind,
            to_end,
        })
    }

    fn with_content(content: Content) -> Node {
        Node {
            content,
            alternatives: Vec::new(),
            optional: false,
            plus: false,
            star: false,
            negated: false,
            quantifier: None,
            forced_flags: None,
        }
    }

    /// Add an alternation branch.
    pub fn or(mut self, alternative: Node) -> Node {
        self.alternatives.push(alternative);
        self
    }

    /// Make this node optional (`?`).
    pub fn optional(mut self) -> Node {
        self.optional = true;
        self
    }

    /// Apply a custom quantifier suffix such as `{2,5}` or `+?`.
    pub fn quantifier(mut self, suffix: &str) -> Result<Node, BuildError> {
        validate_quantifier(suffix)?;
        self.quantifier = Some(suffix.to_string());
        Ok(self)
    }

    /// Force an explicit flag set, overriding inference from literal leaves.
    pub fn with_flags(mut self, flags: FlagSet) -> Node {
        self.forced_flags = Some(flags);
        self
    }
}

/// Check that `suffix` is a valid native quantifier: `?`, `+`, `*`, a lazy
/// variant of those, or a `{n}`/`{n,}`/`{n,m}` repetition with optional
/// trailing `?`.
pub(crate) fn validate_quantifier(suffix: &str) -> Result<(), BuildError> {
    match suffix {
        "?" | "+" | "*" | "??" | "+?" | "*?" => return Ok(()),
        _ => {}
    }
    let body = suffix.strip_suffix('?').unwrap_or(suffix);
    let malformed = || BuildError::MalformedQuantifier(suffix.to_string());
    let inner = body
        .strip_prefix('{')
        .and_then(|b| b.strip_suffix('}'))
        .ok_or_else(malformed)?;
    let parse = |s: &str| s.parse::<usize>().map_err(|_| malformed());
    match inner.split_once(',') {
        None => {
            parse(inner)?;
        }
        Some((lo, "")) => {
            parse(lo)?;
        }
        Some((lo, hi)) => {
            if parse(lo)? > parse(hi)? {
                return Err(malformed());
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_quantifiers_valid() {
        for q in ["?", "+", "*", "??", "+?", "*?"] {
            assert_eq!(validate_quantifier(q), Ok(()));
        }
    }

    #[test]
    fn repetition_ranges_valid() {
        for q in ["{3}", "{3,}", "{2,5}", "{2,5}?"] {
            assert_eq!(validate_quantifier(q), Ok(()));
        }
    }

    #[test]
    fn malformed_rejected() {
        for q in ["", "x", "{", "{}", "{a}", "{2,1}", "{,5}", "++"] {
            assert!(
                matches!(validate_quantifier(q), Err(BuildError::MalformedQuantifier(_))),
                "expected rejection of {q:?}"
            );
        }
    }

    #[test]
    fn node_quantifier_validates() {
        let node = Node::literal("a", FlagSet::empty());
        assert!(node.clone().quantifier("{1,3}").is_ok());
        assert!(matches!(
            node.quantifier("{3,1}"),
            Err(BuildError::MalformedQuantifier(_))
        ));
    }
}
