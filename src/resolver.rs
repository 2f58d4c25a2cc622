//! Resolution of alias references with trailing modifier suffixes.
//!
//! A reference such as `"Digit+"` peels the longest matching suffix first
//! and applies the corresponding modifier to a clone of the bound node.
//! Peeling is recursive, so `"[^Word*]"` resolves to a negated
//! zero-or-more `Word`.  An exact registry match always wins before any
//! peeling.

use crate::ast::Node;
use crate::error::BuildError;
use crate::registry::AliasRegistry;

/// A modifier applied to an alias reference, resolved once at reference
/// time and never re-parsed from strings at compile time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Modifier {
    Optional,       // ?
    OneOrMore,      // +
    ZeroOrMore,     // *
    LazyZeroOrMore, // *?
    LazyOneOrMore,  // +?
    Negated,        // [^…]
}

/// Resolve `reference` against the registry, applying any suffix
/// modifiers to a clone of the bound node.
pub(crate) fn resolve_ref(
    registry: &AliasRegistry,
    reference: &str,
) -> Result<Node, BuildError> {
    let mut modifiers = Vec::new();
    match peel(registry, reference, &mut modifiers) {
        Some(node) => Ok(apply(node, &modifiers)),
        None => Err(BuildError::UnknownAlias(reference.to_string())),
    }
}

fn peel(registry: &AliasRegistry, name: &str, modifiers: &mut Vec<Modifier>) -> Option<Node> {
    if let Some(node) = registry.get(name) {
        return Some(node);
    }
    // Longest suffix first: `*?` and `+?` before `?`, `+`, `*`.
    if let Some(rest) = name.strip_suffix("*?") {
        modifiers.push(Modifier::LazyZeroOrMore);
        peel(registry, rest, modifiers)
    } else if let Some(rest) = name.strip_suffix("+?") {
        modifiers.push(Modifier::LazyOneOrMore);
        peel(registry, rest, modifiers)
    } else if let Some(rest) = name.strip_prefix("[^").and_then(|r| r.strip_suffix(']')) {
        modifiers.push(Modifier::Negated);
        peel(registry, rest, modifiers)
    } else if let Some(rest) = name.strip_suffix('?') {
        modifiers.push(Modifier::Optional);
        peel(registry, rest, modifiers)
    } else if let Some(rest) = name.strip_suffix('+') {
        modifiers.push(Modifier::OneOrMore);
        peel(registry, rest, modifiers)
    } else if let Some(rest) = name.strip_suffix('*') {
        modifiers.push(Modifier::ZeroOrMore);
        peel(registry, rest, modifiers)
    } else {
        None
    }
}

fn apply(mut node: Node, modifiers: &[Modifier]) -> Node {
    for modifier in modifiers {
        match modifier {
            Modifier::Optional => node.optional = true,
            Modifier::OneOrMore => node.plus = true,
            Modifier::ZeroOrMore => node.star = true,
            Modifier::LazyZeroOrMore => {
                node.star = true;
                node.optional = true;
            }
            Modifier::LazyOneOrMore => {
                node.plus = true;
                node.optional = true;
            }
            Modifier::Negated => node.negated = true,
        }
    }
    node
}
