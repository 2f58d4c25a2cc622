//! The alias registry: named, reusable sub-pattern definitions.
//!
//! One registry lives on each [`Builder`](crate::Builder) session and is
//! passed by reference into every composition call.  Alias names are
//! unique per session; re-binding is an error rather than a silent
//! overwrite.

use std::collections::HashMap;

use phf::{Map, phf_map};

use crate::ast::Node;
use crate::error::BuildError;
use crate::flags::FlagSet;

/// Pattern sources for alias names that are always available.
static BUILTIN_ALIASES: Map<&'static str, &'static str> = phf_map! {
    "begin" => "^",
    "end" => "$",
};

/// Mapping from alias name to its pattern node definition.
#[derive(Debug, Default)]
pub(crate) struct AliasRegistry {
    entries: HashMap<String, Node>,
}

impl AliasRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `name` to `node`.  Fails if the name is already bound or is a
    /// built-in keyword.
    pub fn define(&mut self, name: &str, node: Node) -> Result<(), BuildError> {
        if BUILTIN_ALIASES.contains_key(name) || self.entries.contains_key(name) {
            return Err(BuildError::DuplicateAlias(name.to_string()));
        }
        self.entries.insert(name.to_string(), node);
        Ok(())
    }

    /// Look up an exact alias name, returning a clone of its definition.
    pub fn get(&self, name: &str) -> Option<Node> {
        if let Some(node) = self.entries.get(name) {
            return Some(node.clone());
        }
        BUILTIN_ALIASES
            .get(name)
            .map(|source| Node::literal(*source, FlagSet::empty()))
    }
}
