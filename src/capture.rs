//! Structured multi-group extraction over text.
//!
//! Each named group spec emits two native groups: an unnamed lazy gap
//! group `([\s\S]*?)` that absorbs unmodeled text before it, then the
//! named content group itself.  Only named groups surface to the caller.

use itertools::Itertools;

use crate::ast::{Node, validate_quantifier};
use crate::compiler;
use crate::error::BuildError;
use crate::flags::{Flag, FlagSet};
use crate::registry::AliasRegistry;
use crate::resolver::resolve_ref;

/// How the assembled capture pattern is pinned to the input text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Anchor {
    #[default]
    None,
    /// Prefix-anchored (`^`).
    Start,
    /// Suffix-anchored (`$`).
    End,
    /// Full-string anchored (`^…$`); at most one result per input.
    Full,
}

/// One named group to extract.
#[derive(Debug, Clone)]
pub struct CaptureGroup {
    name: String,
    pattern: GroupPattern,
    quantifier: Option<String>,
    optional: bool,
}

#[derive(Debug, Clone)]
enum GroupPattern {
    Raw(String),
    Ref(String),
    Node(Node),
}

impl CaptureGroup {
    /// A group matching verbatim native pattern source.
    pub fn raw(name: impl Into<String>, source: impl Into<String>) -> CaptureGroup {
        CaptureGroup::new(name, GroupPattern::Raw(source.into()))
    }

    /// A group matching an alias reference (modifier suffixes allowed).
    pub fn alias(name: impl Into<String>, reference: impl Into<String>) -> CaptureGroup {
        CaptureGroup::new(name, GroupPattern::Ref(reference.into()))
    }

    /// A group matching an already-composed node.
    pub fn node(name: impl Into<String>, node: Node) -> CaptureGroup {
        CaptureGroup::new(name, GroupPattern::Node(node))
    }

    fn new(name: impl Into<String>, pattern: GroupPattern) -> CaptureGroup {
        CaptureGroup {
            name: name.into(),
            pattern,
            quantifier: None,
            optional: false,
        }
    }

    /// Append a validated quantifier suffix to the named group.
    pub fn quantifier(mut self, suffix: &str) -> Result<CaptureGroup, BuildError> {
        validate_quantifier(suffix)?;
        self.quantifier = Some(suffix.to_string());
        Ok(self)
    }

    /// Make the whole named group optional.
    pub fn optional(mut self) -> CaptureGroup {
        self.optional = true;
        self
    }
}

/// The fields extracted for one match, in spec order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchFields {
    fields: Vec<(String, Option<String>)>,
}

impl MatchFields {
    /// The matched text for `name`, if the group participated in the match.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .and_then(|(_, v)| v.as_deref())
    }

    /// All requested fields in spec order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.fields
            .iter()
            .map(|(n, v)| (n.as_str(), v.as_deref()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// True for identifiers the native engine accepts as group names.
pub(crate) fn valid_group_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Assemble the capture pattern and run repeated matching over `text`.
pub(crate) fn run(
    registry: &AliasRegistry,
    text: &str,
    groups: &[CaptureGroup],
    anchor: Anchor,
    flags: FlagSet,
) -> Result<Vec<MatchFields>, BuildError> {
    let source = build_source(registry, groups, anchor)?;
    let names: Vec<String> = groups.iter().map(|g| g.name.clone()).collect();
    execute(&source, flags.normalized(), &names, text)
}

/// Emit the composite pattern: a gap group and a named group per spec,
/// then the anchor prefix/suffix.
pub(crate) fn build_source(
    registry: &AliasRegistry,
    groups: &[CaptureGroup],
    anchor: Anchor,
) -> Result<String, BuildError> {
    if let Some(bad) = groups.iter().find(|g| !valid_group_name(&g.name)) {
        return Err(BuildError::InvalidGroupName(bad.name.clone()));
    }
    if let Some(dup) = groups.iter().map(|g| g.name.as_str()).duplicates().next() {
        return Err(BuildError::InvalidGroupName(dup.to_string()));
    }

    let mut source = String::new();
    for group in groups {
        let pattern = match &group.pattern {
            GroupPattern::Raw(s) => s.clone(),
            GroupPattern::Ref(r) => {
                compiler::compile(&resolve_ref(registry, r)?, None)?.source
            }
            GroupPattern::Node(n) => compiler::compile(n, None)?.source,
        };
        source.push_str(r"([\s\S]*?)");
        let mut part = format!("(?<{}>{})", group.name, pattern);
        if let Some(q) = &group.quantifier {
            part.push_str(q);
        }
        if group.optional {
            part = format!("({part})?");
        }
        source.push_str(&part);
    }

    Ok(match anchor {
        Anchor::None => source,
        Anchor::Start => format!("^{source}"),
        Anchor::End => format!("{source}$"),
        Anchor::Full => format!("^{source}$"),
    })
}

/// Repeatedly match `source` over `text`, materializing one ordered field
/// map per match.  No match yields an empty sequence, not an error.
pub(crate) fn execute(
    source: &str,
    flags: FlagSet,
    names: &[String],
    text: &str,
) -> Result<Vec<MatchFields>, BuildError> {
    let re = compiler::regex_for(source, flags)?;
    let sticky = flags.contains(Flag::Sticky);
    let mut results = Vec::new();
    let mut pos = 0usize;

    while pos <= text.len() {
        let caps = re
            .captures_from_pos(text, pos)
            .map_err(|e| BuildError::Engine(e.to_string()))?;
        let Some(caps) = caps else { break };
        let Some(whole) = caps.get(0) else { break };
        if sticky && whole.start() != pos {
            break;
        }
        let fields = names
            .iter()
            .map(|n| (n.clone(), caps.name(n).map(|m| m.as_str().to_string())))
            .collect();
        results.push(MatchFields { fields });

        if whole.end() > whole.start() {
            pos = whole.end();
        } else {
            // Zero-width match: step one character to guarantee progress.
            match text[whole.end()..].chars().next() {
                Some(c) => pos = whole.end() + c.len_utf8(),
                None => break,
            }
        }
    }
    Ok(results)
}
