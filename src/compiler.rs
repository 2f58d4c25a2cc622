//! Serialization of a [`Node`] tree into native pattern source.
//!
//! Compilation is recursive and bottom-up.  Fragments carry explicit byte
//! offsets ("marks") of pending end boundaries left by deferred `until`
//! nodes; a finalize step at the outermost level resolves exactly one mark
//! to `$` and rejects ambiguous leftovers.

use crate::ast::{Content, Node};
use crate::boundary::unwrap_outer_group;
use crate::error::BuildError;
use crate::flags::{Flag, FlagSet};

/// Maximum pattern nesting depth before compilation gives up.
const MAX_DEPTH: usize = 128;

/// A piece of compiled pattern source plus the positions of pending end
/// boundaries inside it.
#[derive(Debug, Clone, Default)]
pub(crate) struct Fragment {
    pub(crate) text: String,
    pub(crate) marks: Vec<usize>,
}

impl Fragment {
    pub(crate) fn from_text(text: impl Into<String>) -> Fragment {
        Fragment {
            text: text.into(),
            marks: Vec::new(),
        }
    }

    /// Append `other`, shifting its marks past the current text.
    pub(crate) fn append(&mut self, other: Fragment) {
        let offset = self.text.len();
        self.text.push_str(&other.text);
        self.marks.extend(other.marks.iter().map(|m| m + offset));
    }

    /// Surround the fragment, shifting marks past the prefix.
    pub(crate) fn wrap(&mut self, prefix: &str, suffix: &str) {
        self.text.insert_str(0, prefix);
        self.text.push_str(suffix);
        for mark in &mut self.marks {
            *mark += prefix.len();
        }
    }
}

/// A compiled pattern: native source text plus a normalized flag set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Compiled {
    pub source: String,
    pub flags: FlagSet,
}

impl Compiled {
    /// Hand the pattern to the native engine.  `i`/`m`/`s` become an
    /// inline flag prefix; `g` and `y` are matching-loop concerns.
    pub fn to_regex(&self) -> Result<fancy_regex::Regex, BuildError> {
        regex_for(&self.source, self.flags)
    }
}

pub(crate) fn regex_for(source: &str, flags: FlagSet) -> Result<fancy_regex::Regex, BuildError> {
    let inline: String = [Flag::CaseInsensitive, Flag::Multiline, Flag::DotAll]
        .into_iter()
        .filter(|f| flags.contains(*f))
        .map(Flag::code)
        .collect();
    let pattern = if inline.is_empty() {
        source.to_string()
    } else {
        format!("(?{inline}){source}")
    };
    fancy_regex::Regex::new(&pattern).map_err(|e| BuildError::Engine(e.to_string()))
}

/// Compile a node tree to source and flags.
///
/// Flag priority: explicit `flags` argument, then the root's forced flags,
/// then the union over literal leaves.  The global-match flag is always
/// force-included.
pub(crate) fn compile(root: &Node, flags: Option<FlagSet>) -> Result<Compiled, BuildError> {
    let fragment = emit(root, 0)?;
    let source = finalize(fragment)?;
    let flags = flags
        .or(root.forced_flags)
        .unwrap_or_else(|| collect_flags(root))
        .normalized();
    Ok(Compiled { source, flags })
}

/// Serialize one node recursively.
pub(crate) fn emit(node: &Node, depth: usize) -> Result<Fragment, BuildError> {
    if depth > MAX_DEPTH {
        return Err(BuildError::TooDeep);
    }
    let mut fragment = match &node.content {
        Content::Literal(lit) => Fragment {
            text: lit.source.clone(),
            marks: lit.marks.clone(),
        },
        Content::Composite(children) => {
            let mut combined = Fragment::default();
            for child in children {
                let mut part = emit(child, depth + 1)?;
                // Already-grouped heuristic: lookarounds, named groups and
                // the like are not wrapped a second time.
                if !part.text.starts_with('(') {
                    part.wrap("(", ")");
                }
                combined.append(part);
            }
            combined
        }
        Content::Gap {
            terminator,
            behind,
            to_end,
        } => {
            let term = unwrap_outer_group(emit(terminator, depth + 1)?);
            let mut gap = Fragment::from_text(".*?(?=");
            gap.append(term);
            if *to_end {
                gap.marks.push(gap.text.len());
            }
            gap.text.push(')');
            if *behind {
                gap.wrap("(?<=", ")");
            }
            gap
        }
    };

    if !node.alternatives.is_empty() {
        let mut combined = Fragment::from_text("(");
        fragment.wrap("(", ")");
        combined.append(fragment);
        for alternative in &node.alternatives {
            combined.text.push('|');
            let mut branch = emit(alternative, depth + 1)?;
            branch.wrap("(", ")");
            combined.append(branch);
        }
        combined.text.push(')');
        fragment = combined;
    }

    // Fixed quantifier precedence.
    if node.plus {
        fragment.wrap("(", ")");
        fragment.text.push('+');
    }
    if node.star && node.optional {
        // Star and optional together collapse into one lazy quantifier.
        fragment.wrap("(", ")");
        fragment.text.push_str("*?");
    } else if node.star {
        fragment.wrap("(", ")");
        fragment.text.push('*');
    }
    if let Some(suffix) = &node.quantifier {
        fragment.wrap("(", ")");
        fragment.text.push_str(suffix);
    }
    if node.negated {
        fragment.wrap("[^", "]");
    }
    if node.optional && !node.star {
        fragment.wrap("(", ")");
        fragment.text.push('?');
    }
    Ok(fragment)
}

/// Resolve pending end boundaries at the outermost level: exactly one mark
/// becomes `$`; more than one is ambiguous and rejected.
fn finalize(fragment: Fragment) -> Result<String, BuildError> {
    let Fragment { mut text, marks } = fragment;
    match marks.as_slice() {
        [] => Ok(text),
        [mark] => {
            text.insert(*mark, '$');
            Ok(text)
        }
        _ => Err(BuildError::AmbiguousBoundary),
    }
}

/// Union the flags of all literal leaves.
pub(crate) fn collect_flags(node: &Node) -> FlagSet {
    let mut flags = match &node.content {
        Content::Literal(lit) => lit.flags,
        Content::Composite(children) => children
            .iter()
            .fold(FlagSet::empty(), |acc, c| acc.union(collect_flags(c))),
        Content::Gap { terminator, .. } => collect_flags(terminator),
    };
    for alternative in &node.alternatives {
        flags = flags.union(collect_flags(alternative));
    }
    flags
}

/// Escape every pattern metacharacter in literal text.
pub(crate) fn escape_text(text: &str) -> String {
    const META: &[char] = &[
        '\\', '/', '^', '$', '.', '|', '?', '*', '+', '(', ')', '[', ']', '{', '}', '-',
    ];
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if META.contains(&c) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit(source: &str) -> Node {
        Node::literal(source, FlagSet::empty())
    }

    fn source(node: &Node) -> String {
        compile(node, None).unwrap().source
    }

    // --- Serialization ---

    #[test]
    fn literal_passthrough() {
        assert_eq!(source(&lit("[0-9]")), "[0-9]");
    }

    #[test]
    fn composite_wraps_children() {
        let node = Node::composite(vec![lit("ab"), lit("cd")]);
        assert_eq!(source(&node), "(ab)(cd)");
    }

    #[test]
    fn already_grouped_children_not_rewrapped() {
        let node = Node::composite(vec![lit("(?=x)"), lit("ab")]);
        assert_eq!(source(&node), "(?=x)(ab)");
    }

    #[test]
    fn alternatives_joined_with_pipe() {
        let node = lit("a").or(lit("b")).or(lit("c"));
        assert_eq!(source(&node), "((a)|(b)|(c))");
    }

    // --- Quantifiers ---

    #[test]
    fn plus_wraps() {
        let mut node = lit("[0-9]");
        node.plus = true;
        assert_eq!(source(&node), "([0-9])+");
    }

    #[test]
    fn star_and_optional_collapse_to_lazy_star() {
        let mut node = lit("a");
        node.star = true;
        node.optional = true;
        assert_eq!(source(&node), "(a)*?");
    }

    #[test]
    fn star_alone() {
        let mut node = lit("a");
        node.star = true;
        assert_eq!(source(&node), "(a)*");
    }

    #[test]
    fn plus_then_optional_nests() {
        let mut node = lit("a");
        node.plus = true;
        node.optional = true;
        assert_eq!(source(&node), "((a)+)?");
    }

    #[test]
    fn custom_quantifier_suffix() {
        let node = lit("a").quantifier("{2,5}").unwrap();
        assert_eq!(source(&node), "(a){2,5}");
    }

    #[test]
    fn negated_set() {
        let mut node = lit("abc");
        node.negated = true;
        assert_eq!(source(&node), "[^abc]");
    }

    // --- Deferred boundaries ---

    #[test]
    fn resolved_gap_has_no_anchor() {
        let node = Node::composite(vec![lit("xxx"), Node::gap(lit("B"), false, false)]);
        assert_eq!(source(&node), "(xxx)(.*?(?=B))");
    }

    #[test]
    fn pending_gap_anchors_to_end() {
        let node = Node::composite(vec![lit("a"), Node::gap(lit("B"), false, true), lit("B")]);
        assert_eq!(source(&node), "(a)(.*?(?=B$))(B)");
    }

    #[test]
    fn pending_behind_gap() {
        let node = Node::gap(lit("B"), true, true);
        assert_eq!(source(&node), "(?<=.*?(?=B$))");
    }

    #[test]
    fn two_pending_gaps_rejected() {
        let node = Node::composite(vec![
            Node::gap(lit("x"), false, true),
            Node::gap(lit("y"), false, true),
        ]);
        assert!(matches!(
            compile(&node, None),
            Err(BuildError::AmbiguousBoundary)
        ));
    }

    // --- Depth guard ---

    #[test]
    fn nesting_limit_enforced() {
        let mut node = lit("a");
        for _ in 0..200 {
            node = Node::composite(vec![node]);
        }
        assert!(matches!(compile(&node, None), Err(BuildError::TooDeep)));
    }

    // --- Flags ---

    #[test]
    fn flags_union_over_leaves() {
        let node = Node::composite(vec![
            Node::literal("a", "i".parse().unwrap()),
            Node::literal("b", "m".parse().unwrap()),
        ]);
        let compiled = compile(&node, None).unwrap();
        assert_eq!(compiled.flags.to_string(), "gim");
    }

    #[test]
    fn forced_flags_override_inference() {
        let node = Node::composite(vec![Node::literal("a", "i".parse().unwrap())])
            .with_flags("s".parse().unwrap());
        let compiled = compile(&node, None).unwrap();
        assert_eq!(compiled.flags.to_string(), "gs");
    }

    #[test]
    fn explicit_flags_win() {
        let node = Node::literal("a", "i".parse().unwrap()).with_flags("s".parse().unwrap());
        let compiled = compile(&node, Some("m".parse().unwrap())).unwrap();
        assert_eq!(compiled.flags.to_string(), "gm");
    }

    #[test]
    fn global_always_included() {
        let compiled = compile(&lit("a"), None).unwrap();
        assert!(compiled.flags.contains(Flag::Global));
    }

    // --- Escaping ---

    #[test]
    fn metacharacters_escaped() {
        assert_eq!(escape_text("a.b*c"), r"a\.b\*c");
        assert_eq!(escape_text("(x)"), r"\(x\)");
        assert_eq!(escape_text(r"a\b"), r"a\\b");
    }

    #[test]
    fn escaped_literal_matches_itself_only() {
        let source = escape_text("1+1");
        let re = regex_for(&source, FlagSet::empty()).unwrap();
        assert!(re.is_match("1+1").unwrap());
        assert!(!re.is_match("11").unwrap());
    }
}
