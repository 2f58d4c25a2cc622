//! The builder session: alias definitions, expression composition, the
//! boundary combinators and the capture entry point.
//!
//! A session owns one alias registry.  Every composition call resolves
//! references against it by `&`; resolved aliases are cloned nodes, the
//! registry itself is never copied.

use crate::arg::Arg;
use crate::ast::Node;
use crate::boundary::{is_gap_fragment, is_meta_group, unwrap_outer_group};
use crate::capture::{self, Anchor, CaptureGroup, MatchFields, valid_group_name};
use crate::compiler::{self, Compiled, escape_text};
use crate::error::BuildError;
use crate::flags::FlagSet;
use crate::registry::AliasRegistry;
use crate::resolver::resolve_ref;

/// A pattern-building session.
#[derive(Debug, Default)]
pub struct Builder {
    aliases: AliasRegistry,
}

impl Builder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a named, reusable sub-pattern.  Aliases defined here are
    /// visible to every later composition in this session.
    pub fn define_alias(&mut self, name: &str, definition: Arg) -> Result<(), BuildError> {
        let node = self.arg_node(&definition, &[])?;
        self.aliases.define(name, node)
    }

    /// Compose arguments into a single node without compiling it.
    pub fn expr(&self, args: &[Arg]) -> Result<Node, BuildError> {
        self.compose(args)
    }

    /// Compose and compile, inferring flags from literal leaves.
    pub fn compile(&self, args: &[Arg]) -> Result<Compiled, BuildError> {
        compiler::compile(&self.compose(args)?, None)
    }

    /// Compose and compile with an explicit flag set (the global-match
    /// flag is still force-included).
    pub fn compile_with_flags(
        &self,
        args: &[Arg],
        flags: FlagSet,
    ) -> Result<Compiled, BuildError> {
        compiler::compile(&self.compose(args)?, Some(flags))
    }

    /// Compile an already-composed node.
    pub fn compile_node(&self, node: &Node) -> Result<Compiled, BuildError> {
        compiler::compile(node, None)
    }

    // ─── Boundary combinators ───────────────────────────────────────────

    /// Negated character set: `[^…]`.
    pub fn not(&self, args: &[Arg]) -> Result<Node, BuildError> {
        self.wrapped(args, "[^", "]")
    }

    /// Lookahead: `(?=…)`.
    pub fn lookahead(&self, args: &[Arg]) -> Result<Node, BuildError> {
        self.wrapped(args, "(?=", ")")
    }

    /// Lookbehind: `(?<=…)`.
    pub fn lookbehind(&self, args: &[Arg]) -> Result<Node, BuildError> {
        self.wrapped(args, "(?<=", ")")
    }

    /// Negative lookahead: `(?!…)`.
    pub fn negative_lookahead(&self, args: &[Arg]) -> Result<Node, BuildError> {
        self.wrapped(args, "(?!", ")")
    }

    /// Negative lookbehind: `(?<!…)`.
    pub fn negative_lookbehind(&self, args: &[Arg]) -> Result<Node, BuildError> {
        self.wrapped(args, "(?<!", ")")
    }

    /// Non-capturing group: `(?:…)`.
    pub fn uncaptured(&self, args: &[Arg]) -> Result<Node, BuildError> {
        self.wrapped(args, "(?:", ")")
    }

    /// Named capture group: `(?<name>…)`.
    pub fn named(&self, name: &str, args: &[Arg]) -> Result<Node, BuildError> {
        if !valid_group_name(name) {
            return Err(BuildError::InvalidGroupName(name.to_string()));
        }
        self.wrapped(args, &format!("(?<{name}>"), ")")
    }

    /// Wrap each argument in a sequentially named group `group_1`,
    /// `group_2`, ….  Arguments that compile to an already-meta group or
    /// to a lazy-wildcard gap fragment are left as they are.
    pub fn groups(&self, args: &[Arg]) -> Result<Node, BuildError> {
        let mut combined = compiler::Fragment::default();
        let mut flags = FlagSet::empty();
        let mut index = 0usize;
        for (i, arg) in args.iter().enumerate() {
            let child = self.arg_node(arg, &args[i + 1..])?;
            flags = flags.union(compiler::collect_flags(&child));
            let mut part = unwrap_outer_group(compiler::emit(&child, 0)?);
            if !is_meta_group(&part.text) && !is_gap_fragment(&part.text) {
                index += 1;
                part.wrap(&format!("(?<group_{index}>"), ")");
            }
            combined.append(part);
        }
        Ok(Node::from_fragment(combined, flags))
    }

    /// Run structured extraction over `text` with the session's aliases
    /// in scope.
    pub fn capture(
        &self,
        text: &str,
        groups: &[CaptureGroup],
        anchor: Anchor,
        flags: FlagSet,
    ) -> Result<Vec<MatchFields>, BuildError> {
        capture::run(&self.aliases, text, groups, anchor, flags)
    }

    // ─── Composition ────────────────────────────────────────────────────

    fn compose(&self, args: &[Arg]) -> Result<Node, BuildError> {
        let mut children = Vec::with_capacity(args.len());
        for (i, arg) in args.iter().enumerate() {
            children.push(self.arg_node(arg, &args[i + 1..])?);
        }
        Ok(Node::composite(children))
    }

    /// Turn one argument into a node.  `rest` is the sibling tail, needed
    /// to bind a deferred boundary to whatever follows it.
    fn arg_node(&self, arg: &Arg, rest: &[Arg]) -> Result<Node, BuildError> {
        match arg {
            Arg::Text(text) => Ok(Node::literal(escape_text(text), FlagSet::empty())),
            Arg::Raw { source, flags } => Ok(Node::literal(source.clone(), *flags)),
            Arg::Ref(reference) => resolve_ref(&self.aliases, reference),
            Arg::Node(node) => Ok(node.clone()),
            Arg::Until {
                behind,
                terminator: Some(terminator),
            } => Ok(Node::gap(self.compose(terminator)?, *behind, false)),
            Arg::Until {
                behind,
                terminator: None,
            } => {
                if rest.is_empty() {
                    // Nothing follows; there is no terminator to bind to.
                    return Err(BuildError::AmbiguousBoundary);
                }
                Ok(Node::gap(self.compose(rest)?, *behind, true))
            }
        }
    }

    fn wrapped(&self, args: &[Arg], prefix: &str, suffix: &str) -> Result<Node, BuildError> {
        let composed = self.compose(args)?;
        let flags = compiler::collect_flags(&composed);
        let mut fragment = unwrap_outer_group(compiler::emit(&composed, 0)?);
        fragment.wrap(prefix, suffix);
        Ok(Node::from_fragment(fragment, flags))
    }
}
