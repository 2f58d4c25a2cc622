//! Composable pattern building and structured capture on top of a native
//! regex engine.
//!
//! Patterns are assembled from named aliases, literal text and raw source
//! instead of being written as one opaque string.  Alias references accept
//! a modifier suffix:
//!
//! | Suffix   | Meaning                  |
//! |----------|--------------------------|
//! | `?`      | optional                 |
//! | `+`      | one or more              |
//! | `*`      | zero or more             |
//! | `*?`     | zero or more, lazy       |
//! | `+?`     | one or more, lazy        |
//! | `[^…]`   | negated character set    |
//!
//! # Example
//!
//! ```rust
//! use braid::{Anchor, Builder, CaptureGroup, FlagSet, alias, raw};
//!
//! let mut builder = Builder::new();
//! builder.define_alias("Digit", raw("[0-9]")).unwrap();
//!
//! let compiled = builder.compile(&[alias("Digit+")]).unwrap();
//! assert_eq!(compiled.source, "([0-9])+");
//!
//! let matches = builder
//!     .capture(
//!         "key: 42",
//!         &[CaptureGroup::raw("Number", "[0-9]+")],
//!         Anchor::None,
//!         FlagSet::empty(),
//!     )
//!     .unwrap();
//! assert_eq!(matches[0].get("Number"), Some("42"));
//! ```

mod arg;
mod ast;
mod boundary;
mod builder;
mod capture;
mod compiler;
mod error;
mod flags;
mod registry;
mod resolver;
mod report;

pub use arg::{Arg, alias, behind_until, node, raw, raw_with_flags, text, until};
pub use ast::Node;
pub use builder::Builder;
pub use capture::{Anchor, CaptureGroup, MatchFields};
pub use compiler::Compiled;
pub use error::BuildError;
pub use flags::{Flag, FlagSet};
pub use report::{ConsoleReporter, Level, Reporter};
