//! Diagnostic reporting.
//!
//! Library code returns errors; the reporter is how front ends surface
//! them.  The CLI uses [`ConsoleReporter`]; embedders can route messages
//! anywhere by implementing [`Reporter`].

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Error,
    Warning,
    Info,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Error => write!(f, "error"),
            Level::Warning => write!(f, "warning"),
            Level::Info => write!(f, "info"),
        }
    }
}

/// Sink for diagnostics emitted outside the `Result` channel.
pub trait Reporter {
    fn report(&mut self, level: Level, message: &str);
}

/// Writes diagnostics to standard error.
#[derive(Debug, Default)]
pub struct ConsoleReporter;

impl Reporter for ConsoleReporter {
    fn report(&mut self, level: Level, message: &str) {
        eprintln!("{level}: {message}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_render_lowercase() {
        assert_eq!(Level::Error.to_string(), "error");
        assert_eq!(Level::Warning.to_string(), "warning");
        assert_eq!(Level::Info.to_string(), "info");
    }

    #[test]
    fn reporter_is_object_safe() {
        struct Collect(Vec<(Level, String)>);
        impl Reporter for Collect {
            fn report(&mut self, level: Level, message: &str) {
                self.0.push((level, message.to_string()));
            }
        }
        let mut sink = Collect(Vec::new());
        let reporter: &mut dyn Reporter = &mut sink;
        reporter.report(Level::Warning, "shadowed alias");
        assert_eq!(sink.0, vec![(Level::Warning, "shadowed alias".to_string())]);
    }
}
