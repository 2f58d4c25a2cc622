//! Shared paren handling for the boundary combinators.
//!
//! Every combinator compiles its arguments, strips one redundant outer
//! group with [`unwrap_outer_group`], then wraps the result in its own
//! meta syntax.  The strip is verified by a balanced-depth scan so nested
//! unrelated parens never trigger an unwrap, and meta groups (`(?…`) are
//! left intact.

use crate::compiler::Fragment;

/// True for sources that are already a meta group (`(?:`, `(?=`, `(?<…>`,
/// lookbehinds, …).
pub(crate) fn is_meta_group(source: &str) -> bool {
    source.starts_with("(?")
}

/// True for lazy-wildcard gap fragments emitted by the `until` boundaries.
pub(crate) fn is_gap_fragment(source: &str) -> bool {
    source.starts_with(".*?")
}

/// Strip exactly one plain outer paren pair, when the opening paren's
/// matching close is the final character of the source.
pub(crate) fn unwrap_outer_group(fragment: Fragment) -> Fragment {
    if outer_pair_spans_all(&fragment.text) {
        let text = fragment.text[1..fragment.text.len() - 1].to_string();
        let marks = fragment.marks.iter().map(|m| m - 1).collect();
        Fragment { text, marks }
    } else {
        fragment
    }
}

fn outer_pair_spans_all(source: &str) -> bool {
    if !source.starts_with('(') || is_meta_group(source) || !source.ends_with(')') {
        return false;
    }
    let bytes = source.as_bytes();
    let mut depth = 0usize;
    let mut i = 0usize;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 1, // skip the escaped byte
            b'(' => depth += 1,
            b')' => {
                depth -= 1;
                if depth == 0 {
                    return i == bytes.len() - 1;
                }
            }
            _ => {}
        }
        i += 1;
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unwrap(source: &str) -> String {
        unwrap_outer_group(Fragment::from_text(source)).text
    }

    #[test]
    fn strips_single_outer_pair() {
        assert_eq!(unwrap("(abc)"), "abc");
    }

    #[test]
    fn strips_only_one_pair() {
        assert_eq!(unwrap("((abc))"), "(abc)");
    }

    #[test]
    fn nested_unrelated_parens_left_alone() {
        // The first '(' closes before the end; stripping would corrupt it.
        assert_eq!(unwrap("(a)(b)"), "(a)(b)");
    }

    #[test]
    fn meta_groups_left_alone() {
        assert_eq!(unwrap("(?:abc)"), "(?:abc)");
        assert_eq!(unwrap("(?=abc)"), "(?=abc)");
        assert_eq!(unwrap("(?<name>abc)"), "(?<name>abc)");
    }

    #[test]
    fn escaped_parens_ignored_by_scan() {
        assert_eq!(unwrap(r"(a\))"), r"a\)");
        assert_eq!(unwrap(r"\(a\)"), r"\(a\)");
    }

    #[test]
    fn unbalanced_left_alone() {
        assert_eq!(unwrap("(a"), "(a");
    }

    #[test]
    fn marks_shift_with_strip() {
        let fragment = Fragment {
            text: "(abc)".to_string(),
            marks: vec![4],
        };
        let unwrapped = unwrap_outer_group(fragment);
        assert_eq!(unwrapped.text, "abc");
        assert_eq!(unwrapped.marks, vec![3]);
    }
}
