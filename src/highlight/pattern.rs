//! Positioned regex matching with lookbehind-group exclusion.
//!
//! Rules match either against a single raw fragment (offset 0) or against
//! the full input starting at the cursor's absolute position (greedy rules).
//! Both go through [`match_at`]. A rule marked `lookbehind` treats the text
//! captured by its first group as preceding context: the reported span
//! starts after it, and the context stays behind as raw text.

use regex::Regex;

/// Span of a successful match, in byte offsets into the searched text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PatternHit {
    pub(crate) start: usize,
    pub(crate) end: usize,
}

/// Search `haystack` from `at` onward.
///
/// Anchors keep their usual meaning: `^` matches only at the start of
/// `haystack`, not at `at`. With `lookbehind`, a participating first capture
/// group shifts the hit's start past the captured context.
pub(crate) fn match_at(
    pattern: &Regex,
    haystack: &str,
    at: usize,
    lookbehind: bool,
) -> Option<PatternHit> {
    if lookbehind {
        let captures = pattern.captures_at(haystack, at)?;
        let full = captures.get(0)?;
        let mut start = full.start();
        if let Some(context) = captures.get(1) {
            start += context.as_str().len();
        }
        Some(PatternHit {
            start,
            end: full.end(),
        })
    } else {
        let found = pattern.find_at(haystack, at)?;
        Some(PatternHit {
            start: found.start(),
            end: found.end(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn regex(pattern: &str) -> Regex {
        Regex::new(pattern).unwrap()
    }

    #[test]
    fn test_match_at_start() {
        let hit = match_at(&regex(r"\d+"), "a12b", 0, false).unwrap();
        assert_eq!((hit.start, hit.end), (1, 3));
    }

    #[test]
    fn test_match_at_offset_skips_earlier_hits() {
        let hit = match_at(&regex(r"\d+"), "1a2", 1, false).unwrap();
        assert_eq!((hit.start, hit.end), (2, 3));
    }

    #[test]
    fn test_match_at_no_hit() {
        assert_eq!(match_at(&regex(r"\d"), "abc", 0, false), None);
    }

    #[test]
    fn test_caret_does_not_rebind_to_offset() {
        assert!(match_at(&regex(r"^a"), "ba", 1, false).is_none());
        assert!(match_at(&regex(r"^b"), "ba", 0, false).is_some());
    }

    #[test]
    fn test_lookbehind_shifts_start() {
        let hit = match_at(&regex(r"(\s)(if)\b"), "x if y", 0, true).unwrap();
        assert_eq!((hit.start, hit.end), (2, 4));
    }

    #[test]
    fn test_lookbehind_at_line_start_keeps_start() {
        let hit = match_at(&regex(r"(^|\s)(if)\b"), "if y", 0, true).unwrap();
        assert_eq!((hit.start, hit.end), (0, 2));
    }

    #[test]
    fn test_lookbehind_without_participating_group() {
        let hit = match_at(&regex(r"(x)?if"), "if", 0, true).unwrap();
        assert_eq!((hit.start, hit.end), (0, 2));
    }

    #[test]
    fn test_match_spans_are_byte_offsets() {
        let hit = match_at(&regex(r"\d+"), "é7", 0, false).unwrap();
        assert_eq!((hit.start, hit.end), (2, 3));
    }
}
