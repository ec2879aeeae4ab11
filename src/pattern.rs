//! The route pattern compiler.
//!
//! A pattern is a `/`-separated list of parts. Each part is either a literal
//! (`users`), a capture (`{id}`), or a capture with a constraint
//! (`{id}<\d+>`). A capture binds exactly one path segment; a constraint is a
//! regular expression applied to that single segment and never spans a `/`.

use crate::error::{Error, Result};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref CAPTURE_RE: Regex = Regex::new(r"^\{(?P<key>\w+)\}(?:<(?P<constraint>.+)>)?$").unwrap();
}

/// Characters allowed inside a `<constraint>`, besides ASCII word characters.
/// Everything else is refused at compile time to rule out pattern injection.
const CONSTRAINT_PUNCTUATION: &str = r"\^()+=<>?,.;:!£$%&*";

/// One slash-delimited unit of a compiled pattern.
#[derive(Debug, Clone)]
pub struct Segment {
    key: String,
    matcher: SegmentMatcher,
}

/// How a [`Segment`] decides whether a path segment fits.
#[derive(Debug, Clone)]
pub enum SegmentMatcher {
    /// Requires exact string equality.
    Literal(String),
    /// Requires the segment to satisfy an anchored constraint regex.
    Constraint(Regex),
}

impl Segment {
    fn literal(part: &str) -> Segment {
        Segment {
            key: String::new(),
            matcher: SegmentMatcher::Literal(part.to_owned()),
        }
    }

    fn capture(key: &str, constraint: Regex) -> Segment {
        Segment {
            key: key.to_owned(),
            matcher: SegmentMatcher::Constraint(constraint),
        }
    }

    /// The variable name this segment binds, empty for literals.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Whether this segment binds a path variable.
    pub fn is_capture(&self) -> bool {
        matches!(self.matcher, SegmentMatcher::Constraint(_))
    }

    pub fn matcher(&self) -> &SegmentMatcher {
        &self.matcher
    }

    /// Tests one path segment against this pattern segment.
    pub fn matches(&self, part: &str) -> bool {
        match &self.matcher {
            SegmentMatcher::Literal(literal) => literal == part,
            SegmentMatcher::Constraint(re) => re.is_match(part),
        }
    }
}

impl PartialEq for Segment {
    fn eq(&self, other: &Segment) -> bool {
        self.key == other.key
            && match (&self.matcher, &other.matcher) {
                (SegmentMatcher::Literal(a), SegmentMatcher::Literal(b)) => a == b,
                (SegmentMatcher::Constraint(a), SegmentMatcher::Constraint(b)) => a.as_str() == b.as_str(),
                _ => false,
            }
    }
}

/// Compiles a route pattern into its ordered segment sequence.
///
/// A pattern with K slash-delimited parts compiles to exactly K segments.
/// The empty pattern (`""` or `"/"`) compiles to zero segments and matches
/// only the empty path.
pub fn compile(pattern: &str) -> Result<Vec<Segment>> {
    split_path(pattern)
        .into_iter()
        .map(|part| compile_part(pattern, part))
        .collect()
}

/// Splits a pattern or request path into its segments, discarding the empty
/// parts produced by a leading or trailing slash. Interior empty parts
/// (`/a//b`) are preserved.
pub(crate) fn split_path(path: &str) -> Vec<&str> {
    let trimmed = path.trim_matches('/');
    if trimmed.is_empty() {
        Vec::new()
    } else {
        trimmed.split('/').collect()
    }
}

fn compile_part(pattern: &str, part: &str) -> Result<Segment> {
    let caps = match CAPTURE_RE.captures(part) {
        Some(caps) => caps,
        None => return Ok(Segment::literal(part)),
    };

    let key = &caps["key"];
    let constraint = match caps.name("constraint") {
        Some(m) => m.as_str(),
        None => ".+",
    };

    if let Some(ch) = constraint
        .chars()
        .find(|&c| !c.is_ascii_alphanumeric() && c != '_' && !CONSTRAINT_PUNCTUATION.contains(c))
    {
        return Err(Error::PatternCompile {
            pattern: pattern.to_owned(),
            reason: format!("character {:?} is not allowed in the constraint for {{{}}}", ch, key),
        });
    }

    // Anchor the constraint so it must cover the whole segment.
    let re = Regex::new(&format!("^(?:{})$", constraint)).map_err(|e| Error::PatternCompile {
        pattern: pattern.to_owned(),
        reason: e.to_string(),
    })?;

    Ok(Segment::capture(key, re))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_pattern_compiles_to_literal_segments() {
        let segments = compile("/part-one/part-two").unwrap();
        assert_eq!(2, segments.len());
        assert!(!segments[0].is_capture());
        assert_eq!("", segments[0].key());
        assert!(segments[0].matches("part-one"));
        assert!(!segments[0].matches("part-two"));
    }

    #[test]
    fn capture_without_constraint_defaults_to_any_nonempty_segment() {
        let segments = compile("/users/{id}").unwrap();
        assert_eq!(2, segments.len());
        assert!(segments[1].is_capture());
        assert_eq!("id", segments[1].key());
        assert!(segments[1].matches("42"));
        assert!(segments[1].matches("a-string"));
        assert!(!segments[1].matches(""));
    }

    #[test]
    fn capture_constraint_is_anchored_to_the_whole_segment() {
        let segments = compile(r"/users/{id}<\d+>").unwrap();
        assert!(segments[1].matches("42"));
        assert!(segments[1].matches("123456"));
        assert!(!segments[1].matches("abc"));
        assert!(!segments[1].matches("abc123"));
        assert!(!segments[1].matches("42abc"));
    }

    #[test]
    fn constraint_outside_the_safe_subset_is_a_compile_error() {
        let err = compile("/users/{id}<[0-9]+>").unwrap_err();
        assert!(matches!(err, Error::PatternCompile { .. }));
    }

    #[test]
    fn part_not_matching_the_capture_grammar_stays_a_literal() {
        let segments = compile("/users/{id").unwrap();
        assert!(!segments[1].is_capture());
        assert!(segments[1].matches("{id"));
    }

    #[test]
    fn empty_pattern_compiles_to_zero_segments() {
        assert!(compile("").unwrap().is_empty());
        assert!(compile("/").unwrap().is_empty());
    }

    #[test]
    fn part_count_is_preserved_in_order() {
        let segments = compile(r"/part-one/{id}<\d+>/part-three").unwrap();
        assert_eq!(3, segments.len());
        assert!(!segments[0].is_capture());
        assert!(segments[1].is_capture());
        assert!(!segments[2].is_capture());
    }

    #[test]
    fn compilation_is_deterministic() {
        let first = compile(r"/users/{id}<\d+>/books/{title}").unwrap();
        let second = compile(r"/users/{id}<\d+>/books/{title}").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn interior_empty_parts_are_kept() {
        let segments = compile("/a//b").unwrap();
        assert_eq!(3, segments.len());
        assert!(segments[1].matches(""));
    }
}
