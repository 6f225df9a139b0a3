//! Pattern compilation and the match queries behind the test report
//!
//! Standard mode is plain `regex` (leftmost-first). POSIX mode reports
//! leftmost-longest matches; see [`posix`].

mod posix;

use regex::Regex;
use std::ops::Range;
use thiserror::Error;

use posix::PosixRegex;

/// Option value that selects leftmost-longest compilation
pub const POSIX_OPTION: &str = "posix";

/// Compilation mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Leftmost-first, the `regex` crate's own semantics
    Standard,
    /// Leftmost-longest
    Posix,
}

impl Mode {
    /// Posix if any option equals `"posix"`
    pub fn from_options<S: AsRef<str>>(options: &[S]) -> Self {
        if options.iter().any(|o| o.as_ref() == POSIX_OPTION) {
            Self::Posix
        } else {
            Self::Standard
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Standard => "Regex::new() (leftmost-first)",
            Self::Posix => "PikeVM with MatchKind::All (leftmost-longest)",
        }
    }
}

#[derive(Debug, Error)]
pub enum PatternError {
    #[error(transparent)]
    Syntax(#[from] regex::Error),

    #[error("{0}")]
    Posix(#[from] regex_automata::nfa::thompson::BuildError),
}

#[derive(Debug)]
enum Engine {
    Standard,
    Posix(PosixRegex),
}

/// Spans of one match: index 0 is the whole match, then one entry per group
type GroupSpans = Vec<Option<Range<usize>>>;

/// A pattern compiled for a single test run
#[derive(Debug)]
pub struct CompiledPattern {
    regex: Regex,
    engine: Engine,
}

/// Escape every metacharacter so the result matches `text` literally
pub fn quote(text: &str) -> String {
    regex::escape(text)
}

impl CompiledPattern {
    pub fn compile(pattern: &str, mode: Mode) -> Result<Self, PatternError> {
        let regex = Regex::new(pattern)?;
        let engine = match mode {
            Mode::Standard => Engine::Standard,
            Mode::Posix => Engine::Posix(PosixRegex::new(pattern)?),
        };
        Ok(Self { regex, engine })
    }

    /// Number of capturing groups, not counting the implicit whole-match group
    pub fn group_count(&self) -> usize {
        self.regex.captures_len() - 1
    }

    /// Whether a match exists is independent of the mode
    pub fn is_match(&self, haystack: &str) -> bool {
        self.regex.is_match(haystack)
    }

    pub fn replace_all(&self, haystack: &str, replacement: &str) -> String {
        match &self.engine {
            Engine::Standard => self.regex.replace_all(haystack, replacement).into_owned(),
            Engine::Posix(posix) => posix.replace_all(&self.regex, haystack, replacement),
        }
    }

    /// All non-overlapping matched substrings
    pub fn find_all<'h>(&self, haystack: &'h str) -> Vec<&'h str> {
        self.spans(haystack)
            .into_iter()
            .filter_map(|groups| whole(&groups))
            .map(|range| &haystack[range])
            .collect()
    }

    /// Byte offsets `(start, end)` of all non-overlapping matches
    pub fn find_all_offsets(&self, haystack: &str) -> Vec<(usize, usize)> {
        self.spans(haystack)
            .into_iter()
            .filter_map(|groups| whole(&groups))
            .map(|range| (range.start, range.end))
            .collect()
    }

    /// Whole match followed by every group, per match; unmatched groups are empty
    pub fn find_all_submatches<'h>(&self, haystack: &'h str) -> Vec<Vec<&'h str>> {
        self.spans(haystack)
            .into_iter()
            .map(|groups| {
                groups
                    .into_iter()
                    .map(|span| span.map_or("", |range| &haystack[range]))
                    .collect()
            })
            .collect()
    }

    fn spans(&self, haystack: &str) -> Vec<GroupSpans> {
        match &self.engine {
            Engine::Standard => self
                .regex
                .captures_iter(haystack)
                .map(|caps| caps.iter().map(|m| m.map(|m| m.range())).collect())
                .collect(),
            Engine::Posix(posix) => posix
                .captures_all(&self.regex, haystack)
                .iter()
                .map(|caps| {
                    (0..caps.group_len())
                        .map(|i| caps.get_group(i).map(|span| span.range()))
                        .collect()
                })
                .collect(),
        }
    }
}

fn whole(groups: &[Option<Range<usize>>]) -> Option<Range<usize>> {
    groups.first().cloned().flatten()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn standard(pattern: &str) -> CompiledPattern {
        CompiledPattern::compile(pattern, Mode::Standard).unwrap()
    }

    fn posix(pattern: &str) -> CompiledPattern {
        CompiledPattern::compile(pattern, Mode::Posix).unwrap()
    }

    #[test]
    fn test_mode_from_options() {
        assert_eq!(Mode::from_options::<&str>(&[]), Mode::Standard);
        assert_eq!(Mode::from_options(&["i", "posix"]), Mode::Posix);
        assert_eq!(Mode::from_options(&["POSIX"]), Mode::Standard);
        assert_eq!(Mode::from_options(&["posix".to_string()]), Mode::Posix);
    }

    #[test]
    fn test_compile_error() {
        let err = CompiledPattern::compile("(", Mode::Standard).unwrap_err();
        assert!(matches!(err, PatternError::Syntax(_)));
        assert!(!err.to_string().is_empty());
        assert!(CompiledPattern::compile("(", Mode::Posix).is_err());
    }

    #[test]
    fn test_group_count() {
        assert_eq!(standard("abc").group_count(), 0);
        assert_eq!(standard("a(b)c").group_count(), 1);
        assert_eq!(posix("(?P<x>a)(?:b)(c)").group_count(), 2);
    }

    #[test]
    fn test_quote_matches_literally() {
        for text in ["a.b*", "(x)|[y]", "^$\\{1}", "+?"] {
            let quoted = quote(text);
            let re = standard(&quoted);
            assert_eq!(re.find_all(text), vec![text], "quoted form of {text:?}");
            assert!(!re.is_match("zzz"));
        }
        assert!(!standard(&quote("a.b")).is_match("axb"));
    }

    #[test]
    fn test_single_group_match() {
        let re = standard("a(b)c");
        assert!(re.is_match("abc"));
        assert_eq!(re.find_all_submatches("abc"), vec![vec!["abc", "b"]]);
        assert_eq!(re.find_all_offsets("abc"), vec![(0, 3)]);

        assert!(!re.is_match("xyz"));
        assert!(re.find_all("xyz").is_empty());
        assert!(re.find_all_offsets("xyz").is_empty());
        assert!(re.find_all_submatches("xyz").is_empty());
    }

    #[test]
    fn test_leftmost_first_vs_longest() {
        assert_eq!(standard("a|ab").find_all("ab"), vec!["a"]);
        assert_eq!(posix("a|ab").find_all("ab"), vec!["ab"]);
        assert_eq!(posix("a|ab").find_all_offsets("ab"), vec![(0, 2)]);
    }

    #[test]
    fn test_replace_swaps_groups() {
        assert_eq!(standard("(a)(b)").replace_all("ab", "$2$1"), "ba");
        assert_eq!(posix("(a)(b)").replace_all("ab", "${2}${1}"), "ba");
        assert_eq!(
            standard("(?P<first>\\w+) (?P<last>\\w+)").replace_all("Ada Lovelace", "$last, $first"),
            "Lovelace, Ada"
        );
    }

    #[test]
    fn test_replace_posix_uses_longest() {
        assert_eq!(standard("a|ab").replace_all("abab", "X"), "XbXb");
        assert_eq!(posix("a|ab").replace_all("abab", "X"), "XX");
    }

    #[test]
    fn test_unmatched_optional_group_is_empty() {
        let re = standard("(a)?b");
        assert_eq!(re.find_all_submatches("b ab"), vec![vec!["b", ""], vec!["ab", "a"]]);
        let re = posix("(a)?b");
        assert_eq!(re.find_all_submatches("b ab"), vec![vec!["b", ""], vec!["ab", "a"]]);
    }

    #[test]
    fn test_offsets_are_bytes() {
        assert_eq!(standard("é+").find_all_offsets("xéé"), vec![(1, 5)]);
    }
}
