//! Leftmost-longest matching
//!
//! `regex` only implements leftmost-first semantics. POSIX mode finds the
//! leftmost starting position with the ordinary engine (it is the same under
//! both semantics) and then asks a PikeVM built with `MatchKind::All` for the
//! longest match anchored at that position.
//!
//! Group spans inside that match come from the PikeVM thread that reached
//! the end, not from POSIX subexpression rules: `(a|ab)(c|bcd)(d*)` on
//! `abcd` reports `a`, `bcd`, `` rather than `ab`, `c`, `d`.

use regex::Regex;
use regex_automata::nfa::thompson::pikevm::{Cache, PikeVM};
use regex_automata::nfa::thompson::BuildError;
use regex_automata::util::captures::Captures;
use regex_automata::{Anchored, Input, MatchKind};

#[derive(Debug)]
pub struct PosixRegex {
    vm: PikeVM,
}

impl PosixRegex {
    pub fn new(pattern: &str) -> Result<Self, BuildError> {
        let vm = PikeVM::builder()
            .configure(PikeVM::config().match_kind(MatchKind::All))
            .build(pattern)?;
        Ok(Self { vm })
    }

    /// Longest match (with groups) that starts exactly at `start`
    fn longest_at(&self, cache: &mut Cache, haystack: &str, start: usize) -> Option<Captures> {
        let input = Input::new(haystack)
            .range(start..)
            .anchored(Anchored::Yes);
        let mut caps = self.vm.create_captures();
        self.vm.search(cache, &input, &mut caps);
        caps.is_match().then_some(caps)
    }

    /// Every non-overlapping leftmost-longest match in `haystack`
    ///
    /// `leftmost` must be compiled from the same pattern. An empty match that
    /// directly follows the previous match is skipped, and the scan moves one
    /// character forward after every empty match.
    pub fn captures_all(&self, leftmost: &Regex, haystack: &str) -> Vec<Captures> {
        let mut cache = self.vm.create_cache();
        let mut found = Vec::new();
        let mut pos = 0;
        let mut prev_end = None;

        while pos <= haystack.len() {
            let Some(start) = leftmost.find_at(haystack, pos).map(|m| m.start()) else {
                break;
            };
            let Some(caps) = self.longest_at(&mut cache, haystack, start) else {
                break;
            };
            let Some(end) = caps.get_match().map(|m| m.end()) else {
                break;
            };

            if end == start {
                if prev_end != Some(end) {
                    found.push(caps);
                }
                pos = end + haystack[end..].chars().next().map_or(1, char::len_utf8);
            } else {
                found.push(caps);
                pos = end;
            }
            prev_end = Some(end);
        }

        found
    }

    /// Replace every match, expanding `$n` / `${name}` references
    pub fn replace_all(&self, leftmost: &Regex, haystack: &str, replacement: &str) -> String {
        let mut out = String::with_capacity(haystack.len());
        let mut last = 0;
        for caps in self.captures_all(leftmost, haystack) {
            let Some(m) = caps.get_match() else { continue };
            out.push_str(&haystack[last..m.start()]);
            caps.interpolate_string_into(haystack, replacement, &mut out);
            last = m.end();
        }
        out.push_str(&haystack[last..]);
        out
    }
}
