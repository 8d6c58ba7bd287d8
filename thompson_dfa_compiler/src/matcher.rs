use std::ops::Range;

use crate::dfa::DFA;

/// A matcher that executes a DFA against input
///
/// Every input `char` costs one table lookup and there is no backtracking.
#[derive(Clone, Copy, Debug)]
pub struct Matcher<'a> {
    dfa: &'a DFA,
    /// The only byte that can begin a match, when there is exactly one
    prefilter: Option<u8>,
}

/// The byte offsets of a match in the input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Match {
    pub start: usize,
    pub end: usize,
}

impl Match {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

impl<'a> Matcher<'a> {
    /// Create a new matcher for the given DFA
    pub fn new(dfa: &'a DFA) -> Self {
        Self {
            dfa,
            prefilter: start_byte(dfa),
        }
    }

    /// The single ASCII byte every match must start with, if there is one.
    pub fn prefilter_byte(&self) -> Option<u8> {
        self.prefilter
    }

    /// Check if the entire input matches
    pub fn is_match(&self, input: &str) -> bool {
        let mut state = self.dfa.start_state();
        for c in input.chars() {
            state = self.dfa.next_state(state, c);
            if self.dfa.is_dead(state) {
                return false;
            }
        }
        self.dfa.is_accepting(state)
    }

    /// Check if any substring of the input matches
    pub fn search(&self, input: &str) -> bool {
        self.find(input).is_some()
    }

    /// Find the first match in the input string
    ///
    /// The match starting leftmost wins. Among matches with that start the
    /// longest wins.
    pub fn find(&self, input: &str) -> Option<Match> {
        self.find_at(input, 0)
    }

    /// Like [`Matcher::find`], but no match may start before `start`.
    ///
    /// `start` must be a char boundary of `input`.
    pub fn find_at(&self, input: &str, start: usize) -> Option<Match> {
        let mut at = start;
        loop {
            at = self.next_candidate(input, at)?;
            if let Some(end) = self.longest_match_at(input, at) {
                return Some(Match::new(at, end));
            }
            at += input[at..].chars().next()?.len_utf8();
        }
    }

    /// Find all successive non-overlapping matches
    ///
    /// An empty match right where the previous match ended is skipped.
    pub fn find_all(&self, input: &str) -> Vec<Match> {
        let mut matches = Vec::new();
        let mut start = 0;
        let mut last_end = None;

        while start <= input.len() {
            let found = match self.find_at(input, start) {
                Some(found) => found,
                None => break,
            };
            if found.is_empty() {
                if last_end != Some(found.end) {
                    matches.push(found);
                }
                // Move past the empty match
                match input[found.end..].chars().next() {
                    Some(c) => start = found.end + c.len_utf8(),
                    None => break,
                }
            } else {
                matches.push(found);
                start = found.end;
            }
            last_end = Some(found.end);
        }

        matches
    }

    /// The end of the longest match starting at `start`, if any
    fn longest_match_at(&self, input: &str, start: usize) -> Option<usize> {
        let mut state = self.dfa.start_state();
        let mut last = if self.dfa.is_accepting(state) { Some(start) } else { None };

        for (offset, c) in input[start..].char_indices() {
            state = self.dfa.next_state(state, c);
            if self.dfa.is_dead(state) {
                break;
            }
            if self.dfa.is_accepting(state) {
                last = Some(start + offset + c.len_utf8());
            }
        }
        last
    }

    /// The first offset at or after `at` where a match could start
    fn next_candidate(&self, input: &str, at: usize) -> Option<usize> {
        #[cfg(feature = "perf-literal")]
        {
            if let Some(byte) = self.prefilter {
                return memchr::memchr(byte, input.as_bytes().get(at..)?).map(|i| at + i);
            }
        }
        if at <= input.len() {
            Some(at)
        } else {
            None
        }
    }
}

/// When the start state cannot accept and only one single-byte class
/// leaves it, every match begins with that byte.
fn start_byte(dfa: &DFA) -> Option<u8> {
    let start = dfa.start_state();
    if dfa.is_accepting(start) {
        return None;
    }
    let mut live = (0..dfa.alphabet().len())
        .filter(|&class| !dfa.is_dead(dfa.next_state_for_class(start, class)));
    let class = live.next()?;
    if live.next().is_some() {
        return None;
    }
    match dfa.alphabet().classes()[class] {
        (lo, hi) if lo == hi && lo.is_ascii() => Some(lo as u8),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{compile_dfa, Config};

    fn dfa(pattern: &str) -> DFA {
        compile_dfa(pattern, &Config::new()).unwrap()
    }

    #[test]
    fn test_simple_char_match() {
        let dfa = dfa("a");
        let matcher = Matcher::new(&dfa);

        assert!(matcher.is_match("a"));
        assert!(!matcher.is_match("b"));
        assert!(!matcher.is_match(""));
        assert!(!matcher.is_match("aa"));
    }

    #[test]
    fn test_full_match_only() {
        let dfa = dfa("ab");
        let matcher = Matcher::new(&dfa);

        assert!(matcher.is_match("ab"));
        assert!(!matcher.is_match("ac"));
        assert!(!matcher.is_match("a"));
        assert!(!matcher.is_match("xab"));
    }

    #[test]
    fn test_unknown_symbols_reject() {
        let dfa = dfa("(é|ü)*");
        let matcher = Matcher::new(&dfa);

        assert!(matcher.is_match("éüé"));
        assert!(!matcher.is_match("éxü"));
        assert!(!matcher.is_match("☃"));
    }

    #[test]
    fn test_find_leftmost_longest() {
        let dfa = dfa("ab*");
        let matcher = Matcher::new(&dfa);

        assert_eq!(matcher.find("xxabbbx"), Some(Match::new(2, 6)));
        assert_eq!(matcher.find("xa"), Some(Match::new(1, 2)));
        assert_eq!(matcher.find("bbb"), None);
        assert!(matcher.search("zzzab"));
        assert!(!matcher.search("zzz"));
    }

    #[test]
    fn test_find_empty_match() {
        let dfa = dfa("a*");
        let matcher = Matcher::new(&dfa);

        assert_eq!(matcher.find("bbb"), Some(Match::new(0, 0)));
        assert_eq!(matcher.find(""), Some(Match::new(0, 0)));
        assert!(matcher.find("").unwrap().is_empty());
    }

    #[test]
    fn test_find_multibyte_offsets() {
        let dfa = dfa("ü[0-9]");
        let matcher = Matcher::new(&dfa);

        let found = matcher.find("éü7").unwrap();
        assert_eq!(found.range(), 2..5);
        assert_eq!(found.len(), 3);
    }

    #[test]
    fn test_find_all() {
        let dfa = dfa("[0-9][0-9]*");
        let matcher = Matcher::new(&dfa);

        let found = matcher.find_all("a1b22c333");
        assert_eq!(
            found,
            vec![Match::new(1, 2), Match::new(3, 5), Match::new(6, 9)]
        );
    }

    #[test]
    fn test_find_all_empty_matches() {
        let dfa = dfa("a*");
        let matcher = Matcher::new(&dfa);

        assert_eq!(
            matcher.find_all("ab"),
            vec![Match::new(0, 1), Match::new(2, 2)]
        );
        assert_eq!(
            matcher.find_all("bb"),
            vec![Match::new(0, 0), Match::new(1, 1), Match::new(2, 2)]
        );
    }

    #[test]
    fn test_prefilter_byte() {
        let dfa_x = dfa("x(a|b)*");
        assert_eq!(Matcher::new(&dfa_x).prefilter_byte(), Some(b'x'));

        let dfa_ab = dfa("a|b");
        assert_eq!(Matcher::new(&dfa_ab).prefilter_byte(), None);

        let dfa_star = dfa("x*");
        assert_eq!(Matcher::new(&dfa_star).prefilter_byte(), None);

        let dfa_range = dfa("[0-9]");
        assert_eq!(Matcher::new(&dfa_range).prefilter_byte(), None);
    }

    #[test]
    fn test_prefilter_search() {
        let dfa = dfa("x(a|b)*y");
        let matcher = Matcher::new(&dfa);

        assert_eq!(matcher.find("qqxabzxbay"), Some(Match::new(6, 10)));
        assert_eq!(matcher.find("xab"), None);
        assert_eq!(
            matcher.find_all("xy..xay"),
            vec![Match::new(0, 2), Match::new(4, 7)]
        );
    }
}
