use std::fmt;

use bitvec::vec::BitVec;

use crate::{CompileError, CompileResult};

/// A pattern rewritten into the canonical grammar: literal symbols,
/// implicit concatenation, `|`, postfix `*`, `()` and two-endpoint digit
/// ranges such as `0-9`.
///
/// Every canonical character remembers the byte offset of the raw pattern
/// character it came from, so later stages can report errors against the
/// pattern the caller actually wrote. Each `-` also records whether it may
/// form a range token: when expanded from a raw pattern, only dashes written
/// inside a bracket class can.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canonical {
    text: String,
    offsets: Vec<usize>,
    range_dashes: BitVec,
}

impl Canonical {
    /// Treat `text` as already canonical. Offsets are its own byte offsets
    /// and every `-` may join a digit range.
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            offsets: text.char_indices().map(|(offset, _)| offset).collect(),
            range_dashes: text.chars().map(|c| c == '-').collect(),
        }
    }

    fn from_output(out: Output) -> Self {
        let (offsets, chars): (Vec<usize>, Vec<char>) = out.symbols.into_iter().unzip();
        Self {
            text: chars.into_iter().collect(),
            offsets,
            range_dashes: out.range_dashes,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// The raw pattern offset of every canonical character, in order.
    pub fn offsets(&self) -> &[usize] {
        &self.offsets
    }

    /// Whether the character at position `i` is a `-` that may join two
    /// digits into a range token.
    pub fn is_range_dash(&self, i: usize) -> bool {
        self.range_dashes.get(i).map_or(false, |bit| *bit)
    }

    /// Iterate over `(raw offset, char)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (usize, char)> + '_ {
        self.offsets.iter().copied().zip(self.text.chars())
    }

    /// Number of characters in the canonical pattern.
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }
}

impl fmt::Display for Canonical {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Find the first `target` at or after `start`.
///
/// Every `mask` seen on the way masks one later `target`, which is how the
/// `)` closing a nested `(` is skipped. Returns `None` when the pattern ends
/// before an unmasked `target` shows up.
pub fn gobble(pattern: &[char], start: usize, target: char, mask: Option<char>) -> Option<usize> {
    let mut skip = 0usize;
    for (i, &c) in pattern.iter().enumerate().skip(start) {
        if Some(c) == mask {
            skip += 1;
        }
        if c == target {
            if skip > 0 {
                skip -= 1;
                continue;
            }
            return Some(i);
        }
    }
    None
}

/// Expand a raw pattern into its [`Canonical`] form.
///
/// Groups are kept as groups. A bracket class becomes a parenthesized union
/// of its members, with `d-d` digit ranges kept as single range tokens.
/// Everything else is copied unchanged.
///
/// The scan is a single loop over the pattern with an explicit stack of
/// open groups, so nesting depth is bounded by memory, not by the call
/// stack.
pub fn expand(pattern: &str) -> CompileResult<Canonical> {
    let expander = Expander::new(pattern);
    let mut out = expander.expand()?;
    out.symbols.shrink_to_fit();
    out.range_dashes.shrink_to_fit();
    trace!("expanded {} pattern chars into {}", expander.chars.len(), out.symbols.len());
    Ok(Canonical::from_output(out))
}

/// Canonical characters as they are produced
struct Output {
    symbols: Vec<(usize, char)>,
    range_dashes: BitVec,
}

impl Output {
    fn push(&mut self, offset: usize, c: char) {
        self.symbols.push((offset, c));
        self.range_dashes.push(false);
    }

    fn push_range(&mut self, lo: (usize, char), dash: usize, hi: (usize, char)) {
        self.push(lo.0, lo.1);
        self.symbols.push((dash, '-'));
        self.range_dashes.push(true);
        self.push(hi.0, hi.1);
    }
}

struct Expander {
    chars: Vec<char>,
    offsets: Vec<usize>,
    /// The `)` closing each `(`, paired exactly as [`gobble`] pairs them
    closes: Vec<Option<usize>>,
}

impl Expander {
    fn new(pattern: &str) -> Self {
        let chars: Vec<char> = pattern.chars().collect();
        let mut closes = vec![None; chars.len()];
        let mut open = Vec::new();
        for (i, &c) in chars.iter().enumerate() {
            match c {
                '(' => open.push(i),
                ')' => {
                    if let Some(o) = open.pop() {
                        closes[o] = Some(i);
                    }
                }
                _ => {}
            }
        }
        Self {
            chars,
            offsets: pattern.char_indices().map(|(offset, _)| offset).collect(),
            closes,
        }
    }

    fn expand(&self) -> CompileResult<Output> {
        let mut out = Output {
            symbols: Vec::with_capacity(self.chars.len()),
            range_dashes: BitVec::with_capacity(self.chars.len()),
        };
        // Closing index of every group we are inside, innermost last.
        let mut groups: Vec<usize> = Vec::new();
        let mut i = 0;
        while i < self.chars.len() {
            let offset = self.offsets[i];
            if groups.last() == Some(&i) {
                groups.pop();
                out.push(offset, ')');
                i += 1;
                continue;
            }
            match self.chars[i] {
                '(' => {
                    let close = self.closes[i].ok_or(CompileError::UnbalancedGroup { index: offset })?;
                    groups.push(close);
                    out.push(offset, '(');
                    i += 1;
                }
                '[' => {
                    // A class never reaches past the group it was opened in.
                    let end = groups.last().copied().unwrap_or(self.chars.len());
                    let close = gobble(&self.chars[..end], i + 1, ']', None)
                        .ok_or(CompileError::UnbalancedBracket { index: offset })?;
                    self.expand_bracket(i, close, &mut out)?;
                    i = close + 1;
                }
                c => {
                    out.push(offset, c);
                    i += 1;
                }
            }
        }
        Ok(out)
    }

    /// Rewrite the class between `open` (a `[`) and `close` (its `]`) as
    /// `(x|y|0-9|...)`.
    fn expand_bracket(&self, open: usize, close: usize, out: &mut Output) -> CompileResult<()> {
        out.push(self.offsets[open], '(');
        let mut q = open + 1;
        while q < close {
            let c = self.chars[q];
            let offset = self.offsets[q];
            match c {
                '[' => return Err(CompileError::UnbalancedBracket { index: offset }),
                '-' | '(' | ')' | '|' | '*' => return Err(CompileError::MalformedRange { index: offset }),
                _ => {}
            }
            if q > open + 1 {
                out.push(offset, '|');
            }
            if q + 1 < close && self.chars[q + 1] == '-' {
                let dash = self.offsets[q + 1];
                if !c.is_ascii_digit() || q + 2 >= close {
                    return Err(CompileError::MalformedRange { index: dash });
                }
                let hi = self.chars[q + 2];
                if !hi.is_ascii_digit() || hi < c {
                    return Err(CompileError::MalformedRange { index: dash });
                }
                out.push_range((offset, c), dash, (self.offsets[q + 2], hi));
                q += 3;
            } else {
                out.push(offset, c);
                q += 1;
            }
        }
        out.push(self.offsets[close], ')');
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    fn expanded(pattern: &str) -> String {
        expand(pattern).unwrap().as_str().to_string()
    }

    #[test]
    fn test_gobble_simple() {
        assert_eq!(gobble(&chars("[abc]"), 1, ']', None), Some(4));
        assert_eq!(gobble(&chars("[abc"), 1, ']', None), None);
        assert_eq!(gobble(&chars("("), 1, ')', Some('(')), None);
    }

    #[test]
    fn test_gobble_nested() {
        let p = chars("(a(b)c)d");
        assert_eq!(gobble(&p, 1, ')', Some('(')), Some(6));
        assert_eq!(gobble(&p, 3, ')', Some('(')), Some(4));
        assert_eq!(gobble(&chars("((a)"), 1, ')', Some('(')), None);
    }

    #[test]
    fn test_expand_passthrough() {
        assert_eq!(expanded("a*"), "a*");
        assert_eq!(expanded("ab|c"), "ab|c");
        assert_eq!(expanded(""), "");
    }

    #[test]
    fn test_expand_groups() {
        assert_eq!(expanded("(ab)*"), "(ab)*");
        assert_eq!(expanded("((a|b)c)"), "((a|b)c)");
        assert_eq!(expanded("([ab])"), "((a|b))");
    }

    #[test]
    fn test_expand_brackets() {
        assert_eq!(expanded("[abc]"), "(a|b|c)");
        assert_eq!(expanded("[0-9]"), "(0-9)");
        assert_eq!(expanded("x[a0-5b]*"), "x(a|0-5|b)*");
        assert_eq!(expanded("[]"), "()");
    }

    #[test]
    fn test_expand_offsets() {
        let canonical = expand("x[ab]").unwrap();
        assert_eq!(canonical.as_str(), "x(a|b)");
        // `(` and `)` point at the brackets, `|` at the alternative after it.
        assert_eq!(canonical.offsets(), &[0, 1, 2, 3, 3, 4]);
    }

    #[test]
    fn test_expand_offsets_multibyte() {
        let canonical = expand("é(ü)").unwrap();
        assert_eq!(canonical.as_str(), "é(ü)");
        assert_eq!(canonical.offsets(), &[0, 2, 3, 5]);
    }

    #[test]
    fn test_expand_unbalanced() {
        assert_eq!(expand("("), Err(CompileError::UnbalancedGroup { index: 0 }));
        assert_eq!(expand("a(b(c)"), Err(CompileError::UnbalancedGroup { index: 1 }));
        assert_eq!(expand("[a"), Err(CompileError::UnbalancedBracket { index: 0 }));
        assert_eq!(expand("([a)"), Err(CompileError::UnbalancedBracket { index: 1 }));
    }

    #[test]
    fn test_expand_malformed_range() {
        assert_eq!(expand("[a-z]"), Err(CompileError::MalformedRange { index: 2 }));
        assert_eq!(expand("[-5]"), Err(CompileError::MalformedRange { index: 1 }));
        assert_eq!(expand("[5-]"), Err(CompileError::MalformedRange { index: 2 }));
        assert_eq!(expand("[5-x]"), Err(CompileError::MalformedRange { index: 2 }));
        assert_eq!(expand("[9-0]"), Err(CompileError::MalformedRange { index: 2 }));
    }

    #[test]
    fn test_expand_operators_in_class() {
        assert_eq!(expand("[(]"), Err(CompileError::MalformedRange { index: 1 }));
        assert_eq!(expand("[a)]"), Err(CompileError::MalformedRange { index: 2 }));
        assert_eq!(expand("[a|b]"), Err(CompileError::MalformedRange { index: 2 }));
        assert_eq!(expand("x[*]"), Err(CompileError::MalformedRange { index: 2 }));
        assert_eq!(expand("[a[b]"), Err(CompileError::UnbalancedBracket { index: 2 }));
    }

    #[test]
    fn test_range_dashes() {
        let canonical = expand("1-2[3-4]").unwrap();
        assert_eq!(canonical.as_str(), "1-2(3-4)");
        let dashes: Vec<bool> = (0..canonical.len()).map(|i| canonical.is_range_dash(i)).collect();
        assert_eq!(dashes, [false, false, false, false, false, true, false, false]);
        assert!(Canonical::new("1-2").is_range_dash(1));
    }

    #[test]
    fn test_expand_deep_nesting() {
        let n = 100_000;
        let pattern = format!("{}[ab]{}", "(".repeat(n), ")".repeat(n));
        let canonical = expand(&pattern).unwrap();
        assert_eq!(canonical.len(), 2 * n + 5);
        assert!(canonical.as_str().ends_with("(a|b))"));

        let unclosed = format!("x{}a{}", "(".repeat(n), ")".repeat(n - 1));
        assert_eq!(expand(&unclosed), Err(CompileError::UnbalancedGroup { index: 1 }));
    }

    #[test]
    fn test_expand_idempotent() {
        for pattern in ["a", "(ab)*", "[0-9]", "x[a0-5b]*|y", "((a)(b|[cd]))*"] {
            let once = expanded(pattern);
            assert_eq!(expanded(&once), once, "pattern {:?}", pattern);
        }
    }
}
