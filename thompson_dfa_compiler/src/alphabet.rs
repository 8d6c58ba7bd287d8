use std::collections::BTreeSet;
use std::fmt;

use crate::nfa::NFA;

const NO_CLASS: u32 = u32::MAX;
const SURROGATES: std::ops::RangeInclusive<u32> = 0xD800..=0xDFFF;

/// The input alphabet of a DFA, as an ordered list of symbol classes.
///
/// Each class is an inclusive interval of `char`s that no NFA transition
/// can tell apart, so the DFA needs one column per class instead of one per
/// character. Characters outside every class can never be matched.
#[derive(Clone, PartialEq, Eq)]
pub struct Alphabet {
    classes: Vec<(char, char)>,
    ascii: [u32; 128],
}

impl Alphabet {
    /// Build the alphabet from every literal symbol and range endpoint
    /// used by `nfa`.
    pub fn from_nfa(nfa: &NFA) -> Self {
        Self::new(
            nfa.states
                .iter()
                .flat_map(|state| state.transitions.iter())
                .map(|transition| transition.symbol.bounds()),
        )
    }

    /// Build an alphabet from inclusive `(lo, hi)` symbol bounds.
    pub fn new<I: IntoIterator<Item = (char, char)>>(bounds: I) -> Self {
        let bounds: Vec<(u32, u32)> = bounds
            .into_iter()
            .map(|(lo, hi)| (lo as u32, hi as u32))
            .collect();

        let mut cuts = BTreeSet::new();
        for &(lo, hi) in &bounds {
            cuts.insert(lo);
            cuts.insert(hi + 1);
        }
        let cuts: Vec<u32> = cuts.into_iter().collect();

        let mut classes = Vec::new();
        for pair in cuts.windows(2) {
            let (lo, hi) = (pair[0], pair[1] - 1);
            if !bounds.iter().any(|&(a, b)| a <= lo && lo <= b) {
                continue;
            }
            if let Some(class) = scalar_range(lo, hi) {
                classes.push(class);
            }
        }

        let mut ascii = [NO_CLASS; 128];
        for (id, &(lo, hi)) in classes.iter().enumerate() {
            for byte in (lo as u32)..=(hi as u32).min(127) {
                ascii[byte as usize] = id as u32;
            }
        }
        Self { classes, ascii }
    }

    /// The class `c` belongs to, or `None` when no transition accepts it.
    #[inline]
    pub fn class_of(&self, c: char) -> Option<usize> {
        if c.is_ascii() {
            let class = self.ascii[c as usize];
            return if class == NO_CLASS { None } else { Some(class as usize) };
        }
        self.classes
            .binary_search_by(|&(lo, hi)| {
                if hi < c {
                    std::cmp::Ordering::Less
                } else if lo > c {
                    std::cmp::Ordering::Greater
                } else {
                    std::cmp::Ordering::Equal
                }
            })
            .ok()
    }

    /// One character standing in for every member of `class`
    pub fn representative(&self, class: usize) -> char {
        self.classes[class].0
    }

    pub fn classes(&self) -> &[(char, char)] {
        &self.classes
    }

    /// Number of classes
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

/// Clip `lo..=hi` to Unicode scalar values.
fn scalar_range(mut lo: u32, mut hi: u32) -> Option<(char, char)> {
    if SURROGATES.contains(&lo) {
        lo = *SURROGATES.end() + 1;
    }
    if SURROGATES.contains(&hi) {
        hi = *SURROGATES.start() - 1;
    }
    if lo > hi {
        return None;
    }
    Some((char::from_u32(lo)?, char::from_u32(hi)?))
}

impl fmt::Debug for Alphabet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Alphabet(")?;
        for (id, &(lo, hi)) in self.classes.iter().enumerate() {
            if id > 0 {
                write!(f, ", ")?;
            }
            if lo == hi {
                write!(f, "{}={:?}", id, lo)?;
            } else {
                write!(f, "{}={:?}-{:?}", id, lo, hi)?;
            }
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literals() {
        let alphabet = Alphabet::new(vec![('b', 'b'), ('a', 'a'), ('b', 'b')]);
        assert_eq!(alphabet.classes(), &[('a', 'a'), ('b', 'b')]);
        assert_eq!(alphabet.class_of('a'), Some(0));
        assert_eq!(alphabet.class_of('b'), Some(1));
        assert_eq!(alphabet.class_of('c'), None);
    }

    #[test]
    fn test_overlapping_range_splits() {
        let alphabet = Alphabet::new(vec![('0', '9'), ('5', '5'), ('x', 'x')]);
        assert_eq!(
            alphabet.classes(),
            &[('0', '4'), ('5', '5'), ('6', '9'), ('x', 'x')]
        );
        assert_eq!(alphabet.class_of('3'), Some(0));
        assert_eq!(alphabet.class_of('5'), Some(1));
        assert_eq!(alphabet.class_of('9'), Some(2));
        assert_eq!(alphabet.class_of('y'), None);
        assert_eq!(alphabet.representative(2), '6');
    }

    #[test]
    fn test_non_ascii() {
        let alphabet = Alphabet::new(vec![('é', 'é'), ('☃', '☃'), ('a', 'a')]);
        assert_eq!(alphabet.len(), 3);
        assert_eq!(alphabet.class_of('a'), Some(0));
        assert_eq!(alphabet.class_of('é'), Some(1));
        assert_eq!(alphabet.class_of('☃'), Some(2));
        assert_eq!(alphabet.class_of('ü'), None);
    }

    #[test]
    fn test_empty() {
        let alphabet = Alphabet::new(Vec::new());
        assert!(alphabet.is_empty());
        assert_eq!(alphabet.class_of('a'), None);
    }
}
