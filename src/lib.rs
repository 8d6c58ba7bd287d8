/*!
This crate compiles small regular expressions into deterministic finite
automata and matches them in time linear in the length of the input.

# Syntax

| Syntax    | Meaning                                              |
|-----------|------------------------------------------------------|
| `x`       | the literal character `x`                            |
| `xy`      | `x` followed by `y`                                  |
| `x\|y`    | `x` or `y` (lowest precedence)                       |
| `x*`      | zero or more `x` (highest precedence)                |
| `(x)`     | grouping                                             |
| `[xyz]`   | any one of `x`, `y` or `z`                           |
| `[0-9]`   | any digit between the two endpoints, inclusive       |

There are no escapes, anchors, capture groups or other quantifiers. The
characters `( ) [ ] | * -` are always operators. A range such as `0-9` is
only recognized inside brackets, so `1-5` on its own is an error, and so is
any operator character written inside a class, as in `[a|b]` or `[(]`.

# Compilation

[`compile`] runs three stages:

1. The pattern is *expanded*: bracket classes become parenthesized unions
   and groups are kept as groups. Nesting depth is limited only by memory.
2. The expanded pattern is Thompson-constructed into an NFA.
3. The NFA is determinized by subset construction into a DFA.

Only the DFA is kept in the resulting [`CompiledPattern`]. Subset
construction can produce exponentially many states in the worst case, so
the number of states is capped (see [`Builder::dfa_state_limit`]).

# Example

```
use thompson_regex::compile;

let re = compile("(ab)*c|[0-9][0-9]*")?;
assert!(re.is_match("ababc"));
assert!(re.is_match("2024"));
assert!(!re.is_match("abab"));

// Searching looks for the leftmost-longest match anywhere in the input.
let found = re.find("order 66 shipped").unwrap();
assert_eq!(found.range(), 6..8);
# Ok::<(), thompson_regex::CompileError>(())
```

# Errors

Malformed patterns are always rejected with a [`CompileError`] that
carries the byte offset where the problem was found:

```
use thompson_regex::{compile, CompileError};

assert_eq!(compile("(a").unwrap_err(), CompileError::UnbalancedGroup { index: 0 });
assert_eq!(compile("[a").unwrap_err(), CompileError::UnbalancedBracket { index: 0 });
assert_eq!(compile("a||b").unwrap_err(), CompileError::DanglingOperator { index: 2 });
```

# Crate features

* **logging** - Emits `log` messages from each compiler stage.
* **perf-literal** (default) - Uses `memchr` to skip ahead during searches
  when every match starts with the same ASCII byte.
*/

#![deny(missing_docs)]

pub use thompson_dfa_compiler::{CompileError, Diagnostics, Match};

pub use crate::builder::Builder;
pub use crate::regex::CompiledPattern;

mod builder;
mod regex;

/// Compile `pattern` with the default configuration.
///
/// This is a shortcut for `Builder::new(pattern).build()`.
pub fn compile(pattern: &str) -> Result<CompiledPattern, CompileError> {
    Builder::new(pattern).build()
}

#[cfg(doctest)]
doc_comment::doctest!("../README.md");
