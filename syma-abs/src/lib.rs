#![allow(unused)]
/*!

Types/type aliases that abstract over the implementing backing type.

A motivating example is `IString`, an interned string type. A number of external crates could
provide this functionality; this module redirects to whichever implementation we want. To switch
backing crates, only this module needs to change.

*/

pub use std::collections::{HashMap, HashSet};

use std::iter::once;

// Interned strings. Create an interned string with `IString::from(..)`.
pub use ustr::Ustr;
pub type IString = Ustr;

// For argument lists and other small, usually-short vectors.
pub use smallvec::{smallvec, SmallVec};

// Structured logging, used the same way throughout the workspace.
pub use tracing;

/// Join an iterator of `String`s with a separator, the way `[T]::join` does for slices.
///
/// ```
/// use syma_abs::join_iter;
/// let joined: String = join_iter(["a", "b", "c"].into_iter().map(str::to_string), ", ");
/// assert_eq!(joined, "a, b, c");
/// ```
pub fn join_iter<T: AsRef<str>>(mut iter: impl Iterator<Item = T>, sep: &str) -> String {
  let mut out = String::new();
  if let Some(first) = iter.next() {
    out.push_str(first.as_ref());
    for item in iter {
      out.push_str(sep);
      out.push_str(item.as_ref());
    }
  }
  out
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn join_iter_joins_with_separator() {
    assert_eq!(join_iter(["a", "b", "c"].into_iter().map(str::to_string), ", "), "a, b, c");
    assert_eq!(join_iter(Vec::<String>::new().into_iter(), ", "), "");
  }
}
