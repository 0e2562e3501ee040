//! Small helpers for writing tests.

use anyhow::{bail, Result};

pub use simnet_harness_types::is_address;

/// `[0, 1, ..., n - 1]`.
///
/// ```
/// use simnet_harness::utils::range;
///
/// assert_eq!(range(3).unwrap(), vec![0, 1, 2]);
/// assert!(range(0).unwrap().is_empty());
/// assert!(range(-1).is_err());
/// ```
pub fn range(n: i64) -> Result<Vec<usize>> {
    if n < 0 {
        bail!("Negative input is not allowed");
    }
    Ok((0..n as usize).collect())
}

/// `get-counter` -> `getCounter`. Empty segments are dropped.
pub fn kebab_to_camel(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for (idx, segment) in name.split('-').filter(|s| !s.is_empty()).enumerate() {
        if idx == 0 {
            out.push_str(segment);
            continue;
        }
        let mut chars = segment.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.push_str(chars.as_str());
        }
    }
    out
}
