//! Tolerance-based comparison used by `assert_equal` implementations.
//!
//! Two instances of the same abstract type may store elements in different
//! physical orders, so comparisons first line elements up by an identifying
//! key and only then compare values.

use crate::error::{RegistryError, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
/// Combined relative and absolute tolerance.
pub struct Tolerance {
    pub rel_tol: f64,
    pub abs_tol: f64,
}

impl Default for Tolerance {
    fn default() -> Self {
        Self {
            rel_tol: 1e-9,
            abs_tol: 0.0,
        }
    }
}

impl Tolerance {
    pub fn new(rel_tol: f64, abs_tol: f64) -> Self {
        Self { rel_tol, abs_tol }
    }

    /// `|a - b| <= abs_tol + rel_tol * |b|`
    pub fn is_close(&self, a: f64, b: f64) -> bool {
        if a == b {
            return true;
        }
        (a - b).abs() <= self.abs_tol + self.rel_tol * b.abs()
    }
}

impl fmt::Display for Tolerance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rel_tol={:e}, abs_tol={:e}", self.rel_tol, self.abs_tol)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
/// Which part of two instances diverged.
pub enum Aspect {
    /// Element counts or dimensions differ.
    Shape,
    Directionality,
    /// Elements could not be put into correspondence by key.
    Ordering,
    /// Corresponding elements hold values outside tolerance.
    Value,
}

impl Aspect {
    pub fn as_str(&self) -> &'static str {
        match self {
            Aspect::Shape => "shape",
            Aspect::Directionality => "directionality",
            Aspect::Ordering => "ordering",
            Aspect::Value => "value",
        }
    }
}

impl fmt::Display for Aspect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fail with [`Aspect::Directionality`] when the flags differ.
pub fn expect_same_direction(left: bool, right: bool, tolerance: Tolerance) -> Result<()> {
    if left == right {
        Ok(())
    } else {
        Err(RegistryError::mismatch(
            Aspect::Directionality,
            format!("is_directed {left} != {right}"),
            tolerance,
        ))
    }
}

/// Compare keyed numeric elements after matching them up by key.
///
/// Both sides are given as `(key, value)` pairs in any order. Repeated keys on
/// either side are a shape mismatch because no one-to-one correspondence
/// exists.
pub fn compare_keyed<K, L, R>(left: L, right: R, tolerance: Tolerance) -> Result<()>
where
    K: Ord + fmt::Debug,
    L: IntoIterator<Item = (K, f64)>,
    R: IntoIterator<Item = (K, f64)>,
{
    let left = index_by_key(left, "left", tolerance)?;
    let right = index_by_key(right, "right", tolerance)?;
    if left.len() != right.len() {
        return Err(RegistryError::mismatch(
            Aspect::Shape,
            format!("{} elements != {} elements", left.len(), right.len()),
            tolerance,
        ));
    }
    for (key, a) in &left {
        let Some(b) = right.get(key) else {
            return Err(RegistryError::mismatch(
                Aspect::Ordering,
                format!("key {key:?} has no counterpart"),
                tolerance,
            ));
        };
        if !tolerance.is_close(*a, *b) {
            return Err(RegistryError::mismatch(
                Aspect::Value,
                format!("key {key:?}: {a} != {b}"),
                tolerance,
            ));
        }
    }
    Ok(())
}

fn index_by_key<K, I>(items: I, side: &str, tolerance: Tolerance) -> Result<BTreeMap<K, f64>>
where
    K: Ord + fmt::Debug,
    I: IntoIterator<Item = (K, f64)>,
{
    let mut map = BTreeMap::new();
    for (key, value) in items {
        if map.contains_key(&key) {
            return Err(RegistryError::mismatch(
                Aspect::Shape,
                format!("{side} side repeats key {key:?}"),
                tolerance,
            ));
        }
        map.insert(key, value);
    }
    Ok(map)
}
