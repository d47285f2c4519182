//! Per-attribute cost functions
//!
//! All functions return a non-negative cost where 0.0 means identical.
//! Importance weights are applied by the caller.

use crate::schema::CostKind;
use gedx_core::{Error, Result};

/// An attribute value resolved once for a given cost kind
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AttrValue<'a> {
    /// The element does not carry the attribute
    Missing,
    Text(&'a str),
    Number(f64),
}

impl<'a> AttrValue<'a> {
    /// Resolve a raw value for `kind`, parsing it when the kind is numeric
    pub fn resolve(name: &str, kind: CostKind, raw: Option<&'a str>) -> Result<Self> {
        let Some(raw) = raw else {
            return Ok(AttrValue::Missing);
        };
        if !kind.is_numeric() {
            return Ok(AttrValue::Text(raw));
        }
        match raw.trim().parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(AttrValue::Number(value)),
            _ => Err(Error::NonNumericAttribute {
                attribute: name.to_string(),
                value: raw.to_string(),
            }),
        }
    }
}

/// Cost of substituting attribute value `a` by `b` under `kind`.
///
/// A value missing on one side is compared against "nothing": unequal for
/// the label kinds, the magnitude of the present value for numeric kinds and
/// its length for `sed`. Missing on both sides costs nothing.
pub fn attribute_cost(kind: CostKind, a: &AttrValue<'_>, b: &AttrValue<'_>) -> f64 {
    use AttrValue::*;

    match kind {
        CostKind::Equality => match (a, b) {
            (Missing, Missing) => 0.0,
            (Text(x), Text(y)) if x == y => 0.0,
            _ => 1.0,
        },
        CostKind::Discrete { mu, nu } => match (a, b) {
            (Missing, Missing) => 0.0,
            (Text(x), Text(y)) if x == y => mu,
            _ => nu,
        },
        CostKind::Absolute => number_pair(a, b).map_or(0.0, |(x, y)| (x - y).abs()),
        CostKind::Squared => number_pair(a, b).map_or(0.0, |(x, y)| (x - y) * (x - y)),
        CostKind::Sed => match (a, b) {
            (Missing, Missing) => 0.0,
            (Text(x), Missing) | (Missing, Text(x)) => x.chars().count() as f64,
            (Text(x), Text(y)) => levenshtein(x, y) as f64,
            _ => 1.0,
        },
    }
}

/// Numeric pair with a missing side read as zero; `None` if both are missing
fn number_pair(a: &AttrValue<'_>, b: &AttrValue<'_>) -> Option<(f64, f64)> {
    let value = |v: &AttrValue<'_>| match v {
        AttrValue::Number(x) => Some(*x),
        _ => None,
    };
    match (value(a), value(b)) {
        (None, None) => None,
        (x, y) => Some((x.unwrap_or(0.0), y.unwrap_or(0.0))),
    }
}

/// Levenshtein distance over characters with unit costs
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let substitution = prev[j] + usize::from(ca != cb);
            curr[j + 1] = substitution.min(prev[j + 1] + 1).min(curr[j] + 1);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

#[cfg(test)]
mod tests {
    use super::*;
    use AttrValue::*;

    #[test]
    fn test_equality() {
        assert_eq!(attribute_cost(CostKind::Equality, &Text("a"), &Text("a")), 0.0);
        assert_eq!(attribute_cost(CostKind::Equality, &Text("a"), &Text("b")), 1.0);
        assert_eq!(attribute_cost(CostKind::Equality, &Text("a"), &Missing), 1.0);
        assert_eq!(attribute_cost(CostKind::Equality, &Missing, &Missing), 0.0);
    }

    #[test]
    fn test_discrete() {
        let kind = CostKind::Discrete { mu: 0.2, nu: 0.8 };
        assert_eq!(attribute_cost(kind, &Text("a"), &Text("a")), 0.2);
        assert_eq!(attribute_cost(kind, &Text("a"), &Text("b")), 0.8);
        assert_eq!(attribute_cost(kind, &Missing, &Text("b")), 0.8);
    }

    #[test]
    fn test_numeric() {
        assert_eq!(attribute_cost(CostKind::Absolute, &Number(3.0), &Number(7.5)), 4.5);
        assert_eq!(attribute_cost(CostKind::Squared, &Number(3.0), &Number(5.0)), 4.0);
        assert_eq!(attribute_cost(CostKind::Absolute, &Number(-2.0), &Missing), 2.0);
        assert_eq!(attribute_cost(CostKind::Squared, &Missing, &Missing), 0.0);
    }

    #[test]
    fn test_resolve() {
        assert_eq!(
            AttrValue::resolve("w", CostKind::Squared, Some(" 1.5 ")).unwrap(),
            Number(1.5)
        );
        assert_eq!(
            AttrValue::resolve("w", CostKind::Equality, Some("1.5")).unwrap(),
            Text("1.5")
        );
        assert_eq!(AttrValue::resolve("w", CostKind::Absolute, None).unwrap(), Missing);
        assert!(AttrValue::resolve("w", CostKind::Absolute, Some("abc")).is_err());
        assert!(AttrValue::resolve("w", CostKind::Absolute, Some("NaN")).is_err());
    }

    #[test]
    fn test_levenshtein() {
        assert_eq!(levenshtein("kitten", "sitting"), 3);
        assert_eq!(levenshtein("", "abc"), 3);
        assert_eq!(levenshtein("flaw", "lawn"), 2);
        assert_eq!(levenshtein("same", "same"), 0);
        assert_eq!(attribute_cost(CostKind::Sed, &Text("foaf:name"), &Text("foaf:nick")), 3.0);
        assert_eq!(attribute_cost(CostKind::Sed, &Text("abé"), &Missing), 3.0);
    }
}
