//! Cost function definitions
//!
//! Declares how node and edge edit operations are priced: the flat
//! insertion/deletion cost per side, which attributes take part in
//! substitution costs, the cost kind and importance of each attribute, and
//! how per-attribute costs are combined.

use gedx_core::{Edge, Error, Node, Result, SYMBOL};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::distance::{attribute_cost, AttrValue};

/// Cost function shared by all distance computations of a session.
///
/// Node substitutions cost `alpha * c(u, v)` and edge substitutions
/// `(1 - alpha) * c(e, f)`, where `c` combines the per-attribute costs of
/// the respective side. Insertions and deletions cost the side's flat
/// `base_cost` regardless of attributes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CostFunction {
    /// Blend between node (alpha) and edge (1 - alpha) substitution costs
    pub alpha: f64,
    pub node: SideCost,
    pub edge: SideCost,
}

impl CostFunction {
    /// Cost function with no attributes on either side.
    /// Substitutions are free; only insertions and deletions are priced.
    pub fn new(node_cost: f64, edge_cost: f64, alpha: f64) -> Result<Self> {
        let cf = Self {
            alpha,
            node: SideCost::new(node_cost),
            edge: SideCost::new(edge_cost),
        };
        cf.validate()?;
        Ok(cf)
    }

    /// Configuration used for RDF graphs and SPARQL query graphs:
    /// unit insertion/deletion costs, `alpha = 0.5`, and equality on the
    /// `symbol` attribute of nodes and edges.
    pub fn rdf_default() -> Self {
        Self {
            alpha: 0.5,
            node: SideCost::new(1.0).with_attribute(AttributeCost::new(SYMBOL, CostKind::Equality)),
            edge: SideCost::new(1.0).with_attribute(AttributeCost::new(SYMBOL, CostKind::Equality)),
        }
    }

    #[must_use]
    pub fn with_node_attribute(mut self, attribute: AttributeCost) -> Self {
        self.node.attributes.push(attribute);
        self
    }

    #[must_use]
    pub fn with_edge_attribute(mut self, attribute: AttributeCost) -> Self {
        self.edge.attributes.push(attribute);
        self
    }

    /// Parse a JSON cost function document and validate it
    pub fn from_json(json: &str) -> Result<Self> {
        let cf: Self = serde_json::from_str(json).map_err(|e| Error::InvalidConfig(e.to_string()))?;
        cf.validate()?;
        Ok(cf)
    }

    /// Validate the configuration
    /// - `alpha` must lie in [0, 1]
    /// - base costs must be finite and strictly positive
    /// - importances must lie in [0, 1]
    /// - discrete `mu`/`nu` must be non-negative
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.alpha) {
            return Err(Error::InvalidConfig(format!(
                "alpha must be in [0, 1], got {}",
                self.alpha
            )));
        }
        self.node.validate("node")?;
        self.edge.validate("edge")
    }

    /// Blend weight applied to edge substitutions
    #[inline]
    pub fn edge_weight(&self) -> f64 {
        1.0 - self.alpha
    }

    /// Cost of substituting `a` by `b`, or of deleting `a` when `b` is `None`.
    ///
    /// Attributes are looked up by name and the configuration is validated on
    /// every call; distance computations go through [`CostFunction::bind`] instead.
    pub fn node_cost(&self, a: &Node, b: Option<&Node>) -> Result<f64> {
        self.validate()?;
        match b {
            None => Ok(self.node.base_cost),
            Some(b) => {
                let lhs = self.node.resolve(|name| a.attribute(name))?;
                let rhs = self.node.resolve(|name| b.attribute(name))?;
                Ok(self.alpha * self.node.combine(&lhs, &rhs))
            }
        }
    }

    /// Cost of an edge operation; `None` on one side means insertion or deletion.
    pub fn edge_cost(&self, a: Option<&Edge>, b: Option<&Edge>) -> Result<f64> {
        self.validate()?;
        match (a, b) {
            (None, None) => Ok(0.0),
            (Some(_), None) | (None, Some(_)) => Ok(self.edge.base_cost),
            (Some(a), Some(b)) => {
                let lhs = self.edge.resolve(|name| a.attribute(name))?;
                let rhs = self.edge.resolve(|name| b.attribute(name))?;
                Ok(self.edge_weight() * self.edge.combine(&lhs, &rhs))
            }
        }
    }
}

impl Default for CostFunction {
    fn default() -> Self {
        Self::rdf_default()
    }
}

/// Cost configuration of one side (nodes or edges)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SideCost {
    /// Flat cost of inserting or deleting one element
    pub base_cost: f64,

    /// Attributes taking part in substitution costs
    #[serde(default)]
    pub attributes: Vec<AttributeCost>,

    /// How per-attribute costs are combined
    #[serde(default)]
    pub combination: Combination,

    /// Take the square root of the combined attribute cost
    #[serde(default = "default_square_root")]
    pub square_root: bool,
}

fn default_square_root() -> bool {
    true
}

impl SideCost {
    pub fn new(base_cost: f64) -> Self {
        Self {
            base_cost,
            attributes: Vec::new(),
            combination: Combination::Sum,
            square_root: true,
        }
    }

    #[must_use]
    pub fn with_attribute(mut self, attribute: AttributeCost) -> Self {
        self.attributes.push(attribute);
        self
    }

    #[must_use]
    pub fn with_combination(mut self, combination: Combination) -> Self {
        self.combination = combination;
        self
    }

    #[must_use]
    pub fn with_square_root(mut self, square_root: bool) -> Self {
        self.square_root = square_root;
        self
    }

    fn validate(&self, side: &str) -> Result<()> {
        if !self.base_cost.is_finite() || self.base_cost <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "{side} insertion/deletion cost must be > 0, got {}",
                self.base_cost
            )));
        }
        for attr in &self.attributes {
            if !(0.0..=1.0).contains(&attr.importance) {
                return Err(Error::InvalidConfig(format!(
                    "importance of {side} attribute '{}' must be in [0, 1], got {}",
                    attr.name, attr.importance
                )));
            }
            if let CostKind::Discrete { mu, nu } = attr.kind {
                if !(mu.is_finite() && nu.is_finite() && mu >= 0.0 && nu >= 0.0) {
                    return Err(Error::InvalidConfig(format!(
                        "discrete costs of {side} attribute '{}' must be non-negative",
                        attr.name
                    )));
                }
            }
        }
        Ok(())
    }

    /// Resolve this side's attributes through `lookup`, in configuration order
    pub(crate) fn resolve<'a, F>(&self, lookup: F) -> Result<Vec<AttrValue<'a>>>
    where
        F: Fn(&str) -> Option<&'a str>,
    {
        self.attributes
            .iter()
            .map(|attr| AttrValue::resolve(&attr.name, attr.kind, lookup(&attr.name)))
            .collect()
    }

    /// Combined substitution cost of two resolved attribute rows, before blending
    pub(crate) fn combine(&self, lhs: &[AttrValue<'_>], rhs: &[AttrValue<'_>]) -> f64 {
        if self.attributes.is_empty() {
            return 0.0;
        }

        let costs = self
            .attributes
            .iter()
            .zip(lhs.iter().zip(rhs))
            .map(|(attr, (a, b))| attr.importance * attribute_cost(attr.kind, a, b));

        let combined = match self.combination {
            Combination::Sum => costs.sum::<f64>(),
            Combination::Product => costs.product::<f64>(),
        };

        if self.square_root {
            combined.sqrt()
        } else {
            combined
        }
    }
}

/// Configuration for a single attribute
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AttributeCost {
    /// Attribute name as found on nodes or edges
    pub name: String,

    #[serde(flatten)]
    pub kind: CostKind,

    /// Weight of this attribute (0.0 to 1.0)
    #[serde(default = "default_importance")]
    pub importance: f64,
}

fn default_importance() -> f64 {
    1.0
}

impl AttributeCost {
    pub fn new(name: impl Into<String>, kind: CostKind) -> Self {
        Self {
            name: name.into(),
            kind,
            importance: 1.0,
        }
    }

    #[must_use]
    pub fn with_importance(mut self, importance: f64) -> Self {
        self.importance = importance;
        self
    }
}

/// Per-attribute cost kind
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum CostKind {
    /// 0 if the values are equal, 1 otherwise
    #[default]
    Equality,
    /// |a - b| over numeric values
    Absolute,
    /// (a - b)^2 over numeric values
    Squared,
    /// `mu` for equal values, `nu` for different ones
    Discrete { mu: f64, nu: f64 },
    /// Levenshtein distance between the string values
    Sed,
}

impl CostKind {
    #[inline]
    pub fn is_numeric(&self) -> bool {
        matches!(self, CostKind::Absolute | CostKind::Squared)
    }
}

impl FromStr for CostKind {
    type Err = Error;

    /// Parses the parameterless kinds; `discrete` needs its costs and is
    /// built directly as [`CostKind::Discrete`].
    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "equality" => Ok(CostKind::Equality),
            "absolute" => Ok(CostKind::Absolute),
            "squared" => Ok(CostKind::Squared),
            "sed" => Ok(CostKind::Sed),
            _ => Err(Error::UnknownCostKind(s.to_string())),
        }
    }
}

/// How per-attribute costs of one side are combined
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Combination {
    #[default]
    Sum,
    Product,
}
