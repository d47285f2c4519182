//! RDF triples to attributed graphs
//!
//! Every distinct subject and object becomes a node labelled by its term;
//! each triple becomes a directed edge labelled by its predicate. Blank nodes
//! are all labelled `_` so that they only match structurally.

use crate::graph::{Graph, GraphBuilder};
use crate::Result;
use ahash::AHashSet;
use serde::{Deserialize, Serialize};

/// Attribute carrying the node term or edge predicate
pub const SYMBOL: &str = "symbol";

/// Label shared by all blank nodes
pub const BLANK_SYMBOL: &str = "_";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Triple {
    pub subject: String,
    pub predicate: String,
    pub object: String,
}

impl Triple {
    pub fn new(
        subject: impl Into<String>,
        predicate: impl Into<String>,
        object: impl Into<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            predicate: predicate.into(),
            object: object.into(),
        }
    }
}

#[inline]
fn is_blank(term: &str) -> bool {
    term.starts_with("_:")
}

fn symbol_of(term: &str) -> &str {
    if is_blank(term) {
        BLANK_SYMBOL
    } else {
        term
    }
}

impl Graph {
    /// Build a directed graph from RDF triples.
    ///
    /// The model holds a single edge per ordered node pair, so a second
    /// triple linking the same subject and object is dropped with a warning.
    pub fn from_triples<'a, I>(id: impl Into<String>, triples: I) -> Result<Graph>
    where
        I: IntoIterator<Item = &'a Triple>,
    {
        let mut builder = GraphBuilder::new(id, true);
        let mut seen_nodes = AHashSet::new();
        let mut seen_pairs = AHashSet::new();

        for triple in triples {
            for term in [&triple.subject, &triple.object] {
                if seen_nodes.insert(term.clone()) {
                    builder.add_node(term.clone(), [(SYMBOL, symbol_of(term))]);
                }
            }

            if !seen_pairs.insert((triple.subject.clone(), triple.object.clone())) {
                tracing::warn!(
                    subject = %triple.subject,
                    predicate = %triple.predicate,
                    object = %triple.object,
                    "dropping parallel triple between an already linked pair"
                );
                continue;
            }

            builder.add_edge(
                triple.subject.clone(),
                triple.object.clone(),
                [(SYMBOL, triple.predicate.as_str())],
            );
        }

        builder.build()
    }
}
