//! Algorithm selection and graph comparison
//!
//! A [`GraphMatcher`] holds one cost function, one [`Algorithm`] and the
//! debug settings, and compares any number of graph pairs with them.

use gedx_assignment::Solver;
use gedx_core::{ensure_same_directedness, Error, Graph, Result, Triple};
use gedx_cost::CostFunction;
use gedx_ged::{BeamWidth, DebugOptions, EditDistance, EditPath, SearchOptions, SearchStatus};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroU32;
use std::str::FromStr;
use std::time::Duration;
use tracing::debug;

/// Edit distance algorithm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Algorithm {
    /// Exact A* search
    AStar,
    /// A* keeping the `beam` best partial mappings
    AStarBeam { beam: NonZeroU32 },
    /// Bipartite approximation solved with the Hungarian algorithm
    BipartiteHungarian,
    /// Bipartite approximation solved with Jonker-Volgenant
    BipartiteVolgenantJonker,
}

impl Algorithm {
    pub const DEFAULT_BEAM_WIDTH: u32 = 10;

    pub fn beam(width: u32) -> Result<Self> {
        let beam = NonZeroU32::new(width)
            .ok_or_else(|| Error::InvalidConfig("beam width must be at least 1".to_string()))?;
        Ok(Algorithm::AStarBeam { beam })
    }

    /// Replace the width of a beam search; other algorithms have no beam
    pub fn with_beam(self, width: u32) -> Result<Self> {
        match self {
            Algorithm::AStarBeam { .. } => Algorithm::beam(width),
            other => Err(Error::InvalidConfig(format!(
                "a beam width only applies to beam search, not {other}"
            ))),
        }
    }

    /// Every algorithm, beam search with `beam` as width
    pub fn all(beam: NonZeroU32) -> [Algorithm; 4] {
        [
            Algorithm::BipartiteHungarian,
            Algorithm::BipartiteVolgenantJonker,
            Algorithm::AStarBeam { beam },
            Algorithm::AStar,
        ]
    }

    #[inline]
    pub fn is_bipartite(&self) -> bool {
        self.solver().is_some()
    }

    pub fn solver(&self) -> Option<Solver> {
        match self {
            Algorithm::BipartiteHungarian => Some(Solver::Hungarian),
            Algorithm::BipartiteVolgenantJonker => Some(Solver::VolgenantJonker),
            Algorithm::AStar | Algorithm::AStarBeam { .. } => None,
        }
    }

    pub fn beam_width(&self) -> Option<BeamWidth> {
        match *self {
            Algorithm::AStar => Some(BeamWidth::Unbounded),
            Algorithm::AStarBeam { beam } => Some(BeamWidth::Bounded(beam)),
            _ => None,
        }
    }
}

impl FromStr for Algorithm {
    type Err = Error;

    /// Accepts `astar`, `beam`, `beam:<width>`, `hungarian` and `vj`
    fn from_str(s: &str) -> Result<Self> {
        let lower = s.trim().to_ascii_lowercase();
        let (name, width) = match lower.split_once(':') {
            Some((name, width)) => (name, Some(width)),
            None => (lower.as_str(), None),
        };

        match (name, width) {
            ("astar" | "a*" | "a-star", None) => Ok(Algorithm::AStar),
            ("beam" | "astar-beam" | "a*-beam", None) => Algorithm::beam(Self::DEFAULT_BEAM_WIDTH),
            ("beam" | "astar-beam" | "a*-beam", Some(width)) => match width.parse::<BeamWidth>()? {
                BeamWidth::Unbounded => Ok(Algorithm::AStar),
                BeamWidth::Bounded(beam) => Ok(Algorithm::AStarBeam { beam }),
            },
            ("hungarian" | "bipartite-hungarian", None) => Ok(Algorithm::BipartiteHungarian),
            ("vj" | "volgenant-jonker" | "bipartite-vj", None) => Ok(Algorithm::BipartiteVolgenantJonker),
            _ => Err(Error::UnknownAlgorithm(s.to_string())),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Algorithm::AStar => f.write_str("astar"),
            Algorithm::AStarBeam { beam } => write!(f, "beam:{beam}"),
            Algorithm::BipartiteHungarian => f.write_str("hungarian"),
            Algorithm::BipartiteVolgenantJonker => f.write_str("vj"),
        }
    }
}

/// Result of one comparison
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub distance: f64,
    pub edit_path: EditPath,
    /// Bipartite runs keep the cheaper direction, preferring the larger
    /// graph as source; when set the edit path transforms the second graph
    /// into the first
    pub swapped: bool,
    pub status: SearchStatus,
    /// States expanded by search, zero for bipartite runs
    pub expanded: usize,
}

#[derive(Debug, Clone)]
pub struct GraphMatcher {
    costs: CostFunction,
    algorithm: Algorithm,
    debug: DebugOptions,
    time_limit: Option<Duration>,
}

impl GraphMatcher {
    pub fn new(costs: CostFunction, algorithm: Algorithm) -> Self {
        Self {
            costs,
            algorithm,
            debug: DebugOptions::default(),
            time_limit: None,
        }
    }

    /// RDF cost function with the Hungarian bipartite approximation
    pub fn rdf() -> Self {
        Self::new(CostFunction::rdf_default(), Algorithm::BipartiteHungarian)
    }

    #[must_use]
    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    #[must_use]
    pub fn with_debug(mut self, debug: DebugOptions) -> Self {
        self.debug = debug;
        self
    }

    /// Wall clock budget for search algorithms
    #[must_use]
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    pub fn costs(&self) -> &CostFunction {
        &self.costs
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn distance(&self, g1: &Graph, g2: &Graph) -> Result<f64> {
        Ok(self.compare(g1, g2)?.distance)
    }

    pub fn compare(&self, g1: &Graph, g2: &Graph) -> Result<Comparison> {
        ensure_same_directedness(g1, g2)?;
        let ged = EditDistance::new(self.debug);

        let comparison = match (self.algorithm.solver(), self.algorithm.beam_width()) {
            (Some(solver), _) => {
                let outcome = ged.bipartite(&self.costs, g1, g2, solver)?;
                Comparison {
                    distance: outcome.distance(),
                    edit_path: outcome.edit_path,
                    swapped: outcome.swapped,
                    status: SearchStatus::Bounded,
                    expanded: 0,
                }
            }
            (None, Some(beam)) => {
                let bound = self.costs.bind(g1, g2)?;
                let mut options = SearchOptions::beam(beam);
                options.time_limit = self.time_limit;
                let outcome = ged.search(&bound, g1, g2, options)?;

                Comparison {
                    distance: outcome.distance,
                    edit_path: outcome.edit_path,
                    swapped: false,
                    status: outcome.status,
                    expanded: outcome.expanded,
                }
            }
            (None, None) => return Err(Error::UnknownAlgorithm(self.algorithm.to_string())),
        };

        debug!(
            g1 = g1.id(),
            g2 = g2.id(),
            algorithm = %self.algorithm,
            distance = comparison.distance,
            "graphs compared"
        );
        Ok(comparison)
    }

    /// Distance between the graphs of two triple lists
    pub fn distance_between_triples(&self, t1: &[Triple], t2: &[Triple]) -> Result<f64> {
        let g1 = Graph::from_triples("1", t1)?;
        let g2 = Graph::from_triples("2", t2)?;
        self.distance(&g1, &g2)
    }

    /// `result[i][j]` is the distance from `graphs[i]` to `graphs[j]`,
    /// rows computed in parallel
    pub fn pairwise(&self, graphs: &[Graph]) -> Result<Vec<Vec<f64>>> {
        graphs
            .par_iter()
            .enumerate()
            .map(|(i, g1)| {
                graphs
                    .iter()
                    .enumerate()
                    .map(|(j, g2)| if i == j { Ok(0.0) } else { self.distance(g1, g2) })
                    .collect::<Result<Vec<f64>>>()
            })
            .collect()
    }
}
