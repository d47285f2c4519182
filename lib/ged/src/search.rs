//! Best-first search over partial node mappings
//!
//! Source nodes are mapped in index order; each step sends the next source
//! node to an unused target node or deletes it. Once every source node is
//! processed a single terminal step inserts the remaining target nodes and
//! target edges. The first complete mapping taken from the frontier is
//! returned.
//!
//! With an unbounded beam the heuristic is admissible and the result is the
//! exact edit distance. A bounded beam keeps only the `w` best frontier
//! entries after every expansion and yields an upper bound. Pruning the
//! global frontier is not monotone in `w` on its own, so a beam of width `w`
//! runs widths `1..=w` and keeps the cheapest result: a wider beam never
//! reports a larger distance. The ladder stops early once a run prunes
//! nothing, since that run is already exact.

use crate::edit_path::{EditPath, NodeMapping};
use gedx_core::{ensure_same_directedness, Error, Graph, NodeIndex, Result};
use gedx_cost::{BoundCost, CostFunction};
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::fmt;
use std::num::NonZeroU32;
use std::str::FromStr;
use std::time::{Duration, Instant};
use tracing::{debug, trace, warn};

/// Maximum number of frontier entries kept after each expansion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BeamWidth {
    #[default]
    Unbounded,
    Bounded(NonZeroU32),
}

impl BeamWidth {
    /// `0` is rejected; use [`BeamWidth::Unbounded`] for exact search
    pub fn bounded(width: u32) -> Result<Self> {
        NonZeroU32::new(width)
            .map(BeamWidth::Bounded)
            .ok_or_else(|| Error::InvalidConfig("beam width must be at least 1".to_string()))
    }

    #[inline]
    pub fn limit(self) -> Option<usize> {
        match self {
            BeamWidth::Unbounded => None,
            BeamWidth::Bounded(w) => Some(w.get() as usize),
        }
    }
}

impl FromStr for BeamWidth {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "inf" | "unbounded" | "exact" => Ok(BeamWidth::Unbounded),
            other => {
                let width = other
                    .parse::<u32>()
                    .map_err(|_| Error::InvalidConfig(format!("invalid beam width '{s}'")))?;
                BeamWidth::bounded(width)
            }
        }
    }
}

impl fmt::Display for BeamWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BeamWidth::Unbounded => f.write_str("unbounded"),
            BeamWidth::Bounded(w) => write!(f, "{w}"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SearchOptions {
    pub beam: BeamWidth,
    /// Wall clock budget; the best partial mapping is completed greedily when it runs out
    pub time_limit: Option<Duration>,
}

impl SearchOptions {
    pub fn exact() -> Self {
        Self::default()
    }

    pub fn beam(width: BeamWidth) -> Self {
        Self {
            beam: width,
            time_limit: None,
        }
    }

    #[must_use]
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }
}

/// How much a [`SearchOutcome`] distance can be trusted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchStatus {
    /// Exact edit distance
    Optimal,
    /// The beam dropped frontier entries; the distance is an upper bound
    Bounded,
    /// The time limit ran out; the distance is an upper bound
    TimedOut,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome {
    pub distance: f64,
    /// Lower bound on the exact edit distance: the smallest `g + h` among the
    /// state the search stopped on and every state the beam dropped. Equal to
    /// `distance` when the status is [`SearchStatus::Optimal`]
    pub lower_bound: f64,
    pub mapping: NodeMapping,
    pub edit_path: EditPath,
    pub expanded: usize,
    pub status: SearchStatus,
}

/// Partial mapping of source nodes `0..mapped.len()`
#[derive(Debug, Clone)]
struct State {
    mapped: Vec<Option<NodeIndex>>,
    used: Vec<bool>,
    used_count: usize,
    /// Target edges with both endpoints used
    determined_target_edges: usize,
    g: f64,
    complete: bool,
}

#[derive(Debug)]
struct Entry {
    f: OrderedFloat<f64>,
    seq: u64,
    state: State,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// Lower f first, then insertion order
impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.f.cmp(&other.f).then_with(|| self.seq.cmp(&other.seq))
    }
}

struct Search<'a, 'c, 'g> {
    costs: &'a BoundCost<'c, 'g>,
    source: &'a Graph,
    target: &'a Graph,
    /// `open_source_edges[k]`: source edges with an endpoint in `k..n`
    open_source_edges: Vec<usize>,
    frontier: BinaryHeap<Reverse<Entry>>,
    seq: u64,
    expanded: usize,
    /// Smallest `f` among entries dropped by the beam
    discarded: Option<f64>,
}

impl<'a, 'c, 'g> Search<'a, 'c, 'g> {
    fn new(costs: &'a BoundCost<'c, 'g>, source: &'a Graph, target: &'a Graph) -> Self {
        let n = source.len();
        let mut by_last_endpoint = vec![0usize; n + 1];
        for edge in source.edges() {
            by_last_endpoint[edge.source().max(edge.target())] += 1;
        }
        let mut open_source_edges = vec![0usize; n + 1];
        for k in (0..n).rev() {
            open_source_edges[k] = open_source_edges[k + 1] + by_last_endpoint[k];
        }

        Self {
            costs,
            source,
            target,
            open_source_edges,
            frontier: BinaryHeap::new(),
            seq: 0,
            expanded: 0,
            discarded: None,
        }
    }

    /// Lower bound on the cost of completing `state`
    fn heuristic(&self, state: &State) -> f64 {
        if state.complete {
            return 0.0;
        }
        let open_source = self.source.len() - state.mapped.len();
        let open_target = self.target.len() - state.used_count;
        let open_source_edges = self.open_source_edges[state.mapped.len()];
        let open_target_edges = self.target.edge_count() - state.determined_target_edges;

        open_source.abs_diff(open_target) as f64 * self.costs.node_indel()
            + open_source_edges.abs_diff(open_target_edges) as f64 * self.costs.edge_indel()
    }

    fn push(&mut self, state: State) {
        let f = state.g + self.heuristic(&state);
        self.seq += 1;
        self.frontier.push(Reverse(Entry {
            f: OrderedFloat(f),
            seq: self.seq,
            state,
        }));
    }

    fn pop(&mut self) -> Option<Entry> {
        self.frontier.pop().map(|Reverse(entry)| entry)
    }

    #[inline]
    fn pruned(&self) -> bool {
        self.discarded.is_some()
    }

    /// `popped` is the `f` of the entry just taken, the smallest on the frontier
    fn lower_bound(&self, popped: f64) -> f64 {
        self.discarded.map_or(popped, |d| d.min(popped))
    }

    /// Keep the best `width` entries
    fn prune(&mut self, width: usize) {
        if self.frontier.len() <= width {
            return;
        }
        let mut entries: Vec<Entry> = self.frontier.drain().map(|Reverse(e)| e).collect();
        entries.sort_unstable();
        let dropped = entries[width].f.into_inner();
        self.discarded = Some(self.discarded.map_or(dropped, |d| d.min(dropped)));
        entries.truncate(width);
        self.frontier = entries.into_iter().map(Reverse).collect();
    }

    fn expand(&mut self, state: &State) {
        self.expanded += 1;
        let k = state.mapped.len();

        if k == self.source.len() {
            let inserted_nodes = self.target.len() - state.used_count;
            let inserted_edges = self.target.edge_count() - state.determined_target_edges;
            let mut done = state.clone();
            done.g += inserted_nodes as f64 * self.costs.node_indel()
                + inserted_edges as f64 * self.costs.edge_indel();
            done.complete = true;
            self.push(done);
            return;
        }

        for t in (0..self.target.len()).filter(|&t| !state.used[t]) {
            let (cost, determined) = self.substitution_step(state, k, t);
            let mut next = state.clone();
            next.mapped.push(Some(t));
            next.used[t] = true;
            next.used_count += 1;
            next.determined_target_edges += determined;
            next.g += cost;
            self.push(next);
        }

        let mut next = state.clone();
        next.g += self.deletion_step(state, k);
        next.mapped.push(None);
        self.push(next);
    }

    /// Cost of mapping source node `k` to target node `t`, including the
    /// edges between `k` and earlier source nodes, and the number of target
    /// edges this fixes.
    fn substitution_step(&self, state: &State, k: NodeIndex, t: NodeIndex) -> (f64, usize) {
        let (s, g) = (self.source, self.target);
        let costs = self.costs;
        let mut determined = 0usize;
        let mut cost = costs.substitute_node(k, t);

        let mut pair = |se: Option<usize>, te: Option<usize>| {
            if te.is_some() {
                determined += 1;
            }
            costs.edge_cost(se, te)
        };

        cost += pair(s.edge_index_between(k, k), g.edge_index_between(t, t));
        for (j, image) in state.mapped.iter().enumerate() {
            match *image {
                Some(y) => {
                    cost += pair(s.edge_index_between(k, j), g.edge_index_between(t, y));
                    if s.is_directed() {
                        cost += pair(s.edge_index_between(j, k), g.edge_index_between(y, t));
                    }
                }
                None => {
                    cost += costs.edge_cost(s.edge_index_between(k, j), None);
                    if s.is_directed() {
                        cost += costs.edge_cost(s.edge_index_between(j, k), None);
                    }
                }
            }
        }
        (cost, determined)
    }

    /// Cost of deleting source node `k` with its edges to earlier source nodes
    fn deletion_step(&self, state: &State, k: NodeIndex) -> f64 {
        let s = self.source;
        let mut cost = self.costs.node_indel() + self.costs.edge_cost(s.edge_index_between(k, k), None);
        for j in 0..state.mapped.len() {
            cost += self.costs.edge_cost(s.edge_index_between(k, j), None);
            if s.is_directed() {
                cost += self.costs.edge_cost(s.edge_index_between(j, k), None);
            }
        }
        cost
    }
}

/// Search for the edit distance between `source` and `target`
pub fn search(
    costs: &BoundCost<'_, '_>,
    source: &Graph,
    target: &Graph,
    options: SearchOptions,
) -> Result<SearchOutcome> {
    ensure_same_directedness(source, target)?;
    let deadline = options.time_limit.map(|limit| Instant::now() + limit);

    let Some(width) = options.beam.limit() else {
        return run(costs, source, target, None, deadline);
    };

    let mut best = run(costs, source, target, Some(1), deadline)?;
    for w in 2..=width {
        if best.status != SearchStatus::Bounded {
            break;
        }
        let next = run(costs, source, target, Some(w), deadline)?;
        best = best.keep_cheaper(next);
    }
    Ok(best)
}

impl SearchOutcome {
    /// Merge the outcome of a wider beam run into this one
    fn keep_cheaper(self, wider: SearchOutcome) -> SearchOutcome {
        let expanded = self.expanded + wider.expanded;
        let lower_bound = self.lower_bound.max(wider.lower_bound);
        let status = match wider.status {
            SearchStatus::Bounded => self.status,
            status => status,
        };
        let mut best = if wider.distance < self.distance { wider } else { self };
        best.expanded = expanded;
        best.status = status;
        best.lower_bound = if status == SearchStatus::Optimal {
            best.distance
        } else {
            lower_bound.min(best.distance)
        };
        best
    }
}

/// One best-first search, pruned to `width` entries after every expansion
fn run(
    costs: &BoundCost<'_, '_>,
    source: &Graph,
    target: &Graph,
    width: Option<usize>,
    deadline: Option<Instant>,
) -> Result<SearchOutcome> {
    let mut search = Search::new(costs, source, target);
    search.push(State {
        mapped: Vec::with_capacity(source.len()),
        used: vec![false; target.len()],
        used_count: 0,
        determined_target_edges: 0,
        g: 0.0,
        complete: false,
    });

    while let Some(entry) = search.pop() {
        let lower_bound = search.lower_bound(entry.f.into_inner());

        if entry.state.complete {
            let status = if search.pruned() {
                SearchStatus::Bounded
            } else {
                SearchStatus::Optimal
            };
            return finish(&search, entry.state, lower_bound, status);
        }

        if deadline.is_some_and(|d| Instant::now() >= d) {
            warn!(
                source = source.id(),
                target = target.id(),
                expanded = search.expanded,
                "search time limit reached, completing best partial mapping"
            );
            let state = complete_greedily(&search, entry.state);
            return finish(&search, state, lower_bound, SearchStatus::TimedOut);
        }

        search.expand(&entry.state);
        if let Some(width) = width {
            search.prune(width);
        }
    }

    Err(Error::Infeasible(format!(
        "search frontier emptied before mapping {} onto {}",
        source.id(),
        target.id()
    )))
}

/// Delete every unprocessed source node and insert every unused target node
fn complete_greedily(search: &Search<'_, '_, '_>, mut state: State) -> State {
    while state.mapped.len() < search.source.len() {
        let k = state.mapped.len();
        state.g += search.deletion_step(&state, k);
        state.mapped.push(None);
    }
    let inserted_nodes = search.target.len() - state.used_count;
    let inserted_edges = search.target.edge_count() - state.determined_target_edges;
    state.g += inserted_nodes as f64 * search.costs.node_indel()
        + inserted_edges as f64 * search.costs.edge_indel();
    state.complete = true;
    state
}

fn finish(
    search: &Search<'_, '_, '_>,
    state: State,
    lower_bound: f64,
    status: SearchStatus,
) -> Result<SearchOutcome> {
    let mapping = NodeMapping::new(state.mapped, search.target.len())?;
    let edit_path = EditPath::from_mapping(search.costs, search.source, search.target, &mapping)?;
    debug_assert!(
        (edit_path.cost() - state.g).abs() <= 1e-9 * state.g.max(1.0),
        "search cost {} disagrees with edit path cost {}",
        state.g,
        edit_path.cost()
    );

    debug!(
        source = search.source.id(),
        target = search.target.id(),
        distance = state.g,
        expanded = search.expanded,
        status = ?status,
        "search finished"
    );
    trace!(frontier = search.frontier.len(), "frontier left");

    Ok(SearchOutcome {
        distance: state.g,
        lower_bound,
        mapping,
        edit_path,
        expanded: search.expanded,
        status,
    })
}

/// Edit distance found by search with the given beam width
pub fn distance_by_search(
    source: &Graph,
    target: &Graph,
    costs: &CostFunction,
    beam: BeamWidth,
) -> Result<f64> {
    let bound = costs.bind(source, target)?;
    Ok(search(&bound, source, target, SearchOptions::beam(beam))?.distance)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph(id: &str, directed: bool, nodes: &[(&str, &str)], edges: &[(&str, &str, &str)]) -> Graph {
        let mut b = Graph::builder(id, directed);
        for (n, label) in nodes {
            b.add_node(*n, [("symbol", *label)]);
        }
        for (from, to, label) in edges {
            b.add_edge(*from, *to, [("symbol", *label)]);
        }
        b.build().unwrap()
    }

    fn exact(s: &Graph, t: &Graph) -> SearchOutcome {
        let cf = CostFunction::rdf_default();
        let bound = cf.bind(s, t).unwrap();
        search(&bound, s, t, SearchOptions::exact()).unwrap()
    }

    #[test]
    fn test_identity_is_zero() {
        let g = graph(
            "g",
            true,
            &[("a", "x"), ("b", "y"), ("c", "z")],
            &[("a", "b", "p"), ("b", "c", "q"), ("c", "a", "r")],
        );
        let out = exact(&g, &g);
        assert_eq!(out.distance, 0.0);
        assert_eq!(out.status, SearchStatus::Optimal);
        assert_eq!(out.mapping.as_slice(), &[Some(0), Some(1), Some(2)]);
    }

    #[test]
    fn test_extra_isolated_node() {
        let s = graph("s", true, &[("a", "x"), ("b", "y")], &[("a", "b", "p")]);
        let t = graph("t", true, &[("a", "x"), ("b", "y"), ("c", "z")], &[("a", "b", "p")]);
        assert_eq!(exact(&s, &t).distance, 1.0);
        assert_eq!(exact(&t, &s).distance, 1.0);
    }

    #[test]
    fn test_edge_relabel() {
        let s = graph("s", true, &[("a", "x"), ("b", "y")], &[("a", "b", "p")]);
        let t = graph("t", true, &[("a", "x"), ("b", "y")], &[("a", "b", "q")]);
        assert_eq!(exact(&s, &t).distance, 0.5);
    }

    #[test]
    fn test_reversed_edge() {
        let s = graph("s", true, &[("a", "x"), ("b", "y")], &[("a", "b", "p")]);
        let t = graph("t", true, &[("a", "x"), ("b", "y")], &[("b", "a", "p")]);
        // relabelling both nodes (0.5 each) beats deleting and inserting the edge
        let out = exact(&s, &t);
        assert_eq!(out.distance, 1.0);
        assert_eq!(out.mapping.as_slice(), &[Some(1), Some(0)]);

        let su = graph("s", false, &[("a", "x"), ("b", "y")], &[("a", "b", "p")]);
        let tu = graph("t", false, &[("a", "x"), ("b", "y")], &[("b", "a", "p")]);
        assert_eq!(exact(&su, &tu).distance, 0.0);
    }

    #[test]
    fn test_self_loop() {
        let s = graph("s", true, &[("a", "x")], &[("a", "a", "p")]);
        let t = graph("t", true, &[("a", "x")], &[]);
        let out = exact(&s, &t);
        assert_eq!(out.distance, 1.0);
        assert_eq!(out.edit_path.cost(), 1.0);
    }

    #[test]
    fn test_empty_graphs() {
        let e = graph("e", true, &[], &[]);
        let g = graph("g", true, &[("a", "x"), ("b", "y")], &[("a", "b", "p")]);
        assert_eq!(exact(&e, &e).distance, 0.0);
        assert_eq!(exact(&e, &g).distance, 3.0);
        assert_eq!(exact(&g, &e).distance, 3.0);
    }

    #[test]
    fn test_beam_is_upper_bound() {
        let s = graph(
            "s",
            true,
            &[("a", "x"), ("b", "y"), ("c", "z"), ("d", "x")],
            &[("a", "b", "p"), ("b", "c", "p"), ("c", "d", "q"), ("d", "a", "r")],
        );
        let t = graph(
            "t",
            true,
            &[("a", "y"), ("b", "x"), ("c", "z")],
            &[("a", "b", "p"), ("b", "c", "q"), ("c", "b", "r")],
        );
        let cf = CostFunction::rdf_default();
        let bound = cf.bind(&s, &t).unwrap();
        let optimal = search(&bound, &s, &t, SearchOptions::exact()).unwrap();

        for width in [1, 2, 3, 5, 10] {
            let beam = BeamWidth::bounded(width).unwrap();
            let out = search(&bound, &s, &t, SearchOptions::beam(beam)).unwrap();
            assert!(out.distance >= optimal.distance, "beam {width}");
            assert!(out.lower_bound <= out.distance);
            assert_eq!(out.edit_path.cost(), out.distance);
        }
    }

    #[test]
    fn test_wide_beam_matches_exact() {
        let s = graph("s", true, &[("a", "x"), ("b", "y")], &[("a", "b", "p")]);
        let t = graph("t", true, &[("a", "x"), ("b", "z")], &[("a", "b", "p")]);
        let exact = distance_by_search(&s, &t, &CostFunction::rdf_default(), BeamWidth::Unbounded).unwrap();
        let wide = distance_by_search(
            &s,
            &t,
            &CostFunction::rdf_default(),
            BeamWidth::bounded(1000).unwrap(),
        )
        .unwrap();
        assert_eq!(exact, 0.5);
        assert_eq!(wide, exact);
    }

    #[test]
    fn test_zero_time_limit_still_answers() {
        let s = graph("s", true, &[("a", "x"), ("b", "y")], &[("a", "b", "p")]);
        let t = graph("t", true, &[("a", "x")], &[]);
        let cf = CostFunction::rdf_default();
        let bound = cf.bind(&s, &t).unwrap();
        let out = search(
            &bound,
            &s,
            &t,
            SearchOptions::exact().with_time_limit(Duration::ZERO),
        )
        .unwrap();
        assert_eq!(out.status, SearchStatus::TimedOut);
        // the root is completed by deleting everything and inserting everything
        assert_eq!(out.distance, 4.0);
        assert!(out.lower_bound <= out.distance);
    }

    #[test]
    fn test_beam_width_parsing() {
        assert_eq!("inf".parse::<BeamWidth>().unwrap(), BeamWidth::Unbounded);
        assert_eq!("8".parse::<BeamWidth>().unwrap().limit(), Some(8));
        let err = "0".parse::<BeamWidth>().unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
        assert!("wide".parse::<BeamWidth>().is_err());
    }
}
