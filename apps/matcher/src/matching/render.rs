//! Graph rendering: turns a `MatchGraph` into a petgraph graph and into
//! Graphviz DOT text. Workers and jobs are drawn as two coloured columns.

use std::collections::HashMap;
use std::fmt;

use petgraph::dot::Dot;
use petgraph::graph::{NodeIndex, UnGraph};

use crate::matching::graph::MatchGraph;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Worker,
    Job,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GraphNode {
    pub label: String,
    pub side: Side,
}

impl fmt::Display for GraphNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

/// Edge weight that prints as a two-decimal similarity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Similarity(pub f64);

impl fmt::Display for Similarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

/// Builds an undirected graph: all worker nodes first, then all job nodes,
/// then one edge per `GraphEdge`. Edges whose endpoints are not in the node
/// lists are skipped.
pub fn to_petgraph(graph: &MatchGraph) -> UnGraph<GraphNode, Similarity> {
    let mut g = UnGraph::new_undirected();
    let mut workers: HashMap<&str, NodeIndex> = HashMap::new();
    let mut jobs: HashMap<&str, NodeIndex> = HashMap::new();

    for label in &graph.worker_nodes {
        let idx = g.add_node(GraphNode {
            label: label.clone(),
            side: Side::Worker,
        });
        workers.insert(label.as_str(), idx);
    }
    for label in &graph.job_nodes {
        let idx = g.add_node(GraphNode {
            label: label.clone(),
            side: Side::Job,
        });
        jobs.insert(label.as_str(), idx);
    }

    for edge in &graph.edges {
        match (workers.get(edge.worker.as_str()), jobs.get(edge.job.as_str())) {
            (Some(&w), Some(&j)) => {
                g.add_edge(w, j, Similarity(edge.score));
            }
            _ => tracing::warn!(worker = %edge.worker, job = %edge.job, "edge endpoint missing"),
        }
    }

    g
}

/// Renders the graph as Graphviz DOT. Workers are light blue, jobs light
/// green; edges are gray and labelled with the similarity in red.
pub fn render_dot(graph: &MatchGraph) -> String {
    let g = to_petgraph(graph);
    let dot = format!(
        "{}",
        Dot::with_attr_getters(
            &g,
            &[],
            &|_, _| "color=gray fontcolor=red".to_string(),
            &|_, (_, node)| match node.side {
                Side::Worker => "style=filled fillcolor=lightblue".to_string(),
                Side::Job => "style=filled fillcolor=lightgreen".to_string(),
            },
        )
    );

    dot.replacen("graph {\n", "graph {\n    rankdir=LR\n", 1)
}
