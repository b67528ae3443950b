//! Edge-list ingestion
//!
//! Reads the line-oriented `"<from> <to>"` format: one edge per line, two
//! whitespace-separated integer tokens. Lines with any other token count, or
//! tokens that are not integers, are skipped without error. Only a failure of
//! the underlying reader is reported, and everything ingested before it stays
//! in the graph.

use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::Path;

use serde::Serialize;

use crate::errors::{PageRankError, Result};
use crate::graph::Graph;
use crate::types::NodeId;

/// A directed `(from, to)` pair
pub type Edge = (NodeId, NodeId);

/// Counters from one load
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    /// Lines read
    pub lines: usize,
    /// Lines accepted as edges (duplicates included)
    pub edges: usize,
    /// Lines skipped as malformed
    pub skipped: usize,
}

/// Parse one edge-list line.
///
/// Returns `None` unless the line holds exactly two integer tokens.
pub fn parse_edge_line(line: &str) -> Option<Edge> {
    let mut tokens = line.split_whitespace();
    let from = tokens.next()?.parse().ok()?;
    let to = tokens.next()?.parse().ok()?;
    if tokens.next().is_some() {
        return None;
    }
    Some((from, to))
}

/// Iterator over the edges of a buffered reader.
///
/// Yields `Err` once if the reader fails and then stops.
pub struct EdgeListReader<R> {
    lines: Lines<R>,
    lines_read: usize,
    skipped: usize,
    failed: bool,
}

impl<R: BufRead> EdgeListReader<R> {
    /// Wrap a buffered reader
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            lines_read: 0,
            skipped: 0,
            failed: false,
        }
    }

    /// Number of lines read so far
    pub fn lines_read(&self) -> usize {
        self.lines_read
    }

    /// Number of malformed lines skipped so far
    pub fn skipped(&self) -> usize {
        self.skipped
    }
}

impl<R: BufRead> Iterator for EdgeListReader<R> {
    type Item = Result<Edge>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        loop {
            match self.lines.next()? {
                Ok(line) => {
                    self.lines_read += 1;
                    match parse_edge_line(&line) {
                        Some(edge) => return Some(Ok(edge)),
                        None => {
                            self.skipped += 1;
                            trace_event!(
                                trace,
                                line = self.lines_read,
                                "skipping malformed edge line"
                            );
                        }
                    }
                }
                Err(source) => {
                    self.failed = true;
                    return Some(Err(PageRankError::IngestionFailed {
                        line: self.lines_read,
                        source,
                    }));
                }
            }
        }
    }
}

/// Load every edge from `reader` into `graph`.
///
/// Both endpoints are created before the edge is recorded. On a read error
/// the partially populated graph is kept and the error is returned.
pub fn load_edges<R: BufRead>(graph: &mut Graph, reader: R) -> Result<LoadReport> {
    trace_stage!("ingest");
    let mut edges = EdgeListReader::new(reader);
    let mut accepted = 0;

    for edge in edges.by_ref() {
        let (from, to) = match edge {
            Ok(edge) => edge,
            Err(err) => {
                trace_event!(warn, error = %err, "edge list ended early");
                return Err(err);
            }
        };
        graph.get_or_create_node(from);
        graph.get_or_create_node(to);
        graph.add_edge(from, to)?;
        accepted += 1;
    }

    let report = LoadReport {
        lines: edges.lines_read(),
        edges: accepted,
        skipped: edges.skipped(),
    };
    trace_event!(
        debug,
        lines = report.lines,
        edges = report.edges,
        skipped = report.skipped,
        "edge list loaded"
    );
    Ok(report)
}

impl Graph {
    /// Load an edge-list file into this graph.
    ///
    /// A file that cannot be opened is reported as
    /// [`PageRankError::IngestionFailed`] with zero lines read.
    pub fn load_from_path(&mut self, path: impl AsRef<Path>) -> Result<LoadReport> {
        let file = File::open(path.as_ref())
            .map_err(|source| PageRankError::IngestionFailed { line: 0, source })?;
        load_edges(self, BufReader::new(file))
    }

    /// Build a graph from `(from, to)` pairs
    pub fn from_edges(edges: impl IntoIterator<Item = Edge>) -> Result<Self> {
        let mut graph = Graph::new();
        graph.extend_edges(edges)?;
        Ok(graph)
    }

    /// Add `(from, to)` pairs, creating endpoints as needed
    pub fn extend_edges(&mut self, edges: impl IntoIterator<Item = Edge>) -> Result<()> {
        for (from, to) in edges {
            self.get_or_create_node(from);
            self.get_or_create_node(to);
            self.add_edge(from, to)?;
        }
        Ok(())
    }
}
