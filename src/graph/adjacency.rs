//! Adjacency list projection of a stored graph

use super::types::{AdjacencyMap, Link};

/// Direction in which links are followed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// source -> [targets]
    Forward,
    /// target -> [sources]
    Reverse,
}

impl From<bool> for Direction {
    /// `true` means transposed
    fn from(transpose: bool) -> Self {
        if transpose {
            Direction::Reverse
        } else {
            Direction::Forward
        }
    }
}

/// Build the adjacency map of a graph.
///
/// Every vertex is a key, including isolated ones. Neighbors follow the
/// order of `links`.
pub fn project<S: AsRef<str>>(vertices: &[S], links: &[Link], direction: Direction) -> AdjacencyMap {
    let mut adjacency: AdjacencyMap = vertices
        .iter()
        .map(|v| (v.as_ref().to_string(), Vec::new()))
        .collect();

    for link in links {
        let (from, to) = match direction {
            Direction::Forward => (&link.source, &link.target),
            Direction::Reverse => (&link.target, &link.source),
        };
        if let Some(neighbors) = adjacency.get_mut(from.as_str()) {
            neighbors.push(to.clone());
        }
    }

    adjacency
}
