//! Core type definitions for stored DAGs

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a stored graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(transparent)]
pub struct GraphId(pub u64);

impl GraphId {
    pub fn new(id: u64) -> Self {
        GraphId(id)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for GraphId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GraphId({})", self.0)
    }
}

impl From<u64> for GraphId {
    fn from(id: u64) -> Self {
        GraphId(id)
    }
}

/// A named vertex
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Vertex {
    pub name: String,
}

impl Vertex {
    pub fn new(name: impl Into<String>) -> Self {
        Vertex { name: name.into() }
    }
}

impl From<&str> for Vertex {
    fn from(name: &str) -> Self {
        Vertex::new(name)
    }
}

/// A directed edge between two vertices, referenced by name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Link {
    pub source: String,
    pub target: String,
}

impl Link {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Link {
            source: source.into(),
            target: target.into(),
        }
    }
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.source, self.target)
    }
}

/// Graph creation request: every vertex and edge arrives together
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphInput {
    pub vertices: Vec<Vertex>,
    pub links: Vec<Link>,
}

impl GraphInput {
    pub fn new(vertices: Vec<Vertex>, links: Vec<Link>) -> Self {
        GraphInput { vertices, links }
    }

    /// Build an input from plain names and (source, target) pairs
    pub fn from_names<'a>(
        vertices: impl IntoIterator<Item = &'a str>,
        links: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Self {
        GraphInput {
            vertices: vertices.into_iter().map(Vertex::from).collect(),
            links: links.into_iter().map(|(s, t)| Link::new(s, t)).collect(),
        }
    }

    pub fn vertex_names(&self) -> Vec<String> {
        self.vertices.iter().map(|v| v.name.clone()).collect()
    }
}

/// A stored graph as returned to readers
///
/// Vertices and links keep the order in which they were submitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphDetails {
    pub id: GraphId,
    pub vertices: Vec<Vertex>,
    pub links: Vec<Link>,
}

impl GraphDetails {
    pub fn vertex_names(&self) -> impl Iterator<Item = &str> {
        self.vertices.iter().map(|v| v.name.as_str())
    }
}

/// Vertex name -> neighbor names, keyed in vertex order
pub type AdjacencyMap = IndexMap<String, Vec<String>>;
