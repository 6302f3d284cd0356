//! RocksDB graph repository
//!
//! Layout, one column family per record kind:
//! - `graphs`:   `{graph:016x}`             -> StoredGraph
//! - `vertices`: `{graph:016x}:{seq:016x}`  -> StoredVertex
//! - `edges`:    `{graph:016x}:{seq:016x}`  -> StoredEdge
//!
//! `seq` is the submission position, so a prefix scan returns records in
//! submission order. The next graph id lives in the default column
//! family. Every mutation is a single `WriteBatch`, applied while holding
//! the writer lock; reads go through a snapshot.

use super::{check_unique, GraphRepository, StoreError, StoreResult, VertexRemoval};
use crate::graph::{GraphDetails, GraphId, Link, Vertex};
use rocksdb::{ColumnFamily, ColumnFamilyDescriptor, Direction, IteratorMode, Options, Snapshot, WriteBatch, DB};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Mutex;
use tracing::{debug, info};

const CF_GRAPHS: &str = "graphs";
const CF_VERTICES: &str = "vertices";
const CF_EDGES: &str = "edges";
const NEXT_GRAPH_ID_KEY: &[u8] = b"meta:next_graph_id";

/// Serialized graph header
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredGraph {
    id: u64,
    vertex_count: u64,
    edge_count: u64,
}

/// Serialized vertex
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredVertex {
    name: String,
}

/// Serialized edge
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredEdge {
    source: String,
    target: String,
}

/// RocksDB-based persistent storage
pub struct PersistentStorage {
    db: DB,
    /// Serializes writers and holds the next graph id
    writer: Mutex<u64>,
}

impl PersistentStorage {
    /// Open or create a new persistent storage
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();
        info!("Opening persistent storage at: {}", path.display());

        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);
        opts.set_compression_type(rocksdb::DBCompressionType::Lz4);
        opts.set_wal_recovery_mode(rocksdb::DBRecoveryMode::PointInTime);

        let cf_descriptors = vec![
            ColumnFamilyDescriptor::new("default", Options::default()),
            ColumnFamilyDescriptor::new(CF_GRAPHS, Self::cf_options()),
            ColumnFamilyDescriptor::new(CF_VERTICES, Self::cf_options()),
            ColumnFamilyDescriptor::new(CF_EDGES, Self::cf_options()),
        ];

        let db = DB::open_cf_descriptors(&opts, path, cf_descriptors)?;

        let next_id = match db.get(NEXT_GRAPH_ID_KEY)? {
            Some(raw) => bincode::deserialize::<u64>(&raw)?,
            None => 1,
        };

        info!("Persistent storage opened, next graph id {}", next_id);

        Ok(Self {
            db,
            writer: Mutex::new(next_id),
        })
    }

    fn cf_options() -> Options {
        let mut opts = Options::default();
        opts.set_compression_type(rocksdb::DBCompressionType::Lz4);
        opts
    }

    fn cf(&self, name: &str) -> StoreResult<&ColumnFamily> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| StoreError::ColumnFamily(name.to_string()))
    }

    /// Flush all data to disk
    pub fn flush(&self) -> StoreResult<()> {
        self.db.flush()?;
        debug!("Flushed storage to disk");
        Ok(())
    }

    fn read_header(&self, snapshot: &Snapshot<'_>, id: GraphId) -> StoreResult<StoredGraph> {
        let cf = self.cf(CF_GRAPHS)?;
        match snapshot.get_cf(cf, Self::graph_key(id))? {
            Some(raw) => Ok(bincode::deserialize(&raw)?),
            None => Err(StoreError::GraphNotFound(id)),
        }
    }

    /// All records under a graph's prefix, in key order
    fn scan_graph<T: DeserializeOwned>(
        &self,
        snapshot: &Snapshot<'_>,
        cf_name: &str,
        id: GraphId,
    ) -> StoreResult<Vec<(Box<[u8]>, T)>> {
        let cf = self.cf(cf_name)?;
        let prefix = Self::record_prefix(id);
        let mut records = Vec::new();

        let iter = snapshot.iterator_cf(cf, IteratorMode::From(prefix.as_slice(), Direction::Forward));
        for item in iter {
            let (key, value) = item?;
            if !key.starts_with(&prefix) {
                break;
            }
            records.push((key, bincode::deserialize(&value)?));
        }

        Ok(records)
    }

    fn graph_key(id: GraphId) -> Vec<u8> {
        format!("{:016x}", id.as_u64()).into_bytes()
    }

    fn record_prefix(id: GraphId) -> Vec<u8> {
        format!("{:016x}:", id.as_u64()).into_bytes()
    }

    fn record_key(id: GraphId, seq: usize) -> Vec<u8> {
        format!("{:016x}:{:016x}", id.as_u64(), seq).into_bytes()
    }
}

impl GraphRepository for PersistentStorage {
    fn create_graph(&self, vertices: &[Vertex], links: &[Link]) -> StoreResult<GraphId> {
        check_unique(vertices, links)?;

        let graphs = self.cf(CF_GRAPHS)?;
        let vertex_cf = self.cf(CF_VERTICES)?;
        let edge_cf = self.cf(CF_EDGES)?;

        let mut next_id = self.writer.lock().map_err(|_| StoreError::LockPoisoned)?;
        let id = GraphId::new(*next_id);

        let mut batch = WriteBatch::default();
        let header = StoredGraph {
            id: id.as_u64(),
            vertex_count: vertices.len() as u64,
            edge_count: links.len() as u64,
        };
        batch.put_cf(graphs, Self::graph_key(id), bincode::serialize(&header)?);

        for (seq, vertex) in vertices.iter().enumerate() {
            let stored = StoredVertex { name: vertex.name.clone() };
            batch.put_cf(vertex_cf, Self::record_key(id, seq), bincode::serialize(&stored)?);
        }
        for (seq, link) in links.iter().enumerate() {
            let stored = StoredEdge {
                source: link.source.clone(),
                target: link.target.clone(),
            };
            batch.put_cf(edge_cf, Self::record_key(id, seq), bincode::serialize(&stored)?);
        }
        batch.put(NEXT_GRAPH_ID_KEY, bincode::serialize(&(*next_id + 1))?);

        self.db.write(batch)?;
        *next_id += 1;

        debug!("Stored graph {} ({} vertices, {} links)", id, vertices.len(), links.len());
        Ok(id)
    }

    fn get_graph(&self, id: GraphId) -> StoreResult<GraphDetails> {
        let snapshot = self.db.snapshot();
        self.read_header(&snapshot, id)?;

        let vertices = self
            .scan_graph::<StoredVertex>(&snapshot, CF_VERTICES, id)?
            .into_iter()
            .map(|(_, v)| Vertex::new(v.name))
            .collect();
        let links = self
            .scan_graph::<StoredEdge>(&snapshot, CF_EDGES, id)?
            .into_iter()
            .map(|(_, e)| Link::new(e.source, e.target))
            .collect();

        Ok(GraphDetails { id, vertices, links })
    }

    fn delete_vertex(&self, id: GraphId, name: &str) -> StoreResult<VertexRemoval> {
        let _guard = self.writer.lock().map_err(|_| StoreError::LockPoisoned)?;
        let snapshot = self.db.snapshot();

        let mut header = self.read_header(&snapshot, id)?;
        let vertex_key = self
            .scan_graph::<StoredVertex>(&snapshot, CF_VERTICES, id)?
            .into_iter()
            .find(|(_, v)| v.name == name)
            .map(|(key, _)| key)
            .ok_or_else(|| StoreError::VertexNotFound {
                graph: id,
                name: name.to_string(),
            })?;
        let incident: Vec<Box<[u8]>> = self
            .scan_graph::<StoredEdge>(&snapshot, CF_EDGES, id)?
            .into_iter()
            .filter(|(_, e)| e.source == name || e.target == name)
            .map(|(key, _)| key)
            .collect();

        let mut batch = WriteBatch::default();
        batch.delete_cf(self.cf(CF_VERTICES)?, vertex_key);
        let edge_cf = self.cf(CF_EDGES)?;
        for key in &incident {
            batch.delete_cf(edge_cf, key);
        }

        header.vertex_count = header.vertex_count.saturating_sub(1);
        header.edge_count = header.edge_count.saturating_sub(incident.len() as u64);

        let removal = if header.vertex_count == 0 {
            batch.delete_cf(self.cf(CF_GRAPHS)?, Self::graph_key(id));
            VertexRemoval::GraphRemoved
        } else {
            batch.put_cf(self.cf(CF_GRAPHS)?, Self::graph_key(id), bincode::serialize(&header)?);
            VertexRemoval::VertexRemoved
        };

        self.db.write(batch)?;

        debug!(
            "Deleted vertex {} and {} links from graph {}, {} vertices / {} links left",
            name,
            incident.len(),
            header.id,
            header.vertex_count,
            header.edge_count
        );
        Ok(removal)
    }

    fn graph_count(&self) -> StoreResult<usize> {
        let cf = self.cf(CF_GRAPHS)?;
        let mut count = 0;
        for item in self.db.iterator_cf(cf, IteratorMode::Start) {
            item?;
            count += 1;
        }
        Ok(count)
    }
}
