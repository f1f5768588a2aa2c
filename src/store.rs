use log::debug;
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

use crate::error::ExprError;
use crate::flatten::{flatten, reconstruct, Record};
use crate::node::Node;

/// The sink half of the persistence seam a host implements against its
/// store. A batch is inserted atomically: on error nothing is kept.
/// Adapters wrap their own failures in [`ExprError::Storage`] so they
/// propagate unchanged.
pub trait RecordSink {
    fn write(&mut self, batch: &[Record]) -> Result<(), ExprError>;
}

/// The source half of the persistence seam: returns the closure of
/// records reachable from `root_id` through `parent_id`.
pub trait RecordSource {
    fn read_tree(&self, root_id: Uuid) -> Result<Vec<Record>, ExprError>;
}

/// Flattens `root` and writes the batch to the sink.
pub fn persist<S: RecordSink + ?Sized>(root: &Node, sink: &mut S) -> Result<(), ExprError> {
    let batch = flatten(root);
    debug!("persisting tree {} ({} records)", root.id(), batch.len());
    sink.write(&batch)
}

/// Reads the record closure of `root_id` and reconstructs the tree.
pub fn load<S: RecordSource + ?Sized>(source: &S, root_id: Uuid) -> Result<Node, ExprError> {
    let records = source.read_tree(root_id)?;
    reconstruct(&records)
}

/// In-memory reference adapter backing the crate's own tests and
/// documenting the contract host adapters must honor.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: HashMap<Uuid, Record>,
}

impl MemoryStore {
    pub fn new() -> MemoryStore {
        MemoryStore::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl RecordSink for MemoryStore {
    /// The whole batch is validated before the map is touched, so a
    /// failed write leaves the store unchanged.
    fn write(&mut self, batch: &[Record]) -> Result<(), ExprError> {
        let mut fresh: HashSet<Uuid> = HashSet::with_capacity(batch.len());
        for record in batch {
            if self.records.contains_key(&record.id) || !fresh.insert(record.id) {
                return Err(ExprError::Integrity(format!(
                    "record {} already exists",
                    record.id
                )));
            }
        }
        for record in batch {
            self.records.insert(record.id, record.clone());
        }
        Ok(())
    }
}

impl RecordSource for MemoryStore {
    /// Depth-first closure in child-index order, root first.
    fn read_tree(&self, root_id: Uuid) -> Result<Vec<Record>, ExprError> {
        let root = self
            .records
            .get(&root_id)
            .ok_or_else(|| ExprError::Integrity(format!("root {} not found", root_id)))?;
        let mut children: HashMap<Uuid, Vec<&Record>> = HashMap::new();
        for record in self.records.values() {
            if let Some(parent) = record.parent_id {
                children.entry(parent).or_default().push(record);
            }
        }
        for siblings in children.values_mut() {
            siblings.sort_by_key(|r| r.child_index);
        }
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(record) = stack.pop() {
            out.push(record.clone());
            if let Some(kids) = children.get(&record.id) {
                for kid in kids.iter().rev() {
                    stack.push(*kid);
                }
            }
        }
        Ok(out)
    }
}
