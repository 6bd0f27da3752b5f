//! Recording graph store for sequencing tests.
//!
//! `RecordingGraphStore` performs no work: it appends every operation it
//! receives to a shared [`Journal`], and can be told to fail at a given
//! position so tests can check what happens after a failure.
use std::sync::{Arc, Mutex};

use crate::errors::GraphStoreError;
use crate::interfaces::GraphStore;
use crate::types::{BulkImport, GraphCounts, ImportSummary, UniqueConstraint};

/// An operation received by a [`RecordingGraphStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedOperation {
    Clean,
    EnsureConstraint(UniqueConstraint),
    BulkImport(BulkImport),
    Counts,
    Close,
}

/// Shared log of recorded operations. Stays readable after the store is closed.
#[derive(Debug, Clone, Default)]
pub struct Journal(Arc<Mutex<Vec<RecordedOperation>>>);

impl Journal {
    pub fn operations(&self) -> Vec<RecordedOperation> {
        self.0.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn len(&self) -> usize {
        self.0.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn push(&self, operation: RecordedOperation) -> usize {
        let mut operations = self.0.lock().unwrap_or_else(|e| e.into_inner());
        operations.push(operation);
        operations.len() - 1
    }
}

#[derive(Debug, Default)]
pub struct RecordingGraphStore {
    journal: Journal,
    fail_at: Option<usize>,
}

impl RecordingGraphStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose `index`-th operation (zero-based) fails after being recorded.
    pub fn failing_at(index: usize) -> Self {
        Self {
            journal: Journal::default(),
            fail_at: Some(index),
        }
    }

    pub fn journal(&self) -> Journal {
        self.journal.clone()
    }

    fn record(&self, operation: RecordedOperation) -> Result<(), GraphStoreError> {
        let index = self.journal.push(operation.clone());
        if self.fail_at != Some(index) {
            return Ok(());
        }

        Err(match operation {
            RecordedOperation::BulkImport(import) => {
                GraphStoreError::import(import.source, "injected failure")
            }
            other => GraphStoreError::query(format!("{other:?}"), "injected failure"),
        })
    }
}

#[async_trait::async_trait]
impl GraphStore for RecordingGraphStore {
    async fn clean(&self) -> Result<(), GraphStoreError> {
        self.record(RecordedOperation::Clean)
    }

    async fn ensure_constraint(&self, constraint: &UniqueConstraint) -> Result<(), GraphStoreError> {
        self.record(RecordedOperation::EnsureConstraint(*constraint))
    }

    async fn bulk_import(&self, import: &BulkImport) -> Result<ImportSummary, GraphStoreError> {
        self.record(RecordedOperation::BulkImport(import.clone()))?;
        Ok(ImportSummary::default())
    }

    async fn counts(&self) -> Result<GraphCounts, GraphStoreError> {
        self.record(RecordedOperation::Counts)?;
        Ok(GraphCounts::default())
    }

    async fn close(self) {
        self.journal.push(RecordedOperation::Close);
    }
}
