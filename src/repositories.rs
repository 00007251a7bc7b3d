use crate::{
    config::DEFAULT_CAPACITY,
    domain::ImageRepository,
    errors::StoreError,
    models::{ImageRecord, Page, ScoredImage, VoteCounts},
    ranking::{self, SnapshotEntry},
    votes::VoteLedger,
};
use chrono::Utc;
use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::{debug, info};
use uuid::Uuid;

#[derive(Debug)]
struct StoredImage {
    seq: u64,
    record: ImageRecord,
}

#[derive(Debug, Default)]
struct Records {
    by_id: HashMap<Uuid, StoredImage>,
    next_seq: u64,
}

/// Bounded in-memory image store.
///
/// Lock order is always `records` then the ledger. Add and delete hold the
/// `records` write lock while touching the ledger, so a record and its vote
/// set appear and disappear together. Vote operations only take ledger locks.
#[derive(Debug)]
pub struct InMemoryImageRepository {
    records: RwLock<Records>,
    ledger: VoteLedger,
    capacity: usize,
}

impl InMemoryImageRepository {
    pub fn new(capacity: usize, case_insensitive_votes: bool) -> Self {
        info!(capacity, case_insensitive_votes, "Initializing InMemoryImageRepository");
        Self {
            records: RwLock::new(Records::default()),
            ledger: VoteLedger::new(case_insensitive_votes),
            capacity,
        }
    }

    /// Copies every record with its current counts under one read lock.
    fn snapshot(&self) -> Vec<SnapshotEntry> {
        let records = self.records.read();
        records
            .by_id
            .values()
            .map(|stored| SnapshotEntry {
                seq: stored.seq,
                record: stored.record.clone(),
                // The ledger always has a set for a live record; zeros keep this infallible.
                counts: self.ledger.counts(stored.record.id).unwrap_or_default(),
            })
            .collect()
    }
}

impl Default for InMemoryImageRepository {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY, true)
    }
}

impl ImageRepository for InMemoryImageRepository {
    fn count(&self) -> usize {
        self.records.read().by_id.len()
    }

    fn capacity(&self) -> usize {
        self.capacity
    }

    fn add(&self, title: &str, storage_ref: &str) -> Result<ImageRecord, StoreError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(StoreError::InvalidInput("title is required".into()));
        }

        let mut records = self.records.write();
        if records.by_id.len() >= self.capacity {
            debug!(capacity = self.capacity, "Rejecting add: store is full");
            return Err(StoreError::CapacityExceeded {
                capacity: self.capacity,
            });
        }

        let record = ImageRecord {
            id: Uuid::new_v4(),
            title: title.to_string(),
            storage_ref: storage_ref.to_string(),
            created_at: Utc::now(),
        };
        let seq = records.next_seq;
        records.next_seq += 1;

        self.ledger.allocate(record.id);
        records.by_id.insert(
            record.id,
            StoredImage {
                seq,
                record: record.clone(),
            },
        );

        info!(image_id = %record.id, count = records.by_id.len(), "Image record added");
        Ok(record)
    }

    fn get_scored(&self, id: Uuid) -> Option<ScoredImage> {
        let records = self.records.read();
        let stored = records.by_id.get(&id)?;
        let counts = self.ledger.counts(id).unwrap_or_default();
        Some(ScoredImage {
            record: stored.record.clone(),
            counts,
        })
    }

    fn remove(&self, id: Uuid) -> Option<ImageRecord> {
        let mut records = self.records.write();
        let removed = records.by_id.remove(&id)?;
        self.ledger.release(id);

        info!(image_id = %id, count = records.by_id.len(), "Image record deleted");
        Some(removed.record)
    }

    fn get_page(&self, page: i64, page_size: i64) -> Page<ScoredImage> {
        ranking::paginate(self.snapshot(), page, page_size)
    }

    fn get_rating_top(&self, n: i64) -> Vec<ScoredImage> {
        ranking::top(self.snapshot(), n)
    }

    fn set_vote(&self, image_id: Uuid, user_id: &str, is_like: bool) -> Result<(), StoreError> {
        self.ledger.set_vote(image_id, user_id, is_like)
    }

    fn remove_vote(&self, image_id: Uuid, user_id: &str) -> Result<bool, StoreError> {
        self.ledger.remove_vote(image_id, user_id)
    }

    fn counts(&self, image_id: Uuid) -> Result<VoteCounts, StoreError> {
        self.ledger.counts(image_id)
    }
}
