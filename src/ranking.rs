//! Ordering and slicing of store snapshots.
//!
//! Both views are pure functions over a copied snapshot, so callers never hold
//! store locks while sorting. Every comparison ends on the insertion sequence,
//! which is unique per record, making the order total and reproducible.

use std::cmp::Ordering;

use crate::models::{ImageRecord, Page, ScoredImage, VoteCounts};

/// Upper bound for both `page_size` and top-N requests.
pub const MAX_PAGE_SIZE: usize = 50;

/// A record as captured from the store, with its insertion sequence number.
#[derive(Debug, Clone)]
pub struct SnapshotEntry {
    pub seq: u64,
    pub record: ImageRecord,
    pub counts: VoteCounts,
}

impl SnapshotEntry {
    fn into_scored(self) -> ScoredImage {
        ScoredImage {
            record: self.record,
            counts: self.counts,
        }
    }
}

pub fn clamp_page(page: i64) -> usize {
    page.max(1) as usize
}

pub fn clamp_limit(limit: i64) -> usize {
    limit.clamp(1, MAX_PAGE_SIZE as i64) as usize
}

/// Score desc, likes desc, created_at desc, then newest insertion first.
fn rating_order(a: &SnapshotEntry, b: &SnapshotEntry) -> Ordering {
    b.counts
        .score
        .cmp(&a.counts.score)
        .then_with(|| b.counts.likes.cmp(&a.counts.likes))
        .then_with(|| b.record.created_at.cmp(&a.record.created_at))
        .then_with(|| b.seq.cmp(&a.seq))
}

/// created_at desc, then newest insertion first.
fn newest_first(a: &SnapshotEntry, b: &SnapshotEntry) -> Ordering {
    b.record
        .created_at
        .cmp(&a.record.created_at)
        .then_with(|| b.seq.cmp(&a.seq))
}

/// The `n` highest-rated entries (`n` clamped to [1, 50]).
pub fn top(mut snapshot: Vec<SnapshotEntry>, n: i64) -> Vec<ScoredImage> {
    let n = clamp_limit(n);
    snapshot.sort_by(rating_order);
    snapshot.truncate(n);
    snapshot.into_iter().map(SnapshotEntry::into_scored).collect()
}

/// One newest-first page. `total_count` is the size of the snapshot the page
/// was cut from.
pub fn paginate(mut snapshot: Vec<SnapshotEntry>, page: i64, page_size: i64) -> Page<ScoredImage> {
    let page = clamp_page(page);
    let page_size = clamp_limit(page_size);
    let total_count = snapshot.len();

    snapshot.sort_by(newest_first);
    let offset = (page - 1).saturating_mul(page_size);
    let items = snapshot
        .into_iter()
        .skip(offset)
        .take(page_size)
        .map(SnapshotEntry::into_scored)
        .collect();

    Page {
        items,
        page,
        page_size,
        total_count,
    }
}
