//! Per-image vote sets.
//!
//! Each image owns its own mutex-guarded [`VoteSet`], so votes on different
//! images never contend with each other. The outer map is only write-locked
//! when a vote set is allocated or released.

use std::collections::HashMap;

use parking_lot::{Mutex, RwLock};
use uuid::Uuid;

use crate::errors::StoreError;
use crate::models::VoteCounts;

#[derive(Debug, Clone)]
struct Vote {
    /// Trimmed user id as first supplied; the map key may be case-folded.
    user: String,
    is_like: bool,
}

/// At most one vote per normalized user id.
#[derive(Debug, Default)]
struct VoteSet {
    votes: HashMap<String, Vote>,
}

impl VoteSet {
    fn counts(&self) -> VoteCounts {
        let likes = self.votes.values().filter(|v| v.is_like).count();
        VoteCounts::new(likes, self.votes.len() - likes)
    }
}

#[derive(Debug)]
pub struct VoteLedger {
    sets: RwLock<HashMap<Uuid, Mutex<VoteSet>>>,
    case_insensitive: bool,
}

impl VoteLedger {
    pub fn new(case_insensitive: bool) -> Self {
        Self {
            sets: RwLock::new(HashMap::new()),
            case_insensitive,
        }
    }

    /// Allocates an empty vote set. An existing set for the same id is kept.
    pub fn allocate(&self, image_id: Uuid) {
        self.sets.write().entry(image_id).or_default();
    }

    /// Drops the vote set for an image. Returns whether one existed.
    pub fn release(&self, image_id: Uuid) -> bool {
        self.sets.write().remove(&image_id).is_some()
    }

    pub fn set_vote(&self, image_id: Uuid, user_id: &str, is_like: bool) -> Result<(), StoreError> {
        let (key, user) = self.normalize(user_id)?;
        let sets = self.sets.read();
        let set = sets.get(&image_id).ok_or(StoreError::NotFound(image_id))?;

        let previous = set.lock().votes.insert(key, Vote { user, is_like });
        tracing::debug!(
            image_id = %image_id,
            is_like,
            replaced = previous.is_some(),
            "Vote recorded"
        );
        Ok(())
    }

    pub fn remove_vote(&self, image_id: Uuid, user_id: &str) -> Result<bool, StoreError> {
        let (key, _) = self.normalize(user_id)?;
        let sets = self.sets.read();
        let set = sets.get(&image_id).ok_or(StoreError::NotFound(image_id))?;

        let removed = set.lock().votes.remove(&key);
        if let Some(vote) = &removed {
            tracing::debug!(image_id = %image_id, user = %vote.user, "Vote removed");
        }
        Ok(removed.is_some())
    }

    pub fn counts(&self, image_id: Uuid) -> Result<VoteCounts, StoreError> {
        let sets = self.sets.read();
        let set = sets.get(&image_id).ok_or(StoreError::NotFound(image_id))?;
        let counts = set.lock().counts();
        Ok(counts)
    }

    /// Returns `(map key, stored user id)`.
    fn normalize(&self, user_id: &str) -> Result<(String, String), StoreError> {
        let trimmed = user_id.trim();
        if trimmed.is_empty() {
            return Err(StoreError::InvalidInput("user id is required".into()));
        }
        let key = if self.case_insensitive {
            trimmed.to_lowercase()
        } else {
            trimmed.to_string()
        };
        Ok((key, trimmed.to_string()))
    }
}

impl Default for VoteLedger {
    fn default() -> Self {
        Self::new(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ledger_with_image() -> (VoteLedger, Uuid) {
        let ledger = VoteLedger::default();
        let id = Uuid::new_v4();
        ledger.allocate(id);
        (ledger, id)
    }

    #[test]
    fn new_image_has_zero_counts() {
        let (ledger, id) = ledger_with_image();
        assert_eq!(ledger.counts(id).unwrap(), VoteCounts::default());
    }

    #[test]
    fn case_insensitive_overwrite() {
        let (ledger, id) = ledger_with_image();
        ledger.set_vote(id, "alice", true).unwrap();
        ledger.set_vote(id, "bob", false).unwrap();
        assert_eq!(ledger.counts(id).unwrap(), VoteCounts { likes: 1, dislikes: 1, score: 0 });

        ledger.set_vote(id, "ALICE", false).unwrap();
        assert_eq!(ledger.counts(id).unwrap(), VoteCounts { likes: 0, dislikes: 2, score: -2 });
    }

    #[test]
    fn case_sensitive_mode_keeps_distinct_users() {
        let ledger = VoteLedger::new(false);
        let id = Uuid::new_v4();
        ledger.allocate(id);
        ledger.set_vote(id, "alice", true).unwrap();
        ledger.set_vote(id, "ALICE", true).unwrap();
        assert_eq!(ledger.counts(id).unwrap().likes, 2);
    }

    #[test]
    fn user_ids_are_trimmed() {
        let (ledger, id) = ledger_with_image();
        ledger.set_vote(id, "  carol ", true).unwrap();
        ledger.set_vote(id, "carol", false).unwrap();
        assert_eq!(ledger.counts(id).unwrap(), VoteCounts { likes: 0, dislikes: 1, score: -1 });
        assert!(ledger.remove_vote(id, " Carol").unwrap());
        assert_eq!(ledger.counts(id).unwrap(), VoteCounts::default());
    }

    #[test]
    fn set_then_remove_restores_counts() {
        let (ledger, id) = ledger_with_image();
        ledger.set_vote(id, "bob", false).unwrap();
        let before = ledger.counts(id).unwrap();

        ledger.set_vote(id, "dave", true).unwrap();
        ledger.remove_vote(id, "dave").unwrap();
        assert_eq!(ledger.counts(id).unwrap(), before);
    }

    #[test]
    fn removing_missing_vote_is_a_no_op() {
        let (ledger, id) = ledger_with_image();
        assert!(!ledger.remove_vote(id, "nobody").unwrap());
    }

    #[test]
    fn blank_user_is_invalid_input() {
        let (ledger, id) = ledger_with_image();
        assert!(matches!(ledger.set_vote(id, "   ", true), Err(StoreError::InvalidInput(_))));
        assert!(matches!(ledger.remove_vote(id, ""), Err(StoreError::InvalidInput(_))));
    }

    #[test]
    fn unknown_image_is_not_found() {
        let ledger = VoteLedger::default();
        let id = Uuid::new_v4();
        assert_eq!(ledger.set_vote(id, "alice", true), Err(StoreError::NotFound(id)));
        assert_eq!(ledger.remove_vote(id, "alice"), Err(StoreError::NotFound(id)));
        assert_eq!(ledger.counts(id), Err(StoreError::NotFound(id)));
    }

    #[test]
    fn released_set_rejects_votes() {
        let (ledger, id) = ledger_with_image();
        ledger.set_vote(id, "alice", true).unwrap();
        assert!(ledger.release(id));
        assert!(!ledger.release(id));
        assert_eq!(ledger.set_vote(id, "alice", true), Err(StoreError::NotFound(id)));
    }

    #[test]
    fn concurrent_votes_are_not_lost() {
        let (ledger, id) = ledger_with_image();
        let other = Uuid::new_v4();
        ledger.allocate(other);

        std::thread::scope(|s| {
            for t in 0..8 {
                let ledger = &ledger;
                s.spawn(move || {
                    for i in 0..100 {
                        let user = format!("user-{t}-{i}");
                        ledger.set_vote(id, &user, i % 2 == 0).unwrap();
                        ledger.set_vote(other, &user, true).unwrap();
                    }
                });
            }
        });

        let counts = ledger.counts(id).unwrap();
        assert_eq!(counts.likes, 400);
        assert_eq!(counts.dislikes, 400);
        assert_eq!(counts.score, counts.likes as i64 - counts.dislikes as i64);
        assert_eq!(ledger.counts(other).unwrap().likes, 800);
    }
}
