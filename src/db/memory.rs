// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-process activity store for local development and tests.

use crate::db::{ActivityStore, StoreError};
use crate::models::{Activity, NewActivity};
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// Activities keyed by (user_id, watched_id).
#[derive(Default)]
pub struct MemoryDb {
    last_id: AtomicU64,
    activities: DashMap<(u64, u64), Vec<Activity>>,
}

impl MemoryDb {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of stored activities across all users.
    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.activities.iter().map(|entry| entry.value().len()).sum()
    }

    #[cfg(test)]
    pub(crate) fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ActivityStore for MemoryDb {
    async fn create(&self, activity: NewActivity) -> Result<Activity, StoreError> {
        // Allocate the id while holding the entry so each key's vec stays in id order.
        let mut entry = self
            .activities
            .entry((activity.user_id, activity.watched_id))
            .or_default();

        let id = self.last_id.fetch_add(1, Ordering::SeqCst) + 1;
        let stored = activity.into_activity(id, chrono::Utc::now());
        entry.push(stored.clone());

        Ok(stored)
    }

    async fn query(&self, user_id: u64, watched_id: u64) -> Result<Vec<Activity>, StoreError> {
        Ok(self
            .activities
            .get(&(user_id, watched_id))
            .map(|entry| entry.value().clone())
            .unwrap_or_default())
    }
}
