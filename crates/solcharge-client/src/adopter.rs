// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of SolCharge.
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// (CC BY-NC-ND 4.0). You may use and share this file for non-commercial purposes only and you may not
// create derivatives. See <https://creativecommons.org/licenses/by-nc-nd/4.0/>.
//
// This software is provided "AS IS", without warranty of any kind.
//
// For commercial licensing, please contact: info@solare.cz

use chrono::{DateTime, Utc};
use solcharge_types::Timestamped;
use tracing::debug;

/// Keeps the newest snapshot seen so far.
///
/// Overlapping requests may complete out of order. A snapshot is adopted
/// only if its timestamp is strictly newer than the one already held.
#[derive(Debug, Clone)]
pub struct SnapshotAdopter<T> {
    current: Option<T>,
    rejected: u64,
}

impl<T: Timestamped> SnapshotAdopter<T> {
    pub fn new() -> Self {
        Self {
            current: None,
            rejected: 0,
        }
    }

    /// Returns `true` if the snapshot replaced the current one
    pub fn offer(&mut self, snapshot: T) -> bool {
        let incoming = snapshot.timestamp();
        if let Some(held) = self.last_adopted_at()
            && incoming <= held
        {
            self.rejected += 1;
            debug!(
                "Discarding stale snapshot from {} (holding {})",
                incoming, held
            );
            return false;
        }

        self.current = Some(snapshot);
        true
    }

    pub fn current(&self) -> Option<&T> {
        self.current.as_ref()
    }

    pub fn last_adopted_at(&self) -> Option<DateTime<Utc>> {
        self.current.as_ref().map(Timestamped::timestamp)
    }

    /// Number of snapshots discarded as stale
    pub fn rejected_count(&self) -> u64 {
        self.rejected
    }
}

impl<T: Timestamped> Default for SnapshotAdopter<T> {
    fn default() -> Self {
        Self::new()
    }
}
