//! # Violation Ledger
//!
//! Per-player detection state and violation history.
//!
//! ## Locking
//!
//! ```text
//! RwLock<HashMap<PlayerId, Arc<Mutex<PlayerViolationRecord>>>>
//!   │                         │
//!   │ write: insert / reset   │ lock: one player's heuristics or report
//!   │ read:  lookup           │
//! ```
//!
//! The map lock is only held long enough to fetch a record handle. All
//! mutation happens under the record's own mutex, so two players never
//! contend. Record mutexes are not reentrant: callers must release a record
//! before reporting against the same player.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::SystemTime;

use parking_lot::{Mutex, RwLock};
use warden_shared::Vec3;

use crate::escalation::EscalationAction;
use crate::source::{PlayerId, Timestamp};
use crate::violation::{Violation, ViolationKind};

/// One line of violation history.
#[derive(Clone, Debug, PartialEq)]
pub struct ViolationEntry {
    /// Monotonic time of the report.
    pub at: Timestamp,
    /// Wall-clock time of the report.
    pub wall_clock: SystemTime,
    /// Category.
    pub kind: ViolationKind,
    /// Description as reported.
    pub description: String,
}

/// Mutable detection state for one player.
#[derive(Clone, Debug)]
pub struct PlayerViolationRecord {
    /// Reported violations since creation or reset.
    pub violation_count: u32,
    /// Monotonic time of the last violation.
    pub last_violation_at: Option<Timestamp>,
    /// Wall-clock time of the last violation.
    pub last_violation_wall: Option<SystemTime>,
    /// Most recent violations, oldest first.
    pub violation_history: VecDeque<ViolationEntry>,
    /// Set once the ban has fired.
    pub banned: bool,

    /// Occluded traces inside the current window.
    pub suspicious_wall_traces: u32,
    /// Start of the current wall-trace window.
    pub wall_trace_window_started_at: Timestamp,
    /// Last time the wall-trace pass ran.
    pub last_wall_trace_check_at: Option<Timestamp>,

    /// Facing direction at the last aim sample.
    pub last_aim_direction: Option<Vec3>,
    /// Time of the last aim sample.
    pub last_aim_sample_at: Option<Timestamp>,
    /// Snaps since the last aimhack report.
    pub aim_snap_detections: u32,

    /// Target player -> first time it was aimed at.
    pub tracked_targets: HashMap<PlayerId, Timestamp>,

    /// Time of the last input sample.
    pub last_input_at: Option<Timestamp>,
}

impl PlayerViolationRecord {
    /// Zeroed record whose wall-trace window opens at `now`.
    #[must_use]
    pub fn new(now: Timestamp) -> Self {
        Self {
            violation_count: 0,
            last_violation_at: None,
            last_violation_wall: None,
            violation_history: VecDeque::new(),
            banned: false,
            suspicious_wall_traces: 0,
            wall_trace_window_started_at: now,
            last_wall_trace_check_at: None,
            last_aim_direction: None,
            last_aim_sample_at: None,
            aim_snap_detections: 0,
            tracked_targets: HashMap::new(),
            last_input_at: None,
        }
    }

    fn summary(&self) -> PlayerSummary {
        PlayerSummary {
            violation_count: self.violation_count,
            last_violation_at: self.last_violation_at,
            last_violation_wall: self.last_violation_wall,
            history: self.violation_history.iter().cloned().collect(),
            banned: self.banned,
        }
    }
}

/// Read-only view of one player's violations.
#[derive(Clone, Debug, PartialEq)]
pub struct PlayerSummary {
    /// Reported violations.
    pub violation_count: u32,
    /// Monotonic time of the last violation.
    pub last_violation_at: Option<Timestamp>,
    /// Wall-clock time of the last violation.
    pub last_violation_wall: Option<SystemTime>,
    /// Retained history, oldest first.
    pub history: Vec<ViolationEntry>,
    /// Whether the ban has fired.
    pub banned: bool,
}

/// Totals across every monitored player.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct OverallSummary {
    /// Players with a record.
    pub monitored_players: usize,
    /// Sum of every player's violation count.
    pub total_violations: u64,
}

/// Outcome of appending a violation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RecordedViolation {
    /// Count after the increment.
    pub violation_count: u32,
    /// Escalation chosen for this report.
    pub action: EscalationAction,
}

/// Shared store of every player's record.
pub struct ViolationLedger {
    records: RwLock<HashMap<PlayerId, Arc<Mutex<PlayerViolationRecord>>>>,
    history_cap: usize,
}

impl ViolationLedger {
    /// Creates an empty ledger keeping at most `history_cap` entries per
    /// player.
    #[must_use]
    pub fn new(history_cap: usize) -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
            history_cap: history_cap.max(1),
        }
    }

    /// Handle to a player's record, creating it on first touch.
    fn handle(&self, player: PlayerId, now: Timestamp) -> Arc<Mutex<PlayerViolationRecord>> {
        let existing = self.records.read().get(&player).map(Arc::clone);
        if let Some(record) = existing {
            return record;
        }
        let mut records = self.records.write();
        Arc::clone(
            records
                .entry(player)
                .or_insert_with(|| Arc::new(Mutex::new(PlayerViolationRecord::new(now)))),
        )
    }

    /// Runs `f` against a player's record under its lock.
    pub fn with_record<R>(
        &self,
        player: PlayerId,
        now: Timestamp,
        f: impl FnOnce(&mut PlayerViolationRecord) -> R,
    ) -> R {
        let handle = self.handle(player, now);
        let mut record = handle.lock();
        f(&mut record)
    }

    /// Appends a violation and picks the escalation in the same critical
    /// section.
    ///
    /// `decide` receives the new count and whether the player was already
    /// banned. A `Banned` decision marks the record banned.
    pub fn record_violation(
        &self,
        player: PlayerId,
        now: Timestamp,
        wall_clock: SystemTime,
        violation: &Violation,
        decide: impl FnOnce(u32, bool) -> EscalationAction,
    ) -> RecordedViolation {
        let cap = self.history_cap;
        self.with_record(player, now, |record| {
            record.violation_count = record.violation_count.saturating_add(1);
            record.last_violation_at = Some(now);
            record.last_violation_wall = Some(wall_clock);
            record.violation_history.push_back(ViolationEntry {
                at: now,
                wall_clock,
                kind: violation.kind,
                description: violation.description.clone(),
            });
            while record.violation_history.len() > cap {
                record.violation_history.pop_front();
            }

            let action = decide(record.violation_count, record.banned);
            if action == EscalationAction::Banned {
                record.banned = true;
            }
            RecordedViolation {
                violation_count: record.violation_count,
                action,
            }
        })
    }

    /// Summary of one player, `None` if no record exists.
    #[must_use]
    pub fn player_summary(&self, player: PlayerId) -> Option<PlayerSummary> {
        let handle = self.records.read().get(&player).map(Arc::clone)?;
        let summary = handle.lock().summary();
        Some(summary)
    }

    /// Totals across all records.
    #[must_use]
    pub fn overall_summary(&self) -> OverallSummary {
        let records = self.records.read();
        OverallSummary {
            monitored_players: records.len(),
            total_violations: records
                .values()
                .map(|record| u64::from(record.lock().violation_count))
                .sum(),
        }
    }

    /// Drops a player's record entirely. Returns whether one existed.
    pub fn reset(&self, player: PlayerId) -> bool {
        self.records.write().remove(&player).is_some()
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    /// True when no player has a record.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
