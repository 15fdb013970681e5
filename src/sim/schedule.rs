//! Deferred effects
//!
//! Timed effects (hit-flash revert, death removal, UI flashes) are queued
//! against a frame number and drained once per step. Each key holds at most
//! one pending entry: scheduling again overwrites the old due frame.

use std::collections::BTreeMap;

use super::state::EnemyId;

/// Identity of a pending effect
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TimerKey {
    /// Enemy body color returns to normal
    HitFlash(EnemyId),
    /// Dead enemy leaves the registry
    Removal(EnemyId),
    /// Crosshair hit marker clears
    HitMarker,
    /// Player health bar flash clears
    HurtFlash,
}

#[derive(Debug, Clone, Copy)]
struct Pending {
    due: u64,
    seq: u64,
}

/// Keyed, latest-wins timer queue
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    pending: BTreeMap<TimerKey, Pending>,
    seq: u64,
}

impl Scheduler {
    /// Schedule `key` to fire at frame `now + delay`, replacing any pending entry
    pub fn schedule(&mut self, key: TimerKey, now: u64, delay: u64) {
        self.seq += 1;
        self.pending.insert(
            key,
            Pending {
                due: now + delay,
                seq: self.seq,
            },
        );
    }

    pub fn cancel(&mut self, key: TimerKey) -> bool {
        self.pending.remove(&key).is_some()
    }

    pub fn is_pending(&self, key: TimerKey) -> bool {
        self.pending.contains_key(&key)
    }

    /// Remove and return every entry due at or before `now`, oldest due first
    pub fn poll(&mut self, now: u64) -> Vec<TimerKey> {
        let mut due: Vec<(TimerKey, Pending)> = self
            .pending
            .iter()
            .filter(|(_, p)| p.due <= now)
            .map(|(k, p)| (*k, *p))
            .collect();
        due.sort_by_key(|(_, p)| (p.due, p.seq));
        for (key, _) in &due {
            self.pending.remove(key);
        }
        due.into_iter().map(|(key, _)| key).collect()
    }

    /// Fraction of `duration` still remaining for `key` (0 when not pending)
    pub fn remaining_fraction(&self, key: TimerKey, now: u64, duration: u64) -> f32 {
        match self.pending.get(&key) {
            Some(p) if duration > 0 => {
                (p.due.saturating_sub(now) as f32 / duration as f32).clamp(0.0, 1.0)
            }
            _ => 0.0,
        }
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_poll_fires_in_due_order() {
        let mut s = Scheduler::default();
        s.schedule(TimerKey::Removal(EnemyId(2)), 0, 10);
        s.schedule(TimerKey::Removal(EnemyId(1)), 0, 5);
        s.schedule(TimerKey::HitMarker, 0, 20);

        assert!(s.poll(4).is_empty());
        assert_eq!(s.poll(10), vec![TimerKey::Removal(EnemyId(1)), TimerKey::Removal(EnemyId(2))]);
        assert_eq!(s.len(), 1);
        assert_eq!(s.poll(100), vec![TimerKey::HitMarker]);
        assert!(s.is_empty());
    }

    #[test]
    fn test_reschedule_overwrites() {
        let mut s = Scheduler::default();
        s.schedule(TimerKey::HitMarker, 0, 9);
        s.schedule(TimerKey::HitMarker, 5, 9);
        assert_eq!(s.len(), 1);
        // The first deadline no longer fires
        assert!(s.poll(9).is_empty());
        assert_eq!(s.poll(14), vec![TimerKey::HitMarker]);
    }

    #[test]
    fn test_same_frame_keeps_schedule_order() {
        let mut s = Scheduler::default();
        s.schedule(TimerKey::HurtFlash, 0, 3);
        s.schedule(TimerKey::HitFlash(EnemyId(0)), 0, 3);
        assert_eq!(s.poll(3), vec![TimerKey::HurtFlash, TimerKey::HitFlash(EnemyId(0))]);
    }

    #[test]
    fn test_remaining_fraction() {
        let mut s = Scheduler::default();
        s.schedule(TimerKey::HurtFlash, 0, 10);
        assert!((s.remaining_fraction(TimerKey::HurtFlash, 5, 10) - 0.5).abs() < 1e-6);
        assert_eq!(s.remaining_fraction(TimerKey::HitMarker, 5, 10), 0.0);
        assert!(s.cancel(TimerKey::HurtFlash));
        assert_eq!(s.remaining_fraction(TimerKey::HurtFlash, 5, 10), 0.0);
    }
}
