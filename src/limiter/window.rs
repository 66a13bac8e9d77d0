//! Sliding Window Limiter
//!
//! Bounds how many events each entity may register within a trailing window.
//! The admissible window at time `now` is the half-open interval
//! `(now - window, now]`: a timestamp exactly `window` old is expired.

use std::borrow::Borrow;
use std::collections::VecDeque;
use std::hash::Hash;
use std::time::Duration;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tracing::warn;

use crate::error::{GuardError, Result};

// == Sliding Window Limiter ==
/// Per-entity sliding-window admission controller.
///
/// Each entity keeps the timestamps of its admitted events, oldest first.
/// Histories are pruned lazily on every operation for that entity and dropped
/// once empty, so memory tracks active entities only.
///
/// Entities are sharded across a `DashMap`: an admission holds the shard lock
/// for its entity while it prunes, checks and appends, and entities in other
/// shards never contend.
#[derive(Debug)]
pub struct SlidingWindowLimiter<K = String>
where
    K: Eq + Hash,
{
    window: Duration,
    max_events: usize,
    histories: DashMap<K, VecDeque<Duration>>,
}

impl<K> SlidingWindowLimiter<K>
where
    K: Eq + Hash,
{
    // == Constructor ==
    /// Creates a limiter admitting `max_events` per entity per `window`.
    ///
    /// `max_events == 0` is valid and denies every admission.
    ///
    /// # Errors
    /// `GuardError::InvalidConfig` if `window` is zero.
    pub fn new(window: Duration, max_events: usize) -> Result<Self> {
        if window.is_zero() {
            return Err(GuardError::InvalidConfig(
                "sliding window must be longer than zero".to_string(),
            ));
        }

        Ok(Self {
            window,
            max_events,
            histories: DashMap::new(),
        })
    }

    // == Status ==
    /// Snapshot of `entity`'s window at `now`, taken under a single prune.
    ///
    /// Never records an event.
    pub fn status<Q>(&self, entity: &Q, now: Duration) -> WindowStatus
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let pruned = self.prune_entity(entity, now);
        self.status_of(pruned, now)
    }

    // == Can Admit ==
    /// Returns true if `entity` could be admitted at `now`.
    ///
    /// Prunes the entity's history but never records an event.
    pub fn can_admit<Q>(&self, entity: &Q, now: Duration) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.status(entity, now).can_admit()
    }

    // == Try Admit ==
    /// Admits and records an event for `entity` at `now` if it fits the window.
    ///
    /// The prune, check and append happen under the entity's shard lock, so
    /// concurrent callers for the same entity never exceed the limit together.
    pub fn try_admit<Q>(&self, entity: &Q, now: Duration) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ToOwned<Owned = K> + ?Sized,
    {
        self.try_admit_with_status(entity, now).0
    }

    /// Like `try_admit`, also returning the window as it stands right after
    /// the decision, read under the same lock.
    pub fn try_admit_with_status<Q>(&self, entity: &Q, now: Duration) -> (bool, WindowStatus)
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ToOwned<Owned = K> + ?Sized,
    {
        if let Some(mut history) = self.histories.get_mut(entity) {
            return self.admit_into(&mut history, now);
        }

        match self.histories.entry(entity.to_owned()) {
            Entry::Occupied(mut occupied) => self.admit_into(occupied.get_mut(), now),
            Entry::Vacant(vacant) => {
                if self.max_events == 0 {
                    return (false, self.status_of(None, now));
                }
                vacant.insert(VecDeque::from([now]));
                (true, self.status_of(Some((1, now)), now))
            }
        }
    }

    // == Time Until Next Allowed ==
    /// How long `entity` must wait after `now` before an admission can succeed.
    ///
    /// Zero if it can be admitted now. With `max_events == 0` nothing is ever
    /// admitted and `Duration::MAX` is returned.
    pub fn time_until_next_allowed<Q>(&self, entity: &Q, now: Duration) -> Duration
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.status(entity, now).retry_after
    }

    // == Remaining ==
    /// Admissions still available to `entity` in the window ending at `now`.
    pub fn remaining<Q>(&self, entity: &Q, now: Duration) -> usize
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.status(entity, now).remaining
    }

    // == Sweep ==
    /// Prunes every history and drops the ones left empty.
    ///
    /// Returns the number of dropped entities.
    pub fn sweep(&self, now: Duration) -> usize {
        let mut dropped = 0;
        self.histories.retain(|_, history| {
            prune(history, now, self.window);
            if history.is_empty() {
                dropped += 1;
                false
            } else {
                true
            }
        });
        dropped
    }

    /// Number of entities with a retained history.
    pub fn active_entities(&self) -> usize {
        self.histories.len()
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn max_events(&self) -> usize {
        self.max_events
    }

    /// Prunes `entity` at `now`, dropping it if empty.
    ///
    /// Returns the history length and oldest timestamp if anything remains.
    fn prune_entity<Q>(&self, entity: &Q, now: Duration) -> Option<(usize, Duration)>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let mut remaining = None;
        self.histories.remove_if_mut(entity, |_, history| {
            prune(history, now, self.window);
            remaining = history.front().map(|oldest| (history.len(), *oldest));
            history.is_empty()
        });
        remaining
    }

    /// Builds a status from a pruned history's length and oldest timestamp.
    fn status_of(&self, pruned: Option<(usize, Duration)>, now: Duration) -> WindowStatus {
        let used = pruned.map_or(0, |(len, _)| len);
        let retry_after = match pruned {
            _ if self.max_events == 0 => Duration::MAX,
            Some((len, oldest)) if len >= self.max_events => {
                oldest.saturating_add(self.window).saturating_sub(now)
            }
            _ => Duration::ZERO,
        };

        WindowStatus {
            used,
            remaining: self.max_events.saturating_sub(used),
            retry_after,
        }
    }

    fn admit_into(
        &self,
        history: &mut VecDeque<Duration>,
        now: Duration,
    ) -> (bool, WindowStatus) {
        prune(history, now, self.window);
        if history.len() >= self.max_events {
            let pruned = history.front().map(|oldest| (history.len(), *oldest));
            return (false, self.status_of(pruned, now));
        }

        // Keep the history sorted if the caller's clock went backwards
        let stamp = match history.back() {
            Some(&last) if last > now => {
                warn!(?now, ?last, "admission timestamp older than history, clamping");
                last
            }
            _ => now,
        };
        history.push_back(stamp);
        let pruned = history.front().map(|oldest| (history.len(), *oldest));
        (true, self.status_of(pruned, now))
    }
}

// == Window Status ==
/// Point-in-time view of one entity's window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowStatus {
    /// Events retained in the window
    pub used: usize,
    /// Admissions still available
    pub remaining: usize,
    /// Wait before the next admission can succeed, zero if one can now
    pub retry_after: Duration,
}

impl WindowStatus {
    pub fn can_admit(&self) -> bool {
        self.remaining > 0
    }
}

/// Drops timestamps at or before `now - window` from the front.
fn prune(history: &mut VecDeque<Duration>, now: Duration, window: Duration) {
    while let Some(&oldest) = history.front() {
        if oldest.saturating_add(window) > now {
            break;
        }
        history.pop_front();
    }
}
