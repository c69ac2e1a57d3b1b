//! Freshness-gated snapshots.
//!
//! A [`Freshness`] slot holds the last value fetched for one view and the time
//! it was fetched. Reads through [`Freshness::fresh`] only succeed while the
//! snapshot is younger than the slot's window; afterwards the caller is
//! expected to go back to the network and [`Freshness::replace`] the value.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Mutex;
use std::time::Duration;

use chrono::{DateTime, Utc};

/// Source of "now" for staleness decisions.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

impl std::fmt::Debug for dyn Clock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Clock({})", self.now())
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    pub fn advance(&self, by: Duration) {
        if let Ok(mut now) = self.now.lock() {
            *now += chrono::Duration::from_std(by).unwrap_or(chrono::Duration::zero());
        }
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(Utc::now())
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        self.now.lock().map(|n| *n).unwrap_or_else(|_| Utc::now())
    }
}

/// Last snapshot of one view plus when it was taken.
#[derive(Debug, Clone)]
pub struct Freshness<T> {
    value: Option<T>,
    fetched_at: Option<DateTime<Utc>>,
    window: Duration,
}

impl<T> Freshness<T> {
    pub fn new(window: Duration) -> Self {
        Self {
            value: None,
            fetched_at: None,
            window,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn fetched_at(&self) -> Option<DateTime<Utc>> {
        self.fetched_at
    }

    /// Whether a snapshot exists and is younger than the window at `now`.
    ///
    /// A stamp in the future (clock moved backwards) counts as fresh.
    pub fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        let (Some(_), Some(at)) = (&self.value, self.fetched_at) else {
            return false;
        };
        match now.signed_duration_since(at).to_std() {
            Ok(age) => age < self.window,
            Err(_) => true,
        }
    }

    /// The snapshot, only if still fresh.
    pub fn fresh(&self, now: DateTime<Utc>) -> Option<&T> {
        if self.is_fresh(now) {
            self.value.as_ref()
        } else {
            None
        }
    }

    /// The snapshot regardless of age (what a view keeps showing while a
    /// refetch is in flight).
    pub fn get(&self) -> Option<&T> {
        self.value.as_ref()
    }

    /// Store a newly fetched value and stamp it.
    pub fn replace(&mut self, value: T, now: DateTime<Utc>) {
        self.value = Some(value);
        self.fetched_at = Some(now);
    }

    /// Force the next gated read to miss. The old value stays visible.
    pub fn invalidate(&mut self) {
        self.fetched_at = None;
    }

    /// Edit the snapshot in place without touching its stamp. Returns `None`
    /// when nothing has been fetched yet.
    pub fn patch<R>(&mut self, f: impl FnOnce(&mut T) -> R) -> Option<R> {
        self.value.as_mut().map(f)
    }
}

/// One [`Freshness`] slot per key, all sharing a window.
#[derive(Debug, Clone)]
pub struct Keyed<K, T> {
    window: Duration,
    slots: HashMap<K, Freshness<T>>,
}

impl<K: Eq + Hash, T> Keyed<K, T> {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            slots: HashMap::new(),
        }
    }

    pub fn fresh(&self, key: &K, now: DateTime<Utc>) -> Option<&T> {
        self.slots.get(key).and_then(|slot| slot.fresh(now))
    }

    pub fn get(&self, key: &K) -> Option<&T> {
        self.slots.get(key).and_then(Freshness::get)
    }

    /// The slot for `key`, created empty on first use.
    pub fn slot_mut(&mut self, key: K) -> &mut Freshness<T> {
        let window = self.window;
        self.slots.entry(key).or_insert_with(|| Freshness::new(window))
    }

    pub fn invalidate(&mut self, key: &K) {
        if let Some(slot) = self.slots.get_mut(key) {
            slot.invalidate();
        }
    }

    pub fn invalidate_all(&mut self) {
        self.slots.values_mut().for_each(Freshness::invalidate);
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
