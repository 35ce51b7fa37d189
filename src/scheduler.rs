//! Clock and one-shot timer abstraction for the debouncer.
//!
//! The debouncer never reads the wall clock directly. It talks to a
//! [`Scheduler`], which provides monotonic time in milliseconds and
//! cancelable one-shot timers. [`SteadyScheduler`] is backed by
//! `std::time::Instant` for real hosts; [`VirtualScheduler`] is a manually
//! advanced clock so tests run deterministically without sleeping.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;
use std::time::Instant;

/// Identifier of a scheduled one-shot timer.
pub type TimerId = u64;

/// Monotonic clock plus cancelable one-shot timers.
///
/// Implementations use interior mutability so the debouncer and its host can
/// share one scheduler handle on a single thread.
pub trait Scheduler {
    /// Current time in milliseconds since an arbitrary fixed epoch.
    fn now(&self) -> u64;

    /// Arm a one-shot timer that becomes due `delay_ms` from now.
    ///
    /// The timer does not fire on its own: the host drains due timers
    /// (see the concrete types) and reports them to the debouncer.
    fn schedule_after(&self, delay_ms: u64) -> TimerId;

    /// Disarm a previously scheduled timer. Unknown or already-drained ids
    /// are a no-op.
    fn cancel(&self, timer: TimerId);
}

#[derive(Debug)]
struct TimerTable {
    next_id: TimerId,
    /// Armed timers, id -> absolute due time in ms.
    pending: BTreeMap<TimerId, u64>,
}

impl TimerTable {
    fn new() -> Self {
        Self {
            next_id: 1,
            pending: BTreeMap::new(),
        }
    }

    fn arm(&mut self, due: u64) -> TimerId {
        let id = self.next_id;
        self.next_id += 1;
        self.pending.insert(id, due);
        id
    }

    fn next_deadline(&self) -> Option<u64> {
        self.pending.values().min().copied()
    }

    /// Remove and return all timers due at or before `now`, ordered by due
    /// time (ties broken by scheduling order).
    fn drain_due(&mut self, now: u64) -> Vec<TimerId> {
        let mut due: Vec<(u64, TimerId)> = self
            .pending
            .iter()
            .filter(|&(_, &deadline)| deadline <= now)
            .map(|(&id, &deadline)| (deadline, id))
            .collect();
        due.sort_unstable();
        for &(_, id) in &due {
            self.pending.remove(&id);
        }
        due.into_iter().map(|(_, id)| id).collect()
    }
}

/// Scheduler backed by `std::time::Instant`.
///
/// Time is measured from scheduler creation. A host event loop typically
/// sleeps until [`next_deadline`](Self::next_deadline), then drains
/// [`take_expired`](Self::take_expired) and reports each id to the
/// debouncer.
#[derive(Debug, Clone)]
pub struct SteadyScheduler {
    epoch: Instant,
    timers: Rc<RefCell<TimerTable>>,
}

impl SteadyScheduler {
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
            timers: Rc::new(RefCell::new(TimerTable::new())),
        }
    }

    /// Earliest due time among armed timers, in scheduler millis.
    pub fn next_deadline(&self) -> Option<u64> {
        self.timers.borrow().next_deadline()
    }

    /// Drain all timers due at or before the current time.
    pub fn take_expired(&self) -> Vec<TimerId> {
        let now = self.now();
        self.timers.borrow_mut().drain_due(now)
    }
}

impl Default for SteadyScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler for SteadyScheduler {
    fn now(&self) -> u64 {
        self.epoch.elapsed().as_millis() as u64
    }

    fn schedule_after(&self, delay_ms: u64) -> TimerId {
        let due = self.now().saturating_add(delay_ms);
        self.timers.borrow_mut().arm(due)
    }

    fn cancel(&self, timer: TimerId) {
        self.timers.borrow_mut().pending.remove(&timer);
    }
}

#[derive(Debug)]
struct VirtualState {
    now: u64,
    timers: TimerTable,
}

/// Simulated clock for deterministic tests.
///
/// Cloning yields a handle to the same underlying clock, so a test can keep
/// one handle to advance time while the debouncer holds another.
#[derive(Debug, Clone)]
pub struct VirtualScheduler {
    inner: Rc<RefCell<VirtualState>>,
}

impl VirtualScheduler {
    /// New scheduler with the clock at 0 ms.
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(VirtualState {
                now: 0,
                timers: TimerTable::new(),
            })),
        }
    }

    /// Advance the clock by `ms`.
    pub fn advance(&self, ms: u64) {
        let mut inner = self.inner.borrow_mut();
        inner.now = inner.now.saturating_add(ms);
    }

    /// Move the clock forward to `t`; a no-op if `t` is in the past.
    pub fn advance_to(&self, t: u64) {
        let mut inner = self.inner.borrow_mut();
        if t > inner.now {
            inner.now = t;
        }
    }

    /// Set the clock to an arbitrary time, including backwards.
    ///
    /// Real schedulers are monotonic; this exists to simulate clock skew.
    pub fn set_now(&self, t: u64) {
        self.inner.borrow_mut().now = t;
    }

    /// Earliest due time among armed timers.
    pub fn next_deadline(&self) -> Option<u64> {
        self.inner.borrow().timers.next_deadline()
    }

    /// Drain all timers due at or before the current time.
    pub fn take_expired(&self) -> Vec<TimerId> {
        let mut inner = self.inner.borrow_mut();
        let now = inner.now;
        inner.timers.drain_due(now)
    }

    /// Number of currently armed timers.
    pub fn pending_timers(&self) -> usize {
        self.inner.borrow().timers.pending.len()
    }
}

impl Default for VirtualScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler for VirtualScheduler {
    fn now(&self) -> u64 {
        self.inner.borrow().now
    }

    fn schedule_after(&self, delay_ms: u64) -> TimerId {
        let mut inner = self.inner.borrow_mut();
        let due = inner.now.saturating_add(delay_ms);
        inner.timers.arm(due)
    }

    fn cancel(&self, timer: TimerId) {
        self.inner.borrow_mut().timers.pending.remove(&timer);
    }
}

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod scheduler_tests;
