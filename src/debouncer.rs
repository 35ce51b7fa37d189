//! Debounced invoker.
//!
//! Wraps a callable so that bursts of calls collapse into at most one (or
//! two, with leading + trailing edges) actual invocations. An optional
//! `max_wait` puts a ceiling on how long a continuous burst can suppress
//! the wrapped function.

use std::fmt;

use crate::scheduler::{Scheduler, TimerId};

/// Edge and ceiling configuration for a [`Debounced`] invoker.
///
/// `trailing` is tri-state on purpose: when left unset it defaults to
/// `true`, except that setting `leading` alone switches the default to
/// `false` (a leading-only debouncer fires once per burst).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DebounceOptions {
    pub leading: bool,
    pub trailing: Option<bool>,
    /// Upper bound in ms between the first suppressed call and a forced
    /// invocation. Clamped to at least the wait window at construction.
    pub max_wait: Option<u64>,
}

impl DebounceOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn leading(mut self, leading: bool) -> Self {
        self.leading = leading;
        self
    }

    pub fn trailing(mut self, trailing: bool) -> Self {
        self.trailing = Some(trailing);
        self
    }

    pub fn max_wait(mut self, max_wait_ms: u64) -> Self {
        self.max_wait = Some(max_wait_ms);
        self
    }
}

/// A debounced wrapper around `func`.
///
/// All state is owned by this value and mutated in place; nothing is shared
/// between instances. The host drives time: when a timer armed through the
/// scheduler becomes due, the host must report it via
/// [`timer_fired`](Self::timer_fired).
///
/// At most one timer is armed per instance at any time.
pub struct Debounced<A, R, F, S>
where
    F: FnMut(A) -> R,
    R: Clone,
    S: Scheduler,
{
    func: F,
    scheduler: S,
    wait: u64,
    leading: bool,
    trailing: bool,
    max_wait: Option<u64>,
    /// Most recent call's argument; cleared when consumed by an invocation.
    pending_args: Option<A>,
    /// Time of the most recent call request; `None` before the first call.
    last_call_time: Option<u64>,
    /// Time the wrapped function last actually ran; 0 means never.
    last_invoke_time: u64,
    timer: Option<TimerId>,
    /// Result of the most recent actual invocation, reported by call paths
    /// that do not invoke.
    last_result: Option<R>,
}

/// Debounce `func` over a `wait_ms` quiet period with default options
/// (trailing edge only).
pub fn debounce<A, R, F, S>(func: F, wait_ms: u64, scheduler: S) -> Debounced<A, R, F, S>
where
    F: FnMut(A) -> R,
    R: Clone,
    S: Scheduler,
{
    Debounced::new(func, wait_ms, DebounceOptions::new(), scheduler)
}

impl<A, R, F, S> Debounced<A, R, F, S>
where
    F: FnMut(A) -> R,
    R: Clone,
    S: Scheduler,
{
    pub fn new(func: F, wait_ms: u64, options: DebounceOptions, scheduler: S) -> Self {
        let max_wait = options.max_wait.map(|m| m.max(wait_ms));
        Self {
            func,
            scheduler,
            wait: wait_ms,
            leading: options.leading,
            trailing: options.trailing.unwrap_or(!options.leading),
            max_wait,
            pending_args: None,
            last_call_time: None,
            last_invoke_time: 0,
            timer: None,
            last_result: None,
        }
    }

    /// Construct from a [`DebounceConfig`](crate::config::DebounceConfig),
    /// normalizing its windows.
    pub fn from_config(func: F, config: &crate::config::DebounceConfig, scheduler: S) -> Self {
        Self::new(func, config.wait(), config.options(), scheduler)
    }

    /// Request an invocation with `args`.
    ///
    /// The arguments of the newest call always win; earlier pending
    /// arguments from the same burst are overwritten. Returns the result of
    /// an invocation performed by this call, or the last known result when
    /// the invocation is deferred (`None` until the function first runs).
    pub fn call(&mut self, args: A) -> Option<R> {
        let now = self.scheduler.now();
        let is_invoking = self.should_invoke(now);

        self.pending_args = Some(args);
        self.last_call_time = Some(now);

        if is_invoking {
            if self.timer.is_none() {
                return self.leading_edge(now);
            }
            if self.max_wait.is_some() {
                // Burst hit the max-wait ceiling: restart the quiet-period
                // timer for a full wait window and fire immediately.
                log::debug!("max_wait reached at {now}ms, forcing invocation");
                self.disarm_timer();
                self.timer = Some(self.scheduler.schedule_after(self.wait));
                if let Some(args) = self.pending_args.take() {
                    return self.invoke(now, args);
                }
                return self.last_result.clone();
            }
        }
        if self.timer.is_none() {
            self.timer = Some(self.scheduler.schedule_after(self.wait));
        }
        self.last_result.clone()
    }

    /// Report that a scheduled timer became due.
    ///
    /// A stale id (anything other than the currently armed timer, e.g. one
    /// drained by the host just before a `cancel`) is a no-op, so a
    /// fired-but-cancelled timer can never invoke the wrapped function.
    pub fn timer_fired(&mut self, timer: TimerId) -> Option<R> {
        if self.timer != Some(timer) {
            log::trace!("ignoring stale timer {timer}");
            return self.last_result.clone();
        }
        let now = self.scheduler.now();
        if self.should_invoke(now) {
            return self.trailing_edge(now);
        }
        // Quiet period not yet satisfied: re-arm for the remainder.
        let remaining = self.remaining_wait(now);
        log::trace!("quiet period not met at {now}ms, re-arming for {remaining}ms");
        self.timer = Some(self.scheduler.schedule_after(remaining));
        self.last_result.clone()
    }

    /// Drop any pending burst without invoking.
    pub fn cancel(&mut self) {
        log::trace!("cancel: clearing pending state");
        self.disarm_timer();
        self.last_invoke_time = 0;
        self.last_call_time = None;
        self.pending_args = None;
    }

    /// Settle a pending burst immediately, as if its timer had elapsed now.
    ///
    /// With nothing pending this returns the last known result without
    /// invoking.
    pub fn flush(&mut self) -> Option<R> {
        if self.timer.is_none() {
            return self.last_result.clone();
        }
        let now = self.scheduler.now();
        self.trailing_edge(now)
    }

    /// Whether a burst is pending settlement (a timer is armed).
    pub fn is_pending(&self) -> bool {
        self.timer.is_some()
    }

    /// Result of the most recent actual invocation, if any.
    pub fn last_result(&self) -> Option<&R> {
        self.last_result.as_ref()
    }

    /// The quiet-period window in milliseconds.
    pub fn wait(&self) -> u64 {
        self.wait
    }

    fn should_invoke(&self, now: u64) -> bool {
        let Some(last_call) = self.last_call_time else {
            return true;
        };
        if now < last_call {
            // Clock went backwards; treat as a fresh burst.
            return true;
        }
        if now - last_call >= self.wait {
            return true;
        }
        match self.max_wait {
            Some(max) => now.saturating_sub(self.last_invoke_time) >= max,
            None => false,
        }
    }

    /// Start of a new burst: arm the quiet-period timer and, with `leading`
    /// enabled, invoke immediately.
    fn leading_edge(&mut self, now: u64) -> Option<R> {
        self.last_invoke_time = now;
        self.timer = Some(self.scheduler.schedule_after(self.wait));
        if self.leading {
            if let Some(args) = self.pending_args.take() {
                log::trace!("leading edge at {now}ms, invoking");
                return self.invoke(now, args);
            }
        }
        self.last_result.clone()
    }

    /// Settle the burst: invoke with pending args if the trailing edge is
    /// enabled, otherwise just discard them.
    fn trailing_edge(&mut self, now: u64) -> Option<R> {
        self.disarm_timer();
        if self.trailing {
            if let Some(args) = self.pending_args.take() {
                log::trace!("trailing edge at {now}ms, invoking");
                return self.invoke(now, args);
            }
        }
        self.pending_args = None;
        self.last_result.clone()
    }

    /// Run the wrapped function. Callers hand over the pending args, so an
    /// invocation always consumes them.
    fn invoke(&mut self, now: u64, args: A) -> Option<R> {
        self.last_invoke_time = now;
        let result = (self.func)(args);
        self.last_result = Some(result);
        self.last_result.clone()
    }

    /// How long the armed timer should still wait: the rest of the quiet
    /// period, capped by the remaining max-wait budget when one is set.
    fn remaining_wait(&self, now: u64) -> u64 {
        let last_call = self.last_call_time.unwrap_or(now);
        let since_call = now.saturating_sub(last_call);
        let time_waiting = self.wait.saturating_sub(since_call);
        match self.max_wait {
            Some(max) => {
                let max_remaining = max.saturating_sub(now.saturating_sub(self.last_invoke_time));
                time_waiting.min(max_remaining)
            }
            None => time_waiting,
        }
    }

    fn disarm_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            self.scheduler.cancel(timer);
        }
    }
}

impl<A, R, F, S> fmt::Debug for Debounced<A, R, F, S>
where
    F: FnMut(A) -> R,
    R: Clone,
    S: Scheduler,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Debounced")
            .field("wait", &self.wait)
            .field("leading", &self.leading)
            .field("trailing", &self.trailing)
            .field("max_wait", &self.max_wait)
            .field("pending", &self.pending_args.is_some())
            .field("timer", &self.timer)
            .field("last_call_time", &self.last_call_time)
            .field("last_invoke_time", &self.last_invoke_time)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "debouncer_tests.rs"]
mod debouncer_tests;
