//! quiesce - debounced invocation primitive
//!
//! Wraps a callable so that repeated calls within a quiet period collapse
//! into at most one (or two, with leading + trailing edges) actual
//! invocations, with an optional `max_wait` ceiling that forces an
//! invocation during a continuous burst.
//!
//! Time is abstracted behind [`Scheduler`], so the debouncer can run
//! against the wall clock ([`SteadyScheduler`]) or a simulated one
//! ([`VirtualScheduler`]) in tests.
//!
//! ```
//! use quiesce::{debounce, VirtualScheduler};
//!
//! let clock = VirtualScheduler::new();
//! let mut saves = debounce(|name: &str| format!("saved {name}"), 100, clock.clone());
//!
//! saves.call("draft-1");
//! saves.call("draft-2"); // overwrites draft-1 within the quiet period
//!
//! clock.advance(100);
//! for timer in clock.take_expired() {
//!     saves.timer_fired(timer);
//! }
//! assert_eq!(saves.last_result(), Some(&"saved draft-2".to_string()));
//! ```

pub mod config;
pub mod debouncer;
pub mod error;
pub mod scheduler;

// Re-export commonly used types for convenience
pub use config::DebounceConfig;
pub use debouncer::{DebounceOptions, Debounced, debounce};
pub use error::DebounceError;
pub use scheduler::{Scheduler, SteadyScheduler, TimerId, VirtualScheduler};
