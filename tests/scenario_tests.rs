//! End-to-end scenarios for the public debounce API, driven by the virtual
//! scheduler so nothing here sleeps on the wall clock.

use quiesce::{DebounceConfig, DebounceOptions, Debounced, Scheduler, VirtualScheduler, debounce};
use std::cell::RefCell;
use std::rc::Rc;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Deliver every timer due up to `until`, then settle the clock there.
fn drive<A, R, F>(
    d: &mut Debounced<A, R, F, VirtualScheduler>,
    sched: &VirtualScheduler,
    until: u64,
) where
    F: FnMut(A) -> R,
    R: Clone,
{
    while let Some(deadline) = sched.next_deadline() {
        if deadline > until {
            break;
        }
        sched.advance_to(deadline);
        for timer in sched.take_expired() {
            d.timer_fired(timer);
        }
    }
    sched.advance_to(until);
}

#[test]
fn autosave_style_burst_settles_once() {
    init_logging();
    let sched = VirtualScheduler::new();
    let saved: Rc<RefCell<Vec<String>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = {
        let saved = Rc::clone(&saved);
        move |doc: String| {
            saved.borrow_mut().push(doc.clone());
            doc.len()
        }
    };
    let mut save = debounce(sink, 100, sched.clone());

    save.call("d".to_string());
    sched.advance_to(50);
    save.call("dr".to_string());
    sched.advance_to(90);
    save.call("draft".to_string());
    drive(&mut save, &sched, 500);

    // Only the newest document is written, once the typing goes quiet.
    assert_eq!(*saved.borrow(), vec!["draft".to_string()]);
    assert_eq!(save.last_result(), Some(&5));
}

#[test]
fn leading_edge_fires_at_burst_start() {
    init_logging();
    let sched = VirtualScheduler::new();
    let count = Rc::new(RefCell::new(0u32));
    let bump = {
        let count = Rc::clone(&count);
        move |_: ()| {
            *count.borrow_mut() += 1;
            *count.borrow()
        }
    };
    let options = DebounceOptions::new().leading(true);
    let mut d = Debounced::new(bump, 100, options, sched.clone());

    assert_eq!(d.call(()), Some(1));
    drive(&mut d, &sched, 300);

    // Trailing is off by default when only leading is requested.
    assert_eq!(*count.borrow(), 1);
}

#[test]
fn max_wait_keeps_a_busy_stream_flowing() {
    init_logging();
    let sched = VirtualScheduler::new();
    let times: Rc<RefCell<Vec<u64>>> = Rc::new(RefCell::new(Vec::new()));
    let record = {
        let times = Rc::clone(&times);
        let sched = sched.clone();
        move |_: u32| times.borrow_mut().push(sched.now())
    };
    let options = DebounceOptions::new().max_wait(150);
    let mut d = Debounced::new(record, 100, options, sched.clone());

    // Calls every 40ms never pause for the 100ms quiet period.
    for t in (0..=400u64).step_by(40) {
        drive(&mut d, &sched, t);
        d.call(t as u32);
    }
    drive(&mut d, &sched, 800);

    let times = times.borrow();
    assert!(!times.is_empty());
    assert!(times[0] <= 150, "first invocation at {}ms", times[0]);
}

#[test]
fn cancel_then_flush_is_inert() {
    init_logging();
    let sched = VirtualScheduler::new();
    let count = Rc::new(RefCell::new(0u32));
    let bump = {
        let count = Rc::clone(&count);
        move |_: ()| *count.borrow_mut() += 1
    };
    let mut d = debounce(bump, 100, sched.clone());

    d.call(());
    sched.advance_to(50);
    d.cancel();
    assert_eq!(d.flush(), None);
    drive(&mut d, &sched, 500);

    assert_eq!(*count.borrow(), 0);
}

#[test]
fn config_driven_invoker() {
    init_logging();
    let sched = VirtualScheduler::new();
    let config = DebounceConfig::from_toml(
        r#"
wait_ms = 80
trailing = true
max_wait_ms = 200
"#,
    )
    .expect("valid config");

    let count = Rc::new(RefCell::new(0u32));
    let bump = {
        let count = Rc::clone(&count);
        move |_: ()| *count.borrow_mut() += 1
    };
    let mut d = Debounced::from_config(bump, &config, sched.clone());

    d.call(());
    sched.advance_to(40);
    d.call(());
    drive(&mut d, &sched, 400);

    assert_eq!(*count.borrow(), 1);
}

#[test]
fn malformed_config_is_rejected() {
    let err = DebounceConfig::from_toml("wait_ms = [1, 2]").unwrap_err();
    assert!(err.to_string().contains("invalid debounce argument"));
}
