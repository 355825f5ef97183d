//! Runs as its own binary, the panic hook is process wide.

use std::{
    panic,
    sync::atomic::{AtomicUsize, Ordering},
    thread,
};

use pretty_assertions::assert_eq;
use quickdemo::target::{Args, Returned, Target};

static REPORTED: AtomicUsize = AtomicUsize::new(0);

#[test]
fn concurrent_target_panics_keep_the_installed_hook() {
    panic::set_hook(Box::new(|_| {
        REPORTED.fetch_add(1, Ordering::SeqCst);
    }));

    let workers: Vec<_> = (0..8)
        .map(|worker| {
            thread::spawn(move || {
                let target = Target::new("boom", move |_| -> Returned { panic!("worker {worker}") });
                (0..500)
                    .filter(|_| target.call(Args::default()).is_err())
                    .count()
            })
        })
        .collect();
    let raised: usize = workers.into_iter().map(|worker| worker.join().unwrap()).sum();

    assert_eq!(raised, 8 * 500);
    assert_eq!(REPORTED.load(Ordering::SeqCst), 0);

    let outside = panic::catch_unwind(|| panic!("outside a target call"));
    assert!(outside.is_err());
    assert_eq!(REPORTED.load(Ordering::SeqCst), 1);
}
