use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use storefront_api::client::Debouncer;

#[tokio::test]
async fn rapid_submissions_collapse_to_one_dispatch() {
    let dispatched = Arc::new(AtomicUsize::new(0));
    let mut debouncer = Debouncer::new(Duration::from_millis(50));

    for _ in 0..3 {
        let dispatched = Arc::clone(&dispatched);
        debouncer.submit(async move {
            dispatched.fetch_add(1, Ordering::SeqCst);
        });
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(dispatched.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn quiet_periods_allow_each_dispatch() {
    let dispatched = Arc::new(AtomicUsize::new(0));
    let mut debouncer = Debouncer::new(Duration::from_millis(20));

    for _ in 0..2 {
        let dispatched = Arc::clone(&dispatched);
        debouncer.submit(async move {
            dispatched.fetch_add(1, Ordering::SeqCst);
        });
        tokio::time::sleep(Duration::from_millis(100)).await;
    }

    assert_eq!(dispatched.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn cancel_drops_the_pending_dispatch() {
    let dispatched = Arc::new(AtomicUsize::new(0));
    let mut debouncer = Debouncer::new(Duration::from_millis(20));

    {
        let dispatched = Arc::clone(&dispatched);
        debouncer.submit(async move {
            dispatched.fetch_add(1, Ordering::SeqCst);
        });
    }
    debouncer.cancel();

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(dispatched.load(Ordering::SeqCst), 0);
}
