//! Tracking event tests
//!
//! Diagnostics emitted through `tracing` by entity-level operations.
//! Run with: cargo test --test tracking_events_tests

use memotrack::{ChangeTracking, tracked_struct};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::span::{Attributes, Id, Record};
use tracing::{Event, Metadata, Subscriber};

tracked_struct! {
    pub struct Ticket {
        status: String,
    }
}

struct EventCounter {
    events: Arc<AtomicUsize>,
}

impl Subscriber for EventCounter {
    fn enabled(&self, _metadata: &Metadata<'_>) -> bool {
        true
    }

    fn new_span(&self, _span: &Attributes<'_>) -> Id {
        Id::from_u64(1)
    }

    fn record(&self, _span: &Id, _values: &Record<'_>) {}

    fn record_follows_from(&self, _span: &Id, _follows: &Id) {}

    fn event(&self, _event: &Event<'_>) {
        self.events.fetch_add(1, Ordering::SeqCst);
    }

    fn enter(&self, _span: &Id) {}

    fn exit(&self, _span: &Id) {}
}

#[test]
fn test_accept_logs_only_when_tracker_is_enabled() {
    let events = Arc::new(AtomicUsize::new(0));
    let counter = EventCounter {
        events: Arc::clone(&events),
    };

    let mut ticket = Ticket::new("open".to_string());
    ticket.track();
    ticket.set_status("closed".to_string());

    tracing::subscriber::with_default(counter, || {
        ticket.tracker_or_create().enable(false);
        ticket.accept_changes();
        assert_eq!(events.load(Ordering::SeqCst), 0);
        assert!(ticket.has_changed("status"));

        ticket.tracker_or_create().enable(true);
        ticket.accept_changes();
        assert_eq!(events.load(Ordering::SeqCst), 1);
        assert!(!ticket.has_changed("status"));
    });
}
