//! Metrics sink boundary.
//!
//! Core logic MUST NOT depend on obs::metrics directly.
//! All instrumentation flows through MetricsEvent and MetricsSink.
use crate::obs::metrics;
use serde::Serialize;
use std::{cell::RefCell, rc::Rc};

thread_local! {
    static SINK_OVERRIDE: RefCell<Option<Rc<dyn MetricsSink>>> = RefCell::new(None);
}

///
/// CacheKeyspace
///

#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd, Serialize)]
pub enum CacheKeyspace {
    OwnerKey,
    RelationshipName,
}

///
/// FilterKind
///

#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd, Serialize)]
pub enum FilterKind {
    Relationship,
    CustomBinding,
    Binding,
    Category,
}

///
/// MetricsEvent
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MetricsEvent {
    CacheHit {
        keyspace: CacheKeyspace,
    },
    CacheMiss {
        keyspace: CacheKeyspace,
    },
    CacheEvicted {
        entries: u64,
    },
    IdentityResolved {
        requested: u64,
        resolved: u64,
    },
    LookupFailed,
    FilterApplied {
        kind: FilterKind,
    },
    FilterSkipped {
        kind: FilterKind,
    },
}

///
/// MetricsSink
///

pub trait MetricsSink {
    fn record(&self, event: MetricsEvent);
}

/// GlobalMetricsSink
/// Default sink that writes into the process-wide counters.
/// Acts as the concrete sink when no scoped override is installed.

pub(crate) struct GlobalMetricsSink;

impl MetricsSink for GlobalMetricsSink {
    fn record(&self, event: MetricsEvent) {
        metrics::with_state_mut(|m| match event {
            MetricsEvent::CacheHit { .. } => {
                m.ops.cache_hits = m.ops.cache_hits.saturating_add(1);
            }
            MetricsEvent::CacheMiss { .. } => {
                m.ops.cache_misses = m.ops.cache_misses.saturating_add(1);
            }
            MetricsEvent::CacheEvicted { entries } => {
                m.ops.cache_evictions = m.ops.cache_evictions.saturating_add(entries);
            }
            MetricsEvent::IdentityResolved {
                requested,
                resolved,
            } => {
                m.ops.identities_resolved = m.ops.identities_resolved.saturating_add(resolved);
                m.ops.identities_dropped = m
                    .ops
                    .identities_dropped
                    .saturating_add(requested.saturating_sub(resolved));
            }
            MetricsEvent::LookupFailed => {
                m.ops.lookup_failures = m.ops.lookup_failures.saturating_add(1);
            }
            MetricsEvent::FilterApplied { kind } => {
                let entry = m.filters.entry(kind).or_default();
                entry.applied = entry.applied.saturating_add(1);
            }
            MetricsEvent::FilterSkipped { kind } => {
                let entry = m.filters.entry(kind).or_default();
                entry.skipped = entry.skipped.saturating_add(1);
            }
        });
    }
}

pub(crate) fn record(event: MetricsEvent) {
    let override_sink = SINK_OVERRIDE.with(|cell| cell.borrow().clone());
    match override_sink {
        Some(sink) => sink.record(event),
        None => GlobalMetricsSink.record(event),
    }
}

/// Snapshot the current process-wide counters.
#[must_use]
pub fn metrics_report() -> metrics::EventReport {
    metrics::report()
}

/// Reset all process-wide counters.
pub fn metrics_reset_all() {
    metrics::reset_all();
}

/// Run a closure with a temporary, thread-scoped metrics sink override.
pub fn with_metrics_sink<T>(sink: Rc<dyn MetricsSink>, f: impl FnOnce() -> T) -> T {
    struct Guard(Option<Rc<dyn MetricsSink>>);

    impl Drop for Guard {
        fn drop(&mut self) {
            let previous = self.0.take();
            SINK_OVERRIDE.with(|cell| {
                *cell.borrow_mut() = previous;
            });
        }
    }

    let previous = SINK_OVERRIDE.with(|cell| cell.borrow_mut().replace(sink));
    let _guard = Guard(previous);

    f()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Default)]
    struct CaptureSink {
        events: RefCell<Vec<MetricsEvent>>,
    }

    impl MetricsSink for CaptureSink {
        fn record(&self, event: MetricsEvent) {
            self.events.borrow_mut().push(event);
        }
    }

    #[test]
    fn override_captures_events_and_restores() {
        let sink = Rc::new(CaptureSink::default());
        with_metrics_sink(sink.clone(), || {
            record(MetricsEvent::LookupFailed);
            record(MetricsEvent::FilterApplied {
                kind: FilterKind::Binding,
            });
        });

        assert_eq!(
            *sink.events.borrow(),
            vec![
                MetricsEvent::LookupFailed,
                MetricsEvent::FilterApplied {
                    kind: FilterKind::Binding
                },
            ]
        );
        assert!(SINK_OVERRIDE.with(|cell| cell.borrow().is_none()));
    }

    #[test]
    fn nested_overrides_restore_outer_sink() {
        let outer = Rc::new(CaptureSink::default());
        let inner = Rc::new(CaptureSink::default());

        with_metrics_sink(outer.clone(), || {
            with_metrics_sink(inner.clone(), || record(MetricsEvent::LookupFailed));
            record(MetricsEvent::CacheEvicted { entries: 2 });
        });

        assert_eq!(inner.events.borrow().len(), 1);
        assert_eq!(
            *outer.events.borrow(),
            vec![MetricsEvent::CacheEvicted { entries: 2 }]
        );
    }
}
