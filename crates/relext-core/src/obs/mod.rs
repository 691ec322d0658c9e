//! Observability: runtime counters and sink abstractions.
//!
//! Filter and cache code never touches counters directly; every
//! instrumentation point emits a [`MetricsEvent`] through `sink::record`.

pub(crate) mod metrics;
pub(crate) mod sink;

// re-exports
pub use metrics::{EventOps, EventReport, FilterCounters};
pub use sink::{
    CacheKeyspace, FilterKind, MetricsEvent, MetricsSink, metrics_report, metrics_reset_all,
    with_metrics_sink,
};
