use crate::obs::sink::FilterKind;
use parking_lot::Mutex;
use serde::Serialize;
use std::collections::BTreeMap;

///
/// EventState
/// Process-wide, in-memory counters for cache and filter activity.
///

#[derive(Clone, Debug, Default, Serialize)]
pub(crate) struct EventState {
    pub(crate) ops: EventOps,
    pub(crate) filters: BTreeMap<FilterKind, FilterCounters>,
}

///
/// EventOps
///

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct EventOps {
    // Cache
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub cache_evictions: u64,

    // Identity resolution
    pub identities_resolved: u64,
    pub identities_dropped: u64,
    pub lookup_failures: u64,
}

///
/// FilterCounters
///

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct FilterCounters {
    pub applied: u64,
    pub skipped: u64,
}

///
/// EventReport
/// Point-in-time copy of the counters.
///

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct EventReport {
    pub ops: EventOps,
    pub filters: BTreeMap<FilterKind, FilterCounters>,
}

static STATE: Mutex<Option<EventState>> = Mutex::new(None);

pub(crate) fn with_state_mut<R>(f: impl FnOnce(&mut EventState) -> R) -> R {
    let mut guard = STATE.lock();
    f(guard.get_or_insert_with(EventState::default))
}

pub(crate) fn report() -> EventReport {
    let guard = STATE.lock();
    guard
        .as_ref()
        .map(|state| EventReport {
            ops: state.ops.clone(),
            filters: state.filters.clone(),
        })
        .unwrap_or_default()
}

pub(crate) fn reset_all() {
    *STATE.lock() = None;
}
