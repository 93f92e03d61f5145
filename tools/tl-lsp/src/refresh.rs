//! Per-document throttling of compiler runs.
//!
//! A request while idle starts a run at once. Requests arriving while a run
//! is in flight collapse into a single follow-up, started when the run ends
//! and no sooner than one interval after the previous start.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tokio::time::Instant;
use tower_lsp::lsp_types::Url;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RefreshState {
    Idle,
    Running,
    RunningWithPendingRerun,
}

impl RefreshState {
    /// A refresh was asked for. Returns whether a run starts now.
    #[must_use]
    pub fn request(&mut self) -> bool {
        match self {
            RefreshState::Idle => {
                *self = RefreshState::Running;
                true
            }
            RefreshState::Running => {
                *self = RefreshState::RunningWithPendingRerun;
                false
            }
            RefreshState::RunningWithPendingRerun => false,
        }
    }

    /// The current run finished. Returns whether a follow-up starts.
    #[must_use]
    pub fn complete(&mut self) -> bool {
        match self {
            RefreshState::RunningWithPendingRerun => {
                *self = RefreshState::Running;
                true
            }
            RefreshState::Running | RefreshState::Idle => {
                *self = RefreshState::Idle;
                false
            }
        }
    }
}

/// The work a refresh performs.
pub trait Refresh: Send + Sync + 'static {
    fn refresh(&self, uri: Url) -> impl Future<Output = ()> + Send;

    /// Minimum time between the starts of two runs for one document.
    fn interval(&self) -> Duration;
}

/// Per-document entry. A document closed while its run is in flight keeps
/// its slot, marked `closed`, until that run ends.
#[derive(Copy, Clone, Debug)]
struct Slot {
    state: RefreshState,
    closed: bool,
}

type Slots = DashMap<Url, Slot>;

/// Starts refreshes and owns the per-document state.
///
/// At most one task drives a given document at a time: it alone moves the
/// slot out of `Running`.
pub struct Scheduler<R> {
    runner: Arc<R>,
    slots: Arc<Slots>,
}

impl<R: Refresh> Scheduler<R> {
    pub fn new(runner: R) -> Self {
        Scheduler {
            runner: Arc::new(runner),
            slots: Arc::new(DashMap::new()),
        }
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// State of an open document; `None` once it was removed.
    pub fn state(&self, uri: &Url) -> Option<RefreshState> {
        self.slots
            .get(uri)
            .filter(|slot| !slot.closed)
            .map(|slot| slot.state)
    }

    /// Ask for `uri` to be refreshed.
    ///
    /// When the document was closed and reopened while a run was still in
    /// flight, the request waits for that run and is served as its follow-up.
    pub fn request(&self, uri: Url) {
        let start = {
            let mut slot = self.slots.entry(uri.clone()).or_insert(Slot {
                state: RefreshState::Idle,
                closed: false,
            });
            slot.closed = false;
            slot.state.request()
        };
        if start {
            tokio::spawn(drive(Arc::clone(&self.runner), Arc::clone(&self.slots), uri));
        } else {
            tracing::trace!(%uri, "refresh coalesced");
        }
    }

    /// Forget `uri`. A run in flight finishes but schedules nothing more.
    pub fn remove(&self, uri: &Url) {
        if let Entry::Occupied(mut slot) = self.slots.entry(uri.clone()) {
            if slot.get().state == RefreshState::Idle {
                slot.remove();
            } else {
                *slot.get_mut() = Slot {
                    state: RefreshState::Running,
                    closed: true,
                };
            }
        }
    }
}

/// Run refreshes for `uri` until no follow-up is pending.
async fn drive<R: Refresh>(runner: Arc<R>, slots: Arc<Slots>, uri: Url) {
    loop {
        let started = Instant::now();
        runner.refresh(uri.clone()).await;
        tokio::time::sleep_until(started + runner.interval()).await;

        let again = match slots.entry(uri.clone()) {
            Entry::Occupied(slot) if slot.get().closed => {
                slot.remove();
                false
            }
            Entry::Occupied(mut slot) => slot.get_mut().state.complete(),
            Entry::Vacant(_) => false,
        };
        if !again {
            break;
        }
        tracing::trace!(%uri, "running pending refresh");
    }
}
