//! Optimistic Toggle
//!
//! Per-line "fulfilled" flag. The visible value flips as soon as the user
//! acts; a confirmation request follows. Requests are numbered so that
//! completions arriving out of order resolve deterministically:
//!
//! - a success is recorded as the confirmed value only if it is newer than
//!   the last recorded success
//! - once nothing is in flight, the visible value snaps to the confirmed one,
//!   which rolls back a failed toggle

use tokio::sync::watch;

use crate::http::{HttpClient, NetworkHttpClient};
use crate::{ClientResult, PosApi};

/// Toggle lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TogglePhase {
    /// No toggle issued yet
    #[default]
    Idle,
    /// At least one confirmation in flight
    Pending,
    /// Last toggle confirmed by the backend
    Confirmed,
    /// Last toggle rejected, visible value rolled back
    Failed,
}

/// Observable state of one order line's flag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleState {
    phase: TogglePhase,
    visible: bool,
    confirmed: bool,
    in_flight: usize,
    issued: u64,
    confirmed_seq: u64,
    latest_failed: bool,
}

impl ToggleState {
    fn new(persisted: bool) -> Self {
        Self {
            phase: TogglePhase::Idle,
            visible: persisted,
            confirmed: persisted,
            in_flight: 0,
            issued: 0,
            confirmed_seq: 0,
            latest_failed: false,
        }
    }

    pub fn phase(&self) -> TogglePhase {
        self.phase
    }

    /// Value the checkbox should show
    pub fn visible(&self) -> bool {
        self.visible
    }

    /// Last value the backend is known to hold
    pub fn confirmed(&self) -> bool {
        self.confirmed
    }

    /// Busy indicator
    pub fn is_busy(&self) -> bool {
        self.in_flight > 0
    }

    fn settle(&mut self, seq: u64, value: bool, ok: bool) {
        self.in_flight = self.in_flight.saturating_sub(1);
        if ok && seq > self.confirmed_seq {
            self.confirmed_seq = seq;
            self.confirmed = value;
        }
        if seq == self.issued {
            self.latest_failed = !ok;
        }

        if self.in_flight > 0 {
            self.phase = TogglePhase::Pending;
            return;
        }
        self.visible = self.confirmed;
        self.phase = if self.latest_failed {
            TogglePhase::Failed
        } else {
            TogglePhase::Confirmed
        };
    }
}

/// Fulfilled flag of one order line
pub struct FulfillmentToggle<H: HttpClient = NetworkHttpClient> {
    api: PosApi<H>,
    order_id: u64,
    product_id: u64,
    state: watch::Sender<ToggleState>,
}

impl<H: HttpClient> FulfillmentToggle<H> {
    /// `persisted` is the line's fulfilled flag as last fetched
    pub fn new(api: PosApi<H>, order_id: u64, product_id: u64, persisted: bool) -> Self {
        let (state, _) = watch::channel(ToggleState::new(persisted));
        Self {
            api,
            order_id,
            product_id,
            state,
        }
    }

    pub fn state(&self) -> ToggleState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ToggleState> {
        self.state.subscribe()
    }

    /// Show `value` now, then confirm it with the backend.
    ///
    /// No debouncing: every call issues its own request. The error of a
    /// rejected confirmation is returned after the state has been rolled back.
    pub async fn toggle(&self, value: bool) -> ClientResult<()> {
        let mut seq = 0;
        self.state.send_modify(|s| {
            s.issued += 1;
            seq = s.issued;
            s.in_flight += 1;
            s.visible = value;
            s.phase = TogglePhase::Pending;
        });
        let pending = PendingToggle {
            state: &self.state,
            seq,
            value,
            settled: false,
        };
        tracing::debug!(
            order_id = self.order_id,
            product_id = self.product_id,
            seq,
            value,
            "toggle issued"
        );

        let result = self
            .api
            .set_fulfilled(self.order_id, self.product_id, value)
            .await;

        pending.settle(result.is_ok());
        if let Err(e) = &result {
            tracing::warn!(
                order_id = self.order_id,
                product_id = self.product_id,
                seq,
                error = %e,
                "toggle rejected"
            );
        }
        result
    }
}

/// One issued toggle; dropping it unconfirmed counts as a rejection
struct PendingToggle<'a> {
    state: &'a watch::Sender<ToggleState>,
    seq: u64,
    value: bool,
    settled: bool,
}

impl PendingToggle<'_> {
    fn settle(mut self, ok: bool) {
        self.settled = true;
        self.state.send_modify(|s| s.settle(self.seq, self.value, ok));
    }
}

impl Drop for PendingToggle<'_> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        tracing::debug!(seq = self.seq, "toggle dropped before confirmation");
        self.state
            .send_modify(|s| s.settle(self.seq, self.value, false));
    }
}
