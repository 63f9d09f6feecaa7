//! Cancel-and-replace handling for view-owned async tasks.
//!
//! Each view owns one [`TaskSlot`]. Starting a task hands out a [`Ticket`];
//! starting another one, or tearing the view down, invalidates every ticket
//! handed out before. Results carrying a stale ticket are dropped instead of
//! being written into signals that may already be disposed.

use std::{cell::Cell, future::Future, rc::Rc};

use leptos::{on_cleanup, spawn_local};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

#[derive(Debug, Default)]
pub struct TaskSlot {
    generation: Cell<u64>,
    closed: Cell<bool>,
}

impl TaskSlot {
    pub fn begin(&self) -> Ticket {
        let generation = self.generation.get() + 1;
        self.generation.set(generation);
        Ticket(generation)
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        !self.closed.get() && self.generation.get() == ticket.0
    }

    /// Invalidates every outstanding ticket for good.
    pub fn cancel(&self) {
        self.closed.set(true);
        self.generation.set(self.generation.get() + 1);
    }

    pub fn is_cancelled(&self) -> bool {
        self.closed.get()
    }
}

/// Creates a slot that is cancelled when the current reactive owner is
/// disposed.
pub fn use_task_slot() -> Rc<TaskSlot> {
    let slot = Rc::new(TaskSlot::default());
    let cleanup_slot = Rc::clone(&slot);
    on_cleanup(move || cleanup_slot.cancel());
    slot
}

/// Spawns `task`, replacing whatever was previously running in `slot`, and
/// hands its output to `apply` only if nothing replaced or cancelled it
/// meanwhile.
pub fn spawn_latest<T: 'static>(
    slot: &Rc<TaskSlot>,
    task: impl Future<Output = T> + 'static,
    apply: impl FnOnce(T) + 'static,
) {
    let ticket = slot.begin();
    let slot = Rc::clone(slot);

    spawn_local(async move {
        let output = task.await;

        if slot.is_current(ticket) {
            apply(output);
        } else {
            debug!(?ticket, cancelled = slot.is_cancelled(), "discarding stale task result");
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latest_ticket_is_current() {
        let slot = TaskSlot::default();
        let ticket = slot.begin();

        assert!(slot.is_current(ticket));
    }

    #[test]
    fn new_task_replaces_previous_one() {
        let slot = TaskSlot::default();
        let first = slot.begin();
        let second = slot.begin();

        assert!(!slot.is_current(first));
        assert!(slot.is_current(second));
    }

    #[test]
    fn cancel_invalidates_outstanding_and_future_tickets() {
        let slot = TaskSlot::default();
        let in_flight = slot.begin();

        slot.cancel();
        let after = slot.begin();

        assert!(slot.is_cancelled());
        assert!(!slot.is_current(in_flight));
        assert!(!slot.is_current(after));
    }
}
