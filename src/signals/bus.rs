//! SignalBus: synchronous, in-order publish/subscribe.
//!
//! Handlers for one kind run in registration order on the caller's stack.
//! A failing or panicking handler is logged and skipped; its siblings still
//! run and `fire` never returns the failure to its caller.
//!
//! Re-entrancy: handlers may call `on`, `off` and `fire` while being
//! dispatched. `fire` works from a snapshot of the handler list but rechecks
//! registration before each call, so a handler removed mid-dispatch is never
//! invoked afterwards.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;

use tracing::{debug, error, warn};

use super::{Signal, SignalKind, SignalResult};

/// Token returned by `on`, used to remove the handler again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandlerId(u64);

type SignalHandler = Rc<dyn Fn(&Signal) -> SignalResult<()>>;

/// Process-wide signal registry. Owned by the extension context and shared
/// by `Rc`; single-threaded by construction.
#[derive(Default)]
pub struct SignalBus {
    next_id: Cell<u64>,
    handlers: RefCell<HashMap<SignalKind, Vec<(HandlerId, SignalHandler)>>>,
}

impl SignalBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for one signal kind.
    pub fn on<F>(&self, kind: SignalKind, handler: F) -> HandlerId
    where
        F: Fn(&Signal) -> SignalResult<()> + 'static,
    {
        let id = HandlerId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.handlers
            .borrow_mut()
            .entry(kind)
            .or_default()
            .push((id, Rc::new(handler)));
        debug!(signal = %kind, handler = id.0, "handler registered");
        id
    }

    /// Remove a handler. Unknown ids are ignored. Returns whether anything
    /// was removed.
    pub fn off(&self, kind: SignalKind, id: HandlerId) -> bool {
        let mut handlers = self.handlers.borrow_mut();
        let Some(list) = handlers.get_mut(&kind) else {
            return false;
        };
        let before = list.len();
        list.retain(|(h, _)| *h != id);
        let removed = list.len() != before;
        if list.is_empty() {
            handlers.remove(&kind);
        }
        if removed {
            debug!(signal = %kind, handler = id.0, "handler removed");
        }
        removed
    }

    /// Deliver a signal to every handler currently registered for its kind.
    /// Returns how many handlers completed without error.
    pub fn fire(&self, signal: Signal) -> usize {
        let kind = signal.kind();
        let snapshot: Vec<(HandlerId, SignalHandler)> = self
            .handlers
            .borrow()
            .get(&kind)
            .cloned()
            .unwrap_or_default();

        debug!(signal = %kind, handlers = snapshot.len(), "firing");

        let mut delivered = 0;
        for (id, handler) in snapshot {
            if !self.is_registered(kind, id) {
                continue;
            }
            match panic::catch_unwind(AssertUnwindSafe(|| handler(&signal))) {
                Ok(Ok(())) => delivered += 1,
                Ok(Err(e)) => {
                    warn!(signal = %kind, handler = id.0, error = %e, "signal handler failed");
                }
                Err(_) => {
                    error!(signal = %kind, handler = id.0, "signal handler panicked");
                }
            }
        }
        delivered
    }

    /// Number of handlers registered for a kind.
    pub fn handler_count(&self, kind: SignalKind) -> usize {
        self.handlers.borrow().get(&kind).map_or(0, Vec::len)
    }

    fn is_registered(&self, kind: SignalKind, id: HandlerId) -> bool {
        self.handlers
            .borrow()
            .get(&kind)
            .is_some_and(|list| list.iter().any(|(h, _)| *h == id))
    }
}

impl std::fmt::Debug for SignalBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let counts: HashMap<SignalKind, usize> = self
            .handlers
            .borrow()
            .iter()
            .map(|(k, v)| (*k, v.len()))
            .collect();
        f.debug_struct("SignalBus").field("handlers", &counts).finish()
    }
}
