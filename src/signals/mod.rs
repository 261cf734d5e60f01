//! Signals: the closed set of cross-view events and the bus that carries them.
//!
//! Every signal kind has exactly one statically typed payload, so a handler
//! can never receive a shape it did not ask for. The bus itself is
//! synchronous: `fire` runs every handler before returning.

pub mod bus;
pub mod error;

use std::fmt;

use crate::experiment::Experiment;

pub use bus::{HandlerId, SignalBus};
pub use error::{SignalError, SignalResult};

/// A signal together with its payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Signal {
    /// The trace server finished opening an experiment.
    ExperimentOpened(Experiment),
    /// The globally selected experiment changed. `None` clears the selection.
    ExperimentSelected(Option<Experiment>),
    /// A trace viewer panel for this experiment went away.
    ExperimentClosed(Experiment),
    /// A trace viewer tab became the focused one.
    TraceViewerTabActivated(Experiment),
    /// The trace server became reachable (`true`) or unreachable (`false`).
    ConnectionStatusChanged(bool),
    /// The analyses the server offers for this experiment changed.
    ViewsUpdated(Experiment),
}

impl Signal {
    pub fn kind(&self) -> SignalKind {
        match self {
            Signal::ExperimentOpened(_) => SignalKind::ExperimentOpened,
            Signal::ExperimentSelected(_) => SignalKind::ExperimentSelected,
            Signal::ExperimentClosed(_) => SignalKind::ExperimentClosed,
            Signal::TraceViewerTabActivated(_) => SignalKind::TraceViewerTabActivated,
            Signal::ConnectionStatusChanged(_) => SignalKind::ConnectionStatusChanged,
            Signal::ViewsUpdated(_) => SignalKind::ViewsUpdated,
        }
    }
}

/// Registration key for handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignalKind {
    ExperimentOpened,
    ExperimentSelected,
    ExperimentClosed,
    TraceViewerTabActivated,
    ConnectionStatusChanged,
    ViewsUpdated,
}

impl fmt::Display for SignalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SignalKind::ExperimentOpened => "experiment-opened",
            SignalKind::ExperimentSelected => "experiment-selected",
            SignalKind::ExperimentClosed => "experiment-closed",
            SignalKind::TraceViewerTabActivated => "tab-activated",
            SignalKind::ConnectionStatusChanged => "connection-status-changed",
            SignalKind::ViewsUpdated => "views-updated",
        };
        f.write_str(name)
    }
}
