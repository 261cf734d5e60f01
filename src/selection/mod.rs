//! Selection: the one "currently selected experiment" every view agrees on.
//!
//! All writes go through `SelectionReconciler`. Each write stores the value
//! first and then fires, so any handler reading `current()` during the fire
//! already sees the new value. Last write wins; ordering is whatever order
//! the writes arrive in, and the bus delivers them synchronously.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::info;

use crate::experiment::Experiment;
use crate::signals::{Signal, SignalBus};

pub struct SelectionReconciler {
    bus: Rc<SignalBus>,
    selected: RefCell<Option<Experiment>>,
}

impl SelectionReconciler {
    pub fn new(bus: Rc<SignalBus>) -> Self {
        Self {
            bus,
            selected: RefCell::new(None),
        }
    }

    /// Snapshot of the current selection.
    pub fn current(&self) -> Option<Experiment> {
        self.selected.borrow().clone()
    }

    /// Set the selection and announce it. `None` is announced too: it means
    /// "nothing selected", which listeners must act on.
    pub fn select_experiment(&self, experiment: Option<Experiment>) {
        info!(
            experiment = experiment.as_ref().map(|e| e.name.as_str()),
            "experiment selected"
        );
        self.selected.replace(experiment.clone());
        self.bus.fire(Signal::ExperimentSelected(experiment));
    }

    /// A view surface showing this experiment became the focused one.
    /// Updates the selection and fires tab-activated only; callers that also
    /// want plain selection semantics follow up with `select_experiment`.
    pub fn activate_tab(&self, experiment: Experiment) {
        info!(experiment = %experiment.name, "trace viewer tab activated");
        self.selected.replace(Some(experiment.clone()));
        self.bus.fire(Signal::TraceViewerTabActivated(experiment));
    }

    /// Drop the selection if it refers to `experiment`, announcing the
    /// cleared state. Returns whether anything changed.
    pub fn clear_if_selected(&self, experiment: &Experiment) -> bool {
        let matches = self
            .selected
            .borrow()
            .as_ref()
            .is_some_and(|e| e.same_identity(experiment));
        if matches {
            self.select_experiment(None);
        }
        matches
    }
}
