//! Host: the services this crate calls but does not own.
//!
//! The IDE shell, the trace viewer panels, the status bar and the trace
//! server client all live outside this crate. Each is reached through one
//! narrow trait so the coordination core can run (and be tested) without them.
//! Calls are fire-and-forget: the core never waits on a result.

pub mod commands;
pub mod webview_manager;

use std::rc::Rc;

use tracing::info;

use crate::experiment::Experiment;

pub use commands::{CommandHandler, CommandHandlerRegistry, ExecutionEvent};
pub use webview_manager::WebviewManager;

/// Host command that starts the open-trace flow (file picker etc.).
pub const OPEN_TRACE_COMMAND: &str = "openedTraces.openTrace";

/// Receives trace server reachability reports (drives the status bar).
pub trait ConnectionStatusService {
    fn update_server_status(&self, status: bool);
}

/// Recomputes the host's "no experiments open" context flag.
pub trait ContextFlagService {
    fn update_no_experiments_context(&self);
}

/// Runs a registered host command by id.
pub trait HostCommandService {
    fn execute_command(&self, command_id: &str);
}

/// The per-experiment trace viewer editor panels.
pub trait TraceViewerPanels {
    /// Open the panel for an experiment, or bring the existing one forward.
    fn create_or_show(&self, experiment_name: &str);
    /// Push experiment data into its panel.
    fn set_experiment(&self, experiment: &Experiment);
    /// Close the panel for an experiment if one is open. Returns whether one was.
    fn dispose_panel(&self, experiment_name: &str) -> bool;
}

/// Bundle of collaborator handles injected at activation.
#[derive(Clone)]
pub struct HostServices {
    pub status: Rc<dyn ConnectionStatusService>,
    pub context_flags: Rc<dyn ContextFlagService>,
    pub commands: Rc<dyn HostCommandService>,
    pub panels: Rc<dyn TraceViewerPanels>,
}

impl HostServices {
    /// Route every collaborator to the same object.
    pub fn from_single<T>(host: Rc<T>) -> Self
    where
        T: ConnectionStatusService
            + ContextFlagService
            + HostCommandService
            + TraceViewerPanels
            + 'static,
    {
        Self {
            status: host.clone(),
            context_flags: host.clone(),
            commands: host.clone(),
            panels: host,
        }
    }
}

/// Collaborator that only logs. Used by the headless CLI host.
#[derive(Debug, Default)]
pub struct LoggingHost;

impl ConnectionStatusService for LoggingHost {
    fn update_server_status(&self, status: bool) {
        info!(status, "trace server status");
    }
}

impl ContextFlagService for LoggingHost {
    fn update_no_experiments_context(&self) {
        info!("recompute no-experiments context");
    }
}

impl HostCommandService for LoggingHost {
    fn execute_command(&self, command_id: &str) {
        info!(command = command_id, "execute host command");
    }
}

impl TraceViewerPanels for LoggingHost {
    fn create_or_show(&self, experiment_name: &str) {
        info!(experiment = experiment_name, "show trace viewer panel");
    }

    fn set_experiment(&self, experiment: &Experiment) {
        info!(experiment = %experiment.name, "set panel experiment");
    }

    fn dispose_panel(&self, experiment_name: &str) -> bool {
        info!(experiment = experiment_name, "dispose trace viewer panel");
        false
    }
}
