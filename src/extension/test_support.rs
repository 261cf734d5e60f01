//! Recording collaborators for unit tests.

use std::cell::RefCell;
use std::rc::Rc;

use tokio::sync::mpsc::UnboundedReceiver;

use crate::config::TraceServerConfig;
use crate::experiment::Experiment;
use crate::host::{
    ConnectionStatusService, ContextFlagService, HostCommandService, HostServices,
    TraceViewerPanels,
};
use crate::view::SurfaceEvent;

use super::ExplorerContext;

#[derive(Default)]
pub struct RecordingHost {
    calls: RefCell<Vec<String>>,
    open_panels: RefCell<Vec<String>>,
}

impl RecordingHost {
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    pub fn open_panels(&self) -> Vec<String> {
        self.open_panels.borrow().clone()
    }

    fn record(&self, call: String) {
        self.calls.borrow_mut().push(call);
    }
}

impl ConnectionStatusService for RecordingHost {
    fn update_server_status(&self, status: bool) {
        self.record(format!("status:{status}"));
    }
}

impl ContextFlagService for RecordingHost {
    fn update_no_experiments_context(&self) {
        self.record("context_flag".into());
    }
}

impl HostCommandService for RecordingHost {
    fn execute_command(&self, command_id: &str) {
        self.record(format!("command:{command_id}"));
    }
}

impl TraceViewerPanels for RecordingHost {
    fn create_or_show(&self, experiment_name: &str) {
        self.record(format!("create_or_show:{experiment_name}"));
        let mut panels = self.open_panels.borrow_mut();
        if !panels.iter().any(|p| p == experiment_name) {
            panels.push(experiment_name.to_string());
        }
    }

    fn set_experiment(&self, experiment: &Experiment) {
        self.record(format!("set_experiment:{}", experiment.name));
    }

    fn dispose_panel(&self, experiment_name: &str) -> bool {
        self.record(format!("dispose_panel:{experiment_name}"));
        let mut panels = self.open_panels.borrow_mut();
        let before = panels.len();
        panels.retain(|p| p != experiment_name);
        panels.len() != before
    }
}

pub fn test_context() -> (ExplorerContext, Rc<RecordingHost>) {
    let host = Rc::new(RecordingHost::default());
    let ctx = ExplorerContext::new(
        TraceServerConfig::default(),
        HostServices::from_single(host.clone()),
    );
    (ctx, host)
}

pub fn drain(rx: &mut UnboundedReceiver<SurfaceEvent>) -> Vec<SurfaceEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}
