//! ExplorerContext: the shared state every component is constructed with.

use std::cell::RefCell;
use std::rc::Rc;

use crate::config::TraceServerConfig;
use crate::host::{HostServices, WebviewManager};
use crate::selection::SelectionReconciler;
use crate::signals::SignalBus;

/// Cheap to clone; all clones share the same bus, selection and endpoint.
#[derive(Clone)]
pub struct ExplorerContext {
    pub bus: Rc<SignalBus>,
    pub selection: Rc<SelectionReconciler>,
    pub server: Rc<RefCell<TraceServerConfig>>,
    pub services: HostServices,
    pub webviews: Rc<WebviewManager>,
}

impl ExplorerContext {
    pub fn new(server: TraceServerConfig, services: HostServices) -> Self {
        let bus = Rc::new(SignalBus::new());
        Self {
            selection: Rc::new(SelectionReconciler::new(bus.clone())),
            bus,
            server: Rc::new(RefCell::new(server)),
            services,
            webviews: Rc::new(WebviewManager::new()),
        }
    }
}
