//! TraceExtension: activation-scoped wiring of bus, selection, views and host.
//!
//! `activate` builds one `ExplorerContext` and hands a clone to every view.
//! Nothing here is global: dropping the extension (after `deactivate`)
//! drops the bus and the selection with it.

pub mod context;
#[cfg(test)]
pub(crate) mod test_support;

use std::rc::Rc;

use serde_json::Value;
use tracing::{debug, info};

use crate::config::TraceServerConfig;
use crate::experiment::Experiment;
use crate::host::{CommandHandler, CommandHandlerRegistry, ExecutionEvent, HostServices};
use crate::signals::Signal;
use crate::view::{
    properties, AvailableViewsView, ItemPropertiesView, OpenedTracesView, TraceExplorerView,
    ViewProvider,
};

pub use context::ExplorerContext;

pub struct TraceExtension {
    ctx: ExplorerContext,
    providers: Vec<Rc<dyn ViewProvider>>,
    command_handlers: CommandHandlerRegistry,
}

impl TraceExtension {
    /// Build the context and the three trace explorer views.
    pub fn activate(config: TraceServerConfig, services: HostServices) -> Self {
        info!(server = %config.tsp_client_url(), "activating trace explorer");
        let ctx = ExplorerContext::new(config, services);
        let providers: Vec<Rc<dyn ViewProvider>> = vec![
            Rc::new(TraceExplorerView::new(OpenedTracesView, ctx.clone())),
            Rc::new(TraceExplorerView::new(AvailableViewsView, ctx.clone())),
            Rc::new(TraceExplorerView::new(ItemPropertiesView, ctx.clone())),
        ];
        Self {
            ctx,
            providers,
            command_handlers: CommandHandlerRegistry::new(),
        }
    }

    pub fn context(&self) -> &ExplorerContext {
        &self.ctx
    }

    pub fn providers(&self) -> &[Rc<dyn ViewProvider>] {
        &self.providers
    }

    /// Look up a view by its host registration id.
    pub fn provider(&self, view_type: &str) -> Option<Rc<dyn ViewProvider>> {
        self.providers
            .iter()
            .find(|p| p.view_type() == view_type)
            .cloned()
    }

    /// New server configuration. Every live view is told the new endpoint
    /// and re-rendered, if anything a webview depends on changed.
    pub fn update_server_config(&self, config: TraceServerConfig) {
        let changed = self.ctx.server.borrow().endpoint_changed(&config);
        let url = config.tsp_client_url();
        self.ctx.server.replace(config);
        if !changed {
            debug!("server configuration changed nothing webviews depend on");
            return;
        }
        info!(server = %url, "trace server endpoint changed");
        for provider in &self.providers {
            provider.update_server_endpoint(&url);
        }
    }

    /// Forward a notification straight to the item properties webview.
    pub fn post_to_properties(&self, command: &str, data: Value) {
        if let Some(view) = self.provider(properties::VIEW_TYPE) {
            view.post_message_to_surface(command, data);
        }
    }

    /// The trace server finished opening an experiment.
    pub fn experiment_opened(&self, experiment: Experiment) {
        self.ctx.bus.fire(Signal::ExperimentOpened(experiment));
    }

    /// A viewer panel closed. Views are told, and a selection pointing at
    /// the closed experiment is cleared.
    pub fn experiment_closed(&self, experiment: Experiment) {
        self.ctx.bus.fire(Signal::ExperimentClosed(experiment.clone()));
        self.ctx.selection.clear_if_selected(&experiment);
    }

    /// The server reported a new set of analyses for an experiment.
    pub fn views_updated(&self, experiment: Experiment) {
        self.ctx.bus.fire(Signal::ViewsUpdated(experiment));
    }

    /// A trace viewer tab gained focus.
    pub fn panel_activated(&self, experiment: Experiment) {
        self.ctx.selection.activate_tab(experiment.clone());
        self.ctx.selection.select_experiment(Some(experiment));
    }

    /// Trace server reachability changed.
    pub fn set_server_status(&self, status: bool) {
        self.ctx.services.status.update_server_status(status);
        self.ctx.bus.fire(Signal::ConnectionStatusChanged(status));
    }

    pub fn register_command_handler(&self, handler: Rc<dyn CommandHandler>) {
        self.command_handlers.register(handler);
    }

    pub fn deregister_command_handler(&self, handler: &Rc<dyn CommandHandler>) -> bool {
        self.command_handlers.deregister(handler)
    }

    /// Hand a command invocation to every registered handler.
    pub fn execute_command(&self, event: &ExecutionEvent) -> usize {
        self.command_handlers.dispatch(event)
    }

    /// Dispose every view.
    pub fn deactivate(self) {
        for provider in &self.providers {
            provider.dispose();
        }
        info!("trace explorer deactivated");
    }
}
