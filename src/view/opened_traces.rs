//! Opened traces: the list of experiments open on the trace server.
//!
//! This is the view users drive the explorer from, so it accepts the full
//! router vocabulary.

use crate::protocol::{outbound, InboundMessage};
use crate::router;
use crate::signals::{Signal, SignalKind};

use super::{experiment_data, ViewBehavior, ViewCx, ViewResult};

pub const VIEW_TYPE: &str = "traceExplorer.openedTracesView";

#[derive(Debug, Default)]
pub struct OpenedTracesView;

impl ViewBehavior for OpenedTracesView {
    fn view_type(&self) -> &'static str {
        VIEW_TYPE
    }

    fn script(&self) -> &'static str {
        "openedTracesPanel.js"
    }

    fn subscriptions(&self) -> &'static [SignalKind] {
        &[
            SignalKind::TraceViewerTabActivated,
            SignalKind::ExperimentSelected,
            SignalKind::ExperimentOpened,
            SignalKind::ExperimentClosed,
        ]
    }

    fn on_signal(&mut self, signal: &Signal, cx: &mut ViewCx<'_>) -> ViewResult<()> {
        match signal {
            Signal::TraceViewerTabActivated(e) => {
                cx.post(outbound::TRACE_VIEWER_TAB_ACTIVATED, experiment_data(Some(e))?)
            }
            Signal::ExperimentSelected(e) => {
                cx.post(outbound::EXPERIMENT_SELECTED, experiment_data(e.as_ref())?)
            }
            Signal::ExperimentOpened(e) => {
                cx.post(outbound::EXPERIMENT_OPENED, experiment_data(Some(e))?)
            }
            Signal::ExperimentClosed(e) => {
                cx.post(outbound::EXPERIMENT_CLOSED, experiment_data(Some(e))?)
            }
            Signal::ConnectionStatusChanged(_) | Signal::ViewsUpdated(_) => {}
        }
        Ok(())
    }

    fn handle_message(&mut self, message: &InboundMessage, cx: &mut ViewCx<'_>) -> ViewResult<()> {
        router::route(message, cx)?;
        Ok(())
    }
}
