//! Item properties: details of whatever the user picked in a trace viewer.
//!
//! Properties themselves arrive as direct posts from the viewer panels; the
//! only signal this view follows is selection, which invalidates them.

use tracing::debug;

use crate::protocol::{inbound, outbound, InboundMessage};
use crate::signals::{Signal, SignalKind};

use super::{experiment_data, ViewBehavior, ViewCx, ViewResult};

pub const VIEW_TYPE: &str = "traceExplorer.itemPropertiesView";

#[derive(Debug, Default)]
pub struct ItemPropertiesView;

impl ViewBehavior for ItemPropertiesView {
    fn view_type(&self) -> &'static str {
        VIEW_TYPE
    }

    fn script(&self) -> &'static str {
        "propertiesPanel.js"
    }

    fn subscriptions(&self) -> &'static [SignalKind] {
        &[SignalKind::ExperimentSelected]
    }

    fn on_signal(&mut self, signal: &Signal, cx: &mut ViewCx<'_>) -> ViewResult<()> {
        if let Signal::ExperimentSelected(e) = signal {
            cx.post(outbound::EXPERIMENT_SELECTED, experiment_data(e.as_ref())?);
        }
        Ok(())
    }

    fn handle_message(&mut self, message: &InboundMessage, cx: &mut ViewCx<'_>) -> ViewResult<()> {
        if message.command == inbound::WEBVIEW_READY {
            let selected = cx.selected();
            cx.post(outbound::EXPERIMENT_SELECTED, experiment_data(selected.as_ref())?);
        } else {
            debug!(command = %message.command, "not handled by item properties");
        }
        Ok(())
    }
}
