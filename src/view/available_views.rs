//! Available views: the analyses the server offers for the selected experiment.

use serde_json::json;
use tracing::debug;

use crate::protocol::{outbound, InboundMessage};
use crate::router::{self, ViewCommand};
use crate::signals::{Signal, SignalKind};

use super::{experiment_data, ViewBehavior, ViewCx, ViewResult};

pub const VIEW_TYPE: &str = "traceExplorer.availableViews";

#[derive(Debug, Default)]
pub struct AvailableViewsView;

impl ViewBehavior for AvailableViewsView {
    fn view_type(&self) -> &'static str {
        VIEW_TYPE
    }

    fn script(&self) -> &'static str {
        "analysisPanel.js"
    }

    fn subscriptions(&self) -> &'static [SignalKind] {
        &[
            SignalKind::ExperimentSelected,
            SignalKind::ConnectionStatusChanged,
            SignalKind::ViewsUpdated,
        ]
    }

    fn on_signal(&mut self, signal: &Signal, cx: &mut ViewCx<'_>) -> ViewResult<()> {
        match signal {
            Signal::ExperimentSelected(e) => {
                cx.post(outbound::EXPERIMENT_SELECTED, experiment_data(e.as_ref())?)
            }
            Signal::ConnectionStatusChanged(status) => {
                cx.post(outbound::CONNECTION_STATUS, json!({ "status": status }))
            }
            Signal::ViewsUpdated(e) => {
                cx.post(outbound::VIEWS_UPDATED, experiment_data(Some(e))?)
            }
            _ => {}
        }
        Ok(())
    }

    fn handle_message(&mut self, message: &InboundMessage, cx: &mut ViewCx<'_>) -> ViewResult<()> {
        match ViewCommand::decode(message) {
            Ok(ViewCommand::WebviewReady) => {
                let url = cx.context().server.borrow().tsp_client_url();
                cx.post(outbound::SET_TSP_CLIENT, json!(url));
                // Catch up on the selection locally; other views are already in sync.
                let selected = cx.selected();
                cx.post(outbound::EXPERIMENT_SELECTED, experiment_data(selected.as_ref())?);
            }
            Ok(command @ ViewCommand::ConnectionStatus(_)) => router::dispatch(command, cx),
            Ok(command) => debug!(?command, "not handled by available views"),
            Err(crate::protocol::ProtocolError::UnknownCommand(command)) => {
                debug!(%command, "ignoring unknown command")
            }
            Err(e) => return Err(e.into()),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::experiment::Experiment;
    use crate::extension::test_support::test_context;
    use crate::protocol::{inbound, OutboundMessage};
    use crate::view::Effect;

    #[test]
    fn ready_posts_endpoint_and_current_selection_without_firing() {
        let (ctx, _host) = test_context();
        ctx.selection.select_experiment(Some(Experiment::named("trace2")));
        let mut cx = ViewCx::new(&ctx);
        AvailableViewsView
            .handle_message(&InboundMessage::new(inbound::WEBVIEW_READY, None), &mut cx)
            .unwrap();

        let effects = cx.into_effects();
        assert_eq!(effects.len(), 2);
        assert!(effects.iter().all(|e| matches!(e, Effect::Post(_))));
        assert_eq!(
            effects[1],
            Effect::Post(OutboundMessage::new(
                outbound::EXPERIMENT_SELECTED,
                json!(Experiment::named("trace2").to_wrapper().unwrap())
            ))
        );
    }

    #[test]
    fn connection_status_is_forwarded() {
        let (ctx, _host) = test_context();
        let mut cx = ViewCx::new(&ctx);
        let msg = InboundMessage::new(inbound::CONNECTION_STATUS, Some(json!({"status": true})));
        AvailableViewsView.handle_message(&msg, &mut cx).unwrap();
        assert_eq!(cx.effects(), &[Effect::UpdateServerStatus(true)]);
    }

    #[test]
    fn trace_commands_are_not_this_views_business() {
        let (ctx, _host) = test_context();
        let mut cx = ViewCx::new(&ctx);
        let msg = InboundMessage::new(inbound::OPEN_TRACE, None);
        AvailableViewsView.handle_message(&msg, &mut cx).unwrap();
        assert!(cx.effects().is_empty());
    }

    #[test]
    fn connection_signal_posts_status() {
        let (ctx, _host) = test_context();
        let mut cx = ViewCx::new(&ctx);
        AvailableViewsView
            .on_signal(&Signal::ConnectionStatusChanged(false), &mut cx)
            .unwrap();
        assert_eq!(
            cx.effects(),
            &[Effect::Post(OutboundMessage::new(
                outbound::CONNECTION_STATUS,
                json!({"status": false})
            ))]
        );
    }

    #[test]
    fn views_updated_posts_the_experiment() {
        let (ctx, _host) = test_context();
        let mut cx = ViewCx::new(&ctx);
        let exp = Experiment::named("trace1");
        AvailableViewsView
            .on_signal(&Signal::ViewsUpdated(exp.clone()), &mut cx)
            .unwrap();
        assert_eq!(
            cx.effects(),
            &[Effect::Post(OutboundMessage::new(
                outbound::VIEWS_UPDATED,
                json!(exp.to_wrapper().unwrap())
            ))]
        );
    }
}
