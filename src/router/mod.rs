//! Router: decodes webview messages into commands and turns commands into effects.
//!
//! Each decoded command produces exactly one bus action or one host call,
//! except `webviewReady`, which replays the existing selection as a tab
//! activation followed by a plain selection so a late webview catches up.

use serde_json::Value;
use tracing::debug;

use crate::experiment::Experiment;
use crate::host::OPEN_TRACE_COMMAND;
use crate::protocol::{inbound, outbound, InboundMessage, ProtocolError, ProtocolResult};
use crate::view::{Effect, ViewCx};

/// A webview message after validation.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewCommand {
    ConnectionStatus(bool),
    WebviewReady,
    ReopenTrace(Experiment),
    CloseTrace(Experiment),
    DeleteTrace(Experiment),
    OpenedTracesUpdated,
    OpenTrace,
    ExperimentSelected(Option<Experiment>),
}

impl ViewCommand {
    pub fn decode(message: &InboundMessage) -> ProtocolResult<Self> {
        match message.command.as_str() {
            inbound::CONNECTION_STATUS => Ok(Self::ConnectionStatus(parse_status(message)?)),
            inbound::WEBVIEW_READY => Ok(Self::WebviewReady),
            inbound::RE_OPEN_TRACE => Ok(Self::ReopenTrace(required_experiment(
                message,
                inbound::RE_OPEN_TRACE,
            )?)),
            inbound::CLOSE_TRACE => Ok(Self::CloseTrace(required_experiment(
                message,
                inbound::CLOSE_TRACE,
            )?)),
            inbound::DELETE_TRACE => Ok(Self::DeleteTrace(required_experiment(
                message,
                inbound::DELETE_TRACE,
            )?)),
            inbound::OPENED_TRACES_UPDATED => Ok(Self::OpenedTracesUpdated),
            inbound::OPEN_TRACE => Ok(Self::OpenTrace),
            inbound::EXPERIMENT_SELECTED => Ok(Self::ExperimentSelected(optional_experiment(
                message,
                inbound::EXPERIMENT_SELECTED,
            )?)),
            other => Err(ProtocolError::UnknownCommand(other.to_string())),
        }
    }
}

/// Queue the effects for one command.
pub fn dispatch(command: ViewCommand, cx: &mut ViewCx<'_>) {
    debug!(?command, "dispatching view command");
    match command {
        ViewCommand::ConnectionStatus(status) => cx.push(Effect::UpdateServerStatus(status)),
        ViewCommand::WebviewReady => {
            let url = cx.context().server.borrow().tsp_client_url();
            cx.post(outbound::SET_TSP_CLIENT, Value::String(url));
            if let Some(experiment) = cx.selected() {
                // Tab activation first: it moves the highlight, then the
                // selection updates views that only follow selection.
                cx.push(Effect::ActivateTab(experiment.clone()));
                cx.push(Effect::SelectExperiment(Some(experiment)));
            }
        }
        ViewCommand::ReopenTrace(experiment) => {
            cx.push(Effect::RevealPanel(experiment.clone()));
            cx.push(Effect::SelectExperiment(Some(experiment)));
        }
        ViewCommand::CloseTrace(experiment) | ViewCommand::DeleteTrace(experiment) => {
            cx.push(Effect::DisposePanel(experiment.name));
            cx.push(Effect::SelectExperiment(None));
        }
        ViewCommand::OpenedTracesUpdated => cx.push(Effect::UpdateNoExperimentsContext),
        ViewCommand::OpenTrace => cx.push(Effect::ExecuteCommand(OPEN_TRACE_COMMAND.into())),
        ViewCommand::ExperimentSelected(experiment) => {
            cx.push(Effect::SelectExperiment(experiment))
        }
    }
}

/// Decode and dispatch. Unknown commands are ignored; malformed ones are errors.
pub fn route(message: &InboundMessage, cx: &mut ViewCx<'_>) -> ProtocolResult<()> {
    match ViewCommand::decode(message) {
        Ok(command) => {
            dispatch(command, cx);
            Ok(())
        }
        Err(ProtocolError::UnknownCommand(command)) => {
            debug!(%command, "ignoring unknown command");
            Ok(())
        }
        Err(e) => Err(e),
    }
}

/// `data.status` as a JSON boolean, or a string holding one.
fn parse_status(message: &InboundMessage) -> ProtocolResult<bool> {
    let command = inbound::CONNECTION_STATUS;
    let invalid = |reason: String| ProtocolError::InvalidField {
        command,
        field: "status",
        reason,
    };
    match message.field("status") {
        Some(Value::Bool(status)) => Ok(*status),
        Some(Value::String(raw)) => {
            serde_json::from_str::<bool>(raw.trim()).map_err(|e| invalid(e.to_string()))
        }
        Some(other) => Err(invalid(format!("expected a boolean, got {other}"))),
        None => Err(ProtocolError::MissingField {
            command,
            field: "status",
        }),
    }
}

fn required_experiment(
    message: &InboundMessage,
    command: &'static str,
) -> ProtocolResult<Experiment> {
    optional_experiment(message, command)?.ok_or(ProtocolError::MissingField {
        command,
        field: "wrapper",
    })
}

/// `data.wrapper`, normally a JSON string; an already-decoded object is accepted too.
/// An empty string counts as no experiment.
fn optional_experiment(
    message: &InboundMessage,
    command: &'static str,
) -> ProtocolResult<Option<Experiment>> {
    let decoded = match message.field("wrapper") {
        None => return Ok(None),
        Some(Value::String(wrapper)) if wrapper.is_empty() => return Ok(None),
        Some(Value::String(wrapper)) => Experiment::from_wrapper(wrapper),
        Some(value) => serde_json::from_value(value.clone()),
    };
    decoded
        .map(Some)
        .map_err(|source| ProtocolError::BadWrapper { command, source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extension::test_support::test_context;
    use serde_json::json;

    fn wrapped(name: &str) -> Option<Value> {
        Some(json!({ "wrapper": Experiment::named(name).to_wrapper().unwrap() }))
    }

    fn effects_for(message: InboundMessage) -> Vec<Effect> {
        let (ctx, _host) = test_context();
        let mut cx = ViewCx::new(&ctx);
        route(&message, &mut cx).unwrap();
        cx.into_effects()
    }

    #[test]
    fn connection_status_accepts_bool_and_string() {
        let msg = InboundMessage::new(inbound::CONNECTION_STATUS, Some(json!({"status": "true"})));
        assert_eq!(ViewCommand::decode(&msg).unwrap(), ViewCommand::ConnectionStatus(true));
        let msg = InboundMessage::new(inbound::CONNECTION_STATUS, Some(json!({"status": false})));
        assert_eq!(ViewCommand::decode(&msg).unwrap(), ViewCommand::ConnectionStatus(false));
    }

    #[test]
    fn connection_status_malformed_is_an_error() {
        let msg = InboundMessage::new(inbound::CONNECTION_STATUS, Some(json!({"status": "yes"})));
        assert!(matches!(
            ViewCommand::decode(&msg),
            Err(ProtocolError::InvalidField { field: "status", .. })
        ));
        let msg = InboundMessage::new(inbound::CONNECTION_STATUS, Some(json!({"status": 1})));
        assert!(ViewCommand::decode(&msg).is_err());
        let msg = InboundMessage::new(inbound::CONNECTION_STATUS, None);
        assert!(matches!(
            ViewCommand::decode(&msg),
            Err(ProtocolError::MissingField { field: "status", .. })
        ));
    }

    #[test]
    fn trace_commands_require_wrapper() {
        for command in [inbound::RE_OPEN_TRACE, inbound::CLOSE_TRACE, inbound::DELETE_TRACE] {
            let msg = InboundMessage::new(command, Some(json!({})));
            assert!(matches!(
                ViewCommand::decode(&msg),
                Err(ProtocolError::MissingField { field: "wrapper", .. })
            ));
        }
    }

    #[test]
    fn empty_wrapper_clears_selection() {
        let msg = InboundMessage::new(inbound::EXPERIMENT_SELECTED, Some(json!({"wrapper": ""})));
        assert_eq!(ViewCommand::decode(&msg).unwrap(), ViewCommand::ExperimentSelected(None));
        assert_eq!(effects_for(msg), vec![Effect::SelectExperiment(None)]);
    }

    #[test]
    fn empty_wrapper_is_missing_for_trace_commands() {
        for command in [inbound::RE_OPEN_TRACE, inbound::CLOSE_TRACE, inbound::DELETE_TRACE] {
            let msg = InboundMessage::new(command, Some(json!({"wrapper": ""})));
            assert!(matches!(
                ViewCommand::decode(&msg),
                Err(ProtocolError::MissingField { field: "wrapper", .. })
            ));
        }
    }

    #[test]
    fn undecodable_wrapper_is_an_error() {
        let msg = InboundMessage::new(
            inbound::RE_OPEN_TRACE,
            Some(json!({"wrapper": "{not json"})),
        );
        assert!(matches!(
            ViewCommand::decode(&msg),
            Err(ProtocolError::BadWrapper { command: "reopenTrace", .. })
        ));
    }

    #[test]
    fn experiment_selected_without_payload_is_absent() {
        let msg = InboundMessage::new(inbound::EXPERIMENT_SELECTED, None);
        assert_eq!(ViewCommand::decode(&msg).unwrap(), ViewCommand::ExperimentSelected(None));
        let msg = InboundMessage::new(inbound::EXPERIMENT_SELECTED, wrapped("trace1"));
        assert_eq!(
            ViewCommand::decode(&msg).unwrap(),
            ViewCommand::ExperimentSelected(Some(Experiment::named("trace1")))
        );
    }

    #[test]
    fn object_wrapper_is_accepted() {
        let msg = InboundMessage::new(
            inbound::EXPERIMENT_SELECTED,
            Some(json!({"wrapper": {"name": "t"}})),
        );
        assert_eq!(
            ViewCommand::decode(&msg).unwrap(),
            ViewCommand::ExperimentSelected(Some(Experiment::named("t")))
        );
    }

    #[test]
    fn reopen_reveals_then_selects() {
        let effects = effects_for(InboundMessage::new(inbound::RE_OPEN_TRACE, wrapped("trace1")));
        assert_eq!(
            effects,
            vec![
                Effect::RevealPanel(Experiment::named("trace1")),
                Effect::SelectExperiment(Some(Experiment::named("trace1"))),
            ]
        );
    }

    #[test]
    fn close_and_delete_dispose_then_clear() {
        for command in [inbound::CLOSE_TRACE, inbound::DELETE_TRACE] {
            let effects = effects_for(InboundMessage::new(command, wrapped("trace1")));
            assert_eq!(
                effects,
                vec![
                    Effect::DisposePanel("trace1".into()),
                    Effect::SelectExperiment(None),
                ]
            );
        }
    }

    #[test]
    fn delegates_are_single_calls() {
        assert_eq!(
            effects_for(InboundMessage::new(inbound::OPENED_TRACES_UPDATED, None)),
            vec![Effect::UpdateNoExperimentsContext]
        );
        assert_eq!(
            effects_for(InboundMessage::new(inbound::OPEN_TRACE, None)),
            vec![Effect::ExecuteCommand(OPEN_TRACE_COMMAND.into())]
        );
        assert_eq!(
            effects_for(InboundMessage::new(
                inbound::CONNECTION_STATUS,
                Some(json!({"status": "false"}))
            )),
            vec![Effect::UpdateServerStatus(false)]
        );
    }

    #[test]
    fn webview_ready_without_selection_only_sends_endpoint() {
        let effects = effects_for(InboundMessage::new(inbound::WEBVIEW_READY, None));
        assert_eq!(effects.len(), 1);
        assert!(matches!(
            &effects[0],
            Effect::Post(m) if m.command == outbound::SET_TSP_CLIENT
                && m.data == json!("http://localhost:8080/tsp/api")
        ));
    }

    #[test]
    fn webview_ready_replays_selection_tab_first() {
        let (ctx, _host) = test_context();
        ctx.selection.select_experiment(Some(Experiment::named("trace2")));
        let mut cx = ViewCx::new(&ctx);
        route(&InboundMessage::new(inbound::WEBVIEW_READY, None), &mut cx).unwrap();

        let effects = cx.into_effects();
        assert_eq!(effects.len(), 3);
        assert_eq!(effects[1], Effect::ActivateTab(Experiment::named("trace2")));
        assert_eq!(
            effects[2],
            Effect::SelectExperiment(Some(Experiment::named("trace2")))
        );
    }

    #[test]
    fn unknown_command_is_ignored() {
        assert!(effects_for(InboundMessage::new("someFutureCommand", None)).is_empty());
    }
}
