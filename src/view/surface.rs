//! SurfaceHandle: the host side of one rendered webview.
//!
//! Delivery is fire-and-forget over an unbounded channel: the host's
//! transport drains the receiver at its own pace. If the receiver is gone the
//! webview is gone too, and the event is dropped.

use serde::Serialize;
use tokio::sync::mpsc;
use tracing::debug;
use uuid::Uuid;

use crate::protocol::OutboundMessage;

/// Things a surface can be told.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "body", rename_all = "camelCase")]
pub enum SurfaceEvent {
    /// Replace the whole document.
    Html(String),
    /// Structured notification for the webview's script.
    Notify(OutboundMessage),
}

#[derive(Debug, Clone)]
pub struct SurfaceHandle {
    id: Uuid,
    tx: mpsc::UnboundedSender<SurfaceEvent>,
}

impl SurfaceHandle {
    /// A handle plus the receiving end the host transport reads from.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<SurfaceEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                id: Uuid::new_v4(),
                tx,
            },
            rx,
        )
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn set_html(&self, html: String) {
        self.send(SurfaceEvent::Html(html));
    }

    pub fn post(&self, message: OutboundMessage) {
        self.send(SurfaceEvent::Notify(message));
    }

    /// Whether the receiving side has hung up.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    fn send(&self, event: SurfaceEvent) {
        if self.tx.send(event).is_err() {
            debug!(surface = %self.id, "surface receiver gone; event dropped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn events_arrive_in_order() {
        let (surface, mut rx) = SurfaceHandle::channel();
        surface.set_html("<html></html>".into());
        surface.post(OutboundMessage::new("setTspClient", json!("u")));

        assert_eq!(rx.try_recv().unwrap(), SurfaceEvent::Html("<html></html>".into()));
        assert_eq!(
            rx.try_recv().unwrap(),
            SurfaceEvent::Notify(OutboundMessage::new("setTspClient", json!("u")))
        );
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn send_after_receiver_dropped_is_silent() {
        let (surface, rx) = SurfaceHandle::channel();
        drop(rx);
        assert!(surface.is_closed());
        surface.post(OutboundMessage::new("x", json!(null)));
    }

    #[test]
    fn event_json_shape() {
        let event = SurfaceEvent::Notify(OutboundMessage::new("experimentSelected", json!(null)));
        let v = serde_json::to_value(&event).unwrap();
        assert_eq!(v["kind"], "notify");
        assert_eq!(v["body"]["command"], "experimentSelected");
    }
}
