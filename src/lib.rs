//! Trace Explorer: host-side coordination for trace analysis webviews.
//!
//! Several independently living webviews (opened traces, available views,
//! item properties) share one notion of the selected experiment. A
//! synchronous signal bus fans events out to them; each view's lifecycle
//! controller keeps its subscriptions exactly as long as its surface lives.

pub mod config;
pub mod experiment;
pub mod extension;
pub mod host;
pub mod protocol;
pub mod router;
pub mod selection;
pub mod signals;
pub mod view;
