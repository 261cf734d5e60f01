//! Views: lifecycle shared by every trace explorer webview.
//!
//! A concrete view only says what it renders, which signals it listens to
//! and how it reacts. `TraceExplorerView` wraps it with the lifecycle:
//!
//! ```text
//! Unresolved ──resolve──▶ Resolved ──dispose──▶ Disposed
//!                          │    ▲                  │
//!                          └────┘ resolve again:   └──resolve──▶ Resolved (fresh surface)
//!                           dispose first, warn
//! ```
//!
//! Reactions never touch the bus or the host directly. They queue `Effect`s
//! on a `ViewCx`; the controller applies them once the view is no longer
//! borrowed, so a reaction that selects an experiment can itself be
//! notified of that selection.

pub mod available_views;
pub mod error;
pub mod html;
pub mod opened_traces;
pub mod properties;
pub mod surface;

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::TraceServerConfig;
use crate::experiment::Experiment;
use crate::extension::ExplorerContext;
use crate::protocol::{outbound, InboundMessage, OutboundMessage};
use crate::signals::{HandlerId, Signal, SignalError, SignalKind, SignalResult};

pub use available_views::AvailableViewsView;
pub use error::{ViewError, ViewResult};
pub use opened_traces::OpenedTracesView;
pub use properties::ItemPropertiesView;
pub use surface::{SurfaceEvent, SurfaceHandle};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Unresolved,
    Resolved,
    Disposed,
}

/// Something a view wants done once its reaction returns.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Notify this view's own surface.
    Post(OutboundMessage),
    SelectExperiment(Option<Experiment>),
    ActivateTab(Experiment),
    /// Open or focus the experiment's viewer panel and push the experiment into it.
    RevealPanel(Experiment),
    DisposePanel(String),
    UpdateServerStatus(bool),
    UpdateNoExperimentsContext,
    ExecuteCommand(String),
}

/// Reaction context handed to a view.
pub struct ViewCx<'a> {
    ctx: &'a ExplorerContext,
    effects: Vec<Effect>,
}

impl<'a> ViewCx<'a> {
    pub fn new(ctx: &'a ExplorerContext) -> Self {
        Self {
            ctx,
            effects: Vec::new(),
        }
    }

    pub fn context(&self) -> &ExplorerContext {
        self.ctx
    }

    /// Current global selection.
    pub fn selected(&self) -> Option<Experiment> {
        self.ctx.selection.current()
    }

    pub fn post(&mut self, command: &str, data: Value) {
        self.push(Effect::Post(OutboundMessage::new(command, data)));
    }

    pub fn push(&mut self, effect: Effect) {
        self.effects.push(effect);
    }

    pub fn effects(&self) -> &[Effect] {
        &self.effects
    }

    pub fn into_effects(self) -> Vec<Effect> {
        self.effects
    }
}

/// Per-view behaviour plugged into the shared lifecycle.
pub trait ViewBehavior: 'static {
    /// Host registration id, e.g. `traceExplorer.openedTracesView`.
    fn view_type(&self) -> &'static str;

    /// Bundled script the webview runs.
    fn script(&self) -> &'static str;

    /// Signal kinds to subscribe to while resolved.
    fn subscriptions(&self) -> &'static [SignalKind];

    fn on_signal(&mut self, signal: &Signal, cx: &mut ViewCx<'_>) -> ViewResult<()>;

    fn handle_message(&mut self, message: &InboundMessage, cx: &mut ViewCx<'_>) -> ViewResult<()>;

    /// Full document for the surface.
    fn render(&self, server: &TraceServerConfig) -> String {
        html::webview_html(self.script(), server, &html::nonce())
    }

    /// Drop per-surface state.
    fn on_dispose(&mut self) {}
}

/// Object-safe face of a view, as the extension and host see it.
pub trait ViewProvider {
    fn view_type(&self) -> &'static str;
    fn state(&self) -> LifecycleState;
    fn resolve(&self, surface: SurfaceHandle);
    fn dispose(&self);
    fn handle_message(&self, message: InboundMessage);
    fn post_message_to_surface(&self, command: &str, data: Value);
    fn update_server_endpoint(&self, url: &str);
    /// Bus handlers currently registered by this view.
    fn subscription_count(&self) -> usize;
}

/// Lifecycle controller around a `ViewBehavior`.
pub struct TraceExplorerView<V: ViewBehavior> {
    inner: Rc<ViewInner<V>>,
}

struct ViewInner<V> {
    view_type: &'static str,
    ctx: ExplorerContext,
    behavior: RefCell<V>,
    state: Cell<LifecycleState>,
    surface: RefCell<Option<SurfaceHandle>>,
    subscriptions: RefCell<Vec<(SignalKind, HandlerId)>>,
}

impl<V: ViewBehavior> TraceExplorerView<V> {
    pub fn new(behavior: V, ctx: ExplorerContext) -> Self {
        Self {
            inner: Rc::new(ViewInner {
                view_type: behavior.view_type(),
                ctx,
                behavior: RefCell::new(behavior),
                state: Cell::new(LifecycleState::Unresolved),
                surface: RefCell::new(None),
                subscriptions: RefCell::new(Vec::new()),
            }),
        }
    }

    /// Bus handler ids, for identity checks across re-resolution.
    pub fn subscription_ids(&self) -> Vec<(SignalKind, HandlerId)> {
        self.inner.subscriptions.borrow().clone()
    }
}

impl<V: ViewBehavior> Drop for TraceExplorerView<V> {
    fn drop(&mut self) {
        self.inner.dispose();
    }
}

impl<V: ViewBehavior> ViewProvider for TraceExplorerView<V> {
    fn view_type(&self) -> &'static str {
        self.inner.view_type
    }

    fn state(&self) -> LifecycleState {
        self.inner.state.get()
    }

    fn resolve(&self, surface: SurfaceHandle) {
        ViewInner::resolve(&self.inner, surface);
    }

    fn dispose(&self) {
        self.inner.dispose();
    }

    fn handle_message(&self, message: InboundMessage) {
        self.inner.handle_message(&message);
    }

    fn post_message_to_surface(&self, command: &str, data: Value) {
        self.inner.post(command, data);
    }

    fn update_server_endpoint(&self, url: &str) {
        self.inner.update_server_endpoint(url);
    }

    fn subscription_count(&self) -> usize {
        self.inner.subscriptions.borrow().len()
    }
}

impl<V: ViewBehavior> ViewInner<V> {
    fn resolve(this: &Rc<Self>, surface: SurfaceHandle) {
        if this.state.get() == LifecycleState::Resolved {
            // The host can resolve a view again without disposing the old
            // surface when its visibility context flips quickly.
            warn!(
                view = this.view_type,
                "resolved again without first disposing of the old webview; disposing it"
            );
            this.dispose();
        }

        info!(view = this.view_type, surface = %surface.id(), "resolving view");
        this.surface.replace(Some(surface));
        this.state.set(LifecycleState::Resolved);
        this.render();
        this.ctx.webviews.fire_webview_created(this.view_type);
        Self::subscribe(this);
    }

    fn subscribe(this: &Rc<Self>) {
        let kinds = match this.behavior.try_borrow() {
            Ok(behavior) => behavior.subscriptions(),
            Err(_) => {
                warn!(view = this.view_type, "cannot read subscriptions while busy");
                return;
            }
        };
        let mut subscriptions = this.subscriptions.borrow_mut();
        for &kind in kinds {
            let weak = Rc::downgrade(this);
            let view_type = this.view_type;
            let id = this.ctx.bus.on(kind, move |signal| match weak.upgrade() {
                Some(inner) => inner.deliver(signal),
                None => Err(SignalError::ViewGone(view_type.to_string())),
            });
            subscriptions.push((kind, id));
        }
    }

    fn dispose(&self) {
        if self.state.get() != LifecycleState::Resolved {
            return;
        }
        let subscriptions: Vec<_> = self.subscriptions.borrow_mut().drain(..).collect();
        for (kind, id) in &subscriptions {
            self.ctx.bus.off(*kind, *id);
        }
        self.surface.replace(None);
        if let Ok(mut behavior) = self.behavior.try_borrow_mut() {
            behavior.on_dispose();
        }
        self.state.set(LifecycleState::Disposed);
        info!(
            view = self.view_type,
            unsubscribed = subscriptions.len(),
            "view disposed"
        );
    }

    fn deliver(&self, signal: &Signal) -> SignalResult<()> {
        if self.state.get() != LifecycleState::Resolved {
            return Ok(());
        }
        let effects = {
            let mut behavior = self
                .behavior
                .try_borrow_mut()
                .map_err(|_| ViewError::Busy(self.view_type))?;
            let mut cx = ViewCx::new(&self.ctx);
            behavior.on_signal(signal, &mut cx)?;
            cx.into_effects()
        };
        self.apply(effects);
        Ok(())
    }

    fn handle_message(&self, message: &InboundMessage) {
        if self.state.get() != LifecycleState::Resolved {
            debug!(
                view = self.view_type,
                command = %message.command,
                "view not resolved; message dropped"
            );
            return;
        }
        debug!(view = self.view_type, command = %message.command, "message received");

        let outcome = match self.behavior.try_borrow_mut() {
            Ok(mut behavior) => {
                let mut cx = ViewCx::new(&self.ctx);
                behavior
                    .handle_message(message, &mut cx)
                    .map(|()| cx.into_effects())
            }
            Err(_) => Err(ViewError::Busy(self.view_type)),
        };
        match outcome {
            Ok(effects) => self.apply(effects),
            Err(e) => {
                warn!(
                    view = self.view_type,
                    command = %message.command,
                    error = %e,
                    "message dropped"
                );
            }
        }
    }

    fn apply(&self, effects: Vec<Effect>) {
        let services = &self.ctx.services;
        for effect in effects {
            match effect {
                Effect::Post(message) => self.post(&message.command, message.data),
                Effect::SelectExperiment(experiment) => {
                    self.ctx.selection.select_experiment(experiment)
                }
                Effect::ActivateTab(experiment) => self.ctx.selection.activate_tab(experiment),
                Effect::RevealPanel(experiment) => {
                    services.panels.create_or_show(&experiment.name);
                    services.panels.set_experiment(&experiment);
                }
                Effect::DisposePanel(name) => {
                    if !services.panels.dispose_panel(&name) {
                        debug!(experiment = %name, "no panel open to dispose");
                    }
                }
                Effect::UpdateServerStatus(status) => services.status.update_server_status(status),
                Effect::UpdateNoExperimentsContext => {
                    services.context_flags.update_no_experiments_context()
                }
                Effect::ExecuteCommand(id) => services.commands.execute_command(&id),
            }
        }
    }

    fn post(&self, command: &str, data: Value) {
        if command.is_empty() {
            return;
        }
        if let Some(surface) = self.surface.borrow().as_ref() {
            surface.post(OutboundMessage::new(command, data));
        }
    }

    fn update_server_endpoint(&self, url: &str) {
        if self.surface.borrow().is_none() {
            return;
        }
        self.post(outbound::TRACE_SERVER_URL_CHANGED, Value::String(url.to_string()));
        self.render();
    }

    fn render(&self) {
        let Ok(behavior) = self.behavior.try_borrow() else {
            warn!(view = self.view_type, "cannot render while busy");
            return;
        };
        let html = behavior.render(&self.ctx.server.borrow());
        if let Some(surface) = self.surface.borrow().as_ref() {
            surface.set_html(html);
        }
    }
}

/// `data` value for an experiment-bearing notification: the wrapper string,
/// or null for "no experiment".
pub fn experiment_data(experiment: Option<&Experiment>) -> ViewResult<Value> {
    match experiment {
        Some(e) => Ok(Value::String(e.to_wrapper()?)),
        None => Ok(Value::Null),
    }
}
