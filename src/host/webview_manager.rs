//! Observers notified when a trace explorer webview comes up.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use tracing::debug;

type CreatedObserver = Rc<dyn Fn(&str)>;

#[derive(Default)]
pub struct WebviewManager {
    observers: RefCell<Vec<CreatedObserver>>,
    created: Cell<usize>,
}

impl WebviewManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_webview_created<F>(&self, observer: F)
    where
        F: Fn(&str) + 'static,
    {
        self.observers.borrow_mut().push(Rc::new(observer));
    }

    pub fn fire_webview_created(&self, view_type: &str) {
        self.created.set(self.created.get() + 1);
        let snapshot: Vec<_> = self.observers.borrow().clone();
        debug!(view = view_type, observers = snapshot.len(), "webview created");
        for observer in snapshot {
            observer(view_type);
        }
    }

    /// Webviews created over the process lifetime.
    pub fn created_count(&self) -> usize {
        self.created.get()
    }
}
