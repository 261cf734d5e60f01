//! Command handlers other extensions register through the exported API.
//!
//! An ordered list compared by identity: registering the same handler twice
//! keeps two entries, deregistering removes the first one, and deregistering
//! something never registered does nothing.

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

/// A command invocation forwarded to registered handlers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionEvent {
    pub command: String,
    #[serde(default)]
    pub args: Vec<Value>,
}

impl ExecutionEvent {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            args: Vec::new(),
        }
    }
}

pub trait CommandHandler {
    fn handle(&self, event: &ExecutionEvent);
}

#[derive(Default)]
pub struct CommandHandlerRegistry {
    handlers: RefCell<Vec<Rc<dyn CommandHandler>>>,
}

impl CommandHandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, handler: Rc<dyn CommandHandler>) {
        self.handlers.borrow_mut().push(handler);
    }

    /// Returns whether the handler was found.
    pub fn deregister(&self, handler: &Rc<dyn CommandHandler>) -> bool {
        let mut handlers = self.handlers.borrow_mut();
        let index = handlers
            .iter()
            .position(|h| std::ptr::addr_eq(Rc::as_ptr(h), Rc::as_ptr(handler)));
        match index {
            Some(i) => {
                handlers.remove(i);
                true
            }
            None => false,
        }
    }

    /// Hand an event to every handler in registration order.
    pub fn dispatch(&self, event: &ExecutionEvent) -> usize {
        let snapshot: Vec<_> = self.handlers.borrow().clone();
        debug!(command = %event.command, handlers = snapshot.len(), "dispatching command");
        for handler in &snapshot {
            handler.handle(event);
        }
        snapshot.len()
    }

    pub fn len(&self) -> usize {
        self.handlers.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.borrow().is_empty()
    }
}
