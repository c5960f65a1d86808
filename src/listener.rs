//! Document-wide pointer-up registration.
//!
//! A drag or resize must end even when the pointer is released outside the
//! canvas, so the canvas listens for pointer-up on the whole document rather
//! than on itself. [`DocumentListeners`] is the host's document-level event
//! hub; [`CanvasMount`] registers the canvas on it for as long as the mount
//! lives and removes the listener when dropped.

#[cfg(test)]
#[path = "listener_test.rs"]
mod listener_test;

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use tracing::{debug, warn};

use crate::engine::{Action, EngineCore};
use crate::geom::Point;

type Handler = Rc<RefCell<dyn FnMut(Point)>>;

#[derive(Default)]
struct Registry {
    next_id: u64,
    pointer_up: Vec<(u64, Handler)>,
}

/// Document-level pointer-up hub.
///
/// Cloning yields another handle on the same hub.
#[derive(Clone, Default)]
pub struct DocumentListeners {
    inner: Rc<RefCell<Registry>>,
}

impl DocumentListeners {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a pointer-up handler. It stays registered until the returned
    /// [`Subscription`] is dropped.
    #[must_use = "dropping the subscription removes the listener immediately"]
    pub fn on_pointer_up(&self, handler: impl FnMut(Point) + 'static) -> Subscription {
        let mut reg = self.inner.borrow_mut();
        let id = reg.next_id;
        reg.next_id += 1;
        let handler: Handler = Rc::new(RefCell::new(handler));
        reg.pointer_up.push((id, handler));
        Subscription { id, registry: Rc::downgrade(&self.inner) }
    }

    /// Deliver a pointer-up to every registered handler. Returns how many ran.
    ///
    /// Handlers may subscribe or unsubscribe while running; the set delivered
    /// to is fixed when dispatch starts. A handler already running further up
    /// the stack is skipped.
    pub fn dispatch_pointer_up(&self, screen_pt: Point) -> usize {
        let handlers: Vec<Handler> = self.inner.borrow().pointer_up.iter().map(|(_, h)| Rc::clone(h)).collect();
        let mut ran = 0;
        for handler in handlers {
            match handler.try_borrow_mut() {
                Ok(mut f) => {
                    f(screen_pt);
                    ran += 1;
                }
                Err(_) => warn!("pointer-up handler re-entered; skipped"),
            }
        }
        ran
    }

    /// Number of registered pointer-up handlers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.borrow().pointer_up.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Keeps a handler registered. Dropping it deregisters the handler.
pub struct Subscription {
    id: u64,
    registry: Weak<RefCell<Registry>>,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        let Some(registry) = self.registry.upgrade() else {
            return;
        };
        let mut reg = registry.borrow_mut();
        reg.pointer_up.retain(|(id, _)| *id != self.id);
    }
}

/// A canvas attached to a document.
///
/// While the mount lives, every document pointer-up is forwarded to the
/// engine's `on_pointer_up`; the resulting actions queue up until the host
/// drains them.
pub struct CanvasMount {
    engine: Rc<RefCell<EngineCore>>,
    pending: Rc<RefCell<Vec<Action>>>,
    _pointer_up: Subscription,
}

impl CanvasMount {
    #[must_use]
    pub fn new(engine: Rc<RefCell<EngineCore>>, document: &DocumentListeners) -> Self {
        let pending: Rc<RefCell<Vec<Action>>> = Rc::new(RefCell::new(Vec::new()));
        let weak_engine = Rc::downgrade(&engine);
        let sink = Rc::clone(&pending);
        let subscription = document.on_pointer_up(move |_pt| {
            let Some(engine) = weak_engine.upgrade() else {
                return;
            };
            match engine.try_borrow_mut() {
                Ok(mut core) => {
                    let actions = core.on_pointer_up();
                    sink.borrow_mut().extend(actions);
                }
                Err(_) => warn!("engine busy during document pointer-up; gesture left open"),
            }
        });
        debug!("canvas mounted");
        Self { engine, pending, _pointer_up: subscription }
    }

    /// The engine this mount feeds.
    #[must_use]
    pub fn engine(&self) -> &Rc<RefCell<EngineCore>> {
        &self.engine
    }

    /// Take the actions produced by document pointer-ups since the last call.
    pub fn drain_actions(&self) -> Vec<Action> {
        std::mem::take(&mut *self.pending.borrow_mut())
    }
}

impl Drop for CanvasMount {
    fn drop(&mut self) {
        debug!("canvas unmounted");
    }
}
