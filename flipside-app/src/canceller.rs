//! Cooperative cancellation tokens.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

/// A shared cancellation token.
///
/// Clones are handles to the same token. Cancelling runs the cleanup at most
/// once and cascades to every child registered before the cancellation.
/// Tokens are single-threaded: they may only be used on the thread that made them.
#[derive(Clone, Default)]
pub struct Canceller {
    inner: Rc<Inner>,
}

#[derive(Default)]
struct Inner {
    cancelled: Cell<bool>,
    cleanup: RefCell<Option<Box<dyn FnOnce()>>>,
    children: RefCell<Vec<Canceller>>,
}

impl Canceller {
    /// Create a token that runs `cleanup` when first cancelled.
    pub fn new<F: FnOnce() + 'static>(cleanup: F) -> Self {
        Self {
            inner: Rc::new(Inner {
                cancelled: Cell::new(false),
                cleanup: RefCell::new(Some(Box::new(cleanup))),
                children: RefCell::new(Vec::new()),
            }),
        }
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.get()
    }

    /// Register a token to cancel along with this one.
    ///
    /// A child added after this token was cancelled is kept but never cancelled by it.
    pub fn add_subcanceller(&self, child: Canceller) {
        self.inner.children.borrow_mut().push(child);
    }

    /// Cancel this token and its children, then run the cleanup.
    /// Calling this again does nothing.
    pub fn cancel(&self) {
        if self.inner.cancelled.replace(true) {
            return;
        }

        let children = std::mem::take(&mut *self.inner.children.borrow_mut());
        for child in children {
            child.cancel();
        }

        let cleanup = self.inner.cleanup.borrow_mut().take();
        if let Some(cleanup) = cleanup {
            cleanup();
        }
    }
}

impl fmt::Debug for Canceller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Canceller")
            .field("cancelled", &self.is_cancelled())
            .field("children", &self.inner.children.borrow().len())
            .finish()
    }
}
