//! Shared handles to collaborator objects owned by the workspace.
//!
//! Compositor execution is single threaded, so handles are reference counted cells rather than
//! locked objects. A handle stays valid for as long as the pass holding it lives.

use std::cell::RefCell;
use std::rc::Rc;

/// Reference counted, interior mutable handle.
pub type Shared<T> = Rc<RefCell<T>>;

/// Wrap a value in a [`Shared`] handle.
pub fn shared<T>(value: T) -> Shared<T> {
    Rc::new(RefCell::new(value))
}
