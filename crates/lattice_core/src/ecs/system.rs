//! # Systems
//!
//! A system is a stateful unit invoked exactly once per world update, in
//! declared order, against a [`WorldView`] scoped to the component kinds it
//! declared. Systems may additionally accept ad hoc messages, dispatched
//! synchronously by concrete system type.

use std::any::Any;

use super::component::{Component, ComponentId, ComponentMask};
use super::view::WorldView;

/// A system's declared component capabilities.
///
/// One optional writable ("primary") kind plus a set of read-only
/// ("secondary") kinds. The world checks at construction that the whole
/// set lies inside its declared component kinds; the view handed to the
/// system at update time is scoped to exactly this declaration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Access {
    /// The single kind this system may mutate, if any.
    pub primary: Option<ComponentId>,
    /// Kinds this system reads but never writes.
    pub secondary: ComponentMask,
}

impl Access {
    /// An empty declaration (no readable or writable kinds).
    #[must_use]
    pub const fn new() -> Self {
        Self {
            primary: None,
            secondary: ComponentMask::EMPTY,
        }
    }

    /// Declares `C` as the writable primary kind.
    #[must_use]
    pub const fn write<C: Component>(mut self) -> Self {
        self.primary = Some(C::ID);
        self
    }

    /// Adds `C` to the read-only secondary kinds.
    #[must_use]
    pub const fn read<C: Component>(mut self) -> Self {
        self.secondary = self.secondary.with(C::ID);
        self
    }

    /// The full declared kind set (primary and secondary together).
    ///
    /// This is the view's filtering predicate: an entity qualifies iff it
    /// owns every kind in this set.
    #[inline]
    #[must_use]
    pub const fn filter(self) -> ComponentMask {
        match self.primary {
            Some(id) => self.secondary.with(id),
            None => self.secondary,
        }
    }
}

/// A per-frame update unit.
///
/// Implementors declare their component capabilities once (the declaration
/// must not change over the system's lifetime) and receive a freshly
/// scoped view each update. There is no parallelism: update calls run to
/// completion, sequentially, in the order systems were registered.
///
/// # Example
///
/// ```rust,ignore
/// struct RegenSys;
///
/// impl System for RegenSys {
///     fn access(&self) -> Access {
///         Access::new().write::<Health>().read::<RegenTag>()
///     }
///
///     fn update(&mut self, view: &mut WorldView<'_>) {
///         let mut entities = view.entities();
///         while let Some(entity) = entities.next(view) {
///             view.component_mut::<Health>(entity).0 += 1;
///         }
///     }
///
///     fn as_any_mut(&mut self) -> &mut dyn Any {
///         self
///     }
/// }
/// ```
pub trait System: Any {
    /// The system's declared component capabilities.
    fn access(&self) -> Access;

    /// Called once per [`World::update`](super::world::World::update), in
    /// registration order.
    fn update(&mut self, view: &mut WorldView<'_>);

    /// Downcast hook for typed message dispatch. Implement as `self`.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Message-receiving capability of a system, one implementation per
/// accepted payload type.
///
/// `world.message::<S, _>(payload)` resolves the registered instance of
/// `S` and calls [`receive`](Receive::receive) synchronously; there is no
/// queue and no deferred delivery.
pub trait Receive<M>: System {
    /// Handles one message, immediately, in the caller's execution
    /// context.
    fn receive(&mut self, payload: M);
}
