//! # World Views
//!
//! A view is the window a system gets onto world storage for the duration
//! of one update call: filtered iteration over the entities matching the
//! system's declared kind set, component access scoped to that
//! declaration, and the secondary surface (entity creation, messaging,
//! capacity hints) with the same contracts as on the world itself.

use super::component::{Component, ComponentMask};
use super::entity::EntityHandle;
use super::storage::{Bundle, Storage};
use super::system::{Access, Receive};
use super::world::{message_system, SystemEntry};

/// Capability-scoped window over world storage, handed to a system for
/// one update call.
///
/// The view's declared kind set is fixed for its lifetime. Reads are
/// allowed on every declared kind, writes only on the declared primary
/// kind; touching anything else is a precondition violation (checked
/// under the `validate` feature).
pub struct WorldView<'w> {
    storage: &'w mut Storage,
    systems: &'w [SystemEntry],
    access: Access,
}

impl<'w> WorldView<'w> {
    pub(crate) fn new(
        storage: &'w mut Storage,
        systems: &'w [SystemEntry],
        access: Access,
    ) -> Self {
        Self {
            storage,
            systems,
            access,
        }
    }

    /// Starts a fresh traversal over the entities matching this view's
    /// declared kind set, in ascending slot order.
    ///
    /// The returned cursor revalidates against live storage on every
    /// advance, so entities created during the traversal become visible
    /// if their slot lies ahead of the cursor; slots already passed are
    /// not revisited.
    #[must_use]
    pub fn entities(&self) -> Entities {
        Entities {
            next: 0,
            required: self.access.filter(),
        }
    }

    /// Creates an entity owning exactly the bundle's kinds.
    ///
    /// Same contract as [`World::create_entity`](super::world::World::create_entity),
    /// on the same storage, except the bundle's kinds must lie inside this
    /// view's declared set.
    pub fn create_entity<B: Bundle>(&mut self, bundle: B) -> EntityHandle {
        validate!(
            self.access.filter().contains_all(B::mask()),
            "system creates entity with kinds outside its declared set"
        );
        self.storage.create_entity(bundle)
    }

    /// Destroys an entity.
    ///
    /// Destroying the entity the caller's cursor currently points at is
    /// safe; advancing a cursor positioned *on* a just-destroyed slot is
    /// the caller's responsibility to avoid.
    pub fn destroy_entity(&mut self, entity: EntityHandle) {
        self.storage.destroy_entity(entity);
    }

    /// Reads a component of a declared kind.
    pub fn component<C: Component>(&self, entity: EntityHandle) -> &C {
        validate!(
            self.access.filter().contains(C::ID),
            "system reads undeclared component kind {}",
            std::any::type_name::<C>()
        );
        self.storage.component::<C>(entity)
    }

    /// Mutably accesses the declared primary kind.
    pub fn component_mut<C: Component>(&mut self, entity: EntityHandle) -> &mut C {
        validate!(
            self.access.primary == Some(C::ID),
            "system writes component kind {} which is not its primary",
            std::any::type_name::<C>()
        );
        self.storage.component_mut::<C>(entity)
    }

    /// Checks whether the entity owns kind `C`.
    #[must_use]
    pub fn has<C: Component>(&self, entity: EntityHandle) -> bool {
        self.storage.has::<C>(entity)
    }

    /// Checks whether the entity owns every kind in `kinds`.
    #[must_use]
    pub fn has_all(&self, entity: EntityHandle, kinds: ComponentMask) -> bool {
        self.storage.has_all(entity, kinds)
    }

    /// Adds a component the entity does not yet own.
    ///
    /// Unlike reads and removals, `add` may introduce any kind declared by
    /// the *world*: a system is allowed to hand an entity off to kinds it
    /// cannot itself read back.
    pub fn add<C: Component>(&mut self, entity: EntityHandle, value: C) {
        self.storage.add(entity, value);
    }

    /// Removes a component of a declared kind; its pool slot goes back on
    /// the kind's free list.
    pub fn remove<C: Component>(&mut self, entity: EntityHandle) {
        validate!(
            self.access.filter().contains(C::ID),
            "system removes undeclared component kind {}",
            std::any::type_name::<C>()
        );
        self.storage.remove::<C>(entity);
    }

    /// Checks that `entity` is live and not recycled.
    #[must_use]
    pub fn contains(&self, entity: EntityHandle) -> bool {
        self.storage.store.is_live(entity)
    }

    /// Sends a message to system `S`, synchronously.
    ///
    /// Same contract as [`World::message`](super::world::World::message).
    ///
    /// # Panics
    ///
    /// Panics if `S` is not registered, or if `S` is the system currently
    /// inside its own update call (reentrancy).
    pub fn message<S, M>(&self, payload: M)
    where
        S: Receive<M>,
    {
        message_system::<S, M>(self.systems, payload);
    }

    /// Guarantees `additional` further entity creations without entity
    /// storage reallocation.
    pub fn reserve_entities(&mut self, additional: usize) {
        self.storage.store.reserve(additional);
    }

    /// Guarantees `additional` further `C` assignments without pool
    /// reallocation.
    pub fn reserve_components<C: Component>(&mut self, additional: usize) {
        self.storage.registry.pool_mut::<C>().reserve_slots(additional);
    }
}

/// Restartable forward cursor over the entities matching a view's kind
/// set.
///
/// Not an `Iterator`: each advance takes the view by reference, so the
/// caller is free to mutate components (or create and destroy entities)
/// between advances. The sequence is finite (bounded by the store size
/// observed at each advance) and yields handles in ascending slot order.
pub struct Entities {
    next: u32,
    required: ComponentMask,
}

impl Entities {
    /// Advances to the next live entity owning every required kind.
    ///
    /// Slots that stopped matching since the cursor was created are
    /// skipped; the cursor never yields the same slot twice.
    pub fn next(&mut self, view: &WorldView<'_>) -> Option<EntityHandle> {
        while (self.next as usize) < view.storage.store.slot_count() {
            let index = self.next;
            self.next += 1;
            if let Some(handle) = view.storage.store.matching(index, self.required) {
                return Some(handle);
            }
        }
        None
    }
}
