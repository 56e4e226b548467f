//! # ECS World
//!
//! The owner of all storage and the fixed system schedule. Worlds are
//! assembled through [`WorldBuilder`]: declare the component kinds,
//! register the systems in update order, then `build()`. Every structural
//! invariant (kind uniqueness, capability subsets, system uniqueness) is
//! checked once, there, and never again at use time.

use std::any::{type_name, TypeId};
use std::cell::RefCell;

use super::component::{Component, ComponentMask, MAX_COMPONENTS};
use super::entity::EntityHandle;
use super::error::{WorldError, WorldResult};
use super::storage::{Bundle, ComponentRegistry, KindSpec, Storage};
use super::system::{Access, Receive, System};
use super::view::WorldView;

/// A registered system: the boxed instance plus everything the scheduler
/// needs without borrowing it (name, concrete type, declared access).
///
/// Instances sit in `RefCell`s so a view can message *other* systems while
/// one is mid-update; the scheduling itself is strictly sequential.
pub(crate) struct SystemEntry {
    pub(crate) name: &'static str,
    pub(crate) type_id: TypeId,
    pub(crate) access: Access,
    pub(crate) cell: RefCell<Box<dyn System>>,
}

/// Synchronous by-type message dispatch, shared by [`World::message`] and
/// [`WorldView::message`].
pub(crate) fn message_system<S, M>(systems: &[SystemEntry], payload: M)
where
    S: Receive<M>,
{
    let target = TypeId::of::<S>();
    let Some(entry) = systems.iter().find(|entry| entry.type_id == target) else {
        panic!(
            "message target {} is not registered in this world",
            type_name::<S>()
        );
    };
    let mut system = entry.cell.borrow_mut();
    match system.as_any_mut().downcast_mut::<S>() {
        Some(system) => system.receive(payload),
        None => unreachable!("system entry type mismatch for {}", type_name::<S>()),
    }
}

/// The central container: entity store, component pools, and the ordered
/// system list.
///
/// All storage is exclusively owned here. Handles and views are scoped,
/// non-owning borrows; nothing escapes the world's lifetime.
///
/// # Example
///
/// ```rust,ignore
/// let mut world = World::builder()
///     .component::<Position>()
///     .component::<Velocity>()
///     .system(MoveSys::default())
///     .build()?;
///
/// let entity = world.create_entity((Position::ORIGIN, Velocity::new(1.0, 0.0)));
/// world.update();
/// assert!(world.contains(entity));
/// ```
pub struct World {
    storage: Storage,
    systems: Vec<SystemEntry>,
}

impl World {
    /// Starts building a world.
    #[must_use]
    pub fn builder() -> WorldBuilder {
        WorldBuilder::default()
    }

    /// Creates an entity owning exactly the bundle's kinds and returns its
    /// handle.
    ///
    /// Entity slots and pool slots are recycled from their free lists when
    /// available (most recently freed first); storage grows only when no
    /// freed slot exists.
    pub fn create_entity<B: Bundle>(&mut self, bundle: B) -> EntityHandle {
        self.storage.create_entity(bundle)
    }

    /// Destroys an entity: all of its pool slots and its entity slot go
    /// back onto their free lists for reuse.
    ///
    /// Handles to the entity become stale; further use fails fast under
    /// the `validate` feature.
    pub fn destroy_entity(&mut self, entity: EntityHandle) {
        self.storage.destroy_entity(entity);
    }

    /// Reads a component.
    ///
    /// # Panics
    ///
    /// Violating a precondition (dead/stale handle, kind not owned) fails
    /// fast under the `validate` feature; without it the result is
    /// unspecified.
    pub fn component<C: Component>(&self, entity: EntityHandle) -> &C {
        self.storage.component::<C>(entity)
    }

    /// Mutably accesses a component. Same contract as [`Self::component`].
    pub fn component_mut<C: Component>(&mut self, entity: EntityHandle) -> &mut C {
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
    pub fn add<C: Component>(&mut self, entity: EntityHandle, value: C) {
        self.storage.add(entity, value);
    }

    /// Removes a component the entity owns; its pool slot goes back on the
    /// kind's free list.
    pub fn remove<C: Component>(&mut self, entity: EntityHandle) {
        self.storage.remove::<C>(entity);
    }

    /// Checks that `entity` is live and not recycled. Works in every build
    /// configuration (the generation check is part of the handle, not of
    /// the `validate` feature).
    #[must_use]
    pub fn contains(&self, entity: EntityHandle) -> bool {
        self.storage.store.is_live(entity)
    }

    /// Number of live entities.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.storage.store.alive_count()
    }

    /// Checks whether no entity is live.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Forward scan over all live entities, in ascending slot order.
    pub fn entities(&self) -> impl Iterator<Item = EntityHandle> + '_ {
        self.storage.store.iter_live()
    }

    /// Current slot-array length of kind `C`'s pool (occupied plus
    /// vacated). A diagnostic counterpart to [`Self::reserve_components`]:
    /// steady-state churn keeps this constant.
    #[must_use]
    pub fn component_slots<C: Component>(&self) -> usize {
        self.storage.registry.pool::<C>().slot_count()
    }

    /// Guarantees `additional` further entity creations without entity
    /// storage reallocation. Purely an optimization hint; no observable
    /// behavior change.
    pub fn reserve_entities(&mut self, additional: usize) {
        self.storage.store.reserve(additional);
    }

    /// Guarantees `additional` further `C` assignments without pool
    /// reallocation. Purely an optimization hint; no observable behavior
    /// change.
    pub fn reserve_components<C: Component>(&mut self, additional: usize) {
        self.storage.registry.pool_mut::<C>().reserve_slots(additional);
    }

    /// Runs one update: every system exactly once, strictly in
    /// registration order, each against a fresh view scoped to its
    /// declared access. A system's update call runs to completion before
    /// the next system starts.
    pub fn update(&mut self) {
        let Self { storage, systems } = self;
        let systems: &[SystemEntry] = systems;
        for entry in systems {
            tracing::trace!(system = entry.name, "system update");
            let mut view = WorldView::new(&mut *storage, systems, entry.access);
            entry.cell.borrow_mut().update(&mut view);
        }
    }

    /// Sends `payload` to the registered instance of system `S`,
    /// synchronously: `S`'s [`Receive::receive`] for this payload type has
    /// completed when this returns.
    ///
    /// # Panics
    ///
    /// Panics if `S` is not registered in this world.
    pub fn message<S, M>(&mut self, payload: M)
    where
        S: Receive<M>,
    {
        message_system::<S, M>(&self.systems, payload);
    }
}

/// Builder for [`World`]: the declared component-kind set and the ordered
/// system list, validated as a whole by [`build`](Self::build).
#[derive(Default)]
pub struct WorldBuilder {
    kinds: Vec<KindSpec>,
    systems: Vec<SystemEntry>,
}

impl WorldBuilder {
    /// Declares component kind `C`.
    #[must_use]
    pub fn component<C: Component>(mut self) -> Self {
        self.kinds.push(KindSpec::of::<C>());
        self
    }

    /// Registers a system. Update order is registration order.
    #[must_use]
    pub fn system<S: System>(mut self, system: S) -> Self {
        self.systems.push(SystemEntry {
            name: type_name::<S>(),
            type_id: TypeId::of::<S>(),
            access: system.access(),
            cell: RefCell::new(Box::new(system)),
        });
        self
    }

    /// Validates the configuration and produces the world.
    ///
    /// # Errors
    ///
    /// Fails outright, producing no world, on any structural defect:
    /// duplicate component kinds or types, more kinds than
    /// [`MAX_COMPONENTS`], a system whose declared access lies outside the
    /// declared kind set, or a system type registered twice.
    pub fn build(self) -> WorldResult<World> {
        if self.kinds.len() > MAX_COMPONENTS {
            return Err(WorldError::ComponentLimitExceeded {
                count: self.kinds.len(),
                limit: MAX_COMPONENTS,
            });
        }

        let mut declared = ComponentMask::EMPTY;
        let mut kind_types: Vec<TypeId> = Vec::with_capacity(self.kinds.len());
        for spec in &self.kinds {
            if declared.contains(spec.id) || kind_types.contains(&spec.type_id) {
                return Err(WorldError::DuplicateComponent {
                    name: spec.name,
                    id: spec.id,
                });
            }
            declared.insert(spec.id);
            kind_types.push(spec.type_id);
        }

        for (position, entry) in self.systems.iter().enumerate() {
            if self.systems[..position]
                .iter()
                .any(|other| other.type_id == entry.type_id)
            {
                return Err(WorldError::DuplicateSystem { name: entry.name });
            }
            if let Some(component) = entry
                .access
                .filter()
                .iter()
                .find(|id| !declared.contains(*id))
            {
                return Err(WorldError::UndeclaredComponent {
                    system: entry.name,
                    component,
                });
            }
        }

        tracing::debug!(
            components = self.kinds.len(),
            systems = self.systems.len(),
            "world constructed"
        );

        Ok(World {
            storage: Storage::new(ComponentRegistry::new(self.kinds)),
            systems: self.systems,
        })
    }
}
