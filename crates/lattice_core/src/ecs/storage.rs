//! # World Storage
//!
//! The accessor layer that ties the entity store to the component pools.
//! All component bookkeeping funnels through here so the two halves can
//! never disagree: a record entry exists exactly while the pool slot it
//! names is occupied.
//!
//! The kind registry is built once at world construction: a dense pool
//! table plus a flat id-to-dense lookup array. No per-access type-map
//! lookups, no type-list machinery.

use std::any::{type_name, TypeId};

use super::component::{Component, ComponentId, ComponentMask, MAX_COMPONENTS};
use super::entity::{EntityHandle, EntityStore};
use super::pool::{AnyPool, ComponentPool};

/// Sentinel in the id-to-dense lookup for undeclared kinds.
const DENSE_NONE: u8 = u8::MAX;

/// One declared component kind, captured at registration time.
pub(crate) struct KindSpec {
    pub(crate) id: ComponentId,
    pub(crate) type_id: TypeId,
    pub(crate) name: &'static str,
    pub(crate) pool: Box<dyn AnyPool>,
}

impl KindSpec {
    pub(crate) fn of<C: Component>() -> Self {
        Self {
            id: C::ID,
            type_id: TypeId::of::<C>(),
            name: type_name::<C>(),
            pool: Box::new(ComponentPool::<C>::new()),
        }
    }
}

/// The per-world component-kind registry: every declared kind's pool,
/// indexed densely in declaration order, plus the flat lookup from kind id
/// to dense index.
pub(crate) struct ComponentRegistry {
    pools: Vec<Box<dyn AnyPool>>,
    dense: [u8; MAX_COMPONENTS],
    declared: ComponentMask,
}

impl ComponentRegistry {
    /// Assembles the registry from validated kind specs.
    ///
    /// The caller (the world builder) has already rejected duplicates and
    /// over-long declarations.
    pub(crate) fn new(specs: Vec<KindSpec>) -> Self {
        let mut dense = [DENSE_NONE; MAX_COMPONENTS];
        let mut declared = ComponentMask::EMPTY;
        let mut pools = Vec::with_capacity(specs.len());

        for (index, spec) in specs.into_iter().enumerate() {
            dense[spec.id.index()] = index as u8;
            declared.insert(spec.id);
            pools.push(spec.pool);
        }

        Self {
            pools,
            dense,
            declared,
        }
    }

    /// Number of declared kinds.
    #[inline]
    pub(crate) fn kind_count(&self) -> usize {
        self.pools.len()
    }

    /// The declared kind set.
    #[inline]
    pub(crate) fn declared(&self) -> ComponentMask {
        self.declared
    }

    /// Dense index of `id` in the pool table.
    #[inline]
    pub(crate) fn dense_index(&self, id: ComponentId) -> usize {
        let dense = self.dense[id.index()];
        validate!(
            dense != DENSE_NONE,
            "component kind {id} is not declared in this world"
        );
        usize::from(dense)
    }

    pub(crate) fn pool<C: Component>(&self) -> &ComponentPool<C> {
        let dense = self.dense_index(C::ID);
        match self.pools[dense].as_any().downcast_ref() {
            Some(pool) => pool,
            None => unreachable!("pool kind/type mismatch for {}", type_name::<C>()),
        }
    }

    pub(crate) fn pool_mut<C: Component>(&mut self) -> &mut ComponentPool<C> {
        let dense = self.dense_index(C::ID);
        match self.pools[dense].as_any_mut().downcast_mut() {
            Some(pool) => pool,
            None => unreachable!("pool kind/type mismatch for {}", type_name::<C>()),
        }
    }

    /// Type-erased release of pool slot `slot` for the kind at `dense`.
    #[inline]
    pub(crate) fn release_slot(&mut self, dense: usize, slot: u32) {
        self.pools[dense].release(slot);
    }
}

/// All world-owned state: the entity store plus the component registry.
///
/// Not part of the public API surface; [`World`](super::world::World) and
/// [`WorldView`](super::view::WorldView) delegate every entity/component
/// operation to the methods here.
pub struct Storage {
    pub(crate) store: EntityStore,
    pub(crate) registry: ComponentRegistry,
}

impl Storage {
    pub(crate) fn new(registry: ComponentRegistry) -> Self {
        Self {
            store: EntityStore::new(registry.kind_count()),
            registry,
        }
    }

    /// Creates an entity owning exactly the bundle's kinds.
    pub(crate) fn create_entity<B: Bundle>(&mut self, bundle: B) -> EntityHandle {
        validate!(
            self.registry.declared().contains_all(B::mask()),
            "bundle contains kinds not declared in this world"
        );
        let handle = self.store.allocate();
        bundle.install(self, handle.index());
        tracing::trace!(
            entity = handle.index(),
            generation = handle.generation(),
            "entity created"
        );
        handle
    }

    /// Destroys the entity: every owned pool slot is released (back onto
    /// its kind's free list), the record is cleared, and the entity slot
    /// joins the store's free list.
    pub(crate) fn destroy_entity(&mut self, handle: EntityHandle) {
        validate!(
            self.store.is_live(handle),
            "destroy through a dead or stale handle {handle:?}"
        );
        let Self { store, registry } = self;
        let record = store.record_mut(handle.index());
        for id in record.mask().iter() {
            let dense = registry.dense_index(id);
            let slot = record.take_entry(dense, id);
            registry.release_slot(dense, slot);
        }
        store.release(handle.index());
        tracing::trace!(entity = handle.index(), "entity destroyed");
    }

    /// Assigns a pool slot for `value` and records it on the entity.
    ///
    /// Core of both `create_entity` and `add`; preconditions are the
    /// callers' business.
    pub(crate) fn install_component<C: Component>(&mut self, index: u32, value: C) {
        let dense = self.registry.dense_index(C::ID);
        let slot = self.registry.pool_mut::<C>().assign(value);
        self.store.record_mut(index).set_entry(dense, C::ID, slot);
    }

    pub(crate) fn add<C: Component>(&mut self, handle: EntityHandle, value: C) {
        validate!(
            self.store.is_live(handle),
            "add through a dead or stale handle {handle:?}"
        );
        validate!(
            !self.store.record(handle.index()).mask().contains(C::ID),
            "entity {} already has a {} component",
            handle.index(),
            type_name::<C>()
        );
        self.install_component(handle.index(), value);
    }

    pub(crate) fn remove<C: Component>(&mut self, handle: EntityHandle) {
        validate!(
            self.store.is_live(handle),
            "remove through a dead or stale handle {handle:?}"
        );
        validate!(
            self.store.record(handle.index()).mask().contains(C::ID),
            "entity {} has no {} component to remove",
            handle.index(),
            type_name::<C>()
        );
        let dense = self.registry.dense_index(C::ID);
        let slot = self.store.record_mut(handle.index()).take_entry(dense, C::ID);
        self.registry.release_slot(dense, slot);
    }

    pub(crate) fn component<C: Component>(&self, handle: EntityHandle) -> &C {
        validate!(
            self.store.is_live(handle),
            "access through a dead or stale handle {handle:?}"
        );
        let dense = self.registry.dense_index(C::ID);
        let slot = self.store.record(handle.index()).entry(dense);
        self.registry.pool::<C>().get(slot).unwrap_or_else(|| {
            panic!(
                "entity {} has no {} component",
                handle.index(),
                type_name::<C>()
            )
        })
    }

    pub(crate) fn component_mut<C: Component>(&mut self, handle: EntityHandle) -> &mut C {
        validate!(
            self.store.is_live(handle),
            "access through a dead or stale handle {handle:?}"
        );
        let dense = self.registry.dense_index(C::ID);
        let slot = self.store.record(handle.index()).entry(dense);
        self.registry.pool_mut::<C>().get_mut(slot).unwrap_or_else(|| {
            panic!(
                "entity {} has no {} component",
                handle.index(),
                type_name::<C>()
            )
        })
    }

    pub(crate) fn has<C: Component>(&self, handle: EntityHandle) -> bool {
        validate!(
            self.store.is_live(handle),
            "query through a dead or stale handle {handle:?}"
        );
        self.store.record(handle.index()).mask().contains(C::ID)
    }

    pub(crate) fn has_all(&self, handle: EntityHandle, kinds: ComponentMask) -> bool {
        validate!(
            self.store.is_live(handle),
            "query through a dead or stale handle {handle:?}"
        );
        self.store.record(handle.index()).mask().contains_all(kinds)
    }
}

/// A set of component values installed together by `create_entity`.
///
/// Implemented for any single [`Component`] and for tuples of components
/// up to arity 8. The bundle's kind set becomes the created entity's
/// initial component set.
pub trait Bundle {
    /// Kind set of this bundle.
    fn mask() -> ComponentMask;

    /// Moves each component value into storage for entity slot `index`.
    fn install(self, storage: &mut Storage, index: u32);
}

impl<C: Component> Bundle for C {
    fn mask() -> ComponentMask {
        ComponentMask::of(C::ID)
    }

    fn install(self, storage: &mut Storage, index: u32) {
        storage.install_component(index, self);
    }
}

macro_rules! tuple_bundle {
    ($($comp:ident),+) => {
        impl<$($comp: Component),+> Bundle for ($($comp,)+) {
            fn mask() -> ComponentMask {
                ComponentMask::EMPTY$(.with($comp::ID))+
            }

            fn install(self, storage: &mut Storage, index: u32) {
                #[allow(non_snake_case)]
                let ($($comp,)+) = self;
                $(storage.install_component(index, $comp);)+
            }
        }
    };
}

tuple_bundle!(A);
tuple_bundle!(A, B);
tuple_bundle!(A, B, C);
tuple_bundle!(A, B, C, D);
tuple_bundle!(A, B, C, D, E);
tuple_bundle!(A, B, C, D, E, F);
tuple_bundle!(A, B, C, D, E, F, G);
tuple_bundle!(A, B, C, D, E, F, G, H);
