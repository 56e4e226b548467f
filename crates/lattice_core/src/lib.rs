//! # LATTICE Core Runtime
//!
//! A data-oriented runtime for mutable simulation state, organized as
//! entities (opaque identities), components (plain data attached to
//! entities), and systems (per-frame update units operating on a declared
//! subset of component kinds).
//!
//! ## Architecture Rules
//!
//! 1. **Allocation-amortized hot path** - entity and component slots are
//!    recycled through LIFO free lists; steady-state churn allocates nothing
//! 2. **Data-oriented storage** - components live in per-kind pools, not in
//!    per-entity heap objects
//! 3. **Declared capabilities** - a system only touches the component kinds
//!    it declared, checked once at world construction
//! 4. **Fixed-order scheduling** - systems run sequentially, in declared
//!    order, exactly once per update
//!
//! ## Example
//!
//! ```rust,ignore
//! use lattice_core::{Access, Component, ComponentId, System, World, WorldView};
//!
//! struct Health(u32);
//!
//! impl Component for Health {
//!     const ID: ComponentId = ComponentId::new(0);
//! }
//!
//! let mut world = World::builder()
//!     .component::<Health>()
//!     .system(RegenSys::default())
//!     .build()?;
//!
//! let entity = world.create_entity(Health(100));
//! world.update(); // runs RegenSys against a view scoped to its declaration
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod ecs;

pub use ecs::{
    Access, Bundle, Component, ComponentId, ComponentMask, Entities, EntityHandle, Receive,
    System, World, WorldBuilder, WorldError, WorldResult, WorldView, MAX_COMPONENTS,
};
