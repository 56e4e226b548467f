//! End-to-end tests of the storage and scheduling engine: slot recycling
//! order, filtered iteration, fixed-order updates, and synchronous
//! messaging, exercised through the public API only.

use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;

use lattice_core::{
    Access, Component, ComponentId, ComponentMask, EntityHandle, Receive, System, World,
    WorldView,
};

struct Counter(i32);
struct IncTag;
struct DecTag;

impl Component for Counter {
    const ID: ComponentId = ComponentId::new(0);
}

impl Component for IncTag {
    const ID: ComponentId = ComponentId::new(1);
}

impl Component for DecTag {
    const ID: ComponentId = ComponentId::new(2);
}

/// Log shared between test systems and the test body.
type Trace = Rc<RefCell<Vec<&'static str>>>;

struct TraceSys {
    label: &'static str,
    trace: Trace,
}

impl System for TraceSys {
    fn access(&self) -> Access {
        Access::new()
    }

    fn update(&mut self, _view: &mut WorldView<'_>) {
        self.trace.borrow_mut().push(self.label);
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

// Three distinct types so all can be registered in one world.
struct TraceSysB(TraceSys);
struct TraceSysC(TraceSys);

impl System for TraceSysB {
    fn access(&self) -> Access {
        self.0.access()
    }

    fn update(&mut self, view: &mut WorldView<'_>) {
        self.0.update(view);
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl System for TraceSysC {
    fn access(&self) -> Access {
        self.0.access()
    }

    fn update(&mut self, view: &mut WorldView<'_>) {
        self.0.update(view);
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

fn bare_world() -> World {
    World::builder()
        .component::<Counter>()
        .component::<IncTag>()
        .component::<DecTag>()
        .build()
        .expect("valid configuration")
}

#[test]
fn create_entity_owns_exactly_the_bundle_kinds() {
    let mut world = bare_world();
    let entity = world.create_entity((Counter(0), IncTag));

    assert!(world.has::<Counter>(entity));
    assert!(world.has::<IncTag>(entity));
    assert!(!world.has::<DecTag>(entity));
    assert!(world.has_all(
        entity,
        ComponentMask::of(Counter::ID).with(IncTag::ID)
    ));
    assert!(!world.has_all(
        entity,
        ComponentMask::of(Counter::ID).with(DecTag::ID)
    ));
}

#[test]
fn destroyed_slots_are_reused_lifo() {
    let mut world = bare_world();
    let entities: Vec<EntityHandle> =
        (0..5).map(|i| world.create_entity(Counter(i))).collect();
    assert_eq!(
        entities.iter().map(|e| e.index()).collect::<Vec<_>>(),
        vec![0, 1, 2, 3, 4]
    );

    world.destroy_entity(entities[1]);
    world.destroy_entity(entities[3]);

    // Most recently destroyed first: slot 3, then slot 1, no appending.
    let first = world.create_entity(Counter(10));
    let second = world.create_entity(Counter(11));
    assert_eq!(first.index(), 3);
    assert_eq!(second.index(), 1);
    assert_eq!(world.len(), 5);
    assert_eq!(world.component::<Counter>(first).0, 10);
}

#[test]
fn pool_does_not_grow_under_churn() {
    let mut world = bare_world();
    let entities: Vec<EntityHandle> =
        (0..4).map(|i| world.create_entity(Counter(i))).collect();
    let slots = world.component_slots::<Counter>();

    world.destroy_entity(entities[0]);
    world.destroy_entity(entities[2]);
    world.create_entity(Counter(20));
    world.create_entity(Counter(21));

    assert_eq!(world.component_slots::<Counter>(), slots);
}

#[test]
fn remove_then_add_reuses_the_released_slot() {
    let mut world = bare_world();
    let entity = world.create_entity((Counter(1), IncTag));
    let slots = world.component_slots::<IncTag>();

    world.remove::<IncTag>(entity);
    world.add(entity, IncTag);

    assert!(world.has::<IncTag>(entity));
    assert_eq!(world.component_slots::<IncTag>(), slots);
}

#[test]
fn handle_survives_until_destroy_and_not_past_recycling() {
    let mut world = bare_world();
    let original = world.create_entity(Counter(1));
    world.destroy_entity(original);
    assert!(!world.contains(original));

    // Recycles the same slot under a new generation.
    let recycled = world.create_entity(Counter(2));
    assert_eq!(recycled.index(), original.index());
    assert_ne!(recycled, original);
    assert!(world.contains(recycled));
    assert!(!world.contains(original));
}

#[cfg(feature = "validate")]
#[test]
#[should_panic(expected = "dead or stale handle")]
fn stale_handle_access_fails_fast() {
    let mut world = bare_world();
    let original = world.create_entity(Counter(1));
    world.destroy_entity(original);
    world.create_entity(Counter(2));

    // Same slot, different occupant: the stale handle must not reach it.
    let _ = world.component::<Counter>(original);
}

/// Collects the indices its view yields, once per update.
struct HarvestSys {
    seen: Rc<RefCell<Vec<u32>>>,
}

impl System for HarvestSys {
    fn access(&self) -> Access {
        Access::new().read::<Counter>().read::<IncTag>()
    }

    fn update(&mut self, view: &mut WorldView<'_>) {
        let mut entities = view.entities();
        while let Some(entity) = entities.next(view) {
            self.seen.borrow_mut().push(entity.index());
        }
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[test]
fn view_yields_matching_entities_in_ascending_order() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let mut world = World::builder()
        .component::<Counter>()
        .component::<IncTag>()
        .component::<DecTag>()
        .system(HarvestSys { seen: Rc::clone(&seen) })
        .build()
        .expect("valid configuration");

    let both_a = world.create_entity((Counter(0), IncTag));
    world.create_entity(Counter(1));
    let both_b = world.create_entity((Counter(2), IncTag));
    world.create_entity((Counter(3), DecTag));
    world.create_entity(IncTag);
    let both_c = world.create_entity((Counter(4), IncTag));

    world.update();

    assert_eq!(
        *seen.borrow(),
        vec![both_a.index(), both_b.index(), both_c.index()]
    );
}

#[test]
fn update_runs_systems_in_declared_order_exactly_once() {
    let trace: Trace = Rc::new(RefCell::new(Vec::new()));
    let mut world = World::builder()
        .system(TraceSys {
            label: "first",
            trace: Rc::clone(&trace),
        })
        .system(TraceSysB(TraceSys {
            label: "second",
            trace: Rc::clone(&trace),
        }))
        .system(TraceSysC(TraceSys {
            label: "third",
            trace: Rc::clone(&trace),
        }))
        .build()
        .expect("valid configuration");

    world.update();
    world.update();

    assert_eq!(
        *trace.borrow(),
        vec!["first", "second", "third", "first", "second", "third"]
    );
}

/// Increments counters up to a ceiling; at the ceiling it swaps the
/// increment tag for the decrement tag, within the same update call.
struct IncSys {
    ceiling: i32,
}

impl System for IncSys {
    fn access(&self) -> Access {
        Access::new().write::<Counter>().read::<IncTag>()
    }

    fn update(&mut self, view: &mut WorldView<'_>) {
        let mut entities = view.entities();
        while let Some(entity) = entities.next(view) {
            let counter = view.component_mut::<Counter>(entity);
            counter.0 += 1;
            if counter.0 >= self.ceiling {
                view.remove::<IncTag>(entity);
                view.add(entity, DecTag);
            }
        }
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[test]
fn increment_system_hits_threshold_on_third_update() {
    let mut world = World::builder()
        .component::<Counter>()
        .component::<IncTag>()
        .component::<DecTag>()
        .system(IncSys { ceiling: 3 })
        .build()
        .expect("valid configuration");

    let entity = world.create_entity((Counter(0), IncTag));

    world.update();
    world.update();
    assert_eq!(world.component::<Counter>(entity).0, 2);
    assert!(world.has::<IncTag>(entity));

    world.update();
    assert_eq!(world.component::<Counter>(entity).0, 3);
    assert!(!world.has::<IncTag>(entity));
    assert!(world.has::<DecTag>(entity));

    // Entity no longer matches the view; further updates change nothing.
    world.update();
    assert_eq!(world.component::<Counter>(entity).0, 3);
}

/// Creates one tagged entity per update, from inside the update call.
struct SpawnerSys {
    spawned: u32,
}

impl System for SpawnerSys {
    fn access(&self) -> Access {
        Access::new().write::<Counter>().read::<IncTag>()
    }

    fn update(&mut self, view: &mut WorldView<'_>) {
        let mut visited = 0;
        let mut entities = view.entities();
        while let Some(_entity) = entities.next(view) {
            visited += 1;
        }
        // One more entity each frame; visible to the next traversal.
        view.create_entity((Counter(0), IncTag));
        self.spawned += 1;
        assert_eq!(visited, self.spawned - 1);
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[test]
fn entities_created_in_update_appear_in_later_traversals() {
    let mut world = World::builder()
        .component::<Counter>()
        .component::<IncTag>()
        .system(SpawnerSys { spawned: 0 })
        .build()
        .expect("valid configuration");

    for _ in 0..4 {
        world.update();
    }
    assert_eq!(world.len(), 4);
}

/// Remembers the last payload it received.
struct EchoSys {
    heard: Rc<RefCell<Vec<i32>>>,
}

impl System for EchoSys {
    fn access(&self) -> Access {
        Access::new()
    }

    fn update(&mut self, _view: &mut WorldView<'_>) {}

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl Receive<i32> for EchoSys {
    fn receive(&mut self, payload: i32) {
        self.heard.borrow_mut().push(payload);
    }
}

#[test]
fn message_is_delivered_synchronously() {
    let heard = Rc::new(RefCell::new(Vec::new()));
    let mut world = World::builder()
        .system(EchoSys {
            heard: Rc::clone(&heard),
        })
        .build()
        .expect("valid configuration");

    world.message::<EchoSys, _>(42);
    // Handled before message() returned; nothing deferred to update().
    assert_eq!(*heard.borrow(), vec![42]);

    world.update();
    assert_eq!(*heard.borrow(), vec![42]);
}

#[test]
fn reserve_hints_change_no_observable_behavior() {
    let mut world = bare_world();
    let before = world.create_entity(Counter(1));

    world.reserve_entities(1000);
    world.reserve_components::<Counter>(1000);

    let after = world.create_entity(Counter(2));
    assert_eq!(after.index(), before.index() + 1);
    assert_eq!(world.len(), 2);
    assert_eq!(world.component::<Counter>(before).0, 1);
}

#[test]
fn live_entity_iteration_skips_destroyed_slots() {
    let mut world = bare_world();
    let entities: Vec<EntityHandle> =
        (0..5).map(|i| world.create_entity(Counter(i))).collect();
    world.destroy_entity(entities[1]);
    world.destroy_entity(entities[4]);

    let live: Vec<u32> = world.entities().map(|e| e.index()).collect();
    assert_eq!(live, vec![0, 2, 3]);
}
