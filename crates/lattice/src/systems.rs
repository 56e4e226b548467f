//! # Demo Components & Systems
//!
//! Three component kinds and three systems: counters bounce between a
//! floor and a ceiling, carried by increment/decrement tag components that
//! the systems swap at the turnaround points.

use std::any::Any;

use lattice_core::{Access, Component, ComponentId, Receive, System, WorldView};

/// A bouncing counter value.
pub struct Counter(pub i32);

/// Marks an entity whose counter is currently climbing.
pub struct IncTag;

/// Marks an entity whose counter is currently falling.
pub struct DecTag;

impl Component for Counter {
    const ID: ComponentId = ComponentId::new(0);
}

impl Component for IncTag {
    const ID: ComponentId = ComponentId::new(1);
}

impl Component for DecTag {
    const ID: ComponentId = ComponentId::new(2);
}

/// Increments counters up to a ceiling; at the ceiling the entity is
/// handed over to [`DecSys`] by swapping its tag.
pub struct IncSys {
    ceiling: i32,
}

impl IncSys {
    /// Creates the system with its turnaround value.
    #[must_use]
    pub const fn new(ceiling: i32) -> Self {
        Self { ceiling }
    }
}

impl System for IncSys {
    fn access(&self) -> Access {
        Access::new().write::<Counter>().read::<IncTag>()
    }

    fn update(&mut self, view: &mut WorldView<'_>) {
        let mut entities = view.entities();
        while let Some(entity) = entities.next(view) {
            if view.component::<Counter>(entity).0 < self.ceiling {
                view.component_mut::<Counter>(entity).0 += 1;
            } else {
                view.remove::<IncTag>(entity);
                view.add(entity, DecTag);
            }
        }
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Decrements counters down to a floor; the mirror image of [`IncSys`].
pub struct DecSys {
    floor: i32,
}

impl DecSys {
    /// Creates the system with its turnaround value.
    #[must_use]
    pub const fn new(floor: i32) -> Self {
        Self { floor }
    }
}

impl System for DecSys {
    fn access(&self) -> Access {
        Access::new().write::<Counter>().read::<DecTag>()
    }

    fn update(&mut self, view: &mut WorldView<'_>) {
        let mut entities = view.entities();
        while let Some(entity) = entities.next(view) {
            if view.component::<Counter>(entity).0 > self.floor {
                view.component_mut::<Counter>(entity).0 -= 1;
            } else {
                view.remove::<DecTag>(entity);
                view.add(entity, IncTag);
            }
        }
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Prints every counter once per frame, one frame per line.
///
/// Accepts an `i32` message narrowing the display to that many entities;
/// delivery is synchronous, so the narrowing takes effect on the very next
/// frame.
#[derive(Default)]
pub struct DisplaySys {
    limit: Option<usize>,
}

impl System for DisplaySys {
    fn access(&self) -> Access {
        Access::new().read::<Counter>()
    }

    fn update(&mut self, view: &mut WorldView<'_>) {
        let mut line = String::new();
        let mut shown = 0usize;
        let mut entities = view.entities();
        while let Some(entity) = entities.next(view) {
            if self.limit.is_some_and(|limit| shown >= limit) {
                line.push_str(" ...");
                break;
            }
            if !line.is_empty() {
                line.push(' ');
            }
            line.push_str(&view.component::<Counter>(entity).0.to_string());
            shown += 1;
        }
        println!("{line}");
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl Receive<i32> for DisplaySys {
    fn receive(&mut self, payload: i32) {
        self.limit = usize::try_from(payload).ok();
        tracing::debug!(limit = ?self.limit, "display narrowed");
    }
}
