//! # Component Kinds
//!
//! Components are pure data containers with no behavior. Each component
//! type is identified by a stable small integer (its *kind*), declared by
//! the embedder and registered with the world at construction.
//!
//! Kind sets are represented as 64-bit masks, so a world supports up to
//! [`MAX_COMPONENTS`] distinct kinds.

use std::fmt;

/// Maximum number of component kinds a world can declare.
pub const MAX_COMPONENTS: usize = 64;

/// Stable identifier of a component kind (0 to [`MAX_COMPONENTS`] - 1).
///
/// Kind ids are assigned by the embedder via [`Component::ID`]. Within one
/// world's declared set they must be unique; this is checked once at world
/// construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ComponentId(u8);

impl ComponentId {
    /// Creates a component id.
    ///
    /// # Panics
    ///
    /// Panics (at compile time when used in a `const` context) if `id` is
    /// not below [`MAX_COMPONENTS`].
    #[must_use]
    pub const fn new(id: u8) -> Self {
        assert!((id as usize) < MAX_COMPONENTS, "component id out of range");
        Self(id)
    }

    /// Returns the raw kind index.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Marker trait for ECS components.
///
/// Components are plain data owned by their kind's pool; the runtime never
/// clones, defaults, or serializes them, so the only requirements are
/// thread-safety of the type itself and a declared kind id.
///
/// # Example
///
/// ```rust,ignore
/// struct Position { x: f32, y: f32 }
///
/// impl Component for Position {
///     const ID: ComponentId = ComponentId::new(0);
/// }
/// ```
pub trait Component: Send + Sync + 'static {
    /// Unique kind identifier for this component type within a world's
    /// declared set.
    const ID: ComponentId;
}

/// A set of component kinds, packed as a 64-bit mask (one bit per kind).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ComponentMask(u64);

impl ComponentMask {
    /// The empty kind set.
    pub const EMPTY: Self = Self(0);

    /// Returns the set containing exactly `id`.
    #[inline]
    #[must_use]
    pub const fn of(id: ComponentId) -> Self {
        Self(1 << id.0)
    }

    /// Returns `self` with `id` added.
    #[inline]
    #[must_use]
    pub const fn with(self, id: ComponentId) -> Self {
        Self(self.0 | (1 << id.0))
    }

    /// Adds `id` to the set.
    #[inline]
    pub fn insert(&mut self, id: ComponentId) {
        self.0 |= 1 << id.0;
    }

    /// Removes `id` from the set.
    #[inline]
    pub fn remove(&mut self, id: ComponentId) {
        self.0 &= !(1 << id.0);
    }

    /// Checks whether `id` is in the set.
    #[inline]
    #[must_use]
    pub const fn contains(self, id: ComponentId) -> bool {
        (self.0 & (1 << id.0)) != 0
    }

    /// Checks whether every kind in `other` is also in `self`.
    #[inline]
    #[must_use]
    pub const fn contains_all(self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }

    /// Checks whether the set is empty.
    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Returns the number of kinds in the set.
    #[inline]
    #[must_use]
    pub const fn len(self) -> u32 {
        self.0.count_ones()
    }

    /// Iterates over the kinds in the set, in ascending id order.
    pub fn iter(self) -> impl Iterator<Item = ComponentId> {
        let mut bits = self.0;
        std::iter::from_fn(move || {
            if bits == 0 {
                return None;
            }
            let id = bits.trailing_zeros() as u8;
            bits &= bits - 1;
            Some(ComponentId(id))
        })
    }
}
