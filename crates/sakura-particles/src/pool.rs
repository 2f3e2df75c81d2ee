//! Particle pools: fixed-size for recycled particles, growable for
//! short-lived ones

/// Something that eventually expires and leaves its pool
pub trait Transient {
    fn is_alive(&self) -> bool;
}

/// An ordered pool whose size is fixed at construction.
///
/// Particles never leave; they are reset in place, so iteration (and draw)
/// order is stable for the life of the pool.
#[derive(Clone, Debug)]
pub struct FixedPool<T> {
    items: Vec<T>,
}

impl<T> Default for FixedPool<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T> FixedPool<T> {
    /// Fill a pool with `count` particles built by `make`
    pub fn from_fn(count: usize, make: impl FnMut() -> T) -> Self {
        let mut make = make;
        let mut items = Vec::with_capacity(count);
        for _ in 0..count {
            items.push(make());
        }
        Self { items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.items.iter_mut()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }
}

/// A growable pool of transient particles.
///
/// New particles append at the back, `prune` drops expired ones while keeping
/// the survivors in order. Nothing is recycled.
#[derive(Clone, Debug)]
pub struct TransientPool<T> {
    items: Vec<T>,
    capacity: usize,
}

impl<T: Transient> TransientPool<T> {
    /// `capacity` bounds how many live particles the pool accepts
    pub fn new(capacity: usize) -> Self {
        Self {
            items: Vec::new(),
            capacity,
        }
    }

    /// Add a particle. Returns false (and drops it) when the pool is full.
    pub fn push(&mut self, item: T) -> bool {
        if self.items.len() >= self.capacity {
            return false;
        }
        self.items.push(item);
        true
    }

    /// Remove expired particles, returning how many were removed
    pub fn prune(&mut self) -> usize {
        let before = self.items.len();
        self.items.retain(|item| item.is_alive());
        before - self.items.len()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.items.iter_mut()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}
