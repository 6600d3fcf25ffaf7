//! Stable-index entity storage.
//!
//! Entities are referenced by monotonically increasing ids that are never
//! reused within a run. Removal marks a tombstone; tombstones are swept
//! between ticks so in-flight id references stay valid for the tick that
//! produced them and iteration never invalidates during add/remove.

#[derive(Debug)]
pub(crate) struct Arena<T> {
    slots: Vec<Slot<T>>,
    next_id: u32,
}

#[derive(Debug)]
struct Slot<T> {
    id: u32,
    value: Option<T>,
}

impl<T> Arena<T> {
    pub(crate) const fn new() -> Self {
        Self {
            slots: Vec::new(),
            next_id: 0,
        }
    }

    /// Inserts a value built from the id it will be stored under.
    pub(crate) fn insert_with(&mut self, build: impl FnOnce(u32) -> T) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        self.slots.push(Slot {
            id,
            value: Some(build(id)),
        });
        id
    }

    pub(crate) fn get(&self, id: u32) -> Option<&T> {
        self.index_of(id)
            .and_then(|index| self.slots[index].value.as_ref())
    }

    pub(crate) fn get_mut(&mut self, id: u32) -> Option<&mut T> {
        self.index_of(id)
            .and_then(|index| self.slots[index].value.as_mut())
    }

    /// Marks the slot as a tombstone. The id stays reserved forever.
    pub(crate) fn remove(&mut self, id: u32) {
        if let Some(index) = self.index_of(id) {
            self.slots[index].value = None;
        }
    }

    /// Live values in id order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = &T> {
        self.slots.iter().filter_map(|slot| slot.value.as_ref())
    }

    /// Mutable access to live values in id order.
    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.slots.iter_mut().filter_map(|slot| slot.value.as_mut())
    }

    /// Drops tombstones and every live value matching the predicate.
    pub(crate) fn sweep(&mut self, mut dead: impl FnMut(&T) -> bool) {
        self.slots
            .retain(|slot| slot.value.as_ref().is_some_and(|value| !dead(value)));
    }

    fn index_of(&self, id: u32) -> Option<usize> {
        self.slots
            .binary_search_by_key(&id, |slot| slot.id)
            .ok()
    }
}
