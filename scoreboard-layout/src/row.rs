use crate::selection::TeamSelection;

/// What the engine is allowed to do with a mounted team row
pub trait TeamRowHandle {
    /// Acts like the user clicking the row: it toggles and reports the click to `selection`
    fn handle_click(&mut self, selection: &mut TeamSelection);

    /// Expands the row. Opening a row that is already expanded does nothing.
    fn open(&mut self);
}

/// One slot per scoreboard position, filled as rows are mounted
#[derive(Debug)]
pub struct RowSlots<R> {
    slots: Vec<Option<R>>,
}

impl<R> Default for RowSlots<R> {
    fn default() -> Self {
        Self { slots: Vec::new() }
    }
}

impl<R> RowSlots<R> {
    /// Drops every mounted row and leaves `len` empty slots
    pub fn reset(&mut self, len: usize) {
        self.slots.clear();
        self.slots.resize_with(len, || None);
    }

    /// Stores the row shown at `index`, growing the slots if needed
    pub fn mount(&mut self, index: usize, row: R) {
        if index >= self.slots.len() {
            self.slots.resize_with(index + 1, || None);
        }
        self.slots[index] = Some(row);
    }

    pub fn unmount(&mut self, index: usize) -> Option<R> {
        self.slots.get_mut(index).and_then(Option::take)
    }

    pub fn get(&self, index: usize) -> Option<&R> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut R> {
        self.slots.get_mut(index).and_then(Option::as_mut)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn mounted_mut(&mut self) -> impl Iterator<Item = &mut R> {
        self.slots.iter_mut().flatten()
    }
}
