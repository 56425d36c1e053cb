use std::collections::HashMap;

/// Hands out numeric handles for JS objects. Ids are never reused, so a
/// released handle stays dead instead of pointing at a newer element.
#[derive(Debug)]
pub struct Registry<T> {
    entries: HashMap<usize, T>,
    next: usize,
}

impl<T> Default for Registry<T> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
            next: 0,
        }
    }
}

impl<T: PartialEq + Clone> Registry<T> {
    /// Returns the handle for `item`, and whether it was newly added.
    pub fn intern(&mut self, item: T) -> (usize, bool) {
        if let Some((id, _)) = self.entries.iter().find(|(_, known)| **known == item) {
            return (*id, false);
        }
        let id = self.next;
        self.next += 1;
        self.entries.insert(id, item);
        (id, true)
    }

    pub fn get(&self, id: usize) -> Option<T> {
        self.entries.get(&id).cloned()
    }

    pub fn release(&mut self, id: usize) -> Option<T> {
        self.entries.remove(&id)
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
