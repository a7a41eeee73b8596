//! In-memory, ordered cache of the pets the view is showing.
//!
//! Ids are unique within the store. Order is insertion order, except that
//! replacing a record keeps it where it was.

use tracing::{debug, warn};

use crate::types::{Pet, PetId};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PetStore {
    pets: Vec<Pet>,
}

impl PetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole contents, e.g. after a list load. When `pets`
    /// repeats an id, the first occurrence is kept.
    pub fn replace_all(&mut self, pets: Vec<Pet>) {
        self.pets.clear();
        for pet in pets {
            if self.position(pet.id).is_some() {
                warn!(id = %pet.id, "dropping duplicate pet id from list");
                continue;
            }
            self.pets.push(pet);
        }
        debug!(len = self.pets.len(), "store replaced");
    }

    /// Add `pet` at the end. A pet whose id is already present replaces the
    /// existing entry in place instead.
    pub fn append(&mut self, pet: Pet) {
        match self.position(pet.id) {
            Some(index) => {
                warn!(id = %pet.id, "append of existing id, replacing in place");
                self.pets[index] = pet;
            }
            None => {
                debug!(id = %pet.id, "pet appended");
                self.pets.push(pet);
            }
        }
    }

    /// Swap in `pet` at the position of the entry with the same id.
    /// Returns `false`, leaving the store untouched, if there is none.
    pub fn replace_by_id(&mut self, pet: Pet) -> bool {
        match self.position(pet.id) {
            Some(index) => {
                debug!(id = %pet.id, "pet replaced");
                self.pets[index] = pet;
                true
            }
            None => false,
        }
    }

    pub fn remove_by_id(&mut self, id: PetId) -> Option<Pet> {
        let index = self.position(id)?;
        debug!(%id, "pet removed");
        Some(self.pets.remove(index))
    }

    pub fn get(&self, id: PetId) -> Option<&Pet> {
        self.pets.iter().find(|p| p.id == id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Pet> {
        self.pets.iter()
    }

    pub fn as_slice(&self) -> &[Pet] {
        &self.pets
    }

    pub fn len(&self) -> usize {
        self.pets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pets.is_empty()
    }

    fn position(&self, id: PetId) -> Option<usize> {
        self.pets.iter().position(|p| p.id == id)
    }
}

impl<'a> IntoIterator for &'a PetStore {
    type Item = &'a Pet;
    type IntoIter = std::slice::Iter<'a, Pet>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
