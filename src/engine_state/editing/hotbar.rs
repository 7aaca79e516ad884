//! Hotbar material selection.

use crate::engine_state::voxels::block::Material;

/// Ordered material slots with one selected slot.
#[derive(Debug, Clone)]
pub struct Hotbar {
    slots: Vec<Material>,
    selected: usize,
}

impl Hotbar {
    /// Creates a hotbar with the first slot selected.
    ///
    /// An empty slot list falls back to every material.
    pub fn new(slots: Vec<Material>) -> Self {
        let slots = if slots.is_empty() {
            Material::all().to_vec()
        } else {
            slots
        };
        Self { slots, selected: 0 }
    }

    pub fn slots(&self) -> &[Material] {
        &self.slots
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    /// The material new blocks are placed with.
    pub fn selected(&self) -> Material {
        self.slots[self.selected]
    }

    /// Selects a slot; out-of-range indices are ignored.
    ///
    /// # Returns
    /// `true` if the selection changed to `index`
    pub fn select(&mut self, index: usize) -> bool {
        if index >= self.slots.len() {
            return false;
        }
        self.selected = index;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_follows_valid_indices_only() {
        let mut hotbar = Hotbar::new(vec![Material::Wood, Material::Stone, Material::Grass]);
        assert_eq!(hotbar.selected(), Material::Wood);

        assert!(hotbar.select(2));
        assert_eq!(hotbar.selected(), Material::Grass);

        assert!(!hotbar.select(3));
        assert_eq!(hotbar.selected_index(), 2);
    }

    #[test]
    fn empty_hotbar_offers_every_material() {
        let hotbar = Hotbar::new(Vec::new());
        assert_eq!(hotbar.slots().len(), Material::all().len());
    }
}
