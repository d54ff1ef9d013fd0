// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use parkdesk_domain::{
    DomainError, ImageRef, MobileNumber, VehicleId, VehicleRecord, validate_shared_mobile,
};
use std::collections::HashSet;

/// The vehicles chosen for a bulk operation.
///
/// Every selected id refers to a record in the loaded list. Selected ids and
/// the derived image list are kept in loaded-list order, so toggling an id
/// twice restores both exactly.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    loaded: Vec<VehicleRecord>,
    chosen: HashSet<VehicleId>,
    ordered: Vec<VehicleId>,
    images: Vec<ImageRef>,
}

impl Selection {
    /// Creates an empty selection over an empty list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the loaded records.
    #[must_use]
    pub fn loaded(&self) -> &[VehicleRecord] {
        &self.loaded
    }

    /// Returns the selected ids in loaded-list order.
    #[must_use]
    pub fn ids(&self) -> &[VehicleId] {
        &self.ordered
    }

    /// Returns the registered images of the selected vehicles.
    #[must_use]
    pub fn images(&self) -> &[ImageRef] {
        &self.images
    }

    /// Returns whether nothing is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    /// Returns the number of selected vehicles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    /// Returns whether `id` is selected.
    #[must_use]
    pub fn contains(&self, id: &VehicleId) -> bool {
        self.chosen.contains(id)
    }

    /// Returns whether every loaded vehicle is selected.
    #[must_use]
    pub fn is_all_selected(&self) -> bool {
        !self.loaded.is_empty() && self.ordered.len() == self.loaded.len()
    }

    /// Iterates over the selected records in loaded-list order.
    pub fn selected_records(&self) -> impl Iterator<Item = &VehicleRecord> {
        self.loaded
            .iter()
            .filter(|record| self.chosen.contains(&record.id))
    }

    /// Returns the mobile number shared by every selected vehicle.
    ///
    /// # Errors
    ///
    /// Returns an error if nothing is selected or the numbers diverge.
    pub fn shared_mobile(&self) -> Result<MobileNumber, DomainError> {
        validate_shared_mobile(self.selected_records())
    }

    /// Adds `id` if absent, removes it if present.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::UnknownVehicle` if `id` is not in the loaded list.
    pub fn toggle(&mut self, id: &VehicleId) -> Result<(), DomainError> {
        if !self.loaded.iter().any(|record| &record.id == id) {
            return Err(DomainError::UnknownVehicle(id.clone()));
        }

        if !self.chosen.remove(id) {
            self.chosen.insert(id.clone());
        }
        self.recompute();
        Ok(())
    }

    /// Selects every loaded vehicle. Returns whether the selection changed.
    pub fn select_all(&mut self) -> bool {
        if self.loaded.is_empty() || self.is_all_selected() {
            return false;
        }
        self.chosen = self
            .loaded
            .iter()
            .map(|record| record.id.clone())
            .collect();
        self.recompute();
        true
    }

    /// Deselects everything. Returns whether the selection changed.
    pub fn clear_all(&mut self) -> bool {
        if self.chosen.is_empty() {
            return false;
        }
        self.chosen.clear();
        self.recompute();
        true
    }

    /// Clears the selection if everything is selected, else selects everything.
    ///
    /// Returns whether the selection changed.
    pub fn toggle_all(&mut self) -> bool {
        if self.is_all_selected() {
            self.clear_all()
        } else {
            self.select_all()
        }
    }

    /// Replaces the loaded list, dropping selected ids that are no longer
    /// present. Returns whether the selection changed.
    pub fn replace_loaded(&mut self, records: Vec<VehicleRecord>) -> bool {
        self.loaded = records;
        let before: usize = self.chosen.len();
        let present: HashSet<&VehicleId> = self.loaded.iter().map(|record| &record.id).collect();
        self.chosen.retain(|id| present.contains(id));
        let pruned: bool = self.chosen.len() != before;

        let previous_images: Vec<ImageRef> = std::mem::take(&mut self.images);
        self.recompute();
        pruned || previous_images != self.images
    }

    fn recompute(&mut self) {
        self.ordered = self
            .loaded
            .iter()
            .filter(|record| self.chosen.contains(&record.id))
            .map(|record| record.id.clone())
            .collect();
        self.images = self
            .loaded
            .iter()
            .filter(|record| self.chosen.contains(&record.id))
            .filter_map(VehicleRecord::registered_image)
            .cloned()
            .collect();
    }
}
