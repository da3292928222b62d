//! Harvest inventory.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::plants::{SizeClass, Species};

/// Harvest tally for one species and size class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HarvestCount {
    /// Plants harvested
    pub count: u32,
    /// Of those, grown under chemical fertilizer
    pub chemical: u32,
}

/// Harvested produce by species and size. Counts only ever grow.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    /// Items and their counts
    items: BTreeMap<Species, BTreeMap<SizeClass, HarvestCount>>,
}

impl Inventory {
    /// Creates an empty inventory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one harvested plant.
    pub fn add(&mut self, species: Species, size: SizeClass, chemical: bool) {
        let entry = self
            .items
            .entry(species)
            .or_default()
            .entry(size)
            .or_default();
        entry.count += 1;
        if chemical {
            entry.chemical += 1;
        }
    }

    /// Returns the tally for a species and size.
    #[must_use]
    pub fn get(&self, species: Species, size: SizeClass) -> HarvestCount {
        self.items
            .get(&species)
            .and_then(|sizes| sizes.get(&size))
            .copied()
            .unwrap_or_default()
    }

    /// Returns the total number harvested of a species.
    #[must_use]
    pub fn total(&self, species: Species) -> u32 {
        self.items
            .get(&species)
            .map_or(0, |sizes| sizes.values().map(|c| c.count).sum())
    }

    /// Returns an iterator over all non-empty tallies.
    pub fn iter(&self) -> impl Iterator<Item = (Species, SizeClass, HarvestCount)> + '_ {
        self.items.iter().flat_map(|(&species, sizes)| {
            sizes
                .iter()
                .map(move |(&size, &count)| (species, size, count))
        })
    }
}
