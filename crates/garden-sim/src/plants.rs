//! Plant instances, the plant factory and the genetics resolver.
//!
//! This module provides:
//! - The closed set of species and how each is pollinated
//! - Plant creation with fresh, never-reused instance ids
//! - Offspring trait resolution (inbreeding depression, hybrid vigor)
//! - Harvest size classification

use garden_common::PlantId;
use serde::{Deserialize, Serialize};

/// Species that can be planted in the garden.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Species {
    /// Bee-pollinated, self-pollinates when left alone.
    Pumpkin,
    /// Wind-pollinated.
    Corn,
    /// Bee-pollinated; its flowers attract bees.
    Sunflower,
    /// Bee-pollinated and self-incompatible.
    Apple,
    /// Autogamous nitrogen fixer.
    Bean,
}

/// How a species gets pollinated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PollinationMode {
    /// Bees carry pollen between plants of the species.
    Bees,
    /// Wind pairs plants while the weather is windy.
    Wind,
    /// The plant pollinates itself.
    Autogamous,
}

impl Species {
    /// Get all species.
    #[must_use]
    pub const fn all() -> [Self; 5] {
        [
            Self::Pumpkin,
            Self::Corn,
            Self::Sunflower,
            Self::Apple,
            Self::Bean,
        ]
    }

    /// Get the display name of this species.
    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Pumpkin => "Abóbora",
            Self::Corn => "Milho",
            Self::Sunflower => "Girassol",
            Self::Apple => "Maçã",
            Self::Bean => "Feijão",
        }
    }

    /// Get the pollination mode of this species.
    #[must_use]
    pub fn pollination_mode(self) -> PollinationMode {
        match self {
            Self::Pumpkin | Self::Sunflower | Self::Apple => PollinationMode::Bees,
            Self::Corn => PollinationMode::Wind,
            Self::Bean => PollinationMode::Autogamous,
        }
    }

    /// Species that rejects pollen from a direct parent or child.
    #[must_use]
    pub fn is_self_incompatible(self) -> bool {
        self == Self::Apple
    }

    /// Pollinated species that fall back to selfing when left alone.
    #[must_use]
    pub fn can_self_pollinate(self) -> bool {
        matches!(self, Self::Pumpkin | Self::Sunflower)
    }

    /// Parse a species from its English or Portuguese name (case-insensitive).
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "pumpkin" | "abobora" | "abóbora" => Some(Self::Pumpkin),
            "corn" | "milho" => Some(Self::Corn),
            "sunflower" | "girassol" => Some(Self::Sunflower),
            "apple" | "maca" | "maçã" => Some(Self::Apple),
            "bean" | "feijao" | "feijão" => Some(Self::Bean),
            _ => None,
        }
    }
}

/// Growth stage of a plant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GrowthStage {
    /// Just planted, waiting for water.
    #[default]
    Sprout,
    /// Fully grown; can reproduce and be harvested.
    Grown,
}

/// Size class recorded when a plant is harvested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SizeClass {
    /// Inbred, undersized produce.
    Small,
    /// Regular produce.
    Normal,
    /// Hybrid, fertilized or boosted produce.
    Large,
}

impl SizeClass {
    /// Get all size classes.
    #[must_use]
    pub const fn all() -> [Self; 3] {
        [Self::Small, Self::Normal, Self::Large]
    }
}

/// A plant instance living on exactly one plot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plant {
    /// Unique instance id.
    pub id: PlantId,
    /// Species.
    pub species: Species,
    /// Current growth stage.
    pub stage: GrowthStage,
    /// Lineage: ids of the 0, 1 or 2 parents.
    pub parent_ids: Vec<PlantId>,
    /// Suffers from inbreeding depression.
    pub is_small: bool,
    /// Result of hybrid vigor.
    pub is_hybrid: bool,
    /// Boosted by nitrogen fixation.
    pub is_boosted: bool,
}

impl Plant {
    /// Create a freshly planted sprout with no lineage.
    #[must_use]
    pub fn new(species: Species) -> Self {
        Self::with_traits(species, Vec::new(), false, false)
    }

    /// Create a sprout with explicit lineage and traits.
    #[must_use]
    pub fn with_traits(
        species: Species,
        parent_ids: Vec<PlantId>,
        is_small: bool,
        is_hybrid: bool,
    ) -> Self {
        Self {
            id: PlantId::new(),
            species,
            stage: GrowthStage::Sprout,
            parent_ids,
            is_small,
            is_hybrid,
            is_boosted: false,
        }
    }

    /// Create the offspring of two parents (the same parent twice for selfing).
    #[must_use]
    pub fn offspring(species: Species, parents: &[PlantId], genetics: OffspringGenetics) -> Self {
        let mut parent_ids: Vec<PlantId> = Vec::with_capacity(2);
        for id in parents.iter().take(2) {
            if !parent_ids.contains(id) {
                parent_ids.push(*id);
            }
        }
        Self::with_traits(
            species,
            parent_ids,
            genetics.is_inbreeding,
            genetics.is_hybrid,
        )
    }

    /// Builder-style helper marking the plant as grown.
    #[must_use]
    pub fn grown(mut self) -> Self {
        self.stage = GrowthStage::Grown;
        self
    }

    /// Check if this plant is grown.
    #[must_use]
    pub fn is_grown(&self) -> bool {
        self.stage == GrowthStage::Grown
    }

    /// Check if `other` is a direct parent or child of this plant.
    #[must_use]
    pub fn is_direct_relative(&self, other: &Self) -> bool {
        self.parent_ids.contains(&other.id) || other.parent_ids.contains(&self.id)
    }

    /// Classify the harvest size given whether the plot was fertilized.
    #[must_use]
    pub fn harvest_size(&self, fertilized: bool) -> SizeClass {
        if self.is_hybrid || fertilized || self.is_boosted {
            SizeClass::Large
        } else if self.is_small {
            SizeClass::Small
        } else {
            SizeClass::Normal
        }
    }
}

/// Lineage-relevant view of a parent, captured when a pairing is made.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParentSnapshot {
    /// Parent instance id.
    pub id: PlantId,
    /// Parent lineage.
    pub parent_ids: Vec<PlantId>,
    /// Whether the parent is small.
    pub is_small: bool,
}

impl From<&Plant> for ParentSnapshot {
    fn from(plant: &Plant) -> Self {
        Self {
            id: plant.id,
            parent_ids: plant.parent_ids.clone(),
            is_small: plant.is_small,
        }
    }
}

/// Traits inherited by an offspring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OffspringGenetics {
    /// Parents are related (or the same plant).
    pub is_inbreeding: bool,
    /// Hybrid vigor from two small, unrelated parents.
    pub is_hybrid: bool,
}

/// Resolve the genetics of an offspring from two parents.
///
/// Inbreeding is decided first from lineage; hybrid vigor requires both
/// parents small and no inbreeding.
#[must_use]
pub fn resolve_offspring_genetics(a: &ParentSnapshot, b: &ParentSnapshot) -> OffspringGenetics {
    let is_inbreeding = a.id == b.id || b.parent_ids.contains(&a.id) || a.parent_ids.contains(&b.id);
    let is_hybrid = a.is_small && b.is_small && !is_inbreeding;
    OffspringGenetics {
        is_inbreeding,
        is_hybrid,
    }
}
