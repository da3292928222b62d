//! Fixed-size plot grid with neighbor geometry.
//!
//! The garden is a 4×4 grid of plots indexed row-major. New sprouts are placed
//! with a two-tier policy: the first empty neighbor (NW, N, NE, W, E, SW, S,
//! SE), else the first empty plot in id order. This keeps offspring clustered
//! around their parents.

use garden_common::{GardenError, GardenResult, GridCoord, PlantId, PlotId};
use serde::{Deserialize, Serialize};

use crate::plants::{Plant, Species};

/// Grid width in plots.
pub const GRID_WIDTH: u32 = 4;
/// Grid height in plots.
pub const GRID_HEIGHT: u32 = 4;
/// Total number of plots.
pub const PLOT_COUNT: usize = (GRID_WIDTH * GRID_HEIGHT) as usize;

/// Neighbor offsets in scan order: NW, N, NE, W, E, SW, S, SE.
const NEIGHBOR_OFFSETS: [(i32, i32); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// A single garden plot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plot {
    /// Plot index.
    pub id: PlotId,
    /// Plant growing here, if any.
    pub plant: Option<Plant>,
    /// Soil is watered.
    pub is_watered: bool,
    /// Organic fertilizer applied.
    pub organic_fertilizer: bool,
    /// Chemical fertilizer (pesticide) applied.
    pub chemical_fertilizer: bool,
    /// Green manure from a harvested bean.
    pub green_manure: bool,
}

impl Plot {
    /// Create an empty, dry plot.
    #[must_use]
    pub fn new(id: PlotId) -> Self {
        Self {
            id,
            plant: None,
            is_watered: false,
            organic_fertilizer: false,
            chemical_fertilizer: false,
            green_manure: false,
        }
    }

    /// Check if no plant occupies this plot.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.plant.is_none()
    }

    /// Check if any fertilizer (or its green-manure equivalent) is present.
    #[must_use]
    pub fn is_fertilized(&self) -> bool {
        self.organic_fertilizer || self.chemical_fertilizer || self.green_manure
    }

    /// Check if this plot holds exactly the given plant instance.
    #[must_use]
    pub fn holds(&self, id: PlantId) -> bool {
        self.plant.as_ref().is_some_and(|plant| plant.id == id)
    }

    /// Reset after harvest: remove the plant and all soil amendments.
    ///
    /// Returns the removed plant.
    pub fn reset(&mut self, keep_watered: bool) -> Option<Plant> {
        let plant = self.plant.take();
        self.is_watered = keep_watered;
        self.organic_fertilizer = false;
        self.chemical_fertilizer = false;
        self.green_manure = false;
        plant
    }
}

/// The garden's plot grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    plots: Vec<Plot>,
}

impl Default for Grid {
    fn default() -> Self {
        Self::new()
    }
}

impl Grid {
    /// Create an empty 4×4 grid.
    #[must_use]
    pub fn new() -> Self {
        Self {
            plots: (0..PLOT_COUNT).map(|i| Plot::new(PlotId::new(i))).collect(),
        }
    }

    /// Number of plots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.plots.len()
    }

    /// Check if the grid has no plots.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.plots.is_empty()
    }

    /// Validate a plot id.
    pub fn check(&self, id: PlotId) -> GardenResult<PlotId> {
        if id.index() < self.plots.len() {
            Ok(id)
        } else {
            Err(GardenError::PlotOutOfBounds {
                plot: id,
                size: self.plots.len(),
            })
        }
    }

    /// Get a plot.
    pub fn plot(&self, id: PlotId) -> GardenResult<&Plot> {
        self.check(id)?;
        Ok(&self.plots[id.index()])
    }

    /// Get a mutable plot.
    pub fn plot_mut(&mut self, id: PlotId) -> GardenResult<&mut Plot> {
        self.check(id)?;
        Ok(&mut self.plots[id.index()])
    }

    /// Get the plant on a plot, if any (out-of-range ids yield `None`).
    #[must_use]
    pub fn plant(&self, id: PlotId) -> Option<&Plant> {
        self.plots.get(id.index())?.plant.as_ref()
    }

    /// Get a mutable plant on a plot.
    pub fn plant_mut(&mut self, id: PlotId) -> Option<&mut Plant> {
        self.plots.get_mut(id.index())?.plant.as_mut()
    }

    /// Get the plant on a plot only if it is the given instance.
    #[must_use]
    pub fn plant_if(&self, plot: PlotId, id: PlantId) -> Option<&Plant> {
        self.plant(plot).filter(|plant| plant.id == id)
    }

    /// Get the plant on a plot mutably only if it is the given instance.
    pub fn plant_if_mut(&mut self, plot: PlotId, id: PlantId) -> Option<&mut Plant> {
        self.plant_mut(plot).filter(|plant| plant.id == id)
    }

    /// Check if a plot exists and is empty.
    #[must_use]
    pub fn is_empty_plot(&self, id: PlotId) -> bool {
        self.plots.get(id.index()).is_some_and(Plot::is_empty)
    }

    /// Iterate over all plots in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Plot> {
        self.plots.iter()
    }

    /// Iterate mutably over all plots in id order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Plot> {
        self.plots.iter_mut()
    }

    /// Iterate over `(plot, plant)` pairs in id order.
    pub fn plants(&self) -> impl Iterator<Item = (PlotId, &Plant)> {
        self.plots
            .iter()
            .filter_map(|plot| plot.plant.as_ref().map(|plant| (plot.id, plant)))
    }

    /// Grown plants of a species, in id order.
    #[must_use]
    pub fn grown_of(&self, species: Species) -> Vec<(PlotId, &Plant)> {
        self.plants()
            .filter(|(_, plant)| plant.species == species && plant.is_grown())
            .collect()
    }

    /// Ids of empty plots in ascending order.
    #[must_use]
    pub fn empty_plots(&self) -> Vec<PlotId> {
        self.plots
            .iter()
            .filter(|plot| plot.is_empty())
            .map(|plot| plot.id)
            .collect()
    }

    /// Ids of occupied plots in ascending order.
    #[must_use]
    pub fn occupied_plots(&self) -> Vec<PlotId> {
        self.plots
            .iter()
            .filter(|plot| !plot.is_empty())
            .map(|plot| plot.id)
            .collect()
    }

    /// Find the plot holding a plant instance.
    #[must_use]
    pub fn find_plant(&self, id: PlantId) -> Option<PlotId> {
        self.plots.iter().find(|plot| plot.holds(id)).map(|plot| plot.id)
    }

    /// Check if any plot has chemical fertilizer.
    #[must_use]
    pub fn has_chemical_fertilizer(&self) -> bool {
        self.plots.iter().any(|plot| plot.chemical_fertilizer)
    }

    /// In-bounds plots at Chebyshev distance 1, in NW..SE order.
    #[must_use]
    pub fn neighbors8(&self, id: PlotId) -> Vec<PlotId> {
        let center = GridCoord::from_plot(id, GRID_WIDTH);
        NEIGHBOR_OFFSETS
            .iter()
            .filter_map(|&(d_row, d_col)| center.offset(d_row, d_col).to_plot(GRID_WIDTH, GRID_HEIGHT))
            .collect()
    }

    /// Nearest empty plot to `center`: first empty neighbor, else first empty plot.
    #[must_use]
    pub fn find_nearest_empty(&self, center: PlotId) -> Option<PlotId> {
        self.find_nearest_empty_except(center, |_| false)
    }

    /// Like [`Grid::find_nearest_empty`], skipping plots for which `excluded` holds.
    #[must_use]
    pub fn find_nearest_empty_except<F>(&self, center: PlotId, excluded: F) -> Option<PlotId>
    where
        F: Fn(PlotId) -> bool,
    {
        let free = |id: PlotId| self.is_empty_plot(id) && !excluded(id);
        self.neighbors8(center)
            .into_iter()
            .find(|&id| free(id))
            .or_else(|| self.plots.iter().map(|plot| plot.id).find(|&id| free(id)))
    }
}
