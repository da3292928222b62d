//! User tools and commands.
//!
//! The presentation layer drives the engine exclusively through these
//! commands; clicking a plot dispatches on the selected tool.

use garden_common::PlotId;
use serde::{Deserialize, Serialize};

use crate::plants::Species;

/// Tool the user holds when clicking a plot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tool {
    /// Plant a seed of a species on an empty plot.
    Seed(Species),
    /// Water a plot.
    WateringCan,
    /// Apply organic fertilizer.
    OrganicFertilizer,
    /// Apply chemical fertilizer (kills bees).
    ChemicalFertilizer,
    /// Harvest a grown plant.
    Harvest,
    /// Hand-pollinate: first click picks the source, second the target.
    Pollinate,
}

impl Tool {
    /// Get the display name of this tool.
    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Seed(_) => "Sementes",
            Self::WateringCan => "Regador",
            Self::OrganicFertilizer => "Adubo Orgânico",
            Self::ChemicalFertilizer => "Fertilizante Químico",
            Self::Harvest => "Colheita",
            Self::Pollinate => "Pincel de Polinização",
        }
    }
}

/// User action accepted by the garden.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// Select a tool.
    SelectTool(Tool),
    /// Put the current tool away.
    ClearTool,
    /// Use the selected tool on a plot.
    ClickPlot(PlotId),
    /// Toggle manual bee mode.
    ToggleManualBees,
    /// Advance the weather forecast.
    AdvanceWeather,
    /// Dismiss the notification on screen.
    DismissNotification,
    /// Open the notification history (marks all read).
    OpenHistory,
}
