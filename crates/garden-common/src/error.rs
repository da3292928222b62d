//! Error types for the garden simulator.
//!
//! Domain rejections (no free spot, invalid pollination) are notifications,
//! not errors. These variants cover misuse of the engine API.

use thiserror::Error;

use crate::ids::PlotId;

/// Top-level error type for garden operations.
#[derive(Debug, Error)]
pub enum GardenError {
    /// Plot index outside the grid
    #[error("Plot {plot} is outside the grid of {size} plots")]
    PlotOutOfBounds {
        /// Requested plot
        plot: PlotId,
        /// Number of plots in the grid
        size: usize,
    },

    /// Plot already holds a plant
    #[error("Plot {0} is already occupied")]
    PlotOccupied(PlotId),

    /// Forecast queue of the wrong length
    #[error("Forecast must hold {expected} entries, got {actual}")]
    ForecastLength {
        /// Required length
        expected: usize,
        /// Supplied length
        actual: usize,
    },
}

/// Result type alias for garden operations.
pub type GardenResult<T> = Result<T, GardenError>;
