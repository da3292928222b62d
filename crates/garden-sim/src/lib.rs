//! # Garden Sim
//!
//! Discrete-event simulation of a 4x4 pollination garden.
//!
//! This crate provides the whole simulation model:
//! - Plot grid with 8-neighborhood geometry
//! - Plant lineage and offspring genetics (heterosis, inbreeding depression)
//! - Growth timers driven by watering and rain
//! - Weather forecast queue with weighted sampling
//! - Bee presence state machine
//! - Per-species pollination policies (bees, wind, autogamy)
//! - Notification log and visual effect descriptors
//!
//! All state lives in [`Garden`]; time only moves through
//! [`Garden::advance_by`] and [`Garden::run_until`].

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod bees;
pub mod config;
pub mod effects;
pub mod garden;
pub mod grid;
pub mod inventory;
pub mod notifications;
pub mod plants;
mod pollination;
pub mod rng;
pub mod scheduler;
pub mod snapshot;
pub mod tools;
pub mod weather;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::bees::*;
    pub use crate::config::*;
    pub use crate::effects::*;
    pub use crate::garden::Garden;
    pub use crate::grid::*;
    pub use crate::inventory::*;
    pub use crate::notifications::*;
    pub use crate::plants::*;
    pub use crate::rng::*;
    pub use crate::scheduler::*;
    pub use crate::snapshot::*;
    pub use crate::tools::*;
    pub use crate::weather::*;
    pub use garden_common::prelude::*;
}

pub use prelude::*;
