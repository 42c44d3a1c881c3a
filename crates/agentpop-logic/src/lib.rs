//! Pure population-configuration logic for multi-agent simulations.
//!
//! This crate turns demographic dimensions into weighted archetypes and turns
//! CSV/JSON agent files into validated agent records. It performs no I/O and
//! holds no state: functions take plain data and return new values, so the
//! same code serves a UI event loop, a CLI harness, or a batch job.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`archetypes`] | Cross-product expansion of dimensions into archetypes |
//! | [`config`] | Caller-supplied defaults and display settings |
//! | [`constants`] | Field names, separators, tolerances |
//! | [`dimensions`] | Pure add/remove/rename edits and validation |
//! | [`model`] | Dimension, Archetype, Trait, AgentRecord, ValidationReport |
//! | [`probability`] | Proportional redistribution and normalization |
//! | [`sampling`] | Head-count allocation and weighted sampling |
//! | [`tabular`] | CSV/JSON import with row validation |
//! | [`traits`] | Trait CRUD with bounds clamping |

pub mod archetypes;
pub mod config;
pub mod constants;
pub mod dimensions;
pub mod model;
pub mod probability;
pub mod sampling;
pub mod tabular;
pub mod traits;
