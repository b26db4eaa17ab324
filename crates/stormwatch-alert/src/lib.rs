//! Alert evaluation engine for weather snapshots.
//!
//! The engine evaluates each incoming [`stormwatch_common::types::WeatherSnapshot`]
//! against the threshold rules configured for its location and emits
//! [`stormwatch_common::types::TriggeredAlert`] events. Two suppression
//! layers sit in front of every rule: a global quiet-hours window and a
//! per-rule cooldown that prevents the same rule from firing more than once
//! within the cooldown period.
//!
//! The engine performs no I/O. A caller (the polling daemon) drives it once
//! per (location, snapshot) pair and forwards the returned events to the
//! notification and storage layers.

pub mod config;
pub mod cooldown;
pub mod engine;
pub mod evaluator;
pub mod quiet;

#[cfg(test)]
mod tests;
