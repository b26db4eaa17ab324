//! Shared data model for the stormwatch weather alerting service.
//!
//! Defines the [`types::WeatherSnapshot`] record produced by weather
//! providers, the [`types::Condition`] / [`types::CompareOp`] rule
//! vocabulary, and the [`types::TriggeredAlert`] event emitted by the
//! alert engine.

pub mod types;
