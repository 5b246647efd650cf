// crates/dht-eval-config/src/lib.rs
// ============================================================================
// Module: DHT Eval Config Library
// Description: Canonical config model, validation, and example generation.
// Purpose: Single source of truth for dht-eval.toml semantics.
// Dependencies: dht-eval-core, dht-eval-store-sqlite, serde, toml
// ============================================================================

//! ## Overview
//! `dht-eval-config` defines the configuration model for `dht-eval`. It
//! resolves the config file, applies built-in defaults, validates every field
//! fail-closed, and converts the result into
//! [`dht_eval_core::EvaluationOptions`].

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;
pub mod examples;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
pub use examples::config_toml_example;
