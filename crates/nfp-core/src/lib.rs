//! # nfp-core — Foundational Types for Pipeline Parameter Validation
//!
//! This crate defines the value model shared by every other crate in the
//! workspace. It depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Closed value kinds.** A supplied parameter is exactly one of the
//!    [`ParamValue`] variants. Durations, memory quantities and structured
//!    maps are normalized to their canonical string rendering before they
//!    reach the structural validator ([`ParameterSet::cleaned`]).
//!
//! 2. **Inputs are never mutated.** Cleaning produces a fresh JSON document;
//!    the caller's [`ParameterSet`] is left untouched.
//!
//! 3. **Control parameters live in the parameter set.** Ignore lists, the
//!    fail-on-unrecognized toggle, lenient mode, hidden-parameter display and
//!    monochrome output are read from reserved keys ([`control`]) and layered
//!    over a file-based [`ValidatorConfig`].
//!
//! ## Crate Policy
//!
//! - No dependencies on other `nfp-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod context;
pub mod control;
pub mod document;
pub mod error;
pub mod value;

// Re-export primary types for ergonomic imports.
pub use context::RunContext;
pub use control::{is_reserved_option, ValidationMode, ValidatorConfig};
pub use error::ParamError;
pub use value::{Duration, MemoryUnit, ParamValue, ParameterSet};
