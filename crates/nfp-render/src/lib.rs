//! # nfp-render — Help and Summary Rendering
//!
//! Pure rendering over a loaded schema model and the live parameter set:
//!
//! - [`help`]: grouped, column-aligned help text with hidden-parameter
//!   suppression and description wrapping.
//! - [`summary`]: the parameters that differ from their schema defaults,
//!   preceded by the run's core options.
//!
//! Nothing here fails: an unreadable schema degrades to an empty model and
//! is logged by `nfp-schema`.

pub mod colors;
pub mod help;
pub mod summary;

pub use colors::LogColors;
pub use help::{params_help, render_help};
pub use summary::{params_summary_log, params_summary_map, render_summary_log, summarize, SummaryMap, CORE_OPTIONS_TITLE};
