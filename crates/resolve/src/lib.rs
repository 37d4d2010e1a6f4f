//! `restodup-resolve`: duplicate detection engine for restaurant catalogs.
//!
//! Pure engine crate: receives pre-loaded records and gold pairs, returns
//! per-strategy evaluations and the merged catalog. The TSV helpers parse
//! and render text; reading and writing files is left to the caller.

pub mod audit;
pub mod blocking;
pub mod config;
pub mod engine;
pub mod error;
pub mod evaluate;
pub mod merge;
pub mod metrics;
pub mod model;
pub mod tsv;

pub use config::DedupConfig;
pub use engine::run;
pub use error::DedupError;
pub use model::{CandidatePair, DedupInput, DedupResult, Record, Strategy};
