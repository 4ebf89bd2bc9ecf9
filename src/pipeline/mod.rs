//! Pipeline module - dataset model, loading and the analysis steps

pub mod coerce;
pub mod config;
pub mod correlation;
pub mod dataset;
pub mod descriptive;
pub mod error;
pub mod ipa;
pub mod loader;
pub mod pairing;
pub mod questions;
pub mod special;
pub mod summary;
pub mod text;
pub mod ttest;

pub use coerce::coerce_numeric;
pub use config::*;
pub use correlation::*;
pub use dataset::*;
pub use descriptive::*;
pub use error::*;
pub use ipa::*;
pub use loader::*;
pub use pairing::{detect_ipa_role, detect_timepoint, IpaRole, QuestionPair, Timepoint};
pub use questions::*;
pub use summary::*;
pub use text::*;
pub use ttest::*;
