//! Report module - console display and file export of analysis results

pub mod display;
pub mod export;

pub use display::*;
pub use export::*;
