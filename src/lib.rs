//! Likert: Survey Analysis Library
//!
//! Turns loosely-typed survey answers into descriptive statistics, a
//! respondent-aligned correlation matrix, paired t-tests on detected pre/post
//! questions and an importance-performance classification.

pub mod cli;
pub mod pipeline;
pub mod report;
pub mod utils;
