//! Training pipeline modules.

pub mod counter;
pub mod trainer;
pub mod vocab;
