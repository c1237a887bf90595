//! Command implementations for the pixeltone CLI.

pub mod analyze;
pub mod art;
pub mod crush;
pub mod effect;
pub mod image;
pub mod output;
pub mod transcribe;
