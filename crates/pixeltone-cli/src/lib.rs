//! Pixeltone CLI library.
//!
//! File decoding and the command implementations behind the `pixeltone`
//! binary. The core crates never touch the filesystem; everything that reads
//! or writes files lives here.

pub mod commands;
pub mod input;
pub mod logging;
