//! Command implementations for the `qttt` binary

pub mod clear;
pub mod inspect;
pub mod play;
pub mod train;
