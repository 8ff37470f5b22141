//! CLI infrastructure for the `qttt` binary
//!
//! This module provides the command-line interface for training, playing
//! against, inspecting and clearing the per-difficulty value tables.

pub mod commands;
pub mod config;
pub mod output;
