//! CLI infrastructure for the planner
//!
//! This module provides the command-line interface for solving, storing,
//! inspecting and playing with the solved tables.

pub mod commands;
pub mod output;
