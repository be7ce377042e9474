//! Shared CLI presentation utilities.
//!
//! This module provides reusable display and formatting functions
//! for consistent CLI output across commands.
//!
//! # Guidelines
//!
//! - Keep this module format-only: no domain transforms
//! - Domain transforms belong in core services

pub mod display;
pub mod tables;

// Re-export commonly used items
pub use display::{display_dashboard, display_order, display_restaurant, display_user, print_menu};
pub use tables::{
    format_instant, format_optional, format_time, print_separator, truncate_string,
};
