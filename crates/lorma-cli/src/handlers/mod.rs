//! Command handlers that delegate to AppCore.
//!
//! Handlers follow the canonical pattern:
//! - Signature: `pub async fn execute(ctx: &CliContext, ...) -> Result<()>`
//! - Thin wrappers that:
//!   1. Sign in when the command acts on behalf of a user
//!   2. Call AppCore methods
//!   3. Format output for the terminal
//!
//! Handlers should NOT:
//! - Access repositories directly
//! - Contain business logic
//! - Manage database connections

pub mod config;
pub mod food_type;
pub mod menu;
pub mod order;
pub mod paths;
pub mod restaurant;
pub mod review;
pub mod stats;
pub mod user;
