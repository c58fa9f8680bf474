//! NutriABCD Tools module
//!
//! Tool implementations behind the MCP server.

pub mod athletes;
pub mod calculators;
pub mod evaluations;
pub mod status;
