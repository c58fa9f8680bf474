//! NutriABCD Library
//!
//! ABCD nutritional assessment for youth athletes: calculators, composite
//! evaluation, persistence and the MCP tool surface.

pub mod abcd;
pub mod build_info;
pub mod config;
pub mod db;
pub mod mcp;
pub mod models;
pub mod tools;
