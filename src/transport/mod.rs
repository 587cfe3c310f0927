//! Transport module
//!
//! The server speaks MCP over stdio.

pub mod stdio;

pub use stdio::run_stdio;
