//! Thali MCP Server
//!
//! Model Context Protocol server exposing dish search and preference
//! storage to AI assistants.

pub mod protocol;
pub mod server;
pub mod tools;

pub use server::{start_server, McpServer};
pub use tools::{call_tool, SharedDatabase};
