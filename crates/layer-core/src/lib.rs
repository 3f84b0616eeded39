//! Layer API client and tool-catalog preparation for the Layer MCP server.
//!
//! The API serves a catalog of remote-defined tools. Before the catalog is
//! published, [`defaults::apply_defaults`] rewrites each tool's input schema
//! so values the user already supplied (account IDs, tokens) become schema
//! defaults and stop being required.

pub mod api;
pub mod arguments;
pub mod config;
pub mod defaults;
pub mod error;
pub mod schema;
pub mod search_tool;
pub mod types;

pub use api::LayerApi;
pub use config::{AuthFlag, ConfigFile, LayerConfig};
pub use defaults::{apply_defaults, Overrides};
pub use error::{LayerError, Result};
pub use schema::Schema;
pub use types::{CallToolResult, LayerEnvironment, SearchResult, Tool, ToolContent};
