//! # Command-Line Interface
//!
//! User-facing CLI commands and output formatting.
//!
//! ## Command Groups
//!
//! | Group | Purpose | Examples |
//! |-------|---------|----------|
//! | Core | Project setup | `init` |
//! | Normalization | Try a prop definition | `normalize`, `options` |
//! | Tokens | Placeholder replacement | `token` |
//! | Components | Catalog and binding | `components list`, `components show`, `bind` |
//! | Plugins | Registry listings | `prop-types`, `sources` |
//!
//! ## Output Formats
//!
//! All commands support `--format` flag:
//! - `text` (default) - Human-readable output
//! - `json` - Machine-parseable JSON
//!
//! The default can be changed with `default_format` in the global config.
//!
//! ## Verbose Mode
//!
//! Use `--verbose` (or `-v`) for debug logs on stderr; `RUST_LOG` overrides it:
//! ```bash
//! propbind --verbose bind card.binding.yml
//! ```
//!
//! ## Entry Point
//!
//! Call [`run()`] to parse arguments and execute the appropriate command.

mod app;
mod bind;
mod components;
mod input;
mod inspect;
mod output;
mod plugins;
mod token_cmd;

pub use app::{run, Cli, Commands};
pub use output::{Output, OutputFormat};
