//! Properties files and the configuration sets parsed from them.
//!
//! # Data Flow
//! ```text
//! <name>.properties
//!     → parser.rs (logical lines, separators, escapes)
//!     → set.rs (ConfigSet: name, source path, mtime, entries)
//!     → shared as Arc<ConfigSet> by the store
//! ```

pub mod parser;
pub mod set;

pub use parser::{parse, ParseError};
pub use set::{load_file, ConfigSet, LoadError};
