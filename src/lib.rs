//! codenav - code outline engine
//!
//! Builds a navigable outline of C# and Java files (types, members,
//! interface implementations and folding regions), keeps it current while
//! the file is edited, and highlights the entries enclosing the caret.
//! State changes follow the Elm Architecture pattern: `Msg` → `update` → `Cmd`.

pub mod cli;
pub mod commands;
pub mod config;
pub mod config_paths;
pub mod messages;
pub mod model;
pub mod outline;
pub mod runtime;
pub mod syntax;
pub mod theme;
pub mod tracing;
pub mod update;

// Re-export commonly used types
pub use commands::Cmd;
pub use config::OutlineConfig;
pub use messages::Msg;
pub use model::OutlineModel;
pub use outline::{CodeDocument, CodeItem, CodeKind};
pub use runtime::{BuildTicket, EngineError, OutlineEngine};
