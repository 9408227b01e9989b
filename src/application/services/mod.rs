//! Application services — use-case orchestration over the port traits.

pub mod pipeline;
pub mod registry;
pub mod session;
pub mod watcher;
