//! Command handlers — one thin module per subcommand.

pub mod add;
pub mod backup;
pub mod list;
pub mod path;
pub mod remove;
pub mod restore;
pub mod watch;
