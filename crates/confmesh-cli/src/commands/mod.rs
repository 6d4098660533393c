//! Command implementations for confmesh-cli

pub mod list;
pub mod show;

pub use list::{run_list, run_patterns};
pub use show::run_show;
