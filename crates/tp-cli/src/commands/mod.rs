//! CLI subcommand implementations.

pub mod add;
pub mod ask;
pub mod dates;
pub mod edit;
pub mod export;
pub mod import;
pub mod init;
pub mod list;
pub mod plan;
pub mod rm;
pub mod search;
pub mod stats;
pub mod status;
pub mod travel;
pub mod util;
