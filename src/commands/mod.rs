//! CLI subcommands

pub mod clean;
pub mod generate;
pub mod list;
pub mod paths;
pub mod show;
pub mod sitemap;
