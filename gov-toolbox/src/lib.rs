pub mod client;
pub mod config;
pub mod gist;
pub mod proposals;
pub mod registry;
pub mod report;
pub mod votes;
