pub mod admin;
pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod hook;
pub mod rules;
pub mod store;

pub use admin::RuleAdministrator;
pub use config::RuleSet;
pub use engine::TransformEngine;
pub use hook::MessageFilter;
pub use store::RuleStore;
