pub mod provider;
pub mod registry;
