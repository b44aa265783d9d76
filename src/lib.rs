// Public library interface for affinity-cloud
// This allows the debug CLI tool to use the core modules

pub mod avatar;
pub mod cloud;
pub mod layout;
pub mod render;
pub mod score;
