//! Configuration types for the sluice control-plane client.

mod environment;
mod load;
mod secret;
pub mod shared;

pub use environment::Environment;
pub use load::{LoadConfigError, load_config};
pub use secret::SerializableSecretString;
