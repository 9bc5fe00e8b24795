//! Shared configuration types for the control-plane client.

mod control_plane;

pub use control_plane::{ControlPlaneConfig, ValidationError};
