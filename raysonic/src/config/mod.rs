//! Configuration for RaySonic worlds, listeners and sources.

mod bindings;
mod listener_config;
mod source_config;
mod world_desc;

pub use bindings::MixerBindings;
pub use listener_config::{ConeConfig, ListenerConfig, ReverbProbe};
pub use source_config::{DEFAULT_SOURCE_PREFIX, SourceConfig};
pub use world_desc::RaySonicWorldDesc;
