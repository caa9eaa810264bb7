// Adapters - External system implementations

pub mod channel_log;
pub mod file_log;
pub mod fs_local;
pub mod libav_decoder;
pub mod toml_config;
pub mod tracing_log;

// Re-export adapters
pub use channel_log::ChannelLogAdapter;
pub use file_log::FileLogAdapter;
pub use fs_local::FsLocalAdapter;
pub use libav_decoder::LibavDecoderAdapter;
pub use toml_config::TomlConfigAdapter;
pub use tracing_log::TracingLogAdapter;
