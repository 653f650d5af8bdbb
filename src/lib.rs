pub mod app;
pub mod cli;
mod client;
mod credentials;
mod error;
mod output;
mod signing;
mod speech;
mod voice;

pub use client::{IvonaClient, SpeechService, DEFAULT_REGION};
pub use credentials::{default_config_path, resolve as resolve_credentials, Credentials, CONFIG_FILE_NAME};
pub use error::{Error, Result};
pub use output::write_audio;
pub use speech::{ContentType, SpeechRequest, SpeechResult};
pub use voice::{Gender, UnknownGender, VoiceDescriptor, VoiceSelector, ALL_VOICES};

// Re-export common types
pub use bytes::Bytes;
