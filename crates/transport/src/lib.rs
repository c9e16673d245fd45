//! Types shared between the playback controller, the decoder and the audio engine.

mod audio;
mod message;

pub use audio::{AudioArc, resample_audio_arc};
pub use message::{Command, Status, Token, Voice};
