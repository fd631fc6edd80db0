// opusmux - Ogg Opus container muxer
//
// Converts recordings in a proprietary raw format (fixed-size records, each
// an opaque header followed by one pre-encoded Opus frame) into standard
// Ogg Opus files. The frame payloads are treated as opaque bytes; no audio
// encoding or decoding happens here.

pub mod config;
pub mod error;
pub mod frame;
pub mod info;
pub mod muxer;
pub mod ogg;
pub mod opus;
pub mod verify;

pub use config::AudioConfig;
pub use error::{MuxError, Result};
pub use frame::FrameSource;
pub use info::{inspect_file, OggStreamInfo};
pub use muxer::{convert_file, MuxSummary, Muxer, DEFAULT_STREAM_SERIAL};
pub use verify::verify_file;
