// Conversion parameters for one run
//
// The input is a flat sequence of fixed-size records. Each record carries an
// opaque per-record header followed by one pre-encoded Opus frame of
// `compressed_frame_size` bytes. All values are fixed for the lifetime of a
// conversion.

use crate::error::{MuxError, Result};

/// Audio and record-layout parameters for a conversion run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioConfig {
    /// Input sample rate in Hz.
    pub sample_rate: u32,
    /// Channel count (typically 1 or 2).
    pub channels: u8,
    /// Duration of one encoded frame in milliseconds.
    pub frame_duration_ms: u32,
    /// Size of one encoded Opus frame payload in bytes.
    pub compressed_frame_size: usize,
    /// Size of the opaque per-record header in bytes.
    pub header_size: usize,
}

impl Default for AudioConfig {
    fn default() -> Self {
        AudioConfig {
            sample_rate: 16000,
            channels: 1,
            frame_duration_ms: 20,
            compressed_frame_size: 40,
            header_size: 8,
        }
    }
}

impl AudioConfig {
    /// Total size of one input record (header + frame payload).
    pub fn record_size(&self) -> usize {
        self.header_size + self.compressed_frame_size
    }

    /// Samples per frame at the configured rate, used for granule positions.
    pub fn frame_samples(&self) -> u64 {
        self.sample_rate as u64 * self.frame_duration_ms as u64 / 1000
    }

    /// Reject parameter values that cannot produce a valid stream.
    ///
    /// A zero sample rate or frame duration would freeze every granule
    /// position at zero; a zero frame size would make the record walk
    /// meaningless.
    pub fn validate(&self) -> Result<()> {
        if self.sample_rate == 0 {
            return Err(MuxError::InvalidConfig("sample rate must be positive".into()));
        }
        if self.channels == 0 {
            return Err(MuxError::InvalidConfig("channel count must be positive".into()));
        }
        if self.frame_duration_ms == 0 {
            return Err(MuxError::InvalidConfig(
                "frame duration must be positive".into(),
            ));
        }
        if self.compressed_frame_size == 0 {
            return Err(MuxError::InvalidConfig("frame size must be positive".into()));
        }
        Ok(())
    }
}
