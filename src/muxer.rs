// Ogg Opus muxing session
//
// Emits, in strict order: one BOS page carrying the OpusHead packet, one
// comment page carrying OpusTags, then one audio page per frame with the
// final page EOS-flagged. Pages are written as they are produced; nothing
// is buffered whole-file. The sequence counter and granule accumulator are
// session state, so concurrent conversions need independent Muxer values.

use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;

use crate::config::AudioConfig;
use crate::error::{MuxError, Result};
use crate::frame::FrameSource;
use crate::ogg::{OggPage, OGG_HEADER_TYPE_BOS, OGG_HEADER_TYPE_EOS, OGG_HEADER_TYPE_NORMAL};
use crate::opus;

/// Default bitstream serial number tagging every page of a run.
pub const DEFAULT_STREAM_SERIAL: u32 = 0x1234_5678;

/// Counters and results of one completed conversion.
#[derive(Debug, Clone, Serialize)]
pub struct MuxSummary {
    pub frames: u64,
    pub pages: u64,
    pub bytes_written: u64,
    pub duration_ms: u64,
}

/// One muxing session: owns the stream serial, the page sequence counter,
/// and the granule position accumulator.
pub struct Muxer {
    config: AudioConfig,
    serial: u32,
    page_seq: u32,
    granule: u64,
}

impl Muxer {
    pub fn new(config: AudioConfig) -> Self {
        Self::with_serial(config, DEFAULT_STREAM_SERIAL)
    }

    /// Create a session with an explicit stream serial, for callers running
    /// several conversions side by side.
    pub fn with_serial(config: AudioConfig, serial: u32) -> Self {
        Muxer {
            config,
            serial,
            page_seq: 0,
            granule: 0,
        }
    }

    fn write_page<W: Write>(
        &mut self,
        writer: &mut W,
        payload: Vec<u8>,
        header_type: u8,
        granule: u64,
    ) -> Result<u64> {
        let page = OggPage::new(payload, header_type, granule, self.serial, self.page_seq)?;
        let bytes = page.to_bytes();
        writer.write_all(&bytes)?;

        tracing::debug!(
            sequence = self.page_seq,
            granule,
            header_type,
            size = bytes.len(),
            "Wrote page"
        );
        self.page_seq += 1;
        Ok(bytes.len() as u64)
    }

    /// Mux a sequence of raw Opus frames into `writer`.
    ///
    /// Fails with [`MuxError::EmptyInput`] when the sequence yields no
    /// frames: without at least one audio page there is no page to carry
    /// the EOS flag.
    pub fn mux<I, W>(&mut self, frames: I, writer: &mut W) -> Result<MuxSummary>
    where
        I: IntoIterator<Item = Result<Vec<u8>>>,
        W: Write,
    {
        let mut bytes_written = 0u64;

        // Control pages: identification (BOS) then comment, both at granule 0
        let head = opus::opus_head(&self.config);
        bytes_written += self.write_page(writer, head, OGG_HEADER_TYPE_BOS, 0)?;
        bytes_written += self.write_page(writer, opus::opus_tags(), OGG_HEADER_TYPE_NORMAL, 0)?;

        // Audio pages: hold one frame back so the last one can carry EOS
        let frame_samples = self.config.frame_samples();
        let mut frame_count = 0u64;
        let mut pending: Option<Vec<u8>> = None;

        for frame in frames {
            let frame = frame?;
            if let Some(previous) = pending.replace(frame) {
                self.granule += frame_samples;
                bytes_written +=
                    self.write_page(writer, previous, OGG_HEADER_TYPE_NORMAL, self.granule)?;
                frame_count += 1;
            }
        }

        let last = pending.ok_or(MuxError::EmptyInput)?;
        self.granule += frame_samples;
        bytes_written += self.write_page(writer, last, OGG_HEADER_TYPE_EOS, self.granule)?;
        frame_count += 1;

        writer.flush()?;

        let summary = MuxSummary {
            frames: frame_count,
            pages: self.page_seq as u64,
            bytes_written,
            duration_ms: frame_count * self.config.frame_duration_ms as u64,
        };
        tracing::info!(
            frames = summary.frames,
            pages = summary.pages,
            bytes = summary.bytes_written,
            "Muxing complete"
        );
        Ok(summary)
    }
}

/// Convert one recording file into an Ogg Opus file.
///
/// The output is staged in a temporary file next to the destination and
/// atomically renamed into place on success, so a mid-stream failure never
/// leaves a malformed container at `output`.
pub fn convert_file(input: &Path, output: &Path, config: &AudioConfig) -> Result<MuxSummary> {
    let frames = FrameSource::open(input, config)?;

    let dir = match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let tmp = tempfile::NamedTempFile::new_in(dir)?;
    let mut writer = BufWriter::new(tmp);

    let mut muxer = Muxer::new(config.clone());
    let summary = muxer.mux(frames, &mut writer)?;

    let tmp = writer
        .into_inner()
        .map_err(|e| MuxError::Io(e.into_error()))?;
    tmp.persist(output).map_err(|e| MuxError::Io(e.error))?;

    tracing::info!(
        input = %input.display(),
        output = %output.display(),
        frames = summary.frames,
        "Conversion finished"
    );
    Ok(summary)
}
