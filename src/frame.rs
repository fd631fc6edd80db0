// Reading raw Opus frames from the proprietary recording format
//
// The input is a flat repeating sequence of records, each
// `header_size + compressed_frame_size` bytes. The record header is opaque
// and only skipped; the remaining bytes are one pre-encoded Opus frame.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::config::AudioConfig;
use crate::error::{MuxError, Result};

/// Lazy, finite, non-restartable source of raw Opus frames.
#[derive(Debug)]
pub struct FrameSource {
    reader: BufReader<File>,
    record_size: usize,
    header_size: usize,
    frames_total: u64,
    frames_read: u64,
}

impl FrameSource {
    /// Open an input file and compute the usable frame count.
    ///
    /// The configuration is validated first. A trailing record shorter than
    /// the full record size is silently dropped. Fails with
    /// [`MuxError::InputNotFound`] if the path does not exist and
    /// [`MuxError::EmptyInput`] if no whole record fits.
    pub fn open(path: &Path, config: &AudioConfig) -> Result<Self> {
        config.validate()?;

        if !path.exists() {
            return Err(MuxError::InputNotFound(path.to_path_buf()));
        }

        let file = File::open(path)?;
        let file_size = file.metadata()?.len();
        let record_size = config.record_size();
        let frames_total = file_size / record_size as u64;

        if frames_total == 0 {
            return Err(MuxError::EmptyInput);
        }

        tracing::debug!(
            path = %path.display(),
            file_size,
            record_size,
            frames = frames_total,
            "Opened frame source"
        );

        Ok(FrameSource {
            reader: BufReader::new(file),
            record_size,
            header_size: config.header_size,
            frames_total,
            frames_read: 0,
        })
    }

    /// Number of whole frames the source will yield.
    pub fn frame_count(&self) -> u64 {
        self.frames_total
    }
}

impl Iterator for FrameSource {
    type Item = Result<Vec<u8>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.frames_read == self.frames_total {
            return None;
        }

        let mut record = vec![0u8; self.record_size];
        if let Err(e) = self.reader.read_exact(&mut record) {
            return Some(Err(MuxError::Io(e)));
        }
        self.frames_read += 1;

        // Strip the opaque record header, keep the frame payload
        record.drain(..self.header_size);
        Some(Ok(record))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_records(path: &Path, records: &[Vec<u8>]) {
        let mut file = File::create(path).unwrap();
        for record in records {
            file.write_all(record).unwrap();
        }
    }

    #[test]
    fn test_missing_input_file() {
        let config = AudioConfig::default();
        let err = FrameSource::open(Path::new("/nonexistent/input.dat"), &config).unwrap_err();
        assert!(matches!(err, MuxError::InputNotFound(_)));
    }

    #[test]
    fn test_degenerate_config_rejected_before_reading() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("input.dat");
        write_records(&path, &[vec![0u8; 96]]);

        let config = AudioConfig {
            frame_duration_ms: 0,
            ..AudioConfig::default()
        };
        let err = FrameSource::open(&path, &config).unwrap_err();
        assert!(matches!(err, MuxError::InvalidConfig(_)));
    }

    #[test]
    fn test_input_shorter_than_one_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("short.dat");
        write_records(&path, &[vec![0u8; 47]]);

        let err = FrameSource::open(&path, &AudioConfig::default()).unwrap_err();
        assert!(matches!(err, MuxError::EmptyInput));
    }

    #[test]
    fn test_frames_strip_record_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("input.dat");
        let config = AudioConfig::default();

        let mut records = Vec::new();
        for i in 0u8..3 {
            let mut record = vec![0xEE; config.header_size];
            record.extend(vec![i + 1; config.compressed_frame_size]);
            records.push(record);
        }
        write_records(&path, &records);

        let source = FrameSource::open(&path, &config).unwrap();
        assert_eq!(source.frame_count(), 3);

        let frames: Vec<Vec<u8>> = source.map(|f| f.unwrap()).collect();
        assert_eq!(frames.len(), 3);
        for (i, frame) in frames.iter().enumerate() {
            assert_eq!(frame.len(), config.compressed_frame_size);
            assert!(frame.iter().all(|&b| b == i as u8 + 1));
        }
    }

    #[test]
    fn test_trailing_partial_record_dropped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("truncated.dat");
        let config = AudioConfig::default();

        let mut data = Vec::new();
        data.extend(vec![0xAA; config.record_size()]);
        data.extend(vec![0xBB; config.record_size()]);
        data.extend(vec![0xCC; 17]); // partial trailing record
        write_records(&path, &[data]);

        let source = FrameSource::open(&path, &config).unwrap();
        assert_eq!(source.frame_count(), 2);

        let frames: Vec<Vec<u8>> = source.map(|f| f.unwrap()).collect();
        assert_eq!(frames.len(), 2);
        assert!(frames[0].iter().all(|&b| b == 0xAA));
        assert!(frames[1].iter().all(|&b| b == 0xBB));
    }
}
