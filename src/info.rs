// Stream inspection: walk the pages of an Ogg Opus file and report its
// structure. Used by the `info` subcommand and handy when checking output
// against other tools.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::Serialize;

use crate::error::{MuxError, Result};
use crate::ogg::{OggPage, OGG_CRC_OFFSET};
use crate::opus::{OpusHead, OPUS_TAGS};

/// Structure summary of one Ogg Opus file.
#[derive(Debug, Clone, Serialize)]
pub struct OggStreamInfo {
    pub file_size: u64,
    pub pages: u64,
    pub has_bos: bool,
    pub has_eos: bool,
    pub bitstream_serial: u32,
    pub crc_errors: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub head: Option<OpusHead>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vendor: Option<String>,
    pub last_granule: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_secs: Option<f64>,
}

/// Extract the vendor string from an "OpusTags" packet.
fn parse_vendor(payload: &[u8]) -> Option<String> {
    if payload.len() < 12 || &payload[0..8] != OPUS_TAGS {
        return None;
    }
    let len = u32::from_le_bytes(payload[8..12].try_into().unwrap()) as usize;
    let vendor = payload.get(12..12 + len)?;
    Some(String::from_utf8_lossy(vendor).to_string())
}

/// Parse every page of `path` and summarize the stream.
pub fn inspect_file(path: &Path) -> Result<OggStreamInfo> {
    let file = File::open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            MuxError::InputNotFound(path.to_path_buf())
        } else {
            MuxError::Io(e)
        }
    })?;
    let file_size = file.metadata()?.len();
    let mut reader = BufReader::new(file);

    let mut info = OggStreamInfo {
        file_size,
        pages: 0,
        has_bos: false,
        has_eos: false,
        bitstream_serial: 0,
        crc_errors: 0,
        head: None,
        vendor: None,
        last_granule: 0,
        duration_secs: None,
    };

    while let Some(page) = OggPage::read(&mut reader) {
        if info.pages == 0 {
            info.bitstream_serial = page.header.bitstream_serial;
            info.head = OpusHead::parse(&page.payload);
        } else if info.pages == 1 {
            info.vendor = parse_vendor(&page.payload);
        }

        info.has_bos |= page.header.is_bos();
        info.has_eos |= page.header.is_eos();
        if page.header.granule_position > info.last_granule {
            info.last_granule = page.header.granule_position;
        }

        // Re-serializing recomputes the checksum over the same bytes
        let expected = u32::from_le_bytes(
            page.to_bytes()[OGG_CRC_OFFSET..OGG_CRC_OFFSET + 4]
                .try_into()
                .unwrap(),
        );
        if expected != page.header.crc {
            info.crc_errors += 1;
        }

        info.pages += 1;
    }

    if info.pages == 0 {
        return Err(MuxError::Verification(format!(
            "no Ogg pages found in {}",
            path.display()
        )));
    }

    if let Some(head) = &info.head {
        if head.sample_rate > 0 {
            info.duration_secs = Some(info.last_granule as f64 / head.sample_rate as f64);
        }
    }

    tracing::debug!(
        path = %path.display(),
        pages = info.pages,
        last_granule = info.last_granule,
        "Inspected stream"
    );
    Ok(info)
}
