// End-to-end tests: write a synthetic recording, convert it, and pick the
// produced Ogg Opus file apart byte by byte.

use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use opusmux::ogg::{crc, OggPage, OGG_CRC_OFFSET};
use opusmux::{convert_file, inspect_file, verify_file, AudioConfig, MuxError};

/// Build a recording of `frames` records in the default layout: an 8-byte
/// header (length field + frame index) followed by 40 patterned payload
/// bytes, plus `trailing` extra garbage bytes.
fn write_recording(dir: &Path, name: &str, frames: usize, trailing: usize) -> PathBuf {
    let mut data = Vec::new();
    for i in 0..frames {
        data.extend_from_slice(&0x28u32.to_le_bytes());
        data.extend_from_slice(&(i as u32).to_le_bytes());
        for j in 0..40 {
            data.push(((i * 17 + j * 13 + 73) % 256) as u8);
        }
    }
    data.extend(std::iter::repeat(0xEE).take(trailing));

    let path = dir.join(name);
    fs::write(&path, data).unwrap();
    path
}

fn parse_pages(bytes: &[u8]) -> Vec<OggPage> {
    let mut cursor = Cursor::new(bytes);
    let mut pages = Vec::new();
    while let Some(page) = OggPage::read(&mut cursor) {
        pages.push(page);
    }
    assert_eq!(
        cursor.position() as usize,
        bytes.len(),
        "output has bytes outside page boundaries"
    );
    pages
}

#[test]
fn test_three_record_scenario() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_recording(dir.path(), "input.dat", 3, 0);
    let output = dir.path().join("out.ogg");

    let summary = convert_file(&input, &output, &AudioConfig::default()).unwrap();
    assert_eq!(summary.frames, 3);
    assert_eq!(summary.pages, 5);

    let bytes = fs::read(&output).unwrap();
    assert_eq!(&bytes[0..4], b"OggS");
    assert_eq!(bytes.len() as u64, summary.bytes_written);

    let pages = parse_pages(&bytes);
    assert_eq!(pages.len(), 5); // head + tags + 3 audio

    let last = pages.last().unwrap();
    assert_ne!(last.header.header_type & 0x04, 0, "final page must be EOS");
    assert_eq!(last.header.header_type & 0x02, 0, "final page must not be BOS");
}

#[test]
fn test_page_invariants_across_larger_input() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_recording(dir.path(), "input.dat", 100, 0);
    let output = dir.path().join("out.ogg");
    let config = AudioConfig::default();

    convert_file(&input, &output, &config).unwrap();
    let bytes = fs::read(&output).unwrap();
    let pages = parse_pages(&bytes);

    assert_eq!(pages.len(), 102);

    let mut bos_count = 0;
    let mut eos_count = 0;
    for (i, page) in pages.iter().enumerate() {
        // Sequence numbers are 0..F+1, no gaps, no repeats
        assert_eq!(page.header.page_sequence, i as u32);
        assert_eq!(page.header.version, 0);

        if page.header.is_bos() {
            bos_count += 1;
        }
        if page.header.is_eos() {
            eos_count += 1;
        }
        assert!(!(page.header.is_bos() && page.header.is_eos()));

        // Lacing values sum to the payload length
        assert_eq!(page.header.payload_size(), page.payload.len());
    }
    assert_eq!(bos_count, 1);
    assert_eq!(eos_count, 1);

    // Audio page i carries granule (i+1) * frame_samples; control pages 0
    assert_eq!(pages[0].header.granule_position, 0);
    assert_eq!(pages[1].header.granule_position, 0);
    for (i, page) in pages[2..].iter().enumerate() {
        assert_eq!(
            page.header.granule_position,
            (i as u64 + 1) * config.frame_samples()
        );
    }
}

#[test]
fn test_stored_checksums_are_reproducible() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_recording(dir.path(), "input.dat", 7, 0);
    let output = dir.path().join("out.ogg");

    convert_file(&input, &output, &AudioConfig::default()).unwrap();
    let bytes = fs::read(&output).unwrap();

    // Walk raw page boundaries and recompute each CRC with the field zeroed
    let mut offset = 0;
    let mut checked = 0;
    while offset < bytes.len() {
        let segment_count = bytes[offset + 26] as usize;
        let payload: usize = bytes[offset + 27..offset + 27 + segment_count]
            .iter()
            .map(|&b| b as usize)
            .sum();
        let page_size = 27 + segment_count + payload;

        let mut page = bytes[offset..offset + page_size].to_vec();
        let stored = u32::from_le_bytes(
            page[OGG_CRC_OFFSET..OGG_CRC_OFFSET + 4].try_into().unwrap(),
        );
        page[OGG_CRC_OFFSET..OGG_CRC_OFFSET + 4].copy_from_slice(&[0; 4]);
        assert_eq!(crc::crc32(&page), stored, "page at offset {}", offset);

        offset += page_size;
        checked += 1;
    }
    assert_eq!(checked, 9);
}

#[test]
fn test_round_trip_recovers_payloads() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_recording(dir.path(), "input.dat", 10, 0);
    let output = dir.path().join("out.ogg");
    let config = AudioConfig::default();

    convert_file(&input, &output, &config).unwrap();

    let raw = fs::read(&input).unwrap();
    let expected: Vec<&[u8]> = raw
        .chunks(config.record_size())
        .map(|record| &record[config.header_size..])
        .collect();

    let bytes = fs::read(&output).unwrap();
    let pages = parse_pages(&bytes);
    let recovered: Vec<&[u8]> = pages[2..].iter().map(|p| p.payload.as_slice()).collect();

    assert_eq!(recovered, expected);
}

#[test]
fn test_trailing_partial_record_is_dropped() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_recording(dir.path(), "input.dat", 4, 23);
    let output = dir.path().join("out.ogg");

    let summary = convert_file(&input, &output, &AudioConfig::default()).unwrap();
    assert_eq!(summary.frames, 4);

    let pages = parse_pages(&fs::read(&output).unwrap());
    assert_eq!(pages.len(), 6);
    // Earlier frames are intact despite the garbage tail
    assert_eq!(pages[2].payload.len(), 40);
}

#[test]
fn test_input_shorter_than_one_record_fails_cleanly() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_recording(dir.path(), "input.dat", 0, 30);
    let output = dir.path().join("out.ogg");

    let err = convert_file(&input, &output, &AudioConfig::default()).unwrap_err();
    assert!(matches!(err, MuxError::EmptyInput));

    // The temp-then-rename write never created the destination
    assert!(!output.exists());
}

#[test]
fn test_missing_input_fails_cleanly() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("out.ogg");

    let err = convert_file(
        &dir.path().join("missing.dat"),
        &output,
        &AudioConfig::default(),
    )
    .unwrap_err();
    assert!(matches!(err, MuxError::InputNotFound(_)));
    assert!(!output.exists());
}

#[test]
fn test_verify_and_inspect_accept_output() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_recording(dir.path(), "input.dat", 5, 0);
    let output = dir.path().join("out.ogg");
    let config = AudioConfig {
        sample_rate: 48000,
        channels: 2,
        ..AudioConfig::default()
    };

    convert_file(&input, &output, &config).unwrap();
    verify_file(&output).unwrap();

    let info = inspect_file(&output).unwrap();
    assert_eq!(info.pages, 7);
    assert!(info.has_bos);
    assert!(info.has_eos);
    assert_eq!(info.crc_errors, 0);
    assert_eq!(info.last_granule, 5 * config.frame_samples());

    let head = info.head.unwrap();
    assert_eq!(head.sample_rate, 48000);
    assert_eq!(head.channels, 2);
}

#[test]
fn test_conversion_is_deterministic() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_recording(dir.path(), "input.dat", 6, 0);
    let out_a = dir.path().join("a.ogg");
    let out_b = dir.path().join("b.ogg");
    let config = AudioConfig::default();

    convert_file(&input, &out_a, &config).unwrap();
    convert_file(&input, &out_b, &config).unwrap();

    assert_eq!(fs::read(&out_a).unwrap(), fs::read(&out_b).unwrap());
}
