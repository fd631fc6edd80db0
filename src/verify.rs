// Advisory structural check of a produced Ogg file
//
// This is a cheap sanity check, not a full parse: a pass is not proof of
// structural correctness, and a failure does not retroactively change a
// conversion result that was already reported as successful.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

use crate::error::{MuxError, Result};
use crate::ogg::OGG_SIGNATURE;

/// Smallest plausible Ogg Opus file (two control pages).
pub const MIN_FILE_SIZE: u64 = 100;

/// How many trailing bytes are scanned for the capture pattern.
pub const TAIL_SCAN_WINDOW: u64 = 100;

/// Check that a file looks like the Ogg container we produce.
///
/// Verifies that the file exists, exceeds a minimum size, starts with the
/// capture pattern, and that the pattern reappears within the final
/// [`TAIL_SCAN_WINDOW`] bytes (a heuristic for the presence of a last page).
pub fn verify_file(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(MuxError::Verification(format!(
            "file does not exist: {}",
            path.display()
        )));
    }

    let mut file = File::open(path)?;
    let file_size = file.metadata()?.len();
    if file_size < MIN_FILE_SIZE {
        return Err(MuxError::Verification(format!(
            "file too small: {} bytes",
            file_size
        )));
    }

    let mut magic = [0u8; 4];
    file.read_exact(&mut magic)?;
    if &magic != OGG_SIGNATURE {
        return Err(MuxError::Verification(
            "missing capture pattern at start of file".into(),
        ));
    }

    file.seek(SeekFrom::Start(file_size - TAIL_SCAN_WINDOW))?;
    let mut tail = vec![0u8; TAIL_SCAN_WINDOW as usize];
    file.read_exact(&mut tail)?;
    if !tail.windows(4).any(|w| w == OGG_SIGNATURE) {
        return Err(MuxError::Verification(
            "no capture pattern near end of file".into(),
        ));
    }

    tracing::debug!(path = %path.display(), file_size, "Verification passed");
    Ok(())
}
