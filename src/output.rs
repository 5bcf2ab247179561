use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::foundation::error::FramereelResult;

/// Name of the subdirectory (inside the source folder) that receives artifacts.
pub const OUTPUT_DIR_NAME: &str = "output";

/// Return the first free path of the form `output.<ext>`, `output_1.<ext>`, …
///
/// Ensures `base_dir` exists first (idempotent, no error when already
/// present) and probes existence sequentially. Never overwrites an existing
/// file. The probe-then-create window is not safe under concurrent callers
/// targeting the same directory; the host serializes requests, so this is
/// accepted rather than mitigated.
pub fn allocate_output_path(base_dir: &Path, ext: &str) -> FramereelResult<PathBuf> {
    std::fs::create_dir_all(base_dir).with_context(|| {
        format!(
            "failed to create output directory '{}'",
            base_dir.display()
        )
    })?;

    let mut candidate = base_dir.join(format!("output.{ext}"));
    let mut counter = 1u32;
    while candidate.exists() {
        candidate = base_dir.join(format!("output_{counter}.{ext}"));
        counter += 1;
    }
    Ok(candidate)
}
