//! Batch texture pack conversion
//!
//! Discovery of `.zip` packs in a directory tree and conversion of several
//! packs at once.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use rayon::prelude::*;
use walkdir::WalkDir;

use super::{OUTPUT_PREFIX, PackOptions, convert_pack_file};
use crate::error::Result;
use crate::metadata::MetadataLookup;

/// Result of converting several packs
#[derive(Debug, Clone)]
pub struct BatchPackResult {
    /// Number of packs converted
    pub success_count: usize,
    /// Number of packs that failed outright
    pub fail_count: usize,
    /// One message per pack, in input order
    pub results: Vec<String>,
}

/// Find all `.zip` texture packs below `dir`, sorted.
///
/// Archives already carrying the `cnv_` output prefix are skipped.
///
/// # Errors
/// Returns [`Error::WalkDirError`](crate::error::Error::WalkDirError) if `dir` or one of its subdirectories
/// cannot be read.
pub fn find_texture_packs<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
    let mut packs = Vec::new();
    for entry in WalkDir::new(dir).follow_links(true) {
        let entry = entry?;
        let path = entry.path();
        if path.is_file()
            && path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("zip"))
            && !entry.file_name().to_string_lossy().starts_with(OUTPUT_PREFIX)
        {
            packs.push(path.to_path_buf());
        }
    }

    packs.sort();
    Ok(packs)
}

/// Convert each pack next to itself (`cnv_<name>`), in parallel
pub fn batch_convert(
    packs: &[PathBuf],
    options: &PackOptions,
    lookup: &dyn MetadataLookup,
) -> BatchPackResult {
    let success_counter = AtomicUsize::new(0);
    let fail_counter = AtomicUsize::new(0);

    let results: Vec<String> = packs
        .par_iter()
        .map(|pack| match convert_pack_file(pack, None, options, lookup) {
            Ok(report) => {
                success_counter.fetch_add(1, Ordering::SeqCst);
                format!(
                    "Converted {}: {} textures, {} copied, {} failed",
                    pack.display(),
                    report.converted,
                    report.copied,
                    report.failed
                )
            }
            Err(e) => {
                fail_counter.fetch_add(1, Ordering::SeqCst);
                format!("Failed {}: {e}", pack.display())
            }
        })
        .collect();

    BatchPackResult {
        success_count: success_counter.load(Ordering::SeqCst),
        fail_count: fail_counter.load(Ordering::SeqCst),
        results,
    }
}
