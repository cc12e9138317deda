// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
File discovery for per-subband data products: glob matching, subband
ordering and the candidate-count gate run before every concatenation job.
 */

use std::path::{Component, Path, PathBuf};

use glob::glob;
use log::{info, warn};
use thiserror::Error;

/// Given a glob pattern, get all of the matches from the filesystem.
pub(crate) fn get_all_matches_from_glob(g: &str) -> Result<Vec<PathBuf>, IoError> {
    let mut entries = vec![];
    for entry in glob(g)? {
        match entry {
            Ok(e) => entries.push(e),
            Err(e) => return Err(IoError::Glob(e)),
        }
    }
    Ok(entries)
}

/// Get the subband sort key for a per-subband path: the number before the
/// first '~' in the first path component under `base` (subband directories
/// are named e.g. "880~960MHz").
pub(crate) fn spw_sort_key(path: &Path, base: &Path) -> Result<f64, IoError> {
    let rel = path.strip_prefix(base).unwrap_or(path);
    let label = rel
        .components()
        .find_map(|c| match c {
            Component::Normal(os) => os.to_str(),
            _ => None,
        })
        .unwrap_or_default();
    label
        .split('~')
        .next()
        .and_then(|s| s.parse::<f64>().ok())
        .ok_or_else(|| IoError::NoSpwLabel {
            path: path.to_path_buf(),
        })
}

/// Sort per-subband paths ascending in frequency. Fails if any path doesn't
/// carry a recognisable subband label.
pub(crate) fn sort_by_spw(paths: &mut [PathBuf], base: &Path) -> Result<(), IoError> {
    let mut keyed = vec![];
    for p in paths.iter() {
        keyed.push((spw_sort_key(p, base)?, p.clone()));
    }
    keyed.sort_by(|(a, _), (b, _)| a.total_cmp(b));
    for (slot, (_, p)) in paths.iter_mut().zip(keyed) {
        *slot = p;
    }
    Ok(())
}

/// Find the candidates for a concatenation job and decide whether the job
/// should run at all. Returns `None` (job skipped) when the output already
/// exists, when nothing matched, or when a single match was found (it is
/// copied to the output path instead of concatenated).
pub(crate) fn check_candidates(
    pattern: &str,
    out: &Path,
    job: &str,
    filetype: &str,
) -> Result<Option<Vec<PathBuf>>, IoError> {
    let files = get_all_matches_from_glob(pattern)?;
    if out.exists() {
        info!(
            "Output file \"{}\" already exists. Skipping {}.",
            out.display(),
            job
        );
        Ok(None)
    } else if files.is_empty() {
        warn!("Didn't find any {filetype}s with '{pattern}'");
        Ok(None)
    } else if files.len() == 1 {
        warn!(
            "Only found 1 {filetype} with '{pattern}'. Copying it to '{}'.",
            out.display()
        );
        copy_tree(&files[0], out)?;
        Ok(None)
    } else {
        Ok(Some(files))
    }
}

/// Recursively copy a data product (a directory on disk) to `out`.
fn copy_tree(from: &Path, out: &Path) -> Result<(), IoError> {
    let options = fs_extra::dir::CopyOptions {
        copy_inside: true,
        ..Default::default()
    };
    fs_extra::dir::copy(from, out, &options)?;
    Ok(())
}

#[derive(Error, Debug)]
pub(crate) enum IoError {
    #[error("Couldn't parse a subband label from '{}'; expected a leading '<freq>~<freq>MHz' path component", path.display())]
    NoSpwLabel { path: PathBuf },

    #[error("{0}")]
    Glob(#[from] glob::GlobError),

    #[error("{0}")]
    Pattern(#[from] glob::PatternError),

    #[error("{0}")]
    Copy(#[from] fs_extra::error::Error),
}
