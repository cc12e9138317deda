// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
The seam to the external CASA toolkit. Every task is expressed as a small
generated Python snippet handed to `casa -c`; nothing numerical happens on
this side of the boundary.
 */

mod error;
#[cfg(test)]
mod tests;

pub(crate) use error::CasaError;

use std::{
    io::Write,
    path::{Path, PathBuf},
    process::Command,
};

use itertools::Itertools;
use log::{debug, info};
use vec1::Vec1;

pub(crate) const DEFAULT_CASA_BIN: &str = "casa";

/// Marker printed by the field-name lookup script so that field names can be
/// fished out of CASA's noisy stdout.
const FIELD_NAME_MARKER: &str = "FIELDNAME";

/// Runs a generated CASA script and hands back its stdout. The only
/// implementation outside of tests shells out to the real toolkit.
pub(crate) trait TaskRunner {
    fn run_script(&self, task: &'static str, script: &str) -> Result<String, CasaError>;
}

/// The real CASA executable.
pub(crate) struct Casa {
    pub(crate) bin: PathBuf,
    pub(crate) extra_args: Vec<String>,
}

impl Default for Casa {
    fn default() -> Self {
        Self {
            bin: PathBuf::from(DEFAULT_CASA_BIN),
            extra_args: vec![],
        }
    }
}

impl TaskRunner for Casa {
    fn run_script(&self, task: &'static str, script: &str) -> Result<String, CasaError> {
        // CASA only takes scripts from disk.
        let mut file = tempfile::Builder::new()
            .prefix("meerkat_concat_")
            .suffix(".py")
            .tempfile()?;
        file.write_all(script.as_bytes())?;
        file.flush()?;
        debug!("Running CASA task {task} with script:\n{script}");

        let output = Command::new(&self.bin)
            .args(["--nologger", "--nogui", "--nologfile"])
            .args(&self.extra_args)
            .arg("-c")
            .arg(file.path())
            .output()
            .map_err(|err| CasaError::Spawn {
                bin: self.bin.display().to_string(),
                err,
            })?;
        if !output.status.success() {
            return Err(CasaError::TaskFailed {
                task,
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Resolve numeric field IDs to field names via the MS metadata tool.
pub(crate) fn field_names(
    runner: &dyn TaskRunner,
    vis: &Path,
    field_ids: &Vec1<u32>,
) -> Result<Vec1<String>, CasaError> {
    let script = format!(
        "msmd.open({})\n\
         for i in [{}]:\n\
         \x20   print('{FIELD_NAME_MARKER} %d %s' % (i, msmd.namesforfields(i)[0]))\n\
         msmd.done()\n",
        py_path(vis),
        field_ids.iter().join(", "),
    );
    let stdout = runner.run_script("msmd", &script)?;

    let mut names = vec![];
    for &id in field_ids {
        let marker = format!("{FIELD_NAME_MARKER} {id} ");
        let name = stdout
            .lines()
            .find_map(|line| line.strip_prefix(marker.as_str()))
            .ok_or(CasaError::MissingFieldName { field: id })?;
        names.push(name.trim().to_string());
    }
    Ok(Vec1::try_from_vec(names).expect("one name per field ID"))
}

/// Concatenate per-subband images into a continuum cube along the last axis.
pub(crate) fn imageconcat(
    runner: &dyn TaskRunner,
    infiles: &[PathBuf],
    outfile: &Path,
) -> Result<(), CasaError> {
    let call = format!(
        "ia.imageconcat(infiles={}, outfile={}, axis=-1, relax=True)",
        py_path_list(infiles),
        py_path(outfile),
    );
    info!("{call}");
    runner.run_script("imageconcat", &format!("{call}\nia.close()\n"))?;
    Ok(())
}

/// Concatenate measurement sets.
pub(crate) fn concat(
    runner: &dyn TaskRunner,
    vis: &[PathBuf],
    concatvis: &Path,
) -> Result<(), CasaError> {
    let call = format!(
        "concat(vis={}, concatvis={})",
        py_path_list(vis),
        py_path(concatvis),
    );
    info!("{call}");
    runner.run_script("concat", &format!("{call}\n"))?;
    Ok(())
}

/// Concatenate multi-part measurement sets without rewriting their subtables.
pub(crate) fn virtualconcat(
    runner: &dyn TaskRunner,
    vis: &[PathBuf],
    concatvis: &Path,
) -> Result<(), CasaError> {
    let call = format!(
        "virtualconcat(vis={}, concatvis={})",
        py_path_list(vis),
        py_path(concatvis),
    );
    info!("{call}");
    runner.run_script("virtualconcat", &format!("{call}\n"))?;
    Ok(())
}

/// Export a CASA image to FITS.
pub(crate) fn exportfits(
    runner: &dyn TaskRunner,
    imagename: &Path,
    fitsimage: &Path,
) -> Result<(), CasaError> {
    let call = format!(
        "exportfits(imagename={}, fitsimage={})",
        py_path(imagename),
        py_path(fitsimage),
    );
    info!("{call}");
    runner.run_script("exportfits", &format!("{call}\n"))?;
    Ok(())
}

/// Format a string as a single-quoted Python literal.
fn py_str(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for c in s.chars() {
        match c {
            '\\' => out.push_str(r"\\"),
            '\'' => out.push_str(r"\'"),
            _ => out.push(c),
        }
    }
    out.push('\'');
    out
}

fn py_path(p: &Path) -> String {
    py_str(&p.to_string_lossy())
}

fn py_path_list(ps: &[PathBuf]) -> String {
    format!("[{}]", ps.iter().map(|p| py_path(p)).join(", "))
}
