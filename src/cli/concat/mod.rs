// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

#[cfg(test)]
mod tests;

use std::path::PathBuf;

use clap::Parser;
use log::{debug, info, trace};
use serde::{Deserialize, Serialize};
use vec1::Vec1;

use super::common::ARG_FILE_HELP;
use crate::{
    casa::{Casa, DEFAULT_CASA_BIN},
    cli::ConcatError,
    params::ConcatParams,
};

lazy_static::lazy_static! {
    static ref CASA_HELP: String =
        format!("Path to the CASA executable used for all toolkit tasks. Default: {DEFAULT_CASA_BIN}");
}

#[derive(Parser, Debug, Clone, Default, Serialize, Deserialize)]
pub(super) struct ConcatArgs {
    #[clap(name = "ARGUMENTS_FILE", help = ARG_FILE_HELP.as_str(), parse(from_os_str))]
    pub(super) args_file: Option<PathBuf>,

    #[clap(flatten)]
    #[serde(rename = "data")]
    #[serde(default)]
    pub(super) data_args: DataArgs,

    #[clap(flatten)]
    #[serde(rename = "fields")]
    #[serde(default)]
    pub(super) field_args: FieldArgs,

    #[clap(flatten)]
    #[serde(rename = "casa")]
    #[serde(default)]
    pub(super) casa_args: CasaArgs,

    /// The directory containing the per-subband "*MHz" directories. The
    /// concatenated outputs are written here too. Default: the current
    /// directory.
    #[clap(long, parse(from_os_str), help_heading = "OUTPUT FILES")]
    pub(super) dir: Option<PathBuf>,

    /// Don't export the concatenated continuum cube to FITS.
    #[clap(long, help_heading = "OUTPUT FILES")]
    #[serde(default)]
    pub(super) no_export_fits: bool,
}

#[derive(Parser, Debug, Clone, Default, Serialize, Deserialize)]
pub(super) struct DataArgs {
    /// Path to the input measurement set. Per-field output names are derived
    /// from its filename, and target field IDs are resolved against its
    /// metadata.
    #[clap(short = 'd', long = "data", parse(from_os_str), help_heading = "INPUT FILES")]
    #[serde(rename = "vis")]
    pub(super) vis: Option<PathBuf>,
}

#[derive(Parser, Debug, Clone, Default, Serialize, Deserialize)]
pub(super) struct FieldArgs {
    /// Comma-separated numeric IDs of the target fields to concatenate
    /// products for (e.g. "2" or "2,3").
    #[clap(short = 'f', long = "fields", help_heading = "INPUT FILES")]
    pub(super) targetfields: Option<String>,
}

#[derive(Parser, Debug, Clone, Default, Serialize, Deserialize)]
pub(super) struct CasaArgs {
    #[clap(long = "casa", parse(from_os_str), help = CASA_HELP.as_str(), help_heading = "EXTERNAL TOOLKIT")]
    #[serde(rename = "bin")]
    pub(super) bin: Option<PathBuf>,

    /// An additional argument to pass to the CASA executable before "-c". May
    /// be given multiple times.
    #[clap(long = "casa-arg", multiple_occurrences(true), help_heading = "EXTERNAL TOOLKIT")]
    #[serde(rename = "args")]
    pub(super) args: Option<Vec<String>>,
}

impl ConcatArgs {
    /// Both command-line and file arguments overlap in terms of what is
    /// available; this function consolidates everything that was specified
    /// into a single struct. Where applicable, it will prefer CLI parameters
    /// over those in the file.
    ///
    /// This function should only ever merge arguments, and not try to make
    /// sense of them.
    pub(super) fn merge(self) -> Result<ConcatArgs, ConcatError> {
        debug!("Merging command-line arguments with the argument file");

        let cli_args = self;

        if let Some(arg_file) = cli_args.args_file {
            // Read in the file arguments. Ensure all of the file args are
            // accounted for by pattern matching.
            let ConcatArgs {
                args_file: _,
                data_args,
                field_args,
                casa_args,
                dir,
                no_export_fits,
            } = unpack_arg_file!(arg_file);

            // Merge all the arguments, preferring the CLI args when available.
            Ok(ConcatArgs {
                args_file: None,
                data_args: DataArgs {
                    vis: cli_args.data_args.vis.or(data_args.vis),
                },
                field_args: FieldArgs {
                    targetfields: cli_args.field_args.targetfields.or(field_args.targetfields),
                },
                casa_args: CasaArgs {
                    bin: cli_args.casa_args.bin.or(casa_args.bin),
                    args: cli_args.casa_args.args.or(casa_args.args),
                },
                dir: cli_args.dir.or(dir),
                no_export_fits: cli_args.no_export_fits || no_export_fits,
            })
        } else {
            Ok(cli_args)
        }
    }

    pub(super) fn parse(self) -> Result<ConcatParams, ConcatError> {
        debug!("{:#?}", self);

        let Self {
            args_file: _,
            data_args,
            field_args,
            casa_args,
            dir,
            no_export_fits,
        } = self;

        let vis = data_args.vis.ok_or(ConcatArgsError::NoVis)?;
        if !vis.exists() {
            return Err(ConcatArgsError::VisDoesNotExist(vis).into());
        }
        let filebase = vis
            .file_stem()
            .and_then(|s| s.to_str())
            .map(|s| s.to_string())
            .ok_or_else(|| ConcatArgsError::VisBadFilename(vis.clone()))?;

        let targetfields = field_args.targetfields.ok_or(ConcatArgsError::NoFields)?;
        let mut field_ids = vec![];
        for id in targetfields.split(',') {
            let id = id.trim();
            if id.is_empty() {
                continue;
            }
            field_ids.push(
                id.parse::<u32>()
                    .map_err(|_| ConcatArgsError::ParseFieldId(id.to_string()))?,
            );
        }
        let fields = Vec1::try_from_vec(field_ids).map_err(|_| ConcatArgsError::NoFields)?;

        let runner = Casa {
            bin: casa_args.bin.unwrap_or_else(|| DEFAULT_CASA_BIN.into()),
            extra_args: casa_args.args.unwrap_or_default(),
        };

        Ok(ConcatParams {
            vis,
            filebase,
            fields,
            dir: dir.unwrap_or_else(|| ".".into()),
            export_fits: !no_export_fits,
            runner: Box::new(runner),
        })
    }

    pub(super) fn run(self, dry_run: bool) -> Result<(), ConcatError> {
        debug!("Converting arguments into parameters");
        trace!("{:#?}", self);
        let params = self.parse()?;

        if dry_run {
            info!("Dry run -- exiting now.");
            return Ok(());
        }

        params.run()?;
        Ok(())
    }
}

#[derive(thiserror::Error, Debug)]
pub(super) enum ConcatArgsError {
    #[error("No input measurement set was specified")]
    NoVis,

    #[error("The input measurement set '{}' doesn't exist", .0.display())]
    VisDoesNotExist(PathBuf),

    #[error("Couldn't derive an output file base from '{}'", .0.display())]
    VisBadFilename(PathBuf),

    #[error("No target fields were specified")]
    NoFields,

    #[error("Couldn't parse '{0}' as a numeric field ID")]
    ParseFieldId(String),
}
