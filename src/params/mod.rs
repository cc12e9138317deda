// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Parameters for the concat subcommand, and the driver that walks every target
field and product type. A failed product is logged and skipped; the run only
aborts if the field names can't be resolved at all.
 */


use std::path::{Path, PathBuf};

use log::{error, info};
use strum::IntoEnumIterator;
use strum_macros::EnumIter;
use vec1::Vec1;

use crate::{
    casa::{self, CasaError, TaskRunner},
    io,
};

/// The three kinds of per-subband product that get concatenated, in the
/// order they are processed for each field.
#[derive(Debug, Clone, Copy, EnumIter)]
enum Product {
    ContinuumCube,
    MeasurementSet,
    MultiMs,
}

impl Product {
    /// The glob pattern matching per-subband candidates for `field`.
    fn pattern(self, dir: &Path, field: &str) -> String {
        let tail = match self {
            Product::ContinuumCube => format!("*MHz/images/*{field}*image"),
            Product::MeasurementSet => format!("*MHz/*{field}*.ms"),
            Product::MultiMs => format!("*MHz/*{field}*.mms"),
        };
        dir.join(tail).display().to_string()
    }

    /// The combined output path for `field`.
    fn output(self, dir: &Path, filebase: &str, field: &str) -> PathBuf {
        let ext = match self {
            Product::ContinuumCube => "contcube",
            Product::MeasurementSet => "ms",
            Product::MultiMs => "mms",
        };
        dir.join(format!("{filebase}.{field}.{ext}"))
    }

    /// The name of the toolkit task that does the concatenation.
    fn job(self) -> &'static str {
        match self {
            Product::ContinuumCube => "imageconcat",
            Product::MeasurementSet => "concat",
            Product::MultiMs => "virtualconcat",
        }
    }

    /// Human-readable label for the candidate files.
    fn filetype(self) -> &'static str {
        match self {
            Product::ContinuumCube => "image",
            Product::MeasurementSet => "MS",
            Product::MultiMs => "MMS",
        }
    }

    fn intro(self) -> &'static str {
        match self {
            Product::ContinuumCube => "Creating continuum cube with the following command:",
            Product::MeasurementSet => "Concatenating MSs with the following command:",
            Product::MultiMs => "Concatenating MMSs with the following command:",
        }
    }
}

pub(crate) struct ConcatParams {
    /// The input visibility measurement set; field IDs are resolved against
    /// its metadata.
    pub(crate) vis: PathBuf,

    /// `vis`'s filename with the extension stripped; output names are built
    /// from it.
    pub(crate) filebase: String,

    /// Numeric IDs of the target fields.
    pub(crate) fields: Vec1<u32>,

    /// The directory holding the per-subband `*MHz` directories. Outputs are
    /// written here.
    pub(crate) dir: PathBuf,

    /// Export the continuum cube to FITS when it doesn't have a FITS twin.
    pub(crate) export_fits: bool,

    pub(crate) runner: Box<dyn TaskRunner>,
}

impl ConcatParams {
    pub(crate) fn run(&self) -> Result<(), CasaError> {
        let field_names = casa::field_names(&*self.runner, &self.vis, &self.fields)?;

        for field in &field_names {
            info!("Concatenating products for field '{field}'");
            for product in Product::iter() {
                self.run_product(product, field);
            }
        }
        Ok(())
    }

    /// Run one concatenation job. Every failure mode here is logged rather
    /// than propagated so that the remaining products and fields still get
    /// their chance.
    fn run_product(&self, product: Product, field: &str) {
        let pattern = product.pattern(&self.dir, field);
        let out = product.output(&self.dir, &self.filebase, field);

        match io::check_candidates(&pattern, &out, product.job(), product.filetype()) {
            Ok(Some(mut files)) => match io::sort_by_spw(&mut files, &self.dir) {
                Ok(()) => {
                    info!("{}", product.intro());
                    let result = match product {
                        Product::ContinuumCube => {
                            casa::imageconcat(&*self.runner, &files, &out)
                        }
                        Product::MeasurementSet => casa::concat(&*self.runner, &files, &out),
                        Product::MultiMs => casa::virtualconcat(&*self.runner, &files, &out),
                    };
                    if let Err(e) = result {
                        error!("{} failed: {e}", product.job());
                    }
                }
                Err(e) => error!("{e}"),
            },
            Ok(None) => (),
            Err(e) => error!("{e}"),
        }

        // The output is checked regardless of whether a job ran; a skipped or
        // failed job without an output is still worth shouting about.
        match product {
            Product::ContinuumCube => {
                if out.exists() {
                    let fits = PathBuf::from(format!("{}.fits", out.display()));
                    if self.export_fits && !fits.exists() {
                        if let Err(e) = casa::exportfits(&*self.runner, &out, &fits) {
                            error!("exportfits failed: {e}");
                        }
                    }
                } else {
                    error!("Output image '{}' not written.", out.display());
                }
            }
            Product::MeasurementSet | Product::MultiMs => {
                if !out.exists() {
                    error!(
                        "Output {} '{}' not written.",
                        product.filetype(),
                        out.display()
                    );
                }
            }
        }
    }
}
