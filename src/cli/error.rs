// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Error type for all meerkat_concat-related errors. This should be the *only*
//! error enum that is publicly visible.

use thiserror::Error;

use super::concat::ConcatArgsError;
use crate::{casa::CasaError, io::IoError};

/// The *only* publicly visible error from meerkat_concat.
#[derive(Error, Debug)]
pub enum ConcatError {
    /// An error related to argument files.
    #[error("{0}")]
    ArgFile(String),

    /// An error related to ingesting arguments.
    #[error("{0}")]
    Args(String),

    /// An error from the external CASA toolkit.
    #[error("{0}")]
    Casa(String),

    /// A generic error that can't be clarified further, e.g. IO errors.
    #[error("{0}")]
    Generic(String),
}

// When changing the error propagation below, ensure `Self::from(e)` uses the
// correct `e`!

impl From<ConcatArgsError> for ConcatError {
    fn from(e: ConcatArgsError) -> Self {
        match e {
            ConcatArgsError::NoVis
            | ConcatArgsError::VisDoesNotExist(_)
            | ConcatArgsError::VisBadFilename(_)
            | ConcatArgsError::NoFields
            | ConcatArgsError::ParseFieldId(_) => Self::Args(e.to_string()),
        }
    }
}

impl From<CasaError> for ConcatError {
    fn from(e: CasaError) -> Self {
        let s = e.to_string();
        match e {
            CasaError::Spawn { .. }
            | CasaError::TaskFailed { .. }
            | CasaError::MissingFieldName { .. } => Self::Casa(s),
            CasaError::IO(_) => Self::Generic(s),
        }
    }
}

impl From<IoError> for ConcatError {
    fn from(e: IoError) -> Self {
        Self::Generic(e.to_string())
    }
}

impl From<std::io::Error> for ConcatError {
    fn from(e: std::io::Error) -> Self {
        Self::Generic(e.to_string())
    }
}
