// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use thiserror::Error;

#[derive(Error, Debug)]
pub(crate) enum CasaError {
    #[error("Couldn't run the CASA executable '{bin}': {err}")]
    Spawn { bin: String, err: std::io::Error },

    #[error("CASA task {task} exited with {status}:\n{stderr}")]
    TaskFailed {
        task: &'static str,
        status: std::process::ExitStatus,
        stderr: String,
    },

    #[error("CASA printed no name for field {field}; check the field IDs against the measurement set")]
    MissingFieldName { field: u32 },

    #[error("{0}")]
    IO(#[from] std::io::Error),
}
