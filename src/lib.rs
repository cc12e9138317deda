// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Concatenate per-spectral-window MeerKAT pipeline products (continuum images,
measurement sets and multi-part measurement sets) into single per-field
artifacts. All image mosaicking and table concatenation is delegated to the
CASA toolkit; this crate does file discovery, subband ordering, existence
checks and orchestration.
 */

mod casa;
mod cli;
mod io;
mod params;

pub use cli::{ConcatError, MeerkatConcat};
