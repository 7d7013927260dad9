/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

/// Board geometry, pieces, offset tables, and move generation/application.
mod board;

/// Command definitions for the interactive inspection shell.
mod cli;

/// Misc utility constants.
mod utils;

pub use board::*;
pub use cli::*;
pub use utils::*;
