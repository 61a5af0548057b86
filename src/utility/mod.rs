// srcbackup: uncommitted and unpushed work backup
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Utility modules.
//!
//! ```text
//! fs
//!   ensure_dir()     recursive create with 0777
//!   ensure_parent()  parent of an artifact file
//!   path_exists()    idempotence probe
//! ```

pub mod fs;
