// srcbackup: uncommitted and unpushed work backup
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Library root.
//!
//! # Crate Architecture
//!
//! ```text
//!                        main.rs
//!                           |
//!                +----------+----------+
//!                v                     v
//!             cli (clap)          cmd (handlers)
//!                |         run / query / capture
//!                +----------+----------+
//!                           v
//!              ,---------------------------,
//!              |          config           |
//!              |  TOML + env, layered      |
//!              '--+-----------+--------+---'
//!                 |           |        |
//!                 v           v        v
//!                hg        mirror   artifact
//!           status/id/   rsync rule  naming +
//!            outgoing      sets     diff/bundle
//!
//!   +-----------------------------------------+
//!   |  core   process (builder, runner seam)  |
//!   +-----------------------------------------+
//!   |  foundation   error, logging, utility   |
//!   +-----------------------------------------+
//! ```

pub mod artifact;
pub mod cli;
pub mod cmd;
pub mod config;
pub mod core;
pub mod error;
pub mod hg;
pub mod logging;
pub mod mirror;
pub mod utility;
