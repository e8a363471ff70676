// gls: GitLab Settings Applier
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
//!             cli (clap)         recurse (walker)
//!                |                     |
//!                |              +------+------+
//!                |              v             v
//!                |          op (apply)    client
//!                |          protect /   resolve +
//!                |          settings /  retrying
//!                |          approvals   transport
//!                +----------+----------+
//!                           v
//!                 report (human / JSON)
//!
//!   +-----------------------------------------+
//!   |  model   Target, AccessLevel, Outcome   |
//!   +-----------------------------------------+
//!   |  foundation   error, logging            |
//!   +-----------------------------------------+
//! ```

pub mod cli;
pub mod client;
pub mod error;
pub mod logging;
pub mod model;
pub mod op;
pub mod recurse;
pub mod report;
