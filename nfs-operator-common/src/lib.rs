// SPDX-FileCopyrightText: 2025 Timothy Pogue
//
// SPDX-License-Identifier: ISC

#[allow(unused_extern_crates)]
extern crate self as nfs_operator_common;

pub mod config;
pub mod constant;
pub mod telemetry;
pub mod state;
pub mod utils;
