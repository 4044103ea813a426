// SPDX-FileCopyrightText: 2025 Timothy Pogue
//
// SPDX-License-Identifier: ISC

use clap::{Parser, Subcommand};

use nfs_operator_common::constant::CONFIG_FILE_ENV;

#[derive(Parser, Debug)]
#[
    clap(
        name = "nfs-operator",
        version,
        author,
        about = "Operator for managing the NFS export of Ceph storage clusters"
    )
]
pub struct CliArgs {
    /// Path to a JSON, YAML or TOML configuration file
    #[clap(long, global = true, env = CONFIG_FILE_ENV)]
    pub config: Option<String>,
    #[clap(subcommand)]
    pub cmd: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[
        clap(
            name = "crds",
            about = "Generate Custom Resource Definitions (CRDs) for the operator"
        )
    ]
    Crds,
    #[
        clap(
            name = "controller",
            about = "Run the controller"
        )
    ]
    Controller,
}
