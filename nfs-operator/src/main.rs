// SPDX-FileCopyrightText: 2025 Timothy Pogue
//
// SPDX-License-Identifier: ISC

mod cli;

use std::sync::Arc;
use futures::StreamExt;
use std::process;
use clap::Parser;
use clap::CommandFactory;
use rustls::crypto::aws_lc_rs;

use nfs_operator_common::config::AppConfigBuilder;
use nfs_operator_common::state::State;
use nfs_operator_common::telemetry::{error, info, setup_logging};
use nfs_operator_controller::controller::{
    context::Context,
    storagecluster::StorageClusterController,
    utils::{error_policy, create_k8s_client},
};
use nfs_operator_controller::crd::{v1alpha1::storagecluster::StorageCluster as V1Alpha1StorageCluster, utils as crd_utils};

use crate::cli::{CliArgs, Commands};

#[tokio::main]
async fn main() {
    // Install the default aws_lc_rs crypto provider
    let _ = aws_lc_rs::default_provider().install_default();

    let args = CliArgs::parse();

    setup_logging();

    match &args.cmd {
        Some(Commands::Crds) => crd_utils::generate_crds().unwrap_or_else(|e| {
            error!(
                event = "Error",
                error = %e,
            );
            process::exit(1);
        }),
        Some(Commands::Controller) => {
            info!(
                event = "Starting",
                version = env!("CARGO_PKG_VERSION"),
            );

            // Load configuration
            let config = AppConfigBuilder::default()
                .with_optional_file(args.config.as_deref())
                .with_env()
                .build()
                .unwrap_or_else(|e| {
                    error!(
                        event = "Error",
                        error = %e,
                    );
                    process::exit(1);
                });

            // Create necessary resources
            let state = Arc::new(State { config: config.clone() });
            let client = create_k8s_client().await.unwrap_or_else(|e| {
                error!(
                    event = "Error",
                    error = %e,
                );
                process::exit(1);
            });
            let controller_ctx = Arc::new(Context::new(client).with_state(state.clone()));

            // Create CRD controllers
            let v1alpha1_cluster_controller = StorageClusterController::create_controller::<V1Alpha1StorageCluster>(controller_ctx.clone()).await;

            // Run CRD controllers
            info!(event = "ControllerStarted", kind = "StorageCluster", version = "v1alpha1");
            let v1alpha1_cluster_handle = tokio::spawn(async move {
                v1alpha1_cluster_controller
                    .shutdown_on_signal()
                    .run(
                        StorageClusterController::reconcile::<V1Alpha1StorageCluster>,
                        error_policy::<V1Alpha1StorageCluster>,
                        controller_ctx.clone(),
                    )
                    .for_each(|r| async move {
                        match r {
                            Ok((object, _)) => info!(
                                event = "Reconciled",
                                kind = "StorageCluster",
                                version = "v1alpha1",
                                name = object.name.as_str(),
                                namespace = object.namespace.as_deref().unwrap_or_default(),
                            ),
                            Err(e) => error!(event = "ReconcileError", error = %e),
                        }
                    })
                    .await
            });

            // Wait for all controllers to finish
            match tokio::try_join!(v1alpha1_cluster_handle) {
                Ok(_) => info!(event = "Stopped"),
                Err(e) => error!(event = "Error", error = %e),
            }
        },
        None => {
            let mut cmd = CliArgs::command();
            let _ = cmd.print_help();
            process::exit(1);
        },
    }
}
