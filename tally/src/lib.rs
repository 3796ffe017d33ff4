/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 ByteDance and/or its affiliates.
 */

use std::sync::Arc;

use anyhow::Context;
use log::info;

pub mod config;
pub mod credential;
pub mod demo;
pub mod instrument;
pub mod logger;
pub mod opts;
pub mod registry;
pub mod reporter;
pub mod sender;
pub mod transport;
pub mod types;

use config::PipelineConfig;
use demo::DemoMetrics;
use opts::ProcArgs;
use registry::Registry;
use reporter::Reporter;
use sender::Sender;

/// Run the demo pipeline until ctrl-c is received
pub async fn run(proc_args: &ProcArgs, config: PipelineConfig) -> anyhow::Result<()> {
    let transport = config
        .transport
        .build()
        .context("failed to build transport")?;
    let sender = Sender::spawn(config.sender.clone(), transport)
        .context("failed to spawn sender")?;
    let reporter = Arc::new(Reporter::new(
        Arc::new(Registry::new()),
        Arc::new(sender),
        config.reporter.clone(),
    ));

    let demo = DemoMetrics::register(&reporter, &config.histogram, &config.reporter.tags)?;
    reporter.start();

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    let mut demo_interval = tokio::time::interval(proc_args.demo_interval);
    loop {
        tokio::select! {
            biased;

            r = &mut ctrl_c => {
                r.context("failed to listen for ctrl-c")?;
                info!("got ctrl-c, closing the reporter");
                break;
            }
            _ = demo_interval.tick() => demo.update_random(),
        }
    }

    reporter.close().await;
    let stats = reporter.sender().stats();
    info!(
        "reporter closed: {} points delivered, {} dropped, {} rejected",
        stats.delivered, stats.dropped, stats.rejected
    );
    Ok(())
}
