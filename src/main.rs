// SPDX-License-Identifier: MIT

use anyhow::Context;
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use quill_rs::adk::service::ContentService;
use quill_rs::quill::config::QuillConfig;
use quill_rs::quill::server::{self, AppState};
use quill_rs::quill::workflow::graph::blog_pipeline;
use quill_rs::quill::workflow::state::{RunStatus, RunSummary};
use quill_rs::quill::workflow::validate_topic;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to a YAML config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate a blog post for a topic
    Run {
        /// The blog topic
        #[arg(short, long)]
        topic: String,

        /// The model to use (overrides config)
        #[arg(short, long)]
        model: Option<String>,

        /// Maximum number of regeneration cycles
        #[arg(long, conflicts_with = "unbounded")]
        max_revisions: Option<u32>,

        /// Keep regenerating until the evaluation passes
        #[arg(long)]
        unbounded: bool,

        /// Feed the latest critique into regeneration prompts
        #[arg(long)]
        feedback: bool,

        /// Print the full final state as JSON
        #[arg(long)]
        json: bool,
    },
    /// Serve the workflow over HTTP
    Serve {
        /// Port to listen on (overrides config)
        #[arg(short, long)]
        port: Option<u16>,
    },
}

fn build_service(config: &QuillConfig) -> anyhow::Result<Arc<dyn ContentService>> {
    let model = config
        .build_model()
        .context("failed to configure the content service")?;
    Ok(Arc::new(config.content_service(model)))
}

fn print_summary(summary: &RunSummary) {
    println!("Topic: {}", summary.topic);
    println!("Title: {}", summary.title);
    println!(
        "Status: {}",
        match summary.status {
            RunStatus::Approved => "Approved",
            RunStatus::NeedsRevision => "Needs Revision",
        }
    );
    println!("Review cycles: {}", summary.cycles);
    if let Some(draft) = &summary.final_draft {
        println!("\n{}\n", draft);
    }
    if let Some(review) = &summary.final_review {
        println!("Quality assurance: {}", review);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let args = Args::parse();
    match args.command {
        // Request spans come from tower-http; log records are bridged into tracing
        Commands::Serve { .. } => tracing_subscriber::fmt::init(),
        Commands::Run { .. } => env_logger::init(),
    }

    let mut config = QuillConfig::load(args.config.as_deref())?;

    match args.command {
        Commands::Run {
            topic,
            model,
            max_revisions,
            unbounded,
            feedback,
            json,
        } => {
            if let Some(model) = model {
                config.model = model;
            }
            if unbounded {
                config.max_revisions = None;
            } else if max_revisions.is_some() {
                config.max_revisions = max_revisions;
            }
            config.incorporate_feedback |= feedback;

            let topic = validate_topic(&topic)?;
            let graph = blog_pipeline(build_service(&config)?, &config.pipeline_options())?;

            match graph.run(topic).await {
                Ok(state) => {
                    if json {
                        println!("{}", serde_json::to_string_pretty(&state)?);
                    } else {
                        print_summary(&state.summary());
                    }
                }
                Err(failure) => {
                    if json {
                        println!("{}", serde_json::to_string_pretty(&failure.state)?);
                    } else {
                        print_summary(&failure.state.summary());
                    }
                    return Err(failure.into());
                }
            }
        }
        Commands::Serve { port } => {
            let graph = blog_pipeline(build_service(&config)?, &config.pipeline_options())?;
            let port = port.unwrap_or(config.server.port);
            server::serve(AppState::new(graph), port).await?;
        }
    }

    Ok(())
}
