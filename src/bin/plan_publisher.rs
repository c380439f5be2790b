// Plan publisher: show a driving plan file and optionally send it to the runtime
//
// Usage: cargo run --bin plan_publisher -- plan.json [--execute]

use std::path::PathBuf;

use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use tilt_tank_runtime::config::{TOPIC_CMD_PLAN, TOPIC_PLAN_ACK};
use tilt_tank_runtime::messages::{DrivingPlan, PlanAck, PlanOutcome};

#[derive(Debug, Parser)]
#[command(about = "Display a driving plan and optionally execute it")]
struct Args {
    /// JSON file with {"plan_name": ..., "commands": [{"action": ..., "argument": ...}]}
    plan: PathBuf,

    /// Publish the plan and wait for the runtime's acknowledgment
    #[arg(long)]
    execute: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let args = Args::parse();
    let raw = std::fs::read_to_string(&args.plan)?;
    let plan: DrivingPlan = serde_json::from_str(&raw)?;
    println!("{}", plan);

    if !args.execute {
        return Ok(());
    }

    info!("Opening Zenoh session...");
    let session = zenoh::open(zenoh::Config::default()).await?;
    let acks = session.declare_subscriber(TOPIC_PLAN_ACK).await?;

    session
        .put(TOPIC_CMD_PLAN, serde_json::to_string(&plan)?)
        .await?;
    info!("Published '{}' to {}, waiting for ack...", plan.plan_name, TOPIC_CMD_PLAN);

    while let Ok(sample) = acks.recv_async().await {
        let payload = sample.payload().to_bytes();
        let ack: PlanAck = match serde_json::from_slice(&payload) {
            Ok(ack) => ack,
            Err(e) => {
                warn!("Failed to parse ack: {}", e);
                continue;
            }
        };
        if ack.plan_name != plan.plan_name {
            continue;
        }
        match ack.outcome {
            PlanOutcome::Completed => println!("Plan '{}' completed", ack.plan_name),
            PlanOutcome::Failed => println!(
                "Plan '{}' failed: {}",
                ack.plan_name,
                ack.error.as_deref().unwrap_or("unknown error")
            ),
        }
        break;
    }

    Ok(())
}
