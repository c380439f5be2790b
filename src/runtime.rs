// Plan runtime: hub discovery, tilt readings in, driving plans in, acks out
// Note: plans run one at a time; plans published meanwhile wait in the
// subscriber queue, so a caller never has two plans driving the motors.

use tokio::sync::mpsc;
use tracing::{info, warn};

// local imports
use crate::config::{
    sensor_topic, Settings, READING_BUFFER, TOPIC_CMD_PLAN, TOPIC_PLAN_ACK, TOPIC_STATUS,
};
use crate::error::TankError;
use crate::messages::{DriveStatus, DrivingPlan, PlanAck, PlanOutcome, TiltReading};
use crate::motor::{Actuator, RecordingActuator, ZenohActuator};
use crate::tank::{resolve_devices, Tank, TankCtrl, ZenohHub};
use crate::tilt::TiltQueue;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Build the acknowledgment for a finished plan
pub fn plan_ack(plan: &DrivingPlan, result: &Result<(), TankError>) -> PlanAck {
    let (outcome, error) = match result {
        Ok(()) => (PlanOutcome::Completed, None),
        Err(e) => (PlanOutcome::Failed, Some(e.to_string())),
    };
    PlanAck {
        plan_name: plan.plan_name.clone(),
        commands: plan.commands.len(),
        outcome,
        error,
    }
}

pub async fn run(settings: Settings) -> Result<(), BoxError> {
    info!("Opening Zenoh session...");
    let session = zenoh::open(zenoh::Config::default()).await?;

    info!("Discovering hub devices...");
    let devices = resolve_devices(&ZenohHub::new(session.clone()), &settings.layout()).await?;

    // Sensor -> tilt queue: one forwarding task, parsed readings only
    let topic = sensor_topic(&devices.sensor.port);
    let sensor_sub = session.declare_subscriber(topic.clone()).await?;
    let (reading_tx, reading_rx) = mpsc::channel::<TiltReading>(READING_BUFFER);
    info!("Subscribed to: {}", topic);
    tokio::spawn(async move {
        while let Ok(sample) = sensor_sub.recv_async().await {
            let payload = sample.payload().to_bytes();
            match serde_json::from_slice::<TiltReading>(&payload) {
                Ok(reading) => {
                    if reading_tx.send(reading).await.is_err() {
                        break;
                    }
                }
                Err(e) => {
                    warn!("Failed to parse tilt reading: {}", e);
                }
            }
        }
        warn!("Tilt reading subscription ended");
    });
    let tilt = TiltQueue::spawn(settings.steering_axis, reading_rx);

    if settings.no_motors {
        warn!("Motors disabled, actuation is only logged");
        serve_plans(&session, Tank::new(RecordingActuator::new(), tilt)).await
    } else {
        let actuator = ZenohActuator::new(session.clone(), &devices.left.port, &devices.right.port);
        serve_plans(&session, Tank::new(actuator, tilt)).await
    }
}

async fn serve_plans<A: Actuator>(session: &zenoh::Session, tank: Tank<A>) -> Result<(), BoxError> {
    let mut ctrl = TankCtrl::new();
    ctrl.attach(tank);

    info!("Setting up publishers and subscribers...");
    let plans = session.declare_subscriber(TOPIC_CMD_PLAN).await?;
    let pub_ack = session.declare_publisher(TOPIC_PLAN_ACK).await?;
    let pub_status = session.declare_publisher(TOPIC_STATUS).await?;

    info!("Subscribed to: {}", TOPIC_CMD_PLAN);
    info!("Publishing to: {}, {}", TOPIC_PLAN_ACK, TOPIC_STATUS);
    pub_status
        .put(serde_json::to_string(&DriveStatus::Idle)?)
        .await?;

    while let Ok(sample) = plans.recv_async().await {
        let payload = sample.payload().to_bytes();
        let plan = match serde_json::from_slice::<DrivingPlan>(&payload) {
            Ok(plan) => plan,
            Err(e) => {
                warn!("Failed to parse driving plan: {}", e);
                continue;
            }
        };
        info!("Received {}", plan);

        pub_status
            .put(serde_json::to_string(&DriveStatus::Executing)?)
            .await?;
        let result = ctrl.run(&plan).await;
        if let Err(e) = &result {
            warn!("Plan '{}' failed: {}", plan.plan_name, e);
        }

        let ack = plan_ack(&plan, &result);
        pub_ack.put(serde_json::to_string(&ack)?).await?;
        pub_status
            .put(serde_json::to_string(&DriveStatus::Idle)?)
            .await?;
    }

    warn!("Plan subscription ended, shutting down");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::{Action, Command};

    fn plan() -> DrivingPlan {
        DrivingPlan::new(
            "spin",
            vec![
                Command::new(Action::TurnRight, 180.0),
                Command::new(Action::Wait, 100.0),
            ],
        )
    }

    #[test]
    fn test_ack_completed() {
        let ack = plan_ack(&plan(), &Ok(()));
        assert_eq!(ack.plan_name, "spin");
        assert_eq!(ack.commands, 2);
        assert_eq!(ack.outcome, PlanOutcome::Completed);
        assert_eq!(ack.error, None);
    }

    #[test]
    fn test_ack_failed_carries_error() {
        let ack = plan_ack(&plan(), &Err(TankError::AngleUnknown));
        assert_eq!(ack.outcome, PlanOutcome::Failed);
        assert_eq!(
            ack.error.as_deref(),
            Some("Current angle unknown, no tilt reading received yet")
        );
    }
}
