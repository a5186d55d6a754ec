//! Scripted ride against a simulated hub.
//!
//! Runs the whole session flow without a train in range:
//! - Connects through a mock connector and subscribes the sensors
//! - Sets the light and plays the departure sound
//! - Drives until the color sensor sees a red tile, then brakes
//!
//! # Usage
//!
//! ```bash
//! RUST_LOG=debug cargo run --bin duplo_demo --features demo
//! ```

use duplo_hub::adapter;
use duplo_hub::hal::{MockConnector, MockTransport, SystemClock, ThreadSleep};
use duplo_hub::traits::Sleep;
use duplo_hub::{DeviceConfig, HubCatalog, LightColor, SessionConfig, TrainSession};

/// Main loop interval in milliseconds
const LOOP_INTERVAL_MS: u32 = 250;

/// Give up after this many loop ticks
const MAX_TICKS: u32 = 20;

/// Value reports the simulated color sensor will send, in order.
const TRACK: [[u8; 3]; 4] = [[6, 5, 5], [0, 1, 3], [1, 1, 1], [4, 0, 0]];

fn color_report(rgb: [u8; 3]) -> Vec<u8> {
    vec![0x0a, 0x00, 0x45, 0x12, 0x00, rgb[0], 0x00, rgb[1], 0x00, rgb[2]]
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("duplo_hub=info".parse()?)
                .add_directive("duplo_demo=info".parse()?),
        )
        .init();

    let mut hub = MockTransport::named("Train Base");
    for rgb in TRACK {
        hub.queue_read(color_report(rgb));
    }

    let config = SessionConfig::default()
        .with_settle_ms(100)
        .with_device(DeviceConfig::default().with_name("demo-train"));
    let mut sleep = ThreadSleep;

    let mut train = TrainSession::connect(
        &mut MockConnector::new(hub),
        HubCatalog::standard(),
        config,
        SystemClock::new(),
        &mut sleep,
    )?;

    train.set_light(LightColor::Green)?;
    train.play_sound("depart")?;
    train.drive(60)?;

    for _ in 0..MAX_TICKS {
        sleep.sleep_ms(LOOP_INTERVAL_MS);
        if adapter::get_color(&mut train, true) == Some("brightred") {
            train.stop()?;
            train.play_sound("brake")?;
            break;
        }
    }

    tracing::info!(
        frames = train.transport().written.len(),
        last_power = train.throttle().last_power(),
        "ride finished"
    );
    Ok(())
}
