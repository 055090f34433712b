//! Poll a SEN0460 particulate matter sensor on a Linux I2C bus.
//!
//! Usage: air_monitor [I2C_DEVICE] [ADDRESS] [CYCLES]
//! Defaults to /dev/i2c-1, address 0x19, polling until Ctrl-C.
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use airquality::{AirQualitySensor, Config, PollConfig, Poller};
use anyhow::Context;
use linux_embedded_hal::{Delay, I2cdev};

/// Raises `shutdown` once the process receives Ctrl-C.
fn watch_ctrl_c(shutdown: Arc<AtomicBool>) -> anyhow::Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_io()
        .build()
        .context("failed to start signal runtime")?;
    std::thread::spawn(move || {
        if runtime.block_on(tokio::signal::ctrl_c()).is_ok() {
            shutdown.store(true, Ordering::Relaxed);
        }
    });
    Ok(())
}

fn parse_address(arg: &str) -> anyhow::Result<u8> {
    let parsed = match arg.strip_prefix("0x") {
        Some(hex) => u8::from_str_radix(hex, 16),
        None => arg.parse(),
    };
    parsed.with_context(|| format!("invalid I2C address {arg:?}"))
}

fn main() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    let path = args.next().unwrap_or_else(|| "/dev/i2c-1".to_string());
    let address = match args.next() {
        Some(arg) => parse_address(&arg)?,
        None => Config::default().address,
    };
    let cycles = args
        .next()
        .map(|arg| arg.parse::<u64>())
        .transpose()
        .context("invalid cycle count")?;

    println!("Opening {path}, sensor at {address:#04x}");
    let i2c = I2cdev::new(&path).with_context(|| format!("failed to open {path}"))?;

    let config = Config {
        address,
        ..Config::default()
    };
    let sensor = AirQualitySensor::new(i2c, config);
    let mut poller = Poller::new(sensor, Delay, PollConfig::default());

    // A sensor that cannot finish setup is useless for this session.
    let version = poller
        .setup()
        .map_err(|err| anyhow::anyhow!("sensor setup failed: {err:?}"))?;
    println!("Sensor firmware version: {version}");

    let shutdown = Arc::new(AtomicBool::new(false));
    watch_ctrl_c(shutdown.clone())?;

    let mut done = 0u64;
    poller.run(
        || {
            let stop =
                shutdown.load(Ordering::Relaxed) || cycles.is_some_and(|limit| done >= limit);
            done += 1;
            stop
        },
        |result| match result {
            Ok(sample) => println!("{sample}"),
            Err(err) => eprintln!("Error reading sensor data: {err:?}. Retrying..."),
        },
    );

    if shutdown.load(Ordering::Relaxed) {
        println!("\nProgram terminated by user.");
    }
    Ok(())
}
