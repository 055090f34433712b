//! Fixed-cadence polling of an [`AirQualitySensor`].
//!
//! The driver never retries; this runner owns the retry policy. A failed cycle
//! is reported and logged, then the next one starts after the usual interval.

use core::fmt;

use embedded_hal::delay::DelayNs;

use crate::airquality::{AirQualitySensor, ConcentrationKind};
use crate::bus::{BlockBus, Error};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PollConfig {
    /// Pause between two polling cycles.
    pub interval_ms: u32,
    /// Pause after setup before the first reading.
    pub warm_up_ms: u32,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval_ms: 2_000,
            warm_up_ms: 5_000,
        }
    }
}

/// Standard mass concentrations gathered in one polling cycle [μg/m³].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PmSample {
    pub pm1_0: u16,
    pub pm2_5: u16,
    pub pm10: u16,
}

impl fmt::Display for PmSample {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "PM2.5 {} μg/m³, PM1.0 {} μg/m³, PM10 {} μg/m³",
            self.pm2_5, self.pm1_0, self.pm10
        )
    }
}

pub struct Poller<BUS, D> {
    sensor: AirQualitySensor<BUS>,
    delay: D,
    config: PollConfig,
}

impl<BUS: BlockBus, D: DelayNs> Poller<BUS, D> {
    pub fn new(sensor: AirQualitySensor<BUS>, delay: D, config: PollConfig) -> Self {
        Self {
            sensor,
            delay,
            config,
        }
    }

    /// Puts the sensor into active reporting and reads its firmware version.
    ///
    /// A sensor failing here is not usable for the session, so errors are
    /// handed back instead of retried.
    pub fn setup(&mut self) -> Result<u8, Error<BUS::Error>> {
        self.sensor.set_active_reporting_mode()?;
        let version = self.sensor.read_version()?;
        debug!("sensor firmware version {}", version);
        self.delay.delay_ms(self.config.warm_up_ms);
        Ok(version)
    }

    pub fn sample(&mut self) -> Result<PmSample, Error<BUS::Error>> {
        let pm2_5 = self
            .sensor
            .read_concentration(ConcentrationKind::Pm2_5Standard)?;
        let pm1_0 = self
            .sensor
            .read_concentration(ConcentrationKind::Pm1_0Standard)?;
        let pm10 = self
            .sensor
            .read_concentration(ConcentrationKind::Pm10Standard)?;

        Ok(PmSample {
            pm1_0,
            pm2_5,
            pm10,
        })
    }

    /// Samples every `interval_ms` until `stop` returns true.
    ///
    /// `stop` is checked before each cycle. Errors go to `report` like samples
    /// and never end the loop.
    pub fn run<S, R>(&mut self, mut stop: S, mut report: R)
    where
        S: FnMut() -> bool,
        R: FnMut(&Result<PmSample, Error<BUS::Error>>),
    {
        let mut failures: u32 = 0;
        while !stop() {
            let result = self.sample();
            if result.is_err() {
                failures = failures.saturating_add(1);
                warn!(
                    "sensor read failed ({} in a row), retrying in {} ms",
                    failures,
                    self.config.interval_ms
                );
            } else {
                failures = 0;
            }
            report(&result);
            self.delay.delay_ms(self.config.interval_ms);
        }
    }

    pub fn release(self) -> (AirQualitySensor<BUS>, D) {
        (self.sensor, self.delay)
    }
}
