use core::fmt;

use super::registers;
use crate::bus::be_u16;

/// Payload layout of the particle register, matching the sensor's
/// communication mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Framing {
    /// Group protocol, 16-byte particle payload.
    #[default]
    I2c,
    /// Alternate framing, 20-byte particle payload.
    Uart,
}

impl Framing {
    pub const fn payload_len(self) -> usize {
        match self {
            Framing::I2c => registers::PARTICLES_LEN_I2C,
            Framing::Uart => registers::PARTICLES_LEN_UART,
        }
    }
}

/// Sensor handle configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    /// 7-bit bus address of the sensor.
    pub address: u8,
    /// Must match the mode the device actually communicates in.
    pub framing: Framing,
    /// Command code for continuous active reporting. Not confirmed by a
    /// datasheet, so it can be overridden.
    pub active_mode_code: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            address: registers::DEFAULT_ADDR,
            framing: Framing::I2c,
            active_mode_code: registers::MODE_ACTIVE_REPORTING,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    LowPower,
    Awake,
    ActiveReporting,
}

impl Mode {
    pub(crate) fn code(self, config: &Config) -> u8 {
        match self {
            Mode::LowPower => registers::MODE_LOW_POWER,
            Mode::Awake => registers::MODE_AWAKE,
            Mode::ActiveReporting => config.active_mode_code,
        }
    }
}

/// Mass concentration categories, in payload order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum ConcentrationKind {
    Pm1_0Standard = 0,
    Pm2_5Standard = 1,
    Pm10Standard = 2,
    Pm1_0Atmospheric = 3,
    Pm2_5Atmospheric = 4,
    Pm10Atmospheric = 5,
}

impl ConcentrationKind {
    pub const ALL: [ConcentrationKind; 6] = [
        ConcentrationKind::Pm1_0Standard,
        ConcentrationKind::Pm2_5Standard,
        ConcentrationKind::Pm10Standard,
        ConcentrationKind::Pm1_0Atmospheric,
        ConcentrationKind::Pm2_5Atmospheric,
        ConcentrationKind::Pm10Atmospheric,
    ];

    pub const fn offset(self) -> usize {
        self as usize * 2
    }
}

impl fmt::Display for ConcentrationKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            ConcentrationKind::Pm1_0Standard => "PM1.0",
            ConcentrationKind::Pm2_5Standard => "PM2.5",
            ConcentrationKind::Pm10Standard => "PM10",
            ConcentrationKind::Pm1_0Atmospheric => "PM1.0 (atm)",
            ConcentrationKind::Pm2_5Atmospheric => "PM2.5 (atm)",
            ConcentrationKind::Pm10Atmospheric => "PM10 (atm)",
        };
        f.write_str(name)
    }
}

/// Particle count buckets: particles at least this size per 0.1 L of air.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum CountKind {
    Um0_3 = 0,
    Um0_5 = 1,
    Um1_0 = 2,
    Um2_5 = 3,
    Um5_0 = 4,
    Um10 = 5,
}

impl CountKind {
    pub const ALL: [CountKind; 6] = [
        CountKind::Um0_3,
        CountKind::Um0_5,
        CountKind::Um1_0,
        CountKind::Um2_5,
        CountKind::Um5_0,
        CountKind::Um10,
    ];

    pub const fn offset(self) -> usize {
        self as usize * 2 + registers::COUNT_OFFSET
    }
}

/// Every value of one particle register read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Measurement {
    /// Mass concentrations [μg/m³], indexed like [`ConcentrationKind::ALL`].
    pub concentrations: [u16; 6],
    /// Particle counts [per 0.1 L], indexed like [`CountKind::ALL`]. Buckets
    /// past the end of the payload are `None`; a 16-byte payload carries two.
    pub counts: [Option<u16>; 6],
}

impl Measurement {
    pub fn concentration(&self, kind: ConcentrationKind) -> u16 {
        self.concentrations[kind as usize]
    }

    pub fn count(&self, kind: CountKind) -> Option<u16> {
        self.counts[kind as usize]
    }

    pub(crate) fn decode(payload: &[u8]) -> Option<Self> {
        let mut measurement = Measurement::default();
        for (value, kind) in measurement
            .concentrations
            .iter_mut()
            .zip(ConcentrationKind::ALL)
        {
            *value = be_u16(payload, kind.offset())?;
        }
        for (value, kind) in measurement.counts.iter_mut().zip(CountKind::ALL) {
            *value = be_u16(payload, kind.offset());
        }
        Some(measurement)
    }
}

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "PM1.0 {} μg/m³, PM2.5 {} μg/m³, PM10 {} μg/m³",
            self.concentration(ConcentrationKind::Pm1_0Standard),
            self.concentration(ConcentrationKind::Pm2_5Standard),
            self.concentration(ConcentrationKind::Pm10Standard),
        )?;
        if let Some(count) = self.count(CountKind::Um0_3) {
            write!(f, ", {} particles >0.3μm/0.1L", count)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offsets() {
        let offsets: Vec<_> = ConcentrationKind::ALL.iter().map(|k| k.offset()).collect();
        assert_eq!(offsets, [0, 2, 4, 6, 8, 10]);

        let offsets: Vec<_> = CountKind::ALL.iter().map(|k| k.offset()).collect();
        assert_eq!(offsets, [12, 14, 16, 18, 20, 22]);
    }

    #[test]
    fn test_payload_len() {
        assert_eq!(Framing::I2c.payload_len(), 16);
        assert_eq!(Framing::Uart.payload_len(), 20);
    }

    #[test]
    fn test_mode_codes() {
        let config = Config::default();
        assert_eq!(Mode::LowPower.code(&config), 0x00);
        assert_eq!(Mode::Awake.code(&config), 0x02);
        assert_eq!(Mode::ActiveReporting.code(&config), 0x01);

        let config = Config {
            active_mode_code: 0x03,
            ..Config::default()
        };
        assert_eq!(Mode::ActiveReporting.code(&config), 0x03);
    }

    #[test]
    fn test_decode_too_short() {
        assert_eq!(Measurement::decode(&[0u8; 11]), None);
    }

    #[test]
    fn test_decode_counts_beyond_payload() {
        let mut payload = [0u8; 16];
        payload[12] = 0x03;
        payload[13] = 0xe8;
        let measurement = Measurement::decode(&payload).unwrap();
        assert_eq!(measurement.count(CountKind::Um0_3), Some(1000));
        assert_eq!(measurement.count(CountKind::Um0_5), Some(0));
        assert_eq!(measurement.count(CountKind::Um1_0), None);
        assert_eq!(measurement.count(CountKind::Um10), None);
    }

    #[test]
    fn test_display() {
        let measurement = Measurement {
            concentrations: [3, 7, 12, 0, 0, 0],
            counts: [Some(450), None, None, None, None, None],
        };
        assert_eq!(
            format!("{}", measurement),
            "PM1.0 3 μg/m³, PM2.5 7 μg/m³, PM10 12 μg/m³, 450 particles >0.3μm/0.1L"
        );
    }
}
