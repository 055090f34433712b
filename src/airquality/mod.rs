use crate::bus::*;

pub mod asynch;
pub mod registers;
mod types;

pub use types::*;

const MAX_PAYLOAD_LEN: usize = registers::PARTICLES_LEN_UART;

/// Decodes the big-endian word at `offset` of a particle payload.
///
/// Offsets past the end of the payload are a protocol error: the 16-byte
/// framing only carries the first two particle count buckets.
fn particle_word<E>(payload: &[u8], offset: usize) -> Result<u16, Error<E>> {
    be_u16(payload, offset).ok_or(Error::Protocol {
        register: registers::PARTICLES,
        expected: offset + 2,
        actual: payload.len(),
    })
}

fn measurement<E>(payload: &[u8], framing: Framing) -> Result<Measurement, Error<E>> {
    check_len(registers::PARTICLES, framing.payload_len(), payload.len())?;
    Measurement::decode(payload).ok_or(Error::Protocol {
        register: registers::PARTICLES,
        expected: framing.payload_len(),
        actual: payload.len(),
    })
}

/// DFRobot SEN0460 particulate matter sensor on a register-addressed bus.
///
/// Every query reads the sensor afresh; nothing is cached and nothing is
/// retried.
pub struct AirQualitySensor<BUS> {
    device: Device<BUS>,
    config: Config,
}

impl<BUS> AirQualitySensor<BUS> {
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Gives the bus back.
    pub fn release(self) -> BUS {
        self.device.release()
    }
}

impl<BUS: BlockBus> AirQualitySensor<BUS> {
    pub fn new(bus: BUS, config: Config) -> Self {
        Self {
            device: Device::new(bus, config.address),
            config,
        }
    }

    /// Writes a mode command. Success only means the bus accepted the write,
    /// the sensor never acknowledges a mode change.
    pub fn set_mode(&mut self, mode: Mode) -> Result<(), Error<BUS::Error>> {
        self.device
            .write(registers::MODE, &[mode.code(&self.config)])
    }

    pub fn enter_low_power(&mut self) -> Result<(), Error<BUS::Error>> {
        self.set_mode(Mode::LowPower)
    }

    pub fn wake(&mut self) -> Result<(), Error<BUS::Error>> {
        self.set_mode(Mode::Awake)
    }

    /// Switches the sensor to continuous reporting. Has to be issued once
    /// before the particle register carries fresh values.
    pub fn set_active_reporting_mode(&mut self) -> Result<(), Error<BUS::Error>> {
        self.set_mode(Mode::ActiveReporting)
    }

    /// Reads the firmware version byte.
    pub fn read_version(&mut self) -> Result<u8, Error<BUS::Error>> {
        let mut version = [0u8; registers::VERSION_LEN];
        self.device.read_exact(registers::VERSION, &mut version)?;
        Ok(version[0])
    }

    /// Mass concentration in μg/m³.
    pub fn read_concentration(&mut self, kind: ConcentrationKind) -> Result<u16, Error<BUS::Error>> {
        let mut buf = [0u8; MAX_PAYLOAD_LEN];
        let payload = self.read_particles(&mut buf)?;
        particle_word(payload, kind.offset())
    }

    /// Number of particles per 0.1 L of air.
    pub fn read_particle_count(&mut self, kind: CountKind) -> Result<u16, Error<BUS::Error>> {
        let mut buf = [0u8; MAX_PAYLOAD_LEN];
        let payload = self.read_particles(&mut buf)?;
        particle_word(payload, kind.offset())
    }

    /// Decodes every concentration and count from a single register read.
    pub fn read_measurement(&mut self) -> Result<Measurement, Error<BUS::Error>> {
        let mut buf = [0u8; MAX_PAYLOAD_LEN];
        let payload = self.read_particles(&mut buf)?;
        measurement(payload, self.config.framing)
    }

    fn read_particles<'b>(
        &mut self,
        buf: &'b mut [u8; MAX_PAYLOAD_LEN],
    ) -> Result<&'b [u8], Error<BUS::Error>> {
        let payload = &mut buf[..self.config.framing.payload_len()];
        self.device.read_exact(registers::PARTICLES, payload)?;
        Ok(payload)
    }
}
