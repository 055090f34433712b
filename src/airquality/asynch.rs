//! Async flavour of [`super::AirQualitySensor`], built on `embedded-hal-async`.

use super::{
    ConcentrationKind, Config, CountKind, MAX_PAYLOAD_LEN, Measurement, Mode, measurement,
    particle_word, registers,
};
use crate::bus::{AsyncBlockBus, Error, check_len};

pub struct AirQualitySensor<BUS> {
    bus: BUS,
    config: Config,
}

impl<BUS> AirQualitySensor<BUS> {
    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn release(self) -> BUS {
        self.bus
    }
}

impl<BUS: AsyncBlockBus> AirQualitySensor<BUS> {
    pub fn new(bus: BUS, config: Config) -> Self {
        Self { bus, config }
    }

    pub async fn set_mode(&mut self, mode: Mode) -> Result<(), Error<BUS::Error>> {
        self.bus
            .write_block(
                self.config.address,
                registers::MODE,
                &[mode.code(&self.config)],
            )
            .await
    }

    pub async fn enter_low_power(&mut self) -> Result<(), Error<BUS::Error>> {
        self.set_mode(Mode::LowPower).await
    }

    pub async fn wake(&mut self) -> Result<(), Error<BUS::Error>> {
        self.set_mode(Mode::Awake).await
    }

    pub async fn set_active_reporting_mode(&mut self) -> Result<(), Error<BUS::Error>> {
        self.set_mode(Mode::ActiveReporting).await
    }

    pub async fn read_version(&mut self) -> Result<u8, Error<BUS::Error>> {
        let mut version = [0u8; registers::VERSION_LEN];
        self.read_exact(registers::VERSION, &mut version).await?;
        Ok(version[0])
    }

    pub async fn read_concentration(
        &mut self,
        kind: ConcentrationKind,
    ) -> Result<u16, Error<BUS::Error>> {
        let mut buf = [0u8; MAX_PAYLOAD_LEN];
        let payload = self.read_particles(&mut buf).await?;
        particle_word(payload, kind.offset())
    }

    pub async fn read_particle_count(&mut self, kind: CountKind) -> Result<u16, Error<BUS::Error>> {
        let mut buf = [0u8; MAX_PAYLOAD_LEN];
        let payload = self.read_particles(&mut buf).await?;
        particle_word(payload, kind.offset())
    }

    pub async fn read_measurement(&mut self) -> Result<Measurement, Error<BUS::Error>> {
        let mut buf = [0u8; MAX_PAYLOAD_LEN];
        let payload = self.read_particles(&mut buf).await?;
        measurement(payload, self.config.framing)
    }

    async fn read_particles<'b>(
        &mut self,
        buf: &'b mut [u8; MAX_PAYLOAD_LEN],
    ) -> Result<&'b [u8], Error<BUS::Error>> {
        let payload = &mut buf[..self.config.framing.payload_len()];
        self.read_exact(registers::PARTICLES, payload).await?;
        Ok(payload)
    }

    async fn read_exact(&mut self, register: u8, buf: &mut [u8]) -> Result<(), Error<BUS::Error>> {
        let actual = self
            .bus
            .read_block(self.config.address, register, buf)
            .await?;
        check_len(register, buf.len(), actual)
    }
}
