use embedded_hal::i2c::{Error, Operation};

use crate::bus::{AsyncBlockBus, BlockBus};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DummyError {
    InvalidTest,
    Nack,
}

impl Error for DummyError {
    fn kind(&self) -> embedded_hal::i2c::ErrorKind {
        match &self {
            DummyError::InvalidTest => embedded_hal::i2c::ErrorKind::Other,
            DummyError::Nack => embedded_hal::i2c::ErrorKind::NoAcknowledge(
                embedded_hal::i2c::NoAcknowledgeSource::Address,
            ),
        }
    }
}

/// I2C bus answering every read with `response`.
///
/// The first `failures` transactions fail with a NACK. Every write operation
/// is recorded as its own bus message `(address, bytes)`.
pub struct DummyBus<'a> {
    pub response: &'a [u8],
    pub failures: usize,
    pub writes: Vec<(u8, Vec<u8>)>,
}

impl<'a> DummyBus<'a> {
    pub fn new(response: &'a [u8]) -> Self {
        Self {
            response,
            failures: 0,
            writes: Vec::new(),
        }
    }

    pub fn failing(response: &'a [u8], failures: usize) -> Self {
        Self {
            failures,
            ..Self::new(response)
        }
    }
}

impl embedded_hal::i2c::ErrorType for DummyBus<'_> {
    type Error = DummyError;
}

impl embedded_hal::i2c::I2c for DummyBus<'_> {
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [embedded_hal::i2c::Operation],
    ) -> Result<(), Self::Error> {
        if self.failures > 0 {
            self.failures -= 1;
            return Err(DummyError::Nack);
        }

        match operations {
            [Operation::Write(_), Operation::Read(response)] => {
                if response.len() != self.response.len() {
                    return Err(DummyError::InvalidTest);
                }

                response.copy_from_slice(self.response);

                Ok(())
            }
            [Operation::Write(bytes)] => {
                self.writes.push((address, bytes.to_vec()));

                Ok(())
            }
            // Other transactions are invalid
            _ => Err(DummyError::InvalidTest),
        }
    }
}

/// Transport that may deliver fewer bytes than requested, like an SMBus block read.
pub struct ShortBus<'a> {
    pub response: &'a [u8],
}

impl ShortBus<'_> {
    fn fill(&self, buf: &mut [u8]) -> usize {
        let len = self.response.len().min(buf.len());
        buf[..len].copy_from_slice(&self.response[..len]);
        len
    }
}

impl BlockBus for ShortBus<'_> {
    type Error = DummyError;

    fn read_block(
        &mut self,
        _address: u8,
        _register: u8,
        buf: &mut [u8],
    ) -> Result<usize, Self::Error> {
        Ok(self.fill(buf))
    }

    fn write_block(
        &mut self,
        _address: u8,
        _register: u8,
        _data: &[u8],
    ) -> Result<(), crate::Error<Self::Error>> {
        Ok(())
    }
}

impl AsyncBlockBus for ShortBus<'_> {
    type Error = DummyError;

    async fn read_block(
        &mut self,
        _address: u8,
        _register: u8,
        buf: &mut [u8],
    ) -> Result<usize, Self::Error> {
        Ok(self.fill(buf))
    }

    async fn write_block(
        &mut self,
        _address: u8,
        _register: u8,
        _data: &[u8],
    ) -> Result<(), crate::Error<Self::Error>> {
        Ok(())
    }
}

/// Delay that only adds up how long it was asked to wait.
#[derive(Debug, Default)]
pub struct CountingDelay {
    pub total_ns: u64,
}

impl embedded_hal::delay::DelayNs for CountingDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.total_ns += u64::from(ns);
    }
}
