use embedded_hal::i2c::I2c;
use thiserror::Error;

#[derive(Clone, Copy, Hash, Debug, PartialEq, Eq, PartialOrd, Ord, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<BusError> {
    /// The bus answered, but with a payload of the wrong size for the register.
    #[error("register {register:#04x} returned {actual} bytes, expected {expected}")]
    Protocol {
        register: u8,
        expected: usize,
        actual: usize,
    },
    #[error(transparent)]
    Transport(#[from] BusError),
}

impl<E> embedded_hal::i2c::Error for Error<E>
where
    E: embedded_hal::i2c::Error,
{
    fn kind(&self) -> embedded_hal::i2c::ErrorKind {
        match self {
            Self::Transport(err) => err.kind(),
            _ => embedded_hal::i2c::ErrorKind::Other,
        }
    }
}

/// Longest block a single register write may carry, as for SMBus block writes.
pub const MAX_WRITE_LEN: usize = 32;

/// Register-addressed block transfers against a peer on a shared bus.
///
/// `read_block` reports how many bytes the peer actually delivered, which lets
/// transports with SMBus-style block reads surface short answers.
pub trait BlockBus {
    type Error;

    fn read_block(&mut self, address: u8, register: u8, buf: &mut [u8])
    -> Result<usize, Self::Error>;

    /// Writes `register` followed by `data` as one bus message.
    fn write_block(
        &mut self,
        address: u8,
        register: u8,
        data: &[u8],
    ) -> Result<(), Error<Self::Error>>;
}

/// Lays out `[register, data...]` in `frame`. Blocks longer than
/// [`MAX_WRITE_LEN`] are rejected.
fn write_frame<'b, E>(
    frame: &'b mut [u8; MAX_WRITE_LEN + 1],
    register: u8,
    data: &[u8],
) -> Result<&'b [u8], Error<E>> {
    let frame = frame.get_mut(..data.len() + 1).ok_or(Error::Protocol {
        register,
        expected: MAX_WRITE_LEN,
        actual: data.len(),
    })?;
    if let Some((first, rest)) = frame.split_first_mut() {
        *first = register;
        rest.copy_from_slice(data);
    }
    Ok(frame)
}

impl<I2C: I2c> BlockBus for I2C {
    type Error = I2C::Error;

    fn read_block(
        &mut self,
        address: u8,
        register: u8,
        buf: &mut [u8],
    ) -> Result<usize, Self::Error> {
        self.write_read(address, &[register], buf)?;
        Ok(buf.len())
    }

    fn write_block(
        &mut self,
        address: u8,
        register: u8,
        data: &[u8],
    ) -> Result<(), Error<Self::Error>> {
        let mut frame = [0u8; MAX_WRITE_LEN + 1];
        self.write(address, write_frame(&mut frame, register, data)?)?;
        Ok(())
    }
}

/// Async counterpart of [`BlockBus`].
#[allow(async_fn_in_trait)]
pub trait AsyncBlockBus {
    type Error;

    async fn read_block(
        &mut self,
        address: u8,
        register: u8,
        buf: &mut [u8],
    ) -> Result<usize, Self::Error>;

    async fn write_block(
        &mut self,
        address: u8,
        register: u8,
        data: &[u8],
    ) -> Result<(), Error<Self::Error>>;
}

impl<I2C: embedded_hal_async::i2c::I2c> AsyncBlockBus for I2C {
    type Error = I2C::Error;

    async fn read_block(
        &mut self,
        address: u8,
        register: u8,
        buf: &mut [u8],
    ) -> Result<usize, Self::Error> {
        self.write_read(address, &[register], buf).await?;
        Ok(buf.len())
    }

    async fn write_block(
        &mut self,
        address: u8,
        register: u8,
        data: &[u8],
    ) -> Result<(), Error<Self::Error>> {
        let mut frame = [0u8; MAX_WRITE_LEN + 1];
        self.write(address, write_frame(&mut frame, register, data)?)
            .await?;
        Ok(())
    }
}

/// Rejects a read whose delivered length differs from the requested one.
pub(crate) fn check_len<E>(register: u8, expected: usize, actual: usize) -> Result<(), Error<E>> {
    if actual != expected {
        Err(Error::Protocol {
            register,
            expected,
            actual,
        })
    } else {
        Ok(())
    }
}

pub(crate) fn be_u16(payload: &[u8], offset: usize) -> Option<u16> {
    match payload.get(offset..offset + 2)? {
        [hi, lo] => Some(u16::from_be_bytes([*hi, *lo])),
        _ => None,
    }
}

pub struct Device<BUS> {
    bus: BUS,
    addr: u8,
}

impl<BUS> Device<BUS> {
    pub fn new(bus: BUS, addr: u8) -> Self {
        Self { bus, addr }
    }

    pub fn release(self) -> BUS {
        self.bus
    }
}

impl<BUS: BlockBus> Device<BUS> {
    /// Fills `buf` from `register`; anything but a full buffer is a protocol error.
    pub fn read_exact(&mut self, register: u8, buf: &mut [u8]) -> Result<(), Error<BUS::Error>> {
        let actual = self.bus.read_block(self.addr, register, buf)?;
        check_len(register, buf.len(), actual)
    }

    pub fn write(&mut self, register: u8, data: &[u8]) -> Result<(), Error<BUS::Error>> {
        self.bus.write_block(self.addr, register, data)
    }
}
