#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

mod fmt;

pub mod airquality;
mod bus;
pub mod poll;

#[cfg(test)]
mod debug_utils;

pub use airquality::{
    AirQualitySensor, ConcentrationKind, Config, CountKind, Framing, Measurement, Mode,
};
pub use bus::{AsyncBlockBus, BlockBus, Error};
pub use poll::{PmSample, PollConfig, Poller};
