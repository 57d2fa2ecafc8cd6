use core::fmt;

use crate::uart::UartInstance;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// The baud rate divisor does not fit the BRR register for this clock.
    BaudRateOutOfRange { baud_rate: u32, pclk_hz: u32 },
    /// No pin routing exists for this peripheral.
    UnsupportedInstance(UartInstance),
    /// The peripheral never acknowledged its transmitter/receiver enable.
    InitTimeout,
    /// The transmit data register never drained.
    TxTimeout,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::BaudRateOutOfRange { baud_rate, pclk_hz } => write!(
                f,
                "{} baud is out of range for a {} Hz peripheral clock",
                baud_rate, pclk_hz
            ),
            Error::UnsupportedInstance(instance) => {
                write!(f, "no pin routing for {:?}", instance)
            }
            Error::InitTimeout => f.write_str("UART did not acknowledge enable"),
            Error::TxTimeout => f.write_str("transmit register never emptied"),
        }
    }
}
