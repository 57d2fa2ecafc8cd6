//! Polled, byte-at-a-time transmit.

use core::convert::Infallible;
use core::fmt;

use crate::config::TX_READY_POLLS;
use crate::Error;

/// The two pieces of a USART the transmitter needs.
pub trait TxRegister {
    /// TXE: the data register may take another byte.
    fn tx_empty(&self) -> bool;
    /// Write TDR. Only called right after `tx_empty` returned true.
    fn write_data(&mut self, byte: u8);
}

pub struct Transmitter<R> {
    regs: R,
    ready_polls: u32,
}

impl<R: TxRegister> Transmitter<R> {
    pub fn new(regs: R) -> Self {
        Self::with_ready_polls(regs, TX_READY_POLLS)
    }

    pub fn with_ready_polls(regs: R, ready_polls: u32) -> Self {
        Self {
            regs,
            ready_polls: ready_polls.max(1),
        }
    }

    /// Wait for TXE, then send `byte`.
    pub fn put_char(&mut self, byte: u8) -> Result<(), Error> {
        for _ in 0..self.ready_polls {
            if self.regs.tx_empty() {
                self.regs.write_data(byte);
                return Ok(());
            }
            core::hint::spin_loop();
        }
        Err(Error::TxTimeout)
    }

    pub fn put_bytes(&mut self, bytes: &[u8]) -> Result<(), Error> {
        bytes.iter().try_for_each(|&byte| self.put_char(byte))
    }

    pub fn free(self) -> R {
        self.regs
    }
}

impl<R: TxRegister> embedded_hal::serial::Write<u8> for Transmitter<R> {
    type Error = Infallible;

    fn write(&mut self, byte: u8) -> nb::Result<(), Self::Error> {
        if !self.regs.tx_empty() {
            return Err(nb::Error::WouldBlock);
        }
        self.regs.write_data(byte);
        Ok(())
    }

    fn flush(&mut self) -> nb::Result<(), Self::Error> {
        if self.regs.tx_empty() {
            Ok(())
        } else {
            Err(nb::Error::WouldBlock)
        }
    }
}

impl<R: TxRegister> fmt::Write for Transmitter<R> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.put_bytes(s.as_bytes()).map_err(|_| fmt::Error)
    }
}
