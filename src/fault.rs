//! Terminal fault indication: one diagnostic line, LED on, then a slow blink
//! forever.

use core::fmt::Write;

use embedded_hal::blocking::delay::DelayMs;
use embedded_hal::digital::v2::{OutputPin, ToggleableOutputPin};

use crate::blink::Blinker;
use crate::config::FAULT_BLINK_PERIOD_MS;
use crate::Error;

pub struct FaultIndicator<P, D> {
    blinker: Blinker<P, D>,
}

impl<P, D> FaultIndicator<P, D>
where
    P: OutputPin + ToggleableOutputPin,
    D: DelayMs<u32>,
{
    /// Report `error` on `console` (best effort), then light the LED.
    pub fn enter<W: Write>(mut led: P, delay: D, console: &mut W, error: Error) -> Self {
        // the port may be what failed; nothing to do if this does not get through
        write!(console, "ERROR: {}\r\n", error).ok();
        led.set_high().ok();
        Self {
            blinker: Blinker::new(led, delay, FAULT_BLINK_PERIOD_MS),
        }
    }

    /// One step of the terminal loop.
    pub fn tick(&mut self) {
        self.blinker.tick().ok();
    }

    pub fn halt(self) -> ! {
        self.blinker.run()
    }

    #[cfg(test)]
    fn free(self) -> (P, D) {
        self.blinker.free()
    }
}

/// Enter the fault state and never come back.
pub fn escalate<P, D, W>(led: P, delay: D, console: &mut W, error: Error) -> !
where
    P: OutputPin + ToggleableOutputPin,
    D: DelayMs<u32>,
    W: Write,
{
    FaultIndicator::enter(led, delay, console, error).halt()
}
