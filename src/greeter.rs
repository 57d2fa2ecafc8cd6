use core::convert::Infallible;

use embedded_hal::blocking::delay::DelayMs;

use crate::config::{GREETING, GREETING_PAUSE_MS};
use crate::serial::{Transmitter, TxRegister};
use crate::Error;

/// Sends a fixed message over and over with a pause after each pass.
#[derive(Debug, Clone, Copy)]
pub struct Greeter<'a> {
    message: &'a [u8],
    pause_ms: u32,
}

impl Default for Greeter<'static> {
    fn default() -> Self {
        Self::new(GREETING, GREETING_PAUSE_MS)
    }
}

impl<'a> Greeter<'a> {
    /// `message` ends at its last byte or at the first NUL, whichever comes first.
    pub const fn new(message: &'a [u8], pause_ms: u32) -> Self {
        Self { message, pause_ms }
    }

    /// Transmit the message once. Returns the number of bytes sent.
    pub fn send<R: TxRegister>(&self, tx: &mut Transmitter<R>) -> Result<usize, Error> {
        let mut cursor = 0;
        while let Some(&byte) = self.message.get(cursor) {
            if byte == 0 {
                break;
            }
            tx.put_char(byte)?;
            cursor += 1;
        }
        Ok(cursor)
    }

    /// One pass: the message, then the pause.
    pub fn pass<R, D>(&self, tx: &mut Transmitter<R>, delay: &mut D) -> Result<usize, Error>
    where
        R: TxRegister,
        D: DelayMs<u32>,
    {
        let sent = self.send(tx)?;
        delay.delay_ms(self.pause_ms);
        Ok(sent)
    }

    /// Repeat [`Greeter::pass`] until a byte stalls.
    pub fn run<R, D>(&self, tx: &mut Transmitter<R>, delay: &mut D) -> Result<Infallible, Error>
    where
        R: TxRegister,
        D: DelayMs<u32>,
    {
        loop {
            self.pass(tx, delay)?;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::serial::tests::ScriptedTx;

    #[derive(Default)]
    struct RecordingDelay(Vec<u32>);

    impl DelayMs<u32> for RecordingDelay {
        fn delay_ms(&mut self, ms: u32) {
            self.0.push(ms);
        }
    }

    #[test]
    fn one_pass_sends_fourteen_bytes_then_pauses() {
        let mut tx = Transmitter::new(ScriptedTx::always(true));
        let mut delay = RecordingDelay::default();

        let sent = Greeter::default().pass(&mut tx, &mut delay).unwrap();

        assert_eq!(sent, 14);
        assert_eq!(tx.free().written(), b"Hello World!\r\n");
        assert_eq!(delay.0, vec![500]);
    }

    #[test]
    fn stops_at_nul() {
        let mut tx = Transmitter::new(ScriptedTx::always(true));
        let greeter = Greeter::new(b"Hi\0ignored", 10);

        assert_eq!(greeter.send(&mut tx), Ok(2));
        assert_eq!(tx.free().written(), b"Hi");
    }

    #[test]
    fn cursor_restarts_every_pass() {
        let mut tx = Transmitter::new(ScriptedTx::always(true));
        let mut delay = RecordingDelay::default();
        let greeter = Greeter::new(b"ab", 1);

        greeter.pass(&mut tx, &mut delay).unwrap();
        greeter.pass(&mut tx, &mut delay).unwrap();

        assert_eq!(tx.free().written(), b"abab");
    }

    #[test]
    fn a_stall_aborts_the_pass_and_skips_the_pause() {
        // ready for 'H' and 'e', then the line goes dead
        let regs = ScriptedTx::scripted(vec![true, true], false);
        let mut tx = Transmitter::with_ready_polls(regs, 10);
        let mut delay = RecordingDelay::default();

        let result = Greeter::default().run(&mut tx, &mut delay);

        assert_eq!(result.unwrap_err(), Error::TxTimeout);
        assert!(delay.0.is_empty());
        assert_eq!(tx.free().written(), b"He");
    }
}
