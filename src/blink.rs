use embedded_hal::blocking::delay::DelayMs;
use embedded_hal::digital::v2::ToggleableOutputPin;

/// Toggles a pin once per period.
pub struct Blinker<P, D> {
    led: P,
    delay: D,
    period_ms: u32,
}

impl<P, D> Blinker<P, D>
where
    P: ToggleableOutputPin,
    D: DelayMs<u32>,
{
    pub fn new(led: P, delay: D, period_ms: u32) -> Self {
        Self {
            led,
            delay,
            period_ms,
        }
    }

    /// Invert the pin, then wait one period.
    pub fn tick(&mut self) -> Result<(), P::Error> {
        self.led.toggle()?;
        self.delay.delay_ms(self.period_ms);
        Ok(())
    }

    pub fn run(mut self) -> ! {
        loop {
            // board pins are infallible; a failed toggle just shows up as a missed blink
            self.tick().ok();
        }
    }

    pub fn free(self) -> (P, D) {
        (self.led, self.delay)
    }
}
