//! Routing a USART's pins and clock before first use, and undoing it.

use crate::config::USART2_PINS;
use crate::gpio::{GpioImage, GpioRegisters, Mode, OutputType, Port, Pull, Speed};
use crate::uart::UartInstance;
use crate::Error;

/// A TX/RX pin pair on one port sharing one alternate function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AlternateFunctionPins {
    port: Port,
    tx: u8,
    rx: u8,
    af: u8,
    pull: Pull,
    speed: Speed,
}

impl AlternateFunctionPins {
    pub const fn new(port: Port, tx: u8, rx: u8, af: u8, pull: Pull, speed: Speed) -> Self {
        assert!(tx < 16 && rx < 16, "GPIO ports have 16 pins");
        assert!(tx != rx, "TX and RX need their own pins");
        assert!(af < 8, "the F0 has alternate functions 0..=7");
        Self {
            port,
            tx,
            rx,
            af,
            pull,
            speed,
        }
    }

    pub fn port(&self) -> Port {
        self.port
    }

    pub fn apply(&self, image: &mut GpioImage) {
        for pin in [self.tx, self.rx] {
            image.set_alternate(pin, self.af);
            image.set_output_type(pin, OutputType::PushPull);
            image.set_pull(pin, self.pull);
            image.set_speed(pin, self.speed);
            image.set_mode(pin, Mode::Alternate);
        }
    }

    /// Put both pins back to their reset configuration.
    pub fn release(&self, image: &mut GpioImage) {
        for pin in [self.tx, self.rx] {
            image.set_mode(pin, Mode::Input);
            image.set_alternate(pin, 0);
            image.set_output_type(pin, OutputType::PushPull);
            image.set_pull(pin, Pull::None);
            image.set_speed(pin, Speed::Low);
        }
    }
}

/// Peripheral clock enable bits in RCC.
pub trait ClockGate {
    fn enable(&mut self, instance: UartInstance);
    fn disable(&mut self, instance: UartInstance);
}

/// Pin routing for `instance`, if this board wires one up.
pub fn pins_for(instance: UartInstance) -> Result<&'static AlternateFunctionPins, Error> {
    match instance {
        UartInstance::Usart2 => Ok(&USART2_PINS),
        other => Err(Error::UnsupportedInstance(other)),
    }
}

/// Enable the clock of `instance` and hand its pins to it.
///
/// `port` must be the GPIO port named by the instance's routing.
pub fn setup<C, G>(instance: UartInstance, clocks: &mut C, port: &mut G) -> Result<(), Error>
where
    C: ClockGate,
    G: GpioRegisters,
{
    let pins = pins_for(instance)?;
    clocks.enable(instance);
    port.modify(|image| pins.apply(image));
    Ok(())
}

/// Reverse of [`setup`].
pub fn teardown<C, G>(instance: UartInstance, clocks: &mut C, port: &mut G) -> Result<(), Error>
where
    C: ClockGate,
    G: GpioRegisters,
{
    let pins = pins_for(instance)?;
    clocks.disable(instance);
    port.modify(|image| pins.release(image));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gpio::tests::FakePort;

    #[derive(Default)]
    struct FakeRcc {
        enabled: Vec<UartInstance>,
    }

    impl ClockGate for FakeRcc {
        fn enable(&mut self, instance: UartInstance) {
            if !self.enabled.contains(&instance) {
                self.enabled.push(instance);
            }
        }

        fn disable(&mut self, instance: UartInstance) {
            self.enabled.retain(|&i| i != instance);
        }
    }

    #[test]
    fn usart2_setup_routes_pa2_pa3_to_af1() {
        let mut rcc = FakeRcc::default();
        let mut gpioa = FakePort::default();

        setup(UartInstance::Usart2, &mut rcc, &mut gpioa).unwrap();

        assert_eq!(rcc.enabled, vec![UartInstance::Usart2]);
        assert_eq!(gpioa.image.moder, 0b1010 << 4);
        assert_eq!(gpioa.image.afrl, 0x0000_1100);
        assert_eq!(gpioa.image.pupdr, 0);
        assert_eq!(gpioa.image.ospeedr, 0);
    }

    #[test]
    fn teardown_restores_reset_state() {
        let mut rcc = FakeRcc::default();
        let mut gpioa = FakePort::default();
        let before = gpioa.image;

        setup(UartInstance::Usart2, &mut rcc, &mut gpioa).unwrap();
        teardown(UartInstance::Usart2, &mut rcc, &mut gpioa).unwrap();

        assert!(rcc.enabled.is_empty());
        assert_eq!(gpioa.image, before);
    }

    #[test]
    #[should_panic(expected = "GPIO ports have 16 pins")]
    fn pin_pair_rejects_pin_16() {
        AlternateFunctionPins::new(Port::A, 2, 16, 1, Pull::None, Speed::Low);
    }

    #[test]
    #[should_panic(expected = "alternate functions 0..=7")]
    fn pin_pair_rejects_af_8() {
        AlternateFunctionPins::new(Port::A, 9, 10, 8, Pull::None, Speed::Low);
    }

    #[test]
    fn usart2_routing_lives_on_port_a() {
        assert_eq!(pins_for(UartInstance::Usart2).unwrap().port(), Port::A);
    }

    #[test]
    fn other_instances_are_left_alone() {
        let mut rcc = FakeRcc::default();
        let mut gpioa = FakePort::default();

        assert_eq!(
            setup(UartInstance::Usart1, &mut rcc, &mut gpioa),
            Err(Error::UnsupportedInstance(UartInstance::Usart1))
        );
        assert!(rcc.enabled.is_empty());
        assert_eq!(gpioa.stores, 0);
    }

    #[test]
    fn setup_is_idempotent() {
        let mut rcc = FakeRcc::default();
        let mut once = FakePort::default();
        let mut twice = FakePort::default();

        setup(UartInstance::Usart2, &mut rcc, &mut once).unwrap();
        setup(UartInstance::Usart2, &mut rcc, &mut twice).unwrap();
        setup(UartInstance::Usart2, &mut rcc, &mut twice).unwrap();

        assert_eq!(once.image, twice.image);
        assert_eq!(rcc.enabled, vec![UartInstance::Usart2]);
    }
}
