//! GPIO port configuration as pure transformations of a register snapshot.

/// GPIO port letter. The F072 has no port E pins on the 64-pin package.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Port {
    A,
    B,
    C,
    D,
    F,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    Input,
    Output,
    Alternate,
    Analog,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OutputType {
    PushPull,
    OpenDrain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Pull {
    None,
    Up,
    Down,
}

/// Output slew-rate class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Speed {
    Low,
    Medium,
    High,
}

impl Mode {
    const fn bits(self) -> u32 {
        match self {
            Mode::Input => 0b00,
            Mode::Output => 0b01,
            Mode::Alternate => 0b10,
            Mode::Analog => 0b11,
        }
    }
}

impl Pull {
    const fn bits(self) -> u32 {
        match self {
            Pull::None => 0b00,
            Pull::Up => 0b01,
            Pull::Down => 0b10,
        }
    }
}

impl Speed {
    const fn bits(self) -> u32 {
        match self {
            Speed::Low => 0b00,
            Speed::Medium => 0b01,
            Speed::High => 0b11,
        }
    }
}

/// Snapshot of the configuration registers of one GPIO port.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GpioImage {
    pub moder: u32,
    pub otyper: u32,
    pub ospeedr: u32,
    pub pupdr: u32,
    pub afrl: u32,
    pub afrh: u32,
}

impl GpioImage {
    pub fn set_mode(&mut self, pin: u8, mode: Mode) {
        self.moder = replace_field(self.moder, pin, 2, mode.bits());
    }

    pub fn set_output_type(&mut self, pin: u8, output_type: OutputType) {
        let bit = match output_type {
            OutputType::PushPull => 0,
            OutputType::OpenDrain => 1,
        };
        self.otyper = replace_field(self.otyper, pin, 1, bit);
    }

    pub fn set_speed(&mut self, pin: u8, speed: Speed) {
        self.ospeedr = replace_field(self.ospeedr, pin, 2, speed.bits());
    }

    pub fn set_pull(&mut self, pin: u8, pull: Pull) {
        self.pupdr = replace_field(self.pupdr, pin, 2, pull.bits());
    }

    /// Select alternate function `af` (0..=7) for `pin`.
    pub fn set_alternate(&mut self, pin: u8, af: u8) {
        debug_assert!(af < 8, "the F0 has alternate functions 0..=7");
        let af = u32::from(af);
        if pin < 8 {
            self.afrl = replace_field(self.afrl, pin, 4, af);
        } else {
            self.afrh = replace_field(self.afrh, pin - 8, 4, af);
        }
    }

    pub fn mode(&self, pin: u8) -> Mode {
        match field(self.moder, pin, 2) {
            0b00 => Mode::Input,
            0b01 => Mode::Output,
            0b10 => Mode::Alternate,
            _ => Mode::Analog,
        }
    }

    pub fn alternate(&self, pin: u8) -> u8 {
        if pin < 8 {
            field(self.afrl, pin, 4) as u8
        } else {
            field(self.afrh, pin - 8, 4) as u8
        }
    }
}

fn replace_field(reg: u32, index: u8, width: u32, value: u32) -> u32 {
    debug_assert!(u32::from(index) < 32 / width, "field index out of range");
    let shift = u32::from(index) * width;
    let mask = ((1 << width) - 1) << shift;
    (reg & !mask) | ((value << shift) & mask)
}

fn field(reg: u32, index: u8, width: u32) -> u32 {
    debug_assert!(u32::from(index) < 32 / width, "field index out of range");
    (reg >> (u32::from(index) * width)) & ((1 << width) - 1)
}

/// Register access for one GPIO port.
pub trait GpioRegisters {
    fn load(&self) -> GpioImage;
    fn store(&mut self, image: &GpioImage);

    /// Read-modify-write the whole port.
    fn modify<F>(&mut self, f: F)
    where
        F: FnOnce(&mut GpioImage),
    {
        let mut image = self.load();
        f(&mut image);
        self.store(&image);
    }
}

/// A digital output pin's static configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct OutputPinConfig {
    port: Port,
    pin: u8,
    output_type: OutputType,
    pull: Pull,
    speed: Speed,
}

impl OutputPinConfig {
    pub const fn push_pull(port: Port, pin: u8, pull: Pull, speed: Speed) -> Self {
        Self::new(port, pin, OutputType::PushPull, pull, speed)
    }

    pub const fn open_drain(port: Port, pin: u8, pull: Pull, speed: Speed) -> Self {
        Self::new(port, pin, OutputType::OpenDrain, pull, speed)
    }

    const fn new(port: Port, pin: u8, output_type: OutputType, pull: Pull, speed: Speed) -> Self {
        assert!(pin < 16, "GPIO ports have 16 pins");
        Self {
            port,
            pin,
            output_type,
            pull,
            speed,
        }
    }

    pub fn port(&self) -> Port {
        self.port
    }

    pub fn pin(&self) -> u8 {
        self.pin
    }

    pub fn apply(&self, image: &mut GpioImage) {
        image.set_mode(self.pin, Mode::Output);
        image.set_output_type(self.pin, self.output_type);
        image.set_pull(self.pin, self.pull);
        image.set_speed(self.pin, self.speed);
    }
}

/// Configure `config.pin` on `port` as a digital output.
pub fn configure_output<G: GpioRegisters>(port: &mut G, config: &OutputPinConfig) {
    port.modify(|image| config.apply(image));
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Register block backed by plain memory, counting stores.
    #[derive(Default)]
    pub struct FakePort {
        pub image: GpioImage,
        pub stores: usize,
    }

    impl GpioRegisters for FakePort {
        fn load(&self) -> GpioImage {
            self.image
        }

        fn store(&mut self, image: &GpioImage) {
            self.image = *image;
            self.stores += 1;
        }
    }

    #[test]
    fn output_config_touches_only_its_pin() {
        // PA13/PA14 come out of reset as SWD alternate functions
        let reset = GpioImage {
            moder: 0x2800_0000,
            ospeedr: 0x0C00_0000,
            pupdr: 0x2400_0000,
            ..GpioImage::default()
        };
        let mut port = FakePort {
            image: reset,
            stores: 0,
        };
        let led = OutputPinConfig::push_pull(Port::A, 5, Pull::Up, Speed::High);

        configure_output(&mut port, &led);

        assert_eq!(port.image.moder, 0x2800_0400);
        assert_eq!(port.image.otyper, 0);
        assert_eq!(port.image.ospeedr, 0x0C00_0C00);
        assert_eq!(port.image.pupdr, 0x2400_0400);
        assert_eq!(port.image.mode(5), Mode::Output);
        assert_eq!(port.stores, 1);
    }

    #[test]
    fn configuring_twice_is_idempotent() {
        let led = OutputPinConfig::push_pull(Port::A, 5, Pull::None, Speed::High);
        let mut once = FakePort::default();
        configure_output(&mut once, &led);
        let mut twice = FakePort::default();
        configure_output(&mut twice, &led);
        configure_output(&mut twice, &led);

        assert_eq!(once.image, twice.image);
    }

    #[test]
    fn alternate_function_spans_both_afr_registers() {
        let mut image = GpioImage::default();
        image.set_alternate(3, 1);
        image.set_alternate(10, 4);

        assert_eq!(image.afrl, 0x0000_1000);
        assert_eq!(image.afrh, 0x0000_0400);
        assert_eq!(image.alternate(3), 1);
        assert_eq!(image.alternate(10), 4);
    }

    #[test]
    #[should_panic(expected = "GPIO ports have 16 pins")]
    fn output_config_rejects_pin_16() {
        OutputPinConfig::push_pull(Port::A, 16, Pull::None, Speed::Low);
    }

    #[test]
    #[should_panic(expected = "field index out of range")]
    fn image_rejects_pin_16() {
        GpioImage::default().set_mode(16, Mode::Output);
    }

    #[test]
    #[should_panic(expected = "alternate functions 0..=7")]
    fn image_rejects_af_8() {
        GpioImage::default().set_alternate(9, 8);
    }

    #[test]
    fn open_drain_config_sets_otyper_bit() {
        let config = OutputPinConfig::open_drain(Port::B, 3, Pull::Up, Speed::Low);
        let mut image = GpioImage::default();
        config.apply(&mut image);

        assert_eq!(image.otyper, 1 << 3);
        assert_eq!(image.mode(3), Mode::Output);
        assert_eq!((config.port(), config.pin()), (Port::B, 3));
    }

    #[test]
    fn open_drain_sets_otyper_bit() {
        let mut image = GpioImage::default();
        image.set_output_type(7, OutputType::OpenDrain);
        assert_eq!(image.otyper, 1 << 7);
        image.set_output_type(7, OutputType::PushPull);
        assert_eq!(image.otyper, 0);
    }
}
