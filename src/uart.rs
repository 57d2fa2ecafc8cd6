//! USART configuration and the enable sequence.
//!
//! Bit positions follow RM0091 (STM32F0x1/x2/x8 reference manual), section 27.8.

use crate::config::INIT_ACK_POLLS;
use crate::gpio::GpioRegisters;
use crate::pinmux::{self, ClockGate};
use crate::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UartInstance {
    Usart1,
    Usart2,
}

/// Frame length including the parity bit, as the hardware counts it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WordLength {
    Seven,
    Eight,
    Nine,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Parity {
    None,
    Even,
    Odd,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StopBits {
    One,
    Half,
    Two,
    OneAndHalf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    Tx,
    Rx,
    TxRx,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FlowControl {
    None,
    Rts,
    Cts,
    RtsCts,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Oversampling {
    By16,
    By8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UartConfig {
    pub instance: UartInstance,
    pub baud_rate: u32,
    pub word_length: WordLength,
    pub parity: Parity,
    pub stop_bits: StopBits,
    pub direction: Direction,
    pub flow_control: FlowControl,
    pub oversampling: Oversampling,
    pub one_bit_sampling: bool,
}

// CR1
const UE: u32 = 1 << 0;
const RE: u32 = 1 << 2;
const TE: u32 = 1 << 3;
const PS: u32 = 1 << 9;
const PCE: u32 = 1 << 10;
const M0: u32 = 1 << 12;
const OVER8: u32 = 1 << 15;
const M1: u32 = 1 << 28;
// CR2
const STOP_SHIFT: u32 = 12;
// CR3
const RTSE: u32 = 1 << 8;
const CTSE: u32 = 1 << 9;
const ONEBIT: u32 = 1 << 11;
// ISR
pub const ISR_TXE: u32 = 1 << 7;
pub const ISR_TEACK: u32 = 1 << 21;
pub const ISR_REACK: u32 = 1 << 22;

/// Register values for one configuration. `cr1` never carries UE; enabling is a
/// separate step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UartRegisters {
    pub cr1: u32,
    pub cr2: u32,
    pub cr3: u32,
    pub brr: u16,
}

impl UartRegisters {
    /// CR1 with the peripheral enabled.
    pub fn cr1_enabled(&self) -> u32 {
        self.cr1 | UE
    }

    /// ISR bits that must read back set once the peripheral is enabled.
    pub fn ack_mask(&self) -> u32 {
        let mut mask = 0;
        if self.cr1 & TE != 0 {
            mask |= ISR_TEACK;
        }
        if self.cr1 & RE != 0 {
            mask |= ISR_REACK;
        }
        mask
    }
}

impl UartConfig {
    /// BRR value for `pclk_hz`, rounded to the nearest divisor.
    pub fn brr(&self, pclk_hz: u32) -> Result<u16, Error> {
        let out_of_range = Error::BaudRateOutOfRange {
            baud_rate: self.baud_rate,
            pclk_hz,
        };
        if self.baud_rate == 0 {
            return Err(out_of_range);
        }

        let baud = u64::from(self.baud_rate);
        let scaled_clock = match self.oversampling {
            Oversampling::By16 => u64::from(pclk_hz),
            Oversampling::By8 => 2 * u64::from(pclk_hz),
        };
        let usartdiv = (scaled_clock + baud / 2) / baud;
        if !(16..=0xffff).contains(&usartdiv) {
            return Err(out_of_range);
        }

        let usartdiv = usartdiv as u16;
        Ok(match self.oversampling {
            Oversampling::By16 => usartdiv,
            // BRR[3] must stay clear; BRR[2:0] holds USARTDIV[3:0] >> 1
            Oversampling::By8 => (usartdiv & 0xfff0) | ((usartdiv & 0x000f) >> 1),
        })
    }

    pub fn registers(&self, pclk_hz: u32) -> Result<UartRegisters, Error> {
        let brr = self.brr(pclk_hz)?;

        let mut cr1 = match self.word_length {
            WordLength::Seven => M1,
            WordLength::Eight => 0,
            WordLength::Nine => M0,
        };
        cr1 |= match self.parity {
            Parity::None => 0,
            Parity::Even => PCE,
            Parity::Odd => PCE | PS,
        };
        cr1 |= match self.direction {
            Direction::Tx => TE,
            Direction::Rx => RE,
            Direction::TxRx => TE | RE,
        };
        if self.oversampling == Oversampling::By8 {
            cr1 |= OVER8;
        }

        let stop: u32 = match self.stop_bits {
            StopBits::One => 0b00,
            StopBits::Half => 0b01,
            StopBits::Two => 0b10,
            StopBits::OneAndHalf => 0b11,
        };
        let cr2 = stop << STOP_SHIFT;

        let mut cr3 = match self.flow_control {
            FlowControl::None => 0,
            FlowControl::Rts => RTSE,
            FlowControl::Cts => CTSE,
            FlowControl::RtsCts => RTSE | CTSE,
        };
        if self.one_bit_sampling {
            cr3 |= ONEBIT;
        }

        Ok(UartRegisters { cr1, cr2, cr3, brr })
    }
}

/// Register access for one USART.
pub trait UartHardware {
    /// Clear UE. Most configuration bits are write-protected while it is set.
    fn disable(&mut self);
    /// Write CR2, CR3, BRR and then CR1, leaving the peripheral disabled.
    fn write_registers(&mut self, registers: &UartRegisters);
    /// Write CR1 with UE set.
    fn enable(&mut self, cr1: u32);
    /// Raw ISR value.
    fn status(&self) -> u32;
}

/// Apply `config` and wait for the peripheral to acknowledge it.
///
/// The pins and the clock gate must already be set up, see [`crate::pinmux::setup`].
pub fn init<H: UartHardware>(
    hw: &mut H,
    config: &UartConfig,
    pclk_hz: u32,
) -> Result<UartRegisters, Error> {
    let registers = config.registers(pclk_hz)?;

    hw.disable();
    hw.write_registers(&registers);
    hw.enable(registers.cr1_enabled());

    let ack = registers.ack_mask();
    for _ in 0..INIT_ACK_POLLS {
        if hw.status() & ack == ack {
            return Ok(registers);
        }
        core::hint::spin_loop();
    }
    Err(Error::InitTimeout)
}

/// Route the pins, then [`init`]. Nothing is enabled if the instance has no routing.
pub fn bring_up<C, G, H>(
    clocks: &mut C,
    port: &mut G,
    hw: &mut H,
    config: &UartConfig,
    pclk_hz: u32,
) -> Result<UartRegisters, Error>
where
    C: ClockGate,
    G: GpioRegisters,
    H: UartHardware,
{
    pinmux::setup(config.instance, clocks, port)?;
    init(hw, config, pclk_hz)
}
