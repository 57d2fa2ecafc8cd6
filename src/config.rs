//! Board constants for the Nucleo-64 carrying an STM32F072RB.

use static_assertions::{const_assert, const_assert_eq};

use crate::gpio::{OutputPinConfig, Port, Pull, Speed};
use crate::pinmux::AlternateFunctionPins;
use crate::uart::{
    Direction, FlowControl, Oversampling, Parity, StopBits, UartConfig, UartInstance, WordLength,
};

/// HSI, left unmultiplied. PCLK runs at the same rate.
pub const SYSCLK_HZ: u32 = 8_000_000;

pub const BLINK_PERIOD_MS: u32 = 400;
pub const GREETING_PAUSE_MS: u32 = 500;
pub const FAULT_BLINK_PERIOD_MS: u32 = 1_000;

pub const GREETING: &[u8] = b"Hello World!\r\n";
const_assert_eq!(GREETING.len(), 14);

pub const BAUD_RATE: u32 = 9_600;
// 16x oversampling needs a divisor of at least 16 that still fits BRR
const_assert!(SYSCLK_HZ / BAUD_RATE >= 16);
const_assert!(SYSCLK_HZ / BAUD_RATE <= 0xffff);

/// Polls of TXE before giving up on a byte. One 8N1 frame at 9600 baud is about
/// 1 ms, i.e. 8000 core cycles; this leaves an order of magnitude of slack.
pub const TX_READY_POLLS: u32 = 100_000;

/// Polls of TEACK/REACK after setting UE.
pub const INIT_ACK_POLLS: u32 = 100_000;

/// User LED LD2 on PA5, as the blinker drives it.
pub const LED2: OutputPinConfig = OutputPinConfig::push_pull(Port::A, 5, Pull::None, Speed::High);

/// LD2 as the greeter drives it.
pub const LED2_PULL_UP: OutputPinConfig =
    OutputPinConfig::push_pull(Port::A, 5, Pull::Up, Speed::High);

/// USART2 is the port wired to the ST-LINK virtual COM port.
pub const USART2_CONFIG: UartConfig = UartConfig {
    instance: UartInstance::Usart2,
    baud_rate: BAUD_RATE,
    word_length: WordLength::Eight,
    parity: Parity::None,
    stop_bits: StopBits::One,
    direction: Direction::TxRx,
    flow_control: FlowControl::None,
    oversampling: Oversampling::By16,
    one_bit_sampling: false,
};

/// PA2 = USART2_TX, PA3 = USART2_RX.
pub const USART2_PINS: AlternateFunctionPins =
    AlternateFunctionPins::new(Port::A, 2, 3, 1, Pull::None, Speed::Low);
