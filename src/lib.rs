//! Bring-up building blocks for an STM32F0 Nucleo-64 board: an LED blinker and a
//! polled USART greeter.
//!
//! Everything that touches hardware goes through a small trait (`GpioRegisters`,
//! `ClockGate`, `UartHardware`, `TxRegister`) so the same code runs on the chip and
//! against recording mocks on the host.

#![cfg_attr(not(test), no_std)]

pub mod blink;
pub mod config;
pub mod error;
pub mod fault;
pub mod gpio;
pub mod greeter;
pub mod pinmux;
pub mod serial;
pub mod uart;

pub use error::Error;
