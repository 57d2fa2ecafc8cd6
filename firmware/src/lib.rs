//! The library's hardware traits, implemented on the STM32F072 registers.

#![no_std]

use stm32f0_bringup::gpio::{GpioImage, GpioRegisters};
use stm32f0_bringup::pinmux::ClockGate;
use stm32f0_bringup::serial::TxRegister;
use stm32f0_bringup::uart::{UartHardware, UartInstance, UartRegisters};
use stm32f0xx_hal::pac;

/// GPIOA's configuration registers, after the HAL has split the port.
pub struct GpioA {
    _private: (),
}

impl GpioA {
    /// # Safety
    ///
    /// All access is read-modify-write of whole registers, so it must not race
    /// with anything else configuring port A (the HAL's pin conversions, an
    /// interrupt handler).
    pub unsafe fn steal() -> Self {
        GpioA { _private: () }
    }
}

impl GpioRegisters for GpioA {
    fn load(&self) -> GpioImage {
        let gpioa = unsafe { &*pac::GPIOA::ptr() };
        GpioImage {
            moder: gpioa.moder.read().bits(),
            otyper: gpioa.otyper.read().bits(),
            ospeedr: gpioa.ospeedr.read().bits(),
            pupdr: gpioa.pupdr.read().bits(),
            afrl: gpioa.afrl.read().bits(),
            afrh: gpioa.afrh.read().bits(),
        }
    }

    fn store(&mut self, image: &GpioImage) {
        unsafe {
            let gpioa = &*pac::GPIOA::ptr();
            gpioa.afrl.write(|w| w.bits(image.afrl));
            gpioa.afrh.write(|w| w.bits(image.afrh));
            gpioa.otyper.write(|w| w.bits(image.otyper));
            gpioa.ospeedr.write(|w| w.bits(image.ospeedr));
            gpioa.pupdr.write(|w| w.bits(image.pupdr));
            // mode last, so a pin never drives with a stale function selected
            gpioa.moder.write(|w| w.bits(image.moder));
        }
    }
}

/// The USART enable bits in RCC_APBxENR.
pub struct Rcc {
    _private: (),
}

impl Rcc {
    /// # Safety
    ///
    /// RCC is owned by the HAL's frozen clock configuration; only the USART
    /// enable bits may be changed through this, by read-modify-write.
    pub unsafe fn steal() -> Self {
        Rcc { _private: () }
    }
}

impl ClockGate for Rcc {
    fn enable(&mut self, instance: UartInstance) {
        let rcc = unsafe { &*pac::RCC::ptr() };
        match instance {
            UartInstance::Usart1 => rcc.apb2enr.modify(|_r, w| w.usart1en().set_bit()),
            UartInstance::Usart2 => rcc.apb1enr.modify(|_r, w| w.usart2en().set_bit()),
        }
    }

    fn disable(&mut self, instance: UartInstance) {
        let rcc = unsafe { &*pac::RCC::ptr() };
        match instance {
            UartInstance::Usart1 => rcc.apb2enr.modify(|_r, w| w.usart1en().clear_bit()),
            UartInstance::Usart2 => rcc.apb1enr.modify(|_r, w| w.usart2en().clear_bit()),
        }
    }
}

pub struct Usart2 {
    regs: pac::USART2,
}

impl Usart2 {
    pub fn new(regs: pac::USART2) -> Self {
        Self { regs }
    }

    pub fn free(self) -> pac::USART2 {
        self.regs
    }
}

impl UartHardware for Usart2 {
    fn disable(&mut self) {
        self.regs.cr1.modify(|_r, w| w.ue().clear_bit());
    }

    fn write_registers(&mut self, registers: &UartRegisters) {
        self.regs.cr2.write(|w| unsafe { w.bits(registers.cr2) });
        self.regs.cr3.write(|w| unsafe { w.bits(registers.cr3) });
        self.regs
            .brr
            .write(|w| unsafe { w.bits(u32::from(registers.brr)) });
        self.regs.cr1.write(|w| unsafe { w.bits(registers.cr1) });
    }

    fn enable(&mut self, cr1: u32) {
        self.regs.cr1.write(|w| unsafe { w.bits(cr1) });
    }

    fn status(&self) -> u32 {
        self.regs.isr.read().bits()
    }
}

impl TxRegister for Usart2 {
    fn tx_empty(&self) -> bool {
        self.regs.isr.read().txe().bit_is_set()
    }

    fn write_data(&mut self, byte: u8) {
        self.regs.tdr.write(|w| unsafe { w.bits(u32::from(byte)) });
    }
}
