#![no_main]
#![no_std]

use cortex_m_rt::entry;
use defmt_rtt as _;
use panic_halt as _;

use stm32f0xx_hal::{delay::Delay, pac, prelude::*};

use stm32f0_bringup::config::{LED2_PULL_UP, SYSCLK_HZ, USART2_CONFIG};
use stm32f0_bringup::greeter::Greeter;
use stm32f0_bringup::serial::Transmitter;
use stm32f0_bringup::{fault, gpio, uart};
use stm32f0_bringup_firmware::{GpioA, Rcc, Usart2};

#[entry]
fn main() -> ! {
    if let (Some(mut p), Some(cp)) = (pac::Peripherals::take(), cortex_m::Peripherals::take()) {
        let mut rcc = p
            .RCC
            .configure()
            .sysclk(SYSCLK_HZ.hz())
            .freeze(&mut p.FLASH);
        let pclk_hz = rcc.clocks.pclk().0;

        let gpioa = p.GPIOA.split(&mut rcc);
        let led = cortex_m::interrupt::free(move |_| {
            // SAFETY: We are in a critical section, but the `cortex_m` critical section
            // token is not compatible with the `bare_metal` token.
            let cs = unsafe { &bare_metal::CriticalSection::new() };
            gpioa.pa5.into_push_pull_output(cs)
        });

        // SAFETY: single thread, no interrupts enabled, and the HAL is done with
        // both blocks
        let (mut port, mut clocks) = unsafe { (GpioA::steal(), Rcc::steal()) };
        gpio::configure_output(&mut port, &LED2_PULL_UP);

        let mut delay = Delay::new(cp.SYST, &rcc);
        let mut usart2 = Usart2::new(p.USART2);

        match uart::bring_up(&mut clocks, &mut port, &mut usart2, &USART2_CONFIG, pclk_hz) {
            Ok(registers) => defmt::info!(
                "USART2 up at {=u32} baud, BRR={=u16}",
                USART2_CONFIG.baud_rate,
                registers.brr
            ),
            Err(error) => {
                defmt::error!("USART2 bring-up failed: {}", error);
                let mut console = Transmitter::new(usart2);
                fault::escalate(led, delay, &mut console, error);
            }
        }

        let mut tx = Transmitter::new(usart2);
        match Greeter::default().run(&mut tx, &mut delay) {
            Ok(never) => match never {},
            Err(error) => {
                defmt::error!("greeting stalled: {}", error);
                fault::escalate(led, delay, &mut tx, error);
            }
        }
    }

    loop {
        continue;
    }
}
