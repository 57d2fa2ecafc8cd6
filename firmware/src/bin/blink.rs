#![no_main]
#![no_std]

use cortex_m_rt::entry;
use defmt_rtt as _;
use panic_halt as _;

use stm32f0xx_hal::{delay::Delay, pac, prelude::*};

use stm32f0_bringup::blink::Blinker;
use stm32f0_bringup::config::{BLINK_PERIOD_MS, LED2, SYSCLK_HZ};
use stm32f0_bringup::gpio;
use stm32f0_bringup_firmware::GpioA;

#[entry]
fn main() -> ! {
    if let (Some(mut p), Some(cp)) = (pac::Peripherals::take(), cortex_m::Peripherals::take()) {
        let mut rcc = p
            .RCC
            .configure()
            .sysclk(SYSCLK_HZ.hz())
            .freeze(&mut p.FLASH);

        let gpioa = p.GPIOA.split(&mut rcc);
        let led = cortex_m::interrupt::free(move |_| {
            // SAFETY: We are in a critical section, but the `cortex_m` critical section
            // token is not compatible with the `bare_metal` token.
            let cs = unsafe { &bare_metal::CriticalSection::new() };
            gpioa.pa5.into_push_pull_output(cs)
        });
        // SAFETY: single thread, no interrupts enabled
        let mut port = unsafe { GpioA::steal() };
        gpio::configure_output(&mut port, &LED2);

        let delay = Delay::new(cp.SYST, &rcc);

        defmt::info!("blink: LD2 every {=u32} ms", BLINK_PERIOD_MS);
        Blinker::new(led, delay, BLINK_PERIOD_MS).run();
    }

    loop {
        continue;
    }
}
