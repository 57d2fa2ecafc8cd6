use stm32f0_bringup::config::USART2_CONFIG;
use stm32f0_bringup::uart::{Oversampling, UartConfig};

type Rational = num_rational::Rational64;

// the receiver tolerates a few percent of total clock mismatch; stay well inside it
static TOLERANCE: Rational = Rational::new_raw(1, 100);

static BAUD_RATES: [u32; 7] = [1_200, 2_400, 9_600, 19_200, 38_400, 57_600, 115_200];

/// Baud rate the hardware actually produces for a BRR value.
fn achieved(pclk_hz: u32, oversampling: Oversampling, brr: u16) -> Rational {
    let pclk = i64::from(pclk_hz);
    let brr = i64::from(brr);
    match oversampling {
        Oversampling::By16 => Rational::new(pclk, brr),
        Oversampling::By8 => {
            let usartdiv = (brr & 0xfff0) | ((brr & 0x7) << 1);
            Rational::new(2 * pclk, usartdiv)
        }
    }
}

fn percent(r: Rational) -> f64 {
    100.0 * *r.numer() as f64 / *r.denom() as f64
}

fn main() {
    // HSI multiplied by the PLL in 8 MHz steps, up to the 48 MHz limit
    let sysclk_range = (8..=48).step_by(8).map(|mhz| mhz * 1_000_000);

    let mut usable: u64 = 0;

    println!("sysclk_hz  oversampling  baud     brr     achieved     error");
    for pclk_hz in sysclk_range {
        for oversampling in [Oversampling::By16, Oversampling::By8] {
            let label = match oversampling {
                Oversampling::By16 => "16x",
                Oversampling::By8 => "8x",
            };
            for &baud_rate in BAUD_RATES.iter() {
                let config = UartConfig {
                    baud_rate,
                    oversampling,
                    ..USART2_CONFIG
                };
                let brr = match config.brr(pclk_hz) {
                    Ok(brr) => brr,
                    Err(error) => {
                        println!("{:<10} {:<13} {:<8} {}", pclk_hz, label, baud_rate, error);
                        continue;
                    }
                };

                let actual = achieved(pclk_hz, oversampling, brr);
                let wanted = Rational::from_integer(i64::from(baud_rate));
                let error = (actual - wanted) / wanted;
                if error <= TOLERANCE && error >= -TOLERANCE {
                    usable += 1;
                }

                println!(
                    "{:<10} {:<13} {:<8} {:#06x}  {:<12.2} {:+.3}%",
                    pclk_hz,
                    label,
                    baud_rate,
                    brr,
                    *actual.numer() as f64 / *actual.denom() as f64,
                    percent(error),
                );
            }
        }
    }

    dbg!(usable);
}
