//! One-shot helpers used during init: bus scan and RNG seeding.

use stm32f4xx_hal::adc::{config::SampleTime, Adc};
use stm32f4xx_hal::gpio::{Analog, Pin};
use stm32f4xx_hal::hal_02::blocking::i2c::Write;
use stm32f4xx_hal::pac;

use super::I2cProxy;

/// Probe every 7-bit address with an empty write and log the ones that ACK.
/// Returns a bitmap of responders, bit `n` for address `n`.
pub fn scan(probe: &mut I2cProxy) -> u128 {
    let mut found = 0u128;
    for address in 1u8..127 {
        if probe.write(address, &[]).is_ok() {
            defmt::info!("i2c: device at {=u8:#x}", address);
            found |= 1 << address;
        }
    }
    if found == 0 {
        defmt::warn!("i2c: no devices answered");
    }
    found
}

/// Fold the low bits of repeated conversions on a floating pin into a seed.
pub fn noise_seed(adc: &mut Adc<pac::ADC1>, pin: &Pin<'A', 4, Analog>) -> u64 {
    let mut seed = 0u64;
    for _ in 0..64 {
        let sample = adc.convert(pin, SampleTime::Cycles_3);
        seed = seed.rotate_left(5) ^ u64::from(sample);
    }
    seed
}
