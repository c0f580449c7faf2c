//! # Adaline keypad trainer firmware
//!
//! Runs the LMS trainer on an STM32 Nucleo-F446RE.
//!
//! ## What This Code Does
//! - Scans a 4x4 key matrix; each key press flips one input of the pattern
//! - Samples two teach buttons; holding one trains toward +1 or -1
//! - Holding both opens the menu (reset weights, edit learning rate)
//! - Shows the weights, the squashed output and the key states on an OLED
//! - Runs one control cycle per TIM2 interrupt (no busy loops)
//!
//! ## Hardware
//! - Board: STM32 Nucleo-F446RE
//! - Display: SSD1306 OLED 128x64 via I2C (SCL=PB8, SDA=PB9)
//! - LED: LD2 on PA5, lit while the verdict is positive
//! - See `board` for the key matrix and button wiring

// ============================================================================
// COMPILER DIRECTIVES
// ============================================================================

#![no_std]
#![no_main]

// ============================================================================
// PANIC AND DEBUG INFRASTRUCTURE
// ============================================================================

// Panics print over defmt and halt
use panic_probe as _;

// defmt logging over RTT
use defmt_rtt as _;

mod board;

use rtic::app;

use adaline_trellis::{Config, Device, Error};

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Control loop settings: 20 Hz cycle, mu = 0.002, four editable digits.
const CONFIG: Config = Config::DEFAULT;

/// Log a fatal bring-up error and stop. There is no degraded mode.
fn halt(err: Error) -> ! {
    defmt::error!("halted: {}", err);
    loop {
        cortex_m::asm::nop();
    }
}

// ============================================================================
// RTIC APPLICATION
// ============================================================================

#[app(
    device = stm32f4xx_hal::pac,
    peripherals = true,
    dispatchers = [EXTI0]
)]
mod app {
    use super::*;

    use core::mem::MaybeUninit;

    use adaline_trellis::{Trainer, WeightVector};
    use rand::rngs::SmallRng;
    use rand::SeedableRng;
    use ssd1306::{prelude::*, Ssd1306};
    use stm32f4xx_hal::{
        adc::{config::AdcConfig, Adc},
        i2c::I2c,
        pac,
        prelude::*,
        timer::{CounterHz, Event, Flag, Timer},
    };

    use crate::board::{self, I2cBus, Keypad, Panel, TeachButtons};

    /// The trainer with this board's devices plugged in.
    type BoardTrainer = Trainer<Keypad, TeachButtons, Panel>;

    // ========================================================================
    // SHARED RESOURCES
    // ========================================================================

    // Everything belongs to the control task
    #[shared]
    struct Shared {}

    // ========================================================================
    // LOCAL RESOURCES
    // ========================================================================

    #[local]
    struct Local {
        // Cycle clock, fires at CONFIG.tick_hz
        timer: CounterHz<pac::TIM2>,

        // Learning state and devices
        trainer: BoardTrainer,
    }

    // ========================================================================
    // INITIALIZATION TASK
    // ========================================================================

    #[init]
    fn init(cx: init::Context) -> (Shared, Local) {
        defmt::println!("Starting init...");

        if let Err(err) = CONFIG.validate() {
            halt(err);
        }

        let dp = cx.device;

        // ====================================================================
        // STEP 1: CLOCKS
        // ====================================================================

        // External 8 MHz crystal, 48 MHz system clock
        let rcc = dp.RCC.constrain();
        let clocks = rcc.cfgr.use_hse(8.MHz()).sysclk(48.MHz()).freeze();
        defmt::println!("System initialized at {} MHz", clocks.sysclk().to_Hz() / 1_000_000);

        // ====================================================================
        // STEP 2: GPIO
        // ====================================================================

        let gpioa = dp.GPIOA.split();
        let gpiob = dp.GPIOB.split();
        let gpioc = dp.GPIOC.split();

        let led = gpioa.pa5.into_push_pull_output();

        let buttons = TeachButtons::new(
            gpioa.pa1.into_pull_up_input(),
            gpioa.pa0.into_pull_up_input(),
        );

        let keypad = Keypad::new(
            [
                gpioc.pc0.into_push_pull_output().erase(),
                gpioc.pc1.into_push_pull_output().erase(),
                gpioc.pc2.into_push_pull_output().erase(),
                gpioc.pc3.into_push_pull_output().erase(),
            ],
            [
                gpioc.pc4.into_pull_up_input().erase(),
                gpioc.pc5.into_pull_up_input().erase(),
                gpioc.pc6.into_pull_up_input().erase(),
                gpioc.pc7.into_pull_up_input().erase(),
            ],
        );

        // ====================================================================
        // STEP 3: RANDOM START WEIGHTS
        // ====================================================================

        // Seed from conversion noise on a floating pin
        let noise_pin = gpioa.pa4.into_analog();
        let mut adc = Adc::adc1(dp.ADC1, true, AdcConfig::default());
        let seed = board::startup::noise_seed(&mut adc, &noise_pin);
        let mut rng = SmallRng::seed_from_u64(seed);
        let weights = WeightVector::random(&mut rng, CONFIG.weight_init_span);
        defmt::debug!("seed {=u64:#x}, weights {}", seed, weights);

        // ====================================================================
        // STEP 4: SHARED I2C BUS
        // ====================================================================

        let scl = gpiob.pb8.into_alternate().set_open_drain();
        let sda = gpiob.pb9.into_alternate().set_open_drain();
        let i2c = I2c::new(dp.I2C1, (scl, sda), 400.kHz(), &clocks);

        // The bus manager must outlive every proxy. init() runs once, before
        // interrupts are enabled, so writing the static here is sound.
        static mut I2C_BUS: MaybeUninit<I2cBus> = MaybeUninit::uninit();
        let bus: &'static I2cBus = unsafe {
            let bus_ptr = core::ptr::addr_of_mut!(I2C_BUS).cast::<I2cBus>();
            bus_ptr.write(I2cBus::new(i2c));
            &*bus_ptr
        };

        let responders = board::startup::scan(&mut bus.acquire_i2c());
        if responders == 0 {
            halt(Error::DeviceInit(Device::Bus));
        }
        if responders & (1 << board::PANEL_ADDRESS) == 0 {
            halt(Error::DeviceInit(Device::Panel));
        }

        // ====================================================================
        // STEP 5: OLED PANEL
        // ====================================================================

        let interface = I2CInterface::new(bus.acquire_i2c(), board::PANEL_ADDRESS, 0x40);
        let mut oled = Ssd1306::new(interface, DisplaySize128x64, DisplayRotation::Rotate0)
            .into_buffered_graphics_mode();
        if oled.init().is_err() {
            halt(Error::DeviceInit(Device::Panel));
        }
        defmt::println!("SSD1306 initialized");

        let panel = Panel::new(oled, led);

        let trainer = match BoardTrainer::new(CONFIG, weights, keypad, buttons, panel) {
            Ok(trainer) => trainer,
            Err(err) => halt(err),
        };

        // ====================================================================
        // STEP 6: CYCLE TIMER
        // ====================================================================

        let mut timer = Timer::new(dp.TIM2, &clocks).counter_hz();
        if timer.start(CONFIG.tick_hz.Hz()).is_err() {
            halt(Error::InvalidConfig("tick_hz out of timer range"));
        }
        timer.listen(Event::Update);

        defmt::println!("Init complete, {} ms cycle", CONFIG.tick_ms());

        (Shared {}, Local { timer, trainer })
    }

    // ========================================================================
    // CONTROL CYCLE
    // ========================================================================

    // One full trainer cycle per timer update: keys, output, teach or menu,
    // displays.
    #[task(binds = TIM2, local = [timer, trainer])]
    fn tim2_handler(cx: tim2_handler::Context) {
        // Acknowledge the interrupt or it fires again immediately
        cx.local.timer.clear_flags(Flag::Update);

        match cx.local.trainer.cycle() {
            Ok(report) => defmt::trace!("{}", report),
            // A failed draw is retried on the next tick
            Err(err) => defmt::warn!("cycle failed: {}", err),
        }
    }

    // ========================================================================
    // IDLE TASK
    // ========================================================================

    #[idle]
    fn idle(_: idle::Context) -> ! {
        loop {
            cortex_m::asm::wfi();
        }
    }
}
