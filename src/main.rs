//! usbkbd firmware entry point (nRF52840).
//!
//! Task layout:
//!
//! - `usb_device_task`: enumeration, suspend/resume, remote wakeup
//! - `usb_output_task`: host LED reports on the interrupt OUT endpoint
//! - `key_pin_task` (one per GPIO key): debounced press/release events
//! - `reporter_task`: folds events into the keyboard state and sends
//!   input reports

#![no_std]
#![no_main]

use embassy_executor::Spawner;
use embassy_nrf::config::HfclkSource;
use embassy_nrf::gpio::{Input, Level, Output, OutputDrive, Pull};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use usbkbd::config;
use usbkbd::events::{KeyChannel, KeySender};
use usbkbd::input::key_task;
use usbkbd::leds::LedBank;
use usbkbd::usb::handlers::Keyboard;
use usbkbd::usb::hid_device::{self, KeyboardRequestHandler, SharedLeds, UsbDriver, UsbTransport};
use usbkbd::usb::reporter::Reporter;

static KEYBOARD: Keyboard = Keyboard::new();
static KEY_EVENTS: KeyChannel = KeyChannel::new();
static LEDS: StaticCell<SharedLeds> = StaticCell::new();

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    // USB needs the crystal oscillator for full-speed timing.
    let mut nrf_config = embassy_nrf::config::Config::default();
    nrf_config.hfclk_source = HfclkSource::ExternalXtal;
    let p = embassy_nrf::init(nrf_config);

    defmt::info!("usbkbd starting");

    let led_level = if config::LED_ACTIVE_LOW {
        Level::High
    } else {
        Level::Low
    };
    let leds = LEDS.init(SharedLeds::new(LedBank::new(
        [
            Some(Output::new(p.P0_13, led_level, OutputDrive::Standard)),
            Some(Output::new(p.P0_14, led_level, OutputDrive::Standard)),
            Some(Output::new(p.P0_15, led_level, OutputDrive::Standard)),
        ],
        config::LED_ACTIVE_LOW,
    )));

    let usb = hid_device::init(p.USBD, &KEYBOARD, leds);

    spawner.must_spawn(usb_device_task(usb.device));
    spawner.must_spawn(usb_output_task(
        usb.reader,
        KeyboardRequestHandler::new(&KEYBOARD, leds),
    ));

    let key_pins = [
        Input::new(p.P0_11, Pull::Up),
        Input::new(p.P0_12, Pull::Up),
        Input::new(p.P0_24, Pull::Up),
        Input::new(p.P0_25, Pull::Up),
    ];
    for (pin, key) in key_pins.into_iter().zip(config::GPIO_KEYS) {
        spawner.must_spawn(key_pin_task(pin, key, KEY_EVENTS.sender()));
    }

    spawner.must_spawn(reporter_task(Reporter::new(
        &KEYBOARD,
        KEY_EVENTS.receiver(),
        usb.transport,
    )));

    defmt::info!("All tasks spawned");
}

#[embassy_executor::task]
async fn usb_device_task(device: embassy_usb::UsbDevice<'static, UsbDriver>) -> ! {
    hid_device::run_usb_device(device).await
}

#[embassy_executor::task]
async fn usb_output_task(
    reader: embassy_usb::class::hid::HidReader<'static, UsbDriver, 1>,
    handler: KeyboardRequestHandler,
) -> ! {
    hid_device::run_output_reader(reader, handler).await
}

#[embassy_executor::task(pool_size = 4)]
async fn key_pin_task(pin: Input<'static>, key: u16, tx: KeySender<'static>) -> ! {
    key_task(pin, key, tx).await
}

#[embassy_executor::task]
async fn reporter_task(mut reporter: Reporter<'static, UsbTransport>) -> ! {
    reporter.run().await
}
