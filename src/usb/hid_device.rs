//! USB HID keyboard device on the nRF52840.
//!
//! Initialises the Embassy USB stack on the hardware USB peripheral and
//! exposes one boot-keyboard interface.  Host requests and bus events
//! are forwarded to the shared [`Keyboard`]; input reports go out via
//! [`UsbTransport`], which the reporter loop drives.

use core::cell::RefCell;
use core::sync::atomic::{AtomicBool, Ordering};

use embassy_futures::select::{select, Either};
use embassy_nrf::gpio::Output;
use embassy_nrf::usb::vbus_detect::HardwareVbusDetect;
use embassy_nrf::usb::Driver;
use embassy_nrf::{self, bind_interrupts, peripherals};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::signal::Signal;
use embassy_usb::class::hid::{
    Config as HidConfig, HidReader, HidReaderWriter, HidWriter, ReportId, RequestHandler, State,
};
use embassy_usb::control::OutResponse;
use embassy_usb::{Builder, Config, Handler, UsbDevice};
use static_cell::StaticCell;

use crate::config;
use crate::error::Error;
use crate::hid::keyboard::{KEYBOARD_REPORT_DESCRIPTOR, KEYBOARD_REPORT_SIZE};
use crate::leds::LedBank;
use crate::usb::handlers::{Indicators, Keyboard, Led, ReportType};
use crate::usb::reporter::HidTransport;

bind_interrupts!(struct Irqs {
    USBD => embassy_nrf::usb::InterruptHandler<peripherals::USBD>;
    CLOCK_POWER => embassy_nrf::usb::vbus_detect::InterruptHandler;
});

pub type UsbDriver = Driver<'static, peripherals::USBD, HardwareVbusDetect>;

static KB_STATE: StaticCell<State> = StaticCell::new();
static USB_CONFIG_DESC: StaticCell<[u8; 256]> = StaticCell::new();
static USB_BOS_DESC: StaticCell<[u8; 256]> = StaticCell::new();
static USB_MSOS_DESC: StaticCell<[u8; 256]> = StaticCell::new();
static USB_CTRL_BUF: StaticCell<[u8; 64]> = StaticCell::new();
static DEVICE_HANDLER: StaticCell<DeviceHandler> = StaticCell::new();
static CONTROL_HANDLER: StaticCell<KeyboardRequestHandler> = StaticCell::new();

/// Set by the reporter, consumed by the device task to resume the bus.
static WAKE_SIGNAL: Signal<CriticalSectionRawMutex, ()> = Signal::new();

/// Whether the host allowed remote wakeup (SET_FEATURE DEVICE_REMOTE_WAKEUP).
static REMOTE_WAKEUP_ENABLED: AtomicBool = AtomicBool::new(false);

/// Status LEDs shared by the control-pipe and OUT-endpoint handlers.
pub struct SharedLeds(Mutex<CriticalSectionRawMutex, RefCell<LedBank<Output<'static>>>>);

impl SharedLeds {
    pub fn new(bank: LedBank<Output<'static>>) -> Self {
        Self(Mutex::new(RefCell::new(bank)))
    }
}

impl Indicators for &SharedLeds {
    fn set_indicator(&mut self, led: Led, active: bool) {
        self.0
            .lock(|bank| bank.borrow_mut().set_indicator(led, active));
    }
}

/// Bus-level events → keyboard link state.
struct DeviceHandler {
    keyboard: &'static Keyboard,
}

impl Handler for DeviceHandler {
    fn enabled(&mut self, enabled: bool) {
        if !enabled {
            self.keyboard.on_interface_ready(false);
        }
    }

    fn reset(&mut self) {
        self.keyboard.on_bus_reset();
    }

    fn configured(&mut self, configured: bool) {
        self.keyboard.on_interface_ready(configured);
    }

    fn suspended(&mut self, suspended: bool) {
        self.keyboard.on_suspend(suspended);
    }

    fn remote_wakeup_enabled(&mut self, enabled: bool) {
        info!("Remote wakeup {}", if enabled { "enabled" } else { "disabled" });
        REMOTE_WAKEUP_ENABLED.store(enabled, Ordering::Relaxed);
    }
}

/// HID class requests (control pipe) and OUT reports → keyboard.
pub struct KeyboardRequestHandler {
    keyboard: &'static Keyboard,
    leds: &'static SharedLeds,
}

impl KeyboardRequestHandler {
    pub fn new(keyboard: &'static Keyboard, leds: &'static SharedLeds) -> Self {
        Self { keyboard, leds }
    }
}

fn report_type(id: ReportId) -> ReportType {
    match id {
        ReportId::In(_) => ReportType::Input,
        ReportId::Out(_) => ReportType::Output,
        ReportId::Feature(_) => ReportType::Feature,
    }
}

impl RequestHandler for KeyboardRequestHandler {
    fn get_report(&mut self, id: ReportId, buf: &mut [u8]) -> Option<usize> {
        // `buf` is the whole control buffer, not the host's wLength, so
        // the short-buffer rejection never triggers here.
        self.keyboard.get_input_report(report_type(id), buf).ok()
    }

    fn set_report(&mut self, id: ReportId, data: &[u8]) -> OutResponse {
        match self
            .keyboard
            .set_output_report(report_type(id), data, &mut self.leds)
        {
            Ok(()) => OutResponse::Accepted,
            Err(_) => OutResponse::Rejected,
        }
    }

    fn set_idle_ms(&mut self, _id: Option<ReportId>, duration_ms: u32) {
        self.keyboard.set_idle(duration_ms);
    }

    fn get_idle_ms(&mut self, _id: Option<ReportId>) -> Option<u32> {
        Some(self.keyboard.idle())
    }
}

/// Input reports out, wakeup requests to the device task.
pub struct UsbTransport {
    writer: HidWriter<'static, UsbDriver, KEYBOARD_REPORT_SIZE>,
}

impl HidTransport for UsbTransport {
    async fn submit(&mut self, report: &[u8; KEYBOARD_REPORT_SIZE]) -> Result<(), Error> {
        self.writer.write(report).await.map_err(|_| Error::Usb)
    }

    fn request_wake(&mut self) -> Result<(), Error> {
        if !REMOTE_WAKEUP_ENABLED.load(Ordering::Relaxed) {
            return Err(Error::WakeUnavailable);
        }
        WAKE_SIGNAL.signal(());
        Ok(())
    }
}

/// Build result containing the USB device runner, the OUT report reader
/// and the transport for the reporter.
pub struct UsbHidDevice {
    pub device: UsbDevice<'static, UsbDriver>,
    pub reader: HidReader<'static, UsbDriver, 1>,
    pub transport: UsbTransport,
}

/// Initialise the USB stack and create the keyboard HID interface.
///
/// Must be called exactly once.  All static buffers are consumed here.
pub fn init(
    usbd: peripherals::USBD,
    keyboard: &'static Keyboard,
    leds: &'static SharedLeds,
) -> UsbHidDevice {
    // Create the low-level USB driver with hardware VBUS detection.
    let driver = Driver::new(usbd, Irqs, HardwareVbusDetect::new(Irqs));

    // USB device-level configuration.
    let mut usb_config = Config::new(config::USB_VID, config::USB_PID);
    usb_config.manufacturer = Some(config::USB_MANUFACTURER);
    usb_config.product = Some(config::USB_PRODUCT);
    usb_config.serial_number = Some(config::USB_SERIAL_NUMBER);
    usb_config.max_power = config::USB_MAX_POWER_MA;
    usb_config.max_packet_size_0 = 64;
    usb_config.supports_remote_wakeup = config::USB_REMOTE_WAKEUP;

    // Allocate static descriptor buffers.
    let config_desc = USB_CONFIG_DESC.init([0u8; 256]);
    let bos_desc = USB_BOS_DESC.init([0u8; 256]);
    let msos_desc = USB_MSOS_DESC.init([0u8; 256]);
    let ctrl_buf = USB_CTRL_BUF.init([0u8; 64]);

    // Build the USB device.
    let mut builder = Builder::new(
        driver,
        usb_config,
        config_desc,
        bos_desc,
        msos_desc,
        ctrl_buf,
    );

    builder.handler(DEVICE_HANDLER.init(DeviceHandler { keyboard }));

    let kb_state = KB_STATE.init(State::new());
    let kb_config = HidConfig {
        report_descriptor: KEYBOARD_REPORT_DESCRIPTOR,
        request_handler: Some(CONTROL_HANDLER.init(KeyboardRequestHandler::new(keyboard, leds))),
        poll_ms: config::USB_HID_POLL_MS,
        max_packet_size: 8,
    };
    let hid = HidReaderWriter::<_, 1, KEYBOARD_REPORT_SIZE>::new(&mut builder, kb_state, kb_config);
    let (reader, writer) = hid.split();

    let device = builder.build();

    info!("USB HID keyboard initialised");

    UsbHidDevice {
        device,
        reader,
        transport: UsbTransport { writer },
    }
}

/// Run the USB device stack - must be spawned as a dedicated Embassy task.
///
/// Handles enumeration and endpoint servicing; while suspended it waits
/// for either the host to resume or the reporter to request a wakeup.
pub async fn run_usb_device(mut device: UsbDevice<'static, UsbDriver>) -> ! {
    info!("USB device task started");
    loop {
        device.run_until_suspend().await;
        WAKE_SIGNAL.reset();
        let woken = select(device.wait_resume(), WAKE_SIGNAL.wait()).await;
        match woken {
            Either::First(()) => {}
            Either::Second(()) => {
                info!("Requesting remote wakeup");
                if device.remote_wakeup().await.is_err() {
                    warn!("Remote wakeup failed");
                }
            }
        }
    }
}

/// OUT endpoint task - host LED reports arrive here when the host uses
/// the interrupt OUT pipe instead of SET_REPORT.
pub async fn run_output_reader(
    reader: HidReader<'static, UsbDriver, 1>,
    mut handler: KeyboardRequestHandler,
) -> ! {
    info!("HID output report reader started");
    reader.run(false, &mut handler).await
}
