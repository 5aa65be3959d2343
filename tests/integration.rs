//! Integration tests for usbkbd host-testable logic.

use embassy_futures::block_on;
use usbkbd::hid::keymap::{KEY_A, KEY_CAPSLOCK, KEY_LEFTCTRL, KEY_LEFTSHIFT, KEY_Z};
use usbkbd::usb::handlers::{Indicators, Led, ReportType};
use usbkbd::usb::reporter::Step;
use usbkbd::{deliver, Error, HidTransport, KeyChannel, Keyboard, LinkState, Protocol, Reporter};

#[derive(Default)]
struct Host {
    reports: Vec<[u8; 8]>,
    wakes: usize,
}

impl HidTransport for Host {
    async fn submit(&mut self, report: &[u8; 8]) -> Result<(), Error> {
        self.reports.push(*report);
        Ok(())
    }

    fn request_wake(&mut self) -> Result<(), Error> {
        self.wakes += 1;
        Ok(())
    }
}

#[derive(Default)]
struct Leds([Option<bool>; 3]);

impl Indicators for Leds {
    fn set_indicator(&mut self, led: Led, active: bool) {
        self.0[led.index()] = Some(active);
    }
}

#[test]
fn ctrl_z_reaches_the_host() {
    let keyboard = Keyboard::new();
    keyboard.on_interface_ready(true);
    let events = KeyChannel::new();
    let tx = events.sender();
    let mut reporter = Reporter::new(&keyboard, events.receiver(), Host::default());

    deliver(&tx, KEY_LEFTCTRL, true).unwrap();
    deliver(&tx, KEY_Z, true).unwrap();
    deliver(&tx, KEY_Z, false).unwrap();
    deliver(&tx, KEY_LEFTCTRL, false).unwrap();
    for _ in 0..4 {
        assert_eq!(block_on(reporter.step()), Step::Submitted);
    }

    assert_eq!(
        reporter.transport().reports,
        vec![
            [0x01, 0, 0, 0, 0, 0, 0, 0],
            [0x01, 0, 0x1D, 0, 0, 0, 0, 0],
            [0x01, 0, 0, 0, 0, 0, 0, 0],
            [0, 0, 0, 0, 0, 0, 0, 0],
        ]
    );
}

#[test]
fn queue_overflow_drops_events_without_blocking() {
    let events = KeyChannel::new();
    let tx = events.sender();
    for _ in 0..16 {
        deliver(&tx, KEY_A, true).unwrap();
    }
    assert_eq!(deliver(&tx, KEY_A, false), Err(Error::ChannelFull));
}

#[test]
fn host_reads_current_report_on_control_pipe() {
    let keyboard = Keyboard::new();
    keyboard.on_interface_ready(true);
    let events = KeyChannel::new();
    let mut reporter = Reporter::new(&keyboard, events.receiver(), Host::default());

    deliver(&events.sender(), KEY_A, true).unwrap();
    block_on(reporter.step());

    let mut buf = [0xAAu8; 8];
    assert_eq!(keyboard.get_input_report(ReportType::Input, &mut buf), Ok(8));
    assert_eq!(buf, [0, 0, 0x04, 0, 0, 0, 0, 0]);

    let mut short = [0u8; 4];
    assert_eq!(
        keyboard.get_input_report(ReportType::Input, &mut short),
        Err(Error::UnsupportedRequest)
    );
    assert_eq!(
        keyboard.get_input_report(ReportType::Feature, &mut buf),
        Err(Error::UnsupportedRequest)
    );
}

#[test]
fn led_output_report_drives_indicators() {
    let keyboard = Keyboard::new();
    let mut leds = Leds::default();

    keyboard
        .set_output_report(ReportType::Output, &[0x01], &mut leds)
        .unwrap();
    assert_eq!(leds.0, [Some(true), Some(false), Some(false)]);

    keyboard
        .set_output_report(ReportType::Output, &[0x06], &mut leds)
        .unwrap();
    assert_eq!(leds.0, [Some(false), Some(true), Some(true)]);

    let mut untouched = Leds::default();
    assert_eq!(
        keyboard.set_output_report(ReportType::Input, &[0x02], &mut untouched),
        Err(Error::UnsupportedRequest)
    );
    assert_eq!(
        keyboard.set_output_report(ReportType::Output, &[], &mut untouched),
        Err(Error::UnsupportedRequest)
    );
    assert_eq!(untouched.0, [None; 3]);
}

#[test]
fn idle_and_protocol_round_trip() {
    let keyboard = Keyboard::new();
    assert_eq!(keyboard.protocol(), Protocol::Report);
    assert_eq!(keyboard.idle(), 0);

    keyboard.set_idle(500);
    keyboard.set_protocol(Protocol::Boot);
    assert_eq!(keyboard.idle(), 500);
    assert_eq!(keyboard.protocol(), Protocol::Boot);

    // Idle is kept across a bus reset, the protocol falls back to Report.
    keyboard.on_bus_reset();
    assert_eq!(keyboard.protocol(), Protocol::Report);
}

#[test]
fn suspend_wake_and_bus_reset() {
    let keyboard = Keyboard::new();
    keyboard.on_interface_ready(true);
    let events = KeyChannel::new();
    let tx = events.sender();
    let mut reporter = Reporter::new(&keyboard, events.receiver(), Host::default());

    keyboard.on_suspend(true);
    assert_eq!(keyboard.link_state(), LinkState::Suspended);
    deliver(&tx, KEY_CAPSLOCK, true).unwrap();
    assert_eq!(block_on(reporter.step()), Step::WakeRequested);
    assert_eq!(reporter.transport().wakes, 1);

    keyboard.on_suspend(false);
    deliver(&tx, KEY_A, true).unwrap();
    assert_eq!(block_on(reporter.step()), Step::Submitted);
    assert_eq!(
        reporter.transport().reports.last(),
        Some(&[0, 0, 0x39, 0x04, 0, 0, 0, 0])
    );

    keyboard.on_bus_reset();
    assert_eq!(keyboard.link_state(), LinkState::NotReady);
    assert_eq!(keyboard.report().to_bytes(), [0, 0, 0x39, 0x04, 0, 0, 0, 0]);
}

#[test]
fn modifier_held_through_bus_reset_is_still_reported() {
    let keyboard = Keyboard::new();
    keyboard.on_interface_ready(true);
    let events = KeyChannel::new();
    let tx = events.sender();
    let mut reporter = Reporter::new(&keyboard, events.receiver(), Host::default());

    deliver(&tx, KEY_LEFTSHIFT, true).unwrap();
    assert_eq!(block_on(reporter.step()), Step::Submitted);

    // Host reboots (or a KVM switches away and back) with Shift held.
    keyboard.on_bus_reset();
    keyboard.on_interface_ready(true);

    deliver(&tx, KEY_A, true).unwrap();
    assert_eq!(block_on(reporter.step()), Step::Submitted);
    assert_eq!(
        reporter.transport().reports.last(),
        Some(&[0x02, 0, 0x04, 0, 0, 0, 0, 0])
    );
}
