//! GPIO key source with async debouncing.
//!
//! Each key is a switch to ground with the internal pull-up enabled
//! (active-low).  One task per key waits for the line to settle low,
//! queues a press, waits for it to settle high again and queues the
//! release.  Matrix keyboards replace this with a scanner that calls
//! [`deliver`] the same way.

use embassy_time::{Duration, Timer};
use embedded_hal::digital::InputPin;
use embedded_hal_async::digital::Wait;

use crate::config::KEY_DEBOUNCE_MS;
use crate::events::{deliver, KeySender};

const DEBOUNCE: Duration = Duration::from_millis(KEY_DEBOUNCE_MS);

/// Run a single key polling loop for logical key `key`.
pub async fn key_task<P>(mut pin: P, key: u16, tx: KeySender<'static>) -> !
where
    P: Wait + InputPin,
{
    loop {
        if pin.wait_for_low().await.is_err() {
            warn!("key {}: pin wait failed", key);
            continue;
        }

        // Debounce: wait and re-check.
        Timer::after(DEBOUNCE).await;
        if !pin.is_low().unwrap_or(false) {
            continue;
        }

        trace!("key {} down", key);
        // A full queue is already logged by `deliver`; keep scanning.
        deliver(&tx, key, true).ok();

        loop {
            if pin.wait_for_high().await.is_err() {
                warn!("key {}: pin wait failed", key);
            }
            Timer::after(DEBOUNCE).await;
            if pin.is_high().unwrap_or(true) {
                break;
            }
        }

        trace!("key {} up", key);
        deliver(&tx, key, false).ok();
    }
}
