use core::cell::Cell;

use embassy_sync::blocking_mutex::{raw::CriticalSectionRawMutex, Mutex};
use embassy_time::{Duration, Instant, Timer};
use esp_hal::gpio::Output;
use log::{error, info};

use crate::constants::{WATCHDOG_POLL_MS, WATCHDOG_TIMEOUT_MS};

/// Connection watchdog, armed from boot. Every successful exchange with the
/// broker feeds it; when the feed goes stale the reset line is pulled low,
/// which is wired to EN and power-cycles the chip.
pub struct Watchdog {
    last_feed: Mutex<CriticalSectionRawMutex, Cell<Instant>>,
}

impl Watchdog {
    pub fn new() -> Self {
        Self {
            last_feed: Mutex::new(Cell::new(Instant::now())),
        }
    }

    pub fn feed(&self) {
        self.last_feed.lock(|last| last.set(Instant::now()));
    }

    fn starved(&self) -> bool {
        let last = self.last_feed.lock(|last| last.get());
        Instant::now() - last > Duration::from_millis(WATCHDOG_TIMEOUT_MS)
    }
}

impl Default for Watchdog {
    fn default() -> Self {
        Self::new()
    }
}

#[embassy_executor::task]
pub async fn watchdog_task(watchdog: &'static Watchdog, mut reset_line: Output<'static>) {
    info!(
        "Watchdog armed: {}ms without broker contact forces a reset",
        WATCHDOG_TIMEOUT_MS
    );
    loop {
        Timer::after(Duration::from_millis(WATCHDOG_POLL_MS)).await;
        if watchdog.starved() {
            error!(
                "No broker contact for {}ms, asserting hardware reset",
                WATCHDOG_TIMEOUT_MS
            );
            reset_line.set_low();
            // The EN line should have power-cycled us already; fall back to
            // a software reset in case the strap is missing.
            Timer::after(Duration::from_millis(100)).await;
            esp_hal::system::software_reset();
        }
    }
}
