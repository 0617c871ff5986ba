use embassy_time::{Duration, Timer};
use esp_hal::gpio::Output;
use log::debug;

use crate::constants::BUTTON_DWELL_MS;

/// Momentary door-button relay. The coil is energized while the pin is
/// high and idles low, the released position.
pub struct Relay<'d> {
    pin: Output<'d>,
}

impl<'d> Relay<'d> {
    pub fn new(pin: Output<'d>) -> Self {
        Self { pin }
    }

    /// Simulates a wall-button press: hold the contact closed for the dwell
    /// time, then release. The opener ignores contacts shorter than its own
    /// input filter.
    pub async fn press(&mut self) {
        debug!("Relay closed for {}ms", BUTTON_DWELL_MS);
        self.pin.set_high();
        Timer::after(Duration::from_millis(BUTTON_DWELL_MS)).await;
        self.pin.set_low();
        debug!("Relay released");
    }
}
