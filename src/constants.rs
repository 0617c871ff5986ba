/// Current firmware version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Size of the heap (esp-wifi allocates from it during association)
pub const HEAP_SIZE: usize = 72 * 1024;

// GPIO wiring. The reed switches short their pin to ground when the door
// engages them, the relay coil is energized by driving its pin high, and the
// reset line is wired to EN so that pulling it low power-cycles the chip.

/// Reed switch engaged when the door is fully open
pub const SENSOR_OPEN_PIN: u8 = 14;
/// Reed switch engaged when the door is fully closed
pub const SENSOR_CLOSED_PIN: u8 = 12;
/// Door button relay, energized while high
pub const RELAY_PIN: u8 = 5;
/// Hardware reset line, asserted by driving low
pub const RESET_PIN: u8 = 4;

// Every signal needs its own pin.
const _: () = assert!(
    SENSOR_OPEN_PIN != SENSOR_CLOSED_PIN
        && SENSOR_OPEN_PIN != RELAY_PIN
        && SENSOR_OPEN_PIN != RESET_PIN
        && SENSOR_CLOSED_PIN != RELAY_PIN
        && SENSOR_CLOSED_PIN != RESET_PIN
        && RELAY_PIN != RESET_PIN
);

/// Relay hold time for a single button press. The opener needs the contact
/// held this long to register it.
pub const BUTTON_DWELL_MS: u64 = 300;

/// Interval between door state publishes
pub const PUBLISH_INTERVAL_MS: u64 = 1000;

/// Force a hardware reset when the broker has been unreachable this long
pub const WATCHDOG_TIMEOUT_MS: u64 = 10_000;
/// How often the watchdog task checks the feed age
pub const WATCHDOG_POLL_MS: u64 = 500;

/// Spacing between reads when waiting for a switch to stop bouncing
pub const DEBOUNCE_MS: u64 = 50;
/// Give up on a bouncing switch after this many reads and take the last one
pub const DEBOUNCE_MAX_READS: usize = 8;

/// Delay before retrying a failed broker session
pub const RECONNECT_DELAY_MS: u64 = 1000;
/// Delay before retrying WiFi association
pub const WIFI_RECONNECT_DELAY_MS: u64 = 5000;
/// Upper bound on a single WiFi connect attempt
pub const WIFI_CONNECT_TIMEOUT_SECS: u64 = 15;

/// TCP socket inactivity timeout
pub const SOCKET_TIMEOUT_SECS: u64 = 30;

/// Size of the TCP socket receive buffer
pub const RX_BUFFER_SIZE: usize = 1024;
/// Size of the TCP socket transmit buffer
pub const TX_BUFFER_SIZE: usize = 1024;

/// Size of the MQTT client receive buffer for application data
pub const MQTT_RX_BUFFER_SIZE: usize = 512;
/// Size of the MQTT client transmit buffer for application data
pub const MQTT_TX_BUFFER_SIZE: usize = 512;
/// MQTT 5 property count limit per packet
pub const MQTT_MAX_PROPERTIES: usize = 5;
/// MQTT keep-alive interval in seconds
pub const MQTT_KEEP_ALIVE_SECS: u16 = 30;

/// Longest topic the controller will build from the configured prefix
pub const TOPIC_MAX_LEN: usize = 128;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pin_assignments_are_distinct() {
        let pins = [SENSOR_OPEN_PIN, SENSOR_CLOSED_PIN, RELAY_PIN, RESET_PIN];
        for (i, a) in pins.iter().enumerate() {
            for b in &pins[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn timing_thresholds_are_positive() {
        assert!(BUTTON_DWELL_MS > 0);
        assert!(PUBLISH_INTERVAL_MS > 0);
        assert!(WATCHDOG_TIMEOUT_MS > 0);
        assert!(DEBOUNCE_MS > 0);
    }

    #[test]
    fn watchdog_outlasts_a_publish_interval() {
        // A healthy session feeds the watchdog at least once per interval,
        // so the timeout must leave room for several missed ticks.
        assert!(WATCHDOG_TIMEOUT_MS > PUBLISH_INTERVAL_MS);
        assert!(WATCHDOG_POLL_MS < WATCHDOG_TIMEOUT_MS);
    }
}
