use embassy_net::Stack;
use embassy_time::{with_timeout, Duration, Timer};
use heapless::String;
use log::{debug, info, warn};
use rust_mqtt::packet::v5::publish_packet::QualityOfService;
use static_cell::StaticCell;

use crate::config::CONFIG;
use crate::constants::{
    MQTT_RX_BUFFER_SIZE, MQTT_TX_BUFFER_SIZE, PUBLISH_INTERVAL_MS, RECONNECT_DELAY_MS,
    RX_BUFFER_SIZE, TOPIC_MAX_LEN, TX_BUFFER_SIZE,
};
use crate::door::DoorSensors;
use crate::mqtt::Mqtt;
use crate::relay::Relay;
use crate::transport::Transport;
use crate::watchdog::Watchdog;

static RX_BUF: StaticCell<[u8; RX_BUFFER_SIZE]> = StaticCell::new();
static TX_BUF: StaticCell<[u8; TX_BUFFER_SIZE]> = StaticCell::new();
static MQTT_RX_BUF: StaticCell<[u8; MQTT_RX_BUFFER_SIZE]> = StaticCell::new();
static MQTT_TX_BUF: StaticCell<[u8; MQTT_TX_BUFFER_SIZE]> = StaticCell::new();

const STATUS_ONLINE: &[u8] = b"online";
const STATUS_OFFLINE: &[u8] = b"offline";

#[derive(Debug)]
pub enum Error {
    Format,
    Transport,
    Mqtt,
}

/// Owns the door hardware and one broker session at a time.
///
/// Topics are the configured prefix joined with `state` (retained door
/// position, refreshed every publish interval), `command` (inbound button
/// presses) and `status` (availability, with `offline` as the last will).
pub struct Controller {
    stack: Stack<'static>,
    door: DoorSensors<'static>,
    relay: Relay<'static>,
    watchdog: &'static Watchdog,
    rx_buf: &'static mut [u8; RX_BUFFER_SIZE],
    tx_buf: &'static mut [u8; TX_BUFFER_SIZE],
    mqtt_rx_buf: &'static mut [u8; MQTT_RX_BUFFER_SIZE],
    mqtt_tx_buf: &'static mut [u8; MQTT_TX_BUFFER_SIZE],
    state_topic: String<TOPIC_MAX_LEN>,
    command_topic: String<TOPIC_MAX_LEN>,
    status_topic: String<TOPIC_MAX_LEN>,
}

impl Controller {
    pub fn new(
        stack: Stack<'static>,
        door: DoorSensors<'static>,
        relay: Relay<'static>,
        watchdog: &'static Watchdog,
    ) -> Result<Self, Error> {
        Ok(Self {
            stack,
            door,
            relay,
            watchdog,
            rx_buf: RX_BUF.init([0; RX_BUFFER_SIZE]),
            tx_buf: TX_BUF.init([0; TX_BUFFER_SIZE]),
            mqtt_rx_buf: MQTT_RX_BUF.init([0; MQTT_RX_BUFFER_SIZE]),
            mqtt_tx_buf: MQTT_TX_BUF.init([0; MQTT_TX_BUFFER_SIZE]),
            state_topic: CONFIG.topic("state").map_err(|_| Error::Format)?,
            command_topic: CONFIG.topic("command").map_err(|_| Error::Format)?,
            status_topic: CONFIG.topic("status").map_err(|_| Error::Format)?,
        })
    }

    /// Serves broker sessions forever, reconnecting after each failure.
    /// A session that cannot be re-established keeps the watchdog starving
    /// until it resets the device.
    pub async fn run(&mut self) -> ! {
        loop {
            if let Err(e) = self.session().await {
                warn!("Broker session ended: {:?}", e);
            }
            Timer::after(Duration::from_millis(RECONNECT_DELAY_MS)).await;
        }
    }

    async fn session(&mut self) -> Result<(), Error> {
        let transport = Transport::new(
            self.stack,
            &mut self.rx_buf[..],
            &mut self.tx_buf[..],
            CONFIG.mqtt_hostname,
            CONFIG.mqtt_port,
        )
        .await
        .map_err(|_| Error::Transport)?;

        let mut mqtt = Mqtt::new(
            transport,
            &mut self.mqtt_tx_buf[..],
            &mut self.mqtt_rx_buf[..],
            self.status_topic.as_str(),
            STATUS_OFFLINE,
        )
        .await
        .map_err(|_| Error::Mqtt)?;

        mqtt.subscribe(self.command_topic.as_str())
            .await
            .map_err(|_| Error::Mqtt)?;
        mqtt.publish(
            self.status_topic.as_str(),
            STATUS_ONLINE,
            QualityOfService::QoS1,
            true,
        )
        .await
        .map_err(|_| Error::Mqtt)?;
        self.watchdog.feed();
        info!("Connected to broker as {}", CONFIG.device_id);

        loop {
            let state = self.door.settled_state().await;
            mqtt.publish(
                self.state_topic.as_str(),
                state.as_str().as_bytes(),
                QualityOfService::QoS0,
                true,
            )
            .await
            .map_err(|_| Error::Mqtt)?;
            self.watchdog.feed();
            debug!("Published door state: {}", state.as_str());

            // Spend the rest of the interval listening for commands.
            match with_timeout(Duration::from_millis(PUBLISH_INTERVAL_MS), mqtt.receive()).await {
                Ok(Ok((topic, payload))) => {
                    self.watchdog.feed();
                    if topic == self.command_topic.as_str() && is_press_command(payload) {
                        info!("Button press command received");
                        self.relay.press().await;
                    } else {
                        warn!("Ignoring message on {}", topic);
                    }
                }
                Ok(Err(_)) => return Err(Error::Mqtt),
                Err(_) => {} // interval elapsed without traffic
            }
        }
    }
}

/// A button press is requested with the payload `press`, matched
/// case-insensitively. Anything else on the command topic is ignored.
fn is_press_command(payload: &[u8]) -> bool {
    payload.eq_ignore_ascii_case(b"press")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_command_is_case_insensitive() {
        assert!(is_press_command(b"press"));
        assert!(is_press_command(b"PRESS"));
        assert!(is_press_command(b"Press"));
    }

    #[test]
    fn other_payloads_are_not_presses() {
        assert!(!is_press_command(b""));
        assert!(!is_press_command(b"pressed"));
        assert!(!is_press_command(b"open"));
        assert!(!is_press_command(b" press"));
    }
}
