use embedded_io_async::{Read, Write};
use log::{debug, warn};
use rust_mqtt::{
    client::{
        client::MqttClient,
        client_config::{ClientConfig, MqttVersion},
    },
    packet::v5::publish_packet::QualityOfService,
    utils::rng_generator::CountingRng,
};

use crate::config::CONFIG;
use crate::constants::{MQTT_KEEP_ALIVE_SECS, MQTT_MAX_PROPERTIES, MQTT_RX_BUFFER_SIZE};

#[derive(Debug)]
pub enum Error {
    ConnectFailed,
    PublishFailed,
    SubscribeFailed,
    ReceiveFailed,
}

/// Thin wrapper over the MQTT 5 client: one broker session, credentials and
/// last-will taken from the compiled-in configuration.
pub struct Mqtt<'a, T>
where
    T: Read + Write,
{
    client: MqttClient<'a, T, MQTT_MAX_PROPERTIES, CountingRng>,
}

impl<'a, T> Mqtt<'a, T>
where
    T: Read + Write,
{
    /// Connects to the broker. `will_topic`/`will_payload` are left with the
    /// broker, which publishes them (retained) if this session dies without
    /// a clean disconnect.
    pub async fn new(
        transport: T,
        tx_buffer: &'a mut [u8],
        rx_buffer: &'a mut [u8],
        will_topic: &'a str,
        will_payload: &'a [u8],
    ) -> Result<Self, Error> {
        let mut config = ClientConfig::new(MqttVersion::MQTTv5, CountingRng(20000));
        config.add_client_id(CONFIG.device_id);
        config.add_username(CONFIG.mqtt_username);
        config.add_password(CONFIG.mqtt_password);
        config.add_max_subscribe_qos(QualityOfService::QoS1);
        config.add_will(will_topic, will_payload, true);
        config.keep_alive = MQTT_KEEP_ALIVE_SECS;
        config.max_packet_size = MQTT_RX_BUFFER_SIZE as u32;

        let tx_len = tx_buffer.len();
        let rx_len = rx_buffer.len();
        let mut client = MqttClient::<T, MQTT_MAX_PROPERTIES, CountingRng>::new(
            transport, tx_buffer, tx_len, rx_buffer, rx_len, config,
        );

        match client.connect_to_broker().await {
            Ok(()) => debug!("MQTT session established"),
            Err(code) => {
                warn!("MQTT connect refused: {:?}", code);
                return Err(Error::ConnectFailed);
            }
        }

        Ok(Self { client })
    }

    pub async fn publish(
        &mut self,
        topic: &str,
        payload: &[u8],
        qos: QualityOfService,
        retain: bool,
    ) -> Result<(), Error> {
        self.client
            .send_message(topic, payload, qos, retain)
            .await
            .map_err(|code| {
                warn!("Publish to {} failed: {:?}", topic, code);
                Error::PublishFailed
            })
    }

    pub async fn subscribe(&mut self, topic: &str) -> Result<(), Error> {
        self.client.subscribe_to_topic(topic).await.map_err(|code| {
            warn!("Subscribe to {} failed: {:?}", topic, code);
            Error::SubscribeFailed
        })
    }

    /// Waits for the next inbound publish on any subscribed topic and
    /// returns its topic and payload.
    pub async fn receive(&mut self) -> Result<(&str, &[u8]), Error> {
        self.client.receive_message().await.map_err(|code| {
            warn!("MQTT receive failed: {:?}", code);
            Error::ReceiveFailed
        })
    }
}
