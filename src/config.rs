use core::fmt::Write;

use heapless::String;

use crate::constants::TOPIC_MAX_LEN;

pub struct Config {
    // Device ID (used as DHCP hostname and MQTT client id)
    pub device_id: &'static str,

    // MQTT broker hostname or IP address
    pub mqtt_hostname: &'static str,

    // MQTT password for authentication
    pub mqtt_password: &'static str,

    // MQTT port (usually 1883)
    pub mqtt_port: u16,

    // Prefix every topic is built from; suffixes are appended verbatim
    pub mqtt_topic_prefix: &'static str,

    // MQTT username for authentication
    pub mqtt_username: &'static str,

    // Wi-Fi pre-shared key (password)
    pub wifi_psk: &'static str,

    // Wi-Fi SSID to connect to
    pub wifi_ssid: &'static str,
}

impl Config {
    /// Builds `<prefix><suffix>`. No separator is inserted between the two,
    /// so any delimiter has to be part of the prefix or the suffix.
    pub fn topic(&self, suffix: &str) -> Result<String<TOPIC_MAX_LEN>, core::fmt::Error> {
        join_topic(self.mqtt_topic_prefix, suffix)
    }
}

fn join_topic(prefix: &str, suffix: &str) -> Result<String<TOPIC_MAX_LEN>, core::fmt::Error> {
    let mut topic: String<TOPIC_MAX_LEN> = String::new();
    write!(topic, "{}{}", prefix, suffix)?;
    Ok(topic)
}

// config values are generated at compile time
include!(concat!(env!("OUT_DIR"), "/config.rs"));

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_prefix_and_suffix_verbatim() {
        let topic = join_topic("mqtt/topic/prefix", "bar").unwrap();
        assert_eq!(topic.as_str(), "mqtt/topic/prefixbar");
    }

    #[test]
    fn delimiter_comes_from_the_prefix() {
        let topic = join_topic("garage/door/", "state").unwrap();
        assert_eq!(topic.as_str(), "garage/door/state");
    }

    #[test]
    fn empty_suffix_yields_the_prefix() {
        let topic = join_topic("garage/door/", "").unwrap();
        assert_eq!(topic.as_str(), "garage/door/");
    }

    #[test]
    fn overlong_topic_is_rejected() {
        let mut prefix: String<{ TOPIC_MAX_LEN + 1 }> = String::new();
        while prefix.push('a').is_ok() {}
        assert!(join_topic(&prefix, "overflow").is_err());
    }
}
