use std::{env, error::Error, fs, path::Path};

use serde::Deserialize;

#[derive(Deserialize)]
struct RawConfig {
    wifi_ssid: String,
    wifi_psk: String,
    device_id: String,
    mqtt_hostname: String,
    mqtt_port: u16,
    mqtt_username: String,
    mqtt_password: String,
    mqtt_topic_prefix: String,
}

fn main() -> Result<(), Box<dyn Error>> {
    // Tell Cargo to rerun if toml changes
    println!("cargo:rerun-if-changed=cfg.toml");

    // Read and parse
    let toml_str = fs::read_to_string("cfg.toml")?;
    let raw: RawConfig = toml::from_str(&toml_str)?;

    // Generate Rust code
    let out_dir = env::var("OUT_DIR")?;
    let dest_path = Path::new(&out_dir).join("config.rs");
    let code = format!(
        r#"
        pub const CONFIG: Config = Config {{
            device_id: {id:?},
            mqtt_hostname: {mh:?},
            mqtt_password: {mpw:?},
            mqtt_port: {mp},
            mqtt_topic_prefix: {pre:?},
            mqtt_username: {mu:?},
            wifi_psk: {psk:?},
            wifi_ssid: {ssid:?},
        }};
    "#,
        id = raw.device_id,
        mh = raw.mqtt_hostname,
        mpw = raw.mqtt_password,
        mp = raw.mqtt_port,
        pre = raw.mqtt_topic_prefix,
        mu = raw.mqtt_username,
        psk = raw.wifi_psk,
        ssid = raw.wifi_ssid,
    );

    fs::write(dest_path, code)?;
    Ok(())
}
