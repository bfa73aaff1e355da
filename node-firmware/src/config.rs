// Build-Zeit-Konfiguration des Light-Sensor Nodes

use node_core::NodeConfig;
use node_core::config::{CONTROL_TOPIC, DEFAULT_MINUTES_BETWEEN, STATUS_PAYLOAD, STATUS_TOPIC};

// ============================================================================
// Status-LED
// ============================================================================

/// GPIO-Pin für die Status-LED
/// Muss zu `peripherals.GPIO15` in main.rs passen
pub const LED_GPIO_PIN: u8 = 15;

// ============================================================================
// WLAN
// ============================================================================

/// SSID des Access Points, Pflichtwert aus .env
pub const WIFI_SSID: &str = env!(
    "WIFI_SSID",
    "WIFI_SSID fehlt: .env anlegen (Vorlage .env.example)"
);

/// WPA2-Passphrase, Pflichtwert aus .env
pub const WIFI_PASSWORD: &str = env!(
    "WIFI_PASSWORD",
    "WIFI_PASSWORD fehlt: .env anlegen (Vorlage .env.example)"
);

/// Wartezeit des Connection-Tasks nach einem fehlgeschlagenen Connect
/// Das Gesamtbudget für den Join legt node-core fest (15 s)
pub const WIFI_RETRY_DELAY_MS: u64 = 500;

/// Heap im reclaimed RAM für esp-radio
pub const WIFI_HEAP_SIZE: usize = 64 * 1024;

/// Zweiter Heap-Bereich
pub const EXTRA_HEAP_SIZE: usize = 36 * 1024;

/// Anzahl Sockets im embassy-net Stack (DHCP + MQTT)
pub const NET_SOCKET_COUNT: usize = 3;

// ============================================================================
// Broker
// ============================================================================

/// MQTT Broker IP-Adresse (IP-Literal, kein DNS)
/// Kann zur Build-Zeit über MQTT_BROKER überschrieben werden
pub const MQTT_BROKER: &str = match option_env!("MQTT_BROKER") {
    Some(broker) => broker,
    None => "192.168.0.203",
};

/// Klartext-Port, kein TLS
pub const MQTT_PORT: u16 = 1883;

/// Topic für die Boot-Meldung
pub const MQTT_TOPIC_STATUS: &str = match option_env!("MQTT_TOPIC_STATUS") {
    Some(topic) => topic,
    None => STATUS_TOPIC,
};

/// Topic für LED-Kommandos
pub const MQTT_TOPIC_CONTROL: &str = match option_env!("MQTT_TOPIC_CONTROL") {
    Some(topic) => topic,
    None => CONTROL_TOPIC,
};

/// Timeout für TCP-Connect + MQTT CONNECT in Sekunden
/// Bei Überschreitung meldet die Session rc=-4
pub const MQTT_CONNECT_TIMEOUT_SECS: u64 = 15;

/// Socket-Timeout in Sekunden (größer als Keep-Alive)
pub const MQTT_SOCKET_TIMEOUT_SECS: u64 = 60;

/// MQTT Keep-Alive in Sekunden
/// Während Dispatch wird nach der Hälfte ein PINGREQ gesendet
pub const MQTT_KEEP_ALIVE_SECS: u16 = 30;

/// Sende- und Empfangspuffer des MQTT-Clients, begrenzt die Paketgröße
pub const MQTT_BUFFER_SIZE: usize = 1024;

/// TCP RX/TX Buffer-Größe in Bytes
pub const TCP_BUFFER_SIZE: usize = 1024;

// ============================================================================
// Deep Sleep
// ============================================================================

/// Sleep-Intervall-Einheiten zwischen zwei Boot-Zyklen
/// Eine Einheit entspricht 30e6 µs (siehe node_core::config)
pub const MINUTES_BETWEEN: u64 = match option_env!("MINUTES_BETWEEN") {
    Some(minutes) => parse_u64(minutes),
    None => DEFAULT_MINUTES_BETWEEN,
};

/// Parst eine Dezimalzahl zur Compile-Zeit
///
/// build.rs hat den Wert bereits validiert.
const fn parse_u64(s: &str) -> u64 {
    let bytes = s.as_bytes();
    let mut value: u64 = 0;
    let mut i = 0;
    while i < bytes.len() {
        let digit = bytes[i];
        assert!(digit.is_ascii_digit(), "MINUTES_BETWEEN ist keine Zahl");
        value = value * 10 + (digit - b'0') as u64;
        i += 1;
    }
    value
}

/// Laufzeit-Konfiguration für die Bootstrap-Zustandsmaschine
pub const fn node_config() -> NodeConfig {
    let mut config = NodeConfig::with_credentials(WIFI_SSID, WIFI_PASSWORD);
    config.status_topic = MQTT_TOPIC_STATUS;
    config.status_payload = STATUS_PAYLOAD;
    config.control_topic = MQTT_TOPIC_CONTROL;
    config.minutes_between = MINUTES_BETWEEN;
    config
}
