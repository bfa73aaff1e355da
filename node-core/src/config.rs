//! Laufzeit-Konfiguration der Bootstrap-Zustandsmaschine
//!
//! Die Firmware baut [`NodeConfig`] aus ihren Build-Zeit-Konstanten,
//! Tests überschreiben einzelne Felder.

/// Timeout für den WiFi-Join in Millisekunden
pub const WIFI_JOIN_TIMEOUT_MS: u64 = 15_000;

/// Abstand zwischen zwei Link-Status-Abfragen in Millisekunden
pub const WIFI_POLL_INTERVAL_MS: u64 = 500;

/// Mikrosekunden Deep Sleep pro `MINUTES_BETWEEN`-Einheit
///
/// Der Wert ist fest vorgegeben (30e6), unabhängig vom Namen der Einheit.
pub const SLEEP_US_PER_INTERVAL: u64 = 30_000_000;

/// Default für `MINUTES_BETWEEN`
pub const DEFAULT_MINUTES_BETWEEN: u64 = 10;

/// Wartezeit vor dem Deep Sleep nach Broker-Fehler (Log-Ausgabe leeren)
pub const SLEEP_SETTLE_MS: u64 = 100;

/// Topic für die Boot-Meldung
pub const STATUS_TOPIC: &str = "LIGHTSENSOR/status";

/// Payload der Boot-Meldung
pub const STATUS_PAYLOAD: &str = "booted";

/// Topic, auf dem LED-Kommandos empfangen werden
pub const CONTROL_TOPIC: &str = "inTopic";

/// Berechnet die Deep-Sleep-Dauer in Mikrosekunden
///
/// # Beispiele
///
/// ```
/// # use node_core::sleep_duration_us;
/// assert_eq!(sleep_duration_us(2), 60_000_000);
/// ```
pub const fn sleep_duration_us(minutes_between: u64) -> u64 {
    minutes_between.saturating_mul(SLEEP_US_PER_INTERVAL)
}

/// Konfiguration für einen Boot-Zyklus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeConfig {
    pub wifi_ssid: &'static str,
    pub wifi_password: &'static str,
    pub status_topic: &'static str,
    pub status_payload: &'static str,
    pub control_topic: &'static str,
    pub wifi_join_timeout_ms: u64,
    pub wifi_poll_interval_ms: u64,
    pub minutes_between: u64,
    pub sleep_settle_ms: u64,
}

impl NodeConfig {
    /// Erstellt die Default-Konfiguration mit den angegebenen WiFi-Credentials
    pub const fn with_credentials(wifi_ssid: &'static str, wifi_password: &'static str) -> Self {
        Self {
            wifi_ssid,
            wifi_password,
            status_topic: STATUS_TOPIC,
            status_payload: STATUS_PAYLOAD,
            control_topic: CONTROL_TOPIC,
            wifi_join_timeout_ms: WIFI_JOIN_TIMEOUT_MS,
            wifi_poll_interval_ms: WIFI_POLL_INTERVAL_MS,
            minutes_between: DEFAULT_MINUTES_BETWEEN,
            sleep_settle_ms: SLEEP_SETTLE_MS,
        }
    }

    /// Deep-Sleep-Dauer für diese Konfiguration
    pub const fn sleep_duration_us(&self) -> u64 {
        sleep_duration_us(self.minutes_between)
    }
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self::with_credentials("", "")
    }
}
