//! Core Types für den Connectivity Bootstrap
//!
//! Datenstrukturen ohne Hardware-Dependencies

use core::fmt::{self, Write};

use heapless::String;

use crate::traits::RandomSource;

/// Präfix jeder MQTT Client-ID
pub const CLIENT_ID_PREFIX: &str = "ESP8266Client-";

/// Kapazität einer Client-ID: Präfix (14) + 4 Hex-Ziffern
pub const CLIENT_ID_CAPACITY: usize = 18;

/// Logischer Pegel des Ausgangs-Pins
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinLevel {
    High,
    Low,
}

impl PinLevel {
    pub fn is_high(self) -> bool {
        self == PinLevel::High
    }
}

/// Zustände der Bootstrap-Zustandsmaschine
///
/// `Sleeping` ist terminal: der nächste Wake-up startet die Firmware neu
/// und damit wieder bei `Disconnected`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
    Disconnected,
    WifiJoining,
    WifiUp,
    MqttConnecting,
    MqttUp,
    Dispatching,
    Sleeping,
}

/// MQTT Client-ID: `"ESP8266Client-"` + 4 Hex-Ziffern
///
/// Wird bei jedem Verbindungsversuch neu erzeugt. Eindeutigkeit ist nicht
/// garantiert (16 Bit Zufall).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientId(String<CLIENT_ID_CAPACITY>);

impl ClientId {
    /// Erstellt eine Client-ID aus einem 16-Bit Zufallswert
    ///
    /// # Beispiele
    ///
    /// ```
    /// # use node_core::ClientId;
    /// assert_eq!(ClientId::from_random(0x00af).as_str(), "ESP8266Client-00af");
    /// ```
    pub fn from_random(value: u16) -> Self {
        let mut id = String::new();
        // Präfix + 4 Ziffern passen immer in CLIENT_ID_CAPACITY
        let _ = write!(id, "{}{:04x}", CLIENT_ID_PREFIX, value);
        Self(id)
    }

    /// Erzeugt eine neue Client-ID aus einer Zufallsquelle
    pub fn generate<R: RandomSource>(rng: &mut R) -> Self {
        Self::from_random(rng.next_u16())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Hex-Anteil hinter dem Präfix
    pub fn suffix(&self) -> &str {
        &self.0[CLIENT_ID_PREFIX.len()..]
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status-Code der Broker-Session
///
/// Negative Werte beschreiben Transport-Zustände, positive Werte sind
/// Reason Codes des Brokers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BrokerStatus(pub i32);

impl BrokerStatus {
    pub const CONNECTION_TIMEOUT: Self = Self(-4);
    pub const CONNECTION_LOST: Self = Self(-3);
    pub const CONNECT_FAILED: Self = Self(-2);
    pub const DISCONNECTED: Self = Self(-1);
    pub const CONNECTED: Self = Self(0);

    /// Übernimmt einen vom Broker gemeldeten Reason Code
    pub const fn from_reason_code(code: u8) -> Self {
        Self(code as i32)
    }

    pub const fn code(self) -> i32 {
        self.0
    }

    pub const fn is_connected(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for BrokerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for BrokerStatus {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "{}", self.0)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for ClientId {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "{}", self.as_str())
    }
}
