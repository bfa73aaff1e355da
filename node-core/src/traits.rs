//! Hardware Abstraction Traits
//!
//! Diese Traits definieren Schnittstellen für Radio, Broker, Pin, Timer
//! und Deep Sleep ohne konkrete Implementierung.
//!
//! # Implementierungen
//! - **Production:** node-firmware (esp-hal, esp-radio, embassy-net, rust-mqtt)
//! - **Testing:** Mocks in node-tests

#![allow(async_fn_in_trait)]

use crate::types::{BrokerStatus, PinLevel};

/// Monotone Zeitquelle mit asynchronem Delay
pub trait Clock {
    /// Millisekunden seit Boot
    fn now_ms(&self) -> u64;

    /// Wartet `ms` Millisekunden
    async fn sleep_ms(&mut self, ms: u64);
}

/// WiFi Station-Link
pub trait WifiLink {
    /// Startet die Assoziierung mit dem Access Point
    ///
    /// Kehrt sofort zurück, der Fortschritt wird über
    /// [`is_associated`](WifiLink::is_associated) abgefragt.
    async fn begin(&mut self, ssid: &'static str, password: &'static str);

    /// Link ist assoziiert und hat eine IPv4-Adresse
    fn is_associated(&mut self) -> bool;

    /// Aktuelle IPv4-Adresse, falls vorhanden
    fn local_ipv4(&self) -> Option<[u8; 4]>;
}

/// Empfänger für eingehende MQTT-Nachrichten
///
/// Wird synchron aus [`BrokerSession::receive`] aufgerufen und läuft bis
/// zum Ende, bevor die Session weiterarbeitet.
pub trait MessageHandler {
    fn on_message(&mut self, topic: &str, payload: &[u8]);
}

/// MQTT Broker-Session
///
/// Fehler werden als [`BrokerStatus`] gemeldet.
pub trait BrokerSession {
    /// Ein einzelner Verbindungsversuch mit der gegebenen Client-ID
    async fn connect(&mut self, client_id: &str) -> Result<(), BrokerStatus>;

    async fn publish(&mut self, topic: &str, payload: &[u8]) -> Result<(), BrokerStatus>;

    async fn subscribe(&mut self, topic: &str) -> Result<(), BrokerStatus>;

    /// Wartet auf die nächste Nachricht und übergibt sie an `handler`
    ///
    /// Ein Fehler bedeutet, dass die Verbindung nicht mehr besteht.
    async fn receive<H: MessageHandler>(&mut self, handler: &mut H) -> Result<(), BrokerStatus>;
}

/// Digitaler Ausgang (LED)
pub trait StatusPin {
    fn set_level(&mut self, level: PinLevel);
}

/// Deep-Sleep Primitive
///
/// Auf der Hardware kehrt der Aufruf nie zurück, der Wake-up ist ein Reboot.
pub trait DeepSleep {
    fn deep_sleep(&mut self, duration_us: u64);
}

/// Zufallsquelle für die Client-ID
pub trait RandomSource {
    fn next_u16(&mut self) -> u16;
}
