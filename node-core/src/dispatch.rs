//! Message Dispatch: setzt den LED-Pin anhand der empfangenen Payload
//!
//! Funktionen ohne Hardware-Dependencies (testbar!)

use crate::traits::{MessageHandler, StatusPin};
use crate::types::PinLevel;

/// Bestimmt den Pin-Pegel aus dem ersten Payload-Byte
///
/// `'1'` schaltet auf High, jedes andere Byte und eine leere Payload auf Low.
///
/// # Beispiele
///
/// ```
/// # use node_core::{PinLevel, level_for_payload};
/// assert_eq!(level_for_payload(b"1"), PinLevel::High);
/// assert_eq!(level_for_payload(b"0"), PinLevel::Low);
/// ```
pub fn level_for_payload(payload: &[u8]) -> PinLevel {
    match payload.first() {
        Some(b'1') => PinLevel::High,
        _ => PinLevel::Low,
    }
}

/// MessageHandler, der jede Nachricht auf einen [`StatusPin`] abbildet
///
/// Einziger Schreiber des Pins während einer Session.
pub struct PinDispatcher<P> {
    pin: P,
    level: Option<PinLevel>,
    handled: u32,
}

impl<P: StatusPin> PinDispatcher<P> {
    pub fn new(pin: P) -> Self {
        Self {
            pin,
            level: None,
            handled: 0,
        }
    }

    /// Zuletzt geschriebener Pegel (None vor der ersten Nachricht)
    pub fn level(&self) -> Option<PinLevel> {
        self.level
    }

    /// Anzahl verarbeiteter Nachrichten
    pub fn handled(&self) -> u32 {
        self.handled
    }

    pub fn pin(&self) -> &P {
        &self.pin
    }
}

impl<P: StatusPin> MessageHandler for PinDispatcher<P> {
    fn on_message(&mut self, topic: &str, payload: &[u8]) {
        info!("Message arrived [{}] {=[u8]:a}", topic, payload);

        let level = level_for_payload(payload);
        self.pin.set_level(level);
        self.level = Some(level);
        self.handled = self.handled.wrapping_add(1);
    }
}
