//! Ping-Zeitplan für MQTT Keep-Alive
//!
//! Der Broker zählt nur Pakete vom Client als Aktivität. Eingehende
//! Nachrichten verschieben den nächsten PINGREQ deshalb nicht.

/// Nächster Ping-Zeitpunkt in Millisekunden seit Boot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PingSchedule {
    interval_ms: u64,
    next_ping_ms: u64,
}

impl PingSchedule {
    /// Ping nach der Hälfte des Keep-Alive-Intervalls
    pub const fn new(keep_alive_secs: u16, connected_at_ms: u64) -> Self {
        let interval_ms = keep_alive_secs as u64 * 1000 / 2;
        Self {
            interval_ms,
            next_ping_ms: connected_at_ms.saturating_add(interval_ms),
        }
    }

    pub const fn interval_ms(&self) -> u64 {
        self.interval_ms
    }

    /// Fester Deadline, unabhängig davon wie oft `receive` aufgerufen wird
    pub const fn next_ping_ms(&self) -> u64 {
        self.next_ping_ms
    }

    pub const fn is_due(&self, now_ms: u64) -> bool {
        now_ms >= self.next_ping_ms
    }

    /// Nach einem gesendeten Ping neu planen
    pub fn on_ping_sent(&mut self, now_ms: u64) {
        self.next_ping_ms = now_ms.saturating_add(self.interval_ms);
    }
}
