//! Fehler-Typen des Bootstraps
//!
//! Beide Fehler sind im aktuellen Power-Cycle nicht behebbar und führen
//! zum Deep Sleep.

use core::fmt;

use crate::types::BrokerStatus;

/// Fehler, der den Boot-Zyklus beendet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapError {
    /// Kein WiFi-Link innerhalb des Join-Timeouts
    WifiJoinTimeout,
    /// Broker-Verbindung fehlgeschlagen oder verloren
    BrokerConnectFailure(BrokerStatus),
}

impl fmt::Display for BootstrapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BootstrapError::WifiJoinTimeout => f.write_str("WiFi join timed out Going to sleep"),
            BootstrapError::BrokerConnectFailure(status) => {
                write!(f, "failed, rc={} Going to sleep", status)
            }
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for BootstrapError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            BootstrapError::WifiJoinTimeout => {
                defmt::write!(fmt, "WiFi join timed out Going to sleep")
            }
            BootstrapError::BrokerConnectFailure(status) => {
                defmt::write!(fmt, "failed, rc={} Going to sleep", status.code())
            }
        }
    }
}
