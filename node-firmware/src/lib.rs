// Library-Root: Hardware-Implementierungen der node-core Traits
// Keine Standard-Bibliothek (Embedded System)
#![no_std]

// Module
pub mod config;
pub mod hal;
pub mod tasks;

// Re-exports von node-core
pub use node_core::{BootstrapError, DeviceSession, NodeConfig, Phase};

use hal::{EmbassyClock, GpioStatusPin, HardwareRng, RtcDeepSleep};
use tasks::{EspWifiLink, RustMqttSession};

// ============================================================================
// Type-Alias für die Session
// ============================================================================
//
// Statt:  DeviceSession<EspWifiLink, RustMqttSession<'static>, GpioStatusPin<'static>, ...>
// Nutze:  NodeSession

/// Bootstrap-Session mit allen Hardware-Kollaborateuren
pub type NodeSession = DeviceSession<
    EspWifiLink,
    RustMqttSession<'static>,
    GpioStatusPin<'static>,
    RtcDeepSleep<'static>,
    EmbassyClock,
    HardwareRng,
>;
