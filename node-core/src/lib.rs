//! Node Core - Platform-agnostic Connectivity Bootstrap
//!
//! Diese Crate enthält KEINE Hardware-Dependencies.
//! Sie definiert Traits, die Boot-Zustandsmaschine und Pure Functions,
//! die auf dem Host mit Mocks getestet werden.

#![no_std]

// Log-Makros müssen vor allen anderen Modulen deklariert werden
#[macro_use]
mod fmt;

pub mod bootstrap;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod keepalive;
pub mod poll;
pub mod traits;
pub mod types;

// Re-exports für einfachen Zugriff
pub use bootstrap::DeviceSession;
pub use config::{NodeConfig, sleep_duration_us};
pub use dispatch::{PinDispatcher, level_for_payload};
pub use error::BootstrapError;
pub use keepalive::PingSchedule;
pub use poll::{TimedOut, poll, poll_with};
pub use traits::{BrokerSession, Clock, DeepSleep, MessageHandler, RandomSource, StatusPin, WifiLink};
pub use types::{BrokerStatus, CLIENT_ID_PREFIX, ClientId, Phase, PinLevel};
