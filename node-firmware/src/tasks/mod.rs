// Task-Modul: Netzwerk-Tasks und Trait-Implementierungen für Radio und Broker
//
// Die Bootstrap-Zustandsmaschine läuft in main(). Im Hintergrund laufen nur
// der Netzwerk-Stack und der WiFi Connection-Task, beide ohne App-Zustand.

pub mod mqtt;
pub mod wifi;

// Re-export für einfachen Import
pub use mqtt::{MqttBuffers, RustMqttSession};
pub use wifi::{EspWifiLink, connection_task, net_task};
