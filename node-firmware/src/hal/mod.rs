// Hardware Abstraction Layer (HAL) Module
//
// Dieses Modul implementiert die node-core Traits mit esp-hal und
// embassy-time. Die Logik dahinter ist auf dem Host testbar.

pub mod clock;
pub mod deep_sleep;
pub mod rng;
pub mod status_pin;

pub use clock::EmbassyClock;
pub use deep_sleep::RtcDeepSleep;
pub use rng::HardwareRng;
pub use status_pin::GpioStatusPin;
