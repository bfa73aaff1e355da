// Clock-Implementierung auf Basis von embassy-time

use embassy_time::{Instant, Timer};
use node_core::Clock;

/// Monotone Uhr seit Boot (embassy Time-Driver von esp-rtos)
pub struct EmbassyClock;

impl Clock for EmbassyClock {
    fn now_ms(&self) -> u64 {
        Instant::now().as_millis()
    }

    async fn sleep_ms(&mut self, ms: u64) {
        Timer::after_millis(ms).await;
    }
}
