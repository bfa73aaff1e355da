// Hardware-RNG als Zufallsquelle für die MQTT Client-ID

use esp_hal::rng::Rng;
use node_core::RandomSource;

pub struct HardwareRng {
    rng: Rng,
}

impl HardwareRng {
    pub fn new(rng: Rng) -> Self {
        Self { rng }
    }
}

impl RandomSource for HardwareRng {
    fn next_u16(&mut self) -> u16 {
        // Untere 16 Bit reichen für die Client-ID
        (self.rng.random() & 0xffff) as u16
    }
}
