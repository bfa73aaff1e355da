// Status-LED an einem GPIO-Ausgang
//
// Die LED auf dem Board ist active-low verdrahtet. Der Pin folgt direkt dem
// logischen Pegel aus node-core: '1' → High (LED aus), sonst Low (LED an).

use esp_hal::gpio::{Level, Output};
use node_core::{PinLevel, StatusPin};

pub struct GpioStatusPin<'a> {
    pin: Output<'a>,
}

impl<'a> GpioStatusPin<'a> {
    pub fn new(pin: Output<'a>) -> Self {
        Self { pin }
    }
}

impl StatusPin for GpioStatusPin<'_> {
    fn set_level(&mut self, level: PinLevel) {
        let level = match level {
            PinLevel::High => Level::High,
            PinLevel::Low => Level::Low,
        };
        self.pin.set_level(level);
    }
}
