// Deep Sleep über den RTC Timer-Wakeup
//
// Der Wake-up ist ein Reset: die Firmware startet wieder bei main().

use core::time::Duration;

use defmt::info;
use esp_hal::rtc_cntl::{Rtc, sleep::TimerWakeupSource};
use node_core::DeepSleep;

/// Deep Sleep mit Timer als einziger Wakeup-Quelle
pub struct RtcDeepSleep<'a> {
    rtc: Rtc<'a>,
}

impl<'a> RtcDeepSleep<'a> {
    pub fn new(rtc: Rtc<'a>) -> Self {
        Self { rtc }
    }
}

impl DeepSleep for RtcDeepSleep<'_> {
    fn deep_sleep(&mut self, duration_us: u64) {
        info!("Power: entering deep sleep for {} s", duration_us / 1_000_000);
        let timer = TimerWakeupSource::new(Duration::from_micros(duration_us));
        self.rtc.sleep_deep(&[&timer]);
    }
}
