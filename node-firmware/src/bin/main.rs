// Light-Sensor Node: ein Bootstrap-Zyklus pro Wake-up, danach Deep Sleep
#![no_std]
#![no_main]
#![deny(
    clippy::mem_forget,
    reason = "mem::forget is generally not safe to do with esp_hal types, especially those \
    holding buffers for the duration of a data transfer."
)]
#![deny(clippy::large_stack_frames)]

// esp-radio allokiert Paketpuffer auf dem Heap
extern crate alloc;

use defmt::{error, info};
use embassy_executor::Spawner;
use embassy_net::{Config as NetConfig, Stack, StackResources};
use embassy_time::{Duration, Timer};
use static_cell::StaticCell;

use esp_hal::clock::CpuClock;
use esp_hal::gpio::{Level, Output, OutputConfig};
use esp_hal::interrupt::software::SoftwareInterruptControl;
use esp_hal::peripherals::WIFI;
use esp_hal::rng::Rng;
use esp_hal::rtc_cntl::Rtc;
use esp_hal::timer::timg::TimerGroup;
use esp_radio::wifi::WifiController;

use {esp_backtrace as _, esp_println as _};

use light_sensor_node::NodeSession;
use light_sensor_node::config::{
    EXTRA_HEAP_SIZE, LED_GPIO_PIN, NET_SOCKET_COUNT, WIFI_HEAP_SIZE, node_config,
};
use light_sensor_node::hal::{EmbassyClock, GpioStatusPin, HardwareRng, RtcDeepSleep};
use light_sensor_node::tasks::{EspWifiLink, MqttBuffers, RustMqttSession, net_task};

esp_bootloader_esp_idf::esp_app_desc!();

/// Einstiegspunkt nach jedem Reset bzw. Wake-up
///
/// Bringt Radio und Netzwerk-Stack hoch und übergibt dann an die
/// Bootstrap-Zustandsmaschine. Die endet im Deep Sleep, der Timer-Wake-up
/// startet wieder hier.
#[esp_rtos::main]
async fn main(spawner: Spawner) -> ! {
    let peripherals =
        esp_hal::init(esp_hal::Config::default().with_cpu_clock(CpuClock::max()));

    esp_alloc::heap_allocator!(
        #[esp_hal::ram(reclaimed)]
        size: WIFI_HEAP_SIZE
    );
    esp_alloc::heap_allocator!(size: EXTRA_HEAP_SIZE);

    // esp-rtos muss vor esp-radio laufen
    let timg0 = TimerGroup::new(peripherals.TIMG0);
    let swi = SoftwareInterruptControl::new(peripherals.SW_INTERRUPT);
    esp_rtos::start(timg0.timer0, swi.software_interrupt0);

    // Board-LED hängt active-low am Pin, Start mit High = aus
    info!("Status LED on GPIO{}", LED_GPIO_PIN);
    let led = GpioStatusPin::new(Output::new(
        peripherals.GPIO15,
        Level::High,
        OutputConfig::default(),
    ));
    let sleeper = RtcDeepSleep::new(Rtc::new(peripherals.LPWR));

    let rng = Rng::new();
    let (controller, stack) = start_network(spawner, peripherals.WIFI, &rng);

    static MQTT_BUFFERS: StaticCell<MqttBuffers> = StaticCell::new();
    let mqtt_buffers = MQTT_BUFFERS.init_with(MqttBuffers::new);

    let mut session: NodeSession = NodeSession::new(
        node_config(),
        EspWifiLink::new(spawner, controller, stack),
        RustMqttSession::new(stack, mqtt_buffers),
        led,
        sleeper,
        EmbassyClock,
        HardwareRng::new(rng),
    );

    let reason = session.run().await;
    error!("Deep sleep returned ({}), phase {}", reason, session.phase());

    loop {
        Timer::after(Duration::from_secs(3600)).await;
    }
}

/// Initialisiert esp-radio und den embassy-net Stack (DHCPv4)
///
/// Der Stack-Runner läuft ab hier als eigener Task. Der Controller geht
/// an [`EspWifiLink`], das die Assoziierung erst in `begin()` startet.
fn start_network(
    spawner: Spawner,
    wifi: WIFI<'static>,
    rng: &Rng,
) -> (WifiController<'static>, Stack<'static>) {
    static RADIO: StaticCell<esp_radio::Controller> = StaticCell::new();
    let radio = RADIO.init(esp_radio::init().expect("esp-radio init failed"));

    let (controller, interfaces) =
        esp_radio::wifi::new(radio, wifi, Default::default()).expect("WiFi driver init failed");

    static RESOURCES: StaticCell<StackResources<NET_SOCKET_COUNT>> = StaticCell::new();
    let seed = u64::from(rng.random()) << 32 | u64::from(rng.random());
    let (stack, runner) = embassy_net::new(
        interfaces.sta,
        NetConfig::dhcpv4(Default::default()),
        RESOURCES.init(StackResources::new()),
        seed,
    );

    if spawner.spawn(net_task(runner)).is_err() {
        error!("Network task could not be spawned");
    }

    (controller, stack)
}
