// WiFi Task - Verbindet mit WLAN, Status wird von node-core gepollt
use defmt::{Debug2Format, error, info, warn};
use embassy_executor::Spawner;
use embassy_net::{Runner, Stack};
use embassy_time::{Duration, Timer};
use esp_radio::wifi::{ClientConfig, ModeConfig, WifiController, WifiDevice, WifiEvent};
use node_core::WifiLink;

use crate::config::WIFI_RETRY_DELAY_MS;

/// WiFi Connection Task
///
/// Managed die Assoziierung:
/// - Konfiguriert Station-Mode mit den Credentials
/// - Verbindet mit dem Access Point
/// - Versucht es nach Fehlern erneut, bis der Bootstrap aufgibt
///
/// Das Zeitbudget liegt beim Bootstrap; läuft es ab, geht der Chip in
/// Deep Sleep und der Task endet mit dem Reset.
#[embassy_executor::task]
pub async fn connection_task(
    mut controller: WifiController<'static>,
    ssid: &'static str,
    password: &'static str,
) {
    info!("WiFi: Starting connection task");

    loop {
        if matches!(controller.is_started(), Ok(false)) {
            let client_config = ModeConfig::Client(
                ClientConfig::default()
                    .with_ssid(ssid.into())
                    .with_password(password.into()),
            );

            if let Err(e) = controller.set_config(&client_config) {
                error!("WiFi: Failed to set configuration: {}", Debug2Format(&e));
                Timer::after(Duration::from_millis(WIFI_RETRY_DELAY_MS)).await;
                continue;
            }

            if let Err(e) = controller.start_async().await {
                error!("WiFi: Failed to start: {}", Debug2Format(&e));
                Timer::after(Duration::from_millis(WIFI_RETRY_DELAY_MS)).await;
                continue;
            }

            info!("WiFi: Started");
        }

        match controller.connect_async().await {
            Ok(_) => info!("WiFi: Associated with '{}'", ssid),
            Err(e) => {
                warn!("WiFi: Connection failed: {}", Debug2Format(&e));
                Timer::after(Duration::from_millis(WIFI_RETRY_DELAY_MS)).await;
                continue;
            }
        }

        controller.wait_for_event(WifiEvent::StaDisconnected).await;
        warn!("WiFi: Disconnected from AP, will retry...");
        Timer::after(Duration::from_millis(WIFI_RETRY_DELAY_MS)).await;
    }
}

/// Network Task
///
/// Prozessiert Netzwerk-Pakete für den embassy-net Stack
#[embassy_executor::task]
pub async fn net_task(mut runner: Runner<'static, WifiDevice<'static>>) -> ! {
    runner.run().await
}

/// WifiLink-Implementierung für esp-radio + embassy-net
///
/// `begin()` spawnt den Connection-Task; als assoziiert gilt der Link erst,
/// wenn DHCP eine IPv4-Adresse geliefert hat.
pub struct EspWifiLink {
    spawner: Spawner,
    controller: Option<WifiController<'static>>,
    stack: Stack<'static>,
}

impl EspWifiLink {
    pub fn new(spawner: Spawner, controller: WifiController<'static>, stack: Stack<'static>) -> Self {
        Self {
            spawner,
            controller: Some(controller),
            stack,
        }
    }
}

impl WifiLink for EspWifiLink {
    async fn begin(&mut self, ssid: &'static str, password: &'static str) {
        let Some(controller) = self.controller.take() else {
            warn!("WiFi: Association already started");
            return;
        };

        if let Err(e) = self
            .spawner
            .spawn(connection_task(controller, ssid, password))
        {
            error!("WiFi: Failed to spawn connection task: {}", Debug2Format(&e));
        }
    }

    fn is_associated(&mut self) -> bool {
        self.stack.is_link_up() && self.stack.config_v4().is_some()
    }

    fn local_ipv4(&self) -> Option<[u8; 4]> {
        self.stack
            .config_v4()
            .map(|config| config.address.address().octets())
    }
}
