//! Connectivity Bootstrap - Zustandsmaschine für einen Power-Cycle
//!
//! Ablauf pro Boot:
//! 1. WiFi Join (begrenzt durch `wifi_join_timeout_ms`)
//! 2. Ein Verbindungsversuch zum Broker mit zufälliger Client-ID
//! 3. Boot-Meldung publishen, Control-Topic abonnieren
//! 4. Nachrichten auf den LED-Pin abbilden, bis die Verbindung abbricht
//!
//! Jeder Fehler endet im Deep Sleep. Der Wake-up ist ein vollständiger
//! Neustart, es gibt keinen weiteren Retry innerhalb eines Zyklus.

use core::convert::Infallible;

use crate::config::NodeConfig;
use crate::dispatch::PinDispatcher;
use crate::error::BootstrapError;
use crate::poll::{TimedOut, poll_with};
use crate::traits::{
    BrokerSession, Clock, DeepSleep, MessageHandler, RandomSource, StatusPin, WifiLink,
};
use crate::types::{ClientId, Phase};

/// Alle Kollaborateure eines Boot-Zyklus
///
/// Ersetzt globale Client-Objekte: die Session besitzt Radio, Broker,
/// Pin, Sleep-Primitive, Uhr und Zufallsquelle für genau einen Power-Cycle.
///
/// # Trait-basierte Abstraktion
/// Die generischen Parameter ermöglichen:
/// - Real Hardware im Production-Code (node-firmware)
/// - Mock-Implementierungen in Tests (node-tests)
pub struct DeviceSession<W, B, P, S, C, R> {
    config: NodeConfig,
    wifi: W,
    broker: B,
    dispatcher: PinDispatcher<P>,
    sleeper: S,
    clock: C,
    rng: R,
    phase: Phase,
    client_id: Option<ClientId>,
}

impl<W, B, P, S, C, R> DeviceSession<W, B, P, S, C, R>
where
    W: WifiLink,
    B: BrokerSession,
    P: StatusPin,
    S: DeepSleep,
    C: Clock,
    R: RandomSource,
{
    pub fn new(
        config: NodeConfig,
        wifi: W,
        broker: B,
        pin: P,
        sleeper: S,
        clock: C,
        rng: R,
    ) -> Self {
        Self {
            config,
            wifi,
            broker,
            dispatcher: PinDispatcher::new(pin),
            sleeper,
            clock,
            rng,
            phase: Phase::Disconnected,
            client_id: None,
        }
    }

    /// Führt den kompletten Boot-Zyklus aus
    ///
    /// Kehrt nur zurück, nachdem [`DeepSleep::deep_sleep`] aufgerufen wurde
    /// (auf der Hardware also nie). Der Rückgabewert ist der Grund für den
    /// Sleep.
    pub async fn run(&mut self) -> BootstrapError {
        let err = match self.connect_and_dispatch().await {
            Ok(never) => match never {},
            Err(err) => err,
        };
        self.enter_sleep(err).await;
        err
    }

    async fn connect_and_dispatch(&mut self) -> Result<Infallible, BootstrapError> {
        self.join_wifi().await?;
        self.connect_broker().await?;
        self.dispatch_messages().await
    }

    /// Phase 1: WiFi Join
    ///
    /// Gibt die Zeit bis zur Assoziierung in Millisekunden zurück.
    pub async fn join_wifi(&mut self) -> Result<u64, BootstrapError> {
        self.transition(Phase::WifiJoining);

        let NodeConfig {
            wifi_ssid,
            wifi_password,
            wifi_poll_interval_ms,
            wifi_join_timeout_ms,
            ..
        } = self.config;

        info!("Connecting to {}", wifi_ssid);
        self.wifi.begin(wifi_ssid, wifi_password).await;

        let wifi = &mut self.wifi;
        let joined = poll_with(
            &mut self.clock,
            wifi_poll_interval_ms,
            wifi_join_timeout_ms,
            || wifi.is_associated(),
            |elapsed| debug!("WiFi: waiting for link ({} ms)", elapsed),
        )
        .await;

        match joined {
            Ok(elapsed) => {
                self.transition(Phase::WifiUp);
                info!("WiFi connected after {} ms", elapsed);
                if let Some([a, b, c, d]) = self.wifi.local_ipv4() {
                    info!("IP address: {}.{}.{}.{}", a, b, c, d);
                }
                Ok(elapsed)
            }
            Err(TimedOut { waited_ms }) => {
                warn!("WiFi: no link after {} ms", waited_ms);
                Err(BootstrapError::WifiJoinTimeout)
            }
        }
    }

    /// Phase 2: Broker Connect mit anschließender Boot-Meldung
    ///
    /// Genau ein Versuch. Publish und Subscribe erfolgen nur nach
    /// erfolgreichem Connect, jeweils einmal und in dieser Reihenfolge.
    pub async fn connect_broker(&mut self) -> Result<(), BootstrapError> {
        self.transition(Phase::MqttConnecting);

        let client_id = ClientId::generate(&mut self.rng);
        info!("Attempting MQTT connection as {}...", client_id.as_str());
        let connected = self.broker.connect(client_id.as_str()).await;
        self.client_id = Some(client_id);
        connected.map_err(BootstrapError::BrokerConnectFailure)?;

        info!("connected");
        self.transition(Phase::MqttUp);
        self.announce().await;
        Ok(())
    }

    /// Boot-Meldung und Subscribe; Fehler werden nur geloggt
    async fn announce(&mut self) {
        let NodeConfig {
            status_topic,
            status_payload,
            control_topic,
            ..
        } = self.config;

        if let Err(status) = self
            .broker
            .publish(status_topic, status_payload.as_bytes())
            .await
        {
            warn!("MQTT: status publish failed, rc={}", status.code());
        }

        if let Err(status) = self.broker.subscribe(control_topic).await {
            warn!("MQTT: subscribe to {} failed, rc={}", control_topic, status.code());
        }
    }

    /// Phase 3: Nachrichten auf den Pin abbilden, bis die Session abbricht
    async fn dispatch_messages(&mut self) -> Result<Infallible, BootstrapError> {
        loop {
            let mut handler = TrackedDispatch {
                dispatcher: &mut self.dispatcher,
                phase: &mut self.phase,
            };
            self.broker
                .receive(&mut handler)
                .await
                .map_err(BootstrapError::BrokerConnectFailure)?;
        }
    }

    async fn enter_sleep(&mut self, err: BootstrapError) {
        error!("{}", err);

        // Log-Ausgabe vor dem Abschalten leeren
        if let BootstrapError::BrokerConnectFailure(_) = err {
            self.clock.sleep_ms(self.config.sleep_settle_ms).await;
        }

        self.transition(Phase::Sleeping);
        let duration_us = self.config.sleep_duration_us();
        info!("Deep sleep for {} us", duration_us);
        self.sleeper.deep_sleep(duration_us);
    }

    fn transition(&mut self, next: Phase) {
        debug!("Bootstrap: {} -> {}", self.phase, next);
        self.phase = next;
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Client-ID des letzten Verbindungsversuchs
    pub fn client_id(&self) -> Option<&ClientId> {
        self.client_id.as_ref()
    }

    pub fn dispatcher(&self) -> &PinDispatcher<P> {
        &self.dispatcher
    }

    pub fn config(&self) -> &NodeConfig {
        &self.config
    }
}

/// Setzt die Phase während eines Handler-Aufrufs auf `Dispatching`
struct TrackedDispatch<'a, P> {
    dispatcher: &'a mut PinDispatcher<P>,
    phase: &'a mut Phase,
}

impl<P: StatusPin> MessageHandler for TrackedDispatch<'_, P> {
    fn on_message(&mut self, topic: &str, payload: &[u8]) {
        *self.phase = Phase::Dispatching;
        self.dispatcher.on_message(topic, payload);
        *self.phase = Phase::MqttUp;
    }
}
