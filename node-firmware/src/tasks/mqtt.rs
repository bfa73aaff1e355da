// MQTT Session - rust-mqtt Client über embassy-net TCP
use defmt::{Debug2Format, info, warn};
use embassy_futures::select::{Either, select};
use embassy_net::{Ipv4Address, Stack, tcp::TcpSocket};
use embassy_time::{Duration, Instant, Timer, with_timeout};
use heapless::String;

use rust_mqtt::client::client::MqttClient;
use rust_mqtt::client::client_config::{ClientConfig, MqttVersion};
use rust_mqtt::packet::v5::publish_packet::QualityOfService;
use rust_mqtt::packet::v5::reason_codes::ReasonCode;
use rust_mqtt::utils::rng_generator::CountingRng;
use rust_mqtt::utils::types::EncodedString;

use node_core::types::CLIENT_ID_CAPACITY;
use node_core::{BrokerSession, BrokerStatus, MessageHandler, PingSchedule};

use crate::config::*;

type Client<'a> = MqttClient<'a, TcpSocket<'a>, 5, CountingRng>;

/// Speicher für eine Broker-Verbindung
///
/// Muss 'static sein (StaticCell in main), weil der rust-mqtt Client die
/// Buffer und die Client-ID für die Dauer der Session ausleiht.
pub struct MqttBuffers {
    tcp_rx: [u8; TCP_BUFFER_SIZE],
    tcp_tx: [u8; TCP_BUFFER_SIZE],
    send: [u8; MQTT_BUFFER_SIZE],
    recv: [u8; MQTT_BUFFER_SIZE],
    client_id: String<CLIENT_ID_CAPACITY>,
}

impl MqttBuffers {
    pub const fn new() -> Self {
        Self {
            tcp_rx: [0; TCP_BUFFER_SIZE],
            tcp_tx: [0; TCP_BUFFER_SIZE],
            send: [0; MQTT_BUFFER_SIZE],
            recv: [0; MQTT_BUFFER_SIZE],
            client_id: String::new(),
        }
    }
}

impl Default for MqttBuffers {
    fn default() -> Self {
        Self::new()
    }
}

/// BrokerSession-Implementierung mit rust-mqtt (MQTT v5)
///
/// Ein Verbindungsversuch pro Boot: `connect()` verbraucht die Buffer.
/// Fehler werden auf [`BrokerStatus`] abgebildet:
/// - TCP-Connect / Adresse ungültig → -2
/// - Timeout beim Verbindungsaufbau → -4
/// - Verbindung während der Session verloren → -3
/// - Broker Reason Codes → positiver Code
pub struct RustMqttSession<'a> {
    stack: Stack<'static>,
    buffers: Option<&'a mut MqttBuffers>,
    client: Option<Client<'a>>,
    ping: PingSchedule,
    status: BrokerStatus,
}

impl<'a> RustMqttSession<'a> {
    pub fn new(stack: Stack<'static>, buffers: &'a mut MqttBuffers) -> Self {
        Self {
            stack,
            buffers: Some(buffers),
            client: None,
            ping: PingSchedule::new(MQTT_KEEP_ALIVE_SECS, 0),
            status: BrokerStatus::DISCONNECTED,
        }
    }

    /// Letzter bekannter Session-Status
    pub fn status(&self) -> BrokerStatus {
        self.status
    }

    /// TCP-Verbindung aufbauen und MQTT CONNECT senden
    async fn open(&mut self, client_id: &str) -> Result<Client<'a>, BrokerStatus> {
        let buffers = self.buffers.take().ok_or(BrokerStatus::CONNECT_FAILED)?;

        let broker: Ipv4Address = MQTT_BROKER.parse().map_err(|_| {
            warn!("MQTT: '{}' is not an IPv4 address", MQTT_BROKER);
            BrokerStatus::CONNECT_FAILED
        })?;

        let MqttBuffers {
            tcp_rx,
            tcp_tx,
            send,
            recv,
            client_id: id_storage,
        } = buffers;

        // Client-ID muss so lange leben wie der Client
        id_storage.clear();
        id_storage
            .push_str(client_id)
            .map_err(|_| BrokerStatus::CONNECT_FAILED)?;
        let id_storage: &'a String<CLIENT_ID_CAPACITY> = id_storage;
        let id = id_storage.as_str();

        // TCP Connect
        let mut socket = TcpSocket::new(self.stack, tcp_rx, tcp_tx);
        socket.set_timeout(Some(Duration::from_secs(MQTT_SOCKET_TIMEOUT_SECS)));
        socket
            .connect((broker, MQTT_PORT))
            .await
            .map_err(|e| {
                warn!("MQTT: TCP connect failed: {}", Debug2Format(&e));
                BrokerStatus::CONNECT_FAILED
            })?;
        info!("MQTT: TCP connected to {}:{}", MQTT_BROKER, MQTT_PORT);

        // MQTT Client Configuration
        let rng = CountingRng(20000);
        let mut config = ClientConfig::<5, _>::new(MqttVersion::MQTTv5, rng);
        config.client_id = EncodedString {
            string: id,
            len: id.len() as u16,
        };
        config.keep_alive = MQTT_KEEP_ALIVE_SECS;
        config.max_packet_size = MQTT_BUFFER_SIZE as u32;

        let mut client = MqttClient::<_, 5, _>::new(
            socket,
            send,
            MQTT_BUFFER_SIZE,
            recv,
            MQTT_BUFFER_SIZE,
            config,
        );

        // MQTT CONNECT
        client
            .connect_to_broker()
            .await
            .map_err(|reason| status_from_reason(reason, BrokerStatus::CONNECT_FAILED))?;

        Ok(client)
    }
}

/// Bildet einen rust-mqtt ReasonCode auf einen Session-Status ab
///
/// Netzwerkfehler haben keinen Broker-Code und werden auf `network` gemappt.
fn status_from_reason(reason: ReasonCode, network: BrokerStatus) -> BrokerStatus {
    match reason {
        ReasonCode::NetworkError => network,
        other => {
            let code: u8 = other.into();
            BrokerStatus::from_reason_code(code)
        }
    }
}

impl BrokerSession for RustMqttSession<'_> {
    async fn connect(&mut self, client_id: &str) -> Result<(), BrokerStatus> {
        let opened = with_timeout(
            Duration::from_secs(MQTT_CONNECT_TIMEOUT_SECS),
            self.open(client_id),
        )
        .await;

        let result = match opened {
            Ok(Ok(client)) => {
                self.client = Some(client);
                self.ping = PingSchedule::new(MQTT_KEEP_ALIVE_SECS, Instant::now().as_millis());
                Ok(())
            }
            Ok(Err(status)) => Err(status),
            Err(_) => Err(BrokerStatus::CONNECTION_TIMEOUT),
        };

        self.status = match result {
            Ok(()) => BrokerStatus::CONNECTED,
            Err(status) => status,
        };
        result
    }

    async fn publish(&mut self, topic: &str, payload: &[u8]) -> Result<(), BrokerStatus> {
        let client = self.client.as_mut().ok_or(BrokerStatus::DISCONNECTED)?;
        client
            .send_message(topic, payload, QualityOfService::QoS0, false)
            .await
            .map_err(|reason| status_from_reason(reason, BrokerStatus::CONNECTION_LOST))?;
        info!("MQTT: Published {} bytes to '{}'", payload.len(), topic);
        Ok(())
    }

    async fn subscribe(&mut self, topic: &str) -> Result<(), BrokerStatus> {
        let client = self.client.as_mut().ok_or(BrokerStatus::DISCONNECTED)?;
        client
            .subscribe_to_topic(topic)
            .await
            .map_err(|reason| status_from_reason(reason, BrokerStatus::CONNECTION_LOST))?;
        info!("MQTT: Subscribed to '{}'", topic);
        Ok(())
    }

    /// Wartet auf die nächste Nachricht und sendet dazwischen Pings
    ///
    /// Die Ping-Deadline liegt in der Session und überlebt die Rückkehr nach
    /// jeder Nachricht.
    async fn receive<H: MessageHandler>(&mut self, handler: &mut H) -> Result<(), BrokerStatus> {
        let Self {
            client,
            ping,
            status,
            ..
        } = self;
        let client = client.as_mut().ok_or(BrokerStatus::DISCONNECTED)?;

        loop {
            let deadline = Instant::from_millis(ping.next_ping_ms());
            // Gewinnt der Timer, wird receive_message mitten im Lesen
            // verworfen. Ein halbes Paket bringt den Client aus dem Tritt,
            // der nächste Receive meldet dann einen Fehler und der Node
            // schläft. Bei seltenen Kommandos wird das in Kauf genommen.
            match select(client.receive_message(), Timer::at(deadline)).await {
                Either::First(Ok((topic, payload))) => {
                    handler.on_message(topic, payload);
                    return Ok(());
                }
                Either::First(Err(reason)) => {
                    warn!("MQTT: Receive failed: {}", Debug2Format(&reason));
                    *status = status_from_reason(reason, BrokerStatus::CONNECTION_LOST);
                    return Err(*status);
                }
                Either::Second(()) => {
                    if let Err(reason) = client.send_ping().await {
                        warn!("MQTT: Ping failed: {}", Debug2Format(&reason));
                        *status = status_from_reason(reason, BrokerStatus::CONNECTION_LOST);
                        return Err(*status);
                    }
                    ping.on_ping_sent(Instant::now().as_millis());
                }
            }
        }
    }
}
