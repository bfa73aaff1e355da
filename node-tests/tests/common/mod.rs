//! Mock-Implementierungen der node-core Traits
//!
//! Alle Mocks schreiben in ein gemeinsames Event-Log, damit Tests die
//! Reihenfolge der Aufrufe prüfen können. Die Zeit ist simuliert und wird
//! zwischen Clock und WiFi-Mock geteilt.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use node_core::{
    BrokerSession, BrokerStatus, Clock, DeepSleep, MessageHandler, NodeConfig, PinLevel,
    RandomSource, StatusPin, WifiLink,
};

// ============================================================================
// Event-Log
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    WifiBegin { ssid: String, at_ms: u64 },
    Connect { client_id: String, at_ms: u64 },
    Publish { topic: String, payload: Vec<u8> },
    Subscribe { topic: String },
    Message { topic: String },
    PinSet(PinLevel),
    DeepSleep { duration_us: u64, at_ms: u64 },
}

#[derive(Clone, Default)]
pub struct EventLog(Rc<RefCell<Vec<Event>>>);

impl EventLog {
    pub fn push(&self, event: Event) {
        self.0.borrow_mut().push(event);
    }

    pub fn events(&self) -> Vec<Event> {
        self.0.borrow().clone()
    }

    pub fn count(&self, pred: impl Fn(&Event) -> bool) -> usize {
        self.0.borrow().iter().filter(|e| pred(e)).count()
    }

    pub fn position(&self, pred: impl Fn(&Event) -> bool) -> Option<usize> {
        self.0.borrow().iter().position(pred)
    }

    pub fn pin_levels(&self) -> Vec<PinLevel> {
        self.0
            .borrow()
            .iter()
            .filter_map(|e| match e {
                Event::PinSet(level) => Some(*level),
                _ => None,
            })
            .collect()
    }

    pub fn sleeps(&self) -> Vec<u64> {
        self.0
            .borrow()
            .iter()
            .filter_map(|e| match e {
                Event::DeepSleep { duration_us, .. } => Some(*duration_us),
                _ => None,
            })
            .collect()
    }
}

pub type SimTime = Rc<Cell<u64>>;

// ============================================================================
// Clock
// ============================================================================

pub struct SimClock {
    pub time: SimTime,
}

impl Clock for SimClock {
    fn now_ms(&self) -> u64 {
        self.time.get()
    }

    async fn sleep_ms(&mut self, ms: u64) {
        self.time.set(self.time.get() + ms);
    }
}

// ============================================================================
// WiFi
// ============================================================================

pub struct MockWifi {
    pub time: SimTime,
    pub log: EventLog,
    /// Simulierte Zeit, ab der der Link steht (None = nie)
    pub associate_at: Option<u64>,
    pub ip: [u8; 4],
    pub checks: Rc<Cell<usize>>,
}

impl WifiLink for MockWifi {
    async fn begin(&mut self, ssid: &'static str, _password: &'static str) {
        self.log.push(Event::WifiBegin {
            ssid: ssid.to_string(),
            at_ms: self.time.get(),
        });
    }

    fn is_associated(&mut self) -> bool {
        self.checks.set(self.checks.get() + 1);
        self.associate_at.is_some_and(|t| self.time.get() >= t)
    }

    fn local_ipv4(&self) -> Option<[u8; 4]> {
        self.associate_at.map(|_| self.ip)
    }
}

// ============================================================================
// Broker
// ============================================================================

pub struct MockBroker {
    pub time: SimTime,
    pub log: EventLog,
    pub connect_result: Result<(), BrokerStatus>,
    pub publish_result: Result<(), BrokerStatus>,
    pub subscribe_result: Result<(), BrokerStatus>,
    pub inbox: VecDeque<(String, Vec<u8>)>,
    /// Status, der gemeldet wird wenn die Inbox leer ist
    pub drained_status: BrokerStatus,
}

impl BrokerSession for MockBroker {
    async fn connect(&mut self, client_id: &str) -> Result<(), BrokerStatus> {
        self.log.push(Event::Connect {
            client_id: client_id.to_string(),
            at_ms: self.time.get(),
        });
        self.connect_result
    }

    async fn publish(&mut self, topic: &str, payload: &[u8]) -> Result<(), BrokerStatus> {
        self.log.push(Event::Publish {
            topic: topic.to_string(),
            payload: payload.to_vec(),
        });
        self.publish_result
    }

    async fn subscribe(&mut self, topic: &str) -> Result<(), BrokerStatus> {
        self.log.push(Event::Subscribe {
            topic: topic.to_string(),
        });
        self.subscribe_result
    }

    async fn receive<H: MessageHandler>(&mut self, handler: &mut H) -> Result<(), BrokerStatus> {
        match self.inbox.pop_front() {
            Some((topic, payload)) => {
                self.log.push(Event::Message {
                    topic: topic.clone(),
                });
                handler.on_message(&topic, &payload);
                Ok(())
            }
            None => Err(self.drained_status),
        }
    }
}

// ============================================================================
// Pin, Sleep, RNG
// ============================================================================

pub struct MockPin {
    pub log: EventLog,
}

impl StatusPin for MockPin {
    fn set_level(&mut self, level: PinLevel) {
        self.log.push(Event::PinSet(level));
    }
}

pub struct MockSleep {
    pub time: SimTime,
    pub log: EventLog,
}

impl DeepSleep for MockSleep {
    fn deep_sleep(&mut self, duration_us: u64) {
        self.log.push(Event::DeepSleep {
            duration_us,
            at_ms: self.time.get(),
        });
    }
}

/// Liefert eine feste Folge von Zufallswerten (zyklisch)
pub struct SeqRng {
    pub values: Vec<u16>,
    pub next: usize,
}

impl SeqRng {
    pub fn new(values: &[u16]) -> Self {
        Self {
            values: values.to_vec(),
            next: 0,
        }
    }
}

impl RandomSource for SeqRng {
    fn next_u16(&mut self) -> u16 {
        let value = self.values[self.next % self.values.len()];
        self.next += 1;
        value
    }
}

// ============================================================================
// Test-Fixture
// ============================================================================

pub type TestSession =
    node_core::DeviceSession<MockWifi, MockBroker, MockPin, MockSleep, SimClock, SeqRng>;

/// Baut eine Session mit gemeinsamer Zeit und gemeinsamem Event-Log
pub struct Fixture {
    pub time: SimTime,
    pub log: EventLog,
    pub wifi_checks: Rc<Cell<usize>>,
    pub config: NodeConfig,
    pub associate_at: Option<u64>,
    pub connect_result: Result<(), BrokerStatus>,
    pub publish_result: Result<(), BrokerStatus>,
    pub subscribe_result: Result<(), BrokerStatus>,
    pub inbox: VecDeque<(String, Vec<u8>)>,
    pub drained_status: BrokerStatus,
    pub random: Vec<u16>,
}

impl Fixture {
    pub fn new() -> Self {
        Self {
            time: Rc::new(Cell::new(0)),
            log: EventLog::default(),
            wifi_checks: Rc::new(Cell::new(0)),
            config: NodeConfig::with_credentials("TestNetz", "geheim"),
            associate_at: Some(0),
            connect_result: Ok(()),
            publish_result: Ok(()),
            subscribe_result: Ok(()),
            inbox: VecDeque::new(),
            drained_status: BrokerStatus::CONNECTION_LOST,
            random: vec![0xbeef],
        }
    }

    pub fn message(mut self, topic: &str, payload: &[u8]) -> Self {
        self.inbox.push_back((topic.to_string(), payload.to_vec()));
        self
    }

    pub fn build(&self) -> TestSession {
        node_core::DeviceSession::new(
            self.config,
            MockWifi {
                time: self.time.clone(),
                log: self.log.clone(),
                associate_at: self.associate_at,
                ip: [192, 168, 0, 42],
                checks: self.wifi_checks.clone(),
            },
            MockBroker {
                time: self.time.clone(),
                log: self.log.clone(),
                connect_result: self.connect_result,
                publish_result: self.publish_result,
                subscribe_result: self.subscribe_result,
                inbox: self.inbox.clone(),
                drained_status: self.drained_status,
            },
            MockPin {
                log: self.log.clone(),
            },
            MockSleep {
                time: self.time.clone(),
                log: self.log.clone(),
            },
            SimClock {
                time: self.time.clone(),
            },
            SeqRng::new(&self.random),
        )
    }
}
