//! Integration Tests für den Connectivity Bootstrap
//!
//! Diese Tests laufen auf dem Host (x86_64) und nutzen Mock-Kollaborateure
//! mit simulierter Zeit.

mod common;

use common::{Event, Fixture};
use embassy_futures::block_on;
use node_core::{BootstrapError, BrokerStatus, Phase, PinLevel};

// ============================================================================
// Tests: WiFi Join
// ============================================================================

#[test]
fn test_wifi_timeout_sleeps_without_mqtt() {
    let mut fixture = Fixture::new();
    fixture.associate_at = None;
    let mut session = fixture.build();

    let err = block_on(session.run());

    assert_eq!(err, BootstrapError::WifiJoinTimeout);
    assert_eq!(session.phase(), Phase::Sleeping);
    assert_eq!(fixture.log.count(|e| matches!(e, Event::Connect { .. })), 0);
    assert_eq!(fixture.log.count(|e| matches!(e, Event::Publish { .. })), 0);
    assert_eq!(fixture.log.sleeps(), vec![300_000_000]);
    assert!(session.client_id().is_none());

    // Sleep direkt nach Ablauf des Budgets, ohne Settle-Delay
    assert_eq!(
        fixture.log.events().last(),
        Some(&Event::DeepSleep {
            duration_us: 300_000_000,
            at_ms: 15_000
        })
    );
}

#[test]
fn test_wifi_polls_every_500ms() {
    let mut fixture = Fixture::new();
    fixture.associate_at = None;
    let mut session = fixture.build();

    let joined = block_on(session.join_wifi());

    assert_eq!(joined, Err(BootstrapError::WifiJoinTimeout));
    // Checks bei 0, 500, ..., 15000 ms
    assert_eq!(fixture.wifi_checks.get(), 31);
    assert_eq!(fixture.time.get(), 15_000);
}

#[test]
fn test_wifi_associates_before_timeout() {
    let mut fixture = Fixture::new();
    fixture.associate_at = Some(8_200);
    let mut session = fixture.build();

    let joined = block_on(session.join_wifi());

    // Nächster Poll nach 8200 ms ist bei 8500 ms
    assert_eq!(joined, Ok(8_500));
    assert_eq!(session.phase(), Phase::WifiUp);
    assert!(fixture.log.sleeps().is_empty());
}

#[test]
fn test_wifi_association_at_8200ms_proceeds_to_broker() {
    let mut fixture = Fixture::new();
    fixture.associate_at = Some(8_200);
    let mut session = fixture.build();

    let err = block_on(session.run());

    // Sleep erst nach dem Verbindungsabbruch des Brokers
    assert_eq!(
        err,
        BootstrapError::BrokerConnectFailure(BrokerStatus::CONNECTION_LOST)
    );
    assert_eq!(
        fixture.log.position(|e| matches!(e, Event::Connect { at_ms: 8_500, .. })),
        Some(1)
    );
    assert_eq!(fixture.log.sleeps().len(), 1);
}

#[test]
fn test_wifi_begin_uses_configured_ssid() {
    let fixture = Fixture::new();
    let mut session = fixture.build();

    block_on(session.join_wifi()).unwrap();

    assert_eq!(
        fixture.log.events()[0],
        Event::WifiBegin {
            ssid: "TestNetz".to_string(),
            at_ms: 0
        }
    );
}

// ============================================================================
// Tests: Broker Connect
// ============================================================================

#[test]
fn test_broker_failure_sleeps_without_publish() {
    let mut fixture = Fixture::new();
    fixture.connect_result = Err(BrokerStatus::CONNECT_FAILED);
    let mut session = fixture.build();

    let err = block_on(session.run());

    assert_eq!(
        err,
        BootstrapError::BrokerConnectFailure(BrokerStatus(-2))
    );
    assert_eq!(err.to_string(), "failed, rc=-2 Going to sleep");
    assert_eq!(fixture.log.count(|e| matches!(e, Event::Publish { .. })), 0);
    assert_eq!(fixture.log.count(|e| matches!(e, Event::Subscribe { .. })), 0);
    assert_eq!(
        fixture.log.sleeps(),
        vec![fixture.config.minutes_between * 30_000_000]
    );
    assert_eq!(session.phase(), Phase::Sleeping);
}

#[test]
fn test_broker_failure_waits_before_sleep() {
    let mut fixture = Fixture::new();
    fixture.connect_result = Err(BrokerStatus::CONNECT_FAILED);
    let mut session = fixture.build();

    block_on(session.run());

    // Connect bei 0 ms, Sleep nach 100 ms Settle-Delay
    assert_eq!(
        fixture.log.events().last(),
        Some(&Event::DeepSleep {
            duration_us: 300_000_000,
            at_ms: 100
        })
    );
}

#[test]
fn test_broker_error_codes_share_one_sleep_path() {
    for status in [
        BrokerStatus::CONNECTION_TIMEOUT,
        BrokerStatus::CONNECT_FAILED,
        BrokerStatus::from_reason_code(0x86),
        BrokerStatus::from_reason_code(0x87),
    ] {
        let mut fixture = Fixture::new();
        fixture.connect_result = Err(status);
        let mut session = fixture.build();

        let err = block_on(session.run());

        assert_eq!(err, BootstrapError::BrokerConnectFailure(status));
        assert_eq!(fixture.log.sleeps(), vec![300_000_000]);
    }
}

#[test]
fn test_connect_publishes_then_subscribes_once() {
    let fixture = Fixture::new().message("inTopic", b"1");
    let mut session = fixture.build();

    block_on(session.run());

    let publish = fixture
        .log
        .position(|e| matches!(e, Event::Publish { .. }))
        .unwrap();
    let subscribe = fixture
        .log
        .position(|e| matches!(e, Event::Subscribe { .. }))
        .unwrap();
    let first_message = fixture
        .log
        .position(|e| matches!(e, Event::Message { .. }))
        .unwrap();

    assert!(publish < subscribe);
    assert!(subscribe < first_message);
    assert_eq!(fixture.log.count(|e| matches!(e, Event::Publish { .. })), 1);
    assert_eq!(fixture.log.count(|e| matches!(e, Event::Subscribe { .. })), 1);

    assert_eq!(
        fixture.log.events()[publish],
        Event::Publish {
            topic: "LIGHTSENSOR/status".to_string(),
            payload: b"booted".to_vec()
        }
    );
    assert_eq!(
        fixture.log.events()[subscribe],
        Event::Subscribe {
            topic: "inTopic".to_string()
        }
    );
}

#[test]
fn test_publish_failure_still_subscribes_and_dispatches() {
    let mut fixture = Fixture::new().message("inTopic", b"1");
    fixture.publish_result = Err(BrokerStatus::CONNECTION_LOST);
    let mut session = fixture.build();

    block_on(session.run());

    assert_eq!(fixture.log.count(|e| matches!(e, Event::Subscribe { .. })), 1);
    assert_eq!(fixture.log.pin_levels(), vec![PinLevel::High]);
}

#[test]
fn test_subscribe_failure_still_dispatches() {
    // 0x87 = Not authorized
    let mut fixture = Fixture::new().message("inTopic", b"1");
    fixture.subscribe_result = Err(BrokerStatus(0x87));
    let mut session = fixture.build();

    let err = block_on(session.run());

    // Abbruch erst durch die leere Inbox, nicht durch den Subscribe
    assert_eq!(
        err,
        BootstrapError::BrokerConnectFailure(BrokerStatus::CONNECTION_LOST)
    );
    assert_eq!(session.dispatcher().handled(), 1);
    assert_eq!(session.dispatcher().level(), Some(PinLevel::High));
    assert_eq!(fixture.log.pin_levels(), vec![PinLevel::High]);
    assert_eq!(fixture.log.sleeps().len(), 1);
}

#[test]
fn test_client_id_uses_random_suffix() {
    let mut fixture = Fixture::new();
    fixture.random = vec![0x0a1b];
    let mut session = fixture.build();

    block_on(session.run());

    assert_eq!(
        session.client_id().map(|id| id.as_str()),
        Some("ESP8266Client-0a1b")
    );
    assert_eq!(
        fixture.log.events()[1],
        Event::Connect {
            client_id: "ESP8266Client-0a1b".to_string(),
            at_ms: 0
        }
    );
}

// ============================================================================
// Tests: Dispatch
// ============================================================================

#[test]
fn test_messages_drive_pin() {
    let fixture = Fixture::new()
        .message("inTopic", b"1")
        .message("inTopic", b"0")
        .message("inTopic", b"1abc")
        .message("inTopic", b"");
    let mut session = fixture.build();

    block_on(session.run());

    assert_eq!(
        fixture.log.pin_levels(),
        vec![PinLevel::High, PinLevel::Low, PinLevel::High, PinLevel::Low]
    );
    assert_eq!(session.dispatcher().handled(), 4);
    assert_eq!(session.dispatcher().level(), Some(PinLevel::Low));
}

#[test]
fn test_connection_loss_during_dispatch_sleeps() {
    let fixture = Fixture::new().message("inTopic", b"1");
    let mut session = fixture.build();

    let err = block_on(session.run());

    assert_eq!(err.to_string(), "failed, rc=-3 Going to sleep");
    assert_eq!(session.phase(), Phase::Sleeping);
    assert_eq!(fixture.log.sleeps().len(), 1);
    // Pin wurde vor dem Sleep gesetzt
    let pin = fixture
        .log
        .position(|e| matches!(e, Event::PinSet(_)))
        .unwrap();
    let sleep = fixture
        .log
        .position(|e| matches!(e, Event::DeepSleep { .. }))
        .unwrap();
    assert!(pin < sleep);
}

// ============================================================================
// Tests: Konfiguration
// ============================================================================

#[test]
fn test_sleep_duration_follows_minutes_between() {
    let mut fixture = Fixture::new();
    fixture.associate_at = None;
    fixture.config.minutes_between = 3;
    let mut session = fixture.build();

    block_on(session.run());

    assert_eq!(fixture.log.sleeps(), vec![90_000_000]);
}

#[test]
fn test_custom_join_timeout() {
    let mut fixture = Fixture::new();
    fixture.associate_at = None;
    fixture.config.wifi_join_timeout_ms = 2_000;
    let mut session = fixture.build();

    assert_eq!(
        block_on(session.join_wifi()),
        Err(BootstrapError::WifiJoinTimeout)
    );
    assert_eq!(fixture.time.get(), 2_000);
}

#[test]
fn test_new_session_starts_disconnected() {
    let fixture = Fixture::new();
    let session = fixture.build();

    assert_eq!(session.phase(), Phase::Disconnected);
    assert_eq!(session.config().status_payload, "booted");
}
