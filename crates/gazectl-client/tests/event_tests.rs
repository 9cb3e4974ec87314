mod common;

use common::{assert_quiet, connected, recv};
use gazectl_client::events::{MOTION_DONE, MOTION_ONGOING, MOTION_ONSET};
use gazectl_client::{ErrorKind, EventKey, EventParameters, GazeEvent};
use std::sync::mpsc::{self, Receiver};
use std::sync::Mutex;

fn channel() -> (
    impl Fn(&GazeEvent) + Send + Sync + 'static,
    Receiver<GazeEvent>,
) {
    let (tx, rx) = mpsc::channel();
    let tx = Mutex::new(tx);
    let handler = move |event: &GazeEvent| {
        if let Ok(tx) = tx.lock() {
            let _ = tx.send(event.clone());
        }
    };
    (handler, rx)
}

fn event(event_type: &str, time: f64, checkpoint: Option<f64>) -> GazeEvent {
    GazeEvent {
        event_type: event_type.to_string(),
        time,
        checkpoint,
    }
}

#[test]
fn wildcard_and_specific_handlers_both_fire_once() {
    let (_network, server, client) = connected();
    let (all, all_rx) = channel();
    let (done, done_rx) = channel();
    client.on_event(&EventParameters::wildcard(), all).unwrap();
    client.on_event(&EventParameters::new(MOTION_DONE), done).unwrap();

    server.emit_event(&event(MOTION_DONE, 4.5, None)).unwrap();

    let seen_all = recv(&all_rx);
    let seen_done = recv(&done_rx);
    assert_eq!(seen_all.event_type, MOTION_DONE);
    assert_eq!(seen_all.time, 4.5);
    assert_eq!(seen_all, seen_done);
    assert_quiet(&all_rx);
    assert_quiet(&done_rx);
}

#[test]
fn plain_registration_is_local() {
    let (_network, server, client) = connected();
    let (handler, _rx) = channel();
    let key = client.on_event(&EventParameters::new(MOTION_ONSET), handler).unwrap();
    assert_eq!(key, EventKey::for_type(MOTION_ONSET));
    assert!(server.requests().is_empty());
    assert_eq!(client.registered_events(), vec![key]);

    client.unregister_event(&EventParameters::new(MOTION_ONSET)).unwrap();
    assert!(client.registered_events().is_empty());
    assert!(server.requests().is_empty());
}

#[test]
fn motion_ongoing_needs_the_server() {
    let (_network, server, client) = connected();
    let (handler, rx) = channel();
    let params = EventParameters::motion_ongoing(0.5);
    let key = client.on_event(&params, handler).unwrap();
    assert_eq!(key.as_str(), "motion-ongoing-0.5");
    assert_eq!(server.checkpoints(), vec![0.5]);
    assert_eq!(server.requests()[0].to_string(), "register ongoing 0.5");

    assert_eq!(server.emit_motion_ongoing(2.0).unwrap(), 1);
    let seen = recv(&rx);
    assert_eq!(seen.event_type, MOTION_ONGOING);
    assert_eq!(seen.checkpoint, Some(0.5));

    client.unregister_event(&params).unwrap();
    assert!(server.checkpoints().is_empty());
    assert!(client.registered_events().is_empty());
}

#[test]
fn rejected_registration_keeps_no_handler() {
    let (_network, server, client) = connected();
    server.reject("register");
    let (handler, _rx) = channel();
    let err = client
        .on_event(&EventParameters::motion_ongoing(0.3), handler)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Protocol);
    assert!(client.registered_events().is_empty());
}

#[test]
fn rejected_unregistration_keeps_the_handler() {
    let (_network, server, client) = connected();
    let (handler, _rx) = channel();
    let params = EventParameters::motion_ongoing(0.3);
    client.on_event(&params, handler).unwrap();

    server.reject("unregister");
    assert!(client.unregister_event(&params).is_err());
    assert_eq!(client.registered_events(), vec![params.key()]);
    assert_eq!(server.checkpoints(), vec![0.3]);
}

#[test]
fn unregistering_an_unknown_checkpoint_stays_local() {
    let (_network, server, client) = connected();
    client
        .unregister_event(&EventParameters::motion_ongoing(0.7))
        .expect("nothing to release");
    assert!(server.requests().is_empty());

    let (handler, _rx) = channel();
    client.on_event(&EventParameters::motion_ongoing(0.2), handler).unwrap();
    server.clear_requests();
    client
        .unregister_event(&EventParameters::motion_ongoing(0.7))
        .unwrap();
    assert!(server.requests().is_empty());
    assert_eq!(server.checkpoints(), vec![0.2]);
    assert_eq!(client.registered_events().len(), 1);
}

#[test]
fn invalid_checkpoint_is_a_precondition_failure() {
    let (_network, server, client) = connected();
    for checkpoint in [-0.1, f64::NAN, f64::INFINITY] {
        let (handler, _rx) = channel();
        let err = client
            .on_event(&EventParameters::motion_ongoing(checkpoint), handler)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Precondition);
    }
    assert!(server.requests().is_empty());
}

#[test]
fn other_checkpoints_are_dropped() {
    let (_network, server, client) = connected();
    let (handler, rx) = channel();
    client
        .on_event(&EventParameters::motion_ongoing(0.5), handler)
        .unwrap();

    server
        .emit_event(&event(MOTION_ONGOING, 1.0, Some(0.75)))
        .unwrap();
    server.emit_event(&event(MOTION_DONE, 1.5, None)).unwrap();
    assert_quiet(&rx);
}

#[test]
fn events_arrive_in_order() {
    let (_network, server, client) = connected();
    let (handler, rx) = channel();
    client.on_event(&EventParameters::wildcard(), handler).unwrap();

    for (i, kind) in [MOTION_ONSET, MOTION_ONGOING, MOTION_DONE].iter().enumerate() {
        let checkpoint = (*kind == MOTION_ONGOING).then_some(0.5);
        server.emit_event(&event(kind, i as f64, checkpoint)).unwrap();
    }
    let order: Vec<String> = (0..3).map(|_| recv(&rx).event_type).collect();
    assert_eq!(order, vec![MOTION_ONSET, MOTION_ONGOING, MOTION_DONE]);
}

#[test]
fn close_releases_server_checkpoints() {
    let (_network, server, mut client) = connected();
    for checkpoint in [0.25, 0.75] {
        let (handler, _rx) = channel();
        client
            .on_event(&EventParameters::motion_ongoing(checkpoint), handler)
            .unwrap();
    }
    let (handler, _rx) = channel();
    client.on_event(&EventParameters::wildcard(), handler).unwrap();

    client.close().unwrap();
    assert!(server.checkpoints().is_empty());
    assert!(client.registered_events().is_empty());
}

#[test]
fn close_drops_handlers_even_if_the_server_refuses() {
    let (_network, server, mut client) = connected();
    let (handler, _rx) = channel();
    client
        .on_event(&EventParameters::motion_ongoing(0.5), handler)
        .unwrap();
    server.reject("unregister");

    client.close().unwrap();
    assert!(client.registered_events().is_empty());
    assert_eq!(server.checkpoints(), vec![0.5]);
}

#[test]
fn supported_events_come_from_server_info() {
    let (_network, _server, client) = connected();
    let events = client.supported_events().unwrap();
    assert!(events.iter().any(|e| e == MOTION_ONGOING));
    assert!(events.iter().any(|e| e == "*"));
}
