mod common;

use common::{backend, config, connected, scripted_server};
use gazectl_client::rpc::ACK;
use gazectl_client::{Bottle, ContextId, ErrorKind, GazeClient, GazeClientError, Tunable, Value};
use gazectl_io::{LocalNetwork, Requester};
use std::sync::Arc;

#[test]
fn store_issues_ids_from_one() {
    let (_network, server, client) = connected();
    assert_eq!(client.store_context().unwrap(), ContextId(1));
    assert_eq!(client.store_context().unwrap(), ContextId(2));
    assert_eq!(client.tracked_contexts(), vec![ContextId(1), ContextId(2)]);
    assert_eq!(server.contexts(), vec![1, 2]);
}

#[test]
fn restore_brings_back_the_snapshot() {
    let (_network, server, client) = connected();
    let id = client.store_context().unwrap();
    client.set_vor_gain(0.3).unwrap();
    assert_eq!(server.tunable(Tunable::VorGain), Some(0.3));

    client.restore_context(id).unwrap();
    assert_eq!(client.get_vor_gain().unwrap(), 1.0);

    // Restoring does not consume the id
    client.restore_context(id).unwrap();
    assert_eq!(client.tracked_contexts(), vec![id]);
}

#[test]
fn unknown_ids_never_reach_the_server() {
    let (_network, server, client) = connected();
    client.store_context().unwrap();
    server.clear_requests();

    assert!(matches!(
        client.restore_context(ContextId(2)),
        Err(GazeClientError::UnknownContext(ContextId(2)))
    ));
    assert!(matches!(
        client.delete_context(ContextId(7)),
        Err(GazeClientError::UnknownContext(ContextId(7)))
    ));
    assert!(server.requests().is_empty());
}

#[test]
fn default_context_is_always_restorable() {
    let (_network, server, client) = connected();
    client.restore_context(ContextId::DEFAULT).unwrap();
    client.store_context().unwrap();
    client.delete_all_contexts().unwrap();
    client.restore_context(ContextId::DEFAULT).unwrap();
    assert_eq!(server.request_count("rest"), 2);

    let err = client.delete_context(ContextId::DEFAULT).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Precondition);
}

#[test]
fn delete_removes_only_on_ack() {
    let (_network, server, client) = connected();
    let first = client.store_context().unwrap();
    let second = client.store_context().unwrap();

    server.reject("del");
    let err = client.delete_context(first).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Protocol);
    assert_eq!(client.tracked_contexts(), vec![first, second]);

    server.accept("del");
    client.delete_context(first).unwrap();
    assert_eq!(client.tracked_contexts(), vec![second]);
    assert_eq!(server.contexts(), vec![2]);
    assert!(client.restore_context(first).is_err());
}

#[test]
fn delete_all_sends_one_request() {
    let (_network, server, client) = connected();
    for _ in 0..3 {
        client.store_context().unwrap();
    }
    server.clear_requests();

    client.delete_all_contexts().unwrap();
    assert_eq!(server.request_count("del"), 1);
    assert_eq!(server.requests()[0].to_string(), "del (1 2 3)");
    assert!(client.tracked_contexts().is_empty());
    assert!(server.contexts().is_empty());
}

#[test]
fn delete_all_on_empty_set_is_local() {
    let (_network, server, client) = connected();
    client.delete_all_contexts().unwrap();
    assert!(server.requests().is_empty());
}

#[test]
fn delete_all_clears_even_when_rejected() {
    let (_network, server, client) = connected();
    client.store_context().unwrap();
    server.reject("del");

    let err = client.delete_all_contexts().unwrap_err();
    assert!(matches!(err, GazeClientError::Rejected { .. }));
    assert!(client.tracked_contexts().is_empty());
    assert_eq!(server.contexts(), vec![1]);
}

#[test]
fn delete_all_keeps_ids_on_transport_failure() {
    let (_network, server, client) = connected();
    let id = client.store_context().unwrap();
    server.set_silent(true);

    let err = client.delete_all_contexts().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Transport);
    assert_eq!(client.tracked_contexts(), vec![id]);
}

#[test]
fn failed_store_tracks_nothing() {
    let (_network, server, client) = connected();
    server.reject("stor");
    assert!(client.store_context().is_err());
    assert!(client.tracked_contexts().is_empty());
}

#[test]
fn fractional_context_id_is_malformed() {
    let network = Arc::new(LocalNetwork::new());
    let (_backend, forward) = backend(&network);
    let _server = scripted_server(
        &network,
        Arc::new(move |request: &Bottle| -> Option<Bottle> {
            if request.get(0).and_then(Value::as_str) == Some("stor") {
                return Some([Value::from(ACK), Value::from(1.7)].into_iter().collect());
            }
            forward.request(request, None).ok()
        }),
    );
    let client = GazeClient::connect(network.clone(), &config()).expect("client connects");

    let err = client.store_context().unwrap_err();
    assert!(matches!(err, GazeClientError::MalformedReply { .. }));
    assert_eq!(err.kind(), ErrorKind::Protocol);
    assert!(client.tracked_contexts().is_empty());
}

#[test]
fn tracked_ids_always_come_from_successful_stores() {
    let (_network, server, client) = connected();
    let mut issued = Vec::new();
    for step in 0..12 {
        match step % 4 {
            0 | 1 => issued.push(client.store_context().unwrap()),
            2 => {
                let _ = client.restore_context(ContextId(step));
                let _ = client.delete_context(ContextId(step + 40));
            }
            _ => {
                if let Some(id) = issued.first().copied() {
                    client.delete_context(id).unwrap();
                    issued.remove(0);
                }
            }
        }
        for id in client.tracked_contexts() {
            assert!(issued.contains(&id), "{} was never stored", id);
        }
        client.restore_context(ContextId::DEFAULT).unwrap();
    }
    server.reject("del");
    let _ = client.delete_all_contexts();
    assert!(client.tracked_contexts().is_empty());
}

#[test]
fn close_deletes_outstanding_contexts() {
    let (_network, server, mut client) = connected();
    client.store_context().unwrap();
    client.store_context().unwrap();
    client.close().unwrap();
    assert!(server.contexts().is_empty());
    assert!(client.tracked_contexts().is_empty());
}
