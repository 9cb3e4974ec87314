mod common;

use common::{backend, config, connected, scripted_server};
use gazectl_client::events::{MOTION_DONE, MOTION_ONSET};
use gazectl_client::{Bottle, ContextId, EventParameters, GazeClient, GazeEvent};
use gazectl_io::{LocalNetwork, Requester};
use parking_lot::Mutex;
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

const THREADS: usize = 8;

#[derive(Default)]
struct InFlight {
    current: AtomicUsize,
    peak: AtomicUsize,
    served: AtomicUsize,
}

#[test]
fn concurrent_calls_keep_one_request_in_flight() {
    let network = Arc::new(LocalNetwork::new());
    let (_backend, forward) = backend(&network);
    let gauge = Arc::new(InFlight::default());
    let handler_gauge = Arc::clone(&gauge);
    let _server = scripted_server(
        &network,
        Arc::new(move |request: &Bottle| -> Option<Bottle> {
            let now = handler_gauge.current.fetch_add(1, Ordering::SeqCst) + 1;
            handler_gauge.peak.fetch_max(now, Ordering::SeqCst);
            thread::sleep(Duration::from_micros(200));
            let reply = forward.request(request, None).ok();
            handler_gauge.current.fetch_sub(1, Ordering::SeqCst);
            handler_gauge.served.fetch_add(1, Ordering::SeqCst);
            reply
        }),
    );
    let client = Arc::new(GazeClient::connect(network.clone(), &config()).unwrap());
    let before = gauge.served.load(Ordering::SeqCst);

    let workers: Vec<_> = (0..THREADS)
        .map(|_| {
            let client = Arc::clone(&client);
            thread::spawn(move || {
                for _ in 0..50 {
                    client.get_vor_gain().expect("gain answered");
                }
            })
        })
        .collect();
    for worker in workers {
        worker.join().unwrap();
    }

    assert_eq!(gauge.peak.load(Ordering::SeqCst), 1);
    assert_eq!(gauge.served.load(Ordering::SeqCst) - before, THREADS * 50);
}

#[test]
fn concurrent_stores_track_every_issued_id() {
    let (_network, server, client) = connected();
    let client = Arc::new(client);

    let workers: Vec<_> = (0..THREADS)
        .map(|_| {
            let client = Arc::clone(&client);
            thread::spawn(move || {
                (0..10)
                    .map(|_| client.store_context().expect("store succeeds"))
                    .collect::<Vec<_>>()
            })
        })
        .collect();
    let mut issued = BTreeSet::new();
    for worker in workers {
        for id in worker.join().unwrap() {
            assert!(issued.insert(id), "{} issued twice", id);
        }
    }

    assert_eq!(issued.len(), THREADS * 10);
    assert_eq!(client.tracked_contexts(), issued.iter().copied().collect::<Vec<_>>());
    let held: Vec<ContextId> = server
        .contexts()
        .into_iter()
        .map(|id| ContextId(id as u32))
        .collect();
    assert_eq!(held, client.tracked_contexts());

    client.delete_all_contexts().unwrap();
    assert!(client.tracked_contexts().is_empty());
    assert!(server.contexts().is_empty());
}

#[test]
fn handler_churn_during_delivery_never_loses_or_repeats_events() {
    const EVENTS: usize = 300;

    let (_network, server, client) = connected();
    let client = Arc::new(client);
    let all = Arc::new(Mutex::new(Vec::new()));
    let done = Arc::new(Mutex::new(Vec::new()));

    let sink = Arc::clone(&all);
    client
        .on_event(&EventParameters::wildcard(), move |event: &GazeEvent| {
            sink.lock().push(event.time);
        })
        .unwrap();

    let stop = Arc::new(AtomicBool::new(false));
    let churn = {
        let client = Arc::clone(&client);
        let done = Arc::clone(&done);
        let stop = Arc::clone(&stop);
        thread::spawn(move || {
            let params = EventParameters::new(MOTION_DONE);
            while !stop.load(Ordering::SeqCst) {
                let sink = Arc::clone(&done);
                client
                    .on_event(&params, move |event: &GazeEvent| {
                        sink.lock().push(event.time);
                    })
                    .expect("local registration");
                client
                    .on_event(&EventParameters::new(MOTION_ONSET), |_: &GazeEvent| {})
                    .expect("local registration");
                thread::yield_now();
                client.unregister_event(&params).expect("local removal");
            }
        })
    };

    for index in 0..EVENTS {
        server
            .emit_event(&GazeEvent {
                event_type: MOTION_DONE.to_string(),
                time: index as f64,
                checkpoint: None,
            })
            .unwrap();
    }

    let deadline = Instant::now() + Duration::from_secs(5);
    while all.lock().len() < EVENTS && Instant::now() < deadline {
        thread::sleep(Duration::from_millis(10));
    }
    stop.store(true, Ordering::SeqCst);
    churn.join().unwrap();

    let expected: Vec<f64> = (0..EVENTS).map(|index| index as f64).collect();
    assert_eq!(*all.lock(), expected);

    let specific = done.lock().clone();
    let distinct: BTreeSet<u64> = specific.iter().map(|time| *time as u64).collect();
    assert_eq!(distinct.len(), specific.len(), "an event reached the handler twice");
    assert!(specific.iter().all(|time| expected.contains(time)));
}
