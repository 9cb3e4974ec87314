mod common;

use common::{config, start_server};
use gazectl_client::{
    Clock, ErrorKind, GazeClient, ManualClock, NeckJoint, SimulatedGazeServer, Stamp,
};
use gazectl_io::LocalNetwork;
use std::sync::Arc;
use std::time::Duration;

fn manual_client(
    timeout: f64,
) -> (
    Arc<LocalNetwork>,
    SimulatedGazeServer,
    Arc<ManualClock>,
    GazeClient,
) {
    let (network, server) = start_server();
    let clock = Arc::new(ManualClock::new());
    let shared: Arc<dyn Clock> = clock.clone();
    let mut client = GazeClient::with_clock(network.clone(), shared);
    client.open(&config().with_timeout(timeout)).unwrap();
    (network, server, clock, client)
}

#[test]
fn first_read_is_zero_and_stale() {
    let (_network, _server, _clock, client) = manual_client(0.1);
    let reading = client.get_fixation_point().unwrap();
    assert_eq!(reading.value, vec![0.0; 3]);
    assert_eq!(reading.stamp, Stamp::default());
    assert!(!reading.fresh);

    let head = client.get_head_joints().unwrap();
    assert!(head.value.is_empty());
    assert!(!head.fresh);
}

#[test]
fn freshness_follows_the_window() {
    let (_network, server, clock, client) = manual_client(0.2);
    let stamp = server.publish_angles(&[10.0, 0.0, 5.0]).unwrap();

    let reading = client.get_angles().unwrap();
    assert_eq!(reading.value, vec![10.0, 0.0, 5.0]);
    assert_eq!(reading.stamp, stamp);
    assert!(reading.fresh);

    clock.advance(Duration::from_millis(199));
    assert!(client.get_angles().unwrap().fresh);

    clock.advance(Duration::from_millis(1));
    let stale = client.get_angles().unwrap();
    assert!(!stale.fresh);
    assert_eq!(stale.value, vec![10.0, 0.0, 5.0]);
}

#[test]
fn polling_does_not_refresh() {
    let (_network, server, clock, client) = manual_client(0.1);
    server.publish_fixation_point(&[0.1, 0.2, 0.3]).unwrap();
    assert!(client.get_fixation_point().unwrap().fresh);

    for _ in 0..10 {
        clock.advance(Duration::from_millis(20));
        client.get_fixation_point().unwrap();
    }
    assert!(!client.get_fixation_point().unwrap().fresh);

    server.publish_fixation_point(&[0.4, 0.5, 0.6]).unwrap();
    let reading = client.get_fixation_point().unwrap();
    assert!(reading.fresh);
    assert_eq!(reading.value, vec![0.4, 0.5, 0.6]);
}

#[test]
fn newest_sample_wins() {
    let (_network, server, _clock, client) = manual_client(0.1);
    server.publish_angles(&[1.0, 1.0, 1.0]).unwrap();
    server.publish_angles(&[2.0, 2.0, 2.0]).unwrap();
    let last = server.publish_angles(&[3.0, 3.0, 3.0]).unwrap();

    let reading = client.get_angles().unwrap();
    assert_eq!(reading.value, vec![3.0, 3.0, 3.0]);
    assert_eq!(reading.stamp, last);
}

#[test]
fn short_samples_are_ignored() {
    let (_network, server, _clock, client) = manual_client(0.1);
    server.publish_fixation_point(&[1.0, 2.0]).unwrap();
    let reading = client.get_fixation_point().unwrap();
    assert_eq!(reading.value, vec![0.0; 3]);
    assert!(!reading.fresh);
}

#[test]
fn head_sample_drives_block_here() {
    let (_network, server, _clock, client) = manual_client(0.1);
    let err = client.block_neck_pitch_here().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Precondition);
    assert_eq!(server.request_count("bind"), 0);

    server
        .publish_head_joints(&[0.0, 0.0, 0.0, -5.0, 2.0, 7.5])
        .unwrap();
    client.block_neck_pitch_here().unwrap();
    assert_eq!(
        server.neck_range(NeckJoint::Pitch),
        Some((-5.0, -5.0))
    );
    client.block_neck_roll_here().unwrap();
    assert_eq!(
        server.neck_range(NeckJoint::Roll),
        Some((2.0, 2.0))
    );
    client.block_eyes_here().unwrap();
    assert_eq!(server.blocked_vergence(), Some(7.5));
}
