//! End-to-end tests for the tracking loop: lifecycle, emission and
//! shutdown behavior observed through a real UDP receiver.


use std::net::{SocketAddr, UdpSocket};
use std::time::{Duration, Instant};

use head_tracker::filters::FilterParams;
use head_tracker::protocol;
use head_tracker::tracker::{Tracker, TrackerConfig, TrackerState};
use head_tracker::Error;

use test_helpers::{neutral_sample, ScriptedSource, Tail};

fn fast_config() -> TrackerConfig {
    TrackerConfig {
        fps: 250.0,
        acquisition_timeout_secs: 1.0,
        filter: FilterParams::default(),
    }
}

fn receiver() -> (UdpSocket, SocketAddr) {
    let socket = UdpSocket::bind("127.0.0.1:0").unwrap();
    socket
        .set_read_timeout(Some(Duration::from_millis(300)))
        .unwrap();
    let addr = socket.local_addr().unwrap();
    (socket, addr)
}

fn wait_for_stopped(tracker: &Tracker) {
    let deadline = Instant::now() + Duration::from_secs(2);
    while tracker.state() != TrackerState::Stopped && Instant::now() < deadline {
        std::thread::sleep(Duration::from_millis(5));
    }
}

#[test]
fn test_streams_displacement_of_shifted_face() {
    let (socket, addr) = receiver();

    let neutral = neutral_sample();
    let mut shifted = neutral;
    shifted.left.x += 0.1;
    shifted.right.x += 0.1;

    let source = ScriptedSource::new(
        vec![Some(neutral.to_indexed())],
        Tail::Repeat(shifted.to_indexed()),
    );
    let mut tracker = Tracker::new(fast_config());
    tracker.start(Box::new(source), addr).unwrap();
    assert_eq!(tracker.state(), TrackerState::Tracking);

    let mut buf = [0u8; 64];
    let mut first_x = None;
    let mut pose = None;
    for i in 0..20 {
        let (len, _) = socket.recv_from(&mut buf).unwrap();
        assert_eq!(len, 48, "every datagram is exactly 48 bytes");
        let decoded = protocol::decode(&buf[..len]).unwrap();
        if i == 0 {
            first_x = Some(decoded.x);
        }
        pose = Some(decoded);
    }
    tracker.stop();

    // The face moved right, so the head reads as displaced the other way.
    // The first tick already points the right way despite filter lag.
    assert!(first_x.unwrap() < 0.0, "got first x = {:?}", first_x);
    let pose = pose.unwrap();
    assert!(pose.x < -2.0, "expected x near -3 after settling, got {}", pose.x);
    assert!(pose.x > -3.0 - 1e-9);
    assert!(tracker.latest_pose().unwrap().x < -2.0);
}

#[test]
fn test_no_face_ticks_emit_nothing() {
    let (socket, addr) = receiver();

    let neutral = neutral_sample();
    let source = ScriptedSource::new(
        vec![
            Some(neutral.to_indexed()),
            None,
            None,
            None,
            Some(neutral.to_indexed()),
        ],
        Tail::Exhaust,
    );
    let mut tracker = Tracker::new(fast_config());
    tracker.start(Box::new(source), addr).unwrap();

    // Exactly one datagram: dropout ticks and exhaustion emit nothing
    let mut buf = [0u8; 64];
    let (len, _) = socket.recv_from(&mut buf).unwrap();
    assert_eq!(len, 48);
    assert!(socket.recv_from(&mut buf).is_err());

    // The loop wound down on its own when the source ran out
    wait_for_stopped(&tracker);
    assert_eq!(tracker.state(), TrackerState::Stopped);
    tracker.stop();
}

#[test]
fn test_stop_halts_emission() {
    let (socket, addr) = receiver();

    let neutral = neutral_sample();
    let source = ScriptedSource::new(
        vec![Some(neutral.to_indexed())],
        Tail::Repeat(neutral.to_indexed()),
    );
    let mut tracker = Tracker::new(fast_config());
    tracker.start(Box::new(source), addr).unwrap();

    // Let some datagrams flow, then cut it off
    let mut buf = [0u8; 64];
    socket.recv_from(&mut buf).unwrap();
    socket.recv_from(&mut buf).unwrap();
    tracker.stop();
    assert_eq!(tracker.state(), TrackerState::Stopped);

    // Drain what was in flight before stop returned
    while socket.recv_from(&mut buf).is_ok() {}

    // Quiet period: nothing new may arrive after stop has returned
    std::thread::sleep(Duration::from_millis(100));
    assert!(socket.recv_from(&mut buf).is_err());
}

#[test]
fn test_stop_is_idempotent() {
    let (_socket, addr) = receiver();

    let mut tracker = Tracker::new(fast_config());
    // stop before start is a no-op
    tracker.stop();
    assert_eq!(tracker.state(), TrackerState::Idle);

    let neutral = neutral_sample();
    let source = ScriptedSource::new(
        vec![Some(neutral.to_indexed())],
        Tail::Repeat(neutral.to_indexed()),
    );
    tracker.start(Box::new(source), addr).unwrap();
    tracker.stop();
    tracker.stop();
    assert_eq!(tracker.state(), TrackerState::Stopped);
}

#[test]
fn test_start_fails_when_source_ends_first() {
    let (_socket, addr) = receiver();

    let mut tracker = Tracker::new(fast_config());
    let source = ScriptedSource::new(vec![None, None], Tail::Exhaust);
    match tracker.start(Box::new(source), addr) {
        Err(Error::SourceExhausted) => {}
        other => panic!("expected SourceExhausted, got {other:?}"),
    }
    assert_eq!(tracker.state(), TrackerState::Idle);
}

#[test]
fn test_start_fails_when_no_face_appears() {
    let (_socket, addr) = receiver();

    let config = TrackerConfig {
        acquisition_timeout_secs: 0.2,
        ..fast_config()
    };
    let mut tracker = Tracker::new(config);
    let source = ScriptedSource::new(Vec::new(), Tail::NoFace);

    let started = Instant::now();
    match tracker.start(Box::new(source), addr) {
        Err(Error::NoFaceDetected) => {}
        other => panic!("expected NoFaceDetected, got {other:?}"),
    }
    assert!(started.elapsed() >= Duration::from_millis(200));
    assert_eq!(tracker.state(), TrackerState::Idle);
}

#[test]
fn test_start_twice_is_rejected() {
    let (_socket, addr) = receiver();

    let neutral = neutral_sample();
    let mut tracker = Tracker::new(fast_config());
    let source = ScriptedSource::new(
        vec![Some(neutral.to_indexed())],
        Tail::Repeat(neutral.to_indexed()),
    );
    tracker.start(Box::new(source), addr).unwrap();

    let second = ScriptedSource::new(Vec::new(), Tail::NoFace);
    assert!(matches!(
        tracker.start(Box::new(second), addr),
        Err(Error::InvalidInput(_))
    ));
    tracker.stop();
}

#[test]
fn test_center_rezeros_a_displaced_pose() {
    let (socket, addr) = receiver();

    let neutral = neutral_sample();
    let mut shifted = neutral;
    shifted.left.x += 0.1;
    shifted.right.x += 0.1;

    let source = ScriptedSource::new(
        vec![Some(neutral.to_indexed())],
        Tail::Repeat(shifted.to_indexed()),
    );
    let mut tracker = Tracker::new(fast_config());
    tracker.start(Box::new(source), addr).unwrap();

    // Let the filters settle on the shifted face
    std::thread::sleep(Duration::from_millis(400));
    let displaced = tracker.latest_pose().unwrap();
    assert!(displaced.x < -2.0, "got x = {}", displaced.x);

    tracker.center();
    let recentered = tracker.latest_pose().unwrap();
    assert!(recentered.x.abs() < 0.1, "got x = {}", recentered.x);
    assert!(recentered.yaw.abs() < 0.1, "got yaw = {}", recentered.yaw);

    // With unchanged landmarks, subsequent ticks stay near zero
    std::thread::sleep(Duration::from_millis(100));
    let settled = tracker.latest_pose().unwrap();
    assert!(settled.x.abs() < 0.1, "got x = {}", settled.x);
    tracker.stop();

    // Keep the receiver alive for the whole run
    drop(socket);
}
