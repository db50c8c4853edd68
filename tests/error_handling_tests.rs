//! Error handling tests across modules


use std::net::UdpSocket;
use std::time::Duration;

use head_tracker::config::Config;
use head_tracker::landmarks::LandmarkSample;
use head_tracker::tracker::{Tracker, TrackerConfig, TrackerState};
use head_tracker::Error;
use nalgebra::Point3;

use test_helpers::{neutral_sample, ScriptedSource, Tail};

#[test]
fn test_short_landmark_list_is_insufficient() {
    let landmarks = vec![Point3::origin(); 100];
    match LandmarkSample::from_indexed(&landmarks) {
        Err(Error::InsufficientLandmarks { required, got }) => {
            assert_eq!(required, 455);
            assert_eq!(got, 100);
        }
        other => panic!("expected InsufficientLandmarks, got {other:?}"),
    }
}

#[test]
fn test_short_landmark_frames_are_skipped_not_fatal() {
    let socket = UdpSocket::bind("127.0.0.1:0").unwrap();
    socket
        .set_read_timeout(Some(Duration::from_millis(300)))
        .unwrap();
    let addr = socket.local_addr().unwrap();

    let neutral = neutral_sample();
    let short_frame = vec![Point3::origin(); 4];
    let source = ScriptedSource::new(
        vec![
            // a malformed frame during acquisition is skipped, not fatal
            Some(short_frame.clone()),
            Some(neutral.to_indexed()),
            // malformed frames mid-loop behave like "no face" ticks
            Some(short_frame.clone()),
            Some(short_frame),
            Some(neutral.to_indexed()),
        ],
        Tail::Exhaust,
    );

    let mut tracker = Tracker::new(TrackerConfig {
        fps: 250.0,
        ..TrackerConfig::default()
    });
    tracker.start(Box::new(source), addr).unwrap();

    // exactly one datagram, from the single well-formed loop frame
    let mut buf = [0u8; 64];
    let (len, _) = socket.recv_from(&mut buf).unwrap();
    assert_eq!(len, 48);
    assert!(socket.recv_from(&mut buf).is_err());
    tracker.stop();
    assert_eq!(tracker.state(), TrackerState::Stopped);
}

#[test]
fn test_error_messages_name_the_problem() {
    let err = Error::InsufficientLandmarks {
        required: 455,
        got: 12,
    };
    assert!(err.to_string().contains("455"));
    assert!(err.to_string().contains("12"));

    let err = Error::InvalidTimestamp {
        prev: 2.0,
        next: 1.5,
    };
    assert!(err.to_string().contains("2"));
    assert!(err.to_string().contains("1.5"));

    let err = Error::MalformedPacket {
        expected: 48,
        got: 20,
    };
    assert!(err.to_string().contains("48"));
}

#[test]
fn test_config_errors_are_reported_as_config() {
    let mut config = Config::default();
    config.tracking.fps = f64::NAN;
    match config.validate() {
        Err(Error::Config(msg)) => assert!(msg.contains("fps")),
        other => panic!("expected Config error, got {other:?}"),
    }

    let mut config = Config::default();
    config.filter.d_cutoff = 0.0;
    assert!(matches!(config.validate(), Err(Error::Config(_))));
}
