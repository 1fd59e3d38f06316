use super::AudioError;
use super::TransportState;
use super::rodio_backend::drain_error;
use super::sink::open_decoder;
use std::time::Duration;

#[test]
fn open_decoder_reports_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.mp3");
    let err = open_decoder(&path).err().unwrap();
    assert!(matches!(err, AudioError::FileOpen { .. }));
    assert!(err.to_string().contains("missing.mp3"));
}

#[test]
fn open_decoder_rejects_garbage() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("noise.mp3");
    std::fs::write(&path, b"definitely not audio").unwrap();
    let err = open_decoder(&path).err().unwrap();
    assert!(matches!(err, AudioError::Decode { .. }));
}

#[test]
fn transport_defaults_to_stopped() {
    assert_eq!(TransportState::default(), TransportState::Stopped);
}

#[test]
fn early_drain_is_reported_as_an_error() {
    let tol = Duration::from_millis(500);
    let total = Duration::from_secs(180);

    let err = drain_error(Duration::from_secs(42), total, tol).unwrap();
    assert!(err.contains("42s"));
    assert!(err.contains("180s"));

    assert_eq!(drain_error(total, total, tol), None);
    assert_eq!(drain_error(total - Duration::from_millis(300), total, tol), None);
    // Unknown length: nothing to compare against.
    assert_eq!(drain_error(Duration::from_secs(3), Duration::ZERO, tol), None);
}
