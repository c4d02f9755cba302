//! Tests for register width classification and diff tracking

use hexspray_core::registers::{RegisterTracker, WidthBucket};

fn pairs(list: &[(&str, &str)]) -> Vec<(String, String)>
{
    list.iter().map(|(n, v)| ((*n).to_string(), (*v).to_string())).collect()
}

#[test]
fn test_classification_by_printed_length()
{
    assert_eq!(WidthBucket::classify("0x00"), WidthBucket::B8);
    assert_eq!(WidthBucket::classify("0x0000"), WidthBucket::B16);
    assert_eq!(WidthBucket::classify("0x00000000"), WidthBucket::B32);
    assert_eq!(WidthBucket::classify("0x0000000000000000"), WidthBucket::B64);
}

#[test]
fn test_unknown_length_falls_back_to_8_bit()
{
    assert_eq!(WidthBucket::classify(""), WidthBucket::B8);
    assert_eq!(WidthBucket::classify("0x0"), WidthBucket::B8);
    assert_eq!(WidthBucket::classify("0x000000000000000000"), WidthBucket::B8);
}

#[test]
fn test_first_observation_is_unmarked()
{
    let mut tracker = RegisterTracker::new();
    let snapshot = tracker.observe(&pairs(&[("rax", "0x0000000000000001")]));
    assert_eq!(snapshot.b64.len(), 1);
    assert!(!snapshot.b64[0].changed);
}

#[test]
fn test_changed_iff_value_differs()
{
    let mut tracker = RegisterTracker::new();
    tracker.observe(&pairs(&[("rax", "0x0000000000000001"), ("rbx", "0x0000000000000002")]));
    let snapshot = tracker.observe(&pairs(&[("rax", "0x0000000000000009"), ("rbx", "0x0000000000000002")]));

    assert!(snapshot.b64[0].changed, "rax changed");
    assert!(!snapshot.b64[1].changed, "rbx did not change");
}

#[test]
fn test_baseline_overwritten_after_observation()
{
    let mut tracker = RegisterTracker::new();
    tracker.observe(&pairs(&[("rax", "0x0000000000000001")]));
    tracker.observe(&pairs(&[("rax", "0x0000000000000009")]));
    assert_eq!(tracker.baseline("rax"), Some("0x0000000000000009"));

    // A third stop at the same value shows no change.
    let snapshot = tracker.observe(&pairs(&[("rax", "0x0000000000000009")]));
    assert!(!snapshot.b64[0].changed);
}

#[test]
fn test_buckets_preserve_iteration_order_independently()
{
    let mut tracker = RegisterTracker::new();
    let snapshot = tracker.observe(&pairs(&[
        ("rax", "0x0000000000000000"),
        ("al", "0x00"),
        ("rbx", "0x0000000000000000"),
        ("bl", "0x00"),
        ("ax", "0x0000"),
    ]));

    let b64: Vec<&str> = snapshot.b64.iter().map(|c| c.name.as_str()).collect();
    let b8: Vec<&str> = snapshot.b8.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(b64, ["rax", "rbx"]);
    assert_eq!(b8, ["al", "bl"]);
    assert_eq!(snapshot.b16.len(), 1);
    assert_eq!(snapshot.b32.len(), 0);
}

#[test]
fn test_reset_clears_baseline()
{
    let mut tracker = RegisterTracker::new();
    tracker.observe(&pairs(&[("rax", "0x0000000000000001")]));
    tracker.reset();
    assert_eq!(tracker.baseline("rax"), None);

    // After a reset the next observation is a first sighting again.
    let snapshot = tracker.observe(&pairs(&[("rax", "0x0000000000000002")]));
    assert!(!snapshot.b64[0].changed);
}

#[test]
fn test_values_map_covers_all_buckets()
{
    let mut tracker = RegisterTracker::new();
    let snapshot = tracker.observe(&pairs(&[("rax", "0x0000000000000001"), ("al", "0x01")]));
    let values = snapshot.values();
    assert_eq!(values.get("rax").map(String::as_str), Some("0x0000000000000001"));
    assert_eq!(values.get("al").map(String::as_str), Some("0x01"));
}
