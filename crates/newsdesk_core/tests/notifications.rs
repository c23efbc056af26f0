use std::time::{Duration, Instant};

use newsdesk_core::{NotificationKind, NotificationQueue, NOTIFICATION_TTL};

#[test]
fn notifications_keep_creation_order_and_allow_duplicates() {
    let now = Instant::now();
    let mut queue = NotificationQueue::default();
    let first = queue.push("Saved", NotificationKind::Success, now);
    let second = queue.push("Saved", NotificationKind::Success, now);
    let third = queue.push("Oops", NotificationKind::Error, now);

    assert!(first < second && second < third);
    let messages: Vec<_> = queue.iter().map(|n| n.message.as_str()).collect();
    assert_eq!(messages, vec!["Saved", "Saved", "Oops"]);
}

#[test]
fn dismiss_is_idempotent() {
    let now = Instant::now();
    let mut queue = NotificationQueue::default();
    let id = queue.push("Hello", NotificationKind::Info, now);

    assert!(queue.dismiss(id));
    assert!(!queue.dismiss(id));
    assert!(!queue.dismiss(9_999));
    assert!(queue.is_empty());
}

#[test]
fn notifications_expire_three_seconds_after_creation() {
    let start = Instant::now();
    let mut queue = NotificationQueue::default();
    queue.push("early", NotificationKind::Info, start);
    queue.push("late", NotificationKind::Info, start + Duration::from_secs(2));

    assert_eq!(queue.expire(start + Duration::from_millis(2_999)), 0);
    assert_eq!(queue.expire(start + NOTIFICATION_TTL), 1);
    let left: Vec<_> = queue.iter().map(|n| n.message.clone()).collect();
    assert_eq!(left, vec!["late".to_string()]);

    assert_eq!(queue.expire(start + Duration::from_secs(5)), 1);
    assert_eq!(queue.len(), 0);
}

#[test]
fn expiring_after_dismiss_does_not_fail() {
    let start = Instant::now();
    let mut queue = NotificationQueue::default();
    let id = queue.push("gone", NotificationKind::Info, start);
    queue.dismiss(id);

    assert_eq!(queue.expire(start + Duration::from_secs(10)), 0);
}
