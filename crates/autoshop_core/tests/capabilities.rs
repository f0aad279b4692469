use autoshop_core::{
    Clock, EmailSender, ManualClock, Notifier, RecordingEmailSender, RecordingNotifier,
};
use chrono::{NaiveDate, NaiveDateTime};
use std::sync::Arc;
use std::time::Duration;

fn fixed_time() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 10, 2)
        .unwrap()
        .and_hms_opt(14, 0, 0)
        .unwrap()
}

#[test]
fn recording_email_log_is_ordered_and_clock_stamped() {
    let clock = Arc::new(ManualClock::new(fixed_time()));
    let email = RecordingEmailSender::new(clock.clone() as Arc<dyn Clock>);

    email.send("a@test.com", "first", "body a").unwrap();
    clock.advance(Duration::from_secs(3600));
    email.send("b@test.com", "second", "body b").unwrap();

    let sent = email.sent();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0].to, "a@test.com");
    assert_eq!(sent[0].sent_at, fixed_time());
    assert_eq!(sent[1].to, "b@test.com");
    assert_eq!(sent[1].sent_at, fixed_time() + chrono::Duration::hours(1));

    assert!(email.was_sent_to("a@test.com"));
    assert!(!email.was_sent_to("c@test.com"));
}

#[test]
fn identical_sends_are_each_recorded() {
    let clock = Arc::new(ManualClock::new(fixed_time()));
    let email = RecordingEmailSender::new(clock as Arc<dyn Clock>);

    email.send("a@test.com", "same", "same").unwrap();
    email.send("a@test.com", "same", "same").unwrap();

    assert_eq!(email.call_count(), 2);
}

#[test]
fn recording_notifier_tracks_history_per_recipient() {
    let notifier = RecordingNotifier::new();

    notifier.notify("c1@test.com", "appointment 1 confirmed").unwrap();
    notifier.notify("c1@test.com", "appointment 2 confirmed").unwrap();
    notifier.notify("c2@test.com", "appointment 3 confirmed").unwrap();

    assert_eq!(notifier.call_count(), 3);
    assert!(notifier.was_notified("c1@test.com"));
    assert!(notifier.was_notified("c2@test.com"));
    assert!(!notifier.was_notified("c3@test.com"));

    let history = notifier.notifications_for("c1@test.com");
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].message, "appointment 1 confirmed");
    assert_eq!(history[1].message, "appointment 2 confirmed");
}

#[test]
fn manual_clock_only_moves_forward() {
    let clock = ManualClock::new(fixed_time());
    let start = clock.now();

    clock.advance(Duration::ZERO);
    assert_eq!(clock.now(), start);

    clock.advance(Duration::from_secs(2 * 24 * 3600));
    assert_eq!(clock.now(), start + chrono::Duration::days(2));
}
