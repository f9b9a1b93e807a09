
use std::sync::Arc;

use chrono::Duration;
use fixtures::{
    appointment, at, coordinator, range, FailingCalendar, ScriptedCalendar, StallingCalendar,
    YieldingCalendar, CALENDAR,
};
use slotbook_common::{BusyPeriod, HttpStatusCode, ProviderError, SlotbookError};
use slotbook_engine::{InMemoryCalendar, ProviderOperation, SchedulingError};

#[tokio::test]
async fn test_books_free_slot() {
    let calendar = Arc::new(InMemoryCalendar::new());
    let booking = coordinator(calendar.clone());

    let confirmation = booking
        .book(CALENDAR, appointment(at(10, 0), 45))
        .await
        .unwrap();

    assert_eq!(confirmation.start, at(10, 0));
    assert_eq!(confirmation.end, at(10, 45));
    assert!(confirmation.provider_id.starts_with("mem-"));
    assert_eq!(
        confirmation.display_link.as_deref(),
        Some(format!("memory://{}/{}", CALENDAR, confirmation.provider_id).as_str())
    );

    let events = calendar.events(CALENDAR);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].range, range(10, 0, 10, 45));
    assert_eq!(events[0].summary, "Haircut: Ada Lovelace");
}

#[tokio::test]
async fn test_event_text_carries_requester_details() {
    let calendar = Arc::new(InMemoryCalendar::new());
    let booking = coordinator(calendar.clone());

    let mut request = appointment(at(14, 0), 30);
    request.notes = Some("  Please use the side entrance ".to_string());
    booking.book(CALENDAR, request).await.unwrap();

    let events = calendar.events(CALENDAR);
    assert_eq!(
        events[0].description,
        "Name: Ada Lovelace\nPhone: +41 79 555 01 02\nService: Haircut\nNotes: Please use the side entrance"
    );
}

#[test]
fn test_blank_notes_are_left_out() {
    let mut request = appointment(at(14, 0), 30);
    request.notes = Some("   ".to_string());
    assert_eq!(
        request.description(),
        "Name: Ada Lovelace\nPhone: +41 79 555 01 02\nService: Haircut"
    );
}

#[tokio::test]
async fn test_second_booking_of_same_slot_is_rejected() {
    let calendar = Arc::new(InMemoryCalendar::new());
    let booking = coordinator(calendar.clone());

    booking
        .book(CALENDAR, appointment(at(10, 0), 30))
        .await
        .unwrap();
    let err = booking
        .book(CALENDAR, appointment(at(10, 15), 30))
        .await
        .unwrap_err();

    assert!(err.is_conflict());
    assert!(matches!(err, SchedulingError::SlotConflict { start } if start == at(10, 15)));
    assert_eq!(calendar.events(CALENDAR).len(), 1);
}

#[tokio::test]
async fn test_adjacent_bookings_both_succeed() {
    let calendar = Arc::new(InMemoryCalendar::new());
    let booking = coordinator(calendar.clone());

    booking
        .book(CALENDAR, appointment(at(10, 0), 30))
        .await
        .unwrap();
    booking
        .book(CALENDAR, appointment(at(10, 30), 30))
        .await
        .unwrap();

    assert_eq!(calendar.events(CALENDAR).len(), 2);
}

#[tokio::test]
async fn test_concurrent_bookings_for_one_slot_confirm_exactly_once() {
    let calendar = Arc::new(YieldingCalendar::default());
    let booking = coordinator(calendar.clone());

    let mut second = appointment(at(10, 0), 30);
    second.requester_name = "Grace Hopper".to_string();

    // Both verify against an empty calendar before either writes
    let (first, second) = tokio::join!(
        booking.book(CALENDAR, appointment(at(10, 0), 30)),
        booking.book(CALENDAR, second),
    );

    let outcomes = [first, second];
    let confirmed = outcomes.iter().filter(|r| r.is_ok()).count();
    let conflicts = outcomes
        .iter()
        .filter(|r| matches!(r, Err(SchedulingError::SlotConflict { .. })))
        .count();
    assert_eq!(confirmed, 1);
    assert_eq!(conflicts, 1);
    assert_eq!(calendar.inner.events(CALENDAR).len(), 1);
}

#[tokio::test]
async fn test_provider_conflict_on_write_is_slot_conflict() {
    let calendar = Arc::new(ScriptedCalendar::rejecting_writes(ProviderError::Conflict));
    let booking = coordinator(calendar.clone());

    let err = booking
        .book(CALENDAR, appointment(at(10, 0), 30))
        .await
        .unwrap_err();

    assert!(matches!(err, SchedulingError::SlotConflict { start } if start == at(10, 0)));
    assert_eq!(calendar.write_count(), 1);

    let http: SlotbookError = err.into();
    assert_eq!(http.status_code(), 409);
}

#[tokio::test]
async fn test_other_write_failures_are_provider_errors() {
    let calendar = Arc::new(ScriptedCalendar::rejecting_writes(ProviderError::Unauthorized(
        "token expired".to_string(),
    )));
    let booking = coordinator(calendar);

    let err = booking
        .book(CALENDAR, appointment(at(10, 0), 30))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        SchedulingError::Provider {
            operation: ProviderOperation::WriteAppointment,
            source: ProviderError::Unauthorized(_),
            ..
        }
    ));
}

#[tokio::test]
async fn test_busy_slot_is_rejected_without_writing() {
    let calendar = Arc::new(ScriptedCalendar::with_busy(vec![BusyPeriod::from_instants(
        at(9, 0),
        at(11, 0),
    )]));
    let booking = coordinator(calendar.clone());

    let err = booking
        .book(CALENDAR, appointment(at(10, 0), 30))
        .await
        .unwrap_err();

    assert!(err.is_conflict());
    assert_eq!(calendar.write_count(), 0);
}

#[tokio::test]
async fn test_verify_failure_stops_before_write() {
    let booking = coordinator(Arc::new(FailingCalendar {
        error: ProviderError::Timeout(15),
    }));

    let err = booking
        .book(CALENDAR, appointment(at(10, 0), 30))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        SchedulingError::Provider {
            operation: ProviderOperation::QueryBusy,
            ..
        }
    ));
}

#[tokio::test]
async fn test_invalid_requests_never_reach_provider() {
    let calendar = Arc::new(ScriptedCalendar::free());
    let booking = coordinator(calendar.clone());

    let mut nameless = appointment(at(10, 0), 30);
    nameless.requester_name = "  ".to_string();
    let mut no_phone = appointment(at(10, 0), 30);
    no_phone.requester_phone = String::new();
    let mut no_service = appointment(at(10, 0), 30);
    no_service.service = "\t".to_string();
    let mut no_duration = appointment(at(10, 0), 30);
    no_duration.duration = Duration::zero();

    for request in [nameless, no_phone, no_service, no_duration] {
        let err = booking.book(CALENDAR, request).await.unwrap_err();
        assert!(matches!(err, SchedulingError::InvalidArgument(_)), "{err:?}");
    }
    assert_eq!(calendar.query_count(), 0);
    assert_eq!(calendar.write_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_cancelled_booking_never_writes() {
    let calendar = Arc::new(StallingCalendar::default());
    let booking = coordinator(calendar.clone());

    let outcome = tokio::time::timeout(
        std::time::Duration::from_secs(5),
        booking.book(CALENDAR, appointment(at(10, 0), 30)),
    )
    .await;

    assert!(outcome.is_err(), "stalled booking should time out");
    assert_eq!(calendar.writes.load(std::sync::atomic::Ordering::SeqCst), 0);
}
