use calendar_core::{
    Calendar, CalendarError, EventChanges, NewEvent, ReminderKind, SequentialEventIdGenerator,
    SLOTS_PER_DAY,
};
use chrono::{NaiveDate, NaiveTime};

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
}

fn hm(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
}

fn calendar() -> Calendar<SequentialEventIdGenerator> {
    Calendar::with_id_generator(SequentialEventIdGenerator::new("evt"))
}

fn held_slots(
    calendar: &Calendar<SequentialEventIdGenerator>,
    date: NaiveDate,
    id: &str,
) -> Vec<NaiveTime> {
    calendar
        .day(date)
        .map(|grid| {
            grid.slots()
                .filter(|(_, holder)| *holder == Some(id))
                .map(|(slot, _)| slot.start_time())
                .collect()
        })
        .unwrap_or_default()
}

#[test]
fn add_event_generates_id_and_reserves_range() {
    let mut calendar = calendar();
    let id = calendar
        .add_event(NewEvent::new("standup", day(1), hm(9, 0), hm(10, 0)).with_description("team"))
        .unwrap();

    assert_eq!(id, "evt-1");
    let event = calendar.get_event(&id).unwrap();
    assert_eq!(event.title, "standup");
    assert_eq!(event.description, "team");
    assert_eq!(
        held_slots(&calendar, day(1), &id),
        vec![hm(9, 0), hm(9, 15), hm(9, 30), hm(9, 45)]
    );
}

#[test]
fn available_slots_exclude_reserved_range() {
    let mut calendar = calendar();
    calendar
        .add_event(NewEvent::new("e1", day(1), hm(9, 0), hm(10, 0)))
        .unwrap();

    let free = calendar.find_available_slots(day(1));
    assert_eq!(free.len(), SLOTS_PER_DAY - 4);
    for taken in [hm(9, 0), hm(9, 15), hm(9, 30), hm(9, 45)] {
        assert!(!free.contains(&taken));
    }
    assert!(free.contains(&hm(8, 45)));
    assert!(free.contains(&hm(10, 0)));
}

#[test]
fn overlapping_add_fails_and_leaves_first_event_intact() {
    let mut calendar = calendar();
    let e1 = calendar
        .add_event(NewEvent::new("e1", day(1), hm(9, 0), hm(10, 0)))
        .unwrap();

    let err = calendar
        .add_event(NewEvent::new("e2", day(1), hm(9, 30), hm(10, 30)))
        .unwrap_err();

    assert_eq!(
        err,
        CalendarError::SlotNotAvailable {
            slot: hm(9, 30),
            holder: e1.clone(),
        }
    );
    assert_eq!(calendar.event_count(), 1);
    assert_eq!(held_slots(&calendar, day(1), &e1).len(), 4);
    assert_eq!(calendar.find_available_slots(day(1)).len(), SLOTS_PER_DAY - 4);
}

#[test]
fn reversed_or_empty_range_is_rejected_before_anything_is_created() {
    let mut calendar = calendar();

    let err = calendar
        .add_event(NewEvent::new("backwards", day(1), hm(10, 0), hm(9, 0)))
        .unwrap_err();
    assert_eq!(
        err,
        CalendarError::InvalidRange {
            start: hm(10, 0),
            end: hm(9, 0),
        }
    );

    let err = calendar
        .add_event(NewEvent::new("odd", day(1), hm(9, 5), hm(10, 0)))
        .unwrap_err();
    assert_eq!(err, CalendarError::MisalignedTime(hm(9, 5)));

    assert_eq!(calendar.event_count(), 0);
    assert!(calendar.day(day(1)).is_none());
}

#[test]
fn update_to_new_date_moves_reservation() {
    let mut calendar = calendar();
    let e1 = calendar
        .add_event(NewEvent::new("e1", day(1), hm(9, 0), hm(10, 0)))
        .unwrap();

    let changes = EventChanges::from_event(calendar.get_event(&e1).unwrap())
        .with_date(day(2))
        .with_times(hm(14, 0), hm(15, 30));
    calendar.update_event(&e1, changes).unwrap();

    assert!(held_slots(&calendar, day(1), &e1).is_empty());
    assert_eq!(calendar.find_available_slots(day(1)).len(), SLOTS_PER_DAY);
    assert_eq!(held_slots(&calendar, day(2), &e1).len(), 6);
    let moved = calendar.get_event(&e1).unwrap();
    assert_eq!(moved.date, day(2));
    assert_eq!(moved.start_time, hm(14, 0));
}

#[test]
fn update_to_new_date_rebuilds_event_without_reminders() {
    let mut calendar = calendar();
    let e1 = calendar
        .add_event(NewEvent::new("e1", day(1), hm(9, 0), hm(10, 0)))
        .unwrap();
    calendar
        .add_reminder(&e1, day(1).and_hms_opt(8, 0, 0).unwrap(), ReminderKind::System)
        .unwrap();

    let changes = EventChanges::from_event(calendar.get_event(&e1).unwrap()).with_date(day(3));
    calendar.update_event(&e1, changes).unwrap();

    assert!(calendar.list_reminders(&e1).unwrap().is_empty());
}

#[test]
fn update_to_occupied_new_date_changes_nothing() {
    let mut calendar = calendar();
    let e1 = calendar
        .add_event(NewEvent::new("e1", day(1), hm(9, 0), hm(10, 0)))
        .unwrap();
    let e2 = calendar
        .add_event(NewEvent::new("e2", day(2), hm(9, 0), hm(10, 0)))
        .unwrap();

    let changes = EventChanges::from_event(calendar.get_event(&e1).unwrap()).with_date(day(2));
    let err = calendar.update_event(&e1, changes).unwrap_err();

    assert_eq!(
        err,
        CalendarError::SlotNotAvailable {
            slot: hm(9, 0),
            holder: e2,
        }
    );
    assert_eq!(calendar.get_event(&e1).unwrap().date, day(1));
    assert_eq!(held_slots(&calendar, day(1), &e1).len(), 4);
}

#[test]
fn same_date_update_edits_in_place_and_keeps_reminders() {
    let mut calendar = calendar();
    let e1 = calendar
        .add_event(NewEvent::new("e1", day(1), hm(9, 0), hm(10, 0)))
        .unwrap();
    calendar
        .add_reminder(&e1, day(1).and_hms_opt(8, 45, 0).unwrap(), ReminderKind::Email)
        .unwrap();

    let changes = EventChanges::from_event(calendar.get_event(&e1).unwrap())
        .with_title("e1 extended")
        .with_times(hm(9, 30), hm(11, 0));
    calendar.update_event(&e1, changes).unwrap();

    let event = calendar.get_event(&e1).unwrap();
    assert_eq!(event.title, "e1 extended");
    assert_eq!(event.end_time, hm(11, 0));
    assert_eq!(event.reminders().len(), 1);
    assert_eq!(
        held_slots(&calendar, day(1), &e1),
        vec![hm(9, 30), hm(9, 45), hm(10, 0), hm(10, 15), hm(10, 30), hm(10, 45)]
    );
}

#[test]
fn same_date_update_into_other_event_is_atomic() {
    let mut calendar = calendar();
    let e1 = calendar
        .add_event(NewEvent::new("e1", day(1), hm(9, 0), hm(10, 0)))
        .unwrap();
    let e2 = calendar
        .add_event(NewEvent::new("e2", day(1), hm(10, 0), hm(11, 0)))
        .unwrap();

    let changes = EventChanges::from_event(calendar.get_event(&e1).unwrap())
        .with_title("renamed")
        .with_times(hm(9, 0), hm(10, 30));
    let err = calendar.update_event(&e1, changes).unwrap_err();

    assert_eq!(
        err,
        CalendarError::SlotNotAvailable {
            slot: hm(10, 0),
            holder: e2.clone(),
        }
    );
    let event = calendar.get_event(&e1).unwrap();
    assert_eq!(event.title, "e1");
    assert_eq!(event.end_time, hm(10, 0));
    assert_eq!(held_slots(&calendar, day(1), &e1).len(), 4);
    assert_eq!(held_slots(&calendar, day(1), &e2).len(), 4);
}

#[test]
fn update_unknown_event_is_not_found() {
    let mut calendar = calendar();
    let changes = EventChanges {
        title: "ghost".to_string(),
        description: String::new(),
        date: day(1),
        start_time: hm(9, 0),
        end_time: hm(10, 0),
    };

    let err = calendar.update_event("missing", changes).unwrap_err();
    assert_eq!(err, CalendarError::EventNotFound("missing".to_string()));
    assert!(calendar.day(day(1)).is_none());
}

#[test]
fn delete_event_removes_event_and_clears_slots() {
    let mut calendar = calendar();
    let e1 = calendar
        .add_event(NewEvent::new("e1", day(1), hm(9, 0), hm(10, 0)))
        .unwrap();

    let removed = calendar.delete_event(&e1).unwrap();

    assert_eq!(removed.id, e1);
    assert!(calendar.get_event(&e1).is_none());
    assert_eq!(calendar.find_available_slots(day(1)).len(), SLOTS_PER_DAY);
    assert_eq!(
        calendar.delete_event(&e1).unwrap_err(),
        CalendarError::EventNotFound(e1)
    );
}

#[test]
fn emptied_day_is_kept() {
    let mut calendar = calendar();
    let e1 = calendar
        .add_event(NewEvent::new("e1", day(1), hm(9, 0), hm(10, 0)))
        .unwrap();
    calendar.delete_event(&e1).unwrap();

    let grid = calendar.day(day(1)).expect("emptied day should be kept");
    assert!(grid.is_empty());
    assert_eq!(calendar.days().count(), 1);
}

#[test]
fn freed_slots_can_be_booked_by_another_event() {
    let mut calendar = calendar();
    let e1 = calendar
        .add_event(NewEvent::new("e1", day(1), hm(9, 0), hm(10, 0)))
        .unwrap();
    calendar.delete_event(&e1).unwrap();

    let e2 = calendar
        .add_event(NewEvent::new("e2", day(1), hm(9, 30), hm(10, 30)))
        .unwrap();
    assert_eq!(held_slots(&calendar, day(1), &e2).len(), 4);
}
