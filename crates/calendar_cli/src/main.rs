//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `calendar_core` linkage from a standalone executable.
//! - Walk one deterministic scheduling flow and print each outcome.
//!
//! Logging starts only when `CALENDAR_LOG_DIR` is set.

use calendar_core::logging::LogSettings;
use calendar_core::{Calendar, EventChanges, NewEvent, SequentialEventIdGenerator};
use chrono::{NaiveDate, NaiveTime};
use std::process::ExitCode;

fn main() -> ExitCode {
    let logging = LogSettings::from_env().and_then(|settings| match settings {
        Some(settings) => calendar_core::logging::start(settings),
        None => Ok(()),
    });
    if let Err(err) = logging {
        eprintln!("logging disabled: {err}");
    }

    println!("calendar_core ping={}", calendar_core::ping());
    println!("calendar_core version={}", calendar_core::core_version());

    match walkthrough() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("walkthrough failed: {err}");
            ExitCode::FAILURE
        }
    }
}

fn walkthrough() -> Result<(), Box<dyn std::error::Error>> {
    let first = NaiveDate::from_ymd_opt(2024, 1, 1).ok_or("invalid date")?;
    let second = first.succ_opt().ok_or("invalid date")?;
    let hm = |hour, minute| NaiveTime::from_hms_opt(hour, minute, 0).ok_or("invalid time");

    let mut calendar = Calendar::with_id_generator(SequentialEventIdGenerator::new("evt"));
    let e1 = calendar.add_event(NewEvent::new("standup", first, hm(9, 0)?, hm(10, 0)?))?;
    println!("added {e1}: free slots on {first} = {}", calendar.find_available_slots(first).len());

    match calendar.add_event(NewEvent::new("overlap", first, hm(9, 30)?, hm(10, 30)?)) {
        Ok(id) => println!("unexpected: overlap accepted as {id}"),
        Err(err) => println!("overlap rejected: {err}"),
    }

    let changes = EventChanges::from_event(calendar.get_event(&e1).ok_or("event vanished")?)
        .with_date(second);
    calendar.update_event(&e1, changes)?;
    println!(
        "moved {e1}: free on {first} = {}, free on {second} = {}",
        calendar.find_available_slots(first).len(),
        calendar.find_available_slots(second).len()
    );

    let removed = calendar.delete_event(&e1)?;
    println!("deleted:\n{removed}");
    println!("events left = {}", calendar.event_count());
    Ok(())
}
