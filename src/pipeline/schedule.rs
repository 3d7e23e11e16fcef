//! Weekly schedule sentences.
//!
//! Seven weekday columns collapse into one line per distinct start time:
//! `По понедельникам и средам в 18:00; По субботам в 12:00`.

use chrono::{NaiveTime, Weekday};

use crate::models::ScheduleSlot;

/// Separator between per-time groups.
pub const GROUP_SEPARATOR: &str = "; ";

/// Accepted source time formats, tried in order.
const TIME_FORMATS: [&str; 2] = ["%H:%M:%S", "%H:%M"];

/// Dative plural used after "По".
fn day_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "понедельникам",
        Weekday::Tue => "вторникам",
        Weekday::Wed => "средам",
        Weekday::Thu => "четвергам",
        Weekday::Fri => "пятницам",
        Weekday::Sat => "субботам",
        Weekday::Sun => "воскресеньям",
    }
}

fn parse_time(raw: &str) -> Option<NaiveTime> {
    let raw = raw.trim();
    TIME_FORMATS
        .iter()
        .find_map(|format| NaiveTime::parse_from_str(raw, format).ok())
}

/// Build the schedule sentence for one class.
///
/// Slots without a time or with an unparseable time are skipped. Groups keep
/// the order in which their time first appears in the input.
pub fn merge_schedule<'a, I>(slots: I) -> String
where
    I: IntoIterator<Item = ScheduleSlot<'a>>,
{
    let mut groups: Vec<(String, Vec<&'static str>)> = Vec::new();

    for slot in slots {
        let Some(time) = slot.time.and_then(parse_time) else {
            continue;
        };
        let key = time.format("%H:%M").to_string();
        let day = day_name(slot.weekday);
        match groups.iter_mut().find(|(t, _)| *t == key) {
            Some((_, days)) => days.push(day),
            None => groups.push((key, vec![day])),
        }
    }

    groups
        .iter()
        .map(|(time, days)| format!("По {} в {}", join_days(days), time))
        .collect::<Vec<_>>()
        .join(GROUP_SEPARATOR)
}

/// `a`, `a и b`, `a, b и c`.
fn join_days(days: &[&str]) -> String {
    match days.split_last() {
        Some((last, rest)) if !rest.is_empty() => format!("{} и {}", rest.join(", "), last),
        Some((last, _)) => last.to_string(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(weekday: Weekday, time: &str) -> ScheduleSlot<'_> {
        ScheduleSlot {
            weekday,
            time: Some(time),
        }
    }

    #[test]
    fn test_same_time_merges() {
        let out = merge_schedule([slot(Weekday::Mon, "18:00:00"), slot(Weekday::Wed, "18:00:00")]);
        assert_eq!(out, "По понедельникам и средам в 18:00");
    }

    #[test]
    fn test_different_times_split() {
        let out = merge_schedule([slot(Weekday::Mon, "18:00:00"), slot(Weekday::Tue, "19:00:00")]);
        assert_eq!(out, "По понедельникам в 18:00; По вторникам в 19:00");
    }

    #[test]
    fn test_three_days_use_commas() {
        let out = merge_schedule([
            slot(Weekday::Mon, "20:30:00"),
            slot(Weekday::Wed, "20:30:00"),
            slot(Weekday::Fri, "20:30:00"),
        ]);
        assert_eq!(out, "По понедельникам, средам и пятницам в 20:30");
    }

    #[test]
    fn test_group_order_follows_first_weekday() {
        let out = merge_schedule([
            slot(Weekday::Mon, "19:00:00"),
            slot(Weekday::Tue, "11:00:00"),
            slot(Weekday::Thu, "19:00:00"),
        ]);
        assert_eq!(out, "По понедельникам и четвергам в 19:00; По вторникам в 11:00");
    }

    #[test]
    fn test_empty_and_missing() {
        assert_eq!(merge_schedule(Vec::new()), "");
        let out = merge_schedule([ScheduleSlot {
            weekday: Weekday::Sat,
            time: None,
        }]);
        assert_eq!(out, "");
    }

    #[test]
    fn test_malformed_time_dropped() {
        let out = merge_schedule([
            slot(Weekday::Mon, "вечером"),
            slot(Weekday::Sun, "12:00"),
            slot(Weekday::Tue, "25:00:00"),
        ]);
        assert_eq!(out, "По воскресеньям в 12:00");
    }

    #[test]
    fn test_seconds_ignored_for_grouping() {
        let out = merge_schedule([slot(Weekday::Sat, "12:00:00"), slot(Weekday::Sun, "12:00:30")]);
        assert_eq!(out, "По субботам и воскресеньям в 12:00");
    }
}
