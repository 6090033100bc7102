use chrono::{Datelike, Duration, IsoWeek, NaiveDate, Weekday};

/// Monday of a given ISO week, or `None` when the (week, year) pair does not
/// exist in the ISO calendar.
pub fn monday_of_iso_week(week: u32, year: i32) -> Option<NaiveDate> {
    NaiveDate::from_isoywd_opt(year, week, Weekday::Mon)
}

/// The ISO weeks to fetch on a run: the week containing `today` and the one
/// after it, each with its ISO year.
pub fn fetch_weeks(today: NaiveDate) -> [(u32, i32); 2] {
    [iso_week_pair(today.iso_week()), iso_week_pair((today + Duration::weeks(1)).iso_week())]
}

fn iso_week_pair(week: IsoWeek) -> (u32, i32) {
    (week.week(), week.year())
}

/// Parse an "HH:MM" time string into seconds since midnight.
pub fn time_to_seconds(time: &str) -> Option<u32> {
    let (hours, minutes) = time.split_once(':')?;
    let hours: u32 = hours.parse().ok()?;
    let minutes: u32 = minutes.parse().ok()?;
    if hours > 23 || minutes > 59 {
        return None;
    }
    Some(hours * 3600 + minutes * 60)
}

/// Format seconds since midnight as "HH:MM".
pub fn seconds_to_time(seconds: u32) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    format!("{hours:02}:{minutes:02}")
}
