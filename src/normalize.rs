use crate::config::CompanyConfig;
use crate::constants::{self, MOOREA_TO_TAHITI, TAHITI_TO_MOOREA};
use crate::types::{Departure, Port, RawWeekData, Status};
use crate::vessel::parse_vessel_name;
use crate::week::{monday_of_iso_week, time_to_seconds};
use chrono::{Duration, NaiveTime};
use serde_json::{json, Map, Value};
use tracing::debug;

/// Convert a static weekly table into the nested per-destination shape used
/// by remote sources, so both kinds of data flow through one normalizer.
///
/// The table maps each direction key to `{dayName: ["HH:MM", ...]}`. Unknown
/// day names and malformed time strings are skipped.
pub fn static_table_to_week_data(company: &CompanyConfig, table: &Value) -> RawWeekData {
    let directions = [
        (TAHITI_TO_MOOREA, Port::Papeete, Port::Moorea),
        (MOOREA_TO_TAHITI, Port::Moorea, Port::Papeete),
    ];

    let mut out = Map::new();
    for (direction_key, origin, destination) in directions {
        let Some(day_table) = table.get(direction_key).and_then(Value::as_object) else {
            continue;
        };

        let mut days: Vec<Map<String, Value>> = vec![Map::new(); 7];
        for (day_name, times) in day_table {
            let Some(day) = constants::day_index(day_name) else {
                debug!("Skipping unknown day name '{}'", day_name);
                continue;
            };
            let Some(times) = times.as_array() else {
                continue;
            };

            for (idx, time) in times.iter().enumerate() {
                let Some(seconds) = time.as_str().and_then(time_to_seconds) else {
                    debug!("Skipping malformed time entry for {}", day_name);
                    continue;
                };
                days[day as usize].insert(
                    format!("schedule_{idx}"),
                    json!({
                        "day": day,
                        "timeBegin": seconds,
                        "origin": origin.code(),
                        "destination": destination.code(),
                        "vessel": company.name,
                        "vessel_name": company.vessel_display_name(),
                        "status": "active",
                    }),
                );
            }
        }

        out.insert(
            destination.code().to_string(),
            Value::Array(days.into_iter().map(Value::Object).collect()),
        );
    }

    Value::Object(out)
}

/// Backfill `vessel_name` and `vessel` on every entry of a fetched week.
///
/// `vessel_name` is derived by parsing the raw `vessel` label when present,
/// falling back to the company's display name; `vessel` falls back to the
/// company name.
pub fn backfill_vessel_names(company: &CompanyConfig, data: &mut RawWeekData) {
    for port in Port::ALL {
        let Some(days) = data.get_mut(port.code()).and_then(Value::as_array_mut) else {
            continue;
        };
        for day_data in days {
            let Some(entries) = day_data.as_object_mut() else {
                continue;
            };
            for entry in entries.values_mut() {
                let Some(entry) = entry.as_object_mut() else {
                    continue;
                };
                if !entry.contains_key("vessel_name") {
                    let name = match entry.get("vessel").and_then(Value::as_str) {
                        Some(raw) => parse_vessel_name(raw),
                        None => company.vessel_display_name().to_string(),
                    };
                    entry.insert("vessel_name".to_string(), Value::String(name));
                }
                if !entry.contains_key("vessel") {
                    entry.insert("vessel".to_string(), Value::String(company.name.clone()));
                }
            }
        }
    }
}

/// Flatten one week of nested data into canonical departures.
///
/// Malformed entries (wrong JSON type, missing day, unknown port code,
/// out-of-range time) are skipped; partial data from one company never aborts
/// the run.
pub fn normalize_week(
    company: &CompanyConfig,
    data: &RawWeekData,
    week: u32,
    year: i32,
) -> Vec<Departure> {
    let Some(monday) = monday_of_iso_week(week, year) else {
        debug!("Week {} of {} does not exist, no departures", week, year);
        return Vec::new();
    };

    let mut departures = Vec::new();
    for port in Port::ALL {
        let Some(days) = data.get(port.code()).and_then(Value::as_array) else {
            continue;
        };
        for day_data in days {
            let Some(entries) = day_data.as_object() else {
                continue;
            };
            for entry in entries.values() {
                let Some(entry) = entry.as_object() else {
                    continue;
                };
                let Some(day) = entry.get("day").and_then(Value::as_u64) else {
                    continue;
                };
                if day > 6 {
                    continue;
                }
                let time_begin = entry.get("timeBegin").and_then(Value::as_u64).unwrap_or(0);
                if time_begin >= 86400 {
                    continue;
                }
                let time_begin = time_begin as u32;
                let Some(time) = NaiveTime::from_num_seconds_from_midnight_opt(time_begin, 0)
                else {
                    continue;
                };
                let Some(origin) = entry
                    .get("origin")
                    .and_then(Value::as_str)
                    .and_then(Port::from_code)
                else {
                    continue;
                };
                let Some(destination) = entry
                    .get("destination")
                    .and_then(Value::as_str)
                    .and_then(Port::from_code)
                else {
                    continue;
                };

                let vessel_raw = entry
                    .get("vessel")
                    .or_else(|| entry.get("vessel_name"))
                    .and_then(Value::as_str)
                    .unwrap_or(company.vessel_display_name())
                    .to_string();
                let vessel_name = match entry.get("vessel_name").and_then(Value::as_str) {
                    Some(name) => name.to_string(),
                    None => parse_vessel_name(&vessel_raw),
                };
                let status =
                    Status::from_label(entry.get("status").and_then(Value::as_str));

                let date = monday + Duration::days(day as i64);
                departures.push(Departure {
                    vessel_name,
                    vessel_raw,
                    company: company.name.clone(),
                    origin,
                    destination,
                    day: day as u8,
                    time_begin,
                    status,
                    timestamp: date.and_time(time),
                });
            }
        }
    }

    departures
}

/// Merge departures from all companies and weeks into one list sorted
/// ascending by timestamp. The sort is stable: ties keep input order, and no
/// deduplication happens.
pub fn merge_departures(mut departures: Vec<Departure>) -> Vec<Departure> {
    departures.sort_by_key(|d| d.timestamp);
    departures
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    fn static_company() -> CompanyConfig {
        CompanyConfig {
            id: "vaearai".to_string(),
            name: "Vaeara'i".to_string(),
            vessel_name: None,
            static_schedule: true,
            schedule_file: Some("schedules.json".to_string()),
            firebase: None,
        }
    }

    #[test]
    fn static_monday_times_become_canonical_records() {
        let company = static_company();
        let table = json!({
            "TahitiVersMoorea": {"Lundi": ["06:00", "08:00"]}
        });

        let data = static_table_to_week_data(&company, &table);
        let departures = normalize_week(&company, &data, 48, 2024);

        assert_eq!(departures.len(), 2);
        for d in &departures {
            assert_eq!(d.day, 0);
            assert_eq!(d.origin, Port::Papeete);
            assert_eq!(d.destination, Port::Moorea);
            assert_eq!(d.status, Status::Active);
            assert_eq!(d.company, "Vaeara'i");
        }
        let mut seconds: Vec<u32> = departures.iter().map(|d| d.time_begin).collect();
        seconds.sort_unstable();
        assert_eq!(seconds, vec![21600, 28800]);
    }

    #[test]
    fn static_day_index_follows_fixed_ordering() {
        let company = static_company();
        let table = json!({
            "MooreaVersTahiti": {"Dimanche": ["16:30"]}
        });

        let data = static_table_to_week_data(&company, &table);
        let departures = normalize_week(&company, &data, 10, 2025);

        assert_eq!(departures.len(), 1);
        assert_eq!(departures[0].day, 6);
        assert_eq!(departures[0].origin, Port::Moorea);
        assert_eq!(departures[0].destination, Port::Papeete);
        assert_eq!(departures[0].time_begin, 16 * 3600 + 30 * 60);
    }

    #[test]
    fn unknown_day_names_and_bad_times_are_skipped() {
        let company = static_company();
        let table = json!({
            "TahitiVersMoorea": {
                "Monday": ["06:00"],
                "Lundi": ["not a time", "07:15"]
            }
        });

        let data = static_table_to_week_data(&company, &table);
        let departures = normalize_week(&company, &data, 48, 2024);

        assert_eq!(departures.len(), 1);
        assert_eq!(departures[0].time_begin, 7 * 3600 + 15 * 60);
    }

    #[test]
    fn malformed_nested_entries_are_skipped() {
        let company = static_company();
        let data = json!({
            "MOZ": [
                {
                    "schedule_0": {
                        "day": 0,
                        "timeBegin": 21600,
                        "origin": "PPT",
                        "destination": "MOZ"
                    },
                    "schedule_1": {"timeBegin": 28800, "origin": "PPT", "destination": "MOZ"},
                    "schedule_2": "not an object",
                    "schedule_3": {"day": 9, "origin": "PPT", "destination": "MOZ"},
                    "schedule_4": {"day": 1, "origin": "XXX", "destination": "MOZ"}
                },
                "not a day map"
            ],
            "PPT": "not an array"
        });

        let departures = normalize_week(&company, &data, 48, 2024);
        assert_eq!(departures.len(), 1);
        assert_eq!(departures[0].time_begin, 21600);
    }

    #[test]
    fn vessel_name_backfill_prefers_parsed_vessel_label() {
        let company = static_company();
        let mut data = json!({
            "MOZ": [
                {
                    "schedule_0": {
                        "day": 0,
                        "timeBegin": 21600,
                        "origin": "PPT",
                        "destination": "MOZ",
                        "vessel": "Aremiti 5-26v"
                    },
                    "schedule_1": {
                        "day": 0,
                        "timeBegin": 28800,
                        "origin": "PPT",
                        "destination": "MOZ"
                    }
                }
            ]
        });

        backfill_vessel_names(&company, &mut data);
        let departures = normalize_week(&company, &data, 48, 2024);

        assert_eq!(departures.len(), 2);
        let by_time = |t: u32| departures.iter().find(|d| d.time_begin == t).unwrap();
        assert_eq!(by_time(21600).vessel_name, "Aremiti 5");
        assert_eq!(by_time(21600).vessel_raw, "Aremiti 5-26v");
        assert_eq!(by_time(28800).vessel_name, "Vaeara'i");
        assert_eq!(by_time(28800).vessel_raw, "Vaeara'i");
    }

    #[test]
    fn time_of_day_round_trips_through_timestamp() {
        let company = static_company();
        let table = json!({
            "TahitiVersMoorea": {"Mercredi": ["09:45"]}
        });

        let data = static_table_to_week_data(&company, &table);
        let departures = normalize_week(&company, &data, 48, 2024);

        assert_eq!(departures.len(), 1);
        let d = &departures[0];
        assert_eq!(d.timestamp.num_seconds_from_midnight(), d.time_begin);
    }

    #[test]
    fn merge_sorts_by_timestamp_and_is_idempotent() {
        let company = static_company();
        let table = json!({
            "TahitiVersMoorea": {"Lundi": ["08:00"], "Mardi": ["06:00"]},
            "MooreaVersTahiti": {"Lundi": ["06:00"]}
        });

        let data = static_table_to_week_data(&company, &table);
        let mut all = normalize_week(&company, &data, 48, 2024);
        all.extend(normalize_week(&company, &data, 49, 2024));

        let merged = merge_departures(all);
        assert!(merged.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));

        let again = merge_departures(merged.clone());
        let stamps: Vec<_> = merged.iter().map(|d| d.timestamp).collect();
        let stamps_again: Vec<_> = again.iter().map(|d| d.timestamp).collect();
        assert_eq!(stamps, stamps_again);
    }

    #[test]
    fn merge_keeps_duplicate_departures_and_input_order() {
        let company = static_company();
        let data = json!({
            "MOZ": [
                {
                    "schedule_0": {
                        "day": 0, "timeBegin": 21600,
                        "origin": "PPT", "destination": "MOZ",
                        "vessel_name": "First"
                    },
                    "schedule_1": {
                        "day": 0, "timeBegin": 21600,
                        "origin": "PPT", "destination": "MOZ",
                        "vessel_name": "Second"
                    }
                }
            ]
        });

        let merged = merge_departures(normalize_week(&company, &data, 48, 2024));
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].vessel_name, "First");
        assert_eq!(merged[1].vessel_name, "Second");
    }
}
