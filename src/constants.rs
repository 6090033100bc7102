/// Fixed names shared across the codebase: route direction keys, day-name
/// tables and output file names.

// Direction keys used by static schedule files
pub const TAHITI_TO_MOOREA: &str = "TahitiVersMoorea";
pub const MOOREA_TO_TAHITI: &str = "MooreaVersTahiti";

// Output artifacts
pub const UNIFIED_SCHEDULE_FILE: &str = "horaires.json";
pub const SCHEDULE_PAGE_FILE: &str = "index.html";
pub const DATA_DIR: &str = "data";

/// Day names used by static schedule files, Monday first.
pub const DAY_NAMES: [&str; 7] = [
    "Lundi",
    "Mardi",
    "Mercredi",
    "Jeudi",
    "Vendredi",
    "Samedi",
    "Dimanche",
];

/// Lowercase day names for rendered dates, Monday first.
pub const DAY_NAMES_DISPLAY: [&str; 7] = [
    "lundi", "mardi", "mercredi", "jeudi", "vendredi", "samedi", "dimanche",
];

/// Month names for rendered dates, January first.
pub const MONTH_NAMES: [&str; 12] = [
    "janvier",
    "février",
    "mars",
    "avril",
    "mai",
    "juin",
    "juillet",
    "août",
    "septembre",
    "octobre",
    "novembre",
    "décembre",
];

/// Resolve a schedule-file day name to its Monday=0 index.
pub fn day_index(name: &str) -> Option<u8> {
    DAY_NAMES.iter().position(|d| *d == name).map(|i| i as u8)
}
