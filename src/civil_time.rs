//! Epoch-to-civil-date conversion for the hot logging path.
//!
//! Rendering a timestamp must not call into the OS time-zone or locale
//! machinery on every record, so the conversion here is pure integer
//! arithmetic over a fixed UTC offset. The offset itself is sampled exactly
//! once, at `Logger::init`, and reused for the process lifetime; daylight
//! saving transitions occurring mid-run are intentionally not tracked.

/// Days per month for a non-leap year.
const MONTH_DAYS: [i64; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

fn is_leap_year(year: i64) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

/// Converts `epoch_secs` shifted by `utc_offset_secs` into a zero-padded
/// `YYYY-MM-DD HH:MM:SS` string.
///
/// The year is found by walking forward from 1970, subtracting 365 or 366
/// days per year under the Gregorian leap rule, then the month/day by
/// walking a twelve-entry month table adjusted for February. An offset that
/// would shift the instant before the epoch clamps to the epoch.
///
/// # Examples
///
/// ```
/// # use rolling_logger::civil_time::civil_datetime;
/// assert_eq!(civil_datetime(0, 0), "1970-01-01 00:00:00");
/// assert_eq!(civil_datetime(1_709_164_800, 0), "2024-02-29 00:00:00");
/// ```
pub fn civil_datetime(epoch_secs: u64, utc_offset_secs: i64) -> String {
    let mut remaining = (epoch_secs as i64 + utc_offset_secs).max(0);

    let seconds = remaining % 60;
    remaining /= 60;
    let minutes = remaining % 60;
    remaining /= 60;
    let hours = remaining % 24;
    remaining /= 24;
    let mut days = remaining;

    let mut year = 1970i64;
    while days >= 365 {
        if is_leap_year(year) {
            if days >= 366 {
                days -= 366;
                year += 1;
            } else {
                break;
            }
        } else {
            days -= 365;
            year += 1;
        }
    }

    let mut month = 12;
    let mut day = days + 1;
    for (index, &base_len) in MONTH_DAYS.iter().enumerate() {
        let len = if index == 1 && is_leap_year(year) {
            29
        } else {
            base_len
        };
        if days < len {
            month = index as i64 + 1;
            day = days + 1;
            break;
        }
        days -= len;
    }

    format!("{year:04}-{month:02}-{day:02} {hours:02}:{minutes:02}:{seconds:02}")
}

/// Samples the local-minus-UTC offset for the current instant, in seconds.
///
/// Called once per `Logger::init`; never on the per-record path.
pub fn utc_offset_seconds() -> i64 {
    chrono::Local::now().offset().local_minus_utc() as i64
}
