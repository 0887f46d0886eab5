use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime, PrimitiveDateTime, Time};

/// Render an ISO-8601 timestamp as `"Month DD, YYYY HH:MM AM/PM"`.
///
/// Anything that does not parse is returned unchanged.
pub fn format_timestamp(raw: &str) -> String {
    parse_timestamp(raw)
        .and_then(|dt| {
            dt.format(format_description!(
                "[month repr:long] [day], [year] [hour repr:12]:[minute] [period]"
            ))
            .ok()
        })
        .unwrap_or_else(|| raw.to_string())
}

/// Parse into the wall-clock time of the timestamp's own offset.
fn parse_timestamp(raw: &str) -> Option<PrimitiveDateTime> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let normalized = match trimmed.strip_suffix('Z') {
        Some(rest) => format!("{rest}+00:00"),
        None => trimmed.to_string(),
    };

    if let Ok(dt) = OffsetDateTime::parse(&normalized, &Rfc3339) {
        return Some(PrimitiveDateTime::new(dt.date(), dt.time()));
    }
    // Offsets without seconds, or written as +HHMM.
    for description in [
        format_description!(
            "[year]-[month]-[day]T[hour]:[minute][optional [:[second]]][optional [.[subsecond]]][offset_hour sign:mandatory]:[offset_minute]"
        ),
        format_description!(
            "[year]-[month]-[day]T[hour]:[minute][optional [:[second]]][optional [.[subsecond]]][offset_hour sign:mandatory][offset_minute]"
        ),
    ] {
        if let Ok(dt) = OffsetDateTime::parse(&normalized, description) {
            return Some(PrimitiveDateTime::new(dt.date(), dt.time()));
        }
    }
    if let Ok(dt) = PrimitiveDateTime::parse(
        trimmed,
        format_description!("[year]-[month]-[day]T[hour]:[minute][optional [:[second]]][optional [.[subsecond]]]"),
    ) {
        return Some(dt);
    }
    if let Ok(dt) = PrimitiveDateTime::parse(
        trimmed,
        format_description!("[year]-[month]-[day] [hour]:[minute][optional [:[second]]][optional [.[subsecond]]]"),
    ) {
        return Some(dt);
    }
    Date::parse(trimmed, format_description!("[year]-[month]-[day]"))
        .ok()
        .map(|date| PrimitiveDateTime::new(date, Time::MIDNIGHT))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_utc_suffix() {
        assert_eq!(format_timestamp("2025-03-01T14:05:00Z"), "March 01, 2025 02:05 PM");
    }

    #[test]
    fn keeps_the_offset_wall_clock() {
        assert_eq!(
            format_timestamp("2025-01-15T09:30:00+05:30"),
            "January 15, 2025 09:30 AM"
        );
    }

    #[test]
    fn formats_naive_timestamps_with_fraction() {
        assert_eq!(
            format_timestamp("2025-04-01T00:15:42.123456"),
            "April 01, 2025 12:15 AM"
        );
        assert_eq!(format_timestamp("2025-04-01 18:00:00"), "April 01, 2025 06:00 PM");
    }

    #[test]
    fn formats_short_and_compact_offsets() {
        assert_eq!(format_timestamp("2025-03-01T14:05Z"), "March 01, 2025 02:05 PM");
        assert_eq!(format_timestamp("2025-03-01T14:05+00:00"), "March 01, 2025 02:05 PM");
        assert_eq!(
            format_timestamp("2025-03-01T14:05:00+0530"),
            "March 01, 2025 02:05 PM"
        );
    }

    #[test]
    fn bare_dates_are_midnight() {
        assert_eq!(format_timestamp("2025-02-15"), "February 15, 2025 12:00 AM");
    }

    #[test]
    fn unparseable_input_is_returned_as_is() {
        assert_eq!(format_timestamp("yesterday-ish"), "yesterday-ish");
        assert_eq!(format_timestamp(""), "");
    }
}
