use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Utc};

/// First instant of the month containing `now`. Usage counters are
/// keyed on this value, so a new month starts a fresh counter.
pub fn month_start(now: DateTime<Utc>) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(now.year(), now.month(), 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

/// First instant of the month after the one containing `now`. Reported
/// to clients as the moment their monthly quota resets.
pub fn next_month_start(now: DateTime<Utc>) -> NaiveDateTime {
    let (year, month) = if now.month() == 12 {
        (now.year() + 1, 1)
    } else {
        (now.year(), now.month() + 1)
    };

    NaiveDate::from_ymd_opt(year, month, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 30, 15).unwrap()
    }

    #[test]
    fn month_start_truncates_to_first_midnight() {
        let start = month_start(at(2025, 6, 17, 13));
        assert_eq!(
            start,
            NaiveDate::from_ymd_opt(2025, 6, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap()
        );
    }

    #[test]
    fn adjacent_months_produce_distinct_keys() {
        let june = month_start(at(2025, 6, 30, 23));
        let july = month_start(at(2025, 7, 1, 0));
        assert_ne!(june, july);
    }

    #[test]
    fn next_month_rolls_over_december() {
        let reset = next_month_start(at(2025, 12, 31, 23));
        assert_eq!(
            reset,
            NaiveDate::from_ymd_opt(2026, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap()
        );
    }

    #[test]
    fn next_month_start_is_the_following_month() {
        let reset = next_month_start(at(2025, 2, 10, 8));
        assert_eq!(
            reset,
            NaiveDate::from_ymd_opt(2025, 3, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap()
        );
    }
}
