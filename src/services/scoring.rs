/// Final score as a percentage of correct answers, rounded to two decimals.
pub(crate) fn percentage(correct: i64, total: i64) -> f64 {
    if total <= 0 {
        return 0.0;
    }

    let raw = correct as f64 / total as f64 * 100.0;
    (raw * 100.0).round() / 100.0
}

pub(crate) fn remaining_seconds(
    now: time::PrimitiveDateTime,
    expires_at: time::PrimitiveDateTime,
) -> i64 {
    let delta = expires_at.assume_utc() - now.assume_utc();
    delta.whole_seconds().max(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::{Date, Month, PrimitiveDateTime, Time};

    fn at(hour: u8, minute: u8, second: u8) -> PrimitiveDateTime {
        let date = Date::from_calendar_date(2025, Month::March, 10).unwrap();
        PrimitiveDateTime::new(date, Time::from_hms(hour, minute, second).unwrap())
    }

    #[test]
    fn percentage_of_zero_questions_is_zero() {
        assert_eq!(percentage(0, 0), 0.0);
    }

    #[test]
    fn percentage_rounds_to_two_decimals() {
        assert_eq!(percentage(1, 3), 33.33);
        assert_eq!(percentage(2, 3), 66.67);
        assert_eq!(percentage(3, 3), 100.0);
    }

    #[test]
    fn remaining_seconds_clamps_at_zero() {
        assert_eq!(remaining_seconds(at(10, 0, 0), at(10, 5, 0)), 300);
        assert_eq!(remaining_seconds(at(10, 6, 0), at(10, 5, 0)), 0);
    }
}
