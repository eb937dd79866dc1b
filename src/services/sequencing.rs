use rand::seq::SliceRandom;
use time::PrimitiveDateTime;

/// Where a submission stands relative to its deadline.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum DeadlineState {
    Finished,
    Open,
    Expired,
}

pub(crate) fn deadline_state(
    now: PrimitiveDateTime,
    expires_at: PrimitiveDateTime,
    finished: bool,
) -> DeadlineState {
    if finished {
        DeadlineState::Finished
    } else if now <= expires_at {
        DeadlineState::Open
    } else {
        DeadlineState::Expired
    }
}

/// Question order for a new attempt: a shuffled permutation of the quiz's
/// question ids.
pub(crate) fn shuffled_order(question_ids: Vec<String>) -> Vec<String> {
    let mut order = question_ids;
    order.shuffle(&mut rand::thread_rng());
    order
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::{Date, Month, Time};

    fn at(hour: u8, minute: u8) -> PrimitiveDateTime {
        let date = Date::from_calendar_date(2025, Month::March, 10).unwrap();
        PrimitiveDateTime::new(date, Time::from_hms(hour, minute, 0).unwrap())
    }

    #[test]
    fn finished_submissions_stay_finished_past_the_deadline() {
        assert_eq!(deadline_state(at(11, 0), at(10, 0), true), DeadlineState::Finished);
    }

    #[test]
    fn open_until_the_deadline_passes() {
        assert_eq!(deadline_state(at(9, 59), at(10, 0), false), DeadlineState::Open);
        assert_eq!(deadline_state(at(10, 0), at(10, 0), false), DeadlineState::Open);
        assert_eq!(deadline_state(at(10, 1), at(10, 0), false), DeadlineState::Expired);
    }

    #[test]
    fn shuffled_order_is_a_permutation() {
        let ids: Vec<String> = (0..50).map(|n| format!("question-{n}")).collect();

        let mut shuffled = shuffled_order(ids.clone());
        assert_eq!(shuffled.len(), ids.len());

        shuffled.sort();
        let mut expected = ids;
        expected.sort();
        assert_eq!(shuffled, expected);
    }
}
