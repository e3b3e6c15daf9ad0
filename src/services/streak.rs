use std::collections::BTreeSet;

use chrono::{DateTime, Duration, NaiveDate, Utc};

/// Distinct UTC calendar dates on which at least one session started.
pub fn active_dates<I>(starts: I) -> BTreeSet<NaiveDate>
where
    I: IntoIterator<Item = DateTime<Utc>>,
{
    starts.into_iter().map(|ts| ts.date_naive()).collect()
}

/// Consecutive active days ending today, or ending yesterday when nothing has
/// happened yet today. Dates after `today` are ignored.
pub fn study_streak(active: &BTreeSet<NaiveDate>, today: NaiveDate) -> u32 {
    let anchor = if active.contains(&today) {
        today
    } else {
        let yesterday = today - Duration::days(1);
        if !active.contains(&yesterday) {
            return 0;
        }
        yesterday
    };

    let mut streak = 0;
    let mut expected = anchor;
    for date in active.range(..=anchor).rev() {
        if *date != expected {
            break;
        }
        streak += 1;
        expected = expected - Duration::days(1);
    }
    streak
}
