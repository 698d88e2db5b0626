//! Pure schedule arithmetic

use chrono::{DateTime, Duration, LocalResult, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

/// First occurrence of `at` (local to `tz`) strictly after `now`
pub fn next_run_after(now: DateTime<Utc>, at: NaiveTime, tz: Tz) -> DateTime<Utc> {
    let mut date = now.with_timezone(&tz).date_naive();

    // Today or tomorrow; the third step only guards odd zone transitions
    for _ in 0..3 {
        let candidate = resolve_local(date, at, tz);
        if candidate > now {
            return candidate;
        }
        match date.succ_opt() {
            Some(next) => date = next,
            None => break,
        }
    }

    now + Duration::days(1)
}

/// Resolved rows older than the returned instant are removed; `None` removes all
pub fn retention_cutoff(now: DateTime<Utc>, retention_days: u32) -> Option<DateTime<Utc>> {
    (retention_days > 0).then(|| now - Duration::days(i64::from(retention_days)))
}

/// Local wall time to an instant. Ambiguous times take the earlier instant,
/// times inside a DST gap move forward to the first valid minute.
fn resolve_local(date: NaiveDate, at: NaiveTime, tz: Tz) -> DateTime<Utc> {
    let naive = date.and_time(at);

    for minutes in 0..=24 * 60 {
        let shifted = naive + Duration::minutes(minutes);
        match tz.from_local_datetime(&shifted) {
            LocalResult::Single(t) => return t.with_timezone(&Utc),
            LocalResult::Ambiguous(earliest, _) => return earliest.with_timezone(&Utc),
            LocalResult::None => continue,
        }
    }

    // No zone has a day-long gap
    Utc.from_utc_datetime(&naive)
}
