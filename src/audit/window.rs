use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Offset, Utc};

/// Derive UTC range boundaries from calendar-day filter inputs.
///
/// A "from" day maps to local midnight (00:00:00.000) and a "to" day to
/// local end-of-day (23:59:59.999) of the selected date, both in the
/// viewer's fixed UTC offset, then converted to UTC. The filtered range
/// therefore covers the full local calendar day regardless of how far the
/// viewer's timezone sits from UTC. The host timezone is never consulted.
pub fn day_range_utc(
    from_day: Option<NaiveDate>,
    to_day: Option<NaiveDate>,
    offset: FixedOffset,
) -> (Option<DateTime<Utc>>, Option<DateTime<Utc>>) {
    let from = from_day.map(|day| local_to_utc(day.and_time(NaiveTime::MIN), offset));
    let to = to_day.map(|day| {
        let end_of_day = day.and_time(NaiveTime::MIN) + Duration::milliseconds(86_399_999);
        local_to_utc(end_of_day, offset)
    });
    (from, to)
}

fn local_to_utc(local: NaiveDateTime, offset: FixedOffset) -> DateTime<Utc> {
    DateTime::<Utc>::from_naive_utc_and_offset(local - offset, Utc)
}

/// Build a `FixedOffset` from an offset given in minutes east of UTC
/// (e.g. UTC-8 is -480). Out-of-range values fall back to UTC; the input
/// comes straight from a query parameter, so the multiplication must not
/// overflow either.
pub fn offset_from_minutes(minutes: i32) -> FixedOffset {
    minutes
        .checked_mul(60)
        .and_then(FixedOffset::east_opt)
        .unwrap_or_else(|| Utc.fix())
}
