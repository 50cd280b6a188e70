use time::OffsetDateTime;

/// Current UTC time truncated to whole seconds (RFC 3339 output stays stable).
pub(crate) fn now() -> OffsetDateTime {
    let now = OffsetDateTime::now_utc();
    now.replace_nanosecond(0).unwrap_or(now)
}
