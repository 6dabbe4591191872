#![forbid(unsafe_code)]

use time::format_description::well_known::{Iso8601, Rfc3339};
use time::{OffsetDateTime, PrimitiveDateTime};

/// Current instant as an RFC 3339 UTC string. All timestamps the server
/// writes come from here. Fixed-width microsecond precision, so stored
/// strings sort lexicographically in chronological order; the well-known
/// `Rfc3339` formatter trims fractional digits and would break that.
pub(crate) fn now_rfc3339() -> String {
    let t = OffsetDateTime::now_utc();
    format!(
        "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}.{:06}Z",
        t.year(),
        u8::from(t.month()),
        t.day(),
        t.hour(),
        t.minute(),
        t.second(),
        t.microsecond(),
    )
}

/// Lenient timestamp parse for comparison purposes. Accepts RFC 3339 with a
/// `Z` suffix or an explicit offset; an offset-less ISO 8601 value is assumed
/// to be UTC. Anything else is `None`.
pub(crate) fn parse_timestamp(raw: &str) -> Option<OffsetDateTime> {
    let value = raw.trim();
    if value.is_empty() {
        return None;
    }
    if let Ok(parsed) = OffsetDateTime::parse(value, &Rfc3339) {
        return Some(parsed);
    }
    if let Ok(parsed) = PrimitiveDateTime::parse(value, &Iso8601::DEFAULT) {
        return Some(parsed.assume_utc());
    }
    None
}
