// Copyright (C) 2026 the Turnero authors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Fixed-width UTC timestamp formatting.
//!
//! Timestamps are stored as text and `requested_at` doubles as the FIFO
//! ordering key, so the format must sort lexicographically. RFC 3339 with
//! variable-width subseconds does not; this fixed six-digit layout does.

use time::OffsetDateTime;

/// Formats a moment as a fixed-width UTC timestamp
/// (`YYYY-MM-DDTHH:MM:SS.ffffffZ`).
///
/// Equal-length output guarantees that string ordering matches
/// chronological ordering.
#[must_use]
pub fn format_timestamp(moment: OffsetDateTime) -> String {
    format!(
        "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}.{:06}Z",
        moment.year(),
        u8::from(moment.month()),
        moment.day(),
        moment.hour(),
        moment.minute(),
        moment.second(),
        moment.microsecond()
    )
}

/// Formats the calendar date of a moment as `YYYY-MM-DD`.
#[must_use]
pub fn format_date(moment: OffsetDateTime) -> String {
    format!(
        "{:04}-{:02}-{:02}",
        moment.year(),
        u8::from(moment.month()),
        moment.day()
    )
}

/// The current UTC time as a fixed-width timestamp.
#[must_use]
pub fn now_timestamp() -> String {
    format_timestamp(OffsetDateTime::now_utc())
}

/// The current UTC calendar date as `YYYY-MM-DD`.
#[must_use]
pub fn now_date() -> String {
    format_date(OffsetDateTime::now_utc())
}
