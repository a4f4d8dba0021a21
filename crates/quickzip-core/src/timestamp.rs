//! Conversion between filesystem times and ZIP (MS-DOS) timestamps.
//!
//! ZIP stores local wall-clock time with two-second resolution and no
//! timezone, covering 1980 to 2107.

use std::time::SystemTime;

use chrono::DateTime;
use chrono::Datelike;
use chrono::Local;
use chrono::NaiveDate;
use chrono::Timelike;

/// Converts a modification time into a ZIP timestamp.
///
/// Returns `None` for times outside the range ZIP can represent.
pub(crate) fn to_zip_time(time: SystemTime) -> Option<zip::DateTime> {
    let local = DateTime::<Local>::from(time);
    zip::DateTime::from_date_and_time(
        u16::try_from(local.year()).ok()?,
        u8::try_from(local.month()).ok()?,
        u8::try_from(local.day()).ok()?,
        u8::try_from(local.hour()).ok()?,
        u8::try_from(local.minute()).ok()?,
        u8::try_from(local.second()).ok()?,
    )
    .ok()
}

/// Converts a ZIP timestamp back into a filesystem time in the local zone.
pub(crate) fn from_zip_time(time: zip::DateTime) -> Option<SystemTime> {
    let naive = NaiveDate::from_ymd_opt(
        i32::from(time.year()),
        u32::from(time.month()),
        u32::from(time.day()),
    )?
    .and_hms_opt(
        u32::from(time.hour()),
        u32::from(time.minute()),
        u32::from(time.second()),
    )?;
    naive
        .and_local_timezone(Local)
        .earliest()
        .map(SystemTime::from)
}
