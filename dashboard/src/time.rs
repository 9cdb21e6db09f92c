use chrono::{DateTime, Utc};

#[cfg(debug_assertions)]
const FAKE_TIME_FILE_ENV_VAR: &str = "DASHBOARD_FAKETIME_FILE";

#[cfg(debug_assertions)]
fn read_fake_time(path: impl AsRef<std::path::Path>) -> anyhow::Result<DateTime<Utc>> {
    use std::time::SystemTime;

    // The fake time drifts forward with the wall clock from the moment the
    // file was written, so a stale file does not freeze time entirely
    let file_modified = std::fs::metadata(&path)?.modified()?;
    let elapsed = SystemTime::now()
        .duration_since(file_modified)
        .unwrap_or_default();
    let elapsed = chrono::Duration::from_std(elapsed)?;

    let time = std::fs::read_to_string(&path)?;
    let time = DateTime::parse_from_rfc3339(time.trim())?;

    Ok(time.with_timezone(&Utc) + elapsed)
}

/// Single entry point for the current time.
///
/// Debug builds can move the clock around by pointing
/// `DASHBOARD_FAKETIME_FILE` at a file containing an RFC3339 timestamp,
/// which is how integration environments exercise the dedup window and the
/// notification threshold without waiting days. Write a new timestamp to
/// the file to time travel again.
#[cfg(debug_assertions)]
pub fn now() -> DateTime<Utc> {
    if let Ok(path) = std::env::var(FAKE_TIME_FILE_ENV_VAR) {
        match read_fake_time(path) {
            Ok(time) => return time,
            Err(err) => panic!("Failed to read fake time from file: {err}"),
        }
    }

    Utc::now()
}

#[cfg(not(debug_assertions))]
pub fn now() -> DateTime<Utc> {
    Utc::now()
}
