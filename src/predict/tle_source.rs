use std::fs;
use std::path::Path;
use std::time::{Duration, SystemTime};

use crate::predict::error::PredictError;

pub const DEFAULT_TLE_URL: &str = "https://www.celestrak.com/NORAD/elements/resource.txt";

/// True when the cache file is missing or older than `max_age` at `now`.
pub fn needs_refresh(path: &Path, max_age: Duration, now: SystemTime) -> bool {
    let modified = match fs::metadata(path).and_then(|m| m.modified()) {
        Ok(modified) => modified,
        Err(_) => return true,
    };

    match now.duration_since(modified) {
        Ok(age) => age > max_age,
        // Modified in the future, treat as fresh
        Err(_) => false,
    }
}

/// Download the element set into `path` unless the cached copy is fresh.
///
/// Returns whether a download happened.
pub async fn refresh_tle_cache(
    url: &str,
    path: &Path,
    max_age: Duration,
) -> Result<bool, PredictError> {
    if !needs_refresh(path, max_age, SystemTime::now()) {
        log::info!("Using cached element sets {}", path.display());
        return Ok(false);
    }

    log::info!("Fetching element sets from {}", url);
    let download_error = |message: String| PredictError::Download {
        url: url.to_string(),
        message,
    };

    let response = reqwest::get(url)
        .await
        .map_err(|e| download_error(e.to_string()))?;

    if !response.status().is_success() {
        return Err(download_error(format!("status {}", response.status())));
    }

    let body = response
        .text()
        .await
        .map_err(|e| download_error(e.to_string()))?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, body)?;

    log::info!("Element sets saved to {}", path.display());
    Ok(true)
}
