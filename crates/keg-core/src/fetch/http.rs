//! Blocking HTTP artifact source (libcurl easy handle).

use super::{ArtifactSource, FetchError};
use std::time::Duration;

/// Fetches release archives over HTTP(S) into memory. Stateless: every call
/// builds a fresh handle, and no retry happens at this layer.
pub struct HttpSource {
    connect_timeout: Duration,
    low_speed_time: Duration,
}

impl Default for HttpSource {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(30),
            low_speed_time: Duration::from_secs(60),
        }
    }
}

impl ArtifactSource for HttpSource {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let mut easy = curl::easy::Easy::new();
        easy.url(url)?;
        easy.follow_location(true)?;
        easy.max_redirections(10)?;
        easy.connect_timeout(self.connect_timeout)?;
        // Abort transfers that stall below 1 KiB/s; release archives are small.
        easy.low_speed_limit(1024)?;
        easy.low_speed_time(self.low_speed_time)?;
        easy.useragent("keg")?;

        let mut body: Vec<u8> = Vec::new();
        {
            let mut transfer = easy.transfer();
            transfer.write_function(|data| {
                body.extend_from_slice(data);
                Ok(data.len())
            })?;
            transfer.perform()?;
        }

        let status = easy.response_code()?;
        if !(200..300).contains(&status) {
            return Err(FetchError::Http {
                url: url.to_string(),
                status,
            });
        }

        tracing::debug!(url, bytes = body.len(), "fetched archive");
        Ok(body)
    }
}
