use std::{fmt::Display, num::NonZeroU32, sync::OnceLock, time::Duration};

use governor::{
    clock::{QuantaClock, QuantaInstant},
    middleware::NoOpMiddleware,
    state::InMemoryState,
};
use reqwest::{Client, StatusCode};
use tracing::{instrument, Level};
use url::Url;

#[derive(Debug)]
pub enum Error {
    NotFound(Url),
    Status { url: Url, status: StatusCode },
    Transport(reqwest::Error),
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Self::Transport(e)
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(url) => write!(f, "{url} not found"),
            Self::Status { url, status } => write!(f, "{url} answered {status}"),
            Self::Transport(e) => write!(f, "transport error: {e}"),
        }
    }
}

impl std::error::Error for Error {}

pub fn make_client() -> reqwest::Client {
    Client::builder()
        .gzip(true)
        .timeout(Duration::from_secs(30))
        .build()
        .expect("client creation should succeed")
}

static RATE_LIMIT: u32 = 1;
static DELAY_JITTER: u64 = 1;
static RATE_LIMITER: OnceLock<
    governor::RateLimiter<
        governor::state::NotKeyed,
        InMemoryState,
        QuantaClock,
        NoOpMiddleware<QuantaInstant>,
    >,
> = OnceLock::new();

/// Fetches the raw markup of a menu page. Requests are paced by a process-wide
/// rate limiter; nothing is retried.
#[instrument(skip_all, fields(url = %url), level = Level::TRACE)]
pub async fn fetch_document(client: &reqwest::Client, url: &Url) -> Result<String, Error> {
    let rate_limiter = RATE_LIMITER.get_or_init(|| {
        governor::RateLimiter::direct(governor::Quota::per_second(
            NonZeroU32::new(RATE_LIMIT).expect("rate limit is non-zero"),
        ))
    });
    let jitter = governor::Jitter::new(Duration::ZERO, Duration::from_secs(DELAY_JITTER));
    rate_limiter.until_ready_with_jitter(jitter).await;

    let start = std::time::Instant::now();
    let res = client.get(url.clone()).send().await?;
    let status = res.status();
    if status == StatusCode::NOT_FOUND {
        return Err(Error::NotFound(url.clone()));
    }
    if !status.is_success() {
        return Err(Error::Status {
            url: url.clone(),
            status,
        });
    }
    let text = res.text().await?;
    log::trace!("Got text of {url} in \t {:?}", start.elapsed());
    Ok(text)
}
