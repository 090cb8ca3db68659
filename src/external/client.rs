//! Shared HTTP client for outbound gateway calls.

use std::sync::LazyLock;
use std::time::Duration;

/// Global HTTP client instance, initialized lazily on first access and
/// reused across the application for connection pooling and DNS caching.
///
/// Transport calls are blocking I/O from the engine's point of view; the
/// client-level timeouts are the only bound on how long a delivery attempt
/// can take — the engine itself implements no retries or cancellation.
pub static HTTP_CLIENT: LazyLock<reqwest::Client> = LazyLock::new(|| {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .pool_max_idle_per_host(4)
        .pool_idle_timeout(Duration::from_secs(90))
        .use_rustls_tls()
        .user_agent(concat!("clinic-notify/", env!("CARGO_PKG_VERSION")))
        .build()
        .expect("Failed to build HTTP client")
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_initializes() {
        let _ = &*HTTP_CLIENT;
    }
}
