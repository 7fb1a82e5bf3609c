// Copyright 2017-2021 Lukas Pustina <lukas@pustina.de>
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

//! Resolves the authoritative nameservers of a domain via DNS-over-HTTPS.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use reqwest::header::ACCEPT;
use tracing::{debug, instrument, trace};

pub use error::ResolutionError;
pub use response::{DohAnswer, DohResponse};

pub mod error;
pub mod response;

pub type ResolutionResult<T> = std::result::Result<T, ResolutionError>;

/// Google Public DNS JSON API.
pub static DEFAULT_DOH_URL: &str = "https://dns.google/resolve";
pub static DOH_JSON_MEDIA_TYPE: &str = "application/dns-json";

/// Looks up the nameservers a domain is currently delegated to.
pub trait AuthorityLookup {
    fn lookup_authoritative_nameservers(
        &self,
        domain: &str,
    ) -> impl Future<Output = ResolutionResult<Vec<String>>> + Send;
}

#[derive(Debug, Clone)]
pub struct DohResolverOpts {
    /// Endpoint implementing the DNS JSON API, queried with `?name=<domain>&type=NS`
    pub url: String,
    pub timeout: Duration,
}

impl DohResolverOpts {
    pub fn new<T: Into<String>>(url: T, timeout: Duration) -> DohResolverOpts {
        DohResolverOpts {
            url: url.into(),
            timeout,
        }
    }
}

impl Default for DohResolverOpts {
    fn default() -> Self {
        DohResolverOpts::new(DEFAULT_DOH_URL, Duration::from_secs(10))
    }
}

#[derive(Debug, Clone)]
pub struct DohResolver {
    http_client: Arc<reqwest::Client>,
    opts: Arc<DohResolverOpts>,
}

impl Default for DohResolver {
    fn default() -> Self {
        DohResolver::new(DohResolverOpts::default())
    }
}

impl DohResolver {
    pub fn new(opts: DohResolverOpts) -> DohResolver {
        DohResolver {
            http_client: Arc::new(reqwest::Client::new()),
            opts: Arc::new(opts),
        }
    }

    pub fn opts(&self) -> &DohResolverOpts {
        &self.opts
    }

    /// Sends exactly one NS query for `domain`; failures are not retried.
    #[instrument(name = "resolve nameservers", level = "info", skip(self), fields(url = %self.opts.url))]
    pub async fn resolve_authoritative_nameservers(&self, domain: &str) -> ResolutionResult<Vec<String>> {
        trace!("Sending NS query");
        let res = self
            .http_client
            .get(&self.opts.url)
            .query(&[("name", domain), ("type", "NS")])
            .header(ACCEPT, DOH_JSON_MEDIA_TYPE)
            .timeout(self.opts.timeout)
            .send()
            .await?;

        if !res.status().is_success() {
            return Err(ResolutionError::Transport {
                reason: format!("unexpected status code: {}", res.status()),
            });
        }

        let body = res.text().await?;
        trace!("Received body {}", body);
        let response: DohResponse = serde_json::from_str(&body)?;
        let nameservers = response.into_nameservers();

        debug!(
            "NS query returned {}",
            match &nameservers {
                Ok(x) => format!("{} nameservers", x.len()),
                Err(err) => format!("error: {}", err),
            }
        );

        nameservers
    }
}

impl AuthorityLookup for DohResolver {
    async fn lookup_authoritative_nameservers(&self, domain: &str) -> ResolutionResult<Vec<String>> {
        self.resolve_authoritative_nameservers(domain).await
    }
}

#[cfg(test)]
mod tests {
    use spectral::prelude::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    use super::*;

    #[tokio::test]
    #[ignore = "requires network access"]
    async fn google_com() {
        crate::utils::tests::logging::init();
        let resolver = DohResolver::default();

        let res = resolver.resolve_authoritative_nameservers("google.com").await;

        assert_that(&res)
            .is_ok()
            .matches(|x| x.iter().any(|ns| ns.ends_with(".google.com")));
    }

    #[tokio::test]
    #[ignore = "requires network access"]
    async fn unregistered_domain() {
        crate::utils::tests::logging::init();
        let resolver = DohResolver::default();

        let res = resolver
            .resolve_authoritative_nameservers("this-domain-does-not-exist-nsauth.co.za")
            .await;

        assert_that(&res).is_err().matches(|x| x.is_no_answer());
    }

    #[tokio::test]
    async fn unreachable_endpoint() {
        crate::utils::tests::logging::init();
        let opts = DohResolverOpts::new("http://127.0.0.1:9/resolve", Duration::from_secs(2));
        let resolver = DohResolver::new(opts);

        let res = resolver.resolve_authoritative_nameservers("example.co.za").await;

        assert_that(&res).is_err().matches(|x| x.is_transport());
    }

    #[tokio::test]
    async fn silent_endpoint_times_out() {
        crate::utils::tests::logging::init();
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(async move {
            // Keeps the connection open without ever answering
            let (_socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(5)).await;
        });
        let opts = DohResolverOpts::new(format!("http://{}/resolve", addr), Duration::from_millis(300));
        let resolver = DohResolver::new(opts);

        let res = resolver.resolve_authoritative_nameservers("example.co.za").await;
        server.abort();

        assert_that(&res).is_err().is_equal_to(ResolutionError::Timeout);
    }

    #[tokio::test]
    async fn http_error_status_is_transport_error() {
        crate::utils::tests::logging::init();
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; 4096];
            let _ = socket.read(&mut buf).await;
            socket
                .write_all(b"HTTP/1.1 500 Internal Server Error\r\ncontent-length: 0\r\nconnection: close\r\n\r\n")
                .await
                .unwrap();
        });
        let opts = DohResolverOpts::new(format!("http://{}/resolve", addr), Duration::from_secs(2));
        let resolver = DohResolver::new(opts);

        let res = resolver.resolve_authoritative_nameservers("example.co.za").await;
        server.await.unwrap();

        assert_that(&res)
            .is_err()
            .matches(|x| x.is_transport() && x.to_string().contains("500"));
    }
}
