//! Site file discovery: robots.txt, sitemap.xml and llms.txt.
//!
//! Probes are best effort. Any failure (timeout, connection error, non-200
//! status, unexpected body) reads as "absent" and is never reported as an
//! error. Only http(s) pages are probed.

use url::Url;

use crate::structure::SiteFiles;

/// Status and body of a probe request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResponse {
    pub status: u16,
    pub body: String,
}

impl ProbeResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self { status, body: body.into() }
    }

    fn ok(&self) -> bool {
        self.status == 200
    }
}

/// Fetches a URL for a presence check.
///
/// Implementations return `None` for any transport failure.
pub trait SiteProbe {
    fn get(&self, url: &str) -> impl Future<Output = Option<ProbeResponse>> + Send;
}

/// robots.txt counts when it answers 200 with at least one `User-agent` line.
pub fn robots_present(response: Option<&ProbeResponse>) -> bool {
    response.is_some_and(|r| r.ok() && r.body.contains("User-agent"))
}

/// sitemap.xml counts when it answers 200 with a `<urlset` or `<sitemapindex` root.
pub fn sitemap_present(response: Option<&ProbeResponse>) -> bool {
    response.is_some_and(|r| r.ok() && (r.body.contains("<urlset") || r.body.contains("<sitemapindex")))
}

/// llms.txt counts when it answers 200 with a non-blank body.
pub fn llms_present(response: Option<&ProbeResponse>) -> bool {
    response.is_some_and(|r| r.ok() && !r.body.trim().is_empty())
}

/// Origin-relative URLs of the three site files, or `None` for pages that
/// are not http(s).
pub fn site_file_urls(page_url: &str) -> Option<[String; 3]> {
    let url = Url::parse(page_url).ok()?;
    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return None;
    }
    let at = |path: &str| url.join(path).map(|u| u.to_string()).ok();
    Some([at("/robots.txt")?, at("/sitemap.xml")?, at("/llms.txt")?])
}

/// Probes the page's origin for its site files, all three at once.
#[cfg(feature = "fetch")]
pub async fn discover_site_files<P: SiteProbe + Sync>(probe: &P, page_url: &str) -> SiteFiles {
    let Some([robots, sitemap, llms]) = site_file_urls(page_url) else {
        tracing::debug!(page_url, "skipping site file probes for non-http page");
        return SiteFiles::default();
    };

    let (robots, sitemap, llms) = tokio::join!(probe.get(&robots), probe.get(&sitemap), probe.get(&llms));

    let files = SiteFiles {
        robots_txt: robots_present(robots.as_ref()),
        sitemap_xml: sitemap_present(sitemap.as_ref()),
        llms_txt: llms_present(llms.as_ref()),
    };
    tracing::debug!(page_url, ?files, "site files discovered");
    files
}

#[cfg(feature = "fetch")]
pub use http::{HttpProbe, ProbeConfig};

#[cfg(feature = "fetch")]
mod http {
    use std::time::Duration;

    use super::{ProbeResponse, SiteProbe};
    use crate::{AiscoutError, Result};

    /// Settings for site file probes, separate from the page fetch.
    #[derive(Debug, Clone)]
    pub struct ProbeConfig {
        /// Per-request timeout in seconds.
        pub timeout: u64,
        pub user_agent: String,
    }

    impl Default for ProbeConfig {
        fn default() -> Self {
            Self { timeout: 5, user_agent: concat!("aiscout/", env!("CARGO_PKG_VERSION")).to_string() }
        }
    }

    /// [`SiteProbe`] over reqwest. One attempt per URL, no retries.
    #[derive(Debug, Clone)]
    pub struct HttpProbe {
        client: reqwest::Client,
    }

    impl HttpProbe {
        /// # Errors
        ///
        /// Returns [`AiscoutError::HttpError`] if the client cannot be built.
        pub fn new(config: &ProbeConfig) -> Result<Self> {
            let client = reqwest::Client::builder()
                .timeout(Duration::from_secs(config.timeout))
                .user_agent(config.user_agent.as_str())
                .build()
                .map_err(AiscoutError::HttpError)?;
            Ok(Self { client })
        }
    }

    impl SiteProbe for HttpProbe {
        async fn get(&self, url: &str) -> Option<ProbeResponse> {
            let response = match self.client.get(url).send().await {
                Ok(response) => response,
                Err(e) => {
                    tracing::debug!(url, error = %e, "probe failed");
                    return None;
                }
            };
            let status = response.status().as_u16();
            let body = response.text().await.ok()?;
            Some(ProbeResponse { status, body })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MapProbe {
        responses: HashMap<String, ProbeResponse>,
        requested: Mutex<Vec<String>>,
    }

    impl MapProbe {
        fn with(mut self, url: &str, status: u16, body: &str) -> Self {
            self.responses.insert(url.to_string(), ProbeResponse::new(status, body));
            self
        }
    }

    impl SiteProbe for MapProbe {
        async fn get(&self, url: &str) -> Option<ProbeResponse> {
            if let Ok(mut requested) = self.requested.lock() {
                requested.push(url.to_string());
            }
            self.responses.get(url).cloned()
        }
    }

    #[cfg(feature = "fetch")]
    fn discover(probe: &MapProbe, page_url: &str) -> SiteFiles {
        tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(discover_site_files(probe, page_url))
    }

    #[test]
    fn test_robots_requires_user_agent() {
        assert!(robots_present(Some(&ProbeResponse::new(200, "User-agent: *\nDisallow:"))));
        assert!(!robots_present(Some(&ProbeResponse::new(200, "<html>Not found</html>"))));
        assert!(!robots_present(Some(&ProbeResponse::new(404, "User-agent: *"))));
        assert!(!robots_present(None));
    }

    #[test]
    fn test_sitemap_roots() {
        assert!(sitemap_present(Some(&ProbeResponse::new(200, "<?xml?><urlset></urlset>"))));
        assert!(sitemap_present(Some(&ProbeResponse::new(200, "<sitemapindex>"))));
        assert!(!sitemap_present(Some(&ProbeResponse::new(200, "<html></html>"))));
    }

    #[test]
    fn test_llms_needs_body() {
        assert!(llms_present(Some(&ProbeResponse::new(200, "# Site\n"))));
        assert!(!llms_present(Some(&ProbeResponse::new(200, "  "))));
    }

    #[test]
    fn test_site_file_urls() {
        let urls = site_file_urls("https://example.com:8443/docs/page?x=1").unwrap();
        assert_eq!(urls[0], "https://example.com:8443/robots.txt");
        assert_eq!(urls[1], "https://example.com:8443/sitemap.xml");
        assert_eq!(urls[2], "https://example.com:8443/llms.txt");
        assert!(site_file_urls("file:///tmp/page.html").is_none());
        assert!(site_file_urls("not a url").is_none());
    }

    #[cfg(feature = "fetch")]
    #[test]
    fn test_discover_site_files() {
        let probe = MapProbe::default()
            .with("https://example.com/robots.txt", 200, "User-agent: *")
            .with("https://example.com/sitemap.xml", 500, "<urlset>")
            .with("https://example.com/llms.txt", 200, "# Example");
        let files = discover(&probe, "https://example.com/blog/post");
        assert_eq!(files, SiteFiles { robots_txt: true, sitemap_xml: false, llms_txt: true });
        assert_eq!(probe.requested.lock().unwrap().len(), 3);
    }

    #[cfg(feature = "fetch")]
    #[test]
    fn test_non_http_pages_not_probed() {
        let probe = MapProbe::default();
        let files = discover(&probe, "file:///tmp/page.html");
        assert_eq!(files, SiteFiles::default());
        assert!(probe.requested.lock().unwrap().is_empty());
    }

    #[cfg(feature = "fetch")]
    #[test]
    fn test_probe_config_default() {
        let config = ProbeConfig::default();
        assert_eq!(config.timeout, 5);
        assert!(HttpProbe::new(&config).is_ok());
    }
}
