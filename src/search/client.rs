use super::demo;
use super::paper::PaperRecord;
use crate::config::AppConfig;
use crate::error::{Error, Result};
use reqwest::{Client, Url};

#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome {
    pub query: String,
    pub papers: Vec<PaperRecord>,
    /// Results came from the built-in samples rather than the server.
    pub demo: bool,
}

#[derive(Clone)]
pub struct SearchClient {
    client: Client,
    server: Url,
    papers_url: Url,
    demo: bool,
}

impl SearchClient {
    pub fn new(config: &AppConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout()).build()?;
        Ok(Self {
            client,
            server: config.endpoint("/")?,
            papers_url: config.papers_url()?,
            demo: config.demo_mode,
        })
    }

    pub fn is_demo(&self) -> bool {
        self.demo
    }

    pub fn enable_demo(&mut self) {
        self.demo = true;
    }

    /// Fetches the whole archive; used at start-up to report its size.
    pub async fn connect(&self) -> Result<usize> {
        if self.demo {
            return Ok(demo::sample_papers().len());
        }
        Ok(self.fetch("").await?.len())
    }

    pub async fn search(&self, query: &str) -> Result<SearchOutcome> {
        let query = query.trim();
        let papers = if self.demo {
            demo::filter(&demo::sample_papers(), query)
        } else {
            self.fetch(query).await?
        };

        Ok(SearchOutcome {
            query: query.to_string(),
            papers,
            demo: self.demo,
        })
    }

    async fn fetch(&self, query: &str) -> Result<Vec<PaperRecord>> {
        let mut url = self.papers_url.clone();
        if !query.is_empty() {
            url.query_pairs_mut().append_pair("q", query);
        }

        log::debug!("GET {}", url);
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Rejected {
                status: status.as_u16(),
                message: None,
            });
        }

        let mut papers: Vec<PaperRecord> = response.json().await?;
        for paper in &mut papers {
            paper.url = self.resolve(&paper.url);
        }
        Ok(papers)
    }

    /// Turns server-relative links such as `/uploads/x.pdf` into absolute URLs.
    pub fn resolve(&self, link: &str) -> String {
        if link.is_empty() {
            return String::new();
        }
        self.server
            .join(link)
            .map(|u| u.to_string())
            .unwrap_or_else(|_| link.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn demo_client() -> SearchClient {
        let config = AppConfig {
            demo_mode: true,
            ..AppConfig::default()
        };
        SearchClient::new(&config).unwrap()
    }

    #[tokio::test]
    async fn demo_mode_never_touches_the_network() {
        let client = demo_client();
        assert_eq!(client.connect().await.unwrap(), 3);

        let outcome = client.search("  maths ").await.unwrap();
        assert!(outcome.demo);
        assert_eq!(outcome.query, "maths");
        assert_eq!(outcome.papers.len(), 1);
        assert_eq!(outcome.papers[0].subject, "Mathematics");
    }

    #[tokio::test]
    async fn unreachable_server_is_a_transport_error() {
        let config = AppConfig {
            server_url: "http://127.0.0.1:9".into(),
            request_timeout_secs: 2,
            ..AppConfig::default()
        };
        let client = SearchClient::new(&config).unwrap();
        let err = client.search("physics").await.unwrap_err();
        assert!(err.is_transport());
    }

    #[test]
    fn relative_links_resolve_against_server() {
        let config = AppConfig {
            server_url: "https://archive.example.org".into(),
            ..AppConfig::default()
        };
        let client = SearchClient::new(&config).unwrap();
        assert_eq!(
            client.resolve("/uploads/ab12_physics.pdf"),
            "https://archive.example.org/uploads/ab12_physics.pdf"
        );
        assert_eq!(client.resolve("https://cdn.example.org/x.pdf"), "https://cdn.example.org/x.pdf");
        assert_eq!(client.resolve(""), "");
    }

    #[test]
    fn switching_to_demo_is_sticky() {
        let mut client = SearchClient::new(&AppConfig::default()).unwrap();
        assert!(!client.is_demo());
        client.enable_demo();
        assert!(client.is_demo());
    }
}
