use super::types::{UploadJob, PDF_MIME};
use crate::config::AppConfig;
use crate::error::{Error, Result};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Url};
use serde::Deserialize;

/// Sends one upload job to the archive.
#[allow(async_fn_in_trait)]
pub trait UploadTransport {
    async fn upload(&self, job: &UploadJob) -> Result<()>;
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

/// Pulls the `{"error": "..."}` message out of a rejection body, if present.
pub fn rejection_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .map(|b| b.error)
        .filter(|m| !m.trim().is_empty())
}

#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
    upload_url: Url,
}

impl HttpTransport {
    pub fn new(config: &AppConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout()).build()?;
        Ok(Self {
            client,
            upload_url: config.upload_url()?,
        })
    }
}

impl UploadTransport for HttpTransport {
    async fn upload(&self, job: &UploadJob) -> Result<()> {
        let bytes = tokio::fs::read(&job.path)
            .await
            .map_err(|e| Error::io(&job.path, e))?;

        let file_part = Part::bytes(bytes)
            .file_name(job.file_name.clone())
            .mime_str(PDF_MIME)?;
        let mut form = Form::new().part("file", file_part);
        for (name, value) in &job.fields {
            form = form.text(*name, value.clone());
        }

        log::info!("POST {} ({})", self.upload_url, job.file_name);
        let response = self
            .client
            .post(self.upload_url.clone())
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(Error::Rejected {
            status: status.as_u16(),
            message: rejection_message(&body),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_server_error_message() {
        assert_eq!(
            rejection_message(r#"{"error": "Required fields missing: subject"}"#).as_deref(),
            Some("Required fields missing: subject")
        );
    }

    #[test]
    fn ignores_non_json_or_blank_bodies() {
        assert_eq!(rejection_message("<html>502 Bad Gateway</html>"), None);
        assert_eq!(rejection_message(r#"{"error": "  "}"#), None);
        assert_eq!(rejection_message(r#"{"message": "ok"}"#), None);
    }

    #[test]
    fn transport_targets_configured_endpoint() {
        let config = AppConfig {
            server_url: "http://archive.local:8080".into(),
            ..AppConfig::default()
        };
        let transport = HttpTransport::new(&config).unwrap();
        assert_eq!(
            transport.upload_url.as_str(),
            "http://archive.local:8080/upload"
        );
    }

    #[tokio::test]
    async fn unreadable_file_fails_before_any_request() {
        let transport = HttpTransport::new(&AppConfig::default()).unwrap();
        let job = UploadJob {
            id: crate::upload::FileId::new("gone.pdf", 1),
            file_name: "gone.pdf".into(),
            path: "/no/such/dir/gone.pdf".into(),
            fields: Vec::new(),
        };

        let err = transport.upload(&job).await.unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }

    /// Reads one HTTP request off `stream`, honouring Content-Length or chunked framing.
    fn read_request(stream: &mut std::net::TcpStream) -> String {
        use std::io::Read;

        let mut raw = Vec::new();
        let mut chunk = [0u8; 8192];
        loop {
            let n = stream.read(&mut chunk).unwrap();
            if n == 0 {
                break;
            }
            raw.extend_from_slice(&chunk[..n]);

            let text = String::from_utf8_lossy(&raw);
            let Some(head_end) = text.find("\r\n\r\n") else {
                continue;
            };
            let head = text[..head_end].to_ascii_lowercase();
            let body_len = raw.len() - head_end - 4;
            let content_length = head
                .lines()
                .find_map(|l| l.strip_prefix("content-length:"))
                .and_then(|v| v.trim().parse::<usize>().ok());
            let complete = match content_length {
                Some(len) => body_len >= len,
                None => text.ends_with("0\r\n\r\n"),
            };
            if complete {
                break;
            }
        }
        String::from_utf8_lossy(&raw).into_owned()
    }

    #[tokio::test]
    async fn rejection_reaches_the_item_as_failed() {
        use crate::upload::form::{FormCard, FIELDS};
        use crate::upload::ItemStatus;
        use std::io::Write;
        use std::net::TcpListener;

        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let server = std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let request = read_request(&mut stream);
            let body = r#"{"error":"Required fields missing"}"#;
            write!(
                stream,
                "HTTP/1.1 400 BAD REQUEST\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                body.len(),
                body
            )
            .unwrap();
            request
        });

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("x.pdf");
        std::fs::write(&path, b"%PDF-1.4\n%%EOF\n").unwrap();

        let mut card = FormCard::new(Some("Alvido"));
        card.set("subject", "Physics");
        let job = UploadJob {
            id: crate::upload::FileId::new("x.pdf", 15),
            file_name: "x.pdf".into(),
            path,
            fields: card.form_pairs(),
        };

        let config = AppConfig {
            server_url: format!("http://{}", addr),
            ..AppConfig::default()
        };
        let transport = HttpTransport::new(&config).unwrap();
        let outcome = transport.upload(&job).await;
        let request = server.join().unwrap();

        assert!(request.starts_with("POST /upload "));
        assert!(request.contains(r#"name="file"; filename="x.pdf""#));
        assert!(request
            .to_ascii_lowercase()
            .contains("content-type: application/pdf"));
        assert!(request.contains("%PDF-1.4"));
        for spec in FIELDS {
            assert!(
                request.contains(&format!("name=\"{}\"", spec.name)),
                "missing part {}",
                spec.name
            );
        }
        assert!(request.contains("Alvido"));

        assert_eq!(
            ItemStatus::from_outcome(&outcome),
            ItemStatus::Failed("Required fields missing".into())
        );
    }
}
