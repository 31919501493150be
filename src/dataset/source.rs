use super::parse::parse_csv;
use super::sample::sample_events;
use super::Dataset;
use crate::error::LoadError;
use reqwest::blocking::Client;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

/// Somewhere an event table can be loaded from
pub trait DatasetSource: Send + Sync {
    fn load(&self) -> Result<Dataset, LoadError>;

    /// Short label shown in the dashboard header
    fn describe(&self) -> String;
}

/// The built-in sample table; never fails
pub struct StaticSource;

impl DatasetSource for StaticSource {
    fn load(&self) -> Result<Dataset, LoadError> {
        Ok(Dataset::new(sample_events(), self.describe()))
    }

    fn describe(&self) -> String {
        "built-in sample".to_string()
    }
}

/// CSV document fetched over HTTP
pub struct RemoteCsvSource {
    url: String,
    client: Client,
}

impl RemoteCsvSource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, LoadError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("signal-map/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            url: url.into(),
            client,
        })
    }
}

impl DatasetSource for RemoteCsvSource {
    fn load(&self) -> Result<Dataset, LoadError> {
        info!(url = %self.url, "fetching event table");
        let response = self.client.get(&self.url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(LoadError::Status {
                url: self.url.clone(),
                code: status.as_u16(),
            });
        }
        let body = response.bytes()?;
        info!(url = %self.url, bytes = body.len(), "received event table");
        parse_csv(&body[..], &self.url)
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

/// CSV document on local disk
pub struct CsvFileSource {
    path: PathBuf,
}

impl CsvFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl DatasetSource for CsvFileSource {
    fn load(&self) -> Result<Dataset, LoadError> {
        let file = File::open(&self.path)?;
        parse_csv(BufReader::new(file), &self.describe())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;

    /// Answer a single HTTP request on a loopback port, returning its URL
    fn serve_once(status: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        thread::spawn(move || {
            let Ok((mut stream, _)) = listener.accept() else {
                return;
            };
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                match stream.read(&mut buf) {
                    Ok(0) | Err(_) => break,
                    Ok(n) => request.extend_from_slice(&buf[..n]),
                }
            }
            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: text/csv\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            let _ = stream.write_all(response.as_bytes());
        });
        format!("http://{addr}/events.csv")
    }

    /// Ignores any proxy set in the environment so requests stay on loopback
    fn remote(url: &str) -> RemoteCsvSource {
        let client = Client::builder()
            .no_proxy()
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap();
        RemoteCsvSource {
            url: url.to_string(),
            client,
        }
    }

    #[test]
    fn test_remote_source_builds_with_timeout() {
        let source = RemoteCsvSource::new("http://127.0.0.1:9/events.csv", Duration::from_secs(1)).unwrap();
        assert_eq!(source.describe(), "http://127.0.0.1:9/events.csv");
    }

    #[test]
    fn test_static_source_always_loads() {
        let ds = StaticSource.load().unwrap();
        assert_eq!(ds.len(), 20);
        assert_eq!(ds.source, "built-in sample");
    }

    #[test]
    fn test_csv_file_source() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "country,disease,grade,lat,lon").unwrap();
        writeln!(file, "Kenya,Cholera,Grade 3,0.02,37.9").unwrap();
        let source = CsvFileSource::new(file.path());
        let ds = source.load().unwrap();
        assert_eq!(ds.len(), 1);
        assert_eq!(ds.source, file.path().display().to_string());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let source = CsvFileSource::new("/definitely/not/here.csv");
        assert!(matches!(source.load(), Err(LoadError::Io(_))));
    }

    #[test]
    fn test_remote_source_loads_csv() {
        let url = serve_once("200 OK", "country,disease,grade\nKenya,Cholera,Grade 3\nGhana,Measles,Grade 1\n");
        let source = remote(&url);
        let ds = source.load().unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.source, url);
        assert_eq!(source.describe(), url);
    }

    #[test]
    fn test_remote_non_success_is_status_error() {
        let url = serve_once("404 Not Found", "gone");
        match remote(&url).load() {
            Err(LoadError::Status { url: failed, code }) => {
                assert_eq!(code, 404);
                assert_eq!(failed, url);
            }
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[test]
    fn test_remote_unrecognized_body_is_malformed() {
        let url = serve_once("200 OK", "foo,bar\n1,2\n");
        assert!(matches!(remote(&url).load(), Err(LoadError::Malformed(_))));
    }

    #[test]
    fn test_remote_connection_refused_is_http_error() {
        // Bind then drop so nothing listens on the port
        let addr = TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap();
        let source = remote(&format!("http://{addr}/events.csv"));
        assert!(matches!(source.load(), Err(LoadError::Http(_))));
    }
}
