use crate::error::{EditorError, Result};
use std::fs;
use std::future::Future;
use std::io::Read;
use std::path::PathBuf;
use tracing::{debug, warn};

/// What came back from a request. `body` is `None` when the response carried
/// nothing readable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    pub status: u16,
    pub body: Option<Vec<u8>>,
}

impl FetchResponse {
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

pub trait ResourceFetcher {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<FetchResponse>>;
}

/// Blocking HTTP(S) client. Meant to run off the UI thread.
#[derive(Debug, Clone, Default)]
pub struct HttpFetcher;

impl ResourceFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchResponse> {
        match ureq::get(url).call() {
            Ok(response) => {
                let status = response.status();
                let mut bytes = Vec::new();
                let body = match response.into_reader().read_to_end(&mut bytes) {
                    Ok(_) => Some(bytes),
                    Err(err) => {
                        warn!("reading body of {url} failed: {err}");
                        None
                    }
                };
                Ok(FetchResponse { status, body })
            }
            Err(ureq::Error::Status(status, _)) => Ok(FetchResponse { status, body: None }),
            Err(ureq::Error::Transport(transport)) => {
                Err(EditorError::fetch(url, transport.to_string()))
            }
        }
    }
}

/// Serves `file://` urls and plain paths, resolved against `root`.
#[derive(Debug, Clone, Default)]
pub struct FileFetcher {
    pub root: PathBuf,
}

impl FileFetcher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, url: &str) -> PathBuf {
        let path = url.strip_prefix("file://").unwrap_or(url);
        self.root.join(path)
    }
}

impl ResourceFetcher for FileFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchResponse> {
        let path = self.resolve(url);
        match fs::read(&path) {
            Ok(bytes) => Ok(FetchResponse {
                status: 200,
                body: Some(bytes),
            }),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(FetchResponse {
                status: 404,
                body: None,
            }),
            Err(err) => Err(EditorError::fetch(url, format!("{}: {err}", path.display()))),
        }
    }
}

pub async fn download_contents(fetcher: &impl ResourceFetcher, url: &str) -> Result<Vec<u8>> {
    let response = fetcher.fetch(url).await?;
    if !response.ok() {
        return Err(EditorError::fetch(
            url,
            format!("response status {}", response.status),
        ));
    }
    let Some(body) = response.body else {
        return Err(EditorError::fetch(
            url,
            "could not extract binary contents from response",
        ));
    };
    debug!("downloaded {} bytes from {url}", body.len());
    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::tasks::block_on;
    use rstest::rstest;

    struct Canned(FetchResponse);

    impl ResourceFetcher for Canned {
        async fn fetch(&self, _url: &str) -> Result<FetchResponse> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn successful_download_returns_body() {
        let fetcher = Canned(FetchResponse {
            status: 200,
            body: Some(vec![1, 2, 3]),
        });
        let bytes = block_on(download_contents(&fetcher, "a.glb")).unwrap();
        assert_eq!(bytes, vec![1, 2, 3]);
    }

    #[rstest]
    #[case(404, Some(vec![0]))]
    #[case(500, None)]
    #[case(200, None)]
    fn failed_downloads_are_fetch_errors(#[case] status: u16, #[case] body: Option<Vec<u8>>) {
        let fetcher = Canned(FetchResponse { status, body });
        let err = block_on(download_contents(&fetcher, "a.glb")).unwrap_err();
        match err {
            EditorError::Fetch { url, .. } => assert_eq!(url, "a.glb"),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn file_fetcher_reads_relative_to_root() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("model.glb"), b"glTF").unwrap();
        let fetcher = FileFetcher::new(dir.path());

        let bytes = block_on(download_contents(&fetcher, "file://model.glb")).unwrap();
        assert_eq!(bytes, b"glTF");

        let missing = block_on(download_contents(&fetcher, "missing.glb"));
        assert!(matches!(missing, Err(EditorError::Fetch { .. })));
    }
}
