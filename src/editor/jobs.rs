use crate::editor::preview::{PreviewModel, PreviewViewer, spawn_model_scene};
use crate::editor::{ASSETS_ROOT, StudioState};
use crate::model::{dispatch_gltf_url, dispatch_model, dispatch_model_dirty};
use crate::viewer::{FileFetcher, GltfModel, HttpFetcher, download_contents};
use anyhow::Context;
use bevy::prelude::*;
use bevy::tasks::block_on;
use std::sync::mpsc::{Receiver, Sender, channel};
use tracing::{error, info};

#[derive(Debug)]
pub struct DownloadResult {
    pub url: String,
    pub bytes: Result<Vec<u8>, String>,
}

pub struct DownloadQueue {
    pub tx: Sender<DownloadResult>,
    pub rx: Receiver<DownloadResult>,
    pub running: bool,
}

impl Default for DownloadQueue {
    fn default() -> Self {
        let (tx, rx) = channel();
        Self {
            tx,
            rx,
            running: false,
        }
    }
}

pub fn is_remote(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

fn fetch_model(url: &str) -> anyhow::Result<Vec<u8>> {
    let bytes = if is_remote(url) {
        block_on(download_contents(&HttpFetcher, url))
    } else {
        block_on(download_contents(&FileFetcher::new(ASSETS_ROOT), url))
    };
    bytes.with_context(|| format!("downloading {url}"))
}

pub fn spawn_model_download(queue: &mut DownloadQueue, url: &str) -> Result<(), String> {
    if queue.running {
        return Err("a model is already loading".to_string());
    }
    let url = url.trim().to_string();
    if url.is_empty() {
        return Err("no model url given".to_string());
    }

    queue.running = true;
    let tx = queue.tx.clone();
    std::thread::spawn(move || {
        let bytes = fetch_model(&url).map_err(|err| format!("{err:#}"));
        let _ = tx.send(DownloadResult { url, bytes });
    });
    Ok(())
}

/// Finishes a download on the main thread: parse, hand the model to the
/// preview, then build thumbnails and record the model in the store.
pub fn poll_finished_downloads(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    mut queue: NonSendMut<DownloadQueue>,
    mut studio: NonSendMut<StudioState>,
    mut viewer: ResMut<PreviewViewer>,
    existing: Query<Entity, With<PreviewModel>>,
) {
    let Ok(result) = queue.rx.try_recv() else {
        return;
    };
    queue.running = false;

    let bytes = match result.bytes {
        Ok(bytes) => bytes,
        Err(err) => {
            error!("{err}");
            studio.status = format!("Load failed: {err}");
            return;
        }
    };
    let model = match GltfModel::from_slice(&bytes) {
        Ok(model) => model,
        Err(err) => {
            error!("{}: {err}", result.url);
            studio.status = format!("Load failed: {err}");
            return;
        }
    };

    viewer.model = Some(model);
    if !is_remote(&result.url) {
        spawn_model_scene(&mut commands, &asset_server, &existing, &result.url);
    }

    let store = &studio.store;
    store.dispatch(dispatch_gltf_url(Some(result.url.clone())));
    match block_on(dispatch_model(&*viewer, studio.settings.thumbnail_size)) {
        Ok(action) => {
            store.dispatch(action);
            store.dispatch(dispatch_model_dirty(false));
            info!("loaded {}", result.url);
            studio.status = format!("Loaded {}", result.url);
        }
        Err(err) => {
            studio.status = format!("Model inspection failed: {err}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("https://example.com/a.glb", true)]
    #[case("http://localhost/a.glb", true)]
    #[case("models/a.glb", false)]
    #[case("file://models/a.glb", false)]
    fn remote_urls(#[case] url: &str, #[case] remote: bool) {
        assert_eq!(is_remote(url), remote);
    }

    #[test]
    fn only_one_download_at_a_time() {
        let mut queue = DownloadQueue::default();
        queue.running = true;
        assert!(spawn_model_download(&mut queue, "models/a.glb").is_err());
    }

    #[test]
    fn blank_url_is_rejected() {
        let mut queue = DownloadQueue::default();
        assert!(spawn_model_download(&mut queue, "   ").is_err());
        assert!(!queue.running);
    }

    #[test]
    fn missing_local_file_reports_back() {
        let mut queue = DownloadQueue::default();
        spawn_model_download(&mut queue, "definitely/not/here.glb").unwrap();
        let result = queue
            .rx
            .recv_timeout(std::time::Duration::from_secs(5))
            .unwrap();
        assert_eq!(result.url, "definitely/not/here.glb");
        let err = result.bytes.unwrap_err();
        assert!(err.contains("downloading definitely/not/here.glb"));
        assert!(err.contains("404"));
    }
}
