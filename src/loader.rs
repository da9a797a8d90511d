use std::sync::Arc;

use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, error};

use crate::controller::{LoadOutcome, LoadRequest, Loaded};
use crate::error::{FetchError, LoadError};
use crate::model::{Catalog, Step};
use crate::source::ContentSource;

/// Fetch and parse the demo catalog.
pub async fn fetch_catalog(source: &dyn ContentSource, path: &str) -> Result<Catalog, LoadError> {
    let parsed = async {
        let text = source.fetch_text(path).await?;
        Ok::<_, FetchError>(serde_json::from_str::<Catalog>(&text)?)
    }
    .await;
    parsed.map_err(|source| LoadError::Catalog {
        path: path.to_string(),
        source,
    })
}

/// Run one request to completion. Failures are folded into the outcome; there is no retry.
pub async fn execute(source: &dyn ContentSource, request: LoadRequest) -> LoadOutcome {
    let token = request.token();
    let loaded = match request {
        LoadRequest::Manifest { path, .. } => {
            let parsed = async {
                let text = source.fetch_text(&path).await?;
                Ok::<_, FetchError>(serde_json::from_str::<Vec<Step>>(&text)?)
            }
            .await;
            Loaded::Manifest(parsed.map_err(|source| LoadError::Manifest { path, source }))
        }
        LoadRequest::Step { index, file, path, .. } => Loaded::Content {
            index,
            result: source
                .fetch_text(&path)
                .await
                .map_err(|source| LoadError::StepFile { file, source }),
        },
        LoadRequest::Terminal { index, path, .. } => {
            let result = source.fetch_text(&path).await;
            Loaded::Content {
                index,
                result: result.map_err(|source| LoadError::TerminalArtifact { path, source }),
            }
        }
    };
    LoadOutcome { token, loaded }
}

/// Execute `request` and hand the outcome back on `tx`.
pub async fn spawn_load(
    source: Arc<dyn ContentSource>,
    request: LoadRequest,
    tx: UnboundedSender<LoadOutcome>,
) {
    let outcome = execute(source.as_ref(), request).await;
    debug!(token = outcome.token, "load finished");
    if tx.send(outcome).is_err() {
        error!("player dropped before load finished");
    }
}
