//! Change-feed consumers keeping a [`SemanticMirror`] eventually consistent

use super::store::SemanticMirror;
use crate::graph::GraphEvent;
use std::sync::Arc;
use tokio::sync::mpsc::error::TryRecvError;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Apply every event currently queued on the feed, without waiting for more.
///
/// Returns the number of events applied. Usable without a tokio runtime.
pub fn drain(receiver: &mut UnboundedReceiver<GraphEvent>, mirror: &mut SemanticMirror) -> usize {
    let mut applied = 0;
    loop {
        match receiver.try_recv() {
            Ok(event) => {
                if apply_logged(mirror, &event) {
                    applied += 1;
                }
            }
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
        }
    }
    debug!("Drained {} graph events into the mirror", applied);
    applied
}

/// Apply events until every sender is dropped. Returns the number applied.
pub async fn run_synchronizer(
    mut receiver: UnboundedReceiver<GraphEvent>,
    mirror: Arc<RwLock<SemanticMirror>>,
) -> usize {
    let mut applied = 0;
    while let Some(event) = receiver.recv().await {
        let mut mirror = mirror.write().await;
        if apply_logged(&mut mirror, &event) {
            applied += 1;
        }
    }
    info!("Mirror synchronizer stopped after {} events", applied);
    applied
}

/// Run [`run_synchronizer`] as a background task on the current runtime
pub fn spawn_synchronizer(
    receiver: UnboundedReceiver<GraphEvent>,
    mirror: Arc<RwLock<SemanticMirror>>,
) -> JoinHandle<usize> {
    tokio::spawn(run_synchronizer(receiver, mirror))
}

fn apply_logged(mirror: &mut SemanticMirror, event: &GraphEvent) -> bool {
    match mirror.apply(event) {
        Ok(()) => true,
        Err(e) => {
            warn!("Mirror could not project graph event: {}", e);
            false
        }
    }
}
