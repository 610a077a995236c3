//! Upload/download hooks
//!
//! Wrap [`TransferService`] calls in an observable task: observers follow a
//! `watch` channel that moves from `NotStarted` through `Pending` (carrying
//! the latest progress snapshot) to exactly one settled state per call.
//!
//! A hook tracks one call at a time: starting a new call resets its state,
//! so run concurrent transfers through separate hooks.

use serde::Serialize;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::error::{TransferError, TransferResult};
use crate::storage::StoragePath;
use crate::transfer::{ProgressCallback, TransferProgress, TransferService, UploadFile};

#[derive(Debug, Clone, PartialEq)]
pub enum TaskState<T> {
    NotStarted,
    Pending(Option<TransferProgress>),
    Succeeded(T),
    Failed(String),
}

impl<T> TaskState<T> {
    pub fn is_pending(&self) -> bool {
        matches!(self, TaskState::Pending(_))
    }

    pub fn is_settled(&self) -> bool {
        matches!(self, TaskState::Succeeded(_) | TaskState::Failed(_))
    }

    pub fn progress(&self) -> Option<TransferProgress> {
        match self {
            TaskState::Pending(progress) => *progress,
            _ => None,
        }
    }
}

/// User-facing transient notifications.
pub trait Notifier: Send + Sync {
    fn success(&self, message: &str);
    fn error(&self, message: &str);
}

/// Notifier writing through the log facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn success(&self, message: &str) {
        log::info!("{}", message);
    }

    fn error(&self, message: &str) {
        log::error!("{}", message);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadOutcome {
    pub url: String,
    pub file_name: String,
    pub size: u64,
}

/// Transfer failures already read "Upload failed: ..."; prefix the rest.
fn failure_message(prefix: &str, error: &TransferError) -> String {
    match error {
        TransferError::UploadFailed { .. } | TransferError::DownloadFailed { .. } => error.to_string(),
        _ => format!("{}: {}", prefix, error),
    }
}

/// Shared state plumbing for both hooks. `start` resets the state for the
/// next call; overlapping calls would interleave on the same channel.
struct TaskCell<T> {
    state: Arc<watch::Sender<TaskState<T>>>,
}

impl<T: Clone + Send + Sync + 'static> TaskCell<T> {
    fn new() -> Self {
        let (state, _) = watch::channel(TaskState::NotStarted);
        Self {
            state: Arc::new(state),
        }
    }

    fn subscribe(&self) -> watch::Receiver<TaskState<T>> {
        self.state.subscribe()
    }

    fn current(&self) -> TaskState<T> {
        self.state.borrow().clone()
    }

    fn start(&self) -> ProgressCallback {
        self.state.send_replace(TaskState::Pending(None));
        let state = self.state.clone();
        // Each snapshot replaces the previous one.
        Arc::new(move |progress: TransferProgress| {
            state.send_replace(TaskState::Pending(Some(progress)));
        })
    }

    fn settle(&self, result: &TransferResult<T>) {
        let next = match result {
            Ok(value) => TaskState::Succeeded(value.clone()),
            Err(e) => TaskState::Failed(e.to_string()),
        };
        self.state.send_replace(next);
    }
}

/// Observable upload task. One in-flight upload per hook.
pub struct UploadHook {
    service: Arc<TransferService>,
    notifier: Arc<dyn Notifier>,
    cell: TaskCell<UploadOutcome>,
}

impl UploadHook {
    pub fn new(service: Arc<TransferService>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            service,
            notifier,
            cell: TaskCell::new(),
        }
    }

    pub fn state(&self) -> watch::Receiver<TaskState<UploadOutcome>> {
        self.cell.subscribe()
    }

    pub fn progress(&self) -> Option<TransferProgress> {
        self.cell.current().progress()
    }

    pub fn is_pending(&self) -> bool {
        self.cell.current().is_pending()
    }

    pub fn uploaded_url(&self) -> Option<String> {
        match self.cell.current() {
            TaskState::Succeeded(outcome) => Some(outcome.url),
            _ => None,
        }
    }

    pub async fn upload(
        &self,
        file: UploadFile,
        path: StoragePath,
    ) -> TransferResult<UploadOutcome> {
        let on_progress = self.cell.start();

        let result = self
            .service
            .upload(&file, &path, Some(on_progress))
            .await
            .map(|url| UploadOutcome {
                url,
                file_name: file.name.clone(),
                size: file.size(),
            });

        match &result {
            Ok(outcome) => self
                .notifier
                .success(&format!("File uploaded: {}", outcome.file_name)),
            Err(e) => self.notifier.error(&failure_message("Upload failed", e)),
        }
        self.cell.settle(&result);
        result
    }

    /// Fire-and-forget variant; observe the outcome through [`Self::state`].
    pub fn spawn_upload(
        self: &Arc<Self>,
        file: UploadFile,
        path: StoragePath,
    ) -> JoinHandle<TransferResult<UploadOutcome>> {
        let hook = self.clone();
        tokio::spawn(async move { hook.upload(file, path).await })
    }
}

/// Observable download task. One in-flight download per hook.
pub struct DownloadHook {
    service: Arc<TransferService>,
    notifier: Arc<dyn Notifier>,
    cell: TaskCell<String>,
}

impl DownloadHook {
    pub fn new(service: Arc<TransferService>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            service,
            notifier,
            cell: TaskCell::new(),
        }
    }

    /// Settles with the saved file name on success.
    pub fn state(&self) -> watch::Receiver<TaskState<String>> {
        self.cell.subscribe()
    }

    pub fn progress(&self) -> Option<TransferProgress> {
        self.cell.current().progress()
    }

    pub fn is_pending(&self) -> bool {
        self.cell.current().is_pending()
    }

    pub async fn download(&self, url: &str, filename: &str) -> TransferResult<()> {
        let on_progress = self.cell.start();

        let result = self
            .service
            .download(url, filename, Some(on_progress))
            .await
            .map(|()| filename.to_string());

        match &result {
            Ok(_) => self
                .notifier
                .success(&format!("File downloaded: {}", filename)),
            Err(e) => self.notifier.error(&failure_message("Download failed", e)),
        }
        self.cell.settle(&result);
        result.map(|_| ())
    }

    pub fn spawn_download(self: &Arc<Self>, url: String, filename: String) -> JoinHandle<TransferResult<()>> {
        let hook = self.clone();
        tokio::spawn(async move { hook.download(&url, &filename).await })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_is_only_visible_while_pending() {
        let snapshot = TransferProgress::new(5, 10);
        assert_eq!(TaskState::<()>::Pending(snapshot).progress(), snapshot);
        assert_eq!(TaskState::<()>::Pending(None).progress(), None);
        assert_eq!(TaskState::Succeeded(()).progress(), None);
        assert_eq!(TaskState::<()>::Failed("x".into()).progress(), None);
    }

    #[test]
    fn settled_states() {
        assert!(!TaskState::<()>::NotStarted.is_settled());
        assert!(!TaskState::<()>::Pending(None).is_settled());
        assert!(TaskState::Succeeded(()).is_settled());
        assert!(TaskState::<()>::Failed("boom".into()).is_settled());
    }

    #[test]
    fn failure_messages_are_not_double_prefixed() {
        assert_eq!(
            failure_message("Download failed", &TransferError::download("Not Found")),
            "Download failed: Not Found"
        );
        assert_eq!(
            failure_message("Upload failed", &TransferError::Backend("denied".into())),
            "Upload failed: Storage backend error: denied"
        );
    }

    #[test]
    fn cell_replaces_progress_and_settles_once() {
        let cell: TaskCell<u32> = TaskCell::new();
        let rx = cell.subscribe();
        assert_eq!(*rx.borrow(), TaskState::NotStarted);

        let on_progress = cell.start();
        assert_eq!(*rx.borrow(), TaskState::Pending(None));

        on_progress(TransferProgress::new(3, 10).unwrap());
        on_progress(TransferProgress::new(7, 10).unwrap());
        assert_eq!(cell.current().progress().map(|p| p.loaded), Some(7));

        cell.settle(&Ok(42));
        assert_eq!(*rx.borrow(), TaskState::Succeeded(42));
        assert_eq!(cell.current().progress(), None);
    }

    #[test]
    fn restarted_cell_settles_independently() {
        let cell: TaskCell<u32> = TaskCell::new();

        cell.start();
        cell.settle(&Err(TransferError::download("Not Found")));
        assert_eq!(
            cell.current(),
            TaskState::Failed("Download failed: Not Found".into())
        );

        let on_progress = cell.start();
        assert_eq!(cell.current(), TaskState::Pending(None));
        on_progress(TransferProgress::new(1, 2).unwrap());
        cell.settle(&Ok(7));
        assert_eq!(cell.current(), TaskState::Succeeded(7));
    }
}
