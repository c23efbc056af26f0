use std::path::PathBuf;

use chrono::Utc;
use newsdesk_core::{Effect, FetchFailure, Msg, ShareRequest, ShareResult, StoreReport};
use newsdesk_engine::{
    export_saved_articles, EngineEvent, EngineHandle, FetchError, RemoveOutcome, SaveOutcome,
    SavedArticleStore, Storage, StoreError, TagOutcome,
};
use newsdesk_logging::{desk_error, desk_info, desk_warn};

use super::share::{ShareError, Sharer};

/// Executes effects against the engine and the saved-article store and turns
/// their outcomes back into messages.
pub struct EffectRunner<S: Storage> {
    engine: EngineHandle,
    store: SavedArticleStore<S>,
    export_dir: PathBuf,
    sharer: Box<dyn Sharer>,
}

impl<S: Storage> EffectRunner<S> {
    pub fn new(
        engine: EngineHandle,
        store: SavedArticleStore<S>,
        export_dir: PathBuf,
        sharer: Box<dyn Sharer>,
    ) -> Self {
        Self {
            engine,
            store,
            export_dir,
            sharer,
        }
    }

    /// Messages that seed the state with what the store loaded at open.
    pub fn startup_messages(&self, load_error: Option<StoreError>) -> Vec<Msg> {
        let mut msgs = vec![Msg::SavedArticlesChanged(self.store.articles().to_vec())];
        if let Some(err) = load_error {
            desk_error!("Error loading saved articles: {}", err);
            msgs.push(Msg::Store(StoreReport::LoadRecovered(err.to_string())));
        }
        msgs
    }

    pub fn run(&mut self, effect: Effect) -> Vec<Msg> {
        match effect {
            Effect::FetchNews {
                generation,
                request,
            } => {
                desk_info!(
                    "Fetch generation={} category={} query={:?}",
                    generation,
                    request.category,
                    request.query
                );
                self.engine.fetch(generation, request);
                Vec::new()
            }
            Effect::SaveArticle(article) => match self.store.save(article, Utc::now()) {
                Ok(SaveOutcome::Saved(saved)) => {
                    self.changed(StoreReport::Saved { id: saved.id })
                }
                Ok(SaveOutcome::AlreadySaved) => vec![Msg::Store(StoreReport::AlreadySaved)],
                Err(err) => {
                    desk_error!("Error saving article: {}", err);
                    vec![Msg::Store(StoreReport::SaveFailed(err.to_string()))]
                }
            },
            Effect::RemoveSaved(id) => match self.store.remove(id) {
                Ok(RemoveOutcome::Removed(_)) => self.changed(StoreReport::Removed),
                Ok(RemoveOutcome::NotFound) => {
                    desk_warn!("Remove ignored; no saved article with id={}", id);
                    vec![Msg::Store(StoreReport::RemoveNotFound)]
                }
                Err(err) => {
                    desk_error!("Error removing article id={}: {}", id, err);
                    vec![Msg::Store(StoreReport::RemoveFailed(err.to_string()))]
                }
            },
            Effect::UpdateTags { id, tags } => match self.store.set_tags(id, &tags) {
                Ok(TagOutcome::Updated) => self.changed(StoreReport::TagsUpdated),
                Ok(TagOutcome::NotFound) => {
                    desk_warn!("Tag edit ignored; no saved article with id={}", id);
                    vec![Msg::Store(StoreReport::TagsNotFound)]
                }
                Err(err) => {
                    desk_error!("Error updating tags for id={}: {}", id, err);
                    vec![Msg::Store(StoreReport::TagsFailed(err.to_string()))]
                }
            },
            Effect::ExportSaved => {
                let result = export_saved_articles(&self.export_dir, self.store.articles())
                    .map_err(|err| {
                        desk_error!("Error exporting articles: {}", err);
                        err.to_string()
                    });
                if let Ok(path) = &result {
                    desk_info!("Exported {} articles to {:?}", self.store.len(), path);
                }
                vec![Msg::ExportFinished(result)]
            }
            Effect::Share(request) => vec![Msg::ShareFinished(self.share(&request))],
            Effect::Quit => Vec::new(),
        }
    }

    /// Drains finished fetches and picks up writes made by other instances.
    pub fn poll(&mut self) -> Vec<Msg> {
        let mut msgs = Vec::new();
        while let Some(event) = self.engine.try_recv() {
            match event {
                EngineEvent::FetchCompleted { generation, result } => {
                    msgs.push(fetch_message(generation, result));
                }
            }
        }

        match self.store.sync_external() {
            Ok(false) => {}
            Ok(true) => {
                let count = self.store.len();
                msgs.push(Msg::SavedArticlesChanged(self.store.articles().to_vec()));
                msgs.push(Msg::Store(StoreReport::Reloaded { count }));
            }
            Err(err @ StoreError::Parse(_)) => {
                desk_error!("Error loading saved articles: {}", err);
                msgs.push(Msg::SavedArticlesChanged(Vec::new()));
                msgs.push(Msg::Store(StoreReport::LoadRecovered(err.to_string())));
            }
            Err(err) => desk_warn!("Checking for external changes failed: {}", err),
        }
        msgs
    }

    fn changed(&self, report: StoreReport) -> Vec<Msg> {
        vec![
            Msg::SavedArticlesChanged(self.store.articles().to_vec()),
            Msg::Store(report),
        ]
    }

    fn share(&mut self, request: &ShareRequest) -> ShareResult {
        match self.sharer.share(request) {
            Ok(()) => ShareResult::Shared,
            Err(ShareError::Unsupported) => match self.sharer.copy_to_clipboard(&request.url) {
                Ok(()) => ShareResult::CopiedToClipboard,
                Err(err) => {
                    desk_error!("Error sharing article: {}", err);
                    ShareResult::Failed(err.to_string())
                }
            },
            Err(err) => {
                desk_error!("Error sharing article: {}", err);
                ShareResult::Failed(err.to_string())
            }
        }
    }
}

pub(crate) fn fetch_message(
    generation: u64,
    result: Result<Vec<newsdesk_core::Article>, FetchError>,
) -> Msg {
    let result = result.map_err(|err| {
        desk_warn!("Fetch generation={} failed: {}", generation, err);
        FetchFailure {
            class: err.kind.class(),
            message: err.message,
        }
    });
    Msg::FetchCompleted { generation, result }
}
