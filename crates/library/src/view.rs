//! Library view-model: owns the collection and keeps the displayed groups in
//! step with it.
//!
//! Every operation is synchronous on `&mut self`. Network work is handed back
//! as `'static` futures ([`PendingFetch`], [`PendingWrite`]) that the front end
//! awaits or spawns; the local half of a mutation is already applied when the
//! future is returned, so the groups match the user's action before the
//! store answers.

use std::future::{Future, IntoFuture};
use std::sync::Arc;

use futures_util::future::BoxFuture;
use tracing::{debug, info, warn};

use crate::error::{LibraryError, WriteOp};
use crate::filter::{FilterCriteria, GenreFilter, SortMode, derive, genre_options, retain_genre_selection};
use crate::partition::{DisplayGroups, partition};
use crate::reorder::{ReorderSurface, reconcile};
use crate::store::{LibraryStore, StoreError};
use crate::types::{CatalogResult, EntryId, EntryPayload, EntryUpdate, GameStatus, LibraryEntry, Rating};

/// Loading lifecycle of the collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoadState {
    /// Never loaded, or the last fetch failed.
    #[default]
    Unloaded,
    Loading,
    Loaded,
}

/// Whether a fetch outcome replaced the collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchApplied {
    Applied,
    /// The local collection is already newer than this outcome: a later fetch
    /// was applied, or a local edit, delete or reorder happened after it was
    /// issued. The outcome was dropped; reload if fresher data is needed.
    Stale,
}

/// An in-flight collection fetch, tagged with its generation.
#[must_use = "a fetch does nothing unless awaited and handed to `complete_fetch`"]
pub struct PendingFetch {
    generation: u64,
    future: BoxFuture<'static, Result<Vec<LibraryEntry>, LibraryError>>,
}

impl PendingFetch {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl IntoFuture for PendingFetch {
    type Output = FetchOutcome;
    type IntoFuture = BoxFuture<'static, FetchOutcome>;

    fn into_future(self) -> Self::IntoFuture {
        let PendingFetch { generation, future } = self;
        Box::pin(async move {
            FetchOutcome {
                generation,
                result: future.await,
            }
        })
    }
}

/// Result of a [`PendingFetch`], to be fed back through
/// [`LibraryView::complete_fetch`].
#[derive(Debug)]
pub struct FetchOutcome {
    generation: u64,
    result: Result<Vec<LibraryEntry>, LibraryError>,
}

impl FetchOutcome {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// An in-flight remote write. Resolves to exactly one `Ok` or `Err`.
///
/// Local state was already updated and is not rolled back on failure.
#[must_use = "a write does nothing unless awaited or spawned"]
pub struct PendingWrite {
    op: WriteOp,
    future: BoxFuture<'static, Result<(), StoreError>>,
}

impl PendingWrite {
    fn new<F>(op: WriteOp, future: F) -> Self
    where
        F: Future<Output = Result<(), StoreError>> + Send + 'static,
    {
        Self {
            op,
            future: Box::pin(future),
        }
    }

    pub fn op(&self) -> WriteOp {
        self.op
    }
}

impl IntoFuture for PendingWrite {
    type Output = Result<(), LibraryError>;
    type IntoFuture = BoxFuture<'static, Self::Output>;

    fn into_future(self) -> Self::IntoFuture {
        let PendingWrite { op, future } = self;
        Box::pin(async move {
            future.await.map_err(|source| {
                warn!(%op, error = %source, "remote write failed, keeping local state");
                LibraryError::Persist { op, source }
            })
        })
    }
}

/// Single owner of the in-memory library and its derived display groups.
pub struct LibraryView {
    store: Arc<dyn LibraryStore>,
    entries: Vec<LibraryEntry>,
    state: LoadState,
    /// Shared counter for fetches and local mutations.
    generation: u64,
    latest_fetch: u64,
    applied_fetch: u64,
    last_mutation: u64,
    filter: FilterCriteria,
    sort: SortMode,
    genre_options: Vec<GenreFilter>,
    groups: DisplayGroups,
}

impl LibraryView {
    /// Creates an unloaded view backed by `store`.
    pub fn new(store: Arc<dyn LibraryStore>) -> Self {
        Self {
            store,
            entries: Vec::new(),
            state: LoadState::Unloaded,
            generation: 0,
            latest_fetch: 0,
            applied_fetch: 0,
            last_mutation: 0,
            filter: FilterCriteria::default(),
            sort: SortMode::default(),
            genre_options: vec![GenreFilter::All],
            groups: DisplayGroups::default(),
        }
    }

    /// Sets the initial sort mode.
    pub fn with_sort(mut self, sort: SortMode) -> Self {
        self.sort = sort;
        self
    }

    pub fn load_state(&self) -> LoadState {
        self.state
    }

    /// The whole collection, in store order.
    pub fn entries(&self) -> &[LibraryEntry] {
        &self.entries
    }

    pub fn entry(&self, id: EntryId) -> Option<&LibraryEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn filter(&self) -> &FilterCriteria {
        &self.filter
    }

    pub fn sort(&self) -> SortMode {
        self.sort
    }

    /// Genre choices across the whole collection, `All` first.
    pub fn genre_options(&self) -> &[GenreFilter] {
        &self.genre_options
    }

    /// The active and finished groups under the current criteria.
    pub fn display_groups(&self) -> &DisplayGroups {
        &self.groups
    }

    /// Whether the surface should offer drag-to-reorder right now.
    pub fn reorder_enabled(&self, surface: &impl ReorderSurface) -> bool {
        self.sort == SortMode::Custom && !self.groups.active.is_empty() && surface.supports_drag()
    }

    // -----------------------------------------------------------------------
    // Loading
    // -----------------------------------------------------------------------

    /// Called when the library view becomes visible. Fetches unless loaded.
    pub fn activate(&mut self) -> Option<PendingFetch> {
        if self.state == LoadState::Loaded {
            return None;
        }
        Some(self.reload())
    }

    /// Starts a fetch unconditionally. Loaded data stays visible meanwhile.
    pub fn reload(&mut self) -> PendingFetch {
        if self.state != LoadState::Loaded {
            self.state = LoadState::Loading;
        }
        let store = Arc::clone(&self.store);
        self.begin_fetch(async move { store.fetch_library().await.map_err(LibraryError::Fetch) })
    }

    /// Applies a finished fetch.
    ///
    /// A collection is applied only if it was issued after the last applied
    /// fetch and after the last local mutation, so a late response never
    /// overwrites newer local state. A failed fetch empties the collection
    /// rather than leaving stale data, unless something newer superseded it.
    /// A failed save from [`submit_create`](Self::submit_create) never touches
    /// the collection.
    pub fn complete_fetch(&mut self, outcome: FetchOutcome) -> Result<FetchApplied, LibraryError> {
        let FetchOutcome { generation, result } = outcome;

        match result {
            Ok(entries) => {
                if generation <= self.applied_fetch || generation < self.last_mutation {
                    debug!(
                        generation,
                        applied = self.applied_fetch,
                        last_mutation = self.last_mutation,
                        "discarding stale fetch"
                    );
                    return Ok(FetchApplied::Stale);
                }
                info!(count = entries.len(), "library loaded");
                self.applied_fetch = generation;
                self.entries = entries;
                self.state = LoadState::Loaded;
                self.collection_changed();
                Ok(FetchApplied::Applied)
            }
            Err(err @ LibraryError::Fetch(_)) => {
                if generation != self.latest_fetch || generation < self.last_mutation {
                    debug!(generation, error = %err, "ignoring superseded fetch failure");
                    return Ok(FetchApplied::Stale);
                }
                warn!(error = %err, "library fetch failed");
                self.entries.clear();
                self.state = LoadState::Unloaded;
                self.collection_changed();
                Err(err)
            }
            Err(err) => {
                warn!(error = %err, "library write failed before reload");
                Err(err)
            }
        }
    }

    /// Fetches and applies the collection in one step.
    pub async fn load(&mut self) -> Result<(), LibraryError> {
        let outcome = self.reload().await;
        self.complete_fetch(outcome).map(|_| ())
    }

    // -----------------------------------------------------------------------
    // Criteria (never touch the network)
    // -----------------------------------------------------------------------

    pub fn apply_filter_change(&mut self, filter: FilterCriteria) {
        self.filter = filter;
        self.rederive();
    }

    pub fn apply_sort_change(&mut self, sort: SortMode) {
        self.sort = sort;
        self.rederive();
    }

    // -----------------------------------------------------------------------
    // Mutations
    // -----------------------------------------------------------------------

    /// Applies a drag result to the active group and returns the persist request.
    ///
    /// `visual_order` is every active identifier in its post-drag order.
    pub fn submit_reorder(&mut self, visual_order: Vec<EntryId>) -> Result<PendingWrite, LibraryError> {
        if self.sort != SortMode::Custom {
            return Err(LibraryError::ReorderUnavailable(
                "manual order needs the custom sort mode",
            ));
        }
        if self.groups.active.is_empty() {
            return Err(LibraryError::ReorderUnavailable("active group is empty"));
        }

        let applied = reconcile(&mut self.entries, &visual_order);
        debug!(applied, requested = visual_order.len(), "applied manual order locally");
        self.mark_mutation();
        self.rederive();

        let store = Arc::clone(&self.store);
        Ok(PendingWrite::new(WriteOp::Reorder, async move {
            store.persist_reorder(visual_order).await
        }))
    }

    /// Changes status and rating of an existing entry.
    pub fn submit_edit(&mut self, update: EntryUpdate) -> Result<PendingWrite, LibraryError> {
        let entry = self
            .entries
            .iter_mut()
            .find(|e| e.id == update.id)
            .ok_or(LibraryError::NotFound(update.id))?;

        entry.status = update.status;
        entry.rating = update.rating;
        let payload = entry.to_payload();
        debug!(id = update.id, status = %update.status, rating = %update.rating, "edited entry locally");
        self.mark_mutation();
        self.rederive();

        let store = Arc::clone(&self.store);
        Ok(PendingWrite::new(WriteOp::Save, async move {
            store.save_entry(payload).await
        }))
    }

    /// Removes an entry locally and returns the delete request.
    pub fn submit_delete(&mut self, id: EntryId) -> Result<PendingWrite, LibraryError> {
        let index = self
            .entries
            .iter()
            .position(|e| e.id == id)
            .ok_or(LibraryError::NotFound(id))?;

        let removed = self.entries.remove(index);
        debug!(id, title = %removed.title, "removed entry locally");
        self.mark_mutation();
        self.collection_changed();

        let store = Arc::clone(&self.store);
        Ok(PendingWrite::new(WriteOp::Delete, async move {
            store.delete_entry(id).await
        }))
    }

    /// Adds a catalog game to the library.
    ///
    /// The store assigns the id, so nothing changes locally until the save
    /// succeeds and the follow-up reload is applied via
    /// [`complete_fetch`](Self::complete_fetch).
    pub fn submit_create(
        &mut self,
        result: &CatalogResult,
        status: GameStatus,
        rating: Rating,
    ) -> PendingFetch {
        let payload = EntryPayload::from_catalog(result, status, rating);
        info!(title = %payload.title, %status, "adding game to library");

        let store = Arc::clone(&self.store);
        self.begin_fetch(async move {
            store
                .save_entry(payload)
                .await
                .map_err(LibraryError::persist(WriteOp::Save))?;
            store.fetch_library().await.map_err(LibraryError::Fetch)
        })
    }

    /// Searches the catalog. Blank queries resolve to nothing without a request.
    pub fn search(&self, query: &str) -> BoxFuture<'static, Result<Vec<CatalogResult>, LibraryError>> {
        let query = query.trim().to_owned();
        let store = Arc::clone(&self.store);
        Box::pin(async move {
            if query.is_empty() {
                return Ok(Vec::new());
            }
            store.search_catalog(query).await.map_err(LibraryError::Fetch)
        })
    }

    // -----------------------------------------------------------------------
    // Pipeline
    // -----------------------------------------------------------------------

    fn begin_fetch<F>(&mut self, future: F) -> PendingFetch
    where
        F: Future<Output = Result<Vec<LibraryEntry>, LibraryError>> + Send + 'static,
    {
        self.generation += 1;
        self.latest_fetch = self.generation;
        PendingFetch {
            generation: self.generation,
            future: Box::pin(future),
        }
    }

    /// Makes every fetch issued so far stale.
    fn mark_mutation(&mut self) {
        self.generation += 1;
        self.last_mutation = self.generation;
    }

    /// Recomputes genre options, then the groups.
    fn collection_changed(&mut self) {
        self.genre_options = genre_options(&self.entries);
        self.filter.genre = retain_genre_selection(&self.filter.genre, &self.genre_options);
        self.rederive();
    }

    fn rederive(&mut self) {
        self.groups = partition(derive(&self.entries, &self.filter, self.sort));
        debug!(
            active = self.groups.active.len(),
            finished = self.groups.finished.len(),
            sort = %self.sort,
            "derived display groups"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::StatusFilter;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Search(String),
        Fetch,
        Save(EntryPayload),
        Delete(EntryId),
        Reorder(Vec<EntryId>),
    }

    /// Mock store that records calls and returns canned results.
    ///
    /// Fetches pop from `libraries`; writes pop from `writes` and succeed
    /// once it is drained.
    #[derive(Default)]
    struct MockStore {
        libraries: Mutex<VecDeque<Result<Vec<LibraryEntry>, StoreError>>>,
        writes: Mutex<VecDeque<Result<(), StoreError>>>,
        calls: Mutex<Vec<Call>>,
    }

    impl MockStore {
        fn with_libraries(libraries: Vec<Vec<LibraryEntry>>) -> Arc<Self> {
            let store = Self::default();
            store
                .libraries
                .lock()
                .unwrap()
                .extend(libraries.into_iter().map(Ok));
            Arc::new(store)
        }

        fn push_library(&self, result: Result<Vec<LibraryEntry>, StoreError>) {
            self.libraries.lock().unwrap().push_back(result);
        }

        fn push_write(&self, result: Result<(), StoreError>) {
            self.writes.lock().unwrap().push_back(result);
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }

        fn fetch_count(&self) -> usize {
            self.calls().iter().filter(|c| **c == Call::Fetch).count()
        }

        fn record(&self, call: Call) {
            self.calls.lock().unwrap().push(call);
        }

        fn next_write(&self) -> Result<(), StoreError> {
            self.writes.lock().unwrap().pop_front().unwrap_or(Ok(()))
        }
    }

    impl LibraryStore for MockStore {
        fn search_catalog(
            &self,
            query: String,
        ) -> BoxFuture<'_, Result<Vec<CatalogResult>, StoreError>> {
            self.record(Call::Search(query.clone()));
            Box::pin(async move {
                Ok(vec![CatalogResult {
                    external_id: 1,
                    title: query,
                    image_url: None,
                    genres: vec![],
                    release_year: None,
                    critic_score: None,
                }])
            })
        }

        fn fetch_library(&self) -> BoxFuture<'_, Result<Vec<LibraryEntry>, StoreError>> {
            self.record(Call::Fetch);
            Box::pin(async move {
                self.libraries
                    .lock()
                    .unwrap()
                    .pop_front()
                    .unwrap_or_else(|| Err(StoreError::Http("no mock response available".into())))
            })
        }

        fn save_entry(&self, payload: EntryPayload) -> BoxFuture<'_, Result<(), StoreError>> {
            self.record(Call::Save(payload));
            Box::pin(async move { self.next_write() })
        }

        fn delete_entry(&self, id: EntryId) -> BoxFuture<'_, Result<(), StoreError>> {
            self.record(Call::Delete(id));
            Box::pin(async move { self.next_write() })
        }

        fn persist_reorder(
            &self,
            ordered_ids: Vec<EntryId>,
        ) -> BoxFuture<'_, Result<(), StoreError>> {
            self.record(Call::Reorder(ordered_ids));
            Box::pin(async move { self.next_write() })
        }
    }

    struct Touch(bool);

    impl ReorderSurface for Touch {
        fn supports_drag(&self) -> bool {
            self.0
        }
    }

    fn entry(id: i64, status: GameStatus) -> LibraryEntry {
        LibraryEntry {
            id,
            external_id: Some(id as i32 * 100),
            title: format!("game {id}"),
            image_url: None,
            genres: None,
            status,
            rating: Rating::UNRATED,
            list_order: None,
        }
    }

    fn with_genres(mut entry: LibraryEntry, genres: &str) -> LibraryEntry {
        entry.genres = Some(genres.into());
        entry
    }

    fn active_ids(view: &LibraryView) -> Vec<EntryId> {
        view.display_groups().active.iter().map(|e| e.id).collect()
    }

    fn finished_ids(view: &LibraryView) -> Vec<EntryId> {
        view.display_groups().finished.iter().map(|e| e.id).collect()
    }

    async fn loaded_view(store: &Arc<MockStore>) -> LibraryView {
        let mut view = LibraryView::new(store.clone());
        view.load().await.unwrap();
        view
    }

    // -----------------------------------------------------------------------
    // Loading lifecycle
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn activate_fetches_then_loaded() {
        let store = MockStore::with_libraries(vec![vec![
            entry(1, GameStatus::Backlog),
            entry(2, GameStatus::Completed),
        ]]);
        let mut view = LibraryView::new(store.clone());
        assert_eq!(view.load_state(), LoadState::Unloaded);

        let fetch = view.activate().expect("unloaded view must fetch");
        assert_eq!(view.load_state(), LoadState::Loading);

        let applied = view.complete_fetch(fetch.await).unwrap();
        assert_eq!(applied, FetchApplied::Applied);
        assert_eq!(view.load_state(), LoadState::Loaded);
        assert_eq!(active_ids(&view), vec![1]);
        assert_eq!(finished_ids(&view), vec![2]);

        assert!(view.activate().is_none());
        assert_eq!(store.fetch_count(), 1);
    }

    #[tokio::test]
    async fn fetch_failure_clears_collection() {
        let store = MockStore::with_libraries(vec![vec![entry(1, GameStatus::Backlog)]]);
        let mut view = loaded_view(&store).await;
        store.push_library(Err(StoreError::Http("connection refused".into())));

        let err = view.load().await.unwrap_err();
        assert!(matches!(err, LibraryError::Fetch(_)));
        assert_eq!(view.load_state(), LoadState::Unloaded);
        assert!(view.entries().is_empty());
        assert!(view.display_groups().is_empty());
        assert!(view.activate().is_some());
    }

    #[tokio::test]
    async fn stale_fetch_is_discarded() {
        let store = MockStore::with_libraries(vec![
            vec![entry(1, GameStatus::Backlog), entry(2, GameStatus::Backlog)],
            vec![entry(1, GameStatus::Backlog)],
        ]);
        let mut view = LibraryView::new(store.clone());

        let first = view.activate().unwrap();
        let second = view.reload();
        assert!(second.generation() > first.generation());

        // The newer request resolves first; the older one arrives late.
        let newer = second.await;
        let older = first.await;

        assert_eq!(view.complete_fetch(newer).unwrap(), FetchApplied::Applied);
        assert_eq!(view.complete_fetch(older).unwrap(), FetchApplied::Stale);
        assert_eq!(active_ids(&view), vec![2, 1]);
    }

    #[tokio::test]
    async fn older_fetch_applies_when_it_arrives_first() {
        let store = MockStore::with_libraries(vec![
            vec![entry(1, GameStatus::Backlog)],
            vec![entry(1, GameStatus::Backlog), entry(2, GameStatus::Backlog)],
        ]);
        let mut view = LibraryView::new(store.clone());

        let first = view.activate().unwrap();
        let second = view.reload();
        let older = first.await;
        let newer = second.await;

        assert_eq!(view.complete_fetch(older).unwrap(), FetchApplied::Applied);
        assert_eq!(view.complete_fetch(newer).unwrap(), FetchApplied::Applied);
        assert_eq!(active_ids(&view), vec![2, 1]);
    }

    #[tokio::test]
    async fn fetch_issued_before_edit_does_not_undo_it() {
        let store = MockStore::with_libraries(vec![
            vec![entry(1, GameStatus::Backlog)],
            // Snapshot taken before the edit reached the store.
            vec![entry(1, GameStatus::Backlog)],
        ]);
        let mut view = loaded_view(&store).await;

        let fetch = view.reload();
        let write = view
            .submit_edit(EntryUpdate {
                id: 1,
                status: GameStatus::Completed,
                rating: Rating::new(5).unwrap(),
            })
            .unwrap();
        let outcome = fetch.await;
        write.await.unwrap();

        assert_eq!(view.complete_fetch(outcome).unwrap(), FetchApplied::Stale);
        assert_eq!(view.entry(1).unwrap().status, GameStatus::Completed);
        assert_eq!(view.entry(1).unwrap().rating.get(), 5);
        assert_eq!(finished_ids(&view), vec![1]);

        // A fetch issued after the edit applies normally.
        store.push_library(Ok(vec![entry(1, GameStatus::Completed)]));
        view.load().await.unwrap();
        assert_eq!(finished_ids(&view), vec![1]);
    }

    #[tokio::test]
    async fn fetch_issued_before_delete_or_reorder_is_stale() {
        let store = MockStore::with_libraries(vec![
            vec![entry(1, GameStatus::Backlog), entry(2, GameStatus::Backlog)],
            vec![entry(1, GameStatus::Backlog), entry(2, GameStatus::Backlog)],
            vec![entry(1, GameStatus::Backlog), entry(2, GameStatus::Backlog)],
        ]);
        let mut view = loaded_view(&store).await;
        view.apply_sort_change(SortMode::Custom);

        let fetch = view.reload();
        let _reorder = view.submit_reorder(vec![1, 2]).unwrap();
        assert_eq!(view.complete_fetch(fetch.await).unwrap(), FetchApplied::Stale);
        assert_eq!(view.entry(1).unwrap().list_order, Some(0));

        let fetch = view.reload();
        let _delete = view.submit_delete(2).unwrap();
        assert_eq!(view.complete_fetch(fetch.await).unwrap(), FetchApplied::Stale);
        assert!(view.entry(2).is_none());
    }

    #[tokio::test]
    async fn failed_create_does_not_discard_activation() {
        let store = MockStore::with_libraries(vec![vec![entry(1, GameStatus::Backlog)]]);
        store.push_write(Err(StoreError::Http("connection reset".into())));
        let mut view = LibraryView::new(store.clone());

        let activation = view.activate().unwrap();
        let create = view.submit_create(&hit(), GameStatus::Backlog, Rating::UNRATED);

        let err = view.complete_fetch(create.await).unwrap_err();
        assert!(matches!(err, LibraryError::Persist { op: WriteOp::Save, .. }));
        assert_eq!(view.load_state(), LoadState::Loading);

        assert_eq!(
            view.complete_fetch(activation.await).unwrap(),
            FetchApplied::Applied
        );
        assert_eq!(view.load_state(), LoadState::Loaded);
        assert_eq!(active_ids(&view), vec![1]);
    }

    #[tokio::test]
    async fn activation_arriving_before_create_reload_is_kept() {
        let store = MockStore::with_libraries(vec![
            vec![entry(1, GameStatus::Backlog)],
            vec![entry(1, GameStatus::Backlog), entry(2, GameStatus::Playing)],
        ]);
        let mut view = LibraryView::new(store.clone());

        let activation = view.activate().unwrap();
        let create = view.submit_create(&hit(), GameStatus::Playing, Rating::UNRATED);

        assert_eq!(
            view.complete_fetch(activation.await).unwrap(),
            FetchApplied::Applied
        );
        assert_eq!(active_ids(&view), vec![1]);
        assert_eq!(view.complete_fetch(create.await).unwrap(), FetchApplied::Applied);
        assert_eq!(active_ids(&view), vec![2, 1]);
    }

    #[tokio::test]
    async fn superseded_fetch_failure_keeps_collection() {
        let store = MockStore::with_libraries(vec![vec![entry(1, GameStatus::Backlog)]]);
        let mut view = loaded_view(&store).await;
        store.push_library(Err(StoreError::Http("timeout".into())));
        store.push_library(Ok(vec![entry(1, GameStatus::Backlog)]));

        let failing = view.reload();
        let fresh = view.reload();
        let failed = failing.await;
        let fresh = fresh.await;

        assert_eq!(view.complete_fetch(failed).unwrap(), FetchApplied::Stale);
        assert_eq!(view.load_state(), LoadState::Loaded);
        assert_eq!(view.complete_fetch(fresh).unwrap(), FetchApplied::Applied);
        assert_eq!(active_ids(&view), vec![1]);
    }

    // -----------------------------------------------------------------------
    // Criteria
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn criteria_changes_never_fetch() {
        let store = MockStore::with_libraries(vec![vec![
            entry(1, GameStatus::Backlog),
            entry(2, GameStatus::Playing),
            entry(3, GameStatus::Dropped),
        ]]);
        let mut view = loaded_view(&store).await;

        view.apply_filter_change(FilterCriteria {
            status: StatusFilter::Only(GameStatus::Playing),
            ..Default::default()
        });
        assert_eq!(active_ids(&view), vec![2]);
        assert!(finished_ids(&view).is_empty());

        view.apply_sort_change(SortMode::NameAsc);
        view.apply_filter_change(FilterCriteria::default());
        assert_eq!(active_ids(&view), vec![1, 2]);
        assert_eq!(store.fetch_count(), 1);
    }

    #[tokio::test]
    async fn genre_options_cover_whole_collection() {
        let store = MockStore::with_libraries(vec![vec![
            with_genres(entry(1, GameStatus::Backlog), "RPG, Action"),
            with_genres(entry(2, GameStatus::Backlog), "Action"),
        ]]);
        let mut view = loaded_view(&store).await;

        view.apply_filter_change(FilterCriteria {
            genre: GenreFilter::Only("RPG".into()),
            ..Default::default()
        });
        assert_eq!(active_ids(&view), vec![1]);

        let labels: Vec<&str> = view.genre_options().iter().map(GenreFilter::label).collect();
        assert_eq!(labels, vec!["ALL", "Action", "RPG"]);
    }

    #[tokio::test]
    async fn genre_selection_kept_across_reload_and_reset_when_gone() {
        let store = MockStore::with_libraries(vec![
            vec![
                with_genres(entry(1, GameStatus::Backlog), "RPG"),
                with_genres(entry(2, GameStatus::Backlog), "Puzzle"),
            ],
            vec![
                with_genres(entry(1, GameStatus::Backlog), "RPG"),
                with_genres(entry(2, GameStatus::Backlog), "Puzzle"),
            ],
        ]);
        let mut view = loaded_view(&store).await;
        let rpg = GenreFilter::Only("RPG".into());
        view.apply_filter_change(FilterCriteria {
            genre: rpg.clone(),
            ..Default::default()
        });

        view.load().await.unwrap();
        assert_eq!(view.filter().genre, rpg);

        let _write = view.submit_delete(1).unwrap();
        assert_eq!(view.filter().genre, GenreFilter::All);
        assert_eq!(active_ids(&view), vec![2]);
    }

    // -----------------------------------------------------------------------
    // Reorder
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn reorder_round_trip() {
        let store = MockStore::with_libraries(vec![vec![
            entry(1, GameStatus::Backlog),
            entry(2, GameStatus::Backlog),
        ]]);
        let mut view = loaded_view(&store).await;
        assert_eq!(active_ids(&view), vec![2, 1]);

        view.apply_sort_change(SortMode::Custom);
        assert_eq!(active_ids(&view), vec![2, 1]);

        let write = view.submit_reorder(vec![1, 2]).unwrap();
        // Local result is visible before the request resolves.
        assert_eq!(active_ids(&view), vec![1, 2]);
        assert_eq!(view.entry(1).unwrap().list_order, Some(0));
        assert_eq!(view.entry(2).unwrap().list_order, Some(1));

        write.await.unwrap();
        assert_eq!(store.calls().last(), Some(&Call::Reorder(vec![1, 2])));
        assert_eq!(store.fetch_count(), 1);
    }

    #[tokio::test]
    async fn reorder_requires_custom_sort() {
        let store = MockStore::with_libraries(vec![vec![
            entry(1, GameStatus::Backlog),
            entry(2, GameStatus::Backlog),
        ]]);
        let mut view = loaded_view(&store).await;

        let err = view.submit_reorder(vec![1, 2]).err().unwrap();
        assert!(matches!(err, LibraryError::ReorderUnavailable(_)));
        assert!(view.entries().iter().all(|e| e.list_order.is_none()));
        assert!(!store.calls().iter().any(|c| matches!(c, Call::Reorder(_))));
    }

    #[tokio::test]
    async fn reorder_requires_non_empty_active_group() {
        let store = MockStore::with_libraries(vec![vec![entry(1, GameStatus::Completed)]]);
        let mut view = loaded_view(&store).await.with_sort(SortMode::Custom);
        view.apply_sort_change(SortMode::Custom);

        assert!(!view.reorder_enabled(&Touch(true)));
        assert!(matches!(
            view.submit_reorder(vec![]),
            Err(LibraryError::ReorderUnavailable(_))
        ));
    }

    #[tokio::test]
    async fn failed_reorder_keeps_local_order() {
        let store = MockStore::with_libraries(vec![vec![
            entry(1, GameStatus::Backlog),
            entry(2, GameStatus::Playing),
        ]]);
        store.push_write(Err(StoreError::Rejected {
            status: 500,
            body: "boom".into(),
        }));
        let mut view = loaded_view(&store).await;
        view.apply_sort_change(SortMode::Custom);

        let write = view.submit_reorder(vec![1, 2]).unwrap();
        assert_eq!(write.op(), WriteOp::Reorder);

        let result = write.await;
        assert!(matches!(
            result,
            Err(LibraryError::Persist {
                op: WriteOp::Reorder,
                ..
            })
        ));
        assert_eq!(view.entry(1).unwrap().list_order, Some(0));
        assert_eq!(view.entry(2).unwrap().list_order, Some(1));
        assert_eq!(active_ids(&view), vec![1, 2]);
    }

    #[tokio::test]
    async fn reorder_enabled_needs_drag_support() {
        let store = MockStore::with_libraries(vec![vec![entry(1, GameStatus::Backlog)]]);
        let mut view = loaded_view(&store).await;

        assert!(!view.reorder_enabled(&Touch(true)));
        view.apply_sort_change(SortMode::Custom);
        assert!(view.reorder_enabled(&Touch(true)));
        assert!(!view.reorder_enabled(&Touch(false)));
    }

    // -----------------------------------------------------------------------
    // Edit / delete / create
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn edit_moves_entry_between_groups_without_refetch() {
        let mut ordered = entry(1, GameStatus::Playing);
        ordered.list_order = Some(3);
        let store = MockStore::with_libraries(vec![vec![ordered, entry(2, GameStatus::Backlog)]]);
        let mut view = loaded_view(&store).await;

        let update = EntryUpdate {
            id: 1,
            status: GameStatus::Completed,
            rating: Rating::new(5).unwrap(),
        };
        let write = view.submit_edit(update).unwrap();
        assert_eq!(active_ids(&view), vec![2]);
        assert_eq!(finished_ids(&view), vec![1]);

        write.await.unwrap();
        let Some(Call::Save(payload)) = store.calls().last().cloned() else {
            panic!("expected a save call");
        };
        assert_eq!(payload.id, Some(1));
        assert_eq!(payload.external_id, Some(100));
        assert_eq!(payload.status, GameStatus::Completed);
        assert_eq!(payload.rating.get(), 5);
        assert_eq!(payload.list_order, Some(3));
        assert_eq!(store.fetch_count(), 1);
    }

    #[tokio::test]
    async fn edit_unknown_entry_is_rejected_locally() {
        let store = MockStore::with_libraries(vec![vec![entry(1, GameStatus::Backlog)]]);
        let mut view = loaded_view(&store).await;

        let update = EntryUpdate {
            id: 42,
            status: GameStatus::Dropped,
            rating: Rating::UNRATED,
        };
        assert!(matches!(view.submit_edit(update), Err(LibraryError::NotFound(42))));
        assert_eq!(store.calls(), vec![Call::Fetch]);
    }

    #[tokio::test]
    async fn delete_removes_from_groups_without_refetch() {
        let store = MockStore::with_libraries(vec![vec![
            entry(1, GameStatus::Backlog),
            entry(2, GameStatus::Dropped),
        ]]);
        let mut view = loaded_view(&store).await;

        let write = view.submit_delete(2).unwrap();
        assert!(!view.display_groups().contains(2));
        assert_eq!(view.display_groups().len(), 1);

        write.await.unwrap();
        assert_eq!(store.calls().last(), Some(&Call::Delete(2)));
        assert_eq!(store.fetch_count(), 1);
    }

    #[tokio::test]
    async fn failed_delete_is_not_rolled_back() {
        let store = MockStore::with_libraries(vec![vec![entry(1, GameStatus::Backlog)]]);
        store.push_write(Err(StoreError::Http("timeout".into())));
        let mut view = loaded_view(&store).await;

        let result = view.submit_delete(1).unwrap().await;
        assert!(matches!(
            result,
            Err(LibraryError::Persist {
                op: WriteOp::Delete,
                ..
            })
        ));
        assert!(view.entry(1).is_none());
    }

    fn hit() -> CatalogResult {
        CatalogResult {
            external_id: 3328,
            title: "The Witcher 3".into(),
            image_url: Some("https://example.com/w3.jpg".into()),
            genres: vec!["RPG".into(), "Action".into()],
            release_year: Some(2015),
            critic_score: Some(92),
        }
    }

    #[tokio::test]
    async fn create_saves_then_reloads() {
        let created = LibraryEntry {
            genres: Some("RPG, Action".into()),
            ..entry(5, GameStatus::Playing)
        };
        let store = MockStore::with_libraries(vec![
            vec![entry(1, GameStatus::Backlog)],
            vec![entry(1, GameStatus::Backlog), created],
        ]);
        let mut view = loaded_view(&store).await;

        let fetch = view.submit_create(&hit(), GameStatus::Playing, Rating::new(4).unwrap());
        // Nothing changes until the store has assigned an id.
        assert_eq!(view.entries().len(), 1);

        let applied = view.complete_fetch(fetch.await).unwrap();
        assert_eq!(applied, FetchApplied::Applied);
        assert_eq!(active_ids(&view), vec![5, 1]);

        let calls = store.calls();
        let Call::Save(payload) = &calls[1] else {
            panic!("expected save before reload, got {calls:?}");
        };
        assert_eq!(payload.id, None);
        assert_eq!(payload.external_id, Some(3328));
        assert_eq!(payload.genres.as_deref(), Some("RPG, Action"));
        assert_eq!(payload.rating.get(), 4);
        assert_eq!(calls[2], Call::Fetch);

        let labels: Vec<&str> = view.genre_options().iter().map(GenreFilter::label).collect();
        assert_eq!(labels, vec!["ALL", "Action", "RPG"]);
    }

    #[tokio::test]
    async fn failed_create_keeps_collection() {
        let store = MockStore::with_libraries(vec![vec![entry(1, GameStatus::Backlog)]]);
        store.push_write(Err(StoreError::Rejected {
            status: 400,
            body: "bad payload".into(),
        }));
        let mut view = loaded_view(&store).await;

        let fetch = view.submit_create(&hit(), GameStatus::Backlog, Rating::UNRATED);
        let err = view.complete_fetch(fetch.await).unwrap_err();

        assert!(matches!(err, LibraryError::Persist { op: WriteOp::Save, .. }));
        assert_eq!(view.load_state(), LoadState::Loaded);
        assert_eq!(active_ids(&view), vec![1]);
        assert_eq!(store.fetch_count(), 1);
    }

    #[tokio::test]
    async fn blank_search_skips_store() {
        let store = Arc::new(MockStore::default());
        let view = LibraryView::new(store.clone());

        assert!(view.search("   ").await.unwrap().is_empty());
        assert!(store.calls().is_empty());

        let results = view.search(" zelda ").await.unwrap();
        assert_eq!(results[0].title, "zelda");
        assert_eq!(store.calls(), vec![Call::Search("zelda".into())]);
    }
}
