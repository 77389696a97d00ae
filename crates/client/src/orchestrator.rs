//! Async driver that sequences client calls around the [`Session`] reducer.
//!
//! The orchestrator is built for a single-threaded event loop: it keeps the
//! session in a `RefCell` and never holds a borrow across an `.await`, so
//! concurrent intents interleave only at network boundaries. Run it on a
//! current-thread runtime (or a `LocalSet`) and drive overlapping intents
//! with `tokio::join!` or `select!`. Dropping an intent future before it
//! completes rolls back its in-flight marks, so the intent can be retried.
//!
//! Searches may overlap; the session keeps only the newest. Filter loads and
//! mutations go through a single lane so the backend never sees two of them
//! at once. Cart requests for different products run independently.

use std::cell::{Ref, RefCell};

use healthy_food_core::{Product, Store};
use tokio::sync::Mutex;
use tracing::{instrument, warn};

use crate::api::{
    ApiClient, CartClient, CartService, FilterStore, FilterStoreClient, ProductSearch,
    SearchClient,
};
use crate::session::{Effect, FilterAction, Session};

/// Orchestrator wired to the real REST clients.
pub type ApiOrchestrator = Orchestrator<FilterStoreClient, SearchClient, CartClient>;

/// Holds a begun ticket until its response is applied.
///
/// Dropped while still armed (the intent future was cancelled), it hands the
/// ticket back to the session so in-flight marks are cleared.
struct InFlight<'a, T> {
    session: &'a RefCell<Session>,
    ticket: Option<T>,
    abandon: fn(&mut Session, &T),
}

impl<'a, T> InFlight<'a, T> {
    const fn new(session: &'a RefCell<Session>, ticket: T, abandon: fn(&mut Session, &T)) -> Self {
        Self {
            session,
            ticket: Some(ticket),
            abandon,
        }
    }

    /// Disarm and return the ticket for completion.
    fn finish(mut self) -> Option<T> {
        self.ticket.take()
    }
}

impl<T> Drop for InFlight<'_, T> {
    fn drop(&mut self) {
        let Some(ticket) = self.ticket.take() else {
            return;
        };
        match self.session.try_borrow_mut() {
            Ok(mut session) => (self.abandon)(&mut session, &ticket),
            Err(_) => warn!("Session borrowed while cancelling an intent; in-flight mark kept"),
        }
    }
}

/// Coordinates searches, filter changes and cart requests for one session.
pub struct Orchestrator<F, S, C> {
    session: RefCell<Session>,
    filter_store: F,
    search: S,
    cart: C,
    filter_lane: Mutex<()>,
}

impl ApiOrchestrator {
    /// Build an orchestrator whose three clients share one transport.
    #[must_use]
    pub fn from_api(session: Session, api: &ApiClient) -> Self {
        Self::new(session, api.filters(), api.search(), api.cart())
    }
}

impl<F, S, C> Orchestrator<F, S, C>
where
    F: FilterStore,
    S: ProductSearch,
    C: CartService,
{
    pub fn new(session: Session, filter_store: F, search: S, cart: C) -> Self {
        Self {
            session: RefCell::new(session),
            filter_store,
            search,
            cart,
            filter_lane: Mutex::new(()),
        }
    }

    /// Read access to the session. Drop the guard before awaiting.
    pub fn session(&self) -> Ref<'_, Session> {
        self.session.borrow()
    }

    /// Store the next search will use unless one is given explicitly.
    pub fn store(&self) -> Store {
        self.session.borrow().store()
    }

    pub fn set_store(&self, store: Store) {
        self.session.borrow_mut().set_store(store);
    }

    /// Startup: populate filters from the backend.
    pub async fn start(&self) {
        self.load_filters().await;
    }

    /// Reload filters. Failures are logged and leave filters unchanged.
    #[instrument(skip(self))]
    pub async fn load_filters(&self) {
        let _lane = self.filter_lane.lock().await;
        let user_id = self.session.borrow().user_id().clone();

        let outcome = self.filter_store.load_filters(&user_id).await;

        self.session.borrow_mut().apply_filters_loaded(outcome);
    }

    /// Search the currently selected store.
    pub async fn search(&self, query: &str) -> Vec<Effect> {
        let store = self.store();
        self.search_in(query, store).await
    }

    /// Search a specific store. Blank queries do nothing.
    #[instrument(skip(self))]
    pub async fn search_in(&self, query: &str, store: Store) -> Vec<Effect> {
        let ticket = self.session.borrow_mut().begin_search(query, store);
        let Some(ticket) = ticket else {
            return Vec::new();
        };
        let request = ticket.request.clone();
        let in_flight = InFlight::new(&self.session, ticket, Session::abandon_search);

        let outcome = self.search.search(&request).await;

        let Some(ticket) = in_flight.finish() else {
            return Vec::new();
        };
        self.session.borrow_mut().complete_search(&ticket, outcome)
    }

    pub async fn add_filter(&self, term: &str) -> Vec<Effect> {
        self.change_filter(FilterAction::Add, term).await
    }

    pub async fn remove_filter(&self, term: &str) -> Vec<Effect> {
        self.change_filter(FilterAction::Remove, term).await
    }

    #[instrument(skip(self))]
    async fn change_filter(&self, action: FilterAction, term: &str) -> Vec<Effect> {
        let ticket = self.session.borrow_mut().begin_filter_change(action, term);
        let Some(ticket) = ticket else {
            return Vec::new();
        };

        let _lane = self.filter_lane.lock().await;
        let user_id = self.session.borrow().user_id().clone();
        let term = ticket.filter.as_str();

        let outcome = match action {
            FilterAction::Add => self.filter_store.add_filter(&user_id, term).await,
            FilterAction::Remove => self.filter_store.remove_filter(&user_id, term).await,
        };

        self.session
            .borrow_mut()
            .complete_filter_change(&ticket, outcome)
    }

    /// Ask the backend to prepare a cart-add, then open the product page.
    ///
    /// Products without a URL, or with a request already pending, do nothing.
    #[instrument(skip(self, product), fields(product = %product.name))]
    pub async fn add_to_cart(&self, product: &Product) -> Vec<Effect> {
        let ticket = self.session.borrow_mut().begin_cart_add(product);
        let Some(ticket) = ticket else {
            return Vec::new();
        };
        let product_url = ticket.product_url.clone();
        let in_flight = InFlight::new(&self.session, ticket, Session::abandon_cart_add);

        let outcome = self.cart.request_cart_add(&product_url).await;

        let Some(ticket) = in_flight.finish() else {
            return Vec::new();
        };
        self.session.borrow_mut().complete_cart_add(&ticket, outcome)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex as StdMutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use healthy_food_core::{FilterSet, SearchStats, UserId};
    use tokio::sync::oneshot;

    use super::*;
    use crate::api::{ApiError, SearchRequest, SearchResults};
    use crate::session::{Notification, SearchPhase};

    /// Filter store backed by an in-memory list, like the real backend.
    #[derive(Default)]
    struct FakeFilterStore {
        filters: StdMutex<Vec<String>>,
        fail: StdMutex<bool>,
    }

    impl FakeFilterStore {
        fn with(filters: &[&str]) -> Self {
            Self {
                filters: StdMutex::new(filters.iter().map(ToString::to_string).collect()),
                fail: StdMutex::new(false),
            }
        }

        fn set_failing(&self, fail: bool) {
            *self.fail.lock().unwrap() = fail;
        }

        fn respond(&self) -> Result<FilterSet, ApiError> {
            if *self.fail.lock().unwrap() {
                return Err(ApiError::Transport("connection refused".to_string()));
            }
            Ok(FilterSet::from_server(self.filters.lock().unwrap().iter()))
        }
    }

    impl FilterStore for FakeFilterStore {
        async fn load_filters(&self, _user_id: &UserId) -> Result<FilterSet, ApiError> {
            self.respond()
        }

        async fn add_filter(&self, _user_id: &UserId, term: &str) -> Result<FilterSet, ApiError> {
            if !*self.fail.lock().unwrap() {
                let mut filters = self.filters.lock().unwrap();
                if !filters.iter().any(|f| f.eq_ignore_ascii_case(term)) {
                    filters.push(term.to_string());
                }
            }
            self.respond()
        }

        async fn remove_filter(
            &self,
            _user_id: &UserId,
            term: &str,
        ) -> Result<FilterSet, ApiError> {
            if !*self.fail.lock().unwrap() {
                self.filters
                    .lock()
                    .unwrap()
                    .retain(|f| !f.eq_ignore_ascii_case(term));
            }
            self.respond()
        }
    }

    /// Search whose responses are released by the test, in any order.
    #[derive(Default)]
    struct ScriptedSearch {
        calls: AtomicUsize,
        requests: StdMutex<Vec<SearchRequest>>,
        pending: StdMutex<VecDeque<oneshot::Receiver<Result<SearchResults, ApiError>>>>,
    }

    impl ScriptedSearch {
        /// Queue a response slot; the returned sender releases it.
        fn expect(&self) -> oneshot::Sender<Result<SearchResults, ApiError>> {
            let (tx, rx) = oneshot::channel();
            self.pending.lock().unwrap().push_back(rx);
            tx
        }
    }

    impl ProductSearch for ScriptedSearch {
        async fn search(&self, request: &SearchRequest) -> Result<SearchResults, ApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.requests.lock().unwrap().push(request.clone());
            let rx = self
                .pending
                .lock()
                .unwrap()
                .pop_front()
                .expect("unexpected search call");
            rx.await.unwrap()
        }
    }

    #[derive(Default)]
    struct FakeCart {
        calls: AtomicUsize,
        succeed: bool,
    }

    impl CartService for FakeCart {
        async fn request_cart_add(&self, _product_url: &str) -> Result<bool, ApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.succeed)
        }
    }

    fn orchestrator(
        filters: FakeFilterStore,
        cart: FakeCart,
    ) -> Orchestrator<FakeFilterStore, ScriptedSearch, FakeCart> {
        Orchestrator::new(Session::default(), filters, ScriptedSearch::default(), cart)
    }

    fn found(names: &[&str], total_found: u32) -> SearchResults {
        SearchResults {
            products: names.iter().map(|n| Product::named(*n)).collect(),
            stats: SearchStats::new(total_found, u32::try_from(names.len()).unwrap()),
        }
    }

    #[tokio::test]
    async fn test_start_loads_filters() {
        let orch = orchestrator(FakeFilterStore::with(&["seed oil", "msg"]), FakeCart::default());
        orch.start().await;
        assert_eq!(orch.session().filters().len(), 2);
    }

    #[tokio::test]
    async fn test_start_failure_keeps_empty_filters_silently() {
        let store = FakeFilterStore::with(&["msg"]);
        store.set_failing(true);
        let orch = orchestrator(store, FakeCart::default());

        orch.start().await;
        assert!(orch.session().filters().is_empty());
    }

    #[tokio::test]
    async fn test_blank_query_makes_no_call() {
        let orch = orchestrator(FakeFilterStore::default(), FakeCart::default());
        assert!(orch.search("   ").await.is_empty());
        assert_eq!(orch.search.calls.load(Ordering::SeqCst), 0);
        assert_eq!(orch.session().phase(), SearchPhase::Idle);
    }

    #[tokio::test]
    async fn test_search_uses_selected_store() {
        let orch = orchestrator(FakeFilterStore::default(), FakeCart::default());
        orch.set_store(Store::Heb);
        let tx = orch.search.expect();
        tx.send(Ok(found(&["Tortillas"], 2))).unwrap();

        orch.search("tortillas").await;

        let requests = orch.search.requests.lock().unwrap().clone();
        assert_eq!(requests.first().map(|r| r.store), Some(Store::Heb));
        assert_eq!(orch.session().results_store(), Some(Store::Heb));
    }

    #[tokio::test]
    async fn test_search_enters_loading_until_response() {
        let orch = orchestrator(FakeFilterStore::default(), FakeCart::default());
        let tx = orch.search.expect();

        let search = orch.search("milk");
        let check = async {
            tokio::task::yield_now().await;
            assert_eq!(orch.session().phase(), SearchPhase::Loading);
            tx.send(Ok(found(&["Milk"], 1))).unwrap();
        };
        let (effects, ()) = tokio::join!(search, check);

        assert!(effects.is_empty());
        assert_eq!(orch.session().phase(), SearchPhase::Idle);
        assert_eq!(orch.session().results().len(), 1);
    }

    #[tokio::test]
    async fn test_overlapping_searches_apply_only_latest() {
        let orch = orchestrator(FakeFilterStore::default(), FakeCart::default());
        let first_tx = orch.search.expect();
        let second_tx = orch.search.expect();

        let first = orch.search("milk");
        let second = orch.search("eggs");
        let release = async {
            tokio::task::yield_now().await;
            // Newest finishes first, then the stale one lands.
            second_tx.send(Ok(found(&["Eggs"], 6))).unwrap();
            tokio::task::yield_now().await;
            first_tx.send(Ok(found(&["Milk", "Oat milk"], 20))).unwrap();
        };
        let (first_effects, second_effects, ()) = tokio::join!(first, second, release);

        assert!(first_effects.is_empty());
        assert!(second_effects.is_empty());
        let session = orch.session();
        assert_eq!(session.results(), &[Product::named("Eggs")]);
        assert_eq!(session.stats(), SearchStats::new(6, 1));
        assert_eq!(session.phase(), SearchPhase::Idle);
    }

    #[tokio::test]
    async fn test_search_failure_notifies() {
        let orch = orchestrator(FakeFilterStore::default(), FakeCart::default());
        orch.search
            .expect()
            .send(Err(ApiError::Server {
                status: 500,
                message: None,
            }))
            .unwrap();

        let effects = orch.search("milk").await;
        assert_eq!(
            effects,
            vec![Effect::Notify(Notification::new(
                "Error searching products: HTTP error! status: 500"
            ))]
        );
    }

    #[tokio::test]
    async fn test_add_then_remove_filter_round_trips() {
        let orch = orchestrator(FakeFilterStore::with(&["msg", "bht"]), FakeCart::default());
        orch.start().await;
        let before = orch.session().filters().clone();

        assert!(orch.add_filter("sugar").await.is_empty());
        assert!(orch.session().filters().contains("sugar"));

        assert!(orch.remove_filter("sugar").await.is_empty());
        assert_eq!(*orch.session().filters(), before);
    }

    #[tokio::test]
    async fn test_concurrent_filter_changes_are_serialized() {
        let orch = orchestrator(FakeFilterStore::with(&["msg"]), FakeCart::default());
        orch.start().await;

        let (add, remove) = tokio::join!(orch.add_filter("sugar"), orch.remove_filter("sugar"));
        assert!(add.is_empty());
        assert!(remove.is_empty());
        assert!(!orch.session().filters().contains("sugar"));
    }

    #[tokio::test]
    async fn test_filter_change_failure_notifies() {
        let store = FakeFilterStore::with(&["msg"]);
        let orch = orchestrator(store, FakeCart::default());
        orch.start().await;
        orch.filter_store.set_failing(true);

        let effects = orch.add_filter("sugar").await;
        assert_eq!(
            effects,
            vec![Effect::Notify(Notification::new(
                "Error adding filter. Please try again."
            ))]
        );
        assert_eq!(orch.session().filters().len(), 1);
    }

    #[tokio::test]
    async fn test_cart_without_url_never_calls_backend() {
        let orch = orchestrator(FakeFilterStore::default(), FakeCart::default());
        let effects = orch.add_to_cart(&Product::named("Bananas")).await;
        assert!(effects.is_empty());
        assert_eq!(orch.cart.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_cart_success_returns_navigation() {
        let cart = FakeCart {
            calls: AtomicUsize::new(0),
            succeed: true,
        };
        let orch = orchestrator(FakeFilterStore::default(), cart);
        let product = Product::named("Oats").with_url("https://www.heb.com/p/oats");

        let effects = orch.add_to_cart(&product).await;
        assert_eq!(
            effects,
            vec![Effect::NavigateTo("https://www.heb.com/p/oats".to_string())]
        );
        assert!(!orch.session().is_cart_pending(&product));
    }

    /// Cart whose first request never answers.
    #[derive(Default)]
    struct StallingCart {
        calls: AtomicUsize,
    }

    impl CartService for StallingCart {
        async fn request_cart_add(&self, _product_url: &str) -> Result<bool, ApiError> {
            if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
                std::future::pending::<()>().await;
            }
            Ok(true)
        }
    }

    #[tokio::test]
    async fn test_cancelled_intents_release_in_flight_marks() {
        let orch = Orchestrator::new(
            Session::default(),
            FakeFilterStore::default(),
            ScriptedSearch::default(),
            StallingCart::default(),
        );
        let product = Product::named("Oats").with_url("https://www.kroger.com/p/oats");
        let _unanswered = orch.search.expect();

        tokio::select! {
            _ = orch.add_to_cart(&product) => panic!("cart add should stall"),
            () = tokio::task::yield_now() => {}
        }
        tokio::select! {
            _ = orch.search("milk") => panic!("search should stall"),
            () = tokio::task::yield_now() => {}
        }

        assert!(!orch.session().is_cart_pending(&product));
        assert_eq!(orch.session().phase(), SearchPhase::Idle);

        let effects = orch.add_to_cart(&product).await;
        assert_eq!(
            effects,
            vec![Effect::NavigateTo("https://www.kroger.com/p/oats".to_string())]
        );
        assert_eq!(orch.cart.calls.load(Ordering::SeqCst), 2);
    }
}
