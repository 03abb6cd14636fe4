//! ⏳ Loader — the identity-keyed data controller that ignores anyone who shows up late.
//!
//! 🎬 *[a fetch for post 1 is in flight. the user clicks post 2.]*
//! *[post 1's response finally lands, three seconds late, holding data nobody asked for.]*
//! *[the loader checks its token, shakes its head, and closes the door.]*
//!
//! A [`Loader`] is handed an identity and a fetch function. It calls the fetch function
//! once on mount and again whenever the identity or the fetch function changes. Each call
//! gets a [`Deliver`] handle stamped with a fresh [`CallToken`]; the handle only lands its
//! data if that token is still the loader's current one.
//!
//! ```text
//!   mount ──▶ Loading(T1) ──deliver(T1)──▶ Delivered
//!                 │                           │
//!              update                      update
//!                 ▼                           ▼
//!             Loading(T2)  ◀──────────────────┘     deliver(T1) now: dropped
//!
//!   teardown (or drop) ──▶ gone. every outstanding Deliver is inert.
//! ```
//!
//! 🧠 Knowledge graph:
//! - Tokens come from one process-wide `AtomicU64`, so they never repeat.
//! - The token comparison and the data write happen under the same lock as invalidation,
//!   so there is no window where a stale delivery can slip in after a new fetch was issued.
//! - The current token is invalidated *before* the next fetch function is called.
//! - Nothing aborts the underlying work. Old requests still finish; their results just
//!   bounce off the token check.
//! - Teardown consumes the loader, so "transition after teardown" doesn't type-check.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;
use tracing::trace;

static NEXT_CALL_TOKEN: AtomicU64 = AtomicU64::new(1);

/// 🎟️ Stamped on every fetch invocation. Unique for the life of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CallToken(u64);

impl CallToken {
    fn mint() -> Self {
        CallToken(NEXT_CALL_TOKEN.fetch_add(1, Ordering::Relaxed))
    }
}

/// 🔧 The fetch function: gets a delivery handle and the identity, starts the work, returns.
///
/// "Did the fetch function change?" is answered with `Arc::ptr_eq`.
pub type Fetcher<I, D> = Arc<dyn Fn(Deliver<D>, I) + Send + Sync>;

/// 🏗️ Wrap a closure as a [`Fetcher`].
pub fn fetcher<I, D, F>(fetch: F) -> Fetcher<I, D>
where
    F: Fn(Deliver<D>, I) + Send + Sync + 'static,
{
    Arc::new(fetch)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoaderPhase {
    /// Waiting on the current call token. `render` sees `None`.
    Loading,
    /// The current call delivered. `render` sees `Some`.
    Delivered,
}

struct Slot<D> {
    current: Option<CallToken>,
    data: Option<D>,
}

struct Shared<D> {
    slot: Mutex<Slot<D>>,
    // -- 📣 bumped on every accepted delivery, so waiters know to look again
    deliveries: watch::Sender<u64>,
}

impl<D> Shared<D> {
    fn slot(&self) -> MutexGuard<'_, Slot<D>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// 📬 One fetch invocation's way back into the loader. Single use.
pub struct Deliver<D> {
    shared: Arc<Shared<D>>,
    token: CallToken,
}

impl<D> std::fmt::Debug for Deliver<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Deliver").field("token", &self.token).finish()
    }
}

impl<D> Deliver<D> {
    pub fn token(&self) -> CallToken {
        self.token
    }

    /// 📦 Hand over the data. Returns `false` (and drops `data`) if this call has been
    /// superseded or the loader is gone.
    pub fn deliver(self, data: D) -> bool {
        {
            let mut slot = self.shared.slot();
            if slot.current != Some(self.token) {
                trace!("🗑️ Dropping stale delivery for {:?}", self.token);
                return false;
            }
            slot.data = Some(data);
            slot.current = None;
        }
        self.shared.deliveries.send_modify(|count| *count += 1);
        true
    }
}

/// ⏳ Identity-keyed loader. See the module docs for the state machine.
pub struct Loader<I, D> {
    identity: I,
    fetcher: Fetcher<I, D>,
    shared: Arc<Shared<D>>,
}

impl<I: std::fmt::Debug, D> std::fmt::Debug for Loader<I, D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Loader")
            .field("identity", &self.identity)
            .field("current", &self.shared.slot().current)
            .finish()
    }
}

impl<I: PartialEq + Clone, D> Loader<I, D> {
    /// 🚀 Build the loader and issue the first fetch.
    pub fn mount(identity: I, fetcher: Fetcher<I, D>) -> Self {
        let (deliveries, _) = watch::channel(0);
        let loader = Self {
            identity,
            fetcher,
            shared: Arc::new(Shared {
                slot: Mutex::new(Slot {
                    current: None,
                    data: None,
                }),
                deliveries,
            }),
        };
        loader.issue();
        loader
    }

    /// 🔄 New props. Re-fetches (and resets to loading) only if the identity differs or the
    /// fetcher is a different `Arc`. Returns whether a fetch was issued.
    pub fn update(&mut self, identity: I, fetcher: Fetcher<I, D>) -> bool {
        if self.identity == identity && Arc::ptr_eq(&self.fetcher, &fetcher) {
            return false;
        }
        self.identity = identity;
        self.fetcher = fetcher;
        self.issue();
        true
    }

    /// 🔄 Same fetcher, new identity.
    pub fn set_identity(&mut self, identity: I) -> bool {
        let fetcher = Arc::clone(&self.fetcher);
        self.update(identity, fetcher)
    }

    fn issue(&self) {
        let token = CallToken::mint();
        {
            let mut slot = self.shared.slot();
            // -- 🔒 old token dies here, before the new call exists
            slot.current = Some(token);
            slot.data = None;
        }
        trace!("🎟️ Issuing fetch with {:?}", token);
        let deliver = Deliver {
            shared: Arc::clone(&self.shared),
            token,
        };
        (self.fetcher)(deliver, self.identity.clone());
    }
}

impl<I, D> Loader<I, D> {
    pub fn identity(&self) -> &I {
        &self.identity
    }

    pub fn phase(&self) -> LoaderPhase {
        if self.shared.slot().data.is_some() {
            LoaderPhase::Delivered
        } else {
            LoaderPhase::Loading
        }
    }

    /// 🎨 The render contract: `None` while loading, `Some(&data)` once delivered.
    ///
    /// Holds the loader's lock for the duration of `render`; don't deliver from inside it.
    pub fn render<R>(&self, render: impl FnOnce(Option<&D>) -> R) -> R {
        let slot = self.shared.slot();
        render(slot.data.as_ref())
    }

    pub fn data(&self) -> Option<D>
    where
        D: Clone,
    {
        self.shared.slot().data.clone()
    }

    /// ⏳ Resolve once data for the current call is in.
    pub async fn wait_for_delivery(&self) -> D
    where
        D: Clone,
    {
        // -- 📣 subscribe before looking, so a delivery in between still wakes us
        let mut deliveries = self.shared.deliveries.subscribe();
        loop {
            if let Some(data) = self.data() {
                return data;
            }
            if deliveries.changed().await.is_err() {
                // -- the sender lives as long as we do; this is unreachable while `self` exists
                std::future::pending::<()>().await;
            }
        }
    }

    /// 🏁 Unmount. Any delivery that arrives after this is dropped.
    pub fn teardown(self) {
        drop(self);
    }
}

impl<I, D> Drop for Loader<I, D> {
    fn drop(&mut self) {
        let mut slot = self.shared.slot();
        slot.current = None;
        trace!("🏁 Loader torn down; outstanding deliveries are now inert");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    /// 🧪 A fetcher that parks its delivery handles so the test decides when (and whether)
    /// each call resolves.
    #[allow(clippy::type_complexity)]
    fn parking_fetcher() -> (Fetcher<&'static str, String>, Arc<Mutex<Vec<(&'static str, Deliver<String>)>>>) {
        let the_parking_lot = Arc::new(Mutex::new(Vec::new()));
        let the_lot = Arc::clone(&the_parking_lot);
        let the_fetcher = fetcher(move |deliver, identity| {
            the_lot
                .lock()
                .expect("💀 parking lot poisoned")
                .push((identity, deliver));
        });
        (the_fetcher, the_parking_lot)
    }

    fn take_parked(
        lot: &Arc<Mutex<Vec<(&'static str, Deliver<String>)>>>,
    ) -> Vec<(&'static str, Deliver<String>)> {
        std::mem::take(&mut *lot.lock().expect("💀 parking lot poisoned"))
    }

    #[test]
    fn the_one_where_mount_fetches_once_and_delivery_lands() {
        let (the_fetcher, the_lot) = parking_fetcher();
        let the_loader = Loader::mount("A", the_fetcher);

        assert_eq!(the_loader.phase(), LoaderPhase::Loading);
        assert!(the_loader.render(|data| data.is_none()));

        let mut the_parked = take_parked(&the_lot);
        assert_eq!(the_parked.len(), 1);
        let (the_identity, the_deliver) = the_parked.remove(0);
        assert_eq!(the_identity, "A");

        assert!(the_deliver.deliver("data for A".to_string()));
        assert_eq!(the_loader.phase(), LoaderPhase::Delivered);
        assert_eq!(the_loader.data().as_deref(), Some("data for A"));
    }

    #[test]
    fn the_one_where_the_late_response_for_a_bounces_off_the_token_check() {
        let (the_fetcher, the_lot) = parking_fetcher();
        let mut the_loader = Loader::mount("A", the_fetcher);
        let (_, the_deliver_for_a) = take_parked(&the_lot).remove(0);

        assert!(the_loader.set_identity("B"));
        let (the_identity, the_deliver_for_b) = take_parked(&the_lot).remove(0);
        assert_eq!(the_identity, "B");

        // -- 🐌 A finally shows up. nobody is waiting for A anymore.
        assert!(!the_deliver_for_a.deliver("stale A".to_string()));
        assert_eq!(the_loader.data(), None);
        assert_eq!(the_loader.phase(), LoaderPhase::Loading);

        assert!(the_deliver_for_b.deliver("fresh B".to_string()));
        assert_eq!(the_loader.data().as_deref(), Some("fresh B"));
    }

    #[test]
    fn the_one_where_a_stale_response_cannot_overwrite_delivered_data() {
        let (the_fetcher, the_lot) = parking_fetcher();
        let mut the_loader = Loader::mount("A", the_fetcher);
        let (_, the_deliver_for_a) = take_parked(&the_lot).remove(0);
        the_loader.set_identity("B");
        let (_, the_deliver_for_b) = take_parked(&the_lot).remove(0);

        assert!(the_deliver_for_b.deliver("B".to_string()));
        assert!(!the_deliver_for_a.deliver("A".to_string()));

        assert_eq!(the_loader.data().as_deref(), Some("B"));
    }

    #[test]
    fn the_one_where_identical_props_do_not_refetch() {
        let the_calls = Arc::new(AtomicUsize::new(0));
        let the_counter = Arc::clone(&the_calls);
        let the_fetcher: Fetcher<u64, u64> = fetcher(move |deliver, identity| {
            the_counter.fetch_add(1, Ordering::SeqCst);
            deliver.deliver(identity * 10);
        });

        let mut the_loader = Loader::mount(1, Arc::clone(&the_fetcher));
        assert!(!the_loader.update(1, Arc::clone(&the_fetcher)));
        assert_eq!(the_calls.load(Ordering::SeqCst), 1);
        assert_eq!(the_loader.data(), Some(10));

        assert!(the_loader.update(2, Arc::clone(&the_fetcher)));
        assert_eq!(the_calls.load(Ordering::SeqCst), 2);
        assert_eq!(the_loader.data(), Some(20));
    }

    #[test]
    fn the_one_where_a_new_fetch_function_means_a_new_fetch() {
        let the_first: Fetcher<u64, &'static str> = fetcher(|deliver, _| {
            deliver.deliver("first");
        });
        let the_second: Fetcher<u64, &'static str> = fetcher(|deliver, _| {
            deliver.deliver("second");
        });

        let mut the_loader = Loader::mount(7, the_first);
        assert_eq!(the_loader.data(), Some("first"));

        assert!(the_loader.update(7, the_second));
        assert_eq!(the_loader.data(), Some("second"));
    }

    #[test]
    fn the_one_where_nothing_gets_in_after_teardown() {
        let (the_fetcher, the_lot) = parking_fetcher();
        let the_loader = Loader::mount("A", the_fetcher);
        let (_, the_deliver) = take_parked(&the_lot).remove(0);

        the_loader.teardown();

        assert!(!the_deliver.deliver("too late".to_string()));
    }

    #[test]
    fn the_one_where_every_call_gets_a_brand_new_token() {
        let (the_fetcher, the_lot) = parking_fetcher();
        let mut the_loader = Loader::mount("A", the_fetcher);
        the_loader.set_identity("B");
        the_loader.set_identity("C");

        let the_tokens: Vec<CallToken> = take_parked(&the_lot)
            .iter()
            .map(|(_, deliver)| deliver.token())
            .collect();

        assert_eq!(the_tokens.len(), 3);
        assert!(the_tokens.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[tokio::test]
    async fn the_one_where_waiting_ends_when_the_async_fetch_delivers() {
        let the_fetcher: Fetcher<u64, String> = fetcher(|deliver, identity| {
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(5)).await;
                deliver.deliver(format!("post {identity}"));
            });
        });

        let the_loader = Loader::mount(3, the_fetcher);
        let the_data = tokio::time::timeout(Duration::from_secs(5), the_loader.wait_for_delivery())
            .await
            .expect("💀 delivery should arrive well within the timeout");

        assert_eq!(the_data, "post 3");
    }
}
