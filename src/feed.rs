//! Subscription feed: accumulation of resolved records and the
//! resolution fan-out that fills it.

use crate::resolver::Resolve;
use crate::types::{FeedSnapshot, SubscriptionRecord, SubscriptionRef};
use std::sync::{Arc, Mutex};
use tokio::runtime::Handle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Accumulated view state for the subscription list.
///
/// Appends arrive from independently completing resolution tasks; each
/// one swaps in a fresh snapshot, so a reader holding an older snapshot
/// keeps seeing exactly the state it read. After `retire`, appends become
/// no-ops.
pub struct SubscriptionFeed {
    records: Mutex<FeedSnapshot>,
    retired: CancellationToken,
    notify: Box<dyn Fn() + Send + Sync>,
}

impl SubscriptionFeed {
    /// `notify` is invoked after every successful append; the app passes
    /// a repaint request here.
    pub fn new(notify: impl Fn() + Send + Sync + 'static) -> Self {
        Self {
            records: Mutex::new(Arc::new(Vec::new())),
            retired: CancellationToken::new(),
            notify: Box::new(notify),
        }
    }

    /// Current state. Cheap; the underlying vector is shared, not copied.
    pub fn snapshot(&self) -> FeedSnapshot {
        self.records.lock().unwrap().clone()
    }

    /// Append one resolved record and return the new state.
    ///
    /// Records land in resolution-completion order, which is not the
    /// order of the configured reference list. A record appended after
    /// `retire` is dropped without notification.
    pub fn append(&self, record: SubscriptionRecord) -> FeedSnapshot {
        if self.retired.is_cancelled() {
            debug!(name = %record.name, "Feed retired, dropping late record");
            return self.snapshot();
        }
        let snapshot = {
            let mut records = self.records.lock().unwrap();
            let mut next = Vec::with_capacity(records.len() + 1);
            next.extend(records.iter().cloned());
            next.push(record);
            *records = Arc::new(next);
            records.clone()
        };
        (self.notify)();
        snapshot
    }

    /// Mark the owning view as gone. In-flight resolutions keep running,
    /// but their results no longer reach the feed.
    pub fn retire(&self) {
        self.retired.cancel();
    }

    pub fn is_retired(&self) -> bool {
        self.retired.is_cancelled()
    }
}

/// Dispatch one resolution task per configured reference.
///
/// Returns as soon as every task is spawned. Tasks are fully independent:
/// a slow or failing reference has no effect on the others. There is no
/// completion signal; the feed simply stops growing once every task has
/// finished.
pub fn activate(
    references: Vec<SubscriptionRef>,
    resolver: Arc<dyn Resolve>,
    feed: Arc<SubscriptionFeed>,
    handle: &Handle,
) {
    debug!(count = references.len(), "Dispatching subscription resolution");
    for reference in references {
        let resolver = resolver.clone();
        let feed = feed.clone();
        handle.spawn(async move {
            resolve_one(reference, resolver, feed).await;
        });
    }
}

async fn resolve_one(
    reference: SubscriptionRef,
    resolver: Arc<dyn Resolve>,
    feed: Arc<SubscriptionFeed>,
) {
    if feed.is_retired() {
        return;
    }
    match resolver.resolve(&reference).await {
        Ok(record) => {
            debug!(reference = %reference, name = %record.name, "Subscription resolved");
            feed.append(record);
        }
        Err(e) => {
            // A failed reference never produces a card; no retry.
            debug!(reference = %reference, error = %e, "Resolution failed, dropping");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ResolveError;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn names(snapshot: &FeedSnapshot) -> Vec<&str> {
        snapshot.iter().map(|r| r.name.as_str()).collect()
    }

    enum Outcome {
        Resolve(&'static str, Duration),
        Fail(Duration),
    }

    /// Resolver with a fixed outcome per reference.
    struct ScriptedResolver {
        outcomes: HashMap<&'static str, Outcome>,
    }

    #[async_trait]
    impl Resolve for ScriptedResolver {
        async fn resolve(
            &self,
            reference: &SubscriptionRef,
        ) -> Result<SubscriptionRecord, ResolveError> {
            match self.outcomes.get(reference.as_str()) {
                Some(Outcome::Resolve(name, delay)) => {
                    tokio::time::sleep(*delay).await;
                    Ok(SubscriptionRecord::named(*name))
                }
                Some(Outcome::Fail(delay)) => {
                    tokio::time::sleep(*delay).await;
                    Err(ResolveError::Status(reqwest::StatusCode::NOT_FOUND))
                }
                None => Err(ResolveError::Status(reqwest::StatusCode::NOT_FOUND)),
            }
        }
    }

    fn scripted(outcomes: Vec<(&'static str, Outcome)>) -> Arc<ScriptedResolver> {
        Arc::new(ScriptedResolver {
            outcomes: outcomes.into_iter().collect(),
        })
    }

    fn refs(names: &[&str]) -> Vec<SubscriptionRef> {
        names.iter().copied().map(SubscriptionRef::new).collect()
    }

    /// Paused-clock tests: jumping the clock far ahead fires every pending
    /// timer, then a few yields let the woken tasks run to completion.
    async fn settle() {
        tokio::time::sleep(Duration::from_secs(5)).await;
        for _ in 0..8 {
            tokio::task::yield_now().await;
        }
    }

    #[test]
    fn append_grows_monotonically() {
        let feed = SubscriptionFeed::new(|| {});
        for i in 0..5 {
            let snapshot = feed.append(SubscriptionRecord::named(format!("sub-{i}")));
            assert_eq!(snapshot.len(), i + 1);
        }
        assert_eq!(feed.snapshot().len(), 5);
    }

    #[test]
    fn append_preserves_arrival_order() {
        let feed = SubscriptionFeed::new(|| {});
        feed.append(SubscriptionRecord::named("configured-second"));
        feed.append(SubscriptionRecord::named("configured-first"));
        assert_eq!(
            names(&feed.snapshot()),
            ["configured-second", "configured-first"]
        );
    }

    #[test]
    fn append_does_not_disturb_earlier_snapshots() {
        let feed = SubscriptionFeed::new(|| {});
        feed.append(SubscriptionRecord::named("a"));
        let before = feed.snapshot();
        feed.append(SubscriptionRecord::named("b"));
        assert_eq!(names(&before), ["a"]);
        assert_eq!(names(&feed.snapshot()), ["a", "b"]);
    }

    #[test]
    fn append_accepts_duplicates() {
        let feed = SubscriptionFeed::new(|| {});
        feed.append(SubscriptionRecord::named("twin"));
        feed.append(SubscriptionRecord::named("twin"));
        assert_eq!(names(&feed.snapshot()), ["twin", "twin"]);
    }

    #[test]
    fn append_notifies_once_per_record() {
        let count = Arc::new(AtomicUsize::new(0));
        let seen = count.clone();
        let feed = SubscriptionFeed::new(move || {
            seen.fetch_add(1, Ordering::SeqCst);
        });
        feed.append(SubscriptionRecord::named("a"));
        feed.append(SubscriptionRecord::named("b"));
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn retired_feed_drops_appends_silently() {
        let count = Arc::new(AtomicUsize::new(0));
        let seen = count.clone();
        let feed = SubscriptionFeed::new(move || {
            seen.fetch_add(1, Ordering::SeqCst);
        });
        feed.append(SubscriptionRecord::named("a"));
        feed.retire();
        let snapshot = feed.append(SubscriptionRecord::named("late"));
        assert_eq!(names(&snapshot), ["a"]);
        assert_eq!(names(&feed.snapshot()), ["a"]);
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_references_are_isolated() {
        let resolver = scripted(vec![
            ("a", Outcome::Fail(Duration::from_millis(1))),
            ("b", Outcome::Resolve("Bravo", Duration::from_millis(2))),
        ]);
        let feed = Arc::new(SubscriptionFeed::new(|| {}));
        activate(refs(&["a", "b"]), resolver, feed.clone(), &Handle::current());
        settle().await;
        assert_eq!(names(&feed.snapshot()), ["Bravo"]);
    }

    #[tokio::test(start_paused = true)]
    async fn completion_order_wins_over_configured_order() {
        // r3 fails first, then r2 lands before r1 despite being
        // configured after it.
        let resolver = scripted(vec![
            ("r1", Outcome::Resolve("Alpha", Duration::from_millis(20))),
            ("r2", Outcome::Resolve("Beta", Duration::from_millis(10))),
            ("r3", Outcome::Fail(Duration::from_millis(5))),
        ]);
        let feed = Arc::new(SubscriptionFeed::new(|| {}));
        activate(
            refs(&["r1", "r2", "r3"]),
            resolver,
            feed.clone(),
            &Handle::current(),
        );
        settle().await;
        assert_eq!(names(&feed.snapshot()), ["Beta", "Alpha"]);
    }

    #[tokio::test(start_paused = true)]
    async fn empty_reference_list_yields_empty_feed() {
        let feed = Arc::new(SubscriptionFeed::new(|| {}));
        activate(Vec::new(), scripted(vec![]), feed.clone(), &Handle::current());
        settle().await;
        assert!(feed.snapshot().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn completion_after_retire_is_a_noop() {
        let resolver = scripted(vec![(
            "slow",
            Outcome::Resolve("Slowpoke", Duration::from_millis(50)),
        )]);
        let feed = Arc::new(SubscriptionFeed::new(|| {}));
        activate(refs(&["slow"]), resolver, feed.clone(), &Handle::current());
        feed.retire();
        settle().await;
        assert!(feed.snapshot().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn stalled_reference_does_not_block_the_rest() {
        let resolver = scripted(vec![
            ("stuck", Outcome::Resolve("Stuck", Duration::from_secs(3600))),
            ("quick", Outcome::Resolve("Quick", Duration::from_millis(10))),
        ]);
        let feed = Arc::new(SubscriptionFeed::new(|| {}));
        activate(
            refs(&["stuck", "quick"]),
            resolver,
            feed.clone(),
            &Handle::current(),
        );
        settle().await;
        assert_eq!(names(&feed.snapshot()), ["Quick"]);
    }
}
