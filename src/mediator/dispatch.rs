//! Mediator contract and its in-memory implementation.

use super::config::MediatorConfig;
use super::event::{Event, EventKind};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{debug, warn};

/// Receives events of the kinds it listens to.
#[async_trait]
pub trait EventHandler: Send + Sync {
    /// Kinds this handler is subscribed to; read once at subscription.
    fn listening(&self) -> Vec<EventKind>;

    /// Handle one event. Runs on its own task.
    async fn handle(&self, event: Arc<dyn Event>);
}

/// Fans events out to subscribed handlers.
#[async_trait]
pub trait Mediator: Send + Sync {
    /// Register `handler` for every kind it listens to.
    fn subscribe(&self, handler: Arc<dyn EventHandler>);

    /// Schedule every handler subscribed to the event's kind.
    ///
    /// Returns the number of handlers scheduled; handlers run in the
    /// background and may still be running when this returns.
    async fn dispatch(&self, event: Arc<dyn Event>) -> usize;
}

/// Called with events that no handler listens to.
pub type OrphanEventHandler = Arc<dyn Fn(Arc<dyn Event>) + Send + Sync>;

/// Mediator that runs handlers as tokio tasks within the process.
///
/// Each handler invocation holds a permit while it runs; at most
/// `concurrency` invocations run at once and `dispatch` waits for a permit
/// when the limit is reached. Must be used inside a tokio runtime.
///
/// Handlers outlive `dispatch`; call [`wait_idle`](Self::wait_idle) or
/// [`shutdown`](Self::shutdown) before the runtime stops, or pending
/// handlers are cancelled with it.
pub struct InMemMediator {
    handlers: RwLock<HashMap<EventKind, Vec<Arc<dyn EventHandler>>>>,
    permits: Arc<Semaphore>,
    concurrency: usize,
    orphan: Option<OrphanEventHandler>,
}

impl InMemMediator {
    /// Create a mediator with no subscribers.
    pub fn new(config: MediatorConfig) -> Self {
        let concurrency = config.effective_concurrency();
        Self {
            handlers: RwLock::new(HashMap::new()),
            permits: Arc::new(Semaphore::new(concurrency)),
            concurrency,
            orphan: None,
        }
    }

    /// Route events without subscribers to `handler` instead of dropping them.
    pub fn with_orphan_handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(Arc<dyn Event>) + Send + Sync + 'static,
    {
        self.orphan = Some(Arc::new(handler));
        self
    }

    /// Effective concurrency limit after clamping.
    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Number of handlers subscribed to `kind`.
    pub fn handler_count(&self, kind: &EventKind) -> usize {
        self.handlers.read().get(kind).map_or(0, Vec::len)
    }

    /// Wait until every handler invocation scheduled so far has finished.
    ///
    /// Each running invocation holds one permit, so this returns once all
    /// `concurrency` permits are free again. The semaphore is fair, so a
    /// `dispatch` started while waiting queues behind this call.
    pub async fn wait_idle(&self) {
        match self.permits.acquire_many(self.permit_count()).await {
            Ok(_all) => {}
            Err(_) => debug!("mediator already shut down"),
        }
    }

    /// Wait for in-flight handlers, then refuse further dispatches.
    ///
    /// After shutdown `dispatch` schedules nothing and returns 0.
    pub async fn shutdown(&self) {
        if let Ok(_all) = self.permits.acquire_many(self.permit_count()).await {
            self.permits.close();
            debug!("mediator shut down");
        }
    }

    /// Whether [`shutdown`](Self::shutdown) has completed.
    pub fn is_shut_down(&self) -> bool {
        self.permits.is_closed()
    }

    fn permit_count(&self) -> u32 {
        u32::try_from(self.concurrency).unwrap_or(u32::MAX)
    }
}

impl Default for InMemMediator {
    fn default() -> Self {
        Self::new(MediatorConfig::default())
    }
}

impl fmt::Debug for InMemMediator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InMemMediator")
            .field("kinds", &self.handlers.read().len())
            .field("concurrency", &self.concurrency)
            .field("orphan_handler", &self.orphan.is_some())
            .finish()
    }
}

#[async_trait]
impl Mediator for InMemMediator {
    fn subscribe(&self, handler: Arc<dyn EventHandler>) {
        let mut handlers = self.handlers.write();
        for kind in handler.listening() {
            handlers.entry(kind).or_default().push(Arc::clone(&handler));
        }
    }

    async fn dispatch(&self, event: Arc<dyn Event>) -> usize {
        let kind = event.kind();
        let handlers = self.handlers.read().get(&kind).cloned().unwrap_or_default();

        if handlers.is_empty() {
            match &self.orphan {
                Some(orphan) => orphan(event),
                None => debug!(%kind, "no handler for event, dropped"),
            }
            return 0;
        }

        if self.permits.is_closed() {
            warn!(%kind, "mediator is shut down, event dropped");
            return 0;
        }

        let mut scheduled = 0;
        for handler in handlers {
            let Ok(permit) = Arc::clone(&self.permits).acquire_owned().await else {
                warn!(%kind, "mediator semaphore closed, stopping dispatch");
                break;
            };
            let event = Arc::clone(&event);
            tokio::spawn(async move {
                let _permit = permit;
                handler.handle(event).await;
            });
            scheduled += 1;
        }
        scheduled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tokio::sync::mpsc;
    use tokio::time::timeout;

    #[derive(Debug)]
    struct Deposited {
        amount: u64,
    }

    impl Event for Deposited {
        fn kind(&self) -> EventKind {
            EventKind::from_static("account.deposited")
        }
    }

    struct Recorder {
        tx: mpsc::UnboundedSender<u64>,
    }

    #[async_trait]
    impl EventHandler for Recorder {
        fn listening(&self) -> Vec<EventKind> {
            vec![EventKind::from_static("account.deposited")]
        }

        async fn handle(&self, event: Arc<dyn Event>) {
            if let Some(deposited) = event.downcast_ref::<Deposited>() {
                let _ = self.tx.send(deposited.amount);
            }
        }
    }

    async fn recv(rx: &mut mpsc::UnboundedReceiver<u64>) -> u64 {
        timeout(Duration::from_secs(1), rx.recv())
            .await
            .expect("handler ran in time")
            .expect("channel open")
    }

    #[tokio::test]
    async fn dispatch_reaches_every_subscriber() {
        let mediator = InMemMediator::new(MediatorConfig::with_concurrency(3));
        let (tx, mut rx) = mpsc::unbounded_channel();
        mediator.subscribe(Arc::new(Recorder { tx: tx.clone() }));
        mediator.subscribe(Arc::new(Recorder { tx }));

        let scheduled = mediator.dispatch(Arc::new(Deposited { amount: 7 })).await;

        assert_eq!(scheduled, 2);
        assert_eq!(recv(&mut rx).await, 7);
        assert_eq!(recv(&mut rx).await, 7);
    }

    #[tokio::test]
    async fn orphan_events_go_to_orphan_handler() {
        let orphans = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&orphans);
        let mediator = InMemMediator::default().with_orphan_handler(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let scheduled = mediator.dispatch(Arc::new(Deposited { amount: 1 })).await;

        assert_eq!(scheduled, 0);
        assert_eq!(orphans.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn orphan_events_are_dropped_without_handler() {
        let mediator = InMemMediator::default();
        assert_eq!(mediator.dispatch(Arc::new(Deposited { amount: 1 })).await, 0);
    }

    #[tokio::test]
    async fn concurrency_limits_running_handlers() {
        struct Slow {
            running: Arc<AtomicUsize>,
            peak: Arc<AtomicUsize>,
            done: mpsc::UnboundedSender<()>,
        }

        #[async_trait]
        impl EventHandler for Slow {
            fn listening(&self) -> Vec<EventKind> {
                vec![EventKind::from_static("account.deposited")]
            }

            async fn handle(&self, _: Arc<dyn Event>) {
                let now = self.running.fetch_add(1, Ordering::SeqCst) + 1;
                self.peak.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(20)).await;
                self.running.fetch_sub(1, Ordering::SeqCst);
                let _ = self.done.send(());
            }
        }

        let mediator = InMemMediator::new(MediatorConfig::with_concurrency(2));
        let running = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));
        let (done, mut finished) = mpsc::unbounded_channel();
        mediator.subscribe(Arc::new(Slow {
            running: Arc::clone(&running),
            peak: Arc::clone(&peak),
            done,
        }));

        for amount in 0..6 {
            mediator.dispatch(Arc::new(Deposited { amount })).await;
        }
        for _ in 0..6 {
            timeout(Duration::from_secs(2), finished.recv())
                .await
                .expect("handlers finish")
                .expect("channel open");
        }

        assert!(peak.load(Ordering::SeqCst) <= 2);
        assert_eq!(running.load(Ordering::SeqCst), 0);
    }

    struct Settling {
        finished: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl EventHandler for Settling {
        fn listening(&self) -> Vec<EventKind> {
            vec![EventKind::from_static("account.deposited")]
        }

        async fn handle(&self, _: Arc<dyn Event>) {
            tokio::time::sleep(Duration::from_millis(20)).await;
            self.finished.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[tokio::test]
    async fn wait_idle_returns_after_slow_handlers_finish() {
        let mediator = InMemMediator::new(MediatorConfig::with_concurrency(4));
        let finished = Arc::new(AtomicUsize::new(0));
        mediator.subscribe(Arc::new(Settling {
            finished: Arc::clone(&finished),
        }));

        for amount in 0..3 {
            assert_eq!(mediator.dispatch(Arc::new(Deposited { amount })).await, 1);
        }
        assert_eq!(finished.load(Ordering::SeqCst), 0);

        timeout(Duration::from_secs(2), mediator.wait_idle())
            .await
            .expect("handlers settle");
        assert_eq!(finished.load(Ordering::SeqCst), 3);

        // Still usable afterwards.
        assert_eq!(mediator.dispatch(Arc::new(Deposited { amount: 9 })).await, 1);
        mediator.wait_idle().await;
        assert_eq!(finished.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn handler_work_survives_runtime_teardown_after_shutdown() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let mediator = InMemMediator::new(MediatorConfig::with_concurrency(2));
        let finished = Arc::new(AtomicUsize::new(0));
        mediator.subscribe(Arc::new(Settling {
            finished: Arc::clone(&finished),
        }));

        let scheduled = runtime.block_on(async {
            let scheduled = mediator.dispatch(Arc::new(Deposited { amount: 1 })).await;
            mediator.shutdown().await;
            scheduled
        });
        drop(runtime);

        assert_eq!(scheduled, 1);
        assert_eq!(finished.load(Ordering::SeqCst), 1);
        assert!(mediator.is_shut_down());
    }

    #[tokio::test]
    async fn dispatch_after_shutdown_schedules_nothing() {
        let mediator = InMemMediator::default();
        let finished = Arc::new(AtomicUsize::new(0));
        mediator.subscribe(Arc::new(Settling {
            finished: Arc::clone(&finished),
        }));

        mediator.shutdown().await;

        assert_eq!(mediator.dispatch(Arc::new(Deposited { amount: 1 })).await, 0);
        mediator.wait_idle().await;
        assert_eq!(finished.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn subscribe_indexes_by_kind() {
        let mediator = InMemMediator::new(MediatorConfig::with_concurrency(0));
        let (tx, _rx) = mpsc::unbounded_channel();
        mediator.subscribe(Arc::new(Recorder { tx }));

        assert_eq!(mediator.concurrency(), 1);
        assert_eq!(
            mediator.handler_count(&EventKind::from_static("account.deposited")),
            1
        );
        assert_eq!(mediator.handler_count(&EventKind::from_static("other")), 0);
    }
}
