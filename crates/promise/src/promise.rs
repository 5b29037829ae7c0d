//! [`Promise`] and its producer handle, [`Sealant`].

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::runtime::Handle;
use tokio::sync::{mpsc, oneshot};

use crate::{Executor, Unsettled};

/// A single-assignment asynchronous result.
///
/// Awaiting a promise yields `Ok(value)` once fulfilled or `Err(error)` once
/// rejected. The transition happens at most once and is final. Dropping a
/// promise does not cancel the work that will settle it.
#[derive(Debug)]
#[must_use = "a promise does nothing observable unless awaited or chained"]
pub struct Promise<T, E> {
    outcome: oneshot::Receiver<Result<T, E>>,
}

/// The producer side of a [`Promise`].
///
/// Every settling method takes `self`, so a sealant settles its promise at
/// most once. A sealant dropped without settling rejects the promise with
/// [`Unsettled::Abandoned`].
#[derive(Debug)]
pub struct Sealant<T, E> {
    outcome: oneshot::Sender<Result<T, E>>,
}

impl<T, E> Promise<T, E> {
    /// Creates a pending promise and the sealant that settles it.
    pub fn pending() -> (Self, Sealant<T, E>) {
        let (tx, rx) = oneshot::channel();
        (Self { outcome: rx }, Sealant { outcome: tx })
    }

    /// Creates a promise that is already fulfilled with `value`.
    pub fn fulfilled(value: T) -> Self {
        let (promise, sealant) = Self::pending();
        sealant.fulfill(value);
        promise
    }

    /// Creates a promise that is already rejected with `error`.
    pub fn rejected(error: E) -> Self {
        let (promise, sealant) = Self::pending();
        sealant.reject(error);
        promise
    }
}

impl<T, E> Promise<T, E>
where
    E: From<Unsettled>,
{
    /// Creates a promise and hands its sealant to `register`.
    ///
    /// `register` runs synchronously and typically passes the sealant into a
    /// callback registration. If it drops the sealant instead, the promise
    /// rejects with [`Unsettled::Abandoned`].
    pub fn with_sealant<F>(register: F) -> Self
    where
        F: FnOnce(Sealant<T, E>),
    {
        let (promise, sealant) = Self::pending();
        register(sealant);
        promise
    }

    /// Takes the outcome without waiting, if the promise has settled.
    ///
    /// Consumes the promise: returns `Ok(outcome)` once settled, or gives the
    /// still-pending promise back as `Err(self)`. The outcome can therefore be
    /// observed only once.
    pub fn try_settled(mut self) -> Result<Result<T, E>, Self> {
        match self.outcome.try_recv() {
            Ok(outcome) => Ok(outcome),
            Err(oneshot::error::TryRecvError::Empty) => Err(self),
            Err(oneshot::error::TryRecvError::Closed) => Ok(Err(Unsettled::Abandoned.into())),
        }
    }

    /// Chains a continuation that runs on `executor` when this promise fulfills.
    ///
    /// The continuation is scheduled immediately, so the returned promise
    /// settles as soon as this one does. A rejection of this promise skips `f`
    /// and rejects the returned promise with the same error converted through
    /// `E2: From<E>`. If `f` panics the returned promise rejects with
    /// [`Unsettled::Aborted`].
    pub fn then_on<U, E2, F>(self, executor: &Executor, f: F) -> Promise<U, E2>
    where
        T: Send + 'static,
        E: Send + 'static,
        U: Send + 'static,
        E2: From<E> + From<Unsettled> + Send + 'static,
        F: FnOnce(T) -> Result<U, E2> + Send + 'static,
    {
        let (chained, sealant) = Promise::pending();
        let sealant = ContinuationSealant::new(sealant);
        let context = executor.clone();
        executor.handle().spawn(async move {
            match self.await {
                Ok(value) => {
                    if let Some(outcome) = context.run(move || f(value)).await {
                        sealant.settle(outcome);
                    }
                }
                Err(err) => sealant.settle(Err(E2::from(err))),
            }
        });
        chained
    }

    /// Chains a recovery step that runs on `executor` when this promise rejects.
    ///
    /// A fulfilled value passes through untouched. `f` may return a
    /// replacement value or a (possibly different) error.
    pub fn recover_on<F>(self, executor: &Executor, f: F) -> Promise<T, E>
    where
        T: Send + 'static,
        E: Send + 'static,
        F: FnOnce(E) -> Result<T, E> + Send + 'static,
    {
        let (chained, sealant) = Promise::pending();
        let sealant = ContinuationSealant::new(sealant);
        let context = executor.clone();
        executor.handle().spawn(async move {
            match self.await {
                Ok(value) => sealant.settle(Ok(value)),
                Err(err) => {
                    if let Some(outcome) = context.run(move || f(err)).await {
                        sealant.settle(outcome);
                    }
                }
            }
        });
        chained
    }

    /// Runs `f` on `executor` once this promise settles either way, then
    /// settles the returned promise with the original outcome.
    pub fn finally_on<F>(self, executor: &Executor, f: F) -> Promise<T, E>
    where
        T: Send + 'static,
        E: Send + 'static,
        F: FnOnce() + Send + 'static,
    {
        let (chained, sealant) = Promise::pending();
        let sealant = ContinuationSealant::new(sealant);
        let context = executor.clone();
        executor.handle().spawn(async move {
            let outcome = self.await;
            if context.run(f).await.is_some() {
                sealant.settle(outcome);
            }
        });
        chained
    }

    /// Fulfils with every value, in input order, once all `promises` fulfil.
    ///
    /// Rejects with the first rejection observed, without waiting for the
    /// rest. An empty input fulfils with an empty vector.
    pub fn when<I>(promises: I, executor: &Executor) -> Promise<Vec<T>, E>
    where
        I: IntoIterator<Item = Promise<T, E>>,
        T: Send + 'static,
        E: Send + 'static,
    {
        let (aggregate, sealant) = Promise::pending();
        let sealant = ContinuationSealant::new(sealant);
        let (count, mut outcomes) = gather(promises, executor.handle());
        executor.handle().spawn(async move {
            let mut values: Vec<Option<T>> = (0..count).map(|_| None).collect();
            for _ in 0..count {
                match outcomes.recv().await {
                    Some((index, Ok(value))) => values[index] = Some(value),
                    Some((_, Err(err))) => {
                        sealant.settle(Err(err));
                        return;
                    }
                    None => return,
                }
            }
            sealant.settle(Ok(values.into_iter().flatten().collect()));
        });
        aggregate
    }

    /// Fulfils with every outcome, in input order, once all `promises` settle.
    ///
    /// Never short-circuits: rejected inputs appear as `Err` entries. The
    /// aggregate itself only rejects if it is aborted.
    pub fn join<I>(promises: I, executor: &Executor) -> Promise<Vec<Result<T, E>>, Unsettled>
    where
        I: IntoIterator<Item = Promise<T, E>>,
        T: Send + 'static,
        E: Send + 'static,
    {
        let (aggregate, sealant) = Promise::pending();
        let sealant = ContinuationSealant::new(sealant);
        let (count, mut outcomes) = gather(promises, executor.handle());
        executor.handle().spawn(async move {
            let mut settled: Vec<Option<Result<T, E>>> = (0..count).map(|_| None).collect();
            for _ in 0..count {
                match outcomes.recv().await {
                    Some((index, outcome)) => settled[index] = Some(outcome),
                    None => return,
                }
            }
            sealant.settle(Ok(settled.into_iter().flatten().collect()));
        });
        aggregate
    }
}

/// Awaits each promise on its own task and reports `(index, outcome)` pairs.
fn gather<T, E, I>(
    promises: I,
    handle: &Handle,
) -> (usize, mpsc::UnboundedReceiver<(usize, Result<T, E>)>)
where
    I: IntoIterator<Item = Promise<T, E>>,
    T: Send + 'static,
    E: From<Unsettled> + Send + 'static,
{
    let (tx, rx) = mpsc::unbounded_channel();
    let mut count = 0;
    for (index, promise) in promises.into_iter().enumerate() {
        let tx = tx.clone();
        handle.spawn(async move {
            let _ = tx.send((index, promise.await));
        });
        count += 1;
    }
    (count, rx)
}

/// Sealant owned by a continuation task.
///
/// Rejects with [`Unsettled::Aborted`] if dropped unsettled, which happens
/// when the continuation body panics or the runtime drops the task.
struct ContinuationSealant<T, E>
where
    E: From<Unsettled>,
{
    sealant: Option<Sealant<T, E>>,
}

impl<T, E> ContinuationSealant<T, E>
where
    E: From<Unsettled>,
{
    fn new(sealant: Sealant<T, E>) -> Self {
        Self {
            sealant: Some(sealant),
        }
    }

    fn settle(mut self, outcome: Result<T, E>) {
        if let Some(sealant) = self.sealant.take() {
            sealant.settle(outcome);
        }
    }
}

impl<T, E> Drop for ContinuationSealant<T, E>
where
    E: From<Unsettled>,
{
    fn drop(&mut self) {
        if let Some(sealant) = self.sealant.take() {
            sealant.reject(Unsettled::Aborted.into());
        }
    }
}

impl<T, E> Future for Promise<T, E>
where
    E: From<Unsettled>,
{
    type Output = Result<T, E>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.outcome).poll(cx) {
            Poll::Ready(Ok(outcome)) => Poll::Ready(outcome),
            Poll::Ready(Err(_)) => Poll::Ready(Err(Unsettled::Abandoned.into())),
            Poll::Pending => Poll::Pending,
        }
    }
}

impl<T, E> Sealant<T, E> {
    /// Fulfills the promise with `value`.
    pub fn fulfill(self, value: T) {
        self.settle(Ok(value));
    }

    /// Rejects the promise with `error`.
    pub fn reject(self, error: E) {
        self.settle(Err(error));
    }

    /// Settles the promise with `outcome`.
    ///
    /// If the promise has already been dropped the outcome is discarded.
    pub fn settle(self, outcome: Result<T, E>) {
        let _ = self.outcome.send(outcome);
    }

    /// Returns `true` if the promise has been dropped and nobody can observe
    /// the settlement any more.
    pub fn is_orphaned(&self) -> bool {
        self.outcome.is_closed()
    }
}

impl<T, E> Sealant<T, E>
where
    E: From<Unsettled>,
{
    /// Settles the promise from a completion callback's value/error pair.
    ///
    /// An error always wins, even if a value is also present. A value with no
    /// error fulfills. Neither rejects with [`Unsettled::Empty`].
    pub fn resolve(self, value: Option<T>, error: Option<E>) {
        match (value, error) {
            (_, Some(err)) => self.reject(err),
            (Some(value), None) => self.fulfill(value),
            (None, None) => self.reject(Unsettled::Empty.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;
    use crate::ExecutionMode;

    #[derive(Debug, PartialEq)]
    enum TestError {
        Failed(&'static str),
        Unsettled(Unsettled),
    }

    impl From<Unsettled> for TestError {
        fn from(value: Unsettled) -> Self {
            Self::Unsettled(value)
        }
    }

    #[derive(Debug, PartialEq)]
    enum Wrapped {
        Inner(TestError),
        Unsettled(Unsettled),
        Odd(u32),
    }

    impl From<TestError> for Wrapped {
        fn from(value: TestError) -> Self {
            Self::Inner(value)
        }
    }

    impl From<Unsettled> for Wrapped {
        fn from(value: Unsettled) -> Self {
            Self::Unsettled(value)
        }
    }

    fn executor(mode: ExecutionMode) -> Executor {
        Executor::current(mode).unwrap()
    }

    /// Polls `promise` without awaiting it until it settles or time runs out.
    async fn settled_within<T, E: From<Unsettled>>(
        mut promise: Promise<T, E>,
    ) -> Option<Result<T, E>> {
        for _ in 0..400 {
            match promise.try_settled() {
                Ok(outcome) => return Some(outcome),
                Err(pending) => promise = pending,
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        None
    }

    #[tokio::test]
    async fn fulfilled_and_rejected_are_already_settled() {
        assert_eq!(Promise::<u32, TestError>::fulfilled(3).await, Ok(3));
        assert_eq!(
            Promise::<u32, TestError>::rejected(TestError::Failed("x")).await,
            Err(TestError::Failed("x"))
        );
    }

    #[tokio::test]
    async fn sealant_settles_from_another_thread() {
        let (promise, sealant) = Promise::<String, TestError>::pending();
        std::thread::spawn(move || sealant.fulfill("done".to_string()));
        assert_eq!(promise.await.unwrap(), "done");
    }

    #[tokio::test]
    async fn dropped_sealant_rejects_as_abandoned() {
        let (promise, sealant) = Promise::<u32, TestError>::pending();
        drop(sealant);
        assert_eq!(
            promise.await,
            Err(TestError::Unsettled(Unsettled::Abandoned))
        );
    }

    #[test]
    fn resolve_prefers_the_error_over_a_value() {
        let (promise, sealant) = Promise::<u32, TestError>::pending();
        sealant.resolve(Some(1), Some(TestError::Failed("boom")));
        assert_eq!(
            promise.try_settled().ok(),
            Some(Err(TestError::Failed("boom")))
        );
    }

    #[test]
    fn resolve_with_only_a_value_fulfills() {
        let (promise, sealant) = Promise::<u32, TestError>::pending();
        sealant.resolve(Some(9), None);
        assert_eq!(promise.try_settled().ok(), Some(Ok(9)));
    }

    #[test]
    fn resolve_with_neither_rejects_as_empty() {
        let (promise, sealant) = Promise::<u32, TestError>::pending();
        sealant.resolve(None, None);
        assert_eq!(
            promise.try_settled().ok(),
            Some(Err(TestError::Unsettled(Unsettled::Empty)))
        );
    }

    #[test]
    fn try_settled_hands_back_a_pending_promise() {
        let (promise, sealant) = Promise::<u32, TestError>::pending();
        let promise = promise.try_settled().unwrap_err();
        let promise = promise.try_settled().unwrap_err();
        sealant.fulfill(7);
        assert_eq!(promise.try_settled().ok(), Some(Ok(7)));
    }

    #[tokio::test]
    async fn pending_promise_from_try_settled_still_awaits_its_value() {
        let (promise, sealant) = Promise::<u32, TestError>::pending();
        let promise = promise.try_settled().unwrap_err();
        tokio::spawn(async move { sealant.fulfill(11) });
        assert_eq!(promise.await, Ok(11));
    }

    #[test]
    fn try_settled_reports_a_dropped_sealant_as_abandoned() {
        let (promise, sealant) = Promise::<u32, TestError>::pending();
        drop(sealant);
        assert_eq!(
            promise.try_settled().ok(),
            Some(Err(TestError::Unsettled(Unsettled::Abandoned)))
        );
    }

    #[test]
    fn with_sealant_runs_the_registration_immediately() {
        let promise = Promise::<u32, TestError>::with_sealant(|sealant| sealant.fulfill(5));
        assert_eq!(promise.try_settled().ok(), Some(Ok(5)));

        let dropped = Promise::<u32, TestError>::with_sealant(drop);
        assert_eq!(
            dropped.try_settled().ok(),
            Some(Err(TestError::Unsettled(Unsettled::Abandoned)))
        );
    }

    #[test]
    fn sealant_notices_a_dropped_promise() {
        let (promise, sealant) = Promise::<u32, TestError>::pending();
        assert!(!sealant.is_orphaned());
        drop(promise);
        assert!(sealant.is_orphaned());
        sealant.fulfill(1);
    }

    #[tokio::test]
    async fn then_on_maps_the_value_on_the_blocking_pool() {
        let parent = Promise::<u32, TestError>::fulfilled(20);
        let chained: Promise<String, Wrapped> =
            parent.then_on(&executor(ExecutionMode::Blocking), |n| Ok((n + 1).to_string()));
        assert_eq!(chained.await.unwrap(), "21");
    }

    #[tokio::test]
    async fn then_on_can_reject_from_the_continuation() {
        let parent = Promise::<u32, TestError>::fulfilled(3);
        let chained: Promise<u32, Wrapped> =
            parent.then_on(&executor(ExecutionMode::Task), |n| Err(Wrapped::Odd(n)));
        assert_eq!(chained.await, Err(Wrapped::Odd(3)));
    }

    #[tokio::test]
    async fn then_on_propagates_the_parent_rejection_unchanged() {
        let ran = Arc::new(AtomicBool::new(false));
        let flag = ran.clone();
        let parent = Promise::<u32, TestError>::rejected(TestError::Failed("offline"));
        let chained: Promise<u32, Wrapped> =
            parent.then_on(&executor(ExecutionMode::Task), move |n| {
                flag.store(true, Ordering::SeqCst);
                Ok(n)
            });
        assert_eq!(
            chained.await,
            Err(Wrapped::Inner(TestError::Failed("offline")))
        );
        assert!(!ran.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn then_on_settles_without_being_awaited() {
        let (parent, sealant) = Promise::<u32, TestError>::pending();
        let chained: Promise<u32, Wrapped> =
            parent.then_on(&executor(ExecutionMode::Blocking), |n| Ok(n * 2));
        sealant.fulfill(4);
        assert_eq!(settled_within(chained).await, Some(Ok(8)));
    }

    #[tokio::test]
    async fn panicking_continuation_rejects_as_aborted() {
        let parent = Promise::<u32, TestError>::fulfilled(1);
        let chained: Promise<u32, Wrapped> =
            parent.then_on(&executor(ExecutionMode::Blocking), |_| panic!("decoder bug"));
        assert_eq!(chained.await, Err(Wrapped::Unsettled(Unsettled::Aborted)));
    }

    #[tokio::test]
    async fn panicking_task_mode_continuation_rejects_as_aborted() {
        let parent = Promise::<u32, TestError>::fulfilled(1);
        let chained: Promise<u32, Wrapped> =
            parent.then_on(&executor(ExecutionMode::Task), |_| panic!("decoder bug"));
        assert_eq!(chained.await, Err(Wrapped::Unsettled(Unsettled::Aborted)));
    }

    #[tokio::test]
    async fn abandoned_parent_stays_distinct_from_an_aborted_continuation() {
        let (parent, sealant) = Promise::<u32, TestError>::pending();
        drop(sealant);
        let chained: Promise<u32, Wrapped> =
            parent.then_on(&executor(ExecutionMode::Task), Ok);
        assert_eq!(
            chained.await,
            Err(Wrapped::Inner(TestError::Unsettled(Unsettled::Abandoned)))
        );
    }

    #[tokio::test]
    async fn recover_on_replaces_a_rejection() {
        let parent = Promise::<u32, TestError>::rejected(TestError::Failed("cache miss"));
        let recovered = parent.recover_on(&executor(ExecutionMode::Task), |err| match err {
            TestError::Failed(_) => Ok(0),
            other => Err(other),
        });
        assert_eq!(recovered.await, Ok(0));
    }

    #[tokio::test]
    async fn recover_on_can_rethrow_and_skips_fulfilled_values() {
        let rethrown = Promise::<u32, TestError>::rejected(TestError::Failed("a"))
            .recover_on(&executor(ExecutionMode::Blocking), |_| {
                Err(TestError::Failed("b"))
            });
        assert_eq!(rethrown.await, Err(TestError::Failed("b")));

        let untouched = Promise::<u32, TestError>::fulfilled(2)
            .recover_on(&executor(ExecutionMode::Task), |_| Ok(99));
        assert_eq!(untouched.await, Ok(2));
    }

    #[tokio::test]
    async fn finally_on_runs_on_both_paths_and_passes_the_outcome_through() {
        let ran = Arc::new(AtomicBool::new(false));
        let flag = ran.clone();
        let fulfilled = Promise::<u32, TestError>::fulfilled(6)
            .finally_on(&executor(ExecutionMode::Blocking), move || {
                flag.store(true, Ordering::SeqCst)
            });
        assert_eq!(fulfilled.await, Ok(6));
        assert!(ran.load(Ordering::SeqCst));

        let ran = Arc::new(AtomicBool::new(false));
        let flag = ran.clone();
        let rejected = Promise::<u32, TestError>::rejected(TestError::Failed("x"))
            .finally_on(&executor(ExecutionMode::Task), move || {
                flag.store(true, Ordering::SeqCst)
            });
        assert_eq!(rejected.await, Err(TestError::Failed("x")));
        assert!(ran.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn when_keeps_input_order_regardless_of_settlement_order() {
        let (first, first_sealant) = Promise::<u32, TestError>::pending();
        let (second, second_sealant) = Promise::<u32, TestError>::pending();
        let all = Promise::when(
            [first, second, Promise::fulfilled(3)],
            &executor(ExecutionMode::Task),
        );
        second_sealant.fulfill(2);
        tokio::time::sleep(Duration::from_millis(5)).await;
        first_sealant.fulfill(1);
        assert_eq!(all.await, Ok(vec![1, 2, 3]));
    }

    #[tokio::test]
    async fn when_rejects_with_the_first_failure_without_waiting() {
        let (never, _held) = Promise::<u32, TestError>::pending();
        let all = Promise::when(
            [never, Promise::rejected(TestError::Failed("second"))],
            &executor(ExecutionMode::Task),
        );
        assert_eq!(all.await, Err(TestError::Failed("second")));
    }

    #[tokio::test]
    async fn when_with_no_promises_fulfils_empty() {
        let all = Promise::<u32, TestError>::when(Vec::new(), &executor(ExecutionMode::Task));
        assert_eq!(all.await, Ok(Vec::new()));
    }

    #[tokio::test]
    async fn join_waits_for_every_outcome() {
        let joined = Promise::join(
            [
                Promise::<u32, TestError>::rejected(TestError::Failed("one")),
                Promise::fulfilled(2),
            ],
            &executor(ExecutionMode::Task),
        );
        assert_eq!(
            joined.await,
            Ok(vec![Err(TestError::Failed("one")), Ok(2)])
        );
    }
}
