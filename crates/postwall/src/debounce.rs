//! ⌨️ Debounce — because nobody needs to re-filter the wall on every keystroke.
//!
//! The displayed value follows every input immediately. Propagation waits for a quiet
//! period after the last input; any new input cancels the pending propagation and starts
//! the clock again. A burst of typing therefore propagates once, with its final value.
//!
//! The initial value is read once, in [`Debouncer::new`]. Want a new baseline? Make a new
//! debouncer. Dropping one cancels whatever it had pending. 🦆

use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::{Handle, TryCurrentError};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::trace;

type Propagate<T> = Arc<dyn Fn(T) + Send + Sync>;

/// ⌨️ Buffers rapid input and propagates the last value after things go quiet.
///
/// `input` schedules onto the current tokio runtime. Outside one it refuses with
/// [`TryCurrentError`] and leaves the debouncer untouched.
pub struct Debouncer<T> {
    displayed: T,
    quiet_period: Duration,
    propagate: Propagate<T>,
    pending: Option<JoinHandle<()>>,
}

impl<T: std::fmt::Debug> std::fmt::Debug for Debouncer<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Debouncer")
            .field("displayed", &self.displayed)
            .field("quiet_period", &self.quiet_period)
            .field("pending", &self.pending.is_some())
            .finish()
    }
}

impl<T: Clone + Send + 'static> Debouncer<T> {
    pub fn new(
        initial: T,
        quiet_period: Duration,
        propagate: impl Fn(T) + Send + Sync + 'static,
    ) -> Self {
        Self {
            displayed: initial,
            quiet_period,
            propagate: Arc::new(propagate),
            pending: None,
        }
    }

    /// ⌨️ One input event: show it now, propagate it later (maybe).
    pub fn input(&mut self, value: T) -> Result<(), TryCurrentError> {
        let runtime = Handle::try_current()?;
        self.displayed = value.clone();
        self.cancel();

        // -- ⏱️ deadline fixed at input time, not whenever the task first gets polled
        let deadline = Instant::now() + self.quiet_period;
        let propagate = Arc::clone(&self.propagate);
        self.pending = Some(runtime.spawn(async move {
            tokio::time::sleep_until(deadline).await;
            trace!("⌨️ Quiet period over, propagating");
            propagate(value);
        }));
        Ok(())
    }

    /// 🛑 Forget the scheduled propagation, if any. The displayed value stays.
    pub fn cancel(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }
    }
}

impl<T> Debouncer<T> {
    pub fn displayed(&self) -> &T {
        &self.displayed
    }

    pub fn quiet_period(&self) -> Duration {
        self.quiet_period
    }

    /// ⏳ Is a propagation scheduled and not yet done?
    pub fn is_pending(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|pending| !pending.is_finished())
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }
    }
}
