//! Memoized one-at-a-time loads.
//!
//! A [`Memo`] owns the cached state of one expensive asynchronous load. The
//! first caller creates the load future and parks a [`Shared`] clone of it in
//! the memo; callers arriving while it runs await the same clone. The mutex is
//! only held to inspect or swap the state, never across an await.

use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};

use futures_util::FutureExt;
use futures_util::future::Shared;

use crate::{LoadError, LoadFut};

type SharedLoad<T> = Shared<LoadFut<'static, T>>;

/// Observable state of a memoized load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadPhase {
    NotStarted,
    InFlight,
    Ready,
    /// The last attempt failed; the next request starts a new one.
    Failed,
}

impl LoadPhase {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            LoadPhase::NotStarted => "not started",
            LoadPhase::InFlight => "loading",
            LoadPhase::Ready => "ready",
            LoadPhase::Failed => "failed",
        }
    }
}

impl fmt::Display for LoadPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

enum State<T> {
    NotStarted,
    InFlight(SharedLoad<T>),
    Ready(T),
    Failed(LoadError),
}

pub(crate) struct Memo<T> {
    state: Mutex<State<T>>,
}

impl<T> Memo<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub(crate) fn new() -> Self {
        Self {
            state: Mutex::new(State::NotStarted),
        }
    }

    pub(crate) fn phase(&self) -> LoadPhase {
        match &*self.lock() {
            State::NotStarted => LoadPhase::NotStarted,
            State::InFlight(_) => LoadPhase::InFlight,
            State::Ready(_) => LoadPhase::Ready,
            State::Failed(_) => LoadPhase::Failed,
        }
    }

    pub(crate) fn ready(&self) -> Option<T> {
        match &*self.lock() {
            State::Ready(value) => Some(value.clone()),
            _ => None,
        }
    }

    pub(crate) fn last_error(&self) -> Option<LoadError> {
        match &*self.lock() {
            State::Failed(err) => Some(err.clone()),
            _ => None,
        }
    }

    /// Return the cached value, join the in-flight load, or start one with
    /// `start`.
    pub(crate) async fn get_or_load<F>(&self, start: F) -> Result<T, LoadError>
    where
        F: FnOnce() -> LoadFut<'static, T>,
    {
        let pending = {
            let mut state = self.lock();
            match &*state {
                State::Ready(value) => return Ok(value.clone()),
                State::InFlight(pending) => pending.clone(),
                State::NotStarted | State::Failed(_) => {
                    let pending = start().shared();
                    *state = State::InFlight(pending.clone());
                    pending
                }
            }
        };

        let result = pending.clone().await;

        // Every joined caller lands here; only the first one to observe the
        // still-current attempt records its outcome.
        let mut state = self.lock();
        let still_current =
            matches!(&*state, State::InFlight(current) if current.ptr_eq(&pending));
        if still_current {
            *state = match &result {
                Ok(value) => State::Ready(value.clone()),
                Err(err) => State::Failed(err.clone()),
            };
        }
        result
    }

    fn lock(&self) -> MutexGuard<'_, State<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
