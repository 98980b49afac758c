//! §3 "Player state" and the guarded `change_state` transition rule of
//! §4.I: a mutation is visible only through a single lock, and every
//! actual change fires one callback.

use std::sync::Mutex;

/// One of the five values a [`crate::Player`] can be in (§3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerState {
    Stopped,
    Stopping,
    Opening,
    Playing,
    Paused,
}

type StateCallback = Box<dyn Fn(PlayerState) + Send + Sync>;

/// Guarded state cell plus its change callback.
///
/// `change_state(from, to)` is the guarded form used by `play()`/`pause()`:
/// it is a no-op, returning `false`, if the current value isn't `from`.
/// `force_state(to)` is the design note's wildcard (`from == -1` in the
/// original) used internally by the open/stop routines, which always
/// applies regardless of the current value.
pub struct StateHandle {
    state: Mutex<PlayerState>,
    on_change: Mutex<Option<StateCallback>>,
}

impl StateHandle {
    pub fn new(initial: PlayerState) -> Self {
        Self {
            state: Mutex::new(initial),
            on_change: Mutex::new(None),
        }
    }

    pub fn set_on_change<F>(&self, callback: F)
    where
        F: Fn(PlayerState) + Send + Sync + 'static,
    {
        *self.on_change.lock().unwrap() = Some(Box::new(callback));
    }

    pub fn get(&self) -> PlayerState {
        *self.state.lock().unwrap()
    }

    /// Guarded transition: a no-op unless the current state is `from`.
    /// Always notifies when it actually changes the value.
    pub fn change_state(&self, from: PlayerState, to: PlayerState) -> bool {
        {
            let mut guard = self.state.lock().unwrap();
            if *guard != from {
                return false;
            }
            if *guard == to {
                return false;
            }
            *guard = to;
        }
        self.notify(to);
        true
    }

    /// Wildcard transition, bypassing the `from` guard.
    pub fn force_state(&self, to: PlayerState) -> bool {
        {
            let mut guard = self.state.lock().unwrap();
            if *guard == to {
                return false;
            }
            *guard = to;
        }
        self.notify(to);
        true
    }

    fn notify(&self, to: PlayerState) {
        if let Some(callback) = self.on_change.lock().unwrap().as_ref() {
            callback(to);
        }
    }
}
