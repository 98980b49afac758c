//! §4.J Buffering controller: a single edge-triggered boolean gate.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

type ChangeCallback = Box<dyn Fn(bool) + Send + Sync>;

/// Gates both render stages. Set on open start, on seek, and on video
/// queue underrun; cleared once the packet buffer is full or enough
/// video has accumulated downstream.
pub struct Buffering {
    flag: AtomicBool,
    on_change: Mutex<Option<ChangeCallback>>,
}

impl Default for Buffering {
    fn default() -> Self {
        Self::new()
    }
}

impl Buffering {
    pub fn new() -> Self {
        Self {
            flag: AtomicBool::new(false),
            on_change: Mutex::new(None),
        }
    }

    pub fn set_on_change<F>(&self, callback: F)
    where
        F: Fn(bool) + Send + Sync + 'static,
    {
        *self.on_change.lock().unwrap() = Some(Box::new(callback));
    }

    pub fn get(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    pub fn set(&self, value: bool) {
        let previous = self.flag.swap(value, Ordering::SeqCst);
        if previous != value {
            if let Some(callback) = self.on_change.lock().unwrap().as_ref() {
                callback(value);
            }
        }
    }
}
