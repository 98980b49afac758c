//! §4.D Command bus: a single pending-command slot plus a busy gate.
//!
//! `submit` begins a command immediately if the bus is idle, otherwise it
//! replaces whatever was pending — last writer wins, so a `Stop` queued
//! behind an in-flight `Open` supersedes it, and a second `Open`
//! supersedes the first. `on_command_finished` is called by the worker
//! that just finished a command; if something was queued behind it, that
//! becomes the next command to begin.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;

#[derive(Debug, Clone)]
pub enum Command {
    Open { id: u64, url: String },
    Stop { id: u64 },
}

impl Command {
    pub fn id(&self) -> u64 {
        match self {
            Command::Open { id, .. } => *id,
            Command::Stop { id } => *id,
        }
    }
}

pub struct CommandBus {
    next_id: AtomicU64,
    busy: AtomicBool,
    pending: Mutex<Option<Command>>,
}

impl Default for CommandBus {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandBus {
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            busy: AtomicBool::new(false),
            pending: Mutex::new(None),
        }
    }

    pub fn next_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::SeqCst)
    }

    /// Returns `Some(cmd)` when the caller should begin executing it now;
    /// `None` when it was instead stashed in the pending slot.
    pub fn submit(&self, cmd: Command) -> Option<Command> {
        let mut pending = self.pending.lock().unwrap();
        let was_busy = self.busy.swap(true, Ordering::SeqCst);
        if was_busy {
            *pending = Some(cmd);
            None
        } else {
            Some(cmd)
        }
    }

    /// Called by the worker that just finished a command. Returns the
    /// next command to begin, if one was queued behind it.
    pub fn on_command_finished(&self) -> Option<Command> {
        let mut pending = self.pending.lock().unwrap();
        match pending.take() {
            Some(cmd) => Some(cmd),
            None => {
                self.busy.store(false, Ordering::SeqCst);
                None
            }
        }
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_submit_begins_immediately() {
        let bus = CommandBus::new();
        let begun = bus.submit(Command::Open { id: 1, url: "a".into() });
        assert!(begun.is_some());
        assert!(bus.is_busy());
    }

    #[test]
    fn second_submit_while_busy_is_queued_not_begun() {
        let bus = CommandBus::new();
        bus.submit(Command::Open { id: 1, url: "a".into() });
        let begun = bus.submit(Command::Open { id: 2, url: "b".into() });
        assert!(begun.is_none());
    }

    #[test]
    fn last_writer_wins_stop_overrides_queued_open() {
        let bus = CommandBus::new();
        bus.submit(Command::Open { id: 1, url: "a".into() });
        bus.submit(Command::Open { id: 2, url: "b".into() });
        bus.submit(Command::Stop { id: 3 });
        let next = bus.on_command_finished();
        match next {
            Some(Command::Stop { id: 3 }) => {}
            other => panic!("expected Stop to supersede queued Open, got {other:?}"),
        }
    }

    #[test]
    fn finishing_with_nothing_pending_clears_busy() {
        let bus = CommandBus::new();
        bus.submit(Command::Open { id: 1, url: "a".into() });
        assert!(bus.on_command_finished().is_none());
        assert!(!bus.is_busy());
    }
}
