//! Bounded linear undo/redo history.
//!
//! Entries are command values. Position 0 always holds a sentinel that is
//! never undone, so `index == 0` means there is nothing to undo.

use std::marker::PhantomData;

use drawkit_core::constants::DEFAULT_HISTORY_CAPACITY;
use tracing::debug;

/// A reversible action on some target.
pub trait Command<T> {
    type Error;

    /// Applies (or re-applies) the command.
    fn execute(&mut self, target: &mut T) -> Result<(), Self::Error>;

    /// Reverts the command.
    fn undo(&mut self, target: &mut T) -> Result<(), Self::Error>;

    /// Returns the name of the command for display.
    fn name(&self) -> &str;

    /// Releases whatever the command still holds in `target` once it has
    /// left the history for good.
    fn discard(&mut self, _target: &mut T) -> Result<(), Self::Error> {
        Ok(())
    }
}

#[derive(Debug, Clone)]
enum Entry<C> {
    Sentinel,
    Command(C),
}

impl<C> Entry<C> {
    fn command_mut(&mut self) -> Option<&mut C> {
        match self {
            Entry::Sentinel => None,
            Entry::Command(command) => Some(command),
        }
    }

    fn command(&self) -> Option<&C> {
        match self {
            Entry::Sentinel => None,
            Entry::Command(command) => Some(command),
        }
    }

    fn into_command(self) -> Option<C> {
        match self {
            Entry::Sentinel => None,
            Entry::Command(command) => Some(command),
        }
    }
}

/// Undo/redo stack of commands acting on a `T`, with a cursor and a fixed
/// capacity.
#[derive(Debug, Clone)]
pub struct History<C, T> {
    entries: Vec<Entry<C>>,
    index: usize,
    capacity: usize,
    target: PhantomData<fn(&mut T)>,
}

impl<C: Command<T>, T> Default for History<C, T> {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

impl<C: Command<T>, T> History<C, T> {
    /// Creates an empty history holding at most `capacity` commands
    /// (at least one).
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: vec![Entry::Sentinel],
            index: 0,
            capacity: capacity.max(1),
            target: PhantomData,
        }
    }

    /// Records an already applied command.
    ///
    /// Drops everything after the cursor, appends, and evicts the oldest
    /// command once over capacity. Returns the commands that left the
    /// history, redo branch first.
    pub fn register(&mut self, command: C) -> Vec<C> {
        let mut dropped: Vec<C> = self
            .entries
            .drain(self.index + 1..)
            .filter_map(Entry::into_command)
            .collect();
        self.entries.push(Entry::Command(command));
        self.index += 1;
        if self.entries.len() - 1 > self.capacity {
            dropped.extend(self.entries.remove(1).into_command());
            self.index -= 1;
        }
        dropped
    }

    /// [`History::register`], then lets every dropped command release what
    /// it holds in `target`.
    pub fn record(&mut self, command: C, target: &mut T) -> Result<(), C::Error> {
        for mut dropped in self.register(command) {
            debug!("Discarding {}", dropped.name());
            dropped.discard(target)?;
        }
        Ok(())
    }

    pub fn can_undo(&self) -> bool {
        self.index > 0
    }

    pub fn can_redo(&self) -> bool {
        self.index + 1 < self.entries.len()
    }

    /// Number of commands held, excluding the sentinel.
    pub fn len(&self) -> usize {
        self.entries.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Cursor position; 0 is the sentinel.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Empties the history, returning the commands it held.
    pub fn clear(&mut self) -> Vec<C> {
        self.index = 0;
        self.entries
            .drain(1..)
            .filter_map(Entry::into_command)
            .collect()
    }

    /// Commands in registration order, oldest first.
    pub fn commands(&self) -> impl Iterator<Item = &C> {
        self.entries.iter().filter_map(Entry::command)
    }

    /// Name of the command [`History::undo`] would revert.
    pub fn undo_description(&self) -> Option<&str> {
        self.entries[self.index].command().map(|c| c.name())
    }

    /// Name of the command [`History::redo`] would re-apply.
    pub fn redo_description(&self) -> Option<&str> {
        self.entries
            .get(self.index + 1)
            .and_then(Entry::command)
            .map(|c| c.name())
    }

    /// Reverts the command at the cursor. Returns `false` at the sentinel.
    ///
    /// The cursor only moves when the command succeeds.
    pub fn undo(&mut self, target: &mut T) -> Result<bool, C::Error> {
        let Some(command) = self.entries[self.index].command_mut() else {
            return Ok(false);
        };
        command.undo(target)?;
        debug!("Undid {}", command.name());
        self.index -= 1;
        Ok(true)
    }

    /// Re-applies the command after the cursor. Returns `false` at the
    /// newest entry.
    pub fn redo(&mut self, target: &mut T) -> Result<bool, C::Error> {
        let Some(command) = self
            .entries
            .get_mut(self.index + 1)
            .and_then(Entry::command_mut)
        else {
            return Ok(false);
        };
        command.execute(target)?;
        debug!("Redid {}", command.name());
        self.index += 1;
        Ok(true)
    }
}
