//! Actor issuing an edit

use crate::voxel::block::Block;
use crate::voxel::brush::Brush;
use crate::voxel::edit::UndoLedger;

/// The player or script an edit is performed on behalf of.
pub trait Actor {
    /// Display name used in logs
    fn name(&self) -> &str;

    /// Block type this actor last placed or clicked, used as a brush default
    fn last_used_block(&self) -> Option<Block>;

    /// Add to the actor's mutated-block statistics
    fn report_mutated(&mut self, count: u64);

    /// Deliver a message to the actor
    fn notify(&mut self, message: &str);

    /// Take ownership of the undo history of a finished edit
    fn record_undo(&mut self, _ledger: UndoLedger) {}
}

/// In-memory actor keeping its messages, statistics and last edit history
#[derive(Debug, Default)]
pub struct Session {
    name: String,
    last_block: Option<Block>,
    blocks_drawn: u64,
    messages: Vec<String>,
    undo: Option<UndoLedger>,
    /// Last brush descriptor, for "same brush again" invocations
    pub last_brush: Option<Brush>,
}

impl Session {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Builder-style setter for the last used block
    pub fn with_last_block(mut self, block: Block) -> Self {
        self.last_block = Some(block);
        self
    }

    pub fn set_last_block(&mut self, block: Option<Block>) {
        self.last_block = block;
    }

    /// Total blocks mutated by this actor's finished edits
    pub fn blocks_drawn(&self) -> u64 {
        self.blocks_drawn
    }

    /// Messages delivered so far
    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// Take the messages (clears the list)
    pub fn take_messages(&mut self) -> Vec<String> {
        std::mem::take(&mut self.messages)
    }

    /// Undo history of the most recent edit
    pub fn undo(&self) -> Option<&UndoLedger> {
        self.undo.as_ref()
    }

    /// Take the undo history of the most recent edit
    pub fn take_undo(&mut self) -> Option<UndoLedger> {
        self.undo.take()
    }
}

impl Actor for Session {
    fn name(&self) -> &str {
        &self.name
    }

    fn last_used_block(&self) -> Option<Block> {
        self.last_block
    }

    fn report_mutated(&mut self, count: u64) {
        self.blocks_drawn += count;
    }

    fn notify(&mut self, message: &str) {
        log::debug!("[{}] {}", self.name, message);
        self.messages.push(message.to_string());
    }

    fn record_undo(&mut self, ledger: UndoLedger) {
        self.undo = Some(ledger);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_statistics() {
        let mut session = Session::new("alice").with_last_block(Block::Brick);
        assert_eq!(session.name(), "alice");
        assert_eq!(session.last_used_block(), Some(Block::Brick));

        session.report_mutated(10);
        session.report_mutated(5);
        assert_eq!(session.blocks_drawn(), 15);
    }

    #[test]
    fn test_session_messages() {
        let mut session = Session::new("bob");
        session.notify("hello");
        session.notify("world");
        assert_eq!(session.messages().len(), 2);
        assert_eq!(session.take_messages(), vec!["hello", "world"]);
        assert!(session.messages().is_empty());
    }

    #[test]
    fn test_session_keeps_latest_undo() {
        let mut session = Session::new("carol");
        assert!(session.undo().is_none());

        session.record_undo(UndoLedger::new(4));
        assert!(session.take_undo().is_some());
        assert!(session.undo().is_none());
    }

    /// Actor relying on the trait defaults
    struct Console;

    impl Actor for Console {
        fn name(&self) -> &str {
            "console"
        }

        fn last_used_block(&self) -> Option<Block> {
            None
        }

        fn report_mutated(&mut self, _count: u64) {}

        fn notify(&mut self, _message: &str) {}
    }

    #[test]
    fn test_default_record_undo_discards() {
        let mut console = Console;
        let mut ledger = UndoLedger::new(2);
        ledger.record(crate::core::types::IVec3::ZERO, Block::Stone);
        console.record_undo(ledger);
        assert_eq!(console.name(), "console");
    }
}
