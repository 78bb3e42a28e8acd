//! Keyboard macros.
//!
//! The recorder keeps the commands applied while recording is on. Playback
//! hands out a queue of those commands; the session drains it through the
//! same `apply` path as live input, one command at a time. Nothing here
//! re-enters key dispatch, and the macro controls are never recorded, so a
//! macro can't play itself.

use std::collections::VecDeque;

use crate::command::EditCommand;

#[derive(Debug, Clone, Default)]
pub struct MacroRecorder {
    recording: bool,
    commands: Vec<EditCommand>,
}

impl MacroRecorder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    #[must_use]
    pub const fn is_recording(&self) -> bool {
        self.recording
    }

    /// Begin a new macro, discarding the previous one.
    pub fn start(&mut self) {
        self.recording = true;
        self.commands.clear();
    }

    /// Finish recording and return how many commands were captured.
    pub fn stop(&mut self) -> usize {
        self.recording = false;
        log::debug!("macro recorded: {} command(s)", self.commands.len());
        self.commands.len()
    }

    /// Stop without keeping anything. Returns `false` if nothing was being
    /// recorded.
    pub fn cancel(&mut self) -> bool {
        if !self.recording {
            return false;
        }
        self.recording = false;
        self.commands.clear();
        true
    }

    /// Append `cmd` if recording and the command is recordable.
    pub fn record(&mut self, cmd: &EditCommand) {
        if self.recording && cmd.is_recordable() {
            self.commands.push(cmd.clone());
        }
    }

    #[must_use]
    pub fn commands(&self) -> &[EditCommand] {
        &self.commands
    }

    /// A fresh queue of the recorded commands, in order.
    #[must_use]
    pub fn playback(&self) -> VecDeque<EditCommand> {
        self.commands.iter().cloned().collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_recorder_ignores_commands() {
        let mut rec = MacroRecorder::new();
        rec.record(&EditCommand::MoveDown);
        assert!(rec.commands().is_empty());
        assert!(!rec.is_recording());
    }

    #[test]
    fn start_record_stop() {
        let mut rec = MacroRecorder::new();
        rec.start();
        rec.record(&EditCommand::InsertChar('a'));
        rec.record(&EditCommand::Newline);
        assert_eq!(rec.stop(), 2);
        assert!(!rec.is_recording());
        assert_eq!(
            rec.commands(),
            &[EditCommand::InsertChar('a'), EditCommand::Newline]
        );
    }

    #[test]
    fn macro_controls_are_skipped() {
        let mut rec = MacroRecorder::new();
        rec.start();
        rec.record(&EditCommand::RunMacro);
        rec.record(&EditCommand::ToggleMacroRecording);
        rec.record(&EditCommand::LineEnd);
        assert_eq!(rec.stop(), 1);
    }

    #[test]
    fn start_discards_previous_macro() {
        let mut rec = MacroRecorder::new();
        rec.start();
        rec.record(&EditCommand::MoveUp);
        rec.stop();
        rec.start();
        assert!(rec.commands().is_empty());
    }

    #[test]
    fn cancel() {
        let mut rec = MacroRecorder::new();
        assert!(!rec.cancel());
        rec.start();
        rec.record(&EditCommand::MoveUp);
        assert!(rec.cancel());
        assert!(!rec.is_recording());
        assert!(rec.commands().is_empty());
    }

    #[test]
    fn playback_is_an_independent_queue() {
        let mut rec = MacroRecorder::new();
        rec.start();
        rec.record(&EditCommand::MoveUp);
        rec.record(&EditCommand::MoveDown);
        rec.stop();
        let mut queue = rec.playback();
        assert_eq!(queue.pop_front(), Some(EditCommand::MoveUp));
        assert_eq!(queue.pop_front(), Some(EditCommand::MoveDown));
        assert_eq!(queue.pop_front(), None);
        assert_eq!(rec.commands().len(), 2);
    }
}
