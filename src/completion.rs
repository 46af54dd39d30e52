//! Tab completion of command names.

use crate::trie::PrefixTree;
use tracing::debug;

/// Source of completion candidates for the line editor.
pub trait Complete {
    /// Candidates for the current, unsubmitted input. Empty when nothing matches.
    fn complete(&self, input: &str) -> Vec<String>;
}

/// Completes command names stored in a [`PrefixTree`].
///
/// The policy works at word granularity:
/// - empty input never completes, so a bare tab doesn't list every command;
/// - when all matches continue with the same next character, only the first of them is
///   offered, and the editor completes straight to it;
/// - when matches diverge right after the input, every match is offered, in group order.
pub struct CommandCompleter<'a> {
    tree: &'a PrefixTree,
}

impl<'a> CommandCompleter<'a> {
    pub fn new(tree: &'a PrefixTree) -> Self {
        Self { tree }
    }
}

impl Complete for CommandCompleter<'_> {
    fn complete(&self, input: &str) -> Vec<String> {
        if input.is_empty() {
            return Vec::new();
        }

        let mut groups = self.tree.words_starting_with_grouped(input);
        debug!(input, groups = groups.len(), "completing command name");
        match groups.len() {
            0 => Vec::new(),
            1 => groups.swap_remove(0).into_iter().take(1).collect(),
            _ => groups.into_iter().flatten().collect(),
        }
    }
}
