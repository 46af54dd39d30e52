//! Prefix tree over command names, used for tab completion.

use std::collections::BTreeMap;

#[derive(Debug, Default, Clone)]
struct Node {
    children: BTreeMap<char, Node>,
    is_word: bool,
}

/// A set of words indexed by their prefixes.
///
/// Edges are labelled with `char`s, so multi-byte characters are never split between
/// insertion and lookup. Children live in a [`BTreeMap`], which makes every query return
/// its words in a stable order: depth-first, code point order among siblings.
///
/// Example
/// ```
/// use tabshell::trie::PrefixTree;
/// let tree: PrefixTree = ["cd", "cat", "cargo"].into_iter().collect();
/// assert!(tree.search("cat"));
/// assert!(!tree.search("ca"));
/// assert_eq!(tree.words_starting_with("ca"), vec!["cargo", "cat"]);
/// ```
#[derive(Debug, Default, Clone)]
pub struct PrefixTree {
    root: Node,
}

impl PrefixTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a word. Inserting a word that is already present changes nothing.
    pub fn insert(&mut self, word: &str) {
        let mut node = &mut self.root;
        for c in word.chars() {
            node = node.children.entry(c).or_default();
        }
        node.is_word = true;
    }

    /// Whether `word` was inserted as a complete word.
    pub fn search(&self, word: &str) -> bool {
        self.find(word).is_some_and(|node| node.is_word)
    }

    /// Whether any stored word starts with `prefix`.
    pub fn starts_with(&self, prefix: &str) -> bool {
        self.find(prefix).is_some()
    }

    /// Every stored word that starts with `prefix`, including `prefix` itself when it is
    /// a stored word. An unknown prefix yields an empty vector.
    pub fn words_starting_with(&self, prefix: &str) -> Vec<String> {
        let Some(node) = self.find(prefix) else {
            return Vec::new();
        };
        let mut words = Vec::new();
        collect_words(node, &mut prefix.to_string(), &mut words);
        words
    }

    /// Words that extend `prefix`, partitioned by the character that immediately follows it.
    ///
    /// For `{apple, applet, appke, appkel, appde}` and prefix `app` this yields
    /// `[[appde], [appke, appkel], [apple, applet]]`. A single group means every
    /// continuation shares the next character; several groups mean the words diverge
    /// right after the prefix. `prefix` itself is never part of a group.
    pub fn words_starting_with_grouped(&self, prefix: &str) -> Vec<Vec<String>> {
        let Some(node) = self.find(prefix) else {
            return Vec::new();
        };
        node.children
            .iter()
            .filter_map(|(&c, child)| {
                let mut current = String::from(prefix);
                current.push(c);
                let mut group = Vec::new();
                collect_words(child, &mut current, &mut group);
                (!group.is_empty()).then_some(group)
            })
            .collect()
    }

    fn find(&self, prefix: &str) -> Option<&Node> {
        prefix
            .chars()
            .try_fold(&self.root, |node, c| node.children.get(&c))
    }
}

impl<S: AsRef<str>> FromIterator<S> for PrefixTree {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut tree = PrefixTree::new();
        for word in iter {
            tree.insert(word.as_ref());
        }
        tree
    }
}

// Recursion depth is bounded by the longest stored word.
fn collect_words(node: &Node, current: &mut String, out: &mut Vec<String>) {
    if node.is_word {
        out.push(current.clone());
    }
    for (&c, child) in &node.children {
        current.push(c);
        collect_words(child, current, out);
        current.pop();
    }
}
