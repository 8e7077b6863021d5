//! Dictionary segmentation of tokens into documented chunks.
//!
//! A chunk is a documented grapheme, punctuation mark or whole-word gloss and
//! may span several characters. A token is *segmentable* when it is exactly a
//! concatenation of one or more chunks.
//!
//! Chunks are stored in an arena trie keyed by `char`. [`DictionarySegmenter::can_segment`]
//! runs a forward word-break scan over character positions: from every
//! reachable position the trie is walked along the token and each chunk end
//! marks a new reachable position. Only existence is decided, no segmentation
//! path is kept.

use std::collections::{BTreeSet, HashMap};

#[derive(Debug, Clone, Default)]
struct TrieNode {
    children: HashMap<char, usize>,
    /// A chunk ends here
    terminal: bool,
}

/// Decides whether tokens can be partitioned into dictionary chunks.
#[derive(Debug, Clone)]
pub struct DictionarySegmenter {
    nodes: Vec<TrieNode>,
    alphabet: BTreeSet<char>,
    chunk_count: usize,
}

impl DictionarySegmenter {
    /// Compile a chunk dictionary. Empty chunks are ignored, duplicates are harmless.
    pub fn new<I, S>(chunks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut segmenter = Self {
            nodes: vec![TrieNode::default()],
            alphabet: BTreeSet::new(),
            chunk_count: 0,
        };
        for chunk in chunks {
            segmenter.insert(chunk.as_ref());
        }
        segmenter
    }

    fn insert(&mut self, chunk: &str) {
        if chunk.is_empty() {
            return;
        }
        let mut node = 0;
        for c in chunk.chars() {
            self.alphabet.insert(c);
            node = match self.nodes[node].children.get(&c) {
                Some(&next) => next,
                None => {
                    let next = self.nodes.len();
                    self.nodes.push(TrieNode::default());
                    self.nodes[node].children.insert(c, next);
                    next
                }
            };
        }
        if !self.nodes[node].terminal {
            self.nodes[node].terminal = true;
            self.chunk_count += 1;
        }
    }

    /// Number of distinct chunks.
    pub fn len(&self) -> usize {
        self.chunk_count
    }

    pub fn is_empty(&self) -> bool {
        self.chunk_count == 0
    }

    /// Whether `token` is a concatenation of one or more chunks.
    pub fn can_segment(&self, token: &str) -> bool {
        let chars: Vec<char> = token.chars().collect();
        if chars.is_empty() {
            return false;
        }

        let mut reachable = vec![false; chars.len() + 1];
        reachable[0] = true;

        for start in 0..chars.len() {
            if !reachable[start] {
                continue;
            }
            let mut node = 0;
            for (offset, c) in chars[start..].iter().enumerate() {
                match self.nodes[node].children.get(c) {
                    Some(&next) => node = next,
                    None => break,
                }
                if self.nodes[node].terminal {
                    reachable[start + offset + 1] = true;
                }
            }
        }

        reachable[chars.len()]
    }

    /// Every character occurring in any chunk.
    pub fn alphabet(&self) -> &BTreeSet<char> {
        &self.alphabet
    }

    /// The characters of `token` that occur in no chunk, in token order.
    pub fn residue(&self, token: &str) -> String {
        token.chars().filter(|c| !self.alphabet.contains(c)).collect()
    }
}
