//! Similarity scoring for fuzzy deduplication
//!
//! Gestalt (Ratcliff/Obershelp) pattern matching: find the longest common
//! contiguous block, then recurse on the pieces to its left and right. The
//! similarity ratio is `2 * M / T`, where `M` is the number of matched
//! characters and `T` the combined length of both strings.
//!
//! Strings are compared as sequences of Unicode scalar values.

use std::borrow::Cow;
use std::collections::{HashMap, HashSet};

/// Length of `b` from which frequent characters stop seeding matches
const AUTOJUNK_MIN_LEN: usize = 200;

/// A matching block: `a[a_start..a_start + size] == b[b_start..b_start + size]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct MatchBlock {
    pub a_start: usize,
    pub b_start: usize,
    pub size: usize,
}

/// Pairwise sequence matcher over two character sequences
#[derive(Debug, Clone)]
pub struct SequenceMatcher<'a> {
    a: Cow<'a, [char]>,
    b: Cow<'a, [char]>,
    /// Positions of each character of `b`, ascending. Popular characters are left out.
    b2j: HashMap<char, Vec<usize>>,
}

impl SequenceMatcher<'static> {
    pub fn new(a: &str, b: &str) -> Self {
        let a: Vec<char> = a.chars().collect();
        let b: Vec<char> = b.chars().collect();
        let b2j = index_b(&b);
        Self {
            a: Cow::Owned(a),
            b: Cow::Owned(b),
            b2j,
        }
    }
}

impl<'a> SequenceMatcher<'a> {
    pub fn from_chars(a: &'a [char], b: &'a [char]) -> Self {
        Self {
            a: Cow::Borrowed(a),
            b: Cow::Borrowed(b),
            b2j: index_b(b),
        }
    }

    /// Longest matching block in `a[alo..ahi]` and `b[blo..bhi]`.
    ///
    /// Among blocks of maximal size, the one starting earliest in `a` wins,
    /// then the one starting earliest in `b`. A zero-size block means no match.
    pub fn find_longest_match(&self, alo: usize, ahi: usize, blo: usize, bhi: usize) -> MatchBlock {
        let (a, b) = (&self.a, &self.b);
        let (mut besti, mut bestj, mut bestsize) = (alo, blo, 0usize);

        // j2len[j] = length of the longest match ending with a[i - 1] and b[j]
        let mut j2len: HashMap<usize, usize> = HashMap::new();
        for i in alo..ahi {
            let mut new_j2len: HashMap<usize, usize> = HashMap::new();
            if let Some(positions) = self.b2j.get(&a[i]) {
                for &j in positions {
                    if j < blo {
                        continue;
                    }
                    if j >= bhi {
                        break;
                    }
                    let k = match j.checked_sub(1) {
                        Some(prev) => j2len.get(&prev).copied().unwrap_or(0) + 1,
                        None => 1,
                    };
                    new_j2len.insert(j, k);
                    if k > bestsize {
                        besti = i + 1 - k;
                        bestj = j + 1 - k;
                        bestsize = k;
                    }
                }
            }
            j2len = new_j2len;
        }

        // Popular characters never seed a match, but a match may extend across them
        while besti > alo && bestj > blo && a[besti - 1] == b[bestj - 1] {
            besti -= 1;
            bestj -= 1;
            bestsize += 1;
        }
        while besti + bestsize < ahi
            && bestj + bestsize < bhi
            && a[besti + bestsize] == b[bestj + bestsize]
        {
            bestsize += 1;
        }

        MatchBlock {
            a_start: besti,
            b_start: bestj,
            size: bestsize,
        }
    }

    /// All non-overlapping matching blocks, ascending, adjacent blocks merged,
    /// followed by a zero-size sentinel at `(len(a), len(b))`.
    pub fn matching_blocks(&self) -> Vec<MatchBlock> {
        let mut blocks = self.raw_matching_blocks();
        blocks.sort();

        let mut merged: Vec<MatchBlock> = Vec::with_capacity(blocks.len() + 1);
        for block in blocks {
            match merged.last_mut() {
                Some(last)
                    if last.a_start + last.size == block.a_start
                        && last.b_start + last.size == block.b_start =>
                {
                    last.size += block.size;
                }
                _ => merged.push(block),
            }
        }

        merged.push(MatchBlock {
            a_start: self.a.len(),
            b_start: self.b.len(),
            size: 0,
        });
        merged
    }

    fn raw_matching_blocks(&self) -> Vec<MatchBlock> {
        let mut blocks = Vec::new();
        let mut queue = vec![(0, self.a.len(), 0, self.b.len())];

        while let Some((alo, ahi, blo, bhi)) = queue.pop() {
            let block = self.find_longest_match(alo, ahi, blo, bhi);
            if block.size == 0 {
                continue;
            }
            let (i, j, k) = (block.a_start, block.b_start, block.size);
            blocks.push(block);
            if alo < i && blo < j {
                queue.push((alo, i, blo, j));
            }
            if i + k < ahi && j + k < bhi {
                queue.push((i + k, ahi, j + k, bhi));
            }
        }

        blocks
    }

    /// Number of matched characters across all matching blocks
    pub fn matched_chars(&self) -> usize {
        self.raw_matching_blocks().iter().map(|b| b.size).sum()
    }

    /// Similarity ratio in `[0, 1]`; `1.0` for identical (including empty) strings
    pub fn ratio(&self) -> f64 {
        calculate_ratio(self.matched_chars(), self.a.len() + self.b.len())
    }

    /// Upper bound on [`ratio`](Self::ratio) from the character multisets alone
    pub fn quick_ratio(&self) -> f64 {
        let mut available: HashMap<char, usize> = HashMap::new();
        for &c in self.b.iter() {
            *available.entry(c).or_insert(0) += 1;
        }

        let mut matches = 0;
        for c in self.a.iter() {
            if let Some(count) = available.get_mut(c) {
                if *count > 0 {
                    *count -= 1;
                    matches += 1;
                }
            }
        }

        calculate_ratio(matches, self.a.len() + self.b.len())
    }
}

fn index_b(b: &[char]) -> HashMap<char, Vec<usize>> {
    let mut b2j: HashMap<char, Vec<usize>> = HashMap::new();
    for (j, &c) in b.iter().enumerate() {
        b2j.entry(c).or_default().push(j);
    }

    let n = b.len();
    if n >= AUTOJUNK_MIN_LEN {
        let limit = n / 100 + 1;
        let popular: HashSet<char> = b2j
            .iter()
            .filter(|(_, positions)| positions.len() > limit)
            .map(|(&c, _)| c)
            .collect();
        for c in popular {
            b2j.remove(&c);
        }
    }

    b2j
}

fn calculate_ratio(matches: usize, total_len: usize) -> f64 {
    if total_len == 0 {
        return 1.0;
    }
    2.0 * matches as f64 / total_len as f64
}

/// Compute the similarity ratio between two strings (0.0 to 1.0)
pub fn similarity_ratio(a: &str, b: &str) -> f64 {
    SequenceMatcher::new(a, b).ratio()
}
