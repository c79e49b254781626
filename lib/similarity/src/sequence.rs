//! Sequence alignment similarity
//!
//! Ratcliff/Obershelp "gestalt" matching: repeatedly take the longest common
//! contiguous block, recurse on the pieces to its left and right, and score
//! `2 * matched / (len(a) + len(b))`. Operates on Unicode scalar values.

use ahash::AHashMap;

/// Second sequences at least this long get the popular-element heuristic
const AUTOJUNK_MIN_LEN: usize = 200;

/// Precomputed lookup over the second sequence.
struct SecondSequence<'b> {
    b: &'b [char],
    /// Positions of each element in `b`, ascending. Popular elements are absent.
    positions: AHashMap<char, Vec<usize>>,
}

impl<'b> SecondSequence<'b> {
    fn new(b: &'b [char]) -> Self {
        let mut positions: AHashMap<char, Vec<usize>> = AHashMap::new();
        for (j, &c) in b.iter().enumerate() {
            positions.entry(c).or_default().push(j);
        }

        // Elements making up more than 1% of a long sequence are dropped from
        // the lookup; blocks can still grow across them when extended.
        let n = b.len();
        if n >= AUTOJUNK_MIN_LEN {
            let limit = n / 100 + 1;
            positions.retain(|_, idxs| idxs.len() <= limit);
        }

        Self { b, positions }
    }

    /// Longest matching block in `a[alo..ahi]` and `b[blo..bhi]`, as
    /// `(i, j, size)`. Among equal sizes the earliest in `a`, then in `b`, wins.
    fn longest_match(
        &self,
        a: &[char],
        alo: usize,
        ahi: usize,
        blo: usize,
        bhi: usize,
    ) -> (usize, usize, usize) {
        let b = self.b;
        let (mut best_i, mut best_j, mut best_size) = (alo, blo, 0usize);

        // run_len[j] = length of the match ending at a[i - 1], b[j]
        let mut run_len: AHashMap<usize, usize> = AHashMap::new();
        for i in alo..ahi {
            let mut next_run_len: AHashMap<usize, usize> = AHashMap::new();
            if let Some(idxs) = self.positions.get(&a[i]) {
                for &j in idxs {
                    if j < blo {
                        continue;
                    }
                    if j >= bhi {
                        break;
                    }
                    let k = j
                        .checked_sub(1)
                        .and_then(|prev| run_len.get(&prev))
                        .copied()
                        .unwrap_or(0)
                        + 1;
                    next_run_len.insert(j, k);
                    if k > best_size {
                        best_i = i + 1 - k;
                        best_j = j + 1 - k;
                        best_size = k;
                    }
                }
            }
            run_len = next_run_len;
        }

        while best_i > alo && best_j > blo && a[best_i - 1] == b[best_j - 1] {
            best_i -= 1;
            best_j -= 1;
            best_size += 1;
        }
        while best_i + best_size < ahi
            && best_j + best_size < bhi
            && a[best_i + best_size] == b[best_j + best_size]
        {
            best_size += 1;
        }

        (best_i, best_j, best_size)
    }

    /// Total number of elements covered by matching blocks.
    fn matched_len(&self, a: &[char]) -> usize {
        let mut pending = vec![(0, a.len(), 0, self.b.len())];
        let mut matched = 0;

        while let Some((alo, ahi, blo, bhi)) = pending.pop() {
            let (i, j, k) = self.longest_match(a, alo, ahi, blo, bhi);
            if k == 0 {
                continue;
            }
            matched += k;
            if alo < i && blo < j {
                pending.push((alo, i, blo, j));
            }
            if i + k < ahi && j + k < bhi {
                pending.push((i + k, ahi, j + k, bhi));
            }
        }

        matched
    }
}

/// Similarity ratio in `[0, 1]` between two strings; 1.0 for two empty strings.
///
/// The measure is not symmetric in general: junk detection only looks at `b`.
pub fn sequence_ratio(a: &str, b: &str) -> f32 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }

    let matched = SecondSequence::new(&b).matched_len(&a);
    (2.0 * matched as f64 / total as f64) as f32
}

/// Case-insensitive [`sequence_ratio`], the lexical check applied to a
/// query and a candidate question.
pub fn text_similarity(query: &str, question: &str) -> f32 {
    sequence_ratio(&query.to_lowercase(), &question.to_lowercase())
}
