//! Scoring of attested forms against generated regular spellings.
//!
//! A minimal character-level edit alignment (insert/delete/replace) between
//! the expected and the attested spelling yields a deviation score, a
//! per-character mask over the attested form, and a flag telling whether
//! the deviation reaches into the stem region.

use serde::Serialize;
use smol_str::SmolStr;

use crate::types::Score;

/// Outcome of comparing one attested form against one expected spelling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiffResult {
    /// characters touched by insert/replace/delete operations
    pub score: Score,
    /// per-character flags over the attested form: true where the character
    /// was inserted or replaced relative to the expected spelling
    pub mask: Vec<bool>,
    /// whether any edit starts before the stem/ending boundary
    pub stem_mismatch: bool,
}

impl DiffResult {
    /// A zero-deviation result for a form of `len` characters, used when no
    /// comparison is possible. Absence of evidence is not penalized.
    pub fn neutral(len: usize) -> DiffResult {
        DiffResult {
            score: 0,
            mask: vec![false; len],
            stem_mismatch: false,
        }
    }

    /// True when the attested form matched an expected spelling exactly.
    pub fn is_exact(&self) -> bool {
        self.score == 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OpKind {
    Equal,
    Replace,
    Delete,
    Insert,
}

/// One run of identical edit operations; `a` ranges index the expected
/// string, `b` ranges the attested one.
#[derive(Debug, Clone, Copy)]
struct Opcode {
    kind: OpKind,
    a_start: usize,
    a_end: usize,
    b_start: usize,
    b_end: usize,
}

/// Minimal edit alignment between `a` (expected) and `b` (attested),
/// as maximal runs of one operation kind. Backtrace preference is fixed
/// (diagonal, then delete, then insert) so the alignment is deterministic.
fn align(a: &[char], b: &[char]) -> Vec<Opcode> {
    let n = a.len();
    let m = b.len();
    let idx = |i: usize, j: usize| i * (m + 1) + j;
    let mut d = vec![0u32; (n + 1) * (m + 1)];
    for i in 1..=n {
        d[idx(i, 0)] = i as u32;
    }
    for j in 1..=m {
        d[idx(0, j)] = j as u32;
    }
    for i in 1..=n {
        for j in 1..=m {
            let sub = d[idx(i - 1, j - 1)] + u32::from(a[i - 1] != b[j - 1]);
            let del = d[idx(i - 1, j)] + 1;
            let ins = d[idx(i, j - 1)] + 1;
            d[idx(i, j)] = sub.min(del).min(ins);
        }
    }

    let mut steps: Vec<(OpKind, usize, usize)> = Vec::with_capacity(n.max(m));
    let (mut i, mut j) = (n, m);
    while i > 0 || j > 0 {
        if i > 0
            && j > 0
            && d[idx(i, j)] == d[idx(i - 1, j - 1)] + u32::from(a[i - 1] != b[j - 1])
        {
            let kind = if a[i - 1] == b[j - 1] {
                OpKind::Equal
            } else {
                OpKind::Replace
            };
            steps.push((kind, i - 1, j - 1));
            i -= 1;
            j -= 1;
        } else if i > 0 && d[idx(i, j)] == d[idx(i - 1, j)] + 1 {
            steps.push((OpKind::Delete, i - 1, j));
            i -= 1;
        } else {
            steps.push((OpKind::Insert, i, j - 1));
            j -= 1;
        }
    }
    steps.reverse();

    let mut ops: Vec<Opcode> = Vec::new();
    for (kind, ai, bj) in steps {
        let (a_start, a_end, b_start, b_end) = match kind {
            OpKind::Equal | OpKind::Replace => (ai, ai + 1, bj, bj + 1),
            OpKind::Delete => (ai, ai + 1, bj, bj),
            OpKind::Insert => (ai, ai, bj, bj + 1),
        };
        match ops.last_mut() {
            Some(last)
                if last.kind == kind && last.a_end == a_start && last.b_end == b_start =>
            {
                last.a_end = a_end;
                last.b_end = b_end;
            }
            _ => ops.push(Opcode {
                kind,
                a_start,
                a_end,
                b_start,
                b_end,
            }),
        }
    }
    ops
}

/// Compares one attested form against one expected spelling.
///
/// `ending` is the regular grammatical ending for the slot; an edit whose
/// start position (in either string) falls before `len − len(ending)` is a
/// stem mismatch. Empty inputs yield a neutral result.
pub fn diff(actual: &str, expected: &str, ending: &str) -> DiffResult {
    let actual_chars: Vec<char> = actual.chars().collect();
    if actual.is_empty() || expected.is_empty() || actual == expected {
        return DiffResult::neutral(actual_chars.len());
    }
    let expected_chars: Vec<char> = expected.chars().collect();
    let ending_len = ending.chars().count();
    let boundary_expected = expected_chars.len().saturating_sub(ending_len);
    let boundary_actual = actual_chars.len().saturating_sub(ending_len);

    let mut score: Score = 0;
    let mut mask = vec![false; actual_chars.len()];
    let mut stem_mismatch = false;

    for op in align(&expected_chars, &actual_chars) {
        match op.kind {
            OpKind::Equal => continue,
            OpKind::Replace | OpKind::Insert => {
                score += (op.b_end - op.b_start) as Score;
                for flag in &mut mask[op.b_start..op.b_end] {
                    *flag = true;
                }
            }
            OpKind::Delete => {
                score += (op.a_end - op.a_start) as Score;
            }
        }
        if op.a_start < boundary_expected || op.b_start < boundary_actual {
            stem_mismatch = true;
        }
    }

    DiffResult {
        score,
        mask,
        stem_mismatch,
    }
}

/// Compares an attested form against every expected variant and returns the
/// result for the closest one.
///
/// The lowest score wins; ties keep the first-encountered variant, which is
/// deterministic because the generator emits variants in a fixed order. An
/// empty variant list yields a neutral result. Variants are ranked by plain
/// edit distance first; the full alignment runs once, for the winner.
pub fn best_variant(actual: &str, variants: &[SmolStr], ending: &str) -> DiffResult {
    if variants.is_empty() || actual.is_empty() {
        return DiffResult::neutral(actual.chars().count());
    }
    let mut best = 0;
    let mut best_distance = usize::MAX;
    for (i, variant) in variants.iter().enumerate() {
        let distance = strsim::levenshtein(variant, actual);
        if distance < best_distance {
            best_distance = distance;
            best = i;
            if distance == 0 {
                break;
            }
        }
    }
    diff(actual, &variants[best], ending)
}
