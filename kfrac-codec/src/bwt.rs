//! Burrows-Wheeler Transform.
//!
//! The BWT sorts all cyclic rotations of a block and keeps the byte that
//! precedes each rotation. Equal contexts end up next to each other, so the
//! output has long stretches of repeated bytes that MTF turns into zeros.
//!
//! Rotations are ranked by prefix doubling: after the pass with step `k`,
//! `rank[i]` orders rotation `i` by its first `2k` bytes. Passes sort by the
//! pair `(rank[i], rank[i + k])` with a stable sort, so rotations that are
//! equal in full (periodic input) keep their start-index order.

use kfrac_core::error::{KfracError, Result};

/// Perform the Burrows-Wheeler Transform.
///
/// Returns the last column and the primary index, the rank of the rotation
/// starting at offset 0. Empty input gives `(vec![], 0)`.
pub fn transform(data: &[u8]) -> (Vec<u8>, usize) {
    let n = data.len();
    if n == 0 {
        return (Vec::new(), 0);
    }

    let order = sort_rotations(data);

    let mut primary_index = 0;
    let mut transformed = Vec::with_capacity(n);
    for (row, &start) in order.iter().enumerate() {
        if start == 0 {
            primary_index = row;
        }
        transformed.push(data[(start + n - 1) % n]);
    }

    (transformed, primary_index)
}

/// Rotation start indices in sorted order.
fn sort_rotations(data: &[u8]) -> Vec<usize> {
    let n = data.len();
    let mut order: Vec<usize> = (0..n).collect();
    let mut rank: Vec<usize> = data.iter().map(|&b| b as usize).collect();
    let mut next_rank = vec![0usize; n];

    order.sort_by_key(|&i| rank[i]);

    let mut k = 1;
    while k < n {
        let key = |i: usize, rank: &[usize]| (rank[i], rank[(i + k) % n]);
        order.sort_by_key(|&i| key(i, &rank));

        next_rank[order[0]] = 0;
        for pair in order.windows(2) {
            let (prev, cur) = (pair[0], pair[1]);
            let step = usize::from(key(prev, &rank) != key(cur, &rank));
            next_rank[cur] = next_rank[prev] + step;
        }
        std::mem::swap(&mut rank, &mut next_rank);

        // All rotations distinct: further passes cannot reorder anything.
        if rank[order[n - 1]] == n - 1 {
            break;
        }
        k *= 2;
    }

    order
}

/// Perform the inverse Burrows-Wheeler Transform.
///
/// Walks backward from the primary row with the last-to-first mapping
/// `LF[j] = C[L[j]] + occ[j]`, where `C` counts bytes smaller than `L[j]` and
/// `occ[j]` counts earlier occurrences of `L[j]`.
pub fn inverse_transform(data: &[u8], primary_index: usize) -> Result<Vec<u8>> {
    let n = data.len();
    if n == 0 {
        if primary_index != 0 {
            return Err(KfracError::invalid_header(format!(
                "primary index {primary_index} for an empty block"
            )));
        }
        return Ok(Vec::new());
    }
    if primary_index >= n {
        return Err(KfracError::invalid_header(format!(
            "primary index {primary_index} out of range for block of {n} bytes"
        )));
    }

    let mut counts = [0usize; 256];
    let mut occurrence = Vec::with_capacity(n);
    for &byte in data {
        occurrence.push(counts[byte as usize]);
        counts[byte as usize] += 1;
    }

    let mut cumulative = [0usize; 256];
    let mut total = 0;
    for (c, &count) in cumulative.iter_mut().zip(counts.iter()) {
        *c = total;
        total += count;
    }

    let mut result = vec![0u8; n];
    let mut row = primary_index;
    for slot in result.iter_mut().rev() {
        let byte = data[row];
        *slot = byte;
        row = cumulative[byte as usize] + occurrence[row];
    }

    Ok(result)
}
