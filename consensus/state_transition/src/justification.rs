use types::Slot;

/// Whether `slot` is a candidate for justification after `finalized_slot`
/// (the 3SF-mini rule). A slot qualifies when its distance from the finalized
/// slot is at most 5, a perfect square, or a pronic number `k * (k + 1)`.
pub fn is_justifiable_after(slot: Slot, finalized_slot: Slot) -> bool {
    if slot < finalized_slot {
        return false;
    }

    let delta = slot - finalized_slot;
    if delta <= 5 {
        return true;
    }

    let root = isqrt(delta);
    root.checked_mul(root) == Some(delta) || root.checked_mul(root + 1) == Some(delta)
}

/// Integer square root: the largest `r` with `r * r <= n`.
///
/// The float estimate can land one off near 2^63, so it is corrected until
/// both `r^2 <= n` and `(r + 1)^2 > n` hold.
fn isqrt(n: u64) -> u64 {
    if n == 0 {
        return 0;
    }

    let mut root = (n as f64).sqrt() as u64;
    if (root + 1)
        .checked_mul(root + 1)
        .map_or(false, |square| square <= n)
    {
        root += 1;
    } else if root.checked_mul(root).map_or(true, |square| square > n) {
        root -= 1;
    }
    root
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn justifiable_deltas() {
        for delta in [0, 1, 2, 3, 4, 5, 6, 9, 12, 16, 20, 25, 30, 36, 42, 49, 56, 64] {
            assert!(is_justifiable_after(delta, 0), "delta {} should justify", delta);
        }
    }

    #[test]
    fn unjustifiable_deltas() {
        for delta in [7, 8, 10, 11, 13, 14, 15, 17, 18, 19, 21, 22, 23, 24, 26] {
            assert!(
                !is_justifiable_after(delta, 0),
                "delta {} should not justify",
                delta
            );
        }
    }

    #[test]
    fn candidate_before_finalized_is_never_justifiable() {
        assert!(!is_justifiable_after(3, 4));
    }

    #[test]
    fn offsets_from_a_nonzero_finalized_slot() {
        assert!(is_justifiable_after(109, 100));
        assert!(!is_justifiable_after(107, 100));
    }

    #[test]
    fn isqrt_is_exact_near_large_squares() {
        let root = 1u64 << 31;
        let square = root * root;
        assert_eq!(isqrt(square), root);
        assert_eq!(isqrt(square - 1), root - 1);
        assert_eq!(isqrt(square + 1), root);

        assert!(is_justifiable_after(square, 0));
        assert!(!is_justifiable_after(square + 1, 0));
        // Pronic: root * (root + 1).
        assert!(is_justifiable_after(square + root, 0));
    }

    #[test]
    fn isqrt_handles_u64_max() {
        let root = isqrt(u64::MAX);
        assert_eq!(root, (1u64 << 32) - 1);
    }
}
