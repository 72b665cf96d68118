//! Keyframe lookup for a query time.
//!
//! Model:
//! - Keys are sorted by `key_time`; duplicates keep input order.
//! - Times at or before the first key hold the first value, times at or after
//!   the last key hold the last value. Both ends win over duplicate runs.
//! - A time equal to an interior key's time returns that key's value exactly;
//!   on a run of equal times the last key of the run wins.
//! - Any other time falls in the segment `[i, i+1]` with
//!   `keys[i].key_time <= time < keys[i+1].key_time`.

use crate::data::Keyframe;

/// Where a query time falls relative to the keyframes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Bracket {
    /// At or before the first key.
    BeforeFirst,
    /// At or after the last key.
    AfterLast,
    /// Exactly on the interior key at this index.
    Exact(usize),
    /// Strictly inside the segment starting at this index.
    Between(usize),
}

impl Bracket {
    /// Index of the key whose value is returned as-is, if no interpolation is
    /// needed.
    pub fn held_index(self, len: usize) -> Option<usize> {
        match self {
            Bracket::BeforeFirst => Some(0),
            Bracket::AfterLast => Some(len - 1),
            Bracket::Exact(i) => Some(i),
            Bracket::Between(_) => None,
        }
    }
}

/// Locate `time` among sorted, non-empty `keys`.
pub fn locate(keys: &[Keyframe], time: f64) -> Bracket {
    debug_assert!(!keys.is_empty());
    let n = keys.len();
    if time <= keys[0].key_time {
        return Bracket::BeforeFirst;
    }
    if time >= keys[n - 1].key_time {
        return Bracket::AfterLast;
    }
    // Keys at or before `time`: at least 1 and at most n-1 here.
    let i = keys.partition_point(|k| k.key_time <= time) - 1;
    if keys[i].key_time == time {
        Bracket::Exact(i)
    } else {
        Bracket::Between(i)
    }
}

/// Linear progress of `time` through the segment starting at `index`,
/// clamped to `[0, 1]`.
pub fn segment_progress(keys: &[Keyframe], index: usize, time: f64) -> f64 {
    let t0 = keys[index].key_time;
    let t1 = keys[index + 1].key_time;
    ((time - t0) / (t1 - t0)).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(times: &[f64]) -> Vec<Keyframe> {
        times.iter().map(|t| Keyframe::new(*t, *t)).collect()
    }

    #[test]
    fn boundaries_hold_end_keys() {
        let k = keys(&[0.0, 2.0, 4.0]);
        assert_eq!(locate(&k, -1.0), Bracket::BeforeFirst);
        assert_eq!(locate(&k, 0.0), Bracket::BeforeFirst);
        assert_eq!(locate(&k, 4.0), Bracket::AfterLast);
        assert_eq!(locate(&k, 9.0), Bracket::AfterLast);
    }

    #[test]
    fn interior_hits_and_segments() {
        let k = keys(&[0.0, 2.0, 4.0, 6.0]);
        assert_eq!(locate(&k, 2.0), Bracket::Exact(1));
        assert_eq!(locate(&k, 1.0), Bracket::Between(0));
        assert_eq!(locate(&k, 3.5), Bracket::Between(1));
        assert_eq!(locate(&k, 5.999), Bracket::Between(2));
        assert_eq!(segment_progress(&k, 1, 3.0), 0.5);
    }

    #[test]
    fn duplicate_times_resolve_to_last_of_run() {
        let k = keys(&[0.0, 2.0, 2.0, 4.0]);
        assert_eq!(locate(&k, 2.0), Bracket::Exact(2));
        assert_eq!(locate(&k, 3.0), Bracket::Between(2));

        let k = keys(&[0.0, 0.0, 1.0]);
        assert_eq!(locate(&k, 0.0), Bracket::BeforeFirst);
        assert_eq!(locate(&k, 0.5), Bracket::Between(1));
        let k = keys(&[0.0, 1.0, 1.0]);
        assert_eq!(locate(&k, 1.0), Bracket::AfterLast);
    }

    #[test]
    fn single_key_is_always_held() {
        let k = keys(&[1.0]);
        assert_eq!(locate(&k, 0.0).held_index(1), Some(0));
        assert_eq!(locate(&k, 5.0).held_index(1), Some(0));
    }
}
