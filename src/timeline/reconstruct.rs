//! Time-vector reconstruction.

/// `n` evenly spaced times over the half-open interval `[start, end)`:
/// `t_i = start + i * (end - start) / n` for `i` in `0..n`.
///
/// The endpoint is excluded, so for `n = 1` the result is `[start]` and for
/// `n = 0` it is empty. Pure arithmetic over the inputs, so repeated calls
/// for the same group always agree.
pub fn evenly_spaced(start: i64, end: i64, n: usize) -> Vec<f64> {
    if n == 0 {
        return Vec::new();
    }
    let s = start as f64;
    let step = (end - start) as f64 / n as f64;
    (0..n).map(|i| s + step * i as f64).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn empty_for_zero_samples() {
        assert!(evenly_spaced(100, 200, 0).is_empty());
    }

    #[test]
    fn single_sample_sits_at_start() {
        assert_eq!(evenly_spaced(3700, 3701, 1), vec![3700.0]);
    }

    #[test]
    fn two_samples_split_the_window() {
        let times = evenly_spaced(3700, 3703, 2);
        assert_eq!(times.len(), 2);
        assert_relative_eq!(times[0], 3700.0);
        assert_relative_eq!(times[1], 3701.5);
    }

    #[test]
    fn endpoint_is_excluded() {
        let times = evenly_spaced(0, 10, 5);
        assert_eq!(times, vec![0.0, 2.0, 4.0, 6.0, 8.0]);
        assert!(times.iter().all(|&t| t < 10.0));
    }

    #[test]
    fn first_time_equals_start_exactly() {
        let times = evenly_spaced(1_700_003_600, 1_700_007_200, 7);
        assert_eq!(times[0], 1_700_003_600.0);
    }

    #[test]
    fn times_are_strictly_increasing() {
        let times = evenly_spaced(50, 3650, 180);
        for pair in times.windows(2) {
            assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn spacing_is_uniform() {
        let times = evenly_spaced(0, 3600, 1000);
        let step = times[1] - times[0];
        for pair in times.windows(2) {
            assert_relative_eq!(pair[1] - pair[0], step, epsilon = 1e-9);
        }
    }

    #[test]
    fn deterministic_across_calls() {
        assert_eq!(evenly_spaced(123, 456, 37), evenly_spaced(123, 456, 37));
    }

    #[test]
    fn negative_window_start() {
        let times = evenly_spaced(-7200, -7196, 4);
        assert_eq!(times, vec![-7200.0, -7199.0, -7198.0, -7197.0]);
    }
}
