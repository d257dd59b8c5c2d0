//! Growth policy applied when a `ProbingTable` resizes.

/// How the slot count grows on resize.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum Growth {
    /// `capacity * 2`.
    #[default]
    Double,
    /// The smallest prime that is at least `capacity * 2`. Spreads keys with
    /// a common stride more evenly under `hash mod capacity`.
    NextPrime,
}

impl Growth {
    /// Capacity to allocate when growing from `capacity` slots. Always
    /// strictly greater than `capacity` for `capacity >= 1`.
    pub fn next_capacity(self, capacity: usize) -> usize {
        let doubled = capacity.saturating_mul(2).max(capacity + 1);
        match self {
            Growth::Double => doubled,
            Growth::NextPrime => next_prime(doubled),
        }
    }
}

fn next_prime(mut n: usize) -> usize {
    while !is_prime(n) {
        n += 1;
    }
    n
}

fn is_prime(n: usize) -> bool {
    if n < 2 {
        return false;
    }
    if n % 2 == 0 {
        return n == 2;
    }
    let mut d = 3;
    while d <= n / d {
        if n % d == 0 {
            return false;
        }
        d += 2;
    }
    true
}
