//! Fibonacci helpers.
//!
//! Results are `u64`, so the largest representable term is
//! `F(93) = 12200160415121876738`. Anything past it yields `None`.

/// Golden ratio.
const PHI: f64 = 1.618_033_988_749_895;

/// Largest `n` with `F(n)` in `u64` range.
pub const MAX_FIBONACCI_INDEX: u32 = 93;

/// `n`-th Fibonacci number by plain recursion, `None` past
/// [`MAX_FIBONACCI_INDEX`].
///
/// Exponential time; meant for small `n`.
pub fn fibonacci(n: u32) -> Option<u64> {
    if n > MAX_FIBONACCI_INDEX {
        return None;
    }
    if n < 2 {
        return Some(u64::from(n));
    }
    fibonacci(n - 1)?.checked_add(fibonacci(n - 2)?)
}

/// Smallest Fibonacci number greater than or equal to `value`.
///
/// Binet's formula gives the index estimate; exact integer terms then
/// settle it so that `F(n - 1) < value <= F(n)`. Returns `None` when no
/// such term fits in a `u64`.
pub fn nearest_greater_fibonacci(value: u64) -> Option<u64> {
    if value == 0 {
        return Some(0);
    }

    let sqrt5 = 5f64.sqrt();
    let estimate = ((value as f64 * sqrt5 - 0.5).ln() / PHI.ln()).ceil();
    let mut n = (estimate.max(1.0) as u32).min(MAX_FIBONACCI_INDEX);

    while n > 1 && fibonacci_term(n - 1)? >= value {
        n -= 1;
    }
    loop {
        let term = fibonacci_term(n)?;
        if term >= value {
            return Some(term);
        }
        n += 1;
    }
}

/// `F(n)` in linear time with overflow checks.
fn fibonacci_term(n: u32) -> Option<u64> {
    // Start from F(-1) = 1, F(0) = 0.
    let (mut prev, mut current) = (1u64, 0u64);
    for _ in 0..n {
        let next = prev.checked_add(current)?;
        prev = current;
        current = next;
    }
    Some(current)
}
