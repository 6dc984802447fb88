//! Digit-permutation counting for 4D numbers.

/// Number of distinct orderings of the digits of a 4-digit number:
/// `4! / Π multiplicity(d)!`.
///
/// Always one of 24, 12, 6, 4 or 1. Non-digit bytes are counted like any
/// other symbol, so the function is total.
pub fn combination_count(number: &str) -> u32 {
    let mut seen: Vec<(u8, u32)> = Vec::with_capacity(4);
    for b in number.bytes() {
        match seen.iter_mut().find(|(d, _)| *d == b) {
            Some((_, n)) => *n += 1,
            None => seen.push((b, 1)),
        }
    }

    let len = seen.iter().map(|(_, n)| *n).sum::<u32>();
    seen.iter().fold(factorial(len), |acc, (_, n)| acc / factorial(*n))
}

/// Every distinct permutation of the number's digits, sorted.
pub fn permutations(number: &str) -> Vec<String> {
    let mut digits: Vec<char> = number.chars().collect();
    digits.sort_unstable();

    let mut out = vec![digits.iter().collect::<String>()];
    while next_permutation(&mut digits) {
        out.push(digits.iter().collect());
    }
    out
}

fn factorial(n: u32) -> u32 {
    (1..=n).product()
}

/// Advance to the next lexicographic permutation; false once the last one
/// has been reached.
fn next_permutation(v: &mut [char]) -> bool {
    let Some(i) = (1..v.len()).rev().find(|&i| v[i - 1] < v[i]) else {
        return false;
    };
    let pivot = i - 1;
    let Some(j) = (i..v.len()).rev().find(|&j| v[j] > v[pivot]) else {
        return false;
    };
    v.swap(pivot, j);
    v[i..].reverse();
    true
}
