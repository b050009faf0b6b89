use anyhow::{Result, anyhow};
use rand::Rng;

/// Generate a PIN of exactly `length` decimal digits.
///
/// Digits are drawn uniformly and independently from `rand::rng()`, the
/// OS-seeded ChaCha-based generator, so the output is suitable for secrets.
/// A zero `length` is rejected rather than producing an empty PIN.
pub fn generate_pin(length: usize) -> Result<String> {
    if length == 0 {
        return Err(anyhow!("PIN length must be at least 1"));
    }

    let mut rng = rand::rng();
    Ok((0..length)
        .map(|_| char::from(b'0' + rng.random_range(0..10u8)))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pin_has_requested_length() {
        for n in [1, 4, 6, 12] {
            let pin = generate_pin(n).unwrap();
            assert_eq!(pin.len(), n);
        }
    }

    #[test]
    fn test_pin_is_all_decimal_digits() {
        let pin = generate_pin(64).unwrap();
        assert!(pin.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_zero_length_is_rejected() {
        assert!(generate_pin(0).is_err());
    }

    #[test]
    fn test_all_digits_appear_over_many_samples() {
        // 200 six-digit PINs give 1200 draws; the odds of any digit never
        // appearing are below 1e-50, so this is a stable distribution check.
        let mut seen = [false; 10];
        for _ in 0..200 {
            for c in generate_pin(6).unwrap().bytes() {
                seen[(c - b'0') as usize] = true;
            }
        }
        assert!(seen.iter().all(|&s| s));
    }
}
