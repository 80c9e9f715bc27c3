//! Permissive numeric parsing for form input.
//!
//! Form fields arrive as raw text. Anything that does not start with a number reads as
//! zero instead of failing, so a half-typed value never blocks a recompute.

/// Parse the longest leading decimal number in `raw`, `0.0` when there is none.
///
/// Leading whitespace is skipped and trailing garbage is ignored, so `"12.5cm"` reads
/// as `12.5` while `"cm"`, `""` and `"."` read as `0.0`.
pub fn parse_lenient(raw: &str) -> f64 {
    let text = raw.trim_start();
    let end = float_prefix_len(text.as_bytes());

    match text[..end].parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => 0.0,
    }
}

/// Integer flavour of [`parse_lenient`]: only the leading sign and digits count,
/// so `"3.9"` reads as `3`.
pub fn parse_lenient_int(raw: &str) -> i64 {
    let text = raw.trim_start();
    let bytes = text.as_bytes();
    let sign = sign_len(bytes);
    let digits = digit_run(&bytes[sign..]);

    if digits == 0 {
        return 0;
    }
    text[..sign + digits].parse::<i64>().unwrap_or(0)
}

fn sign_len(bytes: &[u8]) -> usize {
    match bytes.first() {
        Some(b'+') | Some(b'-') => 1,
        _ => 0,
    }
}

fn digit_run(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}

// Length of `[+-]digits[.digits][(e|E)[+-]digits]`, requiring at least one mantissa digit.
fn float_prefix_len(bytes: &[u8]) -> usize {
    let mut pos = sign_len(bytes);
    let int_digits = digit_run(&bytes[pos..]);
    pos += int_digits;

    let mut frac_digits = 0;
    if bytes.get(pos) == Some(&b'.') {
        frac_digits = digit_run(&bytes[pos + 1..]);
        if int_digits > 0 || frac_digits > 0 {
            pos += 1 + frac_digits;
        }
    }

    if int_digits == 0 && frac_digits == 0 {
        return 0;
    }

    if matches!(bytes.get(pos), Some(b'e') | Some(b'E')) {
        let exp_start = pos + 1;
        let exp_sign = sign_len(&bytes[exp_start..]);
        let exp_digits = digit_run(&bytes[exp_start + exp_sign..]);
        if exp_digits > 0 {
            pos = exp_start + exp_sign + exp_digits;
        }
    }

    pos
}
