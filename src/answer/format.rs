//! Number formatting for answer sentences.
//!
//! Floats print in shortest round-trip form but always keep a fractional part
//! (`3000.0`, not `3000`), switch to exponent notation outside
//! `1e-4 <= |v| < 1e16`, and print NaN as `nan`.

pub fn format_float(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    let magnitude = value.abs();
    if magnitude != 0.0 && !(1e-4..1e16).contains(&magnitude) {
        return exponent_form(value);
    }

    let plain = format!("{}", value);
    if plain.contains('.') {
        plain
    } else {
        format!("{}.0", plain)
    }
}

/// `1.5e16` -> `1.5e+16`, `1e-5` -> `1e-05`.
fn exponent_form(value: f64) -> String {
    let raw = format!("{:e}", value);
    match raw.split_once('e') {
        Some((mantissa, exponent)) => {
            let (sign, digits) = match exponent.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exponent),
            };
            format!("{}e{}{:0>2}", mantissa, sign, digits)
        }
        None => raw,
    }
}

/// Round to `places` decimals, half to even (`125.125` -> `125.12`).
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round_ties_even() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_float() {
        assert_eq!(format_float(2847.3), "2847.3");
        assert_eq!(format_float(3000.0), "3000.0");
        assert_eq!(format_float(0.0), "0.0");
        assert_eq!(format_float(-12.5), "-12.5");
        assert_eq!(format_float(f64::NAN), "nan");
        assert_eq!(format_float(1.5e16), "1.5e+16");
        assert_eq!(format_float(0.00001), "1e-05");
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(1234.5678, 2), 1234.57);
        assert_eq!(round_to(10.0 / 3.0, 2), 3.33);
        assert!(round_to(f64::NAN, 2).is_nan());
    }

    #[test]
    fn test_round_to_ties_go_to_even() {
        assert_eq!(round_to(125.125, 2), 125.12);
        assert_eq!(round_to(0.125, 2), 0.12);
        assert_eq!(round_to(0.375, 2), 0.38);
        assert_eq!(round_to(-2.5, 0), -2.0);
    }
}
