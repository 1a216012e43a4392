use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Characters left alone by JavaScript's `encodeURIComponent`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

pub fn encode_uri_component(input: &str) -> String {
    utf8_percent_encode(input, URI_COMPONENT).to_string()
}

/// Human-readable amount.
///
/// Missing or non-finite values print as `0`. Below one million the value
/// gets thousands separators and at most two decimals; above that it is
/// abbreviated with `M` or `B`.
pub fn format_number(value: Option<f64>) -> String {
    let n = match value {
        Some(n) if n.is_finite() => n,
        _ => return "0".to_string(),
    };

    // Pick the unit from the value as it will be printed, so 999_999.999
    // becomes "1M" rather than "1,000,000".
    if round_to(n / 1e6, 2).abs() >= 1000.0 {
        format!("{}B", fixed_trimmed(n / 1e9, 2))
    } else if round_to(n, 2).abs() >= 1e6 {
        format!("{}M", fixed_trimmed(n / 1e6, 2))
    } else {
        group_thousands(&fixed_trimmed(n, 2))
    }
}

fn round_to(n: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (n * factor).round() / factor
}

fn fixed_trimmed(n: f64, places: usize) -> String {
    let fixed = format!("{:.*}", places, n);
    let trimmed = if fixed.contains('.') {
        fixed.trim_end_matches('0').trim_end_matches('.')
    } else {
        fixed.as_str()
    };

    match trimmed {
        "-0" => "0".to_string(),
        other => other.to_string(),
    }
}

fn group_thousands(number: &str) -> String {
    let (sign, unsigned) = match number.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", number),
    };
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (unsigned, None),
    };

    let mut grouped = String::with_capacity(number.len() + int_part.len() / 3);
    grouped.push_str(sign);
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    if let Some(frac_part) = frac_part {
        grouped.push('.');
        grouped.push_str(frac_part);
    }
    grouped
}
