use regex::Regex;

/// Computes the arithmetic mean of a slice of values. Returns 0.0 for empty input.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Computes the sample standard deviation (n − 1 denominator) given a
/// pre-computed mean. `None` when fewer than two values, where the sample
/// deviation is undefined.
pub fn sample_stddev(values: &[f64], mean: f64) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let variance =
        values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (values.len() - 1) as f64;

    Some(variance.sqrt())
}

/// Extracts the first embedded run of digits from free text, e.g.
/// `"3 dorm."` → 3. `None` when the text carries no digit.
pub fn first_integer(digits: &Regex, text: &str) -> Option<u32> {
    digits.find(text)?.as_str().parse().ok()
}
