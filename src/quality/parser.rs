// src/quality/parser.rs — Parse evaluator replies into scores

/// Extract a 1-10 quality score from a raw evaluator reply.
///
/// The evaluator is instructed to respond with only a number, but free-form
/// model output drifts. The first contiguous run of digits in the reply is
/// taken as the score; anything else is a parse failure handled by the
/// caller's fallback path.
///
/// Parsed values are clamped to the closed range [1, 10].
pub fn extract_score(raw: &str) -> Option<u8> {
    let digits: String = raw
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();

    if digits.is_empty() {
        return None;
    }

    // Long digit runs overflow u64; any such reply is far out of range anyway.
    let value: u64 = digits.parse().unwrap_or(u64::MAX);
    Some(clamp_score(value))
}

/// Clamp a raw parsed value to the valid score range [1, 10].
pub fn clamp_score(value: u64) -> u8 {
    value.clamp(1, 10) as u8
}
