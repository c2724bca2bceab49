use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum StrengthLevel {
    Weak,
    Medium,
    Strong,
}

impl StrengthLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            StrengthLevel::Weak => "weak",
            StrengthLevel::Medium => "medium",
            StrengthLevel::Strong => "strong",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StrengthReport {
    pub length: usize,
    /// 0..=5, one point per satisfied rule.
    pub score: u8,
    pub level: StrengthLevel,
    pub shannon_bits_estimate: f64,
}

/// Rate a sealing password.
///
/// Rules: at least 8 characters, at least 12 characters, an uppercase
/// letter, a digit, a character outside `[A-Za-z0-9]`.
pub fn assess(password: &str) -> StrengthReport {
    let length = password.chars().count();

    let rules = [
        length >= 8,
        length >= 12,
        password.chars().any(|c| c.is_ascii_uppercase()),
        password.chars().any(|c| c.is_ascii_digit()),
        password.chars().any(|c| !c.is_ascii_alphanumeric()),
    ];
    let score = rules.iter().filter(|ok| **ok).count() as u8;

    let level = match score {
        0..=2 => StrengthLevel::Weak,
        3..=4 => StrengthLevel::Medium,
        _ => StrengthLevel::Strong,
    };

    let shannon_bits = if length == 0 {
        0.0
    } else {
        calculate_shannon_bits(password, length)
    };
    let estimate = round_to_precision(shannon_bits, 6);

    StrengthReport {
        length,
        score,
        level,
        shannon_bits_estimate: if estimate == 0.0 { 0.0 } else { estimate },
    }
}

fn calculate_shannon_bits(input: &str, length: usize) -> f64 {
    let mut counts: HashMap<char, usize> = HashMap::new();
    for ch in input.chars() {
        *counts.entry(ch).or_insert(0) += 1;
    }

    let len = length as f64;
    let mut entropy = 0.0;
    for count in counts.values() {
        let probability = *count as f64 / len;
        entropy += probability * probability.log2();
    }

    -entropy * len
}

fn round_to_precision(value: f64, decimals: u32) -> f64 {
    let factor = 10_f64.powi(decimals as i32);
    (value * factor).round() / factor
}
