use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds to whole currency units for display. Computation always carries
/// full precision; only output goes through here.
pub fn whole_units(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(0, RoundingStrategy::MidpointNearestEven)
}

pub fn currency_symbol(code: &str) -> &'static str {
    match code.to_uppercase().as_str() {
        "GBP" => "£",
        "EUR" => "€",
        "USD" => "$",
        _ => "",
    }
}

/// Whole-unit amount with thousands separators, e.g. `£16,369`.
pub fn display_amount(amount: Decimal, code: &str) -> String {
    let rounded = whole_units(amount);
    let digits = rounded.abs().trunc().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    let sign = if rounded < Decimal::ZERO { "-" } else { "" };
    match currency_symbol(code) {
        "" => format!("{sign}{grouped} {}", code.to_uppercase()),
        symbol => format!("{sign}{symbol}{grouped}"),
    }
}
