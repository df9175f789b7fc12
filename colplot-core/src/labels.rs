use serde::{Deserialize, Serialize};

const UNIT_SEPARATOR: &str = "__";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisLabel {
    pub display_name: String,
    pub unit: String, // empty when the column carries no unit
}

impl AxisLabel {
    pub fn from_column(name: &str) -> Self {
        Self { display_name: format_label(name), unit: extract_unit(name).to_owned() }
    }
}

/// "energy__MeV" -> "energy (MeV)"; "beam_energy__GeV" -> "beam energy (GeV)"; names without `__` pass through.
pub fn format_label(name: &str) -> String {
    match name.split_once(UNIT_SEPARATOR) {
        Some((base, unit)) => format!("{} ({unit})", base.replace('_', " ")),
        None => name.to_owned(),
    }
}

pub fn extract_unit(name: &str) -> &str {
    name.split_once(UNIT_SEPARATOR).map(|(_, unit)| unit).unwrap_or("")
}

/// Y-axis title of a 1D histogram: "Entries" or "Entries / <width> <unit>".
pub fn entries_title(unit: &str, bin_width: f64) -> String {
    if unit.is_empty() {
        "Entries".to_owned()
    } else {
        format!("Entries / {} {unit}", format_general(bin_width))
    }
}

/// printf `%g`: six significant digits, trailing zeros dropped,
/// exponent form when the decimal exponent is below -4 or at least 6.
pub fn format_general(value: f64) -> String {
    format_significant(value, 6)
}

/// `%.<digits>g`.
pub fn format_significant(value: f64, digits: usize) -> String {
    if value == 0.0 {
        return "0".to_owned();
    }
    if !value.is_finite() {
        return format!("{value}");
    }
    let digits = digits.max(1);
    let sci = format!("{value:.prec$e}", prec = digits - 1);
    let (mantissa, exp) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
    let exp: i32 = exp.parse().unwrap_or(0);
    if exp < -4 || exp >= digits as i32 {
        let sign = if exp < 0 { '-' } else { '+' };
        return format!("{}e{sign}{:02}", strip_zeros(mantissa), exp.abs());
    }
    let decimals = (digits as i32 - 1 - exp).max(0) as usize;
    strip_zeros(&format!("{value:.decimals$}")).to_owned()
}

fn strip_zeros(s: &str) -> &str {
    if s.contains('.') { s.trim_end_matches('0').trim_end_matches('.') } else { s }
}
