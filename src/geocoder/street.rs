use crate::models::Address;

/// Leading particles meaning "boulevard" or "street". Stripped in this order,
/// each at most once.
pub const STREET_PREFIXES: &[&str] = &["שד' ", "שד ", "רח' ", "רח "];

/// Street parameter for a structured query: prefixes stripped, house number
/// appended. Empty when the address has no street.
pub fn normalize_street(address: &Address) -> String {
    let street = address.street();
    if street.is_empty() {
        return String::new();
    }

    let stripped = STREET_PREFIXES
        .iter()
        .fold(street, |s, prefix| s.strip_prefix(prefix).unwrap_or(s))
        .trim();

    format!("{} {}", stripped, address.house())
}
