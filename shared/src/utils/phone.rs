//! Phone number utilities

/// Mask a phone number for logs, keeping only the last four digits
/// (e.g. `13800001234` becomes `*******1234`).
pub fn mask_phone(phone: &str) -> String {
    let digits: Vec<char> = phone.chars().collect();
    if digits.len() <= 4 {
        return "*".repeat(digits.len());
    }

    let visible = &digits[digits.len() - 4..];
    let mut masked = String::with_capacity(digits.len());
    if digits[0] == '+' {
        masked.push('+');
        masked.push_str(&"*".repeat(digits.len() - 5));
    } else {
        masked.push_str(&"*".repeat(digits.len() - 4));
    }
    masked.extend(visible.iter());
    masked
}

/// Mask every recipient of a message, comma separated
pub fn mask_recipients(recipients: &[String]) -> String {
    recipients
        .iter()
        .map(|phone| mask_phone(phone))
        .collect::<Vec<_>>()
        .join(",")
}
