//! Built-in extraction expressions

/// North American phone numbers: `(985) 655-2500`, `555-123-4567`, `123.123.1234`, `123/123.1234`
pub const PHONE: &str = r"\(\d{3}\)\s?\d{3}[-.]\d{4}|\d{3}[-./\s]\d{3}[-.\s]\d{4}";

/// Email addresses
pub const EMAIL: &str =
    r"([0-9a-zA-Z]([-.\w]*[0-9a-zA-Z])*@([0-9a-zA-Z][-\w]*[0-9a-zA-Z]\.)+[a-zA-Z]{2,9})";
