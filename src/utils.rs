/// Length of generated short codes.
pub const SHORT_CODE_LENGTH: usize = 8;

/// Generate an opaque alphanumeric short code.
pub fn generate_random_code(length: usize) -> String {
    use std::iter;

    let chars = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

    iter::repeat_with(|| chars[rand::random_range(0..chars.len())] as char)
        .take(length)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generates_requested_length() {
        assert_eq!(generate_random_code(SHORT_CODE_LENGTH).len(), SHORT_CODE_LENGTH);
        assert_eq!(generate_random_code(0).len(), 0);
    }

    #[test]
    fn generates_alphanumeric_only() {
        let code = generate_random_code(64);
        assert!(code.chars().all(|c| c.is_ascii_alphanumeric()));
    }
}
