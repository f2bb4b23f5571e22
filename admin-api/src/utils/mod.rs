// Utility functions for admin API

/// Mask a phone number for list views, keeping the first 3 and last 4 characters.
/// Stored numbers are not guaranteed to be ASCII, so work on chars.
pub fn mask_phone(phone: &str) -> String {
    let chars: Vec<char> = phone.chars().collect();
    if chars.len() < 7 {
        return phone.to_string();
    }

    let mut masked = String::with_capacity(phone.len());
    masked.extend(&chars[..3]);
    masked.extend(std::iter::repeat('*').take(chars.len() - 7));
    masked.extend(&chars[chars.len() - 4..]);
    masked
}

/// Mask an email address, keeping the first two characters of the local part.
pub fn mask_email(email: &str) -> String {
    if let Some(at_pos) = email.find('@') {
        let local = &email[..at_pos];
        let domain = &email[at_pos..];

        if local.len() <= 2 {
            return email.to_string();
        }

        format!("{}***{}", &local[..2], domain)
    } else {
        email.to_string()
    }
}

/// URL-safe slug: lowercased alphanumerics with single dashes between words.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut last_dash = true;

    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            last_dash = false;
        } else if !last_dash {
            slug.push('-');
            last_dash = true;
        }
    }

    slug.trim_end_matches('-').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phone_is_masked_in_the_middle() {
        assert_eq!(mask_phone("+919876543210"), "+91******3210");
        assert_eq!(mask_phone("12345"), "12345");
    }

    #[test]
    fn phone_masking_handles_non_ascii_numbers() {
        // fullwidth plus sign, multi-byte in UTF-8
        assert_eq!(mask_phone("＋919876543210"), "＋91******3210");
        assert_eq!(mask_phone("＋9１２３"), "＋9１２３");
    }

    #[test]
    fn email_keeps_prefix_and_domain() {
        assert_eq!(mask_email("someone@example.com"), "so***@example.com");
        assert_eq!(mask_email("ab@example.com"), "ab@example.com");
        assert_eq!(mask_email("not-an-email"), "not-an-email");
    }

    #[test]
    fn slugify_collapses_separators() {
        assert_eq!(slugify("Tamil Devotional"), "tamil-devotional");
        assert_eq!(slugify("  Kids & Family  "), "kids-family");
        assert_eq!(slugify("Top 10!"), "top-10");
    }
}
