use std::sync::LazyLock;

use regex::Regex;

/// `username:password[@machine]`
pub(crate) static CREDENTIALS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([^:]+):([^&@]+)(?:@([^&]+))?$").expect("credentials pattern is valid")
});

/// `domain[@ip]`
pub(crate) static DOMAIN_ARGUMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([^$@]+)(?:@([^$]+))?$").expect("domain argument pattern is valid")
});

/// Four groups of 1-3 digits, each optionally followed by a dot. Octet
/// ranges are not checked, so `999.1.1.1` matches.
pub(crate) static DOTTED_QUAD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"((?:[0-9]{1,3}\.?){4})").expect("dotted quad pattern is valid")
});

/// Finds the first dotted quad anywhere in `text`.
pub(crate) fn find_dotted_quad(text: &str) -> Option<&str> {
    DOTTED_QUAD
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_ip_in_checkip_body() {
        let body = "<html><head><title>Current IP Check</title></head>\
            <body>Current IP Address: 93.184.216.34</body></html>";
        assert_eq!(find_dotted_quad(body), Some("93.184.216.34"));
    }

    #[test]
    fn dotted_quad_does_not_validate_octets() {
        assert_eq!(find_dotted_quad("ip=999.1.2.3"), Some("999.1.2.3"));
    }

    #[test]
    fn no_dotted_quad_in_plain_text() {
        assert_eq!(find_dotted_quad("service unavailable"), None);
    }

    #[test]
    fn domain_argument_rejects_empty_domain() {
        assert!(DOMAIN_ARGUMENT.captures("@1.2.3.4").is_none());
        assert!(DOMAIN_ARGUMENT.captures("a.com@").is_none());
    }
}
