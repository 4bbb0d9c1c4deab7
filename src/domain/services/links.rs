/// Public link a guest opens to answer.
pub fn rsvp_link(base_url: &str, event_slug: &str, token: &str) -> String {
    format!("{}/event/{}/rsvp/{}", base_url.trim_end_matches('/'), event_slug, token)
}

pub fn whatsapp_link(guest_name: &str, rsvp_link: &str, phone: Option<&str>) -> String {
    let msg = format!("Hi {}! You're invited 🎉 Confirm your attendance here: {}", guest_name, rsvp_link);
    let encoded = urlencoding::encode(&msg);

    let digits: String = phone
        .unwrap_or_default()
        .chars()
        .filter(|c| c.is_ascii_digit())
        .collect();

    if digits.is_empty() {
        format!("https://wa.me/?text={}", encoded)
    } else {
        format!("https://wa.me/{}?text={}", digits, encoded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rsvp_link() {
        assert_eq!(
            rsvp_link("https://rsvp.example/", "party-abc123", "Tok3n"),
            "https://rsvp.example/event/party-abc123/rsvp/Tok3n"
        );
    }

    #[test]
    fn test_whatsapp_link_strips_phone_formatting() {
        let link = whatsapp_link("Ana", "https://x/y", Some("+351 912-345-678"));
        assert!(link.starts_with("https://wa.me/351912345678?text=Hi%20Ana"));
    }

    #[test]
    fn test_whatsapp_link_without_phone() {
        assert!(whatsapp_link("Ana", "https://x/y", None).starts_with("https://wa.me/?text="));
        assert!(whatsapp_link("Ana", "https://x/y", Some("n/a")).starts_with("https://wa.me/?text="));
    }
}
