use crate::domain::services::tokens::random_slug_suffix;

const MAX_STEM_LEN: usize = 55;
const SUFFIX_LEN: usize = 6;

fn fold_accent(c: char) -> char {
    match c {
        'á' | 'à' | 'â' | 'ã' | 'ä' | 'å' => 'a',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'ç' => 'c',
        'ñ' => 'n',
        'ý' | 'ÿ' => 'y',
        other => other,
    }
}

/// "Ana & João's Wedding" -> "ana-joaos-wedding"
pub fn slugify(text: &str) -> String {
    let cleaned: String = text
        .to_lowercase()
        .chars()
        .map(fold_accent)
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace() || *c == '-')
        .collect();

    let mut slug = String::with_capacity(cleaned.len());
    for c in cleaned.trim().chars() {
        let c = if c.is_whitespace() { '-' } else { c };
        if c == '-' && slug.ends_with('-') {
            continue;
        }
        slug.push(c);
    }

    let stem: String = slug.chars().take(MAX_STEM_LEN).collect();
    stem.trim_matches('-').to_string()
}

/// Public slug for a new event: the name's stem plus a random suffix.
pub fn event_slug(name: &str) -> String {
    let stem = slugify(name);
    let suffix = random_slug_suffix(SUFFIX_LEN);
    if stem.is_empty() {
        format!("event-{}", suffix)
    } else {
        format!("{}-{}", stem, suffix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_folds_accents_and_punctuation() {
        assert_eq!(slugify("Ana & João's Wedding"), "ana-joaos-wedding");
        assert_eq!(slugify("  Festa   de   Verão  "), "festa-de-verao");
        assert_eq!(slugify("a--b -- c"), "a-b-c");
    }

    #[test]
    fn test_slugify_truncates_stem() {
        let long = "x".repeat(80);
        assert_eq!(slugify(&long).len(), MAX_STEM_LEN);
    }

    #[test]
    fn test_event_slug_has_suffix() {
        let slug = event_slug("Casamento");
        assert!(slug.starts_with("casamento-"));
        assert_eq!(slug.len(), "casamento-".len() + SUFFIX_LEN);

        let fallback = event_slug("🎉🎉");
        assert!(fallback.starts_with("event-"));
    }
}
