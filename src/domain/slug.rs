pub const MAX_SLUG_LENGTH: usize = 100;

// Url-safe category identifier: lowercase ascii letters, digits and single dashes
#[derive(Debug, Clone, PartialEq)]
pub struct Slug(String);

impl Slug {
    pub fn parse(slug: String) -> Result<Slug, String>{
        let valid_chars = slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');

        if slug.is_empty()
            || slug.len() > MAX_SLUG_LENGTH
            || !valid_chars
            || slug.starts_with('-')
            || slug.ends_with('-')
            || slug.contains("--")
        {
            return Err(format!("{} is not a valid slug", slug))
        }

        Ok(Self(slug))
    }

    // Derive a slug from a display name, e.g. "Wedding Organizer & Dekorasi" -> "wedding-organizer-dekorasi"
    pub fn from_name(name: &str) -> Result<Slug, String>{
        let mut slug = String::with_capacity(name.len());

        for c in name.trim().chars() {
            if c.is_ascii_alphanumeric() {
                slug.push(c.to_ascii_lowercase());
            } else if !slug.is_empty() && !slug.ends_with('-') {
                slug.push('-');
            }
        }

        let slug = slug.trim_end_matches('-');
        let slug: String = slug.chars().take(MAX_SLUG_LENGTH).collect();

        Slug::parse(slug.trim_end_matches('-').to_string())
            .map_err(|_| format!("cannot derive a slug from {:?}", name))
    }

    pub fn inner(&self) -> String{
        self.0.clone()
    }
}

impl AsRef<str> for Slug {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
