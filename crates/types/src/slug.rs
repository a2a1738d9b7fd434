//! URL slug validation and derivation.

/// Errors that can occur when constructing a [`Slug`].
#[derive(Debug, thiserror::Error)]
pub enum SlugError {
    /// Nothing slug-worthy was left after normalisation
    #[error("slug cannot be empty")]
    Empty,
    /// The input contained characters outside `a-z`, `0-9` and `-`
    #[error("slug may only contain lowercase letters, digits and hyphens: {0:?}")]
    InvalidCharacters(String),
}

/// A validated URL slug: lowercase ASCII letters, digits and hyphens.
///
/// Rows coming back from the database keep their slug column as a plain
/// `String` (legacy rows contain non-ASCII slugs that the public pages
/// filter out); `Slug` is for identifiers this backend creates or accepts
/// from a request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Slug(String);

impl Slug {
    /// Validates an externally supplied slug.
    ///
    /// # Errors
    ///
    /// Returns [`SlugError::Empty`] for empty input and
    /// [`SlugError::InvalidCharacters`] when anything outside
    /// `a-z0-9-` appears.
    pub fn parse(input: impl AsRef<str>) -> Result<Self, SlugError> {
        let input = input.as_ref();
        if input.is_empty() {
            return Err(SlugError::Empty);
        }
        if !input
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        {
            return Err(SlugError::InvalidCharacters(input.to_owned()));
        }
        Ok(Self(input.to_owned()))
    }

    /// Derives a slug from an article title: lowercase, runs of anything
    /// that is not an ASCII letter or digit collapse to a single hyphen,
    /// leading and trailing hyphens are trimmed.
    ///
    /// # Errors
    ///
    /// Returns [`SlugError::Empty`] when the title contains no ASCII
    /// letters or digits at all.
    pub fn from_title(title: &str) -> Result<Self, SlugError> {
        let mut slug = String::with_capacity(title.len());
        for c in title.chars() {
            let c = c.to_ascii_lowercase();
            if c.is_ascii_lowercase() || c.is_ascii_digit() {
                slug.push(c);
            } else if !slug.ends_with('-') && !slug.is_empty() {
                slug.push('-');
            }
        }
        let slug = slug.trim_end_matches('-');
        if slug.is_empty() {
            return Err(SlugError::Empty);
        }
        Ok(Self(slug.to_owned()))
    }

    /// Returns the slug as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Slug {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Slug {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl serde::Serialize for Slug {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for Slug {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Slug::parse(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_plain_slugs() {
        assert_eq!(Slug::parse("hands-on-review-2").unwrap().as_str(), "hands-on-review-2");
    }

    #[test]
    fn parse_rejects_uppercase_and_spaces() {
        assert!(Slug::parse("Hands-On").is_err());
        assert!(Slug::parse("hands on").is_err());
        assert!(Slug::parse("").is_err());
    }

    #[test]
    fn from_title_collapses_separator_runs() {
        assert_eq!(
            Slug::from_title("Hands on -- with the NEW handheld!").unwrap().as_str(),
            "hands-on-with-the-new-handheld"
        );
    }

    #[test]
    fn from_title_trims_edge_hyphens() {
        assert_eq!(Slug::from_title("  (2026) roundup  ").unwrap().as_str(), "2026-roundup");
    }

    #[test]
    fn from_title_with_no_ascii_content_is_an_error() {
        assert!(Slug::from_title("ガジェット").is_err());
    }
}
