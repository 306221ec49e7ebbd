//! Record ID generation and resolution
//!
//! All IDs use the format: `{8-char-hex}-{type}-{slug}`
//! Example: `3fa2c91b-plan-final-essay`

/// Maximum slug length kept in an ID
const MAX_SLUG_LEN: usize = 40;

/// Generate a record ID from type and title
///
/// The hex prefix comes from the random tail of a v7 UUID, so two records
/// with the same title created in the same millisecond still get distinct IDs.
pub fn generate_id(record_type: &str, title: &str) -> String {
    let uuid = uuid::Uuid::now_v7().simple().to_string();
    let hex_prefix = &uuid[24..];
    let slug = slugify(title);
    if slug.is_empty() {
        format!("{}-{}", hex_prefix, record_type)
    } else {
        format!("{}-{}-{}", hex_prefix, record_type, slug)
    }
}

/// Slugify a title for use in IDs
fn slugify(title: &str) -> String {
    let slug = title
        .to_lowercase()
        .chars()
        // Strip apostrophes entirely, replace other non-alphanumeric with hyphens
        .filter_map(|c| {
            if c.is_alphanumeric() {
                Some(c)
            } else if c == '\'' || c == '\u{2019}' || c == '\u{2018}' {
                None
            } else {
                Some('-')
            }
        })
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-");

    if slug.chars().count() <= MAX_SLUG_LEN {
        return slug;
    }
    let truncated: String = slug.chars().take(MAX_SLUG_LEN).collect();
    truncated.trim_end_matches('-').to_string()
}

/// ID resolution for partial matches typed on the command line
pub struct IdResolver<'a> {
    ids: Vec<&'a str>,
}

impl<'a> IdResolver<'a> {
    pub fn new(ids: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            ids: ids.into_iter().collect(),
        }
    }

    /// Resolve a partial reference to a full ID
    ///
    /// Returns:
    /// - Ok(Some(id)) if exactly one match (an exact match always wins)
    /// - Ok(None) if no matches
    /// - Err with candidates if ambiguous
    pub fn resolve(&self, reference: &str) -> Result<Option<String>, Vec<String>> {
        if let Some(exact) = self.ids.iter().find(|id| **id == reference) {
            return Ok(Some(exact.to_string()));
        }

        let matches: Vec<String> = self
            .ids
            .iter()
            .filter(|id| Self::matches(id, reference))
            .map(|id| id.to_string())
            .collect();

        match matches.len() {
            0 => Ok(None),
            1 => Ok(matches.into_iter().next()),
            _ => Err(matches),
        }
    }

    /// Check if an ID matches a reference
    fn matches(id: &str, reference: &str) -> bool {
        if reference.is_empty() {
            return false;
        }

        // Hex prefix match
        if id.starts_with(reference) {
            return true;
        }

        // Slug contains match
        if let Some(slug_start) = id.find('-') {
            let slug_part = &id[slug_start + 1..];
            if slug_part.contains(reference) {
                return true;
            }
        }

        false
    }
}
