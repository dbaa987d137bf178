use rustc_hash::FxHashMap;

use crate::model::Attr;

/// Receives every headline as it is parsed and decides the attributes stamped onto it.
///
/// Implementations typically assign identifiers, numbering or anchors. The parser
/// hands over the attributes collected from the headline's property drawer and uses
/// whatever comes back.
pub trait HeaderRegistry {
    fn register(&mut self, level: usize, title: &str, attr: Attr) -> Attr;
}

/// Gives every headline an identifier, derived from its title when the property
/// drawer has no `CUSTOM_ID`. Repeated identifiers get `-1`, `-2`, ... appended.
#[derive(Debug, Default)]
pub struct AutoIdentifiers {
    seen: FxHashMap<String, usize>,
}

impl AutoIdentifiers {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Lowercase `title`, keep alphanumerics, turn whitespace, `-` and `_` runs into
    /// a single `-` and drop everything else.
    #[must_use]
    pub fn slug(title: &str) -> String {
        let (slug, _) = title.chars().fold(
            (String::with_capacity(title.len()), true),
            |(mut slug, last_was_dash), c| {
                if c.is_alphanumeric() {
                    slug.extend(c.to_lowercase());
                    (slug, false)
                } else if c.is_whitespace() || c == '-' || c == '_' {
                    if !last_was_dash {
                        slug.push('-');
                    }
                    (slug, true)
                } else {
                    (slug, last_was_dash)
                }
            },
        );
        let slug = slug.trim_end_matches('-');
        if slug.is_empty() {
            "section".to_string()
        } else {
            slug.to_string()
        }
    }

    fn unique(&mut self, id: String) -> String {
        let Some(count) = self.seen.get_mut(&id) else {
            self.seen.insert(id.clone(), 0);
            return id;
        };
        *count += 1;
        let unique = format!("{id}-{count}");
        self.seen.insert(unique.clone(), 0);
        unique
    }
}

impl HeaderRegistry for AutoIdentifiers {
    #[tracing::instrument(level = "trace", skip(self, attr))]
    fn register(&mut self, level: usize, title: &str, mut attr: Attr) -> Attr {
        if attr.id.is_empty() {
            attr.id = self.unique(Self::slug(title));
        } else {
            self.seen.entry(attr.id.clone()).or_insert(0);
        }
        attr
    }
}
