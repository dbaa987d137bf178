use serde::Serialize;

/// An `Attr` is the identifier, class list and key/value list attached to a block
/// or inline span.
///
/// Classes behave as an ordered set and key/values as an ordered map: inserting an
/// existing class is a no-op and inserting an existing key replaces its value in
/// place.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[non_exhaustive]
pub struct Attr {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub classes: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keyvals: Vec<(String, String)>,
}

impl Attr {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    #[must_use]
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.push_class(class);
        self
    }

    #[must_use]
    pub fn with_keyval(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn push_class(&mut self, class: impl Into<String>) {
        let class = class.into();
        if !class.is_empty() && !self.classes.contains(&class) {
            self.classes.push(class);
        }
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        if let Some(slot) = self.keyvals.iter_mut().find(|(k, _)| *k == key) {
            slot.1 = value;
        } else {
            self.keyvals.push((key, value));
        }
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.keyvals
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.id.is_empty() && self.classes.is_empty() && self.keyvals.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn classes_are_an_ordered_set() {
        let attr = Attr::new()
            .with_class("b")
            .with_class("a")
            .with_class("b")
            .with_class("");
        assert_eq!(attr.classes, vec!["b".to_string(), "a".to_string()]);
    }

    #[test]
    fn keyvals_replace_in_place() {
        let attr = Attr::new()
            .with_keyval("width", "10")
            .with_keyval("style", "x")
            .with_keyval("width", "20");
        assert_eq!(
            attr.keyvals,
            vec![
                ("width".to_string(), "20".to_string()),
                ("style".to_string(), "x".to_string())
            ]
        );
        assert_eq!(attr.get("width"), Some("20"));
        assert!(!attr.is_empty());
    }
}
