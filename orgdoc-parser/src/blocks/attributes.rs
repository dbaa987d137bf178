use crate::{
    deferred::Deferred,
    grammar::org_line,
    line,
    model::{Attr, Inlines},
};

use super::{Ctx, Lines};

/// Affiliated keywords found immediately before a block.
#[derive(Debug, Default)]
pub(crate) struct BlockAttributes {
    /// `#+NAME:`, the first one wins.
    pub(crate) name: Option<String>,
    /// `#+LABEL:`, the first one wins.
    pub(crate) label: Option<String>,
    pub(crate) caption: Option<Deferred<Inlines>>,
    /// Key/values of the `#+ATTR_HTML:` lines.
    pub(crate) keyvals: Vec<(String, String)>,
}

impl BlockAttributes {
    pub(crate) fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.label.is_none()
            && self.caption.is_none()
            && self.keyvals.is_empty()
    }

    /// Attributes for the block itself: the name as identifier plus the HTML
    /// key/values.
    pub(crate) fn attr(&self) -> Attr {
        let mut attr = Attr::new().with_id(self.name.clone().unwrap_or_default());
        for (key, value) in &self.keyvals {
            attr.insert(key.clone(), value.clone());
        }
        attr
    }

    pub(crate) fn caption_or_empty(&self) -> Deferred<Inlines> {
        self.caption.clone().unwrap_or_default()
    }
}

/// Consume a run of `#+NAME:`, `#+LABEL:`, `#+CAPTION:`, `#+ATTR_<backend>:` and
/// `#+RESULTS:` lines.
///
/// The run ends at the first other line; the caller decides whether what follows is
/// a block these attributes belong to.
#[tracing::instrument(level = "trace", skip_all)]
pub(crate) fn block_attributes(lines: &mut Lines<'_>, ctx: &Ctx<'_>) -> BlockAttributes {
    let mut attributes = BlockAttributes::default();
    let mut caption = Vec::new();
    let mut html = Vec::new();
    while let Some((key, value)) = lines
        .peek()
        .and_then(line::keyword)
        .filter(|(key, _)| line::is_block_attribute_key(key))
    {
        lines.next();
        match key.to_ascii_lowercase().as_str() {
            "name" => {
                if attributes.name.is_none() {
                    attributes.name = Some(value.to_string());
                } else {
                    tracing::debug!(value, "ignoring repeated NAME");
                }
            }
            "label" => {
                attributes.label.get_or_insert_with(|| value.to_string());
            }
            "caption" => caption.push(value),
            "attr_html" => html.push(value),
            other => tracing::trace!(key = other, "attribute not used for html output"),
        }
    }
    if !caption.is_empty() {
        attributes.caption = Some(ctx.inlines.parse(&caption.join(" "), &ctx.state));
    }
    if !html.is_empty() {
        attributes.keyvals = html_keyvals(&html.join(" "));
    }
    attributes
}

fn html_keyvals(text: &str) -> Vec<(String, String)> {
    match org_line::keyvals(text) {
        Ok(pairs) => pairs
            .into_iter()
            .map(|(key, value)| (key.to_string(), value.unwrap_or_default().to_string()))
            .collect(),
        Err(e) => {
            tracing::warn!(%e, text, "malformed ATTR_HTML, ignoring it");
            Vec::new()
        }
    }
}
