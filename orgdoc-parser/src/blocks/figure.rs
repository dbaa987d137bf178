use crate::{
    deferred::Deferred,
    inline::is_image_target,
    line,
    model::{Attr, Block, Blocks, Inline},
    state::FinalState,
};

use super::{Ctx, Lines, attributes::block_attributes};

/// The image target of a line holding nothing but `[[target]]`.
fn image_link(current: &str) -> Option<&str> {
    let target = current.trim().strip_prefix("[[")?.strip_suffix("]]")?;
    let plain = !target.is_empty() && !target.contains(['[', ']']);
    (plain && is_image_target(target)).then_some(target)
}

/// A captioned or named image: a run of block attributes, then a line that is only
/// an image link, alone in its paragraph.
#[tracing::instrument(level = "trace", skip_all)]
pub(crate) fn figure(lines: &mut Lines<'_>, ctx: &mut Ctx<'_>) -> Option<Deferred<Blocks>> {
    let attributes = block_attributes(lines, ctx);
    if attributes.is_empty() {
        return None;
    }
    let target = image_link(lines.peek()?)?.to_string();
    lines.next();
    if lines
        .peek()
        .is_some_and(|l| !line::starts_block(l, ctx.tab_width(), ctx.state.in_list()))
    {
        return None;
    }

    let mut attr = Attr::new().with_id(attributes.label.clone().unwrap_or_default());
    for (key, value) in &attributes.keyvals {
        attr.insert(key.clone(), value.clone());
    }
    let name = attributes.name.clone().unwrap_or_default();
    let title = if attributes.caption.is_some() {
        format!("fig:{name}")
    } else {
        name
    };
    let caption = attributes.caption_or_empty();
    Some(Deferred::new(move |state: &FinalState| {
        vec![Block::Para(vec![Inline::Image {
            attr: attr.clone(),
            target: state.expand_link(&target),
            title: title.clone(),
            alt: caption.resolve(state),
        }])]
    }))
}
