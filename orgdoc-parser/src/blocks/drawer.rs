use crate::{
    deferred::Deferred,
    line,
    model::{Attr, Block, Blocks},
};

use super::{Ctx, Lines, parse_text};

/// A drawer: `:NAME:` up to `:END:`. Kept drawers become a `Div` classed with the
/// lowercased name and `drawer`; the export settings decide which are kept.
#[tracing::instrument(level = "trace", skip_all)]
pub(crate) fn drawer(lines: &mut Lines<'_>, ctx: &mut Ctx<'_>) -> Option<Deferred<Blocks>> {
    let name = line::drawer_start(lines.peek()?)?;
    lines.next();
    let mut body = Vec::new();
    loop {
        let current = lines.next()?;
        if line::is_drawer_end(current) {
            break;
        }
        body.push(current);
    }
    if !ctx.state.export().drawers.keeps(name) {
        tracing::debug!(name, "drawer excluded by export settings");
        return Some(Deferred::empty());
    }
    let attr = Attr::new()
        .with_class(name.to_lowercase())
        .with_class("drawer");
    Some(parse_text(&body.join("\n"), ctx).map(move |content| {
        vec![Block::Div {
            attr: attr.clone(),
            content,
        }]
    }))
}
