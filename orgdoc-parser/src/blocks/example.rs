use crate::{
    deferred::Deferred,
    line,
    model::{Attr, Block, Blocks},
    state::FinalState,
};

use super::{Ctx, Lines};

/// Consecutive fixed-width lines (`: text`) as one example code block. The block is
/// dropped when fixed-width sections are not exported.
#[tracing::instrument(level = "trace", skip_all)]
pub(crate) fn example(lines: &mut Lines<'_>, _ctx: &mut Ctx<'_>) -> Option<Deferred<Blocks>> {
    let mut text = Vec::new();
    while let Some(content) = lines.peek().and_then(line::example_line) {
        lines.next();
        text.push(content);
    }
    if text.is_empty() {
        return None;
    }
    let text = text.join("\n");
    Some(Deferred::new(move |state: &FinalState| {
        if !state.export().fixed_width {
            tracing::debug!("fixed-width lines excluded by export settings");
            return Vec::new();
        }
        vec![Block::CodeBlock {
            attr: Attr::new().with_class("example"),
            text: text.clone(),
        }]
    }))
}
