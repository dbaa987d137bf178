use crate::{
    deferred::Deferred,
    line,
    model::{Block, Blocks},
};

use super::{Ctx, Lines};

/// A raw LaTeX environment, from `\begin{env}` to the line closing the same
/// environment, kept verbatim with its delimiters.
#[tracing::instrument(level = "trace", skip_all)]
pub(crate) fn latex_environment(
    lines: &mut Lines<'_>,
    _ctx: &mut Ctx<'_>,
) -> Option<Deferred<Blocks>> {
    let environment = line::latex_begin(lines.peek()?)?;
    let end = format!("\\end{{{environment}}}");
    let mut text = Vec::new();
    loop {
        let current = lines.next()?;
        text.push(current);
        if current.contains(&end) {
            break;
        }
    }
    Some(Deferred::pure(vec![Block::RawBlock {
        format: "latex".to_string(),
        text: text.join("\n"),
    }]))
}
