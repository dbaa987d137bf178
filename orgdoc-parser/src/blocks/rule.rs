use crate::{
    deferred::Deferred,
    line,
    model::{Block, Blocks},
};

use super::{Ctx, Lines};

/// Five or more dashes alone on a line.
pub(crate) fn horizontal_rule(lines: &mut Lines<'_>, _ctx: &mut Ctx<'_>) -> Option<Deferred<Blocks>> {
    lines.next().filter(|l| line::is_horizontal_rule(l))?;
    Some(Deferred::pure(vec![Block::HorizontalRule]))
}
