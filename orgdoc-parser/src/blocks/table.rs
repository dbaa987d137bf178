use crate::{
    deferred::{Deferred, sequence},
    grammar::org_line,
    line,
    model::{Alignment, Block, Blocks, Cell, Row, Table},
};

use super::{Ctx, Lines, attributes::block_attributes};

/// How one table line contributes to the table.
enum TableRow {
    /// `|---+---|`
    Rule,
    /// `| <l> | <r10> |`
    Alignments(Vec<Alignment>),
    Content(Vec<Deferred<Cell>>),
}

/// The table as rows are folded into it.
#[derive(Default)]
struct TableBuilder {
    alignments: Vec<Alignment>,
    header: Option<Vec<Deferred<Cell>>>,
    rows: Vec<Vec<Deferred<Cell>>>,
}

impl TableBuilder {
    fn push(&mut self, row: TableRow) {
        match row {
            TableRow::Rule => {
                // A rule under the first and only content row turns it into a header.
                if self.header.is_none() && self.rows.len() == 1 {
                    self.header = self.rows.pop();
                }
            }
            TableRow::Alignments(alignments) => self.alignments = alignments,
            TableRow::Content(cells) => self.rows.push(cells),
        }
    }

    /// Pad or truncate the alignments to the header's width, or the first row's when
    /// there is no header.
    fn normalized_alignments(&self) -> Vec<Alignment> {
        let columns = self
            .header
            .as_ref()
            .or_else(|| self.rows.first())
            .map_or(0, Vec::len);
        let mut alignments = self.alignments.clone();
        alignments.resize(columns, Alignment::Default);
        alignments
    }

    fn build(self) -> Deferred<Table> {
        let alignments = self.normalized_alignments();
        let header = match self.header {
            Some(cells) => sequence(cells).map(Some),
            None => Deferred::pure(None),
        };
        let rows: Deferred<Vec<Row>> = sequence(self.rows.into_iter().map(sequence).collect());
        header.combine(rows, move |header, rows| {
            Table::new(rows)
                .with_header(header)
                .with_alignments(alignments.clone())
        })
    }
}

fn classify(row: &str, ctx: &Ctx<'_>) -> TableRow {
    if line::is_table_rule(row) {
        return TableRow::Rule;
    }
    let cells = match org_line::table_row(row.trim_end()) {
        Ok(cells) => cells,
        Err(e) => {
            tracing::warn!(%e, row, "unreadable table row");
            Vec::new()
        }
    };
    let alignments: Option<Vec<Option<Alignment>>> = cells
        .iter()
        .map(|cell| org_line::alignment_cell(cell).ok())
        .collect();
    // A row of only empty cells is content, not an alignment row.
    if let Some(alignments) = alignments.filter(|cells| cells.iter().any(Option::is_some)) {
        return TableRow::Alignments(
            alignments
                .into_iter()
                .map(Option::unwrap_or_default)
                .collect(),
        );
    }
    TableRow::Content(
        cells
            .into_iter()
            .map(|cell| {
                ctx.inlines.parse(cell.trim(), &ctx.state).map(|inlines| {
                    if inlines.is_empty() {
                        Vec::new()
                    } else {
                        vec![Block::Plain(inlines)]
                    }
                })
            })
            .collect(),
    )
}

/// A table: optional block attributes followed by a run of `|` lines.
#[tracing::instrument(level = "trace", skip_all)]
pub(crate) fn table(lines: &mut Lines<'_>, ctx: &mut Ctx<'_>) -> Option<Deferred<Blocks>> {
    let attributes = block_attributes(lines, ctx);
    if !lines.peek().is_some_and(line::is_table_row) {
        return None;
    }
    let mut builder = TableBuilder::default();
    while let Some(row) = lines.peek().filter(|row| line::is_table_row(row)) {
        lines.next();
        builder.push(classify(row, ctx));
    }
    let attr = attributes.attr();
    let table = builder
        .build()
        .combine(attributes.caption_or_empty(), move |table, caption| {
            table.with_attr(attr.clone()).with_caption(caption)
        });
    Some(Deferred::new(move |state| {
        if state.export().tables {
            vec![Block::Table(table.resolve(state))]
        } else {
            tracing::debug!("table excluded by export settings");
            Vec::new()
        }
    }))
}
