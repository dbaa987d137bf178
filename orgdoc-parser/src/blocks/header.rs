use crate::{
    deferred::Deferred,
    grammar::org_line,
    line,
    model::{Attr, Block, Blocks, Inline},
    state::FinalState,
};

use super::{Ctx, Lines};

/// Read a `:PROPERTIES:` drawer directly under a headline into attributes.
///
/// `CUSTOM_ID` becomes the identifier and `CLASS` the class list; every other
/// property is kept as a key/value with its key lowercased. Leaves the cursor alone
/// when there is no complete drawer.
fn property_drawer(lines: &mut Lines<'_>) -> Attr {
    let mut attr = Attr::new();
    let starts_drawer = lines
        .peek()
        .and_then(line::drawer_start)
        .is_some_and(|name| name.eq_ignore_ascii_case("PROPERTIES"));
    if !starts_drawer {
        return attr;
    }
    let mark = lines.mark();
    lines.next();
    let mut properties = Vec::new();
    loop {
        match lines.next() {
            None => {
                tracing::debug!("unterminated PROPERTIES drawer");
                lines.reset(mark);
                return attr;
            }
            Some(current) if line::is_drawer_end(current) => break,
            Some(current) => properties.push(current),
        }
    }
    for property in properties {
        let Some((key, value)) = property
            .trim()
            .strip_prefix(':')
            .and_then(|rest| rest.split_once(':'))
        else {
            continue;
        };
        let key = key.to_lowercase();
        let value = value.trim();
        match key.as_str() {
            "custom_id" => attr.id = value.to_string(),
            "class" => value.split_whitespace().for_each(|class| attr.push_class(class)),
            _ => attr.insert(key, value),
        }
    }
    attr
}

/// The tags of a headline as inline markers, unless tags are not exported.
fn tag_markers(tags: Vec<String>) -> Deferred<Vec<Inline>> {
    Deferred::new(move |state: &FinalState| {
        if !state.export().tags || tags.is_empty() {
            return Vec::new();
        }
        let mut markers = vec![Inline::Space];
        for (index, tag) in tags.iter().enumerate() {
            if index > 0 {
                markers.push(Inline::Str("\u{a0}".to_string()));
            }
            markers.push(Inline::Span {
                attr: Attr::new()
                    .with_class("tag")
                    .with_keyval("data-tag-name", tag.as_str()),
                content: vec![Inline::Str(tag.clone())],
            });
        }
        markers
    })
}

/// A headline: `*` repeated for the level, the title, optional trailing tags and an
/// optional property drawer. Not recognised inside list items.
#[tracing::instrument(level = "trace", skip_all)]
pub(crate) fn header(lines: &mut Lines<'_>, ctx: &mut Ctx<'_>) -> Option<Deferred<Blocks>> {
    if ctx.state.in_list() {
        return None;
    }
    let current = lines.peek()?;
    let level = line::header_level(current)?;
    lines.next();
    let text = current.get(level..).unwrap_or_default();
    let (title, tags) = org_line::headline(text).unwrap_or_else(|e| {
        tracing::warn!(%e, text, "unreadable headline, keeping it untagged");
        (text.trim(), Vec::new())
    });
    let tags = tags.into_iter().map(str::to_string).collect();
    let attr = property_drawer(lines);
    let attr = ctx.registry.register(level, title, attr);
    let content = ctx.inlines.parse(title, &ctx.state);
    Some(
        content.combine(tag_markers(tags), move |mut content, tags| {
            content.extend(tags);
            vec![Block::Header {
                level,
                attr: attr.clone(),
                content,
            }]
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        Options,
        blocks::tests::{parse_blocks, s, with_ctx},
    };
    use pretty_assertions::assert_eq;

    fn tag(name: &str) -> Inline {
        Inline::Span {
            attr: Attr::new().with_class("tag").with_keyval("data-tag-name", name),
            content: vec![s(name)],
        }
    }

    #[test]
    fn header_with_tags_and_properties() {
        let input = "** Big title :work:urgent:\n:PROPERTIES:\n:CUSTOM_ID: Intro\n:CLASS: wide Dark\n:Effort: 1:00\n:END:\nBody";
        assert_eq!(
            parse_blocks(input),
            vec![
                Block::Header {
                    level: 2,
                    attr: Attr::new()
                        .with_id("Intro")
                        .with_class("wide")
                        .with_class("Dark")
                        .with_keyval("effort", "1:00"),
                    content: vec![
                        s("Big"),
                        Inline::Space,
                        s("title"),
                        Inline::Space,
                        tag("work"),
                        Inline::Str("\u{a0}".into()),
                        tag("urgent"),
                    ]
                },
                Block::Para(vec![s("Body")]),
            ]
        );
    }

    #[test]
    fn tags_follow_the_final_export_settings() {
        let (blocks, _) = with_ctx(&Options::default(), |ctx| {
            crate::blocks::parse_text("* Title :a:\n#+OPTIONS: tags:nil", ctx)
        });
        assert_eq!(
            blocks,
            vec![Block::Header {
                level: 1,
                attr: Attr::new().with_id("title"),
                content: vec![s("Title")]
            }]
        );
    }

    #[test]
    fn registry_deduplicates_identifiers() {
        let blocks = parse_blocks("* Intro\n* Intro");
        let ids: Vec<_> = blocks
            .iter()
            .map(|block| match block {
                Block::Header { attr, .. } => attr.id.clone(),
                other => panic!("expected a header, got {other:?}"),
            })
            .collect();
        assert_eq!(ids, vec!["intro", "intro-1"]);
    }

    #[test]
    fn unterminated_properties_stay_in_the_text() {
        assert_eq!(
            parse_blocks("* H\n:PROPERTIES:\n:a: b"),
            vec![
                Block::Header {
                    level: 1,
                    attr: Attr::new().with_id("h"),
                    content: vec![s("H")]
                },
                Block::Para(vec![s(":PROPERTIES:"), Inline::SoftBreak, s(":a:"), Inline::Space, s("b")]),
            ]
        );
    }
}
