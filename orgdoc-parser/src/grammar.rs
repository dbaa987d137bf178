//! Grammars for the single-line sub-languages embedded in Org blocks.
//!
//! Block structure is recognised line by line in [`crate::blocks`]; once a line is
//! known to be, say, a src block header or a table row, its content is handed to one
//! of the rules below. Keys are case-sensitive here; callers lowercase them first
//! where Org treats them case-insensitively.
use crate::{model::Alignment, state::DrawerFilter};

/// The parts of a `#+BEGIN_SRC` line after the block type.
#[derive(Debug, Default, PartialEq)]
pub(crate) struct SrcHeader<'a> {
    pub(crate) language: Option<&'a str>,
    pub(crate) switches: Vec<&'a str>,
    pub(crate) args: Vec<(&'a str, Option<&'a str>)>,
}

peg::parser! {
    pub(crate) grammar org_line() for str {
        rule ws() = [' ' | '\t']

        rule _() = ws()*

        rule word() -> &'input str = $((!ws() [_])+)

        /// `key:value` pairs of an `#+OPTIONS:` line.
        pub rule options() -> Vec<(&'input str, &'input str)>
            = _ pairs:(option() ** (ws()+)) _ { pairs }

        rule option() -> (&'input str, &'input str)
            = key:option_key() ":" value:option_value() { (key, value) }

        // `::nil` sets the `:` key.
        rule option_key() -> &'input str
            = $((!(ws() / ":") [_])+) / $(":")

        rule option_value() -> &'input str
            = $("(" [^')']* ")") / word()

        /// The value of the `d` option.
        pub rule drawer_filter() -> DrawerFilter
            = "t" { DrawerFilter::Exclude(vec![]) }
            / "nil" { DrawerFilter::Include(vec![]) }
            / "(" _ "not" ws()+ names:(quoted() ** (ws()+)) _ ")" { DrawerFilter::Exclude(names) }
            / "(" _ names:(quoted() ** (ws()+)) _ ")" { DrawerFilter::Include(names) }

        rule quoted() -> String
            = "\"" name:$([^'"']*) "\"" { name.to_uppercase() }

        /// `#+LINK: key template`
        pub rule link() -> (&'input str, &'input str)
            = _ key:word() ws()+ template:$([_]*) { (key, template.trim_end()) }

        /// `#+MACRO: name body`, the body may be empty.
        pub rule macro_definition() -> (&'input str, &'input str)
            = _ name:word() body:(ws()+ body:$([_]*) { body })? {
                (name, body.map_or("", str::trim_end))
            }

        /// Everything after `#+BEGIN_SRC`.
        pub rule src_header() -> SrcHeader<'input>
            = _ language:language()? _ switches:(switch() ** (ws()+)) _ args:keyval_list() _ {
                SrcHeader { language, switches, args }
            }

        rule language() -> &'input str
            = !['-' | '+' | ':'] language:word() { language }

        rule switch() -> &'input str
            = $(['-' | '+'] ['a'..='z' | 'A'..='Z'] (ws()+ "\"" [^'"']* "\"")?)

        /// `:key value :key2 value with spaces` as found on `#+ATTR_HTML:` lines.
        pub rule keyvals() -> Vec<(&'input str, Option<&'input str>)>
            = _ pairs:keyval_list() _ { pairs }

        rule keyval_list() -> Vec<(&'input str, Option<&'input str>)>
            = keyval() ** (ws()+)

        rule keyval() -> (&'input str, Option<&'input str>)
            = ":" key:word() value:(ws()+ !":" value:$((!(ws()+ ":") [_])+) { value.trim_end() })? {
                (key, value)
            }

        /// Cells of a table row; the row starts at its first `|`.
        pub rule table_row() -> Vec<&'input str>
            = _ "|" cells:cell()* { cells }

        rule cell() -> &'input str
            = content:$([^'|']+) ("|" / ![_]) { content }
            / "|" { "" }

        /// A cell of an alignment row: `<l>`, `<c10>` or empty.
        pub rule alignment_cell() -> Option<Alignment>
            = _ "<" cookie:['l' | 'c' | 'r'] ['0'..='9']* ">" _ { Alignment::from_cookie(cookie) }
            / _ { None }

        /// Headline text after the stars, split from its trailing `:tag:` list.
        pub rule headline() -> (&'input str, Vec<&'input str>)
            = title:$((!tags() [_])*) tags:tags()? { (title.trim(), tags.unwrap_or_default()) }

        rule tags() -> Vec<&'input str>
            = ws()+ ":" tags:(tag() ++ ":") ":" _ ![_] { tags }

        rule tag() -> &'input str
            = $(['a'..='z' | 'A'..='Z' | '0'..='9' | '_' | '@' | '#' | '%']+)
    }
}
