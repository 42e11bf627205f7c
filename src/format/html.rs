use super::{FormatKind, Resolution, AUTOGENERATED_PROMPT};
use crate::record::{Columns, Record};
use crate::text::{Cell, Text};

const INDENT: usize = 2;

/// A line-oriented HTML tree. Elements either stay on one line (`Inline`) or
/// put each child on its own, more deeply indented line (`Block`).
#[derive(Debug, Clone, PartialEq, Eq)]
enum Node {
    Line(String),
    Element { name: &'static str, body: Body },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Body {
    Inline(String),
    Block(Vec<Node>),
}

impl Node {
    fn block(name: &'static str, children: Vec<Node>) -> Self {
        Node::Element {
            name,
            body: Body::Block(children),
        }
    }

    fn inline(name: &'static str, content: String) -> Self {
        Node::Element {
            name,
            body: Body::Inline(content),
        }
    }

    fn write(&self, depth: usize, out: &mut Vec<String>) {
        let indent = " ".repeat(INDENT * depth);
        match self {
            Node::Line(line) => out.push(format!("{indent}{line}")),
            Node::Element {
                name,
                body: Body::Inline(content),
            } => out.push(format!("{indent}<{name}>{content}</{name}>")),
            Node::Element {
                name,
                body: Body::Block(children),
            } if children.is_empty() => out.push(format!("{indent}<{name}></{name}>")),
            Node::Element {
                name,
                body: Body::Block(children),
            } => {
                out.push(format!("{indent}<{name}>"));
                for child in children {
                    child.write(depth + 1, out);
                }
                out.push(format!("{indent}</{name}>"));
            }
        }
    }
}

pub(super) fn render(columns: &Columns, records: &[Record]) -> String {
    let header = Node::block(
        "tr",
        columns
            .headings()
            .map(|heading| Node::inline("th", render_text(heading)))
            .collect(),
    );

    let rows = records.iter().map(|record| {
        Node::block(
            "tr",
            columns
                .iter()
                .map(|column| render_cell(record.get(&column.key)))
                .collect(),
        )
    });

    let table = Node::block("table", std::iter::once(header).chain(rows).collect());

    let mut lines = vec![format!("<!-- {AUTOGENERATED_PROMPT} -->")];
    table.write(0, &mut lines);
    lines.join("\n")
}

fn render_cell(cell: &Cell) -> Node {
    match cell {
        Cell::Empty => Node::inline("td", String::new()),
        Cell::One(text) => Node::inline("td", render_text(text)),
        // multiple entries get a line each
        Cell::Many(texts) => Node::block(
            "td",
            texts.iter().map(|t| Node::Line(render_text(t))).collect(),
        ),
    }
}

/// A span carries the hover text, an anchor the link; either is omitted when
/// there is nothing to put in it.
fn render_text(text: &Text) -> String {
    let mut html = escape_text(text.text());

    if let Some(link) = FormatKind::Html.link(text, Resolution::Render) {
        html = format!("<a href='{}'>{html}</a>", escape_attr(&link));
    }
    if let Some(details) = text.details() {
        html = format!("<span title='{}'>{html}</span>", escape_attr(details));
    }
    html
}

fn escape_text(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;")
}

fn escape_attr(s: &str) -> String {
    escape_text(s).replace('\'', "&#39;")
}
