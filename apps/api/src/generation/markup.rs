//! Intermediate markup tree for generated Typst source.
//!
//! Renderers build nodes from the resume record; serialization turns nodes into
//! text. User text is stored raw and escaped here, at the single point where it
//! meets the output, so no renderer interpolates strings by hand.

use crate::generation::dates::DateExpr;
use crate::generation::escape::escape;

// ────────────────────────────────────────────────────────────────────────────
// Expressions and arguments
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// User text as a string literal.
    Str(String),
    Date(DateExpr),
    /// The literal `"Present"` end-date token.
    Present,
}

impl Expr {
    pub fn str(text: &str) -> Self {
        Expr::Str(text.to_string())
    }

    fn render(&self) -> String {
        match self {
            Expr::Str(text) => format!("\"{}\"", escape(text)),
            Expr::Date(date) => date.to_string(),
            Expr::Present => "\"Present\"".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    Positional(Expr),
    Named(&'static str, Expr),
}

impl Arg {
    fn render(&self) -> String {
        match self {
            Arg::Positional(expr) => expr.render(),
            Arg::Named(name, expr) => format!("{name}: {}", expr.render()),
        }
    }
}

/// How an argument list is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgLayout {
    /// `(a, b)`
    Inline,
    /// One argument per line, indented two spaces.
    Block { trailing_comma: bool },
}

// ────────────────────────────────────────────────────────────────────────────
// Content
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum Span {
    Text(String),
    /// `*text*`
    Strong(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListItem(pub Vec<Span>);

impl ListItem {
    pub fn text(text: &str) -> Self {
        ListItem(vec![Span::Text(text.to_string())])
    }

    fn render(&self, indent: &str) -> String {
        let mut line = format!("{indent}- ");
        for span in &self.0 {
            match span {
                Span::Text(text) => line.push_str(&escape(text)),
                Span::Strong(text) => {
                    line.push('*');
                    line.push_str(&escape(text));
                    line.push('*');
                }
            }
        }
        line
    }
}

/// The trailing content block of a call.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    /// `[` newline, one list line per item, newline `]`.
    List {
        indent: &'static str,
        items: Vec<ListItem>,
    },
    /// `[]` when empty, otherwise `[` newline text `]`.
    Text(Option<String>),
}

impl Body {
    pub fn bullets(items: Vec<ListItem>) -> Self {
        Body::List {
            indent: "  ",
            items,
        }
    }

    fn render(&self) -> String {
        match self {
            Body::List { indent, items } => {
                let lines = items
                    .iter()
                    .map(|item| item.render(indent))
                    .collect::<Vec<_>>()
                    .join("\n");
                format!("[\n{lines}\n]")
            }
            Body::Text(None) => "[]".to_string(),
            Body::Text(Some(text)) => format!("[\n{}]", escape(text)),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Calls, blocks and sections
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub name: &'static str,
    pub args: Vec<Arg>,
    pub layout: ArgLayout,
    pub body: Option<Body>,
}

impl Call {
    fn render(&self) -> String {
        let mut out = self.name.to_string();

        if !self.args.is_empty() {
            let args: Vec<String> = self.args.iter().map(Arg::render).collect();
            match self.layout {
                ArgLayout::Inline => {
                    out.push('(');
                    out.push_str(&args.join(", "));
                    out.push(')');
                }
                ArgLayout::Block { trailing_comma } => {
                    out.push_str("(\n");
                    out.push_str(
                        &args
                            .iter()
                            .map(|a| format!("  {a}"))
                            .collect::<Vec<_>>()
                            .join(",\n"),
                    );
                    if trailing_comma {
                        out.push(',');
                    }
                    out.push_str("\n)");
                }
            }
        }

        if let Some(body) = &self.body {
            out.push_str(&body.render());
        }
        out
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    /// Escaped running text.
    Paragraph(String),
    /// `#name(...)[...]`
    Call(Call),
    /// `#show: name(...)`
    Show(Call),
}

impl Block {
    pub fn render(&self) -> String {
        match self {
            Block::Paragraph(text) => escape(text),
            Block::Call(call) => format!("#{}", call.render()),
            Block::Show(call) => format!("#show: {}", call.render()),
        }
    }
}

/// A level-one heading followed by its blocks, separated by blank lines.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub title: &'static str,
    pub blocks: Vec<Block>,
}

impl Section {
    pub fn render(&self) -> String {
        let blocks = self
            .blocks
            .iter()
            .map(Block::render)
            .collect::<Vec<_>>()
            .join("\n\n");
        format!("= {}\n{blocks}", self.title)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_call_layout() {
        let call = Call {
            name: "work-heading",
            args: vec![
                Arg::Positional(Expr::str("Engineer")),
                Arg::Positional(Expr::Date(DateExpr::Today)),
                Arg::Positional(Expr::Present),
            ],
            layout: ArgLayout::Block {
                trailing_comma: false,
            },
            body: Some(Body::bullets(vec![ListItem::text("Shipped it")])),
        };
        assert_eq!(
            Block::Call(call).render(),
            "#work-heading(\n  \"Engineer\",\n  datetime.today(),\n  \"Present\"\n)[\n  - Shipped it\n]"
        );
    }

    #[test]
    fn test_empty_bullet_body_keeps_brackets() {
        assert_eq!(Body::bullets(vec![]).render(), "[\n\n]");
    }

    #[test]
    fn test_inline_call_with_text_body() {
        let call = Call {
            name: "achievement-heading",
            args: vec![
                Arg::Positional(Expr::str("Award")),
                Arg::Positional(Expr::str("")),
            ],
            layout: ArgLayout::Inline,
            body: Some(Body::Text(Some("Won $1k".to_string()))),
        };
        assert_eq!(
            Block::Call(call).render(),
            "#achievement-heading(\"Award\", \"\")[\nWon \\$1k]"
        );
    }

    #[test]
    fn test_show_rule_with_trailing_comma_and_named_args() {
        let call = Call {
            name: "resume.with",
            args: vec![
                Arg::Named("author-name", Expr::str("Jo \"JJ\" Doe")),
                Arg::Named("email", Expr::str("jo@example.com")),
            ],
            layout: ArgLayout::Block {
                trailing_comma: true,
            },
            body: None,
        };
        assert_eq!(
            Block::Show(call).render(),
            "#show: resume.with(\n  author-name: \"Jo \\\"JJ\\\" Doe\",\n  email: \"jo@example.com\",\n)"
        );
    }

    #[test]
    fn test_strong_span_list_item() {
        let item = ListItem(vec![
            Span::Strong("C#:".to_string()),
            Span::Text(" .NET".to_string()),
        ]);
        assert_eq!(item.render(""), "- *C\\#:* .NET");
    }

    #[test]
    fn test_section_joins_blocks_with_blank_line() {
        let section = Section {
            title: "Profile",
            blocks: vec![
                Block::Paragraph("one".to_string()),
                Block::Paragraph("two".to_string()),
            ],
        };
        assert_eq!(section.render(), "= Profile\none\n\ntwo");
    }
}
