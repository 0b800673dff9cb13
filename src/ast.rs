//! Generic syntax tree produced by the parser.
//!
//! Nodes carry the grammar production that created them rather than a typed
//! shape, because the evaluator dispatches on production tags and relies on
//! the child counts that single-child hoisting guarantees. A node built with
//! exactly one child is replaced by that child; the elided production is
//! recorded in `original_tag` so call postfixes can tell a hoisted `INDEX`
//! operand from a hoisted `DOT` name. `PARAMETERS`, `ARGUMENTS` and `OBJECT`
//! are containers with meaning of their own and are never hoisted.

use std::rc::Rc;

use crate::diagnostic::Span;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    Statements,
    While,
    If,
    Function,
    Parameters,
    Parameter,
    Block,
    Call,
    Arguments,
    Index,
    Dot,
    Assignment,
    LogicalOr,
    LogicalAnd,
    Condition,
    Additive,
    Multiplicative,
    UnaryPlus,
    UnaryMinus,
    UnaryNot,
    Operator,
    Object,
    ObjectProperty,
    Array,
    Undefined,
    Boolean,
    Number,
    String,
    Interpolated,
    InterpolatedContent,
    Identifier,
    Mutable,
}

impl Tag {
    pub fn name(self) -> &'static str {
        match self {
            Tag::Statements => "STATEMENTS",
            Tag::While => "WHILE",
            Tag::If => "IF",
            Tag::Function => "FUNCTION",
            Tag::Parameters => "PARAMETERS",
            Tag::Parameter => "PARAMETER",
            Tag::Block => "BLOCK",
            Tag::Call => "CALL",
            Tag::Arguments => "ARGUMENTS",
            Tag::Index => "INDEX",
            Tag::Dot => "DOT",
            Tag::Assignment => "ASSIGNMENT",
            Tag::LogicalOr => "LOGICAL_OR",
            Tag::LogicalAnd => "LOGICAL_AND",
            Tag::Condition => "CONDITION",
            Tag::Additive => "ADDITIVE",
            Tag::Multiplicative => "MULTIPLICATIVE",
            Tag::UnaryPlus => "UNARY_PLUS",
            Tag::UnaryMinus => "UNARY_MINUS",
            Tag::UnaryNot => "UNARY_NOT",
            Tag::Operator => "OPERATOR",
            Tag::Object => "OBJECT",
            Tag::ObjectProperty => "OBJECT_PROPERTY",
            Tag::Array => "ARRAY",
            Tag::Undefined => "UNDEFINED",
            Tag::Boolean => "BOOLEAN",
            Tag::Number => "NUMBER",
            Tag::String => "STRING",
            Tag::Interpolated => "INTERPOLATED_STRING",
            Tag::InterpolatedContent => "INTERPOLATED_CONTENT",
            Tag::Identifier => "IDENTIFIER",
            Tag::Mutable => "MUTABLE",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub tag: Tag,
    pub original_tag: Tag,
    pub line: usize,
    pub column: usize,
    pub span: Span,
    pub token: Option<Rc<str>>,
    pub children: Vec<Rc<Node>>,
}

impl Node {
    pub fn token_text(&self) -> &str {
        self.token.as_deref().unwrap_or("")
    }

    /// Renders the tree in the `--ast` dump format.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        self.dump_into(&mut out, 0);
        out
    }

    fn dump_into(&self, out: &mut String, depth: usize) {
        for _ in 0..depth {
            out.push_str("  ");
        }
        let name = if self.original_tag == self.tag {
            self.tag.name().to_string()
        } else {
            format!("{}[{}]", self.tag.name(), self.original_tag.name())
        };
        match &self.token {
            Some(token) => out.push_str(&format!("- {} ({})\n", name, token)),
            None => {
                out.push_str(&format!("+ {}\n", name));
                for child in &self.children {
                    child.dump_into(out, depth + 1);
                }
            }
        }
    }
}
