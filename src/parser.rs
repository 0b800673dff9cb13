//! Scannerless recursive-descent parser for the Culebra grammar.
//!
//! The grammar is a PEG: alternatives are ordered (`PRIMARY` tries object
//! literals before identifiers) and failed alternatives backtrack via saved
//! cursor states. There is no separate lexer because interpolated strings
//! embed full expressions; instead, trivia (whitespace and `//`, `#`,
//! `/* */` comments) is skipped after every consumed token, mirroring the
//! trailing-trivia convention of the grammar. Errors report the furthest
//! point any alternative reached.

use std::fmt;
use std::rc::Rc;

use crate::ast::{Node, Tag};
use crate::diagnostic::{Diagnostic, Span};

#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub line: usize,
    pub column: usize,
    pub span: Span,
    pub message: String,
}

impl ParseError {
    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic::error("E0101", self.message.clone())
            .with_span(self.span)
            .with_label("here")
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: {}", self.line, self.column, self.message)
    }
}

impl std::error::Error for ParseError {}

pub fn parse(source: &str) -> Result<Rc<Node>, ParseError> {
    let mut parser = Parser::new(source);
    parser.skip_trivia();
    let program = parser.parse_statements()?;
    if !parser.at_end() {
        return Err(parser.take_furthest("expected expression"));
    }
    Ok(program)
}

#[derive(Debug, Clone, Copy)]
struct State {
    pos: usize,
    line: usize,
    column: usize,
}

struct Parser<'a> {
    source: &'a str,
    pos: usize,
    line: usize,
    column: usize,
    token_end: usize,
    furthest: Option<ParseError>,
}

impl<'a> Parser<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            pos: 0,
            line: 1,
            column: 1,
            token_end: 0,
            furthest: None,
        }
    }

    // ------------------------------------------------------------------
    // Cursor
    // ------------------------------------------------------------------

    fn rest(&self) -> &'a str {
        &self.source[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn at_end(&self) -> bool {
        self.pos >= self.source.len()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    fn state(&self) -> State {
        State {
            pos: self.pos,
            line: self.line,
            column: self.column,
        }
    }

    fn restore(&mut self, state: State) {
        self.pos = state.pos;
        self.line = state.line;
        self.column = state.column;
    }

    /// Marks the end of a raw token and skips the trivia that follows it.
    fn end_token(&mut self) {
        self.token_end = self.pos;
        self.skip_trivia();
    }

    fn skip_trivia(&mut self) {
        loop {
            match self.peek() {
                Some(c) if c.is_whitespace() => {
                    self.bump();
                }
                Some('#') => self.skip_line_comment(),
                Some('/') if self.rest().starts_with("//") => self.skip_line_comment(),
                Some('/') if self.rest().starts_with("/*") => {
                    // An unterminated block comment is not trivia; leave the
                    // '/' in place so the parser fails on it.
                    let Some(close) = self.rest()[2..].find("*/") else {
                        break;
                    };
                    let end = self.pos + 2 + close + 2;
                    while self.pos < end {
                        self.bump();
                    }
                }
                _ => break,
            }
        }
    }

    fn skip_line_comment(&mut self) {
        while let Some(c) = self.peek() {
            if c == '\n' {
                break;
            }
            self.bump();
        }
    }

    // ------------------------------------------------------------------
    // Token helpers
    // ------------------------------------------------------------------

    fn eat_str(&mut self, token: &str) -> bool {
        if self.rest().starts_with(token) {
            for _ in token.chars() {
                self.bump();
            }
            self.end_token();
            true
        } else {
            false
        }
    }

    fn expect_str(&mut self, token: &str) -> Result<(), ParseError> {
        if self.eat_str(token) {
            Ok(())
        } else {
            Err(self.error_here(format!("expected '{}'", token)))
        }
    }

    fn eat_one_of(&mut self, tokens: &[&'static str]) -> Option<&'static str> {
        for &token in tokens {
            if self.rest().starts_with(token) {
                for _ in token.chars() {
                    self.bump();
                }
                self.end_token();
                return Some(token);
            }
        }
        None
    }

    /// Matches a keyword literal that must not run into an identifier, so
    /// `mutable` or `truey` stay identifiers.
    fn eat_keyword(&mut self, word: &str) -> bool {
        if !self.rest().starts_with(word) {
            return false;
        }
        let after = self.rest()[word.len()..].chars().next();
        if matches!(after, Some(c) if c.is_ascii_alphanumeric() || c == '_') {
            return false;
        }
        for _ in word.chars() {
            self.bump();
        }
        self.end_token();
        true
    }

    // ------------------------------------------------------------------
    // Errors
    // ------------------------------------------------------------------

    fn error_here(&mut self, message: impl Into<String>) -> ParseError {
        let state = self.state();
        self.error_at(state, message)
    }

    fn error_at(&mut self, state: State, message: impl Into<String>) -> ParseError {
        let end = state.pos
            + self.source[state.pos..]
                .chars()
                .next()
                .map_or(0, char::len_utf8);
        let error = ParseError {
            line: state.line,
            column: state.column,
            span: Span::new(state.pos, end),
            message: message.into(),
        };
        let further = self
            .furthest
            .as_ref()
            .map_or(true, |f| error.span.start >= f.span.start);
        if further {
            self.furthest = Some(error.clone());
        }
        error
    }

    fn take_furthest(&mut self, fallback: &str) -> ParseError {
        match self.furthest.take() {
            Some(error) if error.span.start >= self.pos => error,
            _ => self.error_here(fallback),
        }
    }

    // ------------------------------------------------------------------
    // Node construction
    // ------------------------------------------------------------------

    fn finish(&mut self, tag: Tag, start: State, mut children: Vec<Rc<Node>>) -> Rc<Node> {
        let preserved = matches!(tag, Tag::Parameters | Tag::Arguments | Tag::Object);
        if !preserved && children.len() == 1 {
            let mut child = children.remove(0);
            Rc::make_mut(&mut child).original_tag = tag;
            return child;
        }
        let end = self.token_end.max(start.pos);
        Rc::new(Node {
            tag,
            original_tag: tag,
            line: start.line,
            column: start.column,
            span: Span::new(start.pos, end),
            token: None,
            children,
        })
    }

    fn leaf(&mut self, tag: Tag, start: State, token: &str) -> Rc<Node> {
        let end = self.token_end.max(start.pos);
        Rc::new(Node {
            tag,
            original_tag: tag,
            line: start.line,
            column: start.column,
            span: Span::new(start.pos, end),
            token: Some(Rc::from(token)),
            children: Vec::new(),
        })
    }

    // ------------------------------------------------------------------
    // Grammar
    // ------------------------------------------------------------------

    fn parse_statements(&mut self) -> Result<Rc<Node>, ParseError> {
        let start = self.state();
        let mut children = Vec::new();
        loop {
            let save = self.state();
            match self.parse_expression() {
                Ok(expression) => {
                    children.push(expression);
                    self.eat_str(";");
                }
                Err(_) => {
                    self.restore(save);
                    break;
                }
            }
        }
        Ok(self.finish(Tag::Statements, start, children))
    }

    fn parse_expression(&mut self) -> Result<Rc<Node>, ParseError> {
        let save = self.state();
        if let Ok(node) = self.parse_assignment() {
            return Ok(node);
        }
        self.restore(save);
        self.parse_logical_or()
    }

    fn parse_assignment(&mut self) -> Result<Rc<Node>, ParseError> {
        let start = self.state();
        let mutable = self.parse_mutable();
        let name = self.parse_identifier()?;
        if !self.eat_assign() {
            return Err(self.error_here("expected '='"));
        }
        let value = self.parse_expression()?;
        Ok(self.finish(Tag::Assignment, start, vec![mutable, name, value]))
    }

    fn eat_assign(&mut self) -> bool {
        if self.rest().starts_with('=') && !self.rest().starts_with("==") {
            self.bump();
            self.end_token();
            true
        } else {
            false
        }
    }

    fn parse_mutable(&mut self) -> Rc<Node> {
        let start = self.state();
        let token = if self.eat_keyword("mut") { "mut" } else { "" };
        self.leaf(Tag::Mutable, start, token)
    }

    fn parse_logical_or(&mut self) -> Result<Rc<Node>, ParseError> {
        let start = self.state();
        let mut children = vec![self.parse_logical_and()?];
        while self.eat_str("||") {
            children.push(self.parse_logical_and()?);
        }
        Ok(self.finish(Tag::LogicalOr, start, children))
    }

    fn parse_logical_and(&mut self) -> Result<Rc<Node>, ParseError> {
        let start = self.state();
        let mut children = vec![self.parse_condition()?];
        while self.eat_str("&&") {
            children.push(self.parse_condition()?);
        }
        Ok(self.finish(Tag::LogicalAnd, start, children))
    }

    fn parse_condition(&mut self) -> Result<Rc<Node>, ParseError> {
        let start = self.state();
        let mut children = vec![self.parse_additive()?];
        loop {
            let op_start = self.state();
            let Some(op) = self.eat_one_of(&["==", "!=", "<=", "<", ">=", ">"]) else {
                break;
            };
            children.push(self.leaf(Tag::Operator, op_start, op));
            children.push(self.parse_additive()?);
        }
        Ok(self.finish(Tag::Condition, start, children))
    }

    fn parse_additive(&mut self) -> Result<Rc<Node>, ParseError> {
        let start = self.state();
        let mut children = vec![self.parse_unary_plus()?];
        loop {
            let op_start = self.state();
            let Some(op) = self.eat_one_of(&["+", "-"]) else {
                break;
            };
            children.push(self.leaf(Tag::Operator, op_start, op));
            children.push(self.parse_unary_plus()?);
        }
        Ok(self.finish(Tag::Additive, start, children))
    }

    fn parse_unary_plus(&mut self) -> Result<Rc<Node>, ParseError> {
        let start = self.state();
        if self.rest().starts_with('+') {
            self.bump();
            self.end_token();
            let op = self.leaf(Tag::Operator, start, "+");
            let operand = self.parse_unary_minus()?;
            return Ok(self.finish(Tag::UnaryPlus, start, vec![op, operand]));
        }
        self.parse_unary_minus()
    }

    fn parse_unary_minus(&mut self) -> Result<Rc<Node>, ParseError> {
        let start = self.state();
        if self.rest().starts_with('-') {
            self.bump();
            self.end_token();
            let op = self.leaf(Tag::Operator, start, "-");
            let operand = self.parse_unary_not()?;
            return Ok(self.finish(Tag::UnaryMinus, start, vec![op, operand]));
        }
        self.parse_unary_not()
    }

    fn parse_unary_not(&mut self) -> Result<Rc<Node>, ParseError> {
        let start = self.state();
        if self.rest().starts_with('!') {
            self.bump();
            self.end_token();
            let op = self.leaf(Tag::Operator, start, "!");
            let operand = self.parse_multiplicative()?;
            return Ok(self.finish(Tag::UnaryNot, start, vec![op, operand]));
        }
        self.parse_multiplicative()
    }

    fn parse_multiplicative(&mut self) -> Result<Rc<Node>, ParseError> {
        let start = self.state();
        let mut children = vec![self.parse_call()?];
        loop {
            let op_start = self.state();
            let Some(op) = self.eat_one_of(&["*", "/", "%"]) else {
                break;
            };
            children.push(self.leaf(Tag::Operator, op_start, op));
            children.push(self.parse_call()?);
        }
        Ok(self.finish(Tag::Multiplicative, start, children))
    }

    fn parse_call(&mut self) -> Result<Rc<Node>, ParseError> {
        let start = self.state();
        let mut children = vec![self.parse_primary()?];
        loop {
            let save = self.state();
            let postfix = match self.peek() {
                Some('(') => self.parse_arguments(),
                Some('[') => self.parse_index(),
                Some('.') => self.parse_dot(),
                _ => break,
            };
            match postfix {
                Ok(node) => children.push(node),
                Err(_) => {
                    self.restore(save);
                    break;
                }
            }
        }
        Ok(self.finish(Tag::Call, start, children))
    }

    fn parse_arguments(&mut self) -> Result<Rc<Node>, ParseError> {
        let start = self.state();
        self.expect_str("(")?;
        let mut children = Vec::new();
        if !self.rest().starts_with(')') {
            loop {
                children.push(self.parse_expression()?);
                if !self.eat_str(",") {
                    break;
                }
            }
        }
        self.expect_str(")")?;
        Ok(self.finish(Tag::Arguments, start, children))
    }

    fn parse_index(&mut self) -> Result<Rc<Node>, ParseError> {
        self.expect_str("[")?;
        let mut expression = self.parse_expression()?;
        self.expect_str("]")?;
        Rc::make_mut(&mut expression).original_tag = Tag::Index;
        Ok(expression)
    }

    fn parse_dot(&mut self) -> Result<Rc<Node>, ParseError> {
        self.expect_str(".")?;
        let mut name = self.parse_identifier()?;
        Rc::make_mut(&mut name).original_tag = Tag::Dot;
        Ok(name)
    }

    fn parse_primary(&mut self) -> Result<Rc<Node>, ParseError> {
        let save = self.state();
        // Ordered choice: object literals must be tried before identifiers,
        // keyword literals before identifiers.
        let alternatives: [fn(&mut Self) -> Result<Rc<Node>, ParseError>; 12] = [
            Self::parse_while,
            Self::parse_if,
            Self::parse_function,
            Self::parse_object,
            Self::parse_array,
            Self::parse_undefined,
            Self::parse_boolean,
            Self::parse_number,
            Self::parse_identifier,
            Self::parse_string,
            Self::parse_interpolated,
            Self::parse_paren,
        ];
        for alternative in alternatives {
            match alternative(self) {
                Ok(node) => return Ok(node),
                Err(_) => self.restore(save),
            }
        }
        Err(self.error_here("expected expression"))
    }

    fn parse_while(&mut self) -> Result<Rc<Node>, ParseError> {
        let start = self.state();
        if !self.eat_keyword("while") {
            return Err(self.error_here("expected 'while'"));
        }
        let condition = self.parse_expression()?;
        let body = self.parse_block()?;
        Ok(self.finish(Tag::While, start, vec![condition, body]))
    }

    fn parse_if(&mut self) -> Result<Rc<Node>, ParseError> {
        let start = self.state();
        if !self.eat_keyword("if") {
            return Err(self.error_here("expected 'if'"));
        }
        let condition = self.parse_expression()?;
        let body = self.parse_block()?;
        let mut children = vec![condition, body];
        loop {
            let save = self.state();
            if !self.eat_keyword("else") {
                break;
            }
            if self.eat_keyword("if") {
                let condition = match self.parse_expression() {
                    Ok(node) => node,
                    Err(_) => {
                        self.restore(save);
                        break;
                    }
                };
                let body = match self.parse_block() {
                    Ok(node) => node,
                    Err(_) => {
                        self.restore(save);
                        break;
                    }
                };
                children.push(condition);
                children.push(body);
            } else {
                match self.parse_block() {
                    Ok(body) => {
                        children.push(body);
                        break;
                    }
                    Err(_) => {
                        self.restore(save);
                        break;
                    }
                }
            }
        }
        Ok(self.finish(Tag::If, start, children))
    }

    fn parse_function(&mut self) -> Result<Rc<Node>, ParseError> {
        let start = self.state();
        if !self.eat_keyword("fn") {
            return Err(self.error_here("expected 'fn'"));
        }
        let parameters = self.parse_parameters()?;
        let body = self.parse_block()?;
        Ok(self.finish(Tag::Function, start, vec![parameters, body]))
    }

    fn parse_parameters(&mut self) -> Result<Rc<Node>, ParseError> {
        let start = self.state();
        self.expect_str("(")?;
        let mut children = Vec::new();
        if !self.rest().starts_with(')') {
            loop {
                children.push(self.parse_parameter()?);
                if !self.eat_str(",") {
                    break;
                }
            }
        }
        self.expect_str(")")?;
        Ok(self.finish(Tag::Parameters, start, children))
    }

    fn parse_parameter(&mut self) -> Result<Rc<Node>, ParseError> {
        let start = self.state();
        let mutable = self.parse_mutable();
        let name = self.parse_identifier()?;
        Ok(self.finish(Tag::Parameter, start, vec![mutable, name]))
    }

    fn parse_block(&mut self) -> Result<Rc<Node>, ParseError> {
        let start = self.state();
        self.expect_str("{")?;
        let statements = self.parse_statements()?;
        self.expect_str("}")?;
        Ok(self.finish(Tag::Block, start, vec![statements]))
    }

    fn parse_object(&mut self) -> Result<Rc<Node>, ParseError> {
        let start = self.state();
        self.expect_str("{")?;
        let mut children = Vec::new();
        if !self.rest().starts_with('}') {
            loop {
                children.push(self.parse_object_property()?);
                if !self.eat_str(",") {
                    break;
                }
            }
        }
        self.expect_str("}")?;
        Ok(self.finish(Tag::Object, start, children))
    }

    fn parse_object_property(&mut self) -> Result<Rc<Node>, ParseError> {
        let start = self.state();
        let key = self.parse_identifier()?;
        self.expect_str(":")?;
        let value = self.parse_expression()?;
        Ok(self.finish(Tag::ObjectProperty, start, vec![key, value]))
    }

    fn parse_array(&mut self) -> Result<Rc<Node>, ParseError> {
        let start = self.state();
        self.expect_str("[")?;
        let mut children = Vec::new();
        if !self.rest().starts_with(']') {
            loop {
                children.push(self.parse_expression()?);
                if !self.eat_str(",") {
                    break;
                }
            }
        }
        self.expect_str("]")?;
        Ok(self.finish(Tag::Array, start, children))
    }

    fn parse_undefined(&mut self) -> Result<Rc<Node>, ParseError> {
        let start = self.state();
        if self.eat_keyword("undefined") {
            Ok(self.leaf(Tag::Undefined, start, "undefined"))
        } else {
            Err(self.error_here("expected 'undefined'"))
        }
    }

    fn parse_boolean(&mut self) -> Result<Rc<Node>, ParseError> {
        let start = self.state();
        if self.eat_keyword("true") {
            Ok(self.leaf(Tag::Boolean, start, "true"))
        } else if self.eat_keyword("false") {
            Ok(self.leaf(Tag::Boolean, start, "false"))
        } else {
            Err(self.error_here("expected boolean"))
        }
    }

    fn parse_number(&mut self) -> Result<Rc<Node>, ParseError> {
        let start = self.state();
        let bytes = self.rest().as_bytes();
        let mut len = 0;
        while len < bytes.len() && bytes[len].is_ascii_digit() {
            len += 1;
        }
        if len == 0 {
            return Err(self.error_here("expected number"));
        }
        let text = self.rest()[..len].to_string();
        for _ in 0..len {
            self.bump();
        }
        self.end_token();
        if text.parse::<i64>().is_err() {
            return Err(self.error_at(start, "number literal out of range"));
        }
        Ok(self.leaf(Tag::Number, start, &text))
    }

    fn parse_identifier(&mut self) -> Result<Rc<Node>, ParseError> {
        let start = self.state();
        let bytes = self.rest().as_bytes();
        if bytes.is_empty() || !(bytes[0].is_ascii_alphabetic() || bytes[0] == b'_') {
            return Err(self.error_here("expected identifier"));
        }
        let mut len = 1;
        while len < bytes.len() && (bytes[len].is_ascii_alphanumeric() || bytes[len] == b'_') {
            len += 1;
        }
        let name = self.rest()[..len].to_string();
        for _ in 0..len {
            self.bump();
        }
        self.end_token();
        Ok(self.leaf(Tag::Identifier, start, &name))
    }

    fn parse_string(&mut self) -> Result<Rc<Node>, ParseError> {
        let start = self.state();
        if !self.rest().starts_with('\'') {
            return Err(self.error_here("expected string"));
        }
        self.bump();
        let content_start = self.pos;
        loop {
            match self.peek() {
                Some('\'') => break,
                Some(_) => {
                    self.bump();
                }
                None => return Err(self.error_at(start, "unterminated string")),
            }
        }
        let content = self.source[content_start..self.pos].to_string();
        self.bump();
        self.end_token();
        Ok(self.leaf(Tag::String, start, &content))
    }

    fn parse_interpolated(&mut self) -> Result<Rc<Node>, ParseError> {
        let start = self.state();
        if !self.rest().starts_with('"') {
            return Err(self.error_here("expected string"));
        }
        self.bump();
        let mut children = Vec::new();
        loop {
            match self.peek() {
                Some('"') => {
                    self.bump();
                    self.end_token();
                    break;
                }
                Some('{') => {
                    self.bump();
                    self.end_token();
                    let expression = self.parse_expression()?;
                    if !self.rest().starts_with('}') {
                        return Err(self.error_here("expected '}'"));
                    }
                    self.bump();
                    // The closing brace is followed by raw string content,
                    // so trailing trivia must not be skipped here.
                    self.token_end = self.pos;
                    children.push(expression);
                }
                Some(_) => {
                    let segment_start = self.state();
                    let content_start = self.pos;
                    while let Some(c) = self.peek() {
                        if c == '"' || c == '{' {
                            break;
                        }
                        self.bump();
                    }
                    let text = self.source[content_start..self.pos].to_string();
                    self.token_end = self.pos;
                    children.push(self.leaf(Tag::InterpolatedContent, segment_start, &text));
                }
                None => return Err(self.error_at(start, "unterminated string")),
            }
        }
        Ok(self.finish(Tag::Interpolated, start, children))
    }

    fn parse_paren(&mut self) -> Result<Rc<Node>, ParseError> {
        self.expect_str("(")?;
        let expression = self.parse_expression()?;
        self.expect_str(")")?;
        Ok(expression)
    }
}
