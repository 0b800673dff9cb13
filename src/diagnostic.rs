//! Source spans and terminal rendering for parse and runtime errors.

use owo_colors::OwoColorize;

/// Byte range into the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn dummy() -> Self {
        Self { start: 0, end: 0 }
    }

    pub fn is_dummy(&self) -> bool {
        self.start == 0 && self.end == 0
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// 1-based line and column of a byte offset.
pub fn line_col(source: &str, offset: usize) -> (usize, usize) {
    let mut line = 1;
    let mut col = 1;
    for (i, ch) in source.char_indices() {
        if i >= offset {
            break;
        }
        if ch == '\n' {
            line += 1;
            col = 1;
        } else {
            col += 1;
        }
    }
    (line, col)
}

#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub code: &'static str,
    pub message: String,
    pub span: Span,
    pub label: Option<String>,
    pub notes: Vec<String>,
}

impl Diagnostic {
    pub fn error(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            span: Span::dummy(),
            label: None,
            notes: Vec::new(),
        }
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.notes.push(format!("help: {}", help.into()));
        self
    }
}

pub struct DiagnosticRenderer<'a> {
    source: &'a str,
    file_name: &'a str,
    use_color: bool,
}

impl<'a> DiagnosticRenderer<'a> {
    pub fn new(source: &'a str, file_name: &'a str, use_color: bool) -> Self {
        Self {
            source,
            file_name,
            use_color,
        }
    }

    pub fn render(&self, diagnostic: &Diagnostic) -> String {
        let mut out = String::new();

        out.push_str(&format!(
            "{}[{}]: {}\n",
            self.paint_error("error"),
            diagnostic.code,
            self.paint_bold(&diagnostic.message)
        ));

        if !diagnostic.span.is_dummy() && diagnostic.span.start <= self.source.len() {
            let (line, column) = line_col(self.source, diagnostic.span.start);
            out.push_str(&format!(
                "  {} {}:{}:{}\n",
                self.paint_accent("-->"),
                self.file_name,
                line,
                column
            ));

            if let Some(content) = source_line(self.source, line) {
                let number = line.to_string();
                let pad = " ".repeat(number.len());
                let bar = self.paint_accent("|");

                out.push_str(&format!("{} {}\n", pad, bar));
                out.push_str(&format!("{} {} {}\n", self.paint_accent(&number), bar, content));

                let line_chars = content.chars().count();
                let available = line_chars.saturating_sub(column - 1).max(1);
                let carets = "^".repeat(diagnostic.span.len().clamp(1, available));
                let underline = match &diagnostic.label {
                    Some(label) => format!("{}{} {}", " ".repeat(column - 1), carets, label),
                    None => format!("{}{}", " ".repeat(column - 1), carets),
                };
                out.push_str(&format!("{} {} {}\n", pad, bar, self.paint_error(&underline)));
            }
        }

        for note in &diagnostic.notes {
            out.push_str(&format!("  {} {}\n", self.paint_accent("="), note));
        }

        out
    }

    fn paint_error(&self, text: &str) -> String {
        if self.use_color {
            text.red().bold().to_string()
        } else {
            text.to_string()
        }
    }

    fn paint_bold(&self, text: &str) -> String {
        if self.use_color {
            text.bold().to_string()
        } else {
            text.to_string()
        }
    }

    fn paint_accent(&self, text: &str) -> String {
        if self.use_color {
            text.blue().to_string()
        } else {
            text.to_string()
        }
    }
}

fn source_line(source: &str, line_number: usize) -> Option<&str> {
    source.lines().nth(line_number.saturating_sub(1))
}

pub fn render_diagnostic(
    source: &str,
    file_name: &str,
    diagnostic: &Diagnostic,
    use_color: bool,
) -> String {
    DiagnosticRenderer::new(source, file_name, use_color).render(diagnostic)
}
