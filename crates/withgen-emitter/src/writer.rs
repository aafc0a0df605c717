//! Indented text sink for member fragments.

use withgen_common::limits::INITIAL_FRAGMENT_CAPACITY;

const INDENT_STR: &str = "    ";

/// Four-space indented `String` sink.
///
/// Fragments hold members of a partial type, so the writer usually starts
/// at the member depth of a namespaced type body. Preprocessor directives
/// bypass indentation via [`CodeWriter::raw_line`].
#[derive(Debug)]
pub struct CodeWriter {
    output: String,
    indent_level: usize,
}

impl CodeWriter {
    #[must_use]
    pub fn new() -> CodeWriter {
        CodeWriter::with_indent(0)
    }

    /// A writer whose lines start at `depth` indentation levels.
    #[must_use]
    pub fn with_indent(depth: usize) -> CodeWriter {
        CodeWriter {
            output: String::with_capacity(INITIAL_FRAGMENT_CAPACITY),
            indent_level: depth,
        }
    }

    pub fn write(&mut self, text: &str) {
        self.output.push_str(text);
    }

    pub fn write_indent(&mut self) {
        for _ in 0..self.indent_level {
            self.output.push_str(INDENT_STR);
        }
    }

    pub fn write_line(&mut self) {
        self.output.push('\n');
    }

    /// Indent, text, newline.
    pub fn line(&mut self, text: &str) {
        self.write_indent();
        self.write(text);
        self.write_line();
    }

    /// Text plus newline at column zero, ignoring the current indent.
    pub fn raw_line(&mut self, text: &str) {
        self.write(text);
        self.write_line();
    }

    /// One empty separator line. Does nothing at the start of the output or
    /// directly after another separator.
    pub fn blank_line(&mut self) {
        if self.output.is_empty() || self.output.ends_with("\n\n") {
            return;
        }
        if !self.output.ends_with('\n') {
            self.output.push('\n');
        }
        self.output.push('\n');
    }

    pub const fn increase_indent(&mut self) {
        self.indent_level += 1;
    }

    pub const fn decrease_indent(&mut self) {
        if self.indent_level > 0 {
            self.indent_level -= 1;
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.output.is_empty()
    }

    #[must_use]
    pub fn finish(self) -> String {
        self.output
    }
}

impl Default for CodeWriter {
    fn default() -> Self {
        CodeWriter::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_applies_current_indent() {
        let mut writer = CodeWriter::new();
        writer.line("a");
        writer.increase_indent();
        writer.line("b");
        writer.decrease_indent();
        writer.line("c");
        assert_eq!(writer.finish(), "a\n    b\nc\n");
    }

    #[test]
    fn test_with_indent_starts_at_depth() {
        let mut writer = CodeWriter::with_indent(2);
        writer.line("x");
        assert_eq!(writer.finish(), "        x\n");
    }

    #[test]
    fn test_raw_line_skips_indent() {
        let mut writer = CodeWriter::with_indent(2);
        writer.raw_line("#if DEBUG");
        assert_eq!(writer.finish(), "#if DEBUG\n");
    }

    #[test]
    fn test_blank_line_collapses_runs() {
        let mut writer = CodeWriter::new();
        writer.blank_line();
        assert!(writer.is_empty(), "no leading separator");
        writer.line("a");
        writer.blank_line();
        writer.blank_line();
        writer.line("b");
        assert_eq!(writer.finish(), "a\n\nb\n");
    }

    #[test]
    fn test_decrease_indent_saturates_at_zero() {
        let mut writer = CodeWriter::new();
        writer.decrease_indent();
        writer.line("a");
        assert_eq!(writer.finish(), "a\n");
    }
}
