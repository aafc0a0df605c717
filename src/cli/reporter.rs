use colored::Colorize;

use withgen_common::{Diagnostic, DiagnosticCategory};

pub struct Reporter {
    color: bool,
}

impl Reporter {
    pub fn new(color: bool) -> Self {
        Reporter { color }
    }

    /// Render diagnostics one per line, trailing newline included.
    pub fn render(&self, diagnostics: &[Diagnostic]) -> String {
        let mut out = String::new();
        for diagnostic in diagnostics {
            out.push_str(&self.format_diagnostic(diagnostic));
            out.push('\n');
        }
        out
    }

    pub fn format_diagnostic(&self, diagnostic: &Diagnostic) -> String {
        let subject = self.format_subject(diagnostic);
        let category = self.format_category(diagnostic.category);
        let code = self.format_code(diagnostic);

        let mut output = String::new();
        output.push_str(&subject);
        output.push_str(" - ");
        output.push_str(&category);
        output.push(' ');
        output.push_str(&code);
        output.push_str(": ");
        output.push_str(&diagnostic.message_text);
        output
    }

    fn format_subject(&self, diagnostic: &Diagnostic) -> String {
        if diagnostic.subject_namespace.is_empty() {
            diagnostic.subject_name.clone()
        } else {
            format!(
                "{}.{}",
                diagnostic.subject_namespace, diagnostic.subject_name
            )
        }
    }

    fn format_category(&self, category: DiagnosticCategory) -> String {
        let label = match category {
            DiagnosticCategory::Error => "error",
            DiagnosticCategory::Warning => "warning",
        };

        if !self.color {
            return label.to_string();
        }

        match category {
            DiagnosticCategory::Error => label.red().bold().to_string(),
            DiagnosticCategory::Warning => label.yellow().bold().to_string(),
        }
    }

    fn format_code(&self, diagnostic: &Diagnostic) -> String {
        let label = diagnostic.display_code();
        if self.color {
            label.bright_blue().to_string()
        } else {
            label
        }
    }
}
