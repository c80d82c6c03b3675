//! Build progress and diagnostics on stderr, command results on stdout.

use console::{Style, Term};

/// Stderr reporter for the `build`, `meta` and `style` commands.
///
/// Progress lines are plain, the written poster path is green, render
/// warnings are yellow and fatal errors are red.
pub(crate) struct Output {
    term: Term,
    green: Style,
    yellow: Style,
    red: Style,
}

impl Output {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            term: Term::stderr(),
            green: Style::new().green(),
            yellow: Style::new().yellow(),
            red: Style::new().red(),
        }
    }

    /// Progress line, such as the config in use or the input being rendered.
    pub(crate) fn info(&self, msg: &str) {
        let _ = self.term.write_line(msg);
    }

    /// Final line of a successful build.
    pub(crate) fn success(&self, msg: &str) {
        let _ = self.term.write_line(&self.green.apply_to(msg).to_string());
    }

    pub(crate) fn warning(&self, msg: &str) {
        let _ = self.term.write_line(&self.yellow.apply_to(msg).to_string());
    }

    /// Fatal error before exiting with status 1.
    pub(crate) fn error(&self, msg: &str) {
        let _ = self.term.write_line(&self.red.apply_to(msg).to_string());
    }

    /// Frontmatter, directive and theme warnings from a render, one per line.
    pub(crate) fn warnings(&self, warnings: &[String]) {
        for warning in warnings {
            self.warning(&format!("Warning: {warning}"));
        }
    }
}

/// Write the JSON report or stylesheet produced by `meta` and `style`.
///
/// A trailing newline is added when missing.
pub(crate) fn print_result(text: &str) -> std::io::Result<()> {
    let term = Term::stdout();
    term.write_str(text)?;
    if !text.ends_with('\n') {
        term.write_line("")?;
    }
    Ok(())
}
