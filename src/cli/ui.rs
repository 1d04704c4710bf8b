//! Terminal output: status lines on stderr, summary tables on stdout.
//!
//! Inspired by: cargo, ripgrep, bat, fd

use zap_autorun_core::SeverityTier;
use zap_autorun_reports::Summary;

/// ANSI color codes for terminal styling
pub mod colors {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const DIM: &str = "\x1b[2m";

    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const MAGENTA: &str = "\x1b[35m";
    pub const CYAN: &str = "\x1b[36m";

    pub const BRIGHT_GREEN: &str = "\x1b[92m";
    pub const BRIGHT_YELLOW: &str = "\x1b[93m";
    pub const BRIGHT_CYAN: &str = "\x1b[96m";
    pub const BRIGHT_RED: &str = "\x1b[91m";
}

/// Check if colors should be enabled for `stream`
pub fn colors_enabled(stream: atty::Stream) -> bool {
    // Respect NO_COLOR and TERM conventions
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }
    if std::env::var("TERM").map(|t| t == "dumb").unwrap_or(false) {
        return false;
    }
    atty::is(stream)
}

/// Get terminal width, defaulting to 100
pub fn terminal_width() -> usize {
    terminal_size::terminal_size()
        .map(|(w, _)| w.0 as usize)
        .unwrap_or(100)
}

/// Truncate text to `max_len` characters, ending with an ellipsis if cut
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() <= max_len {
        return text.to_string();
    }
    if max_len <= 3 {
        return "...".to_string();
    }
    let kept: String = text.chars().take(max_len - 3).collect();
    format!("{}...", kept)
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn severity_color(severity: Option<SeverityTier>) -> &'static str {
    match severity {
        Some(SeverityTier::High) => colors::BRIGHT_RED,
        Some(SeverityTier::Medium) => colors::BRIGHT_YELLOW,
        Some(SeverityTier::Low) => colors::CYAN,
        Some(SeverityTier::Info) => colors::DIM,
        None => colors::MAGENTA,
    }
}

/// Status line printer with consistent formatting
/// Inspired by cargo's output style: `   Compiling foo v0.1.0`
pub struct StatusPrinter {
    use_colors: bool,
}

impl StatusPrinter {
    /// Status lines go to stderr, so color support is checked there.
    const STREAM: atty::Stream = atty::Stream::Stderr;

    pub fn new() -> Self {
        Self {
            use_colors: colors_enabled(Self::STREAM),
        }
    }

    fn styled(&self, color: &str, bold: bool, text: &str) -> String {
        if self.use_colors {
            let bold_code = if bold { colors::BOLD } else { "" };
            format!("{}{}{}{}", bold_code, color, text, colors::RESET)
        } else {
            text.to_string()
        }
    }

    fn line(&self, color: &str, keyword: &str, message: &str) -> String {
        let keyword_styled = self.styled(color, true, &format!("{:>12}", keyword));
        format!("{} {}", keyword_styled, message)
    }

    /// Print a status line: `  Generating  autorun config`
    pub fn status(&self, keyword: &str, message: &str) {
        eprintln!("{}", self.line(colors::BRIGHT_GREEN, keyword, message));
    }

    /// Print an info line: `      Info  some information`
    pub fn info(&self, keyword: &str, message: &str) {
        eprintln!("{}", self.line(colors::BRIGHT_CYAN, keyword, message));
    }

    /// Print a warning line
    pub fn warning(&self, keyword: &str, message: &str) {
        eprintln!("{}", self.line(colors::BRIGHT_YELLOW, keyword, message));
    }

    /// Print an error line
    pub fn error(&self, keyword: &str, message: &str) {
        eprintln!("{}", self.line(colors::BRIGHT_RED, keyword, message));
    }

    /// Print a success line
    pub fn success(&self, keyword: &str, message: &str) {
        eprintln!("{}", self.line(colors::GREEN, keyword, message));
    }
}

impl Default for StatusPrinter {
    fn default() -> Self {
        Self::new()
    }
}

/// Renders the severity counts and the alert list of a [`Summary`].
pub struct SummaryTable {
    use_colors: bool,
    width: usize,
}

const SEVERITY_WIDTH: usize = 8;
const MAX_NAME_WIDTH: usize = 40;
const MIN_DESCRIPTION_WIDTH: usize = 20;

impl SummaryTable {
    const STREAM: atty::Stream = atty::Stream::Stdout;

    pub fn new() -> Self {
        Self {
            use_colors: colors_enabled(Self::STREAM),
            width: terminal_width(),
        }
    }

    /// Uncoloured output at a fixed width.
    pub fn plain(width: usize) -> Self {
        Self {
            use_colors: false,
            width,
        }
    }

    fn paint(&self, color: &str, text: String) -> String {
        if self.use_colors {
            format!("{}{}{}", color, text, colors::RESET)
        } else {
            text
        }
    }

    /// One column per tier (plus Unknown when tallied).
    pub fn render_counts(&self, summary: &Summary) -> String {
        let mut columns: Vec<(&str, usize, &str)> = SeverityTier::ALL
            .iter()
            .map(|tier| (tier.as_str(), summary.count(*tier), severity_color(Some(*tier))))
            .collect();
        if summary.unknown > 0 {
            columns.push(("Unknown", summary.unknown, severity_color(None)));
        }

        let widths: Vec<usize> = columns
            .iter()
            .map(|(header, count, _)| header.len().max(count.to_string().len()))
            .collect();

        let header = columns
            .iter()
            .zip(&widths)
            .map(|((header, _, _), width)| format!("{:>width$}", header, width = *width))
            .collect::<Vec<_>>()
            .join("  ");

        let values = columns
            .iter()
            .zip(&widths)
            .map(|((_, count, color), width)| {
                let cell = format!("{:>width$}", count, width = *width);
                if *count > 0 {
                    self.paint(color, cell)
                } else {
                    cell
                }
            })
            .collect::<Vec<_>>()
            .join("  ");

        let separator = "-".repeat(header.len());
        format!(
            "{}\n{}\n{}",
            self.paint(colors::BOLD, header),
            self.paint(colors::DIM, separator),
            values
        )
    }

    /// Severity, Name, Description; descriptions are cut to the terminal width.
    pub fn render_details(&self, summary: &Summary) -> String {
        if summary.details.is_empty() {
            return "No alerts reported.".to_string();
        }

        let name_width = summary
            .details
            .iter()
            .map(|d| d.name.chars().count())
            .max()
            .unwrap_or(0)
            .clamp("Name".len(), MAX_NAME_WIDTH);
        let description_width = self
            .width
            .saturating_sub(SEVERITY_WIDTH + name_width + 4)
            .max(MIN_DESCRIPTION_WIDTH);

        let rows: Vec<(Option<SeverityTier>, &str, String, String)> = summary
            .details
            .iter()
            .map(|d| {
                (
                    d.severity,
                    d.severity_label(),
                    truncate_text(&collapse_whitespace(&d.name), name_width),
                    truncate_text(&collapse_whitespace(&d.description), description_width),
                )
            })
            .collect();

        let description_len = rows
            .iter()
            .map(|(_, _, _, desc)| desc.chars().count())
            .max()
            .unwrap_or(0)
            .max("Description".len());

        let header = format!(
            "{:<sw$}  {:<nw$}  Description",
            "Severity",
            "Name",
            sw = SEVERITY_WIDTH,
            nw = name_width
        );
        let separator = "-".repeat(SEVERITY_WIDTH + name_width + 4 + description_len);

        let mut lines = vec![
            self.paint(colors::BOLD, header),
            self.paint(colors::DIM, separator),
        ];
        for (severity, label, name, description) in rows {
            let label_cell = self.paint(
                severity_color(severity),
                format!("{:<sw$}", label, sw = SEVERITY_WIDTH),
            );
            let line = format!(
                "{}  {:<nw$}  {}",
                label_cell,
                name,
                description,
                nw = name_width
            );
            lines.push(line.trim_end().to_string());
        }

        lines.join("\n")
    }

    pub fn print(&self, summary: &Summary) {
        println!("{}", self.render_counts(summary));
        println!();
        println!("{}", self.render_details(summary));
    }
}

impl Default for SummaryTable {
    fn default() -> Self {
        Self::new()
    }
}
