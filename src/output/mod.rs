//! Terminal output for banners, help listings and help documents.
//!
//! The dispatch engine only talks to the [`Printer`] trait; the console
//! implementation writes styled text to any `io::Write`.

pub mod markdown;

use std::io::{self, Write};

use crossterm::style::Stylize;

use crate::plugin::HelpEntry;

/// Output sink used while dispatching commands.
pub trait Printer {
    /// Startup banner for a named plugin: `name@version`.
    fn banner(&mut self, name: &str, version: Option<&str>) -> io::Result<()>;

    /// One-time header printed above the first help listing.
    fn header(&mut self, host_version: &str) -> io::Result<()>;

    /// One help listing line.
    fn help_entry(&mut self, program: &str, entry: &HelpEntry) -> io::Result<()>;

    /// Closing hint printed after a listing.
    fn hint(&mut self, text: &str) -> io::Result<()>;

    /// A full markdown help document.
    fn document(&mut self, markdown: &str) -> io::Result<()>;
}

/// Writes styled output to a terminal or any writer.
pub struct ConsolePrinter<W: Write> {
    out: W,
    color: bool,
}

impl ConsolePrinter<io::Stdout> {
    /// Printer for standard output.
    pub fn stdout(color: bool) -> Self {
        Self::new(io::stdout(), color)
    }
}

impl<W: Write> ConsolePrinter<W> {
    /// Create a printer over `out`.
    pub fn new(out: W, color: bool) -> Self {
        Self { out, color }
    }

    /// Consume the printer and return the writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Printer for ConsolePrinter<W> {
    fn banner(&mut self, name: &str, version: Option<&str>) -> io::Result<()> {
        let version = version.unwrap_or("unknown");
        if self.color {
            writeln!(self.out, "{name}@{}", version.bold().green())
        } else {
            writeln!(self.out, "{name}@{version}")
        }
    }

    fn header(&mut self, host_version: &str) -> io::Result<()> {
        let line = format!(
            "{} {host_version}, OS: {} {}",
            crate::APP_NAME,
            std::env::consts::OS,
            std::env::consts::ARCH
        );
        if self.color {
            writeln!(self.out, "{}", line.bold())
        } else {
            writeln!(self.out, "{line}")
        }
    }

    fn help_entry(&mut self, program: &str, entry: &HelpEntry) -> io::Result<()> {
        if self.color {
            writeln!(
                self.out,
                "{} {} {}",
                program.dark_grey(),
                entry.label.as_str().bold(),
                entry.description
            )
        } else {
            writeln!(self.out, "{program} {} {}", entry.label, entry.description)
        }
    }

    fn hint(&mut self, text: &str) -> io::Result<()> {
        if self.color {
            writeln!(self.out, "{}", text.bold())
        } else {
            writeln!(self.out, "{text}")
        }
    }

    fn document(&mut self, markdown: &str) -> io::Result<()> {
        write!(self.out, "{}", markdown::render(markdown, self.color))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain() -> ConsolePrinter<Vec<u8>> {
        ConsolePrinter::new(Vec::new(), false)
    }

    fn output(printer: ConsolePrinter<Vec<u8>>) -> String {
        String::from_utf8(printer.into_inner()).unwrap()
    }

    #[test]
    fn test_banner() {
        let mut printer = plain();
        printer.banner("demo", Some("1.2.0")).unwrap();
        printer.banner("other", None).unwrap();
        assert_eq!(output(printer), "demo@1.2.0\nother@unknown\n");
    }

    #[test]
    fn test_help_entry() {
        let mut printer = plain();
        printer.help_entry("cmdnest", &HelpEntry::new("demo install", "desc here")).unwrap();
        assert_eq!(output(printer), "cmdnest demo install desc here\n");
    }

    #[test]
    fn test_header_mentions_os() {
        let mut printer = plain();
        printer.header("0.1.0").unwrap();
        let text = output(printer);
        assert!(text.starts_with("cmdnest 0.1.0, OS: "));
        assert!(text.contains(std::env::consts::OS));
    }

    #[test]
    fn test_document() {
        let mut printer = plain();
        printer.document("# Install\n\nbody").unwrap();
        assert_eq!(output(printer), "INSTALL\n\nbody\n");
    }

    #[test]
    fn test_color_output() {
        let mut printer = ConsolePrinter::new(Vec::new(), true);
        printer.hint("hello").unwrap();
        assert!(output(printer).contains("\u{1b}["));
    }
}
