use owo_colors::{OwoColorize, Stream};

use plc::errors::{Diagnostic, DiagnosticMessage, Level, Location};
use plc::position::LineCol;
use plc::source::Source;

fn format_level(level: Level) -> String {
    match level {
        Level::Error => format!(
            "{}",
            "ERROR".if_supports_color(Stream::Stderr, |text| text.bright_red())
        ),

        Level::Warn => format!(
            "{}",
            "WARN ".if_supports_color(Stream::Stderr, |text| text.yellow())
        ),
    }
}

fn format_location(src: &Source, location: Option<&Location>) -> String {
    let Some(location) = location else {
        return "".to_owned();
    };

    match src.get(location.source_id) {
        Some(file) => format!(
            "{}:{} ",
            file.path().display(),
            LineCol::locate(file.text(), location.offset)
        ),

        None => format!("<unknown>@{} ", location.offset),
    }
}

pub fn print_diagnostic(src: &Source, diagnostic: &Diagnostic) {
    let Diagnostic {
        level,
        message: DiagnosticMessage { location, message },
        source: _,
    } = diagnostic;

    let level = format_level(*level);
    let location = format_location(src, location.as_ref());
    eprintln!("{} {}{}", level, location, message);
}
