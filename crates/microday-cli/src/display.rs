//! Terminal rendering: colored document, notices and the live status line.

use std::io;

use crossterm::style::{style, Color, Print, Stylize};
use crossterm::terminal::{Clear, ClearType};
use crossterm::{cursor, execute};
use microday_core::document::{
    format_clock, format_end_line, format_schedule_line, BACKLOG_HEADER, SCHEDULE_HEADER,
};
use microday_core::{Status, Timeline};

const LOG: Color = Color::DarkGrey;
const ACCENT: Color = Color::Green;
const INFO: Color = Color::Blue;
const CURRENT: Color = Color::Red;
const DEFAULT: Color = Color::White;

pub struct Painter {
    colors: bool,
}

impl Painter {
    pub fn new(colors: bool) -> Self {
        Self { colors }
    }

    pub fn paint(&self, text: &str, color: Color) -> String {
        if self.colors {
            style(text).with(color).to_string()
        } else {
            text.to_string()
        }
    }

    pub fn log(&self, text: &str) {
        println!("{}", self.paint(text, LOG));
    }

    pub fn accent(&self, text: &str) {
        println!("{}", self.paint(text, ACCENT));
    }

    pub fn info(&self, text: &str) {
        println!("{}", self.paint(text, INFO));
    }

    pub fn accent_prompt(&self, text: &str) -> String {
        self.paint(text, ACCENT)
    }

    /// The day document with headers highlighted and the cursor item marked.
    pub fn document(&self, timeline: &Timeline) -> String {
        if !self.colors {
            return timeline.serialize();
        }

        let mut out = String::new();
        if !timeline.backlog().is_empty() {
            out.push_str(&self.paint(BACKLOG_HEADER, INFO));
            out.push_str("\n\n");
            for entry in timeline.backlog() {
                out.push_str(&format!("- {entry}\n"));
            }
        }

        if let Some(end) = timeline.end_of_day() {
            out.push('\n');
            out.push_str(&self.paint(SCHEDULE_HEADER, INFO));
            out.push_str("\n\n");
            for (i, item) in timeline.scheduled().iter().enumerate() {
                let color = if i == timeline.cursor() { CURRENT } else { DEFAULT };
                out.push_str(&self.paint(&format_schedule_line(item), color));
                out.push('\n');
            }
            out.push_str(&format_end_line(end));
            out.push('\n');
        }
        out
    }

    /// Overwrite the current terminal line with the status.
    pub fn status_line(&self, status: &Status) -> io::Result<()> {
        let text = status_text(status);
        execute!(
            io::stdout(),
            cursor::MoveToColumn(0),
            Clear(ClearType::CurrentLine),
            Print(self.paint(&text, ACCENT))
        )
    }
}

pub fn status_text(status: &Status) -> String {
    match status {
        Status::Upcoming {
            description,
            starts_in,
            can_start_now,
            ..
        } => {
            let mut text = format!("{description} starts in {}", format_clock(*starts_in));
            if *can_start_now {
                text.push_str(" [enter=start now]");
            }
            text
        }
        Status::Running {
            description,
            elapsed,
            next,
            ..
        } => {
            let next = next.as_ref().map_or("Done!", |next| next.description.as_str());
            format!(
                "{} elapsed on: {description}, next up: {next}. ",
                format_clock(*elapsed)
            )
        }
        Status::Complete => "Done!".to_string(),
    }
}
