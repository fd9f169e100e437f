//! Command output rendering

use std::fmt;

use colored::Colorize;
use tabled::builder::Builder;
use tabled::settings::{Padding, Style};

/// Something a command prints on success
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Output {
    Plain(String),
    List(ListOutput),
    Detail(DetailOutput),
    /// Titled sections printed one after another
    Combined(Vec<(String, Output)>),
}

impl Output {
    pub fn plain(s: impl Into<String>) -> Self {
        Output::Plain(s.into())
    }
}

impl fmt::Display for Output {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Output::Plain(s) => writeln!(f, "{}", s),
            Output::List(list) => fmt::Display::fmt(list, f),
            Output::Detail(detail) => fmt::Display::fmt(detail, f),
            Output::Combined(sections) => {
                for (i, (title, output)) in sections.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    if !title.is_empty() {
                        writeln!(f, "{}", title.bold().underline())?;
                    }
                    fmt::Display::fmt(output, f)?;
                }
                Ok(())
            }
        }
    }
}

/// A table with a header row
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListOutput {
    pub labels: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl ListOutput {
    pub fn new(labels: &[&str]) -> Self {
        Self {
            labels: labels.iter().map(|l| l.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn add_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }
}

impl fmt::Display for ListOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut builder = Builder::default();
        builder.push_record(self.labels.iter().cloned());
        for row in &self.rows {
            builder.push_record(row.iter().cloned());
        }

        let mut lines = render(builder, COLUMN_GAP).into_iter();
        if let Some(header) = lines.next() {
            writeln!(f, "{}", header.bold())?;
        }
        for line in lines {
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

/// Key/value pairs printed in insertion order, values aligned
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetailOutput {
    pub details: Vec<(String, String)>,
}

impl DetailOutput {
    pub fn add(&mut self, key: &str, value: impl Into<String>) {
        self.details.push((key.to_string(), value.into()));
    }
}

impl fmt::Display for DetailOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut builder = Builder::default();
        for (key, value) in &self.details {
            builder.push_record([format!("{}:", key), value.clone()]);
        }

        for line in render(builder, 1) {
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

const COLUMN_GAP: usize = 2;

/// Borderless table, cells separated by `gap` spaces, trailing blanks cut.
fn render(builder: Builder, gap: usize) -> Vec<String> {
    let mut table = builder.build();
    table.with(Style::empty()).with(Padding::new(0, gap, 0, 0));

    table
        .to_string()
        .lines()
        .map(|line| line.trim_end().to_string())
        .collect()
}
