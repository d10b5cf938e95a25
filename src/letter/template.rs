//! Letter templates.
//!
//! Templates are plain text (usually HTML) with `{{placeholder}}` markers.
//! They are parsed once at startup so a typo in a placeholder stops the run
//! before any attendee is processed; rendering itself cannot fail.

use crate::models::{LegislatorLookup, LetterContext, Official};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("failed to read template {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("unknown placeholder '{{{{{name}}}}}' at byte {offset}")]
    UnknownPlaceholder { name: String, offset: usize },

    #[error("unterminated placeholder starting at byte {0}")]
    Unterminated(usize),
}

/// Values a template may reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Id,
    Name,
    Zipcode,
    Phone,
    Regdate,
    Legislators,
}

impl Field {
    fn from_name(name: &str) -> Option<Self> {
        match name {
            "id" => Some(Field::Id),
            "name" => Some(Field::Name),
            "zipcode" => Some(Field::Zipcode),
            "phone" => Some(Field::Phone),
            "regdate" => Some(Field::Regdate),
            "legislators" => Some(Field::Legislators),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Text(String),
    Field(Field),
}

/// A parsed letter template.
#[derive(Debug, Clone)]
pub struct LetterTemplate {
    segments: Vec<Segment>,
}

impl LetterTemplate {
    /// Load and parse a template file.
    pub fn load(path: &Path) -> Result<Self, TemplateError> {
        let source = std::fs::read_to_string(path).map_err(|source| TemplateError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&source)
    }

    pub fn parse(source: &str) -> Result<Self, TemplateError> {
        let mut segments = Vec::new();
        let mut rest = source;
        let mut offset = 0;

        while let Some(start) = rest.find("{{") {
            if start > 0 {
                segments.push(Segment::Text(rest[..start].to_string()));
            }

            let after_open = &rest[start + 2..];
            let end = after_open
                .find("}}")
                .ok_or(TemplateError::Unterminated(offset + start))?;

            let name = after_open[..end].trim();
            let field = Field::from_name(name).ok_or_else(|| TemplateError::UnknownPlaceholder {
                name: name.to_string(),
                offset: offset + start,
            })?;
            segments.push(Segment::Field(field));

            let consumed = start + 2 + end + 2;
            rest = &rest[consumed..];
            offset += consumed;
        }

        if !rest.is_empty() {
            segments.push(Segment::Text(rest.to_string()));
        }

        Ok(Self { segments })
    }

    /// Render the letter for one attendee.
    pub fn render(&self, context: &LetterContext<'_>) -> String {
        let mut output = String::new();

        for segment in &self.segments {
            match segment {
                Segment::Text(text) => output.push_str(text),
                Segment::Field(Field::Id) => output.push_str(&escape_html(context.id)),
                Segment::Field(Field::Name) => output.push_str(&escape_html(context.name)),
                Segment::Field(Field::Zipcode) => output.push_str(&escape_html(context.zipcode)),
                Segment::Field(Field::Phone) => {
                    output.push_str(&escape_html(context.phone.unwrap_or_default()))
                }
                Segment::Field(Field::Regdate) => output.push_str(&escape_html(context.regdate)),
                Segment::Field(Field::Legislators) => {
                    output.push_str(&render_legislators(context.legislators))
                }
            }
        }

        output
    }
}

fn render_legislators(lookup: &LegislatorLookup) -> String {
    match lookup {
        LegislatorLookup::Fallback(message) => escape_html(message),
        LegislatorLookup::Officials(officials) => {
            let mut list = String::from("<ul class=\"legislators\">\n");
            for official in officials {
                list.push_str(&format!("  <li>{}</li>\n", render_official(official)));
            }
            list.push_str("</ul>");
            list
        }
    }
}

fn render_official(official: &Official) -> String {
    let mut line = match official.urls.first() {
        Some(url) => format!(
            "<a href=\"{}\">{}</a>",
            escape_html(url),
            escape_html(&official.name)
        ),
        None => escape_html(&official.name),
    };

    if let Some(ref party) = official.party {
        line.push_str(&format!(" ({})", escape_html(party)));
    }

    line
}

/// Escape the characters that are significant in HTML text and attributes.
pub fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
