//! Core value types shared by every stage of the pipeline.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash, Copy)]
pub enum Language {
    C,
    Cpp,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::C, Language::Cpp];

    pub fn from_extension(ext: &str) -> Option<Self> {
        static EXTENSION_MAP: &[(&[&str], Language)] = &[
            (&["c", "h"], Language::C),
            (&["cc", "cpp", "cxx", "c++", "hpp", "hh", "hxx", "h++"], Language::Cpp),
        ];

        EXTENSION_MAP
            .iter()
            .find(|(exts, _)| exts.contains(&ext))
            .map(|(_, lang)| *lang)
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    /// Extension used when writing fixture sources for this language.
    pub fn canonical_extension(&self) -> &'static str {
        match self {
            Language::C => "c",
            Language::Cpp => "cpp",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Language::C => write!(f, "C"),
            Language::Cpp => write!(f, "C++"),
        }
    }
}

impl std::str::FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "c" => Ok(Language::C),
            "cpp" | "c++" | "cxx" => Ok(Language::Cpp),
            other => Err(format!("unsupported language '{other}'")),
        }
    }
}

/// Byte range plus the 1-based lines it covers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub start_line: usize,
    pub end_line: usize,
}

impl Span {
    pub fn new(start: usize, end: usize, start_line: usize, end_line: usize) -> Self {
        Self {
            start,
            end,
            start_line,
            end_line,
        }
    }

    pub fn line_count(&self) -> usize {
        self.end_line.saturating_sub(self.start_line) + 1
    }

    pub fn contains(&self, other: &Span) -> bool {
        self.start <= other.start && other.end <= self.end
    }
}

/// One source file handed to the pipeline. Immutable once built.
#[derive(Clone, Debug)]
pub struct SourceUnit {
    language: Language,
    text: Arc<str>,
    origin: Option<PathBuf>,
}

impl SourceUnit {
    pub fn new(language: Language, text: impl Into<Arc<str>>) -> Self {
        Self {
            language,
            text: text.into(),
            origin: None,
        }
    }

    pub fn with_origin(mut self, origin: impl Into<PathBuf>) -> Self {
        self.origin = Some(origin.into());
        self
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn origin(&self) -> Option<&Path> {
        self.origin.as_deref()
    }

    /// Display label for logs: the origin path when known.
    pub fn label(&self) -> String {
        self.origin
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| format!("<{} source>", self.language))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_from_extension() {
        assert_eq!(Language::from_extension("c"), Some(Language::C));
        assert_eq!(Language::from_extension("h"), Some(Language::C));
        assert_eq!(Language::from_extension("hpp"), Some(Language::Cpp));
        assert_eq!(Language::from_extension("cc"), Some(Language::Cpp));
        assert_eq!(Language::from_extension("rs"), None);
    }

    #[test]
    fn test_language_from_path_without_extension() {
        assert_eq!(Language::from_path(Path::new("Makefile")), None);
        assert_eq!(
            Language::from_path(Path::new("src/widget.cpp")),
            Some(Language::Cpp)
        );
    }

    #[test]
    fn test_language_parse_round_trips_display_names() {
        assert_eq!("c".parse::<Language>(), Ok(Language::C));
        assert_eq!("C++".parse::<Language>(), Ok(Language::Cpp));
        assert!("java".parse::<Language>().is_err());
    }

    #[test]
    fn test_span_line_count() {
        assert_eq!(Span::new(0, 10, 3, 3).line_count(), 1);
        assert_eq!(Span::new(0, 10, 3, 7).line_count(), 5);
    }
}
