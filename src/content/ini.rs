//! Minimal reader and writer for the simulator's INI files.
//!
//! Covers car `data/*.ini` files and setup files: `[SECTION]` headers,
//! `KEY=VALUE` pairs, and `;` / `#` comments (full line or trailing). Section
//! and key names are stored upper-case, so lookups are ASCII
//! case-insensitive; later duplicates replace earlier ones.
//!
//! Writing emits sections and keys in sorted order with no comments.

use crate::{PitboxError, Result};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IniDocument {
    sections: BTreeMap<String, BTreeMap<String, String>>,
}

impl IniDocument {
    pub fn parse(text: &str) -> Self {
        let mut sections: BTreeMap<String, BTreeMap<String, String>> = BTreeMap::new();
        let mut current: Option<String> = None;

        for line in text.lines() {
            let line = strip_comment(line).trim();
            if line.is_empty() {
                continue;
            }

            if let Some(name) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
                let name = name.trim().to_ascii_uppercase();
                sections.entry(name.clone()).or_default();
                current = Some(name);
                continue;
            }

            // Pairs before the first header belong to no section
            let (Some(section), Some((key, value))) = (&current, line.split_once('=')) else {
                continue;
            };
            sections
                .entry(section.clone())
                .or_default()
                .insert(key.trim().to_ascii_uppercase(), value.trim().to_string());
        }

        Self { sections }
    }

    pub fn read(path: &Path) -> Result<Self> {
        let bytes =
            std::fs::read(path).map_err(|e| PitboxError::file_error(path.to_path_buf(), e))?;
        Ok(Self::parse(&String::from_utf8_lossy(&bytes)))
    }

    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.sections
            .get(&section.to_ascii_uppercase())?
            .get(&key.to_ascii_uppercase())
            .map(String::as_str)
    }

    /// Value parsed as `T`; `None` when missing or unparseable.
    pub fn get_parsed<T: FromStr>(&self, section: &str, key: &str) -> Option<T> {
        self.get(section, key)?.parse().ok()
    }

    pub fn has_section(&self, section: &str) -> bool {
        self.sections.contains_key(&section.to_ascii_uppercase())
    }

    /// Insert or replace a value, creating the section if needed.
    pub fn set(&mut self, section: &str, key: &str, value: impl fmt::Display) -> &mut Self {
        self.sections
            .entry(section.trim().to_ascii_uppercase())
            .or_default()
            .insert(key.trim().to_ascii_uppercase(), value.to_string());
        self
    }

    /// Section names in output order.
    pub fn section_names(&self) -> impl Iterator<Item = &str> {
        self.sections.keys().map(String::as_str)
    }

    /// Key/value pairs of one section; empty when it does not exist.
    pub fn entries(&self, section: &str) -> impl Iterator<Item = (&str, &str)> {
        self.sections
            .get(&section.to_ascii_uppercase())
            .into_iter()
            .flatten()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Write the rendered document, replacing any existing file.
    pub fn write(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_string())
            .map_err(|e| PitboxError::file_error(path.to_path_buf(), e))
    }
}

impl fmt::Display for IniDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (name, entries)) in self.sections.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            writeln!(f, "[{name}]")?;
            for (key, value) in entries {
                writeln!(f, "{key}={value}")?;
            }
        }
        Ok(())
    }
}

fn strip_comment(line: &str) -> &str {
    match line.find([';', '#']) {
        Some(pos) => &line[..pos],
        None => line,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DRIVETRAIN: &str = "\
[HEADER]
VERSION=3

; traction layout
[TRACTION]
TYPE=RWD            ; Wheel drive. Possible options: FWD (Front Wheel Drive), RWD (Rear Wheel Drive)

[GEARS]
COUNT=6
GEAR_R=-3.437
";

    #[test]
    fn reads_section_keys() {
        let doc = IniDocument::parse(DRIVETRAIN);
        assert_eq!(doc.get("TRACTION", "TYPE"), Some("RWD"));
        assert_eq!(doc.get("GEARS", "GEAR_R"), Some("-3.437"));
        assert_eq!(doc.get("HEADER", "VERSION"), Some("3"));
    }

    #[test]
    fn lookups_ignore_case() {
        let doc = IniDocument::parse(DRIVETRAIN);
        assert_eq!(doc.get("traction", "type"), Some("RWD"));
        assert!(doc.has_section("Gears"));
    }

    #[test]
    fn missing_entries_are_none() {
        let doc = IniDocument::parse(DRIVETRAIN);
        assert_eq!(doc.get("TRACTION", "DIFF"), None);
        assert_eq!(doc.get("ENGINE", "TYPE"), None);
    }

    #[test]
    fn pairs_outside_sections_and_junk_lines_are_ignored() {
        let doc = IniDocument::parse("TYPE=FWD\nnot a pair\n[TRACTION]\n=\nTYPE = AWD\n");
        assert_eq!(doc.get("TRACTION", "TYPE"), Some("AWD"));
        assert_eq!(doc.get("TRACTION", ""), Some(""));
    }

    #[test]
    fn later_duplicates_win() {
        let doc = IniDocument::parse("[TRACTION]\nTYPE=FWD\n[TRACTION]\nTYPE=RWD\n");
        assert_eq!(doc.get("TRACTION", "TYPE"), Some("RWD"));
    }

    #[test]
    fn setup_documents_render_and_reparse() {
        let mut doc = IniDocument::default();
        doc.set("pressure_lf", "value", 26)
            .set("CAMBER_LF", "VALUE", -35)
            .set("car", "model", "ks_toyota_ae86");

        let text = doc.to_string();
        assert_eq!(
            text,
            "[CAMBER_LF]\nVALUE=-35\n\n[CAR]\nMODEL=ks_toyota_ae86\n\n[PRESSURE_LF]\nVALUE=26\n"
        );
        assert_eq!(IniDocument::parse(&text), doc);
        assert_eq!(doc.get_parsed::<i32>("camber_lf", "value"), Some(-35));
        assert_eq!(doc.get_parsed::<i32>("CAR", "MODEL"), None);
    }

    #[test]
    fn entries_and_section_names() {
        let doc = IniDocument::parse(DRIVETRAIN);
        assert_eq!(doc.section_names().collect::<Vec<_>>(), vec!["GEARS", "HEADER", "TRACTION"]);
        assert_eq!(
            doc.entries("gears").collect::<Vec<_>>(),
            vec![("COUNT", "6"), ("GEAR_R", "-3.437")]
        );
        assert_eq!(doc.entries("ENGINE").count(), 0);
        assert!(IniDocument::parse("; only a comment").is_empty());
    }

    #[test]
    fn crlf_line_endings() {
        let doc = IniDocument::parse("[TRACTION]\r\nTYPE=AWD\r\n");
        assert_eq!(doc.get("TRACTION", "TYPE"), Some("AWD"));
    }
}
