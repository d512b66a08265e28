//! Embedded mapping tables for the supported Judicial Council forms

use crate::parser::parse_schema;
use crate::schema::FormSchema;
use crate::{FormError, Result};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

/// A supported court form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FormId {
    Gc210,
    Gc212,
    Gc240,
    Gc250,
    Gc310,
    Gc312,
    Gc320,
    Gc340,
    Gc350,
}

type Cached = OnceLock<std::result::Result<FormSchema, String>>;

static GC210: Cached = OnceLock::new();
static GC212: Cached = OnceLock::new();
static GC240: Cached = OnceLock::new();
static GC250: Cached = OnceLock::new();
static GC310: Cached = OnceLock::new();
static GC312: Cached = OnceLock::new();
static GC320: Cached = OnceLock::new();
static GC340: Cached = OnceLock::new();
static GC350: Cached = OnceLock::new();

impl FormId {
    pub const ALL: [FormId; 9] = [
        FormId::Gc210,
        FormId::Gc212,
        FormId::Gc240,
        FormId::Gc250,
        FormId::Gc310,
        FormId::Gc312,
        FormId::Gc320,
        FormId::Gc340,
        FormId::Gc350,
    ];

    /// Guardianship forms in filing order
    pub const GUARDIANSHIP: [FormId; 4] =
        [FormId::Gc210, FormId::Gc212, FormId::Gc240, FormId::Gc250];

    /// Conservatorship forms in filing order
    pub const CONSERVATORSHIP: [FormId; 5] = [
        FormId::Gc310,
        FormId::Gc312,
        FormId::Gc320,
        FormId::Gc340,
        FormId::Gc350,
    ];

    /// Form code as printed, e.g. `GC-310`
    pub fn code(self) -> &'static str {
        match self {
            FormId::Gc210 => "GC-210",
            FormId::Gc212 => "GC-212",
            FormId::Gc240 => "GC-240",
            FormId::Gc250 => "GC-250",
            FormId::Gc310 => "GC-310",
            FormId::Gc312 => "GC-312",
            FormId::Gc320 => "GC-320",
            FormId::Gc340 => "GC-340",
            FormId::Gc350 => "GC-350",
        }
    }

    fn source(self) -> (&'static Cached, &'static str) {
        match self {
            FormId::Gc210 => (&GC210, include_str!("../data/gc210.json")),
            FormId::Gc212 => (&GC212, include_str!("../data/gc212.json")),
            FormId::Gc240 => (&GC240, include_str!("../data/gc240.json")),
            FormId::Gc250 => (&GC250, include_str!("../data/gc250.json")),
            FormId::Gc310 => (&GC310, include_str!("../data/gc310.json")),
            FormId::Gc312 => (&GC312, include_str!("../data/gc312.json")),
            FormId::Gc320 => (&GC320, include_str!("../data/gc320.json")),
            FormId::Gc340 => (&GC340, include_str!("../data/gc340.json")),
            FormId::Gc350 => (&GC350, include_str!("../data/gc350.json")),
        }
    }

    /// The mapping table, parsed and validated on first use
    pub fn schema(self) -> Result<&'static FormSchema> {
        let (cell, json) = self.source();
        cell.get_or_init(|| parse_schema(json).map_err(|e| e.to_string()))
            .as_ref()
            .map_err(|msg| FormError::SchemaError(msg.clone()))
    }

    /// Template file name on the template host
    pub fn template_name(self) -> Result<&'static str> {
        Ok(self.schema()?.template.as_str())
    }
}

impl fmt::Display for FormId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for FormId {
    type Err = FormError;

    /// Accepts `GC-310`, `gc310` and `GC310`
    fn from_str(s: &str) -> Result<Self> {
        let normalized: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_uppercase();
        FormId::ALL
            .into_iter()
            .find(|id| id.code().replace('-', "") == normalized)
            .ok_or_else(|| FormError::UnknownForm(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_table_is_valid() {
        for id in FormId::ALL {
            let schema = id.schema().unwrap_or_else(|e| panic!("{id}: {e}"));
            assert_eq!(schema.form, id.code());
            assert!(!schema.groups.is_empty(), "{id} has no groups");
        }
    }

    #[test]
    fn test_template_names() {
        assert_eq!(FormId::Gc210.template_name().unwrap(), "GC-210-unlocked.pdf");
        assert_eq!(FormId::Gc250.template_name().unwrap(), "GC-250-unlocked.pdf");
        assert_eq!(FormId::Gc310.template_name().unwrap(), "GC-310.pdf");
        assert_eq!(FormId::Gc350.template_name().unwrap(), "GC-350.pdf");
    }

    #[test]
    fn test_parse_form_codes() {
        assert_eq!("GC-310".parse::<FormId>().unwrap(), FormId::Gc310);
        assert_eq!("gc212".parse::<FormId>().unwrap(), FormId::Gc212);
        assert!("GC-999".parse::<FormId>().is_err());
    }
}
