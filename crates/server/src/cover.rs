//! One-page summary sheets for single documents

use chrono::NaiveDate;
use pdf_core::{Color, PdfDocument, Result};
use serde_json::Value;

const TITLE_SIZE: f32 = 20.0;
const LINE_SIZE: f32 = 14.0;
const FOOTNOTE_SIZE: f32 = 12.0;
const LEFT: f64 = 50.0;

/// A document that has a cover-sheet endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoverSheet {
    Gc210,
    Gc310,
    Gc320,
    Gc350,
}

/// Names read from a cover-sheet request
///
/// Empty strings count as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoverParties {
    pub client: Option<String>,
    pub case_number: Option<String>,
    pub minor: Option<String>,
    pub conservatee: Option<String>,
}

impl CoverParties {
    pub fn from_value(body: &Value) -> Self {
        let text = |pointer: &str| {
            body.pointer(pointer)
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };
        Self {
            client: text("/clientInfo/name"),
            case_number: text("/clientInfo/caseNumber"),
            minor: text("/minorInfo/name"),
            conservatee: text("/conservateeInfo/name"),
        }
    }
}

fn or<'a>(value: &'a Option<String>, fallback: &'a str) -> &'a str {
    value.as_deref().unwrap_or(fallback)
}

impl CoverSheet {
    pub fn code(self) -> &'static str {
        match self {
            CoverSheet::Gc210 => "GC-210",
            CoverSheet::Gc310 => "GC-310",
            CoverSheet::Gc320 => "GC-320",
            CoverSheet::Gc350 => "GC-350",
        }
    }

    /// Prefix of generated document ids, e.g. `GC210`
    pub fn id_prefix(self) -> String {
        self.code().replace('-', "")
    }

    fn title(self) -> &'static str {
        match self {
            CoverSheet::Gc210 => "GC-210 Petition for Guardianship",
            CoverSheet::Gc310 => "GC-310 Petition for Conservatorship",
            CoverSheet::Gc320 => "GC-320 Citation for Conservatorship",
            CoverSheet::Gc350 => "GC-350 Letters of Conservatorship",
        }
    }

    fn lines(self, parties: &CoverParties) -> Vec<String> {
        match self {
            CoverSheet::Gc210 => vec![
                format!("Client: {}", or(&parties.client, "Unknown")),
                format!("Minor: {}", or(&parties.minor, "Not Specified")),
                format!("Case Number: {}", or(&parties.case_number, "Not Assigned")),
            ],
            CoverSheet::Gc310 => vec![
                format!("Petitioner: {}", or(&parties.client, "Unknown")),
                format!("Conservatee: {}", or(&parties.conservatee, "Not Specified")),
                format!("Case Number: {}", or(&parties.case_number, "Not Assigned")),
            ],
            CoverSheet::Gc320 => vec![
                format!("To: {}", or(&parties.conservatee, "Unknown")),
                format!("Petitioner: {}", or(&parties.client, "Not Specified")),
            ],
            CoverSheet::Gc350 => vec![
                format!("Conservator: {}", or(&parties.client, "Unknown")),
                format!("Conservatee: {}", or(&parties.conservatee, "Not Specified")),
            ],
        }
    }

    /// Draw the sheet on a fresh A4 document and save it
    pub fn render(self, parties: &CoverParties, today: NaiveDate) -> Result<Vec<u8>> {
        let mut doc = PdfDocument::new();
        let page = doc.add_blank_page()?;

        doc.set_font_size(TITLE_SIZE);
        doc.insert_text(self.title(), page, LEFT, 100.0)?;

        doc.set_font_size(LINE_SIZE);
        let mut y = 150.0;
        for line in self.lines(parties) {
            doc.insert_text(&line, page, LEFT, y)?;
            y += 30.0;
        }

        if self == CoverSheet::Gc210 {
            doc.set_font_size(FOOTNOTE_SIZE);
            doc.set_text_color(Color::gray());
            let generated = format!("Generated on: {}", today.format("%-m/%-d/%Y"));
            doc.insert_text(&generated, page, LEFT, 240.0)?;
        }

        doc.to_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 4).unwrap()
    }

    fn contains(haystack: &[u8], needle: &str) -> bool {
        haystack
            .windows(needle.len())
            .any(|w| w == needle.as_bytes())
    }

    #[test]
    fn test_parties_treat_empty_as_absent() {
        let parties = CoverParties::from_value(&json!({
            "clientInfo": { "name": "Mary Smith", "caseNumber": "" },
            "minorInfo": { "name": "Jane Doe" }
        }));
        assert_eq!(
            parties,
            CoverParties {
                client: Some("Mary Smith".into()),
                case_number: None,
                minor: Some("Jane Doe".into()),
                conservatee: None,
            }
        );
    }

    #[test]
    fn test_gc210_sheet() {
        let parties = CoverParties::from_value(&json!({ "clientInfo": { "name": "Mary Smith" } }));
        let bytes = CoverSheet::Gc210.render(&parties, today()).unwrap();

        assert_eq!(PdfDocument::open_from_bytes(&bytes).unwrap().page_count(), 1);
        assert!(contains(&bytes, "(GC-210 Petition for Guardianship)"));
        assert!(contains(&bytes, "(Client: Mary Smith)"));
        assert!(contains(&bytes, "(Minor: Not Specified)"));
        assert!(contains(&bytes, "(Case Number: Not Assigned)"));
        assert!(contains(&bytes, "(Generated on: 3/4/2025)"));
    }

    #[test]
    fn test_citation_addresses_the_conservatee() {
        let parties = CoverParties::default();
        let bytes = CoverSheet::Gc320.render(&parties, today()).unwrap();

        assert!(contains(&bytes, "(To: Unknown)"));
        assert!(contains(&bytes, "(Petitioner: Not Specified)"));
        assert!(!contains(&bytes, "Generated on"));
    }

    #[test]
    fn test_id_prefix() {
        assert_eq!(CoverSheet::Gc350.id_prefix(), "GC350");
    }
}
