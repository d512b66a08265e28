//! AcroForm field lookup and filling

use crate::document::{catalog_id, PdfDocument};
use crate::{PdfError, Result};
use lopdf::{Dictionary, Document, Object, ObjectId, StringFormat};
use std::fmt;

/// Field flag bit marking a button field as a radio group
const FF_RADIO: i64 = 1 << 15;
/// Field flag bit marking a button field as a push button
const FF_PUSHBUTTON: i64 = 1 << 16;
/// Nesting limit for the field tree walk
const MAX_FIELD_DEPTH: usize = 32;

/// Kind of a terminal form field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Checkbox,
    Radio,
    PushButton,
    Choice,
    Signature,
    Unknown,
}

impl FieldKind {
    fn from_type(field_type: Option<&[u8]>, flags: i64) -> Self {
        match field_type {
            Some(b"Tx") => FieldKind::Text,
            Some(b"Btn") if flags & FF_PUSHBUTTON != 0 => FieldKind::PushButton,
            Some(b"Btn") if flags & FF_RADIO != 0 => FieldKind::Radio,
            Some(b"Btn") => FieldKind::Checkbox,
            Some(b"Ch") => FieldKind::Choice,
            Some(b"Sig") => FieldKind::Signature,
            _ => FieldKind::Unknown,
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldKind::Text => "text",
            FieldKind::Checkbox => "checkbox",
            FieldKind::Radio => "radio",
            FieldKind::PushButton => "pushbutton",
            FieldKind::Choice => "choice",
            FieldKind::Signature => "signature",
            FieldKind::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// A terminal field of the document's AcroForm
#[derive(Debug, Clone, PartialEq)]
pub struct FormField {
    /// Fully qualified name (partial names joined with `.`)
    pub name: String,
    pub kind: FieldKind,
    /// Object holding the field dictionary
    pub id: ObjectId,
}

impl PdfDocument {
    /// List every terminal field of the AcroForm in document order
    ///
    /// Returns an empty list for documents without an AcroForm.
    pub fn form_fields(&self) -> Result<Vec<FormField>> {
        let roots = match acroform_dict(&self.inner)? {
            Some(acroform) => match acroform.get(b"Fields") {
                Ok(fields) => deref(&self.inner, fields)?.as_array()?.clone(),
                Err(_) => Vec::new(),
            },
            None => return Ok(Vec::new()),
        };

        let mut fields = Vec::new();
        for root in &roots {
            if let Ok(id) = root.as_reference() {
                collect_fields(&self.inner, id, None, None, 0, 0, &mut fields)?;
            }
        }
        Ok(fields)
    }

    /// Look up a terminal field by its fully qualified name
    pub fn field(&self, name: &str) -> Result<FormField> {
        if acroform_dict(&self.inner)?.is_none() {
            return Err(PdfError::MissingAcroForm);
        }
        self.form_fields()?
            .into_iter()
            .find(|f| f.name == name)
            .ok_or_else(|| PdfError::FieldNotFound(name.to_string()))
    }

    /// Set the value of a text field
    ///
    /// Stale appearance streams are dropped and the AcroForm asks viewers to
    /// regenerate appearances, so the new value is what gets displayed.
    pub fn set_text_field(&mut self, name: &str, value: &str) -> Result<()> {
        let field = self.field(name)?;
        if field.kind != FieldKind::Text {
            return Err(PdfError::FieldTypeMismatch {
                name: name.to_string(),
                expected: FieldKind::Text,
                found: field.kind,
            });
        }

        let widgets = widget_ids(&self.inner, field.id)?;
        let dict = self.inner.get_object_mut(field.id)?.as_dict_mut()?;
        dict.set("V", encode_text_value(value));
        for id in widgets {
            self.inner.get_object_mut(id)?.as_dict_mut()?.remove(b"AP");
        }

        self.set_need_appearances()
    }

    /// Check or uncheck a checkbox field
    ///
    /// Every widget is switched to its own on-state (the appearance name that
    /// is not `Off`, `Yes` when none is declared) or to `Off`.
    pub fn set_checkbox(&mut self, name: &str, checked: bool) -> Result<()> {
        let field = self.field(name)?;
        if field.kind != FieldKind::Checkbox {
            return Err(PdfError::FieldTypeMismatch {
                name: name.to_string(),
                expected: FieldKind::Checkbox,
                found: field.kind,
            });
        }

        let widgets = widget_ids(&self.inner, field.id)?;
        let mut states = Vec::with_capacity(widgets.len());
        for id in &widgets {
            let state = if checked {
                on_state(&self.inner, *id)?.unwrap_or_else(|| b"Yes".to_vec())
            } else {
                b"Off".to_vec()
            };
            states.push((*id, state));
        }

        let value = states
            .iter()
            .map(|(_, s)| s.clone())
            .find(|s| s.as_slice() != b"Off")
            .unwrap_or_else(|| b"Off".to_vec());
        self.inner
            .get_object_mut(field.id)?
            .as_dict_mut()?
            .set("V", Object::Name(value));
        for (id, state) in states {
            self.inner
                .get_object_mut(id)?
                .as_dict_mut()?
                .set("AS", Object::Name(state));
        }

        Ok(())
    }

    /// Current value of a text field, `None` when unset
    pub fn text_field_value(&self, name: &str) -> Result<Option<String>> {
        let field = self.field(name)?;
        let dict = self.inner.get_dictionary(field.id)?;
        match dict.get(b"V") {
            Ok(value) => Ok(decode_text_value(deref(&self.inner, value)?)),
            Err(_) => Ok(None),
        }
    }

    /// Whether a checkbox field is currently checked
    pub fn is_checked(&self, name: &str) -> Result<bool> {
        let field = self.field(name)?;
        let dict = self.inner.get_dictionary(field.id)?;
        if let Ok(value) = dict.get(b"V").and_then(Object::as_name) {
            return Ok(value != b"Off");
        }
        for id in widget_ids(&self.inner, field.id)? {
            let widget = self.inner.get_dictionary(id)?;
            if let Ok(state) = widget.get(b"AS").and_then(Object::as_name) {
                if state != b"Off" {
                    return Ok(true);
                }
            }
        }
        Ok(false)
    }

    /// Set `/NeedAppearances true` on the AcroForm
    pub(crate) fn set_need_appearances(&mut self) -> Result<()> {
        let catalog_id = self.catalog_id()?;
        let acroform_ref = match self.inner.get_dictionary(catalog_id)?.get(b"AcroForm") {
            Ok(Object::Reference(id)) => Some(*id),
            Ok(Object::Dictionary(_)) => None,
            _ => return Err(PdfError::MissingAcroForm),
        };

        let acroform = match acroform_ref {
            Some(id) => self.inner.get_object_mut(id)?.as_dict_mut()?,
            None => self
                .inner
                .get_object_mut(catalog_id)?
                .as_dict_mut()?
                .get_mut(b"AcroForm")?
                .as_dict_mut()?,
        };
        acroform.set("NeedAppearances", Object::Boolean(true));
        Ok(())
    }
}

/// The catalog's AcroForm dictionary, if present
pub(crate) fn acroform_dict(doc: &Document) -> Result<Option<&Dictionary>> {
    let catalog = doc.get_dictionary(catalog_id(doc)?)?;
    match catalog.get(b"AcroForm") {
        Ok(obj) => Ok(Some(deref(doc, obj)?.as_dict()?)),
        Err(_) => Ok(None),
    }
}

fn deref<'a>(doc: &'a Document, obj: &'a Object) -> Result<&'a Object> {
    match obj {
        Object::Reference(id) => Ok(doc.get_object(*id)?),
        other => Ok(other),
    }
}

/// Kids of a field node that are themselves fields (carry a partial name)
fn field_kids(doc: &Document, dict: &Dictionary) -> Result<Vec<ObjectId>> {
    let kids = match dict.get(b"Kids") {
        Ok(kids) => deref(doc, kids)?.as_array()?,
        Err(_) => return Ok(Vec::new()),
    };
    let mut out = Vec::new();
    for kid in kids {
        if let Ok(id) = kid.as_reference() {
            if doc.get_dictionary(id)?.has(b"T") {
                out.push(id);
            }
        }
    }
    Ok(out)
}

/// Widget annotations of a terminal field (the field itself when merged)
fn widget_ids(doc: &Document, field_id: ObjectId) -> Result<Vec<ObjectId>> {
    let dict = doc.get_dictionary(field_id)?;
    let kids = match dict.get(b"Kids") {
        Ok(kids) => deref(doc, kids)?.as_array()?,
        Err(_) => return Ok(vec![field_id]),
    };
    let ids: Vec<ObjectId> = kids.iter().filter_map(|k| k.as_reference().ok()).collect();
    if ids.is_empty() {
        Ok(vec![field_id])
    } else {
        Ok(ids)
    }
}

/// The on-state appearance name of a checkbox widget
fn on_state(doc: &Document, widget_id: ObjectId) -> Result<Option<Vec<u8>>> {
    let widget = doc.get_dictionary(widget_id)?;
    let Ok(ap) = widget.get(b"AP") else {
        return Ok(None);
    };
    let Ok(normal) = deref(doc, ap)?.as_dict()?.get(b"N") else {
        return Ok(None);
    };
    let normal = match deref(doc, normal)? {
        Object::Dictionary(dict) => dict,
        _ => return Ok(None),
    };
    Ok(normal
        .iter()
        .map(|(key, _)| key)
        .find(|key| key.as_slice() != b"Off")
        .cloned())
}

fn collect_fields(
    doc: &Document,
    id: ObjectId,
    parent_name: Option<&str>,
    inherited_type: Option<&[u8]>,
    inherited_flags: i64,
    depth: usize,
    out: &mut Vec<FormField>,
) -> Result<()> {
    if depth > MAX_FIELD_DEPTH {
        return Err(PdfError::ParseError(
            "AcroForm field tree is nested too deeply".to_string(),
        ));
    }

    let dict = doc.get_dictionary(id)?;

    let partial = match dict.get(b"T") {
        Ok(obj) => decode_text_value(deref(doc, obj)?),
        Err(_) => None,
    };
    let name = match (parent_name, partial) {
        (Some(parent), Some(partial)) => format!("{parent}.{partial}"),
        (None, Some(partial)) => partial,
        (Some(parent), None) => parent.to_string(),
        (None, None) => String::new(),
    };

    let field_type = dict
        .get(b"FT")
        .and_then(Object::as_name)
        .ok()
        .or(inherited_type);
    let flags = dict
        .get(b"Ff")
        .and_then(Object::as_i64)
        .unwrap_or(inherited_flags);

    let kids = field_kids(doc, dict)?;
    if kids.is_empty() {
        if !name.is_empty() {
            out.push(FormField {
                name,
                kind: FieldKind::from_type(field_type, flags),
                id,
            });
        }
        return Ok(());
    }

    for kid in kids {
        collect_fields(doc, kid, Some(&name), field_type, flags, depth + 1, out)?;
    }
    Ok(())
}

/// Encode a text value, using UTF-16BE with a byte order mark beyond ASCII
fn encode_text_value(value: &str) -> Object {
    if value.is_ascii() {
        Object::string_literal(value)
    } else {
        let mut bytes = vec![0xFE, 0xFF];
        for unit in value.encode_utf16() {
            bytes.extend_from_slice(&unit.to_be_bytes());
        }
        Object::String(bytes, StringFormat::Hexadecimal)
    }
}

fn decode_text_value(obj: &Object) -> Option<String> {
    match obj {
        Object::String(bytes, _) => {
            if bytes.starts_with(&[0xFE, 0xFF]) {
                let units: Vec<u16> = bytes[2..]
                    .chunks_exact(2)
                    .map(|c| u16::from_be_bytes([c[0], c[1]]))
                    .collect();
                Some(String::from_utf16_lossy(&units))
            } else {
                Some(bytes.iter().map(|&b| b as char).collect())
            }
        }
        Object::Name(name) => Some(String::from_utf8_lossy(name).into_owned()),
        _ => None,
    }
}
