//! Concatenate the pages of several documents into one

use crate::document::{catalog_id, inherited_attribute, PdfDocument};
use crate::{PdfError, Result};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId};
use std::collections::BTreeSet;

/// Page attributes that may be inherited from the page tree
const INHERITABLE: [&[u8]; 4] = [b"MediaBox", b"CropBox", b"Resources", b"Rotate"];

/// Pieces of one input document after renumbering
struct Part {
    label: String,
    pages: Vec<ObjectId>,
    fields: Vec<ObjectId>,
    acroform: Option<Dictionary>,
}

/// Merge documents into one, in order, keeping every page and form field
///
/// Each input's top-level AcroForm fields are placed under a new parent
/// field named by its label, so identically named fields in different
/// inputs stay independent. Labels are made unique by suffixing `_2`, `_3`...
/// Merging an empty list yields an empty document.
pub fn merge_documents(documents: Vec<(String, PdfDocument)>) -> Result<PdfDocument> {
    if documents.is_empty() {
        return Ok(PdfDocument::new());
    }

    let mut merged = Document::with_version("1.7");
    let mut next_id = 1;
    let mut parts = Vec::with_capacity(documents.len());
    let mut seen_labels = BTreeSet::new();

    for (label, doc) in documents {
        let mut doc = doc.into_inner()?;
        doc.renumber_objects_with(next_id);
        next_id = doc.max_id + 1;

        let part = take_part(unique_label(&label, &mut seen_labels), &mut doc)?;
        merged.objects.extend(doc.objects);
        parts.push(part);
    }
    merged.max_id = next_id - 1;

    let pages_id = merged.new_object_id();
    let mut kids = Vec::new();
    for id in parts.iter().flat_map(|p| p.pages.iter()) {
        merged
            .get_object_mut(*id)?
            .as_dict_mut()?
            .set("Parent", Object::Reference(pages_id));
        kids.push(Object::Reference(*id));
    }
    let page_count = kids.len() as i64;
    merged.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_count,
        }),
    );

    let mut catalog = dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    };
    if let Some(acroform) = merge_acroforms(&mut merged, &parts)? {
        let acroform_id = merged.add_object(acroform);
        catalog.set("AcroForm", Object::Reference(acroform_id));
    }
    let catalog_id = merged.add_object(catalog);
    merged.trailer.set("Root", catalog_id);

    Ok(PdfDocument::from_document(merged))
}

fn unique_label(label: &str, seen: &mut BTreeSet<String>) -> String {
    let mut candidate = label.to_string();
    let mut n = 2;
    while !seen.insert(candidate.clone()) {
        candidate = format!("{label}_{n}");
        n += 1;
    }
    candidate
}

/// Detach a renumbered document's page tree, catalog and AcroForm
fn take_part(label: String, doc: &mut Document) -> Result<Part> {
    let pages: Vec<ObjectId> = doc.get_pages().values().copied().collect();

    // Copy inherited attributes down before the page tree goes away
    for page_id in &pages {
        let mut inherited = Vec::new();
        {
            let page = doc.get_dictionary(*page_id)?;
            for key in INHERITABLE {
                if !page.has(key) {
                    if let Some(value) = inherited_attribute(doc, *page_id, &[key])? {
                        inherited.push((key, value));
                    }
                }
            }
        }
        let page = doc.get_object_mut(*page_id)?.as_dict_mut()?;
        for (key, value) in inherited {
            page.set(key, value);
        }
    }

    let root_id = catalog_id(doc)?;
    let catalog = doc.get_dictionary(root_id)?.clone();

    let mut acroform = None;
    let mut acroform_obj = None;
    if let Ok(obj) = catalog.get(b"AcroForm") {
        let dict = match obj {
            Object::Reference(id) => {
                acroform_obj = Some(*id);
                doc.get_dictionary(*id)?.clone()
            }
            Object::Dictionary(dict) => dict.clone(),
            _ => return Err(PdfError::ParseError("AcroForm is not a dictionary".to_string())),
        };
        acroform = Some(dict);
    }

    let fields = match acroform.as_ref().and_then(|a| a.get(b"Fields").ok()) {
        Some(Object::Array(arr)) => arr.iter().filter_map(|o| o.as_reference().ok()).collect(),
        Some(Object::Reference(id)) => doc
            .get_object(*id)?
            .as_array()?
            .iter()
            .filter_map(|o| o.as_reference().ok())
            .collect(),
        _ => Vec::new(),
    };

    let tree_nodes: Vec<ObjectId> = doc
        .objects
        .iter()
        .filter(|(_, obj)| {
            obj.as_dict()
                .and_then(|d| d.get(b"Type"))
                .and_then(Object::as_name)
                .map(|t| t == b"Pages")
                .unwrap_or(false)
        })
        .map(|(id, _)| *id)
        .collect();
    for id in tree_nodes {
        doc.objects.remove(&id);
    }
    doc.objects.remove(&root_id);
    if let Some(id) = acroform_obj {
        doc.objects.remove(&id);
    }

    Ok(Part {
        label,
        pages,
        fields,
        acroform,
    })
}

/// Build the merged AcroForm, one parent field per input with fields
fn merge_acroforms(merged: &mut Document, parts: &[Part]) -> Result<Option<Dictionary>> {
    let mut top_fields = Vec::new();
    let mut fonts = Dictionary::new();
    let mut default_appearance = None;

    for part in parts {
        let Some(acroform) = &part.acroform else {
            continue;
        };

        if default_appearance.is_none() {
            default_appearance = acroform.get(b"DA").ok().cloned();
        }
        if let Ok(dr) = acroform.get(b"DR") {
            collect_fonts(merged, dr, &mut fonts)?;
        }

        if part.fields.is_empty() {
            continue;
        }

        let parent_id = merged.new_object_id();
        for field_id in &part.fields {
            merged
                .get_object_mut(*field_id)?
                .as_dict_mut()?
                .set("Parent", Object::Reference(parent_id));
        }
        let kids: Vec<Object> = part.fields.iter().map(|id| Object::Reference(*id)).collect();
        merged.objects.insert(
            parent_id,
            Object::Dictionary(dictionary! {
                "T" => Object::string_literal(part.label.as_str()),
                "Kids" => kids,
            }),
        );
        top_fields.push(Object::Reference(parent_id));
    }

    if top_fields.is_empty() && parts.iter().all(|p| p.acroform.is_none()) {
        return Ok(None);
    }

    let mut acroform = dictionary! {
        "Fields" => top_fields,
        "NeedAppearances" => true,
    };
    if !fonts.is_empty() {
        acroform.set("DR", dictionary! { "Font" => fonts });
    }
    if let Some(da) = default_appearance {
        acroform.set("DA", da);
    }
    Ok(Some(acroform))
}

/// Gather default-resource fonts; the first input to name a font wins
fn collect_fonts(doc: &Document, dr: &Object, fonts: &mut Dictionary) -> Result<()> {
    let dr = match dr {
        Object::Reference(id) => doc.get_dictionary(*id)?,
        Object::Dictionary(dict) => dict,
        _ => return Ok(()),
    };
    let font_dict = match dr.get(b"Font") {
        Ok(Object::Reference(id)) => doc.get_dictionary(*id)?,
        Ok(Object::Dictionary(dict)) => dict,
        _ => return Ok(()),
    };
    for (name, font) in font_dict.iter() {
        if !fonts.has(name) {
            fonts.set(name.clone(), font.clone());
        }
    }
    Ok(())
}
