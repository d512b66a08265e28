//! Builders for small AcroForm documents used in tests
//!
//! Real court templates are large and fetched over the network; tests build
//! look-alike documents with the same fully qualified field names instead.

use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream};

enum Leaf {
    Text,
    Checkbox { on_state: String },
}

struct Node {
    partial: String,
    children: Vec<usize>,
    leaf: Option<Leaf>,
}

/// Builder for a document with text and checkbox fields
///
/// Field names are fully qualified; they are split on `.` into a field
/// hierarchy. A dot preceded by a backslash belongs to the partial name,
/// matching how XFA-derived forms escape dots.
///
/// ```ignore
/// let bytes = FormFixture::new()
///     .pages(2)
///     .text_field("topmostSubform[0].Page1[0].Name_ft[0]")
///     .checkbox("topmostSubform[0].Page2[0].Estate_cb[0]")
///     .build();
/// ```
pub struct FormFixture {
    page_count: usize,
    nodes: Vec<Node>,
    roots: Vec<usize>,
}

impl Default for FormFixture {
    fn default() -> Self {
        Self::new()
    }
}

impl FormFixture {
    pub fn new() -> Self {
        Self {
            page_count: 1,
            nodes: Vec::new(),
            roots: Vec::new(),
        }
    }

    /// Number of pages (at least one)
    pub fn pages(mut self, count: usize) -> Self {
        self.page_count = count.max(1);
        self
    }

    pub fn text_field(mut self, name: &str) -> Self {
        self.insert(name, Leaf::Text);
        self
    }

    /// Checkbox whose on-state appearance is named `Yes`
    pub fn checkbox(self, name: &str) -> Self {
        self.checkbox_with_state(name, "Yes")
    }

    pub fn checkbox_with_state(mut self, name: &str, on_state: &str) -> Self {
        self.insert(
            name,
            Leaf::Checkbox {
                on_state: on_state.to_string(),
            },
        );
        self
    }

    /// Several text fields at once
    pub fn text_fields<'a>(mut self, names: impl IntoIterator<Item = &'a str>) -> Self {
        for name in names {
            self.insert(name, Leaf::Text);
        }
        self
    }

    /// Several checkboxes at once
    pub fn checkboxes<'a>(mut self, names: impl IntoIterator<Item = &'a str>) -> Self {
        for name in names {
            self.insert(
                name,
                Leaf::Checkbox {
                    on_state: "Yes".to_string(),
                },
            );
        }
        self
    }

    fn insert(&mut self, name: &str, leaf: Leaf) {
        let parts = split_name(name);
        let mut siblings_of: Option<usize> = None;
        let last = parts.len() - 1;

        for (i, partial) in parts.into_iter().enumerate() {
            let siblings = match siblings_of {
                Some(parent) => &self.nodes[parent].children,
                None => &self.roots,
            };
            let existing = siblings
                .iter()
                .copied()
                .find(|&idx| self.nodes[idx].partial == partial);

            let idx = match existing {
                Some(idx) => idx,
                None => {
                    let idx = self.nodes.len();
                    self.nodes.push(Node {
                        partial,
                        children: Vec::new(),
                        leaf: None,
                    });
                    match siblings_of {
                        Some(parent) => self.nodes[parent].children.push(idx),
                        None => self.roots.push(idx),
                    }
                    idx
                }
            };
            siblings_of = Some(idx);
            if i == last {
                self.nodes[idx].leaf = Some(leaf);
                return;
            }
        }
    }

    /// Serialize the document
    pub fn build(self) -> Vec<u8> {
        let mut doc = Document::with_version("1.7");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });

        let mut page_ids = Vec::with_capacity(self.page_count);
        for _ in 0..self.page_count {
            let contents = doc.add_object(Stream::new(Dictionary::new(), Vec::new()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => contents,
                "Annots" => Vec::<Object>::new(),
            });
            page_ids.push(page_id);
        }

        let mut builder = TreeBuilder {
            doc: &mut doc,
            nodes: &self.nodes,
            page_ids: &page_ids,
            widget_pages: Vec::new(),
        };
        let mut top_fields = Vec::new();
        for &root in &self.roots {
            let id = builder.emit(root, None, "");
            top_fields.push(Object::Reference(id));
        }
        let widget_pages = std::mem::take(&mut builder.widget_pages);

        for (widget_id, page_id) in widget_pages {
            if let Ok(Object::Dictionary(page)) = doc.get_object_mut(page_id) {
                if let Ok(Object::Array(annots)) = page.get_mut(b"Annots") {
                    annots.push(Object::Reference(widget_id));
                }
            }
        }

        let kids: Vec<Object> = page_ids.iter().map(|id| Object::Reference(*id)).collect();
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => self.page_count as i64,
                "MediaBox" => vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Integer(612),
                    Object::Integer(792),
                ],
                "Resources" => Dictionary::new(),
            }),
        );

        let acroform_id = doc.add_object(dictionary! {
            "Fields" => top_fields,
            "DA" => Object::string_literal("/Helv 0 Tf 0 g"),
            "DR" => dictionary! {
                "Font" => dictionary! { "Helv" => font_id },
            },
        });
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
            "AcroForm" => acroform_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).expect("fixture document serializes");
        bytes
    }
}

struct TreeBuilder<'a> {
    doc: &'a mut Document,
    nodes: &'a [Node],
    page_ids: &'a [ObjectId],
    widget_pages: Vec<(ObjectId, ObjectId)>,
}

impl TreeBuilder<'_> {
    fn emit(&mut self, idx: usize, parent: Option<ObjectId>, parent_name: &str) -> ObjectId {
        let nodes = self.nodes;
        let node = &nodes[idx];
        let id = self.doc.new_object_id();
        let full_name = if parent_name.is_empty() {
            node.partial.clone()
        } else {
            format!("{parent_name}.{}", node.partial)
        };

        let mut dict = dictionary! {
            "T" => Object::string_literal(node.partial.as_str()),
        };
        if let Some(parent) = parent {
            dict.set("Parent", parent);
        }

        match &node.leaf {
            Some(leaf) => {
                let page_id = self.page_for(&full_name);
                dict.set("Type", "Annot");
                dict.set("Subtype", "Widget");
                dict.set("F", Object::Integer(4));
                dict.set("P", page_id);
                dict.set(
                    "Rect",
                    vec![
                        Object::Integer(72),
                        Object::Integer(700),
                        Object::Integer(272),
                        Object::Integer(714),
                    ],
                );
                match leaf {
                    Leaf::Text => {
                        dict.set("FT", "Tx");
                        dict.set("DA", Object::string_literal("/Helv 0 Tf 0 g"));
                    }
                    Leaf::Checkbox { on_state } => {
                        let on = self
                            .doc
                            .add_object(Stream::new(Dictionary::new(), b"0 g".to_vec()));
                        let off = self
                            .doc
                            .add_object(Stream::new(Dictionary::new(), Vec::new()));
                        let mut normal = Dictionary::new();
                        normal.set(on_state.as_str(), on);
                        normal.set("Off", off);
                        dict.set("FT", "Btn");
                        dict.set("AP", dictionary! { "N" => normal });
                        dict.set("AS", "Off");
                        dict.set("V", "Off");
                    }
                }
                self.widget_pages.push((id, page_id));
            }
            None => {
                let mut kids = Vec::with_capacity(node.children.len());
                for &child in &node.children {
                    kids.push(Object::Reference(self.emit(child, Some(id), &full_name)));
                }
                dict.set("Kids", kids);
            }
        }

        self.doc.objects.insert(id, Object::Dictionary(dict));
        id
    }

    /// Page named by a `PageN[` segment of the field name, else the first
    fn page_for(&self, full_name: &str) -> ObjectId {
        let number = full_name
            .split('.')
            .filter_map(|part| part.strip_prefix("Page"))
            .filter_map(|rest| rest.split('[').next())
            .filter_map(|digits| digits.parse::<usize>().ok())
            .last()
            .unwrap_or(1);
        let index = number.clamp(1, self.page_ids.len()) - 1;
        self.page_ids[index]
    }
}

/// Split a fully qualified name on dots that are not backslash-escaped
fn split_name(name: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut escaped = false;
    for ch in name.chars() {
        if ch == '.' && !escaped {
            parts.push(std::mem::take(&mut current));
        } else {
            current.push(ch);
        }
        escaped = ch == '\\';
    }
    parts.push(current);
    parts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_name_respects_escapes() {
        assert_eq!(
            split_name("topmostSubform[0].Page2[0].residence5\\.c[0]"),
            vec!["topmostSubform[0]", "Page2[0]", "residence5\\.c[0]"]
        );
    }

    #[test]
    fn test_fixture_loads() {
        let bytes = FormFixture::new()
            .pages(2)
            .text_field("a[0].Page2[0].b[0]")
            .build();
        let doc = lopdf::Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 2);
    }
}
