use forms::{FormFiller, FormId};
use pdf_core::fixtures::FormFixture;
use server::store::MemoryTemplateStore;
use server::AppState;
use std::sync::Arc;

/// Pages in every stand-in template
pub const TEMPLATE_PAGES: usize = 4;

/// A stand-in template carrying every field the form's table writes
pub fn template(form: FormId) -> Vec<u8> {
    let schema = form.schema().unwrap();
    let text: Vec<String> = schema.text_entries().flat_map(|e| e.destinations()).collect();
    let boxes: Vec<String> = schema
        .checkbox_entries()
        .flat_map(|e| e.destinations())
        .collect();
    FormFixture::new()
        .pages(TEMPLATE_PAGES)
        .text_fields(text.iter().map(String::as_str))
        .checkboxes(boxes.iter().map(String::as_str))
        .build()
}

/// Templates for every form except `missing`
pub fn store_without(missing: &[FormId]) -> MemoryTemplateStore {
    FormId::ALL
        .into_iter()
        .filter(|form| !missing.contains(form))
        .fold(MemoryTemplateStore::new(), |store, form| {
            store.with(form.template_name().unwrap(), template(form))
        })
}

pub fn state(store: MemoryTemplateStore) -> AppState {
    AppState::new(Arc::new(store), FormFiller::new())
}
