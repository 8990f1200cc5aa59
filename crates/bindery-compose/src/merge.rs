// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Output-page accumulator over `lopdf`.
//
// Each renderer hands back a standalone PDF fragment; the accumulator copies
// the fragment's pages — with their transitively referenced resources — into
// one growing output document, preserving order.

use lopdf::{Document, Object, ObjectId, dictionary};
use tracing::{debug, warn};

use bindery_core::error::{BinderyError, Result};

/// Ordered page accumulator for one composition run.
///
/// Owns a skeleton document (catalog + empty page tree) and appends cloned
/// pages to it. Not shared between runs.
pub(crate) struct PageAccumulator {
    doc: Document,
    pages_id: ObjectId,
    page_count: usize,
}

impl PageAccumulator {
    pub fn new() -> Self {
        let mut doc = Document::with_version("1.5");

        let pages_id = doc.new_object_id();
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => Object::Array(Vec::new()),
                "Count" => 0,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => Object::Reference(pages_id),
        });
        doc.trailer.set("Root", Object::Reference(catalog_id));

        Self {
            doc,
            pages_id,
            page_count: 0,
        }
    }

    /// Total pages accumulated so far.
    pub fn page_count(&self) -> usize {
        self.page_count
    }

    /// Append every page of a serialized PDF fragment, in the fragment's own
    /// page order. Returns the number of pages added.
    pub fn append_fragment(&mut self, bytes: &[u8]) -> Result<usize> {
        let source = Document::load_mem(bytes)
            .map_err(|err| BinderyError::PdfError(format!("failed to load fragment: {err}")))?;

        let pages = source.get_pages();
        let mut page_numbers: Vec<u32> = pages.keys().copied().collect();
        page_numbers.sort_unstable();

        for page_num in page_numbers.iter() {
            let page_id = pages[page_num];
            self.clone_page_from(&source, page_id)?;
        }

        self.page_count += page_numbers.len();
        debug!(
            added = page_numbers.len(),
            total = self.page_count,
            "fragment appended"
        );
        Ok(page_numbers.len())
    }

    /// Serialise the accumulated document.
    pub fn save_to_bytes(&mut self) -> Result<Vec<u8>> {
        let mut output = Vec::new();
        self.doc
            .save_to(&mut output)
            .map_err(|err| BinderyError::PdfError(format!("failed to serialise output: {err}")))?;
        Ok(output)
    }

    /// Clone one page object (and the objects it references) from `source`
    /// into the accumulator, appending it as the last page.
    fn clone_page_from(&mut self, source: &Document, page_id: ObjectId) -> Result<()> {
        let page_object = source.get_object(page_id).map_err(|err| {
            BinderyError::PdfError(format!("cannot read page object {page_id:?}: {err}"))
        })?;

        let cloned = deep_clone_object(source, &mut self.doc, page_object)?;
        let cloned_id = self.doc.add_object(cloned);

        // Register the page in the /Pages node and patch its /Parent.
        if let Ok(Object::Dictionary(pages_dict)) = self.doc.get_object_mut(self.pages_id) {
            if let Ok(Object::Array(kids)) = pages_dict.get_mut(b"Kids") {
                kids.push(Object::Reference(cloned_id));
            }
            if let Ok(Object::Integer(count)) = pages_dict.get_mut(b"Count") {
                *count += 1;
            }
        }
        if let Ok(Object::Dictionary(page_dict)) = self.doc.get_object_mut(cloned_id) {
            page_dict.set("Parent", Object::Reference(self.pages_id));
        }

        Ok(())
    }
}

/// Deep-clone a single lopdf object, recursively resolving references.
///
/// /Parent is deliberately skipped to avoid circular cloning; the caller
/// patches it to point at the accumulator's page tree.
fn deep_clone_object(source: &Document, target: &mut Document, object: &Object) -> Result<Object> {
    match object {
        Object::Dictionary(dict) => {
            let mut new_dict = lopdf::Dictionary::new();
            for (key, value) in dict.iter() {
                if key == b"Parent" {
                    continue;
                }
                let cloned_value = deep_clone_object(source, target, value)?;
                new_dict.set(key.clone(), cloned_value);
            }
            Ok(Object::Dictionary(new_dict))
        }
        Object::Array(arr) => {
            let mut new_arr = Vec::with_capacity(arr.len());
            for item in arr {
                new_arr.push(deep_clone_object(source, target, item)?);
            }
            Ok(Object::Array(new_arr))
        }
        Object::Reference(ref_id) => match source.get_object(*ref_id) {
            Ok(referenced) => {
                let cloned = deep_clone_object(source, target, referenced)?;
                let new_id = target.add_object(cloned);
                Ok(Object::Reference(new_id))
            }
            Err(err) => {
                warn!(?ref_id, %err, "cannot resolve reference, using Null");
                Ok(Object::Null)
            }
        },
        Object::Stream(stream) => {
            let mut new_dict = lopdf::Dictionary::new();
            for (key, value) in stream.dict.iter() {
                if key == b"Parent" {
                    continue;
                }
                let cloned_value = deep_clone_object(source, target, value)?;
                new_dict.set(key.clone(), cloned_value);
            }
            Ok(Object::Stream(lopdf::Stream::new(
                new_dict,
                stream.content.clone(),
            )))
        }
        // Boolean, Integer, Real, String, Name, Null are trivially cloneable.
        other => Ok(other.clone()),
    }
}
