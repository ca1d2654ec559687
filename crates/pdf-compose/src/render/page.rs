//! Output page rendering
//!
//! Turns sheet plans into PDF pages, and builds the page tree and catalog
//! around them. Placing content is infallible: every page a plan refers to
//! must already have an XObject.

use crate::constants::OUTPUT_PDF_VERSION;
use crate::layout::{Placement, SheetPlan};
use crate::types::Result;
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use std::collections::HashMap;

use super::xobject::{copy_dictionary, inherited_attribute, page_media_box};

/// An output document under construction.
///
/// The Pages object id is reserved up front so pages can point at their
/// parent before the tree itself is written.
pub struct PageTreeBuilder {
    output: Document,
    pages_id: ObjectId,
    kids: Vec<ObjectId>,
}

impl PageTreeBuilder {
    pub fn new() -> Self {
        let mut output = Document::with_version(OUTPUT_PDF_VERSION);
        let pages_id = output.new_object_id();
        Self {
            output,
            pages_id,
            kids: Vec::new(),
        }
    }

    /// The document being built, for adding XObjects and other resources
    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.output
    }

    pub fn page_count(&self) -> usize {
        self.kids.len()
    }

    /// Append a page drawn from a sheet plan.
    ///
    /// # Arguments
    /// * `plan` - Page size and placements
    /// * `xobjects` - XObject id for every source page the plan places
    pub fn push_sheet(&mut self, plan: &SheetPlan, xobjects: &HashMap<usize, ObjectId>) {
        let mut content = String::new();
        let mut names = Dictionary::new();

        for placed in &plan.placements {
            let Some(&xobject_id) = xobjects.get(&placed.source_page) else {
                continue;
            };
            let name = format!("P{}", placed.source_page);
            content.push_str(&placement_command(&name, &placed.placement));
            names.set(name.into_bytes(), Object::Reference(xobject_id));
        }

        let mut resources = Dictionary::new();
        resources.set("XObject", Object::Dictionary(names));
        self.push_content_page(plan.width_pt, plan.height_pt, content, resources);
    }

    /// Append a page with an explicit content stream and resources.
    pub fn push_content_page(
        &mut self,
        width_pt: f32,
        height_pt: f32,
        content: String,
        resources: Dictionary,
    ) {
        let content_id = self
            .output
            .add_object(Stream::new(Dictionary::new(), content.into_bytes()));

        let mut page_dict = Dictionary::new();
        page_dict.set("Type", Object::Name(b"Page".to_vec()));
        page_dict.set("Parent", Object::Reference(self.pages_id));
        page_dict.set("MediaBox", media_box(width_pt, height_pt));
        page_dict.set("Contents", Object::Reference(content_id));
        page_dict.set("Resources", Object::Dictionary(resources));

        let page_id = self.output.add_object(page_dict);
        self.kids.push(page_id);
    }

    /// Copy a finished page from another document, unchanged.
    ///
    /// Inherited MediaBox and Resources are written onto the copy, since it
    /// gets a new parent. `cache` maps source ids to ids in this document
    /// and must only be shared between pages of the same source.
    pub fn import_page(
        &mut self,
        source: &Document,
        page_id: ObjectId,
        cache: &mut HashMap<ObjectId, ObjectId>,
    ) -> Result<()> {
        let mut page_dict = source.get_dictionary(page_id)?.clone();
        page_dict.remove(b"Parent");

        let [llx, lly, urx, ury] = page_media_box(source, page_id)?;
        page_dict.set(
            "MediaBox",
            Object::Array(vec![
                Object::Real(llx),
                Object::Real(lly),
                Object::Real(urx),
                Object::Real(ury),
            ]),
        );
        if let Some(resources) = inherited_attribute(source, page_id, b"Resources")? {
            page_dict.set("Resources", resources);
        }

        // Back references (annotations) resolve to the copy, not the source
        let new_id = self.output.new_object_id();
        cache.insert(page_id, new_id);

        let mut copied = copy_dictionary(&mut self.output, source, &page_dict, cache)?;
        copied.set("Parent", Object::Reference(self.pages_id));

        self.output.objects.insert(new_id, Object::Dictionary(copied));
        self.kids.push(new_id);
        Ok(())
    }

    /// Drop pages appended after the first `page_count`.
    ///
    /// Objects only those pages used stay behind until the document is
    /// pruned.
    pub fn truncate(&mut self, page_count: usize) {
        self.kids.truncate(page_count);
    }

    /// Write the page tree and catalog and hand out the document.
    pub fn finish(mut self) -> Document {
        let count = self.kids.len() as i64;
        let kids = self.kids.into_iter().map(Object::Reference).collect();
        let pages_dict = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Pages".to_vec())),
            ("Kids", Object::Array(kids)),
            ("Count", Object::Integer(count)),
        ]);
        self.output
            .objects
            .insert(self.pages_id, Object::Dictionary(pages_dict));

        let catalog_id = self.output.add_object(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Catalog".to_vec())),
            ("Pages", Object::Reference(self.pages_id)),
        ]));
        self.output.trailer.set("Root", catalog_id);

        self.output
    }
}

impl Default for PageTreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Generate the content stream command that draws an XObject.
pub(crate) fn placement_command(xobject_name: &str, placement: &Placement) -> String {
    // Adding zero turns -0 into 0
    let [a, b, c, d, e, f] = placement.matrix().map(|v| v + 0.0);
    format!("q {a} {b} {c} {d} {e} {f} cm /{xobject_name} Do Q\n")
}

fn media_box(width_pt: f32, height_pt: f32) -> Object {
    Object::Array(vec![
        Object::Integer(0),
        Object::Integer(0),
        Object::Real(width_pt),
        Object::Real(height_pt),
    ])
}
