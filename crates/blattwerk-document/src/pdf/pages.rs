// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page-ordered view over a `lopdf` document: load, reorder, copy pages across
// documents, set rotation, and serialise with a rebuilt page tree.

use std::collections::HashMap;

use blattwerk_core::EngineConfig;
use blattwerk_core::error::{EngineError, Result};
use lopdf::{Dictionary, Document, Object, ObjectId, dictionary};
use tracing::{debug, instrument, warn};

/// Page attributes a page may inherit from its ancestors in the page tree.
const INHERITABLE_KEYS: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Guard against malformed page trees whose /Parent chain loops.
const MAX_TREE_DEPTH: usize = 64;

/// An in-memory document as an ordered sequence of page objects.
///
/// Page order lives in `order` rather than in the lopdf page tree; the tree is
/// rebuilt flat under the root /Pages node when the document is serialised.
/// Inheritable attributes are copied onto every page at load time, so each page
/// object is self-contained and can be moved between documents.
pub struct PageDocument {
    document: Document,
    /// Root /Pages node of the catalog.
    pages_root: ObjectId,
    order: Vec<ObjectId>,
}

impl PageDocument {
    // -- Construction ---------------------------------------------------------

    /// A document with an empty page tree.
    pub fn empty(version: &str) -> Self {
        let mut document = Document::with_version(version);
        let pages_root = document.add_object(dictionary! {
            "Type" => "Pages",
            "Kids" => Vec::<Object>::new(),
            "Count" => 0_i64,
        });
        let catalog_id = document.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_root,
        });
        document.trailer.set("Root", catalog_id);

        Self {
            document,
            pages_root,
            order: Vec::new(),
        }
    }

    /// Parse raw PDF bytes.
    #[instrument(skip_all, fields(bytes_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let mut document = Document::load_mem(data)
            .map_err(|err| codec_error("failed to load PDF from memory", err))?;

        let pages_root = document
            .catalog()
            .and_then(|catalog| catalog.get(b"Pages"))
            .and_then(Object::as_reference)
            .map_err(|err| codec_error("document has no page tree", err))?;

        let order: Vec<ObjectId> = document.get_pages().into_values().collect();
        for page_id in &order {
            flatten_inherited(&mut document, *page_id)?;
        }

        // Every page now carries its own copy; leaving the values on the root
        // would leak them onto pages imported from other documents.
        if let Ok(root) = document
            .get_object_mut(pages_root)
            .and_then(Object::as_dict_mut)
        {
            for key in INHERITABLE_KEYS {
                root.remove(key);
            }
        }

        debug!(pages = order.len(), "PDF loaded from bytes");

        Ok(Self {
            document,
            pages_root,
            order,
        })
    }

    // -- Inspection -----------------------------------------------------------

    pub fn page_count(&self) -> usize {
        self.order.len()
    }

    /// Object id of the page at `index`.
    pub fn page_id(&self, index: usize) -> Result<ObjectId> {
        self.order
            .get(index)
            .copied()
            .ok_or(EngineError::InvalidPageIndex {
                index: index as i64,
                page_count: self.order.len(),
            })
    }

    pub fn page_dictionary(&self, index: usize) -> Result<&Dictionary> {
        let page_id = self.page_id(index)?;
        self.document
            .get_dictionary(page_id)
            .map_err(|err| codec_error(&format!("page object {:?} is unreadable", page_id), err))
    }

    /// Rotation of the page at `index` in degrees; 0 when unset.
    pub fn rotation(&self, index: usize) -> Result<i64> {
        let page = self.page_dictionary(index)?;
        Ok(page
            .get(b"Rotate")
            .ok()
            .and_then(object_as_integer)
            .unwrap_or(0))
    }

    // -- Mutation -------------------------------------------------------------

    /// Overwrite the /Rotate entry of the page at `index`.
    pub fn set_rotation(&mut self, index: usize, degrees: i64) -> Result<()> {
        let page_id = self.page_id(index)?;
        let page = self
            .document
            .get_object_mut(page_id)
            .and_then(Object::as_dict_mut)
            .map_err(|err| codec_error(&format!("page object {:?} is unreadable", page_id), err))?;
        page.set("Rotate", Object::Integer(degrees));
        Ok(())
    }

    /// Detach the page at `index` from the page order.
    ///
    /// The page object stays in the object table until the next save prunes it.
    pub fn remove_page(&mut self, index: usize) -> Result<ObjectId> {
        self.page_id(index)?;
        Ok(self.order.remove(index))
    }

    /// Place already-imported pages so the first lands at index `at`.
    pub fn insert_pages(&mut self, at: usize, page_ids: Vec<ObjectId>) {
        let at = at.min(self.order.len());
        self.order.splice(at..at, page_ids);
    }

    /// Deep-copy the pages at `indices` of `source` into this document's object
    /// table, in the given order, without placing them in the page order.
    ///
    /// Objects shared between the copied pages (fonts, images) are copied once.
    /// Every listed index yields a distinct page object, even when an index
    /// repeats. References between copied pages (link destinations, annotation
    /// /P) resolve to the copies; references to pages left behind become Null.
    pub fn import_pages(&mut self, source: &PageDocument, indices: &[usize]) -> Result<Vec<ObjectId>> {
        let source_ids = indices
            .iter()
            .map(|&index| source.page_id(index))
            .collect::<Result<Vec<_>>>()?;
        let imported: Vec<ObjectId> = source_ids
            .iter()
            .map(|_| self.document.new_object_id())
            .collect();

        // A page listed twice is linked to by its first copy.
        let mut copied: HashMap<ObjectId, ObjectId> = HashMap::new();
        for (source_id, new_id) in source_ids.iter().zip(&imported) {
            copied.entry(*source_id).or_insert(*new_id);
        }

        for (source_id, new_id) in source_ids.iter().zip(&imported) {
            let page = source.document.get_dictionary(*source_id).map_err(|err| {
                codec_error(&format!("cannot read page object {:?}", source_id), err)
            })?;

            // Self-references of a repeated page resolve to the copy being built.
            let first = copied.insert(*source_id, *new_id);
            let mut cloned = Dictionary::new();
            for (key, value) in page.iter() {
                // The page tree rebuild sets /Parent again.
                if key == b"Parent" {
                    continue;
                }
                cloned.set(
                    key.clone(),
                    copy_object(&source.document, &mut self.document, value, &mut copied),
                );
            }
            if let Some(first) = first {
                copied.insert(*source_id, first);
            }

            self.document.objects.insert(*new_id, Object::Dictionary(cloned));
        }

        debug!(
            pages = imported.len(),
            objects = copied.len(),
            "Pages imported"
        );
        Ok(imported)
    }

    // -- Serialisation --------------------------------------------------------

    /// Serialise the document with its page tree rebuilt from the page order.
    #[instrument(skip_all, fields(pages = self.order.len()))]
    pub fn into_bytes(mut self, config: &EngineConfig) -> Result<Vec<u8>> {
        self.rebuild_page_tree()?;

        if config.prune_unused_objects {
            let pruned = self.document.prune_objects();
            debug!(pruned = pruned.len(), "Unreachable objects pruned");
        }
        if config.compress_output {
            self.document.compress();
        }

        let mut output = Vec::new();
        self.document
            .save_to(&mut output)
            .map_err(|err| codec_error("failed to serialise PDF", err))?;

        debug!(output_bytes = output.len(), "PDF serialised");
        Ok(output)
    }

    fn rebuild_page_tree(&mut self) -> Result<()> {
        let kids: Vec<Object> = self.order.iter().copied().map(Object::Reference).collect();

        let root = self
            .document
            .get_object_mut(self.pages_root)
            .and_then(Object::as_dict_mut)
            .map_err(|err| codec_error("root /Pages node is unreadable", err))?;
        root.set("Kids", kids);
        root.set("Count", Object::Integer(self.order.len() as i64));

        for page_id in &self.order {
            if let Ok(page) = self
                .document
                .get_object_mut(*page_id)
                .and_then(Object::as_dict_mut)
            {
                page.set("Parent", Object::Reference(self.pages_root));
            }
        }
        Ok(())
    }
}

// -- Helpers ------------------------------------------------------------------

fn codec_error(context: &str, err: impl std::fmt::Display) -> EngineError {
    EngineError::Codec(format!("{}: {}", context, err))
}

fn object_as_integer(object: &Object) -> Option<i64> {
    object
        .as_i64()
        .ok()
        .or_else(|| object.as_float().ok().map(|value| value.round() as i64))
}

/// Copy inheritable attributes from the page's ancestors onto the page itself.
fn flatten_inherited(document: &mut Document, page_id: ObjectId) -> Result<()> {
    let page = document
        .get_dictionary(page_id)
        .map_err(|err| codec_error(&format!("page object {:?} is unreadable", page_id), err))?;

    let mut missing: Vec<&[u8]> = INHERITABLE_KEYS
        .iter()
        .copied()
        .filter(|key| !page.has(key))
        .collect();
    let mut parent = page.get(b"Parent").and_then(Object::as_reference).ok();
    let mut inherited: Vec<(&[u8], Object)> = Vec::new();
    let mut depth = 0;

    while let Some(node_id) = parent {
        if missing.is_empty() || depth >= MAX_TREE_DEPTH {
            break;
        }
        let Ok(node) = document.get_dictionary(node_id) else {
            break;
        };
        missing.retain(|key| match node.get(key) {
            Ok(value) => {
                inherited.push((*key, value.clone()));
                false
            }
            Err(_) => true,
        });
        parent = node.get(b"Parent").and_then(Object::as_reference).ok();
        depth += 1;
    }

    if inherited.is_empty() {
        return Ok(());
    }

    let page = document
        .get_object_mut(page_id)
        .and_then(Object::as_dict_mut)
        .map_err(|err| codec_error(&format!("page object {:?} is unreadable", page_id), err))?;
    for (key, value) in inherited {
        page.set(key, value);
    }
    Ok(())
}

/// Deep-copy `object` from `source` into `target`, following references.
///
/// `copied` maps source object ids to their copies so shared objects are copied
/// once and reference cycles terminate. Page tree objects (pages and /Pages
/// nodes) not already in `copied` are never copied and become Null.
fn copy_object(
    source: &Document,
    target: &mut Document,
    object: &Object,
    copied: &mut HashMap<ObjectId, ObjectId>,
) -> Object {
    match object {
        Object::Reference(id) => {
            if let Some(mapped) = copied.get(id) {
                return Object::Reference(*mapped);
            }
            match source.get_object(*id) {
                Ok(referenced) if is_page_tree_node(referenced) => {
                    debug!(?id, "Reference to a page outside the copy, using Null");
                    Object::Null
                }
                Ok(referenced) => {
                    let new_id = target.new_object_id();
                    copied.insert(*id, new_id);
                    let cloned = copy_object(source, target, referenced, copied);
                    target.objects.insert(new_id, cloned);
                    Object::Reference(new_id)
                }
                Err(err) => {
                    warn!(?id, %err, "Cannot resolve reference, using Null");
                    Object::Null
                }
            }
        }
        Object::Dictionary(dict) => Object::Dictionary(copy_dictionary(source, target, dict, copied)),
        Object::Array(items) => Object::Array(
            items
                .iter()
                .map(|item| copy_object(source, target, item, copied))
                .collect(),
        ),
        Object::Stream(stream) => {
            let mut cloned = stream.clone();
            cloned.dict = copy_dictionary(source, target, &stream.dict, copied);
            Object::Stream(cloned)
        }
        other => other.clone(),
    }
}

fn copy_dictionary(
    source: &Document,
    target: &mut Document,
    dict: &Dictionary,
    copied: &mut HashMap<ObjectId, ObjectId>,
) -> Dictionary {
    let mut new_dict = Dictionary::new();
    for (key, value) in dict.iter() {
        new_dict.set(key.clone(), copy_object(source, target, value, copied));
    }
    new_dict
}

fn is_page_tree_node(object: &Object) -> bool {
    object
        .as_dict()
        .and_then(|dict| dict.get(b"Type"))
        .and_then(Object::as_name)
        .map(|name| name == b"Page" || name == b"Pages")
        .unwrap_or(false)
}
