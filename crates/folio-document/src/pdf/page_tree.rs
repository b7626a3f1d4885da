// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page-tree surgery shared by every page operation.
//
// All page operations reduce to "the document should now contain exactly these
// page objects, in this order". `rebuild` makes that so by flattening the page
// tree under the catalog's /Pages node, then pruning whatever is no longer
// reachable from the trailer.

use std::collections::HashSet;

use folio_core::error::{FolioError, Result};
use lopdf::{Dictionary, Document, Object, ObjectId};
use tracing::{debug, warn};

/// Page attributes a page may inherit from its ancestors (PDF 32000 §7.7.3.4).
const INHERITABLE: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Guard against /Parent cycles in damaged files.
const MAX_TREE_DEPTH: usize = 64;

/// Object ID of the catalog's /Pages node.
pub(crate) fn pages_root(doc: &Document) -> Result<ObjectId> {
    doc.catalog()
        .map_err(|err| FolioError::Pdf(format!("no catalog: {}", err)))?
        .get(b"Pages")
        .and_then(Object::as_reference)
        .map_err(|err| FolioError::Pdf(format!("no /Pages reference: {}", err)))
}

/// Object ID of the catalog itself.
pub(crate) fn catalog_id(doc: &Document) -> Result<ObjectId> {
    doc.trailer
        .get(b"Root")
        .and_then(Object::as_reference)
        .map_err(|err| FolioError::Pdf(format!("no /Root in trailer: {}", err)))
}

/// Page object IDs in document order.
pub(crate) fn page_ids(doc: &Document) -> Vec<ObjectId> {
    doc.get_pages().into_values().collect()
}

/// Look up `key` on a page, walking up /Parent links for inheritable keys.
pub(crate) fn inherited_value(doc: &Document, page_id: ObjectId, key: &[u8]) -> Option<Object> {
    let mut node_id = page_id;
    for _ in 0..MAX_TREE_DEPTH {
        let node = doc.get_dictionary(node_id).ok()?;
        if let Ok(value) = node.get(key) {
            return Some(value.clone());
        }
        node_id = node.get(b"Parent").and_then(Object::as_reference).ok()?;
    }
    warn!(?page_id, "page tree deeper than {MAX_TREE_DEPTH} levels");
    None
}

/// Resolve a value that may be an indirect reference.
pub(crate) fn resolve<'a>(doc: &'a Document, object: &'a Object) -> &'a Object {
    match object {
        Object::Reference(id) => doc.get_object(*id).unwrap_or(object),
        other => other,
    }
}

/// Integer or real PDF number as `f32`.
pub(crate) fn number(object: &Object) -> Option<f32> {
    match object {
        Object::Integer(value) => Some(*value as f32),
        Object::Real(value) => Some(*value as f32),
        _ => None,
    }
}

/// Inheritable attributes the page does not carry itself, copied from its
/// ancestors so the page survives being re-parented.
fn missing_inherited(doc: &Document, page_id: ObjectId) -> Vec<(&'static [u8], Object)> {
    let Ok(page) = doc.get_dictionary(page_id) else {
        return Vec::new();
    };

    INHERITABLE
        .into_iter()
        .filter(|key| !page.has(key))
        .filter_map(|key| inherited_value(doc, page_id, key).map(|value| (key, value)))
        .collect()
}

/// Make `pages` (in order) the complete page list of `doc`.
///
/// A page ID may appear more than once; repeats are materialised as copies of
/// the page dictionary sharing its content streams.
pub(crate) fn rebuild(doc: &mut Document, pages: &[ObjectId]) -> Result<()> {
    let root_id = pages_root(doc)?;

    // Resolve inheritance while the old tree is still intact.
    let inherited: Vec<_> = pages
        .iter()
        .map(|&page_id| missing_inherited(doc, page_id))
        .collect();

    let mut seen = HashSet::with_capacity(pages.len());
    let mut kids = Vec::with_capacity(pages.len());

    for (&page_id, attributes) in pages.iter().zip(inherited) {
        let target_id = if seen.insert(page_id) {
            page_id
        } else {
            let copy = page_dictionary(doc, page_id)?.clone();
            doc.add_object(Object::Dictionary(copy))
        };

        let page = doc
            .get_dictionary_mut(target_id)
            .map_err(|err| FolioError::Pdf(format!("page {:?} unreadable: {}", target_id, err)))?;
        for (key, value) in attributes {
            if !page.has(key) {
                page.set(key, value);
            }
        }
        page.set("Parent", Object::Reference(root_id));
        kids.push(Object::Reference(target_id));
    }

    let root = doc
        .get_dictionary_mut(root_id)
        .map_err(|err| FolioError::Pdf(format!("/Pages node unreadable: {}", err)))?;
    root.set("Kids", Object::Array(kids));
    root.set("Count", Object::Integer(pages.len() as i64));

    let pruned = doc.prune_objects();
    debug!(pages = pages.len(), pruned = pruned.len(), "page tree rebuilt");
    Ok(())
}

pub(crate) fn page_dictionary(doc: &Document, page_id: ObjectId) -> Result<&Dictionary> {
    doc.get_dictionary(page_id)
        .map_err(|err| FolioError::Pdf(format!("page {:?} unreadable: {}", page_id, err)))
}

/// Move every object of `other` into `target`, returning `other`'s page IDs
/// (renumbered) in document order. The pages are not yet in `target`'s tree.
pub(crate) fn absorb(target: &mut Document, mut other: Document) -> Vec<ObjectId> {
    other.renumber_objects_with(target.max_id + 1);
    let pages = page_ids(&other);

    target.objects.extend(other.objects);
    target.max_id = target
        .objects
        .keys()
        .map(|(id, _)| *id)
        .max()
        .unwrap_or(target.max_id);

    pages
}
