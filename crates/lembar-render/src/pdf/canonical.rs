// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Canonical PDF form — rewrites a freshly written PDF with `lopdf` so that the
// same inputs always give the same bytes.
//
// The PDF backend stamps creation dates, XMP packets and a random /ID, and
// names fonts and images with generated identifiers. This pass:
//
//   1. strips /ID, the /Info dates and the catalog /Metadata stream,
//   2. renames page resources in first-use order (Im1, F1, Gs1, ...),
//   3. renumbers objects breadth-first from the trailer with sorted keys.
//
// The result is then compressed and serialised with a classic xref table.

use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};

use lembar_core::error::{LembarError, Result};
use lopdf::content::Content;
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use tracing::{debug, instrument};

fn lopdf_err(err: lopdf::Error) -> LembarError {
    LembarError::PdfError(format!("pdf canonicalisation failed: {err}"))
}

/// Resource categories a page content stream names by key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum ResourceKind {
    XObject,
    Font,
    ExtGState,
}

impl ResourceKind {
    const ALL: [ResourceKind; 3] = [
        ResourceKind::XObject,
        ResourceKind::Font,
        ResourceKind::ExtGState,
    ];

    fn from_operator(operator: &str) -> Option<Self> {
        match operator {
            "Do" => Some(ResourceKind::XObject),
            "Tf" => Some(ResourceKind::Font),
            "gs" => Some(ResourceKind::ExtGState),
            _ => None,
        }
    }

    fn key(self) -> &'static [u8] {
        match self {
            ResourceKind::XObject => b"XObject",
            ResourceKind::Font => b"Font",
            ResourceKind::ExtGState => b"ExtGState",
        }
    }

    fn prefix(self) -> &'static str {
        match self {
            ResourceKind::XObject => "Im",
            ResourceKind::Font => "F",
            ResourceKind::ExtGState => "Gs",
        }
    }
}

/// Old resource name to stable name, assigned in order of first use.
#[derive(Default)]
struct NameMap {
    names: HashMap<(ResourceKind, Vec<u8>), Vec<u8>>,
    counts: HashMap<ResourceKind, usize>,
}

impl NameMap {
    fn rename(&mut self, kind: ResourceKind, old: &[u8]) -> Vec<u8> {
        if let Some(existing) = self.names.get(&(kind, old.to_vec())) {
            return existing.clone();
        }
        let count = self.counts.entry(kind).or_insert(0);
        *count += 1;
        let new = format!("{}{}", kind.prefix(), count).into_bytes();
        self.names.insert((kind, old.to_vec()), new.clone());
        new
    }

    fn get(&self, kind: ResourceKind, old: &[u8]) -> Option<&Vec<u8>> {
        self.names.get(&(kind, old.to_vec()))
    }
}

/// Rewrite `pdf` into its canonical byte form.
#[instrument(skip(pdf), fields(bytes_in = pdf.len()))]
pub fn canonicalize(pdf: &[u8]) -> Result<Vec<u8>> {
    let mut doc = Document::load_mem(pdf).map_err(lopdf_err)?;

    strip_volatile_metadata(&mut doc)?;
    rename_page_resources(&mut doc)?;

    let mut canonical = renumber(&doc);
    canonical.compress();

    let mut out = Vec::new();
    canonical.save_to(&mut out).map_err(|e| lopdf_err(e.into()))?;
    debug!(objects = canonical.objects.len(), bytes_out = out.len(), "Canonical PDF ready");
    Ok(out)
}

fn strip_volatile_metadata(doc: &mut Document) -> Result<()> {
    doc.trailer.remove(b"ID");

    match doc.trailer.get(b"Info").cloned() {
        Ok(Object::Reference(id)) => {
            if let Ok(info) = doc.get_object_mut(id).and_then(Object::as_dict_mut) {
                info.remove(b"CreationDate");
                info.remove(b"ModDate");
            }
        }
        Ok(Object::Dictionary(mut info)) => {
            info.remove(b"CreationDate");
            info.remove(b"ModDate");
            doc.trailer.set("Info", Object::Dictionary(info));
        }
        _ => {}
    }

    let root = doc
        .trailer
        .get(b"Root")
        .and_then(Object::as_reference)
        .map_err(lopdf_err)?;
    let catalog = doc
        .get_object_mut(root)
        .and_then(Object::as_dict_mut)
        .map_err(lopdf_err)?;
    catalog.remove(b"Metadata");
    Ok(())
}

fn rename_page_resources(doc: &mut Document) -> Result<()> {
    let page_ids: Vec<ObjectId> = doc.get_pages().values().copied().collect();
    let mut names = NameMap::default();

    // Content first, across all pages, so names follow drawing order.
    for &page_id in &page_ids {
        let raw = doc.get_page_content(page_id).map_err(lopdf_err)?;
        let mut content = Content::decode(&raw).map_err(lopdf_err)?;
        for operation in &mut content.operations {
            let Some(kind) = ResourceKind::from_operator(&operation.operator) else {
                continue;
            };
            if let Some(Object::Name(name)) = operation.operands.first_mut() {
                *name = names.rename(kind, name);
            }
        }
        let encoded = content.encode().map_err(lopdf_err)?;
        let stream_id = doc.add_object(Stream::new(Dictionary::new(), encoded));
        doc.get_object_mut(page_id)
            .and_then(Object::as_dict_mut)
            .map_err(lopdf_err)?
            .set("Contents", Object::Reference(stream_id));
    }

    let mut shared_done: BTreeSet<ObjectId> = BTreeSet::new();
    for &page_id in &page_ids {
        let resources = doc
            .get_object(page_id)
            .and_then(Object::as_dict)
            .map_err(lopdf_err)?
            .get(b"Resources")
            .cloned();
        match resources {
            Ok(Object::Reference(id)) => {
                if !shared_done.insert(id) {
                    continue;
                }
                let dict = doc
                    .get_object(id)
                    .and_then(Object::as_dict)
                    .map_err(lopdf_err)?;
                let renamed = renamed_resources(doc, dict, &names);
                *doc.get_object_mut(id).map_err(lopdf_err)? = Object::Dictionary(renamed);
            }
            Ok(Object::Dictionary(dict)) => {
                let renamed = renamed_resources(doc, &dict, &names);
                doc.get_object_mut(page_id)
                    .and_then(Object::as_dict_mut)
                    .map_err(lopdf_err)?
                    .set("Resources", Object::Dictionary(renamed));
            }
            _ => {}
        }
    }
    Ok(())
}

/// Copy of `resources` with every named category rekeyed. Entries the page
/// content never names are dropped.
fn renamed_resources(doc: &Document, resources: &Dictionary, names: &NameMap) -> Dictionary {
    let mut out = resources.clone();
    for kind in ResourceKind::ALL {
        let entries = match resources.get(kind.key()) {
            Ok(Object::Dictionary(d)) => d.clone(),
            Ok(Object::Reference(id)) => doc
                .get_object(*id)
                .ok()
                .and_then(|o| o.as_dict().ok())
                .cloned()
                .unwrap_or_default(),
            _ => continue,
        };
        let mut renamed: Vec<(Vec<u8>, Object)> = entries
            .iter()
            .filter_map(|(old, value)| names.get(kind, old).map(|new| (new.clone(), value.clone())))
            .collect();
        renamed.sort_by(|a, b| a.0.cmp(&b.0));
        let mut dict = Dictionary::new();
        for (name, value) in renamed {
            dict.set(name, value);
        }
        out.set(kind.key().to_vec(), Object::Dictionary(dict));
    }
    out
}

/// Rebuild the document with objects numbered in breadth-first order from
/// the trailer. Unreachable objects are dropped.
fn renumber(doc: &Document) -> Document {
    let mut order: Vec<ObjectId> = Vec::new();
    let mut new_ids: BTreeMap<ObjectId, ObjectId> = BTreeMap::new();
    let mut queue: VecDeque<ObjectId> = VecDeque::new();

    let mut roots = Vec::new();
    collect_refs(&Object::Dictionary(doc.trailer.clone()), &mut roots);
    queue.extend(roots);

    while let Some(id) = queue.pop_front() {
        if new_ids.contains_key(&id) {
            continue;
        }
        let Ok(object) = doc.get_object(id) else {
            continue;
        };
        new_ids.insert(id, ((order.len() + 1) as u32, 0));
        order.push(id);
        let mut refs = Vec::new();
        collect_refs(object, &mut refs);
        queue.extend(refs);
    }

    let mut out = Document::with_version(doc.version.clone());
    for old in &order {
        if let (Ok(object), Some(&new)) = (doc.get_object(*old), new_ids.get(old)) {
            out.objects.insert(new, rewrite(object, &new_ids));
        }
    }
    out.max_id = order.len() as u32;
    let trailer = rewrite(&Object::Dictionary(doc.trailer.clone()), &new_ids);
    if let Object::Dictionary(trailer) = trailer {
        out.trailer = trailer;
    }
    out
}

fn sorted_entries(dict: &Dictionary) -> Vec<(&Vec<u8>, &Object)> {
    let mut entries: Vec<(&Vec<u8>, &Object)> = dict.iter().collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));
    entries
}

fn collect_refs(object: &Object, out: &mut Vec<ObjectId>) {
    match object {
        Object::Reference(id) => out.push(*id),
        Object::Array(items) => items.iter().for_each(|item| collect_refs(item, out)),
        Object::Dictionary(dict) => {
            for (_, value) in sorted_entries(dict) {
                collect_refs(value, out);
            }
        }
        Object::Stream(stream) => {
            for (_, value) in sorted_entries(&stream.dict) {
                collect_refs(value, out);
            }
        }
        _ => {}
    }
}

fn rewrite_dict(dict: &Dictionary, new_ids: &BTreeMap<ObjectId, ObjectId>) -> Dictionary {
    let mut out = Dictionary::new();
    for (key, value) in sorted_entries(dict) {
        out.set(key.clone(), rewrite(value, new_ids));
    }
    out
}

/// Deep copy with references remapped and dictionary keys sorted.
fn rewrite(object: &Object, new_ids: &BTreeMap<ObjectId, ObjectId>) -> Object {
    match object {
        Object::Reference(id) => new_ids
            .get(id)
            .map(|new| Object::Reference(*new))
            .unwrap_or(Object::Null),
        Object::Array(items) => {
            Object::Array(items.iter().map(|item| rewrite(item, new_ids)).collect())
        }
        Object::Dictionary(dict) => Object::Dictionary(rewrite_dict(dict, new_ids)),
        Object::Stream(stream) => {
            let mut stream = stream.clone();
            stream.dict = rewrite_dict(&stream.dict, new_ids);
            Object::Stream(stream)
        }
        other => other.clone(),
    }
}
