//! ELAN annotation documents (`.eaf`).
//!
//! Only what the checks need is kept: tiers with their annotations (id,
//! value, time slots or the referenced annotation) and the time slot table.

use roxmltree::{Document, Node};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use super::AnnotationDocument;
use crate::error::{DocumentError, DocumentResult};
use crate::report::Location;

const ROOT: &str = "ANNOTATION_DOCUMENT";

/// Upper bound when following chains of reference annotations.
const MAX_REFERENCE_DEPTH: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Anchor {
    /// Time-aligned: start and end time slot ids
    Aligned { start: String, end: String },
    /// Symbolic: id of the parent annotation
    Reference(String),
}

#[derive(Debug, Clone)]
struct Annotation {
    id: String,
    value: String,
    anchor: Anchor,
}

#[derive(Debug, Clone)]
struct ElanTier {
    id: String,
    annotations: Vec<Annotation>,
}

/// Parsed ELAN document.
#[derive(Debug, Clone, Default)]
pub struct ElanDocument {
    tiers: Vec<ElanTier>,
    /// Time slot id to milliseconds; unaligned slots are absent
    time_slots: HashMap<String, u64>,
}

impl ElanDocument {
    pub fn from_path(path: &Path) -> DocumentResult<Self> {
        Self::parse(&fs::read_to_string(path)?)
    }

    pub fn parse(xml: &str) -> DocumentResult<Self> {
        let doc = Document::parse(xml.trim_start_matches('\u{feff}'))?;
        let root = doc.root_element();
        if root.tag_name().name() != ROOT {
            return Err(DocumentError::UnexpectedRoot {
                expected: ROOT.to_string(),
                found: root.tag_name().name().to_string(),
            });
        }

        let mut time_slots = HashMap::new();
        for slot in root.descendants().filter(|n| n.has_tag_name("TIME_SLOT")) {
            let (Some(id), Some(value)) = (slot.attribute("TIME_SLOT_ID"), slot.attribute("TIME_VALUE")) else {
                continue;
            };
            if let Ok(ms) = value.trim().parse::<u64>() {
                time_slots.insert(id.to_string(), ms);
            }
        }

        let tiers = root
            .children()
            .filter(|n| n.has_tag_name("TIER"))
            .map(|tier| ElanTier {
                id: tier.attribute("TIER_ID").unwrap_or_default().to_string(),
                annotations: tier.descendants().filter_map(read_annotation).collect(),
            })
            .collect();

        Ok(Self { tiers, time_slots })
    }

    fn find_annotation(&self, id: &str) -> Option<&Annotation> {
        self.tiers
            .iter()
            .flat_map(|t| t.annotations.iter())
            .find(|a| a.id == id)
    }

    /// Follow references up to the time-aligned annotation.
    fn aligned_times(&self, annotation: &Annotation) -> Option<(u64, u64)> {
        let mut current = annotation;
        for _ in 0..MAX_REFERENCE_DEPTH {
            match &current.anchor {
                Anchor::Aligned { start, end } => {
                    return Some((*self.time_slots.get(start)?, *self.time_slots.get(end)?));
                }
                Anchor::Reference(parent) => current = self.find_annotation(parent)?,
            }
        }
        None
    }
}

fn read_annotation(node: Node) -> Option<Annotation> {
    let value = node
        .children()
        .find(|c| c.has_tag_name("ANNOTATION_VALUE"))
        .map(|v| v.text().unwrap_or_default().to_string())
        .unwrap_or_default();
    let id = node.attribute("ANNOTATION_ID").unwrap_or_default().to_string();
    let anchor = match node.tag_name().name() {
        "ALIGNABLE_ANNOTATION" => Anchor::Aligned {
            start: node.attribute("TIME_SLOT_REF1").unwrap_or_default().to_string(),
            end: node.attribute("TIME_SLOT_REF2").unwrap_or_default().to_string(),
        },
        "REF_ANNOTATION" => Anchor::Reference(node.attribute("ANNOTATION_REF").unwrap_or_default().to_string()),
        _ => return None,
    };
    Some(Annotation { id, value, anchor })
}

/// Milliseconds as `mm:ss.mmm`.
pub fn format_time(ms: u64) -> String {
    format!("{:02}:{:02}.{:03}", ms / 60_000, (ms / 1000) % 60, ms % 1000)
}

impl AnnotationDocument for ElanDocument {
    fn tier_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = Vec::new();
        for tier in &self.tiers {
            if !ids.contains(&tier.id) {
                ids.push(tier.id.clone());
            }
        }
        ids
    }

    fn texts_in_tier(&self, tier_id: &str) -> Vec<String> {
        self.tiers
            .iter()
            .filter(|t| t.id == tier_id)
            .flat_map(|t| t.annotations.iter())
            .filter(|a| !a.value.is_empty())
            .map(|a| a.value.clone())
            .collect()
    }

    fn locate(&self, tier_ids: &[String], token: &str, detailed: bool) -> Vec<Location> {
        let mut locations = Vec::new();
        if token.is_empty() {
            return locations;
        }
        for tier in self.tiers.iter().filter(|t| tier_ids.contains(&t.id)) {
            let mut hits = tier.annotations.iter().filter(|a| a.value.contains(token)).peekable();
            if hits.peek().is_none() {
                continue;
            }
            if !detailed {
                locations.push(Location::tier(&tier.id));
                continue;
            }
            for annotation in hits {
                let location = Location::tier(&tier.id).with_segment(&annotation.id);
                locations.push(match self.aligned_times(annotation) {
                    Some((start, end)) => location.with_time(format_time(start), format_time(end)),
                    None => location,
                });
            }
        }
        locations
    }
}
