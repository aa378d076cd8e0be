//! ADM `axml` interpretation.
//!
//! The Audio Definition Model payload is XML, but only a thin slice of it
//! matters here: `audioObject` elements and their nested `audioTrackUIDRef`
//! children, in document order. A permissive tag scanner extracts exactly
//! that descent; namespaces, attributes other than `importance`, and every
//! other element are ignored.

use crate::error::{AdmError, Result};

/// Importance assigned to objects that carry no `importance` attribute.
pub const DEFAULT_IMPORTANCE: i32 = 10;

/// One ADM audio object: an ordered list of track-UID references.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AdmObject {
    /// Track-UID references in document order.
    pub track_uid_refs: Vec<String>,
    /// Importance from the ADM attribute; absent means maximal.
    pub importance: i32,
}

impl AdmObject {
    /// Number of channels this object occupies.
    pub fn num_channels(&self) -> usize {
        self.track_uid_refs.len()
    }
}

/// Extract the ordered audio objects from an `axml` payload.
///
/// Objects whose importance is below `importance_threshold` are dropped.
pub fn parse_audio_objects(axml: &[u8], importance_threshold: i32) -> Result<Vec<AdmObject>> {
    let text = std::str::from_utf8(axml)
        .map_err(|e| AdmError::InvalidAxml(format!("not valid UTF-8: {}", e)))?;

    let mut objects = Vec::new();
    let mut current: Option<AdmObject> = None;
    let mut rest = text;

    while let Some(open) = rest.find('<') {
        rest = &rest[open + 1..];
        let close = rest
            .find('>')
            .ok_or_else(|| AdmError::InvalidAxml("unterminated tag".to_string()))?;
        let tag = &rest[..close];
        rest = &rest[close + 1..];

        if let Some(name) = tag.strip_prefix('/') {
            match element_name(name) {
                "audioObject" => {
                    if let Some(object) = current.take() {
                        if object.importance >= importance_threshold {
                            objects.push(object);
                        } else {
                            tracing::debug!(
                                importance = object.importance,
                                threshold = importance_threshold,
                                "Dropping audio object below importance threshold"
                            );
                        }
                    }
                }
                _ => {}
            }
            continue;
        }

        let self_closing = tag.ends_with('/');
        let tag = tag.trim_end_matches('/');
        match element_name(tag) {
            "audioObject" => {
                current = Some(AdmObject {
                    track_uid_refs: Vec::new(),
                    importance: parse_importance(tag)?,
                });
                if self_closing {
                    if let Some(object) = current.take() {
                        if object.importance >= importance_threshold {
                            objects.push(object);
                        }
                    }
                }
            }
            "audioTrackUIDRef" if !self_closing => {
                let end = rest
                    .find('<')
                    .ok_or_else(|| AdmError::InvalidAxml("unterminated audioTrackUIDRef".to_string()))?;
                if let Some(object) = current.as_mut() {
                    object.track_uid_refs.push(rest[..end].trim().to_string());
                }
                rest = &rest[end..];
            }
            _ => {}
        }
    }

    Ok(objects)
}

/// Element name of a tag: everything up to the first attribute.
fn element_name(tag: &str) -> &str {
    tag.split_whitespace().next().unwrap_or("")
}

/// Read an `importance="N"` attribute; absent means maximal importance.
fn parse_importance(tag: &str) -> Result<i32> {
    let Some(position) = tag.find("importance=\"") else {
        return Ok(DEFAULT_IMPORTANCE);
    };
    let value = &tag[position + "importance=\"".len()..];
    let end = value
        .find('"')
        .ok_or_else(|| AdmError::InvalidAxml("unterminated importance attribute".to_string()))?;
    value[..end]
        .parse::<i32>()
        .map_err(|_| AdmError::InvalidAxml(format!("bad importance value: {}", &value[..end])))
}
