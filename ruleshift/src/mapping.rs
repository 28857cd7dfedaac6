//! Field mapping between the Cursor and Windsurf dialects
//!
//! Both dialects describe the same four activation policies. Cursor spreads
//! them over `alwaysApply`, `globs` and `description`; Windsurf names them
//! with a single `trigger`. Keys that belong to neither dialect are carried
//! over untouched, in their original order, after the recognized fields.

use crate::dialect::{ALWAYS_APPLY_KEY, DESCRIPTION_KEY, TRIGGER_KEY};
use crate::error::MappingError;
use crate::frontmatter::Metadata;
use crate::globs::GLOBS_KEY;
use serde::{Deserialize, Serialize};
use serde_yaml_ng::Value;
use std::fmt;
use std::str::FromStr;

/// Windsurf activation policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trigger {
    /// Only applied when mentioned explicitly
    Manual,
    /// Applied to every request
    AlwaysOn,
    /// The model decides, guided by the description
    ModelDecision,
    /// Applied to files matching `globs`
    Glob,
}

impl Trigger {
    /// Value as written in the `trigger` field
    pub fn as_str(self) -> &'static str {
        match self {
            Trigger::Manual => "manual",
            Trigger::AlwaysOn => "always_on",
            Trigger::ModelDecision => "model_decision",
            Trigger::Glob => "glob",
        }
    }
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Trigger {
    type Err = MappingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "manual" => Ok(Trigger::Manual),
            "always_on" => Ok(Trigger::AlwaysOn),
            "model_decision" => Ok(Trigger::ModelDecision),
            "glob" => Ok(Trigger::Glob),
            other => Err(MappingError::UnknownTrigger(other.to_string())),
        }
    }
}

/// Typed view of Cursor rule metadata
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CursorFrontmatter {
    /// When the rule should be used
    pub description: Option<String>,
    /// Comma-joined glob list
    pub glob_pattern: Option<String>,
    /// Whether the rule is always in context
    pub always_apply: Option<bool>,
    /// Every other key, in source order
    pub extra: Metadata,
}

impl CursorFrontmatter {
    /// Extract the recognized Cursor fields from parsed metadata
    ///
    /// Never fails. An `alwaysApply` that is not a boolean is kept in
    /// [`extra`](Self::extra) as-is.
    pub fn from_metadata(metadata: Metadata) -> Self {
        let mut frontmatter = Self::default();
        for (key, value) in metadata {
            match key.as_str() {
                DESCRIPTION_KEY => {
                    take_text(&mut frontmatter.description, &mut frontmatter.extra, key, value)
                }
                GLOBS_KEY => {
                    take_text(&mut frontmatter.glob_pattern, &mut frontmatter.extra, key, value)
                }
                ALWAYS_APPLY_KEY => match value {
                    Value::Bool(flag) => frontmatter.always_apply = Some(flag),
                    other => {
                        frontmatter.extra.insert(key, other);
                    }
                },
                _ => {
                    frontmatter.extra.insert(key, value);
                }
            }
        }
        frontmatter
    }

    /// Flatten back into metadata as `description`, `globs`, `alwaysApply`, extras
    pub fn into_metadata(self) -> Metadata {
        let mut metadata = Metadata::new();
        if let Some(description) = self.description {
            metadata.insert(DESCRIPTION_KEY.to_string(), Value::String(description));
        }
        if let Some(globs) = self.glob_pattern {
            metadata.insert(GLOBS_KEY.to_string(), Value::String(globs));
        }
        if let Some(always_apply) = self.always_apply {
            metadata.insert(ALWAYS_APPLY_KEY.to_string(), Value::Bool(always_apply));
        }
        append_extra(&mut metadata, self.extra);
        metadata
    }
}

/// Typed view of Windsurf rule metadata
#[derive(Debug, Clone, PartialEq)]
pub struct WindsurfFrontmatter {
    /// Activation policy
    pub trigger: Trigger,
    /// When the rule should be used
    pub description: Option<String>,
    /// Comma-joined glob list
    pub glob_pattern: Option<String>,
    /// Every other key, in source order
    pub extra: Metadata,
}

impl WindsurfFrontmatter {
    /// Create a view with only a trigger
    pub fn new(trigger: Trigger) -> Self {
        Self {
            trigger,
            description: None,
            glob_pattern: None,
            extra: Metadata::new(),
        }
    }

    /// Extract the recognized Windsurf fields from parsed metadata
    ///
    /// Fails when `trigger` is missing or not one of the four known values.
    pub fn from_metadata(metadata: Metadata) -> Result<Self, MappingError> {
        let mut trigger = None;
        let mut description = None;
        let mut glob_pattern = None;
        let mut extra = Metadata::new();

        for (key, value) in metadata {
            match key.as_str() {
                TRIGGER_KEY => trigger = Some(parse_trigger(&value)?),
                DESCRIPTION_KEY => take_text(&mut description, &mut extra, key, value),
                GLOBS_KEY => take_text(&mut glob_pattern, &mut extra, key, value),
                _ => {
                    extra.insert(key, value);
                }
            }
        }

        Ok(Self {
            trigger: trigger.ok_or(MappingError::MissingTrigger)?,
            description,
            glob_pattern,
            extra,
        })
    }

    /// Flatten back into metadata as `trigger`, `description`, `globs`, extras
    pub fn into_metadata(self) -> Metadata {
        let mut metadata = Metadata::new();
        metadata.insert(
            TRIGGER_KEY.to_string(),
            Value::String(self.trigger.as_str().to_string()),
        );
        if let Some(description) = self.description {
            metadata.insert(DESCRIPTION_KEY.to_string(), Value::String(description));
        }
        if let Some(globs) = self.glob_pattern {
            metadata.insert(GLOBS_KEY.to_string(), Value::String(globs));
        }
        append_extra(&mut metadata, self.extra);
        metadata
    }
}

/// Map Cursor fields to the equivalent Windsurf trigger
///
/// Precedence is `alwaysApply: true`, then globs, then description, then
/// manual. Every input maps.
pub fn cursor_to_windsurf(cursor: CursorFrontmatter) -> WindsurfFrontmatter {
    let CursorFrontmatter {
        description,
        glob_pattern,
        always_apply,
        extra,
    } = cursor;

    let (trigger, description, glob_pattern) = if always_apply == Some(true) {
        (Trigger::AlwaysOn, description, glob_pattern)
    } else if glob_pattern.is_some() {
        (Trigger::Glob, description, glob_pattern)
    } else if description.is_some() {
        (Trigger::ModelDecision, description, None)
    } else {
        (Trigger::Manual, None, None)
    };

    WindsurfFrontmatter {
        trigger,
        description,
        glob_pattern,
        extra,
    }
}

/// Map a Windsurf trigger to the equivalent Cursor fields
///
/// `glob` needs `globs` and `model_decision` needs `description`; nothing is
/// returned unless the whole mapping succeeds.
pub fn windsurf_to_cursor(windsurf: WindsurfFrontmatter) -> Result<CursorFrontmatter, MappingError> {
    let WindsurfFrontmatter {
        trigger,
        description,
        glob_pattern,
        extra,
    } = windsurf;

    let (always_apply, description, glob_pattern) = match trigger {
        Trigger::AlwaysOn => (true, description, glob_pattern),
        Trigger::Manual => (false, None, None),
        Trigger::Glob => {
            let globs = glob_pattern.ok_or(MappingError::MissingGlobs)?;
            (false, description, Some(globs))
        }
        Trigger::ModelDecision => {
            let description = description.ok_or(MappingError::MissingDescription)?;
            (false, Some(description), None)
        }
    };

    Ok(CursorFrontmatter {
        description,
        glob_pattern,
        always_apply: Some(always_apply),
        extra,
    })
}

/// Convert parsed Cursor metadata into Windsurf metadata
pub fn map_cursor_metadata(metadata: Metadata) -> Metadata {
    cursor_to_windsurf(CursorFrontmatter::from_metadata(metadata)).into_metadata()
}

/// Convert parsed Windsurf metadata into Cursor metadata
pub fn map_windsurf_metadata(metadata: Metadata) -> Result<Metadata, MappingError> {
    let windsurf = WindsurfFrontmatter::from_metadata(metadata)?;
    Ok(windsurf_to_cursor(windsurf)?.into_metadata())
}

fn parse_trigger(value: &Value) -> Result<Trigger, MappingError> {
    match value {
        Value::String(trigger) => trigger.trim().parse(),
        Value::Null => Err(MappingError::MissingTrigger),
        other => Err(MappingError::UnknownTrigger(
            scalar_text(other).unwrap_or_else(|| "<non-scalar>".to_string()),
        )),
    }
}

/// Store a text field, or keep the raw value when it cannot be read as text
///
/// Null and blank values count as absent and are dropped.
fn take_text(slot: &mut Option<String>, extra: &mut Metadata, key: String, value: Value) {
    let text = match &value {
        Value::Null => return,
        Value::Sequence(items) => {
            let parts: Option<Vec<String>> = items
                .iter()
                .filter(|item| !is_blank(item))
                .map(scalar_text)
                .collect();
            match parts {
                Some(parts) if parts.is_empty() => return,
                Some(parts) => Some(parts.join(",")),
                None => None,
            }
        }
        Value::Mapping(_) | Value::Tagged(_) => None,
        scalar => match scalar_text(scalar) {
            Some(text) => Some(text),
            None => return,
        },
    };

    match text {
        Some(text) => *slot = Some(text),
        None => {
            extra.insert(key, value);
        }
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(text) => text.trim().is_empty(),
        _ => false,
    }
}

/// Plain text of a non-blank scalar
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) if !text.trim().is_empty() => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

fn append_extra(metadata: &mut Metadata, extra: Metadata) {
    for (key, value) in extra {
        metadata.entry(key).or_insert(value);
    }
}
