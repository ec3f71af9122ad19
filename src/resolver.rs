use serde_json::Value;
use tracing::trace;

use crate::context::ProviderContext;
use crate::errors::{ErrorData, ErrorKind, LookupError};
use crate::path::{pointer_of, PathExpression, PathForm, Segment};
use crate::settings::JsonSettings;
use crate::value::{wrap, WrappedValue};

/// What a path reached when it resolved.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolved {
    Value(WrappedValue),
    /// The property exists and holds JSON null.
    Null,
}

/// Why a path could not be resolved against a document.
#[derive(Debug, Clone, PartialEq)]
pub struct PathFailure {
    pub kind: ErrorKind,
    /// Pointer to the segment where the walk stopped.
    pub at: String,
    pub index: Option<i64>,
    pub length: Option<usize>,
    pub reason: Option<String>,
}

impl PathFailure {
    fn new(kind: ErrorKind, at: String) -> Self {
        Self { kind, at, index: None, length: None, reason: None }
    }

    fn index_out_of_range(at: String, index: i64, length: usize) -> Self {
        Self { index: Some(index), length: Some(length), ..Self::new(ErrorKind::IndexOutOfRange, at) }
    }

    /// Raise this failure for `path`.
    pub fn into_error(self, path: &PathExpression) -> LookupError {
        let mut data = ErrorData::default().with_path(path.as_str());
        data.index = self.index;
        data.length = self.length;
        data.reason = match self.reason {
            Some(reason) => Some(reason),
            None if self.at.is_empty() => None,
            None => Some(format!("stopped at `{}`", self.at)),
        };
        LookupError::new(self.kind, data)
    }
}

pub type ResolutionOutcome = Result<Resolved, PathFailure>;

/// Walk `segments` from `root`, returning the node they address.
pub fn walk<'a>(root: &'a Value, segments: &[Segment]) -> Result<&'a Value, PathFailure> {
    let mut current = root;
    for (depth, segment) in segments.iter().enumerate() {
        let here = || pointer_of(&segments[..=depth]);
        trace!(?segment, depth, "path step");
        current = match (current, segment) {
            (Value::Object(map), _) => map
                .get(segment.as_key().as_str())
                .ok_or_else(|| PathFailure::new(ErrorKind::PathNotFound, here()))?,
            (Value::Array(items), Segment::Index(i)) => usize::try_from(*i)
                .ok()
                .and_then(|idx| items.get(idx))
                .ok_or_else(|| PathFailure::index_out_of_range(here(), *i, items.len()))?,
            (Value::Array(_), Segment::Property(_)) => {
                return Err(PathFailure::new(ErrorKind::PathNotFound, here()))
            }
            // null included: a leaf cannot be walked into
            _ => return Err(PathFailure::new(ErrorKind::PrimitiveEncounteredMidPath, here())),
        };
    }
    Ok(current)
}

/// Resolve the segments of `path` against `root` and wrap the result.
/// Any relative step in `path` is ignored; see [`resolve_in`].
pub fn resolve(root: &Value, path: &PathExpression, settings: &JsonSettings) -> ResolutionOutcome {
    let node = walk(root, path.segments())?;
    match wrap(node, settings) {
        Ok(Some(value)) => Ok(Resolved::Value(value)),
        Ok(None) => Ok(Resolved::Null),
        Err(e) => Err(PathFailure {
            reason: e.data().reason.clone(),
            ..PathFailure::new(ErrorKind::ValueConversion, path.to_pointer())
        }),
    }
}

/// Resolve `path` for a lookup: relative paths address the context's
/// execution trail, everything else the supplied source object.
pub fn resolve_in(ctx: &ProviderContext, source: &Value, path: &PathExpression) -> ResolutionOutcome {
    match path.form() {
        PathForm::Relative { steps_back } => {
            let record = ctx.action(steps_back).ok_or_else(|| {
                PathFailure::index_out_of_range(
                    steps_back.to_string(),
                    i64::try_from(steps_back).unwrap_or(i64::MAX),
                    ctx.trail.len(),
                )
            })?;
            resolve(record, path, &ctx.settings)
        }
        PathForm::Pointer | PathForm::Dotted => resolve(source, path, &ctx.settings),
    }
}
