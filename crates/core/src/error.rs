use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Malformed path data {input:?}: {reason}")]
    MalformedPathData { input: String, reason: String },
    #[error("Incompatible path shapes: {0}")]
    ShapeMismatch(String),
    #[error("Invalid value type: {0}")]
    InvalidValueType(String),
    #[error("Keyframe {index} has no value and none could be chained in")]
    MissingKeyframeValue { index: usize },
    #[error("An animation needs at least one value or keyframe")]
    EmptyKeyframes,
    #[error("The motion path must not be empty")]
    EmptyPath,
    #[error("A property needs at least one animation")]
    NoAnimations,
    #[error("Property is not registered on this timeline")]
    UnknownProperty,
    #[error("Malformed scene JSON file: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn malformed(input: &str, reason: impl Into<String>) -> Self {
        Error::MalformedPathData {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}
