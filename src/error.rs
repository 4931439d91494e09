use thiserror::Error;

/// Errors raised while decoding an LBRN2 document.
///
/// Only structural problems are fatal. Dangling template references resolve
/// to empty geometry and malformed numeric fields fall back to defaults, so
/// neither appears here.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProjectError {
    /// An XML tag with no registered element constructor.
    #[error("unknown element \"{tag}\"")]
    UnknownElement { tag: String },

    /// A Shape node whose Type attribute names no known shape kind.
    #[error("unknown shape type \"{kind}\"")]
    UnknownShapeType { kind: String },

    /// A Shape node with no Type attribute at all.
    #[error("Shape element missing Type attribute")]
    MissingShapeType,

    /// The underlying XML stream was malformed.
    #[error("XML parsing error: {message}")]
    Xml { message: String },
}

impl From<quick_xml::Error> for ProjectError {
    fn from(err: quick_xml::Error) -> Self {
        ProjectError::Xml {
            message: err.to_string(),
        }
    }
}
