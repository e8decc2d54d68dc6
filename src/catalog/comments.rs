/// Objects that carry a `COMMENT ON` description.
pub trait Commentable {
    fn description(&self) -> Option<&str>;
}

/// What it takes to make the loaded description match the configured one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommentAction {
    Set { description: String },
    Drop,
}

/// Compares descriptions of an object present in both trees.
///
/// Creation and removal of the object itself carry their own comment
/// handling, so one-sided pairs yield nothing.
pub fn diff_comments<T: Commentable>(
    configured: Option<&T>,
    loaded: Option<&T>,
) -> Option<CommentAction> {
    let (configured, loaded) = (configured?, loaded?);
    match (configured.description(), loaded.description()) {
        (Some(wanted), current) if current != Some(wanted) => Some(CommentAction::Set {
            description: wanted.to_string(),
        }),
        (None, Some(_)) => Some(CommentAction::Drop),
        _ => None,
    }
}
