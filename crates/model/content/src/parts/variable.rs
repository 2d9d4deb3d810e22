use model_core::{FilePart, Ident};

/// Category reported by every [`ModelVariable`].
pub const VARIABLE_CATEGORY: &str = "variable";

/// A `<command> == <value>` assignment that does not reference a file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModelVariable {
    ident: Ident,
    command: String,
    value: String,
    comment: Option<String>,
}

impl ModelVariable {
    pub fn new(ident: Ident, command: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            ident,
            command: command.into(),
            value: value.into(),
            comment: None,
        }
    }

    #[must_use]
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

impl FilePart for ModelVariable {
    fn id(&self) -> Ident {
        self.ident
    }

    fn category(&self) -> &str {
        VARIABLE_CATEGORY
    }

    fn command(&self) -> &str {
        &self.command
    }

    fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    fn printable(&self) -> String {
        match &self.comment {
            Some(comment) => format!("{} == {} ! {}", self.command, self.value, comment),
            None => format!("{} == {}", self.command, self.value),
        }
    }
}
