use crate::model::FieldId;

/// What is wrong with a single form field.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub(crate) enum FieldIssue {
    #[error("{field}: \"{text}\" is not a number")]
    Unparseable { field: FieldId, text: String },
    #[error("{field}: value must be finite")]
    NotFinite { field: FieldId },
    #[error("{field}: {value} is not greater than zero")]
    NotPositive { field: FieldId, value: f64 },
}

impl FieldIssue {
    pub(crate) fn field(&self) -> FieldId {
        match self {
            FieldIssue::Unparseable { field, .. }
            | FieldIssue::NotFinite { field }
            | FieldIssue::NotPositive { field, .. } => *field,
        }
    }
}

/// Raised when one or more form fields do not hold a usable number.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[error("invalid input in {} field(s)", .issues.len())]
pub(crate) struct ValidationError {
    pub(crate) issues: Vec<FieldIssue>,
}

impl ValidationError {
    pub(crate) fn fields(&self) -> impl Iterator<Item = FieldId> + '_ {
        self.issues.iter().map(FieldIssue::field)
    }

    /// Dialog body: a fixed hint followed by one line per bad field.
    pub(crate) fn dialog_message(&self) -> String {
        let mut s = String::from("Please make sure every field is a valid positive number.\n");
        for issue in &self.issues {
            s.push('\n');
            s.push_str(&issue.to_string());
        }
        s
    }
}
