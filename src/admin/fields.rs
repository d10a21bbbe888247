//! Record types and their field metadata

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::AppError;

/// Pseudo-field rendering the record's display string
pub const STR_FIELD: &str = "__str__";

/// Record types known to the admin site
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ModelKind {
    Genre,
    Language,
    Author,
    Book,
    BookInstance,
    User,
}

/// Form widget used by a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Widget {
    Text,
    TextArea,
    Date,
    Select,
    SelectMultiple,
    Checkbox,
    ReadOnly,
}

/// Storage kind of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Integer,
    Uuid,
    Boolean,
    Char { max_length: usize },
    Text { max_length: usize },
    Date,
    Choice(&'static [(&'static str, &'static str)]),
    ForeignKey(ModelKind),
    ManyToMany(ModelKind),
    /// Derived, never stored
    Computed,
}

/// Field metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    pub editable: bool,
    pub help_text: &'static str,
}

impl FieldSpec {
    const fn new(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            label,
            kind,
            required: false,
            editable: true,
            help_text: "",
        }
    }

    const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    const fn read_only(mut self) -> Self {
        self.editable = false;
        self
    }

    const fn help(mut self, help_text: &'static str) -> Self {
        self.help_text = help_text;
        self
    }

    pub fn widget(&self) -> Widget {
        if !self.editable {
            return Widget::ReadOnly;
        }
        match self.kind {
            FieldKind::Char { .. } | FieldKind::Integer | FieldKind::Uuid => Widget::Text,
            FieldKind::Text { .. } => Widget::TextArea,
            FieldKind::Date => Widget::Date,
            FieldKind::Boolean => Widget::Checkbox,
            FieldKind::Choice(_) | FieldKind::ForeignKey(_) => Widget::Select,
            FieldKind::ManyToMany(_) => Widget::SelectMultiple,
            FieldKind::Computed => Widget::ReadOnly,
        }
    }

    /// Stored, user-editable field
    pub fn is_form_field(&self) -> bool {
        self.editable && self.kind != FieldKind::Computed
    }
}

pub const LOAN_STATUS_CHOICES: &[(&str, &str)] = &[
    ("m", "Maintenance"),
    ("o", "On loan"),
    ("a", "Available"),
    ("r", "Reserved"),
];

const ID: FieldSpec = FieldSpec::new("id", "ID", FieldKind::Integer).read_only();

const GENRE_FIELDS: &[FieldSpec] = &[
    ID,
    FieldSpec::new("name", "Name", FieldKind::Char { max_length: 200 })
        .required()
        .help("Enter a book genre (e.g. Science Fiction, French Poetry etc.)"),
];

const LANGUAGE_FIELDS: &[FieldSpec] = &[
    ID,
    FieldSpec::new("name", "Name", FieldKind::Char { max_length: 200 })
        .required()
        .help("Enter the book's natural language (e.g. English (South Africa), Tswana, Zulu etc.)"),
];

const AUTHOR_FIELDS: &[FieldSpec] = &[
    ID,
    FieldSpec::new("first_name", "First name", FieldKind::Char { max_length: 100 }),
    FieldSpec::new("surname", "Surname", FieldKind::Char { max_length: 100 }),
    FieldSpec::new("date_of_birth", "Birth Date", FieldKind::Date),
    FieldSpec::new("date_of_death", "Death date", FieldKind::Date),
];

const BOOK_FIELDS: &[FieldSpec] = &[
    ID,
    FieldSpec::new("title", "Title", FieldKind::Char { max_length: 200 })
        .required()
        .help("Enter the book's title"),
    FieldSpec::new("author", "Author", FieldKind::ForeignKey(ModelKind::Author)),
    FieldSpec::new("summary", "Summary", FieldKind::Text { max_length: 1000 })
        .required()
        .help("Enter a brief description of the book"),
    FieldSpec::new("isbn", "ISBN", FieldKind::Char { max_length: 13 })
        .required()
        .help("13 Character ISBN number"),
    FieldSpec::new("genre", "Genre", FieldKind::ManyToMany(ModelKind::Genre))
        .required()
        .help("Select a genre for this book"),
    FieldSpec::new("language", "Language", FieldKind::ForeignKey(ModelKind::Language)),
    FieldSpec::new("display_genre", "Genre", FieldKind::Computed).read_only(),
];

const BOOK_INSTANCE_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("id", "Id", FieldKind::Uuid)
        .read_only()
        .help("Unique ID for this particular book across whole library"),
    FieldSpec::new("book", "Book", FieldKind::ForeignKey(ModelKind::Book)).required(),
    FieldSpec::new("imprint", "Imprint", FieldKind::Char { max_length: 7 })
        .required()
        .help("This identifies a particular publisher or registrant. May be up to 7 digits."),
    FieldSpec::new("due_back", "Due back", FieldKind::Date),
    FieldSpec::new("borrower", "Borrower", FieldKind::ForeignKey(ModelKind::User)),
    FieldSpec::new("status", "Status", FieldKind::Choice(LOAN_STATUS_CHOICES))
        .help("Book availability"),
];

const USER_FIELDS: &[FieldSpec] = &[
    ID,
    FieldSpec::new("username", "Username", FieldKind::Char { max_length: 150 }).required(),
    FieldSpec::new("first_name", "First name", FieldKind::Char { max_length: 150 }),
    FieldSpec::new("last_name", "Last name", FieldKind::Char { max_length: 150 }),
    FieldSpec::new("email", "Email address", FieldKind::Char { max_length: 254 }),
    FieldSpec::new("is_active", "Active", FieldKind::Boolean),
    FieldSpec::new("is_staff", "Staff status", FieldKind::Boolean),
    FieldSpec::new("is_superuser", "Superuser status", FieldKind::Boolean),
];

impl ModelKind {
    pub const ALL: [ModelKind; 6] = [
        ModelKind::Author,
        ModelKind::Book,
        ModelKind::BookInstance,
        ModelKind::Genre,
        ModelKind::Language,
        ModelKind::User,
    ];

    /// URL segment
    pub fn slug(&self) -> &'static str {
        match self {
            ModelKind::Genre => "genre",
            ModelKind::Language => "language",
            ModelKind::Author => "author",
            ModelKind::Book => "book",
            ModelKind::BookInstance => "bookinstance",
            ModelKind::User => "user",
        }
    }

    pub fn verbose_name(&self) -> &'static str {
        match self {
            ModelKind::BookInstance => "book instance",
            other => other.slug(),
        }
    }

    pub fn verbose_name_plural(&self) -> String {
        format!("{}s", self.verbose_name())
    }

    pub fn fields(&self) -> &'static [FieldSpec] {
        match self {
            ModelKind::Genre => GENRE_FIELDS,
            ModelKind::Language => LANGUAGE_FIELDS,
            ModelKind::Author => AUTHOR_FIELDS,
            ModelKind::Book => BOOK_FIELDS,
            ModelKind::BookInstance => BOOK_INSTANCE_FIELDS,
            ModelKind::User => USER_FIELDS,
        }
    }

    pub fn field(&self, name: &str) -> Option<&'static FieldSpec> {
        self.fields().iter().find(|f| f.name == name)
    }

    /// Fields shown on a default change form
    pub fn form_fields(&self) -> Vec<&'static str> {
        self.fields()
            .iter()
            .filter(|f| f.is_form_field())
            .map(|f| f.name)
            .collect()
    }

    /// Column header for a list or inline column
    pub fn column_label(&self, name: &str) -> String {
        if name == STR_FIELD {
            return capfirst(self.verbose_name());
        }
        self.field(name)
            .map(|f| f.label.to_string())
            .unwrap_or_else(|| capfirst(&name.replace('_', " ")))
    }
}

impl std::str::FromStr for ModelKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ModelKind::ALL
            .into_iter()
            .find(|m| m.slug() == s)
            .ok_or_else(|| AppError::NotFound(format!("Unknown model: {}", s)))
    }
}

pub(crate) fn capfirst(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LoanStatus;

    #[test]
    fn test_slug_roundtrip() {
        for model in ModelKind::ALL {
            assert_eq!(model.slug().parse::<ModelKind>().unwrap(), model);
        }
        assert!("loan".parse::<ModelKind>().is_err());
    }

    #[test]
    fn test_status_choices_match_enum() {
        let expected: Vec<(&str, &str)> = LoanStatus::ALL
            .iter()
            .map(|s| (s.code(), s.label()))
            .collect();
        assert_eq!(LOAN_STATUS_CHOICES.to_vec(), expected);
    }

    #[test]
    fn test_form_fields_skip_ids_and_computed() {
        assert_eq!(
            ModelKind::Book.form_fields(),
            vec!["title", "author", "summary", "isbn", "genre", "language"]
        );
        assert_eq!(ModelKind::Genre.form_fields(), vec!["name"]);
        assert_eq!(
            ModelKind::BookInstance.form_fields(),
            vec!["book", "imprint", "due_back", "borrower", "status"]
        );
    }

    #[test]
    fn test_column_labels() {
        assert_eq!(ModelKind::Genre.column_label(STR_FIELD), "Genre");
        assert_eq!(ModelKind::BookInstance.column_label(STR_FIELD), "Book instance");
        assert_eq!(ModelKind::Book.column_label("display_genre"), "Genre");
        assert_eq!(ModelKind::Author.column_label("date_of_birth"), "Birth Date");
        assert_eq!(ModelKind::BookInstance.column_label("due_back"), "Due back");
    }

    #[test]
    fn test_widgets() {
        let instance = ModelKind::BookInstance;
        assert_eq!(instance.field("id").unwrap().widget(), Widget::ReadOnly);
        assert_eq!(instance.field("status").unwrap().widget(), Widget::Select);
        assert_eq!(ModelKind::Book.field("genre").unwrap().widget(), Widget::SelectMultiple);
        assert_eq!(ModelKind::Book.field("summary").unwrap().widget(), Widget::TextArea);
    }
}
