//! Admin site registry
//!
//! One [`ModelAdmin`] per record type, built at startup and shared through
//! the application state.

use std::collections::HashMap;

use serde::Serialize;
use utoipa::ToSchema;

use super::fields::{capfirst, FieldKind, FieldSpec, ModelKind, STR_FIELD};

/// Group of form rows, optionally titled
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fieldset {
    pub name: Option<&'static str>,
    /// Fields sharing a row are rendered side by side
    pub rows: Vec<Vec<&'static str>>,
}

impl Fieldset {
    pub fn new(name: Option<&'static str>, fields: &[&'static str]) -> Self {
        Self {
            name,
            rows: fields.iter().map(|f| vec![*f]).collect(),
        }
    }
}

/// Tabular child records shown on the parent's change view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InlineAdmin {
    pub model: ModelKind,
    /// Child field pointing back to the parent
    pub fk_name: &'static str,
    /// Blank rows offered for new children
    pub extra: usize,
}

impl InlineAdmin {
    pub fn tabular(model: ModelKind, fk_name: &'static str) -> Self {
        Self {
            model,
            fk_name,
            extra: 0,
        }
    }

    /// Inline columns: the child's editable fields minus the parent link
    pub fn columns(&self) -> Vec<&'static str> {
        self.model
            .form_fields()
            .into_iter()
            .filter(|f| *f != self.fk_name)
            .collect()
    }
}

/// Presentation settings for one record type
#[derive(Debug, Clone)]
pub struct ModelAdmin {
    pub model: ModelKind,
    pub list_display: Vec<&'static str>,
    pub list_filter: Vec<&'static str>,
    pub list_per_page: i64,
    fieldsets: Option<Vec<Fieldset>>,
    pub inlines: Vec<InlineAdmin>,
}

impl ModelAdmin {
    pub fn new(model: ModelKind) -> Self {
        Self {
            model,
            list_display: vec![STR_FIELD],
            list_filter: Vec::new(),
            list_per_page: 100,
            fieldsets: None,
            inlines: Vec::new(),
        }
    }

    pub fn list_display(mut self, columns: &[&'static str]) -> Self {
        self.list_display = columns.to_vec();
        self
    }

    pub fn list_filter(mut self, fields: &[&'static str]) -> Self {
        self.list_filter = fields.to_vec();
        self
    }

    pub fn list_per_page(mut self, per_page: i64) -> Self {
        self.list_per_page = per_page;
        self
    }

    /// Flat field layout; an inner slice with several names is one row
    pub fn fields(mut self, rows: &[&[&'static str]]) -> Self {
        self.fieldsets = Some(vec![Fieldset {
            name: None,
            rows: rows.iter().map(|row| row.to_vec()).collect(),
        }]);
        self
    }

    pub fn fieldsets(mut self, fieldsets: Vec<Fieldset>) -> Self {
        self.fieldsets = Some(fieldsets);
        self
    }

    pub fn inline(mut self, inline: InlineAdmin) -> Self {
        self.inlines.push(inline);
        self
    }

    /// Configured layout, or one untitled fieldset with every editable field
    pub fn get_fieldsets(&self) -> Vec<Fieldset> {
        match &self.fieldsets {
            Some(fieldsets) => fieldsets.clone(),
            None => vec![Fieldset::new(None, &self.model.form_fields())],
        }
    }

    pub fn filter_fields(&self) -> impl Iterator<Item = &'static FieldSpec> + '_ {
        self.list_filter
            .iter()
            .filter_map(move |name| self.model.field(name))
    }

    /// Configuration problems, empty when the admin is consistent
    pub fn check(&self) -> Vec<String> {
        let model = self.model.slug();
        let mut problems = Vec::new();

        for column in &self.list_display {
            if *column != STR_FIELD && self.model.field(column).is_none() {
                problems.push(format!("{}: unknown list_display column '{}'", model, column));
            }
        }
        for name in &self.list_filter {
            match self.model.field(name).map(|f| f.kind) {
                Some(FieldKind::Choice(_)) | Some(FieldKind::Date) => {}
                Some(_) => problems.push(format!("{}: cannot filter on '{}'", model, name)),
                None => problems.push(format!("{}: unknown list_filter field '{}'", model, name)),
            }
        }
        for fieldset in self.get_fieldsets() {
            for name in fieldset.rows.iter().flatten() {
                if self.model.field(name).is_none() {
                    problems.push(format!("{}: unknown field '{}' in fieldsets", model, name));
                }
            }
        }
        for inline in &self.inlines {
            match inline.model.field(inline.fk_name).map(|f| f.kind) {
                Some(FieldKind::ForeignKey(parent)) if parent == self.model => {}
                _ => problems.push(format!(
                    "{}: inline {} has no foreign key '{}' to {}",
                    model,
                    inline.model.slug(),
                    inline.fk_name,
                    model
                )),
            }
        }
        problems
    }
}

/// Entry of the admin index
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ModelEntry {
    pub model: String,
    pub name: String,
    pub url: String,
}

/// Admin index grouped by application
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SiteIndex {
    pub site_header: String,
    pub catalog: Vec<ModelEntry>,
    pub authentication: Vec<ModelEntry>,
}

/// Registry of model admins
#[derive(Debug, Clone)]
pub struct AdminSite {
    pub site_header: String,
    registry: HashMap<ModelKind, ModelAdmin>,
}

impl AdminSite {
    pub fn new(site_header: impl Into<String>) -> Self {
        Self {
            site_header: site_header.into(),
            registry: HashMap::new(),
        }
    }

    pub fn register(&mut self, admin: ModelAdmin) {
        self.registry.insert(admin.model, admin);
    }

    /// Catalog configuration
    pub fn catalog(list_per_page: i64) -> Self {
        let mut site = Self::new("LocalLibrary administration");

        site.register(ModelAdmin::new(ModelKind::Genre));
        site.register(ModelAdmin::new(ModelKind::Language));

        site.register(
            ModelAdmin::new(ModelKind::Author)
                .list_display(&["surname", "first_name", "date_of_birth", "date_of_death"])
                .fields(&[&["first_name"], &["surname"], &["date_of_birth", "date_of_death"]])
                .inline(InlineAdmin::tabular(ModelKind::Book, "author")),
        );

        site.register(
            ModelAdmin::new(ModelKind::Book)
                .list_display(&["title", "author", "display_genre"])
                .inline(InlineAdmin::tabular(ModelKind::BookInstance, "book")),
        );

        site.register(
            ModelAdmin::new(ModelKind::BookInstance)
                .list_display(&["book", "status", "borrower", "due_back", "id"])
                .list_filter(&["status", "due_back"])
                .fieldsets(vec![
                    Fieldset::new(None, &["book", "imprint", "id"]),
                    Fieldset::new(Some("Availability"), &["status", "due_back", "borrower"]),
                ]),
        );

        site.register(ModelAdmin::new(ModelKind::User));

        for admin in site.registry.values_mut() {
            admin.list_per_page = list_per_page;
        }
        site
    }

    pub fn get(&self, model: ModelKind) -> Option<&ModelAdmin> {
        self.registry.get(&model)
    }

    /// Registered models in index order
    pub fn models(&self) -> Vec<ModelKind> {
        ModelKind::ALL
            .into_iter()
            .filter(|m| self.registry.contains_key(m))
            .collect()
    }

    pub fn check(&self) -> Vec<String> {
        self.models()
            .into_iter()
            .filter_map(|m| self.get(m))
            .flat_map(ModelAdmin::check)
            .collect()
    }

    pub fn index(&self) -> SiteIndex {
        let entry = |model: ModelKind| ModelEntry {
            model: model.slug().to_string(),
            name: capfirst(&model.verbose_name_plural()),
            url: format!("/api/v1/admin/{}", model.slug()),
        };
        let (authentication, catalog): (Vec<_>, Vec<_>) = self
            .models()
            .into_iter()
            .partition(|m| *m == ModelKind::User);

        SiteIndex {
            site_header: self.site_header.clone(),
            catalog: catalog.into_iter().map(entry).collect(),
            authentication: authentication.into_iter().map(entry).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_is_consistent() {
        let site = AdminSite::catalog(100);
        assert_eq!(site.check(), Vec::<String>::new());
        assert_eq!(site.models().len(), 6);
    }

    #[test]
    fn test_defaults_show_display_string() {
        let site = AdminSite::catalog(100);
        let genre = site.get(ModelKind::Genre).unwrap();
        assert_eq!(genre.list_display, vec![STR_FIELD]);
        assert_eq!(genre.get_fieldsets(), vec![Fieldset::new(None, &["name"])]);
        assert_eq!(genre.list_per_page, 100);
    }

    #[test]
    fn test_author_layout() {
        let site = AdminSite::catalog(100);
        let author = site.get(ModelKind::Author).unwrap();
        let fieldsets = author.get_fieldsets();
        assert_eq!(fieldsets.len(), 1);
        assert_eq!(
            fieldsets[0].rows,
            vec![
                vec!["first_name"],
                vec!["surname"],
                vec!["date_of_birth", "date_of_death"],
            ]
        );
        assert_eq!(
            author.inlines[0].columns(),
            vec!["title", "summary", "isbn", "genre", "language"]
        );
    }

    #[test]
    fn test_instance_fieldsets() {
        let site = AdminSite::catalog(25);
        let instance = site.get(ModelKind::BookInstance).unwrap();
        let fieldsets = instance.get_fieldsets();
        assert_eq!(fieldsets[0].name, None);
        assert_eq!(fieldsets[0].rows, vec![vec!["book"], vec!["imprint"], vec!["id"]]);
        assert_eq!(fieldsets[1].name, Some("Availability"));
        assert_eq!(
            fieldsets[1].rows,
            vec![vec!["status"], vec!["due_back"], vec!["borrower"]]
        );
        assert_eq!(instance.list_per_page, 25);
    }

    #[test]
    fn test_check_reports_bad_configuration() {
        let admin = ModelAdmin::new(ModelKind::Book)
            .list_display(&["title", "publisher"])
            .list_filter(&["title"])
            .inline(InlineAdmin::tabular(ModelKind::Genre, "book"));
        let problems = admin.check();
        assert_eq!(problems.len(), 3);
        assert!(problems[0].contains("publisher"));
    }

    #[test]
    fn test_index_groups_users_apart() {
        let index = AdminSite::catalog(100).index();
        let names: Vec<&str> = index.catalog.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["Authors", "Books", "Book instances", "Genres", "Languages"]
        );
        assert_eq!(index.authentication[0].url, "/api/v1/admin/user");
    }
}
