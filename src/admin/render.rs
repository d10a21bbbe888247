//! Generic list and change views

use serde::Serialize;
use serde_json::Value;
use utoipa::ToSchema;

use super::{
    fields::{capfirst, FieldKind, ModelKind, Widget},
    filters::{filter_views, ActiveFilters, ListFilterView},
    records::AdminRecord,
    site::{InlineAdmin, ModelAdmin},
};

/// Cell text for empty values
pub const EMPTY_VALUE_DISPLAY: &str = "-";

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Column {
    pub field: String,
    pub label: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ListRow {
    pub pk: String,
    pub cells: Vec<String>,
}

/// Change list: columns, rows, sidebar filters and pagination
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ListView {
    pub model: String,
    pub title: String,
    pub columns: Vec<Column>,
    pub rows: Vec<ListRow>,
    pub filters: Vec<ListFilterView>,
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
    pub num_pages: i64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ChoiceView {
    pub value: String,
    pub label: String,
}

/// One form field on a change view
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FieldView {
    pub name: String,
    pub label: String,
    pub help_text: String,
    pub required: bool,
    pub read_only: bool,
    pub widget: Widget,
    #[schema(value_type = Object)]
    pub value: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub choices: Option<Vec<ChoiceView>>,
    /// Target model of a relation field
    #[serde(skip_serializing_if = "Option::is_none")]
    pub related_model: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FieldsetView {
    pub name: Option<String>,
    pub rows: Vec<Vec<FieldView>>,
}

/// Tabular children on a parent's change view
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct InlineView {
    pub model: String,
    pub title: String,
    pub fk_name: String,
    pub columns: Vec<Column>,
    pub rows: Vec<ListRow>,
    pub extra: usize,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ChangeView {
    pub model: String,
    pub pk: String,
    pub title: String,
    pub fieldsets: Vec<FieldsetView>,
    pub inlines: Vec<InlineView>,
}

fn row<R: AdminRecord>(record: &R, fields: &[&'static str]) -> ListRow {
    ListRow {
        pk: record.pk(),
        cells: fields
            .iter()
            .map(|f| {
                record
                    .cell(f)
                    .unwrap_or_else(|| EMPTY_VALUE_DISPLAY.to_string())
            })
            .collect(),
    }
}

fn columns(model: ModelKind, fields: &[&'static str]) -> Vec<Column> {
    fields
        .iter()
        .map(|f| Column {
            field: f.to_string(),
            label: model.column_label(f),
        })
        .collect()
}

/// Render one page of records as a change list
pub fn render_list<R: AdminRecord>(
    admin: &ModelAdmin,
    records: &[R],
    filters: &ActiveFilters,
    total: i64,
    page: i64,
) -> ListView {
    let per_page = admin.list_per_page.max(1);
    ListView {
        model: admin.model.slug().to_string(),
        title: format!("Select {} to change", admin.model.verbose_name()),
        columns: columns(admin.model, &admin.list_display),
        rows: records.iter().map(|r| row(r, &admin.list_display)).collect(),
        filters: filter_views(admin, filters),
        total,
        page: page.max(1),
        per_page,
        num_pages: ((total + per_page - 1) / per_page).max(1),
    }
}

/// Render the change form of a record, followed by its inlines
pub fn render_change<R: AdminRecord>(
    admin: &ModelAdmin,
    record: &R,
    inlines: Vec<InlineView>,
) -> ChangeView {
    let fieldsets = admin
        .get_fieldsets()
        .into_iter()
        .map(|fieldset| FieldsetView {
            name: fieldset.name.map(String::from),
            rows: fieldset
                .rows
                .iter()
                .map(|names| {
                    names
                        .iter()
                        .filter_map(|name| admin.model.field(name))
                        .map(|spec| FieldView {
                            name: spec.name.to_string(),
                            label: spec.label.to_string(),
                            help_text: spec.help_text.to_string(),
                            required: spec.required,
                            read_only: !spec.editable,
                            widget: spec.widget(),
                            value: record.raw_value(spec.name),
                            choices: match spec.kind {
                                FieldKind::Choice(options) => Some(
                                    options
                                        .iter()
                                        .map(|(value, label)| ChoiceView {
                                            value: value.to_string(),
                                            label: label.to_string(),
                                        })
                                        .collect(),
                                ),
                                _ => None,
                            },
                            related_model: match spec.kind {
                                FieldKind::ForeignKey(m) | FieldKind::ManyToMany(m) => {
                                    Some(m.slug().to_string())
                                }
                                _ => None,
                            },
                        })
                        .collect()
                })
                .collect(),
        })
        .collect();

    ChangeView {
        model: admin.model.slug().to_string(),
        pk: record.pk(),
        title: format!("Change {}", admin.model.verbose_name()),
        fieldsets,
        inlines,
    }
}

/// Render children of one inline as a table
pub fn render_inline<C: AdminRecord>(inline: &InlineAdmin, children: &[C]) -> InlineView {
    let fields = inline.columns();
    InlineView {
        model: inline.model.slug().to_string(),
        title: capfirst(&inline.model.verbose_name_plural()),
        fk_name: inline.fk_name.to_string(),
        columns: columns(inline.model, &fields),
        rows: children.iter().map(|c| row(c, &fields)).collect(),
        extra: inline.extra,
    }
}
