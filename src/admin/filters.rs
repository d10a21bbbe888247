//! Sidebar list filters

use std::collections::{BTreeMap, HashMap};

use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;
use utoipa::ToSchema;

use super::{
    fields::FieldKind,
    site::ModelAdmin,
};
use crate::{
    error::{AppError, AppResult},
    repository::book_instances::DateCondition,
};

/// Date filter choices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateFilter {
    #[default]
    Any,
    Today,
    Past7Days,
    ThisMonth,
    ThisYear,
    NoDate,
    HasDate,
}

impl DateFilter {
    pub const ALL: [DateFilter; 7] = [
        DateFilter::Any,
        DateFilter::Today,
        DateFilter::Past7Days,
        DateFilter::ThisMonth,
        DateFilter::ThisYear,
        DateFilter::NoDate,
        DateFilter::HasDate,
    ];

    /// Query string value; `None` for "Any date"
    pub fn param(&self) -> Option<&'static str> {
        match self {
            DateFilter::Any => None,
            DateFilter::Today => Some("today"),
            DateFilter::Past7Days => Some("past_7_days"),
            DateFilter::ThisMonth => Some("this_month"),
            DateFilter::ThisYear => Some("this_year"),
            DateFilter::NoDate => Some("no_date"),
            DateFilter::HasDate => Some("has_date"),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DateFilter::Any => "Any date",
            DateFilter::Today => "Today",
            DateFilter::Past7Days => "Past 7 days",
            DateFilter::ThisMonth => "This month",
            DateFilter::ThisYear => "This year",
            DateFilter::NoDate => "No date",
            DateFilter::HasDate => "Has date",
        }
    }

    pub fn from_param(value: &str) -> Option<Self> {
        DateFilter::ALL
            .into_iter()
            .find(|f| f.param() == Some(value))
    }

    /// Storage condition for this choice, relative to `today`
    pub fn condition(&self, today: NaiveDate) -> Option<DateCondition> {
        let tomorrow = today + Duration::days(1);
        match self {
            DateFilter::Any => None,
            DateFilter::Today => Some(DateCondition::Between {
                from: today,
                until: tomorrow,
            }),
            DateFilter::Past7Days => Some(DateCondition::Between {
                from: today - Duration::days(7),
                until: tomorrow,
            }),
            DateFilter::ThisMonth => {
                let from = today.with_day(1)?;
                let until = if from.month() == 12 {
                    NaiveDate::from_ymd_opt(from.year() + 1, 1, 1)?
                } else {
                    NaiveDate::from_ymd_opt(from.year(), from.month() + 1, 1)?
                };
                Some(DateCondition::Between { from, until })
            }
            DateFilter::ThisYear => Some(DateCondition::Between {
                from: NaiveDate::from_ymd_opt(today.year(), 1, 1)?,
                until: NaiveDate::from_ymd_opt(today.year() + 1, 1, 1)?,
            }),
            DateFilter::NoDate => Some(DateCondition::IsNull),
            DateFilter::HasDate => Some(DateCondition::IsNotNull),
        }
    }
}

/// Selected value of one filter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterValue {
    Choice(&'static str),
    Date(DateFilter),
}

/// Filters selected through the list view query string
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActiveFilters {
    values: BTreeMap<&'static str, FilterValue>,
}

impl ActiveFilters {
    /// Read the model's `list_filter` fields from query parameters
    pub fn from_query(admin: &ModelAdmin, params: &HashMap<String, String>) -> AppResult<Self> {
        let mut values = BTreeMap::new();
        for field in admin.filter_fields() {
            let Some(raw) = params.get(field.name).filter(|v| !v.is_empty()) else {
                continue;
            };
            let value = match field.kind {
                FieldKind::Choice(choices) => choices
                    .iter()
                    .find(|(code, _)| *code == raw.as_str())
                    .map(|(code, _)| FilterValue::Choice(code)),
                FieldKind::Date => DateFilter::from_param(raw).map(FilterValue::Date),
                _ => None,
            }
            .ok_or_else(|| {
                AppError::BadRequest(format!("Invalid value for filter {}: {}", field.name, raw))
            })?;
            values.insert(field.name, value);
        }
        Ok(Self { values })
    }

    pub fn choice(&self, field: &str) -> Option<&'static str> {
        match self.values.get(field) {
            Some(FilterValue::Choice(code)) => Some(code),
            _ => None,
        }
    }

    pub fn date(&self, field: &str) -> DateFilter {
        match self.values.get(field) {
            Some(FilterValue::Date(filter)) => *filter,
            _ => DateFilter::Any,
        }
    }
}

/// One selectable entry of a sidebar filter
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FilterChoice {
    /// Query string value; absent for "All"
    pub value: Option<String>,
    pub label: String,
    pub selected: bool,
}

/// Sidebar filter with its choices
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ListFilterView {
    pub field: String,
    pub title: String,
    pub choices: Vec<FilterChoice>,
}

/// Build the sidebar for a model's `list_filter` fields
pub fn filter_views(admin: &ModelAdmin, active: &ActiveFilters) -> Vec<ListFilterView> {
    admin
        .filter_fields()
        .map(|field| {
            let choices = match field.kind {
                FieldKind::Choice(options) => {
                    let selected = active.choice(field.name);
                    std::iter::once(FilterChoice {
                        value: None,
                        label: "All".to_string(),
                        selected: selected.is_none(),
                    })
                    .chain(options.iter().map(|(code, label)| FilterChoice {
                        value: Some(code.to_string()),
                        label: label.to_string(),
                        selected: selected == Some(*code),
                    }))
                    .collect()
                }
                FieldKind::Date => {
                    let selected = active.date(field.name);
                    DateFilter::ALL
                        .iter()
                        .map(|f| FilterChoice {
                            value: f.param().map(String::from),
                            label: f.label().to_string(),
                            selected: *f == selected,
                        })
                        .collect()
                }
                _ => Vec::new(),
            };
            ListFilterView {
                field: field.name.to_string(),
                title: format!("By {}", field.label.to_lowercase()),
                choices,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::admin::site::AdminSite;
    use crate::admin::fields::ModelKind;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_date_conditions() {
        let today = day(2024, 12, 20);
        assert_eq!(DateFilter::Any.condition(today), None);
        assert_eq!(
            DateFilter::Today.condition(today),
            Some(DateCondition::Between { from: today, until: day(2024, 12, 21) })
        );
        assert_eq!(
            DateFilter::Past7Days.condition(today),
            Some(DateCondition::Between { from: day(2024, 12, 13), until: day(2024, 12, 21) })
        );
        assert_eq!(
            DateFilter::ThisMonth.condition(today),
            Some(DateCondition::Between { from: day(2024, 12, 1), until: day(2025, 1, 1) })
        );
        assert_eq!(
            DateFilter::ThisYear.condition(today),
            Some(DateCondition::Between { from: day(2024, 1, 1), until: day(2025, 1, 1) })
        );
        assert_eq!(DateFilter::NoDate.condition(today), Some(DateCondition::IsNull));
        assert_eq!(DateFilter::HasDate.condition(today), Some(DateCondition::IsNotNull));
    }

    #[test]
    fn test_parse_instance_filters() {
        let site = AdminSite::catalog(100);
        let admin = site.get(ModelKind::BookInstance).unwrap();

        let active =
            ActiveFilters::from_query(admin, &params(&[("status", "o"), ("due_back", "no_date")]))
                .unwrap();
        assert_eq!(active.choice("status"), Some("o"));
        assert_eq!(active.date("due_back"), DateFilter::NoDate);

        assert!(ActiveFilters::from_query(admin, &params(&[("status", "z")])).is_err());
        assert!(ActiveFilters::from_query(admin, &params(&[("due_back", "someday")])).is_err());
    }

    #[test]
    fn test_filters_ignored_on_models_without_them() {
        let site = AdminSite::catalog(100);
        let admin = site.get(ModelKind::Book).unwrap();
        let active = ActiveFilters::from_query(admin, &params(&[("status", "o")])).unwrap();
        assert_eq!(active, ActiveFilters::default());
        assert!(filter_views(admin, &active).is_empty());
    }

    #[test]
    fn test_filter_views_mark_selection() {
        let site = AdminSite::catalog(100);
        let admin = site.get(ModelKind::BookInstance).unwrap();
        let active = ActiveFilters::from_query(admin, &params(&[("status", "a")])).unwrap();
        let views = filter_views(admin, &active);

        assert_eq!(views.len(), 2);
        let status = &views[0];
        assert_eq!(status.title, "By status");
        let labels: Vec<&str> = status.choices.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["All", "Maintenance", "On loan", "Available", "Reserved"]);
        let selected: Vec<&str> = status
            .choices
            .iter()
            .filter(|c| c.selected)
            .map(|c| c.label.as_str())
            .collect();
        assert_eq!(selected, vec!["Available"]);

        let due_back = &views[1];
        assert_eq!(due_back.choices.len(), 7);
        assert!(due_back.choices[0].selected);
        assert_eq!(due_back.choices[0].label, "Any date");
    }
}
