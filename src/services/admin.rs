//! Admin views over the catalog

use std::{collections::HashMap, sync::Arc};

use chrono::Local;
use uuid::Uuid;

use crate::{
    admin::{
        filters::ActiveFilters,
        render::{render_change, render_inline, render_list, ChangeView, InlineView, ListView},
        site::{ModelAdmin, SiteIndex},
        AdminSite, ModelKind,
    },
    error::{AppError, AppResult},
    models::LoanStatus,
    repository::{
        book_instances::InstanceFilter,
        books::BookFilter,
        Page, Repository,
    },
};

/// Query parameter holding the 1-based page number
pub const PAGE_PARAM: &str = "page";

#[derive(Clone)]
pub struct AdminService {
    repository: Repository,
    site: Arc<AdminSite>,
}

impl AdminService {
    pub fn new(repository: Repository, site: Arc<AdminSite>) -> Self {
        Self { repository, site }
    }

    pub fn index(&self) -> SiteIndex {
        self.site.index()
    }

    fn model_admin(&self, model: ModelKind) -> AppResult<&ModelAdmin> {
        self.site
            .get(model)
            .ok_or_else(|| AppError::NotFound(format!("Model {} is not registered", model.slug())))
    }

    /// Change list of a model, honoring page and sidebar filter parameters
    pub async fn list_view(&self, model: ModelKind, params: &HashMap<String, String>) -> AppResult<ListView> {
        let admin = self.model_admin(model)?;
        let filters = ActiveFilters::from_query(admin, params)?;
        let page_number = match params.get(PAGE_PARAM) {
            Some(raw) => raw
                .parse::<i64>()
                .ok()
                .filter(|p| *p >= 1)
                .ok_or_else(|| AppError::BadRequest(format!("Invalid page: {}", raw)))?,
            None => 1,
        };
        let page = Page::number(page_number, admin.list_per_page)?;

        let view = match model {
            ModelKind::Genre => {
                let (rows, total) = self.repository.genres.list(page).await?;
                render_list(admin, &rows, &filters, total, page_number)
            }
            ModelKind::Language => {
                let (rows, total) = self.repository.languages.list(page).await?;
                render_list(admin, &rows, &filters, total, page_number)
            }
            ModelKind::Author => {
                let (rows, total) = self.repository.authors.list(page).await?;
                render_list(admin, &rows, &filters, total, page_number)
            }
            ModelKind::Book => {
                let (rows, total) = self
                    .repository
                    .books
                    .list(&BookFilter::default(), page)
                    .await?;
                render_list(admin, &rows, &filters, total, page_number)
            }
            ModelKind::BookInstance => {
                let filter = InstanceFilter {
                    status: filters
                        .choice("status")
                        .map(|code| code.parse::<LoanStatus>())
                        .transpose()
                        .map_err(AppError::BadRequest)?,
                    due_back: filters
                        .date("due_back")
                        .condition(Local::now().date_naive()),
                    ..Default::default()
                };
                let (rows, total) = self.repository.book_instances.list(&filter, page).await?;
                render_list(admin, &rows, &filters, total, page_number)
            }
            ModelKind::User => {
                let (rows, total) = self.repository.users.list(page).await?;
                render_list(admin, &rows, &filters, total, page_number)
            }
        };
        Ok(view)
    }

    /// Change form of one record with its inline children
    pub async fn change_view(&self, model: ModelKind, pk: &str) -> AppResult<ChangeView> {
        let admin = self.model_admin(model)?;
        let not_found = || AppError::NotFound(format!("No {} with ID {}", model.verbose_name(), pk));
        let int_pk = || pk.parse::<i32>().map_err(|_| not_found());

        let view = match model {
            ModelKind::Genre => {
                let genre = self.repository.genres.get_by_id(int_pk()?).await?;
                render_change(admin, &genre, Vec::new())
            }
            ModelKind::Language => {
                let language = self.repository.languages.get_by_id(int_pk()?).await?;
                render_change(admin, &language, Vec::new())
            }
            ModelKind::Author => {
                let id = int_pk()?;
                let author = self.repository.authors.get_by_id(id).await?;
                let inlines = self.inlines(admin, id).await?;
                render_change(admin, &author, inlines)
            }
            ModelKind::Book => {
                let id = int_pk()?;
                let book = self.repository.books.get_by_id(id).await?;
                let inlines = self.inlines(admin, id).await?;
                render_change(admin, &book, inlines)
            }
            ModelKind::BookInstance => {
                let id: Uuid = pk.parse().map_err(|_| not_found())?;
                let instance = self.repository.book_instances.get_by_id(id).await?;
                render_change(admin, &instance, Vec::new())
            }
            ModelKind::User => {
                let user = self.repository.users.get_by_id(int_pk()?).await?;
                render_change(admin, &user, Vec::new())
            }
        };
        Ok(view)
    }

    async fn inlines(&self, admin: &ModelAdmin, parent_id: i32) -> AppResult<Vec<InlineView>> {
        let mut views = Vec::with_capacity(admin.inlines.len());
        for inline in &admin.inlines {
            let view = match inline.model {
                ModelKind::Book => {
                    let filter = BookFilter {
                        author_id: Some(parent_id),
                    };
                    let (books, _) = self.repository.books.list(&filter, Page::all()).await?;
                    render_inline(inline, &books)
                }
                ModelKind::BookInstance => {
                    let filter = InstanceFilter {
                        book_id: Some(parent_id),
                        ..Default::default()
                    };
                    let (instances, _) = self
                        .repository
                        .book_instances
                        .list(&filter, Page::all())
                        .await?;
                    render_inline(inline, &instances)
                }
                other => {
                    return Err(AppError::Internal(format!(
                        "No inline loader for {}",
                        other.slug()
                    )))
                }
            };
            views.push(view);
        }
        Ok(views)
    }
}
