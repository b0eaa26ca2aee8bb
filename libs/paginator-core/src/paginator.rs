use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, instrument};

use crate::ast::Where;
use crate::config::PaginationConfig;
use crate::error::Result;
use crate::filter::parse_filter;
use crate::merge::merge_where;
use crate::page::{EffectivePagination, PageBounds, PageRequest, PageResult};
use crate::policy::EntityIdentity;
use crate::sort::SortSpec;

/// Bounded, sorted, filtered query handed to the repository.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FindQuery {
    pub filter: Where,
    pub order: SortSpec,
    pub skip: u64,
    pub take: u64,
    pub relations: Vec<String>,
}

/// Caller-side options layered under the end-user request.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FindOptions {
    /// Hard constraint merged into the parsed filter (tenant/user scoping and the like).
    pub constraint: Option<Where>,
    pub relations: Vec<String>,
}

impl FindOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_constraint(mut self, constraint: Where) -> Self {
        self.constraint = Some(constraint);
        self
    }

    pub fn with_relations<I, S>(mut self, relations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.relations = relations.into_iter().map(Into::into).collect();
        self
    }
}

/// Port for the storage layer: one entity type, one call per page.
#[async_trait]
pub trait PageRepository: Send + Sync {
    type Item: Send;

    /// Table/class names used as column policy lookup keys.
    fn entity(&self) -> &EntityIdentity;

    /// Execute the query, returning the page rows and the unbounded match count.
    async fn find_and_count(&self, query: FindQuery) -> anyhow::Result<(Vec<Self::Item>, u64)>;
}

#[async_trait]
impl<R> PageRepository for Arc<R>
where
    R: PageRepository + ?Sized,
{
    type Item = R::Item;

    fn entity(&self) -> &EntityIdentity {
        (**self).entity()
    }

    async fn find_and_count(&self, query: FindQuery) -> anyhow::Result<(Vec<Self::Item>, u64)> {
        (**self).find_and_count(query).await
    }
}

/// Rows, total count and the pagination that produced them.
#[derive(Clone, Debug, PartialEq)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub pagination: EffectivePagination,
}

impl<T> Paginated<T> {
    pub fn into_page(self) -> PageResult<T> {
        PageResult::assemble(self.items, self.total, &self.pagination)
    }
}

/// Generic offset paginator over any [`PageRepository`].
pub struct Paginator<R> {
    repo: R,
    config: Arc<PaginationConfig>,
}

impl<R: PageRepository> Paginator<R> {
    pub fn new(repo: R, config: Arc<PaginationConfig>) -> Self {
        Self { repo, config }
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    pub fn config(&self) -> &PaginationConfig {
        &self.config
    }

    /// Translate a request into the repository query plus the echo used for links.
    pub fn build_query(
        &self,
        request: &PageRequest,
        options: FindOptions,
    ) -> Result<(FindQuery, EffectivePagination)> {
        let entity = self.repo.entity();

        let order = SortSpec::parse(
            request.sort.as_deref(),
            self.config.resolve_sortable(entity),
        );
        let filter = match request.filter.as_deref().filter(|f| !f.is_empty()) {
            Some(raw) => parse_filter(raw, self.config.resolve_filterable(entity))?,
            None => Where::default(),
        };

        let (page, limit) =
            PageBounds::from(self.config.as_ref()).clamp(request.page, request.limit);

        let pagination = EffectivePagination {
            page,
            limit,
            path: request.path.clone(),
            sort: order.to_canonical_string(),
            filter: request.filter.clone(),
        };
        let query = FindQuery {
            filter: merge_where(filter, options.constraint),
            order,
            skip: pagination.skip(),
            take: pagination.take(),
            relations: options.relations,
        };
        Ok((query, pagination))
    }

    #[instrument(
        name = "paginator.paginate",
        skip_all,
        fields(table = %self.repo.entity().table_name, page = ?request.page, limit = ?request.limit)
    )]
    pub async fn paginate(
        &self,
        request: &PageRequest,
        options: Option<FindOptions>,
    ) -> Result<Paginated<R::Item>> {
        let (query, pagination) = self.build_query(request, options.unwrap_or_default())?;
        let (items, total) = self.repo.find_and_count(query).await?;
        debug!(
            items = items.len(),
            total,
            page = pagination.page,
            "page fetched"
        );
        Ok(Paginated {
            items,
            total,
            pagination,
        })
    }

    /// `paginate` followed by response assembly.
    pub async fn get_all(
        &self,
        request: &PageRequest,
        options: Option<FindOptions>,
    ) -> Result<PageResult<R::Item>> {
        self.paginate(request, options)
            .await
            .map(Paginated::into_page)
    }
}
