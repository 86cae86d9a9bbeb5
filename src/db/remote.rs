//! Remote entity source speaking the offset/limit listing convention.

use std::marker::PhantomData;

use async_trait::async_trait;
use futures::future::try_join_all;
use reqwest::{Client, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::EntitySource;
use crate::config::RemotePaging;
use crate::errors::{ApiError, AppError};
use crate::models::criteria::Criteria;
use crate::models::entity::{EntityStatus, Listable};
use crate::models::pagination::{paginate, to_offset_limit, PaginationRequest, PaginationResult};
use crate::services::filter;

/// Response body, either inside the `{data, error}` envelope or bare.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Body<T> {
    Wrapped { data: T },
    Bare(T),
}

impl<T> Body<T> {
    fn into_inner(self) -> T {
        match self {
            Self::Wrapped { data } | Self::Bare(data) => data,
        }
    }
}

/// A listing either already paged upstream or a plain array.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Listing<E> {
    Page(PaginationResult<E>),
    Items(Vec<E>),
}

#[derive(Debug, Deserialize)]
struct CountBody {
    total: i64,
}

/// Error half of the `{data, error}` envelope.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<ApiError>,
}

#[derive(Debug, Serialize)]
struct StatusBody<S> {
    status: S,
}

/// Route serving children of a parent entity, e.g. `/topics/{id}/message-group`.
#[derive(Debug, Clone)]
struct ParentRoute {
    parent_path: String,
    child: String,
}

pub struct RemoteSource<E> {
    client: Client,
    base: Url,
    path: String,
    paging: RemotePaging,
    parent_route: Option<ParentRoute>,
    _entity: PhantomData<fn() -> E>,
}

impl<E: Listable> RemoteSource<E> {
    pub fn new(
        client: Client,
        base_url: &str,
        path: &str,
        paging: RemotePaging,
    ) -> Result<Self, AppError> {
        let base = Url::parse(base_url)
            .map_err(|e| AppError::Internal(format!("Invalid remote API URL '{base_url}': {e}")))?;
        if base.cannot_be_a_base() {
            return Err(AppError::Internal(format!(
                "Remote API URL '{base_url}' cannot carry a path"
            )));
        }
        Ok(Self {
            client,
            base,
            path: path.to_string(),
            paging,
            parent_route: None,
            _entity: PhantomData,
        })
    }

    /// Serve [`EntitySource::list_by_parent`] from a nested route instead of
    /// filtering the full collection.
    pub fn with_parent_route(mut self, parent_path: &str, child: &str) -> Self {
        self.parent_route = Some(ParentRoute {
            parent_path: parent_path.to_string(),
            child: child.to_string(),
        });
        self
    }

    fn url(&self, path: &str, extra: &[&str]) -> Result<Url, AppError> {
        let mut url = self.base.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|()| AppError::Internal("Remote API URL cannot carry a path".into()))?;
            segments.pop_if_empty();
            segments.extend(path.split('/').filter(|s| !s.is_empty()));
            segments.extend(extra);
        }
        Ok(url)
    }

    fn listing_url(
        &self,
        suffix: &[&str],
        criteria: &Criteria<E::Status>,
        req: Option<&PaginationRequest>,
    ) -> Result<Url, AppError> {
        let mut url = self.url(&self.path, suffix)?;
        {
            let mut query = url.query_pairs_mut();
            for (key, value) in criteria.query_pairs() {
                query.append_pair(key, &value);
            }
            if let Some(req) = req {
                let window = to_offset_limit(req);
                query.append_pair("offset", &window.offset.to_string());
                query.append_pair("limit", &window.limit.to_string());
            }
        }
        // Drop a dangling `?` when no parameters were appended.
        if url.query() == Some("") {
            url.set_query(None);
        }
        Ok(url)
    }

    async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, AppError> {
        tracing::debug!(kind = E::KIND, url = %url, "Remote GET");
        let response = self.client.get(url).send().await?.error_for_status()?;
        decode(response).await
    }

    /// The whole collection matching `criteria`. An upstream that pages its
    /// response anyway is walked page by page until `totalPages`.
    async fn fetch_all(&self, criteria: &Criteria<E::Status>) -> Result<Vec<E>, AppError> {
        let url = self.listing_url(&[], criteria, None)?;
        let items = match self.get::<Listing<E>>(url).await? {
            Listing::Page(first) => self.remaining_pages(criteria, first).await?,
            Listing::Items(items) => items,
        };
        // Upstreams that ignore some parameters still yield a correct listing.
        Ok(filter::filter(&items, criteria).into_iter().cloned().collect())
    }

    async fn remaining_pages(
        &self,
        criteria: &Criteria<E::Status>,
        first: PaginationResult<E>,
    ) -> Result<Vec<E>, AppError> {
        let page_size = first.page_size;
        let requests = ((first.page + 1)..=first.total_pages)
            .map(|page| PaginationRequest::new(page, page_size))
            .collect::<Vec<_>>();
        tracing::debug!(
            kind = E::KIND,
            total_items = first.total_items,
            pages = first.total_pages,
            "Following paged upstream listing"
        );

        let rest = try_join_all(requests.iter().map(|req| async move {
            let url = self.listing_url(&[], criteria, Some(req))?;
            Ok::<_, AppError>(match self.get::<Listing<E>>(url).await? {
                Listing::Page(page) => page.items,
                Listing::Items(items) => items,
            })
        }))
        .await?;

        let mut items = first.items;
        items.extend(rest.into_iter().flatten());
        Ok(items)
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, AppError> {
    Ok(response.json::<Body<T>>().await?.into_inner())
}

#[async_trait]
impl<E: Listable> EntitySource<E> for RemoteSource<E> {
    async fn list_page(
        &self,
        criteria: &Criteria<E::Status>,
        req: &PaginationRequest,
    ) -> Result<PaginationResult<E>, AppError> {
        match self.paging {
            RemotePaging::Server => {
                let url = self.listing_url(&[], criteria, Some(req))?;
                match self.get::<Listing<E>>(url).await? {
                    Listing::Page(page) => {
                        Ok(PaginationResult::new(page.items, page.total_items, req))
                    }
                    Listing::Items(items) => {
                        let total = self.count(criteria).await?;
                        Ok(PaginationResult::new(items, total, req))
                    }
                }
            }
            RemotePaging::Client => {
                let items = self.fetch_all(criteria).await?;
                Ok(paginate(&items, req))
            }
        }
    }

    async fn count(&self, criteria: &Criteria<E::Status>) -> Result<i64, AppError> {
        match self.paging {
            RemotePaging::Server => {
                let url = self.listing_url(&["count"], criteria, None)?;
                Ok(self.get::<CountBody>(url).await?.total)
            }
            RemotePaging::Client => {
                let items = self.fetch_all(criteria).await?;
                Ok(i64::try_from(items.len()).unwrap_or(i64::MAX))
            }
        }
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<E>, AppError> {
        let url = self.url(&self.path, &[id])?;
        tracing::debug!(kind = E::KIND, url = %url, "Remote GET");
        let response = self.client.get(url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        decode(response.error_for_status()?).await.map(Some)
    }

    async fn update_status(&self, id: &str, status: E::Status) -> Result<E, AppError> {
        let url = self.url(&self.path, &[id, "status"])?;
        tracing::debug!(kind = E::KIND, url = %url, status = status.as_str(), "Remote PUT");
        let response = self
            .client
            .put(url)
            .json(&StatusBody { status })
            .send()
            .await?;
        match response.status() {
            StatusCode::NOT_FOUND => {
                return Err(AppError::NotFound(format!("{} '{id}' not found", E::KIND)));
            }
            // The upstream owns the record and re-checks the transition itself.
            StatusCode::BAD_REQUEST => {
                let message = response
                    .json::<ErrorBody>()
                    .await
                    .ok()
                    .and_then(|body| body.error)
                    .map(|error| error.message)
                    .unwrap_or_else(|| format!("{} '{id}' status change rejected", E::KIND));
                return Err(AppError::InvalidTransition(message));
            }
            _ => {}
        }
        decode(response.error_for_status()?).await
    }

    async fn list_by_parent(&self, parent_id: &str) -> Result<Vec<E>, AppError> {
        match &self.parent_route {
            Some(route) => {
                let url = self.url(&route.parent_path, &[parent_id, route.child.as_str()])?;
                Ok(match self.get::<Listing<E>>(url).await? {
                    Listing::Page(page) => page.items,
                    Listing::Items(items) => items,
                })
            }
            None => {
                let items = self.fetch_all(&Criteria::default()).await?;
                Ok(items
                    .into_iter()
                    .filter(|item| item.parent_id() == Some(parent_id))
                    .collect())
            }
        }
    }
}
