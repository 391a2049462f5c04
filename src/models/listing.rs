//! One fetched page of a list endpoint

use crate::api::ListResponse;
use crate::models::ListQuery;
use crate::utils::Page;

#[derive(Debug, Clone)]
pub struct Listing<T> {
    pub items: Vec<T>,
    pub page: Page,
    pub filters: String,
}

impl<T> Listing<T> {
    pub fn from_response(response: ListResponse<T>, query: &ListQuery) -> Self {
        let total = response.total_count();
        Listing {
            items: response.into_items(),
            page: Page::new(query.page, query.page_size, total),
            filters: query.describe_filters(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
