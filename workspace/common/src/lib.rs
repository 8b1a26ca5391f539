//! Transport-layer types shared between the backend and UI clients.
//! These structs are the view-model payloads the handlers return, so a client
//! can deserialize API responses without duplicating shapes.

mod admin;
mod listings;
mod users;

pub use admin::{AdminDashboard, AdminPropertyFilters, DashboardStats, UpdateStatusRequest};
pub use listings::{HomePage, OwnerDto, PropertyDto, PropertyImageDto, SearchFilters};
pub use users::{AdminUserFilters, UpdateRoleRequest, UserDto};

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Generic API response wrapper used by the backend.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    /// Response data
    pub data: T,
    /// Response message
    pub message: String,
    /// Success flag
    pub success: bool,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T, message: impl Into<String>) -> Self {
        Self {
            data,
            message: message.into(),
            success: true,
        }
    }
}

/// One page of a paginated result set. Pages are 1-indexed.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_count: u64,
    pub page: u64,
    pub page_size: u64,
    /// Index of the last page that has items (1 when the result set is empty)
    pub last_page: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total_count: u64, page: u64, page_size: u64) -> Self {
        let last_page = if page_size == 0 {
            1
        } else {
            total_count.div_ceil(page_size).max(1)
        };
        Self {
            items,
            total_count,
            page,
            page_size,
            last_page,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total_count: self.total_count,
            page: self.page,
            page_size: self.page_size,
            last_page: self.last_page,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_page_rounds_up() {
        let page: Page<u8> = Page::new(vec![], 25, 3, 12);
        assert_eq!(page.last_page, 3);

        let empty: Page<u8> = Page::new(vec![], 0, 1, 12);
        assert_eq!(empty.last_page, 1);
    }

    #[test]
    fn test_map_keeps_counts() {
        let page = Page::new(vec![1, 2], 14, 2, 12).map(|n| n * 10);
        assert_eq!(page.items, vec![10, 20]);
        assert_eq!(page.total_count, 14);
        assert_eq!(page.page, 2);
    }

    #[test]
    fn test_api_response_shape() {
        let json = serde_json::to_value(ApiResponse::ok(1, "done")).unwrap();
        assert_eq!(json["data"], 1);
        assert_eq!(json["message"], "done");
        assert_eq!(json["success"], true);
    }
}
