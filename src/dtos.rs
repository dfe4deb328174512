use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{ser::SerializeMap, Deserialize, Serialize, Serializer};
use validator::Validate;

pub mod contractdtos;
pub mod freelancerdtos;
pub mod jobdtos;
pub mod proposaldtos;
pub mod userdtos;

pub const DEFAULT_PAGE: usize = 1;
pub const DEFAULT_LIMIT: usize = 10;

/// Success envelope: `{statusCode, message, success: true, data}`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    pub status_code: u16,
    pub message: String,
    pub success: bool,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn new(status: StatusCode, message: &str, data: T) -> Self {
        Self {
            status_code: status.as_u16(),
            message: message.to_string(),
            success: status.is_success(),
            data,
        }
    }

    pub fn success(message: &str, data: T) -> Self {
        Self::new(StatusCode::OK, message, data)
    }

    pub fn created(message: &str, data: T) -> Self {
        Self::new(StatusCode::CREATED, message, data)
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::OK);
        (status, Json(self)).into_response()
    }
}

#[derive(Debug, Default, Serialize, Deserialize, Validate)]
pub struct RequestQueryDto {
    #[validate(range(min = 1, message = "Page must be at least 1"))]
    pub page: Option<usize>,
    #[validate(range(min = 1, max = 50, message = "Limit must be between 1 and 50"))]
    pub limit: Option<usize>,
}

impl RequestQueryDto {
    pub fn page(&self) -> usize {
        self.page.unwrap_or(DEFAULT_PAGE)
    }

    pub fn limit(&self) -> usize {
        self.limit.unwrap_or(DEFAULT_LIMIT)
    }
}

/// One page of a collection, serialized as `{<key>, total, page, totalPages}`.
#[derive(Debug)]
pub struct PageDto<T> {
    pub key: &'static str,
    pub items: Vec<T>,
    pub total: i64,
    pub page: usize,
    pub total_pages: i64,
}

impl<T> PageDto<T> {
    pub fn new(key: &'static str, items: Vec<T>, total: i64, page: usize, limit: usize) -> Self {
        let total_pages = ((total as f64) / (limit.max(1) as f64)).ceil() as i64;
        Self {
            key,
            items,
            total,
            page,
            total_pages,
        }
    }
}

impl<T: Serialize> Serialize for PageDto<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(4))?;
        map.serialize_entry(self.key, &self.items)?;
        map.serialize_entry("total", &self.total)?;
        map.serialize_entry("page", &self.page)?;
        map.serialize_entry("totalPages", &self.total_pages)?;
        map.end()
    }
}

/// Splits a comma separated query value, dropping blanks.
pub fn split_csv(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

pub(crate) fn trim_skills(skills: Vec<String>) -> Vec<String> {
    skills
        .into_iter()
        .map(|skill| skill.trim().to_string())
        .filter(|skill| !skill.is_empty())
        .collect()
}
