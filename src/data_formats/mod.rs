mod request;
mod response;

pub use request::*;
pub use response::*;

use serde::{Deserialize, Serialize};

/// Query string for `GET /api/articles`. Empty values count as absent.
#[derive(Deserialize, Serialize, Debug, Default, Clone)]
pub struct ArticleQueryParams {
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub search: Option<String>,
}

impl ArticleQueryParams {
    pub fn category(&self) -> Option<&str> {
        non_empty(self.category.as_deref())
    }

    pub fn search(&self) -> Option<&str> {
        non_empty(self.search.as_deref())
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.is_empty())
}
