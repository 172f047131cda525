use crate::error::SearchError;
use crate::model::route::SearchResult;

use super::types::SearchInput;

pub trait RouteSearchEngine {
    fn name(&self) -> &'static str;

    fn search(&mut self, input: SearchInput) -> Result<SearchResult, SearchError>;
}
