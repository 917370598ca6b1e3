//! Appwrite list-query serialisation.
//!
//! Each query is one JSON object sent as a repeated `queries[]` parameter.

use serde_json::json;

use crate::domain::PostQuery;

pub(super) const QUERY_PARAM: &str = "queries[]";

const CREATED_AT: &str = "$createdAt";
const CREATOR: &str = "creator";
const TITLE: &str = "title";

pub(super) fn equal(attribute: &str, value: &str) -> String {
    json!({ "method": "equal", "attribute": attribute, "values": [value] }).to_string()
}

pub(super) fn search(attribute: &str, value: &str) -> String {
    json!({ "method": "search", "attribute": attribute, "values": [value] }).to_string()
}

pub(super) fn order_desc(attribute: &str) -> String {
    json!({ "method": "orderDesc", "attribute": attribute }).to_string()
}

pub(super) fn limit(count: u32) -> String {
    json!({ "method": "limit", "values": [count] }).to_string()
}

/// Queries implementing a post listing filter.
pub(super) fn post_queries(query: &PostQuery) -> Vec<String> {
    match query {
        PostQuery::All => Vec::new(),
        PostQuery::ByCreator(creator) => vec![equal(CREATOR, creator.as_str())],
        PostQuery::TitleSearch(text) => vec![search(TITLE, text)],
        PostQuery::Latest { limit: count } => vec![order_desc(CREATED_AT), limit(*count)],
    }
}

/// `queries[]` pairs ready for `RequestBuilder::query`.
pub(super) fn as_params(queries: Vec<String>) -> Vec<(&'static str, String)> {
    queries
        .into_iter()
        .map(|query| (QUERY_PARAM, query))
        .collect()
}

#[cfg(test)]
mod tests {
    //! Regression coverage for query serialisation.

    use super::*;
    use crate::domain::DocumentId;
    use rstest::rstest;
    use serde_json::Value;

    fn parsed(queries: Vec<String>) -> Vec<Value> {
        queries
            .iter()
            .map(|raw| serde_json::from_str(raw).expect("query is JSON"))
            .collect()
    }

    #[rstest]
    fn latest_orders_by_creation_then_limits() {
        let queries = parsed(post_queries(&PostQuery::latest()));
        assert_eq!(
            queries,
            vec![
                json!({ "method": "orderDesc", "attribute": "$createdAt" }),
                json!({ "method": "limit", "values": [7] }),
            ]
        );
    }

    #[rstest]
    fn by_creator_filters_on_equality() {
        let creator = DocumentId::new("profile1").expect("valid id");
        let queries = parsed(post_queries(&PostQuery::ByCreator(creator)));
        assert_eq!(
            queries,
            vec![json!({ "method": "equal", "attribute": "creator", "values": ["profile1"] })]
        );
    }

    #[rstest]
    fn title_search_keeps_the_text_verbatim() {
        let queries = parsed(post_queries(&PostQuery::TitleSearch(
            "sunset \"sea\"".to_owned(),
        )));
        assert_eq!(
            queries,
            vec![json!({ "method": "search", "attribute": "title", "values": ["sunset \"sea\""] })]
        );
    }

    #[rstest]
    fn all_posts_send_no_queries() {
        assert!(post_queries(&PostQuery::All).is_empty());
    }

    #[rstest]
    fn params_repeat_the_array_key() {
        let params = as_params(vec![order_desc("$createdAt"), limit(3)]);
        assert_eq!(params.len(), 2);
        assert!(params.iter().all(|(key, _)| *key == "queries[]"));
    }
}
