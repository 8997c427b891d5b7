use serde::{Deserialize, Serialize};

/// Column the record list can be ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    Date,
    Product,
    Category,
    Region,
    Quantity,
    Revenue,
    Profit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// Optional ordering and page size for the record list.
///
/// Without `sort` the store order (date ascending) is kept; without `limit`
/// every matching record is returned.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordListQuery {
    #[serde(default)]
    pub sort: Option<SortField>,
    #[serde(default)]
    pub dir: SortDirection,
    #[serde(default)]
    pub limit: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_defaults_and_names() {
        let query: RecordListQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(query, RecordListQuery::default());

        let query: RecordListQuery =
            serde_json::from_str(r#"{"sort":"revenue","dir":"desc","limit":20}"#).unwrap();
        assert_eq!(query.sort, Some(SortField::Revenue));
        assert_eq!(query.dir, SortDirection::Desc);
        assert_eq!(query.limit, Some(20));

        assert!(serde_json::from_str::<RecordListQuery>(r#"{"sort":"colour"}"#).is_err());
    }
}
