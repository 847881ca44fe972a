use serde::Deserialize;

const DEFAULT_PAGE_NUMBER: u64 = 1;
/// Zero means "no limit"
const DEFAULT_PAGE_LIMIT: u64 = 0;

/// `?page=&limit=` query. Values are kept as strings so junk input falls
/// back to the defaults instead of rejecting the request.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl PageQuery {
    /// Resolve to `(skip, limit)`. Negative numbers count as their absolute value.
    pub fn skip_limit(&self) -> (usize, usize) {
        let page = parse_or(self.page.as_deref(), DEFAULT_PAGE_NUMBER);
        let limit = parse_or(self.limit.as_deref(), DEFAULT_PAGE_LIMIT);
        let skip = (page - 1).saturating_mul(limit);
        (skip as usize, limit as usize)
    }
}

fn parse_or(value: Option<&str>, default: u64) -> u64 {
    value
        .and_then(|v| v.trim().parse::<i64>().ok())
        .map(i64::unsigned_abs)
        .filter(|v| *v > 0)
        .unwrap_or(default)
}
