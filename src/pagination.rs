const DEFAULT_LIMIT: i64 = 10;
const MAX_LIMIT: i64 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LimitOffset {
    pub limit: i64,
    pub offset: i64,
}

impl Default for LimitOffset {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

impl LimitOffset {
    pub fn new(limit: Option<i64>, offset: Option<i64>) -> Self {
        Self {
            limit: limit
                .filter(|l| *l > 0)
                .unwrap_or(DEFAULT_LIMIT)
                .min(MAX_LIMIT),
            offset: offset.filter(|o| *o > 0).unwrap_or(0),
        }
    }

    /// 1-based page numbers, as used by the tournament listing.
    pub fn from_page(page: Option<i64>, limit: Option<i64>) -> (i64, Self) {
        let page = page.filter(|p| *p > 0).unwrap_or(1);
        let mut window = Self::new(limit, None);
        window.offset = (page - 1).saturating_mul(window.limit);
        (page, window)
    }
}
