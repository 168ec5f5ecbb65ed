use std::collections::HashMap;

/// Number of questions shown per page.
pub const QUESTIONS_PER_PAGE: usize = 10;

/// Pagination 구조체는 쿼리 매개변수나 경로에서 추출된다
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// 1부터 시작하는 페이지 번호. 0번 페이지는 항상 비어 있다
    page: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Pagination { page: 1 }
    }
}

impl Pagination {
    pub fn new(page: u32) -> Self {
        Pagination { page }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    /// Index of the first item on this page.
    pub fn offset(&self) -> usize {
        (self.page as usize)
            .saturating_sub(1)
            .saturating_mul(QUESTIONS_PER_PAGE)
    }

    /// The window `[offset, offset + QUESTIONS_PER_PAGE)` of `items`; empty
    /// for page 0 and when the page lies past the end.
    pub fn paginate<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        if self.page == 0 {
            return &[];
        }
        let start = self.offset().min(items.len());
        let end = start.saturating_add(QUESTIONS_PER_PAGE).min(items.len());
        &items[start..end]
    }
}

/// 매개변수를 쿼리 문자열에서 추출하기. 숫자가 아닌 `page`는 무시하고
/// 첫 페이지를 보여 준다
/// # 예제 쿼리
/// /questions?page=2
/// # 사용 예
/// ```rust
/// use std::collections::HashMap;
/// use trivia_api::types::pagination::extract_pagination;
///
/// let mut query = HashMap::new();
/// query.insert("page".to_string(), "2".to_string());
/// let p = extract_pagination(query);
/// assert_eq!(p.page(), 2);
/// assert_eq!(p.offset(), 10);
/// ```
pub fn extract_pagination(params: HashMap<String, String>) -> Pagination {
    params
        .get("page")
        .and_then(|page| page.trim().parse::<u32>().ok())
        .map(Pagination::new)
        .unwrap_or_default()
}
