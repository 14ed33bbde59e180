//! 一覧ビューモデル（カテゴリー → 検索 → ソート → ページング）
//!
//! メイン一覧・ダッシュボード・トランザクション画面で共通に使う。
//! 入力のレコード列は変更せず、表示用のスライスだけを作る。

use std::cmp::Reverse;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::types::{Address, Category, EventRecord};

/// 1ページあたりの件数
pub const DEFAULT_PAGE_SIZE: usize = 12;

/// ソート順
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOption {
    Newest,
    Oldest,
    Top,
    /// 並べ替えなし（取得順のまま）
    #[default]
    Trending,
}

impl SortOption {
    /// ドロップダウンに並ぶ選択肢（Trendingは暗黙のデフォルト）
    pub const MENU: [SortOption; 3] = [SortOption::Top, SortOption::Newest, SortOption::Oldest];

    pub fn name(&self) -> &'static str {
        match self {
            SortOption::Newest => "Newest",
            SortOption::Oldest => "Oldest",
            SortOption::Top => "Top",
            SortOption::Trending => "Trending",
        }
    }

    pub fn menu_label(&self) -> &'static str {
        match self {
            SortOption::Newest => "🆕 Newest",
            SortOption::Oldest => "🕒 Oldest",
            SortOption::Top => "🔝 Top",
            SortOption::Trending => "🔥 Trending",
        }
    }
}

/// 一覧画面の問い合わせ状態
///
/// フィルター・検索・ソートが変わったら1ページ目に戻す。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQueryState {
    selected_category: Option<Category>,
    search_query: String,
    sort_option: SortOption,
    current_page: usize,
    page_size: usize,
}

impl Default for ListQueryState {
    fn default() -> Self {
        Self::new(SortOption::Trending)
    }
}

impl ListQueryState {
    pub fn new(sort_option: SortOption) -> Self {
        Self {
            selected_category: None,
            search_query: String::new(),
            sort_option,
            current_page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn selected_category(&self) -> Option<Category> {
        self.selected_category
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    pub fn sort_option(&self) -> SortOption {
        self.sort_option
    }

    /// 要求されたページ（範囲外の可能性あり、表示時にクランプされる）
    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// 検索文字列を変更
    pub fn set_search(&mut self, query: impl Into<String>) {
        let query = query.into();
        if query != self.search_query {
            self.search_query = query;
            self.current_page = 1;
        }
    }

    /// カテゴリーを選択（Noneで全件）
    pub fn select_category(&mut self, category: Option<Category>) {
        if category != self.selected_category {
            self.selected_category = category;
            self.current_page = 1;
        }
    }

    /// 「All」ボタン: カテゴリー解除 + Trendingに戻す
    pub fn show_all(&mut self) {
        self.select_category(None);
        self.set_sort(SortOption::Trending);
    }

    pub fn set_sort(&mut self, sort_option: SortOption) {
        if sort_option != self.sort_option {
            self.sort_option = sort_option;
            self.current_page = 1;
        }
    }

    /// 「All」ボタンがアクティブ表示か
    pub fn is_showing_all(&self) -> bool {
        self.selected_category.is_none() && self.sort_option == SortOption::Trending
    }

    /// 表示されるページ（総ページ数でクランプ）
    fn visible_page(&self, total_pages: usize) -> usize {
        self.current_page.clamp(1, total_pages.max(1))
    }

    pub fn has_previous(&self, total_pages: usize) -> bool {
        self.visible_page(total_pages) > 1
    }

    pub fn has_next(&self, total_pages: usize) -> bool {
        self.visible_page(total_pages) < total_pages
    }

    /// 表示中のページから1つ戻る
    pub fn previous_page(&mut self, total_pages: usize) {
        self.current_page = self.visible_page(total_pages).saturating_sub(1).max(1);
    }

    pub fn next_page(&mut self, total_pages: usize) {
        let page = self.visible_page(total_pages);
        self.current_page = if page < total_pages { page + 1 } else { page };
    }

    pub fn go_to_page(&mut self, page: usize, total_pages: usize) {
        self.current_page = page.clamp(1, total_pages.max(1));
    }
}

/// 「Top」ソート用の人気度
pub trait PopularityScore {
    fn score(&self, record: &EventRecord) -> u64;
}

impl<F> PopularityScore for F
where
    F: Fn(&EventRecord) -> u64,
{
    fn score(&self, record: &EventRecord) -> u64 {
        self(record)
    }
}

/// 人気度なし（全件0点、取得順を維持）
#[derive(Debug, Clone, Copy, Default)]
pub struct Unranked;

impl PopularityScore for Unranked {
    fn score(&self, _record: &EventRecord) -> u64 {
        0
    }
}

/// イベントごとの支援者数
#[derive(Debug, Clone, Default)]
pub struct BackerCounts {
    counts: HashMap<String, u64>,
}

impl BackerCounts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, event: &Address, backers: u64) {
        self.counts.insert(event.as_str().to_ascii_lowercase(), backers);
    }

    pub fn get(&self, event: &Address) -> u64 {
        self.counts
            .get(&event.as_str().to_ascii_lowercase())
            .copied()
            .unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

impl PopularityScore for BackerCounts {
    fn score(&self, record: &EventRecord) -> u64 {
        self.get(&record.address)
    }
}

/// ページ分割の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page<'a, T> {
    pub items: &'a [T],
    /// クランプ後のページ番号（1始まり）
    pub current_page: usize,
    pub total_pages: usize,
    pub total_items: usize,
}

/// 任意の列をページ分割
pub fn paginate<T>(items: &[T], page: usize, page_size: usize) -> Page<'_, T> {
    let page_size = page_size.max(1);
    let total_items = items.len();
    let total_pages = total_items.div_ceil(page_size).max(1);
    let current_page = page.clamp(1, total_pages);

    let start = ((current_page - 1) * page_size).min(total_items);
    let end = (start + page_size).min(total_items);

    Page {
        items: &items[start..end],
        current_page,
        total_pages,
        total_items,
    }
}

/// 一覧ビューの計算結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListView {
    pub page_items: Vec<EventRecord>,
    pub total_pages: usize,
    pub current_page: usize,
    /// フィルター後の件数
    pub total_items: usize,
}

/// カテゴリー条件に合うか
pub fn matches_category(record: &EventRecord, category: Option<Category>) -> bool {
    match category {
        Some(c) => record.category == c.id(),
        None => true,
    }
}

/// 検索条件に合うか（queryは小文字化済み）
fn matches_lowered_query(record: &EventRecord, lowered_query: &str) -> bool {
    if lowered_query.is_empty() {
        return true;
    }
    if record.title.to_lowercase().contains(lowered_query) {
        return true;
    }
    // 未知のカテゴリーは空文字扱い
    record
        .category()
        .map(|c| c.name().to_lowercase().contains(lowered_query))
        .unwrap_or(false)
}

/// タイトルまたはカテゴリー名に部分一致するか（大文字小文字無視）
pub fn matches_search(record: &EventRecord, query: &str) -> bool {
    matches_lowered_query(record, &query.to_lowercase())
}

/// 安定ソート
pub fn sort_records(records: &mut [&EventRecord], sort_option: SortOption, popularity: &dyn PopularityScore) {
    match sort_option {
        SortOption::Newest => records.sort_by_key(|r| Reverse(r.creation_timestamp)),
        SortOption::Oldest => records.sort_by_key(|r| r.creation_timestamp),
        SortOption::Top => records.sort_by_cached_key(|r| Reverse(popularity.score(r))),
        SortOption::Trending => {}
    }
}

/// フィルター・検索・ソートを適用した全件
pub fn filter_and_sort<'a>(
    records: &'a [EventRecord],
    state: &ListQueryState,
    popularity: &dyn PopularityScore,
) -> Vec<&'a EventRecord> {
    let lowered_query = state.search_query.to_lowercase();

    let mut selected: Vec<&EventRecord> = records
        .iter()
        .filter(|r| matches_category(r, state.selected_category))
        .filter(|r| matches_lowered_query(r, &lowered_query))
        .collect();

    sort_records(&mut selected, state.sort_option, popularity);
    selected
}

/// 表示するページを計算（Topは取得順のまま）
pub fn compute_view(records: &[EventRecord], state: &ListQueryState) -> ListView {
    compute_view_ranked(records, state, &Unranked)
}

/// 人気度を指定してページを計算
pub fn compute_view_ranked(
    records: &[EventRecord],
    state: &ListQueryState,
    popularity: &dyn PopularityScore,
) -> ListView {
    let selected = filter_and_sort(records, state, popularity);
    let page = paginate(&selected, state.current_page, state.page_size);

    ListView {
        page_items: page.items.iter().map(|r| (*r).clone()).collect(),
        total_pages: page.total_pages,
        current_page: page.current_page,
        total_items: page.total_items,
    }
}
