//! 行情列表派生视图
//!
//! 过滤 → 截断 → 涨跌幅表 → 可选排序，每次渲染都从原始列表重新计算

use crate::types::{
    AssetListing, AssetQuote, DashboardInput, DetailChoice,
    PercentChangeRow, PercentChangeView, SymbolSelection, Timeframe, MAX_DISPLAY_COUNT,
    MIN_DISPLAY_COUNT,
};

/// 行情列表处理工具
pub struct ListingProcessor;

impl ListingProcessor {
    /// 按多选框过滤，保持列表原始顺序
    pub fn filter_by_symbols(quotes: &[AssetQuote], selection: &SymbolSelection) -> Vec<AssetQuote> {
        match selection.as_set() {
            None => quotes.to_vec(),
            Some(selected) => quotes
                .iter()
                .filter(|q| selected.contains(q.symbol.as_str()))
                .cloned()
                .collect(),
        }
    }

    /// 取前 `min(count, len)` 行，count 截断到 1..=100
    pub fn take_top(quotes: &[AssetQuote], count: usize) -> Vec<AssetQuote> {
        let count = count.clamp(MIN_DISPLAY_COUNT, MAX_DISPLAY_COUNT);
        quotes.iter().take(count).cloned().collect()
    }

    pub fn percent_change_view(quotes: &[AssetQuote]) -> PercentChangeView {
        PercentChangeView {
            rows: quotes.iter().map(PercentChangeRow::from_quote).collect(),
        }
    }

    /// 按时间窗口列升序稳定排序
    pub fn sort_by_timeframe(view: &mut PercentChangeView, timeframe: Timeframe) {
        view.rows
            .sort_by(|a, b| a.value(timeframe).total_cmp(&b.value(timeframe)));
    }

    /// 一次完整的派生：返回 (过滤后, 截断后, 涨跌幅表)
    pub fn derive(
        listing: &AssetListing,
        input: &DashboardInput,
    ) -> (Vec<AssetQuote>, Vec<AssetQuote>, PercentChangeView) {
        let filtered = Self::filter_by_symbols(&listing.quotes, &input.selection);
        let displayed = Self::take_top(&filtered, input.display_count);

        let mut changes = Self::percent_change_view(&displayed);
        if input.sort_values {
            Self::sort_by_timeframe(&mut changes, input.timeframe);
        }

        (filtered, displayed, changes)
    }

    /// 解析详情下拉框：未选择过时取第一个币种；选中的币种不在当前列表中时同样退回第一个
    pub fn resolve_detail_symbol(listing: &AssetListing, choice: &DetailChoice) -> Option<String> {
        let first = listing.quotes.first().map(|q| q.symbol.clone());
        match choice {
            DetailChoice::None => None,
            DetailChoice::FirstListed => first,
            DetailChoice::Symbol(symbol) if listing.contains(symbol) => Some(symbol.clone()),
            DetailChoice::Symbol(_) => first,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CurrencyUnit;

    fn quote(symbol: &str, change_24h: f64) -> AssetQuote {
        AssetQuote {
            symbol: symbol.to_string(),
            name: symbol.to_lowercase(),
            price: 10.0,
            percent_change_1h: -change_24h,
            percent_change_24h: change_24h,
            percent_change_7d: 0.0,
            market_cap: 1.0,
            volume_24h: 1.0,
            circulating_supply: 1.0,
            total_supply: 1.0,
            max_supply: None,
            last_updated: "2024-01-14T00:00:00Z".parse().unwrap(),
        }
    }

    fn listing(quotes: Vec<AssetQuote>) -> AssetListing {
        AssetListing {
            currency: CurrencyUnit::USD,
            quotes,
        }
    }

    fn abc() -> AssetListing {
        listing(vec![quote("A", 1.5), quote("B", -2.0), quote("C", 0.5)])
    }

    #[test]
    fn test_sorted_24h_scenario() {
        let input = DashboardInput {
            display_count: 3,
            timeframe: Timeframe::OneDay,
            sort_values: true,
            ..DashboardInput::default()
        };

        let (_, displayed, changes) = ListingProcessor::derive(&abc(), &input);
        assert_eq!(displayed.len(), 3);
        assert_eq!(changes.symbols(), vec!["B", "C", "A"]);
    }

    #[test]
    fn test_unsorted_keeps_listing_order() {
        let input = DashboardInput {
            timeframe: Timeframe::OneDay,
            sort_values: false,
            ..DashboardInput::default()
        };

        let (_, _, changes) = ListingProcessor::derive(&abc(), &input);
        assert_eq!(changes.symbols(), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_sort_follows_selected_timeframe() {
        let input = DashboardInput {
            timeframe: Timeframe::OneHour,
            sort_values: true,
            ..DashboardInput::default()
        };

        // 1h 列是 24h 列取反
        let (_, _, changes) = ListingProcessor::derive(&abc(), &input);
        assert_eq!(changes.symbols(), vec!["A", "C", "B"]);
        let values: Vec<f64> = changes.rows.iter().map(|r| r.percent_change_1h).collect();
        assert!(values.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_take_top_is_min_of_count_and_len() {
        let quotes = abc().quotes;
        assert_eq!(ListingProcessor::take_top(&quotes, 2).len(), 2);
        assert_eq!(ListingProcessor::take_top(&quotes, 100).len(), 3);
        assert_eq!(ListingProcessor::take_top(&quotes, 0).len(), 1);

        let symbols: Vec<String> = ListingProcessor::take_top(&quotes, 2)
            .into_iter()
            .map(|q| q.symbol)
            .collect();
        assert_eq!(symbols, vec!["A", "B"]);
    }

    #[test]
    fn test_filter_then_slice() {
        let input = DashboardInput {
            selection: SymbolSelection::Only(vec!["C".to_string(), "A".to_string()]),
            display_count: 1,
            sort_values: false,
            ..DashboardInput::default()
        };

        let (filtered, displayed, changes) = ListingProcessor::derive(&abc(), &input);
        let filtered: Vec<&str> = filtered.iter().map(|q| q.symbol.as_str()).collect();
        assert_eq!(filtered, vec!["A", "C"]);
        assert_eq!(displayed.len(), 1);
        assert_eq!(changes.symbols(), vec!["A"]);
    }

    #[test]
    fn test_positive_flags_are_strict() {
        let view = ListingProcessor::percent_change_view(&[quote("Z", 0.0), quote("P", 0.01)]);
        assert!(!view.rows[0].positive_percent_change_24h);
        assert!(view.rows[1].positive_percent_change_24h);
        assert!(!view.rows[1].positive_percent_change_1h);
    }

    #[test]
    fn test_resolve_detail_symbol() {
        let abc = abc();
        assert_eq!(
            ListingProcessor::resolve_detail_symbol(&abc, &DetailChoice::FirstListed),
            Some("A".to_string())
        );
        assert_eq!(
            ListingProcessor::resolve_detail_symbol(&abc, &DetailChoice::Symbol("C".into())),
            Some("C".to_string())
        );
        assert_eq!(
            ListingProcessor::resolve_detail_symbol(&abc, &DetailChoice::Symbol("XRP".into())),
            Some("A".to_string())
        );
        assert_eq!(ListingProcessor::resolve_detail_symbol(&abc, &DetailChoice::None), None);
        assert_eq!(
            ListingProcessor::resolve_detail_symbol(&listing(vec![]), &DetailChoice::FirstListed),
            None
        );
    }
}
