use crate::config::VolumeWindow;
use crate::services::{CoinMarketCapClient, SeriesSource};
use crate::types::{AssetListing, DashboardInput, DashboardView, DetailSection, ListingSection};
use crate::utils::{ExportCodec, ListingProcessor};
use std::sync::Arc;
use tracing::{error, info, warn};

/// 组装一次完整的看板数据
///
/// 每次调用都重新拉取，不保留任何上一次的结果。
pub struct DashboardService {
    client: Arc<CoinMarketCapClient>,
    history: Arc<dyn SeriesSource>,
    volume_window: VolumeWindow,
}

impl DashboardService {
    pub fn new(
        client: Arc<CoinMarketCapClient>,
        history: Arc<dyn SeriesSource>,
        volume_window: VolumeWindow,
    ) -> Self {
        Self {
            client,
            history,
            volume_window,
        }
    }

    /// 拉取 → 过滤/截断/排序 → (选中币种时) 详情、随机序列、成交量
    ///
    /// 任何一步失败只影响对应区块，不会让整个页面失败。
    pub async fn assemble(&self, input: &DashboardInput) -> DashboardView {
        let listing = match self.client.fetch_listings(&input.api_key, input.currency).await {
            Ok(listing) => listing,
            Err(e) => {
                warn!("❌ 行情列表获取失败: {}", e);
                return DashboardView {
                    listing: Some(Err(e)),
                };
            }
        };

        let mut section = Self::listing_section(&listing, input);

        if let Some(symbol) = ListingProcessor::resolve_detail_symbol(&listing, &input.detail) {
            section.detail = Some(self.detail_section(symbol, input).await);
        }

        DashboardView {
            listing: Some(Ok(section)),
        }
    }

    /// 由行情列表计算所有派生视图，不涉及网络
    pub fn listing_section(listing: &AssetListing, input: &DashboardInput) -> ListingSection {
        let (filtered, displayed, changes) = ListingProcessor::derive(listing, input);

        let export_href = ExportCodec::download_href(&filtered).map_err(|e| {
            error!("CSV 导出失败: {}", e);
            e.to_string()
        });

        info!(
            "📊 {} 个币种, 过滤后 {}, 展示 {}",
            listing.len(),
            filtered.len(),
            displayed.len()
        );

        ListingSection {
            currency: listing.currency,
            symbol_options: listing.sorted_symbols(),
            detail_options: listing.symbols(),
            filtered,
            displayed,
            changes,
            export_href,
            detail: None,
        }
    }

    async fn detail_section(&self, symbol: String, input: &DashboardInput) -> DetailSection {
        let info = self.client.fetch_detail(&symbol, &input.api_key).await;
        if let Err(e) = &info {
            warn!("❌ {} 详情获取失败: {}", symbol, e);
        }

        let synthetic = self.history.series(&symbol).await;

        let volume = self
            .client
            .fetch_volume_history(&symbol, &input.api_key, input.currency, &self.volume_window)
            .await;
        if let Err(e) = &volume {
            warn!("❌ {} 成交量历史获取失败: {}", symbol, e);
        }

        DetailSection {
            symbol,
            info,
            synthetic,
            series_synthetic: self.history.is_synthetic(),
            volume,
        }
    }
}
