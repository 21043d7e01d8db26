use crate::error::FetchError;
use async_trait::async_trait;
use rand::Rng;
use rand_distr::StandardNormal;

/// 详情页折线图使用的 7 天序列
pub const SERIES_POINTS: usize = 7;

/// 7 天涨跌幅序列的数据来源
///
/// 目前只有随机生成的占位实现；接入真实历史数据时实现同一个 trait 即可。
#[async_trait]
pub trait SeriesSource: Send + Sync {
    /// 是否为随机生成的占位数据，页面据此在图表标题中标注
    fn is_synthetic(&self) -> bool;

    async fn series(&self, symbol: &str) -> Result<Vec<f64>, FetchError>;
}

/// 随机占位数据：每次调用重新从标准正态分布采样，与币种无关
#[derive(Debug, Clone, Copy, Default)]
pub struct SyntheticSeries;

#[async_trait]
impl SeriesSource for SyntheticSeries {
    fn is_synthetic(&self) -> bool {
        true
    }

    async fn series(&self, _symbol: &str) -> Result<Vec<f64>, FetchError> {
        Ok(generate_series(SERIES_POINTS))
    }
}

/// 从标准正态分布采样 `points` 个点
pub fn generate_series(points: usize) -> Vec<f64> {
    let mut rng = rand::thread_rng();
    (0..points).map(|_| rng.sample::<f64, _>(StandardNormal)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_synthetic_series_has_seven_points() {
        let source = SyntheticSeries;
        let series = source.series("BTC").await.unwrap();
        assert_eq!(series.len(), SERIES_POINTS);
        assert!(series.iter().all(|v| v.is_finite()));
        assert!(source.is_synthetic());
    }

    #[test]
    fn test_synthetic_series_is_resampled() {
        // 两次采样 7 个连续值完全相同的概率可以忽略
        assert_ne!(generate_series(SERIES_POINTS), generate_series(SERIES_POINTS));
    }
}
