//! 看板页面渲染
//!
//! `render_dashboard` 是纯函数：同样的输入与数据总是得到同样的页面，
//! 不读取任何全局状态，也不发起网络请求。

pub mod charts;
pub mod html;

use crate::error::FetchError;
use crate::types::{
    AssetDetail, AssetQuote, CurrencyUnit, DashboardInput, DashboardView, DetailSection,
    ListingSection, PercentChangeView, Timeframe, MAX_DISPLAY_COUNT, MIN_DISPLAY_COUNT, NO_LOGO,
    NO_WEBSITE,
};
use crate::utils::export::EXPORT_FILE_NAME;
use html::{error_box, escape, info_box, option, safe_url, table};
use secrecy::ExposeSecret;
use std::fmt::Write as _;

pub const NO_VOLUME_DATA: &str = "No data available for the selected coin.";

const PRICE_COLUMNS: [&str; AssetQuote::COLUMN_COUNT] = [
    "symbol",
    "name",
    "price",
    "percent_change_1h",
    "percent_change_24h",
    "percent_change_7d",
    "market_cap",
    "volume_24h",
    "circulating_supply",
    "total_supply",
    "max_supply",
    "last_updated",
];

const CHANGE_COLUMNS: [&str; 7] = [
    "symbol",
    "percent_change_1h",
    "percent_change_24h",
    "percent_change_7d",
    "positive_percent_change_1h",
    "positive_percent_change_24h",
    "positive_percent_change_7d",
];

const STYLE: &str = "body{font-family:sans-serif;margin:0;color:#262730}\
.layout{display:flex;min-height:100vh}\
.sidebar{width:300px;background:#f0f2f6;padding:1rem;box-sizing:border-box}\
.sidebar label{display:block;margin-top:.8rem;font-size:.9rem}\
.sidebar select,.sidebar input{width:100%;box-sizing:border-box}\
main{flex:1;padding:1rem 2rem;overflow-x:auto}\
.columns{display:flex;gap:2rem}.col-wide{flex:2;min-width:0}.col-narrow{flex:1}\
table.data{border-collapse:collapse;font-size:.8rem}\
table.data th,table.data td{border:1px solid #ddd;padding:2px 6px;text-align:right}\
.error{background:#ffe6e6;color:#7d0000;padding:.6rem;border-radius:4px;margin:.5rem 0}\
.info{color:#555}.synthetic{color:#a15c00;font-size:.85rem}";

pub fn render_dashboard(input: &DashboardInput, view: &DashboardView) -> String {
    let listing = match &view.listing {
        Some(Ok(section)) => Some(section),
        _ => None,
    };

    let mut page = String::with_capacity(64 * 1024);
    page.push_str("<!DOCTYPE html><html lang=\"en\"><head><meta charset=\"utf-8\">");
    page.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">");
    let _ = write!(page, "<title>Crypto Price App</title><style>{}</style></head><body>", STYLE);
    page.push_str("<div class=\"layout\">");

    page.push_str(&render_sidebar(input, listing));

    page.push_str("<main>");
    page.push_str(&render_header());

    match &view.listing {
        None => page.push_str(&info_box(
            "Enter your CoinMarketCap API key in the sidebar and press Load.",
        )),
        Some(Err(e)) => page.push_str(&render_fetch_error(e)),
        Some(Ok(section)) => {
            page.push_str(&render_listing(input, section));
            if let Some(detail) = &section.detail {
                page.push_str(&render_detail(detail));
            }
        }
    }

    page.push_str("</main></div></body></html>");
    page
}

fn render_header() -> String {
    "<h1>Crypto Price App</h1>\
<p>This app retrieves cryptocurrency prices for the top 100 cryptocurrencies from <strong>CoinMarketCap</strong>!</p>\
<details><summary>About</summary><ul>\
<li><strong>Data source:</strong> <a href=\"http://coinmarketcap.com\">CoinMarketCap</a>.</li>\
<li>The 7-day percentage change chart in the detail view uses randomly generated (synthetic) data.</li>\
</ul></details>"
        .to_string()
}

fn render_sidebar(input: &DashboardInput, listing: Option<&ListingSection>) -> String {
    let mut out = String::from(
        "<aside class=\"sidebar\"><form method=\"post\" action=\"/\"><h2>Input Options</h2>",
    );

    out.push_str("<label for=\"currency\">Select currency for price</label><select id=\"currency\" name=\"currency\">");
    for unit in CurrencyUnit::ALL {
        out.push_str(&option(unit.as_str(), unit.as_str(), unit == input.currency));
    }
    out.push_str("</select>");

    // 密码框只回填到本次响应，便于再次提交
    let _ = write!(
        out,
        "<label for=\"api_key\">Enter your CoinMarketCap API Key</label>\
<input id=\"api_key\" name=\"api_key\" type=\"password\" autocomplete=\"off\" value=\"{}\">",
        escape(input.api_key.expose_secret())
    );

    if let Some(section) = listing {
        out.push_str("<label for=\"coins\">Cryptocurrency</label>");
        out.push_str("<input type=\"hidden\" name=\"coins_present\" value=\"1\">");
        out.push_str("<select id=\"coins\" name=\"coins\" multiple size=\"10\">");
        for symbol in &section.symbol_options {
            out.push_str(&option(symbol, symbol, input.selection.includes(symbol)));
        }
        out.push_str("</select>");
    }

    let _ = write!(
        out,
        "<label for=\"display_count\">Display Top N Coins</label>\
<input id=\"display_count\" name=\"display_count\" type=\"number\" min=\"{}\" max=\"{}\" value=\"{}\">",
        MIN_DISPLAY_COUNT, MAX_DISPLAY_COUNT, input.display_count
    );

    out.push_str("<label for=\"timeframe\">Percent change time frame</label><select id=\"timeframe\" name=\"timeframe\">");
    for timeframe in Timeframe::SELECTOR_ORDER {
        out.push_str(&option(timeframe.as_str(), timeframe.as_str(), timeframe == input.timeframe));
    }
    out.push_str("</select>");

    out.push_str("<label for=\"sort\">Sort values?</label><select id=\"sort\" name=\"sort\">");
    out.push_str(&option("Yes", "Yes", input.sort_values));
    out.push_str(&option("No", "No", !input.sort_values));
    out.push_str("</select>");

    if let Some(section) = listing {
        let current = section.detail.as_ref().map(|d| d.symbol.as_str());
        out.push_str("<label for=\"detail_symbol\">Select a coin for detailed info</label>");
        out.push_str("<select id=\"detail_symbol\" name=\"detail_symbol\">");
        out.push_str(&option("", "(none)", current.is_none()));
        for symbol in &section.detail_options {
            out.push_str(&option(symbol, symbol, current == Some(symbol.as_str())));
        }
        out.push_str("</select>");
    }

    out.push_str("<p><button type=\"submit\">Load</button></p></form></aside>");
    out
}

fn render_fetch_error(e: &FetchError) -> String {
    match e.status() {
        Some(status) => format!(
            "{}{}",
            error_box(e.guidance()),
            info_box(&format!("The pricing API responded with HTTP {}.", status))
        ),
        None if e.is_upstream() || matches!(e, FetchError::Decode(_)) => {
            format!("{}{}", error_box(e.guidance()), info_box(&e.to_string()))
        }
        None => error_box(e.guidance()),
    }
}

fn render_listing(input: &DashboardInput, section: &ListingSection) -> String {
    let mut out = String::from("<div class=\"columns\"><div class=\"col-wide\">");

    out.push_str("<h3>Price Data of Selected Cryptocurrency</h3>");
    let _ = write!(
        out,
        "<p>Data Dimension: {} rows and {} columns.</p><p class=\"info\">Prices in {}.</p>",
        section.filtered.len(),
        AssetQuote::COLUMN_COUNT,
        section.currency
    );
    out.push_str(&table(&PRICE_COLUMNS, &price_rows(&section.displayed)));

    match &section.export_href {
        Ok(href) => {
            let _ = write!(
                out,
                "<p><a href=\"{}\" download=\"{}\">Download CSV File</a></p>",
                escape(href),
                EXPORT_FILE_NAME
            );
        }
        Err(e) => out.push_str(&error_box(&format!("CSV export unavailable: {}", e))),
    }

    out.push_str("<h3>Table of % Price Change</h3>");
    out.push_str(&table(&CHANGE_COLUMNS, &change_rows(&section.changes)));

    out.push_str("</div><div class=\"col-narrow\"><h3>Bar plot of % Price Change</h3>");
    let _ = write!(out, "<p><em>{}</em></p>", input.timeframe.period_caption());
    out.push_str(&charts::percent_change_bars(&section.changes, input.timeframe));
    out.push_str("</div></div>");
    out
}

fn price_rows(quotes: &[AssetQuote]) -> Vec<Vec<String>> {
    quotes
        .iter()
        .map(|q| {
            vec![
                q.symbol.clone(),
                q.name.clone(),
                q.price.to_string(),
                q.percent_change_1h.to_string(),
                q.percent_change_24h.to_string(),
                q.percent_change_7d.to_string(),
                q.market_cap.to_string(),
                q.volume_24h.to_string(),
                q.circulating_supply.to_string(),
                q.total_supply.to_string(),
                q.max_supply_display(),
                q.last_updated.to_rfc3339(),
            ]
        })
        .collect()
}

fn change_rows(view: &PercentChangeView) -> Vec<Vec<String>> {
    view.rows
        .iter()
        .map(|r| {
            vec![
                r.symbol.clone(),
                r.percent_change_1h.to_string(),
                r.percent_change_24h.to_string(),
                r.percent_change_7d.to_string(),
                r.positive_percent_change_1h.to_string(),
                r.positive_percent_change_24h.to_string(),
                r.positive_percent_change_7d.to_string(),
            ]
        })
        .collect()
}

fn render_detail(detail: &DetailSection) -> String {
    let mut out = String::from("<section class=\"detail\">");
    let _ = write!(out, "<h2>{}</h2>", escape(&detail.symbol));

    match &detail.info {
        Ok(info) => out.push_str(&render_asset_info(info)),
        Err(e) => out.push_str(&render_fetch_error(e)),
    }

    match &detail.synthetic {
        Ok(series) => {
            let title = if detail.series_synthetic {
                format!("{} - 7-Day Percentage Change (synthetic)", detail.symbol)
            } else {
                format!("{} - 7-Day Percentage Change", detail.symbol)
            };
            if detail.series_synthetic {
                out.push_str(
                    "<p class=\"synthetic\">Synthetic data: randomly generated, not real price history.</p>",
                );
            }
            out.push_str(&charts::day_series_line(&title, "Price Change (%)", series));
        }
        Err(e) => out.push_str(&render_fetch_error(e)),
    }

    match &detail.volume {
        Ok(Some(volumes)) if !volumes.is_empty() => {
            let title = format!("{} - 24h Volume", detail.symbol);
            out.push_str(&charts::day_series_line(&title, "Volume", volumes));
        }
        Ok(_) => out.push_str(&info_box(NO_VOLUME_DATA)),
        Err(e) => out.push_str(&render_fetch_error(e)),
    }

    out.push_str("</section>");
    out
}

fn render_asset_info(info: &AssetDetail) -> String {
    let mut out = String::new();
    let _ = write!(out, "<p><strong>{}</strong></p>", escape(info.name_or_placeholder()));
    let _ = write!(
        out,
        "<p>Description: {}</p>",
        escape(info.description_or_placeholder())
    );

    match info.logo_url.as_deref().and_then(safe_url) {
        Some(logo) => {
            let _ = write!(out, "<p><img src=\"{}\" width=\"100\" alt=\"logo\"></p>", logo);
        }
        None => out.push_str(&info_box(NO_LOGO)),
    }

    match info.website_url.as_deref().and_then(safe_url) {
        Some(site) => {
            let _ = write!(out, "<p>Website: <a href=\"{}\">Visit Website</a></p>", site);
        }
        None => out.push_str(&info_box(NO_WEBSITE)),
    }
    out
}
