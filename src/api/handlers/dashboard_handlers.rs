use super::super::ApiState;
use crate::render::render_dashboard;
use crate::types::{DashboardInput, DashboardView};
use axum::{
    body::Bytes,
    extract::State,
    http::header,
    response::{Html, IntoResponse},
};
use tracing::debug;

// 页面中回填了密码框，禁止缓存
const NO_STORE: [(header::HeaderName, &str); 1] = [(header::CACHE_CONTROL, "no-store")];

// Dashboard页面handlers
pub async fn index() -> impl IntoResponse {
    let page = render_dashboard(&DashboardInput::default(), &DashboardView::default());
    (NO_STORE, Html(page))
}

pub async fn submit_dashboard(State(state): State<ApiState>, body: Bytes) -> impl IntoResponse {
    let input = DashboardInput::from_form(&body);
    debug!(
        "看板请求: currency={}, count={}, timeframe={}, sort={}",
        input.currency, input.display_count, input.timeframe, input.sort_values
    );

    let view = state.dashboard.assemble(&input).await;
    (NO_STORE, Html(render_dashboard(&input, &view)))
}
