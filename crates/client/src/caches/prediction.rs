//! Forecast and analytics views. Read-only; nothing here is ever patched.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;

use shelfline_core::ProductId;
use shelfline_inventory::{
    Category, ForecastStats, Insight, Prediction, PredictionProduct, ProductAnalytics, TrendPoint,
};

use crate::cache::{Clock, Freshness, Keyed};
use crate::caches::{Gate, HasStatus, Status, gated};
use crate::error::ClientError;
use crate::http::ApiClient;

#[derive(Debug)]
struct PredictionState {
    products: Freshness<Vec<PredictionProduct>>,
    categories: Freshness<Vec<Category>>,
    stats: Freshness<ForecastStats>,
    insights: Freshness<Vec<Insight>>,
    forecasts: Keyed<ProductId, Vec<Prediction>>,
    analytics: Keyed<ProductId, ProductAnalytics>,
    trends: Keyed<ProductId, Vec<TrendPoint>>,
    status: Status,
}

impl PredictionState {
    fn new(window: Duration) -> Self {
        Self {
            products: Freshness::new(window),
            categories: Freshness::new(window),
            stats: Freshness::new(window),
            insights: Freshness::new(window),
            forecasts: Keyed::new(window),
            analytics: Keyed::new(window),
            trends: Keyed::new(window),
            status: Status::default(),
        }
    }
}

impl HasStatus for PredictionState {
    fn status_mut(&mut self) -> &mut Status {
        &mut self.status
    }
}

fn products(s: &mut PredictionState, _: ()) -> &mut Freshness<Vec<PredictionProduct>> {
    &mut s.products
}

fn categories(s: &mut PredictionState, _: ()) -> &mut Freshness<Vec<Category>> {
    &mut s.categories
}

fn stats(s: &mut PredictionState, _: ()) -> &mut Freshness<ForecastStats> {
    &mut s.stats
}

fn insights(s: &mut PredictionState, _: ()) -> &mut Freshness<Vec<Insight>> {
    &mut s.insights
}

fn forecast(s: &mut PredictionState, id: ProductId) -> &mut Freshness<Vec<Prediction>> {
    s.forecasts.slot_mut(id)
}

fn analytics(s: &mut PredictionState, id: ProductId) -> &mut Freshness<ProductAnalytics> {
    s.analytics.slot_mut(id)
}

fn trends(s: &mut PredictionState, id: ProductId) -> &mut Freshness<Vec<TrendPoint>> {
    s.trends.slot_mut(id)
}

#[derive(Debug)]
pub struct PredictionCache {
    api: ApiClient,
    clock: Arc<dyn Clock>,
    state: RwLock<PredictionState>,
}

impl PredictionCache {
    pub fn new(api: ApiClient, clock: Arc<dyn Clock>, window: Duration) -> Self {
        Self {
            api,
            clock,
            state: RwLock::new(PredictionState::new(window)),
        }
    }

    pub async fn fetch_products(&self) -> Result<Vec<PredictionProduct>, ClientError> {
        let fetch = self.api.prediction_products();
        gated(&self.state, self.clock.as_ref(), Gate::IfStale, (), products, fetch).await
    }

    pub async fn fetch_categories(&self) -> Result<Vec<Category>, ClientError> {
        let fetch = self.api.prediction_categories();
        gated(&self.state, self.clock.as_ref(), Gate::IfStale, (), categories, fetch).await
    }

    /// Forecast series for one product; each product has its own slot.
    pub async fn fetch_forecast(&self, product: ProductId) -> Result<Vec<Prediction>, ClientError> {
        let fetch = self.api.forecast(product);
        gated(&self.state, self.clock.as_ref(), Gate::IfStale, product, forecast, fetch).await
    }

    pub async fn fetch_stats(&self) -> Result<ForecastStats, ClientError> {
        let fetch = self.api.forecast_stats();
        gated(&self.state, self.clock.as_ref(), Gate::IfStale, (), stats, fetch).await
    }

    pub async fn fetch_analytics(&self, product: ProductId) -> Result<ProductAnalytics, ClientError> {
        let fetch = self.api.product_analytics(product);
        gated(&self.state, self.clock.as_ref(), Gate::IfStale, product, analytics, fetch).await
    }

    pub async fn fetch_trends(&self, product: ProductId) -> Result<Vec<TrendPoint>, ClientError> {
        let fetch = self.api.product_trends(product);
        gated(&self.state, self.clock.as_ref(), Gate::IfStale, product, trends, fetch).await
    }

    pub async fn fetch_insights(&self) -> Result<Vec<Insight>, ClientError> {
        let fetch = self.api.insights();
        gated(&self.state, self.clock.as_ref(), Gate::IfStale, (), insights, fetch).await
    }

    /// Drop every cached forecast so the next reads hit the backend.
    pub async fn invalidate_all(&self) {
        let mut state = self.state.write().await;
        state.products.invalidate();
        state.categories.invalidate();
        state.stats.invalidate();
        state.insights.invalidate();
        state.forecasts.invalidate_all();
        state.analytics.invalidate_all();
        state.trends.invalidate_all();
    }

    pub async fn status(&self) -> Status {
        self.state.read().await.status.clone()
    }
}
