use shelfline_core::ProductId;
use shelfline_inventory::{
    Category, ForecastStats, Insight, Prediction, PredictionProduct, ProductAnalytics, TrendPoint,
};

use crate::error::ClientError;
use crate::http::ApiClient;

impl ApiClient {
    /// `GET /prediction/products`
    pub async fn prediction_products(&self) -> Result<Vec<PredictionProduct>, ClientError> {
        self.get("/prediction/products").await
    }

    /// `GET /prediction/categories`
    pub async fn prediction_categories(&self) -> Result<Vec<Category>, ClientError> {
        self.get("/prediction/categories").await
    }

    /// `GET /prediction/forecast/{product}`
    pub async fn forecast(&self, product: ProductId) -> Result<Vec<Prediction>, ClientError> {
        self.get(&format!("/prediction/forecast/{product}")).await
    }

    /// `GET /prediction/stats`
    pub async fn forecast_stats(&self) -> Result<ForecastStats, ClientError> {
        self.get("/prediction/stats").await
    }

    /// `GET /prediction/analytics/{product}`
    pub async fn product_analytics(
        &self,
        product: ProductId,
    ) -> Result<ProductAnalytics, ClientError> {
        self.get(&format!("/prediction/analytics/{product}")).await
    }

    /// `GET /prediction/trends/{product}`
    pub async fn product_trends(&self, product: ProductId) -> Result<Vec<TrendPoint>, ClientError> {
        self.get(&format!("/prediction/trends/{product}")).await
    }

    /// `GET /prediction/insights`
    pub async fn insights(&self) -> Result<Vec<Insight>, ClientError> {
        self.get("/prediction/insights").await
    }
}
