use chrono::Utc;
use uuid::Uuid;

use super::dto::{Asset, MacroViews, Portfolio, PortfolioSummary};

pub fn new_portfolio_id() -> String {
    format!("portfolio_{}", Uuid::new_v4().simple())
}

pub fn new_asset_id() -> String {
    format!("asset_{}", Uuid::new_v4().simple())
}

pub fn default_portfolio() -> Portfolio {
    let now = Utc::now().to_rfc3339();

    Portfolio {
        id: new_portfolio_id(),
        name: "My Portfolio".to_string(),
        assets: vec![],
        created_at: now.clone(),
        updated_at: now,
    }
}

pub fn default_macro_views() -> MacroViews {
    MacroViews::default()
}

pub fn calculate_portfolio_summary(portfolio: &Portfolio) -> PortfolioSummary {
    let mut summary = PortfolioSummary::default();

    for asset in &portfolio.assets {
        let value = asset.current_value();

        summary.total_value += value;
        summary.total_cost += asset.cost_basis();
        *summary
            .allocation_by_kind
            .entry(asset.kind.label().to_string())
            .or_insert(0.0) += value;
    }

    summary.total_gain_loss = summary.total_value - summary.total_cost;
    summary.total_gain_loss_percent = if summary.total_cost > 0.0 {
        summary.total_gain_loss / summary.total_cost * 100.0
    } else {
        0.0
    };

    for (kind, value) in &summary.allocation_by_kind {
        let percent = if summary.total_value > 0.0 {
            value / summary.total_value * 100.0
        } else {
            0.0
        };
        summary
            .allocation_by_kind_percent
            .insert(kind.clone(), percent);
    }

    summary
}

pub fn validate_asset(asset: &Asset) -> Vec<String> {
    let mut errors = Vec::new();

    if asset.ticker.trim().is_empty() {
        errors.push("Ticker is required".to_string());
    }

    if asset.name.trim().is_empty() {
        errors.push("Asset name is required".to_string());
    }

    if asset.quantity <= 0.0 {
        errors.push("Quantity must be greater than 0".to_string());
    }

    if asset.purchase_price <= 0.0 {
        errors.push("Purchase price must be greater than 0".to_string());
    }

    errors
}
