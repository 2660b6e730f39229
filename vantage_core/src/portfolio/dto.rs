use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    Stock,
    Etf,
    Bond,
    Crypto,
    Other,
}

impl AssetKind {
    pub fn label(&self) -> &'static str {
        match self {
            AssetKind::Stock => "Stock",
            AssetKind::Etf => "ETF",
            AssetKind::Bond => "Bond",
            AssetKind::Crypto => "Crypto",
            AssetKind::Other => "Other",
        }
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub id: String,
    pub ticker: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: AssetKind,
    pub quantity: f64,
    pub purchase_price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purchase_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Asset {
    /// Value at the latest known price; assets without a quote fall back to cost basis.
    pub fn current_value(&self) -> f64 {
        self.quantity * self.current_price.unwrap_or(self.purchase_price)
    }

    pub fn cost_basis(&self) -> f64 {
        self.quantity * self.purchase_price
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Portfolio {
    pub id: String,
    pub name: String,
    pub assets: Vec<Asset>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MacroViews {
    pub economic_growth: String,
    pub interest_rates: String,
    pub government_policy: String,
    pub geopolitics: String,
    pub industry_specific: String,
}

impl MacroViews {
    pub fn combined_text(&self) -> String {
        [
            self.economic_growth.as_str(),
            self.interest_rates.as_str(),
            self.government_policy.as_str(),
            self.geopolitics.as_str(),
            self.industry_specific.as_str(),
        ]
        .concat()
    }

    pub fn non_empty(&self) -> Vec<&str> {
        [
            self.economic_growth.as_str(),
            self.interest_rates.as_str(),
            self.government_policy.as_str(),
            self.geopolitics.as_str(),
            self.industry_specific.as_str(),
        ]
        .into_iter()
        .map(|view| view.trim())
        .filter(|view| !view.is_empty())
        .collect()
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioSummary {
    pub total_value: f64,
    pub total_cost: f64,
    pub total_gain_loss: f64,
    pub total_gain_loss_percent: f64,
    pub allocation_by_kind: BTreeMap<String, f64>,
    pub allocation_by_kind_percent: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest {
    pub portfolio: Option<Portfolio>,
    pub macro_views: Option<MacroViews>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specific_questions: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResponse {
    pub insights: Vec<String>,
    pub contradictions: Vec<String>,
    pub follow_up_questions: Vec<String>,
    pub recommendations: Vec<String>,
    pub risk_assessment: String,
}

impl From<String> for AnalysisResponse {
    /// The shipped formatter: the model's text is carried verbatim, nothing is parsed out of it.
    fn from(raw_text: String) -> Self {
        AnalysisResponse {
            insights: vec![],
            contradictions: vec![],
            follow_up_questions: vec![],
            recommendations: vec![],
            risk_assessment: raw_text,
        }
    }
}

impl AnalysisResponse {
    pub fn display_text(&self) -> String {
        format!(
            "{}\n\n**What would you like to explore further about your portfolio or investment strategy?**",
            self.risk_assessment
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FollowUpQuestionsRequest {
    pub portfolio: Option<Portfolio>,
    pub macro_views: Option<MacroViews>,
    pub previous_analysis: Option<AnalysisResponse>,
}
