use sled::Db;

use crate::portfolio::dto::{MacroViews, Portfolio};
use crate::portfolio::handler::{default_macro_views, default_portfolio};

const TREE_NAME: &str = "documents";

// Fixed storage keys; each document is read and written wholesale as JSON.
// There is no migration or versioning scheme.
const PORTFOLIO_KEY: &str = "portfolio";
const MACRO_VIEWS_KEY: &str = "macro_views";

#[derive(Clone)]
pub struct Documents {
    tree: sled::Tree,
}

impl Documents {
    pub fn new(db: &Db) -> sled::Result<Self> {
        let tree = db.open_tree(TREE_NAME)?;
        Ok(Self { tree })
    }

    pub fn save_portfolio(&self, portfolio: &Portfolio) -> Result<(), anyhow::Error> {
        let encoded = serde_json::to_vec(portfolio)?;
        self.tree.insert(PORTFOLIO_KEY, encoded)?;
        Ok(())
    }

    pub fn load_portfolio(&self) -> Option<Portfolio> {
        self.tree
            .get(PORTFOLIO_KEY)
            .ok()
            .flatten()
            .and_then(|ivec| serde_json::from_slice(&ivec).ok())
    }

    pub fn get_or_create_portfolio(&self) -> Result<Portfolio, anyhow::Error> {
        if let Some(portfolio) = self.load_portfolio() {
            return Ok(portfolio);
        }

        let portfolio = default_portfolio();
        self.save_portfolio(&portfolio)?;
        Ok(portfolio)
    }

    pub fn clear_portfolio(&self) -> sled::Result<()> {
        self.tree.remove(PORTFOLIO_KEY)?;
        Ok(())
    }

    pub fn save_macro_views(&self, macro_views: &MacroViews) -> Result<(), anyhow::Error> {
        let encoded = serde_json::to_vec(macro_views)?;
        self.tree.insert(MACRO_VIEWS_KEY, encoded)?;
        Ok(())
    }

    pub fn load_macro_views(&self) -> Option<MacroViews> {
        self.tree
            .get(MACRO_VIEWS_KEY)
            .ok()
            .flatten()
            .and_then(|ivec| serde_json::from_slice(&ivec).ok())
    }

    pub fn get_or_create_macro_views(&self) -> Result<MacroViews, anyhow::Error> {
        if let Some(macro_views) = self.load_macro_views() {
            return Ok(macro_views);
        }

        let macro_views = default_macro_views();
        self.save_macro_views(&macro_views)?;
        Ok(macro_views)
    }

    pub fn clear_macro_views(&self) -> sled::Result<()> {
        self.tree.remove(MACRO_VIEWS_KEY)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::portfolio::dto::{Asset, AssetKind};

    fn temp_documents() -> Documents {
        let db = sled::Config::new()
            .temporary(true)
            .open()
            .expect("temporary sled db");
        Documents::new(&db).expect("documents tree")
    }

    fn sample_portfolio() -> Portfolio {
        Portfolio {
            id: "portfolio_roundtrip".to_string(),
            name: "Round Trip".to_string(),
            assets: vec![
                Asset {
                    id: "asset_1".to_string(),
                    ticker: "VTI".to_string(),
                    name: "Vanguard Total Market".to_string(),
                    kind: AssetKind::Etf,
                    quantity: 12.5,
                    purchase_price: 201.3,
                    current_price: Some(240.0),
                    purchase_date: Some("2023-06-01".to_string()),
                    notes: Some("core holding".to_string()),
                },
                Asset {
                    id: "asset_2".to_string(),
                    ticker: "BTC".to_string(),
                    name: "Bitcoin".to_string(),
                    kind: AssetKind::Crypto,
                    quantity: 0.25,
                    purchase_price: 30000.0,
                    current_price: None,
                    purchase_date: None,
                    notes: None,
                },
            ],
            created_at: "2024-01-01T00:00:00Z".to_string(),
            updated_at: "2024-02-01T00:00:00Z".to_string(),
        }
    }

    #[test]
    fn test_portfolio_round_trip_is_field_for_field() {
        let documents = temp_documents();
        let portfolio = sample_portfolio();

        documents.save_portfolio(&portfolio).expect("save");
        let loaded = documents.load_portfolio().expect("load");

        assert_eq!(loaded, portfolio);
    }

    #[test]
    fn test_get_or_create_persists_the_default() {
        let documents = temp_documents();

        assert!(documents.load_portfolio().is_none());

        let created = documents.get_or_create_portfolio().expect("create");
        assert_eq!(created.name, "My Portfolio");
        assert!(created.assets.is_empty());

        let reloaded = documents.load_portfolio().expect("persisted");
        assert_eq!(reloaded, created);
    }

    #[test]
    fn test_clear_removes_the_document() {
        let documents = temp_documents();

        documents
            .save_macro_views(&MacroViews {
                economic_growth: "soft landing".to_string(),
                ..MacroViews::default()
            })
            .expect("save");

        assert!(documents.load_macro_views().is_some());
        documents.clear_macro_views().expect("clear");
        assert!(documents.load_macro_views().is_none());
    }
}
