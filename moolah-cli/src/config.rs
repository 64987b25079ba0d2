use anyhow::{bail, Context, Result};
use moolah_ingest::FieldSynonyms;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Optional `~/.moolah/config.toml`. Everything defaults; the file only
/// exists for users whose bank invents column names the stock synonym
/// lists have never seen.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Use the expanded category breakdown (top 6 instead of top 4).
    pub expanded_breakdown: bool,
    pub synonyms: SynonymOverrides,
}

/// Extra column-name synonyms, per role. With `replace = true` a
/// non-empty list replaces the stock list instead of extending it.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SynonymOverrides {
    pub replace: bool,
    pub date: Vec<String>,
    pub description: Vec<String>,
    pub amount: Vec<String>,
    pub category: Vec<String>,
    pub transaction_type: Vec<String>,
    pub debit: Vec<String>,
    pub credit: Vec<String>,
}

impl Config {
    pub fn field_synonyms(&self) -> FieldSynonyms {
        let mut synonyms = FieldSynonyms::default();
        let o = &self.synonyms;
        apply(&mut synonyms.date, &o.date, o.replace);
        apply(&mut synonyms.description, &o.description, o.replace);
        apply(&mut synonyms.amount, &o.amount, o.replace);
        apply(&mut synonyms.category, &o.category, o.replace);
        apply(&mut synonyms.transaction_type, &o.transaction_type, o.replace);
        apply(&mut synonyms.debit, &o.debit, o.replace);
        apply(&mut synonyms.credit, &o.credit, o.replace);
        synonyms
    }
}

fn apply(target: &mut Vec<String>, custom: &[String], replace: bool) {
    if custom.is_empty() {
        return;
    }
    if replace {
        *target = custom.to_vec();
    } else {
        target.extend(custom.iter().cloned());
    }
}

pub fn moolah_home() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".moolah"))
}

pub fn config_path() -> Result<PathBuf> {
    Ok(moolah_home()?.join("config.toml"))
}

/// Load the config. An explicitly passed path must exist; the implicit
/// home path quietly falls back to defaults when absent.
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    let path = match explicit {
        Some(p) => {
            if !p.exists() {
                bail!("config not found: {}", p.display());
            }
            p.to_path_buf()
        }
        None => {
            let p = config_path()?;
            if !p.exists() {
                return Ok(Config::default());
            }
            p
        }
    };

    let raw = fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?;
    toml::from_str(&raw).with_context(|| format!("parse {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_empty() {
        let cfg: Config = toml::from_str("").unwrap();
        assert!(!cfg.expanded_breakdown);
        let synonyms = cfg.field_synonyms();
        assert!(synonyms.date.contains(&"transaction date".to_string()));
    }

    #[test]
    fn test_synonyms_extend_stock_lists() {
        let cfg: Config = toml::from_str(
            r#"
            [synonyms]
            date = ["booking day"]
            description = ["counterparty"]
            "#,
        )
        .unwrap();
        let synonyms = cfg.field_synonyms();
        assert!(synonyms.date.contains(&"date".to_string()));
        assert!(synonyms.date.contains(&"booking day".to_string()));
        assert!(synonyms.description.contains(&"counterparty".to_string()));
    }

    #[test]
    fn test_synonyms_replace_mode() {
        let cfg: Config = toml::from_str(
            r#"
            expanded_breakdown = true

            [synonyms]
            replace = true
            date = ["booking day"]
            "#,
        )
        .unwrap();
        assert!(cfg.expanded_breakdown);
        let synonyms = cfg.field_synonyms();
        assert_eq!(synonyms.date, vec!["booking day".to_string()]);
        // Untouched roles keep their stock lists.
        assert!(synonyms.description.contains(&"description".to_string()));
    }
}
