// src/scrape/sources.rs
use anyhow::{anyhow, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::scrape::types::SourceDescriptor;

pub const ENV_SOURCES_PATH: &str = "SUBSIDY_SOURCES_PATH";

/// Programme pages tracked out of the box, in fetch order.
pub fn builtin_sources() -> Vec<SourceDescriptor> {
    const BASE: &str = "https://www.rvo.nl/subsidies-financiering";
    [
        ("WBSO", "Fiscaal", "wbso"),
        ("SDE++", "Energie", "sde"),
        ("MIT", "Innovatie", "mkb-innovatiestimulering-topsectoren-mit"),
        ("EIA", "Energie", "energie-investeringsaftrek-eia"),
        ("MIA/Vamil", "Milieu", "milieu-investeringsaftrek-mia-en-vamil"),
        ("Innovatiebox", "Fiscaal", "innovatiebox"),
        ("BMKB", "Financiering", "borgstelling-mkb-kredieten-bmkb"),
    ]
    .into_iter()
    .map(|(name, category, slug)| SourceDescriptor::new(name, category, &format!("{BASE}/{slug}")))
    .collect()
}

/// Load descriptors from an explicit path. Supports TOML (`[[sources]]`) or a JSON array.
pub fn load_sources_from(path: &Path) -> Result<Vec<SourceDescriptor>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading sources from {}", path.display()))?;
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    parse_sources(&content, ext.as_str())
}

/// Load descriptors using env var + fallbacks:
/// 1) $SUBSIDY_SOURCES_PATH
/// 2) config/sources.toml
/// 3) config/sources.json
/// 4) built-in list
pub fn load_sources_default() -> Result<Vec<SourceDescriptor>> {
    if let Ok(p) = std::env::var(ENV_SOURCES_PATH) {
        let pb = PathBuf::from(p);
        if pb.exists() {
            return load_sources_from(&pb);
        } else {
            return Err(anyhow!("{ENV_SOURCES_PATH} points to non-existent path"));
        }
    }
    let toml_p = PathBuf::from("config/sources.toml");
    if toml_p.exists() {
        return load_sources_from(&toml_p);
    }
    let json_p = PathBuf::from("config/sources.json");
    if json_p.exists() {
        return load_sources_from(&json_p);
    }
    Ok(builtin_sources())
}

fn parse_sources(s: &str, hint_ext: &str) -> Result<Vec<SourceDescriptor>> {
    let parsed = match hint_ext {
        "toml" => parse_toml(s),
        "json" => parse_json(s),
        _ => parse_json(s).or_else(|_| parse_toml(s)),
    }?;
    let cleaned = clean_list(parsed);
    if cleaned.is_empty() {
        return Err(anyhow!("source list is empty"));
    }
    Ok(cleaned)
}

fn parse_toml(s: &str) -> Result<Vec<SourceDescriptor>> {
    #[derive(serde::Deserialize)]
    struct TomlSources {
        sources: Vec<SourceDescriptor>,
    }
    let v: TomlSources = toml::from_str(s).context("parsing sources toml")?;
    Ok(v.sources)
}

fn parse_json(s: &str) -> Result<Vec<SourceDescriptor>> {
    serde_json::from_str(s).context("parsing sources json")
}

/// Trim fields, drop entries without name or url, keep the first of duplicate names.
/// Order is preserved: it is the fetch order.
fn clean_list(items: Vec<SourceDescriptor>) -> Vec<SourceDescriptor> {
    let mut out: Vec<SourceDescriptor> = Vec::with_capacity(items.len());
    for it in items {
        let d = SourceDescriptor::new(it.name.trim(), it.category.trim(), it.url.trim());
        if d.name.is_empty() || d.url.is_empty() {
            continue;
        }
        if out.iter().any(|o| o.name.eq_ignore_ascii_case(&d.name)) {
            continue;
        }
        out.push(d);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{env, fs};

    #[test]
    fn builtin_list_is_ordered_and_complete() {
        let s = builtin_sources();
        let names: Vec<_> = s.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(
            names,
            ["WBSO", "SDE++", "MIT", "EIA", "MIA/Vamil", "Innovatiebox", "BMKB"]
        );
        assert_eq!(s[0].url, "https://www.rvo.nl/subsidies-financiering/wbso");
        assert_eq!(s[6].category, "Financiering");
    }

    #[test]
    fn trim_dedup_and_formats_work() {
        let toml = r#"
            [[sources]]
            name = " WBSO "
            category = "Fiscaal"
            url = "https://example.test/wbso"

            [[sources]]
            name = ""
            category = "x"
            url = "https://example.test/none"

            [[sources]]
            name = "wbso"
            category = "Dup"
            url = "https://example.test/dup"
        "#;
        let out = parse_sources(toml, "toml").unwrap();
        assert_eq!(
            out,
            vec![SourceDescriptor::new("WBSO", "Fiscaal", "https://example.test/wbso")]
        );

        let json = r#"[{"name":"EIA","category":"Energie","url":"https://example.test/eia"}]"#;
        let out = parse_sources(json, "").unwrap();
        assert_eq!(out[0].name, "EIA");
    }

    #[test]
    fn empty_list_is_an_error() {
        assert!(parse_sources("[]", "json").is_err());
    }

    #[serial_test::serial]
    #[test]
    fn default_uses_env_then_fallbacks() {
        // Isolate CWD so a real config/ directory does not interfere.
        let old = env::current_dir().unwrap();
        let tmp = tempfile::tempdir().unwrap();
        env::set_current_dir(tmp.path()).unwrap();

        env::remove_var(ENV_SOURCES_PATH);

        // No files → built-in list
        let v = load_sources_default().unwrap();
        assert_eq!(v, builtin_sources());

        // config/sources.toml is picked up
        fs::create_dir_all(tmp.path().join("config")).unwrap();
        fs::write(
            tmp.path().join("config/sources.toml"),
            "[[sources]]\nname = \"BMKB\"\ncategory = \"Financiering\"\nurl = \"https://example.test/bmkb\"\n",
        )
        .unwrap();
        let v = load_sources_default().unwrap();
        assert_eq!(v.len(), 1);
        assert_eq!(v[0].name, "BMKB");

        // Env takes precedence
        let p_json = tmp.path().join("mine.json");
        fs::write(
            &p_json,
            r#"[{"name":"X","category":"Y","url":"https://example.test/x"}]"#,
        )
        .unwrap();
        env::set_var(ENV_SOURCES_PATH, p_json.display().to_string());
        let v2 = load_sources_default().unwrap();
        assert_eq!(v2[0].name, "X");

        // Env pointing nowhere is an error, not a silent fallback
        env::set_var(ENV_SOURCES_PATH, tmp.path().join("missing.toml").display().to_string());
        assert!(load_sources_default().is_err());
        env::remove_var(ENV_SOURCES_PATH);

        env::set_current_dir(&old).unwrap();
    }
}
