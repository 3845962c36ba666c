//! SExtractor configuration files
//!
//! A `.sex` file holds one `KEYWORD value[,value...]` setting per line, with
//! `#` comments. Aperture radii for vector columns such as `FLUX_APER` only
//! appear here, under `PHOT_APERTURES`.

use crate::error::Result;
use indexmap::IndexMap;
use std::fs;
use std::path::Path;

/// Keyword to values, in file order
pub type Config = IndexMap<String, Vec<String>>;

/// Keyword listing aperture diameters in pixels
pub const PHOT_APERTURES: &str = "PHOT_APERTURES";

/// Parse configuration text
///
/// Values stop at the first token starting with `#`; comma-separated values
/// become separate entries. A repeated keyword keeps its last setting.
pub fn parse_config(text: &str) -> Config {
    let mut config = Config::new();
    for line in text.lines() {
        let mut tokens = line.split_whitespace();
        let Some(keyword) = tokens.next() else {
            continue;
        };
        if keyword.starts_with('#') {
            continue;
        }
        let values = tokens
            .take_while(|t| !t.starts_with('#'))
            .flat_map(|t| t.split(','))
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .collect();
        config.insert(keyword.to_string(), values);
    }
    config
}

/// Read a configuration file
pub fn load_config(path: impl AsRef<Path>) -> Result<Config> {
    let text = fs::read_to_string(path)?;
    Ok(parse_config(&text))
}

/// Aperture diameters from `PHOT_APERTURES`, if present and numeric
pub fn phot_apertures(config: &Config) -> Option<Vec<f64>> {
    config
        .get(PHOT_APERTURES)?
        .iter()
        .map(|v| v.parse::<f64>().ok())
        .collect()
}
