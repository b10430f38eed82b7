//! Combining the config file with command-line display flags.

use super::glob_util::{expand_skip_patterns, parse_skip_list};
use super::DisplayArgs;
use crate::config::{GrapherConfig, GrapherOptions};
use crate::graph::Layout;
use crate::style::AttrValue;

/// Build grapher options: config file first, flags on top.
///
/// Skip patterns from both sources are expanded against `names`.
pub fn resolve_options<S: AsRef<str>>(
    display: &DisplayArgs,
    names: &[S],
) -> anyhow::Result<GrapherOptions> {
    let mut config = match display.config {
        Some(ref path) => GrapherConfig::load(path)
            .map_err(|e| anyhow::anyhow!("invalid config {}: {}", path.display(), e))?,
        None => GrapherConfig::default(),
    };

    if display.no_datatypes {
        config.show_datatypes = false;
    }
    if display.no_attributes {
        config.show_attributes = false;
    }
    if display.no_inherited {
        config.show_inherited = false;
    }
    if display.no_indexes {
        config.show_indexes = false;
    }
    if display.operations {
        config.show_operations = true;
    }
    if display.multiplicity_one {
        config.show_multiplicity_one = true;
    }

    if let Some(ref layout) = display.layout {
        let layout: Layout = layout.parse().map_err(|e| anyhow::anyhow!("{}", e))?;
        config
            .graph_options
            .insert("rankdir".to_string(), AttrValue::from(layout.rankdir()));
    }

    let mut patterns = std::mem::take(&mut config.skip);
    if let Some(ref skip) = display.skip {
        patterns.extend(parse_skip_list(skip));
    }
    config.skip = expand_skip_patterns(&patterns, names);

    Ok(config.into_options())
}
