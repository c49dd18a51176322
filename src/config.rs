use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::convert::{ConversionRule, UnknownElementPolicy};
use crate::engine::Engine;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigFlags {
    pub strict: bool,
    pub pretty: bool,
    pub perf: bool,
    /// Extra rules as `NAME=ELEMENT:PARAM`, at most one per attribute.
    pub rules: Vec<String>,
}

impl ConfigFlags {
    /// Merge `other` over `self`. Booleans are OR-ed; a rule in `other`
    /// replaces a rule for the same attribute in `self`.
    pub fn union(&self, other: &Self) -> Self {
        let mut rules: Vec<String> = self
            .rules
            .iter()
            .filter(|rule| {
                !other
                    .rules
                    .iter()
                    .any(|theirs| rule_attribute(theirs) == rule_attribute(rule))
            })
            .cloned()
            .collect();
        rules.extend(other.rules.iter().cloned());

        Self {
            strict: self.strict || other.strict,
            pretty: self.pretty || other.pretty,
            perf: self.perf || other.perf,
            rules,
        }
    }

    pub const fn policy(&self) -> UnknownElementPolicy {
        if self.strict {
            UnknownElementPolicy::Reject
        } else {
            UnknownElementPolicy::Flatten
        }
    }

    /// Build an engine with the abbreviation rule followed by the extra rules.
    pub fn engine(&self) -> Result<Engine> {
        let mut builder = Engine::builder()
            .rule(ConversionRule::abbreviation())
            .policy(self.policy());
        for spec in &self.rules {
            let rule = ConversionRule::parse_spec(spec)
                .with_context(|| format!("Invalid --rule {spec}"))?;
            builder = builder.rule(rule);
        }
        builder.build().context("Failed to register conversion rules")
    }
}

fn rule_attribute(spec: &str) -> &str {
    spec.split_once('=').map_or(spec, |(name, _)| name).trim()
}

pub fn global_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            return PathBuf::from(appdata).join("abbrev").join("config");
        }
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join("Library")
                .join("Application Support")
                .join("abbrev")
                .join("config");
        }
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg).join("abbrev").join("config");
        }
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home).join(".config").join("abbrev").join("config");
        }
    }

    PathBuf::from(".abbrevrc")
}

pub fn local_override_path() -> PathBuf {
    PathBuf::from(".abbrevrc")
}

pub fn load_config_flags(path: &Path) -> Result<ConfigFlags> {
    if !path.exists() {
        return Ok(ConfigFlags::default());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let tokens = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .flat_map(|line| line.split_whitespace().map(ToOwned::to_owned))
        .collect::<Vec<_>>();
    Ok(parse_flag_tokens(&tokens))
}

pub fn save_config_flags(path: &Path, flags: &ConfigFlags) -> Result<()> {
    let mut lines = Vec::new();
    lines.push("# abbrev defaults (saved with --save)".to_string());
    if flags.strict {
        lines.push("--strict".to_string());
    }
    if flags.pretty {
        lines.push("--pretty".to_string());
    }
    if flags.perf {
        lines.push("--perf".to_string());
    }
    for rule in &flags.rules {
        lines.push(format!("--rule {rule}"));
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config dir {}", parent.display()))?;
    }
    fs::write(path, format!("{}\n", lines.join("\n")))
        .with_context(|| format!("Failed to write config {}", path.display()))
}

pub fn clear_config_flags(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_file(path).with_context(|| format!("Failed to remove {}", path.display()))?;
    }
    Ok(())
}

/// Pick known flags out of raw tokens; everything else is ignored.
pub fn parse_flag_tokens(tokens: &[String]) -> ConfigFlags {
    let mut flags = ConfigFlags::default();
    let mut i = 0;
    while i < tokens.len() {
        let token = &tokens[i];
        if token == "--strict" {
            flags.strict = true;
        } else if token == "--pretty" {
            flags.pretty = true;
        } else if token == "--perf" {
            flags.perf = true;
        } else if token == "--rule" {
            if let Some(next) = tokens.get(i + 1) {
                flags.rules.push(next.clone());
                i += 1;
            }
        } else if let Some(value) = token.strip_prefix("--rule=") {
            flags.rules.push(value.to_string());
        }
        i += 1;
    }
    flags
}
