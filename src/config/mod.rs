use std::{
    fs, io::{self, Write}, path::{Path, PathBuf},
};
use confique::Config as _;

use crate::{paginate::CursorPolicy, prelude::*};


/// The locations where Folio will look for a configuration file. The first
/// existing file in this list is used.
const DEFAULT_PATHS: &[&str] = &[
    "config.toml",
    "/etc/folio/config.toml",
];

const FOLIO_CONFIG_PATH_ENV: &str = "FOLIO_CONFIG_PATH";

/// Configuration for Folio.
///
/// All relative paths are relative to the location of this configuration file.
/// Every option has a default value, so an empty file (or no file at all) is
/// a valid configuration.
#[derive(Debug, confique::Config)]
pub(crate) struct Config {
    #[config(nested)]
    pub(crate) http: crate::http::HttpConfig,

    #[config(nested)]
    pub(crate) log: crate::logger::LogConfig,

    #[config(nested)]
    pub(crate) api: ApiConfig,

    #[config(nested)]
    pub(crate) data: DataConfig,
}

/// Settings for the GraphQL API.
#[derive(Debug, Clone, confique::Config)]
pub(crate) struct ApiConfig {
    /// Number of items returned by `books` and `posts` if the `first`
    /// argument is not given.
    #[config(default = 10)]
    pub(crate) default_page_size: u32,

    /// Upper limit for the `first` argument. Larger values are silently
    /// lowered to this.
    #[config(default = 100)]
    pub(crate) max_page_size: u32,

    /// What to do with an `after` argument that is not a valid cursor.
    /// "strict" rejects the request with an `INVALID_CURSOR` error,
    /// "lenient" ignores the cursor and starts at the beginning.
    #[config(default = "strict")]
    pub(crate) cursor_policy: CursorPolicy,
}

/// Where the books and posts come from.
#[derive(Debug, Clone, confique::Config)]
pub(crate) struct DataConfig {
    /// YAML file with `books` and `posts` lists. If not set, built-in demo
    /// data is used. Example: "seed.yaml".
    pub(crate) seed_file: Option<PathBuf>,
}

impl ApiConfig {
    fn validate(&self) -> Result<()> {
        if self.max_page_size == 0 {
            bail!("'api.max_page_size' must be at least 1");
        }
        if self.max_page_size > i32::MAX as u32 {
            bail!("'api.max_page_size' must not exceed {}", i32::MAX);
        }
        if self.default_page_size > self.max_page_size {
            bail!(
                "'api.default_page_size' ({}) must not be larger than 'api.max_page_size' ({})",
                self.default_page_size,
                self.max_page_size,
            );
        }

        Ok(())
    }
}

impl Config {
    /// Tries to find a config file by checking `FOLIO_CONFIG_PATH` and from a
    /// list of possible default config file locations. The first config file
    /// is loaded via [`Self::load_from`]. If no file exists, the default
    /// configuration is returned. Also returns the path the config was loaded
    /// from, if any.
    pub(crate) fn from_env_or_default_locations() -> Result<(Self, Option<PathBuf>)> {
        let path = std::env::var_os(FOLIO_CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .or_else(|| DEFAULT_PATHS.iter().map(PathBuf::from).find(|p| p.exists()));

        match path {
            Some(path) => {
                let config = Self::load_from(&path)
                    .context(format!("failed to load configuration from '{}'", path.display()))?;
                Ok((config, Some(path)))
            }
            None => {
                let config = Config::builder().load()
                    .context("failed to build default configuration")?;
                config.validate()?;
                Ok((config, None))
            }
        }
    }

    /// Loads the configuration from a specific TOML file.
    pub(crate) fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = Config::from_file(path)
            .context(format!("failed to read config file '{}'", path.display()))?;

        config.validate()?;
        config.fix_paths(path)?;

        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        self.api.validate()
    }

    /// Goes through all paths in the configuration and changes relative paths
    /// to be absolute based on the path of the configuration file itself.
    fn fix_paths(&mut self, config_path: &Path) -> Result<()> {
        fn fix_path(base_path: &Path, path: &mut PathBuf) {
            if path.is_relative() {
                *path = base_path.join(&path);
            }
        }

        let absolute_config_path = config_path.canonicalize()
            .context("failed to canonicalize config path")?;
        let base = absolute_config_path.parent()
            .ok_or_else(|| anyhow!("config file path has no parent"))?;

        if let Some(p) = &mut self.http.unix_socket {
            fix_path(base, p);
        }
        if let Some(p) = &mut self.log.file {
            fix_path(base, p);
        }
        if let Some(p) = &mut self.data.seed_file {
            fix_path(base, p);
        }

        Ok(())
    }
}

/// Generates the TOML config template including descriptions of all options.
pub(crate) fn template() -> String {
    use confique::toml::FormatOptions;

    let mut options = FormatOptions::default();
    options.general.nested_field_gap = 2;
    confique::toml::template::<Config>(options)
}

/// Writes the generated TOML config template file to the given destination or
/// stdout.
pub(crate) fn write_template(path: Option<&PathBuf>) -> Result<()> {
    info!(
        "Writing configuration template to '{}'",
        path.map(|p| p.display().to_string()).unwrap_or("<stdout>".into()),
    );

    let template = template();
    match path {
        Some(path) => fs::write(path, template)
            .context(format!("failed to write '{}'", path.display()))?,
        None => io::stdout().write_all(template.as_bytes())?,
    }

    Ok(())
}


#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    /// Writes `content` into a fresh temporary directory and returns the path
    /// of the config file.
    fn write_config(name: &str, content: &str) -> PathBuf {
        let dir = std::env::temp_dir()
            .join(format!("folio-config-test-{}-{name}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn template_mentions_all_sections() {
        let template = template();
        for section in ["[http]", "[log]", "[api]", "[data]"] {
            assert!(template.contains(section), "missing {section} in template");
        }
        assert!(template.contains("cursor_policy"));
    }

    #[test]
    fn empty_file_uses_defaults() {
        let config = Config::load_from(write_config("empty", "")).unwrap();
        assert_eq!(config.http.port, 3080);
        assert_eq!(config.api.default_page_size, 10);
        assert_eq!(config.api.max_page_size, 100);
        assert_eq!(config.api.cursor_policy, CursorPolicy::Strict);
        assert!(config.data.seed_file.is_none());
    }

    #[test]
    fn relative_paths_are_fixed() {
        let path = write_config("paths", "[data]\nseed_file = \"seed.yaml\"\n");
        let config = Config::load_from(&path).unwrap();
        let expected = path.canonicalize().unwrap().parent().unwrap().join("seed.yaml");
        assert_eq!(config.data.seed_file, Some(expected));
    }

    #[test]
    fn lenient_policy() {
        let path = write_config("lenient", "[api]\ncursor_policy = \"lenient\"\n");
        let config = Config::load_from(path).unwrap();
        assert_eq!(config.api.cursor_policy, CursorPolicy::Lenient);
    }

    #[test]
    fn invalid_page_sizes() {
        let path = write_config("sizes", "[api]\ndefault_page_size = 50\nmax_page_size = 20\n");
        assert!(Config::load_from(path).is_err());

        let path = write_config("zero", "[api]\nmax_page_size = 0\ndefault_page_size = 0\n");
        assert!(Config::load_from(path).is_err());

        let path = write_config("policy", "[api]\ncursor_policy = \"sloppy\"\n");
        assert!(Config::load_from(path).is_err());
    }
}
