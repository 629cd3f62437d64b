use std::{
    borrow::Cow,
    path::{Path, PathBuf},
};

use compio::fs;
use hashlink::LinkedHashMap;
use saphyr::{LoadableYamlNode, Scalar, Yaml};
use snafu::prelude::*;
use tracing::{debug, warn};

use crate::filesystem::{AbsolutePath, FilesystemTree, FsError, validate_name};
use crate::game::GameSettings;

const FILESYSTEM_SECTION: &str = "filesystem";
const GAME_SECTION: &str = "game";

type Mapping<'a> = LinkedHashMap<Yaml<'a>, Yaml<'a>>;

fn lookup<'a, 'm>(mapping: &'m Mapping<'a>, name: &'a str) -> Option<&'m Yaml<'a>> {
    mapping.get(&Yaml::Value(Scalar::String(Cow::Borrowed(name))))
}

/// Startup configuration: the initial tree and the game viewport.
#[derive(Debug, Clone, Default)]
pub struct ShellConfig {
    pub tree: FilesystemTree,
    pub game: GameSettings,
}

impl ShellConfig {
    pub async fn read(path: &Path) -> Result<Self, ShellConfigError> {
        debug!("Opening config file: {}", path.display());
        let bytes = fs::read(path).await.context(ReadSnafu {
            file_path: path.to_path_buf(),
        })?;
        let contents = String::from_utf8(bytes).context(EncodingSnafu {
            file_path: path.to_path_buf(),
        })?;
        debug!("Successfully read config file: {} bytes", contents.len());

        contents.as_str().try_into()
    }

    fn parse_filesystem(top_level: &Mapping<'_>) -> Result<FilesystemTree, ShellConfigError> {
        let Some(section) = lookup(top_level, FILESYSTEM_SECTION) else {
            debug!("No filesystem section, using the default tree");
            return Ok(FilesystemTree::default());
        };
        let entries = section.as_mapping().context(SectionNotMapSnafu {
            section: FILESYSTEM_SECTION,
        })?;

        let mut tree = FilesystemTree::empty();
        Self::populate(&mut tree, &AbsolutePath::root(), entries)?;
        Ok(tree)
    }

    /// Mappings become directories, strings become files with that content
    /// and null becomes an empty file.
    fn populate(
        tree: &mut FilesystemTree,
        dir: &AbsolutePath,
        entries: &Mapping<'_>,
    ) -> Result<(), ShellConfigError> {
        for (key, value) in entries {
            let name = key.as_str().context(EntryNameNotStringSnafu {
                directory: dir.to_string(),
                key: format!("{key:?}"),
            })?;
            validate_name(name).context(EntrySnafu {
                path: format!("{dir}/{name}"),
            })?;
            let path = dir.join(name);

            match value {
                Yaml::Mapping(children) => {
                    tree.make_directory(dir, name).context(EntrySnafu {
                        path: path.to_string(),
                    })?;
                    Self::populate(tree, &path, children)?;
                }
                Yaml::Value(Scalar::String(content)) => {
                    tree.write_file(&path, content.as_ref())
                        .context(EntrySnafu {
                            path: path.to_string(),
                        })?;
                }
                Yaml::Value(Scalar::Null) => {
                    tree.write_file(&path, "").context(EntrySnafu {
                        path: path.to_string(),
                    })?;
                }
                _ => {
                    return UnsupportedEntrySnafu {
                        path: path.to_string(),
                    }
                    .fail();
                }
            }
        }
        Ok(())
    }

    fn parse_game(top_level: &Mapping<'_>) -> Result<GameSettings, ShellConfigError> {
        let mut settings = GameSettings::default();
        let Some(section) = lookup(top_level, GAME_SECTION) else {
            return Ok(settings);
        };
        let game = section.as_mapping().context(SectionNotMapSnafu {
            section: GAME_SECTION,
        })?;

        for (key, value) in game {
            let setting = key.as_str().unwrap_or_default();
            match setting {
                "width" => settings.width = Self::integer(setting, value, 1)? as f64,
                "height" => settings.height = Self::integer(setting, value, 1)? as f64,
                "seed" => settings.seed = Some(Self::integer(setting, value, 0)?),
                _ => warn!("Skipping unknown game setting: {:?}", key),
            }
        }
        Ok(settings)
    }

    fn integer(setting: &str, value: &Yaml<'_>, minimum: i64) -> Result<u64, ShellConfigError> {
        match value {
            Yaml::Value(Scalar::Integer(number)) if *number >= minimum => Ok(*number as u64),
            _ => InvalidGameSettingSnafu { setting, minimum }.fail(),
        }
    }
}

impl TryFrom<&str> for ShellConfig {
    type Error = ShellConfigError;

    fn try_from(contents: &str) -> Result<Self, Self::Error> {
        let documents = Yaml::load_from_str(contents).context(ParseSnafu)?;
        let document = documents.first().context(MalformedConfigSnafu)?;
        let top_level = document.as_mapping().context(TopLevelNotMapSnafu)?;

        for key in top_level.keys() {
            match key.as_str() {
                Some(FILESYSTEM_SECTION) | Some(GAME_SECTION) => {}
                _ => warn!("Skipping unknown config section: {:?}", key),
            }
        }

        Ok(ShellConfig {
            tree: Self::parse_filesystem(top_level)?,
            game: Self::parse_game(top_level)?,
        })
    }
}

#[derive(Debug, Snafu)]
pub enum ShellConfigError {
    #[snafu(display("Failed to read the config file: {}", file_path.display()))]
    ReadError {
        file_path: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display("Config file {} is not valid UTF-8", file_path.display()))]
    EncodingError {
        file_path: PathBuf,
        source: std::string::FromUtf8Error,
    },
    #[snafu(display("Failed to parse the config file"))]
    ParseError { source: saphyr::ScanError },
    #[snafu(display("Improperly formatted config file"))]
    MalformedConfig,
    #[snafu(display("Top level of config should be a map"))]
    TopLevelNotMap,
    #[snafu(display("Section '{}' should be a map", section))]
    SectionNotMap { section: String },
    #[snafu(display("Entry {} in {} is not named by a string", key, directory))]
    EntryNameNotString { directory: String, key: String },
    #[snafu(display("Cannot create '{}' in the initial tree", path))]
    EntryError { path: String, source: FsError },
    #[snafu(display(
        "Entry '{}' should be a map (directory), a string or null (file)",
        path
    ))]
    UnsupportedEntry { path: String },
    #[snafu(display(
        "Game setting '{}' should be an integer of at least {}",
        setting,
        minimum
    ))]
    InvalidGameSetting { setting: String, minimum: i64 },
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn parse(contents: &str) -> Result<ShellConfig, ShellConfigError> {
        contents.try_into()
    }

    fn path(raw: &str) -> AbsolutePath {
        AbsolutePath::root().resolve(Some(raw))
    }

    #[compio::test]
    async fn config_returns_error_on_nonexistent_file() {
        let result = ShellConfig::read(Path::new("nonexistent.yaml")).await;
        assert!(matches!(result, Err(ShellConfigError::ReadError { .. })));
    }

    #[compio::test]
    async fn config_reads_tree_from_file() {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        writeln!(file, "filesystem:\n  etc:\n    motd: \"welcome\"").expect("Failed to write");

        let config = ShellConfig::read(file.path())
            .await
            .expect("Failed to read config");
        assert_eq!(config.tree.read_file(&path("/etc/motd")), Ok("welcome"));
    }

    #[compio::test]
    async fn config_returns_error_on_binary_file() {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(&[0xff, 0xfe, 0x00]).expect("Failed to write");

        let result = ShellConfig::read(file.path()).await;
        assert!(matches!(result, Err(ShellConfigError::EncodingError { .. })));
    }

    #[test]
    fn config_returns_error_on_invalid_yaml() {
        let result = parse("invalid: yaml: content: [unclosed");
        assert!(matches!(result, Err(ShellConfigError::ParseError { .. })));
    }

    #[test]
    fn config_returns_error_on_empty_file() {
        assert!(matches!(parse(""), Err(ShellConfigError::MalformedConfig)));
    }

    #[rstest]
    #[case("- item1\n- item2")]
    #[case("just a string")]
    fn config_returns_error_when_top_level_is_not_map(#[case] contents: &str) {
        assert!(matches!(
            parse(contents),
            Err(ShellConfigError::TopLevelNotMap)
        ));
    }

    #[rstest]
    #[case("filesystem: [home, tmp]", "filesystem")]
    #[case("game: 42", "game")]
    fn config_returns_error_when_section_is_not_map(
        #[case] contents: &str,
        #[case] expected: &str,
    ) {
        match parse(contents) {
            Err(ShellConfigError::SectionNotMap { section }) => assert_eq!(section, expected),
            other => panic!("Expected SectionNotMap, got {other:?}"),
        }
    }

    #[test]
    fn config_without_sections_uses_defaults() {
        let config = parse("other_config: value").unwrap();
        assert_eq!(config.tree, FilesystemTree::default());
        assert_eq!(config.game, GameSettings::default());
    }

    #[test]
    fn config_builds_nested_tree() {
        let config = parse(
            r#"
filesystem:
  home:
    user:
      notes: "remember the milk"
      empty:
  var: {}
"#,
        )
        .unwrap();

        let tree = &config.tree;
        assert!(tree.is_directory(&path("/home/user")));
        assert!(tree.is_directory(&path("/var")));
        assert!(!tree.exists(&path("/tmp")));
        assert_eq!(
            tree.read_file(&path("/home/user/notes")),
            Ok("remember the milk")
        );
        assert_eq!(tree.read_file(&path("/home/user/empty")), Ok(""));
    }

    #[test]
    fn config_allows_an_empty_root() {
        let config = parse("filesystem: {}").unwrap();
        assert_eq!(config.tree, FilesystemTree::empty());
    }

    #[rstest]
    #[case("filesystem:\n  \"..\": {}")]
    #[case("filesystem:\n  \"a/b\": \"x\"")]
    fn config_rejects_invalid_entry_names(#[case] contents: &str) {
        assert!(matches!(
            parse(contents),
            Err(ShellConfigError::EntryError {
                source: FsError::InvalidName { .. },
                ..
            })
        ));
    }

    #[test]
    fn config_rejects_non_string_entry_names() {
        assert!(matches!(
            parse("filesystem:\n  123: {}"),
            Err(ShellConfigError::EntryNameNotString { .. })
        ));
    }

    #[rstest]
    #[case("filesystem:\n  list: [1, 2]")]
    #[case("filesystem:\n  number: 7")]
    fn config_rejects_unsupported_entries(#[case] contents: &str) {
        assert!(matches!(
            parse(contents),
            Err(ShellConfigError::UnsupportedEntry { .. })
        ));
    }

    #[test]
    fn config_reads_game_settings() {
        let config =
            parse("game:\n  width: 1024\n  height: 768\n  seed: 9\n  colour: pink").unwrap();
        assert_eq!(
            config.game,
            GameSettings {
                width: 1024.0,
                height: 768.0,
                seed: Some(9),
            }
        );
    }

    #[rstest]
    #[case("game:\n  width: 0", 1)]
    #[case("game:\n  height: -5", 1)]
    #[case("game:\n  seed: lucky", 0)]
    #[case("game:\n  seed: -1", 0)]
    fn config_rejects_invalid_game_settings(#[case] contents: &str, #[case] expected: i64) {
        match parse(contents) {
            Err(ShellConfigError::InvalidGameSetting { minimum, .. }) => {
                assert_eq!(minimum, expected);
            }
            other => panic!("Expected InvalidGameSetting, got {other:?}"),
        }
    }

    #[test]
    fn config_accepts_a_zero_seed() {
        let config = parse("game:\n  seed: 0").unwrap();
        assert_eq!(config.game.seed, Some(0));
    }

    #[test]
    fn config_handles_unicode_names() {
        let config = parse("filesystem:\n  \"тест\": {}\n  \"🚀\": \"launch\"").unwrap();
        assert!(config.tree.is_directory(&path("/тест")));
        assert_eq!(config.tree.read_file(&path("/🚀")), Ok("launch"));
    }
}
