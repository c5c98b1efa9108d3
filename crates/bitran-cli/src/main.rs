use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use bitran_config::Config;
use bitran_core::{Dom, NodeId, trace_node_down_with};
use bitran_transpiler::{BitranTranspiler, HashAutoId, ParseOptions, StringifyOptions};
use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "bitran", version, about = "Parse bitran markup and write it back")]
struct Cli {
    /// Config file. Defaults to ~/.config/bitran/config.toml when present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the parsed node tree with element ids
    Tree { file: PathBuf },
    /// Print the document as the stringifier writes it
    Fmt { file: PathBuf },
    /// Verify that each file stringifies back to its own text
    Check {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

/// First line where two texts disagree.
#[derive(Debug, PartialEq, Eq)]
struct Mismatch {
    line: usize,
    expected: String,
    actual: String,
}

struct App {
    transpiler: BitranTranspiler,
    config: Config,
}

impl App {
    fn new(config: Config) -> Result<Self> {
        let transpilers =
            bitran_elements::transpilers().context("Failed to register elements")?;
        Ok(Self {
            transpiler: BitranTranspiler::new(transpilers),
            config,
        })
    }

    fn parse_options(&self) -> ParseOptions {
        let auto_id = &self.config.auto_id;
        ParseOptions::new().with_auto_id(HashAutoId::new(auto_id.hash_length, &auto_id.suffix))
    }

    async fn parse(&self, text: &str) -> Result<Dom> {
        Ok(self.transpiler.parser.parse(text, self.parse_options()).await?)
    }

    async fn stringify(&self, dom: &Dom) -> Result<String> {
        Ok(self
            .transpiler
            .stringifier
            .stringify(dom, dom.root(), StringifyOptions::new())
            .await?)
    }

    async fn tree(&self, text: &str) -> Result<String> {
        let dom = self.parse(text).await?;
        Ok(trace_node_down_with(&dom, dom.root(), annotate))
    }

    async fn fmt(&self, text: &str) -> Result<String> {
        let dom = self.parse(text).await?;
        self.stringify(&dom).await
    }

    async fn check(&self, text: &str) -> Result<Option<Mismatch>> {
        let output = self.fmt(text).await?;
        Ok(first_mismatch(text, &output))
    }
}

fn annotate(dom: &Dom, node: NodeId) -> Option<String> {
    if let Some(error) = dom[node].as_error() {
        return Some(format!("!! {}", error.error));
    }
    let element = dom.element(node)?;
    match (element.meta.id(), element.auto_id.as_deref()) {
        (Some(id), Some(auto_id)) => Some(format!("#{id} [{auto_id}]")),
        (Some(id), None) => Some(format!("#{id}")),
        (None, Some(auto_id)) => Some(format!("[{auto_id}]")),
        (None, None) => None,
    }
}

fn first_mismatch(expected: &str, actual: &str) -> Option<Mismatch> {
    let mut expected_lines = expected.split('\n');
    let mut actual_lines = actual.split('\n');
    let mut line = 1;
    loop {
        match (expected_lines.next(), actual_lines.next()) {
            (None, None) => return None,
            (Some(left), Some(right)) if left == right => line += 1,
            (left, right) => {
                return Some(Mismatch {
                    line,
                    expected: left.unwrap_or("<end of file>").to_string(),
                    actual: right.unwrap_or("<end of file>").to_string(),
                });
            }
        }
    }
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = Config::load_or_default(cli.config.as_deref())?;
    log::debug!("using config {config:?}");
    let app = App::new(config)?;

    match cli.command {
        Command::Tree { file } => println!("{}", app.tree(&read(&file)?).await?),
        Command::Fmt { file } => println!("{}", app.fmt(&read(&file)?).await?),
        Command::Check { files } => {
            let mut failures = 0;
            for file in &files {
                match app.check(&read(file)?).await? {
                    None => println!("ok {}", file.display()),
                    Some(mismatch) => {
                        failures += 1;
                        println!("FAIL {}:{}", file.display(), mismatch.line);
                        println!("  expected: {:?}", mismatch.expected);
                        println!("  actual:   {:?}", mismatch.actual);
                    }
                }
            }
            if failures > 0 {
                bail!("{failures} of {} files did not round-trip", files.len());
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bitran_config::AutoIdConfig;
    use clap::CommandFactory;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn app() -> App {
        App::new(Config::default()).unwrap()
    }

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_check_requires_files() {
        assert!(Cli::try_parse_from(["bitran", "check"]).is_err());
    }

    #[test]
    fn test_config_flag_after_subcommand() {
        let cli = Cli::try_parse_from(["bitran", "fmt", "a.bitran", "--config", "c.toml"]).unwrap();

        assert_eq!(cli.config, Some(PathBuf::from("c.toml")));
    }

    fn auto_id_on(tree: &str, label: &str) -> String {
        let line = tree
            .lines()
            .find(|line| line.trim_start().starts_with(label))
            .unwrap();
        let start = line.find('[').unwrap() + 1;
        let end = line.find(']').unwrap();
        line[start..end].to_string()
    }

    #[tokio::test]
    async fn test_tree_annotates_ids() {
        let tree = app().tree("{ #top }\n# Top\n\nSome `code`").await.unwrap();
        let lines: Vec<_> = tree.lines().collect();

        assert_eq!(lines[0], "<root>");
        assert_eq!(lines[1], "  heading #top [heading:top]");
        assert!(lines[2].starts_with("  paragraph [paragraph:"));
        assert_eq!(lines[3], "    <inliners>");
        assert!(lines[4].starts_with("      text [text:"));
        assert!(lines[5].starts_with("      code [code:"));
        assert_eq!(lines.len(), 6);
        // Only the heading carries an explicit id.
        assert_eq!(tree.matches('#').count(), 1);
    }

    #[tokio::test]
    async fn test_tree_shows_errors() {
        let tree = app().tree("@heading\n    title: No level").await.unwrap();

        assert_eq!(
            tree,
            "<root>\n  <heading> (error) !! heading object needs a numeric `level`"
        );
    }

    #[tokio::test]
    async fn test_fmt_is_identity_for_canonical_text() {
        let text = "## Intro\n\nSome **bold** text -- and `code`{ .rust }";

        assert_eq!(app().fmt(text).await.unwrap(), text);
    }

    #[tokio::test]
    async fn test_check_reports_first_differing_line() {
        let text = "# Title\n\n\n\nbody";

        let mismatch = app().check(text).await.unwrap();

        assert_eq!(
            mismatch,
            Some(Mismatch {
                line: 3,
                expected: String::new(),
                actual: "body".to_string(),
            })
        );
    }

    #[tokio::test]
    async fn test_configured_hash_length() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        let config = Config {
            auto_id: AutoIdConfig {
                hash_length: 3,
                suffix: "~".to_string(),
            },
        };
        config.save_to_path(&path).unwrap();

        let loaded = Config::load_or_default(Some(path.as_path())).unwrap();
        let tree = App::new(loaded).unwrap().tree("plain").await.unwrap();

        assert_eq!(auto_id_on(&tree, "paragraph").len(), "paragraph:abc".len());
    }

    #[test]
    fn test_first_mismatch() {
        assert_eq!(first_mismatch("a\nb", "a\nb"), None);
        assert_eq!(
            first_mismatch("a\nb\nc", "a\nx\nc"),
            Some(Mismatch {
                line: 2,
                expected: "b".to_string(),
                actual: "x".to_string(),
            })
        );
        assert_eq!(
            first_mismatch("a\nb", "a"),
            Some(Mismatch {
                line: 2,
                expected: "b".to_string(),
                actual: "<end of file>".to_string(),
            })
        );
    }

    #[test]
    fn test_first_mismatch_line_endings() {
        assert_eq!(first_mismatch("a\n", "a").map(|m| m.line), Some(2));
        assert_eq!(
            first_mismatch("a\r\nb", "a\nb").map(|m| m.expected),
            Some("a\r".to_string())
        );
    }
}
