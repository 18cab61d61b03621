mod bootstrap;

use anyhow::{bail, Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use mcb_core::{BuilderConfig, RunReport};
use mcb_world::FileWorld;
use std::path::{Path, PathBuf};
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

fn cli() -> Command {
    let buildfile = Arg::new("buildfile")
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .help("Build document (XML)");

    Command::new("mcbuilder")
        .version(mcb_core::VERSION)
        .about("Replace annotated signs in a world with the structures of a build document")
        .arg_required_else_help(true)
        .subcommand_required(true)
        .arg(
            Arg::new("input")
                .short('i')
                .long("input")
                .required(true)
                .value_parser(value_parser!(PathBuf))
                .help("Original world, with placed descriptive signs"),
        )
        .arg(
            Arg::new("post")
                .short('p')
                .long("post")
                .value_name("TITLE")
                .conflicts_with("force")
                .help("Adds something to the world display title"),
        )
        .arg(
            Arg::new("force")
                .short('f')
                .long("force")
                .action(ArgAction::SetTrue)
                .help("Replace non-existing signs just by definition in the build document"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_parser(value_parser!(PathBuf))
                .help("TOML configuration file"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::SetTrue)
                .help("Debug logging"),
        )
        .subcommand(
            Command::new("init")
                .about("Write the signs found in the world to the build document")
                .arg(buildfile.clone()),
        )
        .subcommand(
            Command::new("build")
                .about("Copy the world and replace its signs with the declared structures")
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Output world, must not exist already"),
                )
                .arg(buildfile),
        )
}

fn main() {
    let matches = cli().get_matches();
    init_tracing(matches.get_flag("verbose"));

    match execute(&matches) {
        Ok(report) => println!("{report}"),
        Err(e) => {
            tracing::error!("{e:#}");
            std::process::exit(1);
        }
    }
}

fn init_tracing(verbose: bool) {
    let env_filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn load_config(matches: &ArgMatches) -> Result<BuilderConfig> {
    let mut config = match matches.get_one::<PathBuf>("config") {
        Some(path) => BuilderConfig::from_toml_file(path)?,
        None => BuilderConfig::new(),
    };
    if matches.get_flag("force") {
        config = config.with_force(true);
    }
    if let Some(post) = matches.get_one::<String>("post") {
        config = config.with_post_title(post.as_str());
    }
    Ok(config)
}

fn execute(matches: &ArgMatches) -> Result<RunReport> {
    let config = load_config(matches)?;
    let input = matches
        .get_one::<PathBuf>("input")
        .context("missing --input")?;

    let (command, args) = match matches.subcommand() {
        Some(("init", args)) => (mcb_core::Command::Init, args),
        Some(("build", args)) => (mcb_core::Command::Build, args),
        _ => bail!("expected a subcommand: init or build"),
    };
    let buildfile = args
        .get_one::<PathBuf>("buildfile")
        .context("missing build document")?;
    let output = args
        .try_get_one::<PathBuf>("output")
        .ok()
        .flatten()
        .map(PathBuf::as_path);

    let world_dir = bootstrap::prepare_world(input, output)?;
    let result = run_in(&world_dir, buildfile, command, &config);
    if result.is_err() && output.is_some() {
        bootstrap::discard_copy(&world_dir);
    }
    result
}

fn run_in(
    world_dir: &Path,
    buildfile: &Path,
    command: mcb_core::Command,
    config: &BuilderConfig,
) -> Result<RunReport> {
    let mut world = FileWorld::open(world_dir)
        .with_context(|| format!("opening world {}", world_dir.display()))?;
    let report = mcb_core::run(&mut world, buildfile, command, config)?;
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mcb_test_utils::{gate_world, GATE_DOCUMENT};
    use mcb_world::{Position, WorldStore};

    #[test]
    fn command_definition_is_valid() {
        cli().debug_assert();
    }

    #[test]
    fn post_conflicts_with_force() {
        let result = cli().try_get_matches_from(["mcbuilder", "--post", "x", "-f", "-i", "w", "init", "b.xml"]);
        assert!(result.is_err());
    }

    #[test]
    fn build_requires_output() {
        assert!(cli()
            .try_get_matches_from(["mcbuilder", "-i", "w", "build", "b.xml"])
            .is_err());
        assert!(cli()
            .try_get_matches_from(["mcbuilder", "-i", "w", "build", "-o", "out", "b.xml"])
            .is_ok());
    }

    #[test]
    fn flags_override_config() {
        let matches = cli()
            .try_get_matches_from(["mcbuilder", "-p", "(v2)", "-i", "w", "init", "b.xml"])
            .unwrap();
        let config = load_config(&matches).unwrap();
        assert_eq!(config.post_title.as_deref(), Some("(v2)"));
        assert!(!config.force);
    }

    #[test]
    fn build_writes_output_and_leaves_input() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("gate");
        let output = dir.path().join("gate-built");
        let doc = dir.path().join("gate.xml");
        FileWorld::create(&input, gate_world()).unwrap();
        std::fs::write(&doc, GATE_DOCUMENT).unwrap();

        let args = [
            "mcbuilder".into(),
            "-i".into(),
            input.clone().into_os_string(),
            "build".into(),
            "-o".into(),
            output.clone().into_os_string(),
            doc.into_os_string(),
        ];
        let matches = cli().try_get_matches_from(args).unwrap();
        let report = execute(&matches).unwrap();
        assert_eq!(report.placements_written, 1);

        let pos = Position::new(0, 64, 0);
        assert_eq!(FileWorld::open(&output).unwrap().block_at(pos).unwrap().id, 7);
        assert_eq!(FileWorld::open(&input).unwrap().block_at(pos).unwrap().id, 68);

        // Second build into the same output is refused
        assert!(execute(&matches).is_err());
        assert!(output.exists());
    }

    #[test]
    fn aborted_build_leaves_no_output() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("gate");
        let output = dir.path().join("gate-built");
        let doc = dir.path().join("gate.xml");
        FileWorld::create(&input, gate_world()).unwrap();
        std::fs::write(&doc, r#"<mcbuilder><signs><sign id="9"/></signs></mcbuilder>"#).unwrap();

        let args = [
            "mcbuilder".into(),
            "-i".into(),
            input.into_os_string(),
            "build".into(),
            "-o".into(),
            output.clone().into_os_string(),
            doc.clone().into_os_string(),
        ];
        let matches = cli().try_get_matches_from(args).unwrap();
        assert!(execute(&matches).is_err());
        assert!(!output.exists());

        std::fs::write(&doc, GATE_DOCUMENT).unwrap();
        assert_eq!(execute(&matches).unwrap().placements_written, 1);
    }
}
