use std::path::{Path, PathBuf};

mod terminal;

use clap::ArgAction;
use non_empty_string::NonEmptyString;
use stigtick::{
    transport::{Credentials, TicketClient},
    Benchmark, Config, TicketPayload,
};
use terminal::Colorize;
use tracing::instrument;

/// Environment variable supplying the ticketing API password.
///
/// This is a CLI boundary concern: credentials never appear in the
/// config file or on the command line.
const PASSWORD_ENV: &str = "STIGTICK_PASSWORD";

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// The path to the submission configuration file
    #[arg(short, long, default_value = "stigtick.toml", global = true)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);

        self.command.run(&self.config)
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[derive(Debug, clap::Parser)]
pub enum Command {
    /// Parse a benchmark document and report its structure
    Validate(Validate),

    /// Render the HTML audit report for a benchmark document
    Report(Report),

    /// Project each checklist group into a ticket and submit it
    Submit(Submit),
}

impl Command {
    fn run(self, config: &Path) -> anyhow::Result<()> {
        match self {
            Self::Validate(command) => command.run()?,
            Self::Report(command) => command.run()?,
            Self::Submit(command) => command.run(config)?,
        }
        Ok(())
    }
}

#[derive(Debug, clap::Parser)]
pub struct Validate {
    /// The benchmark document to parse
    file: PathBuf,
}

impl Validate {
    #[instrument]
    fn run(self) -> anyhow::Result<()> {
        let benchmark = Benchmark::load(&self.file)?;

        let groups = benchmark.groups();
        let rules: usize = groups.iter().map(|group| group.rules().len()).sum();
        let checks: usize = groups
            .iter()
            .map(|group| {
                group
                    .rules()
                    .iter()
                    .map(|rule| rule.checks().len())
                    .sum::<usize>()
            })
            .sum();

        println!("✓ Groups:  {}", groups.len());
        println!("✓ Rules:   {rules}");
        println!("✓ Checks:  {checks}");

        let unsupported = groups
            .iter()
            .filter(|group| group.rules().len() != 1)
            .count();
        if unsupported == 0 {
            println!("\n{}", "Benchmark parsed cleanly".success());
        } else {
            println!(
                "\n{}",
                format!(
                    "⚠️  {unsupported} groups do not hold exactly one rule; 'submit' will reject them"
                )
                .warning()
            );
        }

        Ok(())
    }
}

#[derive(Debug, clap::Parser)]
pub struct Report {
    /// The benchmark document to render
    file: PathBuf,

    /// Directory the report is written into
    #[clap(long, short, default_value = ".")]
    out_dir: PathBuf,
}

impl Report {
    #[instrument]
    fn run(self) -> anyhow::Result<()> {
        let benchmark = Benchmark::load(&self.file)?;

        let path = stigtick::report::write_to_dir(benchmark.groups(), &self.out_dir)?;

        println!("Wrote report to {}", path.display());
        Ok(())
    }
}

#[derive(Debug, clap::Parser)]
pub struct Submit {
    /// The benchmark document to submit
    file: PathBuf,

    /// Ticketing project id (overrides the config file)
    #[clap(long, short)]
    project: Option<String>,

    /// Reporter username (overrides the config file)
    #[clap(long, short)]
    reporter: Option<String>,

    /// Print the payloads instead of sending them
    #[clap(long)]
    dry_run: bool,
}

impl Submit {
    #[instrument]
    fn run(self, config_path: &Path) -> anyhow::Result<()> {
        let config = if config_path.exists() {
            Config::load(config_path).map_err(|e| anyhow::anyhow!("{e}"))?
        } else {
            Config::default()
        };

        let project = self.project.unwrap_or_else(|| config.project.clone());
        let project = NonEmptyString::new(project).map_err(|_| {
            anyhow::anyhow!("project id must not be empty (set it in the config or pass --project)")
        })?;

        let reporter = self.reporter.unwrap_or_else(|| config.reporter.clone());
        let reporter = NonEmptyString::new(reporter).map_err(|_| {
            anyhow::anyhow!("reporter must not be empty (set it in the config or pass --reporter)")
        })?;

        let benchmark = Benchmark::load(&self.file)?;

        // Project every group before sending anything, so a malformed
        // group aborts the run without a partial submission.
        let payloads = benchmark
            .groups()
            .iter()
            .map(|group| TicketPayload::project(group, &project, &reporter))
            .collect::<Result<Vec<_>, _>>()?;

        if self.dry_run {
            for payload in &payloads {
                println!("{}", serde_json::to_string_pretty(payload)?);
            }
            println!(
                "\n{}",
                format!("Dry run: {} tickets not sent", payloads.len()).dim()
            );
            return Ok(());
        }

        if config.endpoint.is_empty() {
            anyhow::bail!("endpoint must be set in the config file");
        }
        let password = std::env::var(PASSWORD_ENV)
            .map_err(|_| anyhow::anyhow!("set {PASSWORD_ENV} to the ticketing API password"))?;

        let client = TicketClient::new(
            config.endpoint,
            Credentials {
                username: config.username,
                password,
            },
        );

        for payload in &payloads {
            client.create_issue(payload)?;
            println!("✓ {}", payload.summary());
        }

        println!(
            "\n{}",
            format!("✅ Submitted {} tickets", payloads.len()).success()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BENCHMARK: &str = r#"<Benchmark>
        <Group id="V-1090">
            <title>Caching of logon credentials</title>
            <Rule id="SV-25033r1_rule" severity="low" weight="10">
                <title>Cached credentials</title>
                <description>Cached logon credentials weaken access control.</description>
                <reference/>
                <fixtext fixref="F-1_fix">Disable caching.</fixtext>
                <fix id="F-1_fix"/>
            </Rule>
        </Group>
    </Benchmark>"#;

    fn write_benchmark(dir: &Path) -> PathBuf {
        let path = dir.join("benchmark-xccdf.xml");
        std::fs::write(&path, BENCHMARK).unwrap();
        path
    }

    #[test]
    fn validate_run_succeeds_on_well_formed_document() {
        let tmp = tempfile::tempdir().unwrap();
        let file = write_benchmark(tmp.path());

        Validate { file }
            .run()
            .expect("validate should succeed on a well-formed document");
    }

    #[test]
    fn validate_run_fails_on_schema_violation() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("bad-xccdf.xml");
        std::fs::write(
            &file,
            r#"<Benchmark><Group id="V-1"><Rule id="SV-1_rule"><surprise/></Rule></Group></Benchmark>"#,
        )
        .unwrap();

        assert!(Validate { file }.run().is_err());
    }

    #[test]
    fn report_run_writes_the_report() {
        let tmp = tempfile::tempdir().unwrap();
        let file = write_benchmark(tmp.path());

        Report {
            file,
            out_dir: tmp.path().to_path_buf(),
        }
        .run()
        .expect("report should succeed on a well-formed document");

        let wrote_report = std::fs::read_dir(tmp.path()).unwrap().any(|entry| {
            let name = entry.unwrap().file_name();
            let name = name.to_string_lossy();
            name.starts_with("results.") && name.ends_with(".html")
        });
        assert!(wrote_report);
    }

    #[test]
    fn submit_dry_run_needs_no_endpoint_or_credentials() {
        let tmp = tempfile::tempdir().unwrap();
        let file = write_benchmark(tmp.path());

        let submit = Submit {
            file,
            project: Some("10108".to_string()),
            reporter: Some("634273".to_string()),
            dry_run: true,
        };

        submit
            .run(&tmp.path().join("missing.toml"))
            .expect("dry run should not touch the network");
    }

    #[test]
    fn submit_rejects_an_empty_project() {
        let tmp = tempfile::tempdir().unwrap();
        let file = write_benchmark(tmp.path());

        let submit = Submit {
            file,
            project: None,
            reporter: Some("634273".to_string()),
            dry_run: true,
        };

        // No config file and no flag: the project id resolves to empty.
        assert!(submit.run(&tmp.path().join("missing.toml")).is_err());
    }
}
