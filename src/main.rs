use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use git_release::cli::{ReleaseRequest, ReleaseWorkflow};
use git_release::config::{self, Config};
use git_release::domain::ReleaseKind;
use git_release::{logging, ui};

#[derive(Parser)]
#[command(
    name = "git-release",
    version,
    about = "Compute the next release version, tag it and keep a changelog"
)]
struct Args {
    #[arg(short, long, global = true, help = "Custom configuration file path")]
    config: Option<String>,

    #[arg(
        short = 'C',
        long,
        global = true,
        default_value = ".",
        help = "Project root directory"
    )]
    root: PathBuf,

    #[arg(short, long, global = true, help = "Show debug logging")]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Display information about the current release
    Current {
        #[arg(long, help = "Display only the version name")]
        raw: bool,

        #[arg(long, help = "Display the associated VCS tag")]
        vcs_tag: bool,
    },

    /// Show the list of changes since the last release
    Changes {
        #[arg(long, help = "Exclude merge commits")]
        exclude_merge_commits: bool,
    },

    /// Release a new version
    Release {
        #[arg(short = 't', long = "type", help = "Release type: major, minor or patch")]
        kind: Option<ReleaseKind>,

        #[arg(short, long, help = "Pre-release label (e.g. rc, beta, none)")]
        label: Option<String>,

        #[arg(short = 'm', long, help = "Comment associated with the release")]
        comment: Option<String>,

        #[arg(long, help = "Preview what would happen without making changes")]
        dry_run: bool,
    },
}

fn main() {
    let args = Args::parse();

    if let Err(e) = logging::init(args.verbose) {
        ui::display_error(&e.to_string());
        std::process::exit(1);
    }

    let config = match config::load_config(args.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            ui::display_error(&format!("Error loading config: {}", e));
            std::process::exit(1);
        }
    };

    let result = match args.command {
        Command::Current { raw, vcs_tag } => show_current(&config, &args.root, raw, vcs_tag),
        Command::Changes {
            exclude_merge_commits,
        } => show_changes(&config, &args.root, exclude_merge_commits),
        Command::Release {
            kind,
            label,
            comment,
            dry_run,
        } => release(&config, &args.root, kind, label, comment, dry_run),
    };

    match result {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            ui::display_error(&format!("{:#}", e));
            std::process::exit(1);
        }
    }
}

fn show_current(config: &Config, root: &Path, raw: bool, vcs_tag: bool) -> Result<bool> {
    let workflow =
        ReleaseWorkflow::inspect(config, root).context("Failed to set up release workflow")?;

    let version = match workflow.released_version() {
        Ok(version) => version,
        Err(e) if e.is_no_release_found() => {
            println!("There is no existing tag");
            return Ok(true);
        }
        Err(e) => return Err(e).context("Failed to read the current version"),
    };

    let tag = if vcs_tag {
        Some(workflow.tag_from_version(&version)?)
    } else {
        None
    };

    if raw {
        println!("{}", tag.as_deref().unwrap_or(&version));
    } else {
        ui::display_current(&version, tag.as_deref());
    }

    Ok(true)
}

fn show_changes(config: &Config, root: &Path, exclude_merge_commits: bool) -> Result<bool> {
    let workflow =
        ReleaseWorkflow::inspect(config, root).context("Failed to set up release workflow")?;

    match workflow.last_changes(exclude_merge_commits) {
        Ok((tag, changes)) => {
            ui::display_changes(&tag, &changes);
            Ok(true)
        }
        Err(e) if e.is_no_release_found() => {
            ui::display_warning("There is no existing tag");
            Ok(false)
        }
        Err(e) => Err(e).context("Failed to list changes"),
    }
}

fn release(
    config: &Config,
    root: &Path,
    kind: Option<ReleaseKind>,
    label: Option<String>,
    comment: Option<String>,
    dry_run: bool,
) -> Result<bool> {
    let request = ReleaseRequest::resolve(&config.generator, kind, label.as_deref(), comment)?;

    let mut workflow = ReleaseWorkflow::from_config(config, root, dry_run)
        .context("Failed to set up release workflow")?;

    if dry_run {
        ui::display_status("Dry run: nothing will be written");
    }

    let outcome = workflow.run(&request).context("Release failed")?;

    ui::display_release_plan(outcome.previous_version.as_deref(), &outcome.version);

    if outcome.changelog_updated {
        ui::display_success("Changelog updated");
    }

    match &outcome.tag {
        Some(tag) => ui::display_success(&format!("Released {}", tag)),
        None => ui::display_status(&format!(
            "Would release {}",
            workflow.tag_from_version(&outcome.version)?
        )),
    }

    if outcome.published {
        ui::display_success(&format!("Published to {}", config.vcs.remote));
    }

    Ok(true)
}
