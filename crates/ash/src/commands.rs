//! Subcommand implementations.

use crate::applier::{change_line, JsonLinesApplier};
use crate::cli::{CompareArgs, RenderArgs, ReviewArgs};
use crate::editor;
use anyhow::{bail, Context, Result};
use ash_api::{decode_activities, decode_changeset, overview_changeset};
use ash_config::{review_work_dir, AppConfig};
use ash_review::{apply_changes, Review, ReviewChange};
use std::fs::{self, File};
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};
use std::process::{self, ExitCode};

/// Exit code of `review` when the document was not changed.
pub const NO_CHANGES: u8 = 2;

/// Build the review document for a diff or activities response.
pub fn render_document(json: &str, args: &RenderArgs, config: &AppConfig) -> Result<String> {
    let mut review = if args.activities {
        let activities = decode_activities(json)?;
        let shown = activities.len().min(config.activities_limit as usize);
        if shown < activities.len() {
            log::info!("showing {} of {} activities", shown, activities.len());
        }
        Review::overview(overview_changeset(&activities[..shown]))
    } else {
        let changeset = decode_changeset(json, args.path.as_deref().unwrap_or_default())?;
        if config.ignore_whitespace && !changeset.ignore_whitespace {
            log::warn!("diff was fetched with whitespace changes, ignore_whitespace is set");
        }
        Review::new(changeset)
    };

    review.add_usage_banner();
    if let Some(url) = args.url.as_deref().or(config.review_url.as_deref()) {
        review.add_modeline(url);
    }
    Ok(review.render())
}

pub fn render(args: &RenderArgs, config: &AppConfig) -> Result<ExitCode> {
    let json = fs::read_to_string(&args.input)
        .with_context(|| format!("Failed to read {}", args.input.display()))?;
    let document = render_document(&json, args, config)?;

    match &args.output {
        Some(output) => fs::write(output, document)
            .with_context(|| format!("Failed to write {}", output.display()))?,
        None => print!("{}", document),
    }
    Ok(ExitCode::SUCCESS)
}

fn read_review(path: &Path, overview: bool, strict: bool) -> Result<Review> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let mut review = Review::read(BufReader::new(file), strict)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    review.is_overview = overview;
    Ok(review)
}

pub fn compare(args: &CompareArgs) -> Result<ExitCode> {
    let original = read_review(&args.original, args.overview, args.strict)?;
    let edited = read_review(&args.edited, args.overview, args.strict)?;

    for change in original.compare(&edited) {
        println!("{}", change_line(&change));
    }
    Ok(ExitCode::SUCCESS)
}

/// Copy the review into `work_dir` under a name owned by this process.
///
/// The original may itself live in `work_dir`, so the copy never reuses its
/// name.
fn prepare_work_file(original: &Path, work_dir: &Path) -> Result<PathBuf> {
    let file_name = original
        .file_name()
        .context("Review file has no file name")?
        .to_string_lossy();
    let work_file = work_dir.join(format!("{}.{}", process::id(), file_name));

    fs::copy(original, &work_file)
        .with_context(|| format!("Failed to copy review to {}", work_file.display()))?;
    log::debug!("Editing {} as {}", original.display(), work_file.display());
    Ok(work_file)
}

/// Keep the changes the user agrees to.
fn confirm_changes(changes: Vec<ReviewChange>) -> Result<Vec<ReviewChange>> {
    let mut confirmed = Vec::with_capacity(changes.len());
    for change in changes {
        if editor::confirm(&format!("Apply: {}?", change))? {
            confirmed.push(change);
        }
    }
    Ok(confirmed)
}

pub async fn review(args: &ReviewArgs, config: &AppConfig) -> Result<ExitCode> {
    let original = read_review(&args.original, args.overview, args.strict)?;

    let edited_path = match &args.input {
        Some(input) => input.clone(),
        None => {
            let work_dir = review_work_dir(&config.temp_dir)?;
            let work_file = prepare_work_file(&args.original, &work_dir)?;

            let command = args
                .editor
                .clone()
                .unwrap_or_else(|| config.editor_command());
            editor::edit_file(&command, &work_file)?;
            work_file
        }
    };

    let edited = read_review(&edited_path, args.overview, args.strict)?;
    let mut changes = original.compare(&edited);
    if changes.is_empty() {
        log::info!("no changes in {}", edited_path.display());
        return Ok(ExitCode::from(NO_CHANGES));
    }

    if args.interactive || config.interactive {
        changes = confirm_changes(changes)?;
    }

    let applier = JsonLinesApplier::new(io::stdout());
    let report = apply_changes(&applier, &changes).await;
    log::info!("applied {} of {} change(s)", report.applied, changes.len());

    if !report.is_success() {
        for (index, error) in &report.failed {
            log::error!("change {} failed: {}", index + 1, error);
        }
        bail!("{} change(s) could not be applied", report.failed.len());
    }
    Ok(ExitCode::SUCCESS)
}
