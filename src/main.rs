use clap::{Parser, Subcommand};
use lesson_images::config::RunConfig;
use lesson_images::{extract, listing, naming, output, reconcile, rename};
use std::collections::BTreeSet;
use std::error::Error;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

/// Shared arguments for commands that operate on one lesson.
#[derive(clap::Args, Clone)]
struct LessonArgs {
    /// Markdown lesson document
    document: PathBuf,

    /// Image directory
    #[arg(long, default_value = "img")]
    image_dir: PathBuf,
}

#[derive(Parser)]
#[command(name = "lesson-images")]
#[command(about = "Keep a lesson's images in sync with its Markdown document")]
#[command(long_about = "\
Keep a lesson's images in sync with its Markdown document

The document references images with exactly one of two syntaxes:

  {% include figure.html filename=\"intro01.png\" %}
  <img src=\"intro01.png\">

Every referenced image must exist in the image directory; files nobody
references are reported as unused. Renaming assigns each image a name of
the form <lesson-name><NN>.<ext>, numbered by its position in the
document, and rewrites the matching reference in place.

A lesson whose base name ends in a digit gets a '-' separator appended
(lesson1.md -> lesson1-01.png) so generated names stay unambiguous.

Backups: by default every file about to change is copied to a .bak
sibling first. .bak files are never cleaned up automatically.")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Check references, files, and naming without changing anything
    Check(LessonArgs),
    /// Print the sorted reference set and the sorted on-disk set
    List(LessonArgs),
    /// Rename images to <lesson-name><NN>.<ext> and rewrite the document
    Rename {
        #[command(flatten)]
        lesson: LessonArgs,

        /// Compute and print the rename plan without changing anything
        #[arg(long)]
        dry_run: bool,

        /// Skip .bak copies of the document and image files
        #[arg(long)]
        no_backup: bool,

        /// Proceed past unused-file warnings without asking
        #[arg(short, long)]
        yes: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            output::print_error(&format!("Error: {e}"));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode, Box<dyn Error>> {
    match cli.command {
        Command::Check(args) => check(args),
        Command::List(args) => list(args),
        Command::Rename {
            lesson,
            dry_run,
            no_backup,
            yes,
        } => do_rename(lesson, dry_run, no_backup, yes),
    }
}

/// Everything the three subcommands share: config, listing, extraction.
struct Lesson {
    config: RunConfig,
    disk: BTreeSet<String>,
    references: Vec<extract::Reference>,
    doc_label: String,
    dir_label: String,
}

fn load(args: LessonArgs, backup: bool) -> Result<Lesson, Box<dyn Error>> {
    let config = RunConfig::new(args.document, args.image_dir, backup)?;
    let doc_label = config.document.display().to_string();
    let dir_label = config.image_dir.display().to_string();

    // Listing runs first so an empty/misconfigured directory aborts before
    // any document parsing
    let disk = listing::list_images(&config.image_dir)?;
    let text = fs::read_to_string(&config.document)?;
    let references = extract::extract_references(&text, &doc_label)?;

    Ok(Lesson {
        config,
        disk,
        references,
        doc_label,
        dir_label,
    })
}

fn check(args: LessonArgs) -> Result<ExitCode, Box<dyn Error>> {
    let lesson = load(args, true)?;
    let reconciliation = reconcile::reconcile(&lesson.references, &lesson.disk);

    for line in output::format_missing(&reconciliation, &lesson.doc_label) {
        output::print_error(&line);
    }
    for line in output::format_unused(&reconciliation, &lesson.doc_label, &lesson.dir_label) {
        output::print_warning(&line);
    }
    if !reconciliation.missing.is_empty() {
        output::print_error("Aborting");
        return Ok(ExitCode::FAILURE);
    }

    output::print_info(&format!(
        "Image files in {} and image links in {} seem to match.",
        lesson.dir_label, lesson.doc_label
    ));

    let referenced: Vec<&str> = lesson
        .references
        .iter()
        .map(|r| r.filename.as_str())
        .collect();
    let report = naming::check_names(&lesson.config.lesson_name, referenced);
    if report.is_compliant() {
        output::print_info("All image names follow the naming convention.");
    } else {
        // Non-fatal: the report is the trigger for running `rename`
        for line in output::format_naming_report(&report, &lesson.config.lesson_name) {
            output::print_error(&line);
        }
        output::print_info("Run `lesson-images rename` to fix the names.");
    }
    Ok(ExitCode::SUCCESS)
}

fn list(args: LessonArgs) -> Result<ExitCode, Box<dyn Error>> {
    let lesson = load(args, true)?;
    let referenced: BTreeSet<String> = lesson
        .references
        .iter()
        .map(|r| r.filename.clone())
        .collect();

    for line in output::format_listing(&referenced, &lesson.disk) {
        println!("{line}");
    }
    Ok(ExitCode::SUCCESS)
}

fn do_rename(
    args: LessonArgs,
    dry_run: bool,
    no_backup: bool,
    yes: bool,
) -> Result<ExitCode, Box<dyn Error>> {
    if dry_run {
        output::print_info("Dry run: no files will be changed");
    }

    let lesson = load(args, !no_backup)?;
    let reconciliation = reconcile::reconcile(&lesson.references, &lesson.disk);

    // Report both directions before deciding anything, so the operator can
    // fix the whole lesson in one editing session
    for line in output::format_missing(&reconciliation, &lesson.doc_label) {
        output::print_error(&line);
    }
    for line in output::format_unused(&reconciliation, &lesson.doc_label, &lesson.dir_label) {
        output::print_warning(&line);
    }
    if !reconciliation.missing.is_empty() {
        output::print_error("Aborting");
        return Ok(ExitCode::FAILURE);
    }
    if !reconciliation.unused.is_empty() && !yes && !dry_run && !confirm("Continue?")? {
        // Declined prompts are a clean exit, not an error
        return Ok(ExitCode::SUCCESS);
    }

    let plan = rename::plan(&lesson.config, &lesson.references)?;
    if plan.is_noop() {
        output::print_info("All image files already follow the naming convention; nothing to do.");
        return Ok(ExitCode::SUCCESS);
    }

    for line in output::format_plan(&plan) {
        output::print_info(&line);
    }
    if dry_run {
        return Ok(ExitCode::SUCCESS);
    }

    rename::apply(&lesson.config, &plan)?;
    output::print_info(&format!(
        "Renamed {} file(s) and updated {}.",
        plan.changes().count(),
        lesson.doc_label
    ));
    Ok(ExitCode::SUCCESS)
}

/// Default-yes confirmation: empty answer or `y` continues.
fn confirm(question: &str) -> io::Result<bool> {
    print!("{question} [Y/n] ");
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().read_line(&mut answer)?;
    let answer = answer.trim().to_ascii_lowercase();
    Ok(answer.is_empty() || answer == "y")
}
