#![forbid(unsafe_code)]

use clap::{ArgAction, Args, Parser, Subcommand};
use folio::app::{handle_request, CategoryFilter, ListOrder, Request, Response};
use folio::domain::{
    find_image_size, is_known_category, priority_label, FieldErrors, ImageInfo, ImageProbe,
    ProjectDraft, ProjectPatch, ProjectRecord, UrlShapeProbe, CATEGORIES, DEFAULT_CATEGORY,
    IMAGE_SIZES, PRIORITY_LEVELS,
};
use folio::observability::init_tracing;
use folio::storage::JsonStorage;
use folio::{open_catalog, Catalog, Config, FolioError};
use serde_json::json;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "folio", version)]
#[command(about = "Manage the portfolio project catalog")]
struct Cli {
    /// Config file (default: ~/.config/folio/folio.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Directory holding storage.json
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
    #[arg(long, global = true, default_value_t = false)]
    json: bool,
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List projects, prioritized first and the rest shuffled
    List {
        #[arg(long, default_value = "all")]
        category: String,
        /// Seed the shuffle for a reproducible order
        #[arg(long)]
        seed: Option<u64>,
        /// Keep the stored order
        #[arg(long, default_value_t = false)]
        stored: bool,
    },
    /// Show one project
    Show { id: u64 },
    /// Create a project from form values
    Add(AddArgs),
    /// Change fields of an existing project
    Edit(EditArgs),
    /// Delete a project
    Delete { id: u64 },
    /// Remove every project
    Reset {
        #[arg(long, default_value_t = false)]
        yes: bool,
    },
    /// Fuzzy-search project titles
    Search { query: String },
    /// List the known categories
    Categories,
    /// List the allowed image sizes and priority levels
    Sizes,
}

#[derive(Args, Debug)]
struct AddArgs {
    #[arg(long)]
    title: String,
    #[arg(long)]
    description: String,
    #[arg(long, default_value = DEFAULT_CATEGORY)]
    category: String,
    #[arg(long)]
    image_url: String,
    /// Image size as WIDTHxHEIGHT, see `folio sizes`
    #[arg(long)]
    size: String,
    #[arg(long, default_value = "0")]
    priority: String,
}

#[derive(Args, Debug)]
struct EditArgs {
    id: u64,
    #[arg(long)]
    title: Option<String>,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    category: Option<String>,
    #[arg(long)]
    image_url: Option<String>,
    #[arg(long)]
    size: Option<String>,
    #[arg(long)]
    priority: Option<u8>,
}

impl AddArgs {
    fn into_draft(self) -> ProjectDraft {
        ProjectDraft {
            id: None,
            title: self.title,
            description: self.description,
            category: self.category,
            image_url: self.image_url,
            image_size: self.size,
            priority: self.priority,
        }
    }
}

impl EditArgs {
    /// Builds a patch from the supplied flags over `current`.
    ///
    /// Supplied fields are checked like the add form: text fields must not be
    /// blank and a new image URL must pass `probe`. The image is replaced as a
    /// whole when either the URL or the size changes; the new size also sets the
    /// orientation.
    fn into_patch(self, current: &ProjectRecord, probe: &dyn ImageProbe) -> Result<ProjectPatch, FolioError> {
        let mut errors = FieldErrors::new();
        let blank = |value: &Option<String>| value.as_deref().is_some_and(|v| v.trim().is_empty());

        if blank(&self.title) {
            errors.insert("title", "title is required");
        }
        if blank(&self.description) {
            errors.insert("description", "description is required");
        }
        if blank(&self.category) {
            errors.insert("category", "category is required");
        }
        match self.image_url.as_deref().map(str::trim) {
            Some("") => errors.insert("image_url", "image URL is required"),
            Some(url) if !probe.probe(url) => errors.insert("image_url", "image URL is invalid or unreachable"),
            _ => {}
        }
        errors.into_result()?;

        let mut patch = ProjectPatch::for_id(self.id);

        if self.image_url.is_some() || self.size.is_some() {
            let (width, height, orientation) = match self.size.as_deref() {
                Some(size) => {
                    let size = find_image_size(size)?;
                    (size.width, size.height, Some(size.orientation))
                }
                None => (current.image.width, current.image.height, None),
            };
            let src = self
                .image_url
                .as_deref()
                .map_or_else(|| current.image.src.clone(), |url| url.trim().to_string());
            let alt = self.title.as_deref().unwrap_or(&current.title).trim().to_string();

            patch = patch.image(ImageInfo::new(src, width, height).with_alt(alt));
            if let Some(orientation) = orientation {
                patch = patch.orientation(orientation);
            }
        }

        if let Some(title) = self.title {
            patch = patch.title(title.trim());
        }
        if let Some(description) = self.description {
            patch = patch.description(description.trim());
        }
        if let Some(category) = self.category {
            warn_unlisted_category(&category);
            patch = patch.category(category.trim());
        }
        if let Some(priority) = self.priority {
            patch = patch.priority(priority);
        }

        Ok(patch)
    }
}

fn warn_unlisted_category(category: &str) {
    if !is_known_category(category.trim()) {
        tracing::warn!(category = category.trim(), "category is not one of the listed categories");
    }
}

fn print_record(record: &ProjectRecord) {
    let priority = priority_label(record.priority).unwrap_or("?");
    println!(
        "#{:<4} {:<32} {:<14} {:<9} {}x{}  priority {} ({})  added {}",
        record.id,
        record.title,
        record.category,
        record.orientation,
        record.image.width,
        record.image.height,
        record.priority,
        priority,
        record.added_ago(),
    );
}

fn print_response(response: &Response, json: bool) {
    if json {
        match serde_json::to_string_pretty(response) {
            Ok(text) => println!("{text}"),
            Err(e) => eprintln!("error: failed to encode response: {e}"),
        }
        return;
    }

    match response {
        Response::Projects { projects } if projects.is_empty() => println!("No projects."),
        Response::Projects { projects } => projects.iter().for_each(print_record),
        Response::Project { project } => {
            print_record(project);
            if !project.description.is_empty() {
                println!("      {}", project.description);
            }
            println!("      {}", project.image.src);
        }
        Response::Saved { project, created } => {
            let verb = if *created { "Created" } else { "Updated" };
            println!("{verb} project #{}: {}", project.id, project.title);
        }
        Response::Deleted { id } => println!("Deleted project #{id}"),
        Response::NotFound { id } => eprintln!("error: project not found: {id}"),
        Response::Reset => println!("All projects removed."),
        Response::Error { message } => eprintln!("error: {message}"),
    }
}

fn report_error(err: &FolioError, json: bool) {
    if json {
        println!("{}", json!({ "type": "error", "message": err.to_string() }));
        return;
    }

    match err {
        FolioError::Validation(fields) => {
            eprintln!("error: invalid project");
            for (field, message) in fields.iter() {
                eprintln!("  {field}: {message}");
            }
        }
        other => eprintln!("error: {other}"),
    }
}

fn print_reference(command: &Command, json: bool) {
    match (command, json) {
        (Command::Categories, true) => println!("{}", json!(CATEGORIES)),
        (Command::Categories, false) => CATEGORIES.iter().for_each(|c| println!("{c}")),
        (_, true) => {
            let sizes: Vec<_> = IMAGE_SIZES
                .iter()
                .map(|s| json!({ "value": s.key(), "label": s.label, "orientation": s.orientation }))
                .collect();
            let priorities: Vec<_> = PRIORITY_LEVELS
                .iter()
                .map(|p| json!({ "value": p.value, "label": p.label }))
                .collect();
            println!("{}", json!({ "sizes": sizes, "priorities": priorities }));
        }
        (_, false) => {
            println!("Image sizes:");
            for size in IMAGE_SIZES {
                println!("  {:<10} {}", size.key(), size.label);
            }
            println!("Priorities:");
            for level in PRIORITY_LEVELS {
                println!("  {}  {}", level.value, level.label);
            }
        }
    }
}

/// Turns a command into a request; `Ok(None)` means there is nothing to send.
fn build_request(
    command: Command,
    catalog: &Catalog<JsonStorage>,
) -> Result<Option<Request>, FolioError> {
    let request = match command {
        Command::List { category, seed, stored } => Request::List {
            category: category.parse::<CategoryFilter>().unwrap_or_default(),
            order: if stored { ListOrder::Stored } else { ListOrder::Display },
            seed,
        },
        Command::Show { id } => Request::Show { id },
        Command::Add(args) => {
            warn_unlisted_category(&args.category);
            Request::Save {
                patch: args.into_draft().validate(&UrlShapeProbe)?,
            }
        }
        Command::Edit(args) => {
            let current = catalog.get(args.id)?;
            Request::Save {
                patch: args.into_patch(&current, &UrlShapeProbe)?,
            }
        }
        Command::Delete { id } => Request::Delete { id },
        Command::Reset { .. } => Request::Reset,
        Command::Search { query } => Request::Search { query },
        Command::Categories | Command::Sizes => return Ok(None),
    };
    Ok(Some(request))
}

fn run(cli: Cli) -> Result<bool, FolioError> {
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(dir) = cli.data_dir {
        config.data_dir = Some(dir);
    }
    init_tracing(&config, cli.verbose);

    if matches!(cli.command, Command::Categories | Command::Sizes) {
        print_reference(&cli.command, cli.json);
        return Ok(true);
    }

    if matches!(cli.command, Command::Reset { yes: false }) {
        eprintln!("Refusing to remove every project without --yes.");
        return Ok(false);
    }

    let mut catalog = open_catalog(&config)?.with_strict_writes(true);
    let Some(request) = build_request(cli.command, &catalog)? else {
        return Ok(true);
    };

    let response = handle_request(&mut catalog, request);
    print_response(&response, cli.json);
    Ok(!response.is_failure())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let json = cli.json;

    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(FolioError::NotFound(id)) => {
            print_response(&Response::NotFound { id }, json);
            ExitCode::FAILURE
        }
        Err(e) => {
            report_error(&e, json);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio::domain::{NewProject, Orientation};

    fn record() -> ProjectRecord {
        NewProject::new("Poster", ImageInfo::new("https://x/p.png", 1200, 800).with_alt("Poster"))
            .into_record(4, 0)
    }

    fn edit(id: u64) -> EditArgs {
        EditArgs {
            id,
            title: None,
            description: None,
            category: None,
            image_url: None,
            size: None,
            priority: None,
        }
    }

    #[test]
    fn cli_parses_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["folio", "list", "--seed", "7", "--json", "-vv"]).unwrap();
        assert!(cli.json);
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Command::List { seed: Some(7), .. }));
    }

    #[test]
    fn edit_without_flags_only_targets_the_id() {
        let patch = edit(4).into_patch(&record(), &UrlShapeProbe).unwrap();
        assert_eq!(patch, ProjectPatch::for_id(4));
    }

    #[test]
    fn edit_size_keeps_url_and_sets_orientation() {
        let args = EditArgs {
            size: Some("800x1200".to_string()),
            ..edit(4)
        };
        let patch = args.into_patch(&record(), &UrlShapeProbe).unwrap();

        let image = patch.image.unwrap();
        assert_eq!(image.src, "https://x/p.png");
        assert_eq!((image.width, image.height), (800, 1200));
        assert_eq!(patch.orientation, Some(Orientation::Portrait));
    }

    #[test]
    fn edit_checks_supplied_fields_like_the_add_form() {
        let args = EditArgs {
            image_url: Some("not a url".to_string()),
            description: Some("   ".to_string()),
            category: Some(String::new()),
            ..edit(4)
        };

        let Err(FolioError::Validation(fields)) = args.into_patch(&record(), &UrlShapeProbe) else {
            panic!("expected a validation error");
        };
        assert_eq!(fields.get("image_url"), Some("image URL is invalid or unreachable"));
        assert!(fields.contains("description"));
        assert!(fields.contains("category"));
        assert!(!fields.contains("title"));
    }

    #[test]
    fn edit_rejects_an_image_url_the_checker_refuses() {
        let args = EditArgs {
            image_url: Some("https://cdn.example.com/new.png".to_string()),
            ..edit(4)
        };
        let rejecting = |_: &str| false;
        assert!(matches!(
            args.into_patch(&record(), &rejecting),
            Err(FolioError::Validation(ref fields)) if fields.contains("image_url")
        ));

        let args = EditArgs {
            image_url: Some(" https://cdn.example.com/new.png ".to_string()),
            ..edit(4)
        };
        let image = args.into_patch(&record(), &UrlShapeProbe).unwrap().image.unwrap();
        assert_eq!(image.src, "https://cdn.example.com/new.png");
        assert_eq!((image.width, image.height), (1200, 800));
    }

    #[test]
    fn edit_rejects_unknown_size() {
        let args = EditArgs {
            size: Some("640x480".to_string()),
            ..edit(4)
        };
        assert!(matches!(
            args.into_patch(&record(), &UrlShapeProbe),
            Err(FolioError::InvalidSize(_))
        ));
    }
}
