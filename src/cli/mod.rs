//! Command-line interface for promptcraft.
//!
//! Provides commands for creating drafts, editing their fields, categories,
//! tags and example images, previewing the assembled prompt, and moving
//! drafts between draft, published and archived.

use std::io::{self, Read};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::config::{self, ResolvedConfig};
use crate::core::{assemble, DraftEditor, PublishError, SaveCoordinator};
use crate::domain::{
    image, CategoryEdit, ColorCode, Direction, Draft, MetaLength, SelectionType, Status, Tag,
};
use crate::store::{DraftFilter, JsonFileStore};

/// promptcraft - Compose and publish secret prompts
#[derive(Parser, Debug)]
#[command(name = "promptcraft")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a new draft
    New {
        /// Internal name (the URL slug follows it)
        #[arg(short, long)]
        name: Option<String>,
    },

    /// List drafts, most recently updated first
    List {
        /// Only drafts with this status (draft, published, archived)
        #[arg(short, long)]
        status: Option<Status>,

        /// Search name and display title
        #[arg(short, long)]
        query: Option<String>,

        /// Maximum number of drafts to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Show details of a draft
    Show {
        /// Draft ID or URL slug
        draft: String,
    },

    /// Change the internal name
    Rename {
        /// Draft ID or URL slug
        draft: String,
        name: String,
    },

    /// Change the public display title
    Title {
        /// Draft ID or URL slug
        draft: String,
        title: String,
    },

    /// Set the URL slug explicitly (it stops following the name)
    Slug {
        /// Draft ID or URL slug
        draft: String,
        slug: String,
    },

    /// Change the tagline
    Tagline {
        /// Draft ID or URL slug
        draft: String,
        tagline: String,
    },

    /// Set the base instruction text (reads stdin if not provided)
    Base {
        /// Draft ID or URL slug
        draft: String,
        text: Option<String>,
    },

    /// Manage categories
    Category {
        #[command(subcommand)]
        command: CategoryCommands,
    },

    /// Manage tags within a category
    Tag {
        #[command(subcommand)]
        command: TagCommands,
    },

    /// Manage example images
    Image {
        #[command(subcommand)]
        command: ImageCommands,
    },

    /// Set prices
    Price {
        /// Draft ID or URL slug
        draft: String,

        /// Price per generation
        base: Decimal,

        /// Price per generation with an uploaded photo
        with_upload: Decimal,
    },

    /// Print the assembled prompt
    Preview {
        /// Draft ID or URL slug
        draft: String,
    },

    /// Check whether a draft can be published
    Check {
        /// Draft ID or URL slug
        draft: String,
    },

    /// Publish a draft
    Publish {
        /// Draft ID or URL slug
        draft: String,
    },

    /// Archive a draft
    Archive {
        /// Draft ID or URL slug
        draft: String,
    },

    /// Return a draft to draft status
    Unpublish {
        /// Draft ID or URL slug
        draft: String,
    },

    /// Show resolved configuration (debug)
    Config,
}

#[derive(Subcommand, Debug)]
pub enum CategoryCommands {
    /// Add a category with its tags
    Add {
        /// Draft ID or URL slug
        draft: String,

        name: String,

        /// Tag as LABEL or LABEL=PROMPT INJECTION (repeatable, at least one)
        #[arg(short, long = "tag", required = true)]
        tags: Vec<String>,

        #[arg(short, long)]
        description: Option<String>,

        #[arg(short, long, default_value = "blue")]
        color: ColorCode,

        #[arg(short, long, default_value = "single")]
        selection: SelectionType,

        /// Let end users upload a photo for this category
        #[arg(long)]
        allow_upload: bool,

        #[arg(long)]
        upload_placeholder: Option<String>,
    },

    /// Edit a category (empty strings clear optional text)
    Edit {
        /// Draft ID or URL slug
        draft: String,

        /// Category position (1-based)
        position: usize,

        #[arg(long)]
        name: Option<String>,

        #[arg(short, long)]
        description: Option<String>,

        #[arg(short, long)]
        color: Option<ColorCode>,

        #[arg(short, long)]
        selection: Option<SelectionType>,

        #[arg(long)]
        allow_upload: Option<bool>,

        #[arg(long)]
        upload_placeholder: Option<String>,
    },

    /// Remove a category and its tags
    Remove {
        /// Draft ID or URL slug
        draft: String,

        /// Category position (1-based)
        position: usize,
    },

    /// Move a category one step
    Move {
        /// Draft ID or URL slug
        draft: String,

        /// Category position (1-based)
        position: usize,

        /// up or down
        direction: Direction,
    },
}

#[derive(Subcommand, Debug)]
pub enum TagCommands {
    /// Add a tag to a category
    Add {
        /// Draft ID or URL slug
        draft: String,

        /// Category position (1-based)
        category: usize,

        label: String,

        /// Text substituted into the prompt when the tag is picked
        #[arg(short, long, default_value = "")]
        injection: String,

        #[arg(long)]
        example_image: Option<String>,
    },

    /// Remove a tag (a category keeps at least one)
    Remove {
        /// Draft ID or URL slug
        draft: String,

        /// Category position (1-based)
        category: usize,

        /// Tag position (1-based)
        position: usize,
    },

    /// Move a tag one step
    Move {
        /// Draft ID or URL slug
        draft: String,

        /// Category position (1-based)
        category: usize,

        /// Tag position (1-based)
        position: usize,

        /// up or down
        direction: Direction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ImageCommands {
    /// Append example images (URLs or data URLs)
    Add {
        /// Draft ID or URL slug
        draft: String,

        #[arg(required = true)]
        images: Vec<String>,
    },

    /// Remove an example image
    Remove {
        /// Draft ID or URL slug
        draft: String,

        /// Image position (1-based)
        position: usize,
    },

    /// Move an image one step
    Move {
        /// Draft ID or URL slug
        draft: String,

        /// Image position (1-based)
        position: usize,

        /// up or down
        direction: Direction,
    },

    /// Drag an image to another position
    Drag {
        /// Draft ID or URL slug
        draft: String,

        /// Image position (1-based)
        from: usize,

        /// Drop position (1-based)
        to: usize,
    },
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::New { name } => new_draft(name).await,
            Commands::List {
                status,
                query,
                limit,
            } => list_drafts(status, query, limit).await,
            Commands::Show { draft } => show_draft(&draft).await,
            Commands::Rename { draft, name } => {
                edit(&draft, |editor| Ok(editor.rename(name)?)).await
            }
            Commands::Title { draft, title } => {
                edit(&draft, |editor| Ok(editor.set_display_title(title)?)).await
            }
            Commands::Slug { draft, slug } => {
                edit(&draft, |editor| Ok(editor.set_url_slug(&slug)?)).await
            }
            Commands::Tagline { draft, tagline } => {
                edit(&draft, |editor| Ok(editor.set_tagline(tagline)?)).await
            }
            Commands::Base { draft, text } => {
                let text = match text {
                    Some(text) => text,
                    None => read_stdin()?,
                };
                edit(&draft, |editor| Ok(editor.set_base_instruction(text)?)).await
            }
            Commands::Category { command } => execute_category(command).await,
            Commands::Tag { command } => execute_tag(command).await,
            Commands::Image { command } => execute_image(command).await,
            Commands::Price {
                draft,
                base,
                with_upload,
            } => edit(&draft, |editor| Ok(editor.set_pricing(base, with_upload)?)).await,
            Commands::Preview { draft } => preview(&draft).await,
            Commands::Check { draft } => check(&draft).await,
            Commands::Publish { draft } => change_status(&draft, Status::Published).await,
            Commands::Archive { draft } => change_status(&draft, Status::Archived).await,
            Commands::Unpublish { draft } => change_status(&draft, Status::Draft).await,
            Commands::Config => show_config(),
        }
    }
}

async fn execute_category(command: CategoryCommands) -> Result<()> {
    match command {
        CategoryCommands::Add {
            draft,
            name,
            tags,
            description,
            color,
            selection,
            allow_upload,
            upload_placeholder,
        } => {
            edit(&draft, |editor| {
                let mut category = editor.new_category();
                category.name = name;
                category.description = description;
                category.color_code = color;
                category.selection_type = selection;
                category.allow_upload = allow_upload;
                category.upload_placeholder = upload_placeholder;
                for spec in &tags {
                    category = category.with_tag(parse_tag(spec));
                }
                editor.save_category(category)?;
                Ok(())
            })
            .await
        }
        CategoryCommands::Edit {
            draft,
            position,
            name,
            description,
            color,
            selection,
            allow_upload,
            upload_placeholder,
        } => {
            let update = CategoryEdit {
                name,
                description,
                color_code: color,
                selection_type: selection,
                allow_upload,
                upload_placeholder,
            };
            edit(&draft, |editor| {
                let id = category_at(editor, position)?;
                Ok(editor.edit_category(id, update)?)
            })
            .await
        }
        CategoryCommands::Remove { draft, position } => {
            edit(&draft, |editor| {
                let id = category_at(editor, position)?;
                editor.remove_category(id);
                Ok(())
            })
            .await
        }
        CategoryCommands::Move {
            draft,
            position,
            direction,
        } => {
            edit(&draft, |editor| {
                let index = to_index(position)?;
                report_move(editor.move_category(index, direction));
                Ok(())
            })
            .await
        }
    }
}

async fn execute_tag(command: TagCommands) -> Result<()> {
    match command {
        TagCommands::Add {
            draft,
            category,
            label,
            injection,
            example_image,
        } => {
            edit(&draft, |editor| {
                let category_id = category_at(editor, category)?;
                let mut tag = editor.new_tag(category_id)?;
                tag.label = label;
                tag.prompt_injection = injection;
                tag.example_image_url = example_image;
                editor.save_tag(category_id, tag)?;
                Ok(())
            })
            .await
        }
        TagCommands::Remove {
            draft,
            category,
            position,
        } => {
            edit(&draft, |editor| {
                let category_id = category_at(editor, category)?;
                let index = to_index(position)?;
                let tag_id = editor
                    .draft()
                    .categories()
                    .get(&category_id)
                    .and_then(|c| c.tags().at(index))
                    .map(|t| t.id)
                    .with_context(|| format!("No tag at position {}", position))?;
                editor.remove_tag(category_id, tag_id)?;
                Ok(())
            })
            .await
        }
        TagCommands::Move {
            draft,
            category,
            position,
            direction,
        } => {
            edit(&draft, |editor| {
                let category_id = category_at(editor, category)?;
                let index = to_index(position)?;
                report_move(editor.move_tag(category_id, index, direction)?);
                Ok(())
            })
            .await
        }
    }
}

async fn execute_image(command: ImageCommands) -> Result<()> {
    match command {
        ImageCommands::Add { draft, images } => {
            edit(&draft, |editor| {
                let ids = editor.add_images(images);
                eprintln!("Added {} image(s)", ids.len());
                Ok(())
            })
            .await
        }
        ImageCommands::Remove { draft, position } => {
            edit(&draft, |editor| {
                let index = to_index(position)?;
                let id = editor
                    .draft()
                    .example_images()
                    .at(index)
                    .map(|i| i.id)
                    .with_context(|| format!("No image at position {}", position))?;
                editor.remove_image(id);
                Ok(())
            })
            .await
        }
        ImageCommands::Move {
            draft,
            position,
            direction,
        } => {
            edit(&draft, |editor| {
                let index = to_index(position)?;
                report_move(editor.move_image(index, direction));
                Ok(())
            })
            .await
        }
        ImageCommands::Drag { draft, from, to } => {
            edit(&draft, |editor| {
                let from = to_index(from)?;
                let to = to_index(to)?;
                editor.drag_start(from);
                let moved = editor.drag_over(to);
                editor.drag_end();
                report_move(moved);
                Ok(())
            })
            .await
        }
    }
}

// ----------------------------------------------------------------------
// Draft session helpers
// ----------------------------------------------------------------------

/// An opened draft together with the store and saver it came from
struct Session {
    saver: SaveCoordinator<JsonFileStore>,
    editor: DraftEditor,
}

fn open_store(config: &ResolvedConfig) -> SaveCoordinator<JsonFileStore> {
    let store = Arc::new(JsonFileStore::new(config.store.clone()));
    SaveCoordinator::with_rules(store, config.publish.clone())
}

/// Resolve a draft by ID or URL slug and open it for editing
async fn open_draft(key: &str) -> Result<Session> {
    let config = config::config()?;
    let saver = open_store(config);

    let catalog = saver.store().load_catalog().await?;
    let draft = match Uuid::parse_str(key) {
        Ok(id) => catalog.get(id),
        Err(_) => catalog.find_by_slug(key),
    }
    .cloned()
    .with_context(|| format!("Draft not found: {}", key))?;

    Ok(Session {
        saver,
        editor: DraftEditor::open(draft, config.limits.clone()),
    })
}

/// Open a draft, apply `f` through the editor and save if anything changed
async fn edit<F>(key: &str, f: F) -> Result<()>
where
    F: FnOnce(&mut DraftEditor) -> Result<()>,
{
    let Session { saver, mut editor } = open_draft(key).await?;
    let before = editor.snapshot();

    f(&mut editor)?;

    if editor.draft() == &before {
        eprintln!("No changes");
        return Ok(());
    }

    saver.save(&editor).await?;
    eprintln!("Saved {}", describe(editor.draft()));
    Ok(())
}

fn category_at(editor: &DraftEditor, position: usize) -> Result<Uuid> {
    editor
        .draft()
        .categories()
        .at(to_index(position)?)
        .map(|c| c.id)
        .with_context(|| format!("No category at position {}", position))
}

fn to_index(position: usize) -> Result<usize> {
    position
        .checked_sub(1)
        .context("Positions start at 1")
}

fn report_move(moved: bool) {
    if !moved {
        eprintln!("Already at the edge, nothing moved");
    }
}

/// Parse `LABEL` or `LABEL=INJECTION`
fn parse_tag(spec: &str) -> Tag {
    match spec.split_once('=') {
        Some((label, injection)) => Tag::new(label.trim(), injection.trim()),
        None => Tag::new(spec.trim(), ""),
    }
}

fn read_stdin() -> Result<String> {
    let mut buffer = String::new();
    io::stdin()
        .read_to_string(&mut buffer)
        .context("Failed to read stdin")?;
    Ok(buffer)
}

fn describe(draft: &Draft) -> String {
    if draft.name().is_empty() {
        draft.id().to_string()
    } else {
        format!("{} ({})", draft.name(), draft.id())
    }
}

// ----------------------------------------------------------------------
// Commands
// ----------------------------------------------------------------------

async fn new_draft(name: Option<String>) -> Result<()> {
    let config = config::config()?;
    let saver = open_store(config);

    let mut editor = DraftEditor::open(Draft::new(), config.limits.clone());
    if let Some(name) = name {
        editor.rename(name)?;
    }

    saver.save(&editor).await?;
    println!("{}", editor.draft().id());
    Ok(())
}

async fn list_drafts(status: Option<Status>, query: Option<String>, limit: usize) -> Result<()> {
    let config = config::config()?;
    let saver = open_store(config);
    let catalog = saver.store().load_catalog().await?;

    if !catalog.quarantined().is_empty() {
        eprintln!(
            "Note: {} unreadable record(s) quarantined in {}",
            catalog.quarantined().len(),
            config.store.display()
        );
    }

    let drafts = catalog.list(&DraftFilter {
        status,
        query,
        limit: Some(limit),
    });

    if drafts.is_empty() {
        println!("No drafts found. Use 'promptcraft new' to create one.");
        return Ok(());
    }

    println!(
        "{:<38} {:<10} {:<30} {:<20}",
        "ID", "STATUS", "NAME", "UPDATED"
    );
    println!("{}", "-".repeat(100));

    for draft in &drafts {
        let name = if draft.name().len() > 28 {
            format!("{}...", draft.name().chars().take(25).collect::<String>())
        } else {
            draft.name().to_string()
        };
        println!(
            "{:<38} {:<10} {:<30} {:<20}",
            draft.id(),
            draft.status().to_string(),
            name,
            draft.updated_at().format("%Y-%m-%d %H:%M").to_string()
        );
    }

    println!("\nTotal: {} draft(s)", catalog.len());
    Ok(())
}

async fn show_draft(key: &str) -> Result<()> {
    let Session { saver, editor } = open_draft(key).await?;
    let draft = editor.draft();

    println!("ID: {}", draft.id());
    println!("Name: {}", draft.name());
    println!("Title: {}", draft.display_title());
    println!("Slug: {}", draft.url_slug());
    println!("Tagline: {}", draft.tagline());
    println!("Status: {}", draft.status());
    println!(
        "Price: {} / {} with upload",
        draft.pricing().base,
        draft.pricing().with_upload
    );
    println!("Created: {}", draft.created_at());
    println!("Updated: {}", draft.updated_at());

    println!("\nCategories:");
    for (i, category) in draft.categories().iter().enumerate() {
        println!(
            "  {}. {} [{}, {:?}{}]",
            i + 1,
            category.name,
            category.color_code,
            category.selection_type,
            if category.allow_upload { ", upload" } else { "" }
        );
        for (j, tag) in category.tags().iter().enumerate() {
            if tag.has_injection() {
                println!("     {}. {} => {}", j + 1, tag.label, tag.prompt_injection);
            } else {
                println!("     {}. {}", j + 1, tag.label);
            }
        }
    }

    let (heroes, rest) = image::partition(draft.example_images());
    println!("\nExample images: {} hero, {} more", heroes.len(), rest.len());
    for (i, img) in draft.example_images().iter().enumerate() {
        let marker = if img.is_hero() { "*" } else { " " };
        let content: String = img.content.chars().take(70).collect();
        println!("  {}{}. {}", marker, i + 1, content);
    }

    let analytics = draft.analytics();
    println!(
        "\nAnalytics: {} views, {} generations, {} revenue, {:.1}% conversion",
        analytics.views(),
        analytics.generations(),
        analytics.revenue(),
        analytics.conversion_rate()
    );

    let report = saver.rules().check(draft);
    if report.is_publishable() {
        println!("\nReady to publish");
    } else {
        println!("\nNot ready to publish ({} issue(s))", report.unmet.len());
    }
    Ok(())
}

async fn preview(key: &str) -> Result<()> {
    let Session { editor, .. } = open_draft(key).await?;
    println!("{}", assemble(editor.draft()));
    Ok(())
}

async fn check(key: &str) -> Result<()> {
    let Session { saver, editor } = open_draft(key).await?;
    let draft = editor.draft();
    let report = saver.rules().check(draft);

    if report.is_publishable() {
        println!("Ready to publish");
    } else {
        println!("Not ready to publish:");
        for reason in report.reasons() {
            println!("  - {}", reason);
        }
    }

    match draft.marketing().meta_length() {
        MetaLength::TooLong => println!("Meta description is too long for search results"),
        MetaLength::Good => println!("Meta description could be longer"),
        MetaLength::Optimal => {}
    }
    Ok(())
}

async fn change_status(key: &str, target: Status) -> Result<()> {
    let Session { saver, mut editor } = open_draft(key).await?;

    match saver.save_as(&mut editor, target).await {
        Ok(()) => {
            eprintln!("{} is now {}", describe(editor.draft()), target);
            Ok(())
        }
        Err(PublishError::Blocked(unmet)) => {
            eprintln!("Cannot publish {}:", describe(editor.draft()));
            for requirement in &unmet {
                eprintln!("  - {}", requirement);
            }
            anyhow::bail!("{} requirement(s) not met", unmet.len())
        }
        Err(e) => Err(e.into()),
    }
}

fn show_config() -> Result<()> {
    let config = config::config()?;

    println!("promptcraft configuration");
    println!();
    println!("Config file: {}", match &config.config_file {
        Some(path) => path.display().to_string(),
        None => "(none, using defaults)".to_string(),
    });
    println!("Home:        {}", config.home.display());
    println!("Store:       {}", config.store.display());
    println!();
    println!("Limits:");
    println!("  max categories:          {}", config.limits.max_categories);
    println!("  max tags per category:   {}", config.limits.max_tags_per_category);
    println!();
    println!("Publish gate:");
    println!("  min base instruction:    {} chars", config.publish.min_base_instruction_chars);
    println!("  min categories:          {}", config.publish.min_categories);
    println!("  min example images:      {}", config.publish.min_images);
    println!();
    println!("Environment overrides:");
    println!("  PROMPTCRAFT_HOME:  {}", std::env::var("PROMPTCRAFT_HOME").unwrap_or_else(|_| "(not set)".to_string()));
    println!("  PROMPTCRAFT_STORE: {}", std::env::var("PROMPTCRAFT_STORE").unwrap_or_else(|_| "(not set)".to_string()));

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tag_spec() {
        let tag = parse_tag("Fluffy = soft fluffy fur");
        assert_eq!(tag.label, "Fluffy");
        assert_eq!(tag.prompt_injection, "soft fluffy fur");

        let bare = parse_tag("Scaly");
        assert_eq!(bare.label, "Scaly");
        assert!(!bare.has_injection());
    }

    #[test]
    fn test_positions_are_one_based() {
        assert_eq!(to_index(1).unwrap(), 0);
        assert!(to_index(0).is_err());
    }

    #[test]
    fn test_cli_parses_category_add() {
        let cli = Cli::parse_from([
            "promptcraft",
            "category",
            "add",
            "cuddly-monster",
            "Fur",
            "--tag",
            "Fluffy=soft fur",
            "--tag",
            "Scaly",
            "--color",
            "green",
            "--selection",
            "multi",
        ]);

        match cli.command {
            Commands::Category {
                command:
                    CategoryCommands::Add {
                        draft,
                        name,
                        tags,
                        color,
                        selection,
                        ..
                    },
            } => {
                assert_eq!(draft, "cuddly-monster");
                assert_eq!(name, "Fur");
                assert_eq!(tags.len(), 2);
                assert_eq!(color, ColorCode::Green);
                assert_eq!(selection, SelectionType::Multi);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_cli_parses_status_and_price() {
        let cli = Cli::parse_from(["promptcraft", "list", "--status", "published"]);
        assert!(matches!(
            cli.command,
            Commands::List {
                status: Some(Status::Published),
                ..
            }
        ));

        let cli = Cli::parse_from(["promptcraft", "price", "x", "0.99", "1.49"]);
        match cli.command {
            Commands::Price {
                base, with_upload, ..
            } => {
                assert_eq!(base.to_string(), "0.99");
                assert_eq!(with_upload.to_string(), "1.49");
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
