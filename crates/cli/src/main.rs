use clap::{Parser, Subcommand};
use quill_core::{
    config::resolve_content_file,
    constants::{DEFAULT_SITE_URL, DEFAULT_SUBMIT_DELAY_MS},
    BlogService, CoreConfig, FeedView, FilterSelection,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "quill")]
#[command(about = "Quill blog CLI")]
struct Cli {
    /// YAML content file to read instead of the built-in articles
    #[arg(long, global = true)]
    content_file: Option<PathBuf>,
    /// Public base URL used for share links
    #[arg(long, global = true, default_value = DEFAULT_SITE_URL)]
    site_url: String,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List the selectable categories
    Categories,
    /// Show the feed
    Feed {
        /// Category to filter by; unknown values show everything
        #[arg(long)]
        category: Option<String>,
    },
    /// Show an article with its comments
    Article {
        /// Article identifier
        id: String,
    },
    /// Print the feed location after selecting a category
    Select {
        /// Category to select, or "All"
        category: String,
        /// Query string currently in the address bar
        #[arg(long, default_value = "")]
        query: String,
    },
}

fn print_feed(view: &FeedView<'_>) {
    println!("{}", view.heading);
    if let Some(featured) = view.featured {
        println!(
            "* [{}] {} ({}, {})",
            featured.id,
            featured.title,
            featured.category,
            featured.display_date()
        );
    }
    for article in &view.articles {
        println!(
            "  [{}] {} ({}, {})",
            article.id,
            article.title,
            article.category,
            article.display_date()
        );
    }
    if let Some(message) = view.empty_message {
        println!("{}", message);
    }
    println!("Location: {}", view.location);
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let cfg = CoreConfig::new(
        Duration::from_millis(DEFAULT_SUBMIT_DELAY_MS),
        cli.site_url,
        resolve_content_file(cli.content_file)?,
    )?;
    let blog = BlogService::new(Arc::new(cfg))?;

    match cli.command {
        Some(Commands::Categories) => {
            for option in FilterSelection::options() {
                println!("{}", option.label());
            }
        }
        Some(Commands::Feed { category }) => {
            let query = category
                .map(|c| format!("category={}", urlencoding::encode(&c)))
                .unwrap_or_default();
            print_feed(&blog.feed(&query));
        }
        Some(Commands::Article { id }) => match blog.article(&id) {
            Ok(view) => {
                let article = view.article;
                println!("{}", article.title);
                println!(
                    "{} | {} | {} | {}",
                    article.author.name,
                    article.category,
                    article.display_date(),
                    article.read_time
                );
                println!();
                println!("{}", article.excerpt);
                println!();
                println!("Comments ({}):", view.comments.len());
                for comment in &view.comments {
                    println!(
                        "  {} ({}): {}",
                        comment.author,
                        comment.display_date(),
                        comment.content
                    );
                }
                if !view.related.is_empty() {
                    println!("Related:");
                    for related in &view.related {
                        println!("  [{}] {}", related.id, related.title);
                    }
                }
                println!("Share: {}", view.share.page_url);
            }
            Err(e) => eprintln!("Error reading article {}: {}", id, e),
        },
        Some(Commands::Select { category, query }) => {
            let change = blog.select_category(query.trim_start_matches('?'), &category);
            println!("Selected: {}", change.selected);
            println!("Location: {}", change.location);
        }
        None => {
            println!("Use 'quill --help' for commands");
        }
    }

    Ok(())
}
