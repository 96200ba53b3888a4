use clap::{Args, Parser, Subcommand, ValueEnum};
use cms_content::{
    Category, ClientConfig, ContentClient, ContentFilter, ContentItem, ContentKind, ContentSource,
    DEFAULT_PAGE_SIZE, DetailView, PageRequest, Pagination, config, listing,
};
use serde::Serialize;
use std::error::Error;
use std::process::ExitCode;
use tracing::error;

#[derive(Parser)]
#[command(name = "cms")]
#[command(about = "A CLI for browsing blog posts, news and categories from the CMS")]
struct Cli {
    /// CMS service id (the subdomain of the API endpoint)
    #[arg(long, env = config::SERVICE_ID_VAR, hide_env_values = true)]
    service_id: Option<String>,

    /// API key sent with every request
    #[arg(long, env = config::API_KEY_VAR, hide_env_values = true)]
    api_key: Option<String>,

    /// Override the API endpoint, e.g. http://localhost:8080/api/v1
    #[arg(long, env = config::BASE_URL_VAR)]
    base_url: Option<String>,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List one page of blog posts or news
    List(ListArgs),
    /// Show a single blog post or news article
    Get {
        kind: Kind,
        id: String,
    },
    /// List all categories
    Categories,
    /// Show a single category
    Category { id: String },
}

#[derive(Args)]
struct ListArgs {
    kind: Kind,

    /// Page number, starting at 1
    #[arg(short, long, default_value_t = 1)]
    page: u32,

    /// Items per page
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    page_size: u32,

    /// Only items in this category
    #[arg(short, long, conflicts_with = "search")]
    category: Option<String>,

    /// Only items whose title contains this text
    #[arg(short, long)]
    search: Option<String>,
}

impl ListArgs {
    fn filter(&self) -> Option<ContentFilter> {
        match (&self.category, &self.search) {
            (Some(id), _) => Some(ContentFilter::category(id.as_str())),
            (None, Some(text)) => Some(ContentFilter::title_contains(text.as_str())),
            (None, None) => None,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum Kind {
    Blog,
    News,
}

impl From<Kind> for ContentKind {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::Blog => ContentKind::Blog,
            Kind::News => ContentKind::News,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ListOutput<'a> {
    items: &'a [ContentItem],
    total_count: u64,
    page: u32,
    total_pages: u32,
}

const LOG_DIRECTIVE: &str = "cms_content=debug";

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(LOG_DIRECTIVE.parse().expect("static directive")),
        )
        .init();

    let cli = Cli::parse();

    let client = match build_client(&cli) {
        Ok(client) => client,
        Err(err) => {
            error!(error = %err, "Content client is not configured");
            return ExitCode::FAILURE;
        }
    };

    match run(&cli, &client).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            error!(error = %err, "Command failed");
            ExitCode::FAILURE
        }
    }
}

fn build_client(cli: &Cli) -> Result<ContentClient, Box<dyn Error>> {
    let mut config = ClientConfig::new(
        cli.service_id.clone().unwrap_or_default(),
        cli.api_key.clone().unwrap_or_default(),
    )?;
    if let Some(base_url) = &cli.base_url {
        config = config.with_base_url(base_url.clone());
    }
    Ok(ContentClient::new(&config)?)
}

/// Returns `false` when the requested item does not exist.
async fn run(cli: &Cli, client: &ContentClient) -> Result<bool, Box<dyn Error>> {
    match &cli.command {
        Commands::List(args) => {
            let request = PageRequest::new(args.page, args.page_size)?;
            let filter = args.filter();
            let page = client
                .list_content(args.kind.into(), request, filter.as_ref())
                .await;
            let pagination = Pagination::new(request.page(), page.total_count, request.page_size());

            if cli.json {
                print_json(&ListOutput {
                    items: &page.items,
                    total_count: page.total_count,
                    page: request.page(),
                    total_pages: pagination.total_pages,
                })?;
            } else if page.is_empty() {
                println!("No results found");
            } else {
                for item in &page.items {
                    print_item_line(item);
                }
                if pagination.show_controls() {
                    println!(
                        "Page {} of {} ({} items)",
                        pagination.current_page, pagination.total_pages, page.total_count
                    );
                }
            }
            Ok(true)
        }
        Commands::Get { kind, id } => {
            match listing::load_detail(client, (*kind).into(), id).await {
                DetailView::Found(item) => {
                    if cli.json {
                        print_json(&item)?;
                    } else {
                        print_item_detail(&item);
                    }
                    Ok(true)
                }
                DetailView::NotFound => {
                    eprintln!("Not found: {id}");
                    Ok(false)
                }
            }
        }
        Commands::Categories => {
            let categories = client.list_categories().await;
            if cli.json {
                print_json(&categories)?;
            } else if categories.is_empty() {
                println!("No categories found");
            } else {
                for category in &categories {
                    print_category(category);
                }
            }
            Ok(true)
        }
        Commands::Category { id } => match client.get_category_detail(id).await {
            Some(category) => {
                if cli.json {
                    print_json(&category)?;
                } else {
                    print_category(&category);
                }
                Ok(true)
            }
            None => {
                eprintln!("Not found: {id}");
                Ok(false)
            }
        },
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), Box<dyn Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_item_line(item: &ContentItem) {
    let date = item
        .display_date()
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "----------".to_string());
    let category = item
        .category
        .as_ref()
        .map(|c| c.name.as_str())
        .unwrap_or("-");
    println!("{date}  {:<24}  {}  [{category}]", item.id, item.title);
}

fn print_item_detail(item: &ContentItem) {
    println!("{}", item.title);
    if let Some(date) = item.display_date() {
        println!("Date: {}", date.format("%Y-%m-%d"));
    }
    if let Some(category) = &item.category {
        println!("Category: {} ({})", category.name, category.id);
    }
    if !item.description.is_empty() {
        println!();
        println!("{}", item.description);
    }
    println!();
    println!("{}", item.content);
}

fn print_category(category: &Category) {
    match &category.explanation {
        Some(explanation) => println!("{:<16}  {}  {}", category.id, category.name, explanation),
        None => println!("{:<16}  {}", category.id, category.name),
    }
}
