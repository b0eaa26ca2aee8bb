use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use paginator_core::{FindOptions, PageRepository, PageRequest, PaginationConfig, Paginator, Where};
use paginator_db::SeaOrmPageRepository;
use serde::Serialize;

mod config;
mod logging;
mod store;

use config::DemoConfig;
use store::{CommentDto, PostDto, UserDto};

/// Paginator demo - pages through a seeded in-memory database and prints JSON
#[derive(Parser)]
#[command(name = "paginator-demo")]
#[command(about = "Paginator demo - pages through seeded users, posts and comments")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print current configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Page through users
    Users(PageArgs),
    /// Page through posts
    Posts {
        #[command(flatten)]
        page: PageArgs,
        /// Only posts written by this user
        #[arg(long)]
        author: Option<i64>,
    },
    /// Page through comments
    Comments {
        #[command(flatten)]
        page: PageArgs,
        /// Only comments on this post
        #[arg(long)]
        post: Option<i64>,
    },
}

/// Query parameters, as an HTTP layer would receive them.
#[derive(Args, Clone, Debug, Default)]
struct PageArgs {
    /// 1-based page number
    #[arg(long, allow_negative_numbers = true)]
    page: Option<i64>,

    /// Page size
    #[arg(long, allow_negative_numbers = true)]
    limit: Option<i64>,

    /// Sort spec, e.g. "title:desc,id"
    #[arg(long)]
    sort: Option<String>,

    /// Filter JSON, e.g. {"title":"ILike('%rust%')"}
    #[arg(long)]
    filter: Option<String>,

    /// Base path used in links
    #[arg(long, default_value = "")]
    path: String,
}

impl From<PageArgs> for PageRequest {
    fn from(args: PageArgs) -> Self {
        PageRequest {
            page: args.page,
            limit: args.limit,
            sort: args.sort,
            filter: args.filter,
            path: args.path,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = DemoConfig::load_or_default(cli.config.as_deref())?;
    config.apply_cli_overrides(cli.verbose);

    logging::init_logging(&config.logging);

    if cli.print_config {
        println!("{}", config.to_yaml()?);
        return Ok(());
    }

    let command = cli.command.unwrap_or(Commands::Posts {
        page: PageArgs::default(),
        author: None,
    });

    let db = store::connect_seeded().await?;
    let pagination = Arc::new(config.pagination);

    let json = match command {
        Commands::Users(page) => {
            let repo = SeaOrmPageRepository::new(db, "User", store::user_fields());
            render(repo, pagination, page, FindOptions::new(), UserDto::from).await?
        }
        Commands::Posts { page, author } => {
            let repo = SeaOrmPageRepository::new(db, "Post", store::post_fields());
            let options = scoped("authorId", author);
            render(repo, pagination, page, options, PostDto::from).await?
        }
        Commands::Comments { page, post } => {
            let repo = SeaOrmPageRepository::new(db, "Comment", store::comment_fields());
            let options = scoped("postId", post);
            render(repo, pagination, page, options, CommentDto::from).await?
        }
    };

    println!("{json}");
    Ok(())
}

fn scoped(column: &str, id: Option<i64>) -> FindOptions {
    match id {
        Some(id) => FindOptions::new().with_constraint(Where::eq(column, id.to_string())),
        None => FindOptions::new(),
    }
}

async fn render<R, D>(
    repo: R,
    config: Arc<PaginationConfig>,
    args: PageArgs,
    options: FindOptions,
    to_dto: impl FnMut(R::Item) -> D,
) -> Result<String>
where
    R: PageRepository,
    D: Serialize,
{
    let paginator = Paginator::new(repo, config);
    let page = paginator
        .get_all(&args.into(), Some(options))
        .await?
        .map_items(to_dto);
    Ok(serde_json::to_string_pretty(&page)?)
}
