use anyhow::{anyhow, Context, Result};
use bot::{BotConfig, KeywordRecognizer, MovieBot};
use carousel::{build_carousel, carousel_attachments, ResultWindow, CARDS_IN_CAROUSEL};
use catalog::genres::GENRES;
use catalog::{CatalogConfig, MovieCatalog, TmdbClient};
use clap::{Parser, Subcommand};
use colored::Colorize;
use dialogs::MemoryStorage;
use domain::{Activity, CardDescription, MovieId};
use std::io::Write;
use std::sync::Arc;
use std::time::Instant;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::error;

/// Mood Movies - a chat bot that recommends movies for your mood
#[derive(Parser)]
#[command(name = "mood-movies")]
#[command(about = "Chat bot that recommends movies from TMDB based on your mood", long_about = None)]
struct Cli {
    /// TMDB API key
    #[arg(long, env = "TMDB_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Catalog endpoint (defaults to the public TMDB API)
    #[arg(long)]
    base_url: Option<String>,

    /// Response language, e.g. en-US
    #[arg(long)]
    language: Option<String>,

    /// Number of cards per carousel
    #[arg(long, default_value_t = CARDS_IN_CAROUSEL)]
    cards: usize,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Chat with the bot on the console
    Chat {
        /// Conversation id used for session state
        #[arg(long, default_value = "console")]
        conversation: String,
    },

    /// Show a carousel for a genre without chatting
    Recommend {
        /// Genre name, e.g. comedy or "science fiction"
        #[arg(long)]
        genre: String,

        /// Only movies released in this year
        #[arg(long)]
        year: Option<i32>,

        /// Print adaptive card attachments as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the full catalog record of one movie
    Details {
        /// TMDB movie id
        #[arg(long)]
        id: MovieId,
    },

    /// List the genres the bot understands
    Genres,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match &cli.command {
        Commands::Chat { conversation } => handle_chat(&cli, conversation).await,
        Commands::Recommend { genre, year, json } => {
            handle_recommend(&cli, genre, *year, *json).await
        }
        Commands::Details { id } => handle_details(&cli, *id).await,
        Commands::Genres => {
            handle_genres();
            Ok(())
        }
    };

    if let Err(e) = &result {
        error!("{:#}", e);
    }
    result
}

/// Build the catalog config from flags and environment
fn catalog_config(cli: &Cli) -> Result<CatalogConfig> {
    let api_key = cli
        .api_key
        .clone()
        .ok_or_else(|| anyhow!("No TMDB API key: pass --api-key or set TMDB_API_KEY"))?;
    let mut config = CatalogConfig::new(api_key);
    if let Some(base_url) = &cli.base_url {
        config = config.with_base_url(base_url.clone());
    }
    if let Some(language) = &cli.language {
        config = config.with_language(language.clone());
    }
    Ok(config)
}

fn create_client(cli: &Cli) -> Result<TmdbClient> {
    TmdbClient::new(catalog_config(cli)?).context("Failed to create catalog client")
}

/// Handle the 'chat' command
async fn handle_chat(cli: &Cli, conversation: &str) -> Result<()> {
    let client = create_client(cli)?;
    let config = BotConfig::default()
        .with_cards_in_carousel(cli.cards)
        .with_image_base_url(client.config().image_base_url.clone());
    let bot = MovieBot::new(
        Arc::new(client),
        Arc::new(KeywordRecognizer::new()),
        Arc::new(MemoryStorage::new()),
        config,
    )
    .context("Failed to build bot")?;

    println!("{}", "Mood Movies".bold().blue());
    println!(
        "{}",
        "Say hi to start. Commands: /reset, /profile, /quit".dimmed()
    );

    let stats = chat_loop(&bot, conversation, BufReader::new(tokio::io::stdin())).await?;
    if stats.failed > 0 {
        println!(
            "{}",
            format!("{} of {} turns failed", stats.failed, stats.handled + stats.failed).yellow()
        );
    }
    Ok(())
}

/// Turn counts of one chat session
#[derive(Debug, Default, PartialEq, Eq)]
struct ChatStats {
    handled: usize,
    failed: usize,
}

/// Read lines until EOF or `/quit`, one bot turn per line
async fn chat_loop<R>(bot: &MovieBot, conversation: &str, input: R) -> Result<ChatStats>
where
    R: AsyncBufRead + Unpin,
{
    let mut stats = ChatStats::default();
    let mut lines = input.lines();
    loop {
        print!("{} ", "you>".green().bold());
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();
        match line {
            "" => continue,
            "/quit" | "/exit" => break,
            "/reset" => {
                bot.reset(conversation).await?;
                println!("{}", "Conversation reset.".dimmed());
            }
            "/profile" => match bot.profile(conversation).await? {
                Some(profile) => println!("{}", serde_json::to_string_pretty(&profile)?),
                None => println!("{}", "No profile yet.".dimmed()),
            },
            text => {
                let start = Instant::now();
                // A failed turn is reported; the session keeps going
                match bot.on_turn(conversation, text).await {
                    Ok(replies) => {
                        for activity in &replies {
                            print_activity(activity);
                        }
                        stats.handled += 1;
                        tracing::debug!("Turn handled in {:?}", start.elapsed());
                    }
                    Err(e) => {
                        stats.failed += 1;
                        error!("Turn failed: {:#}", e);
                    }
                }
            }
        }
    }

    Ok(stats)
}

/// Handle the 'recommend' command
async fn handle_recommend(cli: &Cli, genre: &str, year: Option<i32>, json: bool) -> Result<()> {
    let client = create_client(cli)?;
    let renderer = carousel::CardRenderer::new(client.config().image_base_url.clone());

    let movies = client
        .movies_by_genre_name(genre, year)
        .await
        .with_context(|| format!("Failed to fetch {} movies", genre))?;
    let total = movies.len();
    let cards = build_carousel(movies, &ResultWindow::new(cli.cards), &renderer);

    if json {
        println!("{}", serde_json::to_string_pretty(&carousel_attachments(&cards))?);
        return Ok(());
    }

    println!(
        "{}",
        format!("{} of {} {} movies:", cards.len(), total, genre)
            .bold()
            .blue()
    );
    print_cards(&cards);
    Ok(())
}

/// Handle the 'details' command
async fn handle_details(cli: &Cli, id: MovieId) -> Result<()> {
    let client = create_client(cli)?;
    let movie = client
        .movie_details(id)
        .await
        .with_context(|| format!("Failed to fetch movie {}", id))?;

    println!("{}", format!("{} ({})", movie.title, movie.id).bold().blue());
    println!("{}Vote average: {}", "• ".green(), movie.vote_average);
    println!("{}Release date: {}", "• ".green(), movie.release_date);
    if let Some(poster) = &movie.poster_path {
        println!(
            "{}Poster: {}{}",
            "• ".green(),
            client.config().image_base_url,
            poster
        );
    }
    println!("\n{}", movie.overview);
    Ok(())
}

/// Handle the 'genres' command
fn handle_genres() {
    println!("{}", "Genres:".bold().blue());
    for (name, id) in GENRES {
        println!("  - {} ({})", name, id.dimmed());
    }
}

fn print_activity(activity: &Activity) {
    match activity {
        Activity::Text(text) => println!("{} {}", "bot>".cyan().bold(), text),
        Activity::Carousel(cards) => print_cards(cards),
    }
}

/// Console rendition of a carousel
fn print_cards(cards: &[CardDescription]) {
    for (i, card) in cards.iter().enumerate() {
        println!(
            "  {}. {} {}",
            (i + 1).to_string().green(),
            card.title.bold(),
            format!("[{}]", card.kicker).dimmed()
        );
        for subtitle in &card.subtitles {
            println!("     {}", subtitle);
        }
        if !card.overview.is_empty() {
            println!("     {}", card.overview.dimmed());
        }
        if let Some(image_url) = &card.image_url {
            println!("     {}", image_url.dimmed());
        }
        for action in &card.actions {
            println!("     {}: {}", action.title.yellow(), action.url);
        }
    }
}
