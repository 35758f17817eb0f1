//! Settlekit - browse newcomer community resources from the terminal
//!
//! Fetches service locations, stories, experiences, and migration updates
//! through a session cache with retrying network access, and manages locally
//! saved stories.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use settlekit::cli::{Cli, Command};
use settlekit::data::{Experience, MigrationUpdate, ServiceLocation, Story};
use settlekit::service::ResourceService;
use settlekit::store::LocalStore;

/// Applies the optional `--limit` flag to a fetched list
fn clip<T>(mut items: Vec<T>, limit: Option<usize>) -> Vec<T> {
    if let Some(limit) = limit {
        items.truncate(limit);
    }
    items
}

fn print_services(services: &[ServiceLocation]) {
    for service in services {
        let address = service.address.as_deref().unwrap_or("address not published");
        println!(
            "[{:?}] {} ({:.4}, {:.4}) - {}",
            service.category, service.name, service.latitude, service.longitude, address
        );
    }
}

fn print_stories(stories: &[Story]) {
    for story in stories {
        let author = story.author.as_deref().unwrap_or("anonymous");
        println!("{} - {} ({})", story.title, author, story.submitted_at.date_naive());
        println!("  {}", story.body);
    }
}

fn print_experiences(experiences: &[Experience]) {
    for experience in experiences {
        let origin = experience.country_of_origin.as_deref().unwrap_or("unspecified");
        match experience.rating {
            Some(rating) => println!("({}/5) from {}: {}", rating, origin, experience.summary),
            None => println!("(unrated) from {}: {}", origin, experience.summary),
        }
    }
}

fn print_updates(updates: &[MigrationUpdate]) {
    for update in updates {
        println!("{} - {}", update.published_at.date_naive(), update.title);
        println!("  {}", update.summary);
        if let Some(url) = &update.source_url {
            println!("  source: {}", url);
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let store = LocalStore::new();

    // Local-only commands need no network client
    match &cli.command {
        Command::SaveStory { text } => {
            let store = store.ok_or("could not determine a local data directory")?;
            store.save_story(text)?;
            println!("Story saved.");
            return Ok(());
        }
        Command::SavedStories => {
            let store = store.ok_or("could not determine a local data directory")?;
            let stories = clip(store.load_saved_stories()?, cli.limit);
            if stories.is_empty() {
                println!("No saved stories.");
            }
            for (index, text) in stories.iter().enumerate() {
                println!("{}. {}", index + 1, text);
            }
            return Ok(());
        }
        _ => {}
    }

    let stored_token = match &store {
        Some(store) => store.load_token()?,
        None => None,
    };
    let config = cli.to_config();
    let service = ResourceService::new(&config, cli.auth_tokens(stored_token))?;

    match &cli.command {
        Command::Services => {
            let services = clip(service.service_locations().await?, cli.limit);
            print_services(&services);
        }
        Command::Stories => {
            let stories = clip(service.stories().await?, cli.limit);
            print_stories(&stories);
        }
        Command::Experiences => {
            let experiences = clip(service.experiences().await?, cli.limit);
            print_experiences(&experiences);
        }
        Command::Migration => {
            let updates = clip(service.migration_updates().await?, cli.limit);
            print_updates(&updates);
        }
        Command::Overview => {
            let overview = service.overview().await?;
            println!("== Services ==");
            print_services(&clip(overview.services, cli.limit));
            println!("== Stories ==");
            print_stories(&clip(overview.stories, cli.limit));
            println!("== Experiences ==");
            print_experiences(&clip(overview.experiences, cli.limit));
            println!("== Migration updates ==");
            print_updates(&clip(overview.migration_updates, cli.limit));
        }
        Command::SaveStory { .. } | Command::SavedStories => unreachable!("handled above"),
    }

    Ok(())
}
