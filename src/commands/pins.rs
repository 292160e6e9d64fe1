//! Pin commands: generate, image, edit, schedule and the dashboard views

use super::{open_storage, truncate};
use crate::config::Config;
use crate::error::Result;
use crate::generator::{self, PinEdit};
use crate::models::{BlogPostInput, PinStatus, PinSuggestion};
use crate::providers::create_provider;
use crate::storage::PinRepository;

use colored::Colorize;
use prettytable::{format, Table};

/// Default number of rows shown by `upcoming`
const UPCOMING_LIMIT: usize = 3;

fn repository(config: &Config) -> Result<PinRepository> {
    Ok(PinRepository::new(open_storage(config)?))
}

fn status_cell(status: PinStatus) -> colored::ColoredString {
    match status {
        PinStatus::Draft => "draft".yellow(),
        PinStatus::Scheduled => "scheduled".blue(),
        PinStatus::Published => "published".green(),
    }
}

fn print_pins(pins: &[PinSuggestion]) {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BORDERS_ONLY);
    table.add_row(prettytable::row![
        "ID".bold(),
        "Title".bold(),
        "Status".bold(),
        "Image".bold(),
        "Board".bold(),
        "Scheduled".bold()
    ]);

    for pin in pins {
        let image = if pin.has_image() { "yes" } else { "-" };
        let board = pin.board_name.as_deref().unwrap_or("-");
        let scheduled = pin.schedule_date.as_deref().unwrap_or("-");
        table.add_row(prettytable::row![
            pin.id.cyan(),
            truncate(&pin.title, 40),
            status_cell(pin.status),
            image,
            board,
            scheduled
        ]);
    }

    table.printstd();
}

/// Generate draft pins for a blog post
pub async fn run_generate(
    config: Config,
    title: String,
    summary: String,
    url: String,
    board: String,
) -> Result<()> {
    let repo = repository(&config)?;
    let provider = create_provider(&config.provider)?;
    let input = BlogPostInput {
        title,
        summary,
        url,
        board_name: board,
    };

    let drafts =
        generator::generate_drafts(provider.as_ref(), &repo, &input, &config.generator).await?;

    println!(
        "{}",
        format!("Generated {} draft pins", drafts.len()).green()
    );
    print_pins(&drafts);
    println!(
        "Use {} to create an image for a draft.",
        "pinforge image <ID>".cyan()
    );
    Ok(())
}

/// Generate or regenerate a pin's image
pub async fn run_image(config: Config, id: String) -> Result<()> {
    let repo = repository(&config)?;
    let provider = create_provider(&config.provider)?;

    match generator::generate_pin_image(provider.as_ref(), &repo, &id).await {
        Ok(pin) => {
            println!("{}", format!("Image generated for {}", pin.id).green());
            Ok(())
        }
        Err(e) => {
            eprintln!("{}", "Failed to generate image".red());
            Err(e)
        }
    }
}

/// Edit fields of a stored pin
pub fn run_edit(config: Config, id: String, edit: PinEdit) -> Result<()> {
    if edit.is_empty() {
        println!("{}", "Nothing to change.".yellow());
        return Ok(());
    }

    let repo = repository(&config)?;
    let pin = generator::edit_pin(&repo, &id, edit)?;
    println!("{}", format!("Updated {}", pin.id).green());
    print_pins(std::slice::from_ref(&pin));
    Ok(())
}

/// Schedule a pin for `date`
pub fn run_schedule(config: Config, id: String, date: String) -> Result<()> {
    let repo = repository(&config)?;
    let pin = generator::schedule_pin(&repo, &id, &date)?;
    println!(
        "{}",
        format!("Scheduled '{}' for {}", pin.title, date).green()
    );
    Ok(())
}

/// Dashboard: status counts followed by the pin list
pub fn run_list(config: Config, status: Option<String>) -> Result<()> {
    let repo = repository(&config)?;
    let filter = status.map(|s| s.parse::<PinStatus>()).transpose()?;

    let all = repo.all();
    let count = |status: PinStatus| all.iter().filter(|p| p.status == status).count();
    println!(
        "\n{} {}   {} {}   {} {}",
        "Drafts:".bold(),
        count(PinStatus::Draft),
        "Scheduled:".bold(),
        count(PinStatus::Scheduled),
        "Published:".bold(),
        count(PinStatus::Published)
    );

    let pins: Vec<PinSuggestion> = match filter {
        Some(status) => all.into_iter().filter(|p| p.status == status).collect(),
        None => all,
    };

    if pins.is_empty() {
        println!("{}", "No pins found.".yellow());
        return Ok(());
    }

    print_pins(&pins);
    println!();
    Ok(())
}

/// Scheduled pins ordered by date
pub fn run_upcoming(config: Config, limit: Option<usize>) -> Result<()> {
    let repo = repository(&config)?;
    let pins = repo.upcoming(Some(limit.unwrap_or(UPCOMING_LIMIT)));

    if pins.is_empty() {
        println!("{}", "No scheduled pins.".yellow());
        return Ok(());
    }

    println!("\nUpcoming Schedule:");
    print_pins(&pins);
    println!();
    Ok(())
}
