#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for the eco map toolchain.
//!
//! Clusters a spot catalog into map markers, applies geolocation-gated
//! unlocks to a JSON progression state file, lists regions and travel
//! courses, and reports level and progress summaries.

mod config;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use eco_map_catalog::{Catalog, SpotFilter};
use eco_map_progression_models::ProgressionState;
use eco_map_spot_models::LatLng;

use crate::config::EcoMapConfig;

/// Number of upcoming badges shown by `summary`.
const NEXT_BADGE_LIMIT: usize = 3;

/// Cluster spot catalogs and track exploration progress.
#[derive(Parser)]
#[command(name = "eco_map")]
#[command(about = "Cluster spot catalogs and track exploration progress")]
struct Cli {
    /// Path to a TOML config file. Falls back to `$ECO_MAP_CONFIG`.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Subcommand to execute.
    #[command(subcommand)]
    command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Normalize and cluster a spot catalog, writing the map markers as JSON.
    Cluster {
        /// Catalog JSON file.
        #[arg(long)]
        spots: PathBuf,

        /// Output file (default: stdout).
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Attempt to unlock a spot and update the progression state file.
    Unlock {
        /// Catalog JSON file.
        #[arg(long)]
        spots: PathBuf,

        /// Progression state JSON file. Created if missing.
        #[arg(long)]
        state: PathBuf,

        /// ID of the spot to unlock.
        #[arg(long)]
        spot_id: String,

        /// Current latitude.
        #[arg(long, requires = "lng", allow_negative_numbers = true)]
        lat: Option<f64>,

        /// Current longitude.
        #[arg(long, requires = "lat", allow_negative_numbers = true)]
        lng: Option<f64>,
    },

    /// Show the level reached with a given amount of lifetime XP.
    Level {
        /// Lifetime XP.
        #[arg(long)]
        total_xp: u64,
    },

    /// List regions with their spot counts.
    Regions {
        /// Catalog JSON file.
        #[arg(long)]
        spots: PathBuf,

        /// Show only this region's marker counts.
        #[arg(long)]
        region: Option<String>,
    },

    /// List travel courses and their stops.
    Courses {
        /// Catalog JSON file.
        #[arg(long)]
        spots: PathBuf,

        /// Progression state JSON file, to mark visited stops.
        #[arg(long)]
        state: Option<PathBuf>,
    },

    /// Summarize progress against a catalog.
    Summary {
        /// Catalog JSON file.
        #[arg(long)]
        spots: PathBuf,

        /// Progression state JSON file.
        #[arg(long)]
        state: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    let config = EcoMapConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Cluster { spots, output } => cmd_cluster(&config, &spots, output.as_deref()),
        Commands::Unlock {
            spots,
            state,
            spot_id,
            lat,
            lng,
        } => {
            let location = lat.zip(lng).map(|(lat, lng)| LatLng::new(lat, lng));
            cmd_unlock(&config, &spots, &state, &spot_id, location)
        }
        Commands::Level { total_xp } => {
            cmd_level(total_xp);
            Ok(())
        }
        Commands::Regions { spots, region } => cmd_regions(&config, &spots, region),
        Commands::Courses { spots, state } => cmd_courses(&config, &spots, state.as_deref()),
        Commands::Summary { spots, state } => cmd_summary(&config, &spots, &state),
    }
}

/// Reads a progression state file, or starts fresh if it does not exist.
fn read_state(path: &Path) -> Result<ProgressionState, Box<dyn std::error::Error>> {
    if !path.exists() {
        log::info!("No state at {}, starting fresh", path.display());
        return Ok(ProgressionState::default());
    }
    let json = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&json)?)
}

fn write_state(path: &Path, state: &ProgressionState) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, serde_json::to_string_pretty(state)?)?;
    log::debug!("Wrote state to {}", path.display());
    Ok(())
}

fn cmd_cluster(
    config: &EcoMapConfig,
    spots: &Path,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let catalog = Catalog::load(spots, &config.cluster)?;
    let summary = catalog.summary();

    eprintln!(
        "{} spots ({} with location) -> {} markers",
        summary.input_count, summary.located_count, summary.output_count
    );
    if let Some((id, count)) = &summary.largest_cluster {
        eprintln!("Largest cluster: {id} (+{count})");
    }

    let json = serde_json::to_string_pretty(catalog.spots())?;
    match output {
        Some(path) => {
            std::fs::write(path, json)?;
            eprintln!("Wrote {}", path.display());
        }
        None => println!("{json}"),
    }

    Ok(())
}

fn cmd_unlock(
    config: &EcoMapConfig,
    spots: &Path,
    state_path: &Path,
    spot_id: &str,
    location: Option<LatLng>,
) -> Result<(), Box<dyn std::error::Error>> {
    let catalog = Catalog::load(spots, &config.cluster)?;
    let mut state = read_state(state_path)?;

    let outcome = eco_map_progression::attempt_unlock_now(
        &mut state,
        &catalog,
        spot_id,
        location,
        &config.unlock,
    )?;

    write_state(state_path, &state)?;

    println!("Unlocked {spot_id}: +{} XP", outcome.reward);
    if outcome.level_up {
        let info = eco_map_progression::level_info(&state);
        println!("Level up! Now level {} ({})", info.level, info.title);
    }
    for id in &outcome.new_badge_ids {
        if let Some(badge) = eco_map_progression::registry::badge(id) {
            println!("New badge: {} {}", badge.emoji, badge.name);
        }
    }

    Ok(())
}

fn cmd_level(total_xp: u64) {
    let info = eco_map_progression::levels::level_info(
        total_xp,
        eco_map_progression::registry::level_thresholds(),
    );

    println!("Level {} - {}", info.level, info.title);
    match info.next_level_xp {
        Some(next) => println!(
            "{total_xp}/{next} XP ({:.0}% to next level)",
            info.progress * 100.0
        ),
        None => println!("{total_xp} XP (max level)"),
    }
}

fn cmd_regions(
    config: &EcoMapConfig,
    spots: &Path,
    region: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let catalog = Catalog::load(spots, &config.cluster)?;

    let filter = SpotFilter {
        region,
        category: None,
    };
    let info = catalog.display_info(&filter);
    match &filter.region {
        Some(id) => {
            let Some(region) = eco_map_catalog::registry::region(id) else {
                return Err(format!("Unknown region: {id}").into());
            };
            println!(
                "{} {}: {} spots (center {:.4}, {:.4})",
                region.emoji, region.name, info.showing, region.center.lat, region.center.lng
            );
        }
        None => {
            println!(
                "Showing {} priority spots of {} total",
                info.showing, info.total
            );
            println!();
            for region in eco_map_catalog::registry::all_regions() {
                println!(
                    "  {} {:<6} {}",
                    region.emoji,
                    region.name,
                    catalog.region_spot_count(&region.id)
                );
            }
        }
    }

    Ok(())
}

fn cmd_courses(
    config: &EcoMapConfig,
    spots: &Path,
    state_path: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let catalog = Catalog::load(spots, &config.cluster)?;
    let state = state_path.map(read_state).transpose()?.unwrap_or_default();

    for course in eco_map_catalog::registry::all_courses() {
        println!(
            "{} {} [{}] {} / {} ({})",
            course.thumbnail,
            course.name,
            course.region,
            course.duration,
            course.total_distance,
            course.difficulty
        );
        println!("   {}", course.description);
        for spot in catalog.course_spots(course) {
            let mark = if state.is_spot_unlocked(spot.id()) { "✔" } else { " " };
            println!("   [{mark}] {} ({})", spot.spot.display_name, spot.id());
        }
        println!();
    }

    Ok(())
}

fn cmd_summary(
    config: &EcoMapConfig,
    spots: &Path,
    state_path: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let catalog = Catalog::load(spots, &config.cluster)?;
    let state = read_state(state_path)?;
    let today = chrono::Local::now().date_naive();

    let summary = eco_map_progression::stats_summary(
        &state,
        catalog.len(),
        eco_map_catalog::registry::all_regions().len(),
        today,
    );
    let info = eco_map_progression::level_info(&state);
    let contribution =
        eco_map_catalog::analysis::user_contribution(catalog.spots(), &state.unlocked_spot_ids);

    println!("=== Exploration Summary ===");
    println!();
    println!("Level:     {} - {} ({} XP)", info.level, info.title, summary.total_xp);
    println!(
        "Spots:     {}/{} ({:.1}%)",
        summary.unlocked_count, summary.total_spots, summary.completion_rate
    );
    println!(
        "Regions:   {}/{}",
        summary.unique_regions, summary.total_regions
    );
    println!(
        "Streak:    {} days (longest {})",
        summary.current_streak, summary.longest_streak
    );
    println!("Eco score: {:.0}", summary.total_eco_score);
    println!("Impact:    {}", contribution.impact_level);
    println!("Badges:    {}/{}", summary.badge_count, summary.total_badges);
    println!("Days:      {}", summary.days_since_start);

    let next = eco_map_progression::badges::next_badges(
        &state,
        eco_map_progression::registry::all_badges(),
        NEXT_BADGE_LIMIT,
    );
    if !next.is_empty() {
        println!();
        println!("Next badges:");
        for badge in next {
            println!("  {} {} - {}", badge.emoji, badge.name, badge.description);
        }
    }

    Ok(())
}
