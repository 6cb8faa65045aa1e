use clap::{Parser, Subcommand};
use manabitore::{
    catalog, config,
    error::AppError,
    report,
    storage::{FileStorage, ProgressStorage},
    store::ProgressStore,
    streak, xp,
};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "manabitore")]
#[command(version, about = "30-day learning tracker: lessons, streaks, XP, achievements")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show level, streak, and the 30-day grid
    Status,

    /// Record a completed lesson
    Complete {
        /// Lesson day number
        #[arg(value_parser = clap::value_parser!(u32).range(1..=30))]
        day: u32,
        /// Minutes spent on the lesson
        #[arg(short, long, default_value_t = 10)]
        minutes: u32,
        /// Quiz score in percent
        #[arg(short, long, default_value_t = 0,
              value_parser = clap::value_parser!(u32).range(0..=100))]
        score: u32,
    },

    /// Bookmark a lesson
    Bookmark {
        #[arg(value_parser = clap::value_parser!(u32).range(1..=30))]
        day: u32,
    },

    /// Remove a bookmark
    Unbookmark {
        #[arg(value_parser = clap::value_parser!(u32).range(1..=30))]
        day: u32,
    },

    /// Attach a note to a lesson
    Note {
        #[arg(value_parser = clap::value_parser!(u32).range(1..=30))]
        day: u32,
        text: String,
    },

    /// Spend a streak freeze
    Freeze,

    /// List achievements and progress toward them
    Achievements,

    /// List the 30-day curriculum
    Lessons,

    /// Write progress to a JSON file
    Export {
        /// Target file (default: manabitore-progress-<date>.json)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Load progress from a previously exported JSON file
    Import { file: PathBuf },

    /// Print or change where progress is stored
    Config {
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },

    /// Wipe all progress
    Reset {
        /// Skip the confirmation
        #[arg(long)]
        yes: bool,
    },
}

fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    if let Commands::Config { data_dir } = &cli.command {
        return handle_config(data_dir.as_deref());
    }

    let storage = FileStorage::new(config::resolve_data_dir());
    if !storage.is_available() {
        tracing::warn!("storage unavailable; progress will not survive this session");
    }
    let mut store = ProgressStore::new(Box::new(storage));
    store.load();

    match cli.command {
        Commands::Status => {
            println!(
                "{}",
                report::render_status(store.progress(), &catalog::lesson_catalog(), streak::today())
            );
        }
        Commands::Complete {
            day,
            minutes,
            score,
        } => complete_lesson(&mut store, day, minutes, score),
        Commands::Bookmark { day } => {
            store.add_bookmark(day);
            println!("Day {day} bookmarked.");
        }
        Commands::Unbookmark { day } => {
            store.remove_bookmark(day);
            println!("Bookmark for day {day} removed.");
        }
        Commands::Note { day, text } => {
            store.save_note(day, text);
            println!("Note saved for day {day}.");
        }
        Commands::Freeze => {
            if store.use_streak_freeze() {
                println!(
                    "Streak freeze spent. {} left.",
                    store.progress().streak_freezes
                );
            } else {
                println!("No streak freezes left.");
            }
        }
        Commands::Achievements => {
            println!(
                "{}",
                report::render_achievements(&catalog::achievement_catalog(), store.progress())
            );
        }
        Commands::Lessons => {
            println!(
                "{}",
                report::render_lessons(&catalog::lesson_catalog(), store.progress())
            );
        }
        Commands::Export { output } => {
            let path = output.unwrap_or_else(|| {
                PathBuf::from(format!(
                    "manabitore-progress-{}.json",
                    streak::today().format("%Y-%m-%d")
                ))
            });
            fs::write(&path, store.export())?;
            println!("Progress exported to {}", path.display());
        }
        Commands::Import { file } => {
            let text = fs::read_to_string(&file)?;
            if !store.import_text(&text) {
                return Err(AppError::ImportFailed);
            }
            println!("Progress imported from {}", file.display());
        }
        Commands::Config { .. } => unreachable!("handled above"),
        Commands::Reset { yes } => {
            if yes {
                store.reset();
                println!("Progress reset.");
            } else {
                println!("This wipes all progress. Re-run with --yes to confirm.");
            }
        }
    }

    Ok(())
}

fn complete_lesson(store: &mut ProgressStore, day: u32, minutes: u32, score: u32) {
    let award = store.complete_lesson(day, minutes * 60, score);
    println!("Day {day} complete: +{} XP", award.earned_xp);

    if award.leveled_up {
        let level = store.progress().level;
        println!("Level up! You reached level {level}.");
        for reward in xp::level_rewards(level) {
            println!("  Unlocked: {reward}");
        }
    }

    for achievement in store.check_achievements(&catalog::achievement_catalog()) {
        println!(
            "Achievement unlocked: {} {} (+{} XP)",
            achievement.icon, achievement.title, achievement.xp_reward
        );
    }
}

fn handle_config(data_dir: Option<&Path>) -> Result<(), AppError> {
    match data_dir {
        Some(dir) => {
            config::save_data_dir(dir)?;
            println!("Data directory set to {}", dir.display());
        }
        None => println!("Data directory: {}", config::resolve_data_dir().display()),
    }
    Ok(())
}
