use std::fs;
use std::path::Path;

use anyhow::{Context, Result, ensure};
use clap::{Parser, Subcommand};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use fieldguide::config::Config;
use fieldguide::engine::{ExerciseKind, PracticeSet, PracticeUnit};
use fieldguide::generator::choices::{multiple_choice_options, true_false_prompt};
use fieldguide::generator::word_search::generate_with;
use fieldguide::session::letter_round::LetterRound;
use fieldguide::session::practice::PracticeSession;
use fieldguide::session::word_hunt::WordHunt;
use fieldguide::store::bundled::{list_bundled, load_bundled};
use fieldguide::store::json_store::JsonStore;

#[derive(Parser)]
#[command(
    name = "fieldguide",
    version,
    about = "Adaptive practice scheduling and word-search puzzles for flashcard sets"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the scheduler against a practice set with simulated answers
    Simulate {
        /// Bundled set name or path to a JSON set
        #[arg(short, long, default_value = "garden-birds")]
        set: String,

        #[arg(short = 'n', long, default_value_t = 50)]
        steps: usize,

        /// Probability of answering each unit correctly
        #[arg(short, long, default_value_t = 0.8)]
        accuracy: f64,

        #[arg(long)]
        seed: Option<u64>,

        /// Continue from and save to the data directory
        #[arg(long)]
        persist: bool,
    },

    /// Hide a word in a letter grid and print it
    Puzzle {
        word: String,

        #[arg(long)]
        max_size: Option<usize>,

        #[arg(long)]
        attempts: Option<usize>,

        #[arg(long)]
        seed: Option<u64>,
    },

    /// List bundled practice sets
    Sets,

    /// Print the effective configuration
    Config {
        /// Save the effective configuration to the config path
        #[arg(long)]
        write: bool,
    },
}

fn make_rng(seed: Option<u64>) -> SmallRng {
    match seed {
        Some(seed) => SmallRng::seed_from_u64(seed),
        None => SmallRng::from_entropy(),
    }
}

fn load_set(name: &str) -> Result<PracticeSet> {
    let path = Path::new(name);
    if path.extension().and_then(|x| x.to_str()) == Some("json") {
        let content =
            fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        return serde_json::from_str(&content).with_context(|| format!("parsing {}", path.display()));
    }
    Ok(load_bundled(name)?)
}

fn label_of<'a>(set: &'a PracticeSet, group_id: &'a str) -> &'a str {
    set.group(group_id).map(|g| g.label.as_str()).unwrap_or(group_id)
}

fn describe(unit: &PracticeUnit, set: &PracticeSet, config: &Config, rng: &mut SmallRng) -> String {
    let group = &unit.group;
    match unit.kind {
        ExerciseKind::Introduction => format!("meet the {}", group.label),
        ExerciseKind::MultipleChoice => {
            let options = multiple_choice_options(set, &group.id, config.choices.distractors, rng);
            let labels: Vec<&str> = options.iter().map(|id| label_of(set, id)).collect();
            format!("which is it? [{}]", labels.join(" / "))
        }
        ExerciseKind::TrueFalse => {
            let prompt = true_false_prompt(set, &group.id, rng);
            format!("is this a {}?", label_of(set, &prompt.shown_id))
        }
        ExerciseKind::LetterSelection => {
            let round = LetterRound::from_config(&group.label, &config.choices, rng);
            let letters: String = round.options().iter().collect();
            format!(
                "spell it {} from {letters}, {} lives",
                round.revealed(),
                round.lives
            )
        }
        ExerciseKind::WordSearch => match generate_with(&group.label, &config.word_search, rng) {
            Some(puzzle) => {
                let hunt = WordHunt::from_config(puzzle, &config.choices);
                format!(
                    "find it in a {0}x{0} grid, {1} tries",
                    hunt.puzzle.size, hunt.lives
                )
            }
            None => "word search unavailable".to_string(),
        },
    }
}

fn simulate(set: &str, steps: usize, accuracy: f64, seed: Option<u64>, persist: bool) -> Result<()> {
    ensure!(
        accuracy.is_finite(),
        "--accuracy must be a number between 0 and 1, got {accuracy}"
    );
    let config = Config::load()?;
    let mut set = load_set(set)?;
    let mut answers = make_rng(seed.map(|s| s.wrapping_add(1)));

    let mut session = if persist {
        let store = JsonStore::new()?;
        set = store.load_or(set)?;
        store.save_set(&set)?;
        PracticeSession::with_rng(set, config, make_rng(seed)).with_hook(Box::new(store))
    } else {
        PracticeSession::with_rng(set, config, make_rng(seed))
    };

    println!("{} ({:.0}% learned)", session.set().title, session.progress() * 100.0);

    let accuracy = accuracy.clamp(0.0, 1.0);
    for step in 1..=steps {
        let Some(unit) = session.advance().cloned() else {
            println!("nothing to practice");
            break;
        };

        let config = session.config().clone();
        let set = session.set().clone();
        let prompt = describe(&unit, &set, &config, session.rng_mut());

        let correct = answers.gen_bool(accuracy);
        let before = set
            .group(unit.group_id())
            .and_then(|g| g.entity(unit.entity_id()))
            .map(|e| e.mastery)
            .unwrap_or_default();
        let after = session.record_attempt(correct).unwrap_or(before);

        println!(
            "{step:>4}  {:<16} {:<22} {:<10} {}  {before:>5.1} -> {after:>5.1}  {prompt}",
            unit.kind.to_string(),
            unit.group.label,
            unit.entity.variant,
            if correct { "+" } else { "-" },
        );
    }

    println!(
        "\n{} attempts, {:.0}% correct, {:.1}% learned, {}/{} introduced",
        session.attempts(),
        session.accuracy(),
        session.progress() * 100.0,
        session.set().introduced_count(),
        session.set().groups.len(),
    );
    Ok(())
}

fn puzzle(word: &str, max_size: Option<usize>, attempts: Option<usize>, seed: Option<u64>) -> Result<()> {
    let mut cfg = Config::load()?.word_search;
    if let Some(max_size) = max_size {
        cfg.max_grid_size = max_size;
        cfg.min_grid_size = cfg.min_grid_size.min(max_size);
    }
    if let Some(attempts) = attempts {
        cfg.attempts_per_size = attempts;
    }

    let mut rng = make_rng(seed);
    match generate_with(word, &cfg, &mut rng) {
        Some(puzzle) => {
            print!("{puzzle}");
            let cells: Vec<String> = puzzle
                .path
                .iter()
                .map(|p| format!("({},{})", p.row, p.col))
                .collect();
            println!("\n{}: {}", puzzle.word, cells.join(" "));
        }
        None => println!("could not place {word:?} in a grid of at most {0}x{0}", cfg.max_grid_size),
    }
    Ok(())
}

fn show_config(write: bool) -> Result<()> {
    let config = Config::load()?;
    let path = Config::config_path();
    println!("# {}", path.display());
    print!("{}", toml::to_string_pretty(&config)?);
    if write {
        config.save_to(&path)?;
        println!("# written");
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Simulate {
            set,
            steps,
            accuracy,
            seed,
            persist,
        } => simulate(&set, steps, accuracy, seed, persist),
        Command::Puzzle {
            word,
            max_size,
            attempts,
            seed,
        } => puzzle(&word, max_size, attempts, seed),
        Command::Sets => {
            for name in list_bundled() {
                let set = load_bundled(&name)?;
                println!("{name:<16} {} ({} groups)", set.title, set.groups.len());
            }
            Ok(())
        }
        Command::Config { write } => show_config(write),
    }
}
