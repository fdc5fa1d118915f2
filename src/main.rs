// Draft board entry point.
//
// Startup sequence:
// 1. Initialize tracing (log to file, stdout carries the tables)
// 2. Load config
// 3. Load the player pool
// 4. Build league rosters: keepers, then the pick log, then any --pick arguments
// 5. Run the requested view or record/undo a pick

use h2h_draft::config::{self, Config};
use h2h_draft::draft::picks::{PickLog, RecordedPick};
use h2h_draft::draft::player::PlayerKind;
use h2h_draft::draft::pool::{self, PlayerPool};
use h2h_draft::draft::roster::League;
use h2h_draft::valuation::category::CategoryGroup;
use h2h_draft::valuation::marginal::MarginalValue;
use h2h_draft::valuation::ranking::RankedPlayer;
use h2h_draft::valuation::Valuator;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use tracing::info;

#[derive(Subcommand, Debug)]
enum Commands {
    /// Rank available players by marginal expected wins (default)
    Rank {
        /// Number of players to show
        #[arg(short = 'n', long, default_value_t = 25)]
        top: usize,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Show a team's roster, weekly projection and expected wins
    Roster {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Show which available players help most in each category
    Needs {
        /// Players listed per category
        #[arg(short = 'n', long, default_value_t = 5)]
        top: usize,

        /// How deep into the overall ranking to look
        #[arg(long, default_value_t = 50)]
        shortlist: usize,
    },
    /// Find available players by name and show their marginal value
    Search {
        /// Case-insensitive part of the player's name
        term: String,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Draft a player to --team (or league.my_team) and save it to the pick log
    Draft {
        /// Player name as it appears in the projections
        player: String,
    },
    /// Remove the most recent pick from the pick log
    Undo,
}

#[derive(Parser, Debug)]
#[command(name = "h2h-draft")]
#[command(about = "Head-to-head categories draft board", long_about = None)]
#[command(version)]
struct Cli {
    /// Team to evaluate (defaults to league.my_team)
    #[arg(short, long, global = true)]
    team: Option<String>,

    /// Record a pick before evaluating, as TEAM_ID:PLAYER NAME (repeatable)
    #[arg(short, long = "pick", global = true, value_name = "TEAM_ID:PLAYER")]
    picks: Vec<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // 1. Initialize tracing
    init_tracing()?;
    info!("h2h-draft starting up");

    // 2. Load config
    let config = config::load_config().context("failed to load configuration")?;
    info!(
        "Config loaded: league={}, {} teams, {} weeks",
        config.league.name,
        config.league.teams.len(),
        config.league.num_weeks
    );

    // 3. Load the player pool
    let pool = pool::load_pool(&config.hitters_path(), &config.pitchers_path())
        .context("failed to load player pool")?;

    let picks_path = config.picks_path();
    if let Some(Commands::Undo) = cli.command {
        match PickLog::pop(&picks_path).context("failed to update pick log")? {
            Some(pick) => println!("Undid pick: {} -> {}", pick.player, pick.team),
            None => println!("Pick log is empty"),
        }
        return Ok(());
    }

    // 4. Build rosters
    let log = PickLog::load(&picks_path).context("failed to load pick log")?;
    let mut league = build_league(&config, &pool, &log, &cli.picks)?;
    let team_id = match cli.team.or_else(|| config.league.my_team.clone()) {
        Some(id) => id,
        None => bail!("no team given: pass --team or set league.my_team"),
    };
    let valuator = Valuator::from_config(&config);

    // 5. Run the requested view
    match cli.command.unwrap_or(Commands::Rank { top: 25, json: false }) {
        Commands::Rank { top, json } => print_ranking(&valuator, &league, &pool, &team_id, top, json),
        Commands::Roster { json } => print_roster(&valuator, &league, &pool, &team_id, json),
        Commands::Needs { top, shortlist } => {
            print_needs(&valuator, &league, &pool, &team_id, shortlist, top)
        }
        Commands::Search { term, json } => {
            let found = valuator
                .search_available(&league, &pool, &team_id, &term)
                .context("failed to search available players")?;
            print_players(&format!("Available matching `{term}` for {team_id}"), &found, json)
        }
        Commands::Draft { player } => {
            let name = pool
                .find(&player)
                .with_context(|| format!("player `{}` is not in the pool", player.trim()))?
                .name
                .clone();
            let slot = league
                .draft(&team_id, &name, &pool)
                .with_context(|| format!("failed to draft `{name}` to `{team_id}`"))?;
            PickLog::append(
                &picks_path,
                RecordedPick {
                    team: team_id.clone(),
                    player: name.clone(),
                },
            )
            .context("failed to save pick")?;
            println!("{team_id} drafted {name} ({slot})");
            Ok(())
        }
        Commands::Undo => Ok(()),
    }
}

fn build_league(
    config: &Config,
    pool: &PlayerPool,
    log: &PickLog,
    picks: &[String],
) -> anyhow::Result<League> {
    let mut league = League::from_config(&config.league);
    let keepers = league.load_keepers(&config.league.teams, pool);
    info!("Placed {} keepers", keepers);
    log.replay(&mut league, pool);

    for pick in picks {
        let Some((team_id, name)) = pick.split_once(':') else {
            bail!("invalid --pick `{pick}`: expected TEAM_ID:PLAYER");
        };
        let player = pool
            .find(name)
            .with_context(|| format!("player `{}` is not in the pool", name.trim()))?;
        league
            .draft(team_id.trim(), &player.name, pool)
            .with_context(|| format!("failed to apply pick `{pick}`"))?;
    }

    league
        .validate(pool)
        .context("roster state is inconsistent")?;
    Ok(league)
}

fn print_ranking(
    valuator: &Valuator,
    league: &League,
    pool: &PlayerPool,
    team_id: &str,
    top: usize,
    json: bool,
) -> anyhow::Result<()> {
    let ranked = valuator
        .rank_available(league, pool, team_id)
        .context("failed to rank available players")?;
    let shown = &ranked[..top.min(ranked.len())];
    print_players(&format!("Top {} available for {}", shown.len(), team_id), shown, json)
}

fn print_players(title: &str, rows: &[RankedPlayer], json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(rows)?);
        return Ok(());
    }

    println!("{title}");
    println!("{:>4}  {:<28} {:<4} {:<14} {:<5} {:>8}", "#", "Player", "Type", "Pos", "Slot", "Value");
    for (i, row) in rows.iter().enumerate() {
        let positions = if row.kind == PlayerKind::Hitter {
            row.positions
                .iter()
                .map(|p| p.display_str())
                .collect::<Vec<_>>()
                .join(",")
        } else {
            String::new()
        };
        let slot = row.slot.map(|p| p.display_str()).unwrap_or("-");
        let value = match row.value {
            MarginalValue::Delta(d) => format!("{d:+.4}"),
            MarginalValue::NoOpenSlot => "no slot".to_string(),
        };
        println!(
            "{:>4}  {:<28} {:<4} {:<14} {:<5} {:>8}",
            i + 1,
            row.name,
            row.kind.display_str(),
            positions,
            slot,
            value
        );
    }
    Ok(())
}

fn print_roster(
    valuator: &Valuator,
    league: &League,
    pool: &PlayerPool,
    team_id: &str,
    json: bool,
) -> anyhow::Result<()> {
    let team = league.team(team_id)?;
    let projection = valuator.project_team(team, pool)?;
    let wins = valuator.expected_wins_for(&projection)?;

    if json {
        let out = serde_json::json!({
            "team": team,
            "projection": projection,
            "expected_wins": wins,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!("{} ({})", team.name, team.id);
    for slot in &team.slots {
        println!(
            "  {:<5} {}",
            slot.position.display_str(),
            slot.player.as_deref().unwrap_or("(replacement)")
        );
    }

    println!();
    println!("  {:<5} {:>9} {:>7}", "Cat", "Weekly", "P(win)");
    for cat in valuator.categories.iter() {
        let value = projection.get(cat.id).unwrap_or(f64::NAN);
        let p = wins.get(cat.id).unwrap_or(f64::NAN);
        let formatted = if cat.id.is_rate() {
            format!("{value:.3}")
        } else {
            format!("{value:.2}")
        };
        println!("  {:<5} {:>9} {:>6.1}%", cat.id.display_str(), formatted, p * 100.0);
    }
    println!(
        "  hitting {:.3}  pitching {:.3}  total {:.3}",
        wins.group_total(CategoryGroup::Hitting),
        wins.group_total(CategoryGroup::Pitching),
        wins.total
    );
    Ok(())
}

fn print_needs(
    valuator: &Valuator,
    league: &League,
    pool: &PlayerPool,
    team_id: &str,
    shortlist: usize,
    top: usize,
) -> anyhow::Result<()> {
    let needs = valuator
        .category_needs(league, pool, team_id, shortlist, top)
        .context("failed to compute category needs")?;

    for need in needs {
        println!("{} (current P(win): {:.1}%)", need.category, need.current * 100.0);
        for leader in need.leaders {
            println!("  {:<28} {:+.2}%", leader.name, leader.gain * 100.0);
        }
    }
    Ok(())
}

/// Initialize tracing to log to a file (stdout is reserved for output tables).
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = std::env::current_dir()?.join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::File::create(log_dir.join("h2h-draft.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("h2h_draft=info,warn")),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
