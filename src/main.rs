use bevy::log::{error, info, LogPlugin};
use bevy::prelude::{App, MinimalPlugins};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

use crown_and_levy::game::{
    Campaign, CampaignSetup, GameData, GameOutcome, GamePlugin, SeededRoller,
};

/// Play a Crown & Levy campaign between AI kingdoms
#[derive(Parser, Debug)]
#[command(name = "crown-and-levy", version, about)]
struct Args {
    /// Seed for every random draw; random if omitted
    #[arg(long)]
    seed: Option<u64>,

    /// Number of kingdoms at the table
    #[arg(long, default_value_t = 4)]
    players: usize,

    /// Kingdoms to seat, in order; the rest are drawn at random
    #[arg(long = "kingdom")]
    kingdoms: Vec<String>,

    /// Stop after this many rounds
    #[arg(long, default_value_t = 100)]
    max_rounds: u32,

    /// Directory of data mods to overlay on the built-in board and rules
    #[arg(long)]
    mods: Option<PathBuf>,

    /// Print the final board as JSON
    #[arg(long)]
    dump_json: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let mut app = App::new();
    app.add_plugins((MinimalPlugins, LogPlugin::default(), GamePlugin));

    let mut data = match GameData::load_defaults() {
        Ok(data) => data,
        Err(e) => {
            error!("Failed to load game data: {}", e);
            return ExitCode::FAILURE;
        }
    };
    if let Some(dir) = &args.mods {
        data.load_mods(dir);
    }
    data.rules.round_limit = Some(args.max_rounds);

    let seed = args.seed.unwrap_or_else(rand::random);
    info!("Seed: {}", seed);

    let setup = CampaignSetup {
        player_count: args.players,
        human: None,
        ai_kingdoms: args.kingdoms,
        ai_styles: Vec::new(),
        shuffle_order: true,
    };
    let campaign = match Campaign::new(&data, setup, Box::new(SeededRoller::new(seed))) {
        Ok(campaign) => campaign,
        Err(e) => {
            error!("Cannot start campaign: {}", e);
            return ExitCode::FAILURE;
        }
    };
    app.insert_resource(campaign);

    app.finish();
    app.cleanup();
    while !app
        .world()
        .get_resource::<Campaign>()
        .map_or(true, Campaign::is_over)
    {
        app.update();
    }

    let Some(campaign) = app.world().get_resource::<Campaign>() else {
        return ExitCode::FAILURE;
    };
    for player in &campaign.players {
        let status = if player.eliminated { "eliminated" } else { "standing" };
        println!(
            "{:<12} {:<10} {:>2} regions, {:>2} influence, {}",
            player.kingdom,
            player.style.name(),
            campaign.owned_regions(player.id).len(),
            player.influence,
            status
        );
    }
    match campaign.outcome() {
        Some(GameOutcome::Victory { player, kind }) => {
            println!("{} wins by {:?}", campaign.player(*player).name, kind)
        }
        Some(GameOutcome::Defeat { player }) => {
            println!("{} has fallen", campaign.player(*player).name)
        }
        Some(GameOutcome::RoundLimit { round }) => println!("No victor after round {}", round),
        None => {}
    }

    if args.dump_json {
        match campaign.snapshot().to_json() {
            Ok(json) => println!("{json}"),
            Err(e) => {
                error!("Failed to serialize the board: {}", e);
                return ExitCode::FAILURE;
            }
        }
    }

    ExitCode::SUCCESS
}
