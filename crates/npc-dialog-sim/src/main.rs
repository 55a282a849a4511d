//! Dialog simulator
//!
//! Spawns a player and a trader NPC in an in-memory world, pairs a shop
//! dialog with the trader and replays a scripted client session:
//! 1. the player interacts with the trader
//! 2. the client reports the dialog opened
//! 3. button presses, a bogus button index and a stale scene
//!
//! Every packet the server would send is logged together with the button
//! list a client would render from it.
//!
//! Env:
//! - `RUST_LOG` - log filter (default `npc_dialog=debug,npc_dialog_sim=info`)
//! - `NPC_DIALOG_CLOSE_ON_SUBMIT`, `NPC_DIALOG_CLOSE_UNKNOWN_FORMS` - see `DialogConfig`

mod host;

use crossbeam_channel::Receiver;
use npc_dialog::prelude::*;
use npc_dialog::{ActionRecord, DialogueAction};
use tracing::{info, warn};

use crate::host::{OutgoingDialogue, SimWorld};

const SHOP: &str = "trader-shop";

/// One client-side step of the script
enum Step {
    Interact,
    Request(NpcRequestType, u32, &'static str),
}

fn main() -> eyre::Result<()> {
    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("npc_dialog=debug".parse()?)
                .add_directive("npc_dialog_sim=info".parse()?),
        )
        .init();

    let config = DialogConfig::from_env();
    info!(?config, "starting dialog simulation");

    let (egress_tx, egress_rx) = crossbeam_channel::unbounded();
    let mut world = SimWorld::new(egress_tx);
    let steve = world.spawn_player("Steve");
    let trader = world.spawn_npc("Trader");

    let registry = DialogRegistry::new();
    registry.register(shop_form(&config), false)?;
    registry.pair_with_entity(SHOP, world.get(trader)?, "Trade", &world)?;
    info!(
        trader,
        has_npc_component = world.get(trader)?.has_npc_component(),
        "trader ready"
    );

    let listener = PacketListener::with_config(registry.clone(), config);
    let script = [
        Step::Interact,
        Step::Request(NpcRequestType::ExecuteOpeningCommands, 0, SHOP),
        Step::Request(NpcRequestType::ExecuteAction, 0, SHOP),
        Step::Request(NpcRequestType::ExecuteAction, 2, SHOP),
        Step::Request(NpcRequestType::ExecuteClosingCommands, 0, SHOP),
        Step::Interact,
        Step::Request(NpcRequestType::ExecuteAction, 9, SHOP),
        Step::Request(NpcRequestType::ExecuteAction, 0, "retired-quest"),
    ];

    for (n, step) in script.iter().enumerate() {
        let player = world.get(steve)?;
        let outcome = match step {
            Step::Interact => {
                info!(step = n, "player interacts with trader");
                let event = PlayerEntityInteractEvent {
                    player,
                    entity: world.get(trader)?,
                };
                listener.on_player_entity_interact(event, &world)
            }
            Step::Request(kind, index, scene) => {
                info!(step = n, ?kind, index, scene, "client request");
                let packet = NpcRequestPacket::new(trader, *kind, *index, *scene);
                listener.on_npc_request(player, &packet, &world)
            }
        };
        if let Err(e) = outcome {
            warn!(step = n, "request rejected: {e}");
        }
        drain_egress(&egress_rx)?;
    }

    info!(forms = registry.len(), "simulation finished");
    registry.clear();
    Ok(())
}

fn shop_form(config: &DialogConfig) -> DialogForm {
    let mut form = DialogForm::with_id(
        "Fresh bread, sturdy tools. What do you need?",
        SHOP,
    );
    form.set_close_on_submit(config.close_on_submit)
        .set_open_listener(|player| info!(player = %player.name(), "shop opened"))
        .set_close_listener(|player| info!(player = %player.name(), "shop closed"))
        .add_button_with_listener("Buy bread", "/give @s bread", |player| {
            info!(player = %player.name(), "sold one bread");
            false
        })
        .add_button("Browse tools", "/function shop:tools")
        .add_button_with_listener("Leave", "", |player| {
            info!(player = %player.name(), "customer left");
            true
        });
    form
}

fn drain_egress(egress_rx: &Receiver<OutgoingDialogue>) -> eyre::Result<()> {
    while let Ok(OutgoingDialogue {
        connection_id,
        packet,
    }) = egress_rx.try_recv()
    {
        match packet.action {
            DialogueAction::Open => {
                let buttons: Vec<ActionRecord> = serde_json::from_str(&packet.action_json)?;
                info!(
                    connection_id,
                    entity = packet.actor_runtime_id,
                    title = %packet.npc_name,
                    scene = %packet.scene_name,
                    text = %packet.dialogue,
                    "-> open dialog"
                );
                for (index, button) in buttons.iter().enumerate() {
                    info!(index, name = %button.button_name, command = %button.text, "   button");
                }
            }
            DialogueAction::Close => {
                info!(connection_id, entity = packet.actor_runtime_id, "-> close dialog");
            }
        }
    }
    Ok(())
}
