//! Reenacts the scenario this crate exists for: a user hammering an
//! inventory equip/unequip toggle faster than the server round-trip.
//!
//! Run with `RUST_LOG=debug cargo run --example equip_toggle` and watch how
//! six clicks collapse into a single request carrying the final intent.

use std::time::Duration;

use the_coalesce::Perform;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
  Equip,
  Unequip,
}

#[derive(Debug, Clone, Copy)]
struct EquipCommand {
  item:   u64,
  action: Action,
}

struct InventoryApi;

impl Perform for InventoryApi {
  type Command = EquipCommand;
  type Outcome = anyhow::Result<Action>;

  async fn perform(&mut self, command: EquipCommand) -> Self::Outcome {
    // stand-in for the real REST mutation
    tokio::time::sleep(Duration::from_millis(200)).await;
    println!(
      "  server saw: {:?} item {}",
      command.action, command.item
    );
    Ok(command.action)
  }

  fn settled(&mut self, outcome: Self::Outcome) {
    // one toast per executed call, not one per click
    match outcome {
      Ok(Action::Equip) => println!("  toast: item equipped"),
      Ok(Action::Unequip) => println!("  toast: item unequipped"),
      Err(err) => println!("  toast: request failed: {err}"),
    }
  }
}

#[tokio::main]
async fn main() {
  env_logger::init();

  let toggle = InventoryApi.spawn();

  println!("clicking the toggle six times, 40ms apart...");
  for action in [
    Action::Equip,
    Action::Unequip,
    Action::Equip,
    Action::Unequip,
    Action::Equip,
    Action::Unequip,
  ] {
    toggle.submit(EquipCommand { item: 17, action });
    tokio::time::sleep(Duration::from_millis(40)).await;
  }

  // the control stays disabled until the dispatcher drains
  while toggle.is_pending() {
    tokio::time::sleep(Duration::from_millis(10)).await;
  }
  println!("quiescent; exactly one request went out");
}
