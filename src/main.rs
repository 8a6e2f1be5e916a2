use anyhow::Result;
use tracing::{error, info, warn};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::signal::ctrl_c;
use garage_door_accessory::init;
use garage_door_accessory::models::AccessoryEvent;

/// The main entry point of the garage door accessory
///
/// This function initializes the application and runs the console driver until a shutdown signal is received
#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Application error: {}", e);
        std::process::exit(1);
    }
}


/// The core logic of the console driver
///
/// 1. Loads settings, initializes logging and restores the persisted state
/// 2. Spawns the `EventHandler` that logs and persists surfaced characteristic changes
/// 3. Reads commands from stdin (`open`, `close`, `lock`, `unlock`, `sensor <identifier> <payload>`)
///    and routes them to the accessory until stdin closes or Ctrl-C is received
///
/// # Returns
///
/// * `Ok(())` if the application runs successfully and shuts down gracefully
/// * `Err(anyhow::Error)` if any errors occur during initialization
async fn run() -> Result<()> {
    let context = init::initialize().await?;
    let accessory = context.accessory;
    let _log_guard = context.log_guard;

    let event_handler_task = tokio::spawn(async move {
        if let Err(e) = context.event_handler.run().await {
            error!("EventHandler error: {:?}", e);
        }
    });

    info!("{} ready: {:?}", accessory.name(), accessory.state());
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                match line {
                    Ok(Some(line)) if line.trim().is_empty() => continue,
                    Ok(Some(line)) => match line.parse::<AccessoryEvent>() {
                        Ok(event) => {
                            if let Err(e) = accessory.handle_event(event).await {
                                error!("Failed to handle command {:?}: {}", line.trim(), e);
                            }
                        }
                        Err(e) => warn!("{}", e),
                    },
                    Ok(None) => {
                        info!("Input closed. Shutting down...");
                        break;
                    }
                    Err(e) => {
                        error!("Failed to read input: {}", e);
                        break;
                    }
                }
            }
            _ = ctrl_c() => {
                info!("Received shutdown signal. Shutting down gracefully...");
                break;
            }
        }
    }

    accessory.reset();
    drop(accessory);
    if let Err(e) = event_handler_task.await {
        error!("EventHandler task panicked: {:?}", e);
    }
    Ok(())
}
