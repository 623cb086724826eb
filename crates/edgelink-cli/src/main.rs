//! edgelink CLI — user-facing binary for the edgelink virtual KVM.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "edgelink",
    about = "Share keyboard and mouse across machines",
    version,
    propagate_version = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the edgelink daemon.
    Start {
        /// Path to configuration file.
        #[arg(short, long)]
        config: Option<String>,
    },

    /// Stop the running daemon.
    Stop,

    /// Show daemon status and the active peer link.
    Status,

    /// Connect to a remote peer by address.
    Pair {
        /// Address of the remote peer (IP only, port comes from config).
        address: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Start { config } => {
            start_daemon(config.as_deref()).await?;
        }
        Commands::Stop => {
            stop_daemon()?;
        }
        Commands::Status => {
            // TODO: query the running daemon over an IPC channel once one exists.
            eprintln!("edgelink status requires a running daemon reached over IPC (not yet implemented)");
        }
        Commands::Pair { address } => {
            // TODO: same as Status — needs a channel into the running daemon's DaemonCommand loop.
            tracing::info!(%address, "pairing is only wired up for an in-process daemon right now");
            eprintln!("edgelink pair requires a running daemon reached over IPC (not yet implemented)");
        }
    }

    Ok(())
}

async fn start_daemon(config_path: Option<&str>) -> anyhow::Result<()> {
    use edgelink_daemon::daemon::{Daemon, DaemonCommand};
    use edgelink_daemon::setup;
    use edgelink_discovery::UdpDiscovery;
    use edgelink_input::linux::driver::LinuxInputDriver;
    use edgelink_types::{Screen, ScreenOwner};

    let config = setup::load_config(config_path)?;
    let config_dir = setup::config_dir();
    let peer_id = setup::load_or_create_peer_id(&config_dir)?;

    let pid_path = setup::pid_file_path();
    std::fs::write(&pid_path, std::process::id().to_string())?;
    tracing::info!(pid_file = %pid_path.display(), "wrote PID file");

    let local_screen = Screen {
        id: "local-0".to_string(),
        name: config.identity.name.clone(),
        origin_x: 0,
        origin_y: 0,
        width: config.daemon.screen_width,
        height: config.daemon.screen_height,
        is_primary: true,
        owner: ScreenOwner::Local,
    };
    let driver = LinuxInputDriver::new(vec![local_screen])?;
    let discovery: Box<dyn edgelink_discovery::Discovery> = Box::new(UdpDiscovery::new());

    let mut daemon = Daemon::new(config, peer_id, driver, discovery).await?;
    let command_tx = daemon.command_sender();

    let shutdown_tx = command_tx.clone();
    tokio::spawn(async move {
        let mut sigterm = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to register SIGTERM handler");
        let mut sigint = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::interrupt())
            .expect("failed to register SIGINT handler");

        tokio::select! {
            _ = sigterm.recv() => {
                tracing::info!("received SIGTERM");
            }
            _ = sigint.recv() => {
                tracing::info!("received SIGINT");
            }
        }

        let _ = shutdown_tx.send(DaemonCommand::Shutdown).await;
    });

    tracing::info!(%peer_id, "starting edgelink daemon");

    daemon.run().await?;

    let _ = std::fs::remove_file(&pid_path);
    tracing::info!("daemon stopped");

    Ok(())
}

fn stop_daemon() -> anyhow::Result<()> {
    use edgelink_daemon::setup;

    let pid_path = setup::pid_file_path();
    if !pid_path.exists() {
        anyhow::bail!("no PID file found — daemon may not be running");
    }

    let pid_str = std::fs::read_to_string(&pid_path)?;
    let pid: u32 = pid_str.trim().parse()?;

    tracing::info!(pid, "sending SIGTERM to daemon");

    let status = std::process::Command::new("kill")
        .args(["-s", "TERM", &pid.to_string()])
        .status()?;

    if !status.success() {
        anyhow::bail!("failed to send SIGTERM to PID {pid}");
    }

    println!("Sent stop signal to edgelink daemon (PID {pid})");
    Ok(())
}
