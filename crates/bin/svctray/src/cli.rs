//! Command-line arguments.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use svctray_domain::quick_config::{GeneralConfig, ServerRole};
use svctray_domain::service_state::{ServiceAction, ServiceState};

#[derive(Debug, Parser)]
#[command(name = "svctray")]
#[command(about = "Service tray helper: localized status text, translation checks and a simulated service", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Config file [default: ./svctray.toml].
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding the `.ts` files.
    #[arg(long, global = true)]
    pub translations: Option<PathBuf>,

    /// Preferred locales, most preferred first (`zh_CN,en_US`).
    #[arg(long, global = true)]
    pub locale: Option<String>,

    /// Print JSON instead of text.
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the label of every service state.
    Labels {
        /// One listing per loaded locale instead of the preferred one.
        #[arg(long)]
        all: bool,
    },
    /// Render the status menu and Quick Config buttons for a state.
    Render {
        #[arg(long, value_enum, default_value_t = StateArg::Running)]
        state: StateArg,
    },
    /// Cross-check the translation tables; fails when any is incomplete.
    Audit,
    /// Rewrite every `.ts` file in lupdate layout.
    Normalize {
        /// Only report files that would change; fails if any would.
        #[arg(long)]
        check: bool,
    },
    /// Drive a simulated service through start, reconfigure, restart, stop.
    Simulate {
        #[command(flatten)]
        quick_config: QuickConfigArgs,

        /// Make the first occurrence of this action fail.
        #[arg(long, value_enum)]
        fail: Option<ActionArg>,

        /// Begin with an installation that needs migrating.
        #[arg(long)]
        needs_upgrade: bool,
    },
}

/// General page fields used when starting the service.
#[derive(Debug, Clone, clap::Args)]
pub struct QuickConfigArgs {
    #[arg(long, value_enum, default_value_t = RoleArg::All)]
    pub role: RoleArg,

    #[arg(long)]
    pub server_url: Option<String>,

    #[arg(long)]
    pub token: Option<String>,

    #[arg(long)]
    pub port: Option<u16>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StateArg {
    Unknown,
    Stopped,
    Starting,
    Running,
    Stopping,
    Restarting,
    ToRestart,
    ToUpgrade,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ActionArg {
    Start,
    Stop,
    Restart,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RoleArg {
    All,
    Worker,
    ServerOnly,
}

impl From<StateArg> for ServiceState {
    fn from(arg: StateArg) -> Self {
        match arg {
            StateArg::Unknown => Self::Unknown,
            StateArg::Stopped => Self::Stopped,
            StateArg::Starting => Self::Starting,
            StateArg::Running => Self::Running,
            StateArg::Stopping => Self::Stopping,
            StateArg::Restarting => Self::Restarting,
            StateArg::ToRestart => Self::ToRestart,
            StateArg::ToUpgrade => Self::ToUpgrade,
        }
    }
}

impl From<ActionArg> for ServiceAction {
    fn from(arg: ActionArg) -> Self {
        match arg {
            ActionArg::Start => Self::Start,
            ActionArg::Stop => Self::Stop,
            ActionArg::Restart => Self::Restart,
        }
    }
}

impl From<RoleArg> for ServerRole {
    fn from(arg: RoleArg) -> Self {
        match arg {
            RoleArg::All => Self::All,
            RoleArg::Worker => Self::Worker,
            RoleArg::ServerOnly => Self::ServerOnly,
        }
    }
}

impl From<QuickConfigArgs> for GeneralConfig {
    fn from(args: QuickConfigArgs) -> Self {
        Self {
            role: args.role.into(),
            server_url: args.server_url,
            token: args.token,
            port: args.port,
            ..Self::default()
        }
        .normalized()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn should_have_consistent_arguments() {
        Cli::command().debug_assert();
    }

    #[test]
    fn should_parse_render_with_kebab_case_state() {
        let cli = Cli::try_parse_from(["svctray", "render", "--state", "to-restart"]).unwrap();
        let Command::Render { state } = cli.command else {
            panic!("expected render");
        };
        assert_eq!(ServiceState::from(state), ServiceState::ToRestart);
    }

    #[test]
    fn should_accept_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["svctray", "labels", "--locale", "zh_CN", "--json"]).unwrap();
        assert!(cli.json);
        assert_eq!(cli.locale.as_deref(), Some("zh_CN"));
    }

    #[test]
    fn should_build_worker_config_from_simulate_flags() {
        let cli = Cli::try_parse_from([
            "svctray",
            "simulate",
            "--role",
            "worker",
            "--server-url",
            "http://10.0.0.1",
            "--fail",
            "restart",
        ])
        .unwrap();
        let Command::Simulate {
            quick_config, fail, ..
        } = cli.command
        else {
            panic!("expected simulate");
        };
        assert_eq!(fail, Some(ActionArg::Restart));
        let config = GeneralConfig::from(quick_config);
        assert_eq!(config.role, ServerRole::Worker);
        assert!(config.token.is_none());
    }

    #[test]
    fn should_drop_server_url_for_non_worker() {
        let args = QuickConfigArgs {
            role: RoleArg::All,
            server_url: Some("http://10.0.0.1".to_string()),
            token: None,
            port: None,
        };
        assert!(GeneralConfig::from(args).server_url.is_none());
    }
}
