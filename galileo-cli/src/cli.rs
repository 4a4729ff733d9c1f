use std::path::{Path, PathBuf};

use clap::{value_parser, Arg, ArgAction, ArgMatches, ColorChoice, Command};
use galileo_relevance::prelude::{Capabilities, SessionConfig};

pub struct Cli {
    /// Arguments passed by user
    pub matches: ArgMatches,
}

impl Default for Cli {
    fn default() -> Self {
        Self::new()
    }
}

impl Cli {
    /// Build new command line interface
    pub fn new() -> Self {
        Self {
            matches: Self::command().get_matches(),
        }
    }

    fn command() -> Command {
        Command::new("galileo-cli")
            .author("Guillaume W. Bres <guillaume.bressaix@gmail.com>")
            .version(env!("CARGO_PKG_VERSION"))
            .about("Galileo availability from recorded satellite status")
            .long_about("galileo-cli replays recorded GNSS satellite status snapshots
and determines whether this device tracks Galileo vehicles,
on one or two frequencies. The decision is persisted and
never computed twice, unless --reset is used.")
            .arg_required_else_help(true)
            .color(ColorChoice::Always)
            .next_help_heading("Input")
            .arg(Arg::new("snapshots")
                .short('s')
                .long("snapshots")
                .value_name("FILE")
                .value_parser(value_parser!(PathBuf))
                .required(true)
                .help("Recorded snapshots. See --help for more information.")
                .long_help("JSON array of snapshots, each snapshot being an array of reports.
Example of a single snapshot with one Galileo E1 vehicle:
[
    [
        { \"svid\": 11, \"constellation_raw\": 6, \"cn0_dbhz\": 31.5,
          \"flags\": \"ALMANAC | CARRIER_FREQUENCY\",
          \"carrier_frequency_hz\": 1575420000.0 }
    ]
]"))
            .next_help_heading("Session (custom preferences)")
            .arg(Arg::new("store")
                .long("store")
                .value_name("FILE")
                .value_parser(value_parser!(PathBuf))
                .default_value("galileo_prefs.json")
                .help("Decision store location"))
            .arg(Arg::new("cfg")
                .short('c')
                .long("cfg")
                .value_name("FILE")
                .help("Session configuration (JSON). Default preset is used otherwise."))
            .arg(Arg::new("reset")
                .long("reset")
                .action(ArgAction::SetTrue)
                .help("Forget any previous decision"))
            .arg(Arg::new("quiet")
                .short('q')
                .long("quiet")
                .action(ArgAction::SetTrue)
                .help("Do not print the notification"))
            .next_help_heading("Platform")
            .arg(Arg::new("no-satellite-status")
                .long("no-satellite-status")
                .action(ArgAction::SetTrue)
                .help("Simulate a platform that cannot report satellite status"))
            .arg(Arg::new("no-carrier-frequency")
                .long("no-carrier-frequency")
                .action(ArgAction::SetTrue)
                .help("Simulate a platform that does not report carrier frequencies"))
    }

    pub fn snapshots_path(&self) -> &Path {
        self.matches
            .get_one::<PathBuf>("snapshots")
            .expect("snapshots is a required argument")
    }

    pub fn store_path(&self) -> &Path {
        self.matches
            .get_one::<PathBuf>("store")
            .expect("store has a default value")
    }

    pub fn reset(&self) -> bool {
        self.matches.get_flag("reset")
    }

    pub fn quiet(&self) -> bool {
        self.matches.get_flag("quiet")
    }

    pub fn capabilities(&self) -> Capabilities {
        Capabilities {
            satellite_status: !self.matches.get_flag("no-satellite-status"),
            carrier_frequency: !self.matches.get_flag("no-carrier-frequency"),
        }
    }

    fn config_path(&self) -> Option<&String> {
        self.matches.get_one::<String>("cfg")
    }

    pub fn session_config(&self) -> SessionConfig {
        if let Some(path) = self.config_path() {
            if let Ok(content) = std::fs::read_to_string(path) {
                let cfg = serde_json::from_str::<SessionConfig>(&content);
                if let Ok(cfg) = cfg {
                    info!("session configuration \"{}\"", path);
                    cfg
                } else {
                    error!("failed to parse configuration \"{}\"", path);
                    info!("using default configuration");
                    SessionConfig::default()
                }
            } else {
                error!("failed to read configuration \"{}\"", path);
                info!("using default configuration");
                SessionConfig::default()
            }
        } else {
            SessionConfig::default()
        }
    }
}
