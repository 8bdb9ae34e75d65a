use std::path::PathBuf;

use clap::{Parser, Subcommand};
use eventlist_config::PageLocation;

/// Headless settings editor for the event list adapter.
#[derive(Parser, Debug)]
#[command(name = "eventlist-admin")]
#[command(version, about, long_about = None)]
pub(crate) struct Cli {
    /// Settings file (defaults to ~/.config/eventlist/config.json)
    #[arg(short, long, value_name = "PATH")]
    pub(crate) config: Option<PathBuf>,

    /// Path of the page hosting the editor
    #[arg(long, default_value = "/adapter/eventlist/index_m.html")]
    pub(crate) page_path: String,

    /// Port of the page hosting the editor
    #[arg(long, default_value = "8081")]
    pub(crate) port: String,

    /// Host name of the page hosting the editor
    #[arg(long, default_value = "localhost")]
    pub(crate) host: String,

    /// Scheme of the page hosting the editor, with trailing colon
    #[arg(long, default_value = "http:")]
    pub(crate) protocol: String,

    /// Socket URL injected by the web adapter (`:port` resolves against the
    /// page)
    #[arg(long)]
    pub(crate) socket_url: Option<String>,

    /// Initial navigation hash, e.g. `#pdf`
    #[arg(long, default_value = "")]
    pub(crate) hash: String,

    #[command(subcommand)]
    pub(crate) command: Command,
}

impl Cli {
    pub(crate) fn page_location(&self) -> PageLocation {
        PageLocation {
            protocol: self.protocol.clone(),
            hostname: self.host.clone(),
            port: self.port.clone(),
            pathname: self.page_path.clone(),
        }
    }
}

#[derive(Subcommand, Debug)]
pub(crate) enum Command {
    /// Print the settings and what the editor would render
    Show,
    /// Set a value at a dotted path, then save
    Set {
        /// Dotted attribute path, e.g. `pdfSettings.headerColor`
        path: String,
        /// JSON value; anything that is not valid JSON is stored as text
        value: String,
    },
    /// Normalize colors and save
    Normalize,
    /// Switch to a tab and print its tab bar index
    Tab {
        /// Tab identifier: options, list or pdf
        id: String,
    },
}
