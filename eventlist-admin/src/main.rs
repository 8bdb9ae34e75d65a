mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Env;
use eventlist_config::{
    ConfigPath, Environment, EventListSettings, FileStore, HashNavigator,
    Panel, RenderPlan, SettingsApp, default_config_path, index_of,
};
use serde_json::Value;

use crate::cli::{Cli, Command};

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let cli = Cli::parse();
    let path = cli.config.clone().unwrap_or_else(default_config_path);
    let environment =
        Environment::detect(&cli.page_location(), cli.socket_url.as_deref());

    let mut app = EventListSettings::new(
        environment,
        FileStore::new(&path),
        HashNavigator::from_hash(&cli.hash),
        || log::trace!("render requested"),
    );
    app.load()
        .with_context(|| format!("failed to load {}", path.display()))?;

    match cli.command {
        Command::Show => {
            println!("{}", describe(&app.render()));
            let draft = serde_json::to_string_pretty(app.controller().draft())?;
            println!("{draft}");
        },
        Command::Set { path: attr, value } => {
            let attr_path = ConfigPath::parse(&attr)
                .with_context(|| format!("invalid attribute path {attr:?}"))?;
            app.on_change(&attr_path, parse_value(&value));
            app.save().context("save rejected")?;
            log::info!("saved {attr} to {}", path.display());
        },
        Command::Normalize => {
            app.save().context("save rejected")?;
            let saved = serde_json::to_string_pretty(app.controller().saved())?;
            println!("{saved}");
        },
        Command::Tab { id } => {
            app.navigate(&id);
            match index_of(Some(id.as_str())) {
                Some(index) => println!("{id}: tab {index}"),
                None => println!("{id}: no tab selected"),
            }
        },
    }

    Ok(())
}

fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw)
        .unwrap_or_else(|_| Value::String(raw.to_string()))
}

fn describe(plan: &RenderPlan<'_>) -> String {
    match plan {
        RenderPlan::Loading => String::from("loading"),
        RenderPlan::LoadFailed { message } => {
            format!("load failed: {message}")
        },
        RenderPlan::EventListOnly { list, .. } => {
            format!("tab mode: event list (images from {})", list.image_prefix)
        },
        RenderPlan::Tabs(view) => {
            let panel = match &view.panel {
                Some(Panel::Options { .. }) => "options",
                Some(Panel::List(_)) => "list",
                Some(Panel::Pdf { .. }) => "pdf",
                None => "none",
            };
            let state = if view.changed { "unsaved" } else { "saved" };
            format!("editor: panel {panel}, {state}")
        },
    }
}
