// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod commands;
mod config;
mod logging;
mod runtime;

use anyhow::{Context, Result, anyhow, bail};
use commands::PromptGate;
use config::Config;
use runtime::DbRuntime;
use salonadmin_app::{AppState, ConfirmGate, PresetAnswer, TenantStore};
use salonadmin_db::Store;
use salonadmin_testkit::TenantFaker;
use salonadmin_tui::{DashboardExit, DashboardOptions};
use std::env;
use std::io;
use std::path::PathBuf;
use tracing::info;

const DEMO_SEED: u64 = 42;
const DEMO_TENANTS: usize = 24;

fn main() {
    if let Err(error) = run() {
        eprintln!("{error:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let options = parse_cli_args(env::args().skip(1), Config::default_path()?)?;
    if options.show_help {
        print_help();
        return Ok(());
    }

    if options.print_config_path {
        println!("{}", options.config_path.display());
        return Ok(());
    }

    if options.print_example {
        print!("{}", Config::example_config(&options.config_path));
        return Ok(());
    }

    let config = Config::load(&options.config_path).with_context(|| {
        format!(
            "load config {}; run `salonadmin --print-example-config` to generate a v1 template",
            options.config_path.display()
        )
    })?;

    let db_path = if options.demo {
        PathBuf::from(":memory:")
    } else {
        config.db_path()?
    };
    if options.print_db_path {
        println!("{}", db_path.display());
        return Ok(());
    }

    let log_path = logging::init(&config)?;

    let mut store = Store::open(&db_path).with_context(|| {
        format!(
            "open database {} -- if this path is wrong, set [storage].db_path or SALONADMIN_DB_PATH",
            db_path.display()
        )
    })?;
    store.bootstrap()?;
    if options.demo {
        store
            .save_tenants(&TenantFaker::new(DEMO_SEED).tenants(DEMO_TENANTS))
            .context("seed demo tenants")?;
    }
    info!(db = %db_path.display(), log = %log_path.display(), "salonadmin started");

    let status_timeout = config.status_timeout()?;
    if options.check_only {
        return Ok(());
    }

    let mut stdout = io::stdout();
    match &options.command {
        Some(Command::List) => commands::list(&store, options.search.as_deref(), &mut stdout),
        Some(Command::Delete(email)) => {
            let mut gate = confirm_gate(options.assume_yes);
            commands::delete(&mut store, gate.as_mut(), email, &mut stdout)
        }
        Some(Command::Impersonate(email)) => {
            let mut gate = confirm_gate(options.assume_yes);
            commands::impersonate(&mut store, gate.as_mut(), email, &mut stdout)
        }
        Some(Command::Whoami) => commands::whoami(&store, &mut stdout),
        Some(Command::Logout) => commands::logout(&mut store, &mut stdout),
        None => {
            let dashboard = DashboardOptions {
                status_timeout,
                initial_search: options.search.clone().unwrap_or_default(),
            };
            let mut state = AppState::default();
            let exit = {
                let mut runtime = DbRuntime::new(&mut store);
                salonadmin_tui::run_app(&mut state, &mut runtime, dashboard)?
            };
            match exit {
                DashboardExit::Quit => Ok(()),
                DashboardExit::LoggedOut => {
                    println!("signed out");
                    Ok(())
                }
                DashboardExit::SessionChanged(_) => commands::report_session(&store, &mut stdout),
            }
        }
    }
}

fn confirm_gate(assume_yes: bool) -> Box<dyn ConfirmGate> {
    if assume_yes {
        Box::new(PresetAnswer(true))
    } else {
        Box::new(PromptGate::new(io::stdin().lock(), io::stdout()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    List,
    Delete(String),
    Impersonate(String),
    Whoami,
    Logout,
}

impl Command {
    fn flag(&self) -> &'static str {
        match self {
            Self::List => "--list",
            Self::Delete(_) => "--delete",
            Self::Impersonate(_) => "--impersonate",
            Self::Whoami => "--whoami",
            Self::Logout => "--logout",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    config_path: PathBuf,
    command: Option<Command>,
    search: Option<String>,
    assume_yes: bool,
    print_config_path: bool,
    print_db_path: bool,
    demo: bool,
    print_example: bool,
    check_only: bool,
    show_help: bool,
}

fn parse_cli_args<I, S>(args: I, default_config_path: PathBuf) -> Result<CliOptions>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut options = CliOptions {
        config_path: default_config_path,
        command: None,
        search: None,
        assume_yes: false,
        print_config_path: false,
        print_db_path: false,
        demo: false,
        print_example: false,
        check_only: false,
        show_help: false,
    };

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        let command = match arg.as_ref() {
            "--config" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--config requires a file path"))?;
                options.config_path = PathBuf::from(value.as_ref());
                None
            }
            "--search" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--search requires the text to filter by"))?;
                options.search = Some(value.as_ref().to_owned());
                None
            }
            "--list" => Some(Command::List),
            "--delete" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--delete requires a tenant email"))?;
                Some(Command::Delete(value.as_ref().to_owned()))
            }
            "--impersonate" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--impersonate requires a tenant email"))?;
                Some(Command::Impersonate(value.as_ref().to_owned()))
            }
            "--whoami" => Some(Command::Whoami),
            "--logout" => Some(Command::Logout),
            "--yes" | "-y" => {
                options.assume_yes = true;
                None
            }
            "--print-config-path" => {
                options.print_config_path = true;
                None
            }
            "--print-path" => {
                options.print_db_path = true;
                None
            }
            "--print-example-config" => {
                options.print_example = true;
                None
            }
            "--demo" => {
                options.demo = true;
                None
            }
            "--check" => {
                options.check_only = true;
                None
            }
            "--help" | "-h" => {
                options.show_help = true;
                None
            }
            unknown => {
                bail!("unknown argument {unknown:?}; run with --help to see supported options");
            }
        };

        if let Some(command) = command {
            if let Some(previous) = &options.command {
                bail!(
                    "{} and {} cannot be combined; run one command at a time",
                    previous.flag(),
                    command.flag()
                );
            }
            options.command = Some(command);
        }
    }

    Ok(options)
}

fn print_help() {
    println!("salonadmin: super-admin console for salon tenants");
    println!("  (no command)             Open the interactive dashboard");
    println!("  --list                   Print tenants and dashboard metrics");
    println!("  --search <text>          Filter --list output or prefill the dashboard search");
    println!("  --delete <email>         Delete every tenant with this email");
    println!("  --impersonate <email>    Write a session for this tenant");
    println!("  --yes, -y                Skip the confirmation prompt");
    println!("  --whoami                 Print the current session");
    println!("  --logout                 Clear the current session");
    println!("  --config <path>          Use a specific config path");
    println!("  --print-config-path      Print resolved config path");
    println!("  --print-path             Print resolved database path");
    println!("  --print-example-config   Print a v1 config template");
    println!("  --demo                   Launch with seeded demo tenants (in-memory)");
    println!("  --check                  Validate config, logging, and database, then exit");
    println!("  --help                   Show this help");
}
