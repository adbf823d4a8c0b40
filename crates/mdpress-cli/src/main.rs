use anyhow::Result;
use mdpress_config::SiteConfig;
use std::path::PathBuf;
use std::{env, process};

mod site;

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args: Vec<String> = env::args().collect();

    match args.get(1).map(String::as_str) {
        Some("render") => render_command(&args),
        Some("check") => check_command(&args),
        _ => {
            print_usage(&args[0]);
            process::exit(1);
        }
    }
}

fn render_command(args: &[String]) -> Result<()> {
    let mut file = None;
    let mut config_path = None;

    let mut rest = args.iter().skip(2);
    while let Some(arg) = rest.next() {
        match arg.as_str() {
            "--config" => match rest.next() {
                Some(path) => config_path = Some(PathBuf::from(path)),
                None => {
                    eprintln!("Error: --config requires a path");
                    process::exit(1);
                }
            },
            _ if file.is_none() && !arg.starts_with('-') => file = Some(PathBuf::from(arg)),
            _ => {
                print_usage(&args[0]);
                process::exit(1);
            }
        }
    }

    let Some(file) = file else {
        eprintln!("Usage: {} render <file.md> [--config <path>]", args[0]);
        process::exit(1);
    };

    let config = load_config(config_path)?;
    if config.is_none() {
        log::debug!("no site config found, rendering with built-in defaults");
    }

    let (renderer, options) = site::page_renderer(config.as_ref());
    let html = site::render_page(&file, &renderer, &options)?;
    print!("{html}");

    Ok(())
}

fn check_command(args: &[String]) -> Result<()> {
    let mut config_path = None;

    let mut rest = args.iter().skip(2);
    while let Some(arg) = rest.next() {
        match arg.as_str() {
            "--config" => match rest.next() {
                Some(path) => config_path = Some(PathBuf::from(path)),
                None => {
                    eprintln!("Error: --config requires a path");
                    process::exit(1);
                }
            },
            _ => {
                print_usage(&args[0]);
                process::exit(1);
            }
        }
    }

    let path = config_path.unwrap_or_else(SiteConfig::default_path);
    let config = match SiteConfig::load_from_path(&path)? {
        Some(config) => config,
        None => {
            eprintln!("Error: no site config found at {}", path.display());
            process::exit(1);
        }
    };

    log::debug!("checking docs tree at {}", config.docs_path.display());
    let report = site::check_site(&config)?;

    for missing in &report.missing {
        println!("missing: {} -> {}", missing.link, missing.page);
    }
    for orphan in &report.orphans {
        println!("orphan: {orphan}");
    }

    if !report.is_clean() {
        eprintln!(
            "Error: {} link(s) point at pages missing from {}",
            report.missing.len(),
            config.docs_path.display()
        );
        process::exit(1);
    }

    println!(
        "ok: {} page(s) checked, {} orphan(s)",
        report.pages,
        report.orphans.len()
    );

    Ok(())
}

/// Load the site config. An explicitly named file must exist; the default
/// location is optional.
fn load_config(explicit: Option<PathBuf>) -> Result<Option<SiteConfig>> {
    match explicit {
        Some(path) => match SiteConfig::load_from_path(&path)? {
            Some(config) => Ok(Some(config)),
            None => {
                eprintln!("Error: config file not found: {}", path.display());
                process::exit(1);
            }
        },
        None => Ok(SiteConfig::load()?),
    }
}

fn print_usage(program: &str) {
    eprintln!("Usage: {program} <command>");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  render <file.md> [--config <path>]   Render one page to HTML on stdout");
    eprintln!("  check [--config <path>]              Validate nav and sidebar links against the docs tree");
}
