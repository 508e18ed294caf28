//! Browser Harness CLI
//!
//! Loads a harness config, runs the bootstrap against local collaborators and
//! prints the resulting run plan.

use std::path::PathBuf;
use std::sync::Arc;

use browser_harness::{
    Bootstrap, CommandTransformer, HarnessConfig, LauncherRegistry, LocalFileReader,
    PassthroughTransformer, PlanRunner, SourceTransformer, StaticServer, Validate,
};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        let program = args.first().map(String::as_str).unwrap_or("browser-harness");
        eprintln!("Usage: {} <config.toml|config.yaml>", program);
        eprintln!("\nAssembles a browser test run and prints its plan.");
        eprintln!("\nEnvironment variables:");
        eprintln!("  HARNESS_HOME=<dir>           Base path for helper scripts (default: cwd)");
        eprintln!("  HARNESS_TRANSFORM_CMD=<cmd>  Transpiler reading stdin (default: passthrough)");
        std::process::exit(1);
    }

    if let Err(e) = run(&args[1]) {
        eprintln!("Harness failed: {}", e);
        std::process::exit(1);
    }
}

fn run(config_path: &str) -> browser_harness::Result<()> {
    let config = HarnessConfig::load(config_path)?;
    for warning in config.validate().into_result()? {
        tracing::warn!(warning = %warning, "config warning");
    }

    let base_path = match std::env::var("HARNESS_HOME") {
        Ok(home) => PathBuf::from(home),
        Err(_) => std::env::current_dir()?,
    };

    let transformer: Box<dyn SourceTransformer> = match std::env::var("HARNESS_TRANSFORM_CMD") {
        Ok(command) => {
            tracing::info!(command = %command, "using command transformer");
            Box::new(CommandTransformer::from_command_line(&command)?)
        }
        Err(_) => Box::new(PassthroughTransformer),
    };

    let server = Arc::new(StaticServer::new());
    let mut bootstrap = Bootstrap::new(
        LocalFileReader::new(),
        transformer,
        PlanRunner::new(),
        server.clone(),
        LauncherRegistry::with_defaults(),
        config,
        base_path,
    );

    bootstrap.run()?;

    println!("\n{}", "=".repeat(60));
    println!("Harness Plan");
    println!("{}", "=".repeat(60));
    println!();
    println!("Target: {}", bootstrap.config().target);
    println!("Scripts: {}", server.settings().scripts.len());
    println!("Page size: {} bytes", server.render_page()?.len());
    println!();

    if let Some(plan) = bootstrap.runner().plan() {
        if let Some(url) = &plan.server_url {
            println!("Harness URL: {}", url);
        }
        println!("Browsers:");
        for launcher in &plan.launchers {
            println!("  {} -> {}", launcher.browser, launcher.url);
        }
        println!("Reporters: {}", plan.reporters);
    }

    Ok(())
}
