//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::csv_report_adapter::CsvReportAdapter;
use crate::adapters::recording_order_client::RecordingOrderClient;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::config_validation::{
    build_machine_config, build_session_config, resolve_session_config, validate_machine_config,
    validate_session_config, SessionConfig,
};
use crate::domain::error::VatraderError;
use crate::domain::machine::MachineConfig;
use crate::domain::session::{Session, SessionSummary};
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "vatrader", about = "Value-area trading state machine")]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Replay a session script through the machine
    Replay {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        code: Option<String>,
        #[arg(long)]
        data_dir: Option<PathBuf>,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// List codes that have value-area levels
    ListSymbols {
        #[arg(long, default_value = ".")]
        data_dir: PathBuf,
    },
    /// Print the value-area levels of a code
    Levels {
        #[arg(long)]
        code: String,
        #[arg(long, default_value = ".")]
        data_dir: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Replay {
            config,
            code,
            data_dir,
            output,
        } => run_replay(&config, code.as_deref(), data_dir, output),
        Command::Validate { config } => run_validate(&config),
        Command::ListSymbols { data_dir } => run_list_symbols(data_dir),
        Command::Levels { code, data_dir } => run_levels(&code, data_dir),
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        eprintln!("error: {e}");
        ExitCode::from(&e)
    })
}

fn run_replay(
    config_path: &Path,
    code_override: Option<&str>,
    data_dir_override: Option<PathBuf>,
    output_override: Option<PathBuf>,
) -> ExitCode {
    eprintln!("Loading config from {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let machine_config = match build_machine_config(&adapter) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let mut session_config = match resolve_session_config(&adapter, code_override) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };
    if let Some(dir) = data_dir_override {
        session_config.data_dir = dir;
    }
    if output_override.is_some() {
        session_config.output = output_override;
    }

    let data_port = CsvAdapter::new(session_config.data_dir.clone());
    run_replay_pipeline(&data_port, &CsvReportAdapter, &machine_config, &session_config)
}

pub fn run_replay_pipeline(
    data_port: &dyn DataPort,
    report_port: &dyn ReportPort,
    machine_config: &MachineConfig,
    session_config: &SessionConfig,
) -> ExitCode {
    let code = &session_config.code;

    let levels = match data_port.fetch_levels(code) {
        Ok(l) if l.is_empty() => {
            let err = VatraderError::NoData { code: code.clone() };
            eprintln!("error: {err}");
            return (&err).into();
        }
        Ok(l) => l,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    let events = match data_port.fetch_session(
        code,
        session_config.start_date,
        session_config.end_date,
    ) {
        Ok(ev) => ev,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    if events.is_empty() {
        let err = VatraderError::NoData { code: code.clone() };
        eprintln!("error: {err}");
        return (&err).into();
    }

    eprintln!(
        "Replaying {}: {} events, {} value-area days, boundary {}",
        code,
        events.len(),
        levels.len(),
        machine_config.boundary
    );

    let mut session = Session::new(levels, *machine_config, RecordingOrderClient::new());
    let result = session.run(&events);

    let output = session_config
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(format!("{}_log.csv", code)));
    if let Err(e) = report_port.write(code, session.records(), &output) {
        eprintln!("error: {e}");
        return (&e).into();
    }
    eprintln!("Session log written to: {}", output.display());

    match result {
        Ok(summary) => {
            print_summary(code, &summary, &session);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!(
                "error: session stopped after {} events: {e}",
                session.records().len()
            );
            (&e).into()
        }
    }
}

fn print_summary(
    code: &str,
    summary: &SessionSummary,
    session: &Session<RecordingOrderClient>,
) {
    eprintln!("\n=== Session Summary: {} ===", code);
    eprintln!("Events:       {}", summary.events);
    eprintln!("Transitions:  {}", summary.transitions);
    eprintln!("Entries:      {}", summary.entries);
    eprintln!("Fills:        {}", summary.fills);
    eprintln!("Flattens:     {}", summary.flattens);
    eprintln!("Intents:      {}", summary.intents);
    eprintln!("Final state:  {}", session.state());
}

fn run_validate(config_path: &Path) -> ExitCode {
    eprintln!("Validating config: {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    for section in adapter.sections() {
        if !matches!(section.as_str(), "machine" | "session" | "default") {
            tracing::warn!(%section, "unknown config section");
        }
    }

    if let Err(e) = validate_machine_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }
    if let Err(e) = validate_session_config(&adapter) {
        eprintln!("error: {e}");
        return (&e).into();
    }

    // both validated above
    let (Ok(machine), Ok(session)) = (
        build_machine_config(&adapter),
        build_session_config(&adapter),
    ) else {
        return ExitCode::from(2);
    };

    eprintln!("\nMachine:");
    eprintln!("  boundary:               {}", machine.boundary);
    eprintln!("  requote_on_hold_cancel: {}", machine.requote_on_hold_cancel);
    eprintln!("\nSession:");
    eprintln!("  code:     {}", session.code);
    eprintln!("  data_dir: {}", session.data_dir.display());
    if let Some(d) = session.start_date {
        eprintln!("  start:    {}", d);
    }
    if let Some(d) = session.end_date {
        eprintln!("  end:      {}", d);
    }

    eprintln!("\nConfiguration is valid.");
    ExitCode::SUCCESS
}

fn run_list_symbols(data_dir: PathBuf) -> ExitCode {
    let adapter = CsvAdapter::new(data_dir);
    let symbols = match adapter.list_symbols() {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    if symbols.is_empty() {
        eprintln!("No symbols found");
    } else {
        for symbol in &symbols {
            println!("{}", symbol);
        }
        eprintln!("{} symbols found", symbols.len());
    }
    ExitCode::SUCCESS
}

fn run_levels(code: &str, data_dir: PathBuf) -> ExitCode {
    let adapter = CsvAdapter::new(data_dir);
    let code = code.to_uppercase();
    let table = match adapter.fetch_levels(&code) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("error: {e}");
            return (&e).into();
        }
    };

    for (date, va) in table.iter() {
        if va.is_defined() {
            println!("{}  VAL {:>10}  VAH {:>10}  width {}", date, va.val, va.vah, va.width());
        } else {
            println!("{}  undefined", date);
        }
    }
    match table.date_range() {
        Some((first, last)) => eprintln!("{}: {} days, {} to {}", code, table.len(), first, last),
        None => eprintln!("{}: no levels", code),
    }
    ExitCode::SUCCESS
}
