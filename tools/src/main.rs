//! projection-runner: headless runner for the marketing projection model.
//!
//! Usage:
//!   projection-runner --campaign data/campaigns/reference_campaign.json
//!   projection-runner --data-dir ./data --export run.json
//!   projection-runner --ipc-mode

use anyhow::Result;
use chrono::NaiveDate;
use projection_core::{
    campaign::CampaignSettings,
    command::SessionCommand,
    config::{self, ModelConfig},
    engine::ProjectionSession,
    record::CampaignRecord,
    snapshot::ProjectionSnapshot,
    types::{Metric, Revision},
};
use std::env;
use std::io::{self, BufRead, Write};

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcCommand {
    GetState,
    Command { command: SessionCommand },
    Export,
    Quit,
}

#[derive(serde::Serialize)]
struct UiState<'a> {
    revision: Revision,
    campaign: &'a str,
    snapshot: &'a ProjectionSnapshot,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");
    let data_dir = string_arg(&args, "--data-dir").unwrap_or("./data");
    let campaign = string_arg(&args, "--campaign");
    let export = string_arg(&args, "--export");

    let model_config = match ModelConfig::load(data_dir) {
        Ok(c) => c,
        Err(e) => {
            log::warn!("{e}; using built-in model config");
            ModelConfig::default()
        }
    };
    let settings = match campaign {
        Some(path) => config::load_campaign(path)?,
        None => CampaignSettings::reference_defaults(),
    };

    if !ipc_mode {
        println!("Marketing projection runner");
        println!("  campaign:  {}", campaign.unwrap_or("(reference defaults)"));
        println!("  data_dir:  {data_dir}");
        println!();
    }

    let mut session = ProjectionSession::new(settings, model_config)?;

    if ipc_mode {
        run_ipc_loop(&mut session)?;
    } else {
        print_summary(&session);
        if let Some(path) = export {
            std::fs::write(path, session.export_record().to_json()?)?;
            println!();
            println!("  record written to {path}");
        }
    }

    Ok(())
}

fn run_ipc_loop(session: &mut ProjectionSession) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }

        let cmd: IpcCommand = match serde_json::from_str(&buffer) {
            Ok(c) => c,
            Err(e) => {
                write_error(&mut stdout, &e.to_string())?;
                continue;
            }
        };

        match cmd {
            IpcCommand::Quit => break,
            IpcCommand::GetState => {
                writeln!(stdout, "{}", serde_json::to_string(&ui_state(session))?)?;
            }
            IpcCommand::Command { command } => {
                let rejected = session.apply(command).err().map(|e| e.to_string());
                match rejected {
                    Some(reason) => write_error(&mut stdout, &reason)?,
                    None => writeln!(stdout, "{}", serde_json::to_string(&ui_state(session))?)?,
                }
            }
            IpcCommand::Export => {
                let record: CampaignRecord = session.export_record();
                writeln!(stdout, "{}", serde_json::to_string(&record)?)?;
            }
        }
        stdout.flush()?;
    }
    Ok(())
}

fn write_error(stdout: &mut io::Stdout, message: &str) -> Result<()> {
    let err_json = serde_json::json!({ "error": message });
    writeln!(stdout, "{err_json}")?;
    stdout.flush()?;
    Ok(())
}

fn ui_state(session: &ProjectionSession) -> UiState<'_> {
    UiState {
        revision: session.revision(),
        campaign: &session.settings().name,
        snapshot: session.snapshot(),
    }
}

fn print_summary(session: &ProjectionSession) {
    let snapshot = session.snapshot();
    let m = &snapshot.metrics;

    println!("=== PROJECTION SUMMARY ===");
    println!("  campaign:        {}", session.settings().name);
    println!("  total budget:    ${:.0}", m.total_budget);
    println!("  total cost:      ${:.0}", m.total_cost);
    println!("  customers:       {}", number(&m.total_customers, 0));
    println!("  CAC:             {}", money(&m.cac));
    println!("  CLTV:            {}", money(&m.cltv));
    println!("  CLTV:CAC:        {}", number(&m.cac_to_cltv_ratio, 2));
    println!("  revenue:         {}", money(&m.total_revenue));
    println!("  profit:          {}", money(&m.total_profit));
    println!("  ROI:             {}%", number(&m.roi, 1));
    println!("  margin:          {}%", number(&m.margin_contribution, 1));
    println!("  NPV:             {}", money(&m.npv));
    println!("  IRR (approx):    {}%", number(&m.irr, 1));
    println!("  payback months:  {}", number(&m.payback_period, 1));
    println!("  break-even:      {}", date(&m.break_even_point));
    println!("  profitable from: {}", date(&m.profitability_date));

    println!();
    println!("=== SCENARIOS ===");
    for row in &snapshot.comparison.rows {
        println!(
            "  {:<14} | ROI: {:>8}% | ΔProfit: {:>10}",
            row.name,
            number(&row.roi, 1),
            money(&row.profit_delta)
        );
    }

    println!();
    println!("=== RECOMMENDATIONS ===");
    if snapshot.recommendations.is_empty() {
        println!("  (No enabled channels)");
    }
    for rec in &snapshot.recommendations {
        println!(
            "  {:<18} | ${:.0} → ${:.0} | conf {:.0}% | {}",
            rec.channel_id, rec.current_budget, rec.recommended_budget, rec.confidence, rec.reasoning
        );
    }
}

fn number(metric: &Metric<f64>, places: usize) -> String {
    match metric {
        Ok(v) => format!("{v:.places$}"),
        Err(reason) => format!("n/a ({reason})"),
    }
}

fn money(metric: &Metric<f64>) -> String {
    match metric {
        Ok(v) => format!("${v:.0}"),
        Err(reason) => format!("n/a ({reason})"),
    }
}

fn date(metric: &Metric<NaiveDate>) -> String {
    match metric {
        Ok(d) => d.format("%Y-%m-%d").to_string(),
        Err(reason) => format!("n/a ({reason})"),
    }
}

fn string_arg<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}
