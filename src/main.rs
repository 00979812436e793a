use anyhow::{bail, Context, Result};
use chrono::Local;
use portalscraper::{
    normalize::{normalize_vintage, refresh_normalized, RecordVintage},
    pipeline,
    remark::GroqProvider,
    service::RemarkService,
    store::{load_records, JsonFileStore},
    Config, StudentAcademicRecord,
};
use std::{collections::BTreeMap, env, fs};
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

const USAGE: &str = "usage:
  portalscraper ingest <dashboard.html> <exam_history.html> [usn]
  portalscraper normalize
  portalscraper show <usn>
  portalscraper remark <usn>";

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,portalscraper=info"));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .init();

    // ─── 2) config ───────────────────────────────────────────────────
    let cfg = Config::from_env()?;
    info!(
        store = %cfg.store_path.display(),
        normalized = %cfg.normalized_path.display(),
        "startup"
    );

    let args: Vec<String> = env::args().skip(1).collect();
    let args: Vec<&str> = args.iter().map(String::as_str).collect();

    // ─── 3) dispatch ─────────────────────────────────────────────────
    match args.as_slice() {
        ["ingest", dashboard, exams, rest @ ..] if rest.len() <= 1 => {
            let dashboard_html = fs::read_to_string(dashboard)
                .with_context(|| format!("reading dashboard page {}", dashboard))?;
            let exam_html = fs::read_to_string(exams)
                .with_context(|| format!("reading exam history page {}", exams))?;

            let mut store = JsonFileStore::<StudentAcademicRecord>::load(&cfg.store_path);
            let now = Local::now().naive_local();
            let record = pipeline::ingest(
                &mut store,
                rest.first().copied(),
                &dashboard_html,
                &exam_html,
                now,
            )?;
            refresh_normalized(&cfg.store_path, &cfg.normalized_path)?;
            println!(
                "saved {} ({}): {} subjects, {} semesters",
                record.name,
                record.usn,
                record.current_semester.len(),
                record.exam_history.len()
            );
        }
        ["normalize"] => {
            let normalized = refresh_normalized(&cfg.store_path, &cfg.normalized_path)?;
            println!(
                "normalized {} records → {}",
                normalized.len(),
                cfg.normalized_path.display()
            );
        }
        ["show", usn] => {
            let records: BTreeMap<String, RecordVintage> = load_records(&cfg.store_path);
            let Some(record) = records.get(*usn) else {
                bail!("no record stored for {}", usn);
            };
            println!("{}", serde_json::to_string_pretty(&normalize_vintage(record))?);
        }
        ["remark", usn] => {
            let provider = GroqProvider::new(&cfg.llm)?;
            let service = RemarkService::new(cfg.clone(), provider);
            match service.remark_for(usn).await {
                Ok(resp) => println!("{}", serde_json::to_string_pretty(&resp)?),
                Err(e) => {
                    error!(usn = %usn, error = %e, "remark failed");
                    return Err(e.into());
                }
            }
        }
        _ => {
            eprintln!("{}", USAGE);
            bail!("unrecognised arguments: {:?}", args);
        }
    }

    info!("all done");
    Ok(())
}
