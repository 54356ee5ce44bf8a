use anyhow::Result;
use colored::*;
use shelfwatch::{
    core::{config::EdgarConfig, types::DilutionReport},
    edgar::{filing::SubmissionIndex, report::ReportType},
    fetch::EdgarClient,
    utils::format::{format_count, format_dollars, format_large_number},
    DilutionAnalyzer, DilutionVerdict,
};
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "shelfwatch-cli",
    about = "Shares outstanding, public float and shelf capacity from SEC EDGAR"
)]
struct Opt {
    /// Ticker symbols or CIKs
    #[structopt(required = true)]
    entities: Vec<String>,

    /// Print the reports as JSON
    #[structopt(long)]
    json: bool,

    /// Also list recent filings grouped by category
    #[structopt(long)]
    filings: bool,

    /// Number of recent filings to group
    #[structopt(long, default_value = "100")]
    limit: usize,
}

fn print_report(report: &DilutionReport) {
    println!(
        "\n{} {}",
        report.name.bold(),
        format!("(CIK {})", report.cik).dimmed()
    );

    match &report.shares_outstanding {
        Some(shares) => println!(
            "  Shares outstanding: {} ({}, {})",
            format_count(shares.value).cyan(),
            shares.as_of,
            shares.source
        ),
        None => println!("  Shares outstanding: {}", "not found".yellow()),
    }

    match &report.public_float {
        Some(float) => println!(
            "  Public float:       {} [{}] ({}, {})",
            format_dollars(float.value).cyan(),
            format_large_number(float.value),
            float.as_of,
            float.source
        ),
        None => println!("  Public float:       {}", "not found".yellow()),
    }

    if let Some(shelf) = &report.shelf {
        if let Some(expiration) = shelf.expiration {
            println!(
                "  {} filed {}, est. expiry {} (approximate)",
                ReportType::FormS3,
                shelf.as_of,
                expiration
            );
        }
    }
    if let Some(capacity) = report.shelf_capacity {
        println!("  Shelf capacity:     {}", format_dollars(capacity as f64));
    }

    match report.verdict {
        Some(DilutionVerdict::Restricted { max_issuance_12m }) => println!(
            "  Baby shelf:         {} (max {} per 12 months)",
            "RESTRICTED".red().bold(),
            format_dollars(max_issuance_12m)
        ),
        Some(DilutionVerdict::Unrestricted) => {
            println!("  Baby shelf:         {}", "unrestricted".green())
        }
        None => println!("  Baby shelf:         {}", "unknown".yellow()),
    }
}

fn print_filings(index: &SubmissionIndex, limit: usize) {
    for (category, filings) in index.group_by_category(limit) {
        println!("\n  {}", category.to_string().underline());
        for filing in filings {
            println!(
                "    {:<10} {} {}",
                filing.report_type.to_string(),
                filing.filing_date,
                filing
                    .report_type
                    .description()
                    .unwrap_or(filing.primary_doc_description.as_str())
                    .dimmed()
            );
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();

    let opt = Opt::from_args();
    let config = EdgarConfig::from_env()?;
    let client = EdgarClient::new(config)?;

    let mut resolved = Vec::with_capacity(opt.entities.len());
    for entity in &opt.entities {
        match client.resolve_cik(entity).await {
            Ok(cik) => resolved.push((entity, cik)),
            Err(e) => eprintln!("{} {}: {:#}", "Error".red(), entity, e),
        }
    }

    let analyzer = DilutionAnalyzer::new(client);
    let results = futures::future::join_all(
        resolved
            .iter()
            .map(|(_, cik)| analyzer.report_with_index(*cik)),
    )
    .await;

    let mut reports = Vec::with_capacity(results.len());
    for ((entity, _), result) in resolved.iter().zip(results) {
        match result {
            Ok(report) => reports.push(report),
            Err(e) => eprintln!("{} {}: {}", "Error".red(), entity, e),
        }
    }

    if opt.json {
        let reports: Vec<&DilutionReport> = reports.iter().map(|(report, _)| report).collect();
        println!("{}", serde_json::to_string_pretty(&reports)?);
        return Ok(());
    }

    for (report, index) in &reports {
        print_report(report);
        if opt.filings {
            print_filings(index, opt.limit);
        }
    }

    Ok(())
}
