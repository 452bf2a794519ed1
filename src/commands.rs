use althos::error::AppError;
use althos::wellness::mood::{MoodClusterReport, MoodClusterer, MoodCsvImporter};
use althos::wellness::screening::{Instrument, ScoreEngine, ScoreResult};
use clap::Args;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// Questionnaire to score (phq9 or gad7)
    #[arg(long, value_parser = parse_instrument)]
    pub(crate) instrument: Instrument,
    /// Comma-separated item answers, each between 0 and 3
    #[arg(
        long,
        value_delimiter = ',',
        allow_hyphen_values = true,
        required = true
    )]
    pub(crate) answers: Vec<i64>,
}

#[derive(Args, Debug)]
pub(crate) struct MoodClusterArgs {
    /// CSV export with a valence,arousal,date header
    #[arg(long)]
    pub(crate) csv: PathBuf,
}

fn parse_instrument(raw: &str) -> Result<Instrument, String> {
    raw.parse::<Instrument>().map_err(|err| err.to_string())
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let result = ScoreEngine::score(args.instrument, &args.answers)?;
    println!("{}", render_score(&result));
    Ok(())
}

pub(crate) fn run_mood_cluster(args: MoodClusterArgs) -> Result<(), AppError> {
    let samples = MoodCsvImporter::from_path(&args.csv)?;
    let report = MoodClusterer::report(&samples);
    print!("{}", render_clusters(&report, samples.len()));
    Ok(())
}

fn render_score(result: &ScoreResult) -> String {
    format!(
        "{}: total {}/{} ({})",
        result.instrument,
        result.total,
        result.instrument.max_total(),
        result.severity_label
    )
}

fn render_clusters(report: &MoodClusterReport, sample_count: usize) -> String {
    let mut out = format!("Mood clusters ({sample_count} samples)\n");

    if report.clusters.is_empty() {
        out.push_str("No mood samples found\n");
        return out;
    }

    for cluster in &report.clusters {
        let days: Vec<String> = cluster.days.iter().map(|day| day.to_string()).collect();
        out.push_str(&format!(
            "- [{}] {} (valence {:+.1}): {}\n",
            cluster.color,
            cluster.tone(),
            cluster.center_valence,
            days.join(", ")
        ));
    }

    out.push_str("\nHighlights\n");
    for highlight in &report.highlights {
        out.push_str(&format!("- {highlight}\n"));
    }
    out
}
