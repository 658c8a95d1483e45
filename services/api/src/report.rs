use clap::Args;
use district_score::config::AppConfig;
use district_score::error::AppError;
use district_score::scoring::{
    rank, round_display, CategoryKey, Direction, ExplainMode, Explanation, MetricComparison,
    RankedEntry, ScoringEngine,
};
use district_score::table::IndicatorTable;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct RankArgs {
    /// Category key to rank by (e.g. safety, culture-welfare)
    #[arg(long, required_unless_present = "overall", conflicts_with = "overall")]
    pub(crate) category: Option<String>,
    /// Rank by the overall senior-friendliness score
    #[arg(long)]
    pub(crate) overall: bool,
    /// List the weakest districts first
    #[arg(long)]
    pub(crate) bottom: bool,
    /// Number of districts to print
    #[arg(long, default_value_t = 5)]
    pub(crate) limit: i64,
    /// Indicator table to read instead of the configured one
    #[arg(long)]
    pub(crate) data: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct ExplainArgs {
    /// District name as it appears in the indicator table
    #[arg(long)]
    pub(crate) district: String,
    /// Name the weakest category instead of the strongest
    #[arg(long)]
    pub(crate) negative: bool,
    /// Indicator table to read instead of the configured one
    #[arg(long)]
    pub(crate) data: Option<PathBuf>,
}

pub(crate) fn run_rank(args: RankArgs) -> Result<(), AppError> {
    let RankArgs {
        category,
        overall,
        bottom,
        limit,
        data,
    } = args;

    let engine = load_engine(data)?;
    let direction = if bottom {
        Direction::Ascending
    } else {
        Direction::Descending
    };

    let (title, scores) = match category {
        Some(category) if !overall => {
            let key = category.parse::<CategoryKey>()?;
            (key.category().title.to_string(), engine.category_scores(key))
        }
        _ => ("Overall senior friendliness".to_string(), engine.overall_scores()),
    };

    let ranked = rank(&scores, direction, limit)?;
    print!("{}", render_ranking(&title, &ranked));
    Ok(())
}

pub(crate) fn run_explain(args: ExplainArgs) -> Result<(), AppError> {
    let mode = if args.negative {
        ExplainMode::Negative
    } else {
        ExplainMode::Positive
    };

    let engine = load_engine(args.data)?;
    let explanation = engine.explain(&args.district, mode)?;
    let breakdown = engine.metric_breakdown(&args.district)?;
    print!("{}", render_explanation(&explanation, &breakdown));
    Ok(())
}

fn load_engine(data: Option<PathBuf>) -> Result<ScoringEngine, AppError> {
    let path = match data {
        Some(path) => path,
        None => AppConfig::load()?.data.indicator_path,
    };
    let table = IndicatorTable::from_path(&path)?;
    Ok(ScoringEngine::new(Arc::new(table)))
}

fn display_score(value: f64) -> String {
    match round_display(value) {
        Some(rounded) => format!("{rounded:.2}"),
        None => "n/a".to_string(),
    }
}

pub(crate) fn render_ranking(title: &str, ranked: &[RankedEntry]) -> String {
    let mut output = format!("{title}\n");
    if ranked.is_empty() {
        output.push_str("  (no scorable districts)\n");
        return output;
    }
    for entry in ranked {
        output.push_str(&format!(
            "{:>3}. {:<20} {}\n",
            entry.rank,
            entry.district,
            display_score(entry.score)
        ));
    }
    output
}

pub(crate) fn render_explanation(
    explanation: &Explanation,
    breakdown: &[MetricComparison],
) -> String {
    let mut output = format!(
        "{}\nCategory scores vs. other districts:\n",
        explanation.sentence
    );
    for metric in breakdown {
        let marker = if metric.category == explanation.category {
            "*"
        } else {
            " "
        };
        output.push_str(&format!(
            " {marker} {:<24} {:>6} | avg {:>6}\n",
            metric.name,
            optional_score(metric.selected_district),
            optional_score(metric.average)
        ));
    }
    output
}

fn optional_score(value: Option<f64>) -> String {
    value
        .map(|value| format!("{value:.2}"))
        .unwrap_or_else(|| "n/a".to_string())
}
