use crate::report::{run_explain, run_rank, ExplainArgs, RankArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use district_score::error::AppError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "District Score",
    about = "Score, rank and explain districts for senior friendliness",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Print a ranked list for one category or the overall score
    Rank(RankArgs),
    /// Print the one-sentence explanation for a district
    Explain(ExplainArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Override the indicator table path
    #[arg(long)]
    pub(crate) data: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Rank(args) => run_rank(args),
        Command::Explain(args) => run_explain(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serve_is_the_default_command() {
        let cli = Cli::try_parse_from(["district-score-api"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn rank_requires_a_category_or_overall() {
        assert!(Cli::try_parse_from(["district-score-api", "rank"]).is_err());
        assert!(Cli::try_parse_from([
            "district-score-api",
            "rank",
            "--category",
            "safety",
            "--overall"
        ])
        .is_err());

        let cli = Cli::try_parse_from(["district-score-api", "rank", "--overall", "--limit", "3"])
            .expect("parses");
        match cli.command {
            Some(Command::Rank(args)) => {
                assert!(args.overall);
                assert_eq!(args.limit, 3);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn explain_accepts_negative_mode() {
        let cli = Cli::try_parse_from([
            "district-score-api",
            "explain",
            "--district",
            "Jung-gu",
            "--negative",
        ])
        .expect("parses");
        match cli.command {
            Some(Command::Explain(args)) => {
                assert_eq!(args.district, "Jung-gu");
                assert!(args.negative);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
