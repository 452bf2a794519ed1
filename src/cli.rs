use crate::commands::{run_mood_cluster, run_score, MoodClusterArgs, ScoreArgs};
use crate::server;
use althos::error::AppError;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "althos",
    about = "Run the Althos wellness API or score and cluster data from the command line",
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
    /// Score a PHQ-9 or GAD-7 questionnaire
    Score(ScoreArgs),
    /// Work with mood exports
    Mood {
        #[command(subcommand)]
        command: MoodCommand,
    },
}

#[derive(Subcommand, Debug)]
enum MoodCommand {
    /// Group a CSV mood export into low, steady, and upbeat days
    Cluster(MoodClusterArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Score(args) => run_score(args),
        Command::Mood {
            command: MoodCommand::Cluster(args),
        } => run_mood_cluster(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use althos::wellness::screening::Instrument;

    #[test]
    fn parses_score_arguments() {
        let cli = Cli::try_parse_from([
            "althos",
            "score",
            "--instrument",
            "PHQ-9",
            "--answers",
            "0,1,2,3,1,0,2,3,1",
        ])
        .expect("arguments parse");

        match cli.command {
            Some(Command::Score(args)) => {
                assert_eq!(args.instrument, Instrument::Phq9);
                assert_eq!(args.answers, vec![0, 1, 2, 3, 1, 0, 2, 3, 1]);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn negative_answers_reach_validation() {
        let cli = Cli::try_parse_from([
            "althos",
            "score",
            "--instrument",
            "gad7",
            "--answers",
            "-1,0,0,0,0,0,0",
        ])
        .expect("arguments parse");

        match cli.command {
            Some(Command::Score(args)) => assert_eq!(args.answers[0], -1),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn defaults_to_serve() {
        let cli = Cli::try_parse_from(["althos"]).expect("arguments parse");
        assert!(cli.command.is_none());
    }
}
