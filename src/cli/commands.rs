use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// `synthlead` - similarity-gated synthetic comment generation.
#[derive(Parser, Debug)]
#[command(name = "synthlead")]
#[command(version = "0.1.0")]
#[command(
    about = "Generate synthetic community comments that stay distinct from the existing corpus.",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the time-of-day scheduler until Ctrl+C
    Run {
        /// Generate and score without committing records
        #[arg(long)]
        dry_run: bool,
    },

    /// Run a single generation cycle and print the result
    Generate {
        /// Generate and score without committing the record
        #[arg(long)]
        dry_run: bool,
    },

    /// Start the HTTP trigger (POST /api/generate-lead)
    Gateway {
        /// Port to listen on (defaults to [gateway] port; 0 picks a free port)
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to (defaults to [gateway] host)
        #[arg(long)]
        host: Option<String>,
    },

    /// Score the n-gram similarity of two texts
    Similarity {
        a: String,
        b: String,

        /// Character n-gram size
        #[arg(short, default_value_t = crate::similarity::DEFAULT_NGRAM_SIZE)]
        n: usize,
    },

    /// Inspect or seed the corpus store
    Corpus {
        #[command(subcommand)]
        corpus_command: CorpusCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum CorpusCommands {
    /// Import human-submitted records from a JSON array file
    Import {
        /// Path to the JSON export
        file: PathBuf,
    },
    /// Show record counts per category
    Stats,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn similarity_defaults_to_trigrams() {
        let cli = Cli::try_parse_from(["synthlead", "similarity", "hello world", "world hello"])
            .unwrap();
        match cli.command {
            Commands::Similarity { a, b, n } => {
                assert_eq!(a, "hello world");
                assert_eq!(b, "world hello");
                assert_eq!(n, 3);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn gateway_overrides_are_optional() {
        let cli = Cli::try_parse_from(["synthlead", "gateway", "--port", "0"]).unwrap();
        match cli.command {
            Commands::Gateway { port, host } => {
                assert_eq!(port, Some(0));
                assert!(host.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn corpus_import_takes_a_path() {
        let cli = Cli::try_parse_from(["synthlead", "corpus", "import", "leads.json"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Corpus {
                corpus_command: CorpusCommands::Import { ref file }
            } if file == &PathBuf::from("leads.json")
        ));
    }
}
