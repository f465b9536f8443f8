use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "medlog", bin_name = "medlog", version)]
#[command(about = "Keep track of the medicines and supplements you take", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Directory holding medlog's data (overrides MEDLOG_DATA_DIR)
    #[arg(long, global = true, value_name = "DIR", help_heading = "Options")]
    pub data_dir: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true, help_heading = "Options")]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List medicines
    #[command(alias = "ls")]
    List,

    /// Add a medicine
    Add {
        /// Name of the medicine (words are joined with spaces)
        #[arg(required = true, num_args = 1..)]
        name: Vec<String>,
    },

    /// Remove one or more medicines (intake history is kept)
    #[command(alias = "rm")]
    Remove {
        /// Positions (e.g. 1 3), or a name or id
        #[arg(required = true, num_args = 1..)]
        medicines: Vec<String>,
    },

    /// Move a medicine to another position
    Move {
        /// Current position
        from: usize,
        /// New position
        to: usize,
    },

    /// Set the medicine order explicitly
    Order {
        /// Medicines in their new order (positions, names or ids)
        #[arg(required = true, num_args = 1..)]
        medicines: Vec<String>,
    },

    /// Record taking a medicine
    #[command(alias = "t")]
    Take {
        /// Position, name or id of the medicine
        #[arg(required = true, num_args = 1..)]
        medicine: Vec<String>,

        /// Date taken, YYYY-MM-DD (defaults to today)
        #[arg(short, long)]
        date: Option<String>,

        /// Time taken, HH:MM in 24-hour form (defaults to now)
        #[arg(short, long)]
        time: Option<String>,

        /// Dosage or other notes
        #[arg(long)]
        details: Option<String>,
    },

    /// Show intake history grouped by day
    #[command(alias = "h")]
    History {
        /// Only show one day, YYYY-MM-DD
        #[arg(short, long)]
        day: Option<String>,
    },

    /// Show which days of a month have intake records
    Calendar {
        /// Month to show, YYYY-MM (defaults to the current month)
        #[arg(short, long)]
        month: Option<String>,
    },

    /// Delete intake records
    Forget {
        /// Positions as shown by `history`, or record ids
        #[arg(required = true, num_args = 1..)]
        records: Vec<String>,
    },

    /// Export all data as JSON
    Export {
        /// Output file (defaults to the configured export file name)
        #[arg(short, long, conflicts_with = "stdout")]
        output: Option<PathBuf>,

        /// Write to stdout instead of a file
        #[arg(long)]
        stdout: bool,
    },

    /// Replace all data with the contents of an export file
    Import {
        /// Path to the export file
        path: PathBuf,
    },

    /// Delete all medicines and intake records
    Clear {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Get or set configuration
    Config {
        /// Configuration key (export-filename, clock)
        key: Option<String>,

        /// Value to set (if omitted, prints current value)
        value: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("medlog").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn no_subcommand_is_allowed() {
        assert!(parse(&[]).command.is_none());
    }

    #[test]
    fn take_collects_words_and_options() {
        let cli = parse(&["t", "vitamin", "c", "--time", "08:30", "--details", "500mg"]);
        match cli.command {
            Some(Commands::Take {
                medicine,
                time,
                details,
                date,
            }) => {
                assert_eq!(medicine, ["vitamin", "c"]);
                assert_eq!(time.as_deref(), Some("08:30"));
                assert_eq!(details.as_deref(), Some("500mg"));
                assert!(date.is_none());
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = parse(&["ls", "--data-dir", "/tmp/x", "-v"]);
        assert!(matches!(cli.command, Some(Commands::List)));
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/x")));
        assert!(cli.verbose);
    }

    #[test]
    fn export_output_conflicts_with_stdout() {
        let res = Cli::try_parse_from(["medlog", "export", "-o", "a.json", "--stdout"]);
        assert!(res.is_err());
    }
}
