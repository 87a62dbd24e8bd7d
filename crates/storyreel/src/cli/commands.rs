//! CLI command definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Storyreel - generate storyboard scene videos and the transitions between them
#[derive(Parser, Debug)]
#[command(name = "storyreel")]
#[command(about = "Generate storyboard scene videos and transitions through an asynchronous job API", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// Configuration file layered over the bundled defaults
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate one video per storyboard scene
    Generate {
        /// Scene image list (scene_urls.json)
        #[arg(long)]
        scenes: PathBuf,

        /// Scene descriptions (story_elements.json)
        #[arg(long)]
        story: PathBuf,

        /// Where to write the scene manifest
        #[arg(long)]
        out: PathBuf,

        /// Submit every scene independently, without continuity from the previous one
        #[arg(long)]
        no_continuity: bool,
    },

    /// Generate transition clips between finished scenes
    Interpolate {
        /// Scene manifest written by `generate`
        #[arg(long)]
        videos: PathBuf,

        /// Where to write the transition manifest
        #[arg(long)]
        out: PathBuf,

        /// First scene of a single transition
        #[arg(long, requires = "to")]
        from: Option<u32>,

        /// Second scene of a single transition
        #[arg(long, requires = "from")]
        to: Option<u32>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_generate() {
        let cli = Cli::try_parse_from([
            "storyreel",
            "generate",
            "--scenes",
            "scene_urls.json",
            "--story",
            "story_elements.json",
            "--out",
            "scene_videos.json",
            "--no-continuity",
            "--verbose",
        ])
        .unwrap();

        assert!(cli.verbose);
        assert!(!cli.json_logs);
        match cli.command {
            Commands::Generate {
                scenes,
                no_continuity,
                ..
            } => {
                assert_eq!(scenes, PathBuf::from("scene_urls.json"));
                assert!(no_continuity);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn global_flags_follow_subcommand() {
        let cli = Cli::try_parse_from([
            "storyreel",
            "interpolate",
            "--videos",
            "scene_videos.json",
            "--out",
            "interpolated.json",
            "--json-logs",
            "--config",
            "custom.toml",
        ])
        .unwrap();

        assert!(cli.json_logs);
        assert_eq!(cli.config, Some(PathBuf::from("custom.toml")));
        assert!(matches!(
            cli.command,
            Commands::Interpolate {
                from: None,
                to: None,
                ..
            }
        ));
    }

    #[test]
    fn scene_pair_requires_both_ends() {
        let result = Cli::try_parse_from([
            "storyreel",
            "interpolate",
            "--videos",
            "scene_videos.json",
            "--out",
            "interpolated.json",
            "--from",
            "2",
        ]);
        assert!(result.is_err());

        let cli = Cli::try_parse_from([
            "storyreel",
            "interpolate",
            "--videos",
            "scene_videos.json",
            "--out",
            "interpolated.json",
            "--from",
            "2",
            "--to",
            "3",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Commands::Interpolate {
                from: Some(2),
                to: Some(3),
                ..
            }
        ));
    }

    #[test]
    fn generate_requires_inputs() {
        assert!(Cli::try_parse_from(["storyreel", "generate", "--out", "x.json"]).is_err());
    }
}
