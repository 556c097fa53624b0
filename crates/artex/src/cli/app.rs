use std::path::PathBuf;

use artex_rules::Mode;
use clap::{Parser, ValueEnum};

#[derive(Clone, Debug, Parser)]
#[command(
    name = "artex",
    version = env!("CARGO_PKG_VERSION"),
    about = "Extract forensic artifacts of LLM applications from a mounted disk image",
    long_about = None,
    after_help = "Example:\n  artex /mnt/evidence api CHATGPT ./result"
)]
pub struct App {
    #[arg(value_name = "IMAGE", help = "Mount point of the image to analyze")]
    pub image: PathBuf,

    #[arg(value_enum, value_name = "MODE", help = "LLM operation mode")]
    pub mode: ModeArg,

    #[arg(value_name = "PROGRAM", help = "LLM program to extract artifacts for")]
    pub program: String,

    #[arg(value_name = "OUTPUT_DIR", help = "Directory where artifacts are saved")]
    pub output_dir: PathBuf,

    #[arg(long, env = "ARTEX_CATALOG", help = "Artifact catalog to use instead of the built-in one")]
    pub catalog: Option<PathBuf>,

    #[arg(long, help = "Replace '+' with '_' in category folder names")]
    pub no_keep_plus: bool,

    #[arg(long, help = "Disable the summary table")]
    pub no_show_summary: bool,

    #[arg(long, help = "Disable the final summary message")]
    pub no_final_summary: bool,

    #[arg(
        long,
        value_name = "NAME",
        default_value = "Windows",
        help = "Directory that marks the volume to extract from"
    )]
    pub volume_marker: String,

    #[arg(long, conflicts_with = "volume_marker", help = "Use the mount point as the volume root")]
    pub no_volume_marker: bool,

    #[arg(short, long, help = "Verbose logging")]
    pub verbose: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    Api,
    Standalone,
}

impl From<ModeArg> for Mode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Api => Mode::Api,
            ModeArg::Standalone => Mode::Standalone,
        }
    }
}

impl App {
    pub fn volume_marker(&self) -> Option<String> {
        (!self.no_volume_marker).then(|| self.volume_marker.clone())
    }
}
