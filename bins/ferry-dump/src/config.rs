use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "ferry-dump",
    about = "Print the records of an Avro container file as canonical JSON lines"
)]
pub struct Cli {
    /// Avro object container file
    pub file: PathBuf,

    /// Stop after this many records
    #[arg(long)]
    pub limit: Option<usize>,

    /// Converter setting as key=value, e.g. union.resolution=first-match
    #[arg(long = "set", value_name = "KEY=VALUE", env = "FERRY_SET", value_delimiter = ',')]
    pub settings: Vec<String>,

    /// Abort on the first record that fails to convert
    #[arg(long)]
    pub fail_fast: bool,
}
