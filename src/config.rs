use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use clap::Parser;

use crate::data::schema::{ACTION, CATEGORY, ELEMENT_NO};

/// Research Elements Explorer - search, filter and open any element of the sheet
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Spreadsheet to browse (.xlsx, .xls, .ods, .csv, .json or .parquet)
    #[arg(short, long, env = "ELEMENT_EXPLORER_DATA", default_value = "final_element_sheet.xlsx")]
    pub data: PathBuf,

    /// Worksheet name; defaults to the first sheet
    #[arg(long, env = "ELEMENT_EXPLORER_SHEET")]
    pub sheet: Option<String>,

    /// Host to bind to
    #[arg(long, env = "ELEMENT_EXPLORER_HOST", default_value = "127.0.0.1")]
    pub host: IpAddr,

    /// Port to listen on
    #[arg(short, long, env = "ELEMENT_EXPLORER_PORT", default_value = "8501")]
    pub port: u16,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// Runtime configuration, independent of how it was parsed.
#[derive(Debug, Clone)]
pub struct Config {
    pub data_path: PathBuf,
    pub sheet: Option<String>,
    pub addr: SocketAddr,
    pub verbose: bool,
    pub facets: FacetConfig,
}

impl From<Args> for Config {
    fn from(args: Args) -> Self {
        Config {
            data_path: args.data,
            sheet: args.sheet,
            addr: SocketAddr::new(args.host, args.port),
            verbose: args.verbose,
            facets: FacetConfig::default(),
        }
    }
}

/// Which columns drive the sidebar filters.
///
/// Columns missing from the loaded sheet are skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FacetConfig {
    /// Rendered as checkbox groups.
    pub categorical: Vec<String>,
    /// Rendered as a min/max range when numeric.
    pub range: Option<String>,
    /// Columns searched by the text box; `None` searches every column.
    pub searchable: Option<Vec<String>>,
}

impl Default for FacetConfig {
    fn default() -> Self {
        FacetConfig {
            categorical: vec![CATEGORY.to_string(), ACTION.to_string()],
            range: Some(ELEMENT_NO.to_string()),
            searchable: None,
        }
    }
}
