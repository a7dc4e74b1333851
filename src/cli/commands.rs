//! CLI commands and argument parsing

use crate::error::Result;
use crate::resources::{Invocation, ListParams};
use crate::types::{JsonValue, TrendingPeriod};
use clap::{Args, Parser};
use std::path::PathBuf;

const EXAMPLES: &str = "\
Examples:
  mallory vulnerabilities get CVE-2024-1234
  mallory threat_actors trending --period 7d --limit 10
  mallory search query --q APT28
  mallory vulns list --all --limit 500 --filter kev
  mallory --help-resources";

/// Mallory threat intelligence API from the shell
#[derive(Parser, Debug)]
#[command(name = "mallory")]
#[command(author, version, about, long_about = None, after_help = EXAMPLES)]
pub struct Cli {
    /// List all resources and their methods as JSON
    #[arg(long)]
    pub help_resources: bool,

    /// API key (or set MALLORY_API_KEY)
    #[arg(long)]
    pub api_key: Option<String>,

    /// API base URL (default: https://api.mallory.ai/v1)
    #[arg(long)]
    pub base_url: Option<String>,

    /// Configuration file (YAML or JSON)
    #[arg(short = 'C', long)]
    pub config: Option<PathBuf>,

    /// Output single-line JSON
    #[arg(long)]
    pub compact: bool,

    /// Print only the items of a paged result
    #[arg(long)]
    pub raw: bool,

    /// Fetch every page and print all items
    #[arg(long)]
    pub all: bool,

    /// Verbose logging on stderr
    #[arg(short, long)]
    pub verbose: bool,

    /// Resource name or alias (e.g. vulnerabilities, vulns, actors)
    pub resource: Option<String>,

    /// Method to call (e.g. list, get, trending)
    pub method: Option<String>,

    /// Identifier (CVE ID, UUID, source name) for item methods
    pub identifier: Option<String>,

    #[command(flatten)]
    pub params: ParamArgs,
}

/// Query and body arguments
#[derive(Args, Debug, Default, Clone)]
pub struct ParamArgs {
    #[arg(long)]
    pub limit: Option<u64>,

    #[arg(long)]
    pub offset: Option<u64>,

    #[arg(long)]
    pub sort: Option<String>,

    /// asc or desc
    #[arg(long)]
    pub order: Option<String>,

    #[arg(long)]
    pub filter: Option<String>,

    /// Trending window: 1d, 7d or 30d
    #[arg(long)]
    pub period: Option<TrendingPeriod>,

    /// Search query string
    #[arg(long)]
    pub q: Option<String>,

    /// Search types filter
    #[arg(long)]
    pub types: Option<String>,

    /// URLs for references create (repeat or comma-separated)
    #[arg(long)]
    pub urls: Vec<String>,

    /// JSON request body
    #[arg(long)]
    pub data: Option<String>,

    /// Extra query parameter as key=value (repeatable)
    #[arg(long = "param", value_parser = parse_key_val)]
    pub extra: Vec<(String, String)>,
}

impl ParamArgs {
    /// Query parameters from the flags that were given
    pub fn list_params(&self) -> ListParams {
        let mut params = ListParams::new();
        if let Some(limit) = self.limit {
            params = params.limit(limit);
        }
        if let Some(offset) = self.offset {
            params = params.offset(offset);
        }
        if let Some(ref sort) = self.sort {
            params = params.sort(sort);
        }
        if let Some(ref order) = self.order {
            params = params.order(order);
        }
        if let Some(ref filter) = self.filter {
            params = params.filter(filter);
        }
        if let Some(period) = self.period {
            params = params.period(period);
        }
        if let Some(ref q) = self.q {
            params = params.param("q", q);
        }
        if let Some(ref types) = self.types {
            params = params.param("types", types);
        }
        for (key, value) in &self.extra {
            params = params.param(key, value);
        }
        params
    }

    /// URLs split on commas, blanks dropped
    pub fn url_list(&self) -> Vec<String> {
        self.urls
            .iter()
            .flat_map(|u| u.split(','))
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .map(String::from)
            .collect()
    }

    /// Parsed `--data` body
    pub fn body(&self) -> Result<Option<JsonValue>> {
        self.data
            .as_deref()
            .map(serde_json::from_str)
            .transpose()
            .map_err(Into::into)
    }

    /// Everything an operation call needs
    pub fn invocation(&self) -> Result<Invocation> {
        let mut invocation = Invocation::new()
            .params(self.list_params())
            .urls(self.url_list());
        if let Some(body) = self.body()? {
            invocation = invocation.body(body);
        }
        Ok(invocation)
    }
}

fn parse_key_val(s: &str) -> std::result::Result<(String, String), String> {
    s.split_once('=')
        .map(|(k, v)| (k.trim().to_string(), v.to_string()))
        .filter(|(k, _)| !k.is_empty())
        .ok_or_else(|| format!("expected key=value, got '{s}'"))
}
