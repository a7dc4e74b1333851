//! CLI runner - executes commands

use crate::cli::commands::Cli;
use crate::client::MalloryClient;
use crate::config::ConfigFile;
use crate::error::{Error, Result};
use crate::http::HttpClientConfig;
use crate::resources::catalog::{self, ResourceDef, ALIASES, RESOURCES};
use crate::resources::{BodyKind, Operation, Output};
use crate::types::JsonValue;
use clap::CommandFactory;
use futures::TryStreamExt;
use serde_json::{json, Map};
use std::io::Write;
use tracing::debug;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the command, writing results to `out`
    pub async fn run<W: Write>(&self, out: &mut W) -> Result<()> {
        if self.cli.help_resources {
            return self.write_json(out, &resource_help());
        }

        let Some(ref name) = self.cli.resource else {
            write!(out, "{}", Cli::command().render_help())?;
            writeln!(out, "\nUse mallory --help-resources to list resources and methods.")?;
            return Ok(());
        };

        let def = resolve_resource(name)?;
        let op = self.resolve_operation(name, def)?;
        self.check_arguments(def, op)?;

        let client = MalloryClient::with_config(self.http_config()?)?;
        let resource = client.resource(def.name)?;
        let identifier = self.cli.identifier.as_deref();

        debug!(resource = def.name, method = op.name, all = self.cli.all, "Dispatching");

        let output = if self.cli.all {
            let params = self.cli.params.list_params();
            let items: Vec<JsonValue> = resource
                .paginate(op.name, identifier, params)
                .try_collect()
                .await?;
            JsonValue::Array(items)
        } else {
            let invocation = self.cli.params.invocation()?;
            let body = resource.invoke(op.name, identifier, &invocation).await?;
            self.render(Output::from_body(op, body))?
        };

        self.write_json(out, &output)
    }

    /// Client configuration: file settings, then command-line overrides
    fn http_config(&self) -> Result<HttpClientConfig> {
        let mut config = match self.cli.config {
            Some(ref path) => ConfigFile::load(path)?.to_http_config(),
            None => HttpClientConfig::default(),
        };
        if let Some(ref key) = self.cli.api_key {
            config.api_key = Some(key.clone());
        }
        if let Some(ref url) = self.cli.base_url {
            config.base_url = url.clone();
        }
        Ok(config)
    }

    fn resolve_operation(&self, name: &str, def: &'static ResourceDef) -> Result<&'static Operation> {
        let available = def.operation_names().join(", ");

        let Some(ref method) = self.cli.method else {
            return Err(Error::usage(format!(
                "Method required for resource '{name}'. Available: {available}."
            )));
        };

        def.operation(method).ok_or_else(|| {
            Error::usage(format!(
                "Unknown method '{method}' on resource '{name}'. Available: {available}."
            ))
        })
    }

    /// Argument checks that can fail before any network call
    fn check_arguments(&self, def: &ResourceDef, op: &Operation) -> Result<()> {
        let params = &self.cli.params;

        if op.needs_identifier()
            && self
                .cli
                .identifier
                .as_deref()
                .map_or(true, |id| id.trim().is_empty())
        {
            return Err(Error::usage(format!(
                "Method '{}' requires an identifier",
                op.name
            )));
        }

        if op.required_param == Some("q") && params.q.as_deref().map_or(true, str::is_empty) {
            return Err(Error::usage("Search query requires --q"));
        }

        match op.body {
            BodyKind::Urls if params.url_list().is_empty() && params.data.is_none() => {
                return Err(Error::usage(format!(
                    "{} {} requires --urls or --data",
                    def.name, op.name
                )));
            }
            BodyKind::Json if params.data.is_none() => {
                return Err(Error::usage(format!(
                    "{} {} requires --data",
                    def.name, op.name
                )));
            }
            _ => {}
        }

        if self.cli.all && !op.is_paged() {
            return Err(Error::usage(format!(
                "Method '{}' does not return pages; --all is not supported",
                op.name
            )));
        }

        Ok(())
    }

    /// JSON to print for a single call
    fn render(&self, output: Output) -> Result<JsonValue> {
        let value = serde_json::to_value(output)?;
        if self.cli.raw {
            if let JsonValue::Object(mut map) = value {
                return Ok(match map.remove("items") {
                    Some(items) => items,
                    None => JsonValue::Object(map),
                });
            }
        }
        Ok(value)
    }

    fn write_json<W: Write>(&self, out: &mut W, value: &JsonValue) -> Result<()> {
        let text = if self.cli.compact {
            serde_json::to_string(value)?
        } else {
            serde_json::to_string_pretty(value)?
        };
        writeln!(out, "{text}")?;
        Ok(())
    }
}

fn resolve_resource(name: &str) -> Result<&'static ResourceDef> {
    catalog::lookup(name).ok_or_else(|| {
        let aliases: Vec<_> = ALIASES.iter().map(|(alias, _)| *alias).collect();
        Error::usage(format!(
            "Unknown resource: {name}. Available: {}. Aliases: {}.",
            catalog::resource_names().join(", "),
            aliases.join(", ")
        ))
    })
}

/// Discovery document printed by `--help-resources`
pub fn resource_help() -> JsonValue {
    let resources: Map<String, JsonValue> = RESOURCES
        .iter()
        .map(|def| (def.name.to_string(), json!(def.operation_names())))
        .collect();

    let aliases: Map<String, JsonValue> = ALIASES
        .iter()
        .map(|(alias, full)| ((*alias).to_string(), json!(full)))
        .collect();

    let alias_help: Vec<String> = ALIASES
        .iter()
        .map(|(alias, full)| format!("  {alias} -> {full}"))
        .collect();

    json!({
        "resources": resources,
        "aliases": aliases,
        "alias_help": alias_help,
    })
}

/// The single JSON line written to stderr for a failure
pub fn error_payload(error: &Error) -> JsonValue {
    let mut payload = json!({ "error": error.to_string() });
    if let Some(status) = error.status_code() {
        payload["status_code"] = json!(status);
    }
    payload
}
