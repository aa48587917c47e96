use clap::{Parser, Subcommand};
use codestrip_catalog::{builtin_rule_sets, kind_meaning, scope_label};
use codestrip_cli::explain::{describe_target, list_rule_ids, lookup_rule};
use codestrip_cli::{RunArgs, StripArgs, cmd_frontend, cmd_run, cmd_server, finish, init_tracing};
use codestrip_core::ToolError;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "codestrip",
    version,
    about = "Strip payment and subscription code from web app sources with ordered rewrite rules."
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Rewrite the client script and page markup (missing sources are skipped).
    Frontend(StripArgs),
    /// Rewrite the server entry point (a missing source is an error).
    Server(StripArgs),
    /// Apply a rule set file to one source.
    Run(RunArgs),
    /// Explain what a built-in rule matches and how.
    Explain(ExplainArgs),
    /// List the built-in rule sets and their rules.
    ListRules(ListRulesArgs),
}

#[derive(Debug, Parser)]
struct ExplainArgs {
    /// Rule id to explain (e.g. "payment-routes", "premium-gate").
    rule_id: String,
}

#[derive(Debug, Parser)]
struct ListRulesArgs {
    /// Output format (text, json).
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> ExitCode {
    init_tracing();
    finish(real_main())
}

fn real_main() -> Result<(), ToolError> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Frontend(args) => cmd_frontend(&args),
        Command::Server(args) => cmd_server(&args),
        Command::Run(args) => cmd_run(&args),
        Command::Explain(args) => cmd_explain(args).map_err(ToolError::from),
        Command::ListRules(args) => cmd_list_rules(args).map_err(ToolError::from),
    }
}

fn cmd_explain(args: ExplainArgs) -> anyhow::Result<()> {
    let Some(found) = lookup_rule(&args.rule_id) else {
        let available = list_rule_ids().join(", ");
        anyhow::bail!(
            "Unknown rule id: '{}'\n\nAvailable rules: {}",
            args.rule_id,
            available
        );
    };
    let rule = &found.rule;
    let set = &found.set;

    println!("================================================================================");
    println!("RULE: {}", rule.id);
    println!("================================================================================");
    println!();
    println!("Rule set: {} ({})", set.name, set.kind.as_str());
    println!("Type:     {}", rule.kind.label());
    println!("Scope:    {}", scope_label(rule.effective_scope()));
    println!("Required: {}", if rule.required { "yes" } else { "no" });
    println!();

    println!("INTENT");
    println!("--------------------------------------------------------------------------------");
    println!("{}", rule.intent);
    println!();

    println!("MATCHES");
    println!("--------------------------------------------------------------------------------");
    println!("{}", describe_target(&rule.kind));
    println!();

    println!("MATCHING POLICY");
    println!("--------------------------------------------------------------------------------");
    println!("{}", kind_meaning(&rule.kind));
    println!();

    println!("ORDER");
    println!("--------------------------------------------------------------------------------");
    println!(
        "Rule {} of {} in {}. It sees the output of the rules before it, and the",
        found.position,
        set.rules.len(),
        set.name
    );
    println!("rules after it see its output. A rule that finds nothing is a no-op unless");
    println!("it is required or the run is --strict.");
    println!();

    Ok(())
}

fn cmd_list_rules(args: ListRulesArgs) -> anyhow::Result<()> {
    let sets = builtin_rule_sets();
    match args.format {
        OutputFormat::Text => {
            println!("Built-in rule sets:");
            for set in &sets {
                println!();
                println!("{} ({})", set.name, set.kind.as_str());
                if let Some(description) = &set.description {
                    println!("  {}", description);
                }
                println!("  {:<30} {:<26} SCOPE", "ID", "TYPE");
                println!("  {:<30} {:<26} -----", "--", "----");
                for rule in &set.rules {
                    println!(
                        "  {:<30} {:<26} {}",
                        rule.id,
                        rule.kind.label(),
                        scope_label(rule.effective_scope())
                    );
                }
            }
            println!();
            println!("Use 'codestrip explain <rule-id>' for details.");
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&sets)?);
        }
    }
    Ok(())
}
