//! Consular access control: demo CLI
//!
//! Runs permission queries against the built-in consular role table, the
//! same way the portal and the back office do before rendering an action or
//! performing a mutation.
//!
//! Usage:
//!   cargo run -p consulat-demo -- check --role agent --membership m1 \
//!       --resource requests --action process \
//!       --entity '{"id":"r1","user_id":"c1","assigned_agent_id":"m1","status":"submitted"}'
//!   cargo run -p consulat-demo -- summary --role manager --resource appointments
//!   cargo run -p consulat-demo -- matrix --role consul
//!   cargo run -p consulat-demo -- roles

mod dispatch;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use serde_json::Value;
use tracing_subscriber::EnvFilter;

use consulat_contracts::{AccessError, AccessResult, Principal, ResourceKind, Role, RoleScope};
use consulat_policy::{Authorizer, Overrides, RuleKind};

// ── CLI definition ────────────────────────────────────────────────────────────

/// Query the consular permission table.
#[derive(Parser)]
#[command(
    name = "consulat-demo",
    about = "Consular role table and permission evaluator demo",
    long_about = "Evaluates permission queries against the built-in consular role table.\n\
                  Denials are fail-closed: a missing role, resource, action or entity denies."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Decide one (resource, action) query.
    Check {
        #[command(flatten)]
        principal: PrincipalArgs,
        #[arg(long)]
        resource: ResourceKind,
        #[arg(long)]
        action: String,
        /// Entity record as JSON, for ownership and assignment rules.
        #[arg(long)]
        entity: Option<String>,
        /// TOML file with membership overrides.
        #[arg(long)]
        overrides: Option<PathBuf>,
        /// Fail with "permission denied" instead of printing the decision.
        #[arg(long)]
        assert: bool,
    },
    /// Evaluate every action of a resource.
    Summary {
        #[command(flatten)]
        principal: PrincipalArgs,
        #[arg(long)]
        resource: ResourceKind,
        #[arg(long)]
        entity: Option<String>,
        /// Print JSON instead of a table.
        #[arg(long)]
        json: bool,
    },
    /// Show how the table treats one role, resource by resource.
    Matrix {
        #[arg(long)]
        role: Role,
    },
    /// List every known role and its scope.
    Roles,
}

#[derive(Args)]
struct PrincipalArgs {
    /// Evaluate as an unauthenticated caller.
    #[arg(long, conflicts_with_all = ["role", "membership"])]
    anonymous: bool,
    #[arg(long, default_value = "demo-user")]
    user_id: String,
    /// Membership id the user acts through.
    #[arg(long)]
    membership: Option<String>,
    /// Role held by the user; repeat for several.
    #[arg(long = "role")]
    role: Vec<Role>,
}

impl PrincipalArgs {
    fn principal(&self) -> Option<Principal> {
        if self.anonymous {
            return None;
        }
        let mut principal = Principal::new(&self.user_id).with_roles(self.role.iter().copied());
        if let Some(membership) = &self.membership {
            principal = principal.with_membership(membership);
        }
        Some(principal)
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // Set RUST_LOG=debug to see each decision, RUST_LOG=trace for per-role detail.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();
    let authorizer = Authorizer::consular();

    let result = match cli.command {
        Command::Check {
            principal,
            resource,
            action,
            entity,
            overrides,
            assert,
        } => run_check(
            &authorizer,
            &principal,
            resource,
            &action,
            entity.as_deref(),
            overrides,
            assert,
        ),
        Command::Summary {
            principal,
            resource,
            entity,
            json,
        } => run_summary(&authorizer, &principal, resource, entity.as_deref(), json),
        Command::Matrix { role } => {
            run_matrix(&authorizer, role);
            Ok(())
        }
        Command::Roles => {
            run_roles();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

// ── Commands ──────────────────────────────────────────────────────────────────

fn parse_entity(raw: Option<&str>) -> AccessResult<Option<Value>> {
    raw.map(|s| {
        serde_json::from_str(s).map_err(|e| AccessError::InvalidQuery {
            reason: format!("--entity is not valid JSON: {}", e),
        })
    })
    .transpose()
}

fn run_check(
    authorizer: &Authorizer,
    args: &PrincipalArgs,
    resource: ResourceKind,
    action: &str,
    entity: Option<&str>,
    overrides: Option<PathBuf>,
    assert: bool,
) -> AccessResult<()> {
    let principal = args.principal();
    let entity = parse_entity(entity)?;
    let overrides = match overrides {
        Some(path) => Overrides::from_file(&path)?,
        None => Overrides::default(),
    };

    let granted = dispatch::check(
        authorizer,
        principal.as_ref(),
        &overrides,
        resource,
        action,
        entity.as_ref(),
    )?;

    if assert && !granted {
        let action = resource.canonical_action(action)?;
        return Err(AccessError::PermissionDenied {
            resource,
            action,
            entity_id: entity
                .as_ref()
                .and_then(|e| e.get("id"))
                .and_then(Value::as_str)
                .map(str::to_string),
        });
    }

    println!(
        "{}.{}: {}",
        resource,
        action,
        if granted { "granted" } else { "denied" }
    );
    Ok(())
}

fn run_summary(
    authorizer: &Authorizer,
    args: &PrincipalArgs,
    resource: ResourceKind,
    entity: Option<&str>,
    json: bool,
) -> AccessResult<()> {
    let principal = args.principal();
    let entity = parse_entity(entity)?;
    let rows = dispatch::summary(authorizer, principal.as_ref(), resource, entity.as_ref())?;

    if json {
        let out = serde_json::to_string_pretty(&rows).map_err(|e| AccessError::InvalidQuery {
            reason: format!("failed to render summary: {}", e),
        })?;
        println!("{}", out);
        return Ok(());
    }

    println!("{}", resource);
    for row in rows {
        println!("  {:<14} {}", row.action, if row.granted { "yes" } else { "no" });
    }
    Ok(())
}

fn run_matrix(authorizer: &Authorizer, role: Role) {
    println!("{} ({})", role, scope_label(role.scope()));
    if authorizer.table().grants(role).is_none() {
        println!("  no grants");
        return;
    }
    for resource in ResourceKind::ALL {
        let row = dispatch::matrix_row(authorizer.table(), role, *resource);
        let cells: Vec<String> = row
            .iter()
            .filter(|cell| cell.rule != RuleKind::Denied)
            .map(|cell| match cell.rule {
                RuleKind::Conditional => format!("{}?", cell.action),
                _ => cell.action.to_string(),
            })
            .collect();
        if cells.is_empty() {
            continue;
        }
        println!("  {:<20} {}", resource.as_str(), cells.join(" "));
    }
    println!();
    println!("  ? = granted only when the ownership or assignment check passes");
}

fn run_roles() {
    for role in Role::ALL {
        println!("  {:<26} {}", role.as_str(), scope_label(role.scope()));
    }
}

fn scope_label(scope: RoleScope) -> &'static str {
    match scope {
        RoleScope::Platform => "platform",
        RoleScope::Organization => "organization",
    }
}
