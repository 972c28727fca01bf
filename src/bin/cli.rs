use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};

use propauth::authz::{
    role_name, PermissionContext, PermissionTables, Role, Session, UnifiedPermissions,
};
use propauth::config::load_env;
use propauth::jwt::JwtConfig;

#[derive(Parser, Debug)]
#[command(author, version, about = "propauth permission tool", long_about = None)]
struct Cli {
    /// Permission tables JSON file (defaults to $PERMISSION_TABLES, then the built-ins)
    #[arg(long, global = true)]
    tables: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Check a permission string for a role
    Check {
        #[arg(long)]
        role: Role,
        permission: String,
        /// Session user id
        #[arg(long, default_value = "cli")]
        user: String,
        /// Owner of the resource, for `.own` scopes
        #[arg(long)]
        owner: Option<String>,
        /// Users assigned to the resource, for `.assigned` scopes
        #[arg(long = "assigned")]
        assigned: Vec<String>,
        /// Session departments, for `.department` scopes
        #[arg(long = "department")]
        departments: Vec<String>,
    },
    /// Check access to an application route
    Route {
        #[arg(long)]
        role: Role,
        route: String,
    },
    /// List navigation entries visible to a role
    Nav {
        #[arg(long)]
        role: Role,
    },
    /// Print the role hierarchy
    Roles,
    /// Print the active permission tables as JSON
    Tables,
    /// Mint a session token signed with $JWT_SECRET
    Token {
        #[arg(long)]
        user: String,
        #[arg(long)]
        role: Role,
    },
}

fn main() -> anyhow::Result<()> {
    load_env();

    let cli = Cli::parse();
    let tables = load_tables(cli.tables)?;

    match cli.command {
        Commands::Check {
            role,
            permission,
            user,
            owner,
            assigned,
            departments,
        } => {
            let session = Session::new(user, role);
            let perms = UnifiedPermissions::new(&tables, &session);

            let mut ctx = PermissionContext::new()
                .with_assigned(assigned)
                .with_departments(departments);
            if let Some(owner) = owner {
                ctx = ctx.with_owner(owner);
            }

            print_decision(&permission, perms.can(&permission, Some(&ctx)));
        }
        Commands::Route { role, route } => {
            print_decision(&route, tables.can_access_route(role, &route));
        }
        Commands::Nav { role } => {
            for key in tables.accessible_navigation(role) {
                println!("{}", key);
            }
        }
        Commands::Roles => {
            println!("{:<6} {:<10} {}", "Rank", "Role", "Name");
            for role in Role::ALL {
                println!("{:<6} {:<10} {}", role.rank(), role, role_name(role));
            }
        }
        Commands::Tables => {
            let json = serde_json::to_string_pretty(&tables.to_file())?;
            println!("{}", json);
        }
        Commands::Token { user, role } => {
            let jwt = JwtConfig::from_env()?;
            let token = jwt.encode(&Session::new(user, role))?;
            println!("{}", token);
        }
    }

    Ok(())
}

fn load_tables(path: Option<PathBuf>) -> anyhow::Result<PermissionTables> {
    let path = path.or_else(|| std::env::var_os("PERMISSION_TABLES").map(PathBuf::from));
    match path {
        Some(path) => PermissionTables::from_file(&path)
            .with_context(|| format!("failed to load permission tables from {}", path.display())),
        None => Ok(PermissionTables::builtin()),
    }
}

fn print_decision(subject: &str, allowed: bool) {
    let verdict = if allowed { "allow" } else { "deny" };
    println!("{:<6} {}", verdict, subject);
}
