//! Builtin terminal commands.
//!
//! The table is closed: it is built once on first access and cached for the
//! lifetime of the process. Every handler is a plain function of the argument
//! tokens and a read-only [`CommandContext`]; lookups that miss are reported
//! as ordinary output text.

use std::sync::OnceLock;

use rand::{Rng, RngCore};

use super::files::canned_file;
use crate::service::{ServiceDirectory, ServiceStatus};

/// What a handler can read while producing output.
pub struct CommandContext<'a> {
    pub directory: &'a ServiceDirectory,
    /// Source of the synthetic jitter used by `ping`
    pub rng: &'a mut dyn RngCore,
}

/// Signature shared by every output-producing command.
pub type CommandHandler = fn(&mut CommandContext<'_>, &[&str]) -> String;

/// What running a builtin does.
#[derive(Clone, Copy)]
pub enum CommandAction {
    /// Empties the record history without producing a record.
    ClearHistory,
    /// Produces one output string.
    Output(CommandHandler),
}

impl std::fmt::Debug for CommandAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ClearHistory => write!(f, "ClearHistory"),
            Self::Output(_) => write!(f, "Output(..)"),
        }
    }
}

/// A builtin command provided by the terminal.
#[derive(Debug, Clone)]
pub struct BuiltinCommand {
    /// Command name as typed
    pub name: &'static str,
    /// Usage format shown by `help`
    pub usage: &'static str,
    /// Human-readable description
    pub description: &'static str,
    pub action: CommandAction,
}

impl BuiltinCommand {
    pub const fn new(
        name: &'static str,
        usage: &'static str,
        description: &'static str,
        action: CommandAction,
    ) -> Self {
        Self {
            name,
            usage,
            description,
            action,
        }
    }
}

static BUILTIN_COMMANDS: OnceLock<Vec<BuiltinCommand>> = OnceLock::new();

/// Returns all builtin commands in `help` order.
pub fn builtin_commands() -> &'static [BuiltinCommand] {
    BUILTIN_COMMANDS.get_or_init(|| {
        vec![
            BuiltinCommand::new(
                "help",
                "help",
                "Show this help message",
                CommandAction::Output(help),
            ),
            BuiltinCommand::new(
                "ls",
                "ls [services|projects]",
                "List services or projects",
                CommandAction::Output(ls),
            ),
            BuiltinCommand::new(
                "status",
                "status",
                "Show system status",
                CommandAction::Output(status),
            ),
            BuiltinCommand::new(
                "ping",
                "ping <service-id>",
                "Ping a service",
                CommandAction::Output(ping),
            ),
            BuiltinCommand::new(
                "cat",
                "cat <filename>",
                "Display content of a file",
                CommandAction::Output(cat),
            ),
            BuiltinCommand::new(
                "service",
                "service --logs <id>",
                "Show logs for a service",
                CommandAction::Output(service),
            ),
            BuiltinCommand::new(
                "clear",
                "clear",
                "Clear terminal",
                CommandAction::ClearHistory,
            ),
            BuiltinCommand::new(
                "deploy",
                "deploy <service-id>",
                "Deploy or restart a service",
                CommandAction::Output(deploy),
            ),
        ]
    })
}

/// Find a builtin command by its (already lower-cased) name.
pub fn find_builtin_command(name: &str) -> Option<&'static BuiltinCommand> {
    builtin_commands().iter().find(|cmd| cmd.name == name)
}

/// Output for a token that matches no builtin.
pub fn command_not_found(command: &str) -> String {
    format!("Command not found: {command}. Type 'help' for available commands.")
}

fn service_not_found(id: &str) -> String {
    format!("Error: Service '{id}' not found.")
}

const PROJECTS: [&str; 4] = [
    "Network Architecture Search Using Meta Hueristics Algorithm",
    "Predictive StockTrader",
    "Fake Face Detection",
    "Chat Application with Abusive Text Detection",
];

const DIRECTORY_LISTING: &str = "services/  projects/  resume.txt  skills.json  contact.md";

fn help(_ctx: &mut CommandContext<'_>, _args: &[&str]) -> String {
    let width = builtin_commands()
        .iter()
        .map(|cmd| cmd.usage.len())
        .max()
        .unwrap_or(0)
        .max(22);

    let mut out = String::from("Available commands:");
    for cmd in builtin_commands() {
        out.push_str(&format!(
            "\n    {:<width$} - {}",
            cmd.usage,
            cmd.description,
            width = width
        ));
    }
    out
}

fn ls(ctx: &mut CommandContext<'_>, args: &[&str]) -> String {
    if args.contains(&"services") {
        ctx.directory
            .iter()
            .map(|s| format!("{} ({})", s.id, s.status))
            .collect::<Vec<_>>()
            .join("\n")
    } else if args.contains(&"projects") {
        PROJECTS.join("\n")
    } else {
        DIRECTORY_LISTING.to_string()
    }
}

fn status(ctx: &mut CommandContext<'_>, _args: &[&str]) -> String {
    let online = ctx.directory.count_by_status(ServiceStatus::Online);
    let warning = ctx.directory.count_by_status(ServiceStatus::Warning);
    let error = ctx.directory.count_by_status(ServiceStatus::Error);
    format!(
        "System Status: Operational\n\
         Services: {online} online, {warning} degraded, {error} offline\n\
         System Load: 42%\n\
         Memory Usage: 68%\n\
         Network I/O: 240 Mbps"
    )
}

fn cat(_ctx: &mut CommandContext<'_>, args: &[&str]) -> String {
    let file = args.first().copied().unwrap_or("");
    match canned_file(file) {
        Some(content) => content.to_string(),
        None => format!("Error: File '{file}' not found."),
    }
}

fn ping(ctx: &mut CommandContext<'_>, args: &[&str]) -> String {
    let id = args.first().copied().unwrap_or("");
    let Some(service) = ctx.directory.find(id) else {
        return service_not_found(id);
    };

    let latency_ms: u32 = match service.status {
        ServiceStatus::Error => {
            return format!(
                "Error: Cannot ping {}. Service is currently unavailable.",
                service.name
            );
        }
        ServiceStatus::Warning => ctx.rng.gen_range(150..250),
        ServiceStatus::Online => ctx.rng.gen_range(10..60),
    };

    format!(
        "Pinging {} ({})...\nResponse time: {}ms\nStatus: {}",
        service.name, service.id, latency_ms, service.status
    )
}

fn service(ctx: &mut CommandContext<'_>, args: &[&str]) -> String {
    match args {
        ["--logs", id, ..] => match ctx.directory.find(id) {
            Some(service) => service
                .logs
                .iter()
                .map(|log| log.render())
                .collect::<Vec<_>>()
                .join("\n"),
            None => service_not_found(id),
        },
        _ => "Usage: service --logs <service-id>".to_string(),
    }
}

fn deploy(ctx: &mut CommandContext<'_>, args: &[&str]) -> String {
    let id = args.first().copied().unwrap_or("");
    let Some(service) = ctx.directory.find(id) else {
        return service_not_found(id);
    };

    format!(
        "Deploying {name}...\n\
         Pulling latest version...\n\
         Building container...\n\
         Starting service on port {port}...\n\
         Deployment complete! Service is {status}.",
        name = service.name,
        port = service.port,
        status = service.status
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Local;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn run(name: &str, args: &[&str]) -> String {
        let directory = ServiceDirectory::canned(&mut StdRng::seed_from_u64(1), Local::now());
        let mut rng = StdRng::seed_from_u64(42);
        let mut ctx = CommandContext {
            directory: &directory,
            rng: &mut rng,
        };
        match find_builtin_command(name).map(|cmd| cmd.action) {
            Some(CommandAction::Output(handler)) => handler(&mut ctx, args),
            other => panic!("{name} is not an output command: {other:?}"),
        }
    }

    #[test]
    fn test_builtin_commands_initialized() {
        let names: Vec<_> = builtin_commands().iter().map(|c| c.name).collect();
        assert_eq!(
            names,
            ["help", "ls", "status", "ping", "cat", "service", "clear", "deploy"]
        );
        assert!(matches!(
            find_builtin_command("clear").map(|c| c.action),
            Some(CommandAction::ClearHistory)
        ));
        assert!(find_builtin_command("nonexistent").is_none());
    }

    #[test]
    fn test_help_lists_every_usage() {
        let out = run("help", &[]);
        assert!(out.starts_with("Available commands:"));
        for cmd in builtin_commands() {
            assert!(out.contains(cmd.usage), "missing {}", cmd.usage);
        }
        assert!(out.contains("service --logs <id>    - Show logs for a service"));
    }

    #[test]
    fn test_ls_variants() {
        let services = run("ls", &["services"]);
        assert_eq!(services.lines().count(), 6);
        assert!(services.contains("cache-service (warning)"));

        let projects = run("ls", &["-l", "projects"]);
        assert!(projects.starts_with("Network Architecture Search"));

        assert_eq!(run("ls", &[]), DIRECTORY_LISTING);
    }

    #[test]
    fn test_status_counts() {
        let out = run("status", &[]);
        assert!(out.contains("Services: 4 online, 1 degraded, 1 offline"));
        assert!(out.ends_with("Network I/O: 240 Mbps"));
    }

    #[test]
    fn test_ping_ranges() {
        let out = run("ping", &["cache-service"]);
        let ms: u32 = out
            .lines()
            .nth(1)
            .and_then(|l| l.strip_prefix("Response time: "))
            .and_then(|l| l.strip_suffix("ms"))
            .and_then(|n| n.parse().ok())
            .expect("latency line");
        assert!((150..250).contains(&ms));
        assert!(out.ends_with("Status: warning"));
    }

    #[test]
    fn test_ping_errors() {
        assert_eq!(
            run("ping", &["notif-service"]),
            "Error: Cannot ping Notification Service. Service is currently unavailable."
        );
        assert_eq!(
            run("ping", &["unknown-id"]),
            "Error: Service 'unknown-id' not found."
        );
    }

    #[test]
    fn test_service_logs_usage() {
        assert_eq!(run("service", &[]), "Usage: service --logs <service-id>");
        assert_eq!(
            run("service", &["--logs"]),
            "Usage: service --logs <service-id>"
        );
        assert_eq!(
            run("service", &["--tail", "api-gateway"]),
            "Usage: service --logs <service-id>"
        );
        assert_eq!(
            run("service", &["--logs", "ghost"]),
            "Error: Service 'ghost' not found."
        );
        assert_eq!(run("service", &["--logs", "api-gateway"]).lines().count(), 10);
    }

    #[test]
    fn test_deploy_narrative() {
        let out = run("deploy", &["search-engine"]);
        assert_eq!(out.lines().count(), 5);
        assert!(out.contains("Starting service on port 9200..."));
        assert!(out.ends_with("Deployment complete! Service is online."));
        assert_eq!(run("deploy", &["nope"]), "Error: Service 'nope' not found.");
    }
}
