//! PlanOk CLI - Projects, units and sales from the terminal
//!
//! Thin client over the PlanOk HTTP API.

mod api;
mod config;

use std::future::Future;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::{ColoredString, Colorize};
use dialoguer::{Input, Password};
use uuid::Uuid;

use api::{PlanOkClient, UnitQuery, UnitResponse, Unauthorized};
use config::Config;

#[derive(Parser)]
#[command(name = "planok")]
#[command(about = "PlanOk CLI - real-estate projects, units and sales", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Login and store the session tokens
    Login {
        /// Account email (will prompt if not provided)
        #[arg(short, long)]
        email: Option<String>,
    },

    /// Forget the stored session
    Logout,

    /// Show current configuration
    Config {
        /// Set the API base URL
        #[arg(long)]
        base_url: Option<String>,
    },

    /// Project queries
    Project {
        #[command(subcommand)]
        action: ProjectAction,
    },

    /// Unit queries and the sales flow
    Unit {
        #[command(subcommand)]
        action: UnitAction,
    },

    /// User queries
    User {
        #[command(subcommand)]
        action: UserAction,
    },
}

#[derive(Subcommand)]
enum ProjectAction {
    /// List projects
    List {
        /// Filter by status (e.g. "En Construcción")
        #[arg(short, long)]
        estado: Option<String>,
    },
    /// Show a project with its units
    Show {
        /// Project ID
        id: Uuid,
    },
    /// Portfolio statistics
    Stats,
}

#[derive(Subcommand)]
enum UnitAction {
    /// List units
    List {
        /// Only units of this project
        #[arg(short, long)]
        project: Option<Uuid>,
        /// Filter by status (Disponible, Reservado, Vendido, No Disponible)
        #[arg(short, long)]
        estado: Option<String>,
        /// Filter by type (Departamento, Casa, Oficina, ...)
        #[arg(short, long)]
        tipo: Option<String>,
    },
    /// List units open for sale
    Available,
    /// Reserve a unit for a client
    Reserve {
        /// Unit ID
        unit_id: Uuid,
        /// Client (user) ID
        #[arg(short, long)]
        client: Uuid,
    },
    /// Mark a reserved unit as sold
    Sell {
        /// Unit ID
        unit_id: Uuid,
    },
    /// Unit statistics for a project
    Stats {
        /// Project ID
        project_id: Uuid,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// List clients
    Clients,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    match cli.command {
        Commands::Login { email } => cmd_login(email).await,
        Commands::Logout => cmd_logout(),
        Commands::Config { base_url } => cmd_config(base_url),
        Commands::Project { action } => cmd_project(action).await,
        Commands::Unit { action } => cmd_unit(action).await,
        Commands::User { action } => cmd_user(action).await,
    }
}

// ============================================
// Session handling
// ============================================

/// Run `op` with the stored access token, refreshing it once if it expired
async fn with_session<T, F, Fut>(op: F) -> Result<T>
where
    F: Fn(PlanOkClient) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut config = Config::load()?;
    let token = config
        .access_token
        .clone()
        .context("Not logged in. Run 'planok login' first.")?;

    match op(PlanOkClient::new(&config.base_url, Some(&token))).await {
        Err(e) if e.is::<Unauthorized>() => {
            let Some(refresh) = config.refresh_token.clone() else {
                return Err(e);
            };
            let access = PlanOkClient::new(&config.base_url, None)
                .refresh(&refresh)
                .await?;
            config.access_token = Some(access.clone());
            config.save()?;

            op(PlanOkClient::new(&config.base_url, Some(&access))).await
        }
        result => result,
    }
}

// ============================================
// Command Implementations
// ============================================

async fn cmd_login(email: Option<String>) -> Result<()> {
    let mut config = Config::load()?;

    let email = match email {
        Some(e) => e,
        None => {
            let mut prompt = Input::<String>::new().with_prompt("Email");
            if let Some(last) = &config.email {
                prompt = prompt.default(last.clone());
            }
            prompt.interact_text().context("Failed to read email")?
        }
    };
    let password = Password::new()
        .with_prompt("Password")
        .interact()
        .context("Failed to read password")?;

    // Test connection
    let client = PlanOkClient::new(&config.base_url, None);
    print!("Testing connection... ");

    match client.health().await {
        Ok(true) => {
            println!("{}", "OK".green());
        }
        _ => {
            println!("{}", "Failed".red());
            bail!("Could not connect to PlanOk API at {}", config.base_url);
        }
    }

    let tokens = client.obtain_token(&email, &password).await?;
    let me = PlanOkClient::new(&config.base_url, Some(&tokens.access))
        .whoami()
        .await?;

    config.set_session(email, tokens.access, tokens.refresh);
    config.save()?;

    println!(
        "{} Logged in as {} ({})",
        "✓".green(),
        me.email.cyan(),
        me.role.dimmed()
    );
    println!("  Session saved to {:?}", Config::config_path()?);

    Ok(())
}

fn cmd_logout() -> Result<()> {
    let mut config = Config::load()?;

    if config.clear_session() {
        config.save()?;
        println!("{} Logged out", "✓".green());
    } else {
        println!("Not logged in.");
    }
    Ok(())
}

fn cmd_config(base_url: Option<String>) -> Result<()> {
    let mut config = Config::load()?;

    if let Some(url) = base_url {
        config.base_url = url;
        config.save()?;
        println!("{} Base URL set to {}", "✓".green(), config.base_url);
        return Ok(());
    }

    println!("{}", "Configuration:".bold());
    println!("  Path: {:?}", Config::config_path()?);
    println!("  Base URL: {}", config.base_url);
    println!(
        "  Session: {}",
        if config.is_logged_in() {
            "Logged in".green()
        } else {
            "Not logged in".red()
        }
    );
    println!(
        "  Email: {}",
        config.email.as_deref().unwrap_or("None").cyan()
    );

    Ok(())
}

async fn cmd_project(action: ProjectAction) -> Result<()> {
    match action {
        ProjectAction::List { estado } => {
            let estado = estado.as_deref();
            let projects =
                with_session(move |client| async move { client.list_projects(estado).await }).await?;

            if projects.is_empty() {
                println!("No projects found.");
                return Ok(());
            }

            println!("{}", "Projects:".bold());
            for project in projects {
                println!(
                    "  {} {} [{}] {} {}",
                    project.id.to_string().dimmed(),
                    project.nombre.cyan().bold(),
                    project.codigo,
                    project.estado.yellow(),
                    project.ubicacion.dimmed()
                );
            }
        }

        ProjectAction::Show { id } => {
            let detail = with_session(move |client| async move { client.get_project(id).await }).await?;
            let project = &detail.project;

            println!("{} [{}]", project.nombre.cyan().bold(), project.codigo);
            println!("  Status:   {}", project.estado.yellow());
            println!("  Location: {}", project.ubicacion);
            println!(
                "  Dates:    {} → {}",
                project.fecha_inicio,
                project.fecha_finalizacion.as_deref().unwrap_or("-")
            );
            if !detail.descripcion.is_empty() {
                println!("  {}", detail.descripcion.dimmed());
            }

            println!("\n{} ({})", "Units:".bold(), detail.unidades.len());
            for unit in &detail.unidades {
                print_unit(unit);
            }
        }

        ProjectAction::Stats => {
            let stats =
                with_session(move |client| async move { client.project_statistics().await }).await?;

            println!("{}", "Project statistics:".bold());
            println!("  Total:  {}", stats.total_proyectos.to_string().green());
            println!("  Active: {}", stats.proyectos_activos);
            for (status, count) in &stats.proyectos_por_estado {
                println!("    {:<18} {}", status, count);
            }
        }
    }

    Ok(())
}

async fn cmd_unit(action: UnitAction) -> Result<()> {
    match action {
        UnitAction::List {
            project,
            estado,
            tipo,
        } => {
            let query = UnitQuery {
                proyecto: project,
                estado,
                tipo_unidad: tipo,
            };
            let query = &query;
            let units = with_session(move |client| async move { client.list_units(query).await }).await?;
            print_units(&units);
        }

        UnitAction::Available => {
            let units = with_session(move |client| async move { client.available_units().await }).await?;
            print_units(&units);
        }

        UnitAction::Reserve { unit_id, client } => {
            let client_id = client;
            let unit = with_session(move |client| async move {
                client.reserve_unit(unit_id, client_id).await
            })
            .await?;
            println!(
                "{} Unit {} reserved for {}",
                "✓".green(),
                unit.numero_unidad.cyan(),
                client_id
            );
        }

        UnitAction::Sell { unit_id } => {
            let unit = with_session(move |client| async move { client.sell_unit(unit_id).await }).await?;
            println!(
                "{} Unit {} sold ({})",
                "✓".green(),
                unit.numero_unidad.cyan(),
                format_price(unit.precio_venta)
            );
        }

        UnitAction::Stats { project_id } => {
            let stats =
                with_session(move |client| async move { client.unit_statistics(project_id).await })
                    .await?;

            println!("{}", "Unit statistics:".bold());
            println!("  Total:   {}", stats.total_unidades.to_string().green());
            let price = |value: Option<f64>| value.map_or("-".to_string(), format_price);
            println!("  Average: {}", price(stats.precio_promedio));
            println!("  Min:     {}", price(stats.precio_minimo));
            println!("  Max:     {}", price(stats.precio_maximo));
            println!("  By status:");
            for (status, count) in &stats.unidades_por_estado {
                println!("    {:<18} {}", status_badge(status), count);
            }
            println!("  By type:");
            for (unit_type, count) in &stats.unidades_por_tipo {
                println!("    {:<18} {}", unit_type, count);
            }
        }
    }

    Ok(())
}

async fn cmd_user(action: UserAction) -> Result<()> {
    match action {
        UserAction::Clients => {
            let clients = with_session(move |client| async move { client.list_clients().await }).await?;

            if clients.is_empty() {
                println!("No clients found.");
                return Ok(());
            }

            println!("{}", "Clients:".bold());
            for user in clients {
                println!(
                    "  {} {} {} {}",
                    user.id.to_string().dimmed(),
                    format!("{} {}", user.first_name, user.last_name).cyan(),
                    user.rut,
                    user.email.dimmed()
                );
            }
        }
    }

    Ok(())
}

// ============================================
// Output helpers
// ============================================

fn print_units(units: &[UnitResponse]) {
    if units.is_empty() {
        println!("No units found.");
        return;
    }

    println!("{}", "Units:".bold());
    for unit in units {
        print_unit(unit);
    }
}

fn print_unit(unit: &UnitResponse) {
    let client = unit
        .cliente
        .map(|id| format!(" client {}", id))
        .unwrap_or_default();
    println!(
        "  {} {:<8} {:<16} {:>8.1} m² {:>14} {}{}",
        unit.id.to_string().dimmed(),
        unit.numero_unidad.cyan(),
        unit.tipo_unidad,
        unit.metraje_cuadrado,
        format_price(unit.precio_venta),
        status_badge(&unit.estado),
        client.dimmed()
    );
}

fn status_badge(status: &str) -> ColoredString {
    match status {
        "Disponible" => status.green(),
        "Reservado" => status.yellow(),
        "Vendido" => status.red(),
        _ => status.dimmed(),
    }
}

/// Two decimals with thousands separators
fn format_price(value: f64) -> String {
    let cents = (value * 100.0).round() as i64;
    let (whole, fraction) = (cents.abs() / 100, cents.abs() % 100);

    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if cents < 0 { "-" } else { "" };
    format!("{}{}.{:02}", sign, grouped, fraction)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(3500.0), "3,500.00");
        assert_eq!(format_price(1_234_567.891), "1,234,567.89");
        assert_eq!(format_price(0.5), "0.50");
        assert_eq!(format_price(999.0), "999.00");
    }

    #[test]
    fn test_cli_parses_reserve() {
        let unit = Uuid::new_v4();
        let client = Uuid::new_v4();
        let cli = Cli::try_parse_from([
            "planok",
            "unit",
            "reserve",
            &unit.to_string(),
            "--client",
            &client.to_string(),
        ])
        .unwrap();

        match cli.command {
            Commands::Unit {
                action: UnitAction::Reserve { unit_id, client: c },
            } => {
                assert_eq!(unit_id, unit);
                assert_eq!(c, client);
            }
            _ => panic!("expected unit reserve"),
        }
    }

    #[test]
    fn test_cli_rejects_bad_uuid() {
        assert!(Cli::try_parse_from(["planok", "project", "show", "not-a-uuid"]).is_err());
    }
}
