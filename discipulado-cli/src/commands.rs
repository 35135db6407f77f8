use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use discipulado_client::api::models::{Dia, EstadoAsistencia, Rol};
use discipulado_client::{ApiClient, ApiConfig, FileCredentialStore};

use crate::cli::{Args, Commands};
use crate::error::{CliError, Result};

pub async fn run(args: Args) -> Result<()> {
    let store = Arc::new(FileCredentialStore::new(credentials_path(&args)?));
    let mut client = ApiClient::new(ApiConfig::new(args.api_url.as_str()), store)?;
    client.set_session_expired_handler(|| {
        eprintln!("Session expired. Run `discipulado login <username>` to sign in again.");
    });

    match args.command {
        Commands::Login { username, password } => {
            let password = match password {
                Some(password) => password,
                None => prompt_password(&username)?,
            };
            client.login(&username, &password).await?;
            match client.identity().await {
                Some(identity) => println!(
                    "Logged in as {} ({})",
                    identity.display_name().unwrap_or(username.as_str()),
                    role_label(identity.role),
                ),
                None => println!("Logged in."),
            }
        }

        Commands::Whoami => match client.identity().await {
            Some(identity) => {
                println!(
                    "{} ({})",
                    identity.display_name().unwrap_or("<sin nombre>"),
                    role_label(identity.role),
                );
                if identity.is_expired() {
                    println!("Access credential is expired; it will be renewed on the next call.");
                }
            }
            None => println!("No active session."),
        },

        Commands::Logout => {
            client.logout().await;
            println!("Session cleared.");
        }

        Commands::Cursos => {
            for curso in client.list_cursos().await? {
                println!(
                    "{:>4}  {:<40}  {} – {}{}",
                    curso.id,
                    curso.nombre,
                    curso.fecha_inicio,
                    curso.fecha_fin,
                    if curso.activo { "" } else { "  (inactivo)" },
                );
            }
        }

        Commands::Alumnos => {
            for alumno in client.list_alumnos().await? {
                println!(
                    "{:>4}  {:<35}  {}{}",
                    alumno.id,
                    alumno.nombre_completo(),
                    alumno.fecha_nacimiento,
                    if alumno.activo { "" } else { "  (inactivo)" },
                );
            }
        }

        Commands::Dashboard { clase } => {
            let stats = client.dashboard_stats(clase).await?;
            println!("Clase {}", stats.numero_clase_consultada);
            for row in &stats.conteo_general {
                println!("  {:<10} {:>4}", estado_label(row.estado), row.total);
            }
            if !stats.faltas_por_horario.is_empty() {
                println!("Faltas por horario:");
                for row in &stats.faltas_por_horario {
                    println!(
                        "  {} {}  {:>4}",
                        dia_label(row.dia),
                        row.hora,
                        row.total_faltas
                    );
                }
            }
            if !stats.detalle_por_mesa.is_empty() {
                println!("Por mesa:");
                for row in &stats.detalle_por_mesa {
                    println!(
                        "  {:<20} ({})  {:<10} {:>4}",
                        row.nombre_mesa,
                        row.facilitador,
                        estado_label(row.estado),
                        row.total
                    );
                }
            }
        }
    }

    Ok(())
}

fn credentials_path(args: &Args) -> Result<PathBuf> {
    if let Some(path) = &args.credentials {
        return Ok(path.clone());
    }
    let base = dirs::config_dir()
        .ok_or_else(|| CliError::Usage("no config directory found; pass --credentials".into()))?;
    Ok(base.join("discipulado").join("credentials.json"))
}

fn prompt_password(username: &str) -> Result<String> {
    eprint!("Password for {username}: ");
    io::stderr().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end().to_string())
}

fn role_label(role: Option<Rol>) -> &'static str {
    match role {
        Some(Rol::Admin) => "administrador",
        Some(Rol::Facilitador) => "facilitador",
        None => "sin rol",
    }
}

fn estado_label(estado: EstadoAsistencia) -> &'static str {
    match estado {
        EstadoAsistencia::Asistio => "asistió",
        EstadoAsistencia::Falto => "faltó",
        EstadoAsistencia::Recupero => "recuperó",
        EstadoAsistencia::Adelanto => "adelantó",
    }
}

fn dia_label(dia: Dia) -> &'static str {
    match dia {
        Dia::Miercoles => "miércoles",
        Dia::Domingo => "domingo",
    }
}
